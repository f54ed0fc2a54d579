//! Shared shape of dataset records.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::warn;

use edinet_core::{EncodedSections, MetaSection, document::fields};

/// A dataset record built from one parsed filing.
pub trait DatasetRecord: Serialize + Send {
    /// The JSON-encoded document sections.
    fn sections(&self) -> &EncodedSections;

    /// EDINET code of the filer.
    fn edinet_code(&self) -> &str;

    /// Identifier of the source document.
    fn doc_id(&self) -> &str;

    /// Start of the fiscal year the record's document covers, read from META.
    fn fiscal_year_start(&self) -> Option<NaiveDate> {
        let meta: MetaSection = serde_json::from_str(&self.sections().meta).ok()?;
        let raw = meta.get(fields::FISCAL_YEAR_START)?;
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
    }
}

/// Records split into training and evaluation sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetSplit<R> {
    /// Training records.
    pub train: Vec<R>,
    /// Evaluation records.
    pub test: Vec<R>,
}

/// Splits records on the start of their fiscal year: years before
/// `cutoff_year` train, the rest test. Records without a readable start date
/// are dropped.
pub fn split_by_fiscal_year<R: DatasetRecord>(records: Vec<R>, cutoff_year: i32) -> DatasetSplit<R> {
    let mut split = DatasetSplit {
        train: Vec::new(),
        test: Vec::new(),
    };
    for record in records {
        match record.fiscal_year_start() {
            Some(start) if start.year() < cutoff_year => split.train.push(record),
            Some(_) => split.test.push(record),
            None => warn!(doc_id = record.doc_id(), "No fiscal year start, dropping record"),
        }
    }
    split
}

/// Document identifier of an export file: its file name up to the first dot.
pub fn doc_id_from_path(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use edinet_core::FinancialStatementDocument;
    use std::path::PathBuf;

    #[derive(Debug, Serialize)]
    struct Sample {
        sections: EncodedSections,
        doc_id: String,
    }

    impl DatasetRecord for Sample {
        fn sections(&self) -> &EncodedSections {
            &self.sections
        }

        fn edinet_code(&self) -> &str {
            "E00001"
        }

        fn doc_id(&self) -> &str {
            &self.doc_id
        }
    }

    fn sample(doc_id: &str, start: Option<&str>) -> Sample {
        let mut meta = MetaSection::new();
        if let Some(start) = start {
            meta.insert(fields::FISCAL_YEAR_START.to_string(), start.to_string());
        }
        let doc = FinancialStatementDocument::new(
            meta,
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
        );
        Sample {
            sections: doc.encode_sections().unwrap(),
            doc_id: doc_id.to_string(),
        }
    }

    #[test]
    fn test_split_by_fiscal_year() {
        let records = vec![
            sample("S1", Some("2018-04-01")),
            sample("S2", Some("2020-04-01")),
            sample("S3", Some("2019-12-31")),
            sample("S4", None),
            sample("S5", Some("not a date")),
        ];
        let split = split_by_fiscal_year(records, 2020);
        let train: Vec<_> = split.train.iter().map(|r| r.doc_id.as_str()).collect();
        let test: Vec<_> = split.test.iter().map(|r| r.doc_id.as_str()).collect();
        assert_eq!(train, vec!["S1", "S3"]);
        assert_eq!(test, vec!["S2"]);
    }

    #[test]
    fn test_doc_id_from_path() {
        assert_eq!(doc_id_from_path(&PathBuf::from("corpus/E02144/S100TR7I.tsv")), "S100TR7I");
        assert_eq!(doc_id_from_path(&PathBuf::from("S100TR7I")), "S100TR7I");
        assert_eq!(doc_id_from_path(&PathBuf::from("/")), "");
    }
}
