//! Earnings-forecast records.
//!
//! A record pairs two consecutive annual filings of one company. Its features
//! are the earlier filing's document; its label says whether profit
//! attributable to owners of the parent rose in the later year.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use edinet_core::{EncodedSections, FactRow, FinancialStatementDocument, FiscalYear, Result};
use edinet_parser::{
    FilingParser, deduplicate, filter_by_consolidation, filter_by_element_id, filter_by_year,
    read_facts,
};

use crate::record::{DatasetRecord, doc_id_from_path};

/// Profit elements tried in order: Japanese GAAP (with its IFRS-suffixed
/// variant), then the IFRS parent-company element.
pub const PROFIT_ELEMENTS: [&str; 2] = [
    "ProfitLossAttributableToOwnersOfParent",
    "ProfitLossAttributableToOwnersOfParentCompanyIFRS",
];

/// Extracts consolidated profit attributable to owners of the parent for one
/// year.
///
/// Returns `None` unless exactly one fact reports the year with an integer
/// value.
pub fn extract_profit(facts: &[FactRow], year: FiscalYear) -> Option<i64> {
    let unique = deduplicate(facts);
    let candidates = PROFIT_ELEMENTS.iter().find_map(|element| {
        let matched = filter_by_consolidation(filter_by_element_id(unique.iter().copied(), element));
        (!matched.is_empty()).then_some(matched)
    })?;

    match filter_by_year(candidates, year).as_slice() {
        [only] => only.value.trim().parse().ok(),
        matched => {
            debug!(year = %year, matches = matched.len(), "Profit not uniquely reported");
            None
        }
    }
}

/// Profit over three consecutive fiscal years.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitHistory {
    /// Two years before the target year.
    pub prior2: i64,
    /// The year before the target year.
    pub prior1: i64,
    /// The target year.
    pub current: i64,
}

impl ProfitHistory {
    /// Reads the history from a pair of filings: the earlier filing supplies
    /// its prior and current years, the later filing its current year.
    pub fn from_pair(previous: &[FactRow], current: &[FactRow]) -> Option<Self> {
        Some(Self {
            prior2: extract_profit(previous, FiscalYear::Prior1Year)?,
            prior1: extract_profit(previous, FiscalYear::CurrentYear)?,
            current: extract_profit(current, FiscalYear::CurrentYear)?,
        })
    }

    /// Whether profit increased in the target year.
    #[must_use]
    pub const fn label(&self) -> bool {
        self.current > self.prior1
    }

    /// Whether profit increased in the year before; the persistence baseline.
    #[must_use]
    pub const fn naive_prediction(&self) -> bool {
        self.prior1 > self.prior2
    }
}

/// One earnings-forecast example.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsRecord {
    /// Sections of the earlier filing.
    #[serde(flatten)]
    pub sections: EncodedSections,
    /// 1 if profit increased in the later year.
    pub label: u8,
    /// 1 if profit increased in the earlier year.
    pub naive_prediction: u8,
    /// EDINET code of the filer.
    pub edinet_code: String,
    /// Document identifier of the earlier filing.
    pub doc_id: String,
    /// Path of the earlier filing's export.
    pub previous_year_file_path: String,
    /// Path of the later filing's export.
    pub current_year_file_path: String,
}

impl EarningsRecord {
    /// Builds a record from the earlier filing's document and the profit
    /// history. Returns `None` when the document has no EDINET code.
    pub fn new(
        document: &FinancialStatementDocument,
        profits: ProfitHistory,
        previous_path: &Path,
        current_path: &Path,
    ) -> Result<Option<Self>> {
        let Some(edinet_code) = document.edinet_code() else {
            return Ok(None);
        };
        Ok(Some(Self {
            sections: document.encode_sections()?,
            label: u8::from(profits.label()),
            naive_prediction: u8::from(profits.naive_prediction()),
            edinet_code: edinet_code.to_string(),
            doc_id: doc_id_from_path(previous_path),
            previous_year_file_path: previous_path.display().to_string(),
            current_year_file_path: current_path.display().to_string(),
        }))
    }
}

impl DatasetRecord for EarningsRecord {
    fn sections(&self) -> &EncodedSections {
        &self.sections
    }

    fn edinet_code(&self) -> &str {
        &self.edinet_code
    }

    fn doc_id(&self) -> &str {
        &self.doc_id
    }
}

/// Reads a pair of exports and builds an earnings record.
///
/// `Ok(None)` means the pair is not usable: a profit figure is missing or
/// ambiguous, or the earlier filing is not consolidated.
#[instrument(skip_all, fields(previous = %previous_path.display(), current = %current_path.display()))]
pub fn build_earnings_record(
    previous_path: &Path,
    current_path: &Path,
    parser: &FilingParser,
) -> Result<Option<EarningsRecord>> {
    let previous = read_facts(previous_path)?;
    let current = read_facts(current_path)?;

    let Some(profits) = ProfitHistory::from_pair(&previous, &current) else {
        debug!("Profit history incomplete");
        return Ok(None);
    };

    let Some(document) = parser.assembler().assemble(&previous).outcome.into_document() else {
        debug!("Earlier filing not applicable");
        return Ok(None);
    };
    EarningsRecord::new(&document, profits, previous_path, current_path)
}

/// Keeps equally many positive and negative examples, in input order.
pub fn balance_classes(records: Vec<EarningsRecord>) -> Vec<EarningsRecord> {
    let (positive, negative): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| r.label == 1);
    let keep = positive.len().min(negative.len());
    positive
        .into_iter()
        .take(keep)
        .chain(negative.into_iter().take(keep))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use edinet_core::MetaSection;
    use edinet_core::document::fields;

    fn profit(element: &str, context: &str, value: &str) -> FactRow {
        FactRow::new(element, context, "当期", "連結", "期間", value)
    }

    #[test]
    fn test_extract_profit_japanese_gaap() {
        let facts = vec![
            profit("jppfs_cor:ProfitLossAttributableToOwnersOfParent", "CurrentYearDuration", "4944933000000"),
            profit("jppfs_cor:ProfitLossAttributableToOwnersOfParent", "Prior1YearDuration", "2451318000000"),
            profit("jpcrp_cor:ProfitLossAttributableToOwnersOfParentSummaryOfBusinessResults", "CurrentYearDuration", "1"),
        ];
        assert_eq!(extract_profit(&facts, FiscalYear::CurrentYear), Some(4_944_933_000_000));
        assert_eq!(extract_profit(&facts, FiscalYear::Prior1Year), Some(2_451_318_000_000));
        assert_eq!(extract_profit(&facts, FiscalYear::Prior2Year), None);
    }

    #[test]
    fn test_extract_profit_ifrs() {
        let facts = vec![profit(
            "jpigp_cor:ProfitLossAttributableToOwnersOfParentCompanyIFRS",
            "CurrentYearDuration",
            "-1200",
        )];
        assert_eq!(extract_profit(&facts, FiscalYear::CurrentYear), Some(-1200));
    }

    #[test]
    fn test_extract_profit_ignores_standalone_and_duplicates() {
        let facts = vec![
            profit("jppfs_cor:ProfitLossAttributableToOwnersOfParent", "CurrentYearDuration", "100"),
            profit("jppfs_cor:ProfitLossAttributableToOwnersOfParent", "CurrentYearDuration", "100"),
            FactRow::new(
                "jppfs_cor:ProfitLossAttributableToOwnersOfParent",
                "CurrentYearDuration_NonConsolidatedMember",
                "当期",
                "個別",
                "期間",
                "40",
            ),
        ];
        assert_eq!(extract_profit(&facts, FiscalYear::CurrentYear), Some(100));
    }

    #[test]
    fn test_extract_profit_rejects_non_integer() {
        let facts = vec![profit(
            "jppfs_cor:ProfitLossAttributableToOwnersOfParent",
            "CurrentYearDuration",
            "－",
        )];
        assert_eq!(extract_profit(&facts, FiscalYear::CurrentYear), None);
    }

    #[test]
    fn test_profit_history_labels() {
        let element = "jppfs_cor:ProfitLossAttributableToOwnersOfParent";
        let previous = vec![
            profit(element, "Prior1YearDuration", "80"),
            profit(element, "CurrentYearDuration", "100"),
        ];
        let current = vec![
            profit(element, "Prior1YearDuration", "100"),
            profit(element, "CurrentYearDuration", "90"),
        ];
        let history = ProfitHistory::from_pair(&previous, &current).unwrap();
        assert_eq!(
            history,
            ProfitHistory {
                prior2: 80,
                prior1: 100,
                current: 90
            }
        );
        assert!(!history.label());
        assert!(history.naive_prediction());

        assert!(ProfitHistory::from_pair(&previous, &[]).is_none());
    }

    #[test]
    fn test_record_fields() {
        let mut meta = MetaSection::new();
        meta.insert(fields::EDINET_CODE.to_string(), "E02144".to_string());
        let doc = FinancialStatementDocument::new(
            meta,
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
        );
        let history = ProfitHistory {
            prior2: 1,
            prior1: 2,
            current: 3,
        };
        let record = EarningsRecord::new(
            &doc,
            history,
            Path::new("corpus/E02144/S100A.tsv"),
            Path::new("corpus/E02144/S100B.tsv"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(record.label, 1);
        assert_eq!(record.naive_prediction, 1);
        assert_eq!(record.doc_id, "S100A");
        assert_eq!(record.edinet_code, "E02144");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["meta"], "{\"EDINETコード\":\"E02144\"}");
        assert_eq!(value["current_year_file_path"], "corpus/E02144/S100B.tsv");

        let anonymous = FinancialStatementDocument::default();
        assert!(
            EarningsRecord::new(&anonymous, history, Path::new("a.tsv"), Path::new("b.tsv"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_balance_classes() {
        let make = |doc_id: &str, label: u8| EarningsRecord {
            sections: EncodedSections::default(),
            label,
            naive_prediction: 0,
            edinet_code: "E00001".to_string(),
            doc_id: doc_id.to_string(),
            previous_year_file_path: String::new(),
            current_year_file_path: String::new(),
        };
        let records = vec![make("a", 1), make("b", 1), make("c", 0), make("d", 1)];
        let balanced = balance_classes(records);
        let ids: Vec<_> = balanced.iter().map(|r| r.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
