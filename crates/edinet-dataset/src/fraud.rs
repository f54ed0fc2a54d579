//! Fraud-detection records.
//!
//! Filings that were later amended because of accounting irregularities are
//! labelled positive. The explanation comes from an analysis of the
//! amendment, stored as JSON lines.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use edinet_core::{EdinetError, EncodedSections, FinancialStatementDocument, Result};
use edinet_parser::{FilingParser, ParseOutcome};

use crate::record::{DatasetRecord, doc_id_from_path};

/// One line of the amendment analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmendmentAnalysis {
    /// Identifier of the amended report.
    pub amended_doc_id: String,
    /// Identifier of the report the amendment corrects, if known.
    #[serde(default)]
    pub original_doc_id: Option<String>,
    /// Whether the amendment stems from accounting fraud.
    pub is_accounting_fraud: bool,
    /// Free-text reasoning.
    #[serde(default)]
    pub explanation: String,
    /// Filer name as read from the amendment.
    #[serde(default)]
    pub company_name: Option<String>,
}

/// Explanation attached to a fraud-labelled filing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudExplanation {
    /// Identifier of the amended report.
    pub amended_doc_id: String,
    /// Why the amendment counts as fraud.
    pub explanation: String,
}

/// Fraud explanations indexed by document identifier.
///
/// Only fraud cases are kept. An entry is reachable both by the amended
/// report's identifier and, when known, by the original report's.
#[derive(Clone, Debug, Default)]
pub struct FraudExplanationTable {
    entries: HashMap<String, FraudExplanation>,
}

impl FraudExplanationTable {
    /// Builds a table from analysis entries.
    pub fn from_analyses(analyses: impl IntoIterator<Item = AmendmentAnalysis>) -> Self {
        let mut entries = HashMap::new();
        for analysis in analyses.into_iter().filter(|a| a.is_accounting_fraud) {
            let explanation = FraudExplanation {
                amended_doc_id: analysis.amended_doc_id.clone(),
                explanation: analysis.explanation,
            };
            if let Some(original) = analysis.original_doc_id {
                entries.insert(original, explanation.clone());
            }
            entries.insert(analysis.amended_doc_id, explanation);
        }
        Self { entries }
    }

    /// Reads a JSON-lines analysis. Blank lines are ignored.
    pub fn from_jsonl(reader: impl BufRead) -> Result<Self> {
        let mut analyses = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let analysis: AmendmentAnalysis = serde_json::from_str(&line).map_err(|e| {
                EdinetError::MalformedInput(format!("analysis line {}: {e}", index + 1))
            })?;
            analyses.push(analysis);
        }
        Ok(Self::from_analyses(analyses))
    }

    /// Reads a JSON-lines analysis file.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_jsonl(std::io::BufReader::new(file))?;
        debug!(entries = table.len(), "Loaded fraud explanations");
        Ok(table)
    }

    /// Looks up the explanation for a document.
    #[must_use]
    pub fn get(&self, doc_id: &str) -> Option<&FraudExplanation> {
        self.entries.get(doc_id)
    }

    /// Number of indexed identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no fraud case is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Class of a fraud-detection example.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FraudLabel {
    /// Later restated for accounting fraud.
    Fraud,
    /// No known irregularity.
    NonFraud,
}

impl FraudLabel {
    /// Numeric label written to the dataset.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        match self {
            Self::Fraud => 1,
            Self::NonFraud => 0,
        }
    }
}

/// One fraud-detection example.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudRecord {
    /// Sections of the filing.
    #[serde(flatten)]
    pub sections: EncodedSections,
    /// 1 for fraud, 0 otherwise.
    pub label: u8,
    /// Explanation of the fraud case; empty for non-fraud or unknown cases.
    pub explanation: String,
    /// EDINET code of the filer.
    pub edinet_code: String,
    /// Identifier of the amending report; empty when not applicable.
    pub amended_doc_id: String,
    /// Identifier of the filing.
    pub doc_id: String,
    /// Path of the filing's export.
    pub file_path: String,
}

impl FraudRecord {
    /// Builds a record for a parsed filing. Returns `None` when the document
    /// has no EDINET code.
    pub fn new(
        document: &FinancialStatementDocument,
        label: FraudLabel,
        path: &Path,
        explanations: &FraudExplanationTable,
    ) -> Result<Option<Self>> {
        let doc_id = doc_id_from_path(path);
        let Some(edinet_code) = document.edinet_code().filter(|code| !code.is_empty()) else {
            warn!(doc_id = %doc_id, "No EDINET code in document");
            return Ok(None);
        };

        let (explanation, amended_doc_id) = match (label, explanations.get(&doc_id)) {
            (FraudLabel::Fraud, Some(found)) => (found.explanation.clone(), found.amended_doc_id.clone()),
            _ => (String::new(), String::new()),
        };

        Ok(Some(Self {
            sections: document.encode_sections()?,
            label: label.as_u8(),
            explanation,
            edinet_code: edinet_code.to_string(),
            amended_doc_id,
            doc_id,
            file_path: path.display().to_string(),
        }))
    }
}

impl DatasetRecord for FraudRecord {
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

/// Parses one export and builds a fraud-detection record.
pub fn build_fraud_record(
    path: &Path,
    label: FraudLabel,
    explanations: &FraudExplanationTable,
    parser: &FilingParser,
) -> Result<Option<FraudRecord>> {
    match parser.parse(path)?.outcome {
        ParseOutcome::Document(document) => FraudRecord::new(&document, label, path, explanations),
        ParseOutcome::NotApplicable(reason) => {
            debug!(path = %path.display(), ?reason, "Filing not applicable");
            Ok(None)
        }
    }
}
