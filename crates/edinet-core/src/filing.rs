//! Filing metadata and document type classification.
//!
//! [`FilingMetadata`] mirrors one entry of the EDINET document-list API
//! (`documents.json?type=2`). The retrieval layer stores it next to each
//! downloaded export; dataset builders use its period dates to pair filings
//! across fiscal years.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of periodic report, derived from the ordinance and form codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    /// Annual securities report (有価証券報告書).
    Annual,
    /// Amended annual securities report.
    AnnualAmended,
    /// Quarterly report.
    Quarterly,
    /// Amended quarterly report.
    QuarterlyAmended,
    /// Semiannual report.
    Semiannual,
    /// Amended semiannual report.
    SemiannualAmended,
    /// Any other form.
    Unknown,
}

impl DocType {
    /// Classifies a filing from its ordinance code and form code.
    #[must_use]
    pub fn from_codes(ordinance_code: &str, form_code: &str) -> Self {
        match (ordinance_code, form_code) {
            ("010", "030000") => Self::Annual,
            ("010", "030001") => Self::AnnualAmended,
            ("010", "043000") => Self::Quarterly,
            ("010", "043001") => Self::QuarterlyAmended,
            ("010", "043A00") => Self::Semiannual,
            ("010", "043A01") => Self::SemiannualAmended,
            _ => Self::Unknown,
        }
    }

    /// Returns the snake_case name used in corpus paths.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::AnnualAmended => "annual_amended",
            Self::Quarterly => "quarterly",
            Self::QuarterlyAmended => "quarterly_amended",
            Self::Semiannual => "semiannual",
            Self::SemiannualAmended => "semiannual_amended",
            Self::Unknown => "unknown",
        }
    }

    /// Returns true for amended reports.
    #[must_use]
    pub const fn is_amendment(&self) -> bool {
        matches!(
            self,
            Self::AnnualAmended | Self::QuarterlyAmended | Self::SemiannualAmended
        )
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the EDINET document list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingMetadata {
    /// Sequence number within the day's list.
    #[serde(default)]
    pub seq_number: Option<u32>,
    /// Document identifier, e.g. `S100TR7I`.
    #[serde(rename = "docID")]
    pub doc_id: String,
    /// EDINET code of the filer.
    #[serde(default)]
    pub edinet_code: Option<String>,
    /// Securities code.
    #[serde(default)]
    pub sec_code: Option<String>,
    /// Corporate number.
    #[serde(rename = "JCN", default)]
    pub jcn: Option<String>,
    /// Filer name.
    #[serde(default)]
    pub filer_name: Option<String>,
    /// Fund code (investment trusts only).
    #[serde(default)]
    pub fund_code: Option<String>,
    /// Ordinance code.
    #[serde(default)]
    pub ordinance_code: Option<String>,
    /// Form code.
    #[serde(default)]
    pub form_code: Option<String>,
    /// Document type code.
    #[serde(default)]
    pub doc_type_code: Option<String>,
    /// Start of the reporting period.
    #[serde(default)]
    pub period_start: Option<NaiveDate>,
    /// End of the reporting period.
    #[serde(default)]
    pub period_end: Option<NaiveDate>,
    /// Submission timestamp, `YYYY-MM-DD hh:mm`.
    #[serde(default)]
    pub submit_date_time: Option<String>,
    /// Free-form document description.
    #[serde(default)]
    pub doc_description: Option<String>,
    /// Document this one amends, if any.
    #[serde(rename = "parentDocID", default)]
    pub parent_doc_id: Option<String>,
    /// `1` when the document was withdrawn.
    #[serde(default)]
    pub withdrawal_status: Option<String>,
    /// `1` when the document carries XBRL.
    #[serde(default)]
    pub xbrl_flag: Option<String>,
    /// `1` when a PDF rendition is available.
    #[serde(default)]
    pub pdf_flag: Option<String>,
    /// `1` when the CSV export is available.
    #[serde(default)]
    pub csv_flag: Option<String>,
}

impl FilingMetadata {
    /// Creates metadata with the fields needed for pairing.
    #[must_use]
    pub fn new(
        doc_id: impl Into<String>,
        edinet_code: impl Into<String>,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            edinet_code: Some(edinet_code.into()),
            period_start: Some(period_start),
            period_end: Some(period_end),
            ..Default::default()
        }
    }

    /// Sets the ordinance and form codes.
    #[must_use]
    pub fn with_codes(mut self, ordinance_code: impl Into<String>, form_code: impl Into<String>) -> Self {
        self.ordinance_code = Some(ordinance_code.into());
        self.form_code = Some(form_code.into());
        self
    }

    /// Document type derived from the ordinance and form codes.
    #[must_use]
    pub fn doc_type(&self) -> DocType {
        match (&self.ordinance_code, &self.form_code) {
            (Some(ordinance), Some(form)) => DocType::from_codes(ordinance, form),
            _ => DocType::Unknown,
        }
    }

    /// Returns true if the filer withdrew this document.
    #[must_use]
    pub fn is_withdrawn(&self) -> bool {
        self.withdrawal_status.as_deref() == Some("1")
    }

    /// Reporting period as `(start, end)` when both dates are known.
    #[must_use]
    pub const fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.period_start, self.period_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_type_from_codes() {
        assert_eq!(DocType::from_codes("010", "030000"), DocType::Annual);
        assert_eq!(DocType::from_codes("010", "043A01"), DocType::SemiannualAmended);
        assert_eq!(DocType::from_codes("030", "030000"), DocType::Unknown);
        assert!(DocType::AnnualAmended.is_amendment());
        assert!(!DocType::Annual.is_amendment());
        assert_eq!(DocType::QuarterlyAmended.to_string(), "quarterly_amended");
    }

    #[test]
    fn test_deserialize_api_result() {
        let json = r#"{
            "seqNumber": 1,
            "docID": "S100UKYJ",
            "edinetCode": "E01428",
            "secCode": "79390",
            "JCN": "9240001003119",
            "filerName": "株式会社研創",
            "fundCode": null,
            "ordinanceCode": "010",
            "formCode": "043A00",
            "docTypeCode": "160",
            "periodStart": "2024-04-01",
            "periodEnd": "2025-03-31",
            "submitDateTime": "2024-11-01 09:00",
            "docDescription": "半期報告書－第54期(2024/04/01－2025/03/31)",
            "parentDocID": null,
            "withdrawalStatus": "0",
            "xbrlFlag": "1",
            "pdfFlag": "1",
            "csvFlag": "1",
            "legalStatus": 1
        }"#;
        let meta: FilingMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.doc_id, "S100UKYJ");
        assert_eq!(meta.jcn.as_deref(), Some("9240001003119"));
        assert_eq!(meta.doc_type(), DocType::Semiannual);
        assert!(!meta.is_withdrawn());
        let (start, end) = meta.period().unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
    }

    #[test]
    fn test_missing_codes_are_unknown() {
        let start = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let meta = FilingMetadata::new("S100AAAA", "E00001", start, end);
        assert_eq!(meta.doc_type(), DocType::Unknown);
        assert_eq!(meta.with_codes("010", "030000").doc_type(), DocType::Annual);
    }
}
