//! Financial statement document types.
//!
//! A [`FinancialStatementDocument`] is the only artifact the parser hands to
//! the rest of the system. META holds filing-wide scalars; every other
//! section maps a field name to a sparse series over [`FiscalYear`] labels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{error::Result, fiscal_year::FiscalYear};

/// Sparse mapping from fiscal-year label to raw value.
pub type YearSeries = BTreeMap<FiscalYear, String>;

/// A multi-year section: field name to year series.
pub type Section = BTreeMap<String, YearSeries>;

/// The META section: field name to a single scalar.
pub type MetaSection = BTreeMap<String, String>;

/// Field names of META entries other crates rely on.
pub mod fields {
    /// EDINET code of the filer.
    pub const EDINET_CODE: &str = "EDINETコード";
    /// Securities code (five digits, including the check digit).
    pub const SECURITY_CODE: &str = "証券コード";
    /// Filer name in Japanese.
    pub const COMPANY_NAME: &str = "会社名";
    /// Whether consolidated financial statements are prepared (`true`/`false`).
    pub const CONSOLIDATED: &str = "連結決算の有無";
    /// Start date of the current fiscal year.
    pub const FISCAL_YEAR_START: &str = "当事業年度開始日";
    /// End date of the current fiscal year.
    pub const FISCAL_YEAR_END: &str = "当事業年度終了日";
    /// Accounting standard (`Japan GAAP`, `IFRS`, `US GAAP`).
    pub const ACCOUNTING_STANDARD: &str = "会計基準";
}

/// Reads the consolidated-reporting indicator from META: `Some(true)`,
/// `Some(false)`, or `None` when the field is absent or not a boolean literal.
#[must_use]
pub fn consolidated_indicator(meta: &MetaSection) -> Option<bool> {
    match meta.get(fields::CONSOLIDATED)?.as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Canonical financial statement document for one filing.
///
/// Constructed once by the statement assembler and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialStatementDocument {
    #[serde(rename = "META", default)]
    meta: MetaSection,
    #[serde(rename = "SUMMARY", default)]
    summary: Section,
    #[serde(rename = "BS", default)]
    bs: Section,
    #[serde(rename = "PL", default)]
    pl: Section,
    #[serde(rename = "CF", default)]
    cf: Section,
    #[serde(rename = "TEXT", default)]
    text: Section,
}

impl FinancialStatementDocument {
    /// Creates a document from its six sections.
    #[must_use]
    pub const fn new(
        meta: MetaSection,
        summary: Section,
        bs: Section,
        pl: Section,
        cf: Section,
        text: Section,
    ) -> Self {
        Self {
            meta,
            summary,
            bs,
            pl,
            cf,
            text,
        }
    }

    /// Filing-wide scalar fields.
    #[must_use]
    pub const fn meta(&self) -> &MetaSection {
        &self.meta
    }

    /// Summary of business results.
    #[must_use]
    pub const fn summary(&self) -> &Section {
        &self.summary
    }

    /// Balance sheet.
    #[must_use]
    pub const fn bs(&self) -> &Section {
        &self.bs
    }

    /// Income statement.
    #[must_use]
    pub const fn pl(&self) -> &Section {
        &self.pl
    }

    /// Cash-flow statement.
    #[must_use]
    pub const fn cf(&self) -> &Section {
        &self.cf
    }

    /// Narrative text blocks.
    #[must_use]
    pub const fn text(&self) -> &Section {
        &self.text
    }

    /// Looks up a META field.
    #[must_use]
    pub fn meta_value(&self, field: &str) -> Option<&str> {
        self.meta.get(field).map(String::as_str)
    }

    /// EDINET code of the filer, if reported.
    #[must_use]
    pub fn edinet_code(&self) -> Option<&str> {
        self.meta_value(fields::EDINET_CODE)
    }

    /// Filer name, if reported.
    #[must_use]
    pub fn company_name(&self) -> Option<&str> {
        self.meta_value(fields::COMPANY_NAME)
    }

    /// The consolidated-reporting indicator. See [`consolidated_indicator`].
    #[must_use]
    pub fn consolidated_indicator(&self) -> Option<bool> {
        consolidated_indicator(&self.meta)
    }

    /// Returns true if every section is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meta.is_empty()
            && self.summary.is_empty()
            && self.bs.is_empty()
            && self.pl.is_empty()
            && self.cf.is_empty()
            && self.text.is_empty()
    }

    /// Serializes the whole document as one JSON object keyed by section name.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a document previously produced by [`Self::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes each section independently as a JSON string.
    pub fn encode_sections(&self) -> Result<EncodedSections> {
        Ok(EncodedSections {
            meta: serde_json::to_string(&self.meta)?,
            summary: serde_json::to_string(&self.summary)?,
            bs: serde_json::to_string(&self.bs)?,
            pl: serde_json::to_string(&self.pl)?,
            cf: serde_json::to_string(&self.cf)?,
            text: serde_json::to_string(&self.text)?,
        })
    }
}

/// A document with every section independently JSON-encoded.
///
/// This is the shape dataset records carry: one string column per section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedSections {
    /// JSON-encoded META section.
    pub meta: String,
    /// JSON-encoded SUMMARY section.
    pub summary: String,
    /// JSON-encoded BS section.
    pub bs: String,
    /// JSON-encoded PL section.
    pub pl: String,
    /// JSON-encoded CF section.
    pub cf: String,
    /// JSON-encoded TEXT section.
    pub text: String,
}

impl EncodedSections {
    /// Decodes the sections back into a document.
    pub fn decode(&self) -> Result<FinancialStatementDocument> {
        Ok(FinancialStatementDocument {
            meta: serde_json::from_str(&self.meta)?,
            summary: serde_json::from_str(&self.summary)?,
            bs: serde_json::from_str(&self.bs)?,
            pl: serde_json::from_str(&self.pl)?,
            cf: serde_json::from_str(&self.cf)?,
            text: serde_json::from_str(&self.text)?,
        })
    }
}
