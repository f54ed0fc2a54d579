//! Raw fact rows from the EDINET tabular export.
//!
//! Every row of the export discloses one fact. Values stay untyped strings at
//! this layer: the export mixes monetary amounts, ratios, dates and HTML text
//! blocks in one column, so typed parsing belongs to whoever consumes a field.

use serde::{Deserialize, Serialize};

/// Context suffix marking a standalone (parent-only) fact.
const NON_CONSOLIDATED_CONTEXT_SUFFIX: &str = "NonConsolidatedMember";

/// Markers the consolidation column uses for standalone facts.
const NON_CONSOLIDATED_FLAGS: [&str; 2] = ["個別", "NonConsolidated"];

/// Whether a fact is a point-in-time or a period value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKind {
    /// Balance at a point in time (balance sheet, cover page).
    Instant,
    /// Flow over a period (income and cash-flow statements).
    Duration,
}

/// One disclosed accounting fact.
///
/// Field names are deserialized from the Japanese column headers of the
/// EDINET CSV export.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactRow {
    /// Namespaced element identifier, e.g. `jppfs_cor:NetSales`.
    #[serde(rename = "要素ID")]
    pub element_id: String,
    /// Human-readable item name as printed in the filing.
    #[serde(rename = "項目名", default)]
    pub item_name: Option<String>,
    /// Context identifier, e.g. `CurrentYearInstant_NonConsolidatedMember`.
    #[serde(rename = "コンテキストID")]
    pub context_id: String,
    /// Relative fiscal year as written by the filer (`当期`, `前期`, ...).
    #[serde(rename = "相対年度")]
    pub relative_fiscal_year: String,
    /// Consolidation column (`連結`, `個別`, `その他`).
    #[serde(rename = "連結・個別")]
    pub consolidation_flag: String,
    /// Period column (`時点` or `期間`).
    #[serde(rename = "期間・時点")]
    pub period_type: String,
    /// Unit identifier, e.g. `JPY`.
    #[serde(rename = "ユニットID", default)]
    pub unit_id: Option<String>,
    /// Display unit, e.g. `円`.
    #[serde(rename = "単位", default)]
    pub unit: Option<String>,
    /// Raw value.
    #[serde(rename = "値")]
    pub value: String,
}

impl FactRow {
    /// Creates a fact row from its identity columns and value.
    #[must_use]
    pub fn new(
        element_id: impl Into<String>,
        context_id: impl Into<String>,
        relative_fiscal_year: impl Into<String>,
        consolidation_flag: impl Into<String>,
        period_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            element_id: element_id.into(),
            context_id: context_id.into(),
            relative_fiscal_year: relative_fiscal_year.into(),
            consolidation_flag: consolidation_flag.into(),
            period_type: period_type.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Sets the item name.
    #[must_use]
    pub fn with_item_name(mut self, item_name: impl Into<String>) -> Self {
        self.item_name = Some(item_name.into());
        self
    }

    /// Sets the unit identifier and display unit.
    #[must_use]
    pub fn with_unit(mut self, unit_id: impl Into<String>, unit: impl Into<String>) -> Self {
        self.unit_id = Some(unit_id.into());
        self.unit = Some(unit.into());
        self
    }

    /// The columns that identify a fact. Two rows with equal keys are duplicates.
    #[must_use]
    pub fn identity_key(&self) -> (&str, &str, &str, &str, &str) {
        (
            &self.element_id,
            &self.context_id,
            &self.relative_fiscal_year,
            &self.consolidation_flag,
            &self.period_type,
        )
    }

    /// Local part of the element identifier, after the namespace prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.element_id
            .rsplit_once(':')
            .map_or(self.element_id.as_str(), |(_, name)| name)
    }

    /// Returns true if this fact is reported as consolidated.
    ///
    /// Both the consolidation column and the context suffix must agree; a row
    /// marked standalone by either is not consolidated.
    #[must_use]
    pub fn is_consolidated(&self) -> bool {
        let flagged = NON_CONSOLIDATED_FLAGS
            .iter()
            .any(|marker| self.consolidation_flag.contains(marker));
        !flagged && !self.context_id.ends_with(NON_CONSOLIDATED_CONTEXT_SUFFIX)
    }

    /// Period kind implied by the context identifier.
    #[must_use]
    pub fn period_kind(&self) -> Option<PeriodKind> {
        let context = self
            .context_id
            .strip_suffix("_NonConsolidatedMember")
            .unwrap_or(&self.context_id);
        if context.ends_with("Instant") {
            Some(PeriodKind::Instant)
        } else if context.ends_with("Duration") {
            Some(PeriodKind::Duration)
        } else {
            None
        }
    }
}
