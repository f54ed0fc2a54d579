//! Statement assembler.
//!
//! Turns the raw fact table of one filing into a
//! [`FinancialStatementDocument`], or into [`ParseOutcome::NotApplicable`]
//! when the filer does not report consolidated statements.

use serde::Serialize;
use tracing::{debug, warn};

use edinet_core::document::consolidated_indicator;
use edinet_core::{FactRow, FinancialStatementDocument, FiscalYear, MetaSection, Section};

use crate::{
    filter::{deduplicate, filter_by_consolidation, filter_by_element_id},
    reduce::{FieldValue, Reduced, YearAxis, reduce_by_year},
    taxonomy::{StatementSection, Taxonomy},
};

/// What to do when META carries no consolidated-reporting indicator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum MissingConsolidationPolicy {
    /// Treat the filing as not applicable.
    #[default]
    Suppress,
    /// Assume consolidated reporting and produce the document.
    Assume,
}

/// Parser configuration.
#[derive(Clone, Debug, Default)]
pub struct ParserConfig {
    missing_consolidation: MissingConsolidationPolicy,
    taxonomy: Taxonomy,
}

impl ParserConfig {
    /// Creates the default configuration: standard taxonomy, suppress filings
    /// with an unknown consolidation basis.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policy for filings without a consolidation indicator.
    #[must_use]
    pub fn with_missing_consolidation(mut self, policy: MissingConsolidationPolicy) -> Self {
        self.missing_consolidation = policy;
        self
    }

    /// Replaces the taxonomy.
    #[must_use]
    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    /// Policy for filings without a consolidation indicator.
    #[must_use]
    pub const fn missing_consolidation(&self) -> MissingConsolidationPolicy {
        self.missing_consolidation
    }

    /// Taxonomy used for assembly.
    #[must_use]
    pub const fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }
}

/// Why no document was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum NotApplicableReason {
    /// The filer reports standalone statements only.
    NonConsolidatedOnly,
    /// The consolidation indicator is absent or unreadable.
    ConsolidationUnknown,
}

/// Outcome of assembling one filing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A consolidated document.
    Document(FinancialStatementDocument),
    /// The filing is outside the corpus.
    NotApplicable(NotApplicableReason),
}

impl ParseOutcome {
    /// Borrows the document, if one was produced.
    #[must_use]
    pub const fn document(&self) -> Option<&FinancialStatementDocument> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::NotApplicable(_) => None,
        }
    }

    /// Consumes the outcome, returning the document if one was produced.
    #[must_use]
    pub fn into_document(self) -> Option<FinancialStatementDocument> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::NotApplicable(_) => None,
        }
    }

    /// Returns true if no document was produced.
    #[must_use]
    pub const fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable(_))
    }
}

/// A field/year left out because several facts matched it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Ambiguity {
    /// Section of the field.
    pub section: StatementSection,
    /// Canonical field name.
    pub field: String,
    /// The ambiguous year.
    pub year: FiscalYear,
    /// How many facts matched.
    pub matches: usize,
}

/// Data-quality counters for one parse.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostics {
    /// Rows in the raw table.
    pub total_facts: usize,
    /// Rows left after deduplication.
    pub unique_facts: usize,
    /// Every omitted field/year.
    pub ambiguities: Vec<Ambiguity>,
}

impl ParseDiagnostics {
    /// Rows removed as duplicates.
    #[must_use]
    pub const fn duplicate_facts(&self) -> usize {
        self.total_facts - self.unique_facts
    }
}

/// Outcome plus diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assembled {
    /// The document or the reason there is none.
    pub outcome: ParseOutcome,
    /// Counters gathered while assembling.
    pub diagnostics: ParseDiagnostics,
}

/// Assembles documents according to a [`ParserConfig`].
///
/// Holds no mutable state; one assembler can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct StatementAssembler {
    config: ParserConfig,
}

impl StatementAssembler {
    /// Creates an assembler.
    #[must_use]
    pub const fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Assembles one filing from its raw fact rows.
    pub fn assemble(&self, facts: &[FactRow]) -> Assembled {
        let unique = deduplicate(facts);
        let mut diagnostics = ParseDiagnostics {
            total_facts: facts.len(),
            unique_facts: unique.len(),
            ambiguities: Vec::new(),
        };
        debug!(
            total = diagnostics.total_facts,
            unique = diagnostics.unique_facts,
            "Deduplicated fact table"
        );

        let meta = self.build_meta(&unique, &mut diagnostics);
        if let Some(reason) = self.check_consolidation(&meta) {
            debug!(?reason, "Filing not applicable");
            return Assembled {
                outcome: ParseOutcome::NotApplicable(reason),
                diagnostics,
            };
        }

        let summary = self.build_section(StatementSection::Summary, &unique, &mut diagnostics);
        let text = self.build_section(StatementSection::Text, &unique, &mut diagnostics);
        let bs = self.build_section(StatementSection::Bs, &unique, &mut diagnostics);
        let pl = self.build_section(StatementSection::Pl, &unique, &mut diagnostics);
        let cf = self.build_section(StatementSection::Cf, &unique, &mut diagnostics);

        if !diagnostics.ambiguities.is_empty() {
            warn!(
                ambiguities = diagnostics.ambiguities.len(),
                "Omitted ambiguous field/year entries"
            );
        }

        let document = FinancialStatementDocument::new(meta, summary, bs, pl, cf, text);
        Assembled {
            outcome: ParseOutcome::Document(document),
            diagnostics,
        }
    }

    fn build_meta(&self, facts: &[&FactRow], diagnostics: &mut ParseDiagnostics) -> MetaSection {
        let mut meta = MetaSection::new();
        for entry in self.config.taxonomy.section(StatementSection::Meta) {
            let reduced = reduce_leaf(facts, entry.element_id, entry.field, YearAxis::Without);
            record_ambiguities(diagnostics, StatementSection::Meta, entry.field, &reduced.ambiguous);
            if let Some(FieldValue::Scalar(value)) = reduced.value {
                meta.insert(entry.field.to_string(), value);
            }
        }
        meta
    }

    fn build_section(
        &self,
        section: StatementSection,
        facts: &[&FactRow],
        diagnostics: &mut ParseDiagnostics,
    ) -> Section {
        let mut out = Section::new();
        for entry in self.config.taxonomy.section(section) {
            let reduced = reduce_leaf(facts, entry.element_id, entry.field, YearAxis::With);
            record_ambiguities(diagnostics, section, entry.field, &reduced.ambiguous);
            if let Some(FieldValue::Series(series)) = reduced.value {
                out.insert(entry.field.to_string(), series);
            }
        }
        out
    }

    fn check_consolidation(&self, meta: &MetaSection) -> Option<NotApplicableReason> {
        match (consolidated_indicator(meta), self.config.missing_consolidation) {
            (Some(true), _) => None,
            (Some(false), _) => Some(NotApplicableReason::NonConsolidatedOnly),
            (_, MissingConsolidationPolicy::Assume) => None,
            (_, MissingConsolidationPolicy::Suppress) => Some(NotApplicableReason::ConsolidationUnknown),
        }
    }
}

fn reduce_leaf(facts: &[&FactRow], element_id: &str, field: &str, axis: YearAxis) -> Reduced {
    let by_element = filter_by_element_id(facts.iter().copied(), element_id);
    let consolidated = filter_by_consolidation(by_element);
    reduce_by_year(&consolidated, field, axis)
}

fn record_ambiguities(
    diagnostics: &mut ParseDiagnostics,
    section: StatementSection,
    field: &str,
    ambiguous: &[(FiscalYear, usize)],
) {
    diagnostics
        .ambiguities
        .extend(ambiguous.iter().map(|&(year, matches)| Ambiguity {
            section,
            field: field.to_string(),
            year,
            matches,
        }));
}

/// Assembles one filing with the default configuration.
pub fn assemble(facts: &[FactRow]) -> Assembled {
    StatementAssembler::default().assemble(facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::TaxonomyEntry;

    fn dei(element: &str, value: &str) -> FactRow {
        FactRow::new(
            format!("jpdei_cor:{element}"),
            "FilingDateInstant",
            "提出日時点",
            "その他",
            "時点",
            value,
        )
    }

    fn consolidated(element: &str, context: &str, value: &str) -> FactRow {
        FactRow::new(format!("jppfs_cor:{element}"), context, "当期", "連結", "期間", value)
    }

    fn standalone(element: &str, context: &str, value: &str) -> FactRow {
        FactRow::new(
            format!("jppfs_cor:{element}"),
            format!("{context}_NonConsolidatedMember"),
            "当期",
            "個別",
            "期間",
            value,
        )
    }

    fn base_meta(consolidated_flag: &str) -> Vec<FactRow> {
        vec![
            dei("EDINETCodeDEI", "E02144"),
            dei("FilerNameInJapaneseDEI", "トヨタ自動車株式会社"),
            dei("WhetherConsolidatedFinancialStatementsArePreparedDEI", consolidated_flag),
            dei("CurrentFiscalYearStartDateDEI", "2023-04-01"),
        ]
    }

    #[test]
    fn test_assembles_consolidated_filing() {
        let mut facts = base_meta("true");
        facts.push(consolidated("NetSales", "CurrentYearDuration", "45095325000000"));
        facts.push(consolidated("NetSales", "Prior1YearDuration", "37154298000000"));
        facts.push(standalone("NetSales", "CurrentYearDuration", "12000000000000"));
        facts.push(consolidated("Assets", "CurrentYearInstant", "90114296000000"));
        facts.push(consolidated("NetCashProvidedByUsedInOperatingActivities", "CurrentYearDuration", "4206373000000"));

        let assembled = assemble(&facts);
        let doc = assembled.outcome.document().unwrap();
        assert_eq!(doc.edinet_code(), Some("E02144"));
        assert_eq!(doc.meta_value("当事業年度開始日"), Some("2023-04-01"));
        assert_eq!(doc.pl()["売上高"][&FiscalYear::CurrentYear], "45095325000000");
        assert_eq!(doc.pl()["売上高"][&FiscalYear::Prior1Year], "37154298000000");
        assert_eq!(doc.bs()["資産合計"][&FiscalYear::CurrentYear], "90114296000000");
        assert!(doc.cf().contains_key("営業活動によるキャッシュ・フロー"));
        assert!(doc.summary().is_empty());
        assert!(assembled.diagnostics.ambiguities.is_empty());
    }

    #[test]
    fn test_non_consolidated_filing_not_applicable() {
        let mut facts = base_meta("false");
        facts.push(consolidated("NetSales", "CurrentYearDuration", "1000"));
        facts.push(consolidated("Assets", "CurrentYearInstant", "2000"));

        let assembled = assemble(&facts);
        assert_eq!(
            assembled.outcome,
            ParseOutcome::NotApplicable(NotApplicableReason::NonConsolidatedOnly)
        );
    }

    #[test]
    fn test_missing_indicator_policy() {
        let facts = vec![
            dei("EDINETCodeDEI", "E00001"),
            consolidated("NetSales", "CurrentYearDuration", "1000"),
        ];

        let suppressed = assemble(&facts);
        assert_eq!(
            suppressed.outcome,
            ParseOutcome::NotApplicable(NotApplicableReason::ConsolidationUnknown)
        );

        let assembler = StatementAssembler::new(
            ParserConfig::new().with_missing_consolidation(MissingConsolidationPolicy::Assume),
        );
        let assumed = assembler.assemble(&facts);
        let doc = assumed.outcome.into_document().unwrap();
        assert_eq!(doc.pl()["売上高"][&FiscalYear::CurrentYear], "1000");
    }

    #[test]
    fn test_non_literal_indicator_follows_policy() {
        let facts = base_meta("TRUE");
        assert_eq!(
            assemble(&facts).outcome,
            ParseOutcome::NotApplicable(NotApplicableReason::ConsolidationUnknown)
        );

        let assembler = StatementAssembler::new(
            ParserConfig::new().with_missing_consolidation(MissingConsolidationPolicy::Assume),
        );
        assert!(!assembler.assemble(&facts).outcome.is_not_applicable());
    }

    #[test]
    fn test_duplicates_and_diagnostics() {
        let mut facts = base_meta("true");
        facts.push(consolidated("NetSales", "CurrentYearDuration", "1000"));
        facts.push(consolidated("NetSales", "CurrentYearDuration", "1000"));
        // Same year, different period suffix: a genuine ambiguity.
        facts.push(FactRow::new(
            "jppfs_cor:OperatingIncome",
            "CurrentYearDuration",
            "当期",
            "連結",
            "期間",
            "10",
        ));
        facts.push(FactRow::new(
            "jppfs_cor:OperatingIncome",
            "CurrentYearInstant",
            "当期",
            "連結",
            "時点",
            "11",
        ));

        let assembled = assemble(&facts);
        assert_eq!(assembled.diagnostics.duplicate_facts(), 1);
        let doc = assembled.outcome.document().unwrap();
        assert_eq!(doc.pl()["売上高"].len(), 1);
        assert!(!doc.pl().contains_key("営業利益"));
        assert_eq!(
            assembled.diagnostics.ambiguities,
            vec![Ambiguity {
                section: StatementSection::Pl,
                field: "営業利益".to_string(),
                year: FiscalYear::CurrentYear,
                matches: 2,
            }]
        );
    }

    #[test]
    fn test_standalone_only_field_is_absent() {
        let mut facts = base_meta("true");
        facts.push(standalone("NetSales", "CurrentYearDuration", "500"));
        let assembled = assemble(&facts);
        let doc = assembled.outcome.document().unwrap();
        assert!(!doc.pl().contains_key("売上高"));
    }

    #[test]
    fn test_ifrs_variant_maps_to_same_field() {
        let mut facts = base_meta("true");
        facts.push(FactRow::new(
            "jpigp_cor:CashAndCashEquivalentsIFRS",
            "CurrentYearInstant",
            "当期末",
            "連結",
            "時点",
            "7000",
        ));
        let assembled = assemble(&facts);
        let doc = assembled.outcome.document().unwrap();
        assert_eq!(
            doc.cf()["現金及び現金同等物の期末残高"][&FiscalYear::CurrentYear],
            "7000"
        );
    }

    #[test]
    fn test_later_leaf_replaces_same_field() {
        let taxonomy = Taxonomy::from_entries(vec![
            TaxonomyEntry::new(StatementSection::Meta, "WhetherConsolidatedFinancialStatementsArePreparedDEI", "連結決算の有無"),
            TaxonomyEntry::new(StatementSection::Pl, "NetSales", "売上"),
            TaxonomyEntry::new(StatementSection::Pl, "Revenue", "売上"),
        ]);
        let assembler = StatementAssembler::new(ParserConfig::new().with_taxonomy(taxonomy));

        let mut facts = base_meta("true");
        facts.push(consolidated("NetSales", "CurrentYearDuration", "gaap"));
        let only_first = assembler.assemble(&facts);
        assert_eq!(only_first.outcome.document().unwrap().pl()["売上"][&FiscalYear::CurrentYear], "gaap");

        facts.push(consolidated("Revenue", "CurrentYearDuration", "ifrs"));
        let both = assembler.assemble(&facts);
        assert_eq!(both.outcome.document().unwrap().pl()["売上"][&FiscalYear::CurrentYear], "ifrs");
    }

    #[test]
    fn test_ten_year_series() {
        let mut facts = base_meta("true");
        for (i, year) in FiscalYear::ALL.iter().enumerate() {
            facts.push(consolidated("NetSales", &format!("{year}Duration"), &(1000 + i).to_string()));
        }
        let assembled = assemble(&facts);
        let doc = assembled.outcome.document().unwrap();
        assert_eq!(doc.pl()["売上高"].len(), 10);
    }

    #[test]
    fn test_text_blocks_keep_year_axis() {
        let mut facts = base_meta("true");
        facts.push(FactRow::new(
            "jpcrp_cor:BusinessRisksTextBlock",
            "FilingDateInstant",
            "提出日時点",
            "その他",
            "時点",
            "<p>為替変動リスク</p>",
        ));
        let assembled = assemble(&facts);
        let doc = assembled.outcome.document().unwrap();
        assert_eq!(doc.text()["事業等のリスク"][&FiscalYear::FilingDate], "<p>為替変動リスク</p>");
    }
}
