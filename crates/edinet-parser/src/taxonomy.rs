//! Element-identifier taxonomy.
//!
//! The taxonomy is a flat list of `(section, element_id, field)` leaves. An
//! element id names the local part of an EDINET element; the IFRS-suffixed
//! variant of the same element maps to the same field (see
//! [`filter_by_element_id`](crate::filter::filter_by_element_id)).
//!
//! Field names are the Japanese labels downstream datasets are keyed by, so
//! renaming one is a breaking change for every consumer.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use edinet_core::document::fields;

/// Canonical document section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementSection {
    /// Filing-wide metadata (DEI and cover page).
    Meta,
    /// Summary of business results.
    Summary,
    /// Narrative text blocks.
    Text,
    /// Balance sheet.
    Bs,
    /// Income statement.
    Pl,
    /// Cash-flow statement.
    Cf,
}

impl StatementSection {
    /// Sections in assembly order.
    pub const ALL: [Self; 6] = [
        Self::Meta,
        Self::Summary,
        Self::Text,
        Self::Bs,
        Self::Pl,
        Self::Cf,
    ];

    /// Upper-case section name used in the output artifact.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Meta => "META",
            Self::Summary => "SUMMARY",
            Self::Text => "TEXT",
            Self::Bs => "BS",
            Self::Pl => "PL",
            Self::Cf => "CF",
        }
    }

    /// Returns true if fields of this section are keyed by fiscal year.
    #[must_use]
    pub const fn has_year_axis(&self) -> bool {
        !matches!(self, Self::Meta)
    }
}

impl fmt::Display for StatementSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One taxonomy leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaxonomyEntry {
    /// Section the field belongs to.
    pub section: StatementSection,
    /// Local element name, without namespace prefix or IFRS suffix.
    pub element_id: &'static str,
    /// Canonical field name.
    pub field: &'static str,
}

impl TaxonomyEntry {
    /// Creates a taxonomy leaf.
    #[must_use]
    pub const fn new(section: StatementSection, element_id: &'static str, field: &'static str) -> Self {
        Self {
            section,
            element_id,
            field,
        }
    }
}

/// A set of taxonomy leaves, read-only once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Taxonomy {
    entries: Cow<'static, [TaxonomyEntry]>,
}

impl Taxonomy {
    /// The built-in taxonomy covering the EDINET annual report elements.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            entries: Cow::Borrowed(STANDARD_ENTRIES),
        }
    }

    /// Creates a taxonomy from custom leaves.
    #[must_use]
    pub fn from_entries(entries: Vec<TaxonomyEntry>) -> Self {
        Self {
            entries: Cow::Owned(entries),
        }
    }

    /// All leaves, in table order.
    #[must_use]
    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    /// Leaves of one section, in table order.
    pub fn section(&self, section: StatementSection) -> impl Iterator<Item = &TaxonomyEntry> {
        self.entries.iter().filter(move |e| e.section == section)
    }

    /// Number of leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the taxonomy has no leaves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Standard taxonomy
// =============================================================================

use StatementSection::{Bs, Cf, Meta, Pl, Summary, Text};

const fn leaf(section: StatementSection, element_id: &'static str, field: &'static str) -> TaxonomyEntry {
    TaxonomyEntry::new(section, element_id, field)
}

/// Leaves of the built-in taxonomy.
pub const STANDARD_ENTRIES: &[TaxonomyEntry] = &[
    // META - document and entity information
    leaf(Meta, "EDINETCodeDEI", fields::EDINET_CODE),
    leaf(Meta, "SecurityCodeDEI", fields::SECURITY_CODE),
    leaf(Meta, "FilerNameInJapaneseDEI", fields::COMPANY_NAME),
    leaf(Meta, "FilerNameInEnglishDEI", "会社名（英語）"),
    leaf(Meta, "DocumentTypeDEI", "様式"),
    leaf(Meta, "AccountingStandardsDEI", fields::ACCOUNTING_STANDARD),
    leaf(Meta, "WhetherConsolidatedFinancialStatementsArePreparedDEI", fields::CONSOLIDATED),
    leaf(Meta, "CurrentFiscalYearStartDateDEI", fields::FISCAL_YEAR_START),
    leaf(Meta, "CurrentPeriodEndDateDEI", "当会計期間終了日"),
    leaf(Meta, "TypeOfCurrentPeriodDEI", "当会計期間の種類"),
    leaf(Meta, "CurrentFiscalYearEndDateDEI", fields::FISCAL_YEAR_END),
    leaf(Meta, "PreviousFiscalYearStartDateDEI", "前事業年度開始日"),
    leaf(Meta, "PreviousFiscalYearEndDateDEI", "前事業年度終了日"),
    leaf(Meta, "NumberOfSubmissionDEI", "提出回数"),
    leaf(Meta, "AmendmentFlagDEI", "訂正の有無"),
    // META - cover page
    leaf(Meta, "FilingDateCoverPage", "提出日"),
    leaf(Meta, "FiscalYearCoverPage", "事業年度"),
    leaf(Meta, "TitleAndNameOfRepresentativeCoverPage", "代表者の役職氏名"),
    leaf(Meta, "AddressOfRegisteredHeadquarterCoverPage", "本店の所在の場所"),
    // SUMMARY - summary of business results
    leaf(Summary, "NetSalesSummaryOfBusinessResults", "売上高"),
    leaf(Summary, "RevenueIFRSSummaryOfBusinessResults", "売上収益"),
    leaf(Summary, "OrdinaryIncomeLossSummaryOfBusinessResults", "経常利益"),
    leaf(Summary, "ProfitLossAttributableToOwnersOfParentSummaryOfBusinessResults", "親会社株主に帰属する当期純利益"),
    leaf(Summary, "ComprehensiveIncomeSummaryOfBusinessResults", "包括利益"),
    leaf(Summary, "NetAssetsSummaryOfBusinessResults", "純資産額"),
    leaf(Summary, "TotalAssetsSummaryOfBusinessResults", "総資産額"),
    leaf(Summary, "NetAssetsPerShareSummaryOfBusinessResults", "１株当たり純資産額"),
    leaf(Summary, "BasicEarningsLossPerShareSummaryOfBusinessResults", "１株当たり当期純利益"),
    leaf(Summary, "DilutedEarningsPerShareSummaryOfBusinessResults", "潜在株式調整後１株当たり当期純利益"),
    leaf(Summary, "EquityToAssetRatioSummaryOfBusinessResults", "自己資本比率"),
    leaf(Summary, "RateOfReturnOnEquitySummaryOfBusinessResults", "自己資本利益率"),
    leaf(Summary, "PriceEarningsRatioSummaryOfBusinessResults", "株価収益率"),
    leaf(Summary, "NetCashProvidedByUsedInOperatingActivitiesSummaryOfBusinessResults", "営業活動によるキャッシュ・フロー"),
    leaf(Summary, "NetCashProvidedByUsedInInvestingActivitiesSummaryOfBusinessResults", "投資活動によるキャッシュ・フロー"),
    leaf(Summary, "NetCashProvidedByUsedInFinancingActivitiesSummaryOfBusinessResults", "財務活動によるキャッシュ・フロー"),
    leaf(Summary, "CashAndCashEquivalentsSummaryOfBusinessResults", "現金及び現金同等物の期末残高"),
    leaf(Summary, "DividendPaidPerShareSummaryOfBusinessResults", "１株当たり配当額"),
    leaf(Summary, "PayoutRatioSummaryOfBusinessResults", "配当性向"),
    leaf(Summary, "NumberOfEmployees", "従業員数"),
    // TEXT - narrative text blocks
    leaf(Text, "CompanyHistoryTextBlock", "沿革"),
    leaf(Text, "DescriptionOfBusinessTextBlock", "事業の内容"),
    leaf(Text, "OverviewOfAffiliatedEntitiesTextBlock", "関係会社の状況"),
    leaf(Text, "InformationAboutEmployeesTextBlock", "従業員の状況"),
    leaf(Text, "BusinessPolicyBusinessEnvironmentIssuesToAddressEtcTextBlock", "経営方針、経営環境及び対処すべき課題等"),
    leaf(Text, "BusinessRisksTextBlock", "事業等のリスク"),
    leaf(
        Text,
        "ManagementAnalysisOfFinancialPositionOperatingResultsAndCashFlowsTextBlock",
        "経営者による財政状態、経営成績及びキャッシュ・フローの状況の分析",
    ),
    leaf(Text, "CriticalContractsForOperationTextBlock", "経営上の重要な契約等"),
    leaf(Text, "ResearchAndDevelopmentActivitiesTextBlock", "研究開発活動"),
    leaf(Text, "OverviewOfCapitalExpendituresEtcTextBlock", "設備投資等の概要"),
    leaf(Text, "DividendPolicyTextBlock", "配当政策"),
    leaf(Text, "OverviewOfCorporateGovernanceTextBlock", "コーポレート・ガバナンスの概要"),
    leaf(Text, "NotesRegardingGoingConcernAssumptionTextBlock", "継続企業の前提に関する事項"),
    // BS - assets
    leaf(Bs, "CashAndDeposits", "現金及び預金"),
    leaf(Bs, "NotesAndAccountsReceivableTrade", "受取手形及び売掛金"),
    leaf(Bs, "MerchandiseAndFinishedGoods", "商品及び製品"),
    leaf(Bs, "CurrentAssets", "流動資産合計"),
    leaf(Bs, "PropertyPlantAndEquipment", "有形固定資産合計"),
    leaf(Bs, "IntangibleAssets", "無形固定資産合計"),
    leaf(Bs, "InvestmentsAndOtherAssets", "投資その他の資産合計"),
    leaf(Bs, "NoncurrentAssets", "固定資産合計"),
    leaf(Bs, "Assets", "資産合計"),
    // BS - liabilities
    leaf(Bs, "NotesAndAccountsPayableTrade", "支払手形及び買掛金"),
    leaf(Bs, "ShortTermLoansPayable", "短期借入金"),
    leaf(Bs, "CurrentLiabilities", "流動負債合計"),
    leaf(Bs, "BondsPayable", "社債"),
    leaf(Bs, "LongTermLoansPayable", "長期借入金"),
    leaf(Bs, "NoncurrentLiabilities", "固定負債合計"),
    leaf(Bs, "Liabilities", "負債合計"),
    // BS - net assets
    leaf(Bs, "CapitalStock", "資本金"),
    leaf(Bs, "CapitalSurplus", "資本剰余金"),
    leaf(Bs, "RetainedEarnings", "利益剰余金"),
    leaf(Bs, "TreasuryStock", "自己株式"),
    leaf(Bs, "ShareholdersEquity", "株主資本合計"),
    leaf(Bs, "ValuationAndTranslationAdjustments", "その他の包括利益累計額合計"),
    leaf(Bs, "NonControllingInterests", "非支配株主持分"),
    leaf(Bs, "NetAssets", "純資産合計"),
    leaf(Bs, "LiabilitiesAndNetAssets", "負債純資産合計"),
    // PL
    leaf(Pl, "NetSales", "売上高"),
    leaf(Pl, "Revenue", "売上収益"),
    leaf(Pl, "CostOfSales", "売上原価"),
    leaf(Pl, "GrossProfit", "売上総利益"),
    leaf(Pl, "SellingGeneralAndAdministrativeExpenses", "販売費及び一般管理費"),
    leaf(Pl, "OperatingIncome", "営業利益"),
    leaf(Pl, "NonOperatingIncome", "営業外収益"),
    leaf(Pl, "NonOperatingExpenses", "営業外費用"),
    leaf(Pl, "OrdinaryIncome", "経常利益"),
    leaf(Pl, "ExtraordinaryIncome", "特別利益"),
    leaf(Pl, "ExtraordinaryLoss", "特別損失"),
    leaf(Pl, "IncomeBeforeIncomeTaxes", "税金等調整前当期純利益"),
    leaf(Pl, "IncomeTaxes", "法人税等合計"),
    leaf(Pl, "ProfitLoss", "当期純利益"),
    leaf(Pl, "ProfitLossAttributableToNonControllingInterests", "非支配株主に帰属する当期純利益"),
    leaf(Pl, "ProfitLossAttributableToOwnersOfParent", "親会社株主に帰属する当期純利益"),
    // CF
    leaf(Cf, "DepreciationAndAmortizationOpeCF", "減価償却費"),
    leaf(Cf, "NetCashProvidedByUsedInOperatingActivities", "営業活動によるキャッシュ・フロー"),
    leaf(Cf, "PurchaseOfPropertyPlantAndEquipmentInvCF", "有形固定資産の取得による支出"),
    leaf(Cf, "NetCashProvidedByUsedInInvestingActivities", "投資活動によるキャッシュ・フロー"),
    leaf(Cf, "CashDividendsPaidFinCF", "配当金の支払額"),
    leaf(Cf, "NetCashProvidedByUsedInFinancingActivities", "財務活動によるキャッシュ・フロー"),
    leaf(Cf, "NetIncreaseDecreaseInCashAndCashEquivalents", "現金及び現金同等物の増減額"),
    leaf(Cf, "CashAndCashEquivalents", "現金及び現金同等物の期末残高"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_section_has_leaves() {
        let taxonomy = Taxonomy::standard();
        for section in StatementSection::ALL {
            assert!(
                taxonomy.section(section).next().is_some(),
                "section {section} is empty"
            );
        }
    }

    #[test]
    fn test_element_ids_unique_per_section() {
        let mut seen = HashSet::new();
        for entry in Taxonomy::standard().entries() {
            assert!(
                seen.insert((entry.section, entry.element_id)),
                "duplicate leaf {} in {}",
                entry.element_id,
                entry.section
            );
        }
    }

    #[test]
    fn test_fields_injective_per_section() {
        let mut seen = HashSet::new();
        for entry in Taxonomy::standard().entries() {
            assert!(
                seen.insert((entry.section, entry.field)),
                "field {} mapped twice in {}",
                entry.field,
                entry.section
            );
        }
    }

    #[test]
    fn test_element_ids_are_local_names() {
        for entry in Taxonomy::standard().entries() {
            assert!(!entry.element_id.contains(':'));
            assert!(!entry.element_id.ends_with("IFRS"));
        }
    }

    #[test]
    fn test_meta_carries_consolidation_indicator() {
        let taxonomy = Taxonomy::standard();
        assert!(
            taxonomy
                .section(StatementSection::Meta)
                .any(|e| e.field == fields::CONSOLIDATED)
        );
        assert!(!StatementSection::Meta.has_year_axis());
        assert!(StatementSection::Text.has_year_axis());
    }

    #[test]
    fn test_custom_taxonomy() {
        let taxonomy = Taxonomy::from_entries(vec![TaxonomyEntry::new(
            StatementSection::Pl,
            "NetSales",
            "売上高",
        )]);
        assert_eq!(taxonomy.len(), 1);
        assert_eq!(taxonomy.section(StatementSection::Bs).count(), 0);
        assert!(!taxonomy.is_empty());
    }
}
