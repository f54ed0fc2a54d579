//! Company registry backed by the EDINET code list.
//!
//! The code list is a Shift_JIS CSV. Its first line is a title row (download
//! date and record count); the column header follows on the second line.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use encoding_rs::SHIFT_JIS;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use edinet_core::{EdinetError, Result};

use crate::industry::industry_group;

/// Industry of filers that are not listed issuers.
pub const NON_FILER_INDUSTRY: &str = "内国法人・組合（有価証券報告書等の提出義務者以外）";

/// One row of the EDINET code list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// EDINET code.
    #[serde(rename = "ＥＤＩＮＥＴコード")]
    pub edinet_code: String,
    /// Filer name.
    #[serde(rename = "提出者名", default)]
    pub filer_name: String,
    /// 33-industry classification.
    #[serde(rename = "提出者業種", default)]
    pub industry: String,
    /// Five-digit securities code including the check digit.
    #[serde(rename = "証券コード", default)]
    pub securities_code: Option<String>,
}

impl CompanyInfo {
    /// Securities code without its trailing check digit, if listed.
    #[must_use]
    pub fn ticker(&self) -> Option<&str> {
        let code = self.securities_code.as_deref()?.trim();
        let mut chars = code.char_indices();
        let (last, _) = chars.next_back()?;
        Some(&code[..last]).filter(|ticker| !ticker.is_empty())
    }
}

/// Lookup of code-list rows by EDINET code.
#[derive(Clone, Debug, Default)]
pub struct CompanyRegistry {
    companies: HashMap<String, CompanyInfo>,
}

impl CompanyRegistry {
    /// Builds a registry from rows. Later rows replace earlier ones with the
    /// same code.
    pub fn from_companies(companies: impl IntoIterator<Item = CompanyInfo>) -> Self {
        Self {
            companies: companies
                .into_iter()
                .map(|c| (c.edinet_code.clone(), c))
                .collect(),
        }
    }

    /// Parses a raw Shift_JIS code list.
    ///
    /// Undecodable bytes are replaced, as the published list occasionally
    /// carries characters outside Shift_JIS.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let (text, _, had_errors) = SHIFT_JIS.decode(bytes);
        if had_errors {
            warn!("Code list contains bytes outside Shift_JIS");
        }
        let body = text.split_once('\n').map_or("", |(_, rest)| rest);

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(body.as_bytes());
        let mut companies = Vec::new();
        for (index, row) in reader.deserialize::<CompanyInfo>().enumerate() {
            let company = row.map_err(|e| {
                EdinetError::MalformedInput(format!("code list row {}: {e}", index + 1))
            })?;
            companies.push(company);
        }
        Ok(Self::from_companies(companies))
    }

    /// Reads the code list from disk.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let registry = Self::from_csv_bytes(&bytes)?;
        debug!(companies = registry.len(), "Loaded EDINET code list");
        Ok(registry)
    }

    /// Looks up a company.
    #[must_use]
    pub fn get(&self, edinet_code: &str) -> Option<&CompanyInfo> {
        self.companies.get(edinet_code)
    }

    /// Number of companies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.companies.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

/// Whether a company can be labelled with an industry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Eligibility {
    /// Eligible, with its 16-group label.
    Eligible(&'static str),
    /// Not in the code list.
    Unknown,
    /// Not a listed issuer.
    NonFiler,
    /// No securities code.
    Unlisted,
    /// Ticker is on the exclusion list.
    Excluded(String),
}

/// Decides industry labels for companies.
#[derive(Clone, Debug, Default)]
pub struct IndustryClassifier {
    registry: CompanyRegistry,
    excluded_tickers: HashSet<String>,
}

impl IndustryClassifier {
    /// Creates a classifier over a registry.
    #[must_use]
    pub fn new(registry: CompanyRegistry) -> Self {
        Self {
            registry,
            excluded_tickers: HashSet::new(),
        }
    }

    /// Excludes tickers, e.g. companies whose industry was revised.
    #[must_use]
    pub fn with_excluded_tickers(mut self, tickers: impl IntoIterator<Item = String>) -> Self {
        self.excluded_tickers
            .extend(tickers.into_iter().map(|t| t.trim().to_string()));
        self
    }

    /// Reads excluded tickers from a file with one code per line.
    pub fn with_excluded_tickers_from(self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let tickers = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        Ok(self.with_excluded_tickers(tickers))
    }

    /// The underlying registry.
    #[must_use]
    pub const fn registry(&self) -> &CompanyRegistry {
        &self.registry
    }

    /// Classifies one company.
    #[must_use]
    pub fn classify(&self, edinet_code: &str) -> Eligibility {
        let Some(company) = self.registry.get(edinet_code) else {
            return Eligibility::Unknown;
        };
        if company.industry == NON_FILER_INDUSTRY {
            return Eligibility::NonFiler;
        }
        let Some(ticker) = company.ticker() else {
            return Eligibility::Unlisted;
        };
        if self.excluded_tickers.contains(ticker) {
            return Eligibility::Excluded(ticker.to_string());
        }
        Eligibility::Eligible(industry_group(&company.industry))
    }
}
