//! Fiscal-year label definitions.
//!
//! This module defines [`FiscalYear`], the normalized temporal axis every
//! multi-year section of a document is keyed by. Contexts in an export that do
//! not map onto one of these labels are never reported.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::EdinetError;

/// Suffixes a context identifier may carry after its fiscal-year label.
const CONTEXT_SUFFIXES: [&str; 4] = [
    "Instant",
    "Instant_NonConsolidatedMember",
    "Duration",
    "Duration_NonConsolidatedMember",
];

/// One of the ten normalized fiscal-year labels.
///
/// Variants are ordered the way they appear in a document: annual years from
/// oldest to current, then year-to-date, quarter and filing date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FiscalYear {
    /// Four fiscal years before the current one.
    Prior4Year,
    /// Three fiscal years before the current one.
    Prior3Year,
    /// Two fiscal years before the current one.
    Prior2Year,
    /// The fiscal year before the current one.
    Prior1Year,
    /// The current fiscal year.
    CurrentYear,
    /// Prior year-to-date (interim reports).
    Prior1Ytd,
    /// Current year-to-date (interim reports).
    CurrentYtd,
    /// Prior quarter.
    Prior1Quarter,
    /// Current quarter.
    CurrentQuarter,
    /// Values reported as of the filing date (cover page, DEI, text blocks).
    FilingDate,
}

impl FiscalYear {
    /// Every label, in document order.
    pub const ALL: [Self; 10] = [
        Self::Prior4Year,
        Self::Prior3Year,
        Self::Prior2Year,
        Self::Prior1Year,
        Self::CurrentYear,
        Self::Prior1Ytd,
        Self::CurrentYtd,
        Self::Prior1Quarter,
        Self::CurrentQuarter,
        Self::FilingDate,
    ];

    /// Returns the label as it appears in context identifiers.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Prior4Year => "Prior4Year",
            Self::Prior3Year => "Prior3Year",
            Self::Prior2Year => "Prior2Year",
            Self::Prior1Year => "Prior1Year",
            Self::CurrentYear => "CurrentYear",
            Self::Prior1Ytd => "Prior1YTD",
            Self::CurrentYtd => "CurrentYTD",
            Self::Prior1Quarter => "Prior1Quarter",
            Self::CurrentQuarter => "CurrentQuarter",
            Self::FilingDate => "FilingDate",
        }
    }

    /// Returns true if `context_id` is exactly this label followed by one of
    /// the instant/duration suffixes.
    ///
    /// `CurrentYearToDateDuration` does not match `CurrentYear`, and
    /// `Prior10YearDuration` does not match `Prior1Year`.
    #[must_use]
    pub fn matches_context(&self, context_id: &str) -> bool {
        context_id
            .strip_prefix(self.as_str())
            .is_some_and(|rest| CONTEXT_SUFFIXES.contains(&rest))
    }

    /// Returns the label whose context suffix set contains `context_id`, if any.
    #[must_use]
    pub fn from_context(context_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|y| y.matches_context(context_id))
    }

    /// Returns true for the five annual labels.
    #[must_use]
    pub const fn is_annual(&self) -> bool {
        matches!(
            self,
            Self::Prior4Year
                | Self::Prior3Year
                | Self::Prior2Year
                | Self::Prior1Year
                | Self::CurrentYear
        )
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FiscalYear {
    type Err = EdinetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|y| y.as_str() == s)
            .ok_or_else(|| EdinetError::InvalidParameter(format!("Unknown fiscal year label: {s}")))
    }
}

// Serialized as the bare label so it can key JSON objects.
impl Serialize for FiscalYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FiscalYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}
