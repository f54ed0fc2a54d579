//! Year reducer: folds filtered facts onto the fiscal-year axis.
//!
//! A year is reported only when exactly one fact survives for it. Zero
//! matches leave the year out; two or more are an unresolved ambiguity, which
//! is also left out and returned to the caller for accounting.

use tracing::debug;

use edinet_core::{FactRow, FiscalYear, YearSeries};

use crate::filter::filter_by_year;

/// Whether a field is keyed by fiscal year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum YearAxis {
    /// One value per fiscal-year label.
    With,
    /// A single filing-wide scalar.
    Without,
}

/// Value of one reduced field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// Filing-wide scalar (META fields).
    Scalar(String),
    /// Non-empty sparse series over the year axis.
    Series(YearSeries),
}

/// Result of reducing one field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reduced {
    /// The reduced value, absent when no year had exactly one match.
    pub value: Option<FieldValue>,
    /// Years that matched more than one fact, with the number of matches.
    pub ambiguous: Vec<(FiscalYear, usize)>,
}

/// Reduces `facts` (already filtered to one element) for `field`.
///
/// With [`YearAxis::Without`], the first year in axis order with exactly one
/// match supplies the scalar.
pub fn reduce_by_year(facts: &[&FactRow], field: &str, axis: YearAxis) -> Reduced {
    let mut series = YearSeries::new();
    let mut ambiguous = Vec::new();

    for year in FiscalYear::ALL {
        let matched = filter_by_year(facts.iter().copied(), year);
        match matched.as_slice() {
            [] => {}
            [only] => {
                if axis == YearAxis::Without {
                    return Reduced {
                        value: Some(FieldValue::Scalar(only.value.clone())),
                        ambiguous,
                    };
                }
                series.insert(year, only.value.clone());
            }
            many => {
                debug!(field, year = %year, matches = many.len(), "Ambiguous year, omitting");
                ambiguous.push((year, many.len()));
            }
        }
    }

    let value = match axis {
        YearAxis::With if !series.is_empty() => Some(FieldValue::Series(series)),
        _ => None,
    };
    Reduced { value, ambiguous }
}
