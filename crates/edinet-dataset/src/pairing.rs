//! Pairing of consecutive annual filings.

use chrono::{Datelike, Months, NaiveDate};
use tracing::debug;

use edinet_core::FilingMetadata;

/// Returns true if `current` falls exactly one calendar year after `previous`.
///
/// February 29 pairs with February 28 of the following year, and the last
/// day of February always pairs with the last day of February a year later.
#[must_use]
pub fn is_one_year_shift(previous: NaiveDate, current: NaiveDate) -> bool {
    if previous.checked_add_months(Months::new(12)) == Some(current) {
        return true;
    }
    current.year() == previous.year() + 1 && is_end_of_february(previous) && is_end_of_february(current)
}

fn is_end_of_february(date: NaiveDate) -> bool {
    date.month() == 2 && date.succ_opt().is_some_and(|next| next.month() == 3)
}

/// Two filings of one company covering adjacent fiscal years.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilingPair {
    /// The earlier filing.
    pub previous: FilingMetadata,
    /// The filing one year later.
    pub current: FilingMetadata,
}

/// Pairs filings whose periods are exactly one year apart.
///
/// Filings are ordered by period start; each neighbour pair whose start and
/// end both shift by one year is returned. Filings without a period are
/// ignored.
pub fn consecutive_pairs(filings: &[FilingMetadata]) -> Vec<FilingPair> {
    let mut dated: Vec<(NaiveDate, NaiveDate, &FilingMetadata)> = filings
        .iter()
        .filter_map(|f| f.period().map(|(start, end)| (start, end, f)))
        .collect();
    dated.sort_by_key(|(start, _, _)| *start);

    let mut pairs = Vec::new();
    for window in dated.windows(2) {
        let [(prev_start, prev_end, previous), (cur_start, cur_end, current)] = window else {
            continue;
        };
        if is_one_year_shift(*prev_start, *cur_start) && is_one_year_shift(*prev_end, *cur_end) {
            pairs.push(FilingPair {
                previous: (*previous).clone(),
                current: (*current).clone(),
            });
        } else {
            debug!(
                previous = %previous.doc_id,
                current = %current.doc_id,
                "Filings are not one year apart"
            );
        }
    }
    pairs
}

/// The filing with the latest period start.
pub fn latest_filing(filings: &[FilingMetadata]) -> Option<&FilingMetadata> {
    filings
        .iter()
        .filter(|f| f.period_start.is_some())
        .max_by_key(|f| f.period_start)
}
