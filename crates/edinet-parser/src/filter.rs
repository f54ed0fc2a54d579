//! Stateless predicates over fact rows.
//!
//! Every filter borrows its input and returns the surviving rows in input
//! order, so filters compose without copying the table.

use std::collections::HashSet;

use edinet_core::{FactRow, FiscalYear};

/// Suffix EDINET appends to IFRS variants of an element.
const IFRS_SUFFIX: &str = "IFRS";

/// Rows whose context is exactly `year` followed by an instant or duration
/// suffix (consolidated or not).
pub fn filter_by_year<'a>(
    facts: impl IntoIterator<Item = &'a FactRow>,
    year: FiscalYear,
) -> Vec<&'a FactRow> {
    facts
        .into_iter()
        .filter(|f| year.matches_context(&f.context_id))
        .collect()
}

/// Returns true if `element_id` is `:{local}` or `:{local}IFRS` at its end.
#[must_use]
pub fn element_matches(element_id: &str, local: &str) -> bool {
    let without_ifrs = element_id.strip_suffix(IFRS_SUFFIX);
    [Some(element_id), without_ifrs]
        .into_iter()
        .flatten()
        .any(|candidate| {
            candidate
                .strip_suffix(local)
                .is_some_and(|head| head.ends_with(':'))
        })
}

/// Rows whose element identifier ends with `:{element_id}` or
/// `:{element_id}IFRS`.
///
/// A filing reports under one accounting standard, so at most one of the two
/// variants is expected to be present.
pub fn filter_by_element_id<'a>(
    facts: impl IntoIterator<Item = &'a FactRow>,
    element_id: &str,
) -> Vec<&'a FactRow> {
    facts
        .into_iter()
        .filter(|f| element_matches(&f.element_id, element_id))
        .collect()
}

/// Rows reported as consolidated by both the consolidation column and the
/// context identifier.
pub fn filter_by_consolidation<'a>(facts: impl IntoIterator<Item = &'a FactRow>) -> Vec<&'a FactRow> {
    facts.into_iter().filter(|f| f.is_consolidated()).collect()
}

/// Collapses rows sharing an identity key. The first occurrence survives.
pub fn deduplicate<'a>(facts: impl IntoIterator<Item = &'a FactRow>) -> Vec<&'a FactRow> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for fact in facts {
        if seen.insert(fact.identity_key()) {
            unique.push(fact);
        }
    }
    unique
}
