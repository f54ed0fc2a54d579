#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/edinet-bench/edinet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for EDINET filing parsing.
//!
//! This crate provides the foundational abstractions shared by the parser and
//! the dataset builders:
//!
//! - [`FactRow`](fact::FactRow) - One disclosed fact from a tabular export
//! - [`FiscalYear`](fiscal_year::FiscalYear) - The normalized ten-label year axis
//! - [`FinancialStatementDocument`](document::FinancialStatementDocument) - Parser output
//! - [`FilingMetadata`](filing::FilingMetadata) - EDINET document-list entry
//! - [`FilingSource`](source::FilingSource) - Retrieval abstraction

/// Financial statement document types.
pub mod document;
/// Error types for parsing and dataset operations.
pub mod error;
/// Raw fact rows from the tabular export.
pub mod fact;
/// Filing metadata and document type classification.
pub mod filing;
/// Fiscal-year label definitions.
pub mod fiscal_year;
/// Retrieval trait for locating filing content on disk.
pub mod source;

// Re-export commonly used items at crate root
pub use document::{EncodedSections, FinancialStatementDocument, MetaSection, Section, YearSeries};
pub use error::{EdinetError, Result};
pub use fact::{FactRow, PeriodKind};
pub use filing::{DocType, FilingMetadata};
pub use fiscal_year::FiscalYear;
pub use source::{ContentType, FilingSource};
