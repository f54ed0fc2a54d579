#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/edinet-bench/edinet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Parsing pipeline for one EDINET filing export.
//!
//! - [`reader`] decodes the UTF-16 tab-separated export into [`FactRow`](edinet_core::FactRow)s
//! - [`filter`] narrows facts by year, element and consolidation, and drops duplicates
//! - [`reduce`] folds the surviving facts onto the fiscal-year axis
//! - [`assemble`] drives the taxonomy and produces the document
//!
//! # Example
//!
//! ```no_run
//! use edinet_parser::{FilingParser, ParseOutcome};
//! use std::path::Path;
//!
//! let parser = FilingParser::default();
//! let assembled = parser.parse(Path::new("corpus/S100TR7I.tsv"))?;
//! if let ParseOutcome::Document(doc) = assembled.outcome {
//!     println!("{}", doc.to_json()?);
//! }
//! # Ok::<(), edinet_core::EdinetError>(())
//! ```

/// Statement assembler and parser configuration.
pub mod assemble;
/// Row filters and deduplication.
pub mod filter;
/// Tabular export reader.
pub mod reader;
/// Fiscal-year reduction.
pub mod reduce;
/// Element-to-field taxonomy.
pub mod taxonomy;

pub use assemble::{
    Ambiguity, Assembled, MissingConsolidationPolicy, NotApplicableReason, ParseDiagnostics,
    ParseOutcome, ParserConfig, StatementAssembler, assemble,
};
pub use filter::{deduplicate, element_matches, filter_by_consolidation, filter_by_element_id, filter_by_year};
pub use reader::{FilingParser, parse_file, read_facts, read_facts_from_bytes, read_facts_from_str};
pub use reduce::{FieldValue, Reduced, YearAxis, reduce_by_year};
pub use taxonomy::{STANDARD_ENTRIES, StatementSection, Taxonomy, TaxonomyEntry};
