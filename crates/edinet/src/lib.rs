#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/edinet-bench/edinet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! EDINET filing parser and benchmark dataset builders.
//!
//! This crate re-exports the core types, the parser and the dataset builders,
//! and provides a [`Pipeline`] that drives the parser over a
//! [`FilingSource`](edinet_core::FilingSource).
//!
//! # Features
//!
//! - `dataset` - Dataset builders and the batch runner
//! - `parquet` - Parquet export of dataset records
//!
//! # Example
//!
//! ```rust,ignore
//! use edinet::{LocalDirectorySource, Pipeline, ParseOutcome};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> edinet::Result<()> {
//!     let source = Arc::new(LocalDirectorySource::new("edinet_corpus/annual/E02144"));
//!     let pipeline = Pipeline::new(source);
//!
//!     let assembled = pipeline.parse_filing("S100TR7I").await?;
//!     if let ParseOutcome::Document(doc) = assembled.outcome {
//!         println!("{}", doc.to_json()?);
//!     }
//!     Ok(())
//! }
//! ```

/// Filesystem-backed filing source.
pub mod local;
/// Parsing pipeline over a filing source.
pub mod pipeline;

// Core types and traits
pub use edinet_core::*;

// Parser
pub use edinet_parser::{
    Ambiguity, Assembled, FilingParser, MissingConsolidationPolicy, NotApplicableReason,
    ParseDiagnostics, ParseOutcome, ParserConfig, StatementAssembler, StatementSection, Taxonomy,
    TaxonomyEntry, assemble, parse_file, read_facts, read_facts_from_bytes,
};

// Dataset builders
#[cfg(feature = "dataset")]
pub use edinet_dataset as dataset;
#[cfg(feature = "dataset")]
pub use edinet_dataset::{BatchConfig, BatchReport, run_batch};

pub use local::LocalDirectorySource;
#[cfg(feature = "dataset")]
pub use pipeline::PairJob;
pub use pipeline::{ParseJob, Pipeline};
