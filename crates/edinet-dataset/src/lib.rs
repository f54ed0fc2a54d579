#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/edinet-bench/edinet/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Dataset builders for EDINET benchmark tasks.
//!
//! # Features
//!
//! - `parquet` - Export records through a polars `DataFrame` to parquet
//!
//! # Example
//!
//! ```rust,ignore
//! use edinet_dataset::{BatchConfig, FraudExplanationTable, FraudLabel, build_fraud_record, run_batch, write_jsonl_file};
//! use edinet_parser::FilingParser;
//! use std::{path::PathBuf, sync::Arc};
//!
//! let table = Arc::new(FraudExplanationTable::from_path("analysis/result.jsonl".as_ref())?);
//! let parser = FilingParser::default();
//! let jobs: Vec<PathBuf> = vec!["fraud/annual/S100AAAA.tsv".into()];
//!
//! let report = run_batch(jobs, &BatchConfig::default(), move |path: PathBuf| {
//!     build_fraud_record(&path, FraudLabel::Fraud, &table, &parser)
//! })
//! .await;
//! write_jsonl_file(&report.outputs, "dataset/fraud.jsonl".as_ref())?;
//! ```

/// Bounded parallel job execution.
pub mod batch;
/// EDINET code list and industry eligibility.
pub mod company;
/// Earnings-forecast records.
pub mod earnings;
/// JSON-lines and parquet export.
pub mod export;
/// Fraud-detection records.
pub mod fraud;
/// Industry-classification records.
pub mod industry;
/// Adjacent-year filing pairs.
pub mod pairing;
/// Record trait and splits.
pub mod record;

pub use batch::{BatchConfig, BatchFailure, BatchReport, DEFAULT_MAX_WORKERS, run_batch};
pub use company::{CompanyInfo, CompanyRegistry, Eligibility, IndustryClassifier, NON_FILER_INDUSTRY};
pub use earnings::{
    EarningsRecord, PROFIT_ELEMENTS, ProfitHistory, balance_classes, build_earnings_record,
    extract_profit,
};
#[cfg(feature = "parquet")]
pub use export::{records_to_dataframe, write_parquet};
pub use export::{read_jsonl, read_jsonl_file, write_jsonl, write_jsonl_file};
pub use fraud::{
    AmendmentAnalysis, FraudExplanation, FraudExplanationTable, FraudLabel, FraudRecord,
    build_fraud_record,
};
pub use industry::{
    INDUSTRY_GROUPS, INVALID_INDUSTRY, IndustryRecord, build_industry_record, industry_group,
};
pub use pairing::{FilingPair, consecutive_pairs, is_one_year_shift, latest_filing};
pub use record::{DatasetRecord, DatasetSplit, doc_id_from_path, split_by_fiscal_year};
