//! Parsing pipeline over a [`FilingSource`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use edinet_core::{ContentType, EdinetError, FilingSource, FinancialStatementDocument, Result};
use edinet_parser::{Assembled, FilingParser, ParserConfig};

#[cfg(feature = "dataset")]
use edinet_dataset::{
    BatchConfig, BatchReport, EarningsRecord, FilingPair, build_earnings_record, consecutive_pairs,
    run_batch,
};

/// One filing export to parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseJob {
    /// Document identifier.
    pub doc_id: String,
    /// Local path of the export.
    pub path: PathBuf,
}

impl fmt::Display for ParseJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.doc_id)
    }
}

/// A pair of exports one fiscal year apart.
#[cfg(feature = "dataset")]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairJob {
    /// Export of the earlier filing.
    pub previous: PathBuf,
    /// Export of the later filing.
    pub current: PathBuf,
}

#[cfg(feature = "dataset")]
impl fmt::Display for PairJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.previous.display(), self.current.display())
    }
}

/// Runs the parser over the filings of a source.
///
/// # Example
///
/// ```rust,ignore
/// use edinet::{LocalDirectorySource, Pipeline};
/// use std::sync::Arc;
///
/// let pipeline = Pipeline::new(Arc::new(LocalDirectorySource::new("edinet_corpus/annual/E02144")));
/// let report = pipeline.parse_all().await?;
/// for (doc_id, doc) in report.outputs {
///     println!("{doc_id}: {} PL fields", doc.pl().len());
/// }
/// ```
#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn FilingSource>,
    parser: FilingParser,
    #[cfg(feature = "dataset")]
    batch: BatchConfig,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Pipeline");
        s.field("source", &self.source.name())
            .field("parser", &self.parser);
        #[cfg(feature = "dataset")]
        s.field("batch", &self.batch);
        s.finish()
    }
}

impl Pipeline {
    /// Creates a pipeline with default parser and batch settings.
    #[must_use]
    pub fn new(source: Arc<dyn FilingSource>) -> Self {
        Self {
            source,
            parser: FilingParser::default(),
            #[cfg(feature = "dataset")]
            batch: BatchConfig::default(),
        }
    }

    /// Sets the parser configuration.
    #[must_use]
    pub fn with_parser_config(mut self, config: ParserConfig) -> Self {
        self.parser = FilingParser::new(config);
        self
    }

    /// Sets the batch configuration.
    #[cfg(feature = "dataset")]
    #[must_use]
    pub fn with_batch_config(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }

    /// The source filings are read from.
    #[must_use]
    pub fn source(&self) -> &dyn FilingSource {
        self.source.as_ref()
    }

    /// Parses one filing on the blocking pool.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn parse_filing(&self, doc_id: &str) -> Result<Assembled> {
        let path = self.source.fetch(doc_id, ContentType::Tsv).await?;
        let parser = self.parser.clone();
        tokio::task::spawn_blocking(move || parser.parse(&path))
            .await
            .map_err(|e| EdinetError::Task(e.to_string()))?
    }

    /// Resolves the export path of every listed filing. Filings without an
    /// export are logged and left out.
    pub async fn jobs(&self) -> Result<Vec<ParseJob>> {
        let doc_ids = self.source.list().await?;
        let mut jobs = Vec::with_capacity(doc_ids.len());
        for doc_id in doc_ids {
            match self.source.fetch(&doc_id, ContentType::Tsv).await {
                Ok(path) => jobs.push(ParseJob { doc_id, path }),
                Err(e) => warn!(doc_id = %doc_id, error = %e, "No export for filing"),
            }
        }
        debug!(source = self.source.name(), jobs = jobs.len(), "Resolved parse jobs");
        Ok(jobs)
    }

    /// Parses every filing of the source with bounded parallelism.
    ///
    /// Not-applicable filings count as skipped; unreadable ones as failed.
    #[cfg(feature = "dataset")]
    pub async fn parse_all(&self) -> Result<BatchReport<(String, FinancialStatementDocument)>> {
        let jobs = self.jobs().await?;
        let parser = self.parser.clone();
        Ok(run_batch(jobs, &self.batch, move |job: ParseJob| {
            let document = parser.parse(&job.path)?.outcome.into_document();
            Ok(document.map(|doc| (job.doc_id, doc)))
        })
        .await)
    }

    /// Parses every filing of the source one after another.
    ///
    /// Failures are logged and skipped.
    #[cfg(not(feature = "dataset"))]
    pub async fn parse_all(&self) -> Result<Vec<(String, FinancialStatementDocument)>> {
        let mut documents = Vec::new();
        for job in self.jobs().await? {
            match self.parser.parse(&job.path) {
                Ok(assembled) => {
                    if let Some(doc) = assembled.outcome.into_document() {
                        documents.push((job.doc_id, doc));
                    }
                }
                Err(e) => warn!(doc_id = %job.doc_id, error = %e, "Failed to parse filing"),
            }
        }
        Ok(documents)
    }

    /// Pairs the source's non-withdrawn filings one fiscal year apart.
    #[cfg(feature = "dataset")]
    pub async fn consecutive_pairs(&self) -> Result<Vec<FilingPair>> {
        let mut filings = Vec::new();
        for doc_id in self.source.list().await? {
            match self.source.metadata(&doc_id).await {
                Ok(meta) if meta.is_withdrawn() => {
                    debug!(doc_id = %doc_id, "Skipping withdrawn filing");
                }
                Ok(meta) => filings.push(meta),
                Err(e) => warn!(doc_id = %doc_id, error = %e, "No metadata for filing"),
            }
        }
        Ok(consecutive_pairs(&filings))
    }

    /// Builds earnings-forecast records from every consecutive pair.
    #[cfg(feature = "dataset")]
    pub async fn earnings_records(&self) -> Result<BatchReport<EarningsRecord>> {
        let mut jobs = Vec::new();
        for pair in self.consecutive_pairs().await? {
            let previous = self.source.fetch(&pair.previous.doc_id, ContentType::Tsv).await;
            let current = self.source.fetch(&pair.current.doc_id, ContentType::Tsv).await;
            match (previous, current) {
                (Ok(previous), Ok(current)) => jobs.push(PairJob { previous, current }),
                (Err(e), _) | (_, Err(e)) => {
                    warn!(error = %e, "Export missing for filing pair");
                }
            }
        }

        let parser = self.parser.clone();
        Ok(run_batch(jobs, &self.batch, move |job: PairJob| {
            build_earnings_record(&job.previous, &job.current, &parser)
        })
        .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocalDirectorySource;
    use std::path::Path;

    const HEADER: &str = "要素ID\t項目名\tコンテキストID\t相対年度\t連結・個別\t期間・時点\tユニットID\t単位\t値";

    fn row(element: &str, context: &str, flag: &str, value: &str) -> String {
        format!("{element}\t－\t{context}\t当期\t{flag}\t期間\tJPY\t円\t{value}")
    }

    fn write_export(dir: &Path, doc_id: &str, consolidated: &str, profits: &[(&str, &str)]) {
        let mut lines = vec![
            HEADER.to_string(),
            row("jpdei_cor:EDINETCodeDEI", "FilingDateInstant", "その他", "E02144"),
            row(
                "jpdei_cor:WhetherConsolidatedFinancialStatementsArePreparedDEI",
                "FilingDateInstant",
                "その他",
                consolidated,
            ),
        ];
        for (context, value) in profits {
            lines.push(row(
                "jppfs_cor:ProfitLossAttributableToOwnersOfParent",
                context,
                "連結",
                value,
            ));
        }
        let mut bytes = vec![0xFF, 0xFE];
        for unit in lines.join("\n").encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        std::fs::write(dir.join(format!("{doc_id}.tsv")), bytes).unwrap();
    }

    #[cfg(feature = "dataset")]
    fn write_metadata(dir: &Path, doc_id: &str, start: &str, end: &str, withdrawn: bool) {
        let json = format!(
            r#"{{"docID":"{doc_id}","edinetCode":"E02144","periodStart":"{start}","periodEnd":"{end}","withdrawalStatus":"{}"}}"#,
            u8::from(withdrawn)
        );
        std::fs::write(dir.join(format!("{doc_id}.json")), json).unwrap();
    }

    fn pipeline(dir: &Path) -> Pipeline {
        Pipeline::new(Arc::new(LocalDirectorySource::new(dir)))
    }

    #[tokio::test]
    async fn test_parse_filing() {
        let dir = tempfile::tempdir().unwrap();
        write_export(dir.path(), "S100A", "true", &[("CurrentYearDuration", "100")]);

        let assembled = pipeline(dir.path()).parse_filing("S100A").await.unwrap();
        let doc = assembled.outcome.document().unwrap();
        assert_eq!(doc.edinet_code(), Some("E02144"));
        assert!(doc.pl().contains_key("親会社株主に帰属する当期純利益"));

        let missing = pipeline(dir.path()).parse_filing("S100Z").await;
        assert!(matches!(missing, Err(EdinetError::NotFound(_))));
    }

    #[cfg(feature = "dataset")]
    #[tokio::test]
    async fn test_parse_all() {
        let dir = tempfile::tempdir().unwrap();
        write_export(dir.path(), "S100A", "true", &[]);
        write_export(dir.path(), "S100B", "false", &[]);
        std::fs::write(dir.path().join("S100C.tsv"), b"not utf-16").unwrap();

        let report = pipeline(dir.path())
            .with_batch_config(BatchConfig::new().with_max_workers(2))
            .parse_all()
            .await
            .unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].job, "S100C");
        assert_eq!(report.outputs[0].0, "S100A");
    }

    #[cfg(feature = "dataset")]
    #[tokio::test]
    async fn test_earnings_records() {
        let dir = tempfile::tempdir().unwrap();
        write_export(
            dir.path(),
            "S100A",
            "true",
            &[("Prior1YearDuration", "80"), ("CurrentYearDuration", "100")],
        );
        write_export(
            dir.path(),
            "S100B",
            "true",
            &[("Prior1YearDuration", "100"), ("CurrentYearDuration", "120")],
        );
        write_export(dir.path(), "S100W", "true", &[("CurrentYearDuration", "1")]);
        write_metadata(dir.path(), "S100A", "2022-04-01", "2023-03-31", false);
        write_metadata(dir.path(), "S100B", "2023-04-01", "2024-03-31", false);
        write_metadata(dir.path(), "S100W", "2024-04-01", "2025-03-31", true);

        let pipeline = pipeline(dir.path());
        let pairs = pipeline.consecutive_pairs().await.unwrap();
        assert_eq!(pairs.len(), 1);

        let report = pipeline.earnings_records().await.unwrap();
        assert_eq!(report.succeeded, 1);
        let record = &report.outputs[0];
        assert_eq!(record.doc_id, "S100A");
        assert_eq!(record.label, 1);
        assert_eq!(record.naive_prediction, 1);
    }
}
