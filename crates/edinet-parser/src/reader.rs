//! Reader for the EDINET tabular export.
//!
//! The export is a tab-separated table encoded as UTF-16 with a byte-order
//! mark. One header row names the columns in Japanese.

use std::path::Path;

use encoding_rs::UTF_16LE;
use tracing::{debug, instrument};

use edinet_core::{EdinetError, FactRow, Result};

use crate::assemble::{Assembled, ParserConfig, StatementAssembler};

/// Columns that must be present in the export header.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "要素ID",
    "コンテキストID",
    "相対年度",
    "連結・個別",
    "期間・時点",
    "値",
];

/// Decodes and parses an export held in memory.
///
/// A byte-order mark selects the UTF-16 byte order; without one the input is
/// read as little-endian.
pub fn read_facts_from_bytes(bytes: &[u8]) -> Result<Vec<FactRow>> {
    let (text, encoding, had_errors) = UTF_16LE.decode(bytes);
    if had_errors {
        return Err(EdinetError::Encoding(format!(
            "input is not valid {}",
            encoding.name()
        )));
    }
    read_facts_from_str(&text)
}

/// Parses an already decoded export.
pub fn read_facts_from_str(text: &str) -> Result<Vec<FactRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| EdinetError::MalformedInput(format!("unreadable header: {e}")))?;
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(EdinetError::MissingColumn((*missing).to_string()));
    }

    let mut facts = Vec::new();
    for (index, record) in reader.deserialize::<FactRow>().enumerate() {
        let fact = record.map_err(|e| {
            EdinetError::MalformedInput(format!("row {}: {e}", index + 1))
        })?;
        facts.push(fact);
    }
    Ok(facts)
}

/// Reads every fact row from an export file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_facts(path: &Path) -> Result<Vec<FactRow>> {
    let bytes = std::fs::read(path)?;
    let facts = read_facts_from_bytes(&bytes)?;
    debug!(rows = facts.len(), "Read fact table");
    Ok(facts)
}

/// Reads and assembles one filing export. Errors name the file, as with
/// [`FilingParser::parse`].
pub fn parse_file(path: &Path, config: &ParserConfig) -> Result<Assembled> {
    FilingParser::new(config.clone()).parse(path)
}

/// Reusable reader plus assembler for one configuration.
#[derive(Debug, Clone)]
pub struct FilingParser {
    assembler: StatementAssembler,
}

impl FilingParser {
    /// Creates a parser.
    #[must_use]
    pub const fn new(config: ParserConfig) -> Self {
        Self {
            assembler: StatementAssembler::new(config),
        }
    }

    /// The assembler applied after reading.
    #[must_use]
    pub const fn assembler(&self) -> &StatementAssembler {
        &self.assembler
    }

    /// Parses the export at `path`. I/O and decoding errors name the file.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn parse(&self, path: &Path) -> Result<Assembled> {
        let facts = read_facts(path).map_err(|e| with_path(e, path))?;
        Ok(self.assembler.assemble(&facts))
    }

    /// Parses an export held in memory.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Assembled> {
        let facts = read_facts_from_bytes(bytes)?;
        Ok(self.assembler.assemble(&facts))
    }
}

impl Default for FilingParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

fn with_path(error: EdinetError, path: &Path) -> EdinetError {
    let path = path.display();
    match error {
        EdinetError::Io(msg) => EdinetError::Io(format!("{path}: {msg}")),
        EdinetError::Encoding(msg) => EdinetError::Encoding(format!("{path}: {msg}")),
        EdinetError::MalformedInput(msg) => {
            EdinetError::MalformedInput(format!("{path}: {msg}"))
        }
        other => other,
    }
}
