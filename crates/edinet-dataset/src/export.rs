//! Record export: JSON lines, and with the `parquet` feature, polars frames.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use edinet_core::{EdinetError, Result};

/// Writes one JSON object per line. Non-ASCII text is written as is.
pub fn write_jsonl<R: Serialize>(records: &[R], mut writer: impl Write) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes records to a JSON-lines file, creating parent directories.
#[instrument(skip_all, fields(path = %path.display(), records = records.len()))]
pub fn write_jsonl_file<R: Serialize>(records: &[R], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_jsonl(records, BufWriter::new(File::create(path)?))?;
    debug!("Wrote JSON lines");
    Ok(())
}

/// Reads records from JSON lines. Blank lines are ignored.
pub fn read_jsonl<R: DeserializeOwned>(reader: impl BufRead) -> Result<Vec<R>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .map_err(|e| EdinetError::Serialization(format!("line {}: {e}", index + 1)))?;
        records.push(record);
    }
    Ok(records)
}

/// Reads records from a JSON-lines file.
pub fn read_jsonl_file<R: DeserializeOwned>(path: &Path) -> Result<Vec<R>> {
    read_jsonl(BufReader::new(File::open(path)?))
}

#[cfg(feature = "parquet")]
pub use self::frame::{records_to_dataframe, write_parquet};

#[cfg(feature = "parquet")]
mod frame {
    use std::fs::File;
    use std::path::Path;

    use polars::prelude::*;
    use serde::Serialize;
    use serde_json::{Map, Value};
    use tracing::{debug, instrument};

    use edinet_core::{EdinetError, Result};

    /// Builds a `DataFrame` with one column per record field.
    ///
    /// Columns are the first record's fields, ordered by name. A column whose
    /// values are all integers becomes `Int64`; any other column is a string
    /// column, with non-string values written as JSON.
    pub fn records_to_dataframe<R: Serialize>(records: &[R]) -> Result<DataFrame> {
        let rows = records
            .iter()
            .map(|r| -> Result<Map<String, Value>> {
                match serde_json::to_value(r)? {
                    Value::Object(map) => Ok(map),
                    other => Err(EdinetError::Serialization(format!(
                        "record is not an object: {other}"
                    ))),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let Some(first) = rows.first() else {
            return Ok(DataFrame::empty());
        };
        let names: Vec<String> = first.keys().cloned().collect();

        let mut columns = Vec::with_capacity(names.len());
        for name in &names {
            let values: Vec<Option<&Value>> = rows.iter().map(|row| row.get(name)).collect();
            let all_integers = values
                .iter()
                .all(|v| v.is_none_or(|v| v.is_null() || v.is_i64()));
            let column = if all_integers {
                let ints: Vec<Option<i64>> = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
                Column::new(name.as_str().into(), ints)
            } else {
                let strings: Vec<Option<String>> = values
                    .iter()
                    .map(|v| match v {
                        None | Some(Value::Null) => None,
                        Some(Value::String(s)) => Some(s.clone()),
                        Some(other) => Some(other.to_string()),
                    })
                    .collect();
                Column::new(name.as_str().into(), strings)
            };
            columns.push(column);
        }

        DataFrame::new(columns).map_err(|e| EdinetError::Other(e.to_string()))
    }

    /// Writes records to a parquet file.
    #[instrument(skip_all, fields(path = %path.display(), records = records.len()))]
    pub fn write_parquet<R: Serialize>(records: &[R], path: &Path) -> Result<()> {
        let mut df = records_to_dataframe(records)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        ParquetWriter::new(file)
            .finish(&mut df)
            .map_err(|e| EdinetError::Other(e.to_string()))?;
        debug!(rows = df.height(), "Wrote parquet");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct Row {
        doc_id: String,
        label: u8,
        explanation: String,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                doc_id: "S1".to_string(),
                label: 1,
                explanation: "売上の過大計上".to_string(),
            },
            Row {
                doc_id: "S2".to_string(),
                label: 0,
                explanation: String::new(),
            },
        ]
    }

    #[test]
    fn test_jsonl_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fraud/train.jsonl");
        write_jsonl_file(&rows(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("売上の過大計上"));

        let back: Vec<Row> = read_jsonl_file(&path).unwrap();
        assert_eq!(back, rows());
    }

    #[test]
    fn test_read_jsonl_reports_line() {
        let input = "{\"doc_id\":\"S1\",\"label\":1,\"explanation\":\"\"}\n\nnot json\n";
        let err = read_jsonl::<Row>(input.as_bytes()).unwrap_err();
        assert!(matches!(err, EdinetError::Serialization(ref m) if m.contains("line 3")));
    }

    #[cfg(feature = "parquet")]
    #[test]
    fn test_dataframe_columns() {
        use polars::prelude::DataType;

        let df = records_to_dataframe(&rows()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert_eq!(df.column("label").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("doc_id").unwrap().dtype(), &DataType::String);

        let empty = records_to_dataframe::<Row>(&[]).unwrap();
        assert_eq!(empty.height(), 0);
    }

    #[cfg(feature = "parquet")]
    #[test]
    fn test_write_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.parquet");
        write_parquet(&rows(), &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
