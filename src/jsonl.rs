//! JSON-lines reading and writing shared by the dataset loaders.

use crate::errors::{DatasetError, FineTuneResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Reads one record per non-blank line. Line numbers in errors are 1-based.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> FineTuneResult<Vec<T>> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| io_error(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| DatasetError::Parse {
            path: path.display().to_string(),
            line: index + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

pub fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> FineTuneResult<()> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n").map_err(|e| io_error(path, e))?;
    }
    writer.flush().map_err(|e| io_error(path, e))?;
    Ok(())
}

fn io_error(path: &Path, error: std::io::Error) -> DatasetError {
    DatasetError::Io {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}
