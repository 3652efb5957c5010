use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::layers::Layer;

pub mod reader;

use reader::open_maybe_gz;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("parse error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// One data line of a delimited table, cells untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub line: u64,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn cell(&self, idx: usize) -> &str {
        self.cells.get(idx).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct RawTable {
    pub layer: Layer,
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

pub fn load_layer_table(path: &Path, layer: Layer, sep: u8) -> Result<RawTable, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(format!(
            "{} table not found at {}",
            layer,
            path.display()
        )));
    }
    let csv_err = |source: csv::Error| InputError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let reader = open_maybe_gz(path)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(sep)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        rows.push(RawRow {
            line,
            cells: record.iter().map(|c| c.to_string()).collect(),
        });
    }

    tracing::debug!(
        layer = %layer,
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "read layer table"
    );

    Ok(RawTable {
        layer,
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
