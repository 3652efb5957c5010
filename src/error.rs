use std::path::PathBuf;

use thiserror::Error;

use crate::input::InputError;
use crate::model::background::ExpressionSyntaxError;
use crate::model::layers::Layer;

/// Configuration or table-shape problem detected before classification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{layer} table has no column '{column}' (available: {})", .available.join(", "))]
    MissingColumn {
        layer: Layer,
        column: String,
        available: Vec<String>,
    },
    #[error("{layer} table has no data rows")]
    EmptyTable { layer: Layer },
    #[error("{layer} table lists gene '{gene_id}' more than once (line {line})")]
    DuplicateGeneId {
        layer: Layer,
        gene_id: String,
        line: u64,
    },
    #[error("invalid {layer} {name} cutoff '{value}': {reason}")]
    InvalidCutoff {
        layer: Layer,
        name: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("missing required setting: {0}")]
    MissingSetting(String),
    #[error("invalid separator '{0}': expected a single ASCII character")]
    InvalidSeparator(String),
    #[error("gene id column '{0}' collides with an output column of the same name")]
    GeneIdColumnClash(String),
}

/// A data row whose effect size or adjusted p-value cannot be used.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("malformed {layer} row for gene '{gene_id}' (line {line}): column '{column}' has value '{value}'")]
pub struct MalformedRowError {
    pub layer: Layer,
    pub gene_id: String,
    pub line: u64,
    pub column: String,
    pub value: String,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("cannot load config {}: {message}", .path.display())]
    ConfigFile { path: PathBuf, message: String },
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("background formula error: {0}")]
    ExpressionSyntax(#[from] ExpressionSyntaxError),
    #[error(transparent)]
    MalformedRow(#[from] MalformedRowError),
    #[error("output directory {} is in use by another run (lock file {})", .dir.display(), .lock.display())]
    OutputBusy { dir: PathBuf, lock: PathBuf },
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("failed to write CSV output: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
