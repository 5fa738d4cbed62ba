use std::path::PathBuf;

use thiserror::Error;

/// Failure to build the feature schema. Only raised at startup.
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    #[error("dataset not found: {0}")]
    DatasetNotFound(PathBuf),

    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("dataset header has no feature columns")]
    EmptyHeader,

    #[error("label column '{0}' not found in dataset header")]
    MissingLabelColumn(String),

    #[error("duplicate feature column '{0}'")]
    DuplicateColumn(String),

    #[error(
        "feature schema drift at position {position}: expected {expected:?}, found {found:?}"
    )]
    Drift {
        position: usize,
        expected: Option<String>,
        found: Option<String>,
    },
}
