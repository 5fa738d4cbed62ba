use std::path::PathBuf;

use medguide_core::SchemaLoadError;
use thiserror::Error;

/// The classifier artifact could not be loaded. Startup only.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported artifact format_version {0}")]
    UnsupportedVersion(u32),

    #[error("inconsistent model artifact: {0}")]
    Invalid(String),

    #[error("artifact feature names: {0}")]
    Schema(#[from] SchemaLoadError),

    #[cfg(feature = "onnx")]
    #[error("onnx runtime error: {0}")]
    Onnx(#[from] ort::Error),
}

/// A structurally valid request could not be scored.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("feature vector has {actual} values, classifier expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("classifier backend failure: {0}")]
    Backend(String),
}

/// Pipeline construction failure. Either variant prevents the service from starting.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Schema(#[from] SchemaLoadError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
