//! Startup configuration for the inference pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Label column name in the training dataset.
pub const DEFAULT_LABEL_COLUMN: &str = "diseases";

/// Where to find the classifier and (optionally) the schema-defining dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Classifier artifact (`.json` forest, or `.onnx` with the `onnx` feature).
    pub model_path: PathBuf,
    /// Training dataset whose header must agree with the artifact's features.
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
    #[serde(default = "default_label_column")]
    pub label_column: String,
    /// Accept a dataset header without the label column.
    #[serde(default)]
    pub allow_missing_label: bool,
}

impl PipelineConfig {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            dataset_path: None,
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            allow_missing_label: false,
        }
    }

    pub fn with_dataset(mut self, dataset_path: impl Into<PathBuf>) -> Self {
        self.dataset_path = Some(dataset_path.into());
        self
    }
}

fn default_label_column() -> String {
    DEFAULT_LABEL_COLUMN.to_string()
}
