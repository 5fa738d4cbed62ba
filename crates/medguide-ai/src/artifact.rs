//! Pick a classifier backend from the artifact's file extension.

use std::path::Path;

use crate::ArtifactError;
use crate::classifier::Classifier;
use crate::forest::ForestClassifier;

/// Load a classifier artifact.
///
/// `.json` → [`ForestClassifier`]; `.onnx` → `OnnxClassifier` when built with
/// the `onnx` feature.
pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, ArtifactError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" => Ok(Box::new(ForestClassifier::load(path)?)),
        #[cfg(feature = "onnx")]
        "onnx" => Ok(Box::new(crate::onnx::OnnxClassifier::load(path)?)),
        other => Err(ArtifactError::UnsupportedFormat(if other.is_empty() {
            path.display().to_string()
        } else {
            format!(".{other}")
        })),
    }
}
