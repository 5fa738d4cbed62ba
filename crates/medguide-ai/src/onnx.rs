//! ONNX Runtime backend for classifiers exported from scikit-learn.
//!
//! Expects a model with one float input of shape `[batch, n_features]` and a
//! `probabilities` output of shape `[batch, n_classes]` (skl2onnx with
//! `zipmap=False`). Feature and class names live in a sidecar
//! `<model>.classes.json` next to the `.onnx` file.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use serde::Deserialize;
use tracing::info;

use crate::classifier::Classifier;
use crate::{ArtifactError, InferenceError};
use medguide_core::FeatureSchema;

const PROBABILITY_OUTPUT: &str = "probabilities";

/// Sidecar manifest describing the ONNX model's inputs and outputs.
#[derive(Debug, Deserialize)]
pub struct ModelManifest {
    pub feature_names: Vec<String>,
    pub classes: Vec<String>,
}

/// Classifier backed by an ONNX Runtime session.
///
/// `Session::run` needs `&mut self`, so the session sits behind a mutex and
/// concurrent requests are serialised here rather than in the pipeline.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
    feature_names: Vec<String>,
    classes: Vec<String>,
}

impl OnnxClassifier {
    /// Load `model.onnx` together with `model.classes.json`.
    pub fn load(model_path: &Path) -> Result<Self, ArtifactError> {
        if !model_path.exists() {
            return Err(ArtifactError::NotFound(model_path.to_path_buf()));
        }
        let manifest_path = manifest_path(model_path);
        if !manifest_path.exists() {
            return Err(ArtifactError::NotFound(manifest_path));
        }
        let bytes = std::fs::read(&manifest_path).map_err(|source| ArtifactError::Io {
            path: manifest_path.clone(),
            source,
        })?;
        let manifest: ModelManifest = serde_json::from_slice(&bytes)?;
        FeatureSchema::new(manifest.feature_names.clone())?;
        if manifest.classes.is_empty() {
            return Err(ArtifactError::Invalid("no classes in manifest".into()));
        }

        let session = Session::builder()?.commit_from_file(model_path)?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .ok_or_else(|| ArtifactError::Invalid("onnx model has no inputs".into()))?;
        if !session
            .outputs()
            .iter()
            .any(|o| o.name() == PROBABILITY_OUTPUT)
        {
            return Err(ArtifactError::Invalid(format!(
                "onnx model has no '{PROBABILITY_OUTPUT}' output"
            )));
        }

        info!(
            features = manifest.feature_names.len(),
            classes = manifest.classes.len(),
            model = %model_path.display(),
            "loaded onnx classifier"
        );
        Ok(Self {
            session: Mutex::new(session),
            input_name,
            feature_names: manifest.feature_names,
            classes: manifest.classes,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, InferenceError> {
        let n = self.feature_names.len();
        if features.len() != n {
            return Err(InferenceError::DimensionMismatch {
                expected: n,
                actual: features.len(),
            });
        }

        let shape = [1i64, n as i64];
        let input = Tensor::from_array((shape, features.to_vec().into_boxed_slice()))
            .map_err(|e| InferenceError::Backend(format!("build input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::Backend("onnx session lock poisoned".into()))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| InferenceError::Backend(format!("run session: {e}")))?;

        let (shape, data) = outputs[PROBABILITY_OUTPUT]
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Backend(format!("extract probabilities: {e}")))?;
        let dims: &[i64] = shape;
        if dims.len() != 2 || dims[0] != 1 || dims[1] as usize != self.classes.len() {
            return Err(InferenceError::Backend(format!(
                "unexpected output shape {dims:?}, expected [1, {}]",
                self.classes.len()
            )));
        }

        Ok(data.to_vec())
    }
}

/// `models/disease.onnx` → `models/disease.classes.json`.
fn manifest_path(model_path: &Path) -> PathBuf {
    model_path.with_extension("classes.json")
}
