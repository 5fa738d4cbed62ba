//! Inference layer: classifier artifacts (JSON forest, optional ONNX) and the
//! symptom-to-diagnosis pipeline built on top of them.

mod artifact;
pub mod classifier;
mod error;
pub mod evaluate;
pub mod forest;
#[cfg(feature = "onnx")]
pub mod onnx;
mod pipeline;

pub use artifact::load_classifier;
pub use classifier::{Classifier, Prediction};
pub use error::{ArtifactError, InferenceError, PipelineError};
pub use evaluate::{ClassTally, EvalReport, evaluate, read_csv_batches};
pub use forest::{ForestArtifact, ForestClassifier};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use pipeline::InferencePipeline;
