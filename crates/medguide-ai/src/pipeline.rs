//! Symptom selection → feature vector → diagnosis.
//!
//! The pipeline is built once at startup from a [`PipelineConfig`] and then
//! shared read-only (typically behind an `Arc`). Construction fails if the
//! classifier cannot be loaded or if the dataset header disagrees with the
//! feature order the classifier was trained on.

use medguide_core::{FeatureSchema, FeatureVector, PipelineConfig};
use tracing::{debug, info};

use crate::classifier::{Classifier, Prediction, best_class, top_classes};
use crate::{InferenceError, PipelineError, load_classifier};

pub struct InferencePipeline {
    schema: FeatureSchema,
    classifier: Box<dyn Classifier>,
}

impl std::fmt::Debug for InferencePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferencePipeline")
            .field("features", &self.schema.len())
            .field("classes", &self.classifier.classes().len())
            .finish()
    }
}

impl InferencePipeline {
    /// Load the classifier and, if configured, check it against the dataset header.
    pub fn load(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let classifier = load_classifier(&config.model_path)?;
        let schema = match &config.dataset_path {
            Some(path) => Some(FeatureSchema::load_csv(
                path,
                &config.label_column,
                config.allow_missing_label,
            )?),
            None => None,
        };
        Self::new(classifier, schema)
    }

    /// Assemble a pipeline from an already loaded classifier.
    ///
    /// The classifier's own feature names define the vector order. A
    /// `dataset_schema`, when given, must list the same names in the same order.
    pub fn new(
        classifier: Box<dyn Classifier>,
        dataset_schema: Option<FeatureSchema>,
    ) -> Result<Self, PipelineError> {
        let schema = FeatureSchema::new(classifier.feature_names().to_vec())?;
        if let Some(dataset) = &dataset_schema {
            schema.ensure_matches(dataset)?;
            debug!("dataset header matches classifier feature order");
        }

        info!(
            features = schema.len(),
            classes = classifier.classes().len(),
            "inference pipeline ready"
        );
        Ok(Self { schema, classifier })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn classes(&self) -> &[String] {
        self.classifier.classes()
    }

    /// Project a symptom selection onto the feature schema. Never fails.
    pub fn vectorize<I, S>(&self, selected: I) -> FeatureVector
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.schema.vectorize(selected)
    }

    /// Predict the single most likely diagnosis for a symptom selection.
    pub fn predict<I, S>(&self, selected: I) -> Result<Prediction, InferenceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vector = self.vectorize(selected);
        self.predict_vector(&vector)
    }

    /// Predict from an already built feature vector.
    pub fn predict_vector(&self, vector: &FeatureVector) -> Result<Prediction, InferenceError> {
        let probs = self.scores(vector)?;
        let prediction = best_class(self.classifier.classes(), &probs)?;
        debug!(
            active = vector.active_count(),
            label = %prediction.label,
            confidence = prediction.confidence,
            "prediction"
        );
        Ok(prediction)
    }

    /// The `k` most likely diagnoses, highest probability first.
    pub fn rank<I, S>(&self, selected: I, k: usize) -> Result<Vec<Prediction>, InferenceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vector = self.vectorize(selected);
        let probs = self.scores(&vector)?;
        top_classes(self.classifier.classes(), &probs, k)
    }

    /// Best diagnosis plus the `k` most likely, from a single classifier call.
    pub fn predict_ranked<I, S>(
        &self,
        selected: I,
        k: usize,
    ) -> Result<(Prediction, Vec<Prediction>), InferenceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vector = self.vectorize(selected);
        let probs = self.scores(&vector)?;
        let classes = self.classifier.classes();
        Ok((
            best_class(classes, &probs)?,
            top_classes(classes, &probs, k)?,
        ))
    }

    fn scores(&self, vector: &FeatureVector) -> Result<Vec<f32>, InferenceError> {
        let expected = self.classifier.input_dim();
        if vector.len() != expected {
            return Err(InferenceError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }
        self.classifier.predict_proba(&vector.to_f32())
    }
}
