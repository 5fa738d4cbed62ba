//! Decision-forest classifier loaded from a JSON artifact.
//!
//! The artifact carries its own `feature_names`, so the column order the
//! trees were trained on travels with the model instead of being re-derived
//! from a separately maintained dataset.
//!
//! Traversal follows scikit-learn trees: at a split go left iff
//! `x[feature] <= threshold`. Each leaf holds per-class weights, normalised to
//! a distribution; distributions are averaged across trees.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::{Classifier, normalize_distribution};
use crate::{ArtifactError, InferenceError};
use medguide_core::FeatureSchema;

/// Artifact layout version understood by this loader.
pub const FORMAT_VERSION: u32 = 1;

/// On-disk forest artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    pub classes: Vec<String>,
    pub trees: Vec<DecisionTree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Node 0 is the root. Children always have larger indices than their parent.
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f32>,
    },
}

/// A validated forest, ready for inference.
#[derive(Debug)]
pub struct ForestClassifier {
    feature_names: Vec<String>,
    classes: Vec<String>,
    trees: Vec<DecisionTree>,
}

impl ForestClassifier {
    /// Read and validate a forest artifact from disk.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: ForestArtifact = serde_json::from_slice(&bytes)?;
        let forest = Self::from_artifact(artifact)?;

        info!(
            trees = forest.trees.len(),
            features = forest.feature_names.len(),
            classes = forest.classes.len(),
            model = %path.display(),
            "loaded forest classifier"
        );
        Ok(forest)
    }

    /// Validate an in-memory artifact.
    pub fn from_artifact(artifact: ForestArtifact) -> Result<Self, ArtifactError> {
        if artifact.format_version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion(artifact.format_version));
        }
        // Same rules as the dataset header: non-empty, no duplicates.
        FeatureSchema::new(artifact.feature_names.clone())?;

        if artifact.classes.is_empty() {
            return Err(ArtifactError::Invalid("no classes".into()));
        }
        if artifact.trees.is_empty() {
            return Err(ArtifactError::Invalid("no trees".into()));
        }

        let n_features = artifact.feature_names.len();
        let n_classes = artifact.classes.len();
        for (t, tree) in artifact.trees.iter().enumerate() {
            validate_tree(t, tree, n_features, n_classes)?;
        }

        Ok(Self {
            feature_names: artifact.feature_names,
            classes: artifact.classes,
            trees: artifact.trees,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for ForestClassifier {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, InferenceError> {
        if features.len() != self.feature_names.len() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.feature_names.len(),
                actual: features.len(),
            });
        }

        let mut sum = vec![0.0f32; self.classes.len()];
        for tree in &self.trees {
            let mut dist = tree.leaf_for(features).to_vec();
            normalize_distribution(&mut dist);
            for (acc, p) in sum.iter_mut().zip(&dist) {
                *acc += p;
            }
        }

        let n = self.trees.len() as f32;
        for v in &mut sum {
            *v /= n;
        }
        Ok(sum)
    }
}

impl DecisionTree {
    /// Walk from the root to a leaf. Validation guarantees termination.
    fn leaf_for(&self, features: &[f32]) -> &[f32] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

fn validate_tree(
    t: usize,
    tree: &DecisionTree,
    n_features: usize,
    n_classes: usize,
) -> Result<(), ArtifactError> {
    if tree.nodes.is_empty() {
        return Err(ArtifactError::Invalid(format!("tree {t} has no nodes")));
    }
    let n_nodes = tree.nodes.len();

    for (i, node) in tree.nodes.iter().enumerate() {
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= n_features {
                    return Err(ArtifactError::Invalid(format!(
                        "tree {t} node {i}: feature index {feature} out of range ({n_features} features)"
                    )));
                }
                if !threshold.is_finite() {
                    return Err(ArtifactError::Invalid(format!(
                        "tree {t} node {i}: non-finite threshold"
                    )));
                }
                for child in [*left, *right] {
                    if child <= i || child >= n_nodes {
                        return Err(ArtifactError::Invalid(format!(
                            "tree {t} node {i}: child index {child} must be in {}..{n_nodes}",
                            i + 1
                        )));
                    }
                }
            }
            TreeNode::Leaf { value } => {
                if value.len() != n_classes {
                    return Err(ArtifactError::Invalid(format!(
                        "tree {t} node {i}: leaf has {} values for {n_classes} classes",
                        value.len()
                    )));
                }
                if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err(ArtifactError::Invalid(format!(
                        "tree {t} node {i}: leaf weights must be finite and non-negative"
                    )));
                }
            }
        }
    }
    Ok(())
}
