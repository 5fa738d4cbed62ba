//! The classifier seam: any backend that turns one feature vector into a
//! probability per class.
//!
//! Backends are loaded once at startup and shared read-only across requests,
//! so implementations must be `Send + Sync`. A backend whose runtime needs
//! exclusive access serialises itself internally.

use crate::InferenceError;

/// A trained symptom classifier.
pub trait Classifier: Send + Sync {
    /// Feature names in the order the model was trained on.
    fn feature_names(&self) -> &[String];

    /// Class labels, indexed the same way as [`predict_proba`](Self::predict_proba) output.
    fn classes(&self) -> &[String];

    /// Probability per class for a single 0/1 feature vector.
    ///
    /// Callers guarantee `features.len() == self.input_dim()`.
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, InferenceError>;

    /// Expected feature vector length.
    fn input_dim(&self) -> usize {
        self.feature_names().len()
    }
}

/// A single predicted diagnosis.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

/// Pick the most probable class. Ties resolve to the lowest class index.
pub(crate) fn best_class(classes: &[String], probs: &[f32]) -> Result<Prediction, InferenceError> {
    check_output_len(classes, probs)?;

    let mut best_idx = 0;
    let mut best_p = f32::NEG_INFINITY;
    for (i, &p) in probs.iter().enumerate() {
        if p > best_p {
            best_p = p;
            best_idx = i;
        }
    }

    Ok(Prediction {
        label: classes[best_idx].clone(),
        confidence: best_p,
    })
}

/// The `k` most probable classes, highest first. Equal probabilities keep class order.
pub(crate) fn top_classes(
    classes: &[String],
    probs: &[f32],
    k: usize,
) -> Result<Vec<Prediction>, InferenceError> {
    check_output_len(classes, probs)?;

    let mut ranked: Vec<(usize, f32)> = probs.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(ranked
        .into_iter()
        .take(k)
        .map(|(i, p)| Prediction {
            label: classes[i].clone(),
            confidence: p,
        })
        .collect())
}

fn check_output_len(classes: &[String], probs: &[f32]) -> Result<(), InferenceError> {
    if probs.is_empty() || probs.len() != classes.len() {
        return Err(InferenceError::Backend(format!(
            "classifier returned {} scores for {} classes",
            probs.len(),
            classes.len()
        )));
    }
    if probs.iter().any(|p| p.is_nan()) {
        return Err(InferenceError::Backend("classifier returned NaN".into()));
    }
    Ok(())
}

/// Scale non-negative weights so they sum to 1. All-zero input is left as is.
pub(crate) fn normalize_distribution(v: &mut [f32]) {
    let total: f32 = v.iter().sum();
    if total > 0.0 {
        for x in v.iter_mut() {
            *x /= total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> Vec<String> {
        ["Allergy", "GERD", "Malaria"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn best_class_picks_highest() {
        let p = best_class(&classes(), &[0.1, 0.7, 0.2]).unwrap();
        assert_eq!(p.label, "GERD");
        assert!((p.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn best_class_ties_go_to_lowest_index() {
        let p = best_class(&classes(), &[0.4, 0.2, 0.4]).unwrap();
        assert_eq!(p.label, "Allergy");
    }

    #[test]
    fn best_class_rejects_wrong_length() {
        let err = best_class(&classes(), &[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, InferenceError::Backend(_)));
    }

    #[test]
    fn best_class_rejects_nan() {
        let err = best_class(&classes(), &[0.5, f32::NAN, 0.1]).unwrap_err();
        assert!(matches!(err, InferenceError::Backend(_)));
    }

    #[test]
    fn top_classes_sorted_descending() {
        let top = top_classes(&classes(), &[0.2, 0.3, 0.5], 2).unwrap();
        let labels: Vec<&str> = top.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Malaria", "GERD"]);
    }

    #[test]
    fn top_classes_k_larger_than_classes() {
        let top = top_classes(&classes(), &[0.2, 0.3, 0.5], 10).unwrap();
        assert_eq!(top.len(), 3);
    }

    #[test]
    fn normalize_distribution_sums_to_one() {
        let mut v = vec![1.0, 3.0, 0.0];
        normalize_distribution(&mut v);
        assert!((v[0] - 0.25).abs() < 1e-6);
        assert!((v[1] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn normalize_distribution_all_zero_unchanged() {
        let mut v = vec![0.0, 0.0];
        normalize_distribution(&mut v);
        assert_eq!(v, vec![0.0, 0.0]);
    }
}
