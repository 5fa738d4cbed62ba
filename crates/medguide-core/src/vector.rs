//! Binary feature vectors aligned to a [`FeatureSchema`](crate::FeatureSchema).

/// Normalise a caller-supplied symptom label.
///
/// Trims surrounding whitespace; blank labels yield `None`.
pub fn normalize_symptom(label: &str) -> Option<&str> {
    let trimmed = label.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// A 0/1 vector with one position per schema feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    values: Vec<u8>,
}

impl FeatureVector {
    /// Wrap raw values. Any non-zero value is stored as 1.
    pub fn from_values(values: Vec<u8>) -> Self {
        let values = values.into_iter().map(|v| u8::from(v != 0)).collect();
        Self { values }
    }

    /// All-zero vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0; len],
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of positions set to 1.
    pub fn active_count(&self) -> usize {
        self.values.iter().filter(|&&v| v == 1).count()
    }

    /// Values widened to `f32`, the input type tree and tensor backends expect.
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|&v| f32::from(v)).collect()
    }
}
