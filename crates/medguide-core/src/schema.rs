//! The feature schema: the ordered symptom columns the classifier was trained on.
//!
//! Position `i` of every feature vector corresponds to `names()[i]`. The order
//! is taken verbatim from the training dataset header (label column removed)
//! and is never sorted or deduplicated afterwards.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use arrow::csv::reader::Format;
use arrow::datatypes::Schema;
use tracing::{info, warn};

use crate::SchemaLoadError;
use crate::vector::{FeatureVector, normalize_symptom};

/// Ordered, immutable list of symptom feature names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Build a schema from feature names in training order.
    ///
    /// Rejects an empty list and duplicate names, since either makes the
    /// position-to-symptom mapping ambiguous.
    pub fn new(names: Vec<String>) -> Result<Self, SchemaLoadError> {
        if names.is_empty() {
            return Err(SchemaLoadError::EmptyHeader);
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(SchemaLoadError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self { names })
    }

    /// Build a schema from a dataset header, dropping the label column.
    ///
    /// When the label column is absent the load fails, unless
    /// `allow_missing_label` is set, in which case every column is a feature.
    pub fn from_header<I, S>(
        columns: I,
        label_column: &str,
        allow_missing_label: bool,
    ) -> Result<Self, SchemaLoadError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let before = columns.len();
        let names: Vec<String> = columns.into_iter().filter(|c| c != label_column).collect();

        if names.len() == before {
            if !allow_missing_label {
                return Err(SchemaLoadError::MissingLabelColumn(label_column.to_string()));
            }
            warn!(
                label_column,
                "label column absent from header; using every column as a feature"
            );
        }

        Self::new(names)
    }

    /// Load the schema from the header of a CSV training dataset.
    pub fn load_csv(
        path: &Path,
        label_column: &str,
        allow_missing_label: bool,
    ) -> Result<Self, SchemaLoadError> {
        let header = read_csv_header(path)?;
        let schema = Self::from_header(
            header.fields().iter().map(|f| f.name().clone()),
            label_column,
            allow_missing_label,
        )?;
        info!(
            features = schema.len(),
            path = %path.display(),
            "loaded feature schema"
        );
        Ok(schema)
    }

    /// Feature names in vector order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of features (the feature vector length).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.position(symptom).is_some()
    }

    /// Vector position of a symptom, if it is part of the schema.
    pub fn position(&self, symptom: &str) -> Option<usize> {
        self.names.iter().position(|n| n == symptom)
    }

    /// Project a symptom selection onto this schema.
    ///
    /// Total over all inputs: unknown labels are ignored, duplicates collapse,
    /// and an empty selection yields an all-zero vector. Labels are trimmed;
    /// matching is otherwise exact.
    pub fn vectorize<I, S>(&self, selected: I) -> FeatureVector
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selected: Vec<S> = selected.into_iter().collect();
        let set: HashSet<&str> = selected
            .iter()
            .filter_map(|s| normalize_symptom(s.as_ref()))
            .collect();

        let values = self
            .names
            .iter()
            .map(|name| u8::from(set.contains(name.as_str())))
            .collect();
        FeatureVector::from_values(values)
    }

    /// Check that `other` has exactly the same names in the same order.
    ///
    /// `self` is the expected schema. Reports the first differing position.
    pub fn ensure_matches(&self, other: &FeatureSchema) -> Result<(), SchemaLoadError> {
        ensure_same_order(&self.names, &other.names)
    }
}

/// Compare two feature-name sequences position by position.
pub fn ensure_same_order(expected: &[String], found: &[String]) -> Result<(), SchemaLoadError> {
    let longest = expected.len().max(found.len());
    for position in 0..longest {
        let e = expected.get(position);
        let f = found.get(position);
        if e != f {
            return Err(SchemaLoadError::Drift {
                position,
                expected: e.cloned(),
                found: f.cloned(),
            });
        }
    }
    Ok(())
}

/// Read only the header of a CSV file as an Arrow schema.
fn read_csv_header(path: &Path) -> Result<Schema, SchemaLoadError> {
    if !path.exists() {
        return Err(SchemaLoadError::DatasetNotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| SchemaLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(BufReader::new(file), Some(1))?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn single_symptom_aligns_to_schema_position() {
        let s = schema(&["fever", "cough", "fatigue"]);
        assert_eq!(s.vectorize(["cough"]).as_slice(), &[0, 1, 0]);
    }

    #[test]
    fn full_match_sets_every_position() {
        let s = schema(&["fever", "cough", "fatigue"]);
        assert_eq!(
            s.vectorize(["fever", "cough", "fatigue"]).as_slice(),
            &[1, 1, 1]
        );
    }

    #[test]
    fn empty_selection_is_all_zeros() {
        let s = schema(&["fever", "cough", "fatigue"]);
        let v = s.vectorize(Vec::<String>::new());
        assert_eq!(v.as_slice(), &[0, 0, 0]);
        assert_eq!(v.len(), s.len());
    }

    #[test]
    fn unknown_labels_are_ignored() {
        let s = schema(&["fever", "cough", "fatigue"]);
        let v = s.vectorize(["fatigue", "hiccups", "not a symptom"]);
        assert_eq!(v.as_slice(), &[0, 0, 1]);
    }

    #[test]
    fn input_order_and_duplicates_do_not_matter() {
        let s = schema(&["fever", "cough", "fatigue"]);
        let a = s.vectorize(["fatigue", "fever"]);
        let b = s.vectorize(["fever", "fatigue", "fever"]);
        assert_eq!(a, b);
        assert_eq!(a.as_slice(), &[1, 0, 1]);
    }

    #[test]
    fn labels_are_trimmed_but_case_sensitive() {
        let s = schema(&["fever", "cough", "fatigue"]);
        assert_eq!(s.vectorize(["  cough "]).as_slice(), &[0, 1, 0]);
        assert_eq!(s.vectorize(["Cough"]).as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn header_drops_label_column_and_keeps_order() {
        let s = FeatureSchema::from_header(["zeta", "diseases", "alpha", "mid"], "diseases", false)
            .unwrap();
        assert_eq!(s.names(), &["zeta", "alpha", "mid"]);
    }

    #[test]
    fn missing_label_column_is_fatal_by_default() {
        let err = FeatureSchema::from_header(["fever", "cough"], "diseases", false).unwrap_err();
        assert!(matches!(err, SchemaLoadError::MissingLabelColumn(ref c) if c == "diseases"));
    }

    #[test]
    fn missing_label_column_can_be_allowed() {
        let s = FeatureSchema::from_header(["fever", "cough"], "diseases", true).unwrap();
        assert_eq!(s.names(), &["fever", "cough"]);
    }

    #[test]
    fn duplicate_columns_rejected() {
        let err =
            FeatureSchema::from_header(["fever", "cough", "fever", "diseases"], "diseases", false)
                .unwrap_err();
        assert!(matches!(err, SchemaLoadError::DuplicateColumn(ref c) if c == "fever"));
    }

    #[test]
    fn label_only_header_is_empty() {
        let err = FeatureSchema::from_header(["diseases"], "diseases", false).unwrap_err();
        assert!(matches!(err, SchemaLoadError::EmptyHeader));
    }

    #[test]
    fn load_csv_reads_header() {
        let file = write_csv("diseases,fever,cough,fatigue\nflu,1,1,0\ncold,0,1,0\n");
        let s = FeatureSchema::load_csv(file.path(), "diseases", false).unwrap();
        assert_eq!(s.names(), &["fever", "cough", "fatigue"]);
    }

    #[test]
    fn load_csv_header_only_file() {
        let file = write_csv("fever,cough,diseases\n");
        let s = FeatureSchema::load_csv(file.path(), "diseases", false).unwrap();
        assert_eq!(s.names(), &["fever", "cough"]);
    }

    #[test]
    fn load_csv_missing_file() {
        let err = FeatureSchema::load_csv(Path::new("/nonexistent/disease.csv"), "diseases", false)
            .unwrap_err();
        assert!(matches!(err, SchemaLoadError::DatasetNotFound(_)));
    }

    #[test]
    fn ensure_matches_accepts_identical_order() {
        let a = schema(&["fever", "cough"]);
        let b = schema(&["fever", "cough"]);
        assert!(a.ensure_matches(&b).is_ok());
    }

    #[test]
    fn ensure_matches_reports_first_reordered_position() {
        let a = schema(&["fever", "cough", "fatigue"]);
        let b = schema(&["fever", "fatigue", "cough"]);
        match a.ensure_matches(&b).unwrap_err() {
            SchemaLoadError::Drift {
                position,
                expected,
                found,
            } => {
                assert_eq!(position, 1);
                assert_eq!(expected.as_deref(), Some("cough"));
                assert_eq!(found.as_deref(), Some("fatigue"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ensure_matches_reports_length_difference() {
        let a = schema(&["fever", "cough"]);
        let b = schema(&["fever", "cough", "rash"]);
        match a.ensure_matches(&b).unwrap_err() {
            SchemaLoadError::Drift {
                position,
                expected,
                found,
            } => {
                assert_eq!(position, 2);
                assert!(expected.is_none());
                assert_eq!(found.as_deref(), Some("rash"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn position_lookup() {
        let s = schema(&["fever", "cough", "fatigue"]);
        assert_eq!(s.position("fatigue"), Some(2));
        assert!(s.contains("fever"));
        assert!(!s.contains("rash"));
    }
}
