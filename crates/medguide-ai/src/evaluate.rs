//! Score the pipeline against a labelled dataset.
//!
//! Reads the training-format CSV as Arrow record batches, rebuilds each row's
//! feature vector in schema order (any value > 0 counts as present), and
//! compares the prediction with the row's label.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use arrow::array::{Array, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use medguide_core::FeatureVector;
use tracing::info;

use crate::InferencePipeline;

/// Per-class hit counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassTally {
    /// Rows whose ground-truth label is this class.
    pub support: usize,
    /// Of those, rows predicted correctly.
    pub hits: usize,
}

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, Default)]
pub struct EvalReport {
    pub total: usize,
    pub correct: usize,
    /// Rows skipped because the label was null.
    pub unlabelled: usize,
    pub per_class: BTreeMap<String, ClassTally>,
}

impl EvalReport {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Read a CSV with a header row into Arrow record batches.
pub fn read_csv_batches(path: &Path) -> anyhow::Result<Vec<RecordBatch>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(BufReader::new(file), None)
        .with_context(|| format!("inferring schema of {}", path.display()))?;

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(true)
        .build(file)?;
    let batches = reader
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("reading {}", path.display()))?;

    let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    info!(rows, path = %path.display(), "read dataset");
    Ok(batches)
}

/// Predict every labelled row and tally the results.
pub fn evaluate(
    pipeline: &InferencePipeline,
    batches: &[RecordBatch],
    label_column: &str,
) -> anyhow::Result<EvalReport> {
    let mut report = EvalReport::default();

    for batch in batches {
        let labels = batch
            .column_by_name(label_column)
            .ok_or_else(|| anyhow::anyhow!("missing label column '{label_column}'"))?;
        let labels = cast(labels, &DataType::Utf8)?;
        let labels = labels
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| anyhow::anyhow!("label column is not castable to text"))?;

        // Feature columns in schema order, cast to f64 once per batch.
        let mut features = Vec::with_capacity(pipeline.schema().len());
        for name in pipeline.schema().names() {
            let col = batch
                .column_by_name(name)
                .ok_or_else(|| anyhow::anyhow!("missing feature column '{name}'"))?;
            features.push(cast(col, &DataType::Float64)?);
        }
        let features: Vec<&Float64Array> = features
            .iter()
            .map(|c| {
                c.as_any()
                    .downcast_ref::<Float64Array>()
                    .ok_or_else(|| anyhow::anyhow!("feature column is not numeric"))
            })
            .collect::<anyhow::Result<_>>()?;

        for row in 0..batch.num_rows() {
            if labels.is_null(row) {
                report.unlabelled += 1;
                continue;
            }
            let truth = labels.value(row).trim();

            let values = features
                .iter()
                .map(|col| u8::from(!col.is_null(row) && col.value(row) > 0.0))
                .collect();
            let vector = FeatureVector::from_values(values);
            let prediction = pipeline.predict_vector(&vector)?;

            let tally = report.per_class.entry(truth.to_string()).or_default();
            tally.support += 1;
            report.total += 1;
            if prediction.label == truth {
                tally.hits += 1;
                report.correct += 1;
            }
        }
    }

    info!(
        total = report.total,
        correct = report.correct,
        accuracy = report.accuracy(),
        "evaluation complete"
    );
    Ok(report)
}
