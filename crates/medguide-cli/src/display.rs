//! Plain-text rendering for CLI output.

use std::fmt::Write;

use medguide_ai::{EvalReport, Prediction};
use medguide_core::FeatureSchema;

const BAR_WIDTH: usize = 30;

/// Feature names with their vector positions.
pub fn render_schema(schema: &FeatureSchema) -> String {
    let mut out = String::new();
    for (i, name) in schema.names().iter().enumerate() {
        let _ = writeln!(out, "{i:>4}  {name}");
    }
    let _ = writeln!(out, "{} features", schema.len());
    out
}

/// One line per ranked diagnosis with a probability bar.
pub fn render_ranked(ranked: &[Prediction]) -> String {
    let width = ranked.iter().map(|p| p.label.len()).max().unwrap_or(0);
    let mut out = String::new();
    for p in ranked {
        let filled = (p.confidence.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
        let _ = writeln!(
            out,
            "  {:<width$}  {:>6.1}%  {}",
            p.label,
            p.confidence * 100.0,
            "#".repeat(filled),
        );
    }
    out
}

/// Accuracy summary followed by a per-class table.
pub fn render_eval_report(report: &EvalReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== Evaluation ===\n  rows        {}\n  correct     {}\n  accuracy    {:.2}%",
        report.total,
        report.correct,
        report.accuracy() * 100.0
    );
    if report.unlabelled > 0 {
        let _ = writeln!(out, "  unlabelled  {}", report.unlabelled);
    }
    if report.per_class.is_empty() {
        return out;
    }

    let width = report
        .per_class
        .keys()
        .map(|k| k.len())
        .max()
        .unwrap_or(0)
        .max("class".len());
    let _ = writeln!(out, "\n  {:<width$}  {:>7}  {:>7}", "class", "hits", "support");
    for (label, tally) in &report.per_class {
        let _ = writeln!(
            out,
            "  {:<width$}  {:>7}  {:>7}",
            label, tally.hits, tally.support
        );
    }
    out
}
