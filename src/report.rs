//! Text and JSON reports of an evaluation.

use crate::error::Result;
use crate::types::{ClassMetrics, EvaluationSummary};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const RESULTS_TXT: &str = "results.txt";
pub const RESULTS_JSON: &str = "results.json";

/// Format a ratio as a percentage with two decimals, e.g. `83.33%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format a list of values as `['0.50', '1.00']`.
fn format_list(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("'{v:.2}'")).collect();
    format!("[{}]", items.join(", "))
}

/// mAP line, or `n/a` when no class has ground truth.
pub fn format_map(summary: &EvaluationSummary) -> String {
    match summary.mean_average_precision {
        Some(map) => format!("mAP: {}", format_percent(map)),
        None => "mAP: n/a (no ground truth)".to_string(),
    }
}

/// One-line AP summary of a class, as printed to the console.
pub fn format_class_ap(metrics: &ClassMetrics) -> String {
    format!("AP: {} ({})", format_percent(metrics.average_precision), metrics.class)
}

/// Render the `results.txt` report.
///
/// Classes without ground truth do not contribute to mAP and are left out.
///
/// # Example
///
/// ```
/// use voc_eval::report::format_results;
/// use voc_eval::types::{EvaluationSummary, InterpolationMethod};
///
/// let summary = EvaluationSummary {
///     iou_threshold: 0.5,
///     method: InterpolationMethod::EveryPoint,
///     classes: vec![],
///     mean_average_precision: None,
/// };
/// assert!(format_results(&summary).starts_with("Object Detection Metrics"));
/// ```
pub fn format_results(summary: &EvaluationSummary) -> String {
    let mut out = String::new();
    out.push_str("Object Detection Metrics\n");
    out.push_str(&format!(
        "IoU threshold: {}, interpolation: {}\n\n\n",
        summary.iou_threshold, summary.method
    ));
    out.push_str("Average Precision (AP), Precision and Recall per class:");

    for metrics in summary.classes.iter().filter(|m| m.has_positives()) {
        out.push_str(&format!("\n\nClass: {}", metrics.class));
        out.push_str(&format!("\nAP: {}", format_percent(metrics.average_precision)));
        out.push_str(&format!("\nPrecision: {}", format_list(&metrics.precision)));
        out.push_str(&format!("\nRecall: {}", format_list(&metrics.recall)));
    }

    out.push_str(&format!("\n\n\n{}\n", format_map(summary)));
    out
}

/// Write `results.txt` into `dir`, creating the directory if needed.
pub fn write_results_txt<P: AsRef<Path>>(summary: &EvaluationSummary, dir: P) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(RESULTS_TXT);
    fs::write(&path, format_results(summary))?;
    Ok(path)
}

/// Write the full summary as pretty JSON into `dir`.
pub fn write_results_json<P: AsRef<Path>>(summary: &EvaluationSummary, dir: P) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(RESULTS_JSON);
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.flush()?;
    Ok(path)
}
