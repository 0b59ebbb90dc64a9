//! Precision/recall curve rendering.
//!
//! Curves are drawn on the unit square with a 0.1 grid and no text, so the
//! bitmap backend needs no font support.

use crate::error::{Result, VocEvalError};
use crate::types::{ClassMetrics, EvaluationSummary, InterpolationMethod};
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const PLOT_SIZE: (u32, u32) = (640, 480);
const GRID_COLOR: RGBColor = RGBColor(220, 220, 220);

fn plot_error<E: std::fmt::Display>(err: E) -> VocEvalError {
    VocEvalError::PlotError(err.to_string())
}

/// File name of a class plot, e.g. `dog_AP83.33.png`.
///
/// The plots carry no text, so the class and its AP go in the name. Path
/// separators in the class label are replaced.
pub fn plot_file_name(class: &str, average_precision: f64) -> String {
    let stem: String = class
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{stem}_AP{:.2}.png", average_precision * 100.0)
}

/// Render the precision/recall curve of one class to a PNG file.
///
/// The raw curve is drawn in blue. With `show_interpolated`, the every-point
/// envelope is overlaid as a red step line, or the eleven-point samples as
/// red dots.
pub fn plot_precision_recall_curve<P: AsRef<Path>>(
    metrics: &ClassMetrics,
    method: InterpolationMethod,
    path: P,
    show_interpolated: bool,
) -> Result<()> {
    let path = path.as_ref();
    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(0.0..1.0f64, 0.0..1.05f64)
        .map_err(plot_error)?;

    let grid = (0..=10).flat_map(|i| {
        let v = f64::from(i) / 10.0;
        [
            PathElement::new(vec![(v, 0.0), (v, 1.0)], GRID_COLOR),
            PathElement::new(vec![(0.0, v), (1.0, v)], GRID_COLOR),
        ]
    });
    chart.draw_series(grid).map_err(plot_error)?;

    if show_interpolated && !metrics.interpolated_recall.is_empty() {
        let points: Vec<(f64, f64)> = metrics
            .interpolated_recall
            .iter()
            .copied()
            .zip(metrics.interpolated_precision.iter().copied())
            .collect();

        match method {
            InterpolationMethod::EveryPoint => {
                chart
                    .draw_series(std::iter::once(PathElement::new(points, RED.stroke_width(1))))
                    .map_err(plot_error)?;
            }
            InterpolationMethod::ElevenPoint => {
                chart
                    .draw_series(points.into_iter().map(|p| Circle::new(p, 3, RED.filled())))
                    .map_err(plot_error)?;
            }
        }
    }

    let curve: Vec<(f64, f64)> = metrics
        .recall
        .iter()
        .copied()
        .zip(metrics.precision.iter().copied())
        .collect();
    chart
        .draw_series(std::iter::once(PathElement::new(curve, BLUE.stroke_width(2))))
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    tracing::debug!(class = %metrics.class, path = %path.display(), "wrote precision/recall plot");
    Ok(())
}

/// Render one plot per class with ground truth into `dir`.
pub fn plot_all<P: AsRef<Path>>(
    summary: &EvaluationSummary,
    dir: P,
    show_interpolated: bool,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for metrics in summary.classes.iter().filter(|m| m.has_positives()) {
        let path = dir.join(plot_file_name(&metrics.class, metrics.average_precision));
        plot_precision_recall_curve(metrics, summary.method, &path, show_interpolated)?;
        written.push(path);
    }

    Ok(written)
}
