//! Command line arguments of the `voc-eval` binary.
//!
//! Formats and coordinate types are taken as plain strings so that every
//! problem can be reported in one pass by [`Args::validate`], instead of
//! stopping at the first bad value.

use crate::error::{Result, VocEvalError};
use crate::evaluator::{EvaluationParams, DEFAULT_IOU_THRESHOLD};
use crate::types::{BoxFormat, CoordinateSpec, CoordinateType, ImageSize, InterpolationMethod};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(name = "voc-eval")]
#[command(about = "PASCAL VOC object detection metrics: per-class precision/recall, AP and mAP")]
#[command(version)]
pub struct Args {
    /// Folder with ground-truth annotation files
    #[arg(long, default_value = "groundtruths")]
    pub gt_folder: PathBuf,

    /// Folder with detection files
    #[arg(long, default_value = "detections")]
    pub det_folder: PathBuf,

    /// Ground-truth file layout: txt (one box per line) or voc (PASCAL VOC XML)
    #[arg(long, default_value = "txt")]
    pub gt_layout: String,

    /// IoU threshold for a detection to count as a true positive
    #[arg(short, long, default_value_t = DEFAULT_IOU_THRESHOLD)]
    pub threshold: f64,

    /// Ground-truth box format: xywh or xyrb
    #[arg(long, default_value = "xywh")]
    pub gt_format: String,

    /// Detection box format: xywh or xyrb
    #[arg(long, default_value = "xywh")]
    pub det_format: String,

    /// Ground-truth coordinates: abs or rel
    #[arg(long, default_value = "abs")]
    pub gt_coords: String,

    /// Detection coordinates: abs or rel
    #[arg(long, default_value = "abs")]
    pub det_coords: String,

    /// Image size as WIDTH,HEIGHT. Required with relative coordinates
    #[arg(long)]
    pub img_size: Option<String>,

    /// AP interpolation: every-point or eleven-point
    #[arg(long, default_value = "every-point")]
    pub method: String,

    /// Drop detections scoring below this confidence before evaluating
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Folder where results.txt, results.json and plots are written
    #[arg(long, default_value = "results")]
    pub save_path: PathBuf,

    /// Do not write precision/recall plots
    #[arg(long)]
    pub no_plot: bool,

    /// Overlay the interpolated precision on the plots
    #[arg(long)]
    pub show_interpolated: bool,

    /// Evaluate classes in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Ground-truth source layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundTruthLayout {
    Text,
    Voc,
}

/// Validated settings of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub gt_folder: PathBuf,
    pub det_folder: PathBuf,
    pub gt_layout: GroundTruthLayout,
    pub gt_spec: CoordinateSpec,
    pub det_spec: CoordinateSpec,
    pub params: EvaluationParams,
    pub min_confidence: Option<f64>,
    pub save_path: PathBuf,
    pub plot: bool,
    pub show_interpolated: bool,
}

impl Args {
    /// Maximum log level for the `-v` count.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }

    /// Check every argument and build the run configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VocEvalError::InvalidArguments`] listing every problem found.
    pub fn validate(&self) -> Result<RunConfig> {
        let mut errors = Vec::new();

        let gt_layout = match self.gt_layout.as_str() {
            "txt" => Some(GroundTruthLayout::Text),
            "voc" => Some(GroundTruthLayout::Voc),
            other => {
                errors.push(format!("--gt-layout: expected txt or voc, got '{other}'"));
                None
            }
        };

        let gt_format = parse_format(&self.gt_format, "--gt-format", &mut errors);
        let det_format = parse_format(&self.det_format, "--det-format", &mut errors);
        let gt_coords = parse_coordinates(&self.gt_coords, "--gt-coords", &mut errors);
        let det_coords = parse_coordinates(&self.det_coords, "--det-coords", &mut errors);

        let needs_size = gt_coords == Some(CoordinateType::Relative)
            || det_coords == Some(CoordinateType::Relative);
        let image_size = match (&self.img_size, needs_size) {
            (Some(raw), _) => match parse_img_size(raw) {
                Ok(size) => Some(size),
                Err(message) => {
                    errors.push(format!("--img-size: {message}"));
                    None
                }
            },
            (None, true) => {
                errors.push("--img-size is required with relative coordinates".to_string());
                None
            }
            (None, false) => None,
        };

        let method = match self.method.as_str() {
            "every-point" => Some(InterpolationMethod::EveryPoint),
            "eleven-point" => Some(InterpolationMethod::ElevenPoint),
            other => {
                errors.push(format!(
                    "--method: expected every-point or eleven-point, got '{other}'"
                ));
                None
            }
        };

        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            errors.push(format!(
                "--threshold: must be in (0.0, 1.0], got {}",
                self.threshold
            ));
        }
        if let Some(confidence) = self.min_confidence {
            if !(0.0..=1.0).contains(&confidence) {
                errors.push(format!(
                    "--min-confidence: must be in [0.0, 1.0], got {confidence}"
                ));
            }
        }

        check_dir(&self.gt_folder, "--gt-folder", &mut errors);
        check_dir(&self.det_folder, "--det-folder", &mut errors);

        let gt_spec = build_spec(gt_format, gt_coords, image_size, "--gt", &mut errors);
        let det_spec = build_spec(det_format, det_coords, image_size, "--det", &mut errors);

        match (gt_layout, gt_spec, det_spec, method) {
            (Some(gt_layout), Some(gt_spec), Some(det_spec), Some(method)) if errors.is_empty() => {
                Ok(RunConfig {
                    gt_folder: self.gt_folder.clone(),
                    det_folder: self.det_folder.clone(),
                    gt_layout,
                    gt_spec,
                    det_spec,
                    params: EvaluationParams {
                        iou_threshold: self.threshold,
                        method,
                        parallel: self.parallel,
                    },
                    min_confidence: self.min_confidence,
                    save_path: self.save_path.clone(),
                    plot: !self.no_plot,
                    show_interpolated: self.show_interpolated,
                })
            }
            _ => Err(VocEvalError::InvalidArguments(errors)),
        }
    }
}

/// Parse `WIDTH,HEIGHT` into an image size.
pub fn parse_img_size(raw: &str) -> std::result::Result<ImageSize, String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [width, height] = parts.as_slice() else {
        return Err(format!("expected WIDTH,HEIGHT, got '{raw}'"));
    };

    let parse = |value: &str| -> std::result::Result<u32, String> {
        match value.parse::<u32>() {
            Ok(0) | Err(_) => Err(format!("'{value}' is not a positive integer")),
            Ok(v) => Ok(v),
        }
    };

    Ok(ImageSize::new(parse(*width)?, parse(*height)?))
}

fn parse_format(raw: &str, flag: &str, errors: &mut Vec<String>) -> Option<BoxFormat> {
    match raw {
        "xywh" => Some(BoxFormat::Xywh),
        "xyrb" => Some(BoxFormat::Xyrb),
        other => {
            errors.push(format!("{flag}: expected xywh or xyrb, got '{other}'"));
            None
        }
    }
}

fn parse_coordinates(raw: &str, flag: &str, errors: &mut Vec<String>) -> Option<CoordinateType> {
    match raw {
        "abs" => Some(CoordinateType::Absolute),
        "rel" => Some(CoordinateType::Relative),
        other => {
            errors.push(format!("{flag}: expected abs or rel, got '{other}'"));
            None
        }
    }
}

fn build_spec(
    format: Option<BoxFormat>,
    coordinates: Option<CoordinateType>,
    image_size: Option<ImageSize>,
    prefix: &str,
    errors: &mut Vec<String>,
) -> Option<CoordinateSpec> {
    let spec = CoordinateSpec {
        format: format?,
        coordinates: coordinates?,
        image_size,
    };
    match spec.validate() {
        Ok(()) => Some(spec),
        // already reported against --img-size
        Err(VocEvalError::MissingImageSize(_)) => None,
        Err(err) => {
            errors.push(format!("{prefix}-format/{prefix}-coords: {err}"));
            None
        }
    }
}

fn check_dir(path: &Path, flag: &str, errors: &mut Vec<String>) {
    if !path.is_dir() {
        errors.push(format!("{flag}: folder '{}' not found", path.display()));
    }
}
