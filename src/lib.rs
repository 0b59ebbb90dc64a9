//! # voc-eval
//!
//! A Rust library for PASCAL VOC object detection metrics.
//!
//! This library provides implementations of the VOC challenge metrics:
//! - **Precision** and **Recall** curves per class, ranked by detection confidence
//! - **AP** (Average Precision) with every-point or 11-point interpolation
//! - **mAP** (mean Average Precision) over classes with ground truth
//!
//! ## Features
//!
//! - Load one-box-per-line text annotations (absolute or relative coordinates)
//! - Load PASCAL VOC XML ground truth, skipping `difficult` objects
//! - Greedy one-to-one matching of detections to ground truth by IoU
//! - Write `results.txt`, `results.json` and precision/recall plots
//!
//! ## Quick Start
//!
//! ```rust
//! use voc_eval::collection::AnnotationCollection;
//! use voc_eval::evaluator::{evaluate_with_params, EvaluationParams};
//! use voc_eval::types::{Annotation, Rectangle};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut collection = AnnotationCollection::new();
//! let gt = Rectangle::from_xywh(10.0, 10.0, 100.0, 80.0)?;
//! let det = Rectangle::from_xywh(12.0, 8.0, 100.0, 80.0)?;
//! collection.push(Annotation::ground_truth("000001", "dog", gt));
//! collection.push(Annotation::detection("000001", "dog", det, 0.88)?);
//!
//! let summary = evaluate_with_params(&collection, &EvaluationParams::default())?;
//! println!("mAP: {:?}", summary.mean_average_precision);
//! # Ok(())
//! # }
//! ```
//!
//! ## Text Format
//!
//! One file per image, named after the image. Ground truth lines:
//!
//! ```text
//! <class> <left> <top> <width> <height>
//! ```
//!
//! Detection lines carry a confidence after the class:
//!
//! ```text
//! <class> <confidence> <left> <top> <width> <height>
//! ```

pub mod cli;
pub mod collection;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod matching;
pub mod metrics;
pub mod plot;
pub mod report;
pub mod stats;
pub mod threshold;
pub mod types;
pub mod voc;

// Re-export commonly used types and functions
pub use collection::AnnotationCollection;
pub use error::{Result, VocEvalError};
pub use evaluator::{evaluate, evaluate_with_params, EvaluationParams};
pub use loader::load_text_dir;
pub use threshold::filter_by_confidence;
pub use types::{
    Annotation, BoxFormat, BoxRole, ClassMetrics, CoordinateSpec, CoordinateType,
    EvaluationSummary, ImageSize, InterpolationMethod, Rectangle,
};
pub use voc::load_voc_dir;
