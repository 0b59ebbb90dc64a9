//! Metric calculations for PASCAL VOC evaluation.

pub mod ap;
pub mod iou;
pub mod precision_recall;

pub use ap::{calculate_ap, calculate_map, InterpolatedAp};
pub use iou::calculate_iou;
pub use precision_recall::{
    calculate_precision, calculate_precision_recall_curve, calculate_recall, PrecisionRecallCurve,
};
