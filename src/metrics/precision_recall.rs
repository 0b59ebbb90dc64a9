//! Cumulative precision and recall over a ranked list of detections.

use serde::{Deserialize, Serialize};

/// Precision/recall curve over detections sorted by descending confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecisionRecallCurve {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub true_positives: usize,
    pub false_positives: usize,
}

/// Precision at one rank. Defined as 0.0 when nothing has been retrieved yet.
pub fn calculate_precision(tp: usize, fp: usize) -> f64 {
    let denominator = tp + fp;
    if denominator == 0 {
        return 0.0;
    }
    tp as f64 / denominator as f64
}

/// Recall at one rank. Defined as 0.0 for a class without ground truth,
/// which is then left out of mAP.
pub fn calculate_recall(tp: usize, total_positives: usize) -> f64 {
    if total_positives == 0 {
        return 0.0;
    }
    tp as f64 / total_positives as f64
}

/// Build the cumulative precision-recall curve.
///
/// # Arguments
///
/// * `is_true_positive` - TP flag per detection, sorted by confidence (descending)
/// * `total_positives` - Number of ground-truth boxes of the class
///
/// # Example
///
/// ```
/// use voc_eval::metrics::precision_recall::calculate_precision_recall_curve;
///
/// let curve = calculate_precision_recall_curve(&[true, false, true], 4);
/// assert_eq!(curve.recall, vec![0.25, 0.25, 0.5]);
/// assert_eq!(curve.true_positives, 2);
/// ```
pub fn calculate_precision_recall_curve(
    is_true_positive: &[bool],
    total_positives: usize,
) -> PrecisionRecallCurve {
    let mut curve = PrecisionRecallCurve {
        precision: Vec::with_capacity(is_true_positive.len()),
        recall: Vec::with_capacity(is_true_positive.len()),
        ..Default::default()
    };

    for &is_tp in is_true_positive {
        if is_tp {
            curve.true_positives += 1;
        } else {
            curve.false_positives += 1;
        }

        curve
            .precision
            .push(calculate_precision(curve.true_positives, curve.false_positives));
        curve
            .recall
            .push(calculate_recall(curve.true_positives, total_positives));
    }

    curve
}
