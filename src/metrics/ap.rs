//! Average Precision (AP) and mean Average Precision (mAP) calculation.

use crate::types::{ClassMetrics, InterpolationMethod};

/// Average Precision together with the curve it was integrated from.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedAp {
    pub ap: f64,
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
}

/// Calculate Average Precision with the selected interpolation.
///
/// # Arguments
///
/// * `recalls` - Cumulative recall, one value per ranked detection
/// * `precisions` - Cumulative precision, parallel to `recalls`
/// * `method` - Interpolation method
pub fn calculate_ap(recalls: &[f64], precisions: &[f64], method: InterpolationMethod) -> InterpolatedAp {
    match method {
        InterpolationMethod::EveryPoint => every_point_interpolated_ap(recalls, precisions),
        InterpolationMethod::ElevenPoint => eleven_point_interpolated_ap(recalls, precisions),
    }
}

/// Area under the monotone precision envelope.
///
/// Recall is padded with 0 and 1, precision with 0 on both ends. Precision is
/// replaced by its running maximum from the right, then summed as a step
/// function over every index where recall changes.
///
/// The returned curve is the padded recall and the envelope, without the
/// trailing padding point.
///
/// # Example
///
/// ```
/// use voc_eval::metrics::ap::every_point_interpolated_ap;
///
/// let result = every_point_interpolated_ap(&[0.5, 1.0], &[1.0, 1.0]);
/// assert!((result.ap - 1.0).abs() < 1e-12);
/// ```
pub fn every_point_interpolated_ap(recalls: &[f64], precisions: &[f64]) -> InterpolatedAp {
    let mut mrec = Vec::with_capacity(recalls.len() + 2);
    mrec.push(0.0);
    mrec.extend_from_slice(recalls);
    mrec.push(1.0);

    let mut mpre = Vec::with_capacity(precisions.len() + 2);
    mpre.push(0.0);
    mpre.extend_from_slice(precisions);
    mpre.push(0.0);

    for i in (1..mpre.len()).rev() {
        mpre[i - 1] = mpre[i - 1].max(mpre[i]);
    }

    let ap = (1..mrec.len())
        .filter(|&i| mrec[i] != mrec[i - 1])
        .map(|i| (mrec[i] - mrec[i - 1]) * mpre[i])
        .sum();

    mrec.pop();
    mpre.pop();

    InterpolatedAp {
        ap,
        precision: mpre,
        recall: mrec,
    }
}

/// 11-point interpolated Average Precision (PASCAL VOC 2007 paper).
///
/// For each recall level 1.0, 0.9, ..., 0.0 takes the highest precision
/// reached at any recall at or above that level, and averages the 11 values.
/// The returned curve holds the levels and their interpolated precision.
pub fn eleven_point_interpolated_ap(recalls: &[f64], precisions: &[f64]) -> InterpolatedAp {
    let levels: Vec<f64> = (0..=10).rev().map(|k| f64::from(k) / 10.0).collect();

    let rho: Vec<f64> = levels
        .iter()
        .map(|&level| {
            recalls
                .iter()
                .zip(precisions)
                .filter(|(&r, _)| r >= level)
                .map(|(_, &p)| p)
                .fold(0.0f64, f64::max)
        })
        .collect();

    let ap = rho.iter().sum::<f64>() / 11.0;

    InterpolatedAp {
        ap,
        precision: rho,
        recall: levels,
    }
}

/// Calculate mean Average Precision over classes with ground truth.
///
/// Classes with no positives are skipped. Returns `None` when no class is left.
///
/// # Example
///
/// ```
/// use voc_eval::metrics::ap::calculate_map;
///
/// assert_eq!(calculate_map(&[]), None);
/// ```
pub fn calculate_map(classes: &[ClassMetrics]) -> Option<f64> {
    let aps: Vec<f64> = classes
        .iter()
        .filter(|metrics| metrics.has_positives())
        .map(|metrics| metrics.average_precision)
        .collect();

    if aps.is_empty() {
        return None;
    }

    Some(aps.iter().sum::<f64>() / aps.len() as f64)
}
