//! Greedy one-to-one matching of detections to ground truth for one class.

use crate::error::Result;
use crate::metrics::iou::calculate_iou;
use crate::types::Annotation;
use std::collections::HashMap;

/// Outcome of matching a single detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Position of the detection in the input slice
    pub detection_index: usize,
    pub image: String,
    pub confidence: f64,
    /// Best IoU found among ground truths of the same image (0.0 if none)
    pub iou: f64,
    /// Index of the claimed ground truth within its image, for true positives
    pub matched_ground_truth: Option<usize>,
    pub is_true_positive: bool,
}

/// Match detections of one class to the ground truths of the same class.
///
/// Detections are visited in descending confidence (stable, so equal scores
/// keep input order). Each detection looks at the ground truths of its own
/// image and picks the one with the highest IoU; on equal IoU the first in
/// input order wins. It is a true positive if that IoU reaches
/// `iou_threshold` and the ground truth is still unclaimed. A claimed ground
/// truth never yields another true positive, so duplicate detections of the
/// same object are false positives even at perfect overlap.
///
/// Claimed flags live in a per-call map of per-image vectors.
///
/// # Arguments
///
/// * `detections` - Detections of one class
/// * `ground_truths` - Ground truths of the same class
/// * `iou_threshold` - Minimum IoU to consider a match
///
/// # Returns
///
/// Returns one `Match` per detection, sorted by confidence (descending).
pub fn match_detections(
    detections: &[&Annotation],
    ground_truths: &[&Annotation],
    iou_threshold: f64,
) -> Result<Vec<Match>> {
    let gt_by_image = group_by_image(ground_truths);
    let mut claimed: HashMap<&str, Vec<bool>> = gt_by_image
        .iter()
        .map(|(&image, gts)| (image, vec![false; gts.len()]))
        .collect();

    let mut order: Vec<usize> = (0..detections.len()).collect();
    order.sort_by(|&a, &b| detections[b].score().total_cmp(&detections[a].score()));

    let mut matches = Vec::with_capacity(detections.len());

    for detection_index in order {
        let detection = detections[detection_index];
        let candidates = gt_by_image
            .get(detection.image())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut best_iou = 0.0;
        let mut best_gt: Option<usize> = None;
        for (gt_idx, gt) in candidates.iter().enumerate() {
            let iou = calculate_iou(detection.rect(), gt.rect())?;
            if iou > best_iou {
                best_iou = iou;
                best_gt = Some(gt_idx);
            }
        }

        let mut matched_ground_truth = None;
        if let Some(gt_idx) = best_gt.filter(|_| best_iou >= iou_threshold) {
            if let Some(flags) = claimed.get_mut(detection.image()) {
                if !flags[gt_idx] {
                    flags[gt_idx] = true;
                    matched_ground_truth = Some(gt_idx);
                }
            }
        }

        matches.push(Match {
            detection_index,
            image: detection.image().to_string(),
            confidence: detection.score(),
            iou: best_iou,
            matched_ground_truth,
            is_true_positive: matched_ground_truth.is_some(),
        });
    }

    Ok(matches)
}

/// Group annotations by image key, preserving input order within each image.
pub fn group_by_image<'a>(annotations: &[&'a Annotation]) -> HashMap<&'a str, Vec<&'a Annotation>> {
    let mut groups: HashMap<&'a str, Vec<&'a Annotation>> = HashMap::new();

    for &annotation in annotations {
        groups.entry(annotation.image()).or_default().push(annotation);
    }

    groups
}
