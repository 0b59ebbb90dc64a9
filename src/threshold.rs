//! Threshold validation and confidence filtering.

use crate::collection::AnnotationCollection;
use crate::error::{Result, VocEvalError};

/// Drop detections scoring below `threshold`. Ground truths are always kept.
///
/// # Errors
///
/// Returns an error if the threshold is not in the valid range [0.0, 1.0].
///
/// # Example
///
/// ```
/// use voc_eval::collection::AnnotationCollection;
/// use voc_eval::threshold::filter_by_confidence;
/// use voc_eval::types::{Annotation, Rectangle};
///
/// let rect = Rectangle::from_xywh(10.0, 20.0, 30.0, 40.0).unwrap();
/// let mut collection = AnnotationCollection::new();
/// collection.push(Annotation::ground_truth("img", "cat", rect));
/// collection.push(Annotation::detection("img", "cat", rect, 0.9).unwrap());
/// collection.push(Annotation::detection("img", "cat", rect, 0.3).unwrap());
///
/// let filtered = filter_by_confidence(&collection, 0.5).unwrap();
/// assert_eq!(filtered.len(), 2);
/// ```
pub fn filter_by_confidence(
    collection: &AnnotationCollection,
    threshold: f64,
) -> Result<AnnotationCollection> {
    validate_confidence_threshold(threshold)?;

    Ok(collection
        .iter()
        .filter(|ann| ann.is_ground_truth() || ann.score() >= threshold)
        .cloned()
        .collect())
}

/// Validate an IoU acceptance threshold, which must lie in (0.0, 1.0].
///
/// A threshold of zero would accept detections that do not overlap anything.
pub fn validate_iou_threshold(threshold: f64) -> Result<()> {
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(VocEvalError::InvalidThreshold(format!(
            "IoU threshold must be in (0.0, 1.0], got {threshold}"
        )));
    }
    Ok(())
}

/// Validate a confidence threshold, which must lie in [0.0, 1.0].
pub fn validate_confidence_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(VocEvalError::InvalidThreshold(format!(
            "Threshold must be between 0.0 and 1.0, got {threshold}"
        )));
    }
    Ok(())
}
