//! Main evaluation orchestrator for PASCAL VOC detection metrics.

use crate::collection::AnnotationCollection;
use crate::error::Result;
use crate::matching::match_detections;
use crate::metrics::ap::{calculate_ap, calculate_map};
use crate::metrics::precision_recall::calculate_precision_recall_curve;
use crate::threshold::validate_iou_threshold;
use crate::types::{Annotation, ClassMetrics, EvaluationSummary, InterpolationMethod};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default IoU threshold of the PASCAL VOC challenge.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Parameters of an evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationParams {
    /// Minimum IoU for a detection to count as a true positive
    pub iou_threshold: f64,
    pub method: InterpolationMethod,
    /// Evaluate classes on the rayon thread pool
    pub parallel: bool,
}

impl Default for EvaluationParams {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            method: InterpolationMethod::default(),
            parallel: false,
        }
    }
}

/// Ground truths and detections of one class, in input order.
#[derive(Debug, Default)]
struct ClassBoxes<'a> {
    ground_truths: Vec<&'a Annotation>,
    detections: Vec<&'a Annotation>,
}

/// Evaluate detections against ground truth, one result per class.
///
/// Classes are the sorted distinct labels over both roles, so a class with
/// only detections or only ground truth still gets a result.
///
/// # Arguments
///
/// * `collection` - Ground truths and detections of the run
/// * `iou_threshold` - IoU needed for a true positive, in (0, 1]
/// * `method` - Interpolation used for Average Precision
///
/// # Errors
///
/// Returns an error if the threshold is out of range or if an IoU computation
/// breaks its invariant.
///
/// # Example
///
/// ```
/// use voc_eval::collection::AnnotationCollection;
/// use voc_eval::evaluator::evaluate;
/// use voc_eval::types::{Annotation, InterpolationMethod, Rectangle};
///
/// let rect = Rectangle::from_xywh(10.0, 10.0, 50.0, 50.0).unwrap();
/// let mut collection = AnnotationCollection::new();
/// collection.push(Annotation::ground_truth("img", "dog", rect));
/// collection.push(Annotation::detection("img", "dog", rect, 0.9).unwrap());
///
/// let results = evaluate(&collection, 0.5, InterpolationMethod::EveryPoint).unwrap();
/// assert_eq!(results[0].average_precision, 1.0);
/// ```
pub fn evaluate(
    collection: &AnnotationCollection,
    iou_threshold: f64,
    method: InterpolationMethod,
) -> Result<Vec<ClassMetrics>> {
    validate_iou_threshold(iou_threshold)?;

    partition_by_class(collection)
        .into_iter()
        .map(|(class, boxes)| evaluate_class(class, &boxes, iou_threshold, method))
        .collect()
}

/// Evaluate classes concurrently. Output order and values match [`evaluate`].
pub fn evaluate_parallel(
    collection: &AnnotationCollection,
    iou_threshold: f64,
    method: InterpolationMethod,
) -> Result<Vec<ClassMetrics>> {
    validate_iou_threshold(iou_threshold)?;

    let classes: Vec<(&str, ClassBoxes<'_>)> = partition_by_class(collection).into_iter().collect();

    classes
        .par_iter()
        .map(|(class, boxes)| evaluate_class(class, boxes, iou_threshold, method))
        .collect()
}

/// Run a full evaluation and aggregate mAP.
pub fn evaluate_with_params(
    collection: &AnnotationCollection,
    params: &EvaluationParams,
) -> Result<EvaluationSummary> {
    tracing::info!(
        ground_truths = collection.count(Some(crate::types::BoxRole::GroundTruth)),
        detections = collection.count(Some(crate::types::BoxRole::Detection)),
        iou_threshold = params.iou_threshold,
        method = %params.method,
        "evaluating detections"
    );

    let classes = if params.parallel {
        evaluate_parallel(collection, params.iou_threshold, params.method)?
    } else {
        evaluate(collection, params.iou_threshold, params.method)?
    };

    let mean_average_precision = calculate_map(&classes);

    Ok(EvaluationSummary {
        iou_threshold: params.iou_threshold,
        method: params.method,
        classes,
        mean_average_precision,
    })
}

/// Split the collection per class in a single pass.
fn partition_by_class(collection: &AnnotationCollection) -> BTreeMap<&str, ClassBoxes<'_>> {
    let mut classes: BTreeMap<&str, ClassBoxes<'_>> = BTreeMap::new();

    for annotation in collection {
        let entry = classes.entry(annotation.class()).or_default();
        if annotation.is_ground_truth() {
            entry.ground_truths.push(annotation);
        } else {
            entry.detections.push(annotation);
        }
    }

    classes
}

/// Evaluate a single class. Matching state is local to this call.
fn evaluate_class(
    class: &str,
    boxes: &ClassBoxes<'_>,
    iou_threshold: f64,
    method: InterpolationMethod,
) -> Result<ClassMetrics> {
    tracing::debug!(
        class,
        detections = boxes.detections.len(),
        ground_truths = boxes.ground_truths.len(),
        "evaluating class"
    );

    let total_positives = boxes.ground_truths.len();
    let matches = match_detections(&boxes.detections, &boxes.ground_truths, iou_threshold)?;
    let is_tp: Vec<bool> = matches.iter().map(|m| m.is_true_positive).collect();

    let curve = calculate_precision_recall_curve(&is_tp, total_positives);
    let interpolated = calculate_ap(&curve.recall, &curve.precision, method);

    if total_positives == 0 {
        tracing::debug!(class, "no ground truth; class excluded from mAP");
    }

    Ok(ClassMetrics {
        class: class.to_string(),
        precision: curve.precision,
        recall: curve.recall,
        average_precision: interpolated.ap,
        interpolated_precision: interpolated.precision,
        interpolated_recall: interpolated.recall,
        total_positives,
        total_tp: curve.true_positives,
        total_fp: curve.false_positives,
    })
}

/// Look up one class in a result list.
pub fn find_class<'a>(results: &'a [ClassMetrics], class: &str) -> Result<&'a ClassMetrics> {
    results
        .iter()
        .find(|metrics| metrics.class == class)
        .ok_or_else(|| crate::error::VocEvalError::ClassNotFound(class.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rectangle;

    fn create_test_collection() -> AnnotationCollection {
        let rect = Rectangle::from_xywh(10.0, 10.0, 50.0, 50.0).unwrap();
        let mut collection = AnnotationCollection::new();
        collection.push(Annotation::ground_truth("1", "person", rect));
        collection.push(Annotation::detection("1", "person", rect, 0.9).unwrap());
        collection
    }

    #[test]
    fn test_evaluate_basic() {
        let collection = create_test_collection();
        let results = evaluate(&collection, 0.5, InterpolationMethod::EveryPoint).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].total_tp, 1);
        assert_eq!(results[0].precision, vec![1.0]);
        assert_eq!(results[0].recall, vec![1.0]);
    }

    #[test]
    fn test_invalid_threshold() {
        let collection = create_test_collection();
        assert!(evaluate(&collection, 1.5, InterpolationMethod::EveryPoint).is_err());
        assert!(evaluate(&collection, 0.0, InterpolationMethod::EveryPoint).is_err());
    }

    #[test]
    fn test_default_params() {
        let params = EvaluationParams::default();
        assert_eq!(params.iou_threshold, 0.5);
        assert_eq!(params.method, InterpolationMethod::EveryPoint);
        assert!(!params.parallel);
    }

    #[test]
    fn test_params_from_json() {
        let params: EvaluationParams =
            serde_json::from_str(r#"{"iou_threshold": 0.7, "method": "eleven-point"}"#).unwrap();
        assert_eq!(params.iou_threshold, 0.7);
        assert_eq!(params.method, InterpolationMethod::ElevenPoint);
        assert!(!params.parallel);
    }

    #[test]
    fn test_find_class() {
        let collection = create_test_collection();
        let results = evaluate(&collection, 0.5, InterpolationMethod::EveryPoint).unwrap();
        assert!(find_class(&results, "person").is_ok());
        assert!(find_class(&results, "dog").is_err());
    }
}
