//! Error handling tests: invalid input must fail with a typed, located error
//! and leave previously loaded data untouched.

use std::fs;
use voc_eval::collection::AnnotationCollection;
use voc_eval::error::VocEvalError;
use voc_eval::evaluator::{evaluate, find_class};
use voc_eval::loader::{load_text_dir, parse_text_annotations};
use voc_eval::threshold::filter_by_confidence;
use voc_eval::types::{
    Annotation, BoxFormat, BoxRole, CoordinateSpec, CoordinateType, ImageSize,
    InterpolationMethod, Rectangle,
};
use voc_eval::voc::load_voc_dir;

fn absolute() -> CoordinateSpec {
    CoordinateSpec::absolute(BoxFormat::Xywh)
}

#[test]
fn test_detection_without_confidence() {
    let rect = Rectangle::from_xywh(0.0, 0.0, 1.0, 1.0).unwrap();
    let err = Annotation::new("1", "cat", rect, BoxRole::Detection, None).unwrap_err();
    assert!(matches!(err, VocEvalError::MissingConfidence(_)));
}

#[test]
fn test_ground_truth_with_confidence() {
    let rect = Rectangle::from_xywh(0.0, 0.0, 1.0, 1.0).unwrap();
    let err = Annotation::new("1", "cat", rect, BoxRole::GroundTruth, Some(0.5)).unwrap_err();
    assert!(matches!(err, VocEvalError::UnexpectedConfidence(_)));
}

#[test]
fn test_confidence_out_of_range() {
    let rect = Rectangle::from_xywh(0.0, 0.0, 1.0, 1.0).unwrap();
    for score in [-0.1, 1.0001, f64::NAN] {
        let err = Annotation::detection("1", "cat", rect, score).unwrap_err();
        assert!(matches!(err, VocEvalError::InvalidConfidence(_)), "score {score}");
    }
}

#[test]
fn test_relative_without_image_size() {
    let spec = CoordinateSpec {
        format: BoxFormat::Xywh,
        coordinates: CoordinateType::Relative,
        image_size: None,
    };
    let err = spec.to_rectangle([0.5, 0.5, 0.1, 0.1]).unwrap_err();
    assert!(matches!(err, VocEvalError::MissingImageSize(_)));
}

#[test]
fn test_relative_with_xyrb_unsupported() {
    let spec = CoordinateSpec {
        format: BoxFormat::Xyrb,
        coordinates: CoordinateType::Relative,
        image_size: Some(ImageSize::new(100, 100)),
    };
    let err = spec.to_rectangle([0.1, 0.1, 0.5, 0.5]).unwrap_err();
    assert!(matches!(err, VocEvalError::UnsupportedFormat(_)));
}

#[test]
fn test_non_finite_coordinates() {
    assert!(matches!(
        Rectangle::from_xyrb(0.0, 0.0, f64::INFINITY, 1.0),
        Err(VocEvalError::InvalidBoundingBox(_))
    ));
    assert!(matches!(
        Rectangle::from_xywh(f64::NAN, 0.0, 1.0, 1.0),
        Err(VocEvalError::InvalidBoundingBox(_))
    ));
}

#[test]
fn test_unparsable_number_names_line() {
    let content = "cat 0.5 1 2 3 4\ncat 0.5 1 two 3 4\n";
    let err = parse_text_annotations("img", content, BoxRole::Detection, &absolute(), "img.txt")
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("img.txt:2"), "{message}");
    assert!(message.contains("two"), "{message}");
}

#[test]
fn test_failing_file_leaves_collection_untouched() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "cat 0 0 10 10\n").unwrap();
    fs::write(dir.path().join("b.txt"), "cat 0 0 10 10\ncat 0 0 -5 10\n").unwrap();

    let mut collection = AnnotationCollection::new();
    let err = load_text_dir(dir.path(), BoxRole::GroundTruth, &absolute(), &mut collection)
        .unwrap_err();

    match err {
        VocEvalError::Annotation { location, source } => {
            assert!(location.ends_with("b.txt:2"), "{location}");
            assert!(matches!(*source, VocEvalError::InvalidBoundingBox(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    // a.txt was fully read; nothing from b.txt was added
    assert_eq!(collection.len(), 1);
}

#[test]
fn test_missing_directory() {
    let mut collection = AnnotationCollection::new();
    let err = load_text_dir(
        "/nonexistent/voc-eval/groundtruths",
        BoxRole::GroundTruth,
        &absolute(),
        &mut collection,
    )
    .unwrap_err();
    assert!(matches!(err, VocEvalError::WalkError(_)));
}

#[test]
fn test_malformed_voc_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.xml"), "<annotation><object><name>dog").unwrap();

    let mut collection = AnnotationCollection::new();
    let err = load_voc_dir(dir.path(), &mut collection).unwrap_err();
    match err {
        VocEvalError::XmlError { path, .. } => assert!(path.ends_with("broken.xml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_iou_threshold() {
    let collection = AnnotationCollection::new();
    for threshold in [0.0, -0.5, 1.5, f64::NAN] {
        let err = evaluate(&collection, threshold, InterpolationMethod::EveryPoint).unwrap_err();
        assert!(matches!(err, VocEvalError::InvalidThreshold(_)));
    }
}

#[test]
fn test_invalid_confidence_filter() {
    let collection = AnnotationCollection::new();
    assert!(matches!(
        filter_by_confidence(&collection, 2.0),
        Err(VocEvalError::InvalidThreshold(_))
    ));
}

#[test]
fn test_class_not_found() {
    let err = find_class(&[], "dog").unwrap_err();
    assert_eq!(err.to_string(), "Class not found: dog");
}

#[test]
fn test_invalid_arguments_display_lists_all() {
    let err = VocEvalError::InvalidArguments(vec!["first".to_string(), "second".to_string()]);
    let message = err.to_string();
    assert!(message.contains("first"));
    assert!(message.contains("second"));
    assert_eq!(message.lines().count(), 3);
}

#[test]
fn test_unicode_and_punctuation_labels() {
    let content = "señal-de-tráfico 0 0 10 10\nperson_1 5 5 10 10\n";
    let (boxes, _) =
        parse_text_annotations("img", content, BoxRole::GroundTruth, &absolute(), "img.txt").unwrap();
    assert_eq!(boxes[0].class(), "señal-de-tráfico");
    assert_eq!(boxes[1].class(), "person_1");
}
