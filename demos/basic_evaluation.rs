//! Basic evaluation example demonstrating core functionality.

use voc_eval::evaluator::{evaluate_with_params, EvaluationParams};
use voc_eval::loader::parse_text_annotations;
use voc_eval::metrics::iou::calculate_iou;
use voc_eval::report::{format_class_ap, format_map};
use voc_eval::types::{BoxFormat, BoxRole, CoordinateSpec, InterpolationMethod, Rectangle};
use voc_eval::{filter_by_confidence, AnnotationCollection};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== PASCAL VOC Evaluation Example ===\n");

    // Example 1: IoU Calculation
    println!("1. IoU Calculation");
    let a = Rectangle::from_xywh(10.0, 10.0, 50.0, 50.0)?;
    let b = Rectangle::from_xywh(30.0, 30.0, 50.0, 50.0)?;
    println!("   IoU between overlapping boxes: {:.4}", calculate_iou(&a, &b)?);
    println!();

    // Example 2: Parse annotations
    println!("2. Parsing Annotations");
    let spec = CoordinateSpec::absolute(BoxFormat::Xywh);
    let mut collection = AnnotationCollection::new();

    let ground_truth = [
        ("000001", "person 100 100 200 150\ncar 350 200 100 120\n"),
        ("000002", "person 40 60 80 200\n"),
    ];
    for (image, content) in ground_truth {
        let (boxes, _) = parse_text_annotations(image, content, BoxRole::GroundTruth, &spec, image)?;
        collection.extend(boxes);
    }

    let detections = [
        ("000001", "person 0.95 105 98 195 155\ncar 0.87 348 198 105 125\nperson 0.42 50 50 80 90\n"),
        ("000002", "person 0.71 44 58 78 205\ncar 0.30 0 0 30 30\n"),
    ];
    for (image, content) in detections {
        let (boxes, _) = parse_text_annotations(image, content, BoxRole::Detection, &spec, image)?;
        collection.extend(boxes);
    }

    println!("   Ground truths: {}", collection.count(Some(BoxRole::GroundTruth)));
    println!("   Detections:    {}", collection.count(Some(BoxRole::Detection)));
    println!("   Classes:       {:?}", collection.classes());
    println!();

    // Example 3: Evaluation with both interpolation methods
    println!("3. Running Evaluation");
    for method in [InterpolationMethod::EveryPoint, InterpolationMethod::ElevenPoint] {
        let params = EvaluationParams {
            method,
            ..Default::default()
        };
        let summary = evaluate_with_params(&collection, &params)?;

        println!("   {method}:");
        for metrics in &summary.classes {
            println!(
                "   ├─ {} (TP={}, FP={}, positives={})",
                format_class_ap(metrics),
                metrics.total_tp,
                metrics.total_fp,
                metrics.total_positives
            );
        }
        println!("   └─ {}", format_map(&summary));
    }
    println!();

    // Example 4: Confidence filtering
    println!("4. Confidence Filtering");
    let confident = filter_by_confidence(&collection, 0.5)?;
    let summary = evaluate_with_params(&confident, &EvaluationParams::default())?;
    println!("   Detections with confidence >= 0.5: {}", confident.count(Some(BoxRole::Detection)));
    println!("   {}", format_map(&summary));
    println!();

    println!("=== Example Complete ===");

    Ok(())
}
