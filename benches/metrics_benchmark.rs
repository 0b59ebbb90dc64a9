use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voc_eval::collection::AnnotationCollection;
use voc_eval::evaluator::{evaluate, evaluate_parallel};
use voc_eval::matching::match_detections;
use voc_eval::metrics::{calculate_ap, calculate_iou, calculate_precision_recall_curve};
use voc_eval::types::{Annotation, InterpolationMethod, Rectangle};

fn bench_iou_calculation(c: &mut Criterion) {
    let a = Rectangle::from_xywh(10.0, 10.0, 50.0, 50.0).unwrap();
    let b = Rectangle::from_xywh(30.0, 30.0, 50.0, 50.0).unwrap();

    c.bench_function("iou_single", |bench| {
        bench.iter(|| calculate_iou(black_box(&a), black_box(&b)));
    });
}

fn bench_iou_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("iou_matrix");

    for size in [10, 50, 100, 500].iter() {
        let boxes: Vec<Rectangle> = (0..*size)
            .map(|i| {
                let offset = (i as f64) * 2.0;
                Rectangle::from_xywh(offset, offset, 50.0, 50.0).unwrap()
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                for a in &boxes {
                    for other in &boxes {
                        let _ = black_box(calculate_iou(a, other));
                    }
                }
            });
        });
    }
    group.finish();
}

fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");

    for num_detections in [10, 100, 1000].iter() {
        let ground_truths: Vec<Annotation> = (0..*num_detections / 2)
            .map(|i| {
                let x = (i % 20) as f64 * 60.0;
                let y = (i / 20) as f64 * 60.0;
                let rect = Rectangle::from_xywh(x, y, 50.0, 50.0).unwrap();
                Annotation::ground_truth(format!("img{}", i % 10), "object", rect)
            })
            .collect();
        let detections: Vec<Annotation> = (0..*num_detections)
            .map(|i| {
                let x = (i % 20) as f64 * 60.0 + 3.0;
                let y = (i / 40) as f64 * 60.0;
                let rect = Rectangle::from_xywh(x, y, 50.0, 50.0).unwrap();
                let score = 1.0 - (i as f64) / (*num_detections as f64);
                Annotation::detection(format!("img{}", i % 10), "object", rect, score).unwrap()
            })
            .collect();

        let gts: Vec<&Annotation> = ground_truths.iter().collect();
        let dets: Vec<&Annotation> = detections.iter().collect();

        group.bench_with_input(BenchmarkId::from_parameter(num_detections), num_detections, |b, _| {
            b.iter(|| match_detections(black_box(&dets), black_box(&gts), 0.5));
        });
    }
    group.finish();
}

fn bench_ap_calculation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ap_calculation");

    for num_detections in [10, 50, 100, 500].iter() {
        let flags: Vec<bool> = (0..*num_detections).map(|i| i % 3 != 2).collect();
        let curve = calculate_precision_recall_curve(&flags, *num_detections);

        for method in [InterpolationMethod::EveryPoint, InterpolationMethod::ElevenPoint] {
            group.bench_with_input(
                BenchmarkId::new(method.to_string(), num_detections),
                num_detections,
                |b, _| {
                    b.iter(|| calculate_ap(black_box(&curve.recall), black_box(&curve.precision), method));
                },
            );
        }
    }
    group.finish();
}

fn bench_full_evaluation(c: &mut Criterion) {
    let mut collection = AnnotationCollection::new();
    for image in 0..100 {
        for class in 0..20 {
            let x = class as f64 * 55.0;
            let gt = Rectangle::from_xywh(x, 0.0, 50.0, 50.0).unwrap();
            let det = Rectangle::from_xywh(x + 2.0, 1.0, 50.0, 50.0).unwrap();
            let key = format!("{image:06}");
            let label = format!("class{class}");
            collection.push(Annotation::ground_truth(key.as_str(), label.as_str(), gt));
            collection.push(
                Annotation::detection(key.as_str(), label.as_str(), det, 0.5 + (image as f64) / 250.0)
                    .unwrap(),
            );
        }
    }

    c.bench_function("evaluate_100_images_20_classes", |b| {
        b.iter(|| evaluate(black_box(&collection), 0.5, InterpolationMethod::EveryPoint));
    });

    c.bench_function("evaluate_parallel_100_images_20_classes", |b| {
        b.iter(|| evaluate_parallel(black_box(&collection), 0.5, InterpolationMethod::EveryPoint));
    });
}

criterion_group!(
    benches,
    bench_iou_calculation,
    bench_iou_matrix,
    bench_matching,
    bench_ap_calculation,
    bench_full_evaluation,
);
criterion_main!(benches);
