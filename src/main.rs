use anyhow::Context;
use clap::Parser;
use voc_eval::cli::{Args, GroundTruthLayout, RunConfig};
use voc_eval::collection::AnnotationCollection;
use voc_eval::evaluator::evaluate_with_params;
use voc_eval::loader::load_text_dir;
use voc_eval::report::{format_class_ap, format_map, write_results_json, write_results_txt};
use voc_eval::threshold::filter_by_confidence;
use voc_eval::types::BoxRole;
use voc_eval::voc::load_voc_dir;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .init();

    let config = args.validate()?;
    run(&config)
}

fn run(config: &RunConfig) -> anyhow::Result<()> {
    let mut collection = AnnotationCollection::new();

    let gt_loaded = match config.gt_layout {
        GroundTruthLayout::Text => {
            load_text_dir(&config.gt_folder, BoxRole::GroundTruth, &config.gt_spec, &mut collection)
        }
        GroundTruthLayout::Voc => load_voc_dir(&config.gt_folder, &mut collection),
    };
    gt_loaded.with_context(|| {
        format!("failed to load ground truth from {}", config.gt_folder.display())
    })?;

    load_text_dir(&config.det_folder, BoxRole::Detection, &config.det_spec, &mut collection)
        .with_context(|| format!("failed to load detections from {}", config.det_folder.display()))?;

    if let Some(min_confidence) = config.min_confidence {
        collection = filter_by_confidence(&collection, min_confidence)?;
    }

    let summary = evaluate_with_params(&collection, &config.params)?;

    for metrics in summary.classes.iter().filter(|m| m.has_positives()) {
        println!("{}", format_class_ap(metrics));
    }
    println!("{}", format_map(&summary));

    let txt = write_results_txt(&summary, &config.save_path)
        .with_context(|| format!("failed to write results to {}", config.save_path.display()))?;
    let json = write_results_json(&summary, &config.save_path)?;
    tracing::info!(txt = %txt.display(), json = %json.display(), "results written");

    if config.plot {
        let plots = voc_eval::plot::plot_all(&summary, &config.save_path, config.show_interpolated)
            .context("failed to write precision/recall plots")?;
        tracing::info!(count = plots.len(), "plots written");
    }

    Ok(())
}
