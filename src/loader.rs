//! Plain-text annotation loading ("one box per line", one file per image).

use crate::collection::AnnotationCollection;
use crate::error::{Result, VocEvalError};
use crate::stats::LoadStats;
use crate::types::{Annotation, BoxRole, CoordinateSpec};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List files with the given extension directly inside `dir`, sorted by name.
pub fn list_annotation_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Image key of an annotation file: its name without extension.
pub fn image_key(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse the contents of one annotation file.
///
/// Ground-truth lines are `<class> <x> <y> <w|right> <h|bottom>`; detection
/// lines add a confidence after the class:
/// `<class> <confidence> <x> <y> <w|right> <h|bottom>`. Blank lines are skipped.
///
/// # Arguments
///
/// * `image` - Image key the boxes belong to
/// * `content` - File contents
/// * `role` - Whether the file holds ground truth or detections
/// * `spec` - How the four coordinates are interpreted
/// * `source` - Name used in error locations, usually the file path
///
/// # Errors
///
/// Returns an error naming `source:line` for a wrong number of fields, an
/// unparsable number, or an annotation that fails validation.
///
/// # Example
///
/// ```
/// use voc_eval::loader::parse_text_annotations;
/// use voc_eval::types::{BoxFormat, BoxRole, CoordinateSpec};
///
/// let content = "dog 0.9 10 10 50 50\ncat 0.4 5 5 20 20\n";
/// let spec = CoordinateSpec::absolute(BoxFormat::Xywh);
/// let (boxes, _) = parse_text_annotations("img1", content, BoxRole::Detection, &spec, "img1.txt").unwrap();
/// assert_eq!(boxes.len(), 2);
/// ```
pub fn parse_text_annotations(
    image: &str,
    content: &str,
    role: BoxRole,
    spec: &CoordinateSpec,
    source: &str,
) -> Result<(Vec<Annotation>, LoadStats)> {
    let expected_fields = match role {
        BoxRole::GroundTruth => 5,
        BoxRole::Detection => 6,
    };

    let mut annotations = Vec::new();
    let mut stats = LoadStats::new();

    for (line_idx, line) in content.lines().enumerate() {
        let location = format!("{source}:{}", line_idx + 1);
        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.is_empty() {
            stats.skipped_blank_lines += 1;
            continue;
        }

        if fields.len() != expected_fields {
            return Err(VocEvalError::ParseError {
                location,
                message: format!(
                    "expected {expected_fields} fields for a {role} line, got {}",
                    fields.len()
                ),
            });
        }

        let class = fields[0];
        let numbers = fields[1..]
            .iter()
            .map(|field| parse_number(field, &location))
            .collect::<Result<Vec<f64>>>()?;

        let (confidence, coords) = match role {
            BoxRole::GroundTruth => (None, &numbers[..]),
            BoxRole::Detection => (Some(numbers[0]), &numbers[1..]),
        };
        let values = [coords[0], coords[1], coords[2], coords[3]];

        let annotation = Annotation::from_raw(image, class, values, spec, role, confidence)
            .map_err(|err| err.at(location.as_str()))?;
        annotations.push(annotation);
    }

    match role {
        BoxRole::GroundTruth => stats.ground_truths = annotations.len(),
        BoxRole::Detection => stats.detections = annotations.len(),
    }

    Ok((annotations, stats))
}

fn parse_number(field: &str, location: &str) -> Result<f64> {
    field.parse::<f64>().map_err(|_| VocEvalError::ParseError {
        location: location.to_string(),
        message: format!("'{field}' is not a number"),
    })
}

/// Load one annotation file.
pub fn load_text_file<P: AsRef<Path>>(
    path: P,
    role: BoxRole,
    spec: &CoordinateSpec,
) -> Result<(Vec<Annotation>, LoadStats)> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let (annotations, mut stats) = parse_text_annotations(
        &image_key(path),
        &content,
        role,
        spec,
        &path.display().to_string(),
    )?;

    stats.files_read = 1;
    if annotations.is_empty() {
        stats.empty_files = 1;
    }

    Ok((annotations, stats))
}

/// Load every `.txt` file of a directory into `collection`.
///
/// Files are read in name order and each file is added only once it has
/// parsed completely, so a failing file leaves the collection untouched.
///
/// # Example
///
/// ```no_run
/// use voc_eval::collection::AnnotationCollection;
/// use voc_eval::loader::load_text_dir;
/// use voc_eval::types::{BoxFormat, BoxRole, CoordinateSpec};
///
/// let mut collection = AnnotationCollection::new();
/// let spec = CoordinateSpec::absolute(BoxFormat::Xywh);
/// load_text_dir("groundtruths", BoxRole::GroundTruth, &spec, &mut collection).unwrap();
/// load_text_dir("detections", BoxRole::Detection, &spec, &mut collection).unwrap();
/// ```
pub fn load_text_dir<P: AsRef<Path>>(
    dir: P,
    role: BoxRole,
    spec: &CoordinateSpec,
    collection: &mut AnnotationCollection,
) -> Result<LoadStats> {
    let dir = dir.as_ref();
    spec.validate()?;

    let mut stats = LoadStats::new();
    for path in list_annotation_files(dir, "txt")? {
        let (annotations, file_stats) = load_text_file(&path, role, spec)?;
        tracing::debug!(file = %path.display(), boxes = annotations.len(), "read annotation file");
        collection.extend(annotations);
        stats.merge(&file_stats);
    }

    stats.log_summary(&dir.display().to_string());
    Ok(stats)
}
