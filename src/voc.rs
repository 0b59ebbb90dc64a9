//! PASCAL VOC XML annotation loading.
//!
//! Each XML file describes one image: its size and a list of objects with
//! pixel `bndbox` corners. Objects flagged `difficult` are skipped, as in the
//! official challenge scoring.

use crate::collection::AnnotationCollection;
use crate::error::{Result, VocEvalError};
use crate::loader::{image_key, list_annotation_files};
use crate::stats::LoadStats;
use crate::types::{Annotation, ImageSize, Rectangle};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct VocAnnotation {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size: Option<VocSize>,
    #[serde(default)]
    pub object: Vec<VocObject>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VocSize {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub depth: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VocObject {
    pub name: String,
    #[serde(default)]
    pub difficult: u8,
    pub bndbox: VocBndBox,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VocBndBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

/// Parse one VOC XML document into ground-truth annotations for `image`.
///
/// # Errors
///
/// Returns [`VocEvalError::XmlError`] if the document does not have the VOC
/// layout, or an annotated error if a box is invalid.
///
/// # Example
///
/// ```
/// use voc_eval::voc::parse_voc_annotations;
///
/// let xml = r#"<annotation>
///   <size><width>500</width><height>375</height><depth>3</depth></size>
///   <object><name>dog</name><difficult>0</difficult>
///     <bndbox><xmin>48</xmin><ymin>240</ymin><xmax>195</xmax><ymax>371</ymax></bndbox>
///   </object>
///   <object><name>person</name><difficult>1</difficult>
///     <bndbox><xmin>8</xmin><ymin>12</ymin><xmax>352</xmax><ymax>498</ymax></bndbox>
///   </object>
/// </annotation>"#;
///
/// let (boxes, stats) = parse_voc_annotations("000001", xml, "000001.xml").unwrap();
/// assert_eq!(boxes.len(), 1);
/// assert_eq!(stats.skipped_difficult, 1);
/// ```
pub fn parse_voc_annotations(
    image: &str,
    content: &str,
    source: &str,
) -> Result<(Vec<Annotation>, LoadStats)> {
    let document: VocAnnotation =
        serde_xml_rs::from_str(content).map_err(|err| VocEvalError::XmlError {
            path: source.into(),
            message: err.to_string(),
        })?;

    let image_size = document
        .size
        .map(|size| ImageSize::new(size.width, size.height));

    let mut stats = LoadStats::new();
    let mut annotations = Vec::with_capacity(document.object.len());

    for (idx, object) in document.object.iter().enumerate() {
        if object.difficult != 0 {
            stats.skipped_difficult += 1;
            continue;
        }

        let VocBndBox {
            xmin,
            ymin,
            xmax,
            ymax,
        } = object.bndbox;
        let rect = Rectangle::from_xyrb(xmin, ymin, xmax, ymax)
            .map_err(|err| err.at(format!("{source}: object {}", idx + 1)))?;

        annotations.push(
            Annotation::ground_truth(image, object.name.trim(), rect).with_image_size(image_size),
        );
    }

    stats.ground_truths = annotations.len();
    Ok((annotations, stats))
}

/// Load one VOC XML file. The image key is the file stem.
pub fn load_voc_file<P: AsRef<Path>>(path: P) -> Result<(Vec<Annotation>, LoadStats)> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let (annotations, mut stats) =
        parse_voc_annotations(&image_key(path), &content, &path.display().to_string())?;

    stats.files_read = 1;
    if annotations.is_empty() {
        stats.empty_files = 1;
    }

    Ok((annotations, stats))
}

/// Load every `.xml` file of a directory as ground truth.
pub fn load_voc_dir<P: AsRef<Path>>(
    dir: P,
    collection: &mut AnnotationCollection,
) -> Result<LoadStats> {
    let dir = dir.as_ref();

    let mut stats = LoadStats::new();
    for path in list_annotation_files(dir, "xml")? {
        let (annotations, file_stats) = load_voc_file(&path)?;
        tracing::debug!(
            file = %path.display(),
            boxes = annotations.len(),
            difficult = file_stats.skipped_difficult,
            "read VOC annotation"
        );
        collection.extend(annotations);
        stats.merge(&file_stats);
    }

    stats.log_summary(&dir.display().to_string());
    Ok(stats)
}
