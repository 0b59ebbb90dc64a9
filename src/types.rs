//! Core data types for annotations and evaluation results.

use crate::error::{Result, VocEvalError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned rectangle in absolute pixel coordinates.
///
/// Stored as (left, top, right, bottom). The (left, top, width, height)
/// layout is available through [`Rectangle::from_xywh`] and [`Rectangle::to_xywh`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RectangleEdges")]
pub struct Rectangle {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

/// Unchecked wire form of [`Rectangle`]; deserialization goes through
/// [`Rectangle::from_xyrb`].
#[derive(Deserialize)]
struct RectangleEdges {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl TryFrom<RectangleEdges> for Rectangle {
    type Error = VocEvalError;

    fn try_from(edges: RectangleEdges) -> Result<Self> {
        Self::from_xyrb(edges.left, edges.top, edges.right, edges.bottom)
    }
}

impl Rectangle {
    /// Create a rectangle from its (left, top, right, bottom) edges.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate is not finite or if the rectangle
    /// has negative extent.
    ///
    /// # Example
    ///
    /// ```
    /// use voc_eval::types::Rectangle;
    ///
    /// let rect = Rectangle::from_xyrb(10.0, 20.0, 40.0, 60.0).unwrap();
    /// assert_eq!(rect.to_xywh(), [10.0, 20.0, 30.0, 40.0]);
    /// ```
    pub fn from_xyrb(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        if ![left, top, right, bottom].iter().all(|v| v.is_finite()) {
            return Err(VocEvalError::InvalidBoundingBox(format!(
                "coordinates must be finite, got ({left}, {top}, {right}, {bottom})"
            )));
        }
        if right < left || bottom < top {
            return Err(VocEvalError::InvalidBoundingBox(format!(
                "right/bottom must not precede left/top, got ({left}, {top}, {right}, {bottom})"
            )));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Create a rectangle from (left, top, width, height).
    pub fn from_xywh(left: f64, top: f64, width: f64, height: f64) -> Result<Self> {
        Self::from_xyrb(left, top, left + width, top + height)
    }

    /// Convert YOLO-style relative `(x_center, y_center, width, height)` into
    /// absolute pixels for an image of the given size.
    pub fn from_relative(values: [f64; 4], image_size: ImageSize) -> Result<Self> {
        let [x_center, y_center, width, height] = values;
        let img_w = f64::from(image_size.width);
        let img_h = f64::from(image_size.height);
        Self::from_xyrb(
            (x_center - width / 2.0) * img_w,
            (y_center - height / 2.0) * img_h,
            (x_center + width / 2.0) * img_w,
            (y_center + height / 2.0) * img_h,
        )
    }

    /// Express this rectangle as relative `(x_center, y_center, width, height)`.
    pub fn to_relative(&self, image_size: ImageSize) -> [f64; 4] {
        let img_w = f64::from(image_size.width);
        let img_h = f64::from(image_size.height);
        [
            (self.left + self.right) / 2.0 / img_w,
            (self.top + self.bottom) / 2.0 / img_h,
            self.width() / img_w,
            self.height() / img_h,
        ]
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Width as `right - left` (no pixel padding).
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height as `bottom - top` (no pixel padding).
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn to_xyrb(&self) -> [f64; 4] {
        [self.left, self.top, self.right, self.bottom]
    }

    pub fn to_xywh(&self) -> [f64; 4] {
        [self.left, self.top, self.width(), self.height()]
    }
}

/// Image dimensions in pixels, `(width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Layout of the four raw coordinates of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxFormat {
    /// `<left> <top> <width> <height>`
    #[default]
    Xywh,
    /// `<left> <top> <right> <bottom>`
    Xyrb,
}

/// Whether coordinates are absolute pixels or fractions of the image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateType {
    #[default]
    Absolute,
    Relative,
}

/// How raw coordinates read from an annotation source are interpreted.
///
/// Every box is normalized through [`CoordinateSpec::to_rectangle`] once, at
/// ingestion, so the evaluator only ever sees absolute (left, top, right, bottom).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinateSpec {
    pub format: BoxFormat,
    pub coordinates: CoordinateType,
    pub image_size: Option<ImageSize>,
}

impl CoordinateSpec {
    /// Absolute coordinates in the given layout.
    pub fn absolute(format: BoxFormat) -> Self {
        Self {
            format,
            coordinates: CoordinateType::Absolute,
            image_size: None,
        }
    }

    /// Relative YOLO-style coordinates for images of `image_size`.
    pub fn relative(image_size: ImageSize) -> Self {
        Self {
            format: BoxFormat::Xywh,
            coordinates: CoordinateType::Relative,
            image_size: Some(image_size),
        }
    }

    /// Check that the format/coordinate combination is usable.
    pub fn validate(&self) -> Result<()> {
        if self.coordinates == CoordinateType::Relative {
            if self.image_size.is_none() {
                return Err(VocEvalError::MissingImageSize(
                    "relative coordinates require the image size".to_string(),
                ));
            }
            if self.format == BoxFormat::Xyrb {
                return Err(VocEvalError::UnsupportedFormat(
                    "relative coordinates must use the xywh (center, width, height) layout"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Normalize four raw values into an absolute rectangle.
    pub fn to_rectangle(&self, values: [f64; 4]) -> Result<Rectangle> {
        self.validate()?;
        let [a, b, c, d] = values;
        match (self.coordinates, self.format, self.image_size) {
            (CoordinateType::Absolute, BoxFormat::Xywh, _) => Rectangle::from_xywh(a, b, c, d),
            (CoordinateType::Absolute, BoxFormat::Xyrb, _) => Rectangle::from_xyrb(a, b, c, d),
            (CoordinateType::Relative, _, Some(size)) => Rectangle::from_relative(values, size),
            (CoordinateType::Relative, _, None) => Err(VocEvalError::MissingImageSize(
                "relative coordinates require the image size".to_string(),
            )),
        }
    }
}

/// Whether a box is reference data or a model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxRole {
    GroundTruth,
    Detection,
}

impl fmt::Display for BoxRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxRole::GroundTruth => write!(f, "ground truth"),
            BoxRole::Detection => write!(f, "detection"),
        }
    }
}

/// A single box instance: ground truth or detection.
///
/// Annotations are validated at construction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    image: String,
    class: String,
    rect: Rectangle,
    role: BoxRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_size: Option<ImageSize>,
}

impl Annotation {
    /// Build an annotation, enforcing the role/confidence invariants.
    ///
    /// # Errors
    ///
    /// - [`VocEvalError::MissingConfidence`] for a detection without a score
    /// - [`VocEvalError::UnexpectedConfidence`] for a ground truth with a score
    /// - [`VocEvalError::InvalidConfidence`] for a score outside [0, 1]
    pub fn new(
        image: impl Into<String>,
        class: impl Into<String>,
        rect: Rectangle,
        role: BoxRole,
        confidence: Option<f64>,
    ) -> Result<Self> {
        match (role, confidence) {
            (BoxRole::Detection, None) => {
                return Err(VocEvalError::MissingConfidence(
                    "a detection requires a confidence score".to_string(),
                ));
            }
            (BoxRole::GroundTruth, Some(score)) => {
                return Err(VocEvalError::UnexpectedConfidence(format!(
                    "a ground-truth box cannot carry a confidence score (got {score})"
                )));
            }
            (BoxRole::Detection, Some(score)) if !(0.0..=1.0).contains(&score) => {
                return Err(VocEvalError::InvalidConfidence(format!(
                    "confidence must be between 0.0 and 1.0, got {score}"
                )));
            }
            _ => {}
        }

        Ok(Self {
            image: image.into(),
            class: class.into(),
            rect,
            role,
            confidence,
            image_size: None,
        })
    }

    /// Ground-truth box.
    pub fn ground_truth(image: impl Into<String>, class: impl Into<String>, rect: Rectangle) -> Self {
        Self {
            image: image.into(),
            class: class.into(),
            rect,
            role: BoxRole::GroundTruth,
            confidence: None,
            image_size: None,
        }
    }

    /// Detection box with a confidence score in [0, 1].
    pub fn detection(
        image: impl Into<String>,
        class: impl Into<String>,
        rect: Rectangle,
        confidence: f64,
    ) -> Result<Self> {
        Self::new(image, class, rect, BoxRole::Detection, Some(confidence))
    }

    /// Build an annotation from raw coordinates interpreted through `spec`.
    pub fn from_raw(
        image: impl Into<String>,
        class: impl Into<String>,
        values: [f64; 4],
        spec: &CoordinateSpec,
        role: BoxRole,
        confidence: Option<f64>,
    ) -> Result<Self> {
        let rect = spec.to_rectangle(values)?;
        let annotation = Self::new(image, class, rect, role, confidence)?;
        Ok(annotation.with_image_size(spec.image_size))
    }

    /// Record the size of the image this box belongs to.
    pub fn with_image_size(mut self, image_size: Option<ImageSize>) -> Self {
        self.image_size = image_size;
        self
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn rect(&self) -> &Rectangle {
        &self.rect
    }

    pub fn role(&self) -> BoxRole {
        self.role
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    pub fn image_size(&self) -> Option<ImageSize> {
        self.image_size
    }

    pub fn is_ground_truth(&self) -> bool {
        self.role == BoxRole::GroundTruth
    }

    pub fn is_detection(&self) -> bool {
        self.role == BoxRole::Detection
    }

    /// Ranking score: the confidence, or 1.0 for ground truth.
    pub fn score(&self) -> f64 {
        self.confidence.unwrap_or(1.0)
    }

    /// Relative `(x_center, y_center, width, height)` of this box.
    ///
    /// Uses `image_size` when given, otherwise the size recorded at ingestion.
    pub fn relative_coordinates(&self, image_size: Option<ImageSize>) -> Result<[f64; 4]> {
        let size = image_size.or(self.image_size).ok_or_else(|| {
            VocEvalError::MissingImageSize(format!(
                "image size unknown for box in image '{}'",
                self.image
            ))
        })?;
        Ok(self.rect.to_relative(size))
    }
}

/// Interpolation used to turn a precision/recall curve into Average Precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterpolationMethod {
    /// Area under the monotone precision envelope (VOC 2010+ devkit).
    #[default]
    EveryPoint,
    /// Mean of the interpolated precision at recall 0.0, 0.1, ..., 1.0 (VOC 2007 paper).
    ElevenPoint,
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationMethod::EveryPoint => write!(f, "every-point"),
            InterpolationMethod::ElevenPoint => write!(f, "eleven-point"),
        }
    }
}

/// Evaluation metrics for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub class: String,
    /// Cumulative precision, one entry per detection in descending confidence
    pub precision: Vec<f64>,
    /// Cumulative recall, parallel to `precision`
    pub recall: Vec<f64>,
    pub average_precision: f64,
    pub interpolated_precision: Vec<f64>,
    pub interpolated_recall: Vec<f64>,
    /// Number of ground-truth boxes of this class
    pub total_positives: usize,
    pub total_tp: usize,
    pub total_fp: usize,
}

impl ClassMetrics {
    /// Whether this class contributes to mAP.
    pub fn has_positives(&self) -> bool {
        self.total_positives > 0
    }
}

/// Result of a whole evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub iou_threshold: f64,
    pub method: InterpolationMethod,
    pub classes: Vec<ClassMetrics>,
    /// Mean AP over classes with ground truth; `None` if no class has any
    pub mean_average_precision: Option<f64>,
}

impl EvaluationSummary {
    /// Look up the result of one class.
    pub fn class(&self, class: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|metrics| metrics.class == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xywh_to_xyrb() {
        let rect = Rectangle::from_xywh(10.0, 20.0, 30.0, 40.0).unwrap();
        assert_eq!(rect.to_xyrb(), [10.0, 20.0, 40.0, 60.0]);
        assert_eq!(rect.to_xywh(), [10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_negative_extent_rejected() {
        assert!(Rectangle::from_xyrb(10.0, 10.0, 5.0, 20.0).is_err());
        assert!(Rectangle::from_xywh(0.0, 0.0, 5.0, -1.0).is_err());
        assert!(Rectangle::from_xyrb(f64::NAN, 0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_deserialize_validates_edges() {
        let inverted = serde_json::from_str::<Rectangle>(r#"{"left":10,"top":0,"right":0,"bottom":10}"#);
        assert!(inverted.is_err());

        let rect: Rectangle =
            serde_json::from_str(r#"{"left":0,"top":0,"right":10,"bottom":10}"#).unwrap();
        assert_eq!(rect.to_xyrb(), [0.0, 0.0, 10.0, 10.0]);

        let json = serde_json::to_string(&rect).unwrap();
        assert_eq!(serde_json::from_str::<Rectangle>(&json).unwrap(), rect);
    }

    #[test]
    fn test_relative_conversion() {
        let size = ImageSize::new(200, 100);
        let rect = Rectangle::from_relative([0.5, 0.5, 0.5, 0.2], size).unwrap();
        for (a, b) in rect.to_xyrb().iter().zip([50.0, 40.0, 150.0, 60.0]) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }

        let back = rect.to_relative(size);
        for (a, b) in back.iter().zip([0.5, 0.5, 0.5, 0.2]) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_relative_requires_image_size() {
        let spec = CoordinateSpec {
            format: BoxFormat::Xywh,
            coordinates: CoordinateType::Relative,
            image_size: None,
        };
        assert!(matches!(
            spec.to_rectangle([0.5, 0.5, 0.1, 0.1]),
            Err(VocEvalError::MissingImageSize(_))
        ));
    }

    #[test]
    fn test_relative_xyrb_unsupported() {
        let spec = CoordinateSpec {
            format: BoxFormat::Xyrb,
            coordinates: CoordinateType::Relative,
            image_size: Some(ImageSize::new(10, 10)),
        };
        assert!(matches!(
            spec.to_rectangle([0.1, 0.1, 0.2, 0.2]),
            Err(VocEvalError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_detection_requires_confidence() {
        let rect = Rectangle::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap();
        let result = Annotation::new("img", "cat", rect, BoxRole::Detection, None);
        assert!(matches!(result, Err(VocEvalError::MissingConfidence(_))));
    }

    #[test]
    fn test_ground_truth_rejects_confidence() {
        let rect = Rectangle::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap();
        let result = Annotation::new("img", "cat", rect, BoxRole::GroundTruth, Some(0.5));
        assert!(matches!(result, Err(VocEvalError::UnexpectedConfidence(_))));
    }

    #[test]
    fn test_confidence_range() {
        let rect = Rectangle::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap();
        assert!(Annotation::detection("img", "cat", rect, 1.5).is_err());
        assert!(Annotation::detection("img", "cat", rect, -0.1).is_err());
        assert!(Annotation::detection("img", "cat", rect, f64::NAN).is_err());
        assert!(Annotation::detection("img", "cat", rect, 1.0).is_ok());
    }

    #[test]
    fn test_ground_truth_score_defaults_to_one() {
        let rect = Rectangle::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap();
        let gt = Annotation::ground_truth("img", "cat", rect);
        assert_eq!(gt.score(), 1.0);
        assert!(gt.is_ground_truth());
    }
}
