//! Error types for the voc-eval library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for voc-eval operations.
pub type Result<T> = std::result::Result<T, VocEvalError>;

/// Error types that can occur while loading annotations or evaluating detections.
#[derive(Error, Debug)]
pub enum VocEvalError {
    /// Error during JSON serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while walking an annotation directory.
    #[error("Directory error: {0}")]
    WalkError(#[from] walkdir::Error),

    /// Malformed PASCAL VOC XML document.
    #[error("XML error in {path}: {message}")]
    XmlError { path: PathBuf, message: String },

    /// Malformed line in a plain-text annotation file.
    #[error("Parse error at {location}: {message}")]
    ParseError { location: String, message: String },

    /// An annotation could not be built; `location` names the file and line.
    #[error("{location}: {source}")]
    Annotation {
        location: String,
        #[source]
        source: Box<VocEvalError>,
    },

    /// Invalid bounding box coordinates.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// Relative coordinates were given without the image size.
    #[error("Missing image size: {0}")]
    MissingImageSize(String),

    /// A detection was built without a confidence score.
    #[error("Missing confidence: {0}")]
    MissingConfidence(String),

    /// A ground-truth box was built with a confidence score.
    #[error("Unexpected confidence: {0}")]
    UnexpectedConfidence(String),

    /// Confidence score outside [0, 1].
    #[error("Invalid confidence: {0}")]
    InvalidConfidence(String),

    /// Coordinate format and coordinate type cannot be combined.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid IoU or confidence threshold.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Requested class is not part of the evaluation results.
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// Command line arguments failed validation; every problem is listed.
    #[error("invalid arguments:\n  {}", .0.join("\n  "))]
    InvalidArguments(Vec<String>),

    /// Failure while rendering a precision/recall plot.
    #[error("Plot error: {0}")]
    PlotError(String),

    /// A computed value broke a geometric invariant. Indicates a bug.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl VocEvalError {
    /// Attach a file/line location to a construction error.
    pub fn at(self, location: impl Into<String>) -> Self {
        VocEvalError::Annotation {
            location: location.into(),
            source: Box::new(self),
        }
    }
}
