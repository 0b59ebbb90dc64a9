/// Counters collected while reading annotation sources
///
/// Loaders fill a `LoadStats` per directory so callers can report how many
/// files and boxes were ingested and what was skipped along the way.

use serde::{Deserialize, Serialize};

/// Statistics collected while loading annotations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Number of annotation files read
    pub files_read: usize,

    /// Ground-truth boxes added to the collection
    pub ground_truths: usize,

    /// Detection boxes added to the collection
    pub detections: usize,

    /// Blank lines skipped in text files
    pub skipped_blank_lines: usize,

    /// VOC objects skipped because they are marked difficult
    pub skipped_difficult: usize,

    /// Files that contained no boxes
    pub empty_files: usize,
}

impl LoadStats {
    /// Create a new `LoadStats` with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Total boxes added
    pub fn total_boxes(&self) -> usize {
        self.ground_truths + self.detections
    }

    /// Total entries that were read but not turned into boxes
    pub fn total_skipped(&self) -> usize {
        self.skipped_blank_lines + self.skipped_difficult
    }

    /// Add the counters of another load, e.g. ground truth plus detections
    pub fn merge(&mut self, other: &LoadStats) {
        self.files_read += other.files_read;
        self.ground_truths += other.ground_truths;
        self.detections += other.detections;
        self.skipped_blank_lines += other.skipped_blank_lines;
        self.skipped_difficult += other.skipped_difficult;
        self.empty_files += other.empty_files;
    }

    /// Emit the statistics as one structured log event
    pub fn log_summary(&self, source: &str) {
        tracing::info!(
            source,
            files = self.files_read,
            ground_truths = self.ground_truths,
            detections = self.detections,
            skipped_difficult = self.skipped_difficult,
            empty_files = self.empty_files,
            "annotations loaded"
        );
    }

    /// Get a formatted string summary of the statistics
    pub fn summary_string(&self) -> String {
        format!(
            "LoadStats {{ files: {}, ground_truths: {}, detections: {}, skipped: {}, empty_files: {} }}",
            self.files_read,
            self.ground_truths,
            self.detections,
            self.total_skipped(),
            self.empty_files
        )
    }
}
