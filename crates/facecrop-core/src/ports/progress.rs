//! Progress reporting port for UI integration.

use crate::domain::{CropReport, FailureKind};

/// Events emitted during a batch for progress tracking.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Processing started for an image.
    Started {
        /// Path to the image.
        path: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total images in batch, if known.
        total: Option<usize>,
    },
    /// A crop was produced.
    Cropped {
        /// The per-image report.
        report: CropReport,
    },
    /// An image failed.
    Failed {
        /// Path to the image.
        path: String,
        /// Failure category.
        kind: FailureKind,
        /// Human-readable reason.
        reason: String,
    },
    /// All images have been processed.
    Finished {
        /// Images cropped.
        cropped: usize,
        /// Images that failed.
        failed: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
