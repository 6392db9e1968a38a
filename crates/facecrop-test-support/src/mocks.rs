//! Mock implementations of core port traits.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::anyhow;
use facecrop_core::domain::{CropReport, Detection, DetectorTier, ImageInfo, PointSet, TierProfile};
use facecrop_core::ports::{
    FaceDetector, ImageSource, LandmarkDetector, ProgressEvent, ProgressSink, ResultOutput,
    SourceItem,
};
use image::RgbImage;

/// Mock implementation of `FaceDetector` for testing.
///
/// Returns fixed detections per tier, without applying the tier floor, and
/// records every invocation.
#[derive(Debug, Clone, Default)]
pub struct MockDetector {
    fast: Vec<Detection>,
    accurate: Vec<Detection>,
    calls: Vec<DetectorCall>,
}

/// One recorded `detect` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorCall {
    /// Profile passed by the caller.
    pub profile: TierProfile,
    /// Dimensions of the image passed by the caller.
    pub dimensions: (u32, u32),
}

impl MockDetector {
    /// Creates a detector that finds nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fast-tier output.
    #[must_use]
    pub fn with_fast(mut self, detections: Vec<Detection>) -> Self {
        self.fast = detections;
        self
    }

    /// Sets the accurate-tier output.
    #[must_use]
    pub fn with_accurate(mut self, detections: Vec<Detection>) -> Self {
        self.accurate = detections;
        self
    }

    /// Returns the recorded calls, in order.
    #[must_use]
    pub fn calls(&self) -> &[DetectorCall] {
        &self.calls
    }
}

impl FaceDetector for MockDetector {
    fn detect(
        &mut self,
        image: &RgbImage,
        profile: &TierProfile,
    ) -> anyhow::Result<Vec<Detection>> {
        self.calls.push(DetectorCall {
            profile: *profile,
            dimensions: image.dimensions(),
        });
        Ok(match profile.tier {
            DetectorTier::Fast => self.fast.clone(),
            _ => self.accurate.clone(),
        })
    }
}

/// Mock implementation of `LandmarkDetector` for testing.
#[derive(Debug, Clone, Default)]
pub struct MockLandmarks {
    meshes: Vec<PointSet>,
    calls: Vec<(u32, u32)>,
}

impl MockLandmarks {
    /// Creates a landmark model that returns `meshes` for every image.
    #[must_use]
    pub fn new(meshes: Vec<PointSet>) -> Self {
        Self {
            meshes,
            calls: Vec::new(),
        }
    }

    /// Creates a landmark model that finds nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Dimensions of every image passed in, in order.
    #[must_use]
    pub fn calls(&self) -> &[(u32, u32)] {
        &self.calls
    }
}

impl LandmarkDetector for MockLandmarks {
    fn meshes(&mut self, image: &RgbImage) -> anyhow::Result<Vec<PointSet>> {
        self.calls.push(image.dimensions());
        Ok(self.meshes.clone())
    }
}

/// Adapter that always fails, for both ports.
#[derive(Debug, Clone)]
pub struct FailingAdapter {
    message: String,
}

impl FailingAdapter {
    /// Creates an adapter that fails with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl FaceDetector for FailingAdapter {
    fn detect(
        &mut self,
        _image: &RgbImage,
        _profile: &TierProfile,
    ) -> anyhow::Result<Vec<Detection>> {
        Err(anyhow!("{}", self.message))
    }
}

impl LandmarkDetector for FailingAdapter {
    fn meshes(&mut self, _image: &RgbImage) -> anyhow::Result<Vec<PointSet>> {
        Err(anyhow!("{}", self.message))
    }
}

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built images (or load failures) and tracks iteration.
pub struct MockImageSource {
    entries: Vec<Result<ImageInfo, (String, String)>>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<ImageInfo>) -> Self {
        Self {
            entries: images.into_iter().map(Ok).collect(),
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Appends an entry that fails to load with `reason`.
    #[must_use]
    pub fn with_failure(mut self, path: impl Into<String>, reason: impl Into<String>) -> Self {
        self.entries.push(Err((path.into(), reason.into())));
        self
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = SourceItem> + Send + '_> {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Box::new(self.entries.iter().map(|entry| match entry {
            Ok(info) => SourceItem {
                path: info.path.clone(),
                image: Ok(info.clone()),
            },
            Err((path, reason)) => SourceItem {
                path: path.clone(),
                image: Err(anyhow!("{reason}")),
            },
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures reports for later assertions.
pub struct MockResultOutput {
    reports: Arc<Mutex<Vec<CropReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured reports.
    #[must_use]
    pub fn reports(&self) -> Vec<CropReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, report: &CropReport) -> anyhow::Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Cropped` events.
    #[must_use]
    pub fn cropped_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Cropped { .. }))
            .count()
    }

    /// Returns the number of `Failed` events.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Failed { .. }))
            .count()
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { cropped, failed } => Some((*cropped, *failed)),
            _ => None,
        })
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
