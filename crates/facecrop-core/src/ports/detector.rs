//! Detector ports for face boxes and landmark meshes.

use image::RgbImage;

use crate::domain::{Detection, PointSet, TierProfile};

/// Port for a face detector that can run at several tiers.
///
/// Implementations are not assumed reentrant; each worker owns its own
/// instance.
pub trait FaceDetector: Send {
    /// Detects faces in `image` using `profile`.
    ///
    /// Detections below `profile.min_confidence` should be omitted. The
    /// returned list has no ordering guarantee.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector itself fails. An image without
    /// faces is an empty list, not an error.
    fn detect(
        &mut self,
        image: &RgbImage,
        profile: &TierProfile,
    ) -> anyhow::Result<Vec<Detection>>;
}

/// Port for a landmark model returning per-face point meshes.
pub trait LandmarkDetector: Send {
    /// Returns zero or more meshes in pixel coordinates of `image`.
    ///
    /// Meshes are not aligned with detections.
    ///
    /// # Errors
    ///
    /// Returns an error if the landmark model fails.
    fn meshes(&mut self, image: &RgbImage) -> anyhow::Result<Vec<PointSet>>;
}

impl<T: FaceDetector + ?Sized> FaceDetector for Box<T> {
    fn detect(
        &mut self,
        image: &RgbImage,
        profile: &TierProfile,
    ) -> anyhow::Result<Vec<Detection>> {
        (**self).detect(image, profile)
    }
}

impl<T: LandmarkDetector + ?Sized> LandmarkDetector for Box<T> {
    fn meshes(&mut self, image: &RgbImage) -> anyhow::Result<Vec<PointSet>> {
        (**self).meshes(image)
    }
}
