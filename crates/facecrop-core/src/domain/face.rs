//! Derived face geometry and per-stage results.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::Point;

/// Face center and size derived from a point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceMetrics {
    /// Face center in pixels.
    pub center: Point,
    /// Face size in pixels (largest span times a margin factor).
    pub size: f64,
}

impl FaceMetrics {
    /// Returns the metrics with center and size multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            center: self.center.scaled(factor),
            size: self.size * factor,
        }
    }
}

/// Output of the eye-level alignment stage.
#[derive(Debug, Clone)]
pub struct AlignmentResult {
    /// Image after rotation (unchanged when no rotation was applied).
    pub image: RgbImage,
    /// Applied rotation in degrees; `0.0` means no rotation was applied.
    pub angle_degrees: f64,
    /// Face center after rotation.
    pub center: Point,
}

impl AlignmentResult {
    /// Returns true if the image was rotated.
    #[must_use]
    pub fn rotated(&self) -> bool {
        self.angle_degrees != 0.0
    }
}

/// Which constraint decided the final scale.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleBinding {
    /// The face fill ratio was honored.
    FillRatio,
    /// The scale was raised so the crop window stays inside the frame.
    Frame,
}

/// Scale and placement of the final crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropSpec {
    /// Uniform scale applied to the aligned image.
    pub scale: f64,
    /// Face center after scaling.
    pub center_after_scale: Point,
    /// Output edge length in pixels.
    pub output_size: u32,
    /// Which constraint produced `scale`.
    pub binding: ScaleBinding,
}

/// Point-set class that drove the geometry, as reported to callers.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkSource {
    /// Synthesized from the detection box.
    Box,
    /// A mesh without eye topology.
    Sparse,
    /// A dense mesh.
    Dense,
}

/// Diagnostics for one successful crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSummary {
    /// Confidence of the selected detection.
    pub confidence: f64,
    /// Fusion score of the selected detection (`None` when it was the only candidate).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Number of candidates across both tiers.
    pub candidates: usize,
    /// Where the landmark points came from.
    pub landmarks: LandmarkSource,
    /// Face geometry in original-image pixels, before any upscaling.
    pub face: FaceMetrics,
    /// Minimum-size upscale factor applied (1.0 when none).
    pub upscale: f64,
    /// Applied rotation in degrees.
    pub angle_degrees: f64,
    /// Applied scale.
    pub scale: f64,
    /// Which constraint produced the scale.
    pub binding: ScaleBinding,
    /// Whether the crop needed white padding.
    pub padded: bool,
}
