//! Per-image input and report types.

use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};

use super::{CropSummary, FailureKind, FaceMetrics, Point, ScaleBinding};

/// Outcome of processing one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropStatus {
    /// A crop was produced.
    Cropped,
    /// Processing stopped with a failure.
    Failed,
}

/// Why an image failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable message.
    pub message: String,
}

/// Face placement summary included in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceReport {
    /// Confidence of the selected detection.
    pub confidence: f64,
    /// Fusion score, absent when there was a single candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Face center in original-image pixels.
    pub center: Point,
    /// Face size in original-image pixels.
    pub size: f64,
    /// Applied rotation in degrees.
    pub angle_degrees: f64,
    /// Applied scale.
    pub scale: f64,
    /// Constraint that produced the scale.
    pub binding: ScaleBinding,
    /// Whether the crop needed white padding.
    pub padded: bool,
}

impl From<&CropSummary> for FaceReport {
    fn from(summary: &CropSummary) -> Self {
        let FaceMetrics { center, size } = summary.face;
        Self {
            confidence: summary.confidence,
            score: summary.score,
            center,
            size,
            angle_degrees: summary.angle_degrees,
            scale: summary.scale,
            binding: summary.binding,
            padded: summary.padded,
        }
    }
}

/// Complete report for a single image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropReport {
    /// Path to the source image.
    pub path: String,
    /// Timestamp of processing (RFC 3339).
    pub timestamp: String,
    /// Source image dimensions, when the image could be decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<ImageDimensions>,
    /// Outcome.
    pub status: CropStatus,
    /// Written crop path (absent on failure or dry run).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Face placement (absent on failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face: Option<FaceReport>,
    /// Failure details (absent on success).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl CropReport {
    /// Report for a successful crop.
    #[must_use]
    pub fn cropped(
        path: impl Into<String>,
        timestamp: impl Into<String>,
        dimensions: ImageDimensions,
        summary: &CropSummary,
        output: Option<String>,
    ) -> Self {
        Self {
            path: path.into(),
            timestamp: timestamp.into(),
            dimensions: Some(dimensions),
            status: CropStatus::Cropped,
            output,
            face: Some(FaceReport::from(summary)),
            failure: None,
        }
    }

    /// Report for a failed image.
    #[must_use]
    pub fn failed(
        path: impl Into<String>,
        timestamp: impl Into<String>,
        dimensions: Option<ImageDimensions>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            timestamp: timestamp.into(),
            dimensions,
            status: CropStatus::Failed,
            output: None,
            face: None,
            failure: Some(Failure {
                kind,
                message: message.into(),
            }),
        }
    }

    /// Returns true if a crop was produced.
    #[must_use]
    pub fn is_cropped(&self) -> bool {
        self.status == CropStatus::Cropped
    }
}

/// Image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A decoded, orientation-corrected image ready for the pipeline.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Path to the image file.
    pub path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded 3-channel pixels.
    pub image: RgbImage,
}

impl ImageInfo {
    /// Normalizes a decoded image to RGB8.
    #[must_use]
    pub fn new(path: impl Into<String>, image: &DynamicImage) -> Self {
        let image = image.to_rgb8();
        Self {
            path: path.into(),
            width: image.width(),
            height: image.height(),
            image,
        }
    }

    /// Dimensions of the decoded image.
    #[must_use]
    pub const fn dimensions(&self) -> ImageDimensions {
        ImageDimensions {
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_report_omits_face_and_output() {
        let report = CropReport::failed(
            "a.jpg",
            "2024-01-01T00:00:00Z",
            None,
            FailureKind::NoFaceDetected,
            "no face detected",
        );
        let json = serde_json::to_value(&report).unwrap_or_default();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["failure"]["kind"], "no_face_detected");
        assert!(json.get("face").is_none());
        assert!(json.get("output").is_none());
        assert!(!report.is_cropped());
    }

    #[test]
    fn image_info_converts_to_rgb() {
        let gray = DynamicImage::new_luma8(4, 3);
        let info = ImageInfo::new("g.png", &gray);
        assert_eq!(info.dimensions(), ImageDimensions { width: 4, height: 3 });
        assert_eq!(info.image.dimensions(), (4, 3));
    }
}
