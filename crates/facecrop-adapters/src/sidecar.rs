//! Precomputed detector output stored next to each image.
//!
//! For `portrait.jpg` the sidecar is `portrait.jpg.faces.json`:
//!
//! ```json
//! {
//!   "fast":     [{"box": {"xmin": 0.4, "ymin": 0.3, "width": 0.2, "height": 0.2}, "confidence": 0.9}],
//!   "accurate": [],
//!   "meshes":   [[[0.41, 0.32], [0.42, 0.33]]]
//! }
//! ```
//!
//! Mesh coordinates are relative to the image, so they stay valid for any
//! downscaled copy handed to the adapter.

use anyhow::{Context, Result};
use facecrop_core::domain::{Detection, DetectorTier, Point, PointSet, TierProfile};
use facecrop_core::{FaceDetector, LandmarkDetector};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix appended to the image file name.
pub const SIDECAR_SUFFIX: &str = ".faces.json";

/// Parsed sidecar contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidecarFaces {
    /// Fast-tier detections.
    pub fast: Vec<Detection>,
    /// Accurate-tier detections.
    pub accurate: Vec<Detection>,
    /// Landmark meshes as relative `[x, y]` pairs.
    pub meshes: Vec<Vec<[f64; 2]>>,
}

impl SidecarFaces {
    /// Path of the sidecar belonging to `image_path`.
    #[must_use]
    pub fn path_for(image_path: &Path) -> PathBuf {
        let mut name = image_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(SIDECAR_SUFFIX);
        image_path.with_file_name(name)
    }

    /// Loads the sidecar for `image_path`.
    ///
    /// A missing sidecar yields empty contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the sidecar exists but cannot be read or parsed.
    pub fn load(image_path: &Path) -> Result<Self> {
        let path = Self::path_for(image_path);
        if !path.exists() {
            debug!("No sidecar for {}", image_path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read sidecar: {}", path.display()))?;
        let faces: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse sidecar: {}", path.display()))?;
        debug!(
            fast = faces.fast.len(),
            accurate = faces.accurate.len(),
            meshes = faces.meshes.len(),
            "Loaded sidecar {}",
            path.display()
        );
        Ok(faces)
    }

    /// Splits the contents into the two adapter ports.
    #[must_use]
    pub fn into_adapters(self) -> (SidecarDetector, SidecarLandmarks) {
        (
            SidecarDetector {
                fast: self.fast,
                accurate: self.accurate,
            },
            SidecarLandmarks {
                meshes: self.meshes,
            },
        )
    }
}

/// Detector port backed by sidecar detections.
#[derive(Debug, Clone, Default)]
pub struct SidecarDetector {
    fast: Vec<Detection>,
    accurate: Vec<Detection>,
}

impl FaceDetector for SidecarDetector {
    fn detect(&mut self, _image: &RgbImage, profile: &TierProfile) -> Result<Vec<Detection>> {
        let detections = match profile.tier {
            DetectorTier::Fast => &self.fast,
            _ => &self.accurate,
        };
        Ok(detections
            .iter()
            .filter(|d| profile.accepts(d))
            .copied()
            .collect())
    }
}

/// Landmark port backed by sidecar meshes.
#[derive(Debug, Clone, Default)]
pub struct SidecarLandmarks {
    meshes: Vec<Vec<[f64; 2]>>,
}

impl LandmarkDetector for SidecarLandmarks {
    fn meshes(&mut self, image: &RgbImage) -> Result<Vec<PointSet>> {
        let w = f64::from(image.width());
        let h = f64::from(image.height());
        Ok(self
            .meshes
            .iter()
            .filter(|mesh| !mesh.is_empty())
            .map(|mesh| {
                PointSet::from_points(
                    mesh.iter()
                        .map(|&[x, y]| Point::new(x * w, y * h))
                        .collect(),
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facecrop_core::domain::RelativeBox;

    #[test]
    fn sidecar_path_appends_suffix() {
        let path = SidecarFaces::path_for(Path::new("/photos/a.b.jpg"));
        assert_eq!(path, PathBuf::from("/photos/a.b.jpg.faces.json"));
    }

    #[test]
    fn parses_partial_sidecar() {
        let faces: SidecarFaces = serde_json::from_str(
            r#"{"fast": [{"box": {"xmin": 0.4, "ymin": 0.3, "width": 0.2, "height": 0.2}, "confidence": 0.9}]}"#,
        )
        .unwrap_or_default();
        assert_eq!(faces.fast.len(), 1);
        assert!(faces.accurate.is_empty());
        assert!(faces.meshes.is_empty());
    }

    #[test]
    fn detector_applies_tier_floor() {
        let bbox = RelativeBox::new(0.4, 0.3, 0.2, 0.2);
        let faces = SidecarFaces {
            fast: vec![Detection::new(bbox, 0.9), Detection::new(bbox, 0.4)],
            accurate: vec![Detection::new(bbox, 0.35), Detection::new(bbox, 0.1)],
            meshes: vec![],
        };
        let (mut detector, _) = faces.into_adapters();
        let image = RgbImage::new(10, 10);

        let fast = detector
            .detect(&image, &TierProfile::new(DetectorTier::Fast, 0.5))
            .unwrap_or_default();
        assert_eq!(fast.len(), 1);
        let accurate = detector
            .detect(&image, &TierProfile::new(DetectorTier::Accurate, 0.3))
            .unwrap_or_default();
        assert_eq!(accurate.len(), 1);
        assert!((accurate[0].confidence - 0.35).abs() < f64::EPSILON);
    }

    #[test]
    fn meshes_are_scaled_to_image_pixels() {
        let faces = SidecarFaces {
            meshes: vec![vec![[0.5, 0.25], [0.1, 0.2]], vec![]],
            ..SidecarFaces::default()
        };
        let (_, mut landmarks) = faces.into_adapters();
        let meshes = landmarks
            .meshes(&RgbImage::new(200, 100))
            .unwrap_or_default();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].points()[0], Point::new(100.0, 25.0));
        assert!(matches!(meshes[0], PointSet::Sparse(_)));
    }
}
