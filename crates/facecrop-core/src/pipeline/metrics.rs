//! Face center and size from landmarks, plus minimum-size upscaling.

use image::{imageops::FilterType, RgbImage};
use tracing::debug;

use crate::domain::{FaceMetrics, PipelineError, PixelBox, PointSet};

/// Point sets larger than this use the mesh rule.
const MESH_RULE_MIN_POINTS: usize = 10;
/// Margin applied to the span of a mesh.
const MESH_MARGIN: f64 = 1.3;
/// Margin applied to the span of a box.
const BOX_MARGIN: f64 = 1.2;

/// Derives face metrics from a point set and the selected detection box.
///
/// Meshes of more than ten points use the mean of their points as center
/// and their span as size. Smaller sets (sparse keypoints or the box
/// fallback) use the center and longer side of `face_box`.
///
/// # Errors
///
/// Returns [`PipelineError::GeometryDegenerate`] for empty sets, zero
/// size, or non-finite values.
pub fn resolve(points: &PointSet, face_box: &PixelBox) -> Result<FaceMetrics, PipelineError> {
    let metrics = if points.len() > MESH_RULE_MIN_POINTS {
        let bounds = points
            .bounds()
            .ok_or_else(|| PipelineError::GeometryDegenerate("empty point set".into()))?;
        let center = points
            .centroid()
            .ok_or_else(|| PipelineError::GeometryDegenerate("empty point set".into()))?;
        FaceMetrics {
            center,
            size: bounds.width.max(bounds.height) * MESH_MARGIN,
        }
    } else if points.is_empty() {
        return Err(PipelineError::GeometryDegenerate("empty point set".into()));
    } else {
        FaceMetrics {
            center: face_box.center(),
            size: face_box.width.max(face_box.height) * BOX_MARGIN,
        }
    };

    if !metrics.center.is_finite() || !metrics.size.is_finite() {
        return Err(PipelineError::GeometryDegenerate(
            "non-finite face geometry".into(),
        ));
    }
    if metrics.size <= 0.0 {
        return Err(PipelineError::GeometryDegenerate("zero face size".into()));
    }
    Ok(metrics)
}

/// An image whose face meets the minimum size.
#[derive(Debug, Clone)]
pub struct Upscaled {
    /// Working image (resampled only if the face was too small).
    pub image: RgbImage,
    /// Metrics in the coordinates of `image`.
    pub metrics: FaceMetrics,
    /// Points in the coordinates of `image`.
    pub points: PointSet,
    /// Applied factor (1.0 when none).
    pub factor: f64,
}

/// Upscales `image` so the face is at least `min_face_size` pixels.
///
/// # Errors
///
/// Returns [`PipelineError::FaceTooSmall`] if the required factor exceeds
/// `max_upscale`.
pub fn ensure_min_size(
    image: RgbImage,
    metrics: FaceMetrics,
    points: PointSet,
    min_face_size: f64,
    max_upscale: f64,
) -> Result<Upscaled, PipelineError> {
    if metrics.size >= min_face_size {
        return Ok(Upscaled {
            image,
            metrics,
            points,
            factor: 1.0,
        });
    }

    let factor = min_face_size / metrics.size;
    if factor > max_upscale {
        return Err(PipelineError::FaceTooSmall {
            size: metrics.size,
            factor,
            max: max_upscale,
        });
    }

    let width = scaled_dimension(image.width(), factor);
    let height = scaled_dimension(image.height(), factor);
    debug!(factor, width, height, "upscaling small face");
    let image = image::imageops::resize(&image, width, height, FilterType::Triangle);

    Ok(Upscaled {
        image,
        metrics: metrics.scaled(factor),
        points: points.scaled(factor),
        factor,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_dimension(value: u32, factor: f64) -> u32 {
    ((f64::from(value) * factor).round() as u32).max(1)
}
