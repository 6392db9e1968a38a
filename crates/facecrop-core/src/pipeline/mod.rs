//! The face-normalization pipeline.
//!
//! Stages run in a fixed order: candidate fusion, landmark selection,
//! geometry, minimum-size upscaling, alignment, fitting and cropping.
//! Detectors only ever see the detection working copy; every later stage
//! operates on the full-resolution image.

pub mod align;
mod config;
pub mod crop;
pub mod fit;
pub mod fusion;
pub mod metrics;
pub mod selector;

use image::{imageops::FilterType, RgbImage};
use tracing::debug;

use crate::domain::{CropSummary, LandmarkSource, PipelineError, PointSet};
use crate::ports::{FaceDetector, LandmarkDetector};

pub use config::{
    PipelineConfig, DEFAULT_ACCURATE_MIN_CONFIDENCE, DEFAULT_FACE_FILL_RATIO,
    DEFAULT_FAST_MIN_CONFIDENCE, DEFAULT_MAX_DETECTION_DIMENSION, DEFAULT_MAX_UPSCALE,
    DEFAULT_MIN_FACE_SIZE, DEFAULT_OUTPUT_SIZE,
};

/// A finished crop with its diagnostics.
#[derive(Debug, Clone)]
pub struct CropOutput {
    /// Exactly `output_size × output_size` pixels.
    pub image: RgbImage,
    /// How the crop was derived.
    pub summary: CropSummary,
}

/// Stateless face-centered cropper.
///
/// Holds only configuration, so one instance can be shared across threads;
/// adapters are passed per call.
#[derive(Debug, Clone)]
pub struct FacePipeline {
    config: PipelineConfig,
}

impl FacePipeline {
    /// Creates a pipeline after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn new(config: PipelineConfig) -> Result<Self, crate::domain::ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this pipeline runs with.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Produces a square crop of `image` centered on its most prominent face.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] if no face is found, the face is too
    /// small, the geometry is degenerate, or an adapter fails.
    pub fn run<D, L>(
        &self,
        image: &RgbImage,
        detector: &mut D,
        landmarks: &mut L,
    ) -> Result<CropOutput, PipelineError>
    where
        D: FaceDetector + ?Sized,
        L: LandmarkDetector + ?Sized,
    {
        let config = &self.config;
        let (downscale, working) = detection_copy(image, config.max_detection_dimension);
        let detection_image = working.as_ref().unwrap_or(image);
        let (dw, dh) = detection_image.dimensions();

        let mut candidates = Vec::new();
        for profile in config.tier_profiles() {
            let found = detector
                .detect(detection_image, &profile)
                .map_err(|e| PipelineError::adapter("detector", e))?;
            let before = found.len();
            candidates.extend(found.into_iter().filter(|d| profile.accepts(d)));
            debug!(
                tier = profile.tier.name(),
                reported = before,
                total = candidates.len(),
                "collected detections"
            );
        }
        let selected = fusion::select_candidate(&candidates, dw, dh)?;
        let face_box = selected.detection.bbox.to_pixels(dw, dh);

        let meshes = landmarks
            .meshes(detection_image)
            .map_err(|e| PipelineError::adapter("landmarks", e))?;
        let mut points =
            selector::select_points(&face_box, &meshes, &selector::DEFAULT_STRATEGIES);
        if downscale < 1.0 {
            points = points.scaled(1.0 / downscale);
        }
        let source = landmark_source(&points);

        let face = metrics::resolve(&points, &face_box.scaled(1.0 / downscale))?;
        debug!(
            center_x = face.center.x,
            center_y = face.center.y,
            size = face.size,
            points = points.len(),
            "resolved face geometry"
        );
        let upscaled = metrics::ensure_min_size(
            image.clone(),
            face,
            points,
            config.min_face_size,
            config.max_upscale,
        )?;

        let aligned = align::align(upscaled.image, &upscaled.points, upscaled.metrics.center);
        let fitted = fit::fit(
            aligned.image.dimensions(),
            aligned.center,
            upscaled.metrics.size,
            config.output_size,
            config.face_fill_ratio,
        );
        let cropped = crop::crop_scaled(&aligned.image, &fitted);
        debug!(
            angle = aligned.angle_degrees,
            scale = fitted.spec.scale,
            padded = cropped.padded,
            "crop complete"
        );

        Ok(CropOutput {
            image: cropped.image,
            summary: CropSummary {
                confidence: selected.detection.confidence,
                score: selected.score,
                candidates: selected.candidates,
                landmarks: source,
                face,
                upscale: upscaled.factor,
                angle_degrees: aligned.angle_degrees,
                scale: fitted.spec.scale,
                binding: fitted.spec.binding,
                padded: cropped.padded,
            },
        })
    }
}

/// Downscales `image` for detection if its longest edge exceeds `max_dimension`.
///
/// Returns the factor and the copy; `(1.0, None)` means the original is used.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn detection_copy(image: &RgbImage, max_dimension: u32) -> (f64, Option<RgbImage>) {
    let (width, height) = image.dimensions();
    let longest = width.max(height);
    if longest <= max_dimension {
        return (1.0, None);
    }
    let factor = f64::from(max_dimension) / f64::from(longest);
    let w = ((f64::from(width) * factor) as u32).max(1);
    let h = ((f64::from(height) * factor) as u32).max(1);
    debug!(factor, width = w, height = h, "downscaled detection copy");
    (
        factor,
        Some(image::imageops::resize(image, w, h, FilterType::Triangle)),
    )
}

const fn landmark_source(points: &PointSet) -> LandmarkSource {
    match points {
        PointSet::BoxDerived(_) => LandmarkSource::Box,
        PointSet::Sparse(_) => LandmarkSource::Sparse,
        PointSet::DenseMesh { .. } => LandmarkSource::Dense,
    }
}
