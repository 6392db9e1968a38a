//! Failure taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that end processing of a single image.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Neither detector tier produced a usable candidate.
    #[error("no face detected")]
    NoFaceDetected,

    /// The face would need more upscaling than allowed.
    #[error("face too small: {size:.1}px needs {factor:.2}x upscaling (max {max:.1}x)")]
    FaceTooSmall {
        /// Derived face size in pixels.
        size: f64,
        /// Required upscale factor.
        factor: f64,
        /// Configured maximum.
        max: f64,
    },

    /// Zero-area or non-finite geometry.
    #[error("degenerate face geometry: {0}")]
    GeometryDegenerate(String),

    /// An external adapter returned an error.
    #[error("{stage} adapter failed")]
    Adapter {
        /// Which adapter call failed.
        stage: &'static str,
        /// Underlying adapter error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl PipelineError {
    /// Wraps an adapter error.
    pub fn adapter(stage: &'static str, err: anyhow::Error) -> Self {
        Self::Adapter {
            stage,
            source: err.into(),
        }
    }

    /// Machine-readable failure kind.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::NoFaceDetected => FailureKind::NoFaceDetected,
            Self::FaceTooSmall { .. } => FailureKind::FaceTooSmall,
            Self::GeometryDegenerate(_) => FailureKind::GeometryDegenerate,
            Self::Adapter { .. } => FailureKind::AdapterFailure,
        }
    }
}

/// Serializable failure category for reports.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The image could not be read or decoded.
    DecodeFailure,
    /// No face candidate.
    NoFaceDetected,
    /// Face needs too much upscaling.
    FaceTooSmall,
    /// Geometry could not be trusted.
    GeometryDegenerate,
    /// A detector or landmark adapter failed.
    AdapterFailure,
}

/// Invalid pipeline configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Output size of zero.
    #[error("output_size must be > 0")]
    ZeroOutputSize,

    /// Fill ratio outside `(0, 1)`.
    #[error("face_fill_ratio must be in (0, 1), got {0}")]
    FillRatio(f64),

    /// Confidence floor outside `[0, 1]`.
    #[error("{name} must be in 0.0..=1.0, got {value}")]
    Confidence {
        /// Setting name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Non-positive minimum face size.
    #[error("min_face_size must be > 0, got {0}")]
    MinFaceSize(f64),

    /// Maximum upscale below 1.
    #[error("max_upscale must be >= 1.0, got {0}")]
    MaxUpscale(f64),

    /// Detection working-copy limit of zero.
    #[error("max_detection_dimension must be > 0")]
    ZeroDetectionDimension,
}
