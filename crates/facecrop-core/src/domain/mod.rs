//! Core domain types for face-centered cropping.

mod detection;
mod error;
mod face;
mod geometry;
mod landmarks;
mod result;

pub use detection::{Detection, DetectorTier, TierProfile};
pub use error::{ConfigError, FailureKind, PipelineError};
pub use face::{
    AlignmentResult, CropSpec, CropSummary, FaceMetrics, LandmarkSource, ScaleBinding,
};
pub use geometry::{PixelBox, Point, RelativeBox};
pub use landmarks::{EyeIndexTable, PointSet, DENSE_MESH_POINTS, FACE_MESH_EYES};
pub use result::{CropReport, CropStatus, Failure, FaceReport, ImageDimensions, ImageInfo};
