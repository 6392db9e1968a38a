//! Facecrop Core - Domain logic and the face-normalization pipeline
//!
//! This crate contains the core domain types, the adapter ports, and the
//! pipeline that turns a photograph plus detector output into a fixed-size
//! square portrait centered on the face.

pub mod domain;
pub mod pipeline;
pub mod ports;

pub use domain::{
    CropReport, CropStatus, CropSummary, Detection, DetectorTier, FailureKind, ImageDimensions,
    ImageInfo, PipelineError, Point, PointSet, RelativeBox, TierProfile,
};
pub use pipeline::{CropOutput, FacePipeline, PipelineConfig};
pub use ports::{
    FaceDetector, ImageSource, LandmarkDetector, ProgressEvent, ProgressSink, ResultOutput,
    SourceItem,
};
