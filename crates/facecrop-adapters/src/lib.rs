//! Facecrop Adapters - External adapters for facecrop.
//!
//! This crate provides adapters for:
//! - Filesystem image source with EXIF orientation
//! - Sidecar-file face detections and landmark meshes
//! - Writing finished crops

pub mod fs;
pub mod output;
pub mod sidecar;

pub use fs::{load_image, FsImageSource};
pub use output::{output_filename, CropWriter};
pub use sidecar::{SidecarDetector, SidecarFaces, SidecarLandmarks};
