//! Test support utilities for facecrop.
//!
//! Provides port mocks, synthetic image builders, and landmark mesh
//! builders for testing the cropping pipeline.
//!
//! # Example
//!
//! ```
//! use facecrop_core::domain::{PixelBox, Point};
//! use facecrop_test_support::{FaceMeshBuilder, MockLandmarks, SyntheticImageBuilder};
//!
//! let face = PixelBox { x: 400.0, y: 300.0, width: 200.0, height: 200.0 };
//! let portrait = SyntheticImageBuilder::portrait(1000, 1000, face);
//! let mesh = FaceMeshBuilder::new(Point::new(500.0, 400.0), 80.0).tilt(8.0).dense();
//! let landmarks = MockLandmarks::new(vec![mesh]);
//! # let _ = (portrait, landmarks);
//! ```

mod builders;
mod mocks;

pub use builders::{FaceMeshBuilder, SyntheticImageBuilder, BACKGROUND, MARKER, SKIN};
pub use mocks::{
    DetectorCall, FailingAdapter, MockDetector, MockImageSource, MockLandmarks, MockProgressSink,
    MockResultOutput,
};
