//! Eye-level alignment.
//!
//! The tracked face center is moved with the same projection as the
//! pixels, so it stays on the face after rotation.

use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{warp, Interpolation, Projection};
use tracing::debug;

use crate::domain::{AlignmentResult, Point, PointSet};

/// Point sets smaller than this are never rotated.
const MIN_ALIGN_POINTS: usize = 10;
/// Angles at or below this (degrees) are left alone.
const MIN_ANGLE: f64 = 2.0;
/// Upper bound for trusted eye measurements.
const MAX_ANGLE: f64 = 45.0;
/// Upper bound when the eyes are close together relative to the image.
const MAX_ANGLE_CLOSE_EYES: f64 = 15.0;
/// Eye distance below this fraction of the diagonal counts as close.
const CLOSE_EYES_FRACTION: f64 = 0.05;
/// Dampening applied to close-eye measurements.
const CLOSE_EYES_DAMPENING: f64 = 0.7;

/// White fill for areas exposed by rotation.
pub(crate) const FILL: Rgb<u8> = Rgb([255, 255, 255]);

/// Computes the rotation (degrees) that levels the eyes, if one should be applied.
///
/// Returns `None` for small point sets, sets without eye information,
/// and angles outside `(2°, cap)`.
#[must_use]
pub fn leveling_angle(points: &PointSet, width: u32, height: u32) -> Option<f64> {
    if points.len() < MIN_ALIGN_POINTS {
        return None;
    }
    let (first, second) = points.eye_centers()?;
    let mut angle = (second.y - first.y).atan2(second.x - first.x).to_degrees();

    let diagonal = f64::from(width).hypot(f64::from(height));
    let cap = if first.distance(&second) < diagonal * CLOSE_EYES_FRACTION {
        angle *= CLOSE_EYES_DAMPENING;
        MAX_ANGLE_CLOSE_EYES
    } else {
        MAX_ANGLE
    };

    let magnitude = angle.abs();
    if magnitude > MIN_ANGLE && magnitude < cap {
        Some(angle)
    } else {
        debug!(angle, cap, "skipping rotation");
        None
    }
}

/// Projection that rotates by `-angle_degrees` around the image center.
///
/// Positive angles describe a second eye lower than the first; the
/// projection maps that eye vector onto the horizontal.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn leveling_projection(angle_degrees: f64, width: u32, height: u32) -> Projection {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    Projection::translate(cx, cy)
        * Projection::rotate(-angle_degrees.to_radians() as f32)
        * Projection::translate(-cx, -cy)
}

/// Rotates `image` so the eyes are level and moves `center` with it.
#[must_use]
pub fn align(image: RgbImage, points: &PointSet, center: Point) -> AlignmentResult {
    let (width, height) = image.dimensions();
    let Some(angle) = leveling_angle(points, width, height) else {
        return AlignmentResult {
            image,
            angle_degrees: 0.0,
            center,
        };
    };

    let projection = leveling_projection(angle, width, height);
    let rotated = warp(&image, &projection, Interpolation::Bilinear, FILL);
    #[allow(clippy::cast_possible_truncation)]
    let (x, y) = projection * (center.x as f32, center.y as f32);
    let moved = Point::new(f64::from(x), f64::from(y));
    debug!(
        angle,
        from_x = center.x,
        from_y = center.y,
        to_x = moved.x,
        to_y = moved.y,
        "rotated to level eyes"
    );

    AlignmentResult {
        image: rotated,
        angle_degrees: angle,
        center: moved,
    }
}
