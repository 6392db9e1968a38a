//! Scale selection that normalizes face size without exposing the frame edge.

use tracing::debug;

use crate::domain::{CropSpec, Point, ScaleBinding};

/// Absorbs float error when flooring scaled dimensions.
const FLOOR_EPSILON: f64 = 1e-9;

/// Computes the scale for an image of `width × height` with the face at
/// `center`.
///
/// The result is the larger of the fill-ratio scale and the smallest
/// scale that keeps a centered `output_size` window inside the image.
/// Margins of one pixel or less are not constrained.
#[must_use]
pub fn compute_scale(
    width: u32,
    height: u32,
    center: Point,
    face_size: f64,
    output_size: u32,
    fill_ratio: f64,
) -> (f64, ScaleBinding) {
    let size = f64::from(output_size);
    let fill_scale = size * fill_ratio / face_size;

    let w = f64::from(width);
    let h = f64::from(height);
    let needed = f64::from(output_size / 2) + 1.0;
    let margins = [center.x, center.y, w - center.x, h - center.y];
    let scale_min = margins
        .into_iter()
        .filter(|&margin| margin > 1.0)
        .map(|margin| needed / margin)
        .chain([size / w, size / h])
        .fold(0.0, f64::max);

    if scale_min > fill_scale {
        (scale_min, ScaleBinding::Frame)
    } else {
        (fill_scale, ScaleBinding::FillRatio)
    }
}

/// Output of [`fit`].
///
/// The scaled image is never materialized here; [`crop_scaled`](super::crop::crop_scaled)
/// renders only the part under the output window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fitted {
    /// Applied scale and scaled center.
    pub spec: CropSpec,
    /// Width of the scaled image.
    pub width: u32,
    /// Height of the scaled image.
    pub height: u32,
}

impl Fitted {
    /// Dimensions of the scaled image.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Plans the resize of a `width × height` image by the scale from
/// [`compute_scale`] and moves `center` with it.
#[must_use]
pub fn fit(
    (width, height): (u32, u32),
    center: Point,
    face_size: f64,
    output_size: u32,
    fill_ratio: f64,
) -> Fitted {
    let (scale, binding) =
        compute_scale(width, height, center, face_size, output_size, fill_ratio);

    let new_width = scaled_dimension(width, scale);
    let new_height = scaled_dimension(height, scale);
    debug!(
        scale,
        ?binding,
        width = new_width,
        height = new_height,
        "fitted face to frame"
    );

    Fitted {
        spec: CropSpec {
            scale,
            center_after_scale: center.scaled(scale),
            output_size,
            binding,
        },
        width: new_width,
        height: new_height,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_dimension(value: u32, scale: f64) -> u32 {
    ((f64::from(value) * scale + FLOOR_EPSILON).floor() as u32).max(1)
}
