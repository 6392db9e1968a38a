//! Final square crop.

use image::{imageops::FilterType, RgbImage};
use tracing::debug;

use super::align::FILL;
use super::fit::Fitted;
use crate::domain::Point;

/// Output of [`crop`].
#[derive(Debug, Clone)]
pub struct Cropped {
    /// Exactly `output_size × output_size` pixels.
    pub image: RgbImage,
    /// Whether part of the window lay outside the image.
    pub padded: bool,
}

/// Square window in scaled-image pixels.
#[derive(Debug, Clone, Copy)]
struct Window {
    left: i64,
    top: i64,
    size: u32,
}

impl Window {
    /// Window of `output_size` rounded down to even, around the floored center.
    #[allow(clippy::cast_possible_truncation)]
    fn centered(center: Point, output_size: u32) -> Self {
        let half = output_size / 2;
        Self {
            left: center.x.floor() as i64 - i64::from(half),
            top: center.y.floor() as i64 - i64::from(half),
            size: (half * 2).max(1),
        }
    }

    fn leaves(&self, width: u32, height: u32) -> bool {
        let size = i64::from(self.size);
        self.left < 0
            || self.top < 0
            || self.left + size > i64::from(width)
            || self.top + size > i64::from(height)
    }

    /// Intersection with a `width × height` image as `(x, y, width, height)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn in_bounds(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.left.max(0);
        let y0 = self.top.max(0);
        let x1 = (self.left + i64::from(self.size)).min(i64::from(width));
        let y1 = (self.top + i64::from(self.size)).min(i64::from(height));
        (x1 > x0 && y1 > y0).then(|| {
            (
                x0 as u32,
                y0 as u32,
                (x1 - x0) as u32,
                (y1 - y0) as u32,
            )
        })
    }
}

/// Cuts an `output_size` square centered on `center` out of `image`.
///
/// The center is floored to whole pixels. Parts of the window outside the
/// image are filled white.
#[must_use]
pub fn crop(image: &RgbImage, center: Point, output_size: u32) -> Cropped {
    let window = Window::centered(center, output_size);
    let (width, height) = image.dimensions();

    let mut canvas = RgbImage::from_pixel(window.size, window.size, FILL);
    if let Some((x, y, w, h)) = window.in_bounds(width, height) {
        let sub = image::imageops::crop_imm(image, x, y, w, h).to_image();
        image::imageops::replace(
            &mut canvas,
            &sub,
            i64::from(x) - window.left,
            i64::from(y) - window.top,
        );
    }
    finish(canvas, window, window.leaves(width, height), output_size)
}

/// Crops the output window out of `image` resized as planned by `fitted`.
///
/// Downscales resize the whole image first. Upscales sample only the
/// pixels under the window, so memory stays bounded by the output size
/// however large the planned scale is.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn crop_scaled(image: &RgbImage, fitted: &Fitted) -> Cropped {
    let spec = &fitted.spec;
    let (width, height) = fitted.dimensions();
    if fitted.dimensions() == image.dimensions() {
        return crop(image, spec.center_after_scale, spec.output_size);
    }
    if spec.scale <= 1.0 {
        let scaled = image::imageops::resize(image, width, height, FilterType::Triangle);
        return crop(&scaled, spec.center_after_scale, spec.output_size);
    }

    let window = Window::centered(spec.center_after_scale, spec.output_size);
    let mut canvas = RgbImage::from_pixel(window.size, window.size, FILL);
    if let Some((x, y, w, h)) = window.in_bounds(width, height) {
        for sy in y..y + h {
            let v = (sy as f32 + 0.5) / height as f32;
            for sx in x..x + w {
                let u = (sx as f32 + 0.5) / width as f32;
                if let Some(pixel) = image::imageops::sample_bilinear(image, u, v) {
                    canvas.put_pixel(
                        (i64::from(sx) - window.left) as u32,
                        (i64::from(sy) - window.top) as u32,
                        pixel,
                    );
                }
            }
        }
    }
    finish(canvas, window, window.leaves(width, height), spec.output_size)
}

fn finish(canvas: RgbImage, window: Window, padded: bool, output_size: u32) -> Cropped {
    if padded {
        debug!(
            left = window.left,
            top = window.top,
            window = window.size,
            "crop window needed padding"
        );
    }
    let image = if window.size == output_size {
        canvas
    } else {
        image::imageops::resize(&canvas, output_size, output_size, FilterType::Triangle)
    };
    Cropped { image, padded }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn interior_window_is_unpadded() {
        let mut image = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        image.put_pixel(50, 50, Rgb([255, 0, 0]));
        let out = crop(&image, Point::new(50.7, 50.2), 20);
        assert!(!out.padded);
        assert_eq!(out.image.dimensions(), (20, 20));
        // Center pixel lands at (half, half).
        assert_eq!(*out.image.get_pixel(10, 10), Rgb([255, 0, 0]));
    }

    #[test]
    fn window_past_edge_is_padded_white() {
        let image = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        let out = crop(&image, Point::new(5.0, 50.0), 20);
        assert!(out.padded);
        assert_eq!(*out.image.get_pixel(0, 10), FILL);
        assert_eq!(*out.image.get_pixel(4, 10), FILL);
        assert_eq!(*out.image.get_pixel(5, 10), Rgb([0, 0, 0]));
    }

    #[test]
    fn window_outside_image_is_all_white() {
        let image = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        let out = crop(&image, Point::new(500.0, 500.0), 8);
        assert!(out.padded);
        assert!(out.image.pixels().all(|p| *p == FILL));
    }

    #[test]
    fn odd_sizes_are_resampled_to_exact_output() {
        let image = RgbImage::from_pixel(100, 100, Rgb([9, 9, 9]));
        let out = crop(&image, Point::new(50.0, 50.0), 31);
        assert_eq!(out.image.dimensions(), (31, 31));
        assert!(!out.padded);

        let out = crop(&image, Point::new(50.0, 50.0), 1);
        assert_eq!(out.image.dimensions(), (1, 1));
    }

    fn fitted(image: &RgbImage, center: Point, face_size: f64, output_size: u32) -> Fitted {
        crate::pipeline::fit::fit(image.dimensions(), center, face_size, output_size, 0.5)
    }

    #[test]
    fn unscaled_fit_matches_plain_crop() {
        let image = RgbImage::from_fn(100, 100, |x, y| Rgb([x as u8, y as u8, 0]));
        // 20 * 0.5 / 10 = 1.0
        let plan = fitted(&image, Point::new(50.0, 50.0), 10.0, 20);
        assert_eq!(plan.dimensions(), (100, 100));
        assert_eq!(
            crop_scaled(&image, &plan).image,
            crop(&image, Point::new(50.0, 50.0), 20).image
        );
    }

    #[test]
    fn upscale_sampling_matches_full_resize() {
        let image = RgbImage::from_fn(40, 30, |x, y| Rgb([(x * 6) as u8, (y * 8) as u8, 77]));
        let plan = fitted(&image, Point::new(20.0, 15.0), 4.0, 16);
        assert!(plan.spec.scale > 1.0);

        let full = image::imageops::resize(&image, plan.width, plan.height, FilterType::Triangle);
        let expected = crop(&full, plan.spec.center_after_scale, 16);
        let sampled = crop_scaled(&image, &plan);
        assert_eq!(sampled.padded, expected.padded);
        for (a, b) in sampled.image.pixels().zip(expected.image.pixels()) {
            for c in 0..3 {
                assert!(a[c].abs_diff(b[c]) <= 2, "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn downscale_resizes_whole_image() {
        let image = RgbImage::from_pixel(400, 400, Rgb([30, 60, 90]));
        let plan = fitted(&image, Point::new(200.0, 200.0), 200.0, 64);
        assert!(plan.spec.scale < 1.0);
        let out = crop_scaled(&image, &plan);
        assert_eq!(out.image.dimensions(), (64, 64));
        assert!(!out.padded);
        assert_eq!(*out.image.get_pixel(32, 32), Rgb([30, 60, 90]));
    }

    #[test]
    fn extreme_edge_scale_renders_only_the_window() {
        // 1.5px from the left edge of a 4000x3000 image: scale 257/1.5.
        let image = RgbImage::from_pixel(4000, 3000, Rgb([10, 20, 30]));
        let plan = fitted(&image, Point::new(1.5, 1500.0), 600.0, 512);
        assert!(plan.width > 600_000);

        let out = crop_scaled(&image, &plan);
        assert_eq!(out.image.dimensions(), (512, 512));
        assert!(!out.padded);
        assert_eq!(*out.image.get_pixel(0, 0), Rgb([10, 20, 30]));
        assert_eq!(*out.image.get_pixel(511, 511), Rgb([10, 20, 30]));
    }
}
