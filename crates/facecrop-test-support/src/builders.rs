//! Synthetic image and landmark builders for testing.

use std::f64::consts::TAU;

use facecrop_core::domain::{ImageInfo, PixelBox, Point, PointSet, DENSE_MESH_POINTS, FACE_MESH_EYES};
use image::{DynamicImage, Rgb, RgbImage};

/// Background color of synthetic portraits.
pub const BACKGROUND: Rgb<u8> = Rgb([90, 110, 130]);
/// Face color of synthetic portraits.
pub const SKIN: Rgb<u8> = Rgb([225, 180, 150]);
/// Marker color used to locate a point after cropping.
pub const MARKER: Rgb<u8> = Rgb([255, 0, 0]);

/// Builder for creating synthetic test images.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    /// Creates a uniform RGB image.
    #[must_use]
    pub fn uniform(width: u32, height: u32, color: Rgb<u8>) -> ImageInfo {
        let img = RgbImage::from_pixel(width, height, color);
        ImageInfo::new("synthetic://uniform", &DynamicImage::ImageRgb8(img))
    }

    /// Creates a portrait: an elliptical face filling `face` on a flat
    /// background, with a small marker square on the face center.
    #[must_use]
    pub fn portrait(width: u32, height: u32, face: PixelBox) -> ImageInfo {
        let center = face.center();
        let rx = (face.width / 2.0).max(1.0);
        let ry = (face.height / 2.0).max(1.0);
        let img = RgbImage::from_fn(width, height, |x, y| {
            let px = f64::from(x) + 0.5;
            let py = f64::from(y) + 0.5;
            if (px - center.x).abs() <= 2.0 && (py - center.y).abs() <= 2.0 {
                return MARKER;
            }
            let nx = (px - center.x) / rx;
            let ny = (py - center.y) / ry;
            if nx * nx + ny * ny <= 1.0 {
                SKIN
            } else {
                BACKGROUND
            }
        });
        ImageInfo::new("synthetic://portrait", &DynamicImage::ImageRgb8(img))
    }

    /// Creates a uniform image with a `MARKER` square of side `2 * radius + 1`
    /// centered on the pixel containing `at`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn with_marker(width: u32, height: u32, at: Point, radius: u32) -> ImageInfo {
        let mx = at.x.floor() as i64;
        let my = at.y.floor() as i64;
        let r = i64::from(radius);
        let img = RgbImage::from_fn(width, height, |x, y| {
            if (i64::from(x) - mx).abs() <= r && (i64::from(y) - my).abs() <= r {
                MARKER
            } else {
                BACKGROUND
            }
        });
        ImageInfo::new("synthetic://marker", &DynamicImage::ImageRgb8(img))
    }

    /// Horizontal gradient from black to white, used to check orientation.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn horizontal_gradient(width: u32, height: u32) -> ImageInfo {
        let img = RgbImage::from_fn(width, height, |x, _| {
            let val = ((u32::from(u8::MAX) * x) / width.max(1)) as u8;
            Rgb([val, val, val])
        });
        ImageInfo::new(
            "synthetic://horizontal_gradient",
            &DynamicImage::ImageRgb8(img),
        )
    }

    /// Centroid of all `MARKER` pixels, or `None` if there are none.
    #[must_use]
    pub fn marker_centroid(image: &RgbImage) -> Option<Point> {
        let (mut sx, mut sy, mut n) = (0.0, 0.0, 0.0);
        for (x, y, pixel) in image.enumerate_pixels() {
            // Resampling blurs the marker edge; only count strongly red pixels.
            if pixel[0] > 200 && pixel[1] < 80 && pixel[2] < 80 {
                sx += f64::from(x) + 0.5;
                sy += f64::from(y) + 0.5;
                n += 1.0;
            }
        }
        (n > 0.0).then(|| Point::new(sx / n, sy / n))
    }
}

/// Builder for synthetic landmark meshes.
///
/// Dense meshes place the 468 points on a ring around the face center,
/// except the eye-contour indices, which sit on small circles around the
/// requested eye positions.
#[derive(Debug, Clone, Copy)]
pub struct FaceMeshBuilder {
    center: Point,
    eye_distance: f64,
    tilt_degrees: f64,
    ring_radius: f64,
}

impl FaceMeshBuilder {
    /// Starts a frontal, level mesh centered on `center`.
    #[must_use]
    pub fn new(center: Point, eye_distance: f64) -> Self {
        Self {
            center,
            eye_distance,
            tilt_degrees: 0.0,
            ring_radius: eye_distance,
        }
    }

    /// Tilts the eye line by `degrees` (positive: second eye lower).
    #[must_use]
    pub const fn tilt(mut self, degrees: f64) -> Self {
        self.tilt_degrees = degrees;
        self
    }

    /// Sets the radius of the outline ring.
    #[must_use]
    pub const fn ring_radius(mut self, radius: f64) -> Self {
        self.ring_radius = radius;
        self
    }

    /// Eye centers as `(first, second)`.
    #[must_use]
    pub fn eyes(&self) -> (Point, Point) {
        let (sin, cos) = self.tilt_degrees.to_radians().sin_cos();
        let half = self.eye_distance / 2.0;
        (
            Point::new(self.center.x - half * cos, self.center.y - half * sin),
            Point::new(self.center.x + half * cos, self.center.y + half * sin),
        )
    }

    /// Builds a dense mesh.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn dense(&self) -> PointSet {
        let mut points: Vec<Point> = (0..DENSE_MESH_POINTS)
            .map(|i| {
                let t = TAU * i as f64 / DENSE_MESH_POINTS as f64;
                Point::new(
                    self.center.x + self.ring_radius * t.cos(),
                    self.center.y + self.ring_radius * t.sin(),
                )
            })
            .collect();

        let (first, second) = self.eyes();
        let contour = self.eye_distance / 10.0;
        for (eye, indices) in [(first, FACE_MESH_EYES.first), (second, FACE_MESH_EYES.second)] {
            let n = indices.len() as f64;
            for (k, &i) in indices.iter().enumerate() {
                let t = TAU * k as f64 / n;
                points[i] = Point::new(eye.x + contour * t.cos(), eye.y + contour * t.sin());
            }
        }
        PointSet::from_points(points)
    }

    /// Builds a sparse mesh: the two eyes followed by `extra` ring points.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn sparse(&self, extra: usize) -> PointSet {
        let (first, second) = self.eyes();
        let mut points = vec![first, second];
        points.extend((0..extra).map(|i| {
            let t = TAU * i as f64 / extra.max(1) as f64;
            Point::new(
                self.center.x + self.ring_radius * t.cos(),
                self.center.y + self.ring_radius * t.sin(),
            )
        }));
        PointSet::Sparse(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portrait_draws_face_and_marker() {
        let face = PixelBox {
            x: 40.0,
            y: 30.0,
            width: 20.0,
            height: 20.0,
        };
        let img = SyntheticImageBuilder::portrait(100, 80, face);
        assert_eq!((img.width, img.height), (100, 80));
        assert_eq!(*img.image.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*img.image.get_pixel(45, 40), SKIN);
        assert_eq!(*img.image.get_pixel(50, 40), MARKER);
    }

    #[test]
    fn marker_centroid_finds_square() {
        let img = SyntheticImageBuilder::with_marker(64, 64, Point::new(20.0, 30.0), 2);
        let c = SyntheticImageBuilder::marker_centroid(&img.image).unwrap_or_default();
        assert!((c.x - 20.5).abs() < 1e-9);
        assert!((c.y - 30.5).abs() < 1e-9);
        assert!(SyntheticImageBuilder::marker_centroid(&RgbImage::new(4, 4)).is_none());
    }

    #[test]
    fn dense_mesh_eyes_match_requested_tilt() {
        let builder = FaceMeshBuilder::new(Point::new(500.0, 400.0), 100.0).tilt(10.0);
        let mesh = builder.dense();
        assert!(matches!(mesh, PointSet::DenseMesh { .. }));

        let (a, b) = mesh.eye_centers().unwrap_or_default();
        let (ea, eb) = builder.eyes();
        assert!(a.distance(&ea) < 1e-6);
        assert!(b.distance(&eb) < 1e-6);
        let angle = (b.y - a.y).atan2(b.x - a.x).to_degrees();
        assert!((angle - 10.0).abs() < 1e-6);
    }

    #[test]
    fn sparse_mesh_starts_with_eyes() {
        let builder = FaceMeshBuilder::new(Point::new(50.0, 50.0), 20.0);
        let mesh = builder.sparse(12);
        assert_eq!(mesh.len(), 14);
        assert_eq!(mesh.eye_centers(), Some(builder.eyes()));
    }
}
