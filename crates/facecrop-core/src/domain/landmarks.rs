//! Landmark point sets.
//!
//! The number of points decides which heuristics apply downstream, so the
//! class is carried in the type instead of being re-derived from the length
//! at every use site.

use super::{PixelBox, Point};

/// Minimum number of points for a mesh to support eye-index lookup.
pub const DENSE_MESH_POINTS: usize = 468;

/// Eye-contour indices of a dense face mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeIndexTable {
    /// Contour of the eye that appears on the image's left side.
    pub first: &'static [usize],
    /// Contour of the eye that appears on the image's right side.
    pub second: &'static [usize],
    /// Single canonical point per eye, used when a contour index is missing.
    pub canonical: (usize, usize),
}

/// Eye table for the 468-point face mesh topology.
pub const FACE_MESH_EYES: EyeIndexTable = EyeIndexTable {
    first: &[
        33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
    ],
    second: &[
        362, 382, 381, 380, 374, 373, 390, 249, 263, 466, 388, 387, 386, 385, 384, 398,
    ],
    canonical: (33, 263),
};

/// An ordered set of landmark points in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PointSet {
    /// Four box corners (top-left, top-right, bottom-right, bottom-left)
    /// followed by the box center.
    BoxDerived([Point; 5]),
    /// A mesh too small for eye-index lookup.
    Sparse(Vec<Point>),
    /// A dense mesh with a known eye topology.
    DenseMesh {
        /// Mesh points.
        points: Vec<Point>,
        /// Eye-contour indices for this topology.
        eyes: EyeIndexTable,
    },
}

impl PointSet {
    /// Classifies adapter output by size.
    #[must_use]
    pub fn from_points(points: Vec<Point>) -> Self {
        if points.len() >= DENSE_MESH_POINTS {
            Self::DenseMesh {
                points,
                eyes: FACE_MESH_EYES,
            }
        } else {
            Self::Sparse(points)
        }
    }

    /// Synthesizes the 5-point fallback from a pixel box.
    #[must_use]
    pub fn from_box(bbox: &PixelBox) -> Self {
        let x_min = bbox.x;
        let y_min = bbox.y;
        let x_max = bbox.x + bbox.width;
        let y_max = bbox.y + bbox.height;
        Self::BoxDerived([
            Point::new(x_min, y_min),
            Point::new(x_max, y_min),
            Point::new(x_max, y_max),
            Point::new(x_min, y_max),
            bbox.center(),
        ])
    }

    /// The points, in order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        match self {
            Self::BoxDerived(points) => points,
            Self::Sparse(points) | Self::DenseMesh { points, .. } => points,
        }
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points().len()
    }

    /// Returns true if the set holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points().is_empty()
    }

    /// Mean of all points, or `None` for an empty set.
    #[must_use]
    pub fn centroid(&self) -> Option<Point> {
        let points = self.points();
        if points.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = points.len() as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }

    /// Axis-aligned bounds of the points, or `None` for an empty set.
    #[must_use]
    pub fn bounds(&self) -> Option<PixelBox> {
        let mut iter = self.points().iter();
        let first = iter.next()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in iter {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(PixelBox {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    /// Returns a copy with every coordinate multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            Self::BoxDerived(points) => Self::BoxDerived(points.map(|p| p.scaled(factor))),
            Self::Sparse(points) => {
                Self::Sparse(points.iter().map(|p| p.scaled(factor)).collect())
            }
            Self::DenseMesh { points, eyes } => Self::DenseMesh {
                points: points.iter().map(|p| p.scaled(factor)).collect(),
                eyes: *eyes,
            },
        }
    }

    /// Eye centers as `(first, second)`, ordered as they appear left to
    /// right in a frontal image.
    ///
    /// Dense meshes average their eye contours; sparse meshes fall back to
    /// their first two points. Box-derived sets carry no eye information.
    #[must_use]
    pub fn eye_centers(&self) -> Option<(Point, Point)> {
        match self {
            Self::BoxDerived(_) => None,
            Self::Sparse(points) => match points.as_slice() {
                [a, b, ..] => Some((*a, *b)),
                _ => None,
            },
            Self::DenseMesh { points, eyes } => {
                let first = mean_of(points, eyes.first);
                let second = mean_of(points, eyes.second);
                match (first, second) {
                    (Some(a), Some(b)) => Some((a, b)),
                    _ => {
                        let (a, b) = eyes.canonical;
                        Some((*points.get(a)?, *points.get(b)?))
                    }
                }
            }
        }
    }
}

/// Mean of the indexed points; `None` if any index is out of range.
fn mean_of(points: &[Point], indices: &[usize]) -> Option<Point> {
    if indices.is_empty() {
        return None;
    }
    let mut sx = 0.0;
    let mut sy = 0.0;
    for &i in indices {
        let p = points.get(i)?;
        sx += p.x;
        sy += p.y;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = indices.len() as f64;
    Some(Point::new(sx / n, sy / n))
}
