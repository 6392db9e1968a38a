//! Landmark selection for the chosen face.

use tracing::debug;

use crate::domain::{PixelBox, PointSet};

/// One rung of the landmark ladder.
pub trait PointSetStrategy: Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Returns a point set for `face`, or `None` to defer to the next rung.
    fn select(&self, face: &PixelBox, meshes: &[PointSet]) -> Option<PointSet>;
}

/// Picks the mesh whose centroid is nearest the face box center.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestMesh;

impl PointSetStrategy for NearestMesh {
    fn name(&self) -> &'static str {
        "mesh"
    }

    fn select(&self, face: &PixelBox, meshes: &[PointSet]) -> Option<PointSet> {
        let target = face.center();
        meshes
            .iter()
            .filter_map(|mesh| Some((mesh, mesh.centroid()?.distance(&target))))
            .fold(None, |best: Option<(&PointSet, f64)>, (mesh, dist)| match best {
                Some((_, best_dist)) if best_dist <= dist => best,
                _ => Some((mesh, dist)),
            })
            .map(|(mesh, _)| mesh.clone())
    }
}

/// Synthesizes the 5-point set from the face box.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxFallback;

impl PointSetStrategy for BoxFallback {
    fn name(&self) -> &'static str {
        "box"
    }

    fn select(&self, face: &PixelBox, _meshes: &[PointSet]) -> Option<PointSet> {
        Some(PointSet::from_box(face))
    }
}

/// Default ladder: matched mesh first, then the box.
pub static DEFAULT_STRATEGIES: [&dyn PointSetStrategy; 2] = [&NearestMesh, &BoxFallback];

/// Runs `strategies` in order and returns the first point set produced.
///
/// Falls back to the box-derived set if every strategy defers.
#[must_use]
pub fn select_points(
    face: &PixelBox,
    meshes: &[PointSet],
    strategies: &[&dyn PointSetStrategy],
) -> PointSet {
    strategies
        .iter()
        .find_map(|strategy| {
            let points = strategy.select(face, meshes)?;
            debug!(
                strategy = strategy.name(),
                points = points.len(),
                "selected landmarks"
            );
            Some(points)
        })
        .unwrap_or_else(|| PointSet::from_box(face))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;

    fn face() -> PixelBox {
        PixelBox {
            x: 400.0,
            y: 300.0,
            width: 200.0,
            height: 200.0,
        }
    }

    fn mesh_around(cx: f64, cy: f64) -> PointSet {
        PointSet::Sparse(vec![
            Point::new(cx - 10.0, cy - 10.0),
            Point::new(cx + 10.0, cy + 10.0),
        ])
    }

    #[test]
    fn no_meshes_falls_back_to_box() {
        let points = select_points(&face(), &[], &DEFAULT_STRATEGIES);
        assert!(matches!(points, PointSet::BoxDerived(_)));
    }

    #[test]
    fn single_mesh_is_used_even_when_far() {
        let far = mesh_around(10.0, 10.0);
        let points = select_points(&face(), std::slice::from_ref(&far), &DEFAULT_STRATEGIES);
        assert_eq!(points, far);
    }

    #[test]
    fn nearest_centroid_wins() {
        let far = mesh_around(100.0, 100.0);
        let near = mesh_around(505.0, 395.0);
        let points = select_points(&face(), &[far, near.clone()], &DEFAULT_STRATEGIES);
        assert_eq!(points, near);
    }

    #[test]
    fn empty_meshes_are_ignored() {
        let points = select_points(&face(), &[PointSet::Sparse(vec![])], &DEFAULT_STRATEGIES);
        assert!(matches!(points, PointSet::BoxDerived(_)));
    }

    #[test]
    fn empty_ladder_still_yields_box() {
        let points = select_points(&face(), &[mesh_around(500.0, 400.0)], &[]);
        assert!(matches!(points, PointSet::BoxDerived(_)));
    }
}
