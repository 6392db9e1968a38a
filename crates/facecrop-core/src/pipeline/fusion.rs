//! Candidate fusion across detector tiers.

use tracing::debug;

use crate::domain::{Detection, PipelineError, Point};

/// Distance (in pixels) at which the proximity score halves.
const PROXIMITY_FALLOFF: f64 = 100.0;
/// Boxes thinner than this (relative) are penalized.
const MIN_RELATIVE_EXTENT: f64 = 0.05;
/// Boxes starting further outside the frame than this are penalized.
const MAX_OUTSIDE_OFFSET: f64 = -0.1;

/// The candidate chosen by [`select_candidate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedCandidate {
    /// The winning detection.
    pub detection: Detection,
    /// Its score, or `None` if it was the only candidate.
    pub score: Option<f64>,
    /// Number of candidates considered.
    pub candidates: usize,
}

/// Scores a detection against a detection image of `width × height`.
#[must_use]
pub fn score(detection: &Detection, width: u32, height: u32) -> f64 {
    let bbox = detection.bbox.to_pixels(width, height);
    let image_center = Point::new(f64::from(width) / 2.0, f64::from(height) / 2.0);
    let proximity = 1.0 / (1.0 + bbox.center().distance(&image_center) / PROXIMITY_FALLOFF);
    bbox.area() * detection.confidence.powf(1.5) * proximity * validity(detection)
}

fn validity(detection: &Detection) -> f64 {
    let rel = &detection.bbox;
    let mut validity = 1.0;
    if rel.width < MIN_RELATIVE_EXTENT || rel.height < MIN_RELATIVE_EXTENT {
        validity = 0.5;
    }
    // Out-of-frame overrides the thin-box penalty.
    if rel.xmin < MAX_OUTSIDE_OFFSET || rel.ymin < MAX_OUTSIDE_OFFSET {
        validity = 0.7;
    }
    validity
}

/// Picks the best candidate from the concatenated tier outputs.
///
/// Candidates are expected in tier order (fast first); ties keep the
/// earliest one.
///
/// # Errors
///
/// Returns [`PipelineError::NoFaceDetected`] if `candidates` is empty.
pub fn select_candidate(
    candidates: &[Detection],
    width: u32,
    height: u32,
) -> Result<SelectedCandidate, PipelineError> {
    match candidates {
        [] => Err(PipelineError::NoFaceDetected),
        [only] => Ok(SelectedCandidate {
            detection: *only,
            score: None,
            candidates: 1,
        }),
        [first, rest @ ..] => {
            let mut best = (*first, score(first, width, height));
            for candidate in rest {
                let s = score(candidate, width, height);
                if s > best.1 {
                    best = (*candidate, s);
                }
            }
            debug!(
                candidates = candidates.len(),
                score = best.1,
                confidence = best.0.confidence,
                "selected face candidate"
            );
            Ok(SelectedCandidate {
                detection: best.0,
                score: Some(best.1),
                candidates: candidates.len(),
            })
        }
    }
}
