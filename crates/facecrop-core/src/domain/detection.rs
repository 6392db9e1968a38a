//! Detector output and tier profiles.

use serde::{Deserialize, Serialize};

use super::RelativeBox;

/// A face candidate reported by a detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Face bounding box relative to the detection image.
    #[serde(rename = "box")]
    pub bbox: RelativeBox,
    /// Detector confidence (0.0 to 1.0).
    pub confidence: f64,
}

impl Detection {
    /// Creates a detection.
    #[must_use]
    pub const fn new(bbox: RelativeBox, confidence: f64) -> Self {
        Self { bbox, confidence }
    }
}

/// Detector invocation profile.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorTier {
    /// Short-range model, quick, good for frontal faces.
    Fast,
    /// Full-range model, slower, recovers angled and distant faces.
    Accurate,
}

impl DetectorTier {
    /// Stable lowercase name used in logs and sidecar files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Accurate => "accurate",
        }
    }
}

/// A tier together with the confidence floor it is invoked with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierProfile {
    /// Which detector tier to run.
    pub tier: DetectorTier,
    /// Detections below this confidence are discarded.
    pub min_confidence: f64,
}

impl TierProfile {
    /// Creates a tier profile.
    #[must_use]
    pub const fn new(tier: DetectorTier, min_confidence: f64) -> Self {
        Self {
            tier,
            min_confidence,
        }
    }

    /// Returns true if `detection` clears this tier's floor.
    #[must_use]
    pub fn accepts(&self, detection: &Detection) -> bool {
        detection.confidence >= self.min_confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_floor_is_inclusive() {
        let profile = TierProfile::new(DetectorTier::Fast, 0.5);
        let bbox = RelativeBox::new(0.0, 0.0, 0.1, 0.1);
        assert!(profile.accepts(&Detection::new(bbox, 0.5)));
        assert!(!profile.accepts(&Detection::new(bbox, 0.49)));
    }

    #[test]
    fn detection_serializes_box_field() {
        let det = Detection::new(RelativeBox::new(0.4, 0.3, 0.2, 0.2), 0.9);
        let json = serde_json::to_string(&det).unwrap_or_default();
        assert!(json.contains("\"box\""));
        assert_eq!(DetectorTier::Accurate.name(), "accurate");
    }
}
