//! Pipeline-wide configuration.

use serde::{Deserialize, Serialize};

use crate::domain::{ConfigError, DetectorTier, TierProfile};

/// Default output edge length in pixels.
pub const DEFAULT_OUTPUT_SIZE: u32 = 512;
/// Default fraction of the output occupied by the face size metric.
pub const DEFAULT_FACE_FILL_RATIO: f64 = 0.5;
/// Default confidence floor of the fast tier.
pub const DEFAULT_FAST_MIN_CONFIDENCE: f64 = 0.5;
/// Default confidence floor of the accurate tier.
pub const DEFAULT_ACCURATE_MIN_CONFIDENCE: f64 = 0.3;
/// Default minimum face size before upscaling, in pixels.
pub const DEFAULT_MIN_FACE_SIZE: f64 = 40.0;
/// Default maximum upscale factor for small faces.
pub const DEFAULT_MAX_UPSCALE: f64 = 3.0;
/// Default longest edge of the detection working copy.
pub const DEFAULT_MAX_DETECTION_DIMENSION: u32 = 1920;

/// Immutable settings for [`FacePipeline`](super::FacePipeline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Output edge length in pixels.
    pub output_size: u32,
    /// Target fraction of the output frame occupied by the face, in `(0, 1)`.
    pub face_fill_ratio: f64,
    /// Fast-tier confidence floor.
    pub fast_min_confidence: f64,
    /// Accurate-tier confidence floor.
    pub accurate_min_confidence: f64,
    /// Faces smaller than this are upscaled before alignment.
    pub min_face_size: f64,
    /// Largest allowed upscale factor.
    pub max_upscale: f64,
    /// Images larger than this are downscaled for detection.
    pub max_detection_dimension: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_size: DEFAULT_OUTPUT_SIZE,
            face_fill_ratio: DEFAULT_FACE_FILL_RATIO,
            fast_min_confidence: DEFAULT_FAST_MIN_CONFIDENCE,
            accurate_min_confidence: DEFAULT_ACCURATE_MIN_CONFIDENCE,
            min_face_size: DEFAULT_MIN_FACE_SIZE,
            max_upscale: DEFAULT_MAX_UPSCALE,
            max_detection_dimension: DEFAULT_MAX_DETECTION_DIMENSION,
        }
    }
}

impl PipelineConfig {
    /// Checks that every value is within its valid range.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_size == 0 {
            return Err(ConfigError::ZeroOutputSize);
        }
        if !(self.face_fill_ratio > 0.0 && self.face_fill_ratio < 1.0) {
            return Err(ConfigError::FillRatio(self.face_fill_ratio));
        }
        for (name, value) in [
            ("fast_min_confidence", self.fast_min_confidence),
            ("accurate_min_confidence", self.accurate_min_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Confidence { name, value });
            }
        }
        if !(self.min_face_size > 0.0 && self.min_face_size.is_finite()) {
            return Err(ConfigError::MinFaceSize(self.min_face_size));
        }
        if !(self.max_upscale >= 1.0 && self.max_upscale.is_finite()) {
            return Err(ConfigError::MaxUpscale(self.max_upscale));
        }
        if self.max_detection_dimension == 0 {
            return Err(ConfigError::ZeroDetectionDimension);
        }
        Ok(())
    }

    /// Detector tiers in invocation order, each with its floor.
    #[must_use]
    pub fn tier_profiles(&self) -> [TierProfile; 2] {
        [
            TierProfile::new(DetectorTier::Fast, self.fast_min_confidence),
            TierProfile::new(DetectorTier::Accurate, self.accurate_min_confidence),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.output_size, 512);
        assert!((config.face_fill_ratio - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.max_detection_dimension, 1920);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_fill_ratio_bounds() {
        for ratio in [0.0, 1.0, -0.2, f64::NAN] {
            let config = PipelineConfig {
                face_fill_ratio: ratio,
                ..PipelineConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::FillRatio(_))));
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        let config = PipelineConfig {
            output_size: 0,
            ..PipelineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroOutputSize));

        let config = PipelineConfig {
            accurate_min_confidence: 1.5,
            ..PipelineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Confidence {
                name: "accurate_min_confidence",
                value: 1.5
            })
        );

        let config = PipelineConfig {
            max_upscale: 0.5,
            ..PipelineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MaxUpscale(0.5)));
    }

    #[test]
    fn tiers_run_fast_first() {
        let [fast, accurate] = PipelineConfig::default().tier_profiles();
        assert_eq!(fast.tier, DetectorTier::Fast);
        assert_eq!(accurate.tier, DetectorTier::Accurate);
        assert!(accurate.min_confidence < fast.min_confidence);
    }
}
