//! Configuration file support for facecrop.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/facecrop/config.toml` (lowest priority)
//! - Project-local: `.facecrop.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use facecrop_core::pipeline::{
    DEFAULT_ACCURATE_MIN_CONFIDENCE, DEFAULT_FACE_FILL_RATIO, DEFAULT_FAST_MIN_CONFIDENCE,
    DEFAULT_MAX_DETECTION_DIMENSION, DEFAULT_MAX_UPSCALE, DEFAULT_MIN_FACE_SIZE,
    DEFAULT_OUTPUT_SIZE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Cropping pipeline settings.
    pub pipeline: PipelineSection,
    /// Detector tier settings.
    pub detector: DetectorSection,
    /// Output settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Cropping pipeline configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    /// Output edge length in pixels.
    pub output_size: Option<u32>,
    /// Fraction of the output occupied by the face (0.0-1.0, exclusive).
    pub face_fill_ratio: Option<f64>,
    /// Faces smaller than this (pixels) are upscaled.
    pub min_face_size: Option<f64>,
    /// Maximum upscale factor for small faces.
    pub max_upscale: Option<f64>,
    /// Longest edge of the detection working copy.
    pub max_detection_dimension: Option<u32>,
}

/// Detector tier configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSection {
    /// Fast-tier confidence floor (0.0-1.0).
    pub fast_min_confidence: Option<f64>,
    /// Accurate-tier confidence floor (0.0-1.0).
    pub accurate_min_confidence: Option<f64>,
}

/// Output configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory crops are written to.
    pub dir: Option<PathBuf>,
    /// Report format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON reports.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/facecrop/config.toml`
    /// 2. Project-local: `.facecrop.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if self.pipeline.output_size == Some(0) {
            return Err("pipeline.output_size must be > 0".into());
        }
        if let Some(r) = self.pipeline.face_fill_ratio {
            if !(r > 0.0 && r < 1.0) {
                return Err(format!(
                    "pipeline.face_fill_ratio must be between 0.0 and 1.0 (exclusive), got {r}"
                ));
            }
        }
        if let Some(s) = self.pipeline.min_face_size {
            if s <= 0.0 {
                return Err(format!("pipeline.min_face_size must be > 0, got {s}"));
            }
        }
        if let Some(u) = self.pipeline.max_upscale {
            if u < 1.0 {
                return Err(format!("pipeline.max_upscale must be >= 1.0, got {u}"));
            }
        }
        if self.pipeline.max_detection_dimension == Some(0) {
            return Err("pipeline.max_detection_dimension must be > 0".into());
        }

        for (name, value) in [
            ("detector.fast_min_confidence", self.detector.fast_min_confidence),
            (
                "detector.accurate_min_confidence",
                self.detector.accurate_min_confidence,
            ),
        ] {
            if let Some(c) = value {
                if !(0.0..=1.0).contains(&c) {
                    return Err(format!("{name} must be 0.0-1.0, got {c}"));
                }
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    pub fn merge(&mut self, other: Self) {
        // General
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        // Pipeline
        self.pipeline.output_size = other.pipeline.output_size.or(self.pipeline.output_size);
        self.pipeline.face_fill_ratio = other
            .pipeline
            .face_fill_ratio
            .or(self.pipeline.face_fill_ratio);
        self.pipeline.min_face_size = other
            .pipeline
            .min_face_size
            .or(self.pipeline.min_face_size);
        self.pipeline.max_upscale = other.pipeline.max_upscale.or(self.pipeline.max_upscale);
        self.pipeline.max_detection_dimension = other
            .pipeline
            .max_detection_dimension
            .or(self.pipeline.max_detection_dimension);

        // Detector
        self.detector.fast_min_confidence = other
            .detector
            .fast_min_confidence
            .or(self.detector.fast_min_confidence);
        self.detector.accurate_min_confidence = other
            .detector
            .accurate_min_confidence
            .or(self.detector.accurate_min_confidence);

        // Output
        self.output.dir = other.output.dir.or_else(|| self.output.dir.take());
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }

    /// Returns this config with every unset value filled from the hardcoded defaults.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self {
            general: GeneralConfig {
                recursive: Some(false),
            },
            pipeline: PipelineSection {
                output_size: Some(DEFAULT_OUTPUT_SIZE),
                face_fill_ratio: Some(DEFAULT_FACE_FILL_RATIO),
                min_face_size: Some(DEFAULT_MIN_FACE_SIZE),
                max_upscale: Some(DEFAULT_MAX_UPSCALE),
                max_detection_dimension: Some(DEFAULT_MAX_DETECTION_DIMENSION),
            },
            detector: DetectorSection {
                fast_min_confidence: Some(DEFAULT_FAST_MIN_CONFIDENCE),
                accurate_min_confidence: Some(DEFAULT_ACCURATE_MIN_CONFIDENCE),
            },
            output: OutputConfig {
                dir: Some(PathBuf::from(DEFAULT_OUTPUT_DIR)),
                format: Some("jsonl".into()),
                pretty: Some(false),
                progress: Some(false),
            },
        };
        let overrides = std::mem::take(&mut self);
        self = defaults;
        self.merge(overrides);
        self
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("facecrop").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.facecrop.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".facecrop.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
