//! Writing finished crops to disk.

use anyhow::{Context, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension used when the source has none.
const DEFAULT_EXTENSION: &str = "jpg";

/// Output file name for a crop of `source`: `<stem>_cropped_<S>x<S>.<ext>`.
#[must_use]
pub fn output_filename(source: &Path, output_size: u32) -> PathBuf {
    let stem = source
        .file_stem()
        .map_or_else(|| "image".into(), |s| s.to_string_lossy());
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or(DEFAULT_EXTENSION);
    PathBuf::from(format!("{stem}_cropped_{output_size}x{output_size}.{ext}"))
}

/// Writes crops into a single output directory.
#[derive(Debug, Clone)]
pub struct CropWriter {
    dir: PathBuf,
}

impl CropWriter {
    /// Creates a writer targeting `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the crop of `source` will be written to.
    #[must_use]
    pub fn target_for(&self, source: &Path, output_size: u32) -> PathBuf {
        self.dir.join(output_filename(source, output_size))
    }

    /// Writes `crop` for `source`, creating the directory if needed.
    ///
    /// The encoding follows the target extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or encoding fails.
    pub fn write(&self, source: &Path, crop: &RgbImage) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create output directory: {}", self.dir.display())
        })?;
        let target = self.target_for(source, crop.width());
        crop.save(&target)
            .with_context(|| format!("Failed to write crop: {}", target.display()))?;
        debug!("Wrote {}", target.display());
        Ok(target)
    }
}
