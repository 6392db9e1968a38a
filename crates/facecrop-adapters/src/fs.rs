//! Filesystem adapter for loading images.

use anyhow::{Context, Result};
use facecrop_core::{ImageInfo, ImageSource, SourceItem};
use image::DynamicImage;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Supported image extensions.
const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "tif", "tiff", "gif"];

/// Filesystem image source adapter.
pub struct FsImageSource {
    paths: Vec<PathBuf>,
    recursive: bool,
}

impl FsImageSource {
    /// Creates a new filesystem image source.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files or directories to scan
    /// * `recursive` - Whether to recurse into subdirectories
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self { paths, recursive }
    }

    /// Collects all image files from the configured paths.
    ///
    /// Directory entries are sorted so batches run in a stable order.
    #[must_use]
    pub fn collect_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in &self.paths {
            if path.is_file() {
                if is_supported_image(path) {
                    files.push(path.clone());
                } else {
                    warn!("Unsupported file type: {}", path.display());
                }
            } else if path.is_dir() {
                self.collect_from_dir(path, &mut files);
            } else {
                warn!("Path does not exist: {}", path.display());
            }
        }

        files
    }

    fn collect_from_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let mut entries: Vec<PathBuf> = match std::fs::read_dir(dir) {
            Ok(e) => e.flatten().map(|entry| entry.path()).collect(),
            Err(e) => {
                warn!("Failed to read directory {}: {e}", dir.display());
                return;
            }
        };
        entries.sort();

        for path in entries {
            if path.is_file() && is_supported_image(&path) {
                files.push(path);
            } else if path.is_dir() && self.recursive {
                self.collect_from_dir(&path, files);
            }
        }
    }
}

impl ImageSource for FsImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = SourceItem> + Send + '_> {
        let files = self.collect_files();
        debug!("Found {} image files", files.len());

        Box::new(files.into_iter().map(|path| SourceItem {
            path: path.to_string_lossy().into_owned(),
            image: load_image(&path),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.collect_files().len())
    }
}

/// Checks if a path has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| RASTER_EXTENSIONS.contains(&e.as_str()))
}

/// Loads an image, applies its EXIF orientation, and converts it to RGB8.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> Result<ImageInfo> {
    let image =
        image::open(path).with_context(|| format!("Failed to open image: {}", path.display()))?;

    let image = match read_orientation(path) {
        Some(orientation) if orientation != 1 => {
            debug!(orientation, "Applying EXIF orientation to {}", path.display());
            apply_orientation(image, orientation)
        }
        _ => image,
    };

    Ok(ImageInfo::new(path.to_string_lossy(), &image))
}

/// Reads the EXIF Orientation tag, if present.
fn read_orientation(path: &Path) -> Option<u32> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    field.value.get_uint(0)
}

/// Transforms `image` so it displays upright for the given EXIF orientation.
#[must_use]
pub fn apply_orientation(image: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("test.jpg")));
        assert!(is_supported_image(Path::new("test.JPEG")));
        assert!(is_supported_image(Path::new("test.png")));
        assert!(is_supported_image(Path::new("test.webp")));
        assert!(!is_supported_image(Path::new("test.cr2")));
        assert!(!is_supported_image(Path::new("test.txt")));
        assert!(!is_supported_image(Path::new("test")));
    }

    fn marked() -> DynamicImage {
        // 3x2 with a red top-left pixel.
        let mut img = RgbImage::from_pixel(3, 2, Rgb([0, 0, 0]));
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        DynamicImage::ImageRgb8(img)
    }

    fn red_at(image: &DynamicImage) -> (u32, u32) {
        let rgb = image.to_rgb8();
        rgb.enumerate_pixels()
            .find(|(_, _, p)| p[0] == 255)
            .map(|(x, y, _)| (x, y))
            .unwrap_or_default()
    }

    #[test]
    fn orientation_rotations() {
        let rotated = apply_orientation(marked(), 6);
        assert_eq!(rotated.dimensions(), (2, 3));
        assert_eq!(red_at(&rotated), (1, 0));

        let rotated = apply_orientation(marked(), 8);
        assert_eq!(red_at(&rotated), (0, 2));

        assert_eq!(red_at(&apply_orientation(marked(), 3)), (2, 1));
    }

    #[test]
    fn orientation_mirrors() {
        assert_eq!(red_at(&apply_orientation(marked(), 2)), (2, 0));
        assert_eq!(red_at(&apply_orientation(marked(), 4)), (0, 1));

        // Transpose keeps the top-left corner in place.
        let transposed = apply_orientation(marked(), 5);
        assert_eq!(transposed.dimensions(), (2, 3));
        assert_eq!(red_at(&transposed), (0, 0));

        // Transverse moves it to the opposite corner.
        assert_eq!(red_at(&apply_orientation(marked(), 7)), (1, 2));
    }

    #[test]
    fn unknown_orientation_is_identity() {
        assert_eq!(red_at(&apply_orientation(marked(), 1)), (0, 0));
        assert_eq!(red_at(&apply_orientation(marked(), 42)), (0, 0));
    }
}
