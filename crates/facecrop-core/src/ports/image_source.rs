//! Image source port.

use crate::domain::ImageInfo;

/// One entry produced by an [`ImageSource`].
///
/// The path is kept even when loading fails so the failure can be
/// reported against the right file.
#[derive(Debug)]
pub struct SourceItem {
    /// Path of the entry.
    pub path: String,
    /// Decoded image, or the reason it could not be decoded.
    pub image: anyhow::Result<ImageInfo>,
}

/// Port for enumerating and decoding input images.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over the images of this source, in a stable order.
    fn images(&self) -> Box<dyn Iterator<Item = SourceItem> + Send + '_>;

    /// Returns the total number of entries, if known.
    fn count_hint(&self) -> Option<usize>;
}
