//! Raster image usage detection types.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::detection::MatchStrategy;
use super::span::SourceSpan;

/// The markup element an image was rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ImageElement {
    /// A plain `<img>` tag.
    ImgTag,
    /// A `next/image` `<Image>` component.
    NextImage,
}

impl ImageElement {
    /// Returns a human-readable label for this element.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ImgTag => "img",
            Self::NextImage => "next-image",
        }
    }
}

/// An image usage detected in a source file.
///
/// Image detections feed the external upload/critical-image pipeline; the
/// migration engine itself never rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDetection {
    /// Path of the file, relative to the scan root.
    pub file_path: Utf8PathBuf,

    /// Line range of the image element.
    pub span: SourceSpan,

    /// Which matching strategy produced this detection.
    pub strategy: MatchStrategy,

    /// The element the image is rendered with.
    pub element: ImageElement,

    /// The `src` attribute.
    pub src: String,

    /// The `alt` attribute, if present.
    pub alt: Option<String>,

    /// Whether `src` points at a raster format (png/jpg/jpeg/gif/webp/bmp).
    pub is_raster: bool,
}

impl ImageDetection {
    /// Returns `true` if the image has no usable alt text.
    #[inline]
    #[must_use]
    pub fn missing_alt(&self) -> bool {
        self.alt.as_ref().is_none_or(|a| a.is_empty())
    }
}
