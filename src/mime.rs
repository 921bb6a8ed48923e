//! The fixed table of accepted image MIME types.
//!
//! This table is the single source of truth for both request validation and
//! file-extension derivation in the trace pipeline. Exactly three raster
//! formats are accepted; everything else is rejected before any decoding.

/// An accepted image MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    /// image/png
    Png,

    /// image/jpeg
    Jpeg,

    /// image/webp
    Webp,
}

impl ImageMime {
    /// Parse a MIME string into an accepted type.
    ///
    /// The input is expected to already be lowercased and trimmed (the
    /// request validator normalizes before calling this). Returns `None`
    /// for anything outside the fixed table.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// The canonical MIME string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    /// The file extension used when writing trace input files.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }
}

impl Default for ImageMime {
    /// Requests that omit `mimeType` default to PNG.
    fn default() -> Self {
        Self::Png
    }
}

impl std::fmt::Display for ImageMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
