//! Image codec adapter: base64 transport, decoding, resizing, PNG output.
//!
//! This module handles the full upscale transformation: strict base64
//! decoding, image decoding with format sniffing, color normalization,
//! Lanczos resampling, and PNG re-encoding.
//!
//! # Design Decisions
//!
//! - **Strict base64**: malformed base64 is a distinct error from a
//!   corrupt image payload, so the two can map to different responses.
//!
//! - **RGB normalization**: input is forced to 3-channel RGB before
//!   resizing so output is consistent regardless of input channel layout.
//!
//! - **Always PNG out**: output is re-encoded as PNG regardless of the
//!   input format.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageEncoder, ImageReader};

use crate::error::CodecError;

/// Default scale factor when the request omits one.
pub const DEFAULT_SCALE: f64 = 2.0;

/// Minimum allowed scale factor.
pub const MIN_SCALE: f64 = 1.0;

/// Maximum allowed scale factor.
pub const MAX_SCALE: f64 = 4.0;

/// Validate a scale factor.
///
/// The range is closed on both ends; NaN is rejected.
#[inline]
pub fn is_valid_scale(scale: f64) -> bool {
    (MIN_SCALE..=MAX_SCALE).contains(&scale)
}

// =============================================================================
// Base64 Transport
// =============================================================================

/// Decode base64 text into raw bytes.
///
/// Uses the standard alphabet with strict validation: any character outside
/// the alphabet or bad padding is an error, never silently skipped.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, CodecError> {
    BASE64.decode(data).map_err(|_| CodecError::InvalidBase64)
}

/// Encode raw bytes as base64 text for transport.
pub fn encode_base64(data: &[u8]) -> String {
    BASE64.encode(data)
}

// =============================================================================
// Upscaler
// =============================================================================

/// Upscaler that decodes an image, resizes it, and re-encodes as PNG.
///
/// # Example
///
/// ```ignore
/// use rastertrace::codec::ImageUpscaler;
///
/// let upscaler = ImageUpscaler::new();
/// let png: bytes::Bytes = upscaler.upscale(&raw_image_bytes, 2.0)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImageUpscaler {
    // Currently stateless, but struct allows future extension
    // (e.g., configurable filter or output format)
}

impl ImageUpscaler {
    /// Create a new upscaler.
    pub fn new() -> Self {
        Self {}
    }

    /// Decode raw image bytes, resize by `scale`, and re-encode as PNG.
    ///
    /// Output dimensions are `trunc(width * scale)` by
    /// `trunc(height * scale)`. Resampling uses Lanczos3; the filter
    /// affects visual quality, not correctness.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a decodable image or if PNG
    /// encoding fails.
    pub fn upscale(&self, raw: &[u8], scale: f64) -> Result<Bytes, CodecError> {
        let reader = ImageReader::new(Cursor::new(raw))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        let img = reader
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        // Normalize to 3-channel RGB before resizing
        let rgb = img.to_rgb8();

        let new_width = (f64::from(rgb.width()) * scale) as u32;
        let new_height = (f64::from(rgb.height()) * scale) as u32;

        let resized = image::imageops::resize(&rgb, new_width, new_height, FilterType::Lanczos3);

        let mut output = Vec::new();
        let encoder = PngEncoder::new(&mut output);
        encoder
            .write_image(
                resized.as_raw(),
                new_width,
                new_height,
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| CodecError::Encode(e.to_string()))?;

        Ok(Bytes::from(output))
    }

    /// Upscale base64-encoded image data, returning base64-encoded PNG.
    ///
    /// Convenience wrapper combining [`decode_base64`], [`Self::upscale`],
    /// and [`encode_base64`].
    pub fn upscale_base64(&self, image_base64: &str, scale: f64) -> Result<String, CodecError> {
        let raw = decode_base64(image_base64)?;
        let png = self.upscale(&raw, scale)?;
        Ok(encode_base64(&png))
    }

    /// Get image dimensions without fully decoding.
    pub fn dimensions(&self, raw: &[u8]) -> Result<(u32, u32), CodecError> {
        let reader = ImageReader::new(Cursor::new(raw))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        reader
            .into_dimensions()
            .map_err(|e| CodecError::Decode(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
