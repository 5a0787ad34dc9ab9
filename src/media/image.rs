// SPDX-License-Identifier: MPL-2.0
//! Image decoding from collected bytes (PNG, JPEG, GIF, BMP).

use crate::error::{Error, Result};
use iced::widget::image;
use std::sync::Arc;

/// A decoded image ready for display and for the decoding engine.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub handle: image::Handle,
    pub width: u32,
    pub height: u32,
    /// Original RGBA bytes, shared with the decode call.
    /// Stored in Arc to avoid expensive cloning.
    rgba_bytes: Arc<Vec<u8>>,
}

impl ImageData {
    /// Creates a new `ImageData` from RGBA pixels.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        let rgba_bytes = Arc::new(pixels);
        let handle = image::Handle::from_rgba(width, height, rgba_bytes.to_vec());
        Self {
            handle,
            width,
            height,
            rgba_bytes,
        }
    }

    /// Decodes encoded image bytes (PNG, JPEG, GIF, BMP) into RGBA.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] when the bytes are not a decodable image.
    /// The intake allow-list is broader than the set of formats this build
    /// can rasterize, so callers must tolerate this failing per file.
    pub fn from_encoded_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image_rs::load_from_memory(bytes).map_err(Error::from)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::from_rgba(width, height, rgba.into_vec()))
    }

    /// Returns the shared RGBA bytes.
    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Returns the RGBA bytes behind their shared handle, for handing to a
    /// background decode task without copying.
    #[must_use]
    pub fn rgba_bytes_arc(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.rgba_bytes)
    }
}
