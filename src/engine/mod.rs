// SPDX-License-Identifier: MPL-2.0
//! Decoding engine port and its loading infrastructure.
//!
//! The barcode decoding algorithm is an external collaborator: a shared
//! library with a two-symbol C ABI, fetched from a named location and
//! loaded at runtime. This module defines the [`Decoder`] port the rest of
//! the application consumes, the error taxonomy, the location resolver,
//! and the download/verify/install pipeline.
//!
//! # Design Notes
//!
//! - The engine is opaque: the application never inspects how results were
//!   produced, only the [`DecodeResult`](crate::decode::DecodeResult)
//!   records it returns.
//! - Engine failures surface as notifications and a not-ready state; they
//!   never abort the UI loop.

mod library;
mod location;

pub mod download;

pub use library::LibraryDecoder;
pub use location::{EngineLocation, ENGINE_VERSION};

use crate::decode::{DecodeOptions, DecodeResult};
use std::fmt;

/// Errors produced while loading or invoking the decoding engine.
#[derive(Debug, Clone)]
pub enum EngineError {
    /// No engine has been loaded yet.
    NotReady,

    /// The engine binary could not be found at the resolved location.
    NotFound(String),

    /// The shared library could not be loaded or is missing a symbol.
    LoadFailed(String),

    /// Fetching the engine binary failed.
    DownloadFailed(String),

    /// The downloaded binary did not match the pinned checksum.
    ChecksumMismatch { expected: String, actual: String },

    /// The engine rejected the decode call.
    DecodeFailed(String),

    /// The engine returned a payload this version cannot parse.
    MalformedPayload(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NotReady => write!(f, "decoding engine is not ready"),
            EngineError::NotFound(path) => write!(f, "engine binary not found: {path}"),
            EngineError::LoadFailed(msg) => write!(f, "failed to load engine: {msg}"),
            EngineError::DownloadFailed(msg) => write!(f, "engine download failed: {msg}"),
            EngineError::ChecksumMismatch { expected, actual } => {
                write!(f, "engine checksum mismatch: expected {expected}, got {actual}")
            }
            EngineError::DecodeFailed(msg) => write!(f, "decode failed: {msg}"),
            EngineError::MalformedPayload(msg) => {
                write!(f, "unparseable engine payload: {msg}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Port for the external barcode decoding collaborator.
///
/// Implementations must be `Send + Sync`: decode calls run on background
/// tasks while the UI keeps rendering.
pub trait Decoder: Send + Sync {
    /// Decodes every symbol found in an RGBA image.
    ///
    /// `rgba` holds `width * height * 4` bytes in row-major order.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the engine is unavailable or rejects
    /// the call. "No symbol found" is an empty `Ok` result, not an error.
    fn decode(
        &self,
        width: u32,
        height: u32,
        rgba: &[u8],
        options: &DecodeOptions,
    ) -> Result<Vec<DecodeResult>, EngineError>;

    /// Whether the engine is loaded and callable.
    fn is_ready(&self) -> bool;
}

/// Canned decoder for tests elsewhere in the crate.
#[cfg(test)]
pub(crate) mod testing {
    use super::{Decoder, EngineError};
    use crate::decode::{DecodeOptions, DecodeResult};

    pub(crate) struct StaticDecoder {
        pub results: Vec<DecodeResult>,
    }

    impl Decoder for StaticDecoder {
        fn decode(
            &self,
            _width: u32,
            _height: u32,
            _rgba: &[u8],
            _options: &DecodeOptions,
        ) -> Result<Vec<DecodeResult>, EngineError> {
            Ok(self.results.clone())
        }

        fn is_ready(&self) -> bool {
            true
        }
    }
}
