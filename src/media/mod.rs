// SPDX-License-Identifier: MPL-2.0
//! Image handling for collected files.
//!
//! Collected bytes are decoded once into RGBA; the same pixels back both
//! the displayed widget and the decode call handed to the engine.

pub mod image;

pub use image::ImageData;
