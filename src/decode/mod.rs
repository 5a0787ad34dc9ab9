// SPDX-License-Identifier: MPL-2.0
//! Decode domain: the options record bound to the settings form and the
//! result types returned by the decoding engine.
//!
//! The engine itself is an external collaborator (see [`crate::engine`]);
//! this module only defines the data that crosses that boundary.

pub mod options;
pub mod result;

pub use options::{
    Binarizer, BarcodeFormat, CharacterSet, DecodeOptions, EanAddOnSymbol, TextMode,
};
pub use result::{DecodeResult, Point, Quad, ScanOutcome};
