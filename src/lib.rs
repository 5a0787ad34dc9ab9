// SPDX-License-Identifier: MPL-2.0
//! `barcode_lens` is a barcode scanning demo application built with the
//! Iced GUI framework.
//!
//! It wires a persisted decode-options form, a file/drop-zone intake
//! pipeline, and a result view that overlays detected symbol positions on
//! the scanned images. The decoding algorithm itself is an external
//! engine loaded at runtime.

#![doc(html_root_url = "https://docs.rs/barcode_lens/0.1.0")]

pub mod app;
pub mod collector;
pub mod decode;
pub mod engine;
pub mod error;
pub mod i18n;
pub mod media;
pub mod ui;
