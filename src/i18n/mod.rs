// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! Localization uses the Fluent system with `.ftl` resources embedded in
//! the binary. Locale resolution order: CLI flag, config file, OS locale,
//! `en-US` fallback.

pub mod fluent;
