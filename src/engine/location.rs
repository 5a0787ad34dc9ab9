// SPDX-License-Identifier: MPL-2.0
//! Named engine locations and their URL resolution.
//!
//! The settings form offers a fixed list of locations the engine binary
//! can be fetched from; a location plus the pinned engine version resolves
//! to a concrete URL (or a local file for the bundled variant).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Engine release pinned by this build.
pub const ENGINE_VERSION: &str = "2.2.4";

/// File name of the engine shared library, per platform.
#[cfg(target_os = "windows")]
pub const ENGINE_LIBRARY_NAME: &str = "zxing_reader.dll";
#[cfg(target_os = "macos")]
pub const ENGINE_LIBRARY_NAME: &str = "libzxing_reader.dylib";
#[cfg(all(unix, not(target_os = "macos")))]
pub const ENGINE_LIBRARY_NAME: &str = "libzxing_reader.so";

/// Where the engine binary is fetched from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EngineLocation {
    /// A library shipped next to the executable (or already installed in
    /// the data directory).
    #[default]
    Bundled,
    /// The project's GitHub release assets.
    Github,
    /// jsDelivr's GitHub release mirror.
    Jsdelivr,
    /// Fastly-fronted jsDelivr mirror.
    JsdelivrFastly,
}

impl EngineLocation {
    /// All locations offered in the settings form, in display order.
    pub const ALL: &'static [EngineLocation] = &[
        EngineLocation::Bundled,
        EngineLocation::Github,
        EngineLocation::Jsdelivr,
        EngineLocation::JsdelivrFastly,
    ];

    /// The display label used in the settings form.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            EngineLocation::Bundled => "bundled",
            EngineLocation::Github => "github",
            EngineLocation::Jsdelivr => "jsdelivr",
            EngineLocation::JsdelivrFastly => "jsdelivr-fastly",
        }
    }

    /// Candidate paths for the bundled library, in probe order.
    #[must_use]
    pub fn bundled_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                candidates.push(dir.join(ENGINE_LIBRARY_NAME));
            }
        }
        if let Some(data_dir) = crate::app::paths::get_app_data_dir() {
            candidates.push(data_dir.join("engine").join(ENGINE_LIBRARY_NAME));
        }
        candidates
    }

    /// Resolves this location to a download URL for `version`.
    ///
    /// Returns `None` for [`EngineLocation::Bundled`], which never
    /// downloads.
    #[must_use]
    pub fn resolve_url(&self, version: &str) -> Option<String> {
        let asset = ENGINE_LIBRARY_NAME;
        match self {
            EngineLocation::Bundled => None,
            EngineLocation::Github => Some(format!(
                "https://github.com/Sec-ant/zxing-wasm/releases/download/v{version}/{asset}"
            )),
            EngineLocation::Jsdelivr => Some(format!(
                "https://cdn.jsdelivr.net/gh/Sec-ant/zxing-wasm@v{version}/dist/reader/{asset}"
            )),
            EngineLocation::JsdelivrFastly => Some(format!(
                "https://fastly.jsdelivr.net/gh/Sec-ant/zxing-wasm@v{version}/dist/reader/{asset}"
            )),
        }
    }
}

impl std::fmt::Display for EngineLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_never_resolves_to_a_url() {
        assert_eq!(EngineLocation::Bundled.resolve_url(ENGINE_VERSION), None);
    }

    #[test]
    fn remote_locations_embed_the_version() {
        for location in [
            EngineLocation::Github,
            EngineLocation::Jsdelivr,
            EngineLocation::JsdelivrFastly,
        ] {
            let url = location.resolve_url("1.2.3").expect("url");
            assert!(url.contains("1.2.3"), "{url}");
            assert!(url.contains(ENGINE_LIBRARY_NAME), "{url}");
        }
    }

    #[test]
    fn default_location_is_bundled() {
        assert_eq!(EngineLocation::default(), EngineLocation::Bundled);
    }

    #[test]
    fn labels_match_the_config_spelling() {
        assert_eq!(EngineLocation::Jsdelivr.label(), "jsdelivr");
        assert_eq!(EngineLocation::JsdelivrFastly.label(), "jsdelivr-fastly");
    }
}
