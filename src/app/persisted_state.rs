// SPDX-License-Identifier: MPL-2.0
//! Transient application state, persisted as CBOR.
//!
//! Unlike the user-editable preferences in `settings.toml`, this state
//! only exists to smooth the experience across restarts — currently the
//! directory the open dialogs start in. CBOR keeps it compact and clearly
//! separated from the TOML preferences file.
//!
//! Every failure degrades to defaults plus a notification key; state
//! handling never aborts startup.

use super::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const STATE_FILE: &str = "state.cbor";

/// State carried across sessions without being user-configurable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppState {
    /// Directory the next open dialog starts in.
    #[serde(default)]
    pub last_open_directory: Option<PathBuf>,
}

impl AppState {
    /// Loads state from the default location; see [`AppState::load_from`].
    pub fn load() -> (Self, Option<String>) {
        Self::load_from(None)
    }

    /// Loads state, resolving the directory through the usual override
    /// chain. Returns the state plus an optional warning key for the
    /// notification system.
    pub fn load_from(base_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let Some(path) = state_path(base_dir) else {
            return (Self::default(), None);
        };

        match fs::read(&path) {
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                (Self::default(), None)
            }
            Err(_) => (
                Self::default(),
                Some("notification-state-read-error".to_string()),
            ),
            Ok(bytes) => match ciborium::from_reader(bytes.as_slice()) {
                Ok(state) => (state, None),
                Err(_) => (
                    Self::default(),
                    Some("notification-state-parse-error".to_string()),
                ),
            },
        }
    }

    /// Saves state to the default location; see [`AppState::save_to`].
    pub fn save(&self) -> Option<String> {
        self.save_to(None)
    }

    /// Saves state, creating the directory if needed. Returns a warning
    /// key when something went wrong.
    pub fn save_to(&self, base_dir: Option<PathBuf>) -> Option<String> {
        let Some(path) = state_path(base_dir) else {
            return Some("notification-state-path-error".to_string());
        };

        let mut buffer = Vec::new();
        if ciborium::into_writer(self, &mut buffer).is_err() {
            return Some("notification-state-write-error".to_string());
        }

        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return Some("notification-state-dir-error".to_string());
            }
        }

        match fs::write(&path, buffer) {
            Ok(()) => None,
            Err(_) => Some("notification-state-create-error".to_string()),
        }
    }

    /// Remembers the directory a collected file came from. A path without
    /// a parent (the root) leaves the stored directory untouched.
    pub fn set_last_open_directory_from_file(&mut self, file_path: &Path) {
        if let Some(parent) = file_path.parent() {
            self.last_open_directory = Some(parent.to_path_buf());
        }
    }
}

fn state_path(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_data_dir_with_override(base_dir).map(|dir| dir.join(STATE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trips_through_a_custom_directory() {
        let temp_dir = tempdir().expect("create temp dir");
        let base = temp_dir.path().to_path_buf();

        let original = AppState {
            last_open_directory: Some(PathBuf::from("/test/open/directory")),
        };

        assert!(original.save_to(Some(base.clone())).is_none());
        assert!(base.join(STATE_FILE).exists());

        let (loaded, warning) = AppState::load_from(Some(base));
        assert!(warning.is_none());
        assert_eq!(loaded, original);
    }

    #[test]
    fn missing_file_loads_defaults_without_warning() {
        let temp_dir = tempdir().expect("create temp dir");
        let (state, warning) = AppState::load_from(Some(temp_dir.path().to_path_buf()));
        assert!(warning.is_none());
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn corrupted_file_loads_defaults_with_a_parse_warning() {
        let temp_dir = tempdir().expect("create temp dir");
        fs::write(temp_dir.path().join(STATE_FILE), "not valid cbor data")
            .expect("write file");

        let (state, warning) = AppState::load_from(Some(temp_dir.path().to_path_buf()));
        assert_eq!(warning.as_deref(), Some("notification-state-parse-error"));
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let temp_dir = tempdir().expect("create temp dir");
        let nested = temp_dir.path().join("nested").join("deeply");

        let state = AppState {
            last_open_directory: Some(PathBuf::from("/test")),
        };
        assert!(state.save_to(Some(nested.clone())).is_none());
        assert!(nested.join(STATE_FILE).exists());
    }

    #[test]
    fn last_open_directory_tracks_the_parent_of_a_file() {
        let mut state = AppState::default();
        state.set_last_open_directory_from_file(Path::new("/home/user/codes/ean13.png"));
        assert_eq!(
            state.last_open_directory,
            Some(PathBuf::from("/home/user/codes"))
        );

        // The root has no parent; nothing changes.
        state.set_last_open_directory_from_file(Path::new("/"));
        assert_eq!(
            state.last_open_directory,
            Some(PathBuf::from("/home/user/codes"))
        );
    }
}
