// SPDX-License-Identifier: MPL-2.0
//! Centralized path management for application directories.
//!
//! Resolution priority, most specific first:
//! 1. Explicit override passed to a `_with_override()` function (tests)
//! 2. CLI arguments (`--data-dir`, `--config-dir`), set via [`init_cli_overrides`]
//! 3. Environment variables (`BARCODE_LENS_DATA_DIR`, `BARCODE_LENS_CONFIG_DIR`)
//! 4. Platform default via the `dirs` crate, with the app name appended

use std::path::PathBuf;
use std::sync::OnceLock;

/// Application name used for directory naming.
const APP_NAME: &str = "BarcodeLens";

/// Environment variable to override the data directory.
pub const ENV_DATA_DIR: &str = "BARCODE_LENS_DATA_DIR";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "BARCODE_LENS_CONFIG_DIR";

static CLI_DATA_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Initializes CLI overrides for the data and config directories.
///
/// Call once at startup, before any path resolution.
///
/// # Panics
///
/// Panics if called more than once.
pub fn init_cli_overrides(data_dir: Option<String>, config_dir: Option<String>) {
    CLI_DATA_DIR
        .set(data_dir.map(PathBuf::from))
        .expect("CLI data dir override already initialized");
    CLI_CONFIG_DIR
        .set(config_dir.map(PathBuf::from))
        .expect("CLI config dir override already initialized");
}

fn resolve(
    override_path: Option<PathBuf>,
    cli: &OnceLock<Option<PathBuf>>,
    env_var: &str,
    platform_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }
    if let Some(path) = cli.get().and_then(Clone::clone) {
        return Some(path);
    }
    if let Ok(env_path) = std::env::var(env_var) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }
    platform_dir.map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Returns the application data directory (state files, engine installs).
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

/// Returns the data directory, honoring an explicit override first.
pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, &CLI_DATA_DIR, ENV_DATA_DIR, dirs::data_dir())
}

/// Returns the application config directory (`settings.toml`).
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Returns the config directory, honoring an explicit override first.
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(
        override_path,
        &CLI_CONFIG_DIR,
        ENV_CONFIG_DIR,
        dirs::config_dir(),
    )
}
