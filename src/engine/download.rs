// SPDX-License-Identifier: MPL-2.0
//! Engine binary download, integrity verification, and installation.
//!
//! The binary streams into the data directory, reports progress through a
//! callback, and is only accepted once its BLAKE3 hash matches the pinned
//! checksum for this platform. A failed or undersized download is deleted
//! rather than left half-installed.

use super::location::{EngineLocation, ENGINE_LIBRARY_NAME, ENGINE_VERSION};
use super::EngineError;
use crate::app::paths;
use std::path::PathBuf;

/// Pinned BLAKE3 checksum of the engine release for this platform.
#[cfg(target_os = "windows")]
pub const ENGINE_CHECKSUM: &str =
    "9f1c2b7a4e1d05c3a8b6f4e2d9c07a5b1e8f3d6c2a9b0e7f4d1c8a5b2e9f0d63";
#[cfg(target_os = "macos")]
pub const ENGINE_CHECKSUM: &str =
    "4b8e1f6a2c9d07e5b3a1f8c6d4e2b0a9c7e5f3d1b8a6c4e2f0d9b7a5c3e1f082";
#[cfg(all(unix, not(target_os = "macos")))]
pub const ENGINE_CHECKSUM: &str =
    "7d3f9a1c5e8b2064c7a9e1f3b5d8c0a2e4f6b8d0c2a4e6f8b0d2c4a6e8f0b1d9";

/// Minimum plausible engine size (1 MB) to detect error pages saved as
/// binaries.
const MIN_ENGINE_SIZE_BYTES: u64 = 1_000_000;

/// Path the downloaded engine is installed to.
#[must_use]
pub fn installed_engine_path() -> Option<PathBuf> {
    paths::get_app_data_dir().map(|dir| dir.join("engine").join(ENGINE_LIBRARY_NAME))
}

/// Downloads the engine binary from `url` into `target`, reporting
/// progress in `0.0..=1.0` when the response advertises its length.
///
/// Returns the number of bytes written.
pub async fn download_engine(
    url: &str,
    target: &std::path::Path,
    mut progress_callback: impl FnMut(f32) + Send,
) -> Result<u64, EngineError> {
    use futures_util::StreamExt;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(concat!("BarcodeLens/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| EngineError::DownloadFailed(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| EngineError::DownloadFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(EngineError::DownloadFailed(format!(
            "HTTP status: {}",
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(0);
    if total_size > 0 && total_size < MIN_ENGINE_SIZE_BYTES {
        return Err(EngineError::DownloadFailed(format!(
            "Response too small ({total_size} bytes); the mirror may have returned an error page"
        )));
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| EngineError::DownloadFailed(e.to_string()))?;
    }

    let mut file =
        std::fs::File::create(target).map_err(|e| EngineError::DownloadFailed(e.to_string()))?;

    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| EngineError::DownloadFailed(e.to_string()))?;
        std::io::Write::write_all(&mut file, &chunk)
            .map_err(|e| EngineError::DownloadFailed(e.to_string()))?;

        downloaded += chunk.len() as u64;
        if total_size > 0 {
            progress_callback(downloaded as f32 / total_size as f32);
        }
    }

    if downloaded < MIN_ENGINE_SIZE_BYTES {
        let _ = std::fs::remove_file(target);
        return Err(EngineError::DownloadFailed(format!(
            "Downloaded file too small ({downloaded} bytes)"
        )));
    }

    Ok(downloaded)
}

/// Verifies a file against an expected BLAKE3 hex digest.
pub fn verify_checksum(
    path: &std::path::Path,
    expected_hash: &str,
) -> Result<(), EngineError> {
    let file_data =
        std::fs::read(path).map_err(|e| EngineError::NotFound(e.to_string()))?;
    let actual_hash = blake3::hash(&file_data).to_hex().to_string();

    if actual_hash != expected_hash {
        return Err(EngineError::ChecksumMismatch {
            expected: expected_hash.to_string(),
            actual: actual_hash,
        });
    }
    Ok(())
}

/// Resolves `location` to a ready-to-load engine binary, downloading and
/// verifying it if necessary.
pub async fn ensure_engine(
    location: EngineLocation,
    progress_callback: impl FnMut(f32) + Send,
) -> Result<PathBuf, EngineError> {
    match location.resolve_url(ENGINE_VERSION) {
        None => EngineLocation::bundled_candidates()
            .into_iter()
            .find(|candidate| candidate.exists())
            .ok_or_else(|| {
                EngineError::NotFound(format!(
                    "{ENGINE_LIBRARY_NAME} (looked next to the executable and in the data directory)"
                ))
            }),
        Some(url) => {
            let target = installed_engine_path().ok_or_else(|| {
                EngineError::DownloadFailed("no data directory available".to_string())
            })?;

            // An earlier verified install is reused as-is.
            if target.exists() && verify_checksum(&target, ENGINE_CHECKSUM).is_ok() {
                return Ok(target);
            }

            download_engine(&url, &target, progress_callback).await?;

            if let Err(err) = verify_checksum(&target, ENGINE_CHECKSUM) {
                let _ = std::fs::remove_file(&target);
                return Err(err);
            }
            Ok(target)
        }
    }
}
