// SPDX-License-Identifier: MPL-2.0
//! Capability variants used to walk the host file system.
//!
//! Collection can run in two environments: inside an async runtime, where
//! listing and reads go through handle-based asynchronous I/O, and outside
//! one, where only blocking entry-based I/O is available. The variant is
//! detected once per collection call and every recursive step routes
//! through the selected variant; the two are never mixed in one traversal.

use std::io;
use std::path::{Path, PathBuf};

/// What a path turned out to be once inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    File,
    Directory,
    /// Anything that is neither a regular file nor a directory (broken
    /// links, sockets, vanished entries). Skipped silently.
    Unsupported,
}

/// Listing backend selected for one collection call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalVariant {
    /// Asynchronous handle-based listing (`tokio::fs`).
    HandleBased,
    /// Blocking entry-based listing (`std::fs`).
    EntryBased,
}

impl TraversalVariant {
    /// Picks the variant available in the calling environment.
    #[must_use]
    pub fn detect() -> Self {
        if tokio::runtime::Handle::try_current().is_ok() {
            Self::HandleBased
        } else {
            Self::EntryBased
        }
    }

    /// Lists the immediate children of `dir`, sorted by file name so the
    /// traversal order is deterministic.
    ///
    /// Children that fail to materialize during listing are skipped; only
    /// a directory that cannot be opened at all is an error.
    pub(crate) async fn list_children(self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut children = match self {
            Self::HandleBased => {
                let mut read_dir = tokio::fs::read_dir(dir).await?;
                let mut children = Vec::new();
                loop {
                    match read_dir.next_entry().await {
                        Ok(Some(entry)) => children.push(entry.path()),
                        Ok(None) => break,
                        // The rest of the batch is unreadable; keep what we have.
                        Err(_) => break,
                    }
                }
                children
            }
            Self::EntryBased => std::fs::read_dir(dir)?
                .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                .collect(),
        };
        children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(children)
    }

    /// Reads the full contents of a file.
    pub(crate) async fn read_file(self, path: &Path) -> io::Result<Vec<u8>> {
        match self {
            Self::HandleBased => tokio::fs::read(path).await,
            Self::EntryBased => std::fs::read(path),
        }
    }

    /// Classifies a path, following symbolic links.
    pub(crate) async fn classify(self, path: &Path) -> EntryKind {
        let metadata = match self {
            Self::HandleBased => tokio::fs::metadata(path).await,
            Self::EntryBased => std::fs::metadata(path),
        };
        match metadata {
            Ok(metadata) if metadata.is_file() => EntryKind::File,
            Ok(metadata) if metadata.is_dir() => EntryKind::Directory,
            _ => EntryKind::Unsupported,
        }
    }

    /// Resolves a directory to its canonical path for cycle detection.
    pub(crate) async fn canonical(self, path: &Path) -> io::Result<PathBuf> {
        match self {
            Self::HandleBased => tokio::fs::canonicalize(path).await,
            Self::EntryBased => std::fs::canonicalize(path),
        }
    }
}
