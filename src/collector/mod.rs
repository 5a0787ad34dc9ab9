// SPDX-License-Identifier: MPL-2.0
//! File collection pipeline for the scanner intake.
//!
//! One user intake event (a window drop, a file-picker selection, or a
//! directory-picker selection) is turned into a flat, filtered list of
//! image files. Directories are expanded depth-first with
//! parent-before-children-of-siblings ordering; children of a directory
//! are visited in name order so results are deterministic. An entry that
//! fails to materialize is omitted and never aborts the rest of the
//! collection. Dismissing a picker dialog is a distinct [`CollectError::Cancelled`]
//! outcome, not an empty success.
//!
//! Each call owns its traversal state exclusively; nothing is cached
//! across calls, and concurrent calls never share mutable state.

pub mod filter;
mod traversal;

pub use filter::{ExtensionFilter, IMAGE_EXTENSIONS};
pub use traversal::TraversalVariant;

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use traversal::EntryKind;

/// A resolved, materialized file yielded by collection.
///
/// Ownership of the bytes passes to the caller; the collector keeps no
/// reference after the operation settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedFile {
    /// The file name (final path component).
    pub name: String,
    /// The path the file was materialized from.
    pub path: PathBuf,
    /// The file contents.
    pub bytes: Vec<u8>,
}

/// Operation-fatal collection outcomes.
///
/// Per-item failures are absorbed during traversal; only dismissing a
/// picker dialog aborts the whole operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectError {
    /// The user dismissed the picker dialog before completing a selection.
    Cancelled,
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectError::Cancelled => write!(f, "collection cancelled by the user"),
        }
    }
}

/// One intake event worth of entries to collect from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Entries dropped onto the window: files and/or directories, in drop
    /// order.
    Dropped(Vec<PathBuf>),
    /// Files chosen in a file dialog.
    PickedFiles(Vec<PathBuf>),
    /// A single directory chosen in a folder dialog. The directory itself
    /// is always expanded; the recursion toggle governs its
    /// subdirectories.
    PickedDirectory(PathBuf),
}

/// Collects image files from `source`, detecting the traversal variant
/// available in the calling environment.
///
/// Always succeeds: an empty or fully filtered-out source yields an empty
/// list. Cancellation can only arise from the dialog helpers below.
pub async fn collect(
    source: Source,
    filter: &ExtensionFilter,
    recurse: bool,
) -> Vec<CollectedFile> {
    collect_with_variant(source, filter, recurse, TraversalVariant::detect()).await
}

/// Collects image files outside an async runtime, using the blocking
/// entry-based traversal variant.
pub fn collect_blocking(
    source: Source,
    filter: &ExtensionFilter,
    recurse: bool,
) -> Vec<CollectedFile> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("current-thread runtime");
    runtime.block_on(collect_with_variant(
        source,
        filter,
        recurse,
        TraversalVariant::EntryBased,
    ))
}

/// Opens a multi-file picker and collects the selection.
///
/// Returns [`CollectError::Cancelled`] when the dialog is dismissed.
pub async fn pick_and_collect_files(
    filter: &ExtensionFilter,
    start_dir: Option<PathBuf>,
) -> Result<Vec<CollectedFile>, CollectError> {
    let extensions: Vec<&str> = filter.allowed().iter().map(String::as_str).collect();
    let mut dialog = rfd::AsyncFileDialog::new().add_filter("Barcode images", &extensions);
    if let Some(dir) = start_dir {
        if dir.exists() {
            dialog = dialog.set_directory(&dir);
        }
    }

    let handles = dialog.pick_files().await.ok_or(CollectError::Cancelled)?;
    let paths = handles
        .iter()
        .map(|handle| handle.path().to_path_buf())
        .collect();
    Ok(collect(Source::PickedFiles(paths), filter, true).await)
}

/// Opens a folder picker and collects the chosen directory recursively.
///
/// Returns [`CollectError::Cancelled`] when the dialog is dismissed.
pub async fn pick_and_collect_directory(
    filter: &ExtensionFilter,
    start_dir: Option<PathBuf>,
) -> Result<Vec<CollectedFile>, CollectError> {
    let mut dialog = rfd::AsyncFileDialog::new();
    if let Some(dir) = start_dir {
        if dir.exists() {
            dialog = dialog.set_directory(&dir);
        }
    }

    let handle = dialog.pick_folder().await.ok_or(CollectError::Cancelled)?;
    Ok(collect(
        Source::PickedDirectory(handle.path().to_path_buf()),
        filter,
        true,
    )
    .await)
}

/// Core traversal with an explicit variant. All recursive steps go through
/// the same variant.
async fn collect_with_variant(
    source: Source,
    filter: &ExtensionFilter,
    recurse: bool,
    variant: TraversalVariant,
) -> Vec<CollectedFile> {
    let mut visited = HashSet::new();
    let roots = match source {
        Source::Dropped(paths) | Source::PickedFiles(paths) => paths,
        Source::PickedDirectory(dir) => {
            // The picked root is always expanded; only nested directories
            // follow the recursion toggle.
            match variant.canonical(&dir).await {
                Ok(canonical) => {
                    visited.insert(canonical);
                }
                Err(_) => return Vec::new(),
            }
            match variant.list_children(&dir).await {
                Ok(children) => children,
                Err(_) => return Vec::new(),
            }
        }
    };

    let mut collected = Vec::new();
    // Explicit DFS stack; pushing children in reverse keeps name order.
    let mut stack: Vec<PathBuf> = roots.into_iter().rev().collect();

    while let Some(path) = stack.pop() {
        match variant.classify(&path).await {
            EntryKind::File => {
                let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned())
                else {
                    continue;
                };
                if !filter.matches(&name) {
                    continue;
                }
                // A file that fails to materialize is dropped, not retried.
                if let Ok(bytes) = variant.read_file(&path).await {
                    collected.push(CollectedFile { name, path, bytes });
                }
            }
            EntryKind::Directory => {
                if !recurse {
                    continue;
                }
                let Ok(canonical) = variant.canonical(&path).await else {
                    continue;
                };
                // Symbolic links can produce cycles on a real file system.
                if !visited.insert(canonical) {
                    continue;
                }
                if let Ok(children) = variant.list_children(&path).await {
                    for child in children.into_iter().rev() {
                        stack.push(child);
                    }
                }
            }
            EntryKind::Unsupported => {}
        }
    }

    collected
}
