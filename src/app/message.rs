// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::collector::{CollectError, CollectedFile};
use crate::decode::DecodeResult;
use crate::engine::EngineError;
use crate::error::Error;
use crate::media::ImageData;
use crate::ui::navbar;
use crate::ui::notifications;
use crate::ui::scanner;
use crate::ui::settings;
use std::path::PathBuf;
use std::time::Instant;

use super::Screen;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Navbar(navbar::Message),
    SwitchScreen(Screen),
    Settings(settings::Message),
    Scanner(scanner::Message),
    Notification(notifications::NotificationMessage),
    /// Periodic tick driving notification auto-dismiss.
    Tick(Instant),
    /// A file or directory was dropped on the window.
    FileDropped(PathBuf),
    /// A drag entered (`true`) or left (`false`) the window.
    DropHoverChanged(bool),
    /// One collection operation settled.
    CollectionFinished(Result<Vec<CollectedFile>, CollectError>),
    /// A collected file was rasterized for display.
    CardPrepared {
        id: usize,
        result: Result<ImageData, Error>,
    },
    /// The engine returned results for a card.
    CardDecoded {
        id: usize,
        result: Result<Vec<DecodeResult>, EngineError>,
    },
    /// Progress while downloading the engine binary (0.0 - 1.0).
    EngineDownloadProgress(f32),
    /// The engine binary is ready to load (or failed to resolve).
    EngineInstalled(Result<PathBuf, EngineError>),
    /// Window close was requested (user clicked X or pressed Alt+F4).
    WindowCloseRequested(iced::window::Id),
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// Paths to scan on startup (files or directories).
    pub paths: Vec<String>,
}
