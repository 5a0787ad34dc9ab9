// SPDX-License-Identifier: MPL-2.0
//! Background task constructors for the update loop.
//!
//! Collection, image preparation, engine decode, and engine setup all run
//! off the UI thread; each constructor returns a `Task` resolving to the
//! corresponding top-level [`Message`].

use super::Message;
use crate::collector::{self, CollectedFile, ExtensionFilter, Source};
use crate::decode::DecodeOptions;
use crate::engine::{self, Decoder, EngineError, EngineLocation};
use crate::media::ImageData;
use iced::Task;
use std::path::PathBuf;
use std::sync::Arc;

/// Collects entries dropped onto the window.
pub fn collect_dropped_task(paths: Vec<PathBuf>, recurse: bool) -> Task<Message> {
    Task::perform(
        async move {
            let filter = ExtensionFilter::image_defaults();
            Ok(collector::collect(Source::Dropped(paths), &filter, recurse).await)
        },
        Message::CollectionFinished,
    )
}

/// Opens the multi-file picker and collects the selection.
pub fn pick_files_task(start_dir: Option<PathBuf>) -> Task<Message> {
    Task::perform(
        async move {
            let filter = ExtensionFilter::image_defaults();
            collector::pick_and_collect_files(&filter, start_dir).await
        },
        Message::CollectionFinished,
    )
}

/// Opens the folder picker and collects the chosen directory.
pub fn pick_folder_task(start_dir: Option<PathBuf>) -> Task<Message> {
    Task::perform(
        async move {
            let filter = ExtensionFilter::image_defaults();
            collector::pick_and_collect_directory(&filter, start_dir).await
        },
        Message::CollectionFinished,
    )
}

/// Rasterizes a collected file for display on a blocking thread.
pub fn prepare_card_task(id: usize, file: CollectedFile) -> Task<Message> {
    Task::perform(
        async move {
            tokio::task::spawn_blocking(move || ImageData::from_encoded_bytes(&file.bytes))
                .await
                .unwrap_or_else(|join_error| {
                    Err(crate::error::Error::Image(join_error.to_string()))
                })
        },
        move |result| Message::CardPrepared { id, result },
    )
}

/// Runs one engine decode on a blocking thread.
pub fn decode_card_task(
    id: usize,
    decoder: Arc<dyn Decoder>,
    image: ImageData,
    options: DecodeOptions,
) -> Task<Message> {
    let width = image.width;
    let height = image.height;
    let rgba = image.rgba_bytes_arc();

    Task::perform(
        async move {
            tokio::task::spawn_blocking(move || decoder.decode(width, height, &rgba, &options))
                .await
                .unwrap_or_else(|join_error| {
                    Err(EngineError::DecodeFailed(join_error.to_string()))
                })
        },
        move |result| Message::CardDecoded { id, result },
    )
}

/// Resolves the engine binary for `location`, streaming download progress
/// into messages.
pub fn engine_setup_task(location: EngineLocation) -> Task<Message> {
    use iced::futures::channel::{mpsc, oneshot};
    use iced::futures::stream;
    use iced::futures::StreamExt;

    enum SetupPhase {
        /// Nothing spawned yet; the worker starts on first poll so the
        /// task can be constructed outside a runtime.
        Start { location: EngineLocation },
        ReceivingProgress {
            progress_rx: mpsc::Receiver<f32>,
            result_rx: oneshot::Receiver<Result<PathBuf, EngineError>>,
        },
        WaitingForResult {
            result_rx: oneshot::Receiver<Result<PathBuf, EngineError>>,
        },
        Completed,
    }

    let setup_stream = stream::unfold(
        SetupPhase::Start { location },
        |phase| async move {
            match phase {
                SetupPhase::Start { location } => {
                    let (progress_tx, progress_rx) = mpsc::channel::<f32>(100);
                    let (result_tx, result_rx) =
                        oneshot::channel::<Result<PathBuf, EngineError>>();

                    tokio::spawn(async move {
                        let mut progress_tx = progress_tx;
                        let outcome = engine::download::ensure_engine(location, |progress| {
                            let _ = progress_tx.try_send(progress);
                        })
                        .await;

                        let _ = result_tx.send(outcome);
                        // progress_tx is dropped here, closing the channel
                    });

                    Some((
                        Message::EngineDownloadProgress(0.0),
                        SetupPhase::ReceivingProgress {
                            progress_rx,
                            result_rx,
                        },
                    ))
                }
                SetupPhase::ReceivingProgress {
                    mut progress_rx,
                    result_rx,
                } => match progress_rx.next().await {
                    Some(progress) => Some((
                        Message::EngineDownloadProgress(progress),
                        SetupPhase::ReceivingProgress {
                            progress_rx,
                            result_rx,
                        },
                    )),
                    None => Some((
                        Message::EngineDownloadProgress(1.0),
                        SetupPhase::WaitingForResult { result_rx },
                    )),
                },
                SetupPhase::WaitingForResult { result_rx } => {
                    let message = match result_rx.await {
                        Ok(outcome) => Message::EngineInstalled(outcome),
                        Err(_) => Message::EngineInstalled(Err(EngineError::LoadFailed(
                            "engine setup task cancelled".to_string(),
                        ))),
                    };
                    Some((message, SetupPhase::Completed))
                }
                SetupPhase::Completed => None, // Terminate the stream
            }
        },
    );

    Task::stream(setup_stream)
}
