// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the scanner and
//! settings screens.
//!
//! The `App` struct wires together the domains (scanner, settings,
//! localization, engine lifecycle) and translates messages into side
//! effects like config persistence, collection tasks, and engine decode
//! dispatch. Policy decisions (when decodes run, what cancellation means,
//! which failures notify the user) stay close to the update loop so
//! user-facing behavior is easy to audit.

pub mod config;
mod message;
pub mod paths;
pub mod persisted_state;
mod screen;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};
pub use screen::Screen;

use crate::collector::{CollectError, CollectedFile};
use crate::engine::{Decoder, EngineError, LibraryDecoder};
use crate::i18n::fluent::I18n;
use crate::ui::navbar;
use crate::ui::notifications;
use crate::ui::scanner;
use crate::ui::settings::{self, Event as SettingsEvent, StateConfig as SettingsConfig};
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub const WINDOW_DEFAULT_WIDTH: u32 = 900;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 700;
pub const MIN_WINDOW_WIDTH: u32 = 640;
pub const MIN_WINDOW_HEIGHT: u32 = 480;

/// Lifecycle of the external decoding engine.
#[derive(Debug, Clone)]
pub enum EngineStatus {
    /// No engine resolved yet.
    Missing,
    /// The engine binary is downloading (progress in 0.0 - 1.0).
    Downloading(f32),
    /// Loaded and callable.
    Ready,
    /// Resolution or loading failed.
    Failed(String),
}

/// Root Iced application state bridging UI components, localization, and
/// persisted preferences.
pub struct App {
    pub i18n: I18n,
    screen: Screen,
    settings: settings::State,
    scanner: scanner::State,
    engine_status: EngineStatus,
    decoder: Option<Arc<dyn Decoder>>,
    /// Persisted application state (last open directory).
    app_state: persisted_state::AppState,
    /// Toast notification manager for user feedback.
    notifications: notifications::Manager,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("cards", &self.scanner.cards().len())
            .field("engine_status", &self.engine_status)
            .finish()
    }
}

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // Wrap flags in RefCell<Option<_>> to satisfy Fn trait requirement
    // while only consuming flags once (iced 0.14 requires Fn, not FnOnce)
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl Default for App {
    fn default() -> Self {
        Self {
            i18n: I18n::default(),
            screen: Screen::Scanner,
            settings: settings::State::default(),
            scanner: scanner::State::new(),
            engine_status: EngineStatus::Missing,
            decoder: None,
            app_state: persisted_state::AppState::default(),
            notifications: notifications::Manager::new(),
        }
    }
}

impl App {
    /// Initializes application state and kicks off engine resolution plus
    /// any startup path collection requested on the command line.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, config_warning) = config::load();
        let i18n = I18n::new(flags.lang.clone(), &config);

        let mut app = App {
            i18n,
            ..Self::default()
        };

        app.settings = settings::State::new(SettingsConfig {
            options: config.decode.clone(),
            engine_location: config.engine_location(),
            recurse_directories: config.recurse_directories(),
            theme_mode: config.general.theme_mode,
        });

        let (app_state, state_warning) = persisted_state::AppState::load();
        app.app_state = app_state;

        if let Some(key) = config_warning {
            app.notifications
                .push(notifications::Notification::warning(&key));
        }
        if let Some(key) = state_warning {
            app.notifications
                .push(notifications::Notification::warning(&key));
        }

        let mut tasks = vec![update::engine_setup_task(app.settings.engine_location)];

        if !flags.paths.is_empty() {
            let paths: Vec<PathBuf> = flags.paths.iter().map(PathBuf::from).collect();
            app.scanner.collecting = true;
            tasks.push(update::collect_dropped_task(
                paths,
                app.settings.recurse_directories,
            ));
        }

        (app, Task::batch(tasks))
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        let screen_key = match self.screen {
            Screen::Scanner => return app_name,
            Screen::Settings => "navbar-settings",
            Screen::About => "navbar-about",
        };
        format!("{} - {}", self.i18n.tr(screen_key), app_name)
    }

    fn theme(&self) -> Theme {
        self.settings.theme_mode.theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_event_subscription(self.screen),
            subscription::create_tick_subscription(self.notifications.has_notifications()),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navbar(navbar::Message::ScreenSelected(screen))
            | Message::SwitchScreen(screen) => self.switch_screen(screen),
            Message::Settings(settings_message) => {
                let event = self.settings.update(settings_message);
                self.handle_settings_event(event)
            }
            Message::Scanner(scanner_message) => self.handle_scanner_message(scanner_message),
            Message::Notification(notification_message) => {
                self.notifications.handle_message(&notification_message);
                Task::none()
            }
            Message::Tick(_instant) => {
                self.notifications.tick();
                Task::none()
            }
            Message::FileDropped(path) => {
                self.scanner.drop_hover = false;
                self.scanner.collecting = true;
                update::collect_dropped_task(vec![path], self.settings.recurse_directories)
            }
            Message::DropHoverChanged(hovering) => {
                self.scanner.drop_hover = hovering;
                Task::none()
            }
            Message::CollectionFinished(result) => self.handle_collection_finished(result),
            Message::CardPrepared { id, result } => self.handle_card_prepared(id, result),
            Message::CardDecoded { id, result } => {
                self.scanner
                    .set_decode_outcome(id, result.map_err(|error| error.to_string()));
                Task::none()
            }
            Message::EngineDownloadProgress(progress) => {
                if !matches!(self.engine_status, EngineStatus::Ready) {
                    self.engine_status = EngineStatus::Downloading(progress);
                }
                Task::none()
            }
            Message::EngineInstalled(result) => self.handle_engine_installed(result),
            Message::WindowCloseRequested(window_id) => window::close(window_id),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            screen: self.screen,
            settings: &self.settings,
            scanner: &self.scanner,
            engine_status: &self.engine_status,
            notifications: &self.notifications,
        })
    }

    /// Leaves the current screen, committing pending settings input first.
    /// An invalid numeric buffer keeps the user on the settings screen.
    fn switch_screen(&mut self, target: Screen) -> Task<Message> {
        if self.screen == Screen::Settings && target != Screen::Settings {
            if !self.settings.commit_all() {
                return Task::none();
            }
            self.persist_config();
        }
        self.screen = target;
        Task::none()
    }

    fn handle_scanner_message(&mut self, message: scanner::Message) -> Task<Message> {
        match message {
            scanner::Message::PickFiles => {
                self.scanner.collecting = true;
                update::pick_files_task(self.app_state.last_open_directory.clone())
            }
            scanner::Message::PickFolder => {
                self.scanner.collecting = true;
                update::pick_folder_task(self.app_state.last_open_directory.clone())
            }
            other => {
                self.scanner.handle_message(other);
                Task::none()
            }
        }
    }

    fn handle_collection_finished(
        &mut self,
        result: Result<Vec<CollectedFile>, CollectError>,
    ) -> Task<Message> {
        self.scanner.collecting = false;

        let files = match result {
            Ok(files) => files,
            // A dismissed picker means "no change", not a failure.
            Err(CollectError::Cancelled) => return Task::none(),
        };

        if files.is_empty() {
            self.notifications
                .push(notifications::Notification::warning("notification-empty-drop"));
            return Task::none();
        }

        self.notifications.push(
            notifications::Notification::success("notification-collected")
                .with_arg("count", files.len().to_string()),
        );

        if let Some(first) = files.first() {
            self.app_state.set_last_open_directory_from_file(&first.path);
            if let Some(key) = self.app_state.save() {
                self.notifications
                    .push(notifications::Notification::warning(&key));
            }
        }

        let mut tasks = Vec::with_capacity(files.len());
        for file in files {
            let id = self.scanner.add_card(file.name.clone());
            tasks.push(update::prepare_card_task(id, file));
        }
        Task::batch(tasks)
    }

    fn handle_card_prepared(
        &mut self,
        id: usize,
        result: Result<crate::media::ImageData, crate::error::Error>,
    ) -> Task<Message> {
        match result {
            Ok(image) => {
                self.scanner.set_image(id, image);
                self.dispatch_pending_decodes()
            }
            Err(_) => {
                // Per-item policy: the card shows the failure, no toast.
                self.scanner.set_load_failed(id);
                Task::none()
            }
        }
    }

    fn handle_engine_installed(
        &mut self,
        result: Result<PathBuf, EngineError>,
    ) -> Task<Message> {
        let loaded = result.and_then(|path| LibraryDecoder::load(&path));
        match loaded {
            Ok(decoder) => {
                self.decoder = Some(Arc::new(decoder));
                self.engine_status = EngineStatus::Ready;
                self.notifications
                    .push(notifications::Notification::success(
                        "notification-engine-ready",
                    ));
                self.dispatch_pending_decodes()
            }
            Err(error) => {
                self.engine_status = EngineStatus::Failed(error.to_string());
                self.notifications
                    .push(notifications::Notification::error("notification-engine-error"));
                Task::none()
            }
        }
    }

    /// Sends every displayable, undecoded card to the engine.
    fn dispatch_pending_decodes(&mut self) -> Task<Message> {
        let Some(decoder) = self.decoder.clone() else {
            return Task::none();
        };

        let pending = self.scanner.awaiting_engine();
        let mut tasks = Vec::with_capacity(pending.len());
        for (id, image) in pending {
            self.scanner.set_decoding(id);
            tasks.push(update::decode_card_task(
                id,
                Arc::clone(&decoder),
                image,
                self.settings.options.clone(),
            ));
        }
        Task::batch(tasks)
    }

    fn handle_settings_event(&mut self, event: SettingsEvent) -> Task<Message> {
        match event {
            SettingsEvent::None => Task::none(),
            SettingsEvent::OptionsChanged | SettingsEvent::AppearanceChanged => {
                self.persist_config();
                Task::none()
            }
            SettingsEvent::EngineLocationChanged => {
                self.persist_config();
                self.decoder = None;
                self.engine_status = EngineStatus::Missing;
                update::engine_setup_task(self.settings.engine_location)
            }
            SettingsEvent::LanguageChanged(locale) => {
                self.i18n.set_locale(locale);
                self.persist_config();
                Task::none()
            }
        }
    }

    /// Writes the current preferences to `settings.toml`.
    fn persist_config(&mut self) {
        let config = config::Config {
            general: config::GeneralConfig {
                language: Some(self.i18n.current_locale().to_string()),
                theme_mode: self.settings.theme_mode,
            },
            engine: config::EngineConfig {
                location: Some(self.settings.engine_location),
            },
            scan: config::ScanConfig {
                recurse_directories: Some(self.settings.recurse_directories),
            },
            decode: self.settings.options.clone(),
        };

        if config::save(&config).is_err() {
            self.notifications
                .push(notifications::Notification::warning(
                    "notification-config-save-error",
                ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::CollectedFile;
    use crate::decode::DecodeResult;
    use crate::engine::testing::StaticDecoder;
    use crate::media::ImageData;
    use crate::ui::scanner::CardStatus;
    use std::fs;
    use std::sync::{Mutex, OnceLock};
    use tempfile::tempdir;

    fn config_env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn with_temp_dirs<F>(test: F)
    where
        F: FnOnce(&std::path::Path),
    {
        let _guard = config_env_lock().lock().expect("failed to lock mutex");
        let temp_dir = tempdir().expect("failed to create temp dir");
        let previous_config = std::env::var(paths::ENV_CONFIG_DIR).ok();
        let previous_data = std::env::var(paths::ENV_DATA_DIR).ok();
        std::env::set_var(paths::ENV_CONFIG_DIR, temp_dir.path());
        std::env::set_var(paths::ENV_DATA_DIR, temp_dir.path());

        test(temp_dir.path());

        match previous_config {
            Some(value) => std::env::set_var(paths::ENV_CONFIG_DIR, value),
            None => std::env::remove_var(paths::ENV_CONFIG_DIR),
        }
        match previous_data {
            Some(value) => std::env::set_var(paths::ENV_DATA_DIR, value),
            None => std::env::remove_var(paths::ENV_DATA_DIR),
        }
    }

    fn encoded_png() -> Vec<u8> {
        let img = image_rs::RgbaImage::from_pixel(2, 2, image_rs::Rgba([0, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image_rs::ImageFormat::Png,
        )
        .expect("encode png");
        bytes
    }

    fn collected(name: &str) -> CollectedFile {
        CollectedFile {
            name: name.to_string(),
            path: PathBuf::from("/tmp/codes").join(name),
            bytes: encoded_png(),
        }
    }

    #[test]
    fn new_starts_on_scanner_without_cards() {
        with_temp_dirs(|_| {
            let (app, _task) = App::new(Flags::default());
            assert_eq!(app.screen, Screen::Scanner);
            assert!(app.scanner.is_empty());
            assert!(matches!(app.engine_status, EngineStatus::Missing));
        });
    }

    #[test]
    fn collection_results_create_cards_and_stop_the_busy_state() {
        with_temp_dirs(|_| {
            let mut app = App::default();
            app.scanner.collecting = true;

            let _ = app.update(Message::CollectionFinished(Ok(vec![
                collected("a.png"),
                collected("b.png"),
            ])));

            assert!(!app.scanner.collecting);
            assert_eq!(app.scanner.cards().len(), 2);
            assert!(app.notifications.has_notifications());
        });
    }

    #[test]
    fn empty_collection_warns_without_creating_cards() {
        let mut app = App::default();
        app.scanner.collecting = true;

        let _ = app.update(Message::CollectionFinished(Ok(Vec::new())));

        assert!(app.scanner.is_empty());
        assert!(app.notifications.has_notifications());
    }

    #[test]
    fn cancelled_collection_is_treated_as_no_change() {
        let mut app = App::default();
        app.scanner.collecting = true;

        let _ = app.update(Message::CollectionFinished(Err(CollectError::Cancelled)));

        assert!(!app.scanner.collecting);
        assert!(app.scanner.is_empty());
        assert!(
            !app.notifications.has_notifications(),
            "cancellation must not notify"
        );
    }

    #[test]
    fn prepared_cards_wait_for_the_engine() {
        let mut app = App::default();
        let id = app.scanner.add_card("a.png".into());

        let image = ImageData::from_rgba(1, 1, vec![0, 0, 0, 255]);
        let _ = app.update(Message::CardPrepared {
            id,
            result: Ok(image),
        });

        assert!(matches!(
            app.scanner.cards()[0].status,
            CardStatus::AwaitingEngine
        ));
    }

    #[test]
    fn prepared_cards_decode_once_a_decoder_is_present() {
        let mut app = App::default();
        app.decoder = Some(Arc::new(StaticDecoder {
            results: vec![DecodeResult::default()],
        }));
        app.engine_status = EngineStatus::Ready;

        let id = app.scanner.add_card("a.png".into());
        let image = ImageData::from_rgba(1, 1, vec![0, 0, 0, 255]);
        let _ = app.update(Message::CardPrepared {
            id,
            result: Ok(image),
        });

        assert!(matches!(
            app.scanner.cards()[0].status,
            CardStatus::Decoding
        ));
    }

    #[test]
    fn failed_image_preparation_is_absorbed_per_card() {
        let mut app = App::default();
        let id = app.scanner.add_card("broken.png".into());

        let _ = app.update(Message::CardPrepared {
            id,
            result: Err(crate::error::Error::Image("truncated".into())),
        });

        assert!(matches!(
            app.scanner.cards()[0].status,
            CardStatus::LoadFailed
        ));
        assert!(
            !app.notifications.has_notifications(),
            "per-item failures are silent"
        );
    }

    #[test]
    fn decode_results_land_on_the_right_card() {
        let mut app = App::default();
        let id = app.scanner.add_card("a.png".into());
        app.scanner
            .set_image(id, ImageData::from_rgba(1, 1, vec![0, 0, 0, 255]));

        let _ = app.update(Message::CardDecoded {
            id,
            result: Ok(vec![DecodeResult::default()]),
        });

        match &app.scanner.cards()[0].status {
            CardStatus::Decoded(results) => assert_eq!(results.len(), 1),
            other => panic!("expected Decoded, got {other:?}"),
        }
    }

    #[test]
    fn engine_failure_sets_status_and_notifies() {
        let mut app = App::default();

        let _ = app.update(Message::EngineInstalled(Err(EngineError::NotFound(
            "libzxing_reader.so".into(),
        ))));

        assert!(matches!(app.engine_status, EngineStatus::Failed(_)));
        assert!(app.notifications.has_notifications());
    }

    #[test]
    fn download_progress_updates_the_status() {
        let mut app = App::default();
        let _ = app.update(Message::EngineDownloadProgress(0.5));
        assert!(matches!(
            app.engine_status,
            EngineStatus::Downloading(progress) if (progress - 0.5).abs() < f32::EPSILON
        ));
    }

    #[test]
    fn invalid_settings_input_blocks_leaving_the_settings_screen() {
        with_temp_dirs(|_| {
            let mut app = App {
                screen: Screen::Settings,
                ..App::default()
            };
            let _ = app.update(Message::Settings(settings::Message::NumberInputChanged(
                settings::NumberField::MinLineCount,
                "not-a-number".into(),
            )));
            let _ = app.update(Message::Settings(settings::Message::NumberSubmitted(
                settings::NumberField::MinLineCount,
            )));

            let _ = app.update(Message::SwitchScreen(Screen::Scanner));
            assert_eq!(app.screen, Screen::Settings);

            let _ = app.update(Message::Settings(settings::Message::NumberInputChanged(
                settings::NumberField::MinLineCount,
                "3".into(),
            )));
            let _ = app.update(Message::SwitchScreen(Screen::Scanner));
            assert_eq!(app.screen, Screen::Scanner);
        });
    }

    #[test]
    fn settings_changes_are_persisted_to_disk() {
        with_temp_dirs(|config_root| {
            let mut app = App::default();
            let _ = app.update(Message::Settings(settings::Message::SwitchToggled(
                settings::Switch::TryHarder,
                false,
            )));

            let config_path = config_root.join("settings.toml");
            assert!(config_path.exists());
            let contents = fs::read_to_string(config_path).expect("config should be readable");
            assert!(contents.contains("try_harder = false"));
        });
    }

    #[test]
    fn language_selection_updates_locale_and_config() {
        with_temp_dirs(|config_root| {
            let mut app = App::default();
            let target: unic_langid::LanguageIdentifier = "fr".parse().expect("parse locale");
            if !app.i18n.available_locales.contains(&target) {
                return;
            }

            let _ = app.update(Message::Settings(settings::Message::LanguageSelected(
                target.clone(),
            )));

            assert_eq!(app.i18n.current_locale(), &target);
            let contents = fs::read_to_string(config_root.join("settings.toml"))
                .expect("config should be readable");
            assert!(contents.contains("language = \"fr\""));
        });
    }

    #[test]
    fn drop_hover_toggles_the_scanner_highlight() {
        let mut app = App::default();
        let _ = app.update(Message::DropHoverChanged(true));
        assert!(app.scanner.drop_hover);
        let _ = app.update(Message::DropHoverChanged(false));
        assert!(!app.scanner.drop_hover);
    }

    #[test]
    fn title_reflects_the_active_screen() {
        let mut app = App::default();
        assert_eq!(app.title(), app.i18n.tr("window-title"));

        app.screen = Screen::Settings;
        assert!(app.title().contains(&app.i18n.tr("navbar-settings")));
    }
}
