// SPDX-License-Identifier: MPL-2.0
//! Application root state wiring the image source, the viewer and the file
//! watcher together.
//!
//! The `App` owns the [`ImageSource`] and hands the [`Viewer`] to it as the
//! observer of every operation. Animation playback and change detection are
//! both driven from the periodic tick.

mod subscription;

use crate::config::{self, Config};
use crate::source::{ChangeTrigger, ChangeType, ImageSource, ReloadBehavior, ReloadFlag, SourceOptions};
use crate::ui::viewer::{controls, Effect, Viewer};
use crate::watcher::FileWatcher;
use iced::widget::{button, Column, Container, Row, Text};
use iced::{window, Element, Length, Size, Subscription, Task, Theme};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub const WINDOW_DEFAULT_WIDTH: f32 = 800.0;
pub const WINDOW_DEFAULT_HEIGHT: f32 = 650.0;
pub const MIN_WINDOW_WIDTH: f32 = 400.0;
pub const MIN_WINDOW_HEIGHT: f32 = 300.0;

/// Vertical space taken by the toolbar, subtracted from the window to get the
/// viewport used for fit-to-window.
const TOOLBAR_HEIGHT: f32 = 48.0;

/// Tick used only to poll the file watcher while nothing is playing.
const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Root Iced application state.
pub struct App {
    source: ImageSource,
    viewer: Viewer,
    watcher: Option<FileWatcher>,
    config: Config,
    config_path: Option<PathBuf>,
    /// Change waiting for the user to confirm a reload.
    pending_change: Option<ChangeType>,
    error: Option<String>,
    last_tick: Option<Instant>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("file", &self.source.file_path())
            .field("kind", &self.source.kind())
            .field("pending_change", &self.pending_change)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Viewer(controls::Message),
    Tick(Instant),
    WindowResized(Size),
    ConfirmReload,
    DismissReload,
}

/// Runtime flags passed in from the command line.
#[derive(Debug, Default)]
pub struct Flags {
    /// Image to open on startup.
    pub file_path: Option<PathBuf>,
    /// Settings file to use instead of the platform default.
    pub config_path: Option<PathBuf>,
    /// Start animations playing regardless of the configuration.
    pub play: bool,
}

pub fn window_settings() -> window::Settings {
    window::Settings {
        size: Size::new(WINDOW_DEFAULT_WIDTH, WINDOW_DEFAULT_HEIGHT),
        min_size: Some(Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
///
/// # Errors
///
/// Returns the error reported by Iced if the window or renderer cannot be
/// created.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 requires an `Fn` boot closure; flags are consumed once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

fn load_config(path: Option<&Path>) -> Config {
    let result = match path {
        Some(path) if path.exists() => config::load_from_path(path),
        Some(_) => Ok(Config::default()),
        None => config::load(),
    };
    result.unwrap_or_else(|err| {
        tracing::warn!(%err, "cannot load settings, using defaults");
        Config::default()
    })
}

impl App {
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let config = load_config(flags.config_path.as_deref());
        let options = SourceOptions {
            start_paused: !flags.play && config.start_paused.unwrap_or(config::DEFAULT_START_PAUSED),
        };

        let mut app = App {
            source: ImageSource::with_options(options),
            viewer: Viewer::new(&config),
            watcher: None,
            config,
            config_path: flags.config_path,
            pending_change: None,
            error: None,
            last_tick: None,
        };
        app.viewer.set_viewport(Size::new(
            WINDOW_DEFAULT_WIDTH,
            WINDOW_DEFAULT_HEIGHT - TOOLBAR_HEIGHT,
        ));

        if let Some(path) = flags.file_path {
            app.open(&path);
        }

        (app, Task::none())
    }

    fn open(&mut self, path: &Path) {
        match self.source.open(path, &mut self.viewer) {
            Ok(()) => self.error = None,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "cannot open image");
                self.error = Some(err.to_string());
            }
        }
        self.watch(path);
    }

    fn watch(&mut self, path: &Path) {
        if !self.config.watch_file.unwrap_or(true) {
            return;
        }
        self.watcher = match FileWatcher::watch(path) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "file changes will not be detected");
                None
            }
        };
    }

    fn title(&self) -> String {
        match self.source.file_path().and_then(Path::file_name) {
            Some(name) => format!("{} - {}", name.to_string_lossy(), config::APP_NAME),
            None => config::APP_NAME.to_string(),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        let playing = self.viewer.is_animated() && !self.viewer.is_paused();
        Subscription::batch([
            subscription::create_event_subscription(),
            subscription::create_tick_subscription(
                playing,
                self.watcher.is_some(),
                self.config.frame_tick(),
                WATCH_POLL_INTERVAL,
            ),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Viewer(message) => self.handle_viewer_message(message),
            Message::Tick(now) => self.handle_tick(now),
            Message::WindowResized(size) => {
                self.viewer.set_viewport(Size::new(
                    size.width,
                    (size.height - TOOLBAR_HEIGHT).max(0.0),
                ));
                self.source.update_visibility();
            }
            Message::ConfirmReload => {
                if let Some(change) = self.pending_change.take() {
                    self.reload(change);
                }
            }
            Message::DismissReload => {
                if let Some(change) = self.pending_change.take() {
                    self.apply_reload(ReloadFlag::Ignore, change);
                }
            }
        }
        Task::none()
    }

    fn handle_viewer_message(&mut self, message: controls::Message) {
        match self.viewer.update(message) {
            Effect::TogglePlayback => {
                let paused = !self.source.is_paused();
                self.source.set_paused(paused, &mut self.viewer);
                self.last_tick = None;
            }
            Effect::None => self.persist_display_settings(),
        }
    }

    fn persist_display_settings(&mut self) {
        let updated = Config {
            fit_to_window: Some(self.viewer.zoom().fit_to_window),
            show_background: Some(self.viewer.show_background()),
            show_outline: Some(self.viewer.show_outline()),
            ..self.config.clone()
        };
        if updated == self.config {
            return;
        }
        self.config = updated;

        let result = match &self.config_path {
            Some(path) => config::save_to_path(&self.config, path),
            None => config::save(&self.config),
        };
        if let Err(err) = result {
            tracing::warn!(%err, "cannot save settings");
        }
    }

    fn handle_tick(&mut self, now: Instant) {
        let elapsed = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_tick = Some(now);

        if self.source.advance_animation(elapsed, &mut self.viewer) {
            self.viewer.refresh_frame();
        }

        let change = self.watcher.as_ref().and_then(FileWatcher::poll);
        if let Some(change) = change {
            self.on_file_changed(change);
        }
    }

    fn on_file_changed(&mut self, change: ChangeType) {
        tracing::debug!(?change, "watched file changed");
        match self.source.reload_behavior(ChangeTrigger::External, change) {
            ReloadBehavior::Silent => self.reload(change),
            ReloadBehavior::Ask => {
                // A newer change supersedes one still waiting for an answer.
                self.pending_change = Some(change);
            }
        }
    }

    fn reload(&mut self, change: ChangeType) {
        self.apply_reload(ReloadFlag::Reload, change);
    }

    fn apply_reload(&mut self, flag: ReloadFlag, change: ChangeType) {
        match self.source.reload(flag, change, &mut self.viewer) {
            Ok(()) => {
                if flag == ReloadFlag::Reload && change != ChangeType::PermissionsChanged {
                    self.error = None;
                }
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let mut column = Column::new().width(Length::Fill).height(Length::Fill);

        if self.pending_change.is_some() {
            let prompt = Row::new()
                .spacing(10)
                .padding(8)
                .push(Text::new("The file has changed on disk."))
                .push(button(Text::new("Reload")).on_press(Message::ConfirmReload))
                .push(button(Text::new("Ignore")).on_press(Message::DismissReload));
            column = column.push(prompt);
        }

        if let Some(error) = &self.error {
            column = column.push(Container::new(Text::new(error.as_str())).padding(8));
        }

        column.push(self.viewer.view().map(Message::Viewer)).into()
    }
}
