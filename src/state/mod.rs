//! Application state management
//!
//! Everything the UI thread owns; solving and caching live on the worker.

mod controls;
mod display;
mod ui;

pub use controls::{Controls, ViewState};
pub use display::DisplayState;
pub use ui::UiState;

use pendulum_cache::Settings;

/// Main application state container
pub struct AppState {
    /// Sidebar parameter inputs
    pub controls: Controls,

    /// Drawing and theme options
    pub view: ViewState,

    /// Latest results from the worker
    pub display: DisplayState,

    /// Status messages
    pub ui: UiState,

    /// Settings the session was started with; saved back on request
    pub settings: Settings,
}

impl AppState {
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            controls: Controls {
                auto_compute: settings.scheduler.auto_compute,
                ..Controls::default()
            },
            view: ViewState::from_settings(&settings),
            display: DisplayState::default(),
            ui: UiState::default(),
            settings,
        }
    }

    /// Settings reflecting the current view and mode
    pub fn current_settings(&self) -> Settings {
        let mut settings = self.settings.clone();
        settings.view.style = self.view.style;
        settings.view.dark_mode = self.view.dark_mode;
        settings.scheduler.auto_compute = self.controls.auto_compute;
        settings
    }

    /// Adopt view and mode options from loaded settings
    ///
    /// Cache lifetimes and the debounce interval only apply to the next
    /// session.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.view.style = settings.view.style;
        self.view.dark_mode = settings.view.dark_mode;
        self.controls.auto_compute = settings.scheduler.auto_compute;
        self.settings = settings;
    }
}
