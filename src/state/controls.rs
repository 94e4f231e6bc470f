//! Sidebar inputs: simulation parameters and drawing style

use pendulum_cache::constants::params::{DEFAULT_AMPLITUDE, DEFAULT_COUNT, DEFAULT_HORIZON};
use pendulum_cache::scheduler::{Mode, Request};
use pendulum_cache::{ParameterSet, PortraitStyle, Quality, Settings};

/// Values bound to the parameter widgets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    pub count: usize,
    pub driving_amplitude: f64,
    pub time_horizon: f64,
    pub quality: Quality,
    /// Recompute on every change instead of waiting for "Compute"
    pub auto_compute: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            driving_amplitude: DEFAULT_AMPLITUDE,
            time_horizon: DEFAULT_HORIZON,
            quality: Quality::default(),
            auto_compute: true,
        }
    }
}

impl Controls {
    pub fn params(&self) -> ParameterSet {
        ParameterSet::new(
            self.count,
            self.driving_amplitude,
            self.time_horizon,
            self.quality,
        )
    }

    pub fn mode(&self) -> Mode {
        if self.auto_compute {
            Mode::Auto
        } else {
            Mode::Manual
        }
    }

    pub fn request(&self, trigger: bool) -> Request {
        Request {
            params: self.params(),
            mode: self.mode(),
            trigger,
        }
    }
}

/// Display options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub style: PortraitStyle,
    pub dark_mode: bool,
    pub show_help: bool,
    /// Fit the plot to the portrait on the next frame
    pub reset_bounds: bool,
}

impl ViewState {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            style: settings.view.style,
            dark_mode: settings.view.dark_mode,
            show_help: false,
            reset_bounds: false,
        }
    }
}
