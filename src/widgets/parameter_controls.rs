//! Simulation parameter widget

use egui::{ComboBox, Response, Slider, Ui};
use pendulum_cache::Quality;
use pendulum_cache::constants::params::{
    AMPLITUDE_STEP, HORIZON_STEP, MAX_AMPLITUDE, MAX_COUNT, MAX_HORIZON, MIN_HORIZON,
};

use crate::state::Controls;

/// Sliders and selectors for one [`Controls`] value
pub struct ParameterControls<'a> {
    controls: &'a mut Controls,
}

impl<'a> ParameterControls<'a> {
    pub fn new(controls: &'a mut Controls) -> Self {
        Self { controls }
    }

    pub fn show(self, ui: &mut Ui) -> Response {
        ui.vertical(|ui| {
            ui.label("Trajectories");
            ui.add(Slider::new(&mut self.controls.count, 1..=MAX_COUNT).logarithmic(true));

            ui.label("Driving amplitude ε");
            ui.add(
                Slider::new(&mut self.controls.driving_amplitude, 0.0..=MAX_AMPLITUDE)
                    .step_by(AMPLITUDE_STEP)
                    .fixed_decimals(1),
            );

            ui.label("Time range");
            ui.add(
                Slider::new(&mut self.controls.time_horizon, MIN_HORIZON..=MAX_HORIZON)
                    .step_by(HORIZON_STEP)
                    .fixed_decimals(1),
            );

            ComboBox::from_label("Quality")
                .selected_text(self.controls.quality.label())
                .show_ui(ui, |ui| {
                    for quality in Quality::ALL {
                        ui.selectable_value(&mut self.controls.quality, quality, quality.label());
                    }
                });

            ui.checkbox(&mut self.controls.auto_compute, "Auto-compute")
                .on_hover_text("Recompute on every change, at most twice a second");
        })
        .response
    }
}
