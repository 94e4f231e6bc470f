//! Drawing style widget

use egui::{Response, Slider, Ui};
use pendulum_cache::PortraitStyle;
use pendulum_cache::constants::plot::{MAX_ALPHA, MAX_LINE_WIDTH, MIN_ALPHA, MIN_LINE_WIDTH};

pub struct StyleControls<'a> {
    style: &'a mut PortraitStyle,
}

impl<'a> StyleControls<'a> {
    pub fn new(style: &'a mut PortraitStyle) -> Self {
        Self { style }
    }

    pub fn show(self, ui: &mut Ui) -> Response {
        ui.vertical(|ui| {
            ui.label("Line width");
            ui.add(Slider::new(&mut self.style.line_width, MIN_LINE_WIDTH..=MAX_LINE_WIDTH).step_by(0.1));
            ui.label("Transparency");
            ui.add(Slider::new(&mut self.style.alpha, MIN_ALPHA..=MAX_ALPHA).step_by(0.05));
        })
        .response
    }
}
