use egui::{CentralPanel, Color32};
use egui_plot::{Line, Plot, Points};
use pendulum_cache::constants::plot::MARKER_RADIUS;

use crate::app::PendulumApp;

/// Render the phase portrait
pub fn render_plot(app: &mut PendulumApp, ctx: &egui::Context) {
    CentralPanel::default().show(ctx, |ui| {
        let Some(portrait) = app.state.display.portrait.clone() else {
            ui.centered_and_justified(|ui| {
                if app.state.display.emission.as_ref().is_some_and(|e| e.batch.is_empty()) {
                    ui.label("No trajectories to show. Try other parameters.");
                } else {
                    ui.spinner();
                }
            });
            return;
        };

        let mut plot = Plot::new("phase_portrait")
            .x_axis_label("Position x")
            .y_axis_label("Velocity v")
            .height(ui.available_height().max(200.0));

        if app.state.view.reset_bounds {
            plot = plot.reset();
            app.state.view.reset_bounds = false;
        }

        plot.show(ui, |plot_ui| {
            let marker_alpha = (portrait.marker_alpha * 255.0).round() as u8;
            for (i, curve) in portrait.curves.iter().enumerate() {
                let [r, g, b, a] = curve.color.0;
                let name = format!("Trajectory {}", i + 1);
                plot_ui.line(
                    Line::new(name.clone(), curve.points.clone())
                        .color(Color32::from_rgba_unmultiplied(r, g, b, a))
                        .width(portrait.line_width),
                );
                plot_ui.points(
                    Points::new(name, vec![curve.start])
                        .radius(MARKER_RADIUS)
                        .color(Color32::from_rgba_unmultiplied(r, g, b, marker_alpha)),
                );
            }
        });
    });
}
