use crate::app::PendulumApp;

pub fn render_help_dialog(app: &mut PendulumApp, ctx: &egui::Context) {
    if app.state.view.show_help {
        egui::Window::new("⌨ Keyboard Shortcuts")
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .show(ctx, |ui| {
                ui.heading("Computation");
                ui.label("Enter - Compute now");
                ui.label("Auto-compute recomputes at most every half second while sliders move");

                ui.separator();
                ui.heading("View");
                ui.label("R - Fit plot to trajectories");
                ui.label("T - Toggle dark/light theme");
                ui.label("H / F1 - Toggle help");
                ui.label("ESC - Close help");

                ui.separator();
                ui.heading("Mouse Controls");
                ui.label("Scroll - Zoom in/out");
                ui.label("Drag - Pan view");
                ui.label("Double-click - Reset view");

                ui.separator();
                if ui.button("Close").clicked() {
                    app.state.view.show_help = false;
                }
            });
    }
}
