use egui::SidePanel;
use pendulum_cache::constants::layout::SIDEBAR_WIDTH;

use crate::app::PendulumApp;
use crate::widgets::{ParameterControls, StyleControls};

/// Render the parameter sidebar
/// Returns true when "Compute" was clicked
pub fn render_sidebar(app: &mut PendulumApp, ctx: &egui::Context) -> bool {
    let mut compute = false;

    SidePanel::left("sidebar")
        .resizable(false)
        .exact_width(SIDEBAR_WIDTH)
        .show(ctx, |ui| {
            ui.heading("⚙ Simulation");
            ui.separator();
            ParameterControls::new(&mut app.state.controls).show(ui);

            ui.add_space(8.0);
            let label = if app.state.controls.auto_compute {
                "🔄 Recompute"
            } else {
                "▶ Compute"
            };
            compute = ui
                .add_sized([ui.available_width(), 28.0], egui::Button::new(label))
                .on_hover_text("Compute with the current parameters (Enter)")
                .clicked();

            ui.add_space(12.0);
            ui.heading("🎨 Display");
            ui.separator();
            StyleControls::new(&mut app.state.view.style).show(ui);
            ui.checkbox(&mut app.state.view.dark_mode, "Dark mode");

            ui.add_space(12.0);
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("💾").on_hover_text("Save settings").clicked() {
                    app.save_settings();
                }
                if ui.button("📂").on_hover_text("Load settings").clicked() {
                    app.load_settings();
                }
                if ui.button("❓").on_hover_text("Keyboard shortcuts (H)").clicked() {
                    app.state.view.show_help = !app.state.view.show_help;
                }
            });
        });

    compute
}
