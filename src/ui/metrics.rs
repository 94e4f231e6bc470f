use std::time::Duration;

use chrono::Local;
use egui::{Color32, RichText, TopBottomPanel};
use pendulum_cache::constants::layout::METRICS_PANEL_HEIGHT;
use pendulum_cache::scheduler::Status;

use crate::app::PendulumApp;

fn status_color(status: Status) -> Color32 {
    match status {
        Status::Fresh => Color32::from_rgb(44, 160, 44),
        Status::Cached => Color32::from_rgb(31, 119, 180),
        Status::Failed => Color32::from_rgb(214, 39, 40),
    }
}

fn metric(ui: &mut egui::Ui, label: &str, value: impl Into<RichText>) {
    ui.vertical(|ui| {
        ui.small(label);
        ui.label(value.into().strong());
    });
}

/// Render the summary metrics above the plot
pub fn render_metrics(app: &mut PendulumApp, ctx: &egui::Context) {
    TopBottomPanel::top("metrics")
        .exact_height(METRICS_PANEL_HEIGHT)
        .show(ctx, |ui| {
            let Some(emission) = app.state.display.emission.as_ref() else {
                ui.centered_and_justified(|ui| ui.label("Computing initial trajectories…"));
                return;
            };
            let batch = &emission.batch;
            let report = batch.report();
            let controls = &app.state.controls;

            let trajectories = if report.failed() > 0 {
                format!("{} / {}", batch.len(), report.attempted)
            } else {
                batch.len().to_string()
            };

            let mut badge = RichText::new(emission.status.label()).color(status_color(emission.status));
            if emission.pending {
                badge = RichText::new(format!("{} ⏳", emission.status.label()))
                    .color(status_color(emission.status));
            }

            let last_compute = match app.state.display.last_computed {
                Some(at) => {
                    let secs = (Local::now() - at).num_seconds().max(0);
                    format!("{}s ago", secs)
                }
                None => "—".to_string(),
            };

            ui.columns(4, |cols| {
                metric(&mut cols[0], "Trajectories", trajectories);
                metric(&mut cols[1], "Quality", controls.quality.label());
                metric(&mut cols[2], "Driving ε", format!("{:.2}", controls.driving_amplitude));
                metric(&mut cols[3], "Time Range", format!("0 – {:.1}", controls.time_horizon));
            });
            ui.columns(4, |cols| {
                metric(&mut cols[0], "Avg Points/Traj", format!("{:.0}", batch.average_points()));
                metric(&mut cols[1], "Cache Status", badge);
                metric(
                    &mut cols[2],
                    "Position Range",
                    format!("{:.2}", batch.final_position_spread()),
                );
                metric(&mut cols[3], "Last Compute", last_compute);
            });
        });

    // Keep the "Xs ago" label moving
    if app.state.display.last_computed.is_some() {
        ctx.request_repaint_after(Duration::from_secs(1));
    }
}

/// Render messages at the bottom of the window
pub fn render_status_bar(app: &mut PendulumApp, ctx: &egui::Context) {
    TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if let Some(message) = app.state.ui.error_message.clone() {
                ui.colored_label(Color32::from_rgb(214, 39, 40), format!("⚠ {}", message));
                if ui.small_button("✖").clicked() {
                    app.state.ui.clear_error();
                }
            } else if let Some(message) = &app.state.ui.info_message {
                ui.label(format!("✔ {}", message));
            } else if app.state.display.is_pending() {
                ui.label("Waiting for parameters to settle…");
            } else {
                ui.label("Ready");
            }
        });
    });
}
