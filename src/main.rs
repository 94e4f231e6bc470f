#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::Path;

use pendulum_cache::Settings;
use pendulum_cache::constants::config::CONFIG_FILE;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod state;
mod ui;
mod widgets;

use app::PendulumApp;

#[cfg(feature = "profile-with-puffin")]
fn start_puffin_server() -> Option<puffin_http::Server> {
    puffin::set_scopes_on(true);
    match puffin_http::Server::new(&format!("0.0.0.0:{}", puffin_http::DEFAULT_PORT)) {
        Ok(server) => {
            tracing::info!(port = puffin_http::DEFAULT_PORT, "puffin server listening");
            Some(server)
        }
        Err(e) => {
            tracing::warn!(error = %e, "puffin server failed to start");
            None
        }
    }
}

fn main() -> eframe::Result {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "pendulum_cache=info".into()))
        .with(fmt::layer())
        .init();

    #[cfg(feature = "profile-with-puffin")]
    let _puffin_server = start_puffin_server();

    let settings = Settings::load_or_default(Path::new(CONFIG_FILE));

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Driven Pendulum Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(PendulumApp::new(cc, settings)))),
    )
}
