use std::path::PathBuf;

use pendulum_cache::scheduler::Request;
use pendulum_cache::{BackgroundWorker, PendulumSolver, Session, Settings, WorkerRequest};
use tracing::info;

use crate::state::AppState;

pub struct PendulumApp {
    pub state: AppState,
    worker: BackgroundWorker,
    /// Last evaluation sent to the worker, to detect changes
    last_sent: Option<Request>,
}

impl PendulumApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let session = Session::new(
            PendulumSolver::default(),
            settings.scheduler_settings(),
            settings.cache_ttls(),
        );
        let ctx = cc.egui_ctx.clone();
        let worker = BackgroundWorker::spawn(session, move || ctx.request_repaint());

        let mut app = Self {
            state: AppState::from_settings(settings),
            worker,
            last_sent: None,
        };
        // Initial load
        app.submit(false);
        app
    }

    /// Send the current parameters when they changed, or unconditionally
    /// when `trigger` is set
    pub fn submit(&mut self, trigger: bool) {
        let request = self.state.controls.request(trigger);
        if !trigger && self.last_sent.map(|r| Request { trigger: false, ..r }) == Some(request) {
            return;
        }
        self.last_sent = Some(request);
        if let Err(e) = self.worker.request(WorkerRequest::Evaluate(request)) {
            self.state.ui.set_error(e.user_message());
        }
    }

    /// Drain finished work from the worker
    pub fn drain_results(&mut self) {
        while let Some(result) = self.worker.poll() {
            if let Some(error) = self.state.display.accept(result) {
                self.state.ui.set_error(error.user_message());
            } else if self.state.display.emission.as_ref().is_some_and(|e| !e.batch.is_empty()) {
                self.state.ui.clear_error();
            }
        }
    }

    /// Ask for the portrait of the displayed batch in the current style
    pub fn request_portrait(&mut self) {
        let Some((fingerprint, style)) = self.state.display.wanted_render(&self.state.view.style) else {
            return;
        };
        match self.worker.request(WorkerRequest::Render { fingerprint, style }) {
            Ok(()) => self.state.display.mark_requested((fingerprint, style)),
            Err(e) => self.state.ui.set_error(e.user_message()),
        }
    }

    pub fn save_settings(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("pendulum-cache.json")
            .save_file()
        {
            self.save_settings_to(path);
        }
    }

    fn save_settings_to(&mut self, path: PathBuf) {
        match self.state.current_settings().save(&path) {
            Ok(()) => {
                info!(path = %path.display(), "settings saved");
                self.state.ui.set_info(format!("Saved {}", path.display()));
            }
            Err(e) => self.state.ui.set_error(format!("Failed to save config: {}", e.user_message())),
        }
    }

    pub fn load_settings(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            match Settings::load(&path) {
                Ok(settings) => {
                    self.state.apply_settings(settings);
                    self.state
                        .ui
                        .set_info("View settings applied; cache settings take effect on restart");
                }
                Err(e) => self.state.ui.set_error(format!("Failed to load config: {}", e.user_message())),
            }
        }
    }
}

impl eframe::App for PendulumApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        profiling::finish_frame!();

        if self.state.view.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        ctx.input(|i| {
            if i.key_pressed(egui::Key::T) {
                self.state.view.dark_mode = !self.state.view.dark_mode;
            }
            if i.key_pressed(egui::Key::R) {
                self.state.view.reset_bounds = true;
            }
            if i.key_pressed(egui::Key::H) || i.key_pressed(egui::Key::F1) {
                self.state.view.show_help = !self.state.view.show_help;
            }
            if i.key_pressed(egui::Key::Escape) {
                self.state.view.show_help = false;
            }
        });
        let compute_key = ctx.input(|i| i.key_pressed(egui::Key::Enter));

        self.drain_results();

        let compute_clicked = crate::ui::render_sidebar(self, ctx);
        crate::ui::render_metrics(self, ctx);
        crate::ui::render_status_bar(self, ctx);
        crate::ui::render_plot(self, ctx);
        crate::ui::render_help_dialog(self, ctx);

        self.submit(compute_clicked || compute_key);
        self.request_portrait();
    }
}
