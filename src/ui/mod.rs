mod help_dialog;
mod metrics;
mod plot;
mod sidebar;

pub use help_dialog::render_help_dialog;
pub use metrics::{render_metrics, render_status_bar};
pub use plot::render_plot;
pub use sidebar::render_sidebar;
