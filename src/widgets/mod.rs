//! Reusable UI widgets

mod parameter_controls;
mod style_controls;

pub use parameter_controls::ParameterControls;
pub use style_controls::StyleControls;
