//! Charts module - Chart specification and rendering

mod plotter;
mod renderer;
mod spec;

pub use plotter::{ChartPlotter, PALETTE};
pub use renderer::{RenderError, StaticChartRenderer};
pub use spec::{ChartSpec, ChartSpecBuilder, Encoding, FieldType, Mark};
