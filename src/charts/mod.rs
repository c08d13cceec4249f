//! Charts module - chart selection, figure building and rendering

mod builder;
pub mod figure;
mod plotter;
mod renderer;
mod selection;

pub use builder::{ChartError, FigureBuilder};
pub use figure::Figure;
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
pub use selection::ChartKind;
