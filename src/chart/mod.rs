mod color;
mod detail;
mod error;
mod geometry;
mod machine;
mod physics;
mod radius;
mod snapshot;
mod tooltip;
mod view_state;

pub use detail::{DetailView, TrendPoint};
pub use geometry::ChartGeometry;
pub use machine::{BubbleChart, Transition};
pub use physics::SimulationConfig;
pub use snapshot::ChartSnapshot;
pub use view_state::{ColorScheme, LayoutMode, ScaleVariable, ViewCommand};
