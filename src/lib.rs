//! chart-visuals: interactive chart cores for hosted BI visuals.
//!
//! Two widgets share one engine layout: an area chart with wheel/drag zoom
//! and a debounced hover tracker, and a diverging stacked bar chart with
//! click selection. Pure geometry lives in `core`, host-facing widgets in
//! `api`, and drawing goes through the backend-agnostic `render` frame.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{AreaZoomChart, DivergingBarChart, QueuedSelectionManager, SelectionManager};
pub use error::{ChartError, ChartResult};
