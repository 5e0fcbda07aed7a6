pub mod area_series;
pub mod diverging;
pub mod locator;
pub mod primitives;
pub mod scale;
pub mod time_ticks;
pub mod types;
pub mod viewport;
pub mod windowing;

pub use area_series::{AreaGeometry, AreaVertex, project_area_geometry};
pub use diverging::{
    CategorySegment, DivergingBox, LaidOutRow, SeriesRow, SortDirection, layout, shared_domain,
};
pub use locator::{LinearProjector, LocateMode, Projector, locate};
pub use scale::{BandScale, LinearScale};
pub use types::{Margins, PlotArea, Sample, Viewport, XKind};
pub use viewport::{AxisTick, ViewportState, ZoomLimits, ZoomTransform};
