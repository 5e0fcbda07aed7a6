//! Host-facing chart widgets and the collaborator types they exchange with
//! the host: data views, property bags, object enumeration and selection.

mod area_zoom_chart;
mod area_zoom_config;
pub mod area_zoom_frame_builder;
mod data_view;
mod diverging_bar_chart;
mod diverging_bar_config;
pub mod diverging_frame_builder;
mod host;
mod object_enumeration;
mod property_bag;

pub use area_zoom_chart::{AREA_ZOOM_MARGINS, AreaZoomChart};
pub use area_zoom_config::{
    AREA_AXIS_GROUP, AREA_GROUP, AREA_ZOOM_GROUPS, AREA_ZOOM_PROPERTIES, AreaZoomConfig,
    FOOTER_GROUP, INITIAL_ZOOM_GROUP,
};
pub use data_view::{
    AreaSeriesData, CategoryInfo, ColumnRole, DataColumn, DataView, DivergingData, HostValue,
    area_series, diverging_rows,
};
pub use diverging_bar_chart::{DIVERGING_MARGINS, DivergingBarChart};
pub use diverging_bar_config::{
    BAR_GROUP, DEFAULT_PALETTE, DIVERGING_AXIS_GROUP, DIVERGING_BAR_GROUPS,
    DIVERGING_BAR_PROPERTIES, DivergingBarConfig, LEGEND_GROUP, SECOND_Y_AXIS_GROUP,
    VALUE_SORT_GROUP,
};
pub use host::{QueuedSelectionManager, SelectionManager};
pub use object_enumeration::{
    ObjectGroup, ObjectInstance, PropertyDescriptor, PropertyKind, enumerate_group,
};
pub use property_bag::{Fill, PropertyBag, PropertyValue, SolidColor};
