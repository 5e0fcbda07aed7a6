use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::api::object_enumeration::enumerate_group;
use crate::api::{
    Fill, ObjectGroup, ObjectInstance, PropertyBag, PropertyDescriptor, PropertyKind,
    PropertyValue,
};
use crate::core::primitives::epoch_millis_to_datetime;
use crate::core::viewport::{DEFAULT_MAX_ZOOM_LEVEL, DEFAULT_MIN_ZOOM_SCALE};
use crate::core::{XKind, ZoomLimits};
use crate::error::{ChartError, ChartResult};

pub const INITIAL_ZOOM_GROUP: &str = "initialzoom";
pub const AREA_GROUP: &str = "areaproperties";
pub const AREA_AXIS_GROUP: &str = "axisproperties";
pub const FOOTER_GROUP: &str = "footertextproperties";

pub const AREA_ZOOM_GROUPS: &[ObjectGroup] = &[
    ObjectGroup::new(INITIAL_ZOOM_GROUP, "Initial Zoom"),
    ObjectGroup::new(AREA_GROUP, "Area"),
    ObjectGroup::new(AREA_AXIS_GROUP, "Axis"),
    ObjectGroup::new(FOOTER_GROUP, "Footer"),
];

pub const AREA_ZOOM_PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor::new(INITIAL_ZOOM_GROUP, "start", PropertyKind::AxisBound),
    PropertyDescriptor::new(INITIAL_ZOOM_GROUP, "end", PropertyKind::AxisBound),
    PropertyDescriptor::new(INITIAL_ZOOM_GROUP, "maxZoomLevel", PropertyKind::Number),
    PropertyDescriptor::new(AREA_GROUP, "fillColor", PropertyKind::Color),
    PropertyDescriptor::new(AREA_GROUP, "lineColor", PropertyKind::Color),
    PropertyDescriptor::new(AREA_AXIS_GROUP, "fontSize", PropertyKind::Number),
    PropertyDescriptor::new(AREA_AXIS_GROUP, "textColor", PropertyKind::Color),
    PropertyDescriptor::new(AREA_AXIS_GROUP, "xAxisLineColor", PropertyKind::Color),
    PropertyDescriptor::new(AREA_AXIS_GROUP, "yAxisLineColor", PropertyKind::Color),
    PropertyDescriptor::new(FOOTER_GROUP, "fontSize", PropertyKind::Number),
    PropertyDescriptor::new(FOOTER_GROUP, "textColor", PropertyKind::Color),
];

/// Formatting settings of the area zoom chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaZoomConfig {
    /// Initial visible start; the data minimum when unset.
    pub initial_zoom_start: Option<f64>,
    /// Initial visible end; the data maximum when unset.
    pub initial_zoom_end: Option<f64>,
    pub max_zoom_level: f64,
    pub fill_color: String,
    pub line_color: String,
    pub axis_font_size: f64,
    pub axis_text_color: String,
    pub x_axis_line_color: String,
    pub y_axis_line_color: String,
    pub footer_font_size: f64,
    pub footer_text_color: String,
}

impl Default for AreaZoomConfig {
    fn default() -> Self {
        Self {
            initial_zoom_start: None,
            initial_zoom_end: None,
            max_zoom_level: DEFAULT_MAX_ZOOM_LEVEL,
            fill_color: "steelblue".to_owned(),
            line_color: "#315a7d".to_owned(),
            axis_font_size: 10.0,
            axis_text_color: "#777".to_owned(),
            x_axis_line_color: "#CCC".to_owned(),
            y_axis_line_color: "#CCC".to_owned(),
            footer_font_size: 12.0,
            footer_text_color: "#333".to_owned(),
        }
    }
}

impl AreaZoomConfig {
    /// Reads every mapped property, falling back to defaults.
    ///
    /// Fails only when the zoom limit cannot form a valid scale extent.
    pub fn from_properties(bag: &PropertyBag) -> ChartResult<Self> {
        let defaults = Self::default();
        let max_zoom_level = bag.positive_number_or(
            INITIAL_ZOOM_GROUP,
            "maxZoomLevel",
            defaults.max_zoom_level,
        );
        if max_zoom_level < DEFAULT_MIN_ZOOM_SCALE {
            return Err(ChartError::InvalidProperty {
                group: INITIAL_ZOOM_GROUP.to_owned(),
                property: "maxZoomLevel".to_owned(),
                reason: format!("must be >= {DEFAULT_MIN_ZOOM_SCALE}"),
            });
        }

        Ok(Self {
            initial_zoom_start: bag.axis_bound(INITIAL_ZOOM_GROUP, "start"),
            initial_zoom_end: bag.axis_bound(INITIAL_ZOOM_GROUP, "end"),
            max_zoom_level,
            fill_color: bag.color_or(AREA_GROUP, "fillColor", &defaults.fill_color),
            line_color: bag.color_or(AREA_GROUP, "lineColor", &defaults.line_color),
            axis_font_size: bag.positive_number_or(
                AREA_AXIS_GROUP,
                "fontSize",
                defaults.axis_font_size,
            ),
            axis_text_color: bag.color_or(AREA_AXIS_GROUP, "textColor", &defaults.axis_text_color),
            x_axis_line_color: bag.color_or(
                AREA_AXIS_GROUP,
                "xAxisLineColor",
                &defaults.x_axis_line_color,
            ),
            y_axis_line_color: bag.color_or(
                AREA_AXIS_GROUP,
                "yAxisLineColor",
                &defaults.y_axis_line_color,
            ),
            footer_font_size: bag.positive_number_or(
                FOOTER_GROUP,
                "fontSize",
                defaults.footer_font_size,
            ),
            footer_text_color: bag.color_or(FOOTER_GROUP, "textColor", &defaults.footer_text_color),
        })
    }

    #[must_use]
    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits::with_max_zoom_level(self.max_zoom_level)
    }

    /// Visible domain to start from, given the data extent.
    #[must_use]
    pub fn initial_domain(&self, data_min: f64, data_max: f64) -> (f64, f64) {
        (
            self.initial_zoom_start.unwrap_or(data_min),
            self.initial_zoom_end.unwrap_or(data_max),
        )
    }

    /// Property-pane instances for `group`.
    ///
    /// `data_extent` supplies the shown initial zoom bounds when none are set.
    #[must_use]
    pub fn object_instances(
        &self,
        group: &str,
        data_extent: Option<(f64, f64)>,
        x_kind: XKind,
    ) -> Vec<ObjectInstance> {
        enumerate_group(AREA_ZOOM_GROUPS, AREA_ZOOM_PROPERTIES, group, |descriptor| {
            self.property_value(descriptor, data_extent, x_kind)
        })
        .into_iter()
        .collect()
    }

    fn property_value(
        &self,
        descriptor: &PropertyDescriptor,
        data_extent: Option<(f64, f64)>,
        x_kind: XKind,
    ) -> Option<PropertyValue> {
        let value = match (descriptor.group, descriptor.property) {
            (INITIAL_ZOOM_GROUP, "start") => {
                let bound = self
                    .initial_zoom_start
                    .or(data_extent.map(|(min, _)| min))?;
                return Some(axis_bound_value(bound, x_kind));
            }
            (INITIAL_ZOOM_GROUP, "end") => {
                let bound = self.initial_zoom_end.or(data_extent.map(|(_, max)| max))?;
                return Some(axis_bound_value(bound, x_kind));
            }
            (INITIAL_ZOOM_GROUP, "maxZoomLevel") => {
                return Some(PropertyValue::Number(self.max_zoom_level));
            }
            (AREA_GROUP, "fillColor") => &self.fill_color,
            (AREA_GROUP, "lineColor") => &self.line_color,
            (AREA_AXIS_GROUP, "fontSize") => {
                return Some(PropertyValue::Number(self.axis_font_size));
            }
            (AREA_AXIS_GROUP, "textColor") => &self.axis_text_color,
            (AREA_AXIS_GROUP, "xAxisLineColor") => &self.x_axis_line_color,
            (AREA_AXIS_GROUP, "yAxisLineColor") => &self.y_axis_line_color,
            (FOOTER_GROUP, "fontSize") => {
                return Some(PropertyValue::Number(self.footer_font_size));
            }
            (FOOTER_GROUP, "textColor") => &self.footer_text_color,
            _ => return None,
        };
        Some(PropertyValue::Fill(Fill::solid(value.clone())))
    }
}

fn axis_bound_value(bound: f64, x_kind: XKind) -> PropertyValue {
    match (x_kind, epoch_millis_to_datetime(bound)) {
        (XKind::Temporal, Some(time)) => {
            PropertyValue::Text(time.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        _ => PropertyValue::Number(bound),
    }
}
