use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::object_enumeration::enumerate_group;
use crate::api::{
    CategoryInfo, Fill, ObjectGroup, ObjectInstance, PropertyBag, PropertyDescriptor,
    PropertyKind, PropertyValue,
};
use crate::core::SortDirection;

pub const DIVERGING_AXIS_GROUP: &str = "axisproperties";
pub const LEGEND_GROUP: &str = "legendproperties";
pub const BAR_GROUP: &str = "barproperties";
pub const VALUE_SORT_GROUP: &str = "valuesortproperties";
pub const SECOND_Y_AXIS_GROUP: &str = "secondyaxisproperties";

const SORT_ORDER_PROPERTY: &str = "valueSortOrderDefault";

pub const DIVERGING_BAR_GROUPS: &[ObjectGroup] = &[
    ObjectGroup::new(DIVERGING_AXIS_GROUP, "Axis Properties"),
    ObjectGroup::new(LEGEND_GROUP, "Legend Properties"),
    ObjectGroup::new(BAR_GROUP, "Bar Properties"),
    ObjectGroup::new(VALUE_SORT_GROUP, "Value Sort"),
    ObjectGroup::new(SECOND_Y_AXIS_GROUP, "2nd Y Axis"),
];

/// Chart-wide properties. Per-category fills live in `barproperties` under the
/// category name and are not listed here.
pub const DIVERGING_BAR_PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor::new(DIVERGING_AXIS_GROUP, "fontSize", PropertyKind::Number),
    PropertyDescriptor::new(DIVERGING_AXIS_GROUP, "textColor", PropertyKind::Color),
    PropertyDescriptor::new(DIVERGING_AXIS_GROUP, "lineColor", PropertyKind::Color),
    PropertyDescriptor::new(LEGEND_GROUP, "fontSize", PropertyKind::Number),
    PropertyDescriptor::new(LEGEND_GROUP, "textColor", PropertyKind::Color),
    PropertyDescriptor::new(BAR_GROUP, "fontSize", PropertyKind::Number),
    PropertyDescriptor::new(BAR_GROUP, "textColor", PropertyKind::Color),
    PropertyDescriptor::new(VALUE_SORT_GROUP, SORT_ORDER_PROPERTY, PropertyKind::Text),
    PropertyDescriptor::new(SECOND_Y_AXIS_GROUP, "lineColor", PropertyKind::Color),
];

/// Fallback category colors, cycled by category index.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#01B8AA", "#374649", "#FD625E", "#F2C80F", "#5F6B6D", "#8AD4EB", "#FE9666", "#A66999",
];

/// Formatting settings of the diverging stacked bar chart. Font sizes are in
/// points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DivergingBarConfig {
    pub axis_font_size: f64,
    pub axis_text_color: String,
    pub axis_line_color: String,
    pub second_y_axis_line_color: String,
    pub bar_font_size: f64,
    pub bar_text_color: String,
    pub legend_font_size: f64,
    pub legend_text_color: String,
    pub sort_direction: SortDirection,
    /// Category name to fill color overrides, read from `barproperties`
    /// entries that are not chart-wide properties. A category literally named
    /// `fontSize` or `textColor` therefore cannot carry an override and falls
    /// back to the palette.
    pub category_fills: IndexMap<String, String>,
    pub palette: Vec<String>,
}

impl Default for DivergingBarConfig {
    fn default() -> Self {
        Self {
            axis_font_size: 9.0,
            axis_text_color: "#CCC".to_owned(),
            axis_line_color: "#CCC".to_owned(),
            second_y_axis_line_color: "rgb(135, 144, 146)".to_owned(),
            bar_font_size: 14.0,
            bar_text_color: "#FFF".to_owned(),
            legend_font_size: 9.0,
            legend_text_color: "rgb(69, 106, 118)".to_owned(),
            sort_direction: SortDirection::default(),
            category_fills: IndexMap::new(),
            palette: DEFAULT_PALETTE.iter().map(|color| (*color).to_owned()).collect(),
        }
    }
}

impl DivergingBarConfig {
    #[must_use]
    pub fn from_properties(bag: &PropertyBag) -> Self {
        let defaults = Self::default();

        let sort_label = bag.text_or(
            VALUE_SORT_GROUP,
            SORT_ORDER_PROPERTY,
            defaults.sort_direction.label(),
        );
        let sort_direction = SortDirection::from_label(&sort_label).unwrap_or_else(|| {
            warn!(label = %sort_label, "unknown sort order, using default");
            defaults.sort_direction
        });

        let category_fills = bag
            .group(BAR_GROUP)
            .filter(|(name, _)| !is_mapped(BAR_GROUP, name))
            .filter_map(|(name, _)| {
                let color = bag.color_or(BAR_GROUP, name, "");
                (!color.is_empty()).then(|| (name.to_owned(), color))
            })
            .collect();

        Self {
            axis_font_size: bag.positive_number_or(
                DIVERGING_AXIS_GROUP,
                "fontSize",
                defaults.axis_font_size,
            ),
            axis_text_color: bag.color_or(
                DIVERGING_AXIS_GROUP,
                "textColor",
                &defaults.axis_text_color,
            ),
            axis_line_color: bag.color_or(
                DIVERGING_AXIS_GROUP,
                "lineColor",
                &defaults.axis_line_color,
            ),
            second_y_axis_line_color: bag.color_or(
                SECOND_Y_AXIS_GROUP,
                "lineColor",
                &defaults.second_y_axis_line_color,
            ),
            bar_font_size: bag.positive_number_or(BAR_GROUP, "fontSize", defaults.bar_font_size),
            bar_text_color: bag.color_or(BAR_GROUP, "textColor", &defaults.bar_text_color),
            legend_font_size: bag.positive_number_or(
                LEGEND_GROUP,
                "fontSize",
                defaults.legend_font_size,
            ),
            legend_text_color: bag.color_or(
                LEGEND_GROUP,
                "textColor",
                &defaults.legend_text_color,
            ),
            sort_direction,
            category_fills,
            palette: defaults.palette,
        }
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Vec<String>) -> Self {
        self.palette = palette;
        self
    }

    /// Fill of a category: the override if set, else the palette entry.
    #[must_use]
    pub fn fill_for(&self, category: &str, index: usize) -> String {
        if let Some(color) = self.category_fills.get(category) {
            return color.clone();
        }
        if self.palette.is_empty() {
            return DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()].to_owned();
        }
        self.palette[index % self.palette.len()].clone()
    }

    /// Property-pane instances for `group`. `barproperties` is followed by one
    /// fill instance per category.
    #[must_use]
    pub fn object_instances(&self, group: &str, categories: &[CategoryInfo]) -> Vec<ObjectInstance> {
        let mut instances: Vec<ObjectInstance> =
            enumerate_group(DIVERGING_BAR_GROUPS, DIVERGING_BAR_PROPERTIES, group, |descriptor| {
                self.property_value(descriptor)
            })
            .into_iter()
            .collect();

        if group == BAR_GROUP {
            instances.extend(categories.iter().map(|category| {
                ObjectInstance::new(BAR_GROUP, category.name.clone())
                    .with_selector(category.identity.clone())
                    .with_property(&category.name, Fill::solid(category.color.clone()))
            }));
        }
        instances
    }

    fn property_value(&self, descriptor: &PropertyDescriptor) -> Option<PropertyValue> {
        let value = match (descriptor.group, descriptor.property) {
            (DIVERGING_AXIS_GROUP, "fontSize") => PropertyValue::Number(self.axis_font_size),
            (DIVERGING_AXIS_GROUP, "textColor") => self.axis_text_color.as_str().into(),
            (DIVERGING_AXIS_GROUP, "lineColor") => self.axis_line_color.as_str().into(),
            (LEGEND_GROUP, "fontSize") => PropertyValue::Number(self.legend_font_size),
            (LEGEND_GROUP, "textColor") => self.legend_text_color.as_str().into(),
            (BAR_GROUP, "fontSize") => PropertyValue::Number(self.bar_font_size),
            (BAR_GROUP, "textColor") => self.bar_text_color.as_str().into(),
            (VALUE_SORT_GROUP, SORT_ORDER_PROPERTY) => self.sort_direction.label().into(),
            (SECOND_Y_AXIS_GROUP, "lineColor") => self.second_y_axis_line_color.as_str().into(),
            _ => return None,
        };
        Some(match (descriptor.kind, value) {
            (PropertyKind::Color, PropertyValue::Text(color)) => Fill::solid(color).into(),
            (_, value) => value,
        })
    }
}

fn is_mapped(group: &str, property: &str) -> bool {
    DIVERGING_BAR_PROPERTIES
        .iter()
        .any(|descriptor| descriptor.group == group && descriptor.property == property)
}
