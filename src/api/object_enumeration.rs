use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::api::PropertyValue;
use crate::interaction::SelectionId;

/// How a formatting property is read from the property bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    Number,
    Color,
    Text,
    /// Number or date bound on the x axis.
    AxisBound,
}

/// Formatting object shown as one card in the host's property pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectGroup {
    pub name: &'static str,
    pub display_name: &'static str,
}

impl ObjectGroup {
    #[must_use]
    pub const fn new(name: &'static str, display_name: &'static str) -> Self {
        Self { name, display_name }
    }
}

/// One row of a chart's property mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub group: &'static str,
    pub property: &'static str,
    pub kind: PropertyKind,
}

impl PropertyDescriptor {
    #[must_use]
    pub const fn new(group: &'static str, property: &'static str, kind: PropertyKind) -> Self {
        Self {
            group,
            property,
            kind,
        }
    }
}

/// Current values of one formatting object, returned to the property pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInstance {
    pub object_name: String,
    pub display_name: String,
    /// Data point the instance applies to; `None` for chart-wide settings.
    pub selector: Option<SelectionId>,
    pub properties: IndexMap<String, PropertyValue>,
}

impl ObjectInstance {
    #[must_use]
    pub fn new(object_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            display_name: display_name.into(),
            selector: None,
            properties: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_selector(mut self, selector: SelectionId) -> Self {
        self.selector = Some(selector);
        self
    }

    #[must_use]
    pub fn with_property(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.to_owned(), value.into());
        self
    }
}

/// Builds the chart-wide instance of `group` from a mapping table.
///
/// Properties appear in table order; `value_of` returning `None` omits one.
/// Returns `None` for groups that are not in `groups`.
pub fn enumerate_group(
    groups: &[ObjectGroup],
    table: &[PropertyDescriptor],
    group: &str,
    value_of: impl Fn(&PropertyDescriptor) -> Option<PropertyValue>,
) -> Option<ObjectInstance> {
    let object = groups.iter().find(|candidate| candidate.name == group)?;
    let instance = table
        .iter()
        .filter(|descriptor| descriptor.group == group)
        .filter_map(|descriptor| value_of(descriptor).map(|value| (descriptor.property, value)))
        .fold(
            ObjectInstance::new(object.name, object.display_name),
            |instance, (property, value)| instance.with_property(property, value),
        );
    Some(instance)
}
