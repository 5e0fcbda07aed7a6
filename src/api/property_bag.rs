use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::primitives::datetime_to_epoch_millis;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// `{ "color": "#rrggbb" }` payload of a solid fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidColor {
    pub color: String,
}

/// Host fill value, serialized as `{ "solid": { "color": ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub solid: SolidColor,
}

impl Fill {
    #[must_use]
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            solid: SolidColor {
                color: color.into(),
            },
        }
    }
}

/// One persisted formatting property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Fill(Fill),
}

impl PropertyValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Fill(_) => "fill",
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Fill> for PropertyValue {
    fn from(value: Fill) -> Self {
        Self::Fill(value)
    }
}

/// Host-persisted formatting objects: group name to property name to value.
///
/// Lookups never fail. A missing property yields the caller's default and a
/// property of the wrong type is logged and also yields the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag {
    groups: IndexMap<String, IndexMap<String, PropertyValue>>,
}

impl PropertyBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the host's JSON objects payload.
    pub fn from_json(json: &str) -> ChartResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| ChartError::InvalidData(format!("malformed property bag: {err}")))
    }

    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self)
            .map_err(|err| ChartError::InvalidData(format!("cannot serialize property bag: {err}")))
    }

    #[must_use]
    pub fn with(
        mut self,
        group: &str,
        property: &str,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.set(group, property, value);
        self
    }

    pub fn set(&mut self, group: &str, property: &str, value: impl Into<PropertyValue>) {
        self.groups
            .entry(group.to_owned())
            .or_default()
            .insert(property.to_owned(), value.into());
    }

    #[must_use]
    pub fn get(&self, group: &str, property: &str) -> Option<&PropertyValue> {
        self.groups.get(group)?.get(property)
    }

    /// Properties of `group` in insertion order.
    pub fn group(&self, group: &str) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.groups
            .get(group)
            .into_iter()
            .flat_map(|properties| properties.iter())
            .map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Finite number; numeric text such as `"10"` is accepted too.
    #[must_use]
    pub fn number_or(&self, group: &str, property: &str, default: f64) -> f64 {
        match self.get(group, property) {
            None => default,
            Some(PropertyValue::Number(value)) if value.is_finite() => *value,
            Some(PropertyValue::Text(text)) => match text.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => value,
                _ => mismatch(group, property, "number", "text", default),
            },
            Some(other) => mismatch(group, property, "number", other.kind(), default),
        }
    }

    /// Positive finite number, used for font sizes and zoom levels.
    #[must_use]
    pub fn positive_number_or(&self, group: &str, property: &str, default: f64) -> f64 {
        let value = self.number_or(group, property, default);
        if value > 0.0 {
            value
        } else {
            warn!(group, property, value, "property must be > 0, using default");
            default
        }
    }

    #[must_use]
    pub fn text_or(&self, group: &str, property: &str, default: &str) -> String {
        match self.get(group, property) {
            None => default.to_owned(),
            Some(PropertyValue::Text(text)) => text.clone(),
            Some(other) => mismatch(group, property, "text", other.kind(), default.to_owned()),
        }
    }

    #[must_use]
    pub fn bool_or(&self, group: &str, property: &str, default: bool) -> bool {
        match self.get(group, property) {
            None => default,
            Some(PropertyValue::Bool(value)) => *value,
            Some(other) => mismatch(group, property, "bool", other.kind(), default),
        }
    }

    /// CSS color from a solid fill or plain text. Unparseable colors fall back.
    #[must_use]
    pub fn color_or(&self, group: &str, property: &str, default: &str) -> String {
        let candidate = match self.get(group, property) {
            None => return default.to_owned(),
            Some(PropertyValue::Fill(fill)) => fill.solid.color.clone(),
            Some(PropertyValue::Text(text)) => text.clone(),
            Some(other) => {
                return mismatch(group, property, "color", other.kind(), default.to_owned());
            }
        };
        match Color::parse_css(&candidate) {
            Ok(_) => candidate,
            Err(err) => {
                warn!(group, property, error = %err, "unparseable color, using default");
                default.to_owned()
            }
        }
    }

    /// Optional x-axis bound: a number, or an RFC 3339 / `YYYY-MM-DD` date
    /// converted to epoch milliseconds.
    #[must_use]
    pub fn axis_bound(&self, group: &str, property: &str) -> Option<f64> {
        match self.get(group, property)? {
            PropertyValue::Number(value) if value.is_finite() => Some(*value),
            PropertyValue::Text(text) => {
                let parsed = parse_date_millis(text.trim());
                if parsed.is_none() {
                    warn!(group, property, text = %text, "unparseable axis bound, ignoring");
                }
                parsed
            }
            other => mismatch(group, property, "number or date", other.kind(), None),
        }
    }
}

fn mismatch<T>(group: &str, property: &str, expected: &str, found: &str, default: T) -> T {
    warn!(group, property, expected, found, "property has wrong type, using default");
    default
}

fn parse_date_millis(text: &str) -> Option<f64> {
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime_to_epoch_millis(time.to_utc()));
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(datetime_to_epoch_millis(midnight.and_utc()))
}
