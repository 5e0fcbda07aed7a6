use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_epoch_millis, decimal_to_f64};
use crate::error::ChartResult;

/// Plot areas narrower or shorter than this are not rendered.
pub const MIN_PLOT_EXTENT: f64 = 20.0;

/// Host viewport size in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Returns the drawable plot rectangle left after subtracting `margins`.
    #[must_use]
    pub fn plot_area(self, margins: Margins) -> PlotArea {
        PlotArea {
            left: margins.left,
            top: margins.top,
            width: f64::from(self.width) - margins.left - margins.right,
            height: f64::from(self.height) - margins.top - margins.bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Inner drawing rectangle, offset from the viewport origin by `left`/`top`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    /// Whether the area is large enough to lay out anything at all.
    #[must_use]
    pub fn is_renderable(self) -> bool {
        self.width >= MIN_PLOT_EXTENT && self.height >= MIN_PLOT_EXTENT
    }
}

/// Interpretation of sample x values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum XKind {
    #[default]
    Numeric,
    /// Milliseconds since the Unix epoch (UTC).
    Temporal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn from_time(time: DateTime<Utc>, y: f64) -> Self {
        Self {
            x: datetime_to_epoch_millis(time),
            y,
        }
    }

    pub fn from_decimal_time(time: DateTime<Utc>, value: Decimal) -> ChartResult<Self> {
        Ok(Self {
            x: datetime_to_epoch_millis(time),
            y: decimal_to_f64(value, "value")?,
        })
    }
}
