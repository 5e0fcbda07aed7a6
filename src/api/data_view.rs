use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::api::PropertyBag;
use crate::core::primitives::{datetime_to_epoch_millis, decimal_to_f64};
use crate::core::viewport::format_number;
use crate::core::{CategorySegment, Sample, SeriesRow, XKind};
use crate::error::{ChartError, ChartResult};
use crate::interaction::SelectionId;

/// Cell value delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostValue {
    Number(f64),
    Decimal(Decimal),
    Date(DateTime<Utc>),
    Text(String),
    Null,
}

impl HostValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Numeric view of the cell; dates become epoch milliseconds.
    ///
    /// `Ok(None)` for nulls and non-numeric text.
    pub fn to_f64(&self, field_name: &str) -> ChartResult<Option<f64>> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Decimal(value) => decimal_to_f64(*value, field_name)?,
            Self::Date(time) => datetime_to_epoch_millis(*time),
            Self::Text(text) => match text.trim().parse::<f64>() {
                Ok(value) => value,
                Err(_) => return Ok(None),
            },
            Self::Null => return Ok(None),
        };
        if !value.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "{field_name} must be finite"
            )));
        }
        Ok(Some(value))
    }

    /// Text used for category, series and legend labels.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Number(value) => format_number(*value),
            Self::Decimal(value) => value.normalize().to_string(),
            Self::Date(time) => time.format("%Y-%m-%d").to_string(),
            Self::Text(text) => text.clone(),
            Self::Null => String::new(),
        }
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<DateTime<Utc>> for HostValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<Decimal> for HostValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

/// Data role a column is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    Category,
    Value,
    Series,
    SortBy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataColumn {
    pub name: String,
    pub role: ColumnRole,
    pub values: Vec<HostValue>,
}

impl DataColumn {
    #[must_use]
    pub fn new(name: impl Into<String>, role: ColumnRole, values: Vec<HostValue>) -> Self {
        Self {
            name: name.into(),
            role,
            values,
        }
    }
}

/// Tabular snapshot delivered on every host update.
///
/// All columns have one cell per row. `objects` carries the persisted
/// formatting properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataView {
    pub columns: Vec<DataColumn>,
    #[serde(default)]
    pub objects: PropertyBag,
}

impl DataView {
    #[must_use]
    pub fn new(columns: Vec<DataColumn>) -> Self {
        Self {
            columns,
            objects: PropertyBag::default(),
        }
    }

    #[must_use]
    pub fn with_objects(mut self, objects: PropertyBag) -> Self {
        self.objects = objects;
        self
    }

    pub fn from_json(json: &str) -> ChartResult<Self> {
        let view: Self = serde_json::from_str(json)
            .map_err(|err| ChartError::InvalidData(format!("malformed data view: {err}")))?;
        view.validate()?;
        Ok(view)
    }

    /// Columns bound to `role`, in column order.
    pub fn columns_with_role(&self, role: ColumnRole) -> impl Iterator<Item = &DataColumn> {
        self.columns.iter().filter(move |column| column.role == role)
    }

    #[must_use]
    pub fn column(&self, role: ColumnRole) -> Option<&DataColumn> {
        self.columns_with_role(role).next()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |column| column.values.len())
    }

    pub fn validate(&self) -> ChartResult<()> {
        let rows = self.row_count();
        if let Some(column) = self
            .columns
            .iter()
            .find(|column| column.values.len() != rows)
        {
            return Err(ChartError::InvalidData(format!(
                "column `{}` has {} values, expected {rows}",
                column.name,
                column.values.len()
            )));
        }
        Ok(())
    }
}

/// Area chart input extracted from a data view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSeriesData {
    /// Samples sorted ascending by x.
    pub samples: Vec<Sample>,
    pub x_kind: XKind,
}

/// Builds the `(x, y)` series for the area chart.
///
/// x comes from the first category column. y comes from the first value
/// column, or from a second category column when no value column is bound.
/// Rows with a null or non-numeric cell are skipped.
pub fn area_series(view: &DataView) -> ChartResult<AreaSeriesData> {
    view.validate()?;
    let mut categories = view.columns_with_role(ColumnRole::Category);
    let x_column = categories
        .next()
        .ok_or_else(|| ChartError::InvalidData("area chart needs an x column".to_owned()))?;
    let y_column = view
        .column(ColumnRole::Value)
        .or_else(|| categories.next())
        .ok_or_else(|| ChartError::InvalidData("area chart needs a y column".to_owned()))?;

    let dates = x_column.values.iter().filter(|value| value.is_date()).count();
    let present = x_column.values.iter().filter(|value| !value.is_null()).count();
    let x_kind = if dates == 0 {
        XKind::Numeric
    } else if dates == present {
        XKind::Temporal
    } else {
        return Err(ChartError::InvalidData(format!(
            "column `{}` mixes dates and other values",
            x_column.name
        )));
    };

    let mut samples = Vec::with_capacity(x_column.values.len());
    let mut skipped = 0_usize;
    for (x_cell, y_cell) in x_column.values.iter().zip(&y_column.values) {
        match (x_cell.to_f64(&x_column.name)?, y_cell.to_f64(&y_column.name)?) {
            (Some(x), Some(y)) => samples.push(Sample::new(x, y)),
            _ => skipped += 1,
        }
    }
    samples.sort_by(|a, b| a.x.total_cmp(&b.x));

    if skipped > 0 {
        trace!(skipped, "skipped area rows with missing cells");
    }
    debug!(
        rows = view.row_count(),
        samples = samples.len(),
        ?x_kind,
        "converted area series"
    );
    Ok(AreaSeriesData { samples, x_kind })
}

/// One distinct category, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    pub identity: SelectionId,
    pub color: String,
}

/// Diverging chart input extracted from a data view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergingData {
    pub rows: Vec<SeriesRow>,
    /// Selection identity of each row, parallel to `rows`.
    pub row_identities: Vec<SelectionId>,
    pub categories: Vec<CategoryInfo>,
}

/// Groups the data view into one row per series value.
///
/// Requires a category and a value column. Without a series column every
/// cell lands in a single row named after the value column. Without a
/// sort-by column every sort key is zero. `fill_for` picks the color of a
/// category from its name and first-seen index.
pub fn diverging_rows(
    view: &DataView,
    fill_for: impl Fn(&str, usize) -> String,
) -> ChartResult<DivergingData> {
    view.validate()?;
    let category_column = view
        .column(ColumnRole::Category)
        .ok_or_else(|| ChartError::InvalidData("diverging chart needs a category".to_owned()))?;
    let value_column = view
        .column(ColumnRole::Value)
        .ok_or_else(|| ChartError::InvalidData("diverging chart needs a value".to_owned()))?;
    let series_column = view.column(ColumnRole::Series);
    let sort_column = view.column(ColumnRole::SortBy);

    let mut categories: IndexMap<String, CategoryInfo> = IndexMap::new();
    let mut series: IndexMap<String, Vec<CategorySegment>> = IndexMap::new();

    for row in 0..view.row_count() {
        let Some(value) = value_column.values[row].to_f64(&value_column.name)? else {
            trace!(row, "skipping row without a numeric value");
            continue;
        };
        let category_name = category_column.values[row].display();
        let series_name = series_column
            .map_or_else(|| value_column.name.clone(), |column| column.values[row].display());
        let sort_key = match sort_column {
            Some(column) => column.values[row].to_f64(&column.name)?.unwrap_or(0.0),
            None => 0.0,
        };

        let next_index = categories.len();
        let (category_index, category) = match categories.get_full(&category_name) {
            Some((index, _, info)) => (index, info.clone()),
            None => {
                let info = CategoryInfo {
                    name: category_name.clone(),
                    identity: SelectionId::new(format!("category:{category_name}")),
                    color: fill_for(&category_name, next_index),
                };
                categories.insert(category_name.clone(), info.clone());
                (next_index, info)
            }
        };

        series.entry(series_name).or_default().push(CategorySegment::new(
            category.name,
            category_index,
            value,
            sort_key,
            category.color,
        ));
    }

    let row_identities = series
        .keys()
        .map(|name| SelectionId::new(format!("series:{name}")))
        .collect();
    let rows: Vec<SeriesRow> = series
        .into_iter()
        .map(|(name, segments)| SeriesRow::new(name, segments))
        .collect();

    debug!(
        rows = rows.len(),
        categories = categories.len(),
        "converted diverging rows"
    );
    Ok(DivergingData {
        rows,
        row_identities,
        categories: categories.into_values().collect(),
    })
}
