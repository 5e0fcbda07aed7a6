use serde::{Deserialize, Serialize};

use crate::core::scale::{DEFAULT_TICK_COUNT, nice_domain};

/// Segments narrower than this many percentage points get no value label.
pub const MIN_LABELED_SPAN: f64 = 3.0;

/// Segment order within a diverging row.
///
/// The names follow the persisted host setting: `Ascending` orders segments by
/// *descending* sort key and `Descending` by ascending key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub const ASCENDING_LABEL: &'static str = "Ascending";
    pub const DESCENDING_LABEL: &'static str = "Descending";

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            Self::ASCENDING_LABEL => Some(Self::Ascending),
            Self::DESCENDING_LABEL => Some(Self::Descending),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ascending => Self::ASCENDING_LABEL,
            Self::Descending => Self::DESCENDING_LABEL,
        }
    }
}

/// One category value inside a series row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySegment {
    pub category_value: String,
    /// Position of the category in the host's category column.
    pub category_index: usize,
    pub value: f64,
    pub percentage: f64,
    pub sort_key: f64,
    pub color: String,
}

impl CategorySegment {
    #[must_use]
    pub fn new(
        category_value: impl Into<String>,
        category_index: usize,
        value: f64,
        sort_key: f64,
        color: impl Into<String>,
    ) -> Self {
        Self {
            category_value: category_value.into(),
            category_index,
            value,
            percentage: 0.0,
            sort_key,
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub series_value: String,
    pub segments: Vec<CategorySegment>,
}

impl SeriesRow {
    #[must_use]
    pub fn new(series_value: impl Into<String>, segments: Vec<CategorySegment>) -> Self {
        Self {
            series_value: series_value.into(),
            segments,
        }
    }
}

/// Horizontal extent of one segment, in signed percentage units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergingBox {
    pub category_value: String,
    pub category_index: usize,
    pub x0: f64,
    pub x1: f64,
    /// Raw segment value.
    pub n: f64,
    pub percentage: f64,
    pub color: String,
}

impl DivergingBox {
    #[must_use]
    pub fn span(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Whether the raw value should be printed on the segment.
    #[must_use]
    pub fn shows_label(&self) -> bool {
        self.n != 0.0 && self.span() > MIN_LABELED_SPAN
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaidOutRow {
    pub series_value: String,
    /// Segments after sorting, with percentages filled in.
    pub segments: Vec<CategorySegment>,
    pub boxes: Vec<DivergingBox>,
}

/// Fills `percentage = 100 * value / sum` for every segment.
///
/// A row whose sum is zero or not finite gets zero percentages.
pub fn assign_percentages(segments: &mut [CategorySegment]) {
    let sum: f64 = segments.iter().map(|segment| segment.value).sum();
    for segment in segments.iter_mut() {
        let percentage = segment.value * 100.0 / sum;
        segment.percentage = if sum != 0.0 && percentage.is_finite() {
            percentage
        } else {
            0.0
        };
    }
}

/// Stable sort by `sort_key` honouring the inverted direction naming.
pub fn sort_segments(segments: &mut [CategorySegment], direction: SortDirection) {
    match direction {
        SortDirection::Ascending => {
            segments.sort_by(|a, b| b.sort_key.total_cmp(&a.sort_key));
        }
        SortDirection::Descending => {
            segments.sort_by(|a, b| a.sort_key.total_cmp(&b.sort_key));
        }
    }
}

/// Offset of the first box so that the middle segment straddles zero.
///
/// `-(sum of the first ceil(n/2) percentages - half of the last of them)`.
#[must_use]
pub fn diverging_start(segments: &[CategorySegment]) -> f64 {
    let mid = segments.len().div_ceil(2);
    let first_half = &segments[..mid];
    let Some(last) = first_half.last() else {
        return 0.0;
    };
    let half_sum: f64 = first_half.iter().map(|segment| segment.percentage).sum();
    -(half_sum - 0.5 * last.percentage)
}

/// Contiguous boxes for already sorted segments.
#[must_use]
pub fn diverging_boxes(segments: &[CategorySegment]) -> Vec<DivergingBox> {
    let mut x0 = diverging_start(segments);
    segments
        .iter()
        .map(|segment| {
            let x1 = x0 + segment.percentage;
            let laid_out = DivergingBox {
                category_value: segment.category_value.clone(),
                category_index: segment.category_index,
                x0,
                x1,
                n: segment.value,
                percentage: segment.percentage,
                color: segment.color.clone(),
            };
            x0 = x1;
            laid_out
        })
        .collect()
}

/// Runs percentages, sorting and offset assignment for every row.
#[must_use]
pub fn layout(rows: &[SeriesRow], direction: SortDirection) -> Vec<LaidOutRow> {
    rows.iter()
        .map(|row| {
            let mut segments = row.segments.clone();
            assign_percentages(&mut segments);
            sort_segments(&mut segments, direction);
            let boxes = diverging_boxes(&segments);
            LaidOutRow {
                series_value: row.series_value.clone(),
                segments,
                boxes,
            }
        })
        .collect()
}

/// Raw `[min first x0, max last x1]` over rows that have boxes.
#[must_use]
pub fn layout_extent(rows: &[LaidOutRow]) -> Option<(f64, f64)> {
    let mut extent: Option<(f64, f64)> = None;
    for row in rows {
        let (Some(first), Some(last)) = (row.boxes.first(), row.boxes.last()) else {
            continue;
        };
        extent = Some(match extent {
            Some((min, max)) => (min.min(first.x0), max.max(last.x1)),
            None => (first.x0, last.x1),
        });
    }
    extent
}

/// Shared x-domain of all rows, niced to round tick values.
#[must_use]
pub fn shared_domain(rows: &[LaidOutRow]) -> Option<(f64, f64)> {
    layout_extent(rows).map(|(min, max)| nice_domain(min, max, DEFAULT_TICK_COUNT))
}

#[cfg(test)]
mod tests {
    use super::{
        CategorySegment, SortDirection, assign_percentages, diverging_start, sort_segments,
    };

    fn segment(name: &str, value: f64, sort_key: f64) -> CategorySegment {
        CategorySegment::new(name, 0, value, sort_key, "#000")
    }

    #[test]
    fn sort_direction_labels_round_trip() {
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            assert_eq!(SortDirection::from_label(direction.label()), Some(direction));
        }
        assert_eq!(SortDirection::from_label("sideways"), None);
    }

    #[test]
    fn ascending_sorts_keys_high_to_low() {
        let mut segments = vec![
            segment("a", 1.0, 1.0),
            segment("b", 1.0, 3.0),
            segment("c", 1.0, 2.0),
        ];
        sort_segments(&mut segments, SortDirection::Ascending);
        let keys: Vec<f64> = segments.iter().map(|s| s.sort_key).collect();
        assert_eq!(keys, vec![3.0, 2.0, 1.0]);

        sort_segments(&mut segments, SortDirection::Descending);
        let keys: Vec<f64> = segments.iter().map(|s| s.sort_key).collect();
        assert_eq!(keys, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut segments = vec![segment("a", 1.0, 0.0), segment("b", 1.0, 0.0)];
        sort_segments(&mut segments, SortDirection::Ascending);
        assert_eq!(segments[0].category_value, "a");
        assert_eq!(segments[1].category_value, "b");
    }

    #[test]
    fn cancelling_values_get_zero_percentages() {
        let mut segments = vec![segment("a", 5.0, 0.0), segment("b", -5.0, 0.0)];
        assign_percentages(&mut segments);
        assert!(segments.iter().all(|s| s.percentage == 0.0));
    }

    #[test]
    fn empty_row_starts_at_zero() {
        assert_eq!(diverging_start(&[]), 0.0);
    }
}
