use chart_visuals::core::{CategorySegment, SeriesRow, SortDirection, layout};
use proptest::prelude::*;

fn row(values: &[(f64, f64)]) -> SeriesRow {
    let segments = values
        .iter()
        .enumerate()
        .map(|(i, (value, key))| CategorySegment::new(format!("c{i}"), i, *value, *key, "#000"))
        .collect();
    SeriesRow::new("row", segments)
}

proptest! {
    #[test]
    fn boxes_are_contiguous_and_span_full_percentage_property(
        values in proptest::collection::vec((0.5f64..1_000.0, -10.0f64..10.0), 1..12),
        descending in any::<bool>()
    ) {
        let direction = if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        let laid_out = layout(&[row(&values)], direction);
        let boxes = &laid_out[0].boxes;
        prop_assert_eq!(boxes.len(), values.len());

        for pair in boxes.windows(2) {
            prop_assert!((pair[0].x1 - pair[1].x0).abs() <= 1e-9);
        }
        for laid in boxes {
            prop_assert!((laid.span() - laid.percentage).abs() <= 1e-9);
        }
        let total = boxes[boxes.len() - 1].x1 - boxes[0].x0;
        prop_assert!((total - 100.0).abs() <= 1e-6);
    }

    #[test]
    fn segments_are_sorted_by_key_property(
        values in proptest::collection::vec((0.5f64..1_000.0, -10.0f64..10.0), 1..12)
    ) {
        let laid_out = layout(&[row(&values)], SortDirection::Descending);
        for pair in laid_out[0].segments.windows(2) {
            prop_assert!(pair[0].sort_key <= pair[1].sort_key);
        }

        let laid_out = layout(&[row(&values)], SortDirection::Ascending);
        for pair in laid_out[0].segments.windows(2) {
            prop_assert!(pair[0].sort_key >= pair[1].sort_key);
        }
    }

    #[test]
    fn middle_of_first_half_straddles_zero_property(
        values in proptest::collection::vec(0.5f64..1_000.0, 1..12)
    ) {
        let keyed: Vec<(f64, f64)> = values.iter().map(|value| (*value, 0.0)).collect();
        let laid_out = layout(&[row(&keyed)], SortDirection::Ascending);
        let boxes = &laid_out[0].boxes;

        let pivot = &boxes[boxes.len().div_ceil(2) - 1];
        let centre = (pivot.x0 + pivot.x1) / 2.0;
        prop_assert!(centre.abs() <= 1e-9);
    }
}
