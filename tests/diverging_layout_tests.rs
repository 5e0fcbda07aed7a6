use approx::assert_relative_eq;
use chart_visuals::core::diverging::layout_extent;
use chart_visuals::core::{CategorySegment, SeriesRow, SortDirection, layout, shared_domain};

fn segment(name: &str, index: usize, value: f64, sort_key: f64) -> CategorySegment {
    CategorySegment::new(name, index, value, sort_key, "#01B8AA")
}

#[test]
fn two_segments_straddle_zero() {
    let rows = vec![SeriesRow::new(
        "Q1",
        vec![segment("No", 0, 30.0, 0.0), segment("Yes", 1, 70.0, 0.0)],
    )];
    let laid_out = layout(&rows, SortDirection::Ascending);
    let boxes = &laid_out[0].boxes;

    assert_eq!(boxes.len(), 2);
    assert_relative_eq!(boxes[0].x0, -15.0);
    assert_relative_eq!(boxes[0].x1, 15.0);
    assert_relative_eq!(boxes[1].x0, 15.0);
    assert_relative_eq!(boxes[1].x1, 85.0);
    assert_eq!(boxes[1].n, 70.0);
}

#[test]
fn zero_sum_row_has_zero_percentages() {
    let rows = vec![SeriesRow::new(
        "empty",
        vec![
            segment("a", 0, 0.0, 0.0),
            segment("b", 1, 0.0, 0.0),
            segment("c", 2, 0.0, 0.0),
        ],
    )];
    let laid_out = layout(&rows, SortDirection::Ascending);

    for segment in &laid_out[0].segments {
        assert_eq!(segment.percentage, 0.0);
    }
    for laid in &laid_out[0].boxes {
        assert!(laid.x0.is_finite() && laid.x1.is_finite());
        assert_eq!(laid.span(), 0.0);
        assert!(!laid.shows_label());
    }
}

#[test]
fn odd_count_centres_the_middle_segment() {
    let rows = vec![SeriesRow::new(
        "Q2",
        vec![
            segment("Disagree", 0, 20.0, 0.0),
            segment("Neutral", 1, 40.0, 0.0),
            segment("Agree", 2, 40.0, 0.0),
        ],
    )];
    let boxes = &layout(&rows, SortDirection::Ascending)[0].boxes;

    assert_relative_eq!(boxes[0].x0, -40.0);
    assert_relative_eq!(boxes[1].x0, -20.0);
    assert_relative_eq!(boxes[1].x1, 20.0);
    assert_relative_eq!(boxes[2].x1, 60.0);
}

#[test]
fn single_segment_is_centred_on_zero() {
    let rows = vec![SeriesRow::new("solo", vec![segment("only", 0, 5.0, 0.0)])];
    let boxes = &layout(&rows, SortDirection::Ascending)[0].boxes;
    assert_relative_eq!(boxes[0].x0, -50.0);
    assert_relative_eq!(boxes[0].x1, 50.0);
}

#[test]
fn sort_direction_orders_by_key() {
    let segments = vec![
        segment("low", 0, 10.0, 1.0),
        segment("high", 1, 10.0, 3.0),
        segment("mid", 2, 10.0, 2.0),
    ];
    let rows = vec![SeriesRow::new("row", segments)];

    let ascending = layout(&rows, SortDirection::Ascending);
    let names: Vec<&str> = ascending[0]
        .boxes
        .iter()
        .map(|b| b.category_value.as_str())
        .collect();
    assert_eq!(names, vec!["high", "mid", "low"]);

    let descending = layout(&rows, SortDirection::Descending);
    let names: Vec<&str> = descending[0]
        .boxes
        .iter()
        .map(|b| b.category_value.as_str())
        .collect();
    assert_eq!(names, vec!["low", "mid", "high"]);
}

#[test]
fn labels_need_non_zero_value_and_wide_span() {
    let rows = vec![SeriesRow::new(
        "row",
        vec![
            segment("tiny", 0, 2.0, 0.0),
            segment("wide", 1, 98.0, 0.0),
        ],
    )];
    let boxes = &layout(&rows, SortDirection::Ascending)[0].boxes;
    assert!(!boxes[0].shows_label());
    assert!(boxes[1].shows_label());
}

#[test]
fn shared_domain_ignores_empty_rows_and_is_niced() {
    let rows = vec![
        SeriesRow::new(
            "a",
            vec![segment("No", 0, 30.0, 0.0), segment("Yes", 1, 70.0, 0.0)],
        ),
        SeriesRow::new("empty", Vec::new()),
        SeriesRow::new(
            "b",
            vec![segment("No", 0, 80.0, 0.0), segment("Yes", 1, 20.0, 0.0)],
        ),
    ];
    let laid_out = layout(&rows, SortDirection::Ascending);
    assert!(laid_out[1].boxes.is_empty());

    let (min, max) = layout_extent(&laid_out).expect("extent");
    assert_relative_eq!(min, -40.0);
    assert_relative_eq!(max, 85.0);

    let (nice_min, nice_max) = shared_domain(&laid_out).expect("domain");
    assert!(nice_min <= min && nice_max >= max);
    assert_relative_eq!(nice_min, -40.0);
    assert_relative_eq!(nice_max, 90.0);
}

#[test]
fn no_segments_means_no_domain() {
    let rows = vec![SeriesRow::new("empty", Vec::new())];
    assert!(shared_domain(&layout(&rows, SortDirection::Ascending)).is_none());
}
