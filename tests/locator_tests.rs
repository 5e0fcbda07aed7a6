use chart_visuals::core::{
    LinearProjector, LocateMode, Sample, ViewportState, XKind, ZoomLimits, locate,
};

fn series() -> Vec<Sample> {
    vec![
        Sample::new(0.0, 1.0),
        Sample::new(10.0, 2.0),
        Sample::new(20.0, 3.0),
    ]
}

#[test]
fn nearest_mode_picks_closest_sample() {
    let identity = LinearProjector::identity();
    let found = locate(&series(), 9.0, &identity, LocateMode::Nearest).expect("sample");
    assert_eq!(found, Sample::new(10.0, 2.0));

    let found = locate(&series(), 16.0, &identity, LocateMode::Nearest).expect("sample");
    assert_eq!(found.x, 20.0);
}

#[test]
fn exact_mode_requires_matching_x() {
    let identity = LinearProjector::identity();
    assert!(locate(&series(), 9.0, &identity, LocateMode::Exact).is_none());
    assert_eq!(
        locate(&series(), 10.0, &identity, LocateMode::Exact),
        Some(Sample::new(10.0, 2.0))
    );
}

#[test]
fn exact_or_nearest_falls_back() {
    let identity = LinearProjector::identity();
    assert_eq!(
        locate(&series(), 20.0, &identity, LocateMode::ExactOrNearest),
        Some(Sample::new(20.0, 3.0))
    );
    assert_eq!(
        locate(&series(), 3.0, &identity, LocateMode::ExactOrNearest),
        Some(Sample::new(0.0, 1.0))
    );
}

#[test]
fn ties_prefer_left_neighbour() {
    let identity = LinearProjector::identity();
    let found = locate(&series(), 5.0, &identity, LocateMode::Nearest).expect("sample");
    assert_eq!(found.x, 0.0);
}

#[test]
fn empty_series_has_no_sample() {
    let identity = LinearProjector::identity();
    for mode in [LocateMode::Nearest, LocateMode::Exact, LocateMode::ExactOrNearest] {
        assert!(locate(&[], 1.0, &identity, mode).is_none());
    }
}

#[test]
fn single_sample_is_found_at_its_pixel() {
    let identity = LinearProjector::identity();
    let series = [Sample::new(4.0, 8.0)];
    assert_eq!(
        locate(&series, 4.0, &identity, LocateMode::Nearest),
        Some(Sample::new(4.0, 8.0))
    );
}

#[test]
fn scaled_projector_searches_in_pixel_space() {
    let projector = LinearProjector::new(3.0, 12.0);
    // x = 10 lands on pixel 42, x = 20 on pixel 72.
    let found = locate(&series(), 60.0, &projector, LocateMode::Nearest).expect("sample");
    assert_eq!(found.x, 20.0);
}

#[test]
fn viewport_state_acts_as_projector() {
    let samples: Vec<Sample> = (0..1000)
        .map(|i| Sample::new(f64::from(i), f64::from(i % 7)))
        .collect();
    let state =
        ViewportState::initialize(0.0, 999.0, 999.0, XKind::Numeric, ZoomLimits::default())
            .expect("viewport");

    let found = locate(&samples, 420.4, &state, LocateMode::Nearest).expect("sample");
    assert_eq!(found.x, 420.0);

    let zoomed = state.zoom_about(4.0, 0.0, &samples);
    let found = locate(&samples, 402.0, &zoomed, LocateMode::Nearest).expect("sample");
    assert!((found.x - 100.0).abs() <= 1e-9 || (found.x - 101.0).abs() <= 1e-9);
}
