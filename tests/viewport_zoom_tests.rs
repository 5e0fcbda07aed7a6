use chart_visuals::core::viewport::wheel_zoom_factor;
use chart_visuals::core::{Sample, ViewportState, XKind, ZoomLimits, ZoomTransform};

fn samples() -> Vec<Sample> {
    (0..=10)
        .map(|i| Sample::new(f64::from(i) * 10.0, f64::from(i % 4) * 2.5))
        .collect()
}

fn state() -> ViewportState {
    let mut state =
        ViewportState::initialize(0.0, 100.0, 1000.0, XKind::Numeric, ZoomLimits::default())
            .expect("viewport");
    state.fit_value_domain(&samples());
    state
}

#[test]
fn initialize_rejects_non_finite_domain() {
    let limits = ZoomLimits::default();
    assert!(ViewportState::initialize(f64::NAN, 1.0, 100.0, XKind::Numeric, limits).is_err());
    assert!(ViewportState::initialize(0.0, f64::INFINITY, 100.0, XKind::Numeric, limits).is_err());
    assert!(ViewportState::initialize(0.0, 1.0, 0.0, XKind::Numeric, limits).is_err());
}

#[test]
fn zoom_scale_is_clamped_to_limits() {
    let state = state();

    let zoomed_in = state.apply_zoom(ZoomTransform::new(0.0, 50.0), &samples());
    assert_eq!(zoomed_in.transform().scale, 10.0);
    let (start, end) = zoomed_in.domain();
    assert!((start - 0.0).abs() <= 1e-9);
    assert!((end - 10.0).abs() <= 1e-9);

    let zoomed_out = state.apply_zoom(ZoomTransform::new(0.0, 0.01), &samples());
    assert_eq!(zoomed_out.transform().scale, 0.5);
    let (start, end) = zoomed_out.domain();
    assert!((start - 0.0).abs() <= 1e-9);
    assert!((end - 200.0).abs() <= 1e-9);
}

#[test]
fn extended_zoom_limit_allows_deep_zoom() {
    let state = ViewportState::initialize(
        0.0,
        100.0,
        1000.0,
        XKind::Numeric,
        ZoomLimits::with_max_zoom_level(1024.0),
    )
    .expect("viewport");
    let zoomed = state.apply_zoom(ZoomTransform::new(0.0, 500.0), &[]);
    assert_eq!(zoomed.transform().scale, 500.0);
}

#[test]
fn degenerate_zoom_keeps_previous_transform() {
    let state = state().zoom_about(2.0, 500.0, &samples());
    let before = state.transform();

    let next = state.apply_zoom(ZoomTransform::new(1e300, 1.0), &samples());
    assert_eq!(next.transform(), before);
    assert_eq!(next.domain(), state.domain());
}

#[test]
fn zoom_about_keeps_anchor_fixed() {
    let state = state();
    let anchor_px = 250.0;
    let anchored_value = state.invert(anchor_px);

    let zoomed = state.zoom_about(4.0, anchor_px, &samples());
    assert!((zoomed.invert(anchor_px) - anchored_value).abs() <= 1e-9);
    assert_eq!(zoomed.transform().scale, 4.0);
}

#[test]
fn pan_shifts_domain_without_changing_span() {
    let state = state();
    let panned = state.pan_by(-100.0, &samples());
    let (start, end) = panned.domain();
    assert!((start - 10.0).abs() <= 1e-9);
    assert!((end - 110.0).abs() <= 1e-9);
}

#[test]
fn value_domain_follows_visible_window() {
    let samples = vec![
        Sample::new(0.0, 1.0),
        Sample::new(50.0, 40.0),
        Sample::new(100.0, 3.0),
    ];
    let mut state =
        ViewportState::initialize(0.0, 100.0, 1000.0, XKind::Numeric, ZoomLimits::default())
            .expect("viewport");
    state.fit_value_domain(&samples);
    assert_eq!(state.value_domain(), (0.0, 40.0));

    let right_edge = state.apply_zoom(ZoomTransform::new(-4000.0, 5.0), &samples);
    let (start, end) = right_edge.domain();
    assert!(start > 50.0 && end >= 100.0);
    assert_eq!(right_edge.value_domain(), (0.0, 3.0));

    let empty = state.pan_by(-5000.0, &samples);
    assert_eq!(empty.value_domain(), (0.0, 0.0));
}

#[test]
fn reset_returns_to_base_domain() {
    let state = state()
        .zoom_about(3.0, 100.0, &samples())
        .pan_by(40.0, &samples());
    let reset = state.reset(&samples());
    assert_eq!(reset.domain(), reset.base_domain());
    assert_eq!(reset.transform(), ZoomTransform::default());
}

#[test]
fn wheel_steps_zoom_in_and_out() {
    let state = state();
    let zoom_in = wheel_zoom_factor(-120.0).expect("factor").expect("non-zero");
    let zoom_out = wheel_zoom_factor(120.0).expect("factor").expect("non-zero");

    let narrower = state.zoom_about(zoom_in, 500.0, &samples());
    let wider = state.zoom_about(zoom_out, 500.0, &samples());
    let span = |s: &ViewportState| s.domain().1 - s.domain().0;
    assert!(span(&narrower) < span(&state));
    assert!(span(&wider) > span(&state));
}

#[test]
fn clamped_projection_saturates() {
    let state = state().with_clamp(true);
    assert_eq!(state.project(-50.0), 0.0);
    assert_eq!(state.project(500.0), 1000.0);
    assert_eq!(state.invert(2000.0), 100.0);
}

#[test]
fn footer_label_formats_by_axis_kind() {
    assert_eq!(state().domain_label(), "0 to 100");

    // 2020-01-01T00:00:00Z .. 2020-01-31T00:00:00Z
    let temporal = ViewportState::initialize(
        1_577_836_800_000.0,
        1_580_428_800_000.0,
        600.0,
        XKind::Temporal,
        ZoomLimits::default(),
    )
    .expect("viewport");
    assert_eq!(temporal.domain_label(), "2020-01-01 to 2020-01-31");
}

#[test]
fn ticks_stay_inside_visible_domain() {
    let state = state();
    let ticks = state.x_ticks(10);
    assert!(!ticks.is_empty());
    for tick in &ticks {
        assert!(tick.value >= 0.0 && tick.value <= 100.0);
        assert!((tick.pixel - state.project(tick.value)).abs() <= 1e-9);
    }

    let y_ticks = state.y_ticks(300.0).expect("y ticks");
    assert_eq!(y_ticks.first().map(|tick| tick.value), Some(0.0));
    assert_eq!(y_ticks.first().map(|tick| tick.pixel), Some(300.0));
}
