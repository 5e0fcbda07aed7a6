use chart_visuals::core::Viewport;
use chart_visuals::render::{
    ClipRect, Color, LinePrimitive, NullRenderer, PathPrimitive, RectPrimitive, RenderFrame,
    Renderer, TextHAlign, TextPrimitive,
};

fn black() -> Color {
    Color::rgb(0.0, 0.0, 0.0)
}

#[test]
fn null_renderer_counts_primitives() {
    let frame = RenderFrame::new(Viewport::new(200, 100))
        .with_rect(RectPrimitive::new(0.0, 0.0, 10.0, 10.0, black()))
        .with_line(LinePrimitive::new(0.0, 0.0, 10.0, 10.0, 1.0, black()))
        .with_path(
            PathPrimitive::stroked(vec![(0.0, 0.0), (5.0, 5.0)], black(), 0.5).with_clip(
                ClipRect {
                    x: 0.0,
                    y: 0.0,
                    width: 200.0,
                    height: 100.0,
                },
            ),
        )
        .with_text(TextPrimitive::new("0", 1.0, 1.0, 10.0, black(), TextHAlign::Left));

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("render");
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_rect_count, 1);
    assert_eq!(renderer.last_line_count, 1);
    assert_eq!(renderer.last_path_count, 1);
    assert_eq!(renderer.last_text_count, 1);
}

#[test]
fn invalid_primitives_fail_validation() {
    let mut renderer = NullRenderer::default();

    let negative_rect = RenderFrame::new(Viewport::new(10, 10))
        .with_rect(RectPrimitive::new(0.0, 0.0, -1.0, 1.0, black()));
    assert!(renderer.render(&negative_rect).is_err());

    let single_point = RenderFrame::new(Viewport::new(10, 10))
        .with_path(PathPrimitive::filled(vec![(0.0, 0.0)], black()));
    assert!(renderer.render(&single_point).is_err());

    let empty_text = RenderFrame::new(Viewport::new(10, 10))
        .with_text(TextPrimitive::new("", 0.0, 0.0, 10.0, black(), TextHAlign::Center));
    assert!(renderer.render(&empty_text).is_err());

    assert_eq!(renderer.frames_rendered, 0);
}

#[test]
fn css_colors_cover_host_formats() {
    let expected = Color::from_rgb8(0x31, 0x5a, 0x7d);
    assert_eq!(Color::parse_css("#315a7d").expect("hex"), expected);
    assert_eq!(Color::parse_css("rgb(49, 90, 125)").expect("rgb"), expected);
    assert_eq!(
        Color::parse_css("#CCC").expect("short hex"),
        Color::from_rgb8(0xCC, 0xCC, 0xCC)
    );
    let translucent = Color::parse_css("rgba(0, 0, 0, 0.5)").expect("rgba");
    assert_eq!(translucent.alpha, 0.5);
    assert!(Color::parse_css("steelblue").is_ok());
    assert!(Color::parse_css("#12345").is_err());
    assert!(Color::parse_css("chartreuse-ish").is_err());
}
