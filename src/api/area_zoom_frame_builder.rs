use crate::api::AreaZoomConfig;
use crate::core::scale::DEFAULT_TICK_COUNT;
use crate::core::viewport::format_number;
use crate::core::windowing::samples_in_window_with_overscan;
use crate::core::{
    AreaVertex, PlotArea, Sample, Viewport, ViewportState, project_area_geometry,
};
use crate::error::ChartResult;
use crate::interaction::TrackerState;
use crate::render::{
    ClipRect, Color, LinePrimitive, PathPrimitive, RectPrimitive, RenderFrame, TextHAlign,
    TextPrimitive,
};

pub const AREA_FILL_OPACITY: f64 = 0.5;
pub const AXIS_STROKE_WIDTH: f64 = 0.5;
pub const TICK_PADDING: f64 = 6.0;
/// Distance from the plot top to the footer baseline, below the plot.
pub const FOOTER_OFFSET: f64 = 50.0;
const TRACKER_MARKER_SIZE: f64 = 6.0;
const TRACKER_STROKE_WIDTH: f64 = 1.0;

/// Resolved colors and sizes for one area chart draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaZoomStyle {
    pub area_fill: Color,
    pub line: Color,
    pub axis_text: Color,
    pub x_axis_line: Color,
    pub y_axis_line: Color,
    pub x_grid: Color,
    pub footer_text: Color,
    pub axis_font_size_px: f64,
    pub footer_font_size_px: f64,
}

impl AreaZoomStyle {
    pub fn from_config(config: &AreaZoomConfig) -> ChartResult<Self> {
        Ok(Self {
            area_fill: Color::parse_css(&config.fill_color)?.with_alpha(AREA_FILL_OPACITY),
            line: Color::parse_css(&config.line_color)?,
            axis_text: Color::parse_css(&config.axis_text_color)?,
            x_axis_line: Color::parse_css(&config.x_axis_line_color)?,
            y_axis_line: Color::parse_css(&config.y_axis_line_color)?,
            x_grid: Color::rgb(1.0, 1.0, 1.0).with_alpha(0.5),
            footer_text: Color::parse_css(&config.footer_text_color)?,
            axis_font_size_px: config.axis_font_size,
            footer_font_size_px: config.footer_font_size,
        })
    }
}

/// Everything the area chart draws for the current viewport state.
pub fn build_area_zoom_frame(
    viewport: Viewport,
    plot: PlotArea,
    state: &ViewportState,
    samples: &[Sample],
    style: &AreaZoomStyle,
    tracker: TrackerState,
) -> ChartResult<RenderFrame> {
    let (ox, oy) = (plot.left, plot.top);
    let (width, height) = (plot.width, plot.height);
    let mut frame = RenderFrame::new(viewport);

    let value_scale = state.value_scale(height)?;
    let (start, end) = state.domain();
    let visible = samples_in_window_with_overscan(samples, start, end, 1);
    let geometry = project_area_geometry(visible, state, value_scale);
    if geometry.line_points.len() >= 2 {
        let clip = ClipRect {
            x: ox,
            y: oy,
            width,
            height,
        };
        let offset = |points: &[AreaVertex]| -> Vec<(f64, f64)> {
            points.iter().map(|v| (ox + v.x, oy + v.y)).collect()
        };
        frame = frame
            .with_path(
                PathPrimitive::filled(offset(&geometry.fill_polygon), style.area_fill)
                    .with_clip(clip),
            )
            .with_path(
                PathPrimitive::stroked(
                    offset(&geometry.line_points),
                    style.line,
                    AXIS_STROKE_WIDTH,
                )
                .with_clip(clip),
            );
    }

    let in_plot_x = |px: f64| (0.0..=width).contains(&px);
    for tick in state
        .x_ticks(DEFAULT_TICK_COUNT)
        .into_iter()
        .filter(|tick| in_plot_x(tick.pixel))
    {
        let x = ox + tick.pixel;
        frame = frame
            .with_line(LinePrimitive::new(
                x,
                oy + height,
                x,
                oy,
                AXIS_STROKE_WIDTH,
                style.x_grid,
            ))
            .with_text(TextPrimitive::new(
                tick.label,
                x,
                oy + height + TICK_PADDING + style.axis_font_size_px,
                style.axis_font_size_px,
                style.axis_text,
                TextHAlign::Center,
            ));
    }
    frame = frame.with_line(LinePrimitive::new(
        ox,
        oy + height,
        ox + width,
        oy + height,
        AXIS_STROKE_WIDTH,
        style.x_axis_line,
    ));

    for tick in state.y_ticks(height)? {
        let y = oy + tick.pixel;
        frame = frame
            .with_line(LinePrimitive::new(
                ox + width,
                y,
                ox,
                y,
                AXIS_STROKE_WIDTH,
                style.y_axis_line,
            ))
            .with_text(TextPrimitive::new(
                tick.label,
                ox + width + TICK_PADDING,
                y + style.axis_font_size_px * 0.32,
                style.axis_font_size_px,
                style.axis_text,
                TextHAlign::Left,
            ));
    }
    frame = frame.with_line(LinePrimitive::new(
        ox + width,
        oy,
        ox + width,
        oy + height,
        AXIS_STROKE_WIDTH,
        style.y_axis_line,
    ));

    frame = frame.with_text(TextPrimitive::new(
        state.domain_label(),
        ox + width / 2.0,
        oy + height + FOOTER_OFFSET,
        style.footer_font_size_px,
        style.footer_text,
        TextHAlign::Center,
    ));

    if let Some(snap) = tracker.snap.filter(|_| tracker.visible) {
        if in_plot_x(snap.x) {
            let (x, y) = (ox + snap.x, oy + snap.y);
            frame = frame
                .with_line(LinePrimitive::new(
                    x,
                    oy,
                    x,
                    oy + height,
                    TRACKER_STROKE_WIDTH,
                    style.line,
                ))
                .with_rect(RectPrimitive::new(
                    x - TRACKER_MARKER_SIZE / 2.0,
                    y - TRACKER_MARKER_SIZE / 2.0,
                    TRACKER_MARKER_SIZE,
                    TRACKER_MARKER_SIZE,
                    style.line,
                ))
                .with_text(TextPrimitive::new(
                    format!(
                        "{}: {}",
                        state.format_x(snap.sample.x),
                        format_number(snap.sample.y)
                    ),
                    x,
                    oy + style.axis_font_size_px + TICK_PADDING,
                    style.axis_font_size_px,
                    style.axis_text,
                    TextHAlign::Center,
                ));
        }
    }

    Ok(frame)
}
