use crate::api::DivergingBarConfig;
use crate::core::scale::DEFAULT_TICK_COUNT;
use crate::core::viewport::format_number;
use crate::core::{BandScale, LaidOutRow, LinearScale, PlotArea, Viewport};
use crate::error::ChartResult;
use crate::render::{Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

/// Band padding between series rows.
pub const ROW_PADDING: f64 = 0.3;
pub const AXIS_TICK_SIZE: f64 = 6.0;
pub const AXIS_TICK_PADDING: f64 = 3.0;
/// Legend row sits this far above the plot top.
pub const LEGEND_OFFSET: f64 = 55.0;
pub const LEGEND_SWATCH_SIZE: f64 = 18.0;
const LEGEND_TEXT_GAP: f64 = 4.0;
const LEGEND_ITEM_SPACING: f64 = 24.0;
const ZEBRA_OPACITY: f64 = 0.7;
const POINTS_TO_PX: f64 = 4.0 / 3.0;

/// Resolved colors and pixel font sizes for one diverging chart draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergingStyle {
    pub axis_text: Color,
    pub axis_line: Color,
    pub second_y_axis_line: Color,
    pub bar_text: Color,
    pub legend_text: Color,
    pub zebra: Color,
    pub axis_font_size_px: f64,
    pub bar_font_size_px: f64,
    pub legend_font_size_px: f64,
}

impl DivergingStyle {
    pub fn from_config(config: &DivergingBarConfig) -> ChartResult<Self> {
        Ok(Self {
            axis_text: Color::parse_css(&config.axis_text_color)?,
            axis_line: Color::parse_css(&config.axis_line_color)?,
            second_y_axis_line: Color::parse_css(&config.second_y_axis_line_color)?,
            bar_text: Color::parse_css(&config.bar_text_color)?,
            legend_text: Color::parse_css(&config.legend_text_color)?,
            zebra: Color::from_rgb8(0xF5, 0xF5, 0xF5).with_alpha(ZEBRA_OPACITY),
            axis_font_size_px: config.axis_font_size * POINTS_TO_PX,
            bar_font_size_px: config.bar_font_size * POINTS_TO_PX,
            legend_font_size_px: config.legend_font_size * POINTS_TO_PX,
        })
    }
}

/// Laid-out rows plus the shared scales that place them.
#[derive(Debug, Clone, PartialEq)]
pub struct DivergingScene<'a> {
    pub rows: &'a [LaidOutRow],
    pub x_scale: LinearScale,
    pub bands: &'a BandScale,
    /// Fill opacity of each row, parallel to `rows`.
    pub row_opacity: &'a [f64],
}

/// Scale from the shared percentage domain onto whole pixels of the plot.
pub fn diverging_x_scale(domain: (f64, f64), plot: PlotArea) -> ChartResult<LinearScale> {
    Ok(LinearScale::new(domain, (0.0, plot.width))?.with_round(true))
}

/// Everything the diverging chart draws.
pub fn build_diverging_frame(
    viewport: Viewport,
    plot: PlotArea,
    scene: &DivergingScene<'_>,
    style: &DivergingStyle,
) -> ChartResult<RenderFrame> {
    let (ox, oy) = (plot.left, plot.top);
    let x = |value: f64| ox + scene.x_scale.map(value);
    let band = scene.bands.band_width();
    let mut frame = RenderFrame::new(viewport);

    for (index, row) in scene.rows.iter().enumerate() {
        let Some(band_start) = scene.bands.start(index) else {
            continue;
        };
        let top = oy + band_start;
        let opacity = scene.row_opacity.get(index).copied().unwrap_or(1.0);

        frame = frame.with_rect(RectPrimitive::new(
            ox + 1.0,
            top,
            plot.width,
            band,
            style.zebra,
        ));

        for laid_out in &row.boxes {
            let (x0, x1) = (x(laid_out.x0), x(laid_out.x1));
            let fill = Color::parse_css(&laid_out.color)?;
            frame = frame.with_rect(RectPrimitive::new(
                x0,
                top,
                (x1 - x0).max(0.0),
                band,
                fill.with_alpha(fill.alpha * opacity),
            ));
            if laid_out.shows_label() {
                let em = style.bar_font_size_px;
                frame = frame.with_text(TextPrimitive::new(
                    format_number(laid_out.n),
                    x0 + 0.5 * em,
                    top + band / 2.0 + 0.5 * em,
                    em,
                    style.bar_text.with_alpha(style.bar_text.alpha * opacity),
                    TextHAlign::Left,
                ));
            }
        }

        let center = top + band / 2.0;
        frame = frame
            .with_line(LinePrimitive::new(
                ox - AXIS_TICK_SIZE,
                center,
                ox,
                center,
                1.0,
                style.axis_line,
            ))
            .with_text(TextPrimitive::new(
                display_or_placeholder(&row.series_value),
                ox - AXIS_TICK_SIZE - AXIS_TICK_PADDING,
                center + style.axis_font_size_px * 0.32,
                style.axis_font_size_px,
                style.axis_text,
                TextHAlign::Right,
            ));
    }

    frame = frame.with_line(LinePrimitive::new(
        ox,
        oy,
        ox,
        oy + plot.height,
        1.0,
        style.axis_line,
    ));

    for tick in scene.x_scale.ticks(DEFAULT_TICK_COUNT) {
        let px = x(tick);
        frame = frame
            .with_line(LinePrimitive::new(
                px,
                oy,
                px,
                oy - AXIS_TICK_SIZE,
                1.0,
                style.axis_line,
            ))
            .with_text(TextPrimitive::new(
                format_number(tick),
                px,
                oy - AXIS_TICK_SIZE - AXIS_TICK_PADDING,
                style.axis_font_size_px,
                style.axis_text,
                TextHAlign::Center,
            ));
    }
    frame = frame.with_line(LinePrimitive::new(
        ox,
        oy,
        ox + plot.width,
        oy,
        1.0,
        style.axis_line,
    ));

    let zero = x(0.0);
    frame = frame.with_line(LinePrimitive::new(
        zero,
        oy,
        zero,
        oy + plot.height,
        1.0,
        style.second_y_axis_line,
    ));

    frame = append_legend(frame, scene.rows, ox, oy - LEGEND_OFFSET, style)?;
    Ok(frame)
}

/// Legend swatches for the first row's segments, laid out left to right.
fn append_legend(
    mut frame: RenderFrame,
    rows: &[LaidOutRow],
    left: f64,
    top: f64,
    style: &DivergingStyle,
) -> ChartResult<RenderFrame> {
    let Some(first) = rows.iter().find(|row| !row.boxes.is_empty()) else {
        return Ok(frame);
    };
    let mut cursor = left;
    for entry in &first.boxes {
        let label = display_or_placeholder(&entry.category_value);
        frame = frame
            .with_rect(RectPrimitive::new(
                cursor,
                top,
                LEGEND_SWATCH_SIZE,
                LEGEND_SWATCH_SIZE,
                Color::parse_css(&entry.color)?,
            ))
            .with_text(TextPrimitive::new(
                label.clone(),
                cursor + LEGEND_SWATCH_SIZE + LEGEND_TEXT_GAP,
                top + LEGEND_SWATCH_SIZE / 2.0 + style.legend_font_size_px * 0.35,
                style.legend_font_size_px,
                style.legend_text,
                TextHAlign::Left,
            ));
        cursor += LEGEND_SWATCH_SIZE
            + LEGEND_TEXT_GAP
            + estimate_text_width_px(&label, style.legend_font_size_px)
            + LEGEND_ITEM_SPACING;
    }
    Ok(frame)
}

fn display_or_placeholder(text: &str) -> String {
    if text.is_empty() {
        "(Blank)".to_owned()
    } else {
        text.to_owned()
    }
}

/// Backend-independent width estimate for legend layout.
#[must_use]
pub fn estimate_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}
