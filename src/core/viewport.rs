use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::locator::Projector;
use crate::core::primitives::epoch_millis_to_datetime;
use crate::core::scale::{DEFAULT_TICK_COUNT, LinearScale, linear_ticks};
use crate::core::time_ticks::{TimeTick, time_ticks};
use crate::core::windowing::max_value_in_window;
use crate::core::{Sample, XKind};
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_MIN_ZOOM_SCALE: f64 = 0.5;
/// Zoom-in limit of the classic area chart.
pub const DEFAULT_MAX_ZOOM_LEVEL: f64 = 10.0;
/// Zoom-in limit of the high-resolution area chart variant.
pub const EXTENDED_MAX_ZOOM_LEVEL: f64 = 1024.0;

const NUMERIC_MIN_SPAN: f64 = 1.0;
const TEMPORAL_MIN_SPAN_MS: f64 = 86_400_000.0;
const WHEEL_DELTA_SCALE: f64 = 0.002;

/// Footer date format for temporal domains.
pub const DOMAIN_LABEL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Allowed zoom scale interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_ZOOM_SCALE,
            max_scale: DEFAULT_MAX_ZOOM_LEVEL,
        }
    }
}

impl ZoomLimits {
    #[must_use]
    pub fn with_max_zoom_level(max_scale: f64) -> Self {
        Self {
            max_scale,
            ..Self::default()
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.min_scale.is_finite() || self.min_scale <= 0.0 {
            return Err(ChartError::InvalidData(
                "zoom min scale must be finite and > 0".to_owned(),
            ));
        }
        if !self.max_scale.is_finite() || self.max_scale < self.min_scale {
            return Err(ChartError::InvalidData(
                "zoom max scale must be finite and >= min scale".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn clamp(self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Pan/zoom transform relative to the base domain mapping.
///
/// A pixel `p` of the base mapping is shown at `p * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub translate: f64,
    pub scale: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self {
            translate: 0.0,
            scale: 1.0,
        }
    }
}

impl ZoomTransform {
    #[must_use]
    pub fn new(translate: f64, scale: f64) -> Self {
        Self { translate, scale }
    }
}

/// Horizontal viewport of the area chart.
///
/// `base` keeps the initial domain mapping; `visible` is `base` seen through
/// `transform`. The value domain is re-fitted to the samples inside the
/// visible window on every transform change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    base: LinearScale,
    visible: LinearScale,
    value_domain: (f64, f64),
    transform: ZoomTransform,
    limits: ZoomLimits,
    x_kind: XKind,
    clamp: bool,
}

impl ViewportState {
    /// Builds the initial state for `[domain_min, domain_max]` mapped onto `[0, pixel_width]`.
    ///
    /// A zero-span domain is widened symmetrically so the view stays zoomable.
    pub fn initialize(
        domain_min: f64,
        domain_max: f64,
        pixel_width: f64,
        x_kind: XKind,
        limits: ZoomLimits,
    ) -> ChartResult<Self> {
        let limits = limits.validate()?;
        if !pixel_width.is_finite() || pixel_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "viewport pixel width must be finite and > 0".to_owned(),
            ));
        }
        let min_span = match x_kind {
            XKind::Numeric => NUMERIC_MIN_SPAN,
            XKind::Temporal => TEMPORAL_MIN_SPAN_MS,
        };
        let domain = normalize_domain(domain_min, domain_max, min_span)?;
        let base = LinearScale::new(domain, (0.0, pixel_width))?;

        Ok(Self {
            base,
            visible: base,
            value_domain: (0.0, 0.0),
            transform: ZoomTransform::default(),
            limits,
            x_kind,
            clamp: false,
        })
    }

    /// Saturates projections at the domain/range bounds instead of extrapolating.
    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self.visible = self.visible.with_clamp(clamp);
        self
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.visible.domain()
    }

    #[must_use]
    pub fn base_domain(&self) -> (f64, f64) {
        self.base.domain()
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.visible.range()
    }

    #[must_use]
    pub fn value_domain(&self) -> (f64, f64) {
        self.value_domain
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    #[must_use]
    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    #[must_use]
    pub fn x_kind(&self) -> XKind {
        self.x_kind
    }

    #[must_use]
    pub fn is_clamped(&self) -> bool {
        self.clamp
    }

    #[must_use]
    pub fn project(&self, x: f64) -> f64 {
        self.visible.map(x)
    }

    #[must_use]
    pub fn invert(&self, pixel: f64) -> f64 {
        self.visible.invert(pixel)
    }

    /// Sets the value domain to `[0, max(y)]` over samples in the visible window.
    pub fn fit_value_domain(&mut self, samples: &[Sample]) {
        let (start, end) = self.domain();
        self.value_domain = (0.0, max_value_in_window(samples, start, end));
    }

    /// Vertical scale for a plot of `height` pixels, value zero at the bottom.
    pub fn value_scale(&self, height: f64) -> ChartResult<LinearScale> {
        LinearScale::new(self.value_domain, (height, 0.0))
    }

    /// Applies an absolute zoom transform and re-fits the value domain.
    ///
    /// The scale is clamped to the zoom limits. If the resulting window
    /// collapses to zero pixel width the current state is returned unchanged.
    #[must_use]
    pub fn apply_zoom(&self, transform: ZoomTransform, samples: &[Sample]) -> Self {
        if !transform.translate.is_finite() || !transform.scale.is_finite() {
            warn!(
                translate = transform.translate,
                scale = transform.scale,
                "ignoring non-finite zoom transform"
            );
            return *self;
        }

        let candidate = ZoomTransform {
            translate: transform.translate,
            scale: self.limits.clamp(transform.scale),
        };
        let Some(visible) = self.visible_for(candidate) else {
            warn!(
                translate = candidate.translate,
                scale = candidate.scale,
                "degenerate zoom window, keeping previous transform"
            );
            return *self;
        };

        let mut next = Self {
            visible,
            transform: candidate,
            ..*self
        };
        next.fit_value_domain(samples);
        trace!(
            domain_start = next.domain().0,
            domain_end = next.domain().1,
            value_max = next.value_domain.1,
            scale = candidate.scale,
            "zoom applied"
        );
        next
    }

    /// Scales by `factor` keeping the point under `anchor_px` fixed.
    #[must_use]
    pub fn zoom_about(&self, factor: f64, anchor_px: f64, samples: &[Sample]) -> Self {
        if !factor.is_finite() || factor <= 0.0 || !anchor_px.is_finite() {
            warn!(factor, anchor_px, "ignoring invalid zoom gesture");
            return *self;
        }
        let current = self.transform;
        let scale = self.limits.clamp(current.scale * factor);
        let base_px = (anchor_px - current.translate) / current.scale;
        let translate = anchor_px - base_px * scale;
        self.apply_zoom(ZoomTransform { translate, scale }, samples)
    }

    /// Shifts the view by `delta_px` screen pixels.
    #[must_use]
    pub fn pan_by(&self, delta_px: f64, samples: &[Sample]) -> Self {
        let current = self.transform;
        self.apply_zoom(
            ZoomTransform {
                translate: current.translate + delta_px,
                scale: current.scale,
            },
            samples,
        )
    }

    /// Returns to the initial domain.
    #[must_use]
    pub fn reset(&self, samples: &[Sample]) -> Self {
        self.apply_zoom(ZoomTransform::default(), samples)
    }

    /// Tick values for the horizontal axis.
    #[must_use]
    pub fn x_ticks(&self, count: usize) -> Vec<AxisTick> {
        let (start, end) = self.domain();
        match self.x_kind {
            XKind::Numeric => linear_ticks(start, end, count)
                .into_iter()
                .map(|value| AxisTick {
                    value,
                    pixel: self.project(value),
                    label: format_number(value),
                })
                .collect(),
            XKind::Temporal => time_ticks(start, end, count)
                .into_iter()
                .map(|TimeTick { millis, label }| AxisTick {
                    value: millis,
                    pixel: self.project(millis),
                    label,
                })
                .collect(),
        }
    }

    /// Tick values for the vertical axis of a plot `height` pixels tall.
    pub fn y_ticks(&self, height: f64) -> ChartResult<Vec<AxisTick>> {
        let scale = self.value_scale(height)?;
        Ok(scale
            .ticks(DEFAULT_TICK_COUNT)
            .into_iter()
            .map(|value| AxisTick {
                value,
                pixel: scale.map(value),
                label: format_number(value),
            })
            .collect())
    }

    /// Human-readable visible range, e.g. `2001-01-01 to 2001-12-31`.
    #[must_use]
    pub fn domain_label(&self) -> String {
        let (start, end) = self.domain();
        format!("{} to {}", self.format_x(start), self.format_x(end))
    }

    #[must_use]
    pub fn format_x(&self, x: f64) -> String {
        match self.x_kind {
            XKind::Numeric => format_number(x),
            XKind::Temporal => epoch_millis_to_datetime(x)
                .map(|time| time.format(DOMAIN_LABEL_DATE_FORMAT).to_string())
                .unwrap_or_else(|| format_number(x)),
        }
    }

    fn visible_for(&self, transform: ZoomTransform) -> Option<LinearScale> {
        let (r0, r1) = self.base.range();
        let d0 = self.base.invert((r0 - transform.translate) / transform.scale);
        let d1 = self.base.invert((r1 - transform.translate) / transform.scale);
        if !d0.is_finite() || !d1.is_finite() {
            return None;
        }
        let visible = LinearScale::new((d0, d1), (r0, r1))
            .ok()?
            .with_clamp(self.clamp);
        if visible.map(d0) == visible.map(d1) {
            return None;
        }
        Some(visible)
    }
}

impl Projector for ViewportState {
    fn project(&self, x: f64) -> f64 {
        ViewportState::project(self, x)
    }

    fn invert(&self, pixel: f64) -> f64 {
        ViewportState::invert(self, pixel)
    }
}

/// One axis tick in plot-local pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub value: f64,
    pub pixel: f64,
    pub label: String,
}

/// Converts a wheel delta (pixels, positive = scroll down) into a zoom factor.
///
/// Scrolling up zooms in. Returns `None` for a zero delta.
pub fn wheel_zoom_factor(wheel_delta_y: f64) -> ChartResult<Option<f64>> {
    if !wheel_delta_y.is_finite() {
        return Err(ChartError::InvalidData(
            "wheel delta must be finite".to_owned(),
        ));
    }
    if wheel_delta_y == 0.0 {
        return Ok(None);
    }
    let factor = 2_f64.powf(-wheel_delta_y * WHEEL_DELTA_SCALE);
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ChartError::InvalidData(
            "computed wheel zoom factor must be finite and > 0".to_owned(),
        ));
    }
    Ok(Some(factor))
}

/// Formats a number the way axis and footer labels show it.
#[must_use]
pub fn format_number(value: f64) -> String {
    let rounded = if value.abs() < 1e6 {
        (value * 1e9).round() / 1e9
    } else {
        value.round()
    };
    if rounded == 0.0 {
        // Avoid printing "-0".
        return "0".to_owned();
    }
    format!("{rounded}")
}

fn normalize_domain(start: f64, end: f64, min_span: f64) -> ChartResult<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidData(
            "viewport domain must be finite".to_owned(),
        ));
    }

    if start == end {
        let half = min_span / 2.0;
        return Ok((start - half, end + half));
    }

    Ok((start.min(end), start.max(end)))
}

#[cfg(test)]
mod tests {
    use super::{ViewportState, ZoomLimits, ZoomTransform, format_number, wheel_zoom_factor};
    use crate::core::XKind;

    fn state() -> ViewportState {
        ViewportState::initialize(0.0, 100.0, 1000.0, XKind::Numeric, ZoomLimits::default())
            .expect("viewport")
    }

    #[test]
    fn zero_span_domain_is_widened() {
        let state = ViewportState::initialize(5.0, 5.0, 100.0, XKind::Numeric, ZoomLimits::default())
            .expect("viewport");
        assert_eq!(state.domain(), (4.5, 5.5));
    }

    #[test]
    fn reversed_domain_is_normalized() {
        let state = ViewportState::initialize(10.0, 0.0, 100.0, XKind::Numeric, ZoomLimits::default())
            .expect("viewport");
        assert_eq!(state.domain(), (0.0, 10.0));
    }

    #[test]
    fn invalid_limits_are_rejected() {
        let limits = ZoomLimits {
            min_scale: 2.0,
            max_scale: 1.0,
        };
        assert!(ViewportState::initialize(0.0, 1.0, 100.0, XKind::Numeric, limits).is_err());
    }

    #[test]
    fn identity_transform_keeps_base_domain() {
        let state = state();
        let next = state.apply_zoom(ZoomTransform::default(), &[]);
        assert_eq!(next.domain(), state.base_domain());
    }

    #[test]
    fn non_finite_transform_is_ignored() {
        let state = state();
        let next = state.apply_zoom(ZoomTransform::new(f64::NAN, 2.0), &[]);
        assert_eq!(next, state);
    }

    #[test]
    fn wheel_up_zooms_in() {
        let factor = wheel_zoom_factor(-100.0).expect("factor").expect("some");
        assert!(factor > 1.0);
        assert!(wheel_zoom_factor(0.0).expect("factor").is_none());
        assert!(wheel_zoom_factor(f64::NAN).is_err());
    }

    #[test]
    fn numbers_format_without_trailing_noise() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(-0.0), "0");
    }
}
