use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Default tick count used when niceing a domain.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Affine mapping between a continuous domain and a pixel range.
///
/// A zero-span domain maps every value to `range_start`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
    #[serde(default)]
    clamp: bool,
    #[serde(default)]
    round: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
            clamp: false,
            round: false,
        })
    }

    /// Saturates out-of-domain values at the range bounds (and vice versa).
    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Rounds projected values to whole pixels.
    #[must_use]
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn is_clamped(self) -> bool {
        self.clamp
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let mut t = if span == 0.0 {
            0.0
        } else {
            (value - self.domain_start) / span
        };
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        let px = self.range_start + t * (self.range_end - self.range_start);
        if self.round { px.round() } else { px }
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        let mut t = if span == 0.0 {
            0.0
        } else {
            (pixel - self.range_start) / span
        };
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        self.domain_start + t * (self.domain_end - self.domain_start)
    }

    /// Extends the domain outward to multiples of the tick step for `count` ticks.
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let (start, end) = nice_domain(self.domain_start, self.domain_end, count);
        Self {
            domain_start: start,
            domain_end: end,
            ..self
        }
    }

    /// Returns round tick values inside the domain.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        linear_ticks(self.domain_start, self.domain_end, count)
    }
}

/// Tick step for `count` ticks over `[start, end]`, snapped to 1, 2, 5 or 10
/// times a power of ten.
///
/// Returns `0.0` for empty or non-finite spans.
#[must_use]
pub fn tick_step(start: f64, end: f64, count: usize) -> f64 {
    let span = (end - start).abs();
    if count == 0 || !span.is_finite() || span == 0.0 {
        return 0.0;
    }
    let m = count as f64;
    let mut step = 10_f64.powf((span / m).log10().floor());
    let err = m / span * step;
    if err <= 0.15 {
        step *= 10.0;
    } else if err <= 0.35 {
        step *= 5.0;
    } else if err <= 0.75 {
        step *= 2.0;
    }
    step
}

/// Widens `[start, end]` to the enclosing multiples of the tick step.
#[must_use]
pub fn nice_domain(start: f64, end: f64, count: usize) -> (f64, f64) {
    let (lo, hi, reversed) = if start <= end {
        (start, end, false)
    } else {
        (end, start, true)
    };
    let step = tick_step(lo, hi, count);
    if step == 0.0 || !step.is_finite() {
        return (start, end);
    }
    let lo = (lo / step).floor() * step;
    let hi = (hi / step).ceil() * step;
    if reversed { (hi, lo) } else { (lo, hi) }
}

#[must_use]
pub fn linear_ticks(start: f64, end: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };
    let step = tick_step(lo, hi, count);
    if step == 0.0 || !step.is_finite() {
        return if lo.is_finite() { vec![lo] } else { Vec::new() };
    }

    let first = (lo / step).ceil();
    let last = (hi / step).floor();
    if last < first {
        return Vec::new();
    }
    let n = (last - first).min(10_000.0) as u64;
    // Multiply instead of accumulating so ticks do not drift.
    (0..=n).map(|i| (first + i as f64) * step).collect()
}

/// Discrete band layout for row-per-series charts.
///
/// Mirrors the rounded-band behaviour of classic d3: the outer padding equals
/// the inner padding, band positions are whole pixels, and leftover space is
/// split evenly on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    starts: Vec<f64>,
    band_width: f64,
}

impl BandScale {
    pub fn new(count: usize, range: (f64, f64), padding: f64) -> ChartResult<Self> {
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "band range must be finite".to_owned(),
            ));
        }
        if !padding.is_finite() || !(0.0..1.0).contains(&padding) {
            return Err(ChartError::InvalidData(
                "band padding must be finite and in [0, 1)".to_owned(),
            ));
        }
        if count == 0 {
            return Ok(Self {
                starts: Vec::new(),
                band_width: 0.0,
            });
        }

        let reversed = range.1 < range.0;
        let (start, stop) = if reversed {
            (range.1, range.0)
        } else {
            (range.0, range.1)
        };
        let n = count as f64;
        let step = ((stop - start) / (n - padding + 2.0 * padding)).floor();
        let error = stop - start - (n - padding) * step;
        let first = start + (error / 2.0).round();

        let mut starts: Vec<f64> = (0..count).map(|i| first + step * i as f64).collect();
        if reversed {
            starts.reverse();
        }

        Ok(Self {
            starts,
            band_width: (step * (1.0 - padding)).round(),
        })
    }

    #[must_use]
    pub fn band_width(&self) -> f64 {
        self.band_width
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.starts.len()
    }

    /// Start offset of band `index`, or `None` when out of range.
    #[must_use]
    pub fn start(&self, index: usize) -> Option<f64> {
        self.starts.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{BandScale, LinearScale, linear_ticks, nice_domain, tick_step};

    #[test]
    fn clamped_scale_saturates_both_ways() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0))
            .expect("scale")
            .with_clamp(true);
        assert_eq!(scale.map(-5.0), 0.0);
        assert_eq!(scale.map(15.0), 100.0);
        assert_eq!(scale.invert(250.0), 10.0);
    }

    #[test]
    fn unclamped_scale_extrapolates() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0)).expect("scale");
        assert_eq!(scale.map(15.0), 150.0);
    }

    #[test]
    fn zero_span_domain_maps_to_range_start() {
        let scale = LinearScale::new((3.0, 3.0), (10.0, 20.0)).expect("scale");
        assert_eq!(scale.map(42.0), 10.0);
    }

    #[test]
    fn tick_step_snaps_to_round_values() {
        assert_eq!(tick_step(0.0, 100.0, 10), 10.0);
        assert!((tick_step(0.0, 1.0, 10) - 0.1).abs() <= 1e-12);
        assert_eq!(tick_step(-15.0, 85.0, 10), 10.0);
        assert_eq!(tick_step(0.0, 0.0, 10), 0.0);
    }

    #[test]
    fn nice_domain_widens_to_step_multiples() {
        assert_eq!(nice_domain(-17.5, 83.0, 10), (-20.0, 90.0));
        assert_eq!(nice_domain(5.0, 5.0, 10), (5.0, 5.0));
    }

    #[test]
    fn ticks_cover_domain_inclusively() {
        assert_eq!(linear_ticks(0.0, 50.0, 5), vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn band_scale_rounds_like_classic_rangeroundbands() {
        let bands = BandScale::new(2, (0.0, 100.0), 0.3).expect("bands");
        // step = floor(100 / 2.3) = 43, error = 100 - 1.7 * 43 = 26.9
        assert_eq!(bands.start(0), Some(13.0));
        assert_eq!(bands.start(1), Some(56.0));
        assert_eq!(bands.band_width(), 30.0);
        assert_eq!(bands.start(2), None);
    }
}
