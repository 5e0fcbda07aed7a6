use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Sample;

/// Forward/inverse mapping between data x values and pixels.
pub trait Projector {
    fn project(&self, x: f64) -> f64;
    fn invert(&self, pixel: f64) -> f64;
}

/// Plain `pixel = x * scale + offset` projector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearProjector {
    pub scale: f64,
    pub offset: f64,
}

impl LinearProjector {
    #[must_use]
    pub fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    #[must_use]
    pub fn identity() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl Projector for LinearProjector {
    fn project(&self, x: f64) -> f64 {
        x * self.scale + self.offset
    }

    fn invert(&self, pixel: f64) -> f64 {
        (pixel - self.offset) / self.scale
    }
}

/// How a pointer position resolves to a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LocateMode {
    /// Closest sample by projected x.
    #[default]
    Nearest,
    /// Only the sample whose x equals `invert(pixel)`.
    Exact,
    /// The exact sample when one exists, otherwise the closest one.
    ExactOrNearest,
}

/// Resolves `query_px` to a sample of `series` according to `mode`.
///
/// `series` must be sorted ascending by x. Runs in O(log n).
#[must_use]
pub fn locate<P: Projector + ?Sized>(
    series: &[Sample],
    query_px: f64,
    projector: &P,
    mode: LocateMode,
) -> Option<Sample> {
    match mode {
        LocateMode::Nearest => locate_nearest(series, query_px, projector),
        LocateMode::Exact => locate_exact(series, query_px, projector),
        LocateMode::ExactOrNearest => locate_exact(series, query_px, projector)
            .or_else(|| locate_nearest(series, query_px, projector)),
    }
}

/// Sample whose x equals the data value under `query_px`, if any.
#[must_use]
pub fn locate_exact<P: Projector + ?Sized>(
    series: &[Sample],
    query_px: f64,
    projector: &P,
) -> Option<Sample> {
    let x = projector.invert(query_px);
    if !x.is_finite() {
        return None;
    }
    series
        .binary_search_by(|sample| sample.x.total_cmp(&x))
        .ok()
        .map(|index| series[index])
}

/// Binary search for the sample closest to `query_px` in pixel space.
///
/// Narrows `[left, right]` until `query_px` lies between the projected
/// neighbours of the midpoint, then picks the closest of the three. Ties go to
/// the left-most candidate. Returns `None` for an empty series or when no
/// midpoint brackets the query (e.g. the query lies outside the series).
#[must_use]
pub fn locate_nearest<P: Projector + ?Sized>(
    series: &[Sample],
    query_px: f64,
    projector: &P,
) -> Option<Sample> {
    if series.is_empty() || !query_px.is_finite() {
        return None;
    }

    let last = series.len() - 1;
    let mut left = 0usize;
    let mut right = last;
    loop {
        let mid = left + (right - left) / 2;
        let prev = mid.saturating_sub(1);
        let next = (mid + 1).min(last);

        let mid_px = projector.project(series[mid].x);
        let prev_px = projector.project(series[prev].x);
        let next_px = projector.project(series[next].x);

        if prev_px <= query_px && query_px <= next_px {
            let mut candidates: SmallVec<[usize; 3]> = SmallVec::new();
            for index in [prev, mid, next] {
                if !candidates.contains(&index) {
                    candidates.push(index);
                }
            }
            // `min_by_key` keeps the first minimum, so ties resolve leftwards.
            return candidates
                .into_iter()
                .min_by_key(|&index| {
                    OrderedFloat((projector.project(series[index].x) - query_px).abs())
                })
                .map(|index| series[index]);
        }

        if query_px < mid_px {
            if mid == 0 || mid - 1 < left {
                return None;
            }
            right = mid - 1;
        } else {
            if mid + 1 > right {
                return None;
            }
            left = mid + 1;
        }
    }
}
