use crate::core::Sample;

/// Returns the samples whose x falls inside an inclusive window.
///
/// `samples` must be sorted ascending by x.
#[must_use]
pub fn samples_in_window(samples: &[Sample], start: f64, end: f64) -> &[Sample] {
    let (min_x, max_x) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };

    let first = samples.partition_point(|sample| sample.x < min_x);
    let last = samples.partition_point(|sample| sample.x <= max_x);
    if last <= first {
        return &[];
    }
    &samples[first..last]
}

/// Like [`samples_in_window`] but keeps up to `overscan` extra samples on each
/// side, so connected geometry reaches the window edges.
#[must_use]
pub fn samples_in_window_with_overscan(
    samples: &[Sample],
    start: f64,
    end: f64,
    overscan: usize,
) -> &[Sample] {
    let (min_x, max_x) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };

    let first = samples
        .partition_point(|sample| sample.x < min_x)
        .saturating_sub(overscan);
    let last = samples
        .partition_point(|sample| sample.x <= max_x)
        .saturating_add(overscan)
        .min(samples.len());
    if last <= first {
        return &[];
    }
    &samples[first..last]
}

/// Largest y among samples inside the window, `0.0` when the window is empty.
#[must_use]
pub fn max_value_in_window(samples: &[Sample], start: f64, end: f64) -> f64 {
    samples_in_window(samples, start, end)
        .iter()
        .map(|sample| sample.y)
        .filter(|y| y.is_finite())
        .fold(None, |best: Option<f64>, y| Some(best.map_or(y, |b| b.max(y))))
        .unwrap_or(0.0)
}
