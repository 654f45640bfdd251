//! Robust smoothing primitives for tracked range bins and distance series.

/// Median of an integer sequence.
///
/// Even-length inputs average the two middle elements. Returns `None` for
/// an empty input.
#[must_use]
pub fn median(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid] + sorted[mid - 1]) as f64 / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}

/// Sliding median filter with edge-replicate padding.
///
/// Each output index is the median of the window centered there; windows
/// reaching past either end repeat the first/last element. `size` is the
/// nominal (odd) window length. Inputs shorter than the window produce an
/// empty output.
#[must_use]
pub fn median_filter(values: &[i64], size: usize) -> Vec<i64> {
    if size == 0 || values.len() < size {
        return Vec::new();
    }
    let pad = size / 2;
    let mut padded = Vec::with_capacity(values.len() + 2 * pad);
    padded.extend(std::iter::repeat(values[0]).take(pad));
    padded.extend_from_slice(values);
    padded.extend(std::iter::repeat(values[values.len() - 1]).take(pad));

    (pad..padded.len() - pad)
        .map(|i| {
            let mut window: Vec<i64> = padded[i - pad..=i + pad].to_vec();
            window.sort_unstable();
            window[pad]
        })
        .collect()
}

/// Trailing moving average.
///
/// The first output is the mean of the first `size` samples; each later
/// output slides the window forward by one, so the output has
/// `len - size + 1` points. Inputs shorter than the window produce an
/// empty output.
#[must_use]
pub fn moving_average(values: &[f64], size: usize) -> Vec<f64> {
    if size == 0 || values.len() < size {
        return Vec::new();
    }
    let mut result = Vec::with_capacity(values.len() - size + 1);
    let mut window_sum: f64 = values[..size].iter().sum();
    result.push(window_sum / size as f64);

    for i in size..values.len() {
        window_sum += values[i] - values[i - size];
        result.push(window_sum / size as f64);
    }
    result
}
