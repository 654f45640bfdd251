//! Clutter removal and range-bin tracking.
//!
//! Consecutive-chirp differencing removes static reflections (walls,
//! furniture, the direct speaker-to-microphone path), leaving only
//! moving-target energy. The dominant static bin anchors a re-tracking
//! window; within it, each difference row's maximum gives the per-chirp
//! target bin, which is median-filtered, converted to a directed offset,
//! mapped to meters through the FMCW range equation, and finally smoothed
//! with a trailing moving average.

use ndarray::{Array2, ArrayView1};

use echo_vitals_core::{SessionConfig, TrackingResult, SPEED_OF_SOUND};
use echo_vitals_dsp::smoothing;

/// Width of the re-tracking window, in range bins.
pub const PEAK_WINDOW_SIZE: usize = 100;

/// Median filter length applied to per-chirp tracked bins.
pub const MEDIAN_FILTER_LEN: usize = 7;

/// Trailing moving-average length applied to the distance series.
pub const MOVING_AVERAGE_LEN: usize = 5;

/// Rotate every row so its second half precedes its first half.
///
/// A fixed circular rotation by `cols / 2`, applied identically to every
/// row, aligning the bin indexing convention with the range equation
/// (the zero-beat bin lands at column `cols / 2`).
#[must_use]
pub fn reorder_rows<T: Clone>(matrix: &Array2<T>) -> Array2<T> {
    let (_, cols) = matrix.dim();
    if cols == 0 {
        return matrix.clone();
    }
    let pivot = cols - cols / 2;
    Array2::from_shape_fn(matrix.dim(), |(i, j)| {
        matrix[[i, (j + pivot) % cols]].clone()
    })
}

/// Elementwise difference of consecutive rows: `diff[i] = m[i+1] - m[i]`.
///
/// Produces `rows - 1` rows; static clutter common to consecutive chirps
/// cancels exactly.
#[must_use]
pub fn background_subtract(matrix: &Array2<f64>) -> Array2<f64> {
    let (rows, cols) = matrix.dim();
    Array2::from_shape_fn((rows.saturating_sub(1), cols), |(i, j)| {
        matrix[[i + 1, j]] - matrix[[i, j]]
    })
}

/// Index of the row's maximum value; ties resolve to the first.
fn argmax(row: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &value) in row.iter().enumerate() {
        if value > best_value {
            best_value = value;
            best = i;
        }
    }
    best
}

/// Convert a directed range-bin offset to meters.
///
/// Beat frequency `delta_f = offset * fs / N` (with `N` the full
/// transform length), and range `= delta_f * c / (2 * sweep_rate)`.
#[must_use]
pub fn offset_to_distance(offset: i64, config: &SessionConfig) -> f64 {
    let transform_len = config.chirp_samples() as f64;
    let delta_f = offset as f64 * config.sample_rate_hz / transform_len;
    delta_f * SPEED_OF_SOUND / (2.0 * config.sweep_rate())
}

/// Track the dominant range bin across chirps and produce the smoothed
/// distance/breathing series.
///
/// Expects the reordered magnitude matrix from [`reorder_rows`]. Never
/// fails: degenerate inputs (too few chirps for the smoothing windows)
/// yield empty series.
#[must_use]
pub fn track(reordered: &Array2<f64>, config: &SessionConfig) -> TrackingResult {
    let (rows, cols) = reordered.dim();

    // Per-chirp dominant bin of the raw profile; the median across chirps
    // guards against transient outliers.
    let peaks: Vec<i64> = (0..rows)
        .map(|i| argmax(reordered.row(i)) as i64)
        .collect();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let median_peak = smoothing::median(&peaks).unwrap_or(0.0) as usize;

    let window_start = median_peak.saturating_sub(PEAK_WINDOW_SIZE / 2);
    let window_end = (window_start + PEAK_WINDOW_SIZE).min(cols);

    // Moving-target energy only: the re-tracking window is applied to the
    // difference rows, not the raw profile.
    let diff = background_subtract(reordered);
    let window_peaks: Vec<i64> = (0..diff.nrows())
        .map(|i| {
            let row = diff.row(i);
            argmax(row.slice(ndarray::s![window_start..window_end])) as i64
        })
        .collect();

    let smoothed = smoothing::median_filter(&window_peaks, MEDIAN_FILTER_LEN);
    let bins: Vec<usize> = smoothed
        .iter()
        .map(|&w| (w + window_start as i64) as usize)
        .collect();
    let offsets: Vec<i64> = bins.iter().map(|&b| b as i64 - median_peak as i64).collect();

    let absolute: Vec<i64> = bins.iter().map(|&b| b as i64).collect();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let tracked_bin = smoothing::median(&absolute)
        .map_or(median_peak, |m| m as usize);

    let distance_m: Vec<f64> = offsets
        .iter()
        .map(|&offset| offset_to_distance(offset, config))
        .collect();
    let breathing_m = smoothing::moving_average(&distance_m, MOVING_AVERAGE_LEN);

    TrackingResult {
        median_peak,
        window_start,
        bins,
        offsets,
        tracked_bin,
        distance_m,
        breathing_m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn config() -> SessionConfig {
        SessionConfig::builder()
            .sample_rate_hz(1_024.0)
            .chirp_duration_s(256.0 / 1_024.0)
            .sweep_hz(100.0, 400.0)
            .warmup_s(0.0)
            .lowpass(echo_vitals_core::LowpassConfig {
                enabled: false,
                cutoff_hz: 200.0,
                order: 4,
            })
            .build()
            .unwrap()
    }

    #[test]
    fn reorder_swaps_halves() {
        let matrix = array![[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0]];
        let reordered = reorder_rows(&matrix);
        assert_eq!(reordered, array![[3.0, 4.0, 1.0, 2.0], [7.0, 8.0, 5.0, 6.0]]);
    }

    #[test]
    fn reorder_applies_same_rotation_to_every_row() {
        let matrix = Array2::from_shape_fn((3, 8), |(i, j)| (i * 8 + j) as f64);
        let reordered = reorder_rows(&matrix);
        for i in 0..3 {
            for j in 0..8 {
                assert_eq!(reordered[[i, j]], matrix[[i, (j + 4) % 8]]);
            }
        }
    }

    #[test]
    fn background_subtract_is_exact_row_difference() {
        let matrix = Array2::from_shape_fn((5, 6), |(i, j)| (i * i + j) as f64);
        let diff = background_subtract(&matrix);
        assert_eq!(diff.dim(), (4, 6));
        for i in 0..4 {
            for j in 0..6 {
                assert_eq!(diff[[i, j]], matrix[[i + 1, j]] - matrix[[i, j]]);
            }
        }
    }

    #[test]
    fn background_subtract_single_row_is_empty() {
        let diff = background_subtract(&Array2::ones((1, 4)));
        assert_eq!(diff.nrows(), 0);
    }

    #[test]
    fn static_scene_cancels_exactly() {
        let row: Vec<f64> = (0..16).map(|j| (j as f64).sin().abs()).collect();
        let matrix = Array2::from_shape_fn((6, 16), |(_, j)| row[j]);
        let diff = background_subtract(&matrix);
        assert!(diff.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn argmax_first_max_wins() {
        let row = array![1.0, 5.0, 5.0, -2.0];
        assert_eq!(argmax(row.view()), 1);
        let negative = array![-3.0, -1.0, -2.0];
        assert_eq!(argmax(negative.view()), 1);
    }

    #[test]
    fn offset_to_distance_follows_range_equation() {
        let config = config();
        // delta_f = 10 * 1024 / 256 = 40 Hz; sweep rate = 300 / 0.25 Hz/s
        let expected = 40.0 * SPEED_OF_SOUND / (2.0 * (300.0 / 0.25));
        assert!((offset_to_distance(10, &config) - expected).abs() < 1e-9);
        assert_eq!(offset_to_distance(0, &config), 0.0);
        assert!(offset_to_distance(-10, &config) < 0.0);
    }

    #[test]
    fn track_locates_moving_bin() {
        // 128 range bins; static clutter at bin 64, moving energy whose
        // difference signature sits at bin 70.
        let rows = 20;
        let cols = 128;
        let matrix = Array2::from_shape_fn((rows, cols), |(i, j)| {
            let clutter = if j == 64 { 10.0 } else { 0.0 };
            // Swelling magnitude at bin 70 so every consecutive diff peaks there
            let moving = if j == 70 { 2.0 + 0.1 * i as f64 } else { 0.0 };
            clutter + moving
        });

        let result = track(&matrix, &config());
        assert_eq!(result.median_peak, 64);
        assert_eq!(result.window_start, 14);
        assert_eq!(result.tracked_bin, 70);
        assert!(result.offsets.iter().all(|&o| o == 6));
        let expected = offset_to_distance(6, &config());
        assert!(result
            .breathing_m
            .iter()
            .all(|&d| (d - expected).abs() < 1e-12));
        assert_eq!(result.breathing_m.len(), result.distance_m.len() - 4);
    }

    #[test]
    fn track_window_clamps_to_available_columns() {
        // Only 8 columns: the 100-wide window must clamp, not fail.
        let matrix = Array2::from_shape_fn((10, 8), |(i, j)| {
            if j == 2 {
                5.0 + (i % 2) as f64
            } else {
                0.0
            }
        });
        let result = track(&matrix, &config());
        assert_eq!(result.window_start, 0);
        assert!(result.bins.iter().all(|&b| b < 8));
    }

    #[test]
    fn track_too_few_chirps_yields_empty_series() {
        let matrix = Array2::from_shape_fn((4, 32), |(_, j)| if j == 16 { 3.0 } else { 0.0 });
        let result = track(&matrix, &config());
        // 3 difference rows < median window of 7
        assert!(result.bins.is_empty());
        assert!(result.distance_m.is_empty());
        assert!(result.breathing_m.is_empty());
        // Tracking still reports a usable bin for the heart-rate stage
        assert_eq!(result.tracked_bin, result.median_peak);
        assert_eq!(result.median_peak, 16);
    }
}
