//! Phase trajectory utilities: unwrapping and least-squares detrending.

use std::f64::consts::PI;

/// Unwrap a wrapped phase sequence into a continuous trajectory.
///
/// Walks the sequence in order; whenever the forward difference from the
/// previous unwrapped value exceeds `+pi` or falls below `-pi`, a single
/// `2*pi` is subtracted or added before accumulating.
#[must_use]
pub fn unwrap(phases: &[f64]) -> Vec<f64> {
    let mut unwrapped = Vec::with_capacity(phases.len());
    let Some(&first) = phases.first() else {
        return unwrapped;
    };
    unwrapped.push(first);

    let mut last = first;
    for &phase in &phases[1..] {
        let mut diff = phase - last;
        if diff > PI {
            diff -= 2.0 * PI;
        } else if diff < -PI {
            diff += 2.0 * PI;
        }
        last += diff;
        unwrapped.push(last);
    }
    unwrapped
}

/// Closed-form ordinary-least-squares slope of `y` against its index.
///
/// Returns 0 for sequences shorter than two points.
#[must_use]
pub fn linear_slope(y: &[f64]) -> f64 {
    let n = y.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = y.iter().enumerate().map(|(i, &v)| i as f64 * v).sum();
    let sum_x2: f64 = (0..n).map(|i| (i * i) as f64).sum();
    (nf * sum_xy - sum_x * sum_y) / (nf * sum_x2 - sum_x * sum_x)
}

/// Remove the fitted linear trend from a sequence.
///
/// Subtracts `slope * i` from each sample, leaving the intercept; a
/// purely linear input `c + k*i` therefore becomes the constant `c`.
#[must_use]
pub fn detrend(y: &[f64]) -> Vec<f64> {
    let slope = linear_slope(y);
    y.iter()
        .enumerate()
        .map(|(i, &v)| v - slope * i as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Wrap a value into (-pi, pi].
    fn wrap(value: f64) -> f64 {
        let mut v = value % (2.0 * PI);
        if v > PI {
            v -= 2.0 * PI;
        } else if v <= -PI {
            v += 2.0 * PI;
        }
        v
    }

    #[test]
    fn unwrap_restores_linear_ramp() {
        // A steadily advancing phase that wraps several times
        let true_phase: Vec<f64> = (0..200).map(|i| i as f64 * 0.3).collect();
        let wrapped: Vec<f64> = true_phase.iter().map(|&p| wrap(p)).collect();
        let unwrapped = unwrap(&wrapped);

        for (u, t) in unwrapped.iter().zip(&true_phase) {
            assert!((u - t).abs() < 1e-9, "unwrapped {u} vs true {t}");
        }
    }

    #[test]
    fn unwrap_roundtrip_mod_two_pi() {
        let wrapped: Vec<f64> = (0..150).map(|i| wrap(i as f64 * -0.47)).collect();
        let unwrapped = unwrap(&wrapped);
        for (u, w) in unwrapped.iter().zip(&wrapped) {
            assert!((wrap(*u) - w).abs() < 1e-9);
        }
    }

    #[test]
    fn unwrap_handles_trivial_inputs() {
        assert!(unwrap(&[]).is_empty());
        assert_eq!(unwrap(&[1.5]), vec![1.5]);
    }

    #[test]
    fn slope_of_known_line() {
        let y: Vec<f64> = (0..50).map(|i| 2.0 + 0.75 * i as f64).collect();
        assert!((linear_slope(&y) - 0.75).abs() < 1e-10);
    }

    #[test]
    fn slope_degenerate_inputs() {
        assert_eq!(linear_slope(&[]), 0.0);
        assert_eq!(linear_slope(&[3.0]), 0.0);
    }

    #[test]
    fn detrend_removes_exact_linear_trend() {
        let c = 1.25;
        let k = -0.4;
        let y: Vec<f64> = (0..80).map(|i| c + k * i as f64).collect();
        let detrended = detrend(&y);
        for value in detrended {
            assert!((value - c).abs() < 1e-9, "expected constant {c}, got {value}");
        }
    }

    #[test]
    fn detrend_preserves_oscillation() {
        // Sinusoid on top of a slope: the slope goes, the sinusoid stays
        let y: Vec<f64> = (0..256)
            .map(|i| 0.1 * i as f64 + (i as f64 * 0.5).sin())
            .collect();
        let detrended = detrend(&y);
        let range = detrended.iter().cloned().fold(f64::MIN, f64::max)
            - detrended.iter().cloned().fold(f64::MAX, f64::min);
        assert!(range > 1.5, "oscillation should survive detrending");
    }
}
