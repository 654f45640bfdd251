//! Linear swept-sine (chirp) synthesis.
//!
//! Regenerates the transmitted reference waveform from session sweep
//! parameters, so a caller holding only the synthesis parameters can
//! align against the same chirp the speaker played.

use std::f64::consts::PI;

use echo_vitals_core::SessionConfig;

/// Synthesize one linear up-chirp as real samples.
///
/// The instantaneous frequency sweeps linearly from `freq_start_hz` to
/// `freq_end_hz` over `duration_s`; the sample phase is the integral of
/// the instantaneous frequency:
///
/// ```text
/// phi(t) = 2*pi * (f0*t + 0.5 * (f1 - f0)/T * t^2)
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn linear_chirp(
    freq_start_hz: f64,
    freq_end_hz: f64,
    duration_s: f64,
    sample_rate_hz: f64,
) -> Vec<f64> {
    let n = (duration_s * sample_rate_hz).round() as usize;
    let dt = 1.0 / sample_rate_hz;
    let sweep_rate = (freq_end_hz - freq_start_hz) / duration_s;

    (0..n)
        .map(|i| {
            let t = i as f64 * dt;
            let phase = 2.0 * PI * (freq_start_hz * t + 0.5 * sweep_rate * t * t);
            phase.sin()
        })
        .collect()
}

/// Synthesize the reference chirp for one session configuration.
#[must_use]
pub fn reference_chirp(config: &SessionConfig) -> Vec<f64> {
    linear_chirp(
        config.freq_low_hz,
        config.freq_high_hz,
        config.chirp_duration_s,
        config.sample_rate_hz,
    )
}
