//! Heart-rate extraction from the phase at the tracked range bin.
//!
//! Chest motion from the heartbeat modulates the echo's phase at the
//! target's range bin. The per-chirp phase is unwrapped into a continuous
//! trajectory, detrended to remove slow drift, and transformed at the
//! chirp rate; the dominant component inside the configured BPM band is
//! the estimate.

use ndarray::Array2;
use num_complex::Complex64;

use echo_vitals_core::{HeartRateEstimate, SessionConfig, VitalsError, VitalsResult};
use echo_vitals_dsp::{phase, SpectralEngine};

const STAGE: &str = "heart-rate";

/// Minimum masked-band size for the forward peak search to apply.
const FORWARD_SEARCH_MIN_BINS: usize = 5;

/// Estimate the heart rate from the reordered complex spectra.
///
/// `tracked_bin` is an absolute column of the reordered spectrum, as
/// produced by the tracking stage. Fails with
/// [`VitalsError::NoBandEnergy`] when the BPM band contains no spectral
/// bins for this chirp-rate/length combination; callers must not replace
/// that with a default value.
pub fn estimate(
    reordered_bins: &Array2<Complex64>,
    tracked_bin: usize,
    config: &SessionConfig,
) -> VitalsResult<HeartRateEstimate> {
    let (rows, cols) = reordered_bins.dim();
    if rows == 0 {
        return Err(VitalsError::InsufficientData {
            stage: STAGE,
            required: 1,
            available: 0,
        });
    }
    if tracked_bin >= cols {
        return Err(VitalsError::configuration(format!(
            "tracked bin {tracked_bin} outside spectrum with {cols} bins"
        )));
    }

    // Phase trajectory at the tracked bin, one point per chirp.
    let phases: Vec<f64> = (0..rows)
        .map(|i| reordered_bins[[i, tracked_bin]].arg())
        .collect();
    let unwrapped = phase::unwrap(&phases);
    let detrended = phase::detrend(&unwrapped);

    // The detrended phase is a new signal sampled at the chirp rate.
    let transform_len = detrended.len().next_power_of_two();
    let mut padded = detrended;
    padded.resize(transform_len, 0.0);

    let engine = SpectralEngine::new(transform_len)?;
    let spectrum = engine.transform(&padded)?;

    let chirp_rate_hz = 1.0 / config.chirp_duration_s;
    let bin_to_bpm =
        |bin: usize| bin as f64 * chirp_rate_hz / transform_len as f64 * 60.0;

    let band = config.bpm_band;
    let masked: Vec<usize> = (0..spectrum.magnitudes.len())
        .filter(|&bin| band.contains(bin_to_bpm(bin)))
        .collect();
    if masked.is_empty() {
        return Err(VitalsError::NoBandEnergy {
            low_bpm: band.low,
            high_bpm: band.high,
            available_bins: spectrum.magnitudes.len(),
        });
    }

    let magnitudes: Vec<f64> = masked
        .iter()
        .map(|&bin| spectrum.magnitudes[bin].abs())
        .collect();

    // With a usable band, anchor the search at the bin nearest the lower
    // bound and scan forward; tiny bands are searched whole.
    let peak_index = if magnitudes.len() > FORWARD_SEARCH_MIN_BINS {
        let anchor = masked
            .iter()
            .map(|&bin| (bin_to_bpm(bin) - band.low).abs())
            .enumerate()
            .min_by(|a, b| a.1.partial_cmp(&b.1).expect("band distances are finite"))
            .map_or(0, |(i, _)| i);
        anchor + argmax(&magnitudes[anchor..])
    } else {
        argmax(&magnitudes)
    };

    let winning_bin = masked[peak_index];
    let bpm = bin_to_bpm(winning_bin);
    Ok(HeartRateEstimate {
        bpm,
        frequency_hz: bpm / 60.0,
        spectral_bin: winning_bin,
    })
}

/// Index of the slice's maximum value; ties resolve to the first.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &value) in values.iter().enumerate() {
        if value > best_value {
            best_value = value;
            best = i;
        }
    }
    best
}
