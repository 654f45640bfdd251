//! Batch pipeline entry point.

use tracing::{debug, info, warn};

use echo_vitals_core::{RangeSpectra, SessionConfig, VitalsReport, VitalsResult};

use crate::{clutter, framer, heart_rate, range_fft::RangeFftStage};

/// The synchronous batch pipeline over one finished recording.
///
/// Construction validates the session configuration eagerly, so numeric
/// edge cases (zero sweep bandwidth, zero chirp duration) surface before
/// any array processing. [`run`](VitalsPipeline::run) then consumes the
/// received and reference sample streams and produces a
/// [`VitalsReport`].
///
/// A framing or range-FFT failure short-circuits the whole run; a failure
/// confined to the heart-rate stage is captured inside the report, so the
/// distance/breathing series is still returned.
#[derive(Debug, Clone)]
pub struct VitalsPipeline {
    config: SessionConfig,
}

impl VitalsPipeline {
    /// Create a pipeline for one session, validating the configuration.
    pub fn new(config: SessionConfig) -> VitalsResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The session configuration this pipeline runs with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Process a finished recording.
    ///
    /// `rx` is the mono received stream accumulated over the session;
    /// `tx` is the transmitted reference waveform (at least one chirp of
    /// it).
    pub fn run(&self, rx: &[f64], tx: &[f64]) -> VitalsResult<VitalsReport> {
        let spectra = self.range_spectra(rx, tx)?;
        Ok(self.analyze_spectra(&spectra))
    }

    /// Frame the recording and compute the reordered per-chirp spectra.
    ///
    /// Exposed separately so diagnostic consumers can export the
    /// magnitude matrix before the tracking stages run.
    pub fn range_spectra(&self, rx: &[f64], tx: &[f64]) -> VitalsResult<RangeSpectra> {
        let frames = framer::frame_chirps(rx, tx, &self.config)?;
        debug!(
            chirps = frames.chirps(),
            chirp_samples = frames.chirp_samples(),
            "framed recording"
        );

        let stage = RangeFftStage::new(&self.config)?;
        let spectra = stage.process(&frames)?;

        Ok(RangeSpectra {
            magnitude: clutter::reorder_rows(&spectra.magnitude),
            bins: clutter::reorder_rows(&spectra.bins),
        })
    }

    /// Run the tracking and heart-rate stages over reordered spectra.
    ///
    /// Never fails as a whole: a heart-rate failure is carried inside the
    /// report next to the breathing series.
    #[must_use]
    pub fn analyze_spectra(&self, spectra: &RangeSpectra) -> VitalsReport {
        let tracking = clutter::track(&spectra.magnitude, &self.config);
        info!(
            median_peak = tracking.median_peak,
            tracked_bin = tracking.tracked_bin,
            points = tracking.breathing_m.len(),
            "range tracking complete"
        );

        let heart_rate = heart_rate::estimate(&spectra.bins, tracking.tracked_bin, &self.config);
        match &heart_rate {
            Ok(estimate) => info!(bpm = estimate.bpm, "heart rate estimated"),
            Err(err) => warn!(%err, "heart-rate estimation failed"),
        }

        VitalsReport {
            tracking,
            heart_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echo_vitals_core::VitalsError;

    #[test]
    fn invalid_config_rejected_at_construction() {
        let mut config = SessionConfig::handheld_48k();
        config.freq_high_hz = config.freq_low_hz;
        assert!(matches!(
            VitalsPipeline::new(config),
            Err(VitalsError::Configuration { .. })
        ));
    }

    #[test]
    fn framer_failure_short_circuits() {
        let pipeline = VitalsPipeline::new(SessionConfig::handheld_48k()).unwrap();
        let result = pipeline.run(&[0.0; 100], &[0.0; 8_192]);
        assert!(matches!(
            result,
            Err(VitalsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn non_power_of_two_session_fails_in_range_fft() {
        let config = SessionConfig::builder()
            .sample_rate_hz(1_000.0)
            .chirp_duration_s(0.1) // 100 samples per chirp
            .sweep_hz(100.0, 400.0)
            .warmup_s(0.0)
            .lowpass(echo_vitals_core::LowpassConfig {
                enabled: false,
                cutoff_hz: 200.0,
                order: 4,
            })
            .build()
            .unwrap();
        let pipeline = VitalsPipeline::new(config).unwrap();
        let result = pipeline.run(&vec![0.1; 1_000], &vec![0.1; 100]);
        assert!(matches!(
            result,
            Err(VitalsError::InvalidLength { length: 100, .. })
        ));
    }
}
