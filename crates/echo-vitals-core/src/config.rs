//! Session configuration for an EchoVitals recording.
//!
//! A [`SessionConfig`] describes everything the pipeline needs to know
//! about how a recording was made: sample rate, chirp timing, sweep
//! bounds, warm-up trim, the optional dechirp low-pass filter, and the
//! heart-rate search band. Validation happens up front via
//! [`SessionConfig::validate`] so numeric edge cases (zero sweep
//! bandwidth, zero chirp duration) never reach the array processing.

use serde::{Deserialize, Serialize};

use crate::error::{VitalsError, VitalsResult};

/// Heart-rate search band in beats per minute, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BpmBand {
    /// Lower bound (BPM).
    pub low: f64,
    /// Upper bound (BPM).
    pub high: f64,
}

impl Default for BpmBand {
    fn default() -> Self {
        Self {
            low: 40.0,
            high: 200.0,
        }
    }
}

impl BpmBand {
    /// Whether a BPM value falls inside the band.
    #[must_use]
    pub fn contains(&self, bpm: f64) -> bool {
        bpm >= self.low && bpm <= self.high
    }
}

/// Configuration of the dechirp low-pass filter.
///
/// The filter suppresses high beat-frequency artifacts from far or
/// spurious reflections before spectral analysis. It can be bypassed
/// entirely, which calibration workflows rely on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowpassConfig {
    /// Apply the filter to each dechirped row when `true`.
    pub enabled: bool,
    /// Cutoff frequency in Hz.
    pub cutoff_hz: f64,
    /// Filter order.
    pub order: usize,
}

impl Default for LowpassConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cutoff_hz: 5_000.0,
            order: 5,
        }
    }
}

/// Parameters of one recording session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Audio sample rate in Hz.
    pub sample_rate_hz: f64,
    /// Duration of one chirp in seconds.
    pub chirp_duration_s: f64,
    /// Sweep start frequency in Hz.
    pub freq_low_hz: f64,
    /// Sweep end frequency in Hz.
    pub freq_high_hz: f64,
    /// Leading interval dropped from the recording, in seconds, to
    /// exclude transient/coupling artifacts.
    pub warmup_s: f64,
    /// Dechirp low-pass filter settings.
    pub lowpass: LowpassConfig,
    /// Heart-rate search band.
    pub bpm_band: BpmBand,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::handheld_48k()
    }
}

impl SessionConfig {
    /// Preset for handheld phone/laptop hardware at 48 kHz.
    ///
    /// The chirp duration is chosen so one chirp spans exactly 4096
    /// samples, which the spectral engine requires. The sweep covers
    /// 1-23 kHz, staying below the Nyquist limit while keeping most of
    /// the band above common ambient noise.
    #[must_use]
    pub fn handheld_48k() -> Self {
        Self {
            sample_rate_hz: 48_000.0,
            chirp_duration_s: 4096.0 / 48_000.0,
            freq_low_hz: 1_000.0,
            freq_high_hz: 23_000.0,
            warmup_s: 1.0,
            lowpass: LowpassConfig::default(),
            bpm_band: BpmBand::default(),
        }
    }

    /// Create a new config builder starting from the 48 kHz preset.
    #[must_use]
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::new()
    }

    /// Number of samples in one chirp (`round(duration * rate)`).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn chirp_samples(&self) -> usize {
        (self.chirp_duration_s * self.sample_rate_hz).round() as usize
    }

    /// Number of leading chirps removed by the warm-up trim.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn warmup_chirps(&self) -> usize {
        (self.warmup_s / self.chirp_duration_s).floor() as usize
    }

    /// Sweep bandwidth in Hz.
    #[must_use]
    pub fn sweep_bandwidth_hz(&self) -> f64 {
        self.freq_high_hz - self.freq_low_hz
    }

    /// Sweep rate in Hz/s (bandwidth over chirp duration).
    #[must_use]
    pub fn sweep_rate(&self) -> f64 {
        self.sweep_bandwidth_hz() / self.chirp_duration_s
    }

    /// Validate the configuration.
    ///
    /// Catches every numeric edge case that would otherwise surface as a
    /// division by zero or nonsense output mid-pipeline.
    pub fn validate(&self) -> VitalsResult<()> {
        if !(self.sample_rate_hz > 0.0) {
            return Err(VitalsError::configuration("sample_rate_hz must be positive"));
        }
        if !(self.chirp_duration_s > 0.0) {
            return Err(VitalsError::configuration(
                "chirp_duration_s must be positive",
            ));
        }
        if self.chirp_samples() == 0 {
            return Err(VitalsError::configuration(
                "chirp_duration_s * sample_rate_hz rounds to zero samples per chirp",
            ));
        }
        if !(self.sweep_bandwidth_hz() > 0.0) {
            return Err(VitalsError::configuration(
                "sweep bandwidth (freq_high_hz - freq_low_hz) must be positive",
            ));
        }
        if self.freq_low_hz < 0.0 {
            return Err(VitalsError::configuration("freq_low_hz must not be negative"));
        }
        if self.warmup_s < 0.0 {
            return Err(VitalsError::configuration("warmup_s must not be negative"));
        }
        if self.lowpass.enabled {
            if self.lowpass.order == 0 {
                return Err(VitalsError::configuration("lowpass order must be at least 1"));
            }
            let nyquist = self.sample_rate_hz / 2.0;
            if !(self.lowpass.cutoff_hz > 0.0) || self.lowpass.cutoff_hz >= nyquist {
                return Err(VitalsError::configuration(format!(
                    "lowpass cutoff {} Hz must lie in (0, {nyquist}) Hz",
                    self.lowpass.cutoff_hz
                )));
            }
        }
        if !(self.bpm_band.low > 0.0) || self.bpm_band.high <= self.bpm_band.low {
            return Err(VitalsError::configuration(format!(
                "BPM band [{}, {}] must satisfy 0 < low < high",
                self.bpm_band.low, self.bpm_band.high
            )));
        }
        Ok(())
    }
}

/// Builder for [`SessionConfig`].
#[derive(Debug)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl Default for SessionConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfigBuilder {
    /// Create a new builder seeded with the 48 kHz preset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SessionConfig::handheld_48k(),
        }
    }

    /// Set the sample rate in Hz.
    #[must_use]
    pub fn sample_rate_hz(mut self, rate: f64) -> Self {
        self.config.sample_rate_hz = rate;
        self
    }

    /// Set the chirp duration in seconds.
    #[must_use]
    pub fn chirp_duration_s(mut self, duration: f64) -> Self {
        self.config.chirp_duration_s = duration;
        self
    }

    /// Set the sweep bounds in Hz.
    #[must_use]
    pub fn sweep_hz(mut self, low: f64, high: f64) -> Self {
        self.config.freq_low_hz = low;
        self.config.freq_high_hz = high;
        self
    }

    /// Set the warm-up interval in seconds.
    #[must_use]
    pub fn warmup_s(mut self, warmup: f64) -> Self {
        self.config.warmup_s = warmup;
        self
    }

    /// Set the dechirp low-pass configuration.
    #[must_use]
    pub fn lowpass(mut self, lowpass: LowpassConfig) -> Self {
        self.config.lowpass = lowpass;
        self
    }

    /// Set the heart-rate search band in BPM.
    #[must_use]
    pub fn bpm_band(mut self, low: f64, high: f64) -> Self {
        self.config.bpm_band = BpmBand { low, high };
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> VitalsResult<SessionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_is_valid() {
        let config = SessionConfig::handheld_48k();
        assert!(config.validate().is_ok());
        assert_eq!(config.chirp_samples(), 4096);
        assert!(config.chirp_samples().is_power_of_two());
    }

    #[test]
    fn warmup_chirps_floor() {
        let config = SessionConfig::builder()
            .sample_rate_hz(48_000.0)
            .chirp_duration_s(0.3)
            .warmup_s(1.0)
            .build()
            .unwrap();
        // 1.0 / 0.3 = 3.33 -> 3 chirps dropped
        assert_eq!(config.warmup_chirps(), 3);
    }

    #[test]
    fn zero_bandwidth_rejected() {
        let result = SessionConfig::builder().sweep_hz(5_000.0, 5_000.0).build();
        assert!(matches!(result, Err(VitalsError::Configuration { .. })));
    }

    #[test]
    fn zero_chirp_duration_rejected() {
        let result = SessionConfig::builder().chirp_duration_s(0.0).build();
        assert!(matches!(result, Err(VitalsError::Configuration { .. })));
    }

    #[test]
    fn cutoff_above_nyquist_rejected() {
        let result = SessionConfig::builder()
            .lowpass(LowpassConfig {
                enabled: true,
                cutoff_hz: 30_000.0,
                order: 5,
            })
            .build();
        assert!(matches!(result, Err(VitalsError::Configuration { .. })));
    }

    #[test]
    fn bypassed_filter_skips_cutoff_check() {
        let result = SessionConfig::builder()
            .lowpass(LowpassConfig {
                enabled: false,
                cutoff_hz: 30_000.0,
                order: 5,
            })
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn inverted_bpm_band_rejected() {
        let result = SessionConfig::builder().bpm_band(200.0, 40.0).build();
        assert!(matches!(result, Err(VitalsError::Configuration { .. })));
    }

    #[test]
    fn bpm_band_contains_is_inclusive() {
        let band = BpmBand::default();
        assert!(band.contains(40.0));
        assert!(band.contains(200.0));
        assert!(!band.contains(39.99));
        assert!(!band.contains(200.01));
    }

    #[test]
    fn sweep_rate_matches_definition() {
        let config = SessionConfig::handheld_48k();
        let expected = (23_000.0 - 1_000.0) / config.chirp_duration_s;
        assert!((config.sweep_rate() - expected).abs() < 1e-9);
    }

    #[test]
    fn serde_roundtrip() {
        let config = SessionConfig::handheld_48k();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
