//! Real-input spectral transform.
//!
//! Wraps a planned [`rustfft`] forward transform of a fixed power-of-two
//! length. One call produces both the one-sided magnitude spectrum and the
//! underlying complex bins; phase cannot be recovered from magnitudes
//! alone, so the two views are always returned together. Bins are scaled
//! by `1/length` so the DC bin equals the signal mean.

use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use echo_vitals_core::{VitalsError, VitalsResult};

/// One-sided spectrum of a real signal: `length/2` bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Per-bin magnitudes.
    pub magnitudes: Vec<f64>,
    /// Per-bin complex values (scaled by `1/length`).
    pub bins: Vec<Complex64>,
}

/// Reusable real-input FFT of a fixed length.
///
/// The transform is planned once at construction and may be applied to any
/// number of signals of the configured length, including concurrently.
pub struct SpectralEngine {
    length: usize,
    fft: Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for SpectralEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralEngine")
            .field("length", &self.length)
            .finish()
    }
}

impl SpectralEngine {
    /// Plan a transform of the given length.
    ///
    /// The length must be a power of two; anything else is rejected with
    /// [`VitalsError::InvalidLength`] rather than silently padded.
    pub fn new(length: usize) -> VitalsResult<Self> {
        if length == 0 || !length.is_power_of_two() {
            return Err(VitalsError::InvalidLength {
                stage: "spectral-engine",
                length,
                expected: length,
            });
        }
        let fft = FftPlanner::new().plan_fft_forward(length);
        Ok(Self { length, fft })
    }

    /// Configured transform length.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of one-sided output bins (`length / 2`).
    #[must_use]
    pub fn bins(&self) -> usize {
        self.length / 2
    }

    /// Transform one real signal of the configured length.
    ///
    /// A signal of any other length is rejected, not truncated or padded.
    pub fn transform(&self, signal: &[f64]) -> VitalsResult<Spectrum> {
        if signal.len() != self.length {
            return Err(VitalsError::InvalidLength {
                stage: "spectral-engine",
                length: signal.len(),
                expected: self.length,
            });
        }

        let mut buffer: Vec<Complex64> =
            signal.iter().map(|&s| Complex64::new(s, 0.0)).collect();
        self.fft.process(&mut buffer);

        let scale = 1.0 / self.length as f64;
        let bins: Vec<Complex64> = buffer[..self.length / 2]
            .iter()
            .map(|&c| c * scale)
            .collect();
        let magnitudes: Vec<f64> = bins.iter().map(|c| c.norm()).collect();

        Ok(Spectrum { magnitudes, bins })
    }
}
