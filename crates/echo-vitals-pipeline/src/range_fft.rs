//! Range-FFT stage: dechirp each received row against its reference and
//! transform the beat signal into a range-bin profile.

use ndarray::Array2;
use rayon::prelude::*;

use echo_vitals_core::{ChirpFrames, RangeSpectra, SessionConfig, VitalsError, VitalsResult};
use echo_vitals_dsp::{LowPassFilter, SpectralEngine, Spectrum};

const STAGE: &str = "range-fft";

/// Per-chirp dechirp + spectral transform.
///
/// Each row is elementwise-multiplied with its reference row (mixing the
/// echo down to a beat signal whose frequency encodes target range),
/// optionally low-pass filtered to suppress high beat-frequency artifacts
/// from far or spurious reflections, then handed to the spectral engine.
/// The filter can be bypassed through the session config; calibration
/// workflows tune against the unfiltered beat signal.
#[derive(Debug)]
pub struct RangeFftStage {
    engine: SpectralEngine,
    lowpass: Option<LowPassFilter>,
}

impl RangeFftStage {
    /// Build the stage for one session.
    ///
    /// The spectral engine is planned for the session's chirp sample
    /// count, which must be a power of two ([`VitalsError::InvalidLength`]
    /// otherwise).
    pub fn new(config: &SessionConfig) -> VitalsResult<Self> {
        let engine = SpectralEngine::new(config.chirp_samples())?;
        let lowpass = if config.lowpass.enabled {
            Some(LowPassFilter::new(
                config.lowpass.cutoff_hz,
                config.sample_rate_hz,
                config.lowpass.order,
            )?)
        } else {
            None
        };
        Ok(Self { engine, lowpass })
    }

    /// Whether the dechirped rows are low-pass filtered.
    #[must_use]
    pub fn filtering(&self) -> bool {
        self.lowpass.is_some()
    }

    /// Process framed chirps into per-chirp range spectra.
    ///
    /// Rows are independent and processed in parallel; each row writes its
    /// own output slot, so row order always matches input order. Fails
    /// with [`VitalsError::ShapeMismatch`] when the rx/tx matrices
    /// disagree and [`VitalsError::InvalidLength`] when the row width does
    /// not match the engine's configured length.
    pub fn process(&self, frames: &ChirpFrames) -> VitalsResult<RangeSpectra> {
        if frames.rx.dim() != frames.tx.dim() {
            let (rx_rows, rx_cols) = frames.rx.dim();
            let (tx_rows, tx_cols) = frames.tx.dim();
            return Err(VitalsError::ShapeMismatch {
                stage: STAGE,
                rx_rows,
                rx_cols,
                tx_rows,
                tx_cols,
            });
        }
        if frames.chirp_samples() != self.engine.length() {
            return Err(VitalsError::InvalidLength {
                stage: STAGE,
                length: frames.chirp_samples(),
                expected: self.engine.length(),
            });
        }

        let spectra: Vec<Spectrum> = (0..frames.chirps())
            .into_par_iter()
            .map(|i| {
                let mixed: Vec<f64> = frames
                    .rx
                    .row(i)
                    .iter()
                    .zip(frames.tx.row(i).iter())
                    .map(|(&r, &t)| r * t)
                    .collect();
                let beat = match &self.lowpass {
                    Some(filter) => filter.apply(&mixed),
                    None => mixed,
                };
                self.engine.transform(&beat)
            })
            .collect::<VitalsResult<Vec<_>>>()?;

        let bins_per_row = self.engine.bins();
        let magnitude = Array2::from_shape_fn((spectra.len(), bins_per_row), |(i, j)| {
            spectra[i].magnitudes[j]
        });
        let bins =
            Array2::from_shape_fn((spectra.len(), bins_per_row), |(i, j)| spectra[i].bins[j]);

        Ok(RangeSpectra { magnitude, bins })
    }
}
