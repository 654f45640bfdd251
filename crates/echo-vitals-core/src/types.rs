//! Domain types for the EchoVitals pipeline.
//!
//! Every type here is a derived, read-only transform of the original
//! recording: each stage consumes an immutable input and produces a
//! freshly allocated output, so ownership transfers wholesale between
//! stages and nothing is mutated after handoff.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::VitalsError;

/// Received/reference sample streams sliced into aligned chirp rows.
///
/// Rows are chirps in time order (row 0 is the earliest retained chirp),
/// columns are sample offsets within a chirp. Both matrices always share
/// the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ChirpFrames {
    /// Received chirp rows.
    pub rx: Array2<f64>,
    /// Reference (transmitted) chirp rows; every row is identical by
    /// construction since the reference waveform is periodic.
    pub tx: Array2<f64>,
}

impl ChirpFrames {
    /// Create chirp frames, validating that both matrices share a shape.
    pub fn new(rx: Array2<f64>, tx: Array2<f64>) -> Result<Self, VitalsError> {
        if rx.dim() != tx.dim() {
            let (rx_rows, rx_cols) = rx.dim();
            let (tx_rows, tx_cols) = tx.dim();
            return Err(VitalsError::ShapeMismatch {
                stage: "chirp-frames",
                rx_rows,
                rx_cols,
                tx_rows,
                tx_cols,
            });
        }
        Ok(Self { rx, tx })
    }

    /// Number of retained chirps.
    #[must_use]
    pub fn chirps(&self) -> usize {
        self.rx.nrows()
    }

    /// Samples per chirp.
    #[must_use]
    pub fn chirp_samples(&self) -> usize {
        self.rx.ncols()
    }
}

/// Per-chirp range spectra: one magnitude row and one complex-bin row per
/// chirp, produced together by the spectral engine.
///
/// The complex view is retained alongside the magnitudes because phase
/// cannot be recovered from magnitude alone; the heart-rate stage needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSpectra {
    /// Spectral magnitudes, chirps x range-bins.
    pub magnitude: Array2<f64>,
    /// Complex spectrum, same shape as `magnitude`.
    pub bins: Array2<Complex64>,
}

impl RangeSpectra {
    /// Number of chirps (rows).
    #[must_use]
    pub fn chirps(&self) -> usize {
        self.magnitude.nrows()
    }

    /// Number of range bins (columns).
    #[must_use]
    pub fn range_bins(&self) -> usize {
        self.magnitude.ncols()
    }
}

/// Output of the clutter-removal and range-tracking stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingResult {
    /// Median of the per-chirp dominant bins of the reordered profile.
    pub median_peak: usize,
    /// First column of the re-tracking window.
    pub window_start: usize,
    /// Per-chirp tracked range bin (absolute column in the reordered
    /// spectrum), after median-filter smoothing. Empty when fewer chirps
    /// than the smoothing window exist.
    pub bins: Vec<usize>,
    /// Per-chirp directed range-bin offsets relative to `median_peak`.
    pub offsets: Vec<i64>,
    /// Single bin index handed to the heart-rate stage.
    pub tracked_bin: usize,
    /// Per-chirp physical distance in meters, before temporal smoothing.
    pub distance_m: Vec<f64>,
    /// Final distance/breathing series after the trailing moving average.
    /// Empty when fewer chirps than the averaging window exist.
    pub breathing_m: Vec<f64>,
}

/// A single heart-rate estimate from the phase spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateEstimate {
    /// Estimated heart rate in beats per minute.
    pub bpm: f64,
    /// The underlying spectral frequency in Hz (`bpm / 60`).
    pub frequency_hz: f64,
    /// Index of the winning bin in the phase spectrum.
    pub spectral_bin: usize,
}

/// Combined pipeline output.
///
/// The breathing series and the heart-rate estimate are independently
/// reportable: a failure confined to the heart-rate stage is carried
/// inside `heart_rate` while the tracking output remains available.
#[derive(Debug, Clone)]
pub struct VitalsReport {
    /// Clutter-removal and tracking output, including the final
    /// distance/breathing series.
    pub tracking: TrackingResult,
    /// Heart-rate estimate, or the error that prevented one.
    pub heart_rate: Result<HeartRateEstimate, VitalsError>,
}
