//! Error types for the EchoVitals pipeline.
//!
//! All pipeline failures are local, recoverable conditions reported to the
//! caller via [`VitalsError`]; none abort the process. Each variant carries
//! the stage name and the offending dimensions so a caller can log the
//! failure or surface a user-facing message.

use thiserror::Error;

/// A specialized `Result` type for pipeline operations.
pub type VitalsResult<T> = Result<T, VitalsError>;

/// Unified error type for the EchoVitals pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum VitalsError {
    /// The recording is empty or too short for the requested operation,
    /// or warm-up trimming removed every chirp.
    #[error("{stage}: insufficient data (need at least {required} samples, got {available})")]
    InsufficientData {
        /// Pipeline stage that rejected the input
        stage: &'static str,
        /// Minimum required sample/row count
        required: usize,
        /// Available sample/row count
        available: usize,
    },

    /// Received and reference matrices disagree in shape.
    #[error("{stage}: shape mismatch (rx {rx_rows}x{rx_cols}, tx {tx_rows}x{tx_cols})")]
    ShapeMismatch {
        /// Pipeline stage that detected the mismatch
        stage: &'static str,
        /// Received matrix rows
        rx_rows: usize,
        /// Received matrix columns
        rx_cols: usize,
        /// Reference matrix rows
        tx_rows: usize,
        /// Reference matrix columns
        tx_cols: usize,
    },

    /// Signal length not supported by the spectral engine.
    #[error("{stage}: unsupported signal length {length} (engine length {expected})")]
    InvalidLength {
        /// Stage or component that rejected the length
        stage: &'static str,
        /// The offending length
        length: usize,
        /// The length the engine was configured for (equal to `length`
        /// when the length itself is unusable, e.g. not a power of two)
        expected: usize,
    },

    /// The BPM search band contains no spectral bins.
    #[error(
        "heart-rate: no spectral bins in BPM band [{low_bpm}, {high_bpm}] \
         ({available_bins} bins available)"
    )]
    NoBandEnergy {
        /// Lower band bound (BPM)
        low_bpm: f64,
        /// Upper band bound (BPM)
        high_bpm: f64,
        /// One-sided spectrum size that was searched
        available_bins: usize,
    },

    /// Invalid session configuration, caught before any array processing.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
    },
}

impl VitalsError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this error reflects the input data rather than
    /// the caller's setup, i.e. retrying with a longer recording may help.
    #[must_use]
    pub const fn is_data_dependent(&self) -> bool {
        match self {
            Self::InsufficientData { .. } | Self::NoBandEnergy { .. } => true,
            Self::ShapeMismatch { .. }
            | Self::InvalidLength { .. }
            | Self::Configuration { .. } => false,
        }
    }
}
