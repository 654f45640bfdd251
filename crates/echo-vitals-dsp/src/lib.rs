//! EchoVitals DSP primitives.
//!
//! The numeric building blocks under the pipeline stages:
//!
//! - **Spectral engine** ([`SpectralEngine`]): real-input FFT returning the
//!   one-sided magnitude spectrum together with the underlying complex
//!   bins, so downstream consumers pick the view they need.
//! - **Low-pass filter** ([`LowPassFilter`]): Butterworth coefficient
//!   design plus a causal direct-form apply, retunable in place.
//! - **Smoothing** ([`smoothing`]): integer median, median filter with
//!   edge-replicate padding, trailing moving average.
//! - **Phase utilities** ([`phase`]): unwrapping and least-squares
//!   detrending of phase trajectories.
//! - **Chirp synthesis** ([`synth`]): regenerate the linear swept-sine
//!   reference waveform from session parameters.

#![forbid(unsafe_code)]

pub mod lowpass;
pub mod phase;
pub mod smoothing;
pub mod spectral;
pub mod synth;

pub use lowpass::LowPassFilter;
pub use spectral::{SpectralEngine, Spectrum};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
