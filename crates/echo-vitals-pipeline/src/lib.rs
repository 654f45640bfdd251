//! EchoVitals processing pipeline.
//!
//! Converts a raw acoustic FMCW recording (received echo stream plus
//! transmitted reference chirp) into physiological estimates: a
//! range-over-time breathing series and a heart-rate figure.
//!
//! # Stages
//!
//! 1. **Chirp framing** ([`framer`]): slice the continuous streams into a
//!    matrix of aligned chirp rows, dropping the warm-up interval.
//! 2. **Range FFT** ([`range_fft`]): dechirp each row against its
//!    reference, optionally low-pass filter, and transform into a
//!    range-bin profile (magnitudes plus complex bins).
//! 3. **Clutter & tracking** ([`clutter`]): consecutive-chirp differencing
//!    removes static reflections; the dominant moving bin is tracked,
//!    median-filtered, and converted to meters via the FMCW range
//!    equation.
//! 4. **Heart rate** ([`heart_rate`]): unwrap and detrend the phase at the
//!    tracked bin, transform it at the chirp rate, and search the BPM
//!    band for the dominant component.
//!
//! Data flows strictly forward; each stage consumes an immutable input
//! and produces a fresh output.
//!
//! # Example
//!
//! ```no_run
//! use echo_vitals_core::SessionConfig;
//! use echo_vitals_pipeline::VitalsPipeline;
//!
//! let pipeline = VitalsPipeline::new(SessionConfig::handheld_48k())?;
//! # let (rx, tx): (Vec<f64>, Vec<f64>) = (vec![], vec![]);
//! let report = pipeline.run(&rx, &tx)?;
//! println!("breathing points: {}", report.tracking.breathing_m.len());
//! if let Ok(hr) = &report.heart_rate {
//!     println!("heart rate: {:.0} BPM", hr.bpm);
//! }
//! # Ok::<(), echo_vitals_core::VitalsError>(())
//! ```

#![deny(unsafe_code)]

pub mod clutter;
pub mod framer;
pub mod heart_rate;
pub mod pipeline;
pub mod range_fft;

pub use pipeline::VitalsPipeline;
pub use range_fft::RangeFftStage;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
