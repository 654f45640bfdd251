//! # EchoVitals Core
//!
//! Core types, configuration, and errors for the EchoVitals acoustic FMCW
//! vital-sign sensing system.
//!
//! EchoVitals turns a speaker/microphone pair into a contact-free radar: a
//! periodically repeated linear frequency sweep (chirp) is played back while
//! the microphone records the echo, and the recorded stream is processed
//! offline into a range-over-time (breathing) series and a heart-rate
//! estimate. This crate provides the foundational building blocks used by
//! the rest of the workspace:
//!
//! - **Session configuration**: [`SessionConfig`] with validation, a
//!   builder, and a ready-made preset for 48 kHz handheld hardware.
//! - **Domain types**: [`ChirpFrames`], [`RangeSpectra`],
//!   [`TrackingResult`], [`HeartRateEstimate`], and [`VitalsReport`].
//! - **Errors**: the unified [`VitalsError`] type with enough context
//!   (stage name, offending dimensions) for callers to log or surface a
//!   user-facing message instead of crashing.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{BpmBand, LowpassConfig, SessionConfig, SessionConfigBuilder};
pub use error::{VitalsError, VitalsResult};
pub use types::{ChirpFrames, HeartRateEstimate, RangeSpectra, TrackingResult, VitalsReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Speed of sound in air (m/s), used by the FMCW range equation.
pub const SPEED_OF_SOUND: f64 = 343.0;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{BpmBand, LowpassConfig, SessionConfig};
    pub use crate::error::{VitalsError, VitalsResult};
    pub use crate::types::{
        ChirpFrames, HeartRateEstimate, RangeSpectra, TrackingResult, VitalsReport,
    };
}
