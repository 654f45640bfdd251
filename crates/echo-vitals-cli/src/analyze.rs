//! The `analyze` command: load sample streams, run the pipeline, report.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::info;

use echo_vitals_core::{LowpassConfig, SessionConfig, VitalsReport};
use echo_vitals_dsp::synth;
use echo_vitals_pipeline::VitalsPipeline;

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Received sample stream (JSON: a flat array of samples, or an array
    /// of per-chirp arrays which is concatenated)
    #[arg(long)]
    pub rx: PathBuf,

    /// Reference (transmitted) sample stream in the same JSON format.
    /// When omitted, the reference chirp is regenerated from the sweep
    /// parameters.
    #[arg(long)]
    pub tx: Option<PathBuf>,

    /// Audio sample rate in Hz
    #[arg(long, default_value_t = 48_000.0)]
    pub sample_rate: f64,

    /// Chirp duration in seconds
    #[arg(long, default_value_t = 4096.0 / 48_000.0)]
    pub chirp_duration: f64,

    /// Sweep start frequency in Hz
    #[arg(long, default_value_t = 1_000.0)]
    pub freq_low: f64,

    /// Sweep end frequency in Hz
    #[arg(long, default_value_t = 23_000.0)]
    pub freq_high: f64,

    /// Warm-up interval to drop, in seconds
    #[arg(long, default_value_t = 1.0)]
    pub warmup: f64,

    /// Bypass the dechirp low-pass filter (calibration mode)
    #[arg(long)]
    pub no_lowpass: bool,

    /// Low-pass cutoff frequency in Hz
    #[arg(long, default_value_t = 5_000.0)]
    pub lowpass_cutoff: f64,

    /// Low-pass filter order
    #[arg(long, default_value_t = 5)]
    pub lowpass_order: usize,

    /// Heart-rate search band lower bound in BPM
    #[arg(long, default_value_t = 40.0)]
    pub bpm_low: f64,

    /// Heart-rate search band upper bound in BPM
    #[arg(long, default_value_t = 200.0)]
    pub bpm_high: f64,

    /// Write the reordered magnitude matrix to this JSON file for
    /// offline inspection
    #[arg(long)]
    pub export_spectra: Option<PathBuf>,

    /// Write the run report as JSON instead of human-readable text
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl AnalyzeArgs {
    fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let config = SessionConfig::builder()
            .sample_rate_hz(self.sample_rate)
            .chirp_duration_s(self.chirp_duration)
            .sweep_hz(self.freq_low, self.freq_high)
            .warmup_s(self.warmup)
            .lowpass(LowpassConfig {
                enabled: !self.no_lowpass,
                cutoff_hz: self.lowpass_cutoff,
                order: self.lowpass_order,
            })
            .bpm_band(self.bpm_low, self.bpm_high)
            .build()?;
        Ok(config)
    }
}

/// JSON sample stream: either flat or split into per-chirp rows.
#[derive(Deserialize)]
#[serde(untagged)]
enum SampleStream {
    Flat(Vec<f64>),
    Chirped(Vec<Vec<f64>>),
}

impl SampleStream {
    fn into_samples(self) -> Vec<f64> {
        match self {
            Self::Flat(samples) => samples,
            Self::Chirped(rows) => rows.into_iter().flatten().collect(),
        }
    }
}

/// Serializable summary of one pipeline run.
#[derive(Serialize)]
struct RunReport {
    generated_at: DateTime<Utc>,
    config: SessionConfig,
    breathing_points: usize,
    mean_range_m: Option<f64>,
    tracked_bin: usize,
    breathing_m: Vec<f64>,
    heart_rate_bpm: Option<f64>,
    heart_rate_error: Option<String>,
}

impl RunReport {
    fn new(config: SessionConfig, report: &VitalsReport) -> Self {
        let breathing = &report.tracking.breathing_m;
        let mean_range_m = if breathing.is_empty() {
            None
        } else {
            Some(breathing.iter().sum::<f64>() / breathing.len() as f64)
        };
        Self {
            generated_at: Utc::now(),
            config,
            breathing_points: breathing.len(),
            mean_range_m,
            tracked_bin: report.tracking.tracked_bin,
            breathing_m: breathing.clone(),
            heart_rate_bpm: report.heart_rate.as_ref().ok().map(|hr| hr.bpm),
            heart_rate_error: report.heart_rate.as_ref().err().map(ToString::to_string),
        }
    }
}

/// Load a sample stream from a JSON file.
pub fn load_samples(path: &Path) -> anyhow::Result<Vec<f64>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let stream: SampleStream = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {} as a sample stream", path.display()))?;
    Ok(stream.into_samples())
}

/// Execute the `analyze` command.
pub fn execute(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = args.session_config()?;
    let rx = load_samples(&args.rx)?;
    let tx = match &args.tx {
        Some(path) => load_samples(path)?,
        None => {
            info!("regenerating reference chirp from sweep parameters");
            synth::reference_chirp(&config)
        }
    };

    let pipeline = VitalsPipeline::new(config.clone())?;
    let spectra = pipeline.range_spectra(&rx, &tx)?;

    if let Some(path) = &args.export_spectra {
        let rows: Vec<Vec<f64>> = spectra
            .magnitude
            .rows()
            .into_iter()
            .map(|row| row.to_vec())
            .collect();
        fs::write(path, serde_json::to_string(&rows)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), chirps = rows.len(), "exported magnitude matrix");
    }

    let report = pipeline.analyze_spectra(&spectra);
    let summary = RunReport::new(config, &report);

    match &args.output {
        Some(path) => {
            fs::write(path, serde_json::to_string_pretty(&summary)?)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote run report");
        }
        None => print_summary(&summary),
    }

    Ok(())
}

fn print_summary(summary: &RunReport) {
    println!("breathing points: {}", summary.breathing_points);
    match summary.mean_range_m {
        Some(mean) => println!("mean range: {mean:.4} m"),
        None => println!("mean range: unavailable (too few chirps)"),
    }
    println!("tracked bin: {}", summary.tracked_bin);
    match (&summary.heart_rate_bpm, &summary.heart_rate_error) {
        (Some(bpm), _) => println!("heart rate: {bpm:.1} BPM"),
        (None, Some(error)) => println!("heart rate: unavailable ({error})"),
        (None, None) => println!("heart rate: unavailable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_json(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn flat_stream_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(&dir, "flat.json", "[0.1, -0.2, 0.3]");
        assert_eq!(load_samples(&path).unwrap(), vec![0.1, -0.2, 0.3]);
    }

    #[test]
    fn chirped_stream_is_concatenated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(&dir, "rows.json", "[[1.0, 2.0], [3.0, 4.0]]");
        assert_eq!(load_samples(&path).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn malformed_stream_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(&dir, "bad.json", "{\"samples\": 1}");
        assert!(load_samples(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_samples(Path::new("/nonexistent/stream.json")).is_err());
    }
}
