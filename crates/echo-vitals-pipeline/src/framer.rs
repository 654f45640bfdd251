//! Chirp framing: slice a continuous recording into aligned chirp rows.

use ndarray::{s, Array2};

use echo_vitals_core::{ChirpFrames, SessionConfig, VitalsError, VitalsResult};

const STAGE: &str = "chirp-framer";

/// Slice the received stream into whole chirps aligned with the reference.
///
/// The received signal is truncated to a whole number of chirps (any
/// partial trailing chirp is dropped) and cut into contiguous rows of
/// `chirp_samples`. The reference row is built once from the first
/// `chirp_samples` samples of the reference signal and replicated per
/// retained row, since the transmitted waveform is periodic and identical
/// per chirp by construction. Finally the leading warm-up interval is
/// removed from both matrices.
///
/// Fails with [`VitalsError::InsufficientData`] when either signal is
/// empty, when the recording is shorter than one chirp, or when the
/// warm-up trim would remove every row.
pub fn frame_chirps(rx: &[f64], tx: &[f64], config: &SessionConfig) -> VitalsResult<ChirpFrames> {
    let chirp_samples = config.chirp_samples();

    if rx.is_empty() || tx.is_empty() {
        return Err(VitalsError::InsufficientData {
            stage: STAGE,
            required: chirp_samples,
            available: 0,
        });
    }
    if tx.len() < chirp_samples {
        return Err(VitalsError::InsufficientData {
            stage: STAGE,
            required: chirp_samples,
            available: tx.len(),
        });
    }

    let chirps = rx.len() / chirp_samples;
    if chirps == 0 {
        return Err(VitalsError::InsufficientData {
            stage: STAGE,
            required: chirp_samples,
            available: rx.len(),
        });
    }

    let rx_matrix = Array2::from_shape_fn((chirps, chirp_samples), |(i, j)| {
        rx[i * chirp_samples + j]
    });
    let tx_matrix = Array2::from_shape_fn((chirps, chirp_samples), |(_, j)| tx[j]);

    let drop = config.warmup_chirps();
    if drop >= chirps {
        return Err(VitalsError::InsufficientData {
            stage: STAGE,
            required: (drop + 1) * chirp_samples,
            available: rx.len(),
        });
    }

    ChirpFrames::new(
        rx_matrix.slice(s![drop.., ..]).to_owned(),
        tx_matrix.slice(s![drop.., ..]).to_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chirp_samples: usize, warmup_s: f64) -> SessionConfig {
        SessionConfig::builder()
            .sample_rate_hz(1_000.0)
            .chirp_duration_s(chirp_samples as f64 / 1_000.0)
            .sweep_hz(100.0, 400.0)
            .warmup_s(warmup_s)
            .lowpass(echo_vitals_core::LowpassConfig {
                enabled: false,
                cutoff_hz: 200.0,
                order: 4,
            })
            .build()
            .unwrap()
    }

    #[test]
    fn row_count_matches_whole_chirps_minus_drop() {
        let config = config(8, 0.017); // 8-sample chirps, drop 2
        let rx: Vec<f64> = (0..83).map(f64::from).collect(); // 10 whole chirps + 3
        let tx: Vec<f64> = (0..8).map(f64::from).collect();

        let frames = frame_chirps(&rx, &tx, &config).unwrap();
        assert_eq!(frames.chirps(), 10 - 2);
        assert_eq!(frames.chirp_samples(), 8);
        // First retained rx row is the third chirp of the stream
        assert_eq!(frames.rx[[0, 0]], 16.0);
        // The trailing partial chirp is gone
        assert_eq!(frames.rx[[7, 7]], 79.0);
    }

    #[test]
    fn tx_rows_are_identical_replicas() {
        let config = config(4, 0.0);
        let rx = vec![0.5; 20];
        let tx = vec![0.1, 0.2, 0.3, 0.4, 9.9, 9.9];

        let frames = frame_chirps(&rx, &tx, &config).unwrap();
        for i in 0..frames.chirps() {
            for j in 0..4 {
                assert_eq!(frames.tx[[i, j]], tx[j]);
            }
        }
    }

    #[test]
    fn empty_signals_rejected() {
        let config = config(4, 0.0);
        assert!(matches!(
            frame_chirps(&[], &[1.0; 4], &config),
            Err(VitalsError::InsufficientData { available: 0, .. })
        ));
        assert!(matches!(
            frame_chirps(&[1.0; 8], &[], &config),
            Err(VitalsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn recording_shorter_than_one_chirp_rejected() {
        let config = config(8, 0.0);
        let err = frame_chirps(&[1.0; 5], &[1.0; 8], &config).unwrap_err();
        assert!(matches!(
            err,
            VitalsError::InsufficientData {
                required: 8,
                available: 5,
                ..
            }
        ));
    }

    #[test]
    fn reference_shorter_than_one_chirp_rejected() {
        let config = config(8, 0.0);
        let err = frame_chirps(&[1.0; 16], &[1.0; 5], &config).unwrap_err();
        assert!(matches!(
            err,
            VitalsError::InsufficientData {
                required: 8,
                available: 5,
                ..
            }
        ));
    }

    #[test]
    fn warmup_consuming_all_rows_rejected() {
        let config = config(4, 0.021); // drop 5 chirps
        let rx = vec![0.0; 20]; // exactly 5 chirps
        let err = frame_chirps(&rx, &[1.0; 4], &config).unwrap_err();
        assert!(matches!(err, VitalsError::InsufficientData { .. }));
    }

    #[test]
    fn zero_warmup_keeps_all_rows() {
        let config = config(4, 0.0);
        let frames = frame_chirps(&[1.0; 12], &[1.0; 4], &config).unwrap();
        assert_eq!(frames.chirps(), 3);
    }
}
