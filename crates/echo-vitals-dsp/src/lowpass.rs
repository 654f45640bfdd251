//! Butterworth low-pass filter.
//!
//! Coefficients come from the classic design route: analog prototype
//! poles, frequency pre-warp, bilinear transform, then polynomial
//! expansion with the denominator normalized so `a[0] == 1` and the
//! numerator scaled for unity DC gain. Application is the causal
//! direct-form recursion over prior outputs and current/past inputs.
//! Cutoff and order can be retuned in place without reallocating
//! anything unrelated.

use num_complex::Complex64;
use std::f64::consts::PI;

use echo_vitals_core::{VitalsError, VitalsResult};

/// A causal recursive (IIR) low-pass filter with Butterworth response.
#[derive(Debug, Clone, PartialEq)]
pub struct LowPassFilter {
    cutoff_hz: f64,
    sample_rate_hz: f64,
    order: usize,
    b: Vec<f64>,
    a: Vec<f64>,
}

impl LowPassFilter {
    /// Design a low-pass filter.
    ///
    /// `cutoff_hz` must lie strictly between 0 and the Nyquist frequency,
    /// and `order` must be at least 1.
    pub fn new(cutoff_hz: f64, sample_rate_hz: f64, order: usize) -> VitalsResult<Self> {
        validate(cutoff_hz, sample_rate_hz, order)?;
        let (b, a) = design_coefficients(cutoff_hz, sample_rate_hz, order);
        Ok(Self {
            cutoff_hz,
            sample_rate_hz,
            order,
            b,
            a,
        })
    }

    /// Cutoff frequency in Hz.
    #[must_use]
    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    /// Filter order.
    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Current `(b, a)` coefficient vectors, `a[0] == 1`.
    #[must_use]
    pub fn coefficients(&self) -> (&[f64], &[f64]) {
        (&self.b, &self.a)
    }

    /// Retune cutoff, sample rate, and/or order in place.
    ///
    /// Only the coefficient vectors are recomputed; passing `None` keeps
    /// the current value of that parameter.
    pub fn update_parameters(
        &mut self,
        cutoff_hz: Option<f64>,
        sample_rate_hz: Option<f64>,
        order: Option<usize>,
    ) -> VitalsResult<()> {
        let cutoff = cutoff_hz.unwrap_or(self.cutoff_hz);
        let rate = sample_rate_hz.unwrap_or(self.sample_rate_hz);
        let order = order.unwrap_or(self.order);
        validate(cutoff, rate, order)?;

        let (b, a) = design_coefficients(cutoff, rate, order);
        self.cutoff_hz = cutoff;
        self.sample_rate_hz = rate;
        self.order = order;
        self.b = b;
        self.a = a;
        Ok(())
    }

    /// Apply the filter to a signal, returning a same-length output.
    ///
    /// Direct-form realization: each output sample is computed from the
    /// current and past inputs and the past outputs, starting from zero
    /// initial conditions.
    #[must_use]
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        let n = input.len();
        let nb = self.b.len();
        let na = self.a.len();
        let mut output = vec![0.0; n];

        for i in 0..n {
            let mut y = 0.0;
            for j in 0..nb.min(i + 1) {
                y += self.b[j] * input[i - j];
            }
            for j in 0..(na - 1).min(i) {
                y -= self.a[j + 1] * output[i - 1 - j];
            }
            output[i] = y;
        }

        output
    }
}

fn validate(cutoff_hz: f64, sample_rate_hz: f64, order: usize) -> VitalsResult<()> {
    if !(sample_rate_hz > 0.0) {
        return Err(VitalsError::configuration(
            "lowpass sample rate must be positive",
        ));
    }
    let nyquist = sample_rate_hz / 2.0;
    if !(cutoff_hz > 0.0) || cutoff_hz >= nyquist {
        return Err(VitalsError::configuration(format!(
            "lowpass cutoff {cutoff_hz} Hz must lie in (0, {nyquist}) Hz"
        )));
    }
    if order == 0 {
        return Err(VitalsError::configuration("lowpass order must be at least 1"));
    }
    Ok(())
}

/// Butterworth low-pass `(b, a)` design via bilinear transform.
///
/// Returns numerator/denominator vectors of length `order + 1` with
/// `a[0] == 1` and unity gain at DC.
fn design_coefficients(cutoff_hz: f64, sample_rate_hz: f64, order: usize) -> (Vec<f64>, Vec<f64>) {
    // Pre-warped analog cutoff for the bilinear transform.
    let warped = (PI * cutoff_hz / sample_rate_hz).tan();

    // Analog prototype poles on the unit Butterworth circle, scaled to the
    // warped cutoff, then mapped to the z-plane.
    let digital_poles: Vec<Complex64> = (0..order)
        .map(|k| {
            let theta = PI * (2 * k + 1) as f64 / (2 * order) as f64 + PI / 2.0;
            let pole = warped * Complex64::new(theta.cos(), theta.sin());
            (Complex64::new(1.0, 0.0) + pole) / (Complex64::new(1.0, 0.0) - pole)
        })
        .collect();

    // Denominator from the pole set; conjugate pairing keeps it real.
    let a: Vec<f64> = polynomial_from_roots(&digital_poles)
        .iter()
        .map(|c| c.re)
        .collect();

    // All zeros sit at z = -1, so the unnormalized numerator is (z + 1)^N,
    // i.e. binomial coefficients. Scale for unity gain at z = 1.
    let mut b: Vec<f64> = binomial_row(order);
    let gain = a.iter().sum::<f64>() / b.iter().sum::<f64>();
    for coeff in &mut b {
        *coeff *= gain;
    }

    (b, a)
}

/// Expand `prod_k (z - root_k)` into descending-power coefficients.
fn polynomial_from_roots(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        coeffs.push(Complex64::new(0.0, 0.0));
        for i in (1..coeffs.len()).rev() {
            let prev = coeffs[i - 1];
            coeffs[i] -= root * prev;
        }
    }
    coeffs
}

/// Row `n` of Pascal's triangle: coefficients of `(z + 1)^n`.
fn binomial_row(n: usize) -> Vec<f64> {
    let mut row = vec![1.0];
    for _ in 0..n {
        let mut next = vec![1.0];
        for pair in row.windows(2) {
            next.push(pair[0] + pair[1]);
        }
        next.push(1.0);
        row = next;
    }
    row
}
