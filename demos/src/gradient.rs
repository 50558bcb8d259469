//! Parameter-shift gradients of circuit expectation values.
//!
//! For a parameter entering the circuit through a single Pauli rotation
//! `exp(-iθP/2)` the derivative of any expectation value is exact:
//!
//! ```text
//! ∂f/∂θ = (f(θ + π/2) - f(θ - π/2)) / 2
//! ```
//!
//! Only circuit evaluations are needed, so the rule works on every device.

use std::f64::consts::FRAC_PI_2;

/// Gradient of `f` at `params` by the parameter-shift rule.
///
/// Costs two evaluations of `f` per parameter.
pub fn parameter_shift<F, E>(mut f: F, params: &[f64]) -> Result<Vec<f64>, E>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
{
    let mut shifted = params.to_vec();
    let mut grad = Vec::with_capacity(params.len());
    for i in 0..params.len() {
        shifted[i] = params[i] + FRAC_PI_2;
        let forward = f(&shifted)?;
        shifted[i] = params[i] - FRAC_PI_2;
        let backward = f(&shifted)?;
        shifted[i] = params[i];
        grad.push((forward - backward) / 2.0);
    }
    Ok(grad)
}
