//! Shot-noise emulation.

use rand::Rng;

/// Draw from `Binomial(trials, p)`.
pub(crate) fn binomial<R: Rng + ?Sized>(rng: &mut R, trials: u64, p: f64) -> u64 {
    let p = p.clamp(0.0, 1.0);
    (0..trials).filter(|_| rng.gen_bool(p)).count() as u64
}

/// Replace an exact expectation value of a ±1-valued observable by the mean
/// of `shots` simulated single-shot outcomes.
///
/// This treats the observable as a two-outcome measurement with
/// `P(+1) = (e + 1) / 2`, which is exact for Pauli observables.
pub(crate) fn shot_estimate<R: Rng + ?Sized>(rng: &mut R, exact: f64, shots: u64) -> f64 {
    let n0 = binomial(rng, shots, (exact + 1.0) / 2.0);
    (n0 as f64 - (shots - n0) as f64) / shots as f64
}
