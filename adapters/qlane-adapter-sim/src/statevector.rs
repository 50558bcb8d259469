//! Statevector engine.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

use qlane_hal::{
    Engine, ExpectationEngine, Gate, HalError, HalResult, Matrix2, Pauli, Probabilities,
    ProbabilityEngine, QubitId, QubitOperator,
};

/// Buffered gates are executed once this many are pending.
const FUSION_THRESHOLD: usize = 16;

/// Amplitudes below this probability are left out of probability tables.
const PROBABILITY_CUTOFF: f64 = 1e-14;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Options of a [`StatevectorEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatevectorConfig {
    /// Seed for measurement sampling. Entropy-seeded when absent.
    pub rnd_seed: Option<u64>,
    /// Buffer gates and execute them in batches.
    pub gate_fusion: bool,
    /// Estimate probability tables from this many sampled shots.
    pub num_runs: Option<u64>,
    /// Sample measurement outcomes without collapsing the state, so that
    /// probability tables read after a measure-all still describe the
    /// pre-measurement distribution.
    pub deferred_measurement: bool,
    /// Log every gate at debug level instead of trace.
    pub verbose: bool,
    /// Largest register the engine accepts.
    pub max_qubits: usize,
}

impl Default for StatevectorConfig {
    fn default() -> Self {
        Self {
            rnd_seed: None,
            gate_fusion: false,
            num_runs: None,
            deferred_measurement: false,
            verbose: false,
            max_qubits: 24,
        }
    }
}

impl StatevectorConfig {
    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rnd_seed = Some(seed);
        self
    }

    /// Enable or disable gate buffering.
    pub fn with_gate_fusion(mut self, enabled: bool) -> Self {
        self.gate_fusion = enabled;
        self
    }

    /// Report sampled instead of exact probabilities.
    pub fn with_num_runs(mut self, runs: u64) -> Self {
        self.num_runs = Some(runs);
        self
    }

    /// Keep the state intact on measurement.
    pub fn with_deferred_measurement(mut self, enabled: bool) -> Self {
        self.deferred_measurement = enabled;
        self
    }

    /// Enable per-gate debug logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the qubit limit.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }
}

/// Dense statevector over all allocated qubits.
///
/// Qubit `slots[k]` is bit `k` of the amplitude index.
pub struct StatevectorEngine {
    config: StatevectorConfig,
    amplitudes: Vec<Complex64>,
    slots: Vec<QubitId>,
    positions: FxHashMap<QubitId, usize>,
    next_id: u32,
    pending: Vec<(Gate, Vec<usize>)>,
    rng: StdRng,
}

impl StatevectorEngine {
    /// Create an engine with no qubits.
    pub fn new(config: StatevectorConfig) -> Self {
        let rng = match config.rnd_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            amplitudes: vec![ONE],
            slots: Vec::new(),
            positions: FxHashMap::default(),
            next_id: 0,
            pending: Vec::new(),
            rng,
        }
    }

    /// Engine options.
    pub fn config(&self) -> &StatevectorConfig {
        &self.config
    }

    /// Number of currently allocated qubits.
    pub fn num_allocated(&self) -> usize {
        self.slots.len()
    }

    /// Number of gates waiting for the next flush.
    pub fn num_pending(&self) -> usize {
        self.pending.len()
    }

    fn position(&self, qubit: QubitId) -> HalResult<usize> {
        if qubit.0 >= self.next_id {
            return Err(HalError::InvalidQubit(qubit));
        }
        self.positions
            .get(&qubit)
            .copied()
            .ok_or(HalError::NotAllocated(qubit))
    }

    fn positions_of(&self, qubits: &[QubitId]) -> HalResult<Vec<usize>> {
        qubits.iter().map(|&q| self.position(q)).collect()
    }

    fn run_pending(&mut self) -> HalResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        trace!("Executing {} buffered gate(s)", self.pending.len());
        for (gate, positions) in std::mem::take(&mut self.pending) {
            self.execute(&gate, &positions)?;
        }
        Ok(())
    }

    fn execute(&mut self, gate: &Gate, positions: &[usize]) -> HalResult<()> {
        let (controls, target) = gate.split_controls();
        let ctrl_mask = positions[..controls]
            .iter()
            .fold(0usize, |mask, &p| mask | (1 << p));
        let targets = &positions[controls..];

        match target {
            Gate::Swap => apply_swap(&mut self.amplitudes, targets[0], targets[1], ctrl_mask),
            Gate::SqrtSwap => {
                apply_sqrt_swap(&mut self.amplitudes, targets[0], targets[1], ctrl_mask);
            }
            other => {
                let m = single_qubit_matrix(other)
                    .ok_or_else(|| HalError::UnsupportedGate(other.name()))?;
                apply_matrix(&mut self.amplitudes, targets[0], &m, ctrl_mask);
            }
        }
        Ok(())
    }

    /// Draw an outcome for bit `pos` without touching the state.
    fn sample_bit(&mut self, pos: usize) -> bool {
        let mask = 1 << pos;
        let p1: f64 = self
            .amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum();
        let r: f64 = self.rng.r#gen();
        r < p1
    }

    /// Measure bit `pos`, collapse and renormalize.
    fn collapse(&mut self, pos: usize) -> bool {
        let mask = 1 << pos;
        let outcome = self.sample_bit(pos);

        let mut norm_sq = 0.0;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) != outcome {
                *amp = ZERO;
            }
            norm_sq += amp.norm_sqr();
        }
        let norm = norm_sq.sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
        outcome
    }

    /// Drop bit `pos` from the state, which must already be collapsed.
    fn remove_bit(&mut self, pos: usize, value: bool) {
        let new_len = self.amplitudes.len() / 2;
        let low = (1usize << pos) - 1;
        let bit = usize::from(value) << pos;
        let reduced = (0..new_len)
            .map(|i| self.amplitudes[((i & !low) << 1) | bit | (i & low)])
            .collect();
        self.amplitudes = reduced;
    }

    fn bitstring(index: usize, positions: &[usize]) -> String {
        positions
            .iter()
            .map(|&p| if (index >> p) & 1 == 1 { '1' } else { '0' })
            .collect()
    }

    fn sampled_probabilities(&mut self, positions: &[usize], runs: u64) -> Probabilities {
        let mut cumulative = Vec::with_capacity(self.amplitudes.len());
        let mut acc = 0.0;
        for amp in &self.amplitudes {
            acc += amp.norm_sqr();
            cumulative.push(acc);
        }

        let mut counts: FxHashMap<usize, u64> = FxHashMap::default();
        for _ in 0..runs {
            let r: f64 = self.rng.r#gen::<f64>() * acc;
            let index = cumulative
                .partition_point(|&c| c <= r)
                .min(cumulative.len() - 1);
            *counts.entry(index).or_insert(0) += 1;
        }

        let mut table = Probabilities::new();
        for (index, n) in counts {
            table.insert(Self::bitstring(index, positions), n as f64 / runs as f64);
        }
        table
    }
}

impl Drop for StatevectorEngine {
    fn drop(&mut self) {
        if !self.slots.is_empty() {
            warn!(
                "Statevector engine dropped with {} qubit(s) still allocated",
                self.slots.len()
            );
        }
    }
}

impl Engine for StatevectorEngine {
    fn name(&self) -> &str {
        "statevector"
    }

    #[instrument(skip(self))]
    fn allocate_qureg(&mut self, n: usize) -> HalResult<Vec<QubitId>> {
        if self.slots.len() + n > self.config.max_qubits {
            return Err(HalError::Backend(format!(
                "Cannot allocate {n} qubit(s): {} already allocated, limit is {}",
                self.slots.len(),
                self.config.max_qubits
            )));
        }

        let mut reg = Vec::with_capacity(n);
        for _ in 0..n {
            let id = QubitId(self.next_id);
            self.next_id += 1;
            self.positions.insert(id, self.slots.len());
            self.slots.push(id);
            let len = self.amplitudes.len();
            self.amplitudes.resize(len * 2, ZERO);
            reg.push(id);
        }
        debug!("Allocated {} qubit(s), {} live", n, self.slots.len());
        Ok(reg)
    }

    fn deallocate_qureg(&mut self, qubits: &[QubitId]) -> HalResult<()> {
        self.run_pending()?;
        for &qubit in qubits {
            let pos = self.position(qubit)?;
            let value = self.collapse(pos);
            self.remove_bit(pos, value);
            self.slots.remove(pos);
            self.positions.remove(&qubit);
            for (k, q) in self.slots.iter().enumerate().skip(pos) {
                self.positions.insert(*q, k);
            }
        }
        debug!(
            "Deallocated {} qubit(s), {} live",
            qubits.len(),
            self.slots.len()
        );
        Ok(())
    }

    fn apply(&mut self, gate: &Gate, qubits: &[QubitId]) -> HalResult<()> {
        if qubits.len() != gate.num_qubits() {
            return Err(HalError::ArityMismatch {
                gate: gate.name(),
                expected: gate.num_qubits(),
                actual: qubits.len(),
            });
        }
        let positions = self.positions_of(qubits)?;
        for (k, p) in positions.iter().enumerate() {
            if positions[..k].contains(p) {
                return Err(HalError::Backend(format!(
                    "Gate {gate} addresses qubit {} twice",
                    qubits[k]
                )));
            }
        }

        if self.config.verbose {
            debug!(%gate, ?qubits, "apply");
        } else {
            trace!(%gate, ?qubits, "apply");
        }

        if self.config.gate_fusion {
            self.pending.push((gate.clone(), positions));
            if self.pending.len() >= FUSION_THRESHOLD {
                self.run_pending()?;
            }
            Ok(())
        } else {
            self.execute(gate, &positions)
        }
    }

    fn measure(&mut self, qubit: QubitId) -> HalResult<bool> {
        self.run_pending()?;
        let pos = self.position(qubit)?;
        if self.config.deferred_measurement {
            return Ok(self.sample_bit(pos));
        }
        Ok(self.collapse(pos))
    }

    fn flush(&mut self, deallocate: bool) -> HalResult<()> {
        self.run_pending()?;
        if deallocate {
            let live = self.slots.clone();
            self.deallocate_qureg(&live)?;
        }
        Ok(())
    }
}

impl ExpectationEngine for StatevectorEngine {
    fn expectation_value(
        &mut self,
        operator: &QubitOperator,
        qubits: &[QubitId],
    ) -> HalResult<f64> {
        self.run_pending()?;
        if let Some(max) = operator.max_index() {
            if max >= qubits.len() {
                return Err(HalError::Backend(format!(
                    "Operator addresses local index {max} but only {} qubit(s) were given",
                    qubits.len()
                )));
            }
        }
        let positions = self.positions_of(qubits)?;

        let mut total = 0.0;
        for term in &operator.terms {
            let mut phi = self.amplitudes.clone();
            for &(index, pauli) in &term.factors {
                apply_matrix(&mut phi, positions[index], &pauli_matrix(pauli), 0);
            }
            let overlap: Complex64 = self
                .amplitudes
                .iter()
                .zip(&phi)
                .map(|(psi, phi)| psi.conj() * phi)
                .sum();
            total += term.coefficient * overlap.re;
        }
        Ok(total)
    }
}

impl ProbabilityEngine for StatevectorEngine {
    fn probabilities(&mut self, qubits: &[QubitId]) -> HalResult<Probabilities> {
        self.run_pending()?;
        let positions = self.positions_of(qubits)?;

        if let Some(runs) = self.config.num_runs.filter(|&r| r > 0) {
            return Ok(self.sampled_probabilities(&positions, runs));
        }

        let mut table = Probabilities::new();
        for (index, amp) in self.amplitudes.iter().enumerate() {
            let p = amp.norm_sqr();
            if p > PROBABILITY_CUTOFF {
                table.insert(Self::bitstring(index, &positions), p);
            }
        }
        Ok(table)
    }
}

fn pauli_matrix(pauli: Pauli) -> Matrix2 {
    match pauli {
        Pauli::X => [[ZERO, ONE], [ONE, ZERO]],
        Pauli::Y => [[ZERO, -I], [I, ZERO]],
        Pauli::Z => [[ONE, ZERO], [ZERO, -ONE]],
    }
}

fn single_qubit_matrix(gate: &Gate) -> Option<Matrix2> {
    let m = match gate {
        Gate::X => pauli_matrix(Pauli::X),
        Gate::Y => pauli_matrix(Pauli::Y),
        Gate::Z => pauli_matrix(Pauli::Z),
        Gate::H => {
            let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
            [[h, h], [h, -h]]
        }
        Gate::S => [[ONE, ZERO], [ZERO, I]],
        Gate::T => [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, PI / 4.0)]],
        Gate::SqrtX => {
            let p = Complex64::new(0.5, 0.5);
            let q = Complex64::new(0.5, -0.5);
            [[p, q], [q, p]]
        }
        Gate::Rx(theta) => {
            let c = Complex64::new((theta / 2.0).cos(), 0.0);
            let s = Complex64::new(0.0, -(theta / 2.0).sin());
            [[c, s], [s, c]]
        }
        Gate::Ry(theta) => {
            let c = Complex64::new((theta / 2.0).cos(), 0.0);
            let s = Complex64::new((theta / 2.0).sin(), 0.0);
            [[c, -s], [s, c]]
        }
        Gate::Rz(theta) => [
            [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
            [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
        ],
        Gate::R(phi) => [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, *phi)]],
        Gate::Matrix(m) => *m,
        Gate::Swap | Gate::SqrtSwap | Gate::Controlled(_) => return None,
    };
    Some(m)
}

fn apply_matrix(amps: &mut [Complex64], target: usize, m: &Matrix2, ctrl_mask: usize) {
    let mask = 1 << target;
    for i in 0..amps.len() {
        if i & mask == 0 && i & ctrl_mask == ctrl_mask {
            let j = i | mask;
            let a = amps[i];
            let b = amps[j];
            amps[i] = m[0][0] * a + m[0][1] * b;
            amps[j] = m[1][0] * a + m[1][1] * b;
        }
    }
}

fn apply_swap(amps: &mut [Complex64], q1: usize, q2: usize, ctrl_mask: usize) {
    let mask1 = 1 << q1;
    let mask2 = 1 << q2;
    for i in 0..amps.len() {
        if i & ctrl_mask == ctrl_mask && i & mask1 != 0 && i & mask2 == 0 {
            let j = (i & !mask1) | mask2;
            amps.swap(i, j);
        }
    }
}

fn apply_sqrt_swap(amps: &mut [Complex64], q1: usize, q2: usize, ctrl_mask: usize) {
    let mask1 = 1 << q1;
    let mask2 = 1 << q2;
    let p = Complex64::new(0.5, 0.5);
    let q = Complex64::new(0.5, -0.5);
    for i in 0..amps.len() {
        if i & ctrl_mask == ctrl_mask && i & mask1 != 0 && i & mask2 == 0 {
            let j = (i & !mask1) | mask2;
            let a = amps[i];
            let b = amps[j];
            amps[i] = p * a + q * b;
            amps[j] = q * a + p * b;
        }
    }
}
