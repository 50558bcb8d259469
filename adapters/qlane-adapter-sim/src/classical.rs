//! Classical bit engine.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use qlane_hal::{Engine, Gate, HalError, HalResult, QubitId};

/// Engine tracking one classical bit per qubit.
///
/// Accepts `X` and `X` under any number of controls, nothing else. Useful for
/// reversible-logic circuits where a full statevector would be wasteful.
#[derive(Debug, Default)]
pub struct ClassicalEngine {
    bits: FxHashMap<QubitId, bool>,
    next_id: u32,
    verbose: bool,
}

impl ClassicalEngine {
    /// Create an engine with no qubits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable per-gate debug logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Number of currently allocated qubits.
    pub fn num_allocated(&self) -> usize {
        self.bits.len()
    }

    fn bit(&self, qubit: QubitId) -> HalResult<bool> {
        if qubit.0 >= self.next_id {
            return Err(HalError::InvalidQubit(qubit));
        }
        self.bits
            .get(&qubit)
            .copied()
            .ok_or(HalError::NotAllocated(qubit))
    }
}

impl Engine for ClassicalEngine {
    fn name(&self) -> &str {
        "classical"
    }

    fn allocate_qureg(&mut self, n: usize) -> HalResult<Vec<QubitId>> {
        let reg: Vec<QubitId> = (0..n)
            .map(|k| QubitId(self.next_id + k as u32))
            .collect();
        self.next_id += n as u32;
        for q in &reg {
            self.bits.insert(*q, false);
        }
        debug!("Allocated {} classical bit(s)", n);
        Ok(reg)
    }

    fn deallocate_qureg(&mut self, qubits: &[QubitId]) -> HalResult<()> {
        for q in qubits {
            self.bit(*q)?;
            self.bits.remove(q);
        }
        Ok(())
    }

    fn apply(&mut self, gate: &Gate, qubits: &[QubitId]) -> HalResult<()> {
        let (controls, target) = gate.split_controls();
        if *target != Gate::X {
            return Err(HalError::UnsupportedGate(gate.name()));
        }
        if qubits.len() != controls + 1 {
            return Err(HalError::ArityMismatch {
                gate: gate.name(),
                expected: controls + 1,
                actual: qubits.len(),
            });
        }

        if self.verbose {
            debug!(%gate, ?qubits, "apply");
        } else {
            trace!(%gate, ?qubits, "apply");
        }

        let mut fire = true;
        for q in &qubits[..controls] {
            fire &= self.bit(*q)?;
        }
        let tgt = qubits[controls];
        let value = self.bit(tgt)?;
        if fire {
            self.bits.insert(tgt, !value);
        }
        Ok(())
    }

    fn measure(&mut self, qubit: QubitId) -> HalResult<bool> {
        self.bit(qubit)
    }

    fn flush(&mut self, deallocate: bool) -> HalResult<()> {
        if deallocate {
            self.bits.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_and_cnot() {
        let mut eng = ClassicalEngine::new();
        let reg = eng.allocate_qureg(3).unwrap();
        eng.apply(&Gate::X, &reg[..1]).unwrap();
        eng.apply(&Gate::controlled(Gate::X), &reg[..2]).unwrap();
        eng.apply(&Gate::controlled(Gate::controlled(Gate::X)), &reg)
            .unwrap();
        assert!(eng.measure(reg[0]).unwrap());
        assert!(eng.measure(reg[1]).unwrap());
        assert!(eng.measure(reg[2]).unwrap());
    }

    #[test]
    fn test_control_off_does_nothing() {
        let mut eng = ClassicalEngine::new();
        let reg = eng.allocate_qureg(2).unwrap();
        eng.apply(&Gate::controlled(Gate::X), &reg).unwrap();
        assert!(!eng.measure(reg[1]).unwrap());
    }

    #[test]
    fn test_rejects_quantum_gates() {
        let mut eng = ClassicalEngine::new();
        let reg = eng.allocate_qureg(1).unwrap();
        assert!(matches!(
            eng.apply(&Gate::H, &reg),
            Err(HalError::UnsupportedGate(_))
        ));
    }

    #[test]
    fn test_deallocate() {
        let mut eng = ClassicalEngine::new();
        let reg = eng.allocate_qureg(2).unwrap();
        eng.deallocate_qureg(&reg).unwrap();
        assert_eq!(eng.num_allocated(), 0);
        assert!(matches!(
            eng.measure(reg[0]),
            Err(HalError::NotAllocated(_))
        ));
    }
}
