//! Engine traits.
//!
//! # Lifecycle
//!
//! ```text
//!   allocate_qureg() ──→ apply()* ──→ flush() ──→ measure()/query ──→ deallocate_qureg()
//! ```
//!
//! ## Method table
//!
//! | Trait | Method | Returns |
//! |-------|--------|---------|
//! | `Engine` | `name()` | `&str` |
//! | `Engine` | `allocate_qureg()` | `HalResult<Vec<QubitId>>` |
//! | `Engine` | `deallocate_qureg()` | `HalResult<()>` |
//! | `Engine` | `apply()` | `HalResult<()>` |
//! | `Engine` | `measure()` | `HalResult<bool>` |
//! | `Engine` | `flush()` | `HalResult<()>` |
//! | `ExpectationEngine` | `expectation_value()` | `HalResult<f64>` |
//! | `ProbabilityEngine` | `probabilities()` | `HalResult<Probabilities>` |
//!
//! All calls are synchronous and blocking. An engine that talks to a remote
//! queue blocks for the whole round trip; retries and polling are its own
//! business.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HalResult;
use crate::gate::Gate;
use crate::operator::QubitOperator;
use crate::probabilities::Probabilities;

/// Opaque handle for a qubit owned by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// A backend engine.
///
/// # Contract
///
/// - `allocate_qureg(n)` MUST return `n` fresh handles in the `|0⟩` state.
/// - `apply()` MAY buffer the gate; buffered gates MUST take effect no later
///   than the next `flush()`.
/// - `measure()` returns the observed bit and collapses the qubit, unless the
///   engine documents a deferred-measurement mode.
/// - `flush(false)` MUST leave qubits allocated; `flush(true)` releases
///   everything still allocated.
/// - `deallocate_qureg()` releases exactly the given handles.
pub trait Engine {
    /// Name of the engine.
    fn name(&self) -> &str;

    /// Allocate `n` qubits.
    fn allocate_qureg(&mut self, n: usize) -> HalResult<Vec<QubitId>>;

    /// Release the given qubits.
    fn deallocate_qureg(&mut self, qubits: &[QubitId]) -> HalResult<()>;

    /// Apply a native gate. For controlled gates the controls come first.
    fn apply(&mut self, gate: &Gate, qubits: &[QubitId]) -> HalResult<()>;

    /// Measure a single qubit in the computational basis.
    fn measure(&mut self, qubit: QubitId) -> HalResult<bool>;

    /// Execute all buffered gates.
    fn flush(&mut self, deallocate: bool) -> HalResult<()>;
}

/// Engine with access to its internal amplitudes.
pub trait ExpectationEngine: Engine {
    /// Expectation value of `operator`, whose local indices address `qubits`.
    ///
    /// MUST NOT disturb the state.
    fn expectation_value(&mut self, operator: &QubitOperator, qubits: &[QubitId])
    -> HalResult<f64>;
}

/// Engine that reports outcome probabilities for a register.
pub trait ProbabilityEngine: Engine {
    /// Outcome probabilities of `qubits`. Character `i` of each bitstring is
    /// the value of `qubits[i]`.
    fn probabilities(&mut self, qubits: &[QubitId]) -> HalResult<Probabilities>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_id_display() {
        assert_eq!(QubitId(3).to_string(), "q3");
    }

    #[test]
    fn test_qubit_id_serde() {
        let json = serde_json::to_string(&QubitId(7)).unwrap();
        assert_eq!(json, "7");
        let back: QubitId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QubitId(7));
    }
}
