//! Gate-wrapper shims.
//!
//! Every validated [`Operation`] is turned into a [`RegisterOp`] by
//! [`instantiate`]. Operations the engine knows natively become a
//! [`NativeGate`]; the rest are composed from native gates here. Device code
//! only ever sees `RegisterOp`.
//!
//! Shims compare by value: two `Rot` shims with the same angles are equal,
//! regardless of where they were built.

use std::any::Any;
use std::fmt;

use qlane_hal::{Engine, Gate, HalError, HalResult, Matrix2, QubitId};

use crate::operation::Operation;

/// Value comparison across trait objects.
pub trait DynEq {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
}

impl<T: PartialEq + 'static> DynEq for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|o| self == o)
    }
}

/// Something that can be applied to a slice of engine qubits.
pub trait RegisterOp: fmt::Debug + DynEq {
    /// Name of the shim.
    fn name(&self) -> &'static str;

    /// Issue the operation on `qubits`.
    fn apply_to(&self, engine: &mut dyn Engine, qubits: &[QubitId]) -> HalResult<()>;
}

impl PartialEq for dyn RegisterOp {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other.as_any())
    }
}

fn single(name: &str, qubits: &[QubitId]) -> HalResult<QubitId> {
    match qubits {
        [q] => Ok(*q),
        _ => Err(HalError::ArityMismatch {
            gate: name.into(),
            expected: 1,
            actual: qubits.len(),
        }),
    }
}

/// A gate the engine supports directly.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeGate(pub Gate);

impl RegisterOp for NativeGate {
    fn name(&self) -> &'static str {
        "NativeGate"
    }

    fn apply_to(&self, engine: &mut dyn Engine, qubits: &[QubitId]) -> HalResult<()> {
        engine.apply(&self.0, qubits)
    }
}

/// Single-controlled gate; the first qubit is the control.
#[derive(Debug, Clone, PartialEq)]
pub struct Controlled(pub Gate);

impl RegisterOp for Controlled {
    fn name(&self) -> &'static str {
        "Controlled"
    }

    fn apply_to(&self, engine: &mut dyn Engine, qubits: &[QubitId]) -> HalResult<()> {
        engine.apply(&Gate::controlled(self.0.clone()), qubits)
    }
}

/// Arbitrary single-qubit rotation `RZ(ω) RY(θ) RZ(φ)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rot {
    pub phi: f64,
    pub theta: f64,
    pub omega: f64,
}

impl RegisterOp for Rot {
    fn name(&self) -> &'static str {
        "Rot"
    }

    fn apply_to(&self, engine: &mut dyn Engine, qubits: &[QubitId]) -> HalResult<()> {
        let q = [single(self.name(), qubits)?];
        engine.apply(&Gate::Rz(self.phi), &q)?;
        engine.apply(&Gate::Ry(self.theta), &q)?;
        engine.apply(&Gate::Rz(self.omega), &q)
    }
}

/// Single-qubit gate given by its unitary matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct QubitUnitary(pub Matrix2);

impl RegisterOp for QubitUnitary {
    fn name(&self) -> &'static str {
        "QubitUnitary"
    }

    fn apply_to(&self, engine: &mut dyn Engine, qubits: &[QubitId]) -> HalResult<()> {
        let q = single(self.name(), qubits)?;
        engine.apply(&Gate::Matrix(self.0), &[q])
    }
}

/// Computational basis-state preparation from `|0…0⟩`.
///
/// Flips every qubit whose target bit is 1, so it only prepares the intended
/// state on a fresh register.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisState(pub Vec<u8>);

impl RegisterOp for BasisState {
    fn name(&self) -> &'static str {
        "BasisState"
    }

    fn apply_to(&self, engine: &mut dyn Engine, qubits: &[QubitId]) -> HalResult<()> {
        if qubits.len() != self.0.len() {
            return Err(HalError::ArityMismatch {
                gate: self.name().into(),
                expected: self.0.len(),
                actual: qubits.len(),
            });
        }
        for (q, bit) in qubits.iter().zip(&self.0) {
            if *bit == 1 {
                engine.apply(&Gate::X, &[*q])?;
            }
        }
        Ok(())
    }
}

/// Build the register-level form of an operation.
pub fn instantiate(op: &Operation) -> Box<dyn RegisterOp> {
    match op {
        Operation::PauliX => Box::new(NativeGate(Gate::X)),
        Operation::PauliY => Box::new(NativeGate(Gate::Y)),
        Operation::PauliZ => Box::new(NativeGate(Gate::Z)),
        Operation::CNOT => Box::new(Controlled(Gate::X)),
        Operation::CZ => Box::new(Controlled(Gate::Z)),
        Operation::Swap => Box::new(NativeGate(Gate::Swap)),
        Operation::RX(t) => Box::new(NativeGate(Gate::Rx(*t))),
        Operation::RY(t) => Box::new(NativeGate(Gate::Ry(*t))),
        Operation::RZ(t) => Box::new(NativeGate(Gate::Rz(*t))),
        Operation::PhaseShift(p) => Box::new(NativeGate(Gate::R(*p))),
        Operation::Hadamard => Box::new(NativeGate(Gate::H)),
        Operation::Rot { phi, theta, omega } => Box::new(Rot {
            phi: *phi,
            theta: *theta,
            omega: *omega,
        }),
        Operation::QubitUnitary(m) => Box::new(QubitUnitary(*m)),
        Operation::BasisState(bits) => Box::new(BasisState(bits.clone())),
        Operation::S => Box::new(NativeGate(Gate::S)),
        Operation::T => Box::new(NativeGate(Gate::T)),
        Operation::SqrtX => Box::new(NativeGate(Gate::SqrtX)),
        Operation::SqrtSwap => Box::new(NativeGate(Gate::SqrtSwap)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Engine that records every gate it receives.
    #[derive(Default)]
    struct Recorder {
        applied: Vec<(Gate, Vec<QubitId>)>,
    }

    impl Engine for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn allocate_qureg(&mut self, n: usize) -> HalResult<Vec<QubitId>> {
            Ok((0..n as u32).map(QubitId).collect())
        }

        fn deallocate_qureg(&mut self, _qubits: &[QubitId]) -> HalResult<()> {
            Ok(())
        }

        fn apply(&mut self, gate: &Gate, qubits: &[QubitId]) -> HalResult<()> {
            self.applied.push((gate.clone(), qubits.to_vec()));
            Ok(())
        }

        fn measure(&mut self, _qubit: QubitId) -> HalResult<bool> {
            Ok(false)
        }

        fn flush(&mut self, _deallocate: bool) -> HalResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_rot_decomposition() {
        let mut engine = Recorder::default();
        let rot = instantiate(&Operation::Rot {
            phi: 0.1,
            theta: 0.2,
            omega: 0.3,
        });
        rot.apply_to(&mut engine, &[QubitId(0)]).unwrap();
        let gates: Vec<_> = engine.applied.iter().map(|(g, _)| g.clone()).collect();
        assert_eq!(gates, vec![Gate::Rz(0.1), Gate::Ry(0.2), Gate::Rz(0.3)]);
    }

    #[test]
    fn test_basis_state_flips_ones() {
        let mut engine = Recorder::default();
        let reg = engine.allocate_qureg(4).unwrap();
        BasisState(vec![1, 1, 1, 0])
            .apply_to(&mut engine, &reg)
            .unwrap();
        let targets: Vec<_> = engine.applied.iter().map(|(_, q)| q[0]).collect();
        assert_eq!(targets, vec![QubitId(0), QubitId(1), QubitId(2)]);
        assert!(engine.applied.iter().all(|(g, _)| *g == Gate::X));
    }

    #[test]
    fn test_cnot_is_controlled_x() {
        let mut engine = Recorder::default();
        instantiate(&Operation::CNOT)
            .apply_to(&mut engine, &[QubitId(0), QubitId(1)])
            .unwrap();
        assert_eq!(engine.applied[0].0, Gate::controlled(Gate::X));
    }

    #[test]
    fn test_structural_equality() {
        let a = instantiate(&Operation::Rot {
            phi: 0.1,
            theta: 0.2,
            omega: 0.3,
        });
        let b = instantiate(&Operation::Rot {
            phi: 0.1,
            theta: 0.2,
            omega: 0.3,
        });
        let c = instantiate(&Operation::Rot {
            phi: 0.1,
            theta: 0.2,
            omega: 0.4,
        });
        assert!(*a == *b);
        assert!(*a != *c);

        let bs1 = instantiate(&Operation::BasisState(vec![1, 0]));
        let bs2 = instantiate(&Operation::BasisState(vec![1, 0]));
        assert!(*bs1 == *bs2);
        assert!(*bs1 != *a);
    }

    #[test]
    fn test_single_qubit_shim_rejects_two_qubits() {
        let mut engine = Recorder::default();
        let err = Rot {
            phi: 0.0,
            theta: 0.0,
            omega: 0.0,
        }
        .apply_to(&mut engine, &[QubitId(0), QubitId(1)])
        .unwrap_err();
        assert!(matches!(err, HalError::ArityMismatch { .. }));
    }
}
