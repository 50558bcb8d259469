//! Native gate vocabulary of a backend engine.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Row-major 2x2 complex matrix.
pub type Matrix2 = [[Complex64; 2]; 2];

/// A gate the engine knows how to execute.
///
/// Angles are in radians. [`Gate::Controlled`] prepends one control qubit to
/// the wrapped gate's qubits and may be nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gate", content = "args", rename_all = "snake_case")]
pub enum Gate {
    X,
    Y,
    Z,
    H,
    S,
    T,
    SqrtX,
    Swap,
    SqrtSwap,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    /// Phase shift `diag(1, e^{iφ})`.
    R(f64),
    /// Arbitrary single-qubit gate given by its matrix.
    Matrix(Matrix2),
    Controlled(Box<Gate>),
}

impl Gate {
    /// Wrap a gate with one control qubit.
    pub fn controlled(gate: Gate) -> Self {
        Gate::Controlled(Box::new(gate))
    }

    /// Number of qubits the gate acts on, controls included.
    pub fn num_qubits(&self) -> usize {
        match self {
            Gate::Swap | Gate::SqrtSwap => 2,
            Gate::Controlled(inner) => 1 + inner.num_qubits(),
            _ => 1,
        }
    }

    /// Short engine-side name.
    pub fn name(&self) -> String {
        match self {
            Gate::X => "X".into(),
            Gate::Y => "Y".into(),
            Gate::Z => "Z".into(),
            Gate::H => "H".into(),
            Gate::S => "S".into(),
            Gate::T => "T".into(),
            Gate::SqrtX => "SqrtX".into(),
            Gate::Swap => "Swap".into(),
            Gate::SqrtSwap => "SqrtSwap".into(),
            Gate::Rx(_) => "Rx".into(),
            Gate::Ry(_) => "Ry".into(),
            Gate::Rz(_) => "Rz".into(),
            Gate::R(_) => "R".into(),
            Gate::Matrix(_) => "MatrixGate".into(),
            Gate::Controlled(inner) => format!("C({})", inner.name()),
        }
    }

    /// Number of control qubits and the innermost target gate.
    pub fn split_controls(&self) -> (usize, &Gate) {
        let mut controls = 0;
        let mut gate = self;
        while let Gate::Controlled(inner) = gate {
            controls += 1;
            gate = inner;
        }
        (controls, gate)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Rx(a) | Gate::Ry(a) | Gate::Rz(a) | Gate::R(a) => {
                write!(f, "{}({a})", self.name())
            }
            _ => f.write_str(&self.name()),
        }
    }
}
