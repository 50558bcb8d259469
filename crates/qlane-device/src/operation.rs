//! Operations submitted by the host framework.
//!
//! The host framework names operations with strings. At the device boundary a
//! name is parsed into an [`OperationKind`], the parameters are checked
//! against the kind's arity and shape, and the result is a typed
//! [`Operation`] that the shim layer can execute.

use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Deserializer, Serialize};

use qlane_hal::Matrix2;

use crate::error::{DeviceError, DeviceResult};

/// Tolerance for the unitarity check of `QubitUnitary` matrices.
const UNITARY_TOLERANCE: f64 = 1e-6;

/// Number of wires an operation acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireCount {
    /// A fixed number of wires.
    Exactly(usize),
    /// Any non-zero number of wires.
    Any,
}

impl WireCount {
    /// Whether `n` wires are acceptable.
    pub fn accepts(self, n: usize) -> bool {
        match self {
            WireCount::Exactly(k) => k == n,
            WireCount::Any => n > 0,
        }
    }
}

/// Every operation a qlane device may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    PauliX,
    PauliY,
    PauliZ,
    CNOT,
    CZ,
    SWAP,
    RX,
    RY,
    RZ,
    PhaseShift,
    Hadamard,
    Rot,
    QubitUnitary,
    BasisState,
    S,
    T,
    SqrtX,
    SqrtSwap,
}

impl OperationKind {
    /// All kinds, in table order.
    pub const ALL: [OperationKind; 18] = [
        OperationKind::PauliX,
        OperationKind::PauliY,
        OperationKind::PauliZ,
        OperationKind::CNOT,
        OperationKind::CZ,
        OperationKind::SWAP,
        OperationKind::RX,
        OperationKind::RY,
        OperationKind::RZ,
        OperationKind::PhaseShift,
        OperationKind::Hadamard,
        OperationKind::Rot,
        OperationKind::QubitUnitary,
        OperationKind::BasisState,
        OperationKind::S,
        OperationKind::T,
        OperationKind::SqrtX,
        OperationKind::SqrtSwap,
    ];

    /// Host-framework name.
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::PauliX => "PauliX",
            OperationKind::PauliY => "PauliY",
            OperationKind::PauliZ => "PauliZ",
            OperationKind::CNOT => "CNOT",
            OperationKind::CZ => "CZ",
            OperationKind::SWAP => "SWAP",
            OperationKind::RX => "RX",
            OperationKind::RY => "RY",
            OperationKind::RZ => "RZ",
            OperationKind::PhaseShift => "PhaseShift",
            OperationKind::Hadamard => "Hadamard",
            OperationKind::Rot => "Rot",
            OperationKind::QubitUnitary => "QubitUnitary",
            OperationKind::BasisState => "BasisState",
            OperationKind::S => "S",
            OperationKind::T => "T",
            OperationKind::SqrtX => "SqrtX",
            OperationKind::SqrtSwap => "SqrtSwap",
        }
    }

    /// Parse a host-framework name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Number of parameters.
    pub fn num_params(self) -> usize {
        match self {
            OperationKind::RX
            | OperationKind::RY
            | OperationKind::RZ
            | OperationKind::PhaseShift
            | OperationKind::QubitUnitary
            | OperationKind::BasisState => 1,
            OperationKind::Rot => 3,
            _ => 0,
        }
    }

    /// Number of wires.
    pub fn num_wires(self) -> WireCount {
        match self {
            OperationKind::CNOT
            | OperationKind::CZ
            | OperationKind::SWAP
            | OperationKind::SqrtSwap => WireCount::Exactly(2),
            OperationKind::BasisState => WireCount::Any,
            _ => WireCount::Exactly(1),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single operation or observable parameter.
///
/// Serialized untagged: a JSON number, a flat array of numbers, or a nested
/// array of matrix rows. Matrix entries are written as `[re, im]` pairs and
/// may also be plain numbers when they are real.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Real(f64),
    Vector(Vec<f64>),
    #[serde(deserialize_with = "matrix_rows")]
    Matrix(Vec<Vec<Complex64>>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MatrixEntry {
    Real(f64),
    Complex(Complex64),
}

impl From<MatrixEntry> for Complex64 {
    fn from(entry: MatrixEntry) -> Self {
        match entry {
            MatrixEntry::Real(re) => Complex64::new(re, 0.0),
            MatrixEntry::Complex(c) => c,
        }
    }
}

fn matrix_rows<'de, D>(deserializer: D) -> Result<Vec<Vec<Complex64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Vec::<Vec<MatrixEntry>>::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(Complex64::from).collect())
        .collect())
}

impl Param {
    /// Bit-pattern parameter.
    pub fn bits(bits: &[u8]) -> Self {
        Param::Vector(bits.iter().map(|&b| f64::from(b)).collect())
    }

    /// Matrix parameter from a 2x2 matrix.
    pub fn matrix(m: Matrix2) -> Self {
        Param::Matrix(m.iter().map(|row| row.to_vec()).collect())
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Real(value)
    }
}

/// An operation as submitted by the host framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub name: String,
    pub wires: Vec<usize>,
    #[serde(default)]
    pub params: Vec<Param>,
}

impl OperationRecord {
    /// Create a record.
    pub fn new(name: impl Into<String>, wires: Vec<usize>, params: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            wires,
            params,
        }
    }
}

/// A validated operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    PauliX,
    PauliY,
    PauliZ,
    CNOT,
    CZ,
    Swap,
    RX(f64),
    RY(f64),
    RZ(f64),
    PhaseShift(f64),
    Hadamard,
    Rot { phi: f64, theta: f64, omega: f64 },
    QubitUnitary(Matrix2),
    BasisState(Vec<u8>),
    S,
    T,
    SqrtX,
    SqrtSwap,
}

impl Operation {
    /// Validate parameters and wire count for `kind`.
    pub fn from_parts(
        kind: OperationKind,
        num_wires: usize,
        params: &[Param],
    ) -> DeviceResult<Self> {
        let name = kind.name();
        if !kind.num_wires().accepts(num_wires) {
            let expected = match kind.num_wires() {
                WireCount::Exactly(k) => k,
                WireCount::Any => 1,
            };
            return Err(DeviceError::WireArity {
                name: name.into(),
                expected,
                actual: num_wires,
            });
        }
        if params.len() != kind.num_params() {
            return Err(invalid(
                name,
                format!("expected {} parameter(s), got {}", kind.num_params(), params.len()),
            ));
        }

        let op = match kind {
            OperationKind::PauliX => Operation::PauliX,
            OperationKind::PauliY => Operation::PauliY,
            OperationKind::PauliZ => Operation::PauliZ,
            OperationKind::CNOT => Operation::CNOT,
            OperationKind::CZ => Operation::CZ,
            OperationKind::SWAP => Operation::Swap,
            OperationKind::RX => Operation::RX(real(name, &params[0])?),
            OperationKind::RY => Operation::RY(real(name, &params[0])?),
            OperationKind::RZ => Operation::RZ(real(name, &params[0])?),
            OperationKind::PhaseShift => Operation::PhaseShift(real(name, &params[0])?),
            OperationKind::Hadamard => Operation::Hadamard,
            OperationKind::Rot => Operation::Rot {
                phi: real(name, &params[0])?,
                theta: real(name, &params[1])?,
                omega: real(name, &params[2])?,
            },
            OperationKind::QubitUnitary => Operation::QubitUnitary(unitary(name, &params[0])?),
            OperationKind::BasisState => Operation::BasisState(bits(name, &params[0], num_wires)?),
            OperationKind::S => Operation::S,
            OperationKind::T => Operation::T,
            OperationKind::SqrtX => Operation::SqrtX,
            OperationKind::SqrtSwap => Operation::SqrtSwap,
        };
        Ok(op)
    }

    /// Kind of this operation.
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::PauliX => OperationKind::PauliX,
            Operation::PauliY => OperationKind::PauliY,
            Operation::PauliZ => OperationKind::PauliZ,
            Operation::CNOT => OperationKind::CNOT,
            Operation::CZ => OperationKind::CZ,
            Operation::Swap => OperationKind::SWAP,
            Operation::RX(_) => OperationKind::RX,
            Operation::RY(_) => OperationKind::RY,
            Operation::RZ(_) => OperationKind::RZ,
            Operation::PhaseShift(_) => OperationKind::PhaseShift,
            Operation::Hadamard => OperationKind::Hadamard,
            Operation::Rot { .. } => OperationKind::Rot,
            Operation::QubitUnitary(_) => OperationKind::QubitUnitary,
            Operation::BasisState(_) => OperationKind::BasisState,
            Operation::S => OperationKind::S,
            Operation::T => OperationKind::T,
            Operation::SqrtX => OperationKind::SqrtX,
            Operation::SqrtSwap => OperationKind::SqrtSwap,
        }
    }
}

fn invalid(name: &str, reason: impl Into<String>) -> DeviceError {
    DeviceError::InvalidParameters {
        name: name.into(),
        reason: reason.into(),
    }
}

fn real(name: &str, param: &Param) -> DeviceResult<f64> {
    match param {
        Param::Real(v) if v.is_finite() => Ok(*v),
        Param::Real(v) => Err(invalid(name, format!("angle {v} is not finite"))),
        _ => Err(invalid(name, "expected a real number")),
    }
}

fn bits(name: &str, param: &Param, num_wires: usize) -> DeviceResult<Vec<u8>> {
    let Param::Vector(values) = param else {
        return Err(invalid(name, "expected a bit pattern"));
    };
    if values.len() != num_wires {
        return Err(invalid(
            name,
            format!(
                "bit pattern has length {} but {num_wires} wire(s) were given",
                values.len()
            ),
        ));
    }
    values
        .iter()
        .map(|&v| {
            if v == 0.0 {
                Ok(0)
            } else if v == 1.0 {
                Ok(1)
            } else {
                Err(invalid(name, format!("{v} is not a bit")))
            }
        })
        .collect()
}

fn unitary(name: &str, param: &Param) -> DeviceResult<Matrix2> {
    let Param::Matrix(rows) = param else {
        return Err(invalid(name, "expected a 2x2 complex matrix"));
    };
    if rows.len() != 2 || rows.iter().any(|r| r.len() != 2) {
        return Err(invalid(name, "expected a 2x2 complex matrix"));
    }
    let m: Matrix2 = [[rows[0][0], rows[0][1]], [rows[1][0], rows[1][1]]];

    // U U† = I
    for i in 0..2 {
        for j in 0..2 {
            let entry: Complex64 = (0..2).map(|k| m[i][k] * m[j][k].conj()).sum();
            let target = if i == j { 1.0 } else { 0.0 };
            if (entry - Complex64::new(target, 0.0)).norm() > UNITARY_TOLERANCE {
                return Err(invalid(name, "matrix is not unitary"));
            }
        }
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for kind in OperationKind::ALL {
            assert_eq!(OperationKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(OperationKind::from_name("Toffoli"), None);
    }

    #[test]
    fn test_rot_parameters() {
        let params = [Param::Real(0.1), Param::Real(0.2), Param::Real(0.3)];
        let op = Operation::from_parts(OperationKind::Rot, 1, &params).unwrap();
        assert_eq!(
            op,
            Operation::Rot {
                phi: 0.1,
                theta: 0.2,
                omega: 0.3
            }
        );
        assert_eq!(op.kind(), OperationKind::Rot);
    }

    #[test]
    fn test_parameter_count_checked() {
        let err = Operation::from_parts(OperationKind::RX, 1, &[]).unwrap_err();
        assert!(matches!(err, DeviceError::InvalidParameters { .. }));
    }

    #[test]
    fn test_wire_count_checked() {
        let err = Operation::from_parts(OperationKind::CNOT, 1, &[]).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::WireArity {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_basis_state_bits() {
        let op = Operation::from_parts(OperationKind::BasisState, 4, &[Param::bits(&[1, 1, 1, 0])])
            .unwrap();
        assert_eq!(op, Operation::BasisState(vec![1, 1, 1, 0]));

        assert!(
            Operation::from_parts(OperationKind::BasisState, 3, &[Param::bits(&[1, 0])]).is_err()
        );
        assert!(
            Operation::from_parts(
                OperationKind::BasisState,
                2,
                &[Param::Vector(vec![0.5, 1.0])]
            )
            .is_err()
        );
    }

    #[test]
    fn test_unitary_check() {
        let h = 1.0 / 2.0_f64.sqrt();
        let c = |re: f64| Complex64::new(re, 0.0);
        let hadamard = [[c(h), c(h)], [c(h), c(-h)]];
        assert!(
            Operation::from_parts(OperationKind::QubitUnitary, 1, &[Param::matrix(hadamard)])
                .is_ok()
        );

        let not_unitary = [[c(1.0), c(1.0)], [c(0.0), c(1.0)]];
        assert!(
            Operation::from_parts(OperationKind::QubitUnitary, 1, &[Param::matrix(not_unitary)])
                .is_err()
        );
    }

    #[test]
    fn test_real_matrix_entries() {
        let c = |re: f64| Complex64::new(re, 0.0);
        let pauli_x = Param::matrix([[c(0.0), c(1.0)], [c(1.0), c(0.0)]]);

        let json = r#"{"name": "QubitUnitary", "wires": [0], "params": [[[0, 1], [1, 0]]]}"#;
        let record: OperationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.params, vec![pauli_x.clone()]);

        let json = r#"{"name": "QubitUnitary", "wires": [0],
                       "params": [[[0, [1, 0]], [1.0, [0, 0]]]]}"#;
        let record: OperationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.params, vec![pauli_x]);
        assert!(Operation::from_parts(OperationKind::QubitUnitary, 1, &record.params).is_ok());
    }

    #[test]
    fn test_record_json() {
        let json = r#"{"name": "BasisState", "wires": [0, 1], "params": [[1, 0]]}"#;
        let record: OperationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.params, vec![Param::Vector(vec![1.0, 0.0])]);

        let json = r#"{"name": "RX", "wires": [0], "params": [0.5]}"#;
        let record: OperationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.params, vec![Param::Real(0.5)]);

        let json = r#"{"name": "QubitUnitary", "wires": [0],
                       "params": [[[[0, 0], [1, 0]], [[1, 0], [0, 0]]]]}"#;
        let record: OperationRecord = serde_json::from_str(json).unwrap();
        assert!(matches!(record.params[0], Param::Matrix(_)));

        let json = r#"{"name": "Hadamard", "wires": [1]}"#;
        let record: OperationRecord = serde_json::from_str(json).unwrap();
        assert!(record.params.is_empty());
    }
}
