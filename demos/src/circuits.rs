//! Circuits used by the demos, in the host-framework record form.

use qlane_device::{Circuit, ObservableRequest, OperationRecord, Param};

/// `RX(φ1)`, `RY(φ2)` on wire 0, measuring `⟨Z₀⟩`.
pub fn qubit_rotation([phi1, phi2]: [f64; 2]) -> Circuit {
    Circuit {
        operations: vec![
            OperationRecord::new("RX", vec![0], vec![Param::Real(phi1)]),
            OperationRecord::new("RY", vec![0], vec![Param::Real(phi2)]),
        ],
        observables: vec![ObservableRequest::expval("PauliZ", vec![0])],
    }
}

/// Two-qubit ansatz: `H₀ RX₀(0.5) RY₁(0.9) CNOT₀₁`.
pub fn vqe_ansatz() -> Vec<OperationRecord> {
    vec![
        OperationRecord::new("Hadamard", vec![0], vec![]),
        OperationRecord::new("RX", vec![0], vec![Param::Real(0.5)]),
        OperationRecord::new("RY", vec![1], vec![Param::Real(0.9)]),
        OperationRecord::new("CNOT", vec![0, 1], vec![]),
    ]
}

/// The ansatz measuring `observable` on wire 1.
pub fn vqe_circuit(observable: &str) -> Circuit {
    Circuit {
        operations: vqe_ansatz(),
        observables: vec![ObservableRequest::expval(observable, vec![1])],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_rotation_shape() {
        let circuit = qubit_rotation([0.1, 0.2]);
        assert_eq!(circuit.operations.len(), 2);
        assert_eq!(circuit.operations[1].name, "RY");
        assert_eq!(circuit.operations[1].params, vec![Param::Real(0.2)]);
        assert_eq!(circuit.observables[0].wires, vec![0]);
    }

    #[test]
    fn test_vqe_circuit_measures_wire_one() {
        let circuit = vqe_circuit("PauliY");
        assert_eq!(circuit.operations.len(), 4);
        assert_eq!(circuit.observables[0].name, "PauliY");
        assert_eq!(circuit.observables[0].wires, vec![1]);
    }
}
