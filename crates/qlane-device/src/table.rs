//! Per-backend operation and observable tables.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, DeviceResult};
use crate::observable::ObservableKind;
use crate::operation::OperationKind;

const SIMULATOR_OPERATIONS: &[OperationKind] = &OperationKind::ALL;

const IBM_OPERATIONS: &[OperationKind] = &[
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
    OperationKind::BasisState,
    OperationKind::S,
    OperationKind::T,
    OperationKind::SqrtX,
    OperationKind::SqrtSwap,
];

const CLASSICAL_OPERATIONS: &[OperationKind] = &[
    OperationKind::PauliX,
    OperationKind::CNOT,
    OperationKind::BasisState,
];

const QUANTUM_OBSERVABLES: &[ObservableKind] = &[
    ObservableKind::PauliX,
    ObservableKind::PauliY,
    ObservableKind::PauliZ,
    ObservableKind::Hadamard,
    ObservableKind::Identity,
];

const CLASSICAL_OBSERVABLES: &[ObservableKind] =
    &[ObservableKind::PauliZ, ObservableKind::Identity];

const SIMULATOR_OPTIONS: &[&str] = &["wires", "shots", "gate_fusion", "rnd_seed", "verbose"];

const IBM_OPTIONS: &[&str] = &[
    "wires",
    "shots",
    "num_runs",
    "use_hardware",
    "user",
    "password",
    "device",
    "retrieve_execution",
    "verbose",
];

const CLASSICAL_OPTIONS: &[&str] = &["wires", "verbose"];

/// The backend a device drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Exact statevector simulation with optional shot-noise emulation.
    Simulator,
    /// Queue-style backend that only measures in the Z basis.
    Ibm,
    /// Classical bit simulation.
    Classical,
}

impl BackendKind {
    /// All backends.
    pub const ALL: [BackendKind; 3] = [
        BackendKind::Simulator,
        BackendKind::Ibm,
        BackendKind::Classical,
    ];

    /// Device short name used for lookup and configuration sections.
    pub fn short_name(self) -> &'static str {
        match self {
            BackendKind::Simulator => "qlane.simulator",
            BackendKind::Ibm => "qlane.ibm",
            BackendKind::Classical => "qlane.classical",
        }
    }

    /// Resolve a short name (`qlane.ibm`) or bare backend name (`ibm`).
    pub fn from_name(name: &str) -> DeviceResult<Self> {
        let bare = name.strip_prefix("qlane.").unwrap_or(name);
        match bare.to_lowercase().as_str() {
            "simulator" | "sim" => Ok(BackendKind::Simulator),
            "ibm" | "ibmbackend" => Ok(BackendKind::Ibm),
            "classical" | "classicalsimulator" => Ok(BackendKind::Classical),
            _ => Err(DeviceError::UnknownDevice(name.to_string())),
        }
    }

    /// Operations the backend accepts.
    pub fn operation_table(self) -> &'static [OperationKind] {
        match self {
            BackendKind::Simulator => SIMULATOR_OPERATIONS,
            BackendKind::Ibm => IBM_OPERATIONS,
            BackendKind::Classical => CLASSICAL_OPERATIONS,
        }
    }

    /// Observables the backend can measure.
    pub fn observable_table(self) -> &'static [ObservableKind] {
        match self {
            BackendKind::Simulator | BackendKind::Ibm => QUANTUM_OBSERVABLES,
            BackendKind::Classical => CLASSICAL_OBSERVABLES,
        }
    }

    /// Configuration keys the backend understands.
    pub fn option_keys(self) -> &'static [&'static str] {
        match self {
            BackendKind::Simulator => SIMULATOR_OPTIONS,
            BackendKind::Ibm => IBM_OPTIONS,
            BackendKind::Classical => CLASSICAL_OPTIONS,
        }
    }

    /// Supported operation names.
    pub fn operations(self) -> BTreeSet<&'static str> {
        self.operation_table().iter().map(|k| k.name()).collect()
    }

    /// Supported observable names.
    pub fn observables(self) -> BTreeSet<&'static str> {
        self.observable_table().iter().map(|k| k.name()).collect()
    }

    /// Look up an operation, failing with a capability error.
    pub fn operation(self, name: &str) -> DeviceResult<OperationKind> {
        OperationKind::from_name(name)
            .filter(|k| self.operation_table().contains(k))
            .ok_or_else(|| DeviceError::UnsupportedOperation {
                name: name.to_string(),
                device: self.short_name(),
            })
    }

    /// Look up an observable, failing with a capability error.
    pub fn observable(self, name: &str) -> DeviceResult<ObservableKind> {
        ObservableKind::from_name(name)
            .filter(|k| self.observable_table().contains(k))
            .ok_or_else(|| DeviceError::UnsupportedObservable {
                name: name.to_string(),
                device: self.short_name(),
            })
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ibm_lacks_qubit_unitary() {
        let ops = BackendKind::Ibm.operations();
        assert!(!ops.contains("QubitUnitary"));
        assert_eq!(ops.len(), BackendKind::Simulator.operations().len() - 1);
    }

    #[test]
    fn test_classical_tables() {
        assert_eq!(
            BackendKind::Classical.operations(),
            ["BasisState", "CNOT", "PauliX"].into_iter().collect()
        );
        assert_eq!(
            BackendKind::Classical.observables(),
            ["Identity", "PauliZ"].into_iter().collect()
        );
    }

    #[test]
    fn test_hermitian_never_in_tables() {
        for backend in BackendKind::ALL {
            assert!(!backend.observables().contains("Hermitian"));
            assert!(backend.observable("Hermitian").is_err());
        }
    }

    #[test]
    fn test_lookup_errors_are_capability_errors() {
        let err = BackendKind::Classical.operation("Hadamard").unwrap_err();
        assert!(matches!(err, DeviceError::UnsupportedOperation { .. }));
        let err = BackendKind::Simulator.operation("Toffoli").unwrap_err();
        assert!(matches!(err, DeviceError::UnsupportedOperation { .. }));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(BackendKind::from_name("qlane.ibm").unwrap(), BackendKind::Ibm);
        assert_eq!(BackendKind::from_name("simulator").unwrap(), BackendKind::Simulator);
        assert!(BackendKind::from_name("qlane.braket").is_err());
    }
}
