//! Error types for the HAL crate.

use thiserror::Error;

use crate::engine::QubitId;

/// Errors raised by a backend engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Qubit handle does not belong to the engine.
    #[error("Invalid qubit: {0}")]
    InvalidQubit(QubitId),

    /// Qubit was already released.
    #[error("Qubit {0} is not allocated")]
    NotAllocated(QubitId),

    /// Gate is not part of the engine's native set.
    #[error("Unsupported gate: {0}")]
    UnsupportedGate(String),

    /// Gate was applied to the wrong number of qubits.
    #[error("Gate {gate} acts on {expected} qubit(s), got {actual}")]
    ArityMismatch {
        /// Gate name.
        gate: String,
        /// Qubits the gate needs.
        expected: usize,
        /// Qubits supplied.
        actual: usize,
    },

    /// Qubit was used after it had been measured in a mode that forbids it.
    #[error("Qubit {0} has already been measured")]
    Measured(QubitId),

    /// Engine was configured inconsistently.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic engine failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
