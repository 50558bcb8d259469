//! Error types for the device crate.

use thiserror::Error;

use qlane_hal::HalError;

/// Broad class of a [`DeviceError`], as seen by the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Name not supported by the active device.
    Capability,
    /// Call made in the wrong order or with malformed arguments.
    Usage,
    /// Device could not be configured.
    Configuration,
    /// Deliberately unsupported feature.
    NotImplemented,
    /// Failure inside the backend engine.
    Engine,
}

/// Errors surfaced to the host framework.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeviceError {
    /// Operation is not in the device's operation table.
    #[error("Operation {name} not supported on device {device}")]
    UnsupportedOperation { name: String, device: &'static str },

    /// Observable is not in the device's observable table.
    #[error("Observable {name} not supported on device {device}")]
    UnsupportedObservable { name: String, device: &'static str },

    /// A state preparation was applied after other operations.
    #[error(
        "Operation {operation} cannot be used after other operations have already been applied on a {device} device"
    )]
    OperationOrder {
        operation: &'static str,
        device: &'static str,
    },

    /// Non-Z measurement requested without an observable queue.
    #[error(
        "Measurements in a basis other than PauliZ need the observable queue; {observable} was requested without one"
    )]
    MissingObservableQueue { observable: String },

    /// Two observables need different measurement bases on one wire.
    #[error("Observables {first} and {second} cannot both be measured on wires {wires:?}")]
    ConflictingBases {
        wires: Vec<usize>,
        first: &'static str,
        second: &'static str,
    },

    /// Wire index outside the register.
    #[error("Wire {wire} out of range for a device with {num_wires} wire(s)")]
    WireOutOfRange { wire: usize, num_wires: usize },

    /// The same wire was addressed twice by one operation.
    #[error("Wire {wire} used more than once by {name}")]
    DuplicateWire { name: String, wire: usize },

    /// Wrong number of wires for an operation or observable.
    #[error("{name} acts on {expected} wire(s), got {actual}")]
    WireArity {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Parameters do not fit the operation.
    #[error("Invalid parameters for {name}: {reason}")]
    InvalidParameters { name: String, reason: String },

    /// The register was released by `post_measure`; `reset` must run first.
    #[error("Register has been released; call reset() first")]
    RegisterReleased,

    /// No device registered under this name.
    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Feature deliberately not provided by this device.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Error raised by the backend engine.
    #[error("Engine error: {0}")]
    Engine(#[from] HalError),
}

impl DeviceError {
    /// Classify the error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeviceError::UnsupportedOperation { .. } | DeviceError::UnsupportedObservable { .. } => {
                ErrorCategory::Capability
            }
            DeviceError::OperationOrder { .. }
            | DeviceError::MissingObservableQueue { .. }
            | DeviceError::ConflictingBases { .. }
            | DeviceError::WireOutOfRange { .. }
            | DeviceError::DuplicateWire { .. }
            | DeviceError::WireArity { .. }
            | DeviceError::InvalidParameters { .. }
            | DeviceError::RegisterReleased => ErrorCategory::Usage,
            DeviceError::UnknownDevice(_) | DeviceError::Configuration(_) => {
                ErrorCategory::Configuration
            }
            DeviceError::NotImplemented(_) => ErrorCategory::NotImplemented,
            DeviceError::Engine(_) => ErrorCategory::Engine,
        }
    }
}

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let err = DeviceError::UnsupportedObservable {
            name: "Hermitian".into(),
            device: "qlane.classical",
        };
        assert_eq!(err.category(), ErrorCategory::Capability);

        let err = DeviceError::OperationOrder {
            operation: "BasisState",
            device: "qlane.ibm",
        };
        assert_eq!(err.category(), ErrorCategory::Usage);
        assert!(err.to_string().contains("qlane.ibm"));

        let err = DeviceError::from(HalError::Backend("boom".into()));
        assert_eq!(err.category(), ErrorCategory::Engine);
    }
}
