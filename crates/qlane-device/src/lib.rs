//! qlane Devices
//!
//! Devices are what a host framework with automatic differentiation talks
//! to. A host framework names operations and observables by string; a device
//! checks them against its tables, turns them into engine gates through the
//! shim layer, and answers expectation-value and variance queries.
//!
//! # Devices
//!
//! | Short name | Type | Engine trait | Measurement |
//! |------------|------|--------------|-------------|
//! | `qlane.simulator` | [`SimulatorDevice`] | `ExpectationEngine` | Exact, or binomial shot noise when `shots > 0` |
//! | `qlane.ibm` | [`IbmDevice`] | `ProbabilityEngine` | Basis rotation, measure-all, bitstring probabilities |
//! | `qlane.classical` | [`ClassicalDevice`] | `Engine` | Measured bits |
//!
//! # Execution cycle
//!
//! 1. [`Device::reset`] builds a fresh engine and allocates the register
//! 2. [`Device::apply`] for every operation (`BasisState` only as the first one)
//! 3. [`Device::set_observable_queue`] with the observables to come
//! 4. [`Device::pre_measure`]
//! 5. [`Device::expval`] / [`Device::var`] per observable
//! 6. [`Device::post_measure`] releases the register
//!
//! # Example
//!
//! ```
//! use qlane_device::{Device, Param, SimulatorConfig, SimulatorDevice};
//!
//! let mut dev = SimulatorDevice::new(SimulatorConfig::new(2)).unwrap();
//! dev.apply("RX", &[0], &[Param::Real(std::f64::consts::PI)]).unwrap();
//! dev.apply("CNOT", &[0, 1], &[]).unwrap();
//! dev.pre_measure().unwrap();
//! let z1 = dev.expval("PauliZ", &[1], &[]).unwrap();
//! dev.post_measure().unwrap();
//! assert!((z1 + 1.0).abs() < 1e-9);
//! ```

pub mod classical;
pub mod config;
pub mod device;
pub mod error;
pub mod ibm;
pub mod observable;
pub mod operation;
mod register;
pub mod registry;
mod sampling;
pub mod shim;
pub mod simulator;
pub mod table;

pub use classical::ClassicalDevice;
pub use config::{ClassicalConfig, DeviceOptions, IbmConfig, SimulatorConfig};
pub use device::{Circuit, Device, DeviceState};
pub use error::{DeviceError, DeviceResult, ErrorCategory};
pub use ibm::IbmDevice;
pub use observable::{ObservableKind, ObservableRequest, ReturnType};
pub use operation::{Operation, OperationKind, OperationRecord, Param, WireCount};
pub use registry::DeviceRegistry;
pub use shim::{RegisterOp, instantiate};
pub use simulator::SimulatorDevice;
pub use table::BackendKind;
