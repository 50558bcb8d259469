//! qlane Hardware Abstraction Layer
//!
//! This crate describes the *backend engine* a qlane device drives: the thing
//! that actually owns qubits, evolves state and measures. qlane itself never
//! simulates anything; devices translate host-framework calls into calls on
//! the traits defined here.
//!
//! # Overview
//!
//! - [`Engine`]: qubit allocation, gate application, measurement and flushing
//! - [`ExpectationEngine`]: analytic expectation values from engine amplitudes
//! - [`ProbabilityEngine`]: bitstring probability tables after measurement
//! - [`Gate`]: the native gate vocabulary an engine accepts
//! - [`QubitOperator`]: weighted Pauli strings for expectation queries
//! - [`Probabilities`]: bitstring → probability tables
//!
//! # Engines
//!
//! | Engine | Crate | Traits |
//! |--------|-------|--------|
//! | Statevector | `qlane-adapter-sim` | `Engine`, `ExpectationEngine`, `ProbabilityEngine` |
//! | Classical bits | `qlane-adapter-sim` | `Engine` |
//!
//! # Implementing an Engine
//!
//! ```ignore
//! use qlane_hal::{Engine, Gate, HalResult, QubitId};
//!
//! struct RemoteQueue { /* client handle */ }
//!
//! impl Engine for RemoteQueue {
//!     fn name(&self) -> &str { "remote" }
//!     fn allocate_qureg(&mut self, n: usize) -> HalResult<Vec<QubitId>> { todo!() }
//!     fn deallocate_qureg(&mut self, qubits: &[QubitId]) -> HalResult<()> { todo!() }
//!     fn apply(&mut self, gate: &Gate, qubits: &[QubitId]) -> HalResult<()> { todo!() }
//!     fn measure(&mut self, qubit: QubitId) -> HalResult<bool> { todo!() }
//!     fn flush(&mut self, deallocate: bool) -> HalResult<()> { todo!() }
//! }
//! ```

pub mod engine;
pub mod error;
pub mod gate;
pub mod operator;
pub mod probabilities;

pub use engine::{Engine, ExpectationEngine, ProbabilityEngine, QubitId};
pub use error::{HalError, HalResult};
pub use gate::{Gate, Matrix2};
pub use operator::{Pauli, PauliTerm, QubitOperator};
pub use probabilities::Probabilities;
