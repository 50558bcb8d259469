//! qlane In-Process Engines
//!
//! Local backend engines implementing the `qlane-hal` traits, for running
//! devices without a remote service.
//!
//! # Engines
//!
//! - [`StatevectorEngine`]: dense statevector over every allocated qubit.
//!   Implements `Engine`, `ExpectationEngine` and `ProbabilityEngine`.
//!   With `num_runs` set, probability tables are estimated from that many
//!   sampled shots instead of being exact, which is how a queue-style device
//!   sees its results. `deferred_measurement` keeps the state intact across
//!   a measure-all so those tables can still be read afterwards.
//! - [`ClassicalEngine`]: one classical bit per qubit; only `X` and
//!   (multi-)controlled `X` are accepted.
//!
//! # Memory
//!
//! | Qubits | Statevector |
//! |--------|-------------|
//! | 10 | ~16 KB |
//! | 20 | ~16 MB |
//! | 24 | ~256 MB |
//!
//! # Example
//!
//! ```
//! use qlane_adapter_sim::{StatevectorConfig, StatevectorEngine};
//! use qlane_hal::{Engine, ExpectationEngine, Gate, Pauli, QubitOperator};
//!
//! let mut engine = StatevectorEngine::new(StatevectorConfig::default().with_seed(7));
//! let reg = engine.allocate_qureg(1).unwrap();
//! engine.apply(&Gate::X, &reg).unwrap();
//! engine.flush(false).unwrap();
//!
//! let z = engine
//!     .expectation_value(&QubitOperator::pauli(Pauli::Z, 0), &reg)
//!     .unwrap();
//! assert!((z + 1.0).abs() < 1e-12);
//! ```

mod classical;
mod statevector;

pub use classical::ClassicalEngine;
pub use statevector::{StatevectorConfig, StatevectorEngine};
