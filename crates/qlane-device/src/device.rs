//! The host-framework device contract.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::DeviceResult;
use crate::observable::{ObservableRequest, ReturnType};
use crate::operation::{OperationRecord, Param};

/// Where a device is in its execution cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Fresh register, nothing applied yet.
    Allocated,
    /// At least one operation has been applied.
    Applying,
    /// `pre_measure` has run; expectation values may be read.
    Measuring,
    /// The register has been handed back to the engine.
    Released,
}

/// A circuit as handed over by the host framework.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Operations in application order.
    pub operations: Vec<OperationRecord>,
    /// Observables to evaluate at the end.
    #[serde(default)]
    pub observables: Vec<ObservableRequest>,
}

/// A device that executes circuits for a host framework.
///
/// One execution cycle is `reset`, `apply` for every operation,
/// `set_observable_queue`, `pre_measure`, `expval`/`var` per observable and
/// finally `post_measure`. [`Device::execute`] runs a whole cycle.
pub trait Device: Send {
    /// Name the host framework selects the device by.
    fn short_name(&self) -> &'static str;

    /// Number of wires.
    fn num_wires(&self) -> usize;

    /// Shots per expectation value; 0 means exact.
    fn shots(&self) -> u64;

    /// Change the shot count.
    fn set_shots(&mut self, shots: u64) -> DeviceResult<()>;

    /// Current lifecycle state.
    fn state(&self) -> DeviceState;

    /// Supported operation names.
    fn operations(&self) -> BTreeSet<&'static str>;

    /// Supported observable names.
    fn observables(&self) -> BTreeSet<&'static str>;

    /// Whether `name` may be passed to [`Device::apply`].
    fn supports_operation(&self, name: &str) -> bool {
        self.operations().contains(name)
    }

    /// Whether `name` may be passed to [`Device::expval`].
    fn supports_observable(&self, name: &str) -> bool {
        self.observables().contains(name)
    }

    /// Release any live register and start over with a fresh one in the
    /// all-zero state.
    fn reset(&mut self) -> DeviceResult<()>;

    /// Apply an operation.
    fn apply(&mut self, name: &str, wires: &[usize], params: &[Param]) -> DeviceResult<()>;

    /// Tell the device which observables will be requested.
    fn set_observable_queue(&mut self, queue: Vec<ObservableRequest>);

    /// Prepare for reading expectation values.
    fn pre_measure(&mut self) -> DeviceResult<()>;

    /// Expectation value of an observable.
    fn expval(&mut self, name: &str, wires: &[usize], params: &[Param]) -> DeviceResult<f64>;

    /// Variance of an observable; every supported observable squares to the
    /// identity.
    fn var(&mut self, name: &str, wires: &[usize], params: &[Param]) -> DeviceResult<f64> {
        let e = self.expval(name, wires, params)?;
        Ok(1.0 - e * e)
    }

    /// Finish the cycle and release the register.
    fn post_measure(&mut self) -> DeviceResult<()>;

    /// Run a full execution cycle and return one value per observable.
    #[instrument(skip_all, fields(device = self.short_name(), ops = circuit.operations.len()))]
    fn execute(&mut self, circuit: &Circuit) -> DeviceResult<Vec<f64>> {
        self.reset()?;
        for op in &circuit.operations {
            self.apply(&op.name, &op.wires, &op.params)?;
        }
        self.set_observable_queue(circuit.observables.clone());
        self.pre_measure()?;

        let mut results = Vec::with_capacity(circuit.observables.len());
        for obs in &circuit.observables {
            let value = match obs.return_type {
                ReturnType::Expectation => self.expval(&obs.name, &obs.wires, &obs.params)?,
                ReturnType::Variance => self.var(&obs.name, &obs.wires, &obs.params)?,
            };
            results.push(value);
        }

        self.post_measure()?;
        Ok(results)
    }
}
