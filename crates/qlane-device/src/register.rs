//! Register bookkeeping shared by every device.

use tracing::{debug, warn};

use qlane_hal::{Engine, QubitId};

use crate::device::DeviceState;
use crate::error::{DeviceError, DeviceResult};
use crate::observable::{ObservableKind, ObservableRequest};
use crate::operation::{Operation, OperationKind, Param};
use crate::shim::instantiate;
use crate::table::BackendKind;

/// Engine plus the register a device has allocated on it.
pub(crate) struct DeviceCore<E: Engine> {
    backend: BackendKind,
    num_wires: usize,
    engine: Option<E>,
    register: Vec<QubitId>,
    first_operation: bool,
    state: DeviceState,
    observable_queue: Option<Vec<ObservableRequest>>,
}

impl<E: Engine> DeviceCore<E> {
    /// Core with no engine yet; [`DeviceCore::reset`] installs one.
    pub(crate) fn new(backend: BackendKind, num_wires: usize) -> Self {
        Self {
            backend,
            num_wires,
            engine: None,
            register: Vec::new(),
            first_operation: true,
            state: DeviceState::Released,
            observable_queue: None,
        }
    }

    pub(crate) fn backend(&self) -> BackendKind {
        self.backend
    }

    pub(crate) fn num_wires(&self) -> usize {
        self.num_wires
    }

    pub(crate) fn state(&self) -> DeviceState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: DeviceState) {
        self.state = state;
    }

    pub(crate) fn register(&self) -> &[QubitId] {
        &self.register
    }

    pub(crate) fn engine_mut(&mut self) -> DeviceResult<&mut E> {
        self.engine.as_mut().ok_or(DeviceError::RegisterReleased)
    }

    pub(crate) fn observable_queue(&self) -> Option<&[ObservableRequest]> {
        self.observable_queue.as_deref()
    }

    pub(crate) fn set_observable_queue(&mut self, queue: Vec<ObservableRequest>) {
        self.observable_queue = Some(queue);
    }

    /// Hand the live register back to the engine.
    pub(crate) fn release(&mut self) -> DeviceResult<()> {
        if self.register.is_empty() {
            self.state = DeviceState::Released;
            return Ok(());
        }
        let register = std::mem::take(&mut self.register);
        self.state = DeviceState::Released;
        if let Some(engine) = self.engine.as_mut() {
            engine.deallocate_qureg(&register)?;
            debug!("Released {} qubit(s) on {}", register.len(), self.backend);
        }
        Ok(())
    }

    /// Replace the engine and allocate a fresh register on it.
    pub(crate) fn reset(&mut self, engine: E) -> DeviceResult<()> {
        self.release()?;
        let mut engine = engine;
        self.register = engine.allocate_qureg(self.num_wires)?;
        self.engine = Some(engine);
        self.first_operation = true;
        self.state = DeviceState::Allocated;
        debug!(
            "Allocated {} qubit(s) on {} ({})",
            self.num_wires,
            self.backend,
            self.engine.as_ref().map_or("none", |e| e.name())
        );
        Ok(())
    }

    /// Fail unless a register is allocated on an installed engine.
    pub(crate) fn ensure_live(&self) -> DeviceResult<()> {
        if self.state == DeviceState::Released || self.register.is_empty() || self.engine.is_none()
        {
            return Err(DeviceError::RegisterReleased);
        }
        Ok(())
    }

    /// Engine qubits for `wires`, checked for range and duplicates.
    pub(crate) fn qubits(&self, name: &str, wires: &[usize]) -> DeviceResult<Vec<QubitId>> {
        self.ensure_live()?;
        let mut qubits = Vec::with_capacity(wires.len());
        for (k, &wire) in wires.iter().enumerate() {
            if wire >= self.num_wires {
                return Err(DeviceError::WireOutOfRange {
                    wire,
                    num_wires: self.num_wires,
                });
            }
            if wires[..k].contains(&wire) {
                return Err(DeviceError::DuplicateWire {
                    name: name.into(),
                    wire,
                });
            }
            let qubit = self
                .register
                .get(wire)
                .copied()
                .ok_or(DeviceError::RegisterReleased)?;
            qubits.push(qubit);
        }
        Ok(qubits)
    }

    /// Validate and issue an operation.
    pub(crate) fn apply(
        &mut self,
        name: &str,
        wires: &[usize],
        params: &[Param],
    ) -> DeviceResult<()> {
        let kind = self.backend.operation(name)?;
        let op = Operation::from_parts(kind, wires.len(), params)?;
        let qubits = self.qubits(name, wires)?;

        if kind == OperationKind::BasisState && !self.first_operation {
            return Err(DeviceError::OperationOrder {
                operation: kind.name(),
                device: self.backend.short_name(),
            });
        }
        self.first_operation = false;
        self.state = DeviceState::Applying;

        let engine = self.engine_mut()?;
        instantiate(&op).apply_to(engine, &qubits)?;
        Ok(())
    }

    /// Resolve an observable against the device table and wires.
    pub(crate) fn observable(
        &self,
        name: &str,
        wires: &[usize],
    ) -> DeviceResult<(ObservableKind, QubitId)> {
        let kind = self.backend.observable(name)?;
        if wires.len() != 1 {
            return Err(DeviceError::WireArity {
                name: name.into(),
                expected: 1,
                actual: wires.len(),
            });
        }
        let qubits = self.qubits(name, wires)?;
        Ok((kind, qubits[0]))
    }
}

impl<E: Engine> Drop for DeviceCore<E> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to release register on {}: {}", self.backend, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlane_adapter_sim::ClassicalEngine;

    fn core(wires: usize) -> DeviceCore<ClassicalEngine> {
        let mut core = DeviceCore::new(BackendKind::Classical, wires);
        core.reset(ClassicalEngine::new()).unwrap();
        core
    }

    #[test]
    fn test_wire_checks() {
        let core = core(2);
        assert!(matches!(
            core.qubits("CNOT", &[0, 2]),
            Err(DeviceError::WireOutOfRange { wire: 2, num_wires: 2 })
        ));
        assert!(matches!(
            core.qubits("CNOT", &[1, 1]),
            Err(DeviceError::DuplicateWire { wire: 1, .. })
        ));
        assert_eq!(core.qubits("CNOT", &[1, 0]).unwrap().len(), 2);
    }

    #[test]
    fn test_basis_state_must_come_first() {
        let mut core = core(2);
        core.apply("BasisState", &[0, 1], &[Param::bits(&[1, 0])])
            .unwrap();
        let err = core
            .apply("BasisState", &[0, 1], &[Param::bits(&[0, 1])])
            .unwrap_err();
        assert!(matches!(err, DeviceError::OperationOrder { .. }));
    }

    #[test]
    fn test_reset_restores_first_operation() {
        let mut core = core(1);
        core.apply("PauliX", &[0], &[]).unwrap();
        core.reset(ClassicalEngine::new()).unwrap();
        assert_eq!(core.state(), DeviceState::Allocated);
        core.apply("BasisState", &[0], &[Param::bits(&[1])]).unwrap();
    }

    #[test]
    fn test_released_register_rejects_operations() {
        let mut core = core(1);
        core.release().unwrap();
        assert!(core.register().is_empty());
        assert!(matches!(
            core.apply("PauliX", &[0], &[]),
            Err(DeviceError::RegisterReleased)
        ));
    }

    #[test]
    fn test_released_register_is_not_live() {
        let mut core = core(2);
        assert!(core.ensure_live().is_ok());
        core.release().unwrap();
        core.set_state(DeviceState::Measuring);
        assert!(matches!(core.ensure_live(), Err(DeviceError::RegisterReleased)));
        assert!(matches!(
            core.qubits("PauliZ", &[0]),
            Err(DeviceError::RegisterReleased)
        ));
    }

    #[test]
    fn test_unsupported_operation_checked_first() {
        let mut core = core(1);
        let err = core.apply("Hadamard", &[5], &[]).unwrap_err();
        assert!(matches!(err, DeviceError::UnsupportedOperation { .. }));
    }
}
