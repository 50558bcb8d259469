//! The `qlane.classical` device.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use tracing::instrument;

use qlane_hal::{Engine, HalResult, QubitId};

use crate::config::ClassicalConfig;
use crate::device::{Device, DeviceState};
use crate::error::{DeviceError, DeviceResult};
use crate::observable::{ObservableKind, ObservableRequest};
use crate::operation::Param;
use crate::register::DeviceCore;
use crate::table::BackendKind;

/// Builds a fresh engine for every execution cycle.
pub type ClassicalFactory<E> = Box<dyn FnMut(&ClassicalConfig) -> HalResult<E> + Send>;

#[doc = include_str!("../docs/classical.md")]
pub struct ClassicalDevice<E: Engine> {
    config: ClassicalConfig,
    factory: ClassicalFactory<E>,
    core: DeviceCore<E>,
    measured: FxHashMap<QubitId, bool>,
}

impl<E: Engine + Send> ClassicalDevice<E> {
    /// Create a device whose engines come from `factory`.
    pub fn with_factory(
        config: ClassicalConfig,
        factory: impl FnMut(&ClassicalConfig) -> HalResult<E> + Send + 'static,
    ) -> DeviceResult<Self> {
        config.validate()?;
        let mut device = Self {
            core: DeviceCore::new(BackendKind::Classical, config.wires),
            config,
            factory: Box::new(factory),
            measured: FxHashMap::default(),
        };
        device.reset()?;
        Ok(device)
    }

    /// Device configuration.
    pub fn config(&self) -> &ClassicalConfig {
        &self.config
    }
}

#[cfg(feature = "local-engines")]
impl ClassicalDevice<qlane_adapter_sim::ClassicalEngine> {
    /// Create a device backed by the in-process bit engine.
    pub fn new(config: ClassicalConfig) -> DeviceResult<Self> {
        Self::with_factory(config, |config| {
            Ok(qlane_adapter_sim::ClassicalEngine::new().with_verbose(config.verbose))
        })
    }
}

impl<E: Engine + Send> Device for ClassicalDevice<E> {
    fn short_name(&self) -> &'static str {
        BackendKind::Classical.short_name()
    }

    fn num_wires(&self) -> usize {
        self.core.num_wires()
    }

    fn shots(&self) -> u64 {
        0
    }

    fn set_shots(&mut self, shots: u64) -> DeviceResult<()> {
        if shots != 0 {
            return Err(DeviceError::Configuration(
                "qlane.classical is deterministic and only supports shots = 0".into(),
            ));
        }
        Ok(())
    }

    fn state(&self) -> DeviceState {
        self.core.state()
    }

    fn operations(&self) -> BTreeSet<&'static str> {
        self.core.backend().operations()
    }

    fn observables(&self) -> BTreeSet<&'static str> {
        self.core.backend().observables()
    }

    #[instrument(skip(self), fields(device = "qlane.classical"))]
    fn reset(&mut self) -> DeviceResult<()> {
        self.measured.clear();
        let engine = (self.factory)(&self.config)?;
        self.core.reset(engine)
    }

    fn apply(&mut self, name: &str, wires: &[usize], params: &[Param]) -> DeviceResult<()> {
        self.core.apply(name, wires, params)
    }

    fn set_observable_queue(&mut self, queue: Vec<ObservableRequest>) {
        self.core.set_observable_queue(queue);
    }

    fn pre_measure(&mut self) -> DeviceResult<()> {
        self.core.ensure_live()?;
        let register = self.core.register().to_vec();
        let engine = self.core.engine_mut()?;
        let mut measured = FxHashMap::default();
        for qubit in register {
            measured.insert(qubit, engine.measure(qubit)?);
        }
        engine.flush(false)?;
        self.measured = measured;
        self.core.set_state(DeviceState::Measuring);
        Ok(())
    }

    fn expval(&mut self, name: &str, wires: &[usize], _params: &[Param]) -> DeviceResult<f64> {
        let (kind, qubit) = self.core.observable(name, wires)?;
        match kind {
            ObservableKind::PauliZ => {
                let bit = match self.measured.get(&qubit) {
                    Some(bit) => *bit,
                    None => self.core.engine_mut()?.measure(qubit)?,
                };
                Ok(1.0 - 2.0 * f64::from(u8::from(bit)))
            }
            _ => Ok(1.0),
        }
    }

    fn post_measure(&mut self) -> DeviceResult<()> {
        self.measured.clear();
        self.core.release()
    }
}
