//! The `qlane.simulator` device.

use std::collections::BTreeSet;
use std::f64::consts::FRAC_1_SQRT_2;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use qlane_hal::{ExpectationEngine, HalResult, Pauli, QubitOperator};

use crate::config::SimulatorConfig;
use crate::device::{Device, DeviceState};
use crate::error::DeviceResult;
use crate::observable::{ObservableKind, ObservableRequest};
use crate::operation::Param;
use crate::register::DeviceCore;
use crate::sampling::shot_estimate;
use crate::table::BackendKind;

/// Builds a fresh engine for every execution cycle.
pub type SimulatorFactory<E> = Box<dyn FnMut(&SimulatorConfig) -> HalResult<E> + Send>;

#[doc = include_str!("../docs/simulator.md")]
pub struct SimulatorDevice<E: ExpectationEngine> {
    config: SimulatorConfig,
    factory: SimulatorFactory<E>,
    core: DeviceCore<E>,
    rng: StdRng,
}

impl<E: ExpectationEngine + Send> SimulatorDevice<E> {
    /// Create a device whose engines come from `factory`.
    pub fn with_factory(
        config: SimulatorConfig,
        factory: impl FnMut(&SimulatorConfig) -> HalResult<E> + Send + 'static,
    ) -> DeviceResult<Self> {
        config.validate()?;
        let rng = match config.rnd_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut device = Self {
            core: DeviceCore::new(BackendKind::Simulator, config.wires),
            config,
            factory: Box::new(factory),
            rng,
        };
        device.reset()?;
        Ok(device)
    }

    /// Device configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    fn operator(kind: ObservableKind) -> Option<QubitOperator> {
        match kind {
            ObservableKind::PauliX => Some(QubitOperator::pauli(Pauli::X, 0)),
            ObservableKind::PauliY => Some(QubitOperator::pauli(Pauli::Y, 0)),
            ObservableKind::PauliZ => Some(QubitOperator::pauli(Pauli::Z, 0)),
            ObservableKind::Hadamard => Some(
                FRAC_1_SQRT_2 * QubitOperator::pauli(Pauli::X, 0)
                    + FRAC_1_SQRT_2 * QubitOperator::pauli(Pauli::Z, 0),
            ),
            ObservableKind::Identity | ObservableKind::Hermitian => None,
        }
    }
}

#[cfg(feature = "local-engines")]
impl SimulatorDevice<qlane_adapter_sim::StatevectorEngine> {
    /// Create a device backed by the in-process statevector engine.
    pub fn new(config: SimulatorConfig) -> DeviceResult<Self> {
        use qlane_adapter_sim::{StatevectorConfig, StatevectorEngine};

        Self::with_factory(config, |config| {
            let mut engine_config = StatevectorConfig::default()
                .with_gate_fusion(config.gate_fusion)
                .with_verbose(config.verbose);
            if let Some(seed) = config.rnd_seed {
                engine_config = engine_config.with_seed(seed);
            }
            Ok(StatevectorEngine::new(engine_config))
        })
    }
}

impl<E: ExpectationEngine + Send> Device for SimulatorDevice<E> {
    fn short_name(&self) -> &'static str {
        BackendKind::Simulator.short_name()
    }

    fn num_wires(&self) -> usize {
        self.core.num_wires()
    }

    fn shots(&self) -> u64 {
        self.config.shots
    }

    fn set_shots(&mut self, shots: u64) -> DeviceResult<()> {
        self.config.shots = shots;
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

    #[instrument(skip(self), fields(device = "qlane.simulator"))]
    fn reset(&mut self) -> DeviceResult<()> {
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
        self.core.engine_mut()?.flush(false)?;
        self.core.set_state(DeviceState::Measuring);
        Ok(())
    }

    fn expval(&mut self, name: &str, wires: &[usize], _params: &[Param]) -> DeviceResult<f64> {
        let (kind, qubit) = self.core.observable(name, wires)?;
        let Some(operator) = Self::operator(kind) else {
            return Ok(1.0);
        };
        let exact = self
            .core
            .engine_mut()?
            .expectation_value(&operator, &[qubit])?;

        if self.config.shots == 0 {
            return Ok(exact);
        }
        let estimate = shot_estimate(&mut self.rng, exact, self.config.shots);
        debug!(
            observable = name,
            exact, estimate, shots = self.config.shots, "Sampled expectation value"
        );
        Ok(estimate)
    }

    fn post_measure(&mut self) -> DeviceResult<()> {
        let register = self.core.register().to_vec();
        let engine = self.core.engine_mut()?;
        for qubit in register {
            engine.measure(qubit)?;
        }
        self.core.release()
    }
}
