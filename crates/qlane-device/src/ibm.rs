//! The `qlane.ibm` device.
//!
//! The backend only measures in the computational basis. Observables in any
//! other basis are handled by rotating their wire before the final
//! measure-all, which is why the device needs to know the observable queue
//! ahead of `pre_measure`.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::FRAC_PI_4;

use tracing::{debug, instrument};

use qlane_hal::{HalResult, ProbabilityEngine};

use crate::config::IbmConfig;
use crate::device::{Device, DeviceState};
use crate::error::{DeviceError, DeviceResult};
use crate::observable::{ObservableKind, ObservableRequest};
use crate::operation::Param;
use crate::register::DeviceCore;
use crate::table::BackendKind;

/// Builds a fresh engine for every execution cycle.
pub type IbmFactory<E> = Box<dyn FnMut(&IbmConfig) -> HalResult<E> + Send>;

/// Gates that take `kind` into the computational basis.
fn basis_rotation(kind: ObservableKind) -> DeviceResult<Vec<(&'static str, Vec<Param>)>> {
    let rotation = match kind {
        ObservableKind::PauliX => vec![("Hadamard", vec![])],
        ObservableKind::PauliY => vec![("PauliZ", vec![]), ("S", vec![]), ("Hadamard", vec![])],
        ObservableKind::Hadamard => vec![("RY", vec![Param::Real(-FRAC_PI_4)])],
        ObservableKind::PauliZ | ObservableKind::Identity => vec![],
        ObservableKind::Hermitian => return Err(hermitian()),
    };
    Ok(rotation)
}

fn hermitian() -> DeviceError {
    DeviceError::NotImplemented("Hermitian observables on qlane.ibm".into())
}

#[doc = include_str!("../docs/ibm.md")]
pub struct IbmDevice<E: ProbabilityEngine> {
    config: IbmConfig,
    factory: IbmFactory<E>,
    core: DeviceCore<E>,
}

impl<E: ProbabilityEngine + Send> IbmDevice<E> {
    /// Create a device whose engines come from `factory`.
    ///
    /// Fails with a configuration error before any engine is built when the
    /// credentials are missing.
    pub fn with_factory(
        config: IbmConfig,
        factory: impl FnMut(&IbmConfig) -> HalResult<E> + Send + 'static,
    ) -> DeviceResult<Self> {
        let mut config = config;
        config.validate()?;
        if let Some(runs) = config.num_runs {
            config.shots = runs;
        }
        let mut device = Self {
            core: DeviceCore::new(BackendKind::Ibm, config.wires),
            config,
            factory: Box::new(factory),
        };
        device.reset()?;
        Ok(device)
    }

    /// Device configuration.
    pub fn config(&self) -> &IbmConfig {
        &self.config
    }
}

#[cfg(feature = "local-engines")]
impl IbmDevice<qlane_adapter_sim::StatevectorEngine> {
    /// Create a device that emulates the remote queue in process.
    ///
    /// Results are estimated from `shots` sampled runs, like the remote
    /// service reports them.
    pub fn new(config: IbmConfig) -> DeviceResult<Self> {
        use qlane_adapter_sim::{StatevectorConfig, StatevectorEngine};

        Self::with_factory(config, |config| {
            if config.use_hardware {
                tracing::warn!(
                    "use_hardware requested for {}; running the local emulation instead",
                    config.device
                );
            }
            if let Some(job) = &config.retrieve_execution {
                debug!("retrieve_execution {} ignored by the local emulation", job);
            }
            let engine_config = StatevectorConfig::default()
                .with_num_runs(config.effective_shots())
                .with_deferred_measurement(true)
                .with_verbose(config.verbose);
            Ok(StatevectorEngine::new(engine_config))
        })
    }
}

impl<E: ProbabilityEngine + Send> Device for IbmDevice<E> {
    fn short_name(&self) -> &'static str {
        BackendKind::Ibm.short_name()
    }

    fn num_wires(&self) -> usize {
        self.core.num_wires()
    }

    fn shots(&self) -> u64 {
        self.config.shots
    }

    /// Takes effect at the next [`Device::reset`].
    fn set_shots(&mut self, shots: u64) -> DeviceResult<()> {
        if shots == 0 {
            return Err(DeviceError::Configuration(
                "qlane.ibm needs at least one shot".into(),
            ));
        }
        self.config.shots = shots;
        self.config.num_runs = None;
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

    #[instrument(skip(self), fields(device = "qlane.ibm"))]
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
        if let Some(queue) = self.core.observable_queue() {
            let mut rotations = Vec::new();
            let mut bases: BTreeMap<&[usize], ObservableKind> = BTreeMap::new();
            for obs in queue {
                if obs.name == ObservableKind::Hermitian.name() {
                    return Err(hermitian());
                }
                let kind = self.core.backend().observable(&obs.name)?;
                let rotation = basis_rotation(kind)?;
                if rotation.is_empty() {
                    continue;
                }
                match bases.get(obs.wires.as_slice()) {
                    Some(&first) if first == kind => continue,
                    Some(&first) => {
                        return Err(DeviceError::ConflictingBases {
                            wires: obs.wires.clone(),
                            first: first.name(),
                            second: kind.name(),
                        });
                    }
                    None => {
                        bases.insert(&obs.wires, kind);
                    }
                }
                for (gate, params) in rotation {
                    rotations.push((gate, obs.wires.clone(), params));
                }
            }
            for (gate, wires, params) in rotations {
                debug!(gate, ?wires, "Basis rotation");
                self.core.apply(gate, &wires, &params)?;
            }
        }

        let register = self.core.register().to_vec();
        let engine = self.core.engine_mut()?;
        for qubit in register {
            engine.measure(qubit)?;
        }
        engine.flush(false)?;
        self.core.set_state(DeviceState::Measuring);
        Ok(())
    }

    fn expval(&mut self, name: &str, wires: &[usize], _params: &[Param]) -> DeviceResult<f64> {
        if name == ObservableKind::Hermitian.name() {
            return Err(hermitian());
        }
        let (kind, _) = self.core.observable(name, wires)?;
        let register = self.core.register().to_vec();
        let probabilities = self.core.engine_mut()?.probabilities(&register)?;

        match kind {
            ObservableKind::Identity => Ok(probabilities.total()),
            ObservableKind::Hermitian => Err(hermitian()),
            _ => {
                if kind != ObservableKind::PauliZ && self.core.observable_queue().is_none() {
                    return Err(DeviceError::MissingObservableQueue {
                        observable: name.into(),
                    });
                }
                let wire = wires[0];
                let p1 = probabilities.marginal_one(wire);
                let p0 = probabilities.marginal_zero(wire);
                Ok(((1.0 - 2.0 * p1) - (1.0 - 2.0 * p0)) / 2.0)
            }
        }
    }

    fn post_measure(&mut self) -> DeviceResult<()> {
        self.core.release()
    }
}
