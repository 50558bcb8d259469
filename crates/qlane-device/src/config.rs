//! Device configuration.
//!
//! Host frameworks hand devices an untyped keyword map. [`DeviceOptions`]
//! keeps the keys a backend understands, drops the rest, and deserializes
//! the backend's typed config struct from what remains.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{DeviceError, DeviceResult};
use crate::table::BackendKind;

fn default_wires() -> usize {
    1
}

fn default_ibm_shots() -> u64 {
    1024
}

fn default_ibm_device() -> String {
    "ibmqx4".into()
}

fn check_wires(wires: usize) -> DeviceResult<()> {
    if wires == 0 {
        return Err(DeviceError::Configuration(
            "a device needs at least one wire".into(),
        ));
    }
    Ok(())
}

/// Options of the `qlane.simulator` device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Number of wires.
    pub wires: usize,
    /// Samples per expectation value; 0 returns exact values.
    pub shots: u64,
    /// Let the engine buffer gates.
    pub gate_fusion: bool,
    /// Seed for the engine and for shot sampling.
    pub rnd_seed: Option<u64>,
    /// Per-gate engine logging.
    pub verbose: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            wires: default_wires(),
            shots: 0,
            gate_fusion: false,
            rnd_seed: None,
            verbose: false,
        }
    }
}

impl SimulatorConfig {
    /// Config for `wires` wires with exact expectation values.
    pub fn new(wires: usize) -> Self {
        Self {
            wires,
            ..Self::default()
        }
    }

    /// Set the shot count.
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rnd_seed = Some(seed);
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> DeviceResult<()> {
        check_wires(self.wires)
    }
}

/// Options of the `qlane.ibm` device.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IbmConfig {
    /// Number of wires.
    pub wires: usize,
    /// Circuit evaluations per run.
    pub shots: u64,
    /// Same as `shots`; wins when both are given.
    pub num_runs: Option<u64>,
    /// Run on hardware instead of the remote simulator.
    pub use_hardware: bool,
    /// Account user name.
    pub user: Option<String>,
    /// Account password.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Target device when `use_hardware` is set.
    pub device: String,
    /// Job id to fetch instead of submitting again.
    pub retrieve_execution: Option<String>,
    /// Per-gate engine logging.
    pub verbose: bool,
}

impl Default for IbmConfig {
    fn default() -> Self {
        Self {
            wires: default_wires(),
            shots: default_ibm_shots(),
            num_runs: None,
            use_hardware: false,
            user: None,
            password: None,
            device: default_ibm_device(),
            retrieve_execution: None,
            verbose: false,
        }
    }
}

impl IbmConfig {
    /// Config for `wires` wires with the given credentials.
    pub fn new(wires: usize, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            wires,
            user: Some(user.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Set the shot count.
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Shots actually used: `num_runs` if given, else `shots`.
    pub fn effective_shots(&self) -> u64 {
        self.num_runs.unwrap_or(self.shots)
    }

    /// Check the configuration.
    pub fn validate(&self) -> DeviceResult<()> {
        check_wires(self.wires)?;
        if self.user.is_none() {
            return Err(DeviceError::Configuration(
                "an account user name must be given via the \"user\" option".into(),
            ));
        }
        if self.password.is_none() {
            return Err(DeviceError::Configuration(
                "an account password must be given via the \"password\" option".into(),
            ));
        }
        if self.effective_shots() == 0 {
            return Err(DeviceError::Configuration(
                "qlane.ibm needs at least one shot".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for IbmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmConfig")
            .field("wires", &self.wires)
            .field("shots", &self.shots)
            .field("num_runs", &self.num_runs)
            .field("use_hardware", &self.use_hardware)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("device", &self.device)
            .field("retrieve_execution", &self.retrieve_execution)
            .field("verbose", &self.verbose)
            .finish()
    }
}

/// Options of the `qlane.classical` device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassicalConfig {
    /// Number of wires.
    pub wires: usize,
    /// Per-gate engine logging.
    pub verbose: bool,
}

impl Default for ClassicalConfig {
    fn default() -> Self {
        Self {
            wires: default_wires(),
            verbose: false,
        }
    }
}

impl ClassicalConfig {
    /// Config for `wires` wires.
    pub fn new(wires: usize) -> Self {
        Self {
            wires,
            verbose: false,
        }
    }

    /// Check the configuration.
    pub fn validate(&self) -> DeviceResult<()> {
        check_wires(self.wires)
    }
}

/// Untyped keyword options for one backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceOptions {
    backend: BackendKind,
    options: Map<String, Value>,
}

impl DeviceOptions {
    /// Empty options for `backend`.
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            options: Map::new(),
        }
    }

    /// Keep the entries of `map` that `backend` understands.
    pub fn from_map(backend: BackendKind, map: &Map<String, Value>) -> Self {
        let mut options = Self::new(backend);
        for (key, value) in map {
            options.insert(key.clone(), value.clone());
        }
        options
    }

    /// Add an option; keys the backend does not know are dropped.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    fn insert(&mut self, key: String, value: Value) {
        if self.backend.option_keys().contains(&key.as_str()) {
            self.options.insert(key, value);
        } else {
            debug!("Ignoring option '{}' for {}", key, self.backend);
        }
    }

    /// Backend these options belong to.
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Raw option value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Deserialize the typed config.
    pub fn config<C: DeserializeOwned>(&self) -> DeviceResult<C> {
        serde_json::from_value(Value::Object(self.options.clone())).map_err(|e| {
            DeviceError::Configuration(format!("invalid options for {}: {e}", self.backend))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_keys_dropped() {
        let map = json!({"wires": 3, "shots": 10, "user": "alice", "colour": "red"});
        let options = DeviceOptions::from_map(BackendKind::Simulator, map.as_object().unwrap());
        assert!(options.get("user").is_none());
        assert!(options.get("colour").is_none());

        let config: SimulatorConfig = options.config().unwrap();
        assert_eq!(config.wires, 3);
        assert_eq!(config.shots, 10);
    }

    #[test]
    fn test_simulator_defaults() {
        let config: SimulatorConfig = DeviceOptions::new(BackendKind::Simulator).config().unwrap();
        assert_eq!(config, SimulatorConfig::default());
        assert_eq!(config.wires, 1);
        assert_eq!(config.shots, 0);
    }

    #[test]
    fn test_ibm_requires_credentials() {
        let options = DeviceOptions::new(BackendKind::Ibm).with("wires", 2);
        let config: IbmConfig = options.config().unwrap();
        assert!(matches!(config.validate(), Err(DeviceError::Configuration(_))));

        let config: IbmConfig = options.with("user", "u").config().unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn test_num_runs_overrides_shots() {
        let config: IbmConfig = DeviceOptions::new(BackendKind::Ibm)
            .with("shots", 10)
            .with("num_runs", 42)
            .config()
            .unwrap();
        assert_eq!(config.effective_shots(), 42);
        assert_eq!(IbmConfig::default().effective_shots(), 1024);
        assert_eq!(IbmConfig::default().device, "ibmqx4");
    }

    #[test]
    fn test_password_redacted() {
        let config = IbmConfig::new(1, "user", "hunter2");
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_zero_wires_rejected() {
        assert!(ClassicalConfig::new(0).validate().is_err());
        assert!(SimulatorConfig::new(0).validate().is_err());
    }

    #[test]
    fn test_bad_value_is_configuration_error() {
        let err = DeviceOptions::new(BackendKind::Classical)
            .with("wires", "many")
            .config::<ClassicalConfig>()
            .unwrap_err();
        assert!(matches!(err, DeviceError::Configuration(_)));
    }
}
