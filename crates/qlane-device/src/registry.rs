//! Device registry.
//!
//! The [`DeviceRegistry`] maps device short names to constructors, so a host
//! framework can ask for `qlane.ibm` without knowing which engine sits
//! underneath.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::DeviceOptions;
use crate::device::Device;
use crate::error::{DeviceError, DeviceResult};

/// Constructor stored in the registry.
type DeviceFactory = Box<dyn Fn(&DeviceOptions) -> DeviceResult<Box<dyn Device>> + Send + Sync>;

/// Central registry of device constructors.
pub struct DeviceRegistry {
    factories: FxHashMap<String, DeviceFactory>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// Registry with the three devices bound to the in-process engines.
    #[cfg(feature = "local-engines")]
    pub fn with_local_engines() -> Self {
        use crate::classical::ClassicalDevice;
        use crate::ibm::IbmDevice;
        use crate::simulator::SimulatorDevice;
        use crate::table::BackendKind;

        let mut registry = Self::new();
        registry.register_factory(BackendKind::Simulator.short_name(), |options| {
            Ok(Box::new(SimulatorDevice::new(options.config()?)?))
        });
        registry.register_factory(BackendKind::Ibm.short_name(), |options| {
            Ok(Box::new(IbmDevice::new(options.config()?)?))
        });
        registry.register_factory(BackendKind::Classical.short_name(), |options| {
            Ok(Box::new(ClassicalDevice::new(options.config()?)?))
        });
        registry
    }

    /// Register a device constructor.
    pub fn register_factory(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&DeviceOptions) -> DeviceResult<Box<dyn Device>> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!("Registering device: {}", name);
        self.factories.insert(name, Box::new(factory));
    }

    /// Create a device by short name.
    pub fn create(&self, name: &str, options: &DeviceOptions) -> DeviceResult<Box<dyn Device>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| DeviceError::UnknownDevice(name.to_string()))?;
        if options.backend().short_name() != name {
            return Err(DeviceError::Configuration(format!(
                "options for {} passed to {}",
                options.backend(),
                name
            )));
        }
        factory(options)
    }

    /// Registered short names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether a device is registered under `name`.
    pub fn has_device(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
