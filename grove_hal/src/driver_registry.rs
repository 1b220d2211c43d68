//! Driver registry for pin drivers.
//!
//! Maps the `kind` of a `[[drivers]]` config entry to a factory that builds
//! the driver on a shared adaptor. Constructed at startup and passed to
//! `GroveCore` by value.

use grove_common::hal::config::DriverConfig;
use grove_common::hal::driver::{DriverError, GpioDriver};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Builds a driver of one kind on adaptor `A` from its config entry.
pub type DriverFactory<A> = fn(Arc<A>, &DriverConfig) -> Box<dyn GpioDriver>;

/// Registry of available driver kinds for adaptor `A`.
pub struct DriverRegistry<A> {
    factories: HashMap<&'static str, DriverFactory<A>>,
}

impl<A> DriverRegistry<A> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a driver factory.
    ///
    /// # Panics
    /// Panics if a factory for the same kind is already registered.
    pub fn register(&mut self, kind: &'static str, factory: DriverFactory<A>) {
        if self.factories.contains_key(kind) {
            panic!("Driver kind '{kind}' is already registered");
        }
        self.factories.insert(kind, factory);
    }

    /// Get a driver factory by kind.
    pub fn get_factory(&self, kind: &str) -> Option<DriverFactory<A>> {
        self.factories.get(kind).copied()
    }

    /// Create the driver described by `config` on `adaptor`.
    ///
    /// The configured name, if any, replaces the driver's default name.
    ///
    /// # Errors
    /// Returns `DriverError::DriverNotFound` if `config.kind` is not registered.
    pub fn create_driver(
        &self,
        adaptor: Arc<A>,
        config: &DriverConfig,
    ) -> Result<Box<dyn GpioDriver>, DriverError> {
        let factory = self
            .get_factory(&config.kind)
            .ok_or_else(|| DriverError::DriverNotFound(config.kind.clone()))?;

        let mut driver = factory(adaptor, config);
        if let Some(name) = &config.name {
            driver.set_name(name);
        }
        debug!(kind = %config.kind, pin = %config.pin, "created driver {}", driver.name());
        Ok(driver)
    }

    /// List all registered kinds, sorted.
    pub fn list_kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.factories.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }
}

impl<A> Default for DriverRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}
