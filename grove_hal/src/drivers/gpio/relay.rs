//! Relay driver.

use super::output::OutputPin;
use grove_common::event::EventBus;
use grove_common::hal::adaptor::{Connection, DigitalWriter};
use grove_common::hal::driver::{Driver, DriverError, Eventer, Pinner};
use grove_common::hal::types::{DriverState, Level};
use std::sync::Arc;

/// Relay on a digital pin.
///
/// With inverted wiring the coil is energised by a low level; `on`/`off`
/// and `is_on` always refer to the relay, not the pin.
pub struct RelayDriver {
    name: String,
    output: OutputPin,
    inverted: bool,
}

impl RelayDriver {
    /// Create a relay on `pin`.
    pub fn new<A: DigitalWriter + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self {
            name: "Relay".to_string(),
            output: OutputPin::new(adaptor, pin),
            inverted: false,
        }
    }

    /// Use inverted (active-low) wiring.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    /// Whether the wiring is inverted.
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// Close the relay.
    pub fn on(&self) -> Result<(), DriverError> {
        self.output.write(self.pin_level(true))
    }

    /// Open the relay.
    pub fn off(&self) -> Result<(), DriverError> {
        self.output.write(self.pin_level(false))
    }

    /// Invert the relay.
    pub fn toggle(&self) -> Result<(), DriverError> {
        if self.is_on() { self.off() } else { self.on() }
    }

    /// Whether the relay is closed.
    pub fn is_on(&self) -> bool {
        bool::from(self.output.level()) != self.inverted
    }

    fn pin_level(&self, on: bool) -> Level {
        Level::from(on != self.inverted)
    }
}

impl Driver for RelayDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn start(&self) -> Result<(), DriverError> {
        self.output.start(&self.name)
    }

    fn halt(&self) -> Result<(), DriverError> {
        self.output.halt(&self.name)
    }

    fn connection(&self) -> Arc<dyn Connection> {
        self.output.connection()
    }

    fn state(&self) -> DriverState {
        self.output.state()
    }
}

impl Pinner for RelayDriver {
    fn pin(&self) -> &str {
        self.output.pin()
    }
}

impl Eventer for RelayDriver {
    fn events(&self) -> &EventBus {
        self.output.events()
    }
}
