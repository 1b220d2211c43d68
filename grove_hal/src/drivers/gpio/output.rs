//! Shared state of single-pin output drivers.
//!
//! Output drivers have no polling loop: start and halt only validate the
//! adaptor and track the lifecycle state. Writes go straight to the adaptor
//! on the caller's thread.

use grove_common::event::EventBus;
use grove_common::hal::adaptor::{Connection, DigitalWriter};
use grove_common::hal::driver::DriverError;
use grove_common::hal::types::{DriverState, Level};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Digital output pin composed into LED, relay and buzzer drivers.
pub(crate) struct OutputPin {
    pin: String,
    connection: Arc<dyn Connection>,
    writer: Arc<dyn DigitalWriter>,
    high: AtomicBool,
    state: Mutex<DriverState>,
    events: EventBus,
}

impl OutputPin {
    pub(crate) fn new<A: DigitalWriter + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        let connection: Arc<dyn Connection> = adaptor.clone();
        Self {
            pin: pin.to_string(),
            connection,
            writer: adaptor,
            high: AtomicBool::new(false),
            state: Mutex::new(DriverState::Stopped),
            events: EventBus::new(),
        }
    }

    pub(crate) fn pin(&self) -> &str {
        &self.pin
    }

    pub(crate) fn connection(&self) -> Arc<dyn Connection> {
        Arc::clone(&self.connection)
    }

    pub(crate) fn events(&self) -> &EventBus {
        &self.events
    }

    pub(crate) fn state(&self) -> DriverState {
        *self.state.lock()
    }

    pub(crate) fn start(&self, label: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        if *state == DriverState::Running {
            debug!("{}: start ignored, already running", label);
            return Ok(());
        }
        if !self.connection.is_connected() {
            return Err(DriverError::NotConnected(
                self.connection.connection_name().to_string(),
            ));
        }
        *state = DriverState::Running;
        info!("{}: started on pin {}", label, self.pin);
        Ok(())
    }

    pub(crate) fn halt(&self, label: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        if *state == DriverState::Stopped {
            debug!("{}: halt ignored, not running", label);
            return Ok(());
        }
        *state = DriverState::Stopped;
        info!("{}: halted", label);
        Ok(())
    }

    /// Write `level` and remember it.
    pub(crate) fn write(&self, level: Level) -> Result<(), DriverError> {
        self.writer.digital_write(&self.pin, level.as_u8())?;
        self.high.store(level == Level::High, Ordering::Release);
        Ok(())
    }

    /// Level last written.
    pub(crate) fn level(&self) -> Level {
        Level::from(self.high.load(Ordering::Acquire))
    }
}
