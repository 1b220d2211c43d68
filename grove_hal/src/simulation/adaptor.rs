//! Simulated board adaptor.

use super::io::PinSimulator;
use grove_common::hal::adaptor::{
    AnalogReader, Connection, DigitalReader, DigitalWriter, PwmWriter, SpiBus,
};
use grove_common::hal::config::AdaptorConfig;
use grove_common::hal::driver::AdaptorError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// SPI loopback state.
#[derive(Debug, Default)]
struct SpiState {
    /// Bytes clocked back on every transfer
    response: Vec<u8>,
    /// Every frame written, in order
    written: Vec<Vec<u8>>,
}

/// Software adaptor that implements every capability on simulated pins.
///
/// Input levels are set by tests or by the adaptor config; outputs are
/// recorded so they can be inspected. An injected error makes every read
/// and SPI transfer fail until cleared.
pub struct SimulationAdaptor {
    name: String,
    connected: AtomicBool,
    io: Mutex<PinSimulator>,
    spi: Mutex<SpiState>,
    read_error: Mutex<Option<AdaptorError>>,
}

impl SimulationAdaptor {
    /// Create a connected adaptor with no configured pins.
    pub fn new(name: &str) -> Self {
        Self::with_simulator(name, PinSimulator::new())
    }

    /// Create an adaptor from the `[adaptor]` config section.
    pub fn from_config(config: &AdaptorConfig) -> Self {
        let adaptor = Self::with_simulator(&config.name, PinSimulator::from_config(config));
        info!("Simulation adaptor '{}' ready", adaptor.name);
        adaptor
    }

    fn with_simulator(name: &str, io: PinSimulator) -> Self {
        Self {
            name: name.to_string(),
            connected: AtomicBool::new(true),
            io: Mutex::new(io),
            spi: Mutex::new(SpiState::default()),
            read_error: Mutex::new(None),
        }
    }

    /// Set a digital input level.
    pub fn set_digital(&self, pin: &str, level: i32) {
        self.io.lock().set_digital(pin, level);
    }

    /// Set a constant analog input value.
    pub fn set_analog(&self, pin: &str, value: i32) {
        self.io.lock().set_analog(pin, value);
    }

    /// Last level written to `pin`.
    pub fn digital_output(&self, pin: &str) -> Option<u8> {
        self.io.lock().digital_output(pin)
    }

    /// Last duty cycle written to `pin`.
    pub fn pwm_output(&self, pin: &str) -> Option<u8> {
        self.io.lock().pwm_output(pin)
    }

    /// Number of digital writes to `pin`.
    pub fn digital_write_count(&self, pin: &str) -> usize {
        self.io.lock().write_count(pin)
    }

    /// Simulate connecting or disconnecting the board.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }

    /// Fail every read and transfer with `error` until [`Self::clear_error`].
    pub fn inject_error(&self, error: AdaptorError) {
        debug!("{}: injecting read error: {}", self.name, error);
        *self.read_error.lock() = Some(error);
    }

    /// Stop failing reads.
    pub fn clear_error(&self) {
        *self.read_error.lock() = None;
    }

    /// Bytes returned by every SPI transfer.
    pub fn set_spi_response(&self, response: &[u8]) {
        self.spi.lock().response = response.to_vec();
    }

    /// Frames written on the SPI bus so far.
    pub fn spi_written(&self) -> Vec<Vec<u8>> {
        self.spi.lock().written.clone()
    }

    fn check_read(&self) -> Result<(), AdaptorError> {
        if !self.is_connected() {
            return Err(AdaptorError::NotConnected(self.name.clone()));
        }
        match self.read_error.lock().as_ref() {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn check_write(&self) -> Result<(), AdaptorError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(AdaptorError::NotConnected(self.name.clone()))
        }
    }
}

impl Connection for SimulationAdaptor {
    fn connection_name(&self) -> &str {
        &self.name
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

impl DigitalReader for SimulationAdaptor {
    fn digital_read(&self, pin: &str) -> Result<i32, AdaptorError> {
        self.check_read()?;
        Ok(self.io.lock().read_digital(pin, Instant::now()))
    }
}

impl AnalogReader for SimulationAdaptor {
    fn analog_read(&self, pin: &str) -> Result<i32, AdaptorError> {
        self.check_read()?;
        Ok(self.io.lock().read_analog(pin))
    }
}

impl DigitalWriter for SimulationAdaptor {
    fn digital_write(&self, pin: &str, level: u8) -> Result<(), AdaptorError> {
        self.check_write()?;
        self.io.lock().write_digital(pin, level, Instant::now());
        Ok(())
    }
}

impl PwmWriter for SimulationAdaptor {
    fn pwm_write(&self, pin: &str, duty: u8) -> Result<(), AdaptorError> {
        self.check_write()?;
        self.io.lock().write_pwm(pin, duty);
        Ok(())
    }
}

impl SpiBus for SimulationAdaptor {
    fn transfer(&self, tx: &[u8], rx: &mut [u8]) -> Result<(), AdaptorError> {
        self.check_read()?;
        let mut spi = self.spi.lock();
        spi.written.push(tx.to_vec());
        rx.fill(0);
        let n = rx.len().min(spi.response.len());
        rx[..n].copy_from_slice(&spi.response[..n]);
        Ok(())
    }
}
