//! MCP3002 two-channel 10-bit SPI ADC.
//!
//! # Frame layout
//!
//! ```text
//! request:  [ 0 1 1 C 1 0 0 0 ] [ 0x00 ]
//!              | | | |
//!              | | | +-- MSB first
//!              | | +---- channel select (ODD/SIGN)
//!              | +------ single-ended mode
//!              +-------- start bit
//! response: [ x x x x x x D9 D8 ] [ D7 .. D0 ]
//! ```
//!
//! Channel 0 writes `[0x68, 0x00]`, channel 1 writes `[0x78, 0x00]`.

use bitflags::bitflags;
use grove_common::hal::adaptor::{AnalogReader, Connection, SpiBus};
use grove_common::hal::driver::{AdaptorError, Driver, DriverError};
use grove_common::hal::types::DriverState;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Number of input channels.
pub const MCP3002_CHANNELS: i32 = 2;

/// Length of the request and response frames.
pub const FRAME_LEN: usize = 2;

bitflags! {
    /// Bits of the MCP3002 control byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ControlBits: u8 {
        /// Start bit
        const START = 0x40;
        /// Single-ended (instead of pseudo-differential) conversion
        const SINGLE_ENDED = 0x20;
        /// Selects channel 1
        const ODD_CHANNEL = 0x10;
        /// Clock the result out MSB first
        const MSB_FIRST = 0x08;
    }
}

/// Build the request frame for a single-ended conversion of `channel`.
///
/// # Errors
/// `DriverError::InvalidChannel` for any channel other than 0 or 1.
pub fn encode_command(channel: i32) -> Result<[u8; FRAME_LEN], DriverError> {
    let select = match channel {
        0 => ControlBits::empty(),
        1 => ControlBits::ODD_CHANNEL,
        _ => return Err(DriverError::InvalidChannel(channel)),
    };
    let control = ControlBits::START | ControlBits::SINGLE_ENDED | ControlBits::MSB_FIRST | select;
    Ok([control.bits(), 0x00])
}

/// Extract the 10-bit conversion result from a response frame.
///
/// # Errors
/// `DriverError::InvalidResponse` if fewer than two bytes were received.
pub fn decode_response(rx: &[u8]) -> Result<i32, DriverError> {
    if rx.len() < FRAME_LEN {
        return Err(DriverError::InvalidResponse {
            expected: FRAME_LEN,
            actual: rx.len(),
        });
    }
    Ok((i32::from(rx[0] & 0x03) << 8) | i32::from(rx[1]))
}

/// MCP3002 driver. Reads run synchronously on the caller's thread.
pub struct Mcp3002Driver {
    name: String,
    connection: Arc<dyn Connection>,
    bus: Arc<dyn SpiBus>,
    state: Mutex<DriverState>,
}

impl Mcp3002Driver {
    /// Create a driver on the adaptor's SPI bus.
    pub fn new<A: SpiBus + 'static>(adaptor: Arc<A>) -> Self {
        let connection: Arc<dyn Connection> = adaptor.clone();
        Self {
            name: "MCP3002".to_string(),
            connection,
            bus: adaptor,
            state: Mutex::new(DriverState::Stopped),
        }
    }

    /// Convert `channel` (0 or 1).
    ///
    /// Invalid channels are rejected before anything is sent on the bus.
    ///
    /// # Errors
    /// - `DriverError::InvalidChannel` for channels other than 0 and 1
    /// - `DriverError::Spi` if the transfer fails
    /// - `DriverError::InvalidResponse` if the response frame is short
    pub fn read(&self, channel: i32) -> Result<i32, DriverError> {
        let tx = encode_command(channel)?;
        let mut rx = [0u8; FRAME_LEN];
        self.bus.transfer(&tx, &mut rx).map_err(DriverError::Spi)?;
        let value = decode_response(&rx)?;
        trace!(channel, value, "mcp3002 conversion");
        Ok(value)
    }

    /// Convert both channels, channel 0 first.
    pub fn read_channels(&self) -> Result<[i32; MCP3002_CHANNELS as usize], DriverError> {
        Ok([self.read(0)?, self.read(1)?])
    }
}

impl Driver for Mcp3002Driver {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn start(&self) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        if *state == DriverState::Running {
            debug!("{}: start ignored, already running", self.name);
            return Ok(());
        }
        if !self.connection.is_connected() {
            return Err(DriverError::NotConnected(
                self.connection.connection_name().to_string(),
            ));
        }
        *state = DriverState::Running;
        info!("{}: started on {}", self.name, self.connection.connection_name());
        Ok(())
    }

    fn halt(&self) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        if *state == DriverState::Stopped {
            debug!("{}: halt ignored, not running", self.name);
            return Ok(());
        }
        *state = DriverState::Stopped;
        info!("{}: halted", self.name);
        Ok(())
    }

    fn connection(&self) -> Arc<dyn Connection> {
        Arc::clone(&self.connection)
    }

    fn state(&self) -> DriverState {
        *self.state.lock()
    }
}

/// The ADC acts as an analog source for analog sensor drivers; the pin token
/// is the channel number.
impl Connection for Mcp3002Driver {
    fn connection_name(&self) -> &str {
        &self.name
    }

    fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }
}

impl AnalogReader for Mcp3002Driver {
    fn analog_read(&self, pin: &str) -> Result<i32, AdaptorError> {
        let channel: i32 = pin
            .trim()
            .parse()
            .map_err(|_| AdaptorError::InvalidPin(pin.to_string()))?;
        self.read(channel).map_err(|e| match e {
            DriverError::InvalidChannel(_) => AdaptorError::InvalidPin(pin.to_string()),
            DriverError::Spi(source) | DriverError::Adaptor(source) => source,
            other => AdaptorError::Io(other.to_string()),
        })
    }
}
