//! Adaptor capability traits.
//!
//! An adaptor performs the actual bus I/O for a board (GPIO, PWM, SPI).
//! Drivers only depend on the capabilities below; how a pin token maps to
//! hardware is entirely the adaptor's concern.
//!
//! All methods take `&self`: one adaptor is shared by many drivers, so
//! implementations synchronise internally.

use crate::hal::driver::AdaptorError;

/// Identity and reachability of an adaptor.
pub trait Connection: Send + Sync {
    /// Human-readable adaptor name.
    fn connection_name(&self) -> &str;

    /// Whether the adaptor can currently serve requests.
    ///
    /// Drivers refuse to start while this returns `false`.
    fn is_connected(&self) -> bool {
        true
    }
}

/// Reads the level of a digital input pin.
pub trait DigitalReader: Connection {
    /// Read the pin, returning `0` or `1`.
    fn digital_read(&self, pin: &str) -> Result<i32, AdaptorError>;
}

/// Reads the value of an analog input pin.
pub trait AnalogReader: Connection {
    /// Read the pin, returning a device-dependent value (0..=1023 for 10-bit inputs).
    fn analog_read(&self, pin: &str) -> Result<i32, AdaptorError>;
}

/// Drives a digital output pin.
pub trait DigitalWriter: Connection {
    /// Write `level` (0 or 1) to the pin.
    fn digital_write(&self, pin: &str, level: u8) -> Result<(), AdaptorError>;
}

/// Drives a PWM-capable output pin.
pub trait PwmWriter: Connection {
    /// Write an 8-bit duty cycle to the pin.
    fn pwm_write(&self, pin: &str, duty: u8) -> Result<(), AdaptorError>;
}

/// Full-duplex SPI transfer on the adaptor's bus.
pub trait SpiBus: Connection {
    /// Clock out `tx` while filling `rx` with the bytes clocked in.
    ///
    /// `rx` has the same length as `tx`.
    fn transfer(&self, tx: &[u8], rx: &mut [u8]) -> Result<(), AdaptorError>;
}
