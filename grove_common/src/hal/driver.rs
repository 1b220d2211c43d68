//! Driver traits and error types.
//!
//! This module defines:
//! - `Driver` trait - Lifecycle and identity of every driver
//! - `Pinner` / `Eventer` traits - Pin identity and event publishing
//! - `GpioDriver` - The combined pin driver capability set
//! - `AdaptorError` / `DriverError` - Error types for adaptor and driver operations

use crate::event::EventBus;
use crate::hal::adaptor::Connection;
use crate::hal::types::DriverState;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by adaptors.
///
/// `Clone` so a read failure can travel as an event payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdaptorError {
    /// Bus I/O failure reported by the hardware layer.
    #[error("{0}")]
    Io(String),

    /// The adaptor is not connected.
    #[error("Adaptor '{0}' is not connected")]
    NotConnected(String),

    /// The adaptor does not provide this operation.
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    /// The pin token is not meaningful to this adaptor.
    #[error("Invalid pin '{0}'")]
    InvalidPin(String),
}

/// Error types for driver operations.
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    /// ADC channel outside the supported range.
    #[error("Invalid channel '{0}' for read")]
    InvalidChannel(i32),

    /// SPI response frame too short to decode.
    #[error("Invalid SPI response: expected {expected} bytes, got {actual}")]
    InvalidResponse {
        /// Expected frame length
        expected: usize,
        /// Received frame length
        actual: usize,
    },

    /// SPI transfer failure.
    #[error("SPI transfer failed: {0}")]
    Spi(#[source] AdaptorError),

    /// Adaptor unusable at start time.
    #[error("Adaptor '{0}' is not connected")]
    NotConnected(String),

    /// Adaptor failure on a synchronous driver call.
    #[error(transparent)]
    Adaptor(#[from] AdaptorError),

    /// Argument outside the accepted range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The polling thread could not be spawned.
    #[error("Failed to spawn polling thread: {0}")]
    Spawn(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Driver kind not registered
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    /// Initialization failed
    #[error("Initialization failed: {0}")]
    InitFailed(String),
}

/// Lifecycle and identity shared by every driver.
///
/// # Lifecycle
///
/// 1. `start()` - Validate the adaptor and begin operating
/// 2. `halt()` - Stop operating; blocks until no further adaptor calls can happen
///
/// Both calls are idempotent: starting a running driver and halting a
/// stopped driver succeed without side effects.
pub trait Driver: Send + Sync {
    /// Human-assigned driver name (non-unique).
    fn name(&self) -> &str;

    /// Rename the driver.
    fn set_name(&mut self, name: &str);

    /// Start the driver.
    ///
    /// # Errors
    /// Returns `DriverError::NotConnected` if the adaptor is unusable.
    fn start(&self) -> Result<(), DriverError>;

    /// Halt the driver.
    fn halt(&self) -> Result<(), DriverError>;

    /// The adaptor this driver talks through.
    fn connection(&self) -> Arc<dyn Connection>;

    /// Current lifecycle state.
    fn state(&self) -> DriverState;
}

/// Drivers bound to a single adaptor pin.
pub trait Pinner {
    /// Pin token handed to the adaptor.
    fn pin(&self) -> &str;
}

/// Drivers that publish events.
pub trait Eventer {
    /// The driver's own event bus.
    fn events(&self) -> &EventBus;
}

/// Pin drivers managed polymorphically by the HAL core.
pub trait GpioDriver: Driver + Pinner + Eventer {}

impl<T: Driver + Pinner + Eventer> GpioDriver for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_display() {
        let err = DriverError::InvalidChannel(-1);
        assert_eq!(err.to_string(), "Invalid channel '-1' for read");

        let err = DriverError::Spi(AdaptorError::Io("bus stuck".to_string()));
        assert_eq!(err.to_string(), "SPI transfer failed: bus stuck");

        let err = DriverError::DriverNotFound("stepper".to_string());
        assert!(err.to_string().contains("stepper"));
    }

    #[test]
    fn test_adaptor_error_io_keeps_message() {
        let err = AdaptorError::Io("read error".to_string());
        assert_eq!(err.to_string(), "read error");

        let wrapped: DriverError = err.clone().into();
        assert_eq!(wrapped.to_string(), "read error");
    }
}
