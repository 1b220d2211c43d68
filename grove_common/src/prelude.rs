//! Prelude module for common re-exports.
//!
//! ```rust
//! use grove_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};
pub use crate::hal::config::{DriverConfig, GroveConfig};

// ─── Adaptor capabilities ───────────────────────────────────────────
pub use crate::hal::adaptor::{
    AnalogReader, Connection, DigitalReader, DigitalWriter, PwmWriter, SpiBus,
};

// ─── Drivers ────────────────────────────────────────────────────────
pub use crate::hal::consts::DEFAULT_POLL_INTERVAL;
pub use crate::hal::driver::{AdaptorError, Driver, DriverError, Eventer, GpioDriver, Pinner};
pub use crate::hal::types::{DriverState, Level};

// ─── Events ─────────────────────────────────────────────────────────
pub use crate::event::{Event, EventBus, EventData, EventError};
