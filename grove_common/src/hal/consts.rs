//! HAL constants.
//!
//! Default timings and the names of the events drivers publish.

use std::time::Duration;

/// Canonical HAL service name (used for logging).
pub const HAL_SERVICE_NAME: &str = "grove_hal";

/// Default poll interval of polling drivers.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/grove/grove.toml";

/// Event published with the raw reading when it changes.
pub const EVENT_DATA: &str = "data";

/// Event published with the scaled reading of an analog sensor.
pub const EVENT_VALUE: &str = "value";

/// Event published with the adaptor error when a read fails.
pub const EVENT_ERROR: &str = "error";

/// Event published when a button leaves its default state.
pub const EVENT_PUSH: &str = "push";

/// Event published when a button returns to its default state.
pub const EVENT_RELEASE: &str = "release";

/// Event published by the piezo vibration sensor above its threshold.
pub const EVENT_VIBRATION: &str = "vibration";

/// Full-scale reading of a 10-bit analog input.
pub const ANALOG_FULL_SCALE: i32 = 1023;
