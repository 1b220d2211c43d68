//! HAL configuration types.
//!
//! This module contains configuration types loaded from `grove.toml`:
//! - `GroveConfig` - Main configuration
//! - `AdaptorConfig` - Simulated adaptor pins and linked reactions
//! - `DriverConfig` - One driver instance (kind, name, pin, interval)

use crate::config::{ConfigError, SharedConfig};
use crate::hal::consts::{ANALOG_FULL_SCALE, DEFAULT_POLL_INTERVAL};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default function for interval_ms
fn default_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

/// Default function for the adaptor name
fn default_adaptor_name() -> String {
    "simulation".to_string()
}

/// Default high level helper
fn default_high() -> u8 {
    1
}

/// Driver kinds that run a polling loop on their pin.
const INPUT_KINDS: &[&str] = &[
    "button",
    "analog_sensor",
    "grove_button",
    "grove_touch",
    "grove_magnetic_switch",
    "grove_sound_sensor",
    "grove_light_sensor",
    "grove_rotary",
    "grove_piezo_vibration",
];

/// Main configuration loaded from `grove.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroveConfig {
    /// Logging and service identity.
    pub shared: SharedConfig,

    /// Adaptor setup.
    #[serde(default)]
    pub adaptor: AdaptorConfig,

    /// Driver instances to create.
    #[serde(default)]
    pub drivers: Vec<DriverConfig>,
}

impl GroveConfig {
    /// Validate the configuration.
    ///
    /// # Validation Rules
    /// 1. `shared.service_name` not empty
    /// 2. At least one driver
    /// 3. Every driver has a non-empty kind and pin and `interval_ms > 0`
    /// 4. No two input drivers poll the same pin
    /// 5. Analog sweep steps are non-negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        if self.drivers.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one driver must be configured".to_string(),
            ));
        }

        let mut polled_pins: HashMap<&str, &str> = HashMap::new();
        for (idx, driver) in self.drivers.iter().enumerate() {
            driver.validate(idx)?;

            if driver.is_input() {
                if let Some(other) = polled_pins.insert(driver.pin.as_str(), driver.display_name()) {
                    return Err(ConfigError::Invalid(format!(
                        "drivers '{}' and '{}' both poll pin '{}'",
                        other,
                        driver.display_name(),
                        driver.pin
                    )));
                }
            }
        }

        for input in &self.adaptor.analog_inputs {
            if !(0..=ANALOG_FULL_SCALE).contains(&input.sweep_step) {
                return Err(ConfigError::Invalid(format!(
                    "analog input '{}': sweep_step must be within 0..={}, got {}",
                    input.pin, ANALOG_FULL_SCALE, input.sweep_step
                )));
            }
        }

        Ok(())
    }
}

/// Simulated adaptor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdaptorConfig {
    /// Adaptor name reported as the drivers' connection.
    #[serde(default = "default_adaptor_name")]
    pub name: String,

    /// Digital input pins and their initial levels.
    #[serde(default)]
    pub digital_inputs: Vec<DigitalInputConfig>,

    /// Analog input pins, initial values and sweep.
    #[serde(default)]
    pub analog_inputs: Vec<AnalogInputConfig>,

    /// Output edges that change an input after a delay.
    #[serde(default)]
    pub links: Vec<LinkConfig>,
}

impl Default for AdaptorConfig {
    fn default() -> Self {
        Self {
            name: default_adaptor_name(),
            digital_inputs: Vec::new(),
            analog_inputs: Vec::new(),
            links: Vec::new(),
        }
    }
}

/// Digital input pin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DigitalInputConfig {
    /// Pin token
    pub pin: String,
    /// Initial level (0 or 1)
    #[serde(default)]
    pub initial: i32,
}

/// Analog input pin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalogInputConfig {
    /// Pin token
    pub pin: String,
    /// Initial value
    #[serde(default)]
    pub initial: i32,
    /// Change per read; the value bounces between 0 and full scale (0 = constant)
    #[serde(default)]
    pub sweep_step: i32,
}

/// Linked reaction: writing `level` to `output_pin` sets `input_pin` to the
/// same level after `delay_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkConfig {
    /// Output pin whose edge triggers the reaction
    pub output_pin: String,
    /// Input pin that changes
    pub input_pin: String,
    /// Output level that triggers the reaction
    #[serde(default = "default_high")]
    pub level: u8,
    /// Delay before the input changes
    #[serde(default)]
    pub delay_ms: u64,
}

/// One driver instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    /// Registered driver kind (e.g. "grove_button")
    pub kind: String,
    /// Optional name; the driver's default name is kept when absent
    #[serde(default)]
    pub name: Option<String>,
    /// Pin token
    pub pin: String,
    /// Poll interval in milliseconds (input drivers)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Button wiring is active-low (default state high)
    #[serde(default)]
    pub active_low: bool,
    /// Relay wiring is inverted
    #[serde(default)]
    pub inverted: bool,
}

impl DriverConfig {
    /// Poll interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Whether this kind runs a polling loop.
    pub fn is_input(&self) -> bool {
        INPUT_KINDS.contains(&self.kind.as_str())
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }

    fn validate(&self, idx: usize) -> Result<(), ConfigError> {
        if self.kind.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "driver #{idx}: kind cannot be empty"
            )));
        }
        if self.pin.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "driver '{}': pin cannot be empty",
                self.display_name()
            )));
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::Invalid(format!(
                "driver '{}': interval_ms must be greater than 0",
                self.display_name()
            )));
        }
        Ok(())
    }
}
