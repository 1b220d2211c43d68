//! Pin-level I/O simulation.
//!
//! The `PinSimulator` manages:
//! - Digital inputs and outputs keyed by pin token
//! - Linked input reactions (an output edge triggers a delayed input change)
//! - Analog inputs, either constant or sweeping between 0 and full scale
//! - PWM duty cycles

use grove_common::hal::config::{AdaptorConfig, LinkConfig};
use grove_common::hal::consts::ANALOG_FULL_SCALE;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Pending input change queued by a linked reaction.
#[derive(Debug, Clone)]
struct PendingInputChange {
    /// When this change should be applied
    trigger_time: Instant,
    /// Input pin to change
    pin: String,
    /// New level
    level: i32,
}

/// Analog input state.
#[derive(Debug, Clone, Copy)]
struct AnalogInput {
    value: i32,
    /// Change per read (0 = constant)
    sweep_step: i32,
    rising: bool,
}

impl AnalogInput {
    fn constant(value: i32) -> Self {
        Self {
            value,
            sweep_step: 0,
            rising: true,
        }
    }

    /// Return the current value and advance the sweep.
    fn sample(&mut self) -> i32 {
        let current = self.value;
        if self.sweep_step > 0 {
            if self.rising {
                self.value = self.value.saturating_add(self.sweep_step).min(ANALOG_FULL_SCALE);
                self.rising = self.value < ANALOG_FULL_SCALE;
            } else {
                self.value = self.value.saturating_sub(self.sweep_step).max(0);
                self.rising = self.value <= 0;
            }
        }
        current
    }
}

/// Simulated pin state of a board.
#[derive(Debug, Default)]
pub struct PinSimulator {
    digital_inputs: HashMap<String, i32>,
    analog_inputs: HashMap<String, AnalogInput>,
    digital_outputs: HashMap<String, u8>,
    /// Number of digital writes per pin
    write_counts: HashMap<String, usize>,
    pwm_outputs: HashMap<String, u8>,
    links: Vec<LinkConfig>,
    pending_changes: VecDeque<PendingInputChange>,
}

impl PinSimulator {
    /// Create a simulator with no configured pins. Unknown input pins read 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a simulator from the adaptor section of `grove.toml`.
    pub fn from_config(config: &AdaptorConfig) -> Self {
        let mut sim = Self::new();
        for input in &config.digital_inputs {
            sim.digital_inputs.insert(input.pin.clone(), input.initial);
        }
        for input in &config.analog_inputs {
            let mut state = AnalogInput::constant(input.initial);
            state.sweep_step = input.sweep_step.max(0);
            sim.analog_inputs.insert(input.pin.clone(), state);
        }
        sim.links = config.links.clone();

        debug!(
            "PinSimulator initialized: {} digital inputs, {} analog inputs, {} links",
            sim.digital_inputs.len(),
            sim.analog_inputs.len(),
            sim.links.len()
        );
        sim
    }

    /// Force a digital input level.
    pub fn set_digital(&mut self, pin: &str, level: i32) {
        self.digital_inputs.insert(pin.to_string(), level);
    }

    /// Force a constant analog input value.
    pub fn set_analog(&mut self, pin: &str, value: i32) {
        self.analog_inputs
            .insert(pin.to_string(), AnalogInput::constant(value));
    }

    /// Read a digital input after applying reactions due at `now`.
    pub fn read_digital(&mut self, pin: &str, now: Instant) -> i32 {
        self.process_pending_changes(now);
        self.digital_inputs.get(pin).copied().unwrap_or(0)
    }

    /// Read an analog input, advancing its sweep.
    pub fn read_analog(&mut self, pin: &str) -> i32 {
        self.analog_inputs
            .get_mut(pin)
            .map(AnalogInput::sample)
            .unwrap_or(0)
    }

    /// Write a digital output and queue linked reactions on an edge.
    pub fn write_digital(&mut self, pin: &str, level: u8, now: Instant) {
        let prev = self.digital_outputs.insert(pin.to_string(), level).unwrap_or(0);
        *self.write_counts.entry(pin.to_string()).or_default() += 1;

        if prev != level {
            self.handle_output_edge(pin, level, now);
        }
    }

    /// Write a PWM duty cycle.
    pub fn write_pwm(&mut self, pin: &str, duty: u8) {
        self.pwm_outputs.insert(pin.to_string(), duty);
    }

    /// Last level written to a digital output.
    pub fn digital_output(&self, pin: &str) -> Option<u8> {
        self.digital_outputs.get(pin).copied()
    }

    /// Last duty cycle written to a PWM output.
    pub fn pwm_output(&self, pin: &str) -> Option<u8> {
        self.pwm_outputs.get(pin).copied()
    }

    /// Number of digital writes to `pin`.
    pub fn write_count(&self, pin: &str) -> usize {
        self.write_counts.get(pin).copied().unwrap_or(0)
    }

    /// Number of queued linked reactions.
    pub fn pending_count(&self) -> usize {
        self.pending_changes.len()
    }

    /// Queue the linked reactions matching this edge.
    fn handle_output_edge(&mut self, pin: &str, level: u8, now: Instant) {
        for link in self
            .links
            .iter()
            .filter(|l| l.output_pin == pin && l.level == level)
        {
            trace!(
                "output {} -> {} queued input {} = {} in {}ms",
                pin, level, link.input_pin, level, link.delay_ms
            );
            self.pending_changes.push_back(PendingInputChange {
                trigger_time: now + Duration::from_millis(link.delay_ms),
                pin: link.input_pin.clone(),
                level: i32::from(level),
            });
        }
    }

    /// Apply every queued change due at `now`, in queue order.
    fn process_pending_changes(&mut self, now: Instant) {
        if self.pending_changes.is_empty() {
            return;
        }
        let (due, waiting): (VecDeque<_>, VecDeque<_>) = self
            .pending_changes
            .drain(..)
            .partition(|c| c.trigger_time <= now);
        self.pending_changes = waiting;

        for change in due {
            let old = self.digital_inputs.insert(change.pin.clone(), change.level);
            if old != Some(change.level) {
                debug!(
                    "input {} changed: {} -> {}",
                    change.pin,
                    old.unwrap_or(0),
                    change.level
                );
            }
        }
    }
}
