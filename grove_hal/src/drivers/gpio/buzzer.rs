//! Buzzer driver.
//!
//! Tones are square waves produced by toggling the pin from the caller's
//! thread; `tone` blocks for the tone's duration.

use super::output::OutputPin;
use grove_common::event::EventBus;
use grove_common::hal::adaptor::{Connection, DigitalWriter};
use grove_common::hal::driver::{Driver, DriverError, Eventer, Pinner};
use grove_common::hal::types::{DriverState, Level};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::trace;

/// Silence.
pub const REST: f64 = 0.0;
/// Middle C.
pub const C4: f64 = 261.63;
/// D above middle C.
pub const D4: f64 = 293.66;
/// E above middle C.
pub const E4: f64 = 329.63;
/// F above middle C.
pub const F4: f64 = 349.23;
/// G above middle C.
pub const G4: f64 = 392.00;
/// Concert A.
pub const A4: f64 = 440.00;
/// B above middle C.
pub const B4: f64 = 493.88;
/// C one octave above middle C.
pub const C5: f64 = 523.25;

/// Default tempo in beats per minute.
pub const DEFAULT_BPM: f64 = 96.0;

/// Highest frequency `tone` will toggle the pin at.
pub const MAX_TONE_HZ: f64 = 20_000.0;

/// Buzzer on a digital pin.
pub struct BuzzerDriver {
    name: String,
    output: OutputPin,
    bpm: f64,
}

impl BuzzerDriver {
    /// Create a buzzer on `pin`.
    pub fn new<A: DigitalWriter + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self {
            name: "Buzzer".to_string(),
            output: OutputPin::new(adaptor, pin),
            bpm: DEFAULT_BPM,
        }
    }

    /// Tempo in beats per minute.
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Set the tempo.
    ///
    /// # Errors
    /// `DriverError::InvalidArgument` unless `bpm` is positive.
    pub fn set_bpm(&mut self, bpm: f64) -> Result<(), DriverError> {
        if bpm.is_nan() || bpm <= 0.0 {
            return Err(DriverError::InvalidArgument(format!(
                "bpm must be positive, got {bpm}"
            )));
        }
        self.bpm = bpm;
        Ok(())
    }

    /// Duration of `beats` beats at the current tempo.
    ///
    /// # Errors
    /// `DriverError::InvalidArgument` for negative or non-finite beat counts,
    /// or when the result does not fit a `Duration`.
    pub fn beats(&self, beats: f64) -> Result<Duration, DriverError> {
        if !beats.is_finite() || beats < 0.0 {
            return Err(DriverError::InvalidArgument(format!(
                "beats must be a non-negative number, got {beats}"
            )));
        }
        Duration::try_from_secs_f64(60.0 / self.bpm * beats).map_err(|e| {
            DriverError::InvalidArgument(format!("{beats} beats at {} bpm: {e}", self.bpm))
        })
    }

    /// Drive the pin high.
    pub fn on(&self) -> Result<(), DriverError> {
        self.output.write(Level::High)
    }

    /// Drive the pin low.
    pub fn off(&self) -> Result<(), DriverError> {
        self.output.write(Level::Low)
    }

    /// Invert the pin.
    pub fn toggle(&self) -> Result<(), DriverError> {
        self.output.write(self.output.level().inverted())
    }

    /// Whether the pin was last driven high.
    pub fn is_on(&self) -> bool {
        self.output.level() == Level::High
    }

    /// Play `hz` for `duration`; `REST` stays silent for `duration`.
    ///
    /// # Errors
    /// `DriverError::InvalidArgument` for frequencies outside `0..=MAX_TONE_HZ`
    /// or too low to have a representable half period.
    pub fn tone(&self, hz: f64, duration: Duration) -> Result<(), DriverError> {
        if !hz.is_finite() || !(0.0..=MAX_TONE_HZ).contains(&hz) {
            return Err(DriverError::InvalidArgument(format!(
                "tone frequency must be within 0..={MAX_TONE_HZ} Hz, got {hz}"
            )));
        }
        if hz == REST {
            thread::sleep(duration);
            return Ok(());
        }

        let half_period = Duration::try_from_secs_f64(0.5 / hz).map_err(|e| {
            DriverError::InvalidArgument(format!("tone frequency {hz} Hz: {e}"))
        })?;
        let cycles = (duration.as_secs_f64() * hz).round() as u64;
        trace!(pin = %self.output.pin(), hz, cycles, "playing tone");

        for _ in 0..cycles {
            self.on()?;
            thread::sleep(half_period);
            self.off()?;
            thread::sleep(half_period);
        }
        Ok(())
    }
}

impl Driver for BuzzerDriver {
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

impl Pinner for BuzzerDriver {
    fn pin(&self) -> &str {
        self.output.pin()
    }
}

impl Eventer for BuzzerDriver {
    fn events(&self) -> &EventBus {
        self.output.events()
    }
}
