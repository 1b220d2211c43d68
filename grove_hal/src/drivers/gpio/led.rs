//! LED driver.

use super::output::OutputPin;
use grove_common::event::EventBus;
use grove_common::hal::adaptor::{Connection, DigitalWriter, PwmWriter};
use grove_common::hal::driver::{Driver, DriverError, Eventer, Pinner};
use grove_common::hal::types::{DriverState, Level};
use std::sync::Arc;

/// LED on a digital pin, with PWM brightness.
pub struct LedDriver {
    name: String,
    output: OutputPin,
    pwm: Arc<dyn PwmWriter>,
}

impl LedDriver {
    /// Create an LED on `pin`.
    pub fn new<A: DigitalWriter + PwmWriter + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self {
            name: "Led".to_string(),
            output: OutputPin::new(adaptor.clone(), pin),
            pwm: adaptor,
        }
    }

    /// Switch the LED on.
    pub fn on(&self) -> Result<(), DriverError> {
        self.output.write(Level::High)
    }

    /// Switch the LED off.
    pub fn off(&self) -> Result<(), DriverError> {
        self.output.write(Level::Low)
    }

    /// Invert the LED.
    pub fn toggle(&self) -> Result<(), DriverError> {
        self.output.write(self.output.level().inverted())
    }

    /// Set the PWM duty cycle. Does not change the on/off state.
    pub fn brightness(&self, duty: u8) -> Result<(), DriverError> {
        self.pwm.pwm_write(self.output.pin(), duty)?;
        Ok(())
    }

    /// Whether the LED was last switched on.
    pub fn is_on(&self) -> bool {
        self.output.level() == Level::High
    }
}

impl Driver for LedDriver {
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

impl Pinner for LedDriver {
    fn pin(&self) -> &str {
        self.output.pin()
    }
}

impl Eventer for LedDriver {
    fn events(&self) -> &EventBus {
        self.output.events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulationAdaptor;

    #[test]
    fn test_led_on_off_toggle() {
        let a = Arc::new(SimulationAdaptor::new("sim"));
        let led = LedDriver::new(a.clone(), "13");
        assert!(!led.is_on());

        led.on().unwrap();
        assert!(led.is_on());
        assert_eq!(a.digital_output("13"), Some(1));

        led.toggle().unwrap();
        assert!(!led.is_on());
        assert_eq!(a.digital_output("13"), Some(0));

        led.toggle().unwrap();
        led.off().unwrap();
        assert_eq!(a.digital_output("13"), Some(0));
    }

    #[test]
    fn test_led_brightness() {
        let a = Arc::new(SimulationAdaptor::new("sim"));
        let led = LedDriver::new(a.clone(), "9");
        led.brightness(128).unwrap();
        assert_eq!(a.pwm_output("9"), Some(128));
        assert!(!led.is_on());
    }

    #[test]
    fn test_led_lifecycle() {
        let a = Arc::new(SimulationAdaptor::new("sim"));
        let led = LedDriver::new(a.clone(), "9");
        assert_eq!(led.state(), DriverState::Stopped);
        led.start().unwrap();
        led.start().unwrap();
        assert_eq!(led.state(), DriverState::Running);
        led.halt().unwrap();
        led.halt().unwrap();
        assert_eq!(led.state(), DriverState::Stopped);

        a.set_connected(false);
        assert!(matches!(led.start(), Err(DriverError::NotConnected(_))));
    }
}
