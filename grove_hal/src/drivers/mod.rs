//! Driver implementations.
//!
//! - [`gpio`] - Pin drivers (buttons, analog sensors, LEDs, relays, buzzers)
//!   and their Grove module variants
//! - [`spi`] - SPI device drivers (MCP3002 ADC)
//!
//! # Adding New Drivers
//!
//! 1. Create the driver under `gpio/` or `spi/`
//! 2. Implement `Driver` (plus `Pinner` and `Eventer` for pin drivers)
//! 3. Add a factory below and register it in [`register_all_drivers`]

pub mod gpio;
pub mod spi;

use crate::driver_registry::DriverRegistry;
use gpio::{
    AnalogSensorDriver, ButtonDriver, BuzzerDriver, GroveButtonDriver, GroveBuzzerDriver,
    GroveLedDriver, GroveLightSensorDriver, GroveMagneticSwitchDriver,
    GrovePiezoVibrationSensorDriver, GroveRelayDriver, GroveRotaryDriver, GroveSoundSensorDriver,
    GroveTouchDriver, LedDriver, RelayDriver,
};
use grove_common::hal::adaptor::{AnalogReader, DigitalReader, DigitalWriter, PwmWriter};
use grove_common::hal::config::DriverConfig;
use grove_common::hal::driver::GpioDriver;
use std::sync::Arc;

/// Adaptors able to host every registered pin driver.
pub trait BoardAdaptor: DigitalReader + AnalogReader + DigitalWriter + PwmWriter {}

impl<T: DigitalReader + AnalogReader + DigitalWriter + PwmWriter> BoardAdaptor for T {}

/// Register every built-in driver kind.
pub fn register_all_drivers<A: BoardAdaptor + 'static>(registry: &mut DriverRegistry<A>) {
    registry.register("button", button::<A>);
    registry.register("analog_sensor", analog_sensor::<A>);
    registry.register("led", led::<A>);
    registry.register("relay", relay::<A>);
    registry.register("buzzer", buzzer::<A>);

    registry.register("grove_button", grove_button::<A>);
    registry.register("grove_touch", grove_touch::<A>);
    registry.register("grove_magnetic_switch", grove_magnetic_switch::<A>);
    registry.register("grove_sound_sensor", grove_sound_sensor::<A>);
    registry.register("grove_light_sensor", grove_light_sensor::<A>);
    registry.register("grove_rotary", grove_rotary::<A>);
    registry.register("grove_piezo_vibration", grove_piezo_vibration::<A>);
    registry.register("grove_led", grove_led::<A>);
    registry.register("grove_relay", grove_relay::<A>);
    registry.register("grove_buzzer", grove_buzzer::<A>);
}

/// Released level for the configured button wiring.
fn default_state(cfg: &DriverConfig) -> i32 {
    i32::from(cfg.active_low)
}

fn button<A: BoardAdaptor + 'static>(a: Arc<A>, cfg: &DriverConfig) -> Box<dyn GpioDriver> {
    let mut d = ButtonDriver::with_interval(a, &cfg.pin, cfg.interval());
    d.set_default_state(default_state(cfg));
    Box::new(d)
}

fn analog_sensor<A: BoardAdaptor + 'static>(a: Arc<A>, cfg: &DriverConfig) -> Box<dyn GpioDriver> {
    Box::new(AnalogSensorDriver::with_interval(a, &cfg.pin, cfg.interval()))
}

fn led<A: BoardAdaptor + 'static>(a: Arc<A>, cfg: &DriverConfig) -> Box<dyn GpioDriver> {
    Box::new(LedDriver::new(a, &cfg.pin))
}

fn relay<A: BoardAdaptor + 'static>(a: Arc<A>, cfg: &DriverConfig) -> Box<dyn GpioDriver> {
    let mut d = RelayDriver::new(a, &cfg.pin);
    d.set_inverted(cfg.inverted);
    Box::new(d)
}

fn buzzer<A: BoardAdaptor + 'static>(a: Arc<A>, cfg: &DriverConfig) -> Box<dyn GpioDriver> {
    Box::new(BuzzerDriver::new(a, &cfg.pin))
}

fn grove_button<A: BoardAdaptor + 'static>(a: Arc<A>, cfg: &DriverConfig) -> Box<dyn GpioDriver> {
    let mut d = GroveButtonDriver::with_interval(a, &cfg.pin, cfg.interval());
    d.set_default_state(default_state(cfg));
    Box::new(d)
}

fn grove_touch<A: BoardAdaptor + 'static>(a: Arc<A>, cfg: &DriverConfig) -> Box<dyn GpioDriver> {
    let mut d = GroveTouchDriver::with_interval(a, &cfg.pin, cfg.interval());
    d.set_default_state(default_state(cfg));
    Box::new(d)
}

fn grove_magnetic_switch<A: BoardAdaptor + 'static>(
    a: Arc<A>,
    cfg: &DriverConfig,
) -> Box<dyn GpioDriver> {
    let mut d = GroveMagneticSwitchDriver::with_interval(a, &cfg.pin, cfg.interval());
    d.set_default_state(default_state(cfg));
    Box::new(d)
}

fn grove_sound_sensor<A: BoardAdaptor + 'static>(
    a: Arc<A>,
    cfg: &DriverConfig,
) -> Box<dyn GpioDriver> {
    Box::new(GroveSoundSensorDriver::with_interval(a, &cfg.pin, cfg.interval()))
}

fn grove_light_sensor<A: BoardAdaptor + 'static>(
    a: Arc<A>,
    cfg: &DriverConfig,
) -> Box<dyn GpioDriver> {
    Box::new(GroveLightSensorDriver::with_interval(a, &cfg.pin, cfg.interval()))
}

fn grove_rotary<A: BoardAdaptor + 'static>(a: Arc<A>, cfg: &DriverConfig) -> Box<dyn GpioDriver> {
    Box::new(GroveRotaryDriver::with_interval(a, &cfg.pin, cfg.interval()))
}

fn grove_piezo_vibration<A: BoardAdaptor + 'static>(
    a: Arc<A>,
    cfg: &DriverConfig,
) -> Box<dyn GpioDriver> {
    Box::new(GrovePiezoVibrationSensorDriver::with_interval(
        a,
        &cfg.pin,
        cfg.interval(),
    ))
}

fn grove_led<A: BoardAdaptor + 'static>(a: Arc<A>, cfg: &DriverConfig) -> Box<dyn GpioDriver> {
    Box::new(GroveLedDriver::new(a, &cfg.pin))
}

fn grove_relay<A: BoardAdaptor + 'static>(a: Arc<A>, cfg: &DriverConfig) -> Box<dyn GpioDriver> {
    let mut d = GroveRelayDriver::new(a, &cfg.pin);
    d.set_inverted(cfg.inverted);
    Box::new(d)
}

fn grove_buzzer<A: BoardAdaptor + 'static>(a: Arc<A>, cfg: &DriverConfig) -> Box<dyn GpioDriver> {
    Box::new(GroveBuzzerDriver::new(a, &cfg.pin))
}
