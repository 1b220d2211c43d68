//! GPIO drivers.
//!
//! - [`poller`] - Background polling loop shared by input drivers
//! - [`button`] / [`analog_sensor`] - Polling input drivers
//! - [`led`] / [`relay`] / [`buzzer`] - Output drivers
//! - [`grove`] - Grove module variants of the above

pub mod analog_sensor;
pub mod button;
pub mod buzzer;
pub mod grove;
pub mod led;
mod output;
pub mod poller;
pub mod relay;

pub use analog_sensor::{AnalogSensorDriver, Scaler, linear_scaler};
pub use button::ButtonDriver;
pub use buzzer::BuzzerDriver;
pub use grove::{
    GroveButtonDriver, GroveBuzzerDriver, GroveLedDriver, GroveLightSensorDriver,
    GroveMagneticSwitchDriver, GrovePiezoVibrationSensorDriver, GroveRelayDriver,
    GroveRotaryDriver, GroveSoundSensorDriver, GroveTouchDriver,
};
pub use led::LedDriver;
pub use poller::Poller;
pub use relay::RelayDriver;
