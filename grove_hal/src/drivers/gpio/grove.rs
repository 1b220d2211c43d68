//! Grove module drivers.
//!
//! Each Grove module is one of the generic drivers under a Grove name:
//! touch sensor and magnetic switch are buttons; sound, light, rotary and
//! piezo vibration sensors are analog sensors; LED, relay and buzzer are
//! output drivers. The wrappers deref to the generic driver for the
//! module-specific operations.

use super::analog_sensor::AnalogSensorDriver;
use super::button::ButtonDriver;
use super::buzzer::BuzzerDriver;
use super::led::LedDriver;
use super::relay::RelayDriver;
use grove_common::event::EventBus;
use grove_common::hal::adaptor::{AnalogReader, Connection, DigitalReader, DigitalWriter, PwmWriter};
use grove_common::hal::consts::{DEFAULT_POLL_INTERVAL, EVENT_VIBRATION};
use grove_common::hal::driver::{Driver, DriverError, Eventer, Pinner};
use grove_common::hal::types::DriverState;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;

/// Reading at or above which the piezo sensor reports a vibration.
pub const VIBRATION_THRESHOLD: i32 = 1000;

/// Declares a Grove wrapper around `$inner` that delegates the driver
/// traits and derefs to the inner driver.
macro_rules! grove_driver {
    ($(#[$meta:meta])* $name:ident => $inner:ty) => {
        $(#[$meta])*
        pub struct $name {
            inner: $inner,
        }

        impl Deref for $name {
            type Target = $inner;

            fn deref(&self) -> &$inner {
                &self.inner
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut $inner {
                &mut self.inner
            }
        }

        impl Driver for $name {
            fn name(&self) -> &str {
                self.inner.name()
            }

            fn set_name(&mut self, name: &str) {
                self.inner.set_name(name);
            }

            fn start(&self) -> Result<(), DriverError> {
                self.inner.start()
            }

            fn halt(&self) -> Result<(), DriverError> {
                self.inner.halt()
            }

            fn connection(&self) -> Arc<dyn Connection> {
                self.inner.connection()
            }

            fn state(&self) -> DriverState {
                self.inner.state()
            }
        }

        impl Pinner for $name {
            fn pin(&self) -> &str {
                self.inner.pin()
            }
        }

        impl Eventer for $name {
            fn events(&self) -> &EventBus {
                self.inner.events()
            }
        }
    };
}

fn named<D: Driver>(mut driver: D, name: &str) -> D {
    driver.set_name(name);
    driver
}

grove_driver!(
    /// Grove push button.
    GroveButtonDriver => ButtonDriver
);

impl GroveButtonDriver {
    /// Create a Grove button on `pin` polled every 10ms.
    pub fn new<A: DigitalReader + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self::with_interval(adaptor, pin, DEFAULT_POLL_INTERVAL)
    }

    /// Create a Grove button on `pin` polled every `interval`.
    pub fn with_interval<A: DigitalReader + 'static>(
        adaptor: Arc<A>,
        pin: &str,
        interval: Duration,
    ) -> Self {
        let inner = ButtonDriver::with_interval(adaptor, pin, interval);
        Self { inner: named(inner, "GroveButton") }
    }
}

grove_driver!(
    /// Grove capacitive touch sensor; publishes `push`/`release` like a button.
    GroveTouchDriver => ButtonDriver
);

impl GroveTouchDriver {
    /// Create a touch sensor on `pin` polled every 10ms.
    pub fn new<A: DigitalReader + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self::with_interval(adaptor, pin, DEFAULT_POLL_INTERVAL)
    }

    /// Create a touch sensor on `pin` polled every `interval`.
    pub fn with_interval<A: DigitalReader + 'static>(
        adaptor: Arc<A>,
        pin: &str,
        interval: Duration,
    ) -> Self {
        let inner = ButtonDriver::with_interval(adaptor, pin, interval);
        Self { inner: named(inner, "GroveTouch") }
    }
}

grove_driver!(
    /// Grove magnetic (reed) switch; publishes `push`/`release` like a button.
    GroveMagneticSwitchDriver => ButtonDriver
);

impl GroveMagneticSwitchDriver {
    /// Create a magnetic switch on `pin` polled every 10ms.
    pub fn new<A: DigitalReader + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self::with_interval(adaptor, pin, DEFAULT_POLL_INTERVAL)
    }

    /// Create a magnetic switch on `pin` polled every `interval`.
    pub fn with_interval<A: DigitalReader + 'static>(
        adaptor: Arc<A>,
        pin: &str,
        interval: Duration,
    ) -> Self {
        let inner = ButtonDriver::with_interval(adaptor, pin, interval);
        Self { inner: named(inner, "GroveMagneticSwitch") }
    }
}

grove_driver!(
    /// Grove sound sensor.
    GroveSoundSensorDriver => AnalogSensorDriver
);

impl GroveSoundSensorDriver {
    /// Create a sound sensor on `pin` polled every 10ms.
    pub fn new<A: AnalogReader + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self::with_interval(adaptor, pin, DEFAULT_POLL_INTERVAL)
    }

    /// Create a sound sensor on `pin` polled every `interval`.
    pub fn with_interval<A: AnalogReader + 'static>(
        adaptor: Arc<A>,
        pin: &str,
        interval: Duration,
    ) -> Self {
        let inner = AnalogSensorDriver::with_interval(adaptor, pin, interval);
        Self { inner: named(inner, "GroveSoundSensor") }
    }
}

grove_driver!(
    /// Grove light sensor.
    GroveLightSensorDriver => AnalogSensorDriver
);

impl GroveLightSensorDriver {
    /// Create a light sensor on `pin` polled every 10ms.
    pub fn new<A: AnalogReader + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self::with_interval(adaptor, pin, DEFAULT_POLL_INTERVAL)
    }

    /// Create a light sensor on `pin` polled every `interval`.
    pub fn with_interval<A: AnalogReader + 'static>(
        adaptor: Arc<A>,
        pin: &str,
        interval: Duration,
    ) -> Self {
        let inner = AnalogSensorDriver::with_interval(adaptor, pin, interval);
        Self { inner: named(inner, "GroveLightSensor") }
    }
}

grove_driver!(
    /// Grove rotary angle sensor (potentiometer).
    GroveRotaryDriver => AnalogSensorDriver
);

impl GroveRotaryDriver {
    /// Create a rotary sensor on `pin` polled every 10ms.
    pub fn new<A: AnalogReader + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self::with_interval(adaptor, pin, DEFAULT_POLL_INTERVAL)
    }

    /// Create a rotary sensor on `pin` polled every `interval`.
    pub fn with_interval<A: AnalogReader + 'static>(
        adaptor: Arc<A>,
        pin: &str,
        interval: Duration,
    ) -> Self {
        let inner = AnalogSensorDriver::with_interval(adaptor, pin, interval);
        Self { inner: named(inner, "GroveRotary") }
    }
}

grove_driver!(
    /// Grove piezo vibration sensor.
    ///
    /// Publishes `vibration` for every changed reading at or above
    /// [`VIBRATION_THRESHOLD`], in addition to the analog sensor events.
    GrovePiezoVibrationSensorDriver => AnalogSensorDriver
);

impl GrovePiezoVibrationSensorDriver {
    /// Create a vibration sensor on `pin` polled every 10ms.
    pub fn new<A: AnalogReader + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self::with_interval(adaptor, pin, DEFAULT_POLL_INTERVAL)
    }

    /// Create a vibration sensor on `pin` polled every `interval`.
    pub fn with_interval<A: AnalogReader + 'static>(
        adaptor: Arc<A>,
        pin: &str,
        interval: Duration,
    ) -> Self {
        let mut inner = AnalogSensorDriver::with_interval(adaptor, pin, interval);
        inner.add_threshold_event(EVENT_VIBRATION, VIBRATION_THRESHOLD);
        Self { inner: named(inner, "GrovePiezoVibrationSensor") }
    }
}

grove_driver!(
    /// Grove LED socket.
    GroveLedDriver => LedDriver
);

impl GroveLedDriver {
    /// Create a Grove LED on `pin`.
    pub fn new<A: DigitalWriter + PwmWriter + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self { inner: named(LedDriver::new(adaptor, pin), "GroveLed") }
    }
}

grove_driver!(
    /// Grove relay.
    GroveRelayDriver => RelayDriver
);

impl GroveRelayDriver {
    /// Create a Grove relay on `pin`.
    pub fn new<A: DigitalWriter + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self { inner: named(RelayDriver::new(adaptor, pin), "GroveRelay") }
    }
}

grove_driver!(
    /// Grove buzzer.
    GroveBuzzerDriver => BuzzerDriver
);

impl GroveBuzzerDriver {
    /// Create a Grove buzzer on `pin`.
    pub fn new<A: DigitalWriter + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self { inner: named(BuzzerDriver::new(adaptor, pin), "GroveBuzzer") }
    }
}
