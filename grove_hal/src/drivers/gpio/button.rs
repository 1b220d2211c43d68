//! Push button driver.
//!
//! Polls a digital pin and publishes `push` when the level leaves the
//! button's default state and `release` when it returns. Active-low wiring
//! is handled by setting the default state to 1.

use super::poller::Poller;
use grove_common::event::{EventBus, EventData};
use grove_common::hal::adaptor::{Connection, DigitalReader};
use grove_common::hal::consts::{DEFAULT_POLL_INTERVAL, EVENT_ERROR, EVENT_PUSH, EVENT_RELEASE};
use grove_common::hal::driver::{Driver, DriverError, Eventer, Pinner};
use grove_common::hal::types::DriverState;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::time::Duration;
use tracing::{debug, trace};

/// Digital push button.
pub struct ButtonDriver {
    name: String,
    pin: String,
    connection: Arc<dyn Connection>,
    reader: Arc<dyn DigitalReader>,
    /// Level of the released button
    default_state: i32,
    /// Whether the button is currently pushed
    active: Arc<AtomicBool>,
    /// Last level read by the polling loop
    last_value: Arc<AtomicI32>,
    poller: Poller,
}

impl ButtonDriver {
    /// Create a button on `pin` polled every 10ms.
    pub fn new<A: DigitalReader + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self::with_interval(adaptor, pin, DEFAULT_POLL_INTERVAL)
    }

    /// Create a button on `pin` polled every `interval`.
    pub fn with_interval<A: DigitalReader + 'static>(
        adaptor: Arc<A>,
        pin: &str,
        interval: Duration,
    ) -> Self {
        let connection: Arc<dyn Connection> = adaptor.clone();
        let poller = Poller::new(interval);
        poller.events().add_event(EVENT_PUSH);
        poller.events().add_event(EVENT_RELEASE);
        poller.events().add_event(EVENT_ERROR);

        Self {
            name: "Button".to_string(),
            pin: pin.to_string(),
            connection,
            reader: adaptor,
            default_state: 0,
            active: Arc::new(AtomicBool::new(false)),
            last_value: Arc::new(AtomicI32::new(0)),
            poller,
        }
    }

    /// Set the level of the released button (1 for active-low wiring).
    ///
    /// Takes effect on the next start.
    pub fn set_default_state(&mut self, state: i32) {
        self.default_state = state;
    }

    /// Level of the released button.
    pub fn default_state(&self) -> i32 {
        self.default_state
    }

    /// Whether the button is currently pushed.
    pub fn active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Last level seen by the polling loop.
    pub fn value(&self) -> i32 {
        self.last_value.load(Ordering::Acquire)
    }

    /// Poll interval.
    pub fn interval(&self) -> Duration {
        self.poller.interval()
    }
}

impl Driver for ButtonDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn start(&self) -> Result<(), DriverError> {
        self.poller.start(&self.name, self.connection.as_ref(), || {
            let reader = Arc::clone(&self.reader);
            let pin = self.pin.clone();
            let default_state = self.default_state;
            let active = Arc::clone(&self.active);
            let last_value = Arc::clone(&self.last_value);

            active.store(false, Ordering::Release);
            last_value.store(default_state, Ordering::Release);
            let mut state = default_state;

            move |events: &EventBus| match reader.digital_read(&pin) {
                Ok(value) if value != state => {
                    trace!(pin = %pin, value, "button level changed");
                    state = value;
                    last_value.store(value, Ordering::Release);
                    if value != default_state {
                        active.store(true, Ordering::Release);
                        events.publish(EVENT_PUSH, EventData::Value(value));
                    } else {
                        active.store(false, Ordering::Release);
                        events.publish(EVENT_RELEASE, EventData::Value(value));
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(pin = %pin, "digital read failed: {}", e);
                    events.publish(EVENT_ERROR, EventData::Error(e));
                }
            }
        })
    }

    fn halt(&self) -> Result<(), DriverError> {
        self.poller.halt(&self.name)
    }

    fn connection(&self) -> Arc<dyn Connection> {
        Arc::clone(&self.connection)
    }

    fn state(&self) -> DriverState {
        self.poller.state()
    }
}

impl Pinner for ButtonDriver {
    fn pin(&self) -> &str {
        &self.pin
    }
}

impl Eventer for ButtonDriver {
    fn events(&self) -> &EventBus {
        self.poller.events()
    }
}
