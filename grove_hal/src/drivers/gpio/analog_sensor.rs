//! Analog sensor driver.
//!
//! Polls an analog pin and publishes `data` with the raw reading whenever it
//! changes. With a scaler configured the converted reading is published as
//! `value` alongside. Threshold events fire for changed readings at or above
//! their threshold (used by the piezo vibration sensor).

use super::poller::Poller;
use grove_common::event::{EventBus, EventData};
use grove_common::hal::adaptor::{AnalogReader, Connection};
use grove_common::hal::consts::{DEFAULT_POLL_INTERVAL, EVENT_DATA, EVENT_ERROR, EVENT_VALUE};
use grove_common::hal::driver::{Driver, DriverError, Eventer, Pinner};
use grove_common::hal::types::DriverState;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;
use tracing::{debug, trace};

/// Converts a raw reading into engineering units.
pub type Scaler = Arc<dyn Fn(i32) -> f64 + Send + Sync>;

/// Linear scaler mapping `from_min..=from_max` onto `to_min..=to_max`.
///
/// Readings outside the input range are clamped.
pub fn linear_scaler(from_min: i32, from_max: i32, to_min: f64, to_max: f64) -> Scaler {
    Arc::new(move |raw| {
        if from_max == from_min {
            return to_min;
        }
        let clamped = raw.clamp(from_min.min(from_max), from_min.max(from_max));
        let ratio = f64::from(clamped - from_min) / f64::from(from_max - from_min);
        to_min + ratio * (to_max - to_min)
    })
}

/// Named event published for readings at or above a threshold.
#[derive(Debug, Clone)]
struct ThresholdEvent {
    name: String,
    threshold: i32,
}

/// Generic analog sensor.
pub struct AnalogSensorDriver {
    name: String,
    pin: String,
    connection: Arc<dyn Connection>,
    reader: Arc<dyn AnalogReader>,
    scaler: Option<Scaler>,
    thresholds: Vec<ThresholdEvent>,
    /// Last raw reading of the polling loop
    raw_value: Arc<AtomicI32>,
    /// Last scaled reading of the polling loop
    scaled_value: Arc<Mutex<f64>>,
    poller: Poller,
}

impl AnalogSensorDriver {
    /// Create a sensor on `pin` polled every 10ms.
    pub fn new<A: AnalogReader + 'static>(adaptor: Arc<A>, pin: &str) -> Self {
        Self::with_interval(adaptor, pin, DEFAULT_POLL_INTERVAL)
    }

    /// Create a sensor on `pin` polled every `interval`.
    pub fn with_interval<A: AnalogReader + 'static>(
        adaptor: Arc<A>,
        pin: &str,
        interval: Duration,
    ) -> Self {
        let connection: Arc<dyn Connection> = adaptor.clone();
        let poller = Poller::new(interval);
        poller.events().add_event(EVENT_DATA);
        poller.events().add_event(EVENT_VALUE);
        poller.events().add_event(EVENT_ERROR);

        Self {
            name: "AnalogSensor".to_string(),
            pin: pin.to_string(),
            connection,
            reader: adaptor,
            scaler: None,
            thresholds: Vec::new(),
            raw_value: Arc::new(AtomicI32::new(0)),
            scaled_value: Arc::new(Mutex::new(0.0)),
            poller,
        }
    }

    /// Publish `value` events converted by `scaler`. Takes effect on the next start.
    pub fn set_scaler(&mut self, scaler: Scaler) {
        self.scaler = Some(scaler);
    }

    /// Declare `name` and publish it for every changed reading `>= threshold`.
    /// Takes effect on the next start.
    pub fn add_threshold_event(&mut self, name: &str, threshold: i32) {
        self.poller.events().add_event(name);
        self.thresholds.push(ThresholdEvent {
            name: name.to_string(),
            threshold,
        });
    }

    /// Last raw reading seen by the polling loop.
    pub fn raw_value(&self) -> i32 {
        self.raw_value.load(Ordering::Acquire)
    }

    /// Last scaled reading (the raw reading when no scaler is set).
    pub fn value(&self) -> f64 {
        match self.scaler {
            Some(_) => *self.scaled_value.lock(),
            None => f64::from(self.raw_value()),
        }
    }

    /// Poll interval.
    pub fn interval(&self) -> Duration {
        self.poller.interval()
    }
}

impl Driver for AnalogSensorDriver {
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
            let scaler = self.scaler.clone();
            let thresholds = self.thresholds.clone();
            let raw_value = Arc::clone(&self.raw_value);
            let scaled_value = Arc::clone(&self.scaled_value);

            raw_value.store(0, Ordering::Release);
            *scaled_value.lock() = 0.0;
            let mut last = 0;

            move |events: &EventBus| match reader.analog_read(&pin) {
                Ok(value) if value != last => {
                    trace!(pin = %pin, value, "analog reading changed");
                    last = value;
                    raw_value.store(value, Ordering::Release);
                    events.publish(EVENT_DATA, EventData::Value(value));

                    if let Some(scale) = &scaler {
                        let scaled = scale(value);
                        *scaled_value.lock() = scaled;
                        events.publish(EVENT_VALUE, EventData::Scaled(scaled));
                    }

                    for t in thresholds.iter().filter(|t| value >= t.threshold) {
                        events.publish(&t.name, EventData::Value(value));
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(pin = %pin, "analog read failed: {}", e);
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

impl Pinner for AnalogSensorDriver {
    fn pin(&self) -> &str {
        &self.pin
    }
}

impl Eventer for AnalogSensorDriver {
    fn events(&self) -> &EventBus {
        self.poller.events()
    }
}
