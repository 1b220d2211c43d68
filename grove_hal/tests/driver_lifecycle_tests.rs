//! Driver lifecycle integration tests.
//!
//! Covers defaults, start/halt semantics, the guarantee that no adaptor read
//! happens after `halt()` returns, and error event publishing for every
//! polling driver.

mod common;

use common::TestAdaptor;
use grove_common::event::EventData;
use grove_common::hal::consts::{DEFAULT_POLL_INTERVAL, EVENT_DATA, EVENT_ERROR, EVENT_PUSH};
use grove_common::hal::driver::{AdaptorError, Driver, DriverError, Eventer, GpioDriver};
use grove_common::hal::types::DriverState;
use grove_hal::drivers::gpio::{
    AnalogSensorDriver, ButtonDriver, BuzzerDriver, GroveButtonDriver, GroveBuzzerDriver,
    GroveLedDriver, GroveLightSensorDriver, GroveMagneticSwitchDriver,
    GrovePiezoVibrationSensorDriver, GroveRelayDriver, GroveRotaryDriver, GroveSoundSensorDriver,
    GroveTouchDriver, LedDriver, RelayDriver,
};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

type Factory = fn(Arc<TestAdaptor>) -> Box<dyn GpioDriver>;

/// Boxes `$driver::new(adaptor, "1")` as a `Factory`.
macro_rules! factory {
    ($driver:ident) => {
        (|a: Arc<TestAdaptor>| -> Box<dyn GpioDriver> { Box::new($driver::new(a, "1")) })
            as Factory
    };
}

/// Every polling driver, with its expected default name.
fn polling_drivers() -> Vec<(&'static str, Factory)> {
    vec![
        ("Button", factory!(ButtonDriver)),
        ("GroveButton", factory!(GroveButtonDriver)),
        ("GroveTouch", factory!(GroveTouchDriver)),
        ("GroveMagneticSwitch", factory!(GroveMagneticSwitchDriver)),
        ("AnalogSensor", factory!(AnalogSensorDriver)),
        ("GroveSoundSensor", factory!(GroveSoundSensorDriver)),
        ("GroveLightSensor", factory!(GroveLightSensorDriver)),
        ("GroveRotary", factory!(GroveRotaryDriver)),
        ("GrovePiezoVibrationSensor", factory!(GrovePiezoVibrationSensorDriver)),
    ]
}

/// Every output driver, with its expected default name.
fn output_drivers() -> Vec<(&'static str, Factory)> {
    vec![
        ("Led", factory!(LedDriver)),
        ("Relay", factory!(RelayDriver)),
        ("Buzzer", factory!(BuzzerDriver)),
        ("GroveLed", factory!(GroveLedDriver)),
        ("GroveRelay", factory!(GroveRelayDriver)),
        ("GroveBuzzer", factory!(GroveBuzzerDriver)),
    ]
}

#[test]
fn test_driver_defaults() {
    for (name, make) in polling_drivers().into_iter().chain(output_drivers()) {
        let adaptor = Arc::new(TestAdaptor::new());
        let driver = make(adaptor.clone());

        assert_eq!(driver.name(), name);
        assert_eq!(driver.pin(), "1");
        assert_eq!(driver.state(), DriverState::Stopped);
        assert!(
            std::ptr::addr_eq(Arc::as_ptr(&driver.connection()), Arc::as_ptr(&adaptor)),
            "{name} must report the adaptor it was built on"
        );
    }
}

#[test]
fn test_set_name() {
    let adaptor = Arc::new(TestAdaptor::new());
    let mut touch = GroveTouchDriver::new(adaptor, "1");
    touch.set_name("mybot");
    assert_eq!(touch.name(), "mybot");
}

#[test]
fn test_start_and_halt_every_driver() {
    for (name, make) in polling_drivers().into_iter().chain(output_drivers()) {
        let driver = make(Arc::new(TestAdaptor::new()));
        driver.start().unwrap_or_else(|e| panic!("{name} start: {e}"));
        assert_eq!(driver.state(), DriverState::Running);
        driver.halt().unwrap_or_else(|e| panic!("{name} halt: {e}"));
        assert_eq!(driver.state(), DriverState::Stopped);
    }
}

#[test]
fn test_digital_halt_stops_reads() {
    let adaptor = Arc::new(TestAdaptor::new());
    let button = GroveButtonDriver::new(adaptor.clone(), "1");
    assert_eq!(button.interval(), DEFAULT_POLL_INTERVAL);

    button.start().unwrap();
    thread::sleep(Duration::from_millis(20));
    button.halt().unwrap();

    let reads = adaptor.digital_reads.load(Ordering::SeqCst);
    assert!(reads > 0, "loop must have polled");
    thread::sleep(Duration::from_millis(20));
    assert_eq!(adaptor.digital_reads.load(Ordering::SeqCst), reads);
}

#[test]
fn test_analog_halt_stops_reads() {
    let adaptor = Arc::new(TestAdaptor::new());
    let sensor = GroveSoundSensorDriver::new(adaptor.clone(), "1");

    sensor.start().unwrap();
    thread::sleep(Duration::from_millis(20));
    sensor.halt().unwrap();

    let reads = adaptor.analog_reads.load(Ordering::SeqCst);
    assert!(reads > 0, "loop must have polled");
    thread::sleep(Duration::from_millis(20));
    assert_eq!(adaptor.analog_reads.load(Ordering::SeqCst), reads);
}

#[test]
fn test_halt_stops_reads_for_every_polling_driver() {
    for (name, make) in polling_drivers() {
        let adaptor = Arc::new(TestAdaptor::new());
        let driver = make(adaptor.clone());

        driver.start().unwrap();
        thread::sleep(Duration::from_millis(20));
        driver.halt().unwrap();

        let reads = adaptor.reads();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(adaptor.reads(), reads, "{name} read after halt");
    }
}

#[test]
fn test_read_error_publishes_error_event() {
    for (name, make) in polling_drivers() {
        let adaptor = Arc::new(TestAdaptor::new());
        adaptor.set_digital_read_fn(|| Err(AdaptorError::Io("read error".to_string())));
        adaptor.set_analog_read_fn(|| Err(AdaptorError::Io("read error".to_string())));
        let driver = make(adaptor);
        let errors = driver.events().subscribe_to(EVENT_ERROR).unwrap();

        driver.start().unwrap();
        let got = errors
            .recv_timeout(Duration::from_secs(1))
            .unwrap_or_else(|_| panic!("{name} did not publish an error"));
        driver.halt().unwrap();

        let err = got.as_error().cloned().expect("error payload");
        assert_eq!(err.to_string(), "read error");
    }
}

#[test]
fn test_loop_recovers_after_read_errors() {
    let adaptor = Arc::new(TestAdaptor::new());
    adaptor.set_analog_read_fn(|| Err(AdaptorError::Io("read error".to_string())));
    let sensor = AnalogSensorDriver::with_interval(adaptor.clone(), "1", Duration::from_millis(1));
    let errors = sensor.events().subscribe_to(EVENT_ERROR).unwrap();
    let data = sensor.events().subscribe_to(EVENT_DATA).unwrap();

    sensor.start().unwrap();
    errors.recv_timeout(Duration::from_secs(1)).unwrap();
    adaptor.set_analog_read_fn(|| Ok(512));
    let got = data.recv_timeout(Duration::from_secs(1)).unwrap();
    sensor.halt().unwrap();

    assert_eq!(got, EventData::Value(512));
}

#[test]
fn test_double_start_and_double_halt_are_noops() {
    let adaptor = Arc::new(TestAdaptor::new());
    let button = ButtonDriver::with_interval(adaptor.clone(), "1", Duration::from_millis(1));
    let push = button.events().subscribe_to(EVENT_PUSH).unwrap();

    button.start().unwrap();
    button.start().unwrap();
    assert_eq!(button.state(), DriverState::Running);

    // One loop only: the 0 -> 1 edge is reported once
    push.recv_timeout(Duration::from_secs(1)).unwrap();
    thread::sleep(Duration::from_millis(20));
    assert!(push.try_recv().is_err());

    button.halt().unwrap();
    button.halt().unwrap();
    assert_eq!(button.state(), DriverState::Stopped);

    let reads = adaptor.digital_reads.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(10));
    assert_eq!(adaptor.digital_reads.load(Ordering::SeqCst), reads);
}

#[test]
fn test_halt_before_start_is_noop() {
    for (_, make) in polling_drivers().into_iter().chain(output_drivers()) {
        let driver = make(Arc::new(TestAdaptor::new()));
        assert!(driver.halt().is_ok());
        assert_eq!(driver.state(), DriverState::Stopped);
    }
}

#[test]
fn test_restart_after_halt() {
    let adaptor = Arc::new(TestAdaptor::new());
    let button = ButtonDriver::with_interval(adaptor.clone(), "1", Duration::from_millis(1));
    let push = button.events().subscribe_to(EVENT_PUSH).unwrap();

    button.start().unwrap();
    push.recv_timeout(Duration::from_secs(1)).unwrap();
    button.halt().unwrap();

    // A fresh run starts from the default state again and reports the edge anew
    button.start().unwrap();
    push.recv_timeout(Duration::from_secs(1)).unwrap();
    button.halt().unwrap();
}

#[test]
fn test_start_refused_when_disconnected() {
    for (name, make) in polling_drivers().into_iter().chain(output_drivers()) {
        let adaptor = Arc::new(TestAdaptor::new());
        adaptor.set_connected(false);
        let driver = make(adaptor.clone());

        assert!(
            matches!(driver.start(), Err(DriverError::NotConnected(_))),
            "{name} started on a disconnected adaptor"
        );
        assert_eq!(driver.state(), DriverState::Stopped);
        assert_eq!(adaptor.reads(), 0);
    }
}

#[test]
fn test_event_names_declared() {
    for (name, make) in polling_drivers() {
        let driver = make(Arc::new(TestAdaptor::new()));
        assert!(driver.events().has_event(EVENT_ERROR), "{name} lacks error");
    }
    let piezo = GrovePiezoVibrationSensorDriver::new(Arc::new(TestAdaptor::new()), "1");
    assert!(piezo.events().has_event("vibration"));
}
