//! GroveCore integration tests: config loading, init and the event loop.

use grove_common::hal::driver::DriverError;
use grove_common::hal::types::DriverState;
use grove_hal::core::GroveCore;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
[shared]
service_name = "grove_test"

[adaptor]
name = "bench"

[[adaptor.digital_inputs]]
pin = "2"
initial = 0

[[adaptor.analog_inputs]]
pin = "A0"
initial = 0
sweep_step = 100

[[adaptor.links]]
output_pin = "13"
input_pin = "2"
delay_ms = 5

[[drivers]]
kind = "grove_button"
name = "start"
pin = "2"
interval_ms = 1

[[drivers]]
kind = "grove_rotary"
pin = "A0"
interval_ms = 1

[[drivers]]
kind = "grove_led"
pin = "13"
"#;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config() {
    let file = write_config(CONFIG);
    let config = GroveCore::load_config(file.path()).unwrap();

    assert_eq!(config.shared.service_name, "grove_test");
    assert_eq!(config.adaptor.name, "bench");
    assert_eq!(config.adaptor.links[0].level, 1);
    assert_eq!(config.drivers.len(), 3);
    assert_eq!(config.drivers[2].interval_ms, 10);
}

#[test]
fn test_shipped_config_links_status_led_to_start_button() {
    use grove_common::hal::adaptor::DigitalWriter;
    use grove_common::hal::consts::EVENT_PUSH;

    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/grove.toml");
    let config = GroveCore::load_config(&path).unwrap();
    let link = config.adaptor.links[0].clone();
    let mut core = GroveCore::new(config).unwrap();
    core.init().unwrap();

    let names: Vec<&str> = core.drivers().iter().map(|d| d.name()).collect();
    let button = &core.drivers()[names.iter().position(|n| *n == "start_button").unwrap()];
    let led_pin = core.drivers()[names.iter().position(|n| *n == "status_led").unwrap()].pin();
    assert_eq!((link.output_pin.as_str(), link.input_pin.as_str()), (led_pin, button.pin()));

    let push = button.events().subscribe_to(EVENT_PUSH).unwrap();
    button.start().unwrap();
    core.adaptor().cloned().unwrap().digital_write(led_pin, 1).unwrap();
    assert!(push.recv_timeout(Duration::from_secs(1)).is_ok());
    core.shutdown().unwrap();
}

#[test]
fn test_load_config_missing_file() {
    let result = GroveCore::load_config(&PathBuf::from("/nonexistent/grove.toml"));
    assert!(matches!(result, Err(DriverError::Config(_))));
}

#[test]
fn test_load_config_rejects_unknown_field() {
    let file = write_config("bogus = 1\n[shared]\nservice_name = \"x\"\n");
    assert!(matches!(
        GroveCore::load_config(file.path()),
        Err(DriverError::Config(_))
    ));
}

#[test]
fn test_init_builds_drivers_in_order() {
    let file = write_config(CONFIG);
    let mut core = GroveCore::new(GroveCore::load_config(file.path()).unwrap()).unwrap();
    assert!(core.adaptor().is_none());
    core.init().unwrap();

    let names: Vec<&str> = core.drivers().iter().map(|d| d.name()).collect();
    assert_eq!(names, vec!["start", "GroveRotary", "GroveLed"]);
    for driver in core.drivers() {
        assert_eq!(driver.connection().connection_name(), "bench");
        assert_eq!(driver.state(), DriverState::Stopped);
    }
}

#[test]
fn test_run_collects_events() {
    let file = write_config(CONFIG);
    let mut core = GroveCore::new(GroveCore::load_config(file.path()).unwrap()).unwrap();
    core.init().unwrap();

    core.run(Some(Duration::from_millis(50))).unwrap();

    let (cycles, events, errors) = core.stats();
    assert!(cycles > 0);
    assert!(events > 0, "sweeping rotary must publish data");
    assert_eq!(errors, 0);
    assert!(core.drivers().iter().all(|d| d.state() == DriverState::Stopped));
}

#[test]
fn test_running_flag_stops_loop() {
    let file = write_config(CONFIG);
    let mut core = GroveCore::new(GroveCore::load_config(file.path()).unwrap()).unwrap();
    core.init().unwrap();

    let running = core.running_flag();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        running.store(false, Ordering::SeqCst);
    });

    core.run(None).unwrap();
    stopper.join().unwrap();
    core.shutdown().unwrap();

    assert!(core.drivers().iter().all(|d| d.state() == DriverState::Stopped));
}

#[test]
fn test_linked_output_triggers_button() {
    use grove_common::hal::adaptor::DigitalWriter;
    use grove_common::hal::consts::EVENT_PUSH;

    let file = write_config(CONFIG);
    let mut core = GroveCore::new(GroveCore::load_config(file.path()).unwrap()).unwrap();
    core.init().unwrap();

    let button = &core.drivers()[0];
    let push = button.events().subscribe_to(EVENT_PUSH).unwrap();
    button.start().unwrap();

    let adaptor = core.adaptor().cloned().unwrap();
    adaptor.digital_write("13", 1).unwrap();

    let got = push.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(got.as_value(), Some(1));
    core.shutdown().unwrap();
}
