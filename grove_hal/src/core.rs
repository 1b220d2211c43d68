//! Grove core struct and event loop management.
//!
//! The `GroveCore` struct is the main entry point of the HAL service. It
//! builds the adaptor and drivers from `grove.toml`, starts them, and logs
//! every event they publish until shutdown is requested.

use grove_common::config::ConfigLoader;
use grove_common::event::{Event, EventData};
use grove_common::hal::config::GroveConfig;
use grove_common::hal::consts::{
    DEFAULT_POLL_INTERVAL, EVENT_DATA, EVENT_ERROR, EVENT_VALUE, HAL_SERVICE_NAME,
};
use grove_common::hal::driver::{DriverError, GpioDriver};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::driver_registry::DriverRegistry;
use crate::drivers::register_all_drivers;
use crate::simulation::SimulationAdaptor;

/// Grove core manages the adaptor, the drivers and the event loop.
pub struct GroveCore {
    /// Validated configuration
    config: GroveConfig,
    /// Adaptor shared by all drivers
    adaptor: Option<Arc<SimulationAdaptor>>,
    /// Driver instances, in config order
    drivers: Vec<Box<dyn GpioDriver>>,
    /// Running flag for event loop control
    running: Arc<AtomicBool>,
    /// Event statistics
    stats: EventStats,
}

/// Event loop statistics.
#[derive(Debug, Default)]
struct EventStats {
    /// Number of loop cycles executed
    cycle_count: u64,
    /// Number of events received
    event_count: u64,
    /// Number of `error` events received
    error_count: u64,
}

impl GroveCore {
    /// Create a new GroveCore instance with the given configuration.
    ///
    /// # Errors
    /// Returns `DriverError::Config` if configuration validation fails.
    pub fn new(config: GroveConfig) -> Result<Self, DriverError> {
        config
            .validate()
            .map_err(|e| DriverError::Config(e.to_string()))?;

        info!(
            "GroveCore created for '{}' with {} drivers",
            config.shared.service_name,
            config.drivers.len()
        );

        Ok(Self {
            config,
            adaptor: None,
            drivers: Vec::new(),
            running: Arc::new(AtomicBool::new(false)),
            stats: EventStats::default(),
        })
    }

    /// Load the configuration from a TOML file.
    ///
    /// # Errors
    /// Returns `DriverError::Config` if the file cannot be read or parsed.
    pub fn load_config(config_path: &Path) -> Result<GroveConfig, DriverError> {
        info!("Loading configuration from {:?}", config_path);
        let config =
            GroveConfig::load(config_path).map_err(|e| DriverError::Config(e.to_string()))?;
        info!(
            "Loaded config: adaptor={}, {} drivers",
            config.adaptor.name,
            config.drivers.len()
        );
        Ok(config)
    }

    /// Build the adaptor and every configured driver.
    ///
    /// # Errors
    /// - `DriverError::InitFailed` if called twice
    /// - `DriverError::DriverNotFound` for an unknown driver kind
    pub fn init(&mut self) -> Result<(), DriverError> {
        if self.adaptor.is_some() {
            return Err(DriverError::InitFailed("already initialized".to_string()));
        }
        info!("Initializing GroveCore...");

        let adaptor = Arc::new(SimulationAdaptor::from_config(&self.config.adaptor));

        let mut registry = DriverRegistry::new();
        register_all_drivers(&mut registry);

        let mut drivers = Vec::with_capacity(self.config.drivers.len());
        for cfg in &self.config.drivers {
            let driver = registry.create_driver(Arc::clone(&adaptor), cfg)?;
            info!("  Created {} ({}) on pin {}", driver.name(), cfg.kind, driver.pin());
            drivers.push(driver);
        }

        self.adaptor = Some(adaptor);
        self.drivers = drivers;
        info!("GroveCore initialized successfully");
        Ok(())
    }

    /// Start every driver and log their events.
    ///
    /// Blocks until the running flag is cleared (signal handler or
    /// [`Self::shutdown`]) or `duration` elapses, then halts the drivers.
    ///
    /// # Errors
    /// - `DriverError::InitFailed` if [`Self::init`] has not run
    /// - The first driver start error; drivers already started are halted
    pub fn run(&mut self, duration: Option<Duration>) -> Result<(), DriverError> {
        if self.adaptor.is_none() {
            return Err(DriverError::InitFailed("drivers not initialized".to_string()));
        }

        let subscriptions: Vec<(String, Receiver<Event>)> = self
            .drivers
            .iter()
            .map(|d| (d.name().to_string(), d.events().subscribe()))
            .collect();

        self.running.store(true, Ordering::SeqCst);
        if let Err(e) = self.start_drivers() {
            self.running.store(false, Ordering::SeqCst);
            return Err(e);
        }

        info!(
            "Starting GroveCore event loop ({} drivers, duration={:?})...",
            self.drivers.len(),
            duration
        );
        let deadline = duration.map(|d| Instant::now() + d);

        while self.running.load(Ordering::SeqCst) {
            if deadline.is_some_and(|at| Instant::now() >= at) {
                info!("Run duration elapsed");
                break;
            }

            for (driver, rx) in &subscriptions {
                for event in rx.try_iter() {
                    self.stats.event_count += 1;
                    if event.name == EVENT_ERROR {
                        self.stats.error_count += 1;
                    }
                    log_event(driver, &event);
                }
            }
            self.stats.cycle_count += 1;

            std::thread::sleep(DEFAULT_POLL_INTERVAL);
        }

        self.halt_drivers();
        self.running.store(false, Ordering::SeqCst);
        info!(
            "GroveCore event loop stopped after {} cycles ({} events, {} errors)",
            self.stats.cycle_count, self.stats.event_count, self.stats.error_count
        );
        Ok(())
    }

    /// Request shutdown and halt every driver.
    pub fn shutdown(&mut self) -> Result<(), DriverError> {
        info!("Shutdown requested for {}", HAL_SERVICE_NAME);
        self.running.store(false, Ordering::SeqCst);
        self.halt_drivers();
        Ok(())
    }

    /// Get the running flag for signal handlers.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Drivers created by [`Self::init`], in config order.
    pub fn drivers(&self) -> &[Box<dyn GpioDriver>] {
        &self.drivers
    }

    /// The adaptor, once initialized.
    pub fn adaptor(&self) -> Option<&Arc<SimulationAdaptor>> {
        self.adaptor.as_ref()
    }

    /// Get event statistics: (cycles, events, errors).
    pub fn stats(&self) -> (u64, u64, u64) {
        (
            self.stats.cycle_count,
            self.stats.event_count,
            self.stats.error_count,
        )
    }

    fn start_drivers(&self) -> Result<(), DriverError> {
        for (idx, driver) in self.drivers.iter().enumerate() {
            if let Err(e) = driver.start() {
                error!("Failed to start {}: {}", driver.name(), e);
                for started in &self.drivers[..idx] {
                    if let Err(e) = started.halt() {
                        warn!("Failed to halt {}: {}", started.name(), e);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn halt_drivers(&self) {
        for driver in &self.drivers {
            if let Err(e) = driver.halt() {
                warn!("Failed to halt {}: {}", driver.name(), e);
            }
        }
    }
}

fn log_event(driver: &str, event: &Event) {
    match (event.name.as_str(), &event.data) {
        (EVENT_ERROR, EventData::Error(e)) => warn!(driver, "read error: {}", e),
        (EVENT_DATA | EVENT_VALUE, data) => debug!(driver, event = %event.name, "{:?}", data),
        (name, data) => info!(driver, event = name, "{:?}", data),
    }
}
