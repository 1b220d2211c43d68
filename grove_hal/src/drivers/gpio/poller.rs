//! Background polling shared by every input driver.
//!
//! A `Poller` owns the driver's event bus, its lifecycle state and at most
//! one sampling thread. The thread calls the driver's sampler, then waits up
//! to one interval on a cancellation channel. `halt()` sends the signal and
//! joins the thread, so once it returns the sampler (and therefore the
//! adaptor) is never invoked again.

use grove_common::event::EventBus;
use grove_common::hal::adaptor::Connection;
use grove_common::hal::driver::DriverError;
use grove_common::hal::types::DriverState;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Live sampling thread and its cancellation channel.
struct Worker {
    halt_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Polling loop helper composed into input drivers.
pub struct Poller {
    /// Time between samples
    interval: Duration,
    /// Event bus shared with the sampling thread
    events: Arc<EventBus>,
    /// Lifecycle state, readable while a halt is joining
    state: Mutex<DriverState>,
    /// Held for the whole of start/halt so the two never interleave
    worker: Mutex<Option<Worker>>,
}

impl Poller {
    /// Create a stopped poller with a fresh event bus.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            events: Arc::new(EventBus::new()),
            state: Mutex::new(DriverState::Stopped),
            worker: Mutex::new(None),
        }
    }

    /// Poll interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The driver's event bus.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        *self.state.lock()
    }

    /// Spawn the sampling thread.
    ///
    /// `make_sampler` is only invoked when a new loop is actually spawned, so
    /// per-run state (last value, active flag) is reset exactly once per
    /// `Stopped -> Running` transition. Starting a running poller is a no-op.
    ///
    /// # Errors
    /// - `DriverError::NotConnected` if the adaptor reports it is unusable
    /// - `DriverError::Spawn` if the thread cannot be created
    pub fn start<M, F>(
        &self,
        label: &str,
        connection: &dyn Connection,
        make_sampler: M,
    ) -> Result<(), DriverError>
    where
        M: FnOnce() -> F,
        F: FnMut(&EventBus) + Send + 'static,
    {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            debug!("{}: start ignored, already running", label);
            return Ok(());
        }

        if !connection.is_connected() {
            return Err(DriverError::NotConnected(
                connection.connection_name().to_string(),
            ));
        }

        let (halt_tx, halt_rx) = mpsc::channel();
        let events = Arc::clone(&self.events);
        let interval = self.interval;
        let sampler = make_sampler();

        let handle = thread::Builder::new()
            .name(format!("grove-poll-{label}"))
            .spawn(move || poll_loop(interval, &halt_rx, &events, sampler))
            .map_err(|e| DriverError::Spawn(e.to_string()))?;

        *worker = Some(Worker { halt_tx, handle });
        *self.state.lock() = DriverState::Running;

        info!(
            "{}: polling {} every {:?}",
            label,
            connection.connection_name(),
            interval
        );
        Ok(())
    }

    /// Stop the sampling thread and wait for it to exit.
    ///
    /// Halting a stopped poller is a no-op.
    pub fn halt(&self, label: &str) -> Result<(), DriverError> {
        let mut worker = self.worker.lock();
        let Some(Worker { halt_tx, handle }) = worker.take() else {
            debug!("{}: halt ignored, not running", label);
            return Ok(());
        };

        *self.state.lock() = DriverState::Halting;

        // A send error means the loop already exited; join either way.
        let _ = halt_tx.send(());
        if handle.join().is_err() {
            warn!("{}: polling thread panicked", label);
        }

        *self.state.lock() = DriverState::Stopped;
        info!("{}: halted", label);
        Ok(())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        let _ = self.halt("poller");
    }
}

/// Sample, then wait one interval for the halt signal. A dropped sender
/// counts as a halt.
fn poll_loop<F>(interval: Duration, halt_rx: &Receiver<()>, events: &EventBus, mut sample: F)
where
    F: FnMut(&EventBus),
{
    loop {
        match halt_rx.try_recv() {
            Err(TryRecvError::Empty) => {}
            Ok(()) | Err(TryRecvError::Disconnected) => break,
        }

        sample(events);

        match halt_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_common::event::EventData;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct TestConnection {
        connected: AtomicBool,
    }

    impl TestConnection {
        fn new(connected: bool) -> Self {
            Self {
                connected: AtomicBool::new(connected),
            }
        }
    }

    impl Connection for TestConnection {
        fn connection_name(&self) -> &str {
            "test"
        }

        fn is_connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }
    }

    fn counting_sampler(count: &Arc<AtomicUsize>) -> impl FnOnce() -> Box<dyn FnMut(&EventBus) + Send> {
        let count = Arc::clone(count);
        move || -> Box<dyn FnMut(&EventBus) + Send> {
            Box::new(move |events: &EventBus| {
                let n = count.fetch_add(1, Ordering::SeqCst);
                events.publish("data", EventData::Value(n as i32));
            })
        }
    }

    #[test]
    fn test_start_samples_until_halt() {
        let poller = Poller::new(Duration::from_millis(1));
        let conn = TestConnection::new(true);
        let count = Arc::new(AtomicUsize::new(0));

        poller.start("t", &conn, counting_sampler(&count)).unwrap();
        assert_eq!(poller.state(), DriverState::Running);
        thread::sleep(Duration::from_millis(20));
        poller.halt("t").unwrap();
        assert_eq!(poller.state(), DriverState::Stopped);

        let after_halt = count.load(Ordering::SeqCst);
        assert!(after_halt > 1, "sampler should run repeatedly, ran {after_halt}");
        thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), after_halt);
    }

    #[test]
    fn test_double_start_spawns_one_loop() {
        let poller = Poller::new(Duration::from_millis(5));
        let conn = TestConnection::new(true);
        let count = Arc::new(AtomicUsize::new(0));
        let second_factory_called = Arc::new(AtomicBool::new(false));

        poller.start("t", &conn, counting_sampler(&count)).unwrap();
        let flag = Arc::clone(&second_factory_called);
        poller
            .start("t", &conn, move || {
                flag.store(true, Ordering::SeqCst);
                |_: &EventBus| {}
            })
            .unwrap();

        assert!(!second_factory_called.load(Ordering::SeqCst));
        poller.halt("t").unwrap();
    }

    #[test]
    fn test_halt_when_stopped_is_noop() {
        let poller = Poller::new(Duration::from_millis(5));
        assert!(poller.halt("t").is_ok());
        assert!(poller.halt("t").is_ok());
        assert_eq!(poller.state(), DriverState::Stopped);
    }

    #[test]
    fn test_start_refused_when_disconnected() {
        let poller = Poller::new(Duration::from_millis(5));
        let conn = TestConnection::new(false);
        let count = Arc::new(AtomicUsize::new(0));

        let result = poller.start("t", &conn, counting_sampler(&count));
        assert!(matches!(result, Err(DriverError::NotConnected(name)) if name == "test"));
        assert_eq!(poller.state(), DriverState::Stopped);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_halt_returns_well_within_long_interval() {
        let poller = Poller::new(Duration::from_secs(10));
        let conn = TestConnection::new(true);
        let count = Arc::new(AtomicUsize::new(0));

        poller.start("t", &conn, counting_sampler(&count)).unwrap();
        thread::sleep(Duration::from_millis(5));
        let started = std::time::Instant::now();
        poller.halt("t").unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
