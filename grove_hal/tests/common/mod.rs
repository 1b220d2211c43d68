//! Shared test adaptors.
//!
//! `TestAdaptor` counts every call and lets a test swap the read behaviour
//! while drivers are running. `TestSpiAdaptor` records SPI frames and
//! returns a fixed response.

#![allow(dead_code)]

use grove_common::hal::adaptor::{
    AnalogReader, Connection, DigitalReader, DigitalWriter, PwmWriter, SpiBus,
};
use grove_common::hal::driver::AdaptorError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

type ReadFn = Box<dyn Fn() -> Result<i32, AdaptorError> + Send + Sync>;

/// Adaptor with call counters and swappable read functions.
pub struct TestAdaptor {
    name: String,
    connected: AtomicBool,
    digital_read_fn: Mutex<ReadFn>,
    analog_read_fn: Mutex<ReadFn>,
    pub digital_reads: AtomicUsize,
    pub analog_reads: AtomicUsize,
    pub digital_writes: AtomicUsize,
    pub pwm_writes: AtomicUsize,
}

impl TestAdaptor {
    pub fn new() -> Self {
        Self {
            name: "test".to_string(),
            connected: AtomicBool::new(true),
            digital_read_fn: Mutex::new(Box::new(|| Ok(1))),
            analog_read_fn: Mutex::new(Box::new(|| Ok(99))),
            digital_reads: AtomicUsize::new(0),
            analog_reads: AtomicUsize::new(0),
            digital_writes: AtomicUsize::new(0),
            pwm_writes: AtomicUsize::new(0),
        }
    }

    pub fn set_digital_read_fn<F>(&self, f: F)
    where
        F: Fn() -> Result<i32, AdaptorError> + Send + Sync + 'static,
    {
        *self.digital_read_fn.lock() = Box::new(f);
    }

    pub fn set_analog_read_fn<F>(&self, f: F)
    where
        F: Fn() -> Result<i32, AdaptorError> + Send + Sync + 'static,
    {
        *self.analog_read_fn.lock() = Box::new(f);
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.digital_reads.load(Ordering::SeqCst) + self.analog_reads.load(Ordering::SeqCst)
    }
}

impl Connection for TestAdaptor {
    fn connection_name(&self) -> &str {
        &self.name
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl DigitalReader for TestAdaptor {
    fn digital_read(&self, _pin: &str) -> Result<i32, AdaptorError> {
        self.digital_reads.fetch_add(1, Ordering::SeqCst);
        (self.digital_read_fn.lock())()
    }
}

impl AnalogReader for TestAdaptor {
    fn analog_read(&self, _pin: &str) -> Result<i32, AdaptorError> {
        self.analog_reads.fetch_add(1, Ordering::SeqCst);
        (self.analog_read_fn.lock())()
    }
}

impl DigitalWriter for TestAdaptor {
    fn digital_write(&self, _pin: &str, _level: u8) -> Result<(), AdaptorError> {
        self.digital_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl PwmWriter for TestAdaptor {
    fn pwm_write(&self, _pin: &str, _duty: u8) -> Result<(), AdaptorError> {
        self.pwm_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// SPI adaptor recording the frames it is sent.
pub struct TestSpiAdaptor {
    written: Mutex<Vec<u8>>,
    response: Mutex<Vec<u8>>,
    read_error: AtomicBool,
}

impl TestSpiAdaptor {
    pub fn new() -> Self {
        Self {
            written: Mutex::new(Vec::new()),
            response: Mutex::new(vec![0x00, 0x00]),
            read_error: AtomicBool::new(false),
        }
    }

    pub fn set_response(&self, response: &[u8]) {
        *self.response.lock() = response.to_vec();
    }

    pub fn set_read_error(&self, fail: bool) {
        self.read_error.store(fail, Ordering::SeqCst);
    }

    /// Bytes of the most recent transfer.
    pub fn written(&self) -> Vec<u8> {
        self.written.lock().clone()
    }
}

impl Connection for TestSpiAdaptor {
    fn connection_name(&self) -> &str {
        "spi"
    }
}

impl SpiBus for TestSpiAdaptor {
    fn transfer(&self, tx: &[u8], rx: &mut [u8]) -> Result<(), AdaptorError> {
        *self.written.lock() = tx.to_vec();
        if self.read_error.load(Ordering::SeqCst) {
            return Err(AdaptorError::Io("read error".to_string()));
        }
        let response = self.response.lock();
        let n = rx.len().min(response.len());
        rx[..n].copy_from_slice(&response[..n]);
        Ok(())
    }
}
