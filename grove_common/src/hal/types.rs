//! Driver state and pin level types.

use std::fmt;

/// Lifecycle state of a driver.
///
/// `Stopped -> Running` on start, `Running -> Halting` once the halt signal
/// is sent, `Halting -> Stopped` once the polling loop has exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    /// No polling loop is active.
    #[default]
    Stopped,
    /// The driver is started (polling drivers have a live loop).
    Running,
    /// Halt was requested; waiting for the loop to exit.
    Halting,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DriverState::Stopped => "stopped",
            DriverState::Running => "running",
            DriverState::Halting => "halting",
        };
        f.write_str(s)
    }
}

/// Digital pin level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Logic low (0).
    Low,
    /// Logic high (1).
    High,
}

impl Level {
    /// Numeric value written to the adaptor.
    pub fn as_u8(self) -> u8 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }

    /// The opposite level.
    pub fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value { Level::High } else { Level::Low }
    }
}

impl From<Level> for bool {
    fn from(value: Level) -> Self {
        matches!(value, Level::High)
    }
}
