//! # Grove HAL Library
//!
//! Grove sensor and actuator drivers on top of pluggable board adaptors.
//!
//! Drivers depend only on the adaptor capability traits defined in
//! `grove_common::hal::adaptor`, so the same driver runs on a real board or
//! on the [`simulation`] adaptor.
//!
//! # Module Structure
//!
//! - [`core`] - GroveCore struct, event loop management
//! - [`driver_registry`] - Driver factory registration
//! - [`drivers`] - GPIO and SPI driver implementations
//! - [`simulation`] - Software adaptor for development and testing
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          grove_hal                               │
//! │  ┌─────────────┐    ┌──────────────┐    ┌─────────────────────┐  │
//! │  │  EventBus   │◄───│  Drivers     │◄───│  Driver Registry    │  │
//! │  │ (per driver)│    │ (poll thread)│    │                     │  │
//! │  └──────┬──────┘    └──────┬───────┘    └─────────────────────┘  │
//! │         │                  │                                     │
//! │         ▼                  ▼                                     │
//! │  ┌─────────────┐    ┌────────────────┐                           │
//! │  │  GroveCore  │    │  Adaptor       │ (capability traits)       │
//! │  │ (event log) │    │  GPIO/PWM/SPI  │                           │
//! │  └─────────────┘    └────────────────┘                           │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod core;
pub mod driver_registry;
pub mod drivers;
pub mod simulation;

// Re-export key types for convenience
pub use crate::core::GroveCore;
pub use crate::driver_registry::{DriverFactory, DriverRegistry};
pub use crate::drivers::{BoardAdaptor, register_all_drivers};
pub use crate::simulation::SimulationAdaptor;
