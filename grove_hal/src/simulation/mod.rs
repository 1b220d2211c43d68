//! Simulation adaptor.
//!
//! Provides a software board for development and testing without physical
//! hardware. Drivers built on it behave exactly as on a real board.

mod adaptor;
mod io;

pub use adaptor::SimulationAdaptor;
pub use io::PinSimulator;
