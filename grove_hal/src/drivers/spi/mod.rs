//! SPI device drivers.

pub mod mcp3002;

pub use mcp3002::{ControlBits, Mcp3002Driver, decode_response, encode_command};
