//! Hardware abstraction layer contracts.
//!
//! This module contains the capability traits adaptors implement, the
//! driver trait family, error types and configuration for the Grove HAL.

pub mod adaptor;
pub mod config;
pub mod consts;
pub mod driver;
pub mod types;
