//! Grove Common Library
//!
//! This crate provides the contracts shared by every Grove HAL crate:
//! adaptor capabilities, the driver trait family, the per-driver event bus
//! and TOML configuration loading.
//!
//! # Module Structure
//!
//! - [`hal`] - Adaptor capabilities, driver traits, errors and configuration
//! - [`event`] - Instance-scoped publish/subscribe event bus
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use grove_common::prelude::*;
//! use grove_common::config::{ConfigLoader, SharedConfig};
//! ```

pub mod config;
pub mod event;
pub mod hal;
pub mod prelude;
