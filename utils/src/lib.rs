//! Shared utilities for Remit.

pub mod logging;

pub use logging::{init_logging, LogFormat};
