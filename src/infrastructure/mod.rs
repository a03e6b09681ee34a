//! Infrastructure layer providing external service integrations.
//!
//! This module contains launch configuration, logging setup, and the
//! snapshot exporter: everything that touches the environment or the file
//! system.

pub mod config;
pub mod export;
pub mod logging;

pub use config::*;
pub use export::*;
pub use logging::{LoggingGuard, default_log_dir};
