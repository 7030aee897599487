//! Configuration module for pingsweep.
//!
//! Provides YAML-based configuration loading and validation for:
//! - Sweep settings (workers, timeout, echo count)
//! - Server settings (port, bind address)
//! - Target source (file, policy when no targets are given)

mod app;
mod validation;

pub use app::{AppConfig, ServerConfig, TargetsConfig};
pub use validation::{ConfigError, parse_duration};
