//! Configuration module for the Robo runtime.
//!
//! This module provides figment-based configuration loading and validation
//! for the robot, logging, and adapter sections.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, RoboConfig, RobotConfig,
    SpanEventConfig,
};
pub use validation::validate_config;
