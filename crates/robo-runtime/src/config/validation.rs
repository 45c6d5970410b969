//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogOutput, LoggingConfig, RoboConfig, RobotConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &RoboConfig) -> ConfigResult<()> {
    validate_robot_config(&config.robot)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates the engine section.
fn validate_robot_config(robot: &RobotConfig) -> ConfigResult<()> {
    if robot.name.is_empty() {
        return Err(ConfigError::missing_field("robot.name"));
    }

    if robot.name.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation(
            "Robot name cannot contain whitespace",
        ));
    }

    if robot.queue_capacity == 0 {
        return Err(ConfigError::validation(
            "Queue capacity must be greater than 0",
        ));
    }

    if !robot.options.is_object() {
        return Err(ConfigError::validation("robot.options must be a table"));
    }

    Ok(())
}

/// Validates the logging section.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    for module in logging.filters.keys() {
        if module.is_empty() || module.contains(char::is_whitespace) {
            return Err(ConfigError::validation(format!(
                "Invalid logging filter target: '{module}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;

    #[test]
    fn test_validate_default_config() {
        let config = RoboConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_name() {
        let mut config = RoboConfig::default();
        config.robot.name = String::new();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_validate_name_with_space() {
        let mut config = RoboConfig::default();
        config.robot.name = "my bot".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_queue() {
        let mut config = RoboConfig::default();
        config.robot.queue_capacity = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_file_output_requires_path() {
        let mut config = RoboConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("robo.log".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_filter_target() {
        let mut config = RoboConfig::default();
        config
            .logging
            .filters
            .insert("robo framework".to_string(), LogLevel::Debug);
        assert!(validate_config(&config).is_err());
    }
}
