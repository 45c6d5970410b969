//! Layered configuration loading.
//!
//! A [`ConfigLoader`] stacks figment providers, each layer overriding the
//! ones before it:
//!
//! | layer | source |
//! |-------|--------|
//! | 1 | [`RoboConfig::default()`] |
//! | 2 | profile file next to the main file, e.g. `robo.production.toml` |
//! | 3 | main file: `robo.toml` / `config.toml`, or `robo.yaml` / `robo.yml` |
//! | 4 | `ROBO_*` environment variables, `__` separating nested keys |
//! | 5 | overrides given to the loader with [`merge`](ConfigLoader::merge) or [`set`](ConfigLoader::set) |
//!
//! `ROBO_ROBOT__NAME=hal` sets `robot.name`, `ROBO_ADAPTERS__SHELL__PROMPT=">"`
//! sets `adapters.shell.prompt`. `ROBO_PROFILE` picks the profile and is not
//! itself a config key.
//!
//! TOML files need the `toml-config` feature (default), YAML files the
//! `yaml-config` feature. With both enabled each format contributes its own
//! main and profile file, TOML first.
//!
//! ```rust,ignore
//! let config = ConfigLoader::new()
//!     .with_current_dir()
//!     .profile("production")
//!     .set("robot.name", "hal")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::RoboConfig;
use super::validation::validate_config;

/// Prefix of environment variables read by the loader.
pub const ENV_PREFIX: &str = "ROBO_";

/// Variable naming the active profile.
pub const PROFILE_VAR: &str = "ROBO_PROFILE";

#[cfg(feature = "toml-config")]
const TOML_NAMES: &[&str] = &["robo.toml", "config.toml"];
#[cfg(feature = "yaml-config")]
const YAML_NAMES: &[&str] = &["robo.yaml", "robo.yml"];

/// Deployment profile; selects the `robo.<profile>.<ext>` overlay file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name, accepting `dev`/`prod` shorthands.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Profile named by `ROBO_PROFILE`, or development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_VAR)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a [`RoboConfig`] from defaults, files, environment and overrides.
pub struct ConfigLoader {
    profile: Profile,
    search_paths: Vec<PathBuf>,
    file: Option<PathBuf>,
    env: bool,
    overrides: Figment,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader with the profile from `ROBO_PROFILE` and environment
    /// variables enabled.
    pub fn new() -> Self {
        Self {
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            file: None,
            env: true,
            overrides: Figment::new(),
        }
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Profile::parse(&profile.into());
        self
    }

    /// Adds a directory to look for config files in.
    ///
    /// Without any, the current directory and the user config directory
    /// (`~/.config/robo` on Linux) are searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(dir) => self.search_path(dir.join("robo")),
            None => self,
        }
    }

    /// Loads exactly this file instead of searching. It must exist.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_env(mut self) -> Self {
        self.env = true;
        self
    }

    pub fn without_env(mut self) -> Self {
        self.env = false;
        self
    }

    /// Overlays a whole configuration on top of every other layer.
    ///
    /// Every value of `config` wins, including the ones left at their
    /// defaults. Use [`set`](Self::set) to override a single key.
    pub fn merge(mut self, config: RoboConfig) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(config));
        self
    }

    /// Overrides one dotted key, e.g. `set("robot.name", "hal")`.
    pub fn set<V: Serialize>(mut self, key: &str, value: V) -> Self {
        self.overrides = self.overrides.merge(Serialized::default(key, value));
        self
    }

    /// Loads, extracts and validates the configuration.
    pub fn load(self) -> ConfigResult<RoboConfig> {
        let files = self.config_files()?;
        if files.is_empty() {
            warn!("No configuration file found, using defaults");
        }

        let mut figment = Figment::from(Serialized::defaults(RoboConfig::default()));
        for path in &files {
            info!(path = %path.display(), "Loading configuration file");
            figment = merge_file(figment, path)?;
        }
        if self.env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["profile"]).split("__"));
        }
        figment = figment.merge(self.overrides);

        let config: RoboConfig = figment.extract()?;
        validate_config(&config)?;

        debug!(
            profile = %self.profile,
            robot = %config.robot.name,
            files = files.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Files to merge, lowest priority first.
    fn config_files(&self) -> ConfigResult<Vec<PathBuf>> {
        if let Some(file) = &self.file {
            if !file.exists() {
                return Err(ConfigError::FileNotFound(file.clone()));
            }
            return Ok(vec![file.clone()]);
        }

        let dirs = self.search_dirs();
        let mut files = Vec::new();
        for names in known_names() {
            let Some(main) = first_existing(&dirs, names) else {
                continue;
            };
            if let Some(overlay) = profile_overlay(&main, &self.profile)
                && overlay.exists()
            {
                files.push(overlay);
            }
            files.push(main);
        }
        Ok(files)
    }

    fn search_dirs(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|dir| dir.join("robo")))
            .collect()
    }
}

/// Candidate file names per enabled format.
fn known_names() -> Vec<&'static [&'static str]> {
    #[allow(unused_mut)]
    let mut names: Vec<&'static [&'static str]> = Vec::new();
    #[cfg(feature = "toml-config")]
    names.push(TOML_NAMES);
    #[cfg(feature = "yaml-config")]
    names.push(YAML_NAMES);
    names
}

/// First `dir/name` that exists, scanning directories in order.
fn first_existing(dirs: &[PathBuf], names: &[&str]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// `dir/robo.toml` becomes `dir/robo.<profile>.toml`.
fn profile_overlay(main: &Path, profile: &Profile) -> Option<PathBuf> {
    let stem = main.file_stem()?.to_str()?;
    let ext = main.extension()?.to_str()?;
    Some(main.with_file_name(format!("{stem}.{profile}.{ext}")))
}

fn merge_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        #[cfg(feature = "toml-config")]
        "toml" => Ok(figment.merge(Toml::file(path))),
        #[cfg(feature = "yaml-config")]
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        _ => Err(ConfigError::ParseError(format!(
            "Unsupported or disabled configuration file format: .{ext}"
        ))),
    }
}

/// Loads configuration from the default locations and environment.
pub fn load_config() -> ConfigResult<RoboConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from `path`, with environment overrides.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<RoboConfig> {
    ConfigLoader::new().file(path).load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::new()
            .search_path(dir.path())
            .without_env()
            .load()
            .unwrap();

        assert_eq!(config.logging.level.as_str(), "info");
        assert_eq!(config.robot.name, "robo");
        assert!(config.robot.require_address);
        assert_eq!(config.robot.queue_capacity, 64);
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::new()
            .file("/definitely/not/here/robo.toml")
            .without_env()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_file_and_profile() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("robo.toml"),
            r#"
[robot]
name = "test"

[robot.options]
foo = "bar"

[adapters.shell]
prompt = "> "
"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("robo.staging.toml"),
            "[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = ConfigLoader::new()
            .profile("staging")
            .search_path(dir.path())
            .without_env()
            .load()
            .unwrap();

        assert_eq!(config.robot.name, "test");
        assert_eq!(config.robot.options["foo"], "bar");
        assert_eq!(config.logging.level.as_str(), "debug");
        assert!(config.adapters.contains_key("shell"));
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_main_file_beats_profile_overlay() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("robo.toml"), "[robot]\nname = \"main\"\n").unwrap();
        std::fs::write(
            dir.path().join("robo.production.toml"),
            "[robot]\nname = \"prod\"\nqueue_capacity = 8\n",
        )
        .unwrap();

        let config = ConfigLoader::new()
            .profile("prod")
            .search_path(dir.path())
            .without_env()
            .load()
            .unwrap();

        assert_eq!(config.robot.name, "main");
        assert_eq!(config.robot.queue_capacity, 8);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_merge_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("robo.toml");
        std::fs::write(&path, "[robot]\nname = \"fromfile\"\n").unwrap();

        let mut merged = RoboConfig::default();
        merged.robot.name = "merged".to_string();

        let config = ConfigLoader::new()
            .file(&path)
            .without_env()
            .merge(merged)
            .load()
            .unwrap();

        assert_eq!(config.robot.name, "merged");
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_set_overrides_single_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("robo.toml");
        std::fs::write(&path, "[robot]\nname = \"fromfile\"\nqueue_capacity = 8\n").unwrap();

        let config = ConfigLoader::new()
            .file(&path)
            .without_env()
            .set("robot.name", "hal")
            .load()
            .unwrap();

        assert_eq!(config.robot.name, "hal");
        assert_eq!(config.robot.queue_capacity, 8);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_invalid_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("robo.toml");
        std::fs::write(&path, "[robot]\nqueue_capacity = 0\n").unwrap();

        let err = ConfigLoader::new().file(&path).without_env().load().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_profile_overlay_name() {
        let overlay = profile_overlay(Path::new("/etc/robo/robo.toml"), &Profile::Production);
        assert_eq!(overlay, Some(PathBuf::from("/etc/robo/robo.production.toml")));
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("prod"), Profile::Production);
        assert_eq!(Profile::parse("Dev"), Profile::Development);
        assert_eq!(Profile::parse("staging"), Profile::Custom("staging".to_string()));
    }
}
