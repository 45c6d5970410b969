//! Logging setup for Robo applications.
//!
//! One `tracing-subscriber` registry with an [`EnvFilter`] and a single fmt
//! layer. `RUST_LOG` wins over the configured base level; per-module filters
//! are added on top of either.
//!
//! Every inbound message is dispatched inside a `dispatch` span carrying the
//! robot name, room and adapter. [`SpanEvents::dispatch`] prints one line when
//! that span opens and one with its timings when it closes.
//!
//! ```rust,ignore
//! use robo_runtime::{config::load_config, logging};
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//!
//! // or by hand
//! logging::LoggingBuilder::new()
//!     .engine_level(LogLevel::Debug)
//!     .span_events(SpanEvents::dispatch())
//!     .init();
//! ```

use std::path::Path;

use tracing::warn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, SpanEventConfig};

/// Crates whose level [`LoggingBuilder::engine_level`] sets.
pub const ENGINE_TARGETS: &[&str] = &["robo_core", "robo_framework", "robo_runtime"];

const DEFAULT_LOG_FILE: &str = "robo.log";

/// Span lifecycle events written to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanEvents(FmtSpan);

impl SpanEvents {
    pub fn off() -> Self {
        Self(FmtSpan::NONE)
    }

    /// Open and close of each span, with busy/idle time on close.
    pub fn dispatch() -> Self {
        Self(FmtSpan::NEW | FmtSpan::CLOSE)
    }

    /// Every enter and exit. A dispatch span is entered on each poll, so a
    /// handler awaiting slow I/O produces many lines.
    pub fn polls() -> Self {
        Self(FmtSpan::ENTER | FmtSpan::EXIT)
    }

    pub fn all() -> Self {
        Self(FmtSpan::FULL)
    }
}

impl Default for SpanEvents {
    fn default() -> Self {
        Self::off()
    }
}

impl From<&SpanEventConfig> for SpanEvents {
    fn from(config: &SpanEventConfig) -> Self {
        let flags = [
            (config.new, FmtSpan::NEW),
            (config.enter, FmtSpan::ENTER),
            (config.exit, FmtSpan::EXIT),
            (config.close, FmtSpan::CLOSE),
        ];
        Self(
            flags
                .into_iter()
                .filter(|(on, _)| *on)
                .fold(FmtSpan::NONE, |acc, (_, flag)| acc | flag),
        )
    }
}

/// Installs the global subscriber described by `config`.
///
/// Does nothing if a subscriber is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    LoggingBuilder::from_config(config).init();
}

/// Builds the global subscriber.
#[derive(Debug, Default)]
pub struct LoggingBuilder {
    config: LoggingConfig,
    span_events: SpanEvents,
    directives: Vec<String>,
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            span_events: SpanEvents::from(&config.span_events),
            config: config.clone(),
            directives: Vec::new(),
        }
    }

    /// Base level for everything not matched by a more specific filter.
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Level for the Robo crates only, leaving the base level alone.
    pub fn engine_level(mut self, level: LogLevel) -> Self {
        for target in ENGINE_TARGETS {
            self.config.filters.insert((*target).to_string(), level);
        }
        self
    }

    /// Adds a raw `EnvFilter` directive such as `my_bot::handlers=trace`.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    pub fn span_events(mut self, events: SpanEvents) -> Self {
        self.span_events = events;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.config.output = output;
        self
    }

    /// Writes to `path`, rolling over per `rotation`.
    pub fn to_file(mut self, path: impl AsRef<Path>, rotation: LogRotation) -> Self {
        self.config.output = LogOutput::File;
        self.config.file_path = Some(path.as_ref().to_path_buf());
        self.config.rotation = rotation;
        self
    }

    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Installs the subscriber, failing if one is already set.
    ///
    /// Settings that had to be ignored are reported as warnings once the
    /// subscriber is up.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let mut notes = Vec::new();
        let filter = self.filter(&mut notes);
        let writer = self.writer(&mut notes);

        let layer = fmt::layer()
            .with_writer(writer)
            .with_span_events(self.span_events.0.clone())
            .with_thread_ids(self.config.thread_ids)
            .with_file(self.config.file_location)
            .with_line_number(self.config.file_location);

        let layer: Box<dyn Layer<Registry> + Send + Sync> = match self.config.format {
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Full => layer.boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
            #[cfg(feature = "json-log")]
            LogFormat::Json => layer.json().boxed(),
            #[cfg(not(feature = "json-log"))]
            LogFormat::Json => {
                notes.push("JSON log format needs the `json-log` feature, using full format".into());
                layer.boxed()
            }
        };

        tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .try_init()?;

        for note in notes {
            warn!("{note}");
        }
        Ok(())
    }

    /// `module=level` directives from the per-module filters, then the raw
    /// ones.
    fn directives(&self) -> Vec<String> {
        self.config
            .filters
            .iter()
            .map(|(module, level)| format!("{module}={level}"))
            .chain(self.directives.iter().cloned())
            .collect()
    }

    fn filter(&self, notes: &mut Vec<String>) -> EnvFilter {
        let base = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.config.level.as_str()));

        self.directives()
            .into_iter()
            .fold(base, |filter, directive| match directive.parse() {
                Ok(parsed) => filter.add_directive(parsed),
                Err(e) => {
                    notes.push(format!("Ignoring log directive '{directive}': {e}"));
                    filter
                }
            })
    }

    fn writer(&self, notes: &mut Vec<String>) -> BoxMakeWriter {
        match (self.config.output, &self.config.file_path) {
            (LogOutput::Stdout, _) => BoxMakeWriter::new(std::io::stdout),
            (LogOutput::Stderr, _) => BoxMakeWriter::new(std::io::stderr),
            (LogOutput::File, Some(path)) => {
                let dir = path.parent().unwrap_or_else(|| Path::new("."));
                let name = path
                    .file_name()
                    .map(|n| n.to_os_string())
                    .unwrap_or_else(|| DEFAULT_LOG_FILE.into());
                let appender = match self.config.rotation {
                    LogRotation::Never => tracing_appender::rolling::never(dir, name),
                    LogRotation::Hourly => tracing_appender::rolling::hourly(dir, name),
                    LogRotation::Daily => tracing_appender::rolling::daily(dir, name),
                };
                BoxMakeWriter::new(appender)
            }
            (LogOutput::File, None) => {
                notes.push("File logging has no file_path, writing to stdout".into());
                BoxMakeWriter::new(std::io::stdout)
            }
        }
    }
}
