//! Leveled logging setup over `tracing`.
//!
//! [`LoggerConfig`] describes up to two sinks — console and file — each with
//! its own level filter and plain-text or JSON format. [`LoggerConfig::build`]
//! composes them into an explicit [`Logger`] value; nothing is installed
//! process-wide until the caller decides to [`Logger::init`] it, once, at
//! process start.
//!
//! Leveled emits, format strings and structured key-values are `tracing`'s
//! own macros (`debug!`, `info!`, `warn!`, `error!`); named sub-loggers are
//! spans and targets. This module only owns sink construction.
//!
//! # Example
//!
//! ```no_run
//! use wiremap_util::log::LoggerConfig;
//! use tracing::level_filters::LevelFilter;
//!
//! let config = LoggerConfig {
//!     file_enabled: true,
//!     file_level: LevelFilter::DEBUG,
//!     log_directory: "/var/log/wiremap".into(),
//!     filename: "wiremap.log".into(),
//!     ..LoggerConfig::default()
//! };
//!
//! config.build().unwrap().init().unwrap();
//! tracing::info!(key = "value", "logger is up");
//! ```

use crate::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing::Dispatch;
use tracing::dispatcher;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;

/// Configuration for the console and file log sinks.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub console_enabled: bool,
    pub console_level: LevelFilter,
    pub console_json: bool,

    pub file_enabled: bool,
    pub file_level: LevelFilter,
    pub file_json: bool,

    /// Directory the log file lives in; created on demand.
    pub log_directory: PathBuf,
    pub filename: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console_enabled: true,
            console_level: LevelFilter::INFO,
            console_json: false,

            file_enabled: false,
            file_level: LevelFilter::DEBUG,
            file_json: false,

            log_directory: PathBuf::from("."),
            filename: String::from("wiremap.log"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LogBuildError {
    #[error("cannot open log file: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("a global logger is already installed")]
    AlreadyInstalled,
}

/// An assembled logging pipeline, not yet installed anywhere.
#[derive(Debug)]
pub struct Logger {
    dispatch: Dispatch,
}

impl LoggerConfig {
    /// Assembles the configured sinks into a [`Logger`].
    ///
    /// # Errors
    ///
    /// Returns [`LogBuildError::Io`] if the file sink is enabled and the log
    /// file cannot be opened for append.
    pub fn build(&self) -> Result<Logger, LogBuildError> {
        let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

        if self.console_enabled {
            let layer = fmt::layer().with_writer(io::stdout);
            layers.push(if self.console_json {
                layer.json().with_filter(self.console_level).boxed()
            } else {
                layer.with_filter(self.console_level).boxed()
            });
        }

        if self.file_enabled {
            let file = fs::open_append(self.log_directory.join(&self.filename))?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            layers.push(if self.file_json {
                layer.json().with_filter(self.file_level).boxed()
            } else {
                layer.with_filter(self.file_level).boxed()
            });
        }

        let subscriber = Registry::default().with(layers);
        Ok(Logger { dispatch: Dispatch::new(subscriber) })
    }
}

impl Logger {
    /// Installs this logger as the process-wide default.
    ///
    /// Call once at process start. Fails if some logger was installed before.
    pub fn init(self) -> Result<(), LogBuildError> {
        dispatcher::set_global_default(self.dispatch).map_err(|_| LogBuildError::AlreadyInstalled)
    }

    /// The underlying dispatcher, for scoped use via
    /// `tracing::dispatcher::with_default` instead of a global install.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}
