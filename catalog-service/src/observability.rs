//! Structured logging
//!
//! A [`Logger`] owns its own `tracing` dispatcher built from explicit
//! settings, so components receive logging by injection instead of relying
//! on process-wide state. The binary may still install the same dispatcher
//! as the global default so framework events share the sink.

use std::fmt::Display;
use std::panic::Location;
use std::sync::Arc;

use serde_json::Value;
use tracing::Dispatch;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::handlers::ErrorCode;

/// Settings needed to build a [`Logger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Service name stamped on every record
    pub service: String,
    /// `EnvFilter` directive
    pub level: String,
}

impl LoggingSettings {
    /// Derive settings from the service configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            service: config.service.name.clone(),
            level: config.service.effective_log_level(),
        }
    }
}

/// JSON logger bound to one service
#[derive(Debug, Clone)]
pub struct Logger {
    service: Arc<str>,
    dispatch: Dispatch,
}

impl Logger {
    /// Build a logger writing flattened JSON records to `make_writer`
    ///
    /// An unparsable level falls back to `info`.
    pub fn new<W>(settings: &LoggingSettings, make_writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter =
            EnvFilter::try_new(&settings.level).unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .with_target(false)
            .with_env_filter(filter)
            .with_writer(make_writer)
            .finish();

        Self {
            service: Arc::from(settings.service.as_str()),
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Build a logger writing to stdout
    pub fn stdout(settings: &LoggingSettings) -> Self {
        Self::new(settings, std::io::stdout)
    }

    /// Install this logger's dispatcher as the process default
    pub fn install_global(&self) -> Result<()> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|e| Error::Logging(e.to_string()))
    }

    fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Emit one error record for a failed operation
    ///
    /// The record message is the code's log summary; `diagnostic` carries the
    /// underlying failure text and `caller` the location of the call.
    #[track_caller]
    pub fn error(
        &self,
        op: &str,
        code: ErrorCode,
        diagnostic: &dyn Display,
        details: Option<&Value>,
    ) {
        let location = Location::caller();
        let caller = format!("{}:{}", location.file(), location.line());

        self.in_scope(|| match details {
            Some(details) => tracing::error!(
                service = %self.service,
                op,
                code = code.code(),
                error = %diagnostic,
                caller = %caller,
                details = %details,
                "{}",
                code.log_summary()
            ),
            None => tracing::error!(
                service = %self.service,
                op,
                code = code.code(),
                error = %diagnostic,
                caller = %caller,
                "{}",
                code.log_summary()
            ),
        });
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory log capture for tests

    use super::*;
    use std::io;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Default)]
    pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        pub(crate) fn logger(&self, service: &str) -> Logger {
            let settings = LoggingSettings {
                service: service.to_string(),
                level: "debug".to_string(),
            };
            let sink = self.clone();
            Logger::new(&settings, move || sink.clone())
        }

        /// Parsed JSON records at error level
        pub(crate) fn errors(&self) -> Vec<Value> {
            self.records()
                .into_iter()
                .filter(|record| record["level"] == "ERROR")
                .collect()
        }

        pub(crate) fn records(&self) -> Vec<Value> {
            let raw = self.0.lock().unwrap().clone();
            String::from_utf8(raw)
                .unwrap()
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }
}
