//! Logging setup
//!
//! One global `tracing` subscriber per page. Lines carry no timestamps or ANSI
//! colors since the UI forwards them to the browser console.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter {directive:?}: {error}")]
    Filter { directive: String, error: String },

    #[error("Logging already initialized: {0}")]
    AlreadyInstalled(String),
}

fn filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(&config.level).map_err(|e| LoggingError::Filter {
        directive: config.level.clone(),
        error: e.to_string(),
    })
}

/// Install the global subscriber, writing every line through `make_writer`
pub fn init<W>(config: &LoggingConfig, make_writer: W) -> Result<(), LoggingError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(filter(config)?);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().without_time().with_ansi(false).with_writer(make_writer))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().without_time().with_ansi(false).with_target(true).with_writer(make_writer))
            .try_init(),
    };
    installed.map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))
}
