use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LogMode;
use crate::error::StartupError;

/// Install the global subscriber built by [`subscriber`].
pub fn init(mode: &LogMode) -> Result<(), StartupError> {
    subscriber(mode)?.try_init()?;
    Ok(())
}

/// Build the subscriber without installing it.
///
/// stdout carries the MCP transport, so human-readable output only ever goes
/// to stderr (filtered by `RUST_LOG`, default `info`). In [`LogMode::File`] a
/// second layer appends everything down to `DEBUG` to the log file, which
/// includes full request and response payloads.
pub fn subscriber(mode: &LogMode) -> Result<impl Subscriber + Send + Sync + 'static, StartupError> {
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_filter(stderr_filter);

    let file_layer = match mode {
        LogMode::Stderr => None,
        LogMode::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| StartupError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(LevelFilter::DEBUG),
            )
        }
    };

    Ok(tracing_subscriber::registry().with(stderr_layer).with(file_layer))
}
