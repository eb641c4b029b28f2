//! Runtime adjustable file logging

use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};

use error_stack::Report;
use strum::{AsRefStr, Display, EnumString};
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

use crate::constants::TRACE_LOG_FILE_NAME;
use crate::error::{Error, Result};

static CURRENT_LEVEL: AtomicU8 = AtomicU8::new(TracingLevel::Warn.as_u8());

/// Dynamic tracing filter that can be updated at runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicFilter;

impl<S> Layer<S> for DynamicFilter
where
    S: Subscriber,
{
    fn enabled(
        &self,
        metadata: &tracing::Metadata<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) -> bool {
        TracingLevel::from(*metadata.level()).as_u8() <= CURRENT_LEVEL.load(Ordering::Relaxed)
    }
}

/// Tracing levels that can be set at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TracingLevel {
    /// Programmer errors and mapping gaps only
    Error,
    /// Adds identity fallbacks, ignored events and failed requests
    Warn,
    /// Adds level changes
    Info,
    /// Adds transitions, patches and responses
    Debug,
    /// Adds path walk details
    Trace,
}

impl TracingLevel {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Error => 0,
            Self::Warn => 1,
            Self::Info => 2,
            Self::Debug => 3,
            Self::Trace => 4,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Error,
            2 => Self::Info,
            3 => Self::Debug,
            4 => Self::Trace,
            _ => Self::Warn,
        }
    }
}

impl From<Level> for TracingLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Info,
            Level::DEBUG => Self::Debug,
            Level::TRACE => Self::Trace,
        }
    }
}

/// Install a global subscriber writing to [`get_trace_log_path`]
///
/// The returned guard flushes the background writer when dropped and must be
/// kept alive for as long as logging is wanted. Fails if a global subscriber
/// is already installed.
pub fn init_file_tracing(level: TracingLevel) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(std::env::temp_dir(), TRACE_LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    Registry::default()
        .with(DynamicFilter)
        .with(file_layer)
        .try_init()
        .map_err(|e| Report::new(Error::failed_to("install tracing subscriber", e)))?;

    CURRENT_LEVEL.store(level.as_u8(), Ordering::Relaxed);
    Ok(guard)
}

/// Set the current tracing level
pub fn set_tracing_level(level: TracingLevel) {
    CURRENT_LEVEL.store(level.as_u8(), Ordering::Relaxed);
    tracing::info!("Tracing level set to: {level}");
}

/// Get the current tracing level
pub fn get_current_tracing_level() -> TracingLevel {
    TracingLevel::from_u8(CURRENT_LEVEL.load(Ordering::Relaxed))
}

/// Path of the trace log file
pub fn get_trace_log_path() -> PathBuf {
    std::env::temp_dir().join(TRACE_LOG_FILE_NAME)
}
