//! Logger bootstrap for host applications.
//!
//! The core only emits metadata through the `log` facade: event names, ids,
//! counts and statuses. Patient field values never reach a log line.
//!
//! `init_logging` installs a `flexi_logger` backend once per process. Calling
//! it again with the same configuration is a no-op; a different configuration
//! is rejected.

use std::path::{Path, PathBuf};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "vet-patients";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

/// Logging errors.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    UnsupportedLevel(String),

    #[error("Log directory must be an absolute path, got `{0}`")]
    RelativeDir(String),

    #[error("Failed to create log directory `{path}`: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Logger backend error: {0}")]
    Backend(#[from] flexi_logger::FlexiLoggerError),

    #[error("Logging already initialized with {active}; refusing to switch to {requested}")]
    Conflict { active: String, requested: String },
}

/// Logger configuration supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// One of trace, debug, info, warn, error
    pub level: String,
    /// Directory for rotating log files; `None` logs to stderr
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

struct LoggingState {
    level: &'static str,
    log_dir: Option<PathBuf>,
    _handle: LoggerHandle,
}

impl LoggingState {
    fn describe(level: &str, log_dir: Option<&Path>) -> String {
        match log_dir {
            Some(dir) => format!("level={} dir={}", level, dir.display()),
            None => format!("level={} dir=stderr", level),
        }
    }
}

/// Install the process-wide logger.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let level = normalize_level(&config.level)?;
    if let Some(dir) = &config.log_dir {
        if !dir.is_absolute() {
            return Err(LoggingError::RelativeDir(dir.display().to_string()));
        }
    }

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, config.log_dir.clone()))?;

    if state.level != level || state.log_dir != config.log_dir {
        return Err(LoggingError::Conflict {
            active: LoggingState::describe(state.level, state.log_dir.as_deref()),
            requested: LoggingState::describe(level, config.log_dir.as_deref()),
        });
    }
    Ok(())
}

/// Active `(level, log_dir)` if logging has been initialized.
pub fn logging_status() -> Option<(&'static str, Option<PathBuf>)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: &'static str, log_dir: Option<PathBuf>) -> Result<LoggingState, LoggingError> {
    let logger = Logger::try_with_str(level)?;

    let handle = match &log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
                path: dir.display().to_string(),
                source,
            })?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
                .start()?
        }
        None => logger
            .log_to_stderr()
            .format(flexi_logger::detailed_format)
            .start()?,
    };

    info!(
        "event=logging_init module=core status=ok {} version={}",
        LoggingState::describe(level, log_dir.as_deref()),
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        level,
        log_dir,
        _handle: handle,
    })
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}
