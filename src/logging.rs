//! File logging for BlogView
//!
//! The terminal belongs to the UI while it runs, so everything goes to
//! `blogview.log` in the data directory instead of stderr.
//!
//! Calls made before [`init`] are dropped, which keeps library code and
//! tests free to log without setting anything up.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Global logger instance
static LOGGER: OnceLock<Mutex<BlogViewLogger>> = OnceLock::new();

/// Environment variable selecting the minimum level
pub const LEVEL_ENV: &str = "BLOGVIEW_LOG";

/// Name of the log file inside the data directory
pub const LOG_FILE_NAME: &str = "blogview.log";

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse a level name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.pad(name)
    }
}

/// Main logger struct
pub struct BlogViewLogger {
    file: Option<File>,
    path: PathBuf,
    min_level: LogLevel,
}

impl BlogViewLogger {
    fn new(dir: &Path, min_level: LogLevel) -> Self {
        let path = dir.join(LOG_FILE_NAME);
        let file = std::fs::create_dir_all(dir)
            .and_then(|_| {
                OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true) // Start fresh each run
                    .open(&path)
            })
            .ok();

        Self {
            file,
            path,
            min_level,
        }
    }

    fn log(&mut self, level: LogLevel, module: &str, message: &str) {
        if level < self.min_level {
            return;
        }

        let entry = format_entry(
            &chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            level,
            module,
            message,
        );

        if let Some(ref mut file) = self.file {
            let _ = file.write_all(entry.as_bytes());
            let _ = file.flush();
        }
    }
}

fn format_entry(timestamp: &str, level: LogLevel, module: &str, message: &str) -> String {
    format!("[{}] [{:5}] [{}] {}\n", timestamp, level, module, message)
}

/// Initialize the global logger, writing into `dir`.
///
/// The minimum level comes from `BLOGVIEW_LOG` and defaults to INFO.
/// Returns the path of the log file. Only the first call has any effect.
pub fn init(dir: &Path) -> PathBuf {
    let min_level = std::env::var(LEVEL_ENV)
        .ok()
        .and_then(|v| LogLevel::parse(&v))
        .unwrap_or(LogLevel::Info);
    let logger = LOGGER.get_or_init(|| Mutex::new(BlogViewLogger::new(dir, min_level)));
    logger.lock().path.clone()
}

/// Log a message
fn log(level: LogLevel, module: &str, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.lock().log(level, module, message);
    }
}

/// Log debug message
pub fn debug(module: &str, message: &str) {
    log(LogLevel::Debug, module, message);
}

/// Log info message
pub fn info(module: &str, message: &str) {
    log(LogLevel::Info, module, message);
}

/// Log warning message
pub fn warn(module: &str, message: &str) {
    log(LogLevel::Warn, module, message);
}

/// Log error message
pub fn error(module: &str, message: &str) {
    log(LogLevel::Error, module, message);
}

/// Flush the log file
pub fn flush() {
    if let Some(logger) = LOGGER.get() {
        if let Some(ref mut file) = logger.lock().file {
            let _ = file.flush();
        }
    }
}

/// Write a separator line for readability
pub fn separator(label: &str) {
    let msg = format!("========== {} ==========", label);
    info("---", &msg);
}
