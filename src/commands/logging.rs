//! Persistent logging for backend and frontend.
//!
//! `log` records go through `env_logger`, whose formatter also mirrors each
//! line into a daily file under the app log directory. The frontend writes
//! into the same file through `write_log`/`write_logs`. A new file starts at
//! each date change and whenever the current one passes `MAX_LOG_SIZE`; only
//! the newest `MAX_LOG_FILES` are kept.

use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tauri::{command, AppHandle, Manager, Runtime};

/// Maximum log file size before rotation (5MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of log files to keep
const MAX_LOG_FILES: usize = 5;

/// Log file name prefix
const LOG_PREFIX: &str = "mic-overlay";

lazy_static! {
    static ref LOG_SINK: Mutex<Option<LogSink>> = Mutex::new(None);
}

/// Install `env_logger` as the `log` backend.
///
/// Honors `RUST_LOG`, defaulting to `info`. Safe to call more than once.
pub fn init_console_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let line = format!(
                "[{}] [{}] [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            );
            append_line(&line);
            writeln!(buf, "{}", line)
        })
        .try_init();
}

/// Open today's log file in the app log directory.
pub fn init_logging<R: Runtime>(app: &AppHandle<R>) -> Result<(), String> {
    let log_dir = app
        .path()
        .app_log_dir()
        .map_err(|e| format!("Failed to get log directory: {}", e))?;

    fs::create_dir_all(&log_dir).map_err(|e| format!("Failed to create log directory: {}", e))?;

    let sink = LogSink::open(log_dir.clone(), Local::now().date_naive())
        .map_err(|e| format!("Failed to open log file: {}", e))?;
    *LOG_SINK.lock() = Some(sink);

    log::info!("[logging] Log directory: {:?}", log_dir);
    cleanup_old_logs(&log_dir, MAX_LOG_FILES);

    Ok(())
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Path of the log file for `date` (one per day)
fn log_path_for(log_dir: &Path, date: NaiveDate) -> PathBuf {
    log_dir.join(format!("{}_{}.log", LOG_PREFIX, date.format("%Y-%m-%d")))
}

/// Keep only the newest `keep` `.log` files.
fn cleanup_old_logs(log_dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "log"))
        .collect();

    // Newest first
    log_files.sort_by(|a, b| {
        let a_time = a.metadata().and_then(|m| m.modified()).ok();
        let b_time = b.metadata().and_then(|m| m.modified()).ok();
        b_time.cmp(&a_time)
    });

    for file in log_files.into_iter().skip(keep) {
        let _ = fs::remove_file(file.path());
    }
}

/// The open log file and where it lives.
///
/// Must not emit `log` records itself: it runs inside the logger's formatter.
struct LogSink {
    dir: PathBuf,
    path: PathBuf,
    file: File,
}

impl LogSink {
    fn open(dir: PathBuf, date: NaiveDate) -> std::io::Result<Self> {
        let path = log_path_for(&dir, date);
        let file = open_log_file(&path)?;
        Ok(Self { dir, path, file })
    }

    fn write_line(&mut self, line: &str) {
        let _ = writeln!(self.file, "{}", line);
        let _ = self.file.flush();
    }

    /// Move to a fresh file when the date changed or the current one grew
    /// past `max_size`. Returns whether the file was switched.
    fn roll(&mut self, today: NaiveDate, max_size: u64) -> bool {
        let today_path = log_path_for(&self.dir, today);

        if today_path != self.path {
            let Ok(file) = open_log_file(&today_path) else {
                return false;
            };
            self.path = today_path;
            self.file = file;
        } else {
            let size = self.file.metadata().map(|m| m.len()).unwrap_or(0);
            if size <= max_size {
                return false;
            }

            let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");
            let rotated_path = self.dir.join(format!("{}_{}.log", LOG_PREFIX, timestamp));
            let _ = fs::rename(&self.path, &rotated_path);

            let Ok(file) = open_log_file(&self.path) else {
                return false;
            };
            self.file = file;
        }

        cleanup_old_logs(&self.dir, MAX_LOG_FILES);
        true
    }
}

/// Append one formatted line to the log file, if one is open.
fn append_line(line: &str) {
    let mut sink = LOG_SINK.lock();
    if let Some(sink) = sink.as_mut() {
        sink.write_line(line);
        sink.roll(Local::now().date_naive(), MAX_LOG_SIZE);
    }
}

/// Map a frontend level name onto a `log` level. Unknown names log as info.
pub fn parse_level(level: &str) -> log::Level {
    match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "warn" | "warning" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    }
}

// ============================================================================
// Tauri Commands
// ============================================================================

/// Write a log message from the frontend
#[command]
pub fn write_log(level: String, source: String, message: String) {
    log::log!(target: "frontend", parse_level(&level), "[{}] {}", source, message);
}

/// Write multiple log messages from the frontend (batch)
#[command]
pub fn write_logs(logs: Vec<(String, String, String)>) {
    for (level, source, message) in logs {
        write_log(level, source, message);
    }
}

/// Get the log directory path
#[command]
pub fn get_log_dir(app: AppHandle) -> Result<String, String> {
    let log_dir = app
        .path()
        .app_log_dir()
        .map_err(|e| format!("Failed to get log directory: {}", e))?;

    Ok(log_dir.to_string_lossy().to_string())
}

/// Get recent logs (last N lines, default 100)
#[command]
pub fn get_recent_logs(app: AppHandle, lines: Option<usize>) -> Result<String, String> {
    let log_dir = app
        .path()
        .app_log_dir()
        .map_err(|e| format!("Failed to get log directory: {}", e))?;

    let log_path = log_path_for(&log_dir, Local::now().date_naive());
    if !log_path.exists() {
        return Ok(String::new());
    }

    let content =
        fs::read_to_string(&log_path).map_err(|e| format!("Failed to read log file: {}", e))?;

    Ok(tail_lines(&content, lines.unwrap_or(100)))
}

fn tail_lines(content: &str, max_lines: usize) -> String {
    let recent: Vec<&str> = content.lines().rev().take(max_lines).collect();
    recent.into_iter().rev().collect::<Vec<_>>().join("\n")
}
