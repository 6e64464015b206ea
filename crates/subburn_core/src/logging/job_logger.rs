//! Per-burn-job logger with file and callback output.
//!
//! Each job gets its own log file. Progress lines are throttled in compact
//! mode, and the most recent lines are kept so a failure report can show
//! what led up to it.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;
use serde::Serialize;

use super::types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

/// Per-job logger writing to a file and an optional callback.
pub struct JobLogger {
    job_name: String,
    log_path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
    callback: Mutex<Option<LogCallback>>,
    config: LogConfig,
    /// Recent lines, newest last.
    tail: Mutex<VecDeque<String>>,
    last_progress: Mutex<Option<u32>>,
}

impl JobLogger {
    /// Create `<log_dir>/<job_name>.log`, creating the directory if needed.
    pub fn new(
        job_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> std::io::Result<Self> {
        let job_name = job_name.into();
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&job_name)));
        let file = File::create(&log_path)?;

        Ok(Self {
            job_name,
            log_path,
            writer: Mutex::new(Some(BufWriter::new(file))),
            callback: Mutex::new(callback),
            tail: Mutex::new(VecDeque::with_capacity(config.error_tail)),
            config,
            last_progress: Mutex::new(None),
        })
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }
        let formatted = self.format_message(message);
        self.remember(&formatted);
        self.write_line(&formatted);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    /// Log an external command line.
    pub fn command(&self, command: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Command.format(command));
    }

    pub fn phase(&self, phase_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Phase.format(phase_name));
    }

    pub fn section(&self, section_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Section.format(section_name));
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    /// Log progress (filtered in compact mode).
    ///
    /// Returns true if the line was written. In compact mode only the first
    /// value reaching each `progress_step` boundary, and 100, get through.
    pub fn progress(&self, percent: u32) -> bool {
        {
            let mut last = self.last_progress.lock();
            if self.config.compact {
                let step = self.config.progress_step.max(1);
                let bucket = percent / step;
                let last_bucket = last.map(|p| p / step);
                let finished = percent >= 100 && *last != Some(percent);
                if !finished && last_bucket.is_some_and(|b| bucket <= b) {
                    return false;
                }
            } else if *last == Some(percent) {
                return false;
            }
            *last = Some(percent);
        }

        self.log(LogLevel::Info, &format!("Progress: {}%", percent));
        true
    }

    /// Log a serializable value as pretty JSON under a section header.
    pub fn json<T: Serialize>(&self, title: &str, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => {
                self.section(title);
                for line in json.lines() {
                    self.debug(line);
                }
            }
            Err(e) => self.debug(&format!("{}: not serializable ({})", title, e)),
        }
    }

    /// Write the remembered tail under a header (typically after an error).
    pub fn show_tail(&self, header: &str) {
        let lines: Vec<String> = self.tail.lock().iter().cloned().collect();
        if lines.is_empty() {
            return;
        }
        self.write_line(&self.format_message(&format!("[{}/tail]", header)));
        for line in &lines {
            self.write_line(line);
        }
    }

    /// Get the remembered tail, oldest first.
    pub fn get_tail(&self) -> Vec<String> {
        self.tail.lock().iter().cloned().collect()
    }

    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Flush and close the log file. Later messages only reach the callback.
    pub fn close(&self) {
        self.flush();
        *self.writer.lock() = None;
    }

    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
        } else {
            message.to_string()
        }
    }

    fn remember(&self, line: &str) {
        if self.config.error_tail == 0 {
            return;
        }
        let mut tail = self.tail.lock();
        while tail.len() >= self.config.error_tail {
            tail.pop_front();
        }
        tail.push_back(line.to_string());
    }

    fn write_line(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }
        if let Some(ref callback) = *self.callback.lock() {
            callback(formatted);
        }
    }
}

impl Drop for JobLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Replace characters that are unsafe in file names.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

/// Fluent construction of a `JobLogger`.
pub struct JobLoggerBuilder {
    job_name: String,
    log_dir: PathBuf,
    config: LogConfig,
    callback: Option<LogCallback>,
}

impl JobLoggerBuilder {
    pub fn new(job_name: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            job_name: job_name.into(),
            log_dir: log_dir.into(),
            config: LogConfig::default(),
            callback: None,
        }
    }

    pub fn config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.config.compact = compact;
        self
    }

    pub fn progress_step(mut self, step: u32) -> Self {
        self.config.progress_step = step;
        self
    }

    pub fn callback(mut self, callback: LogCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn build(self) -> std::io::Result<JobLogger> {
        JobLogger::new(self.job_name, self.log_dir, self.config, self.callback)
    }
}
