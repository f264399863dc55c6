//! JSON Lines file sink

use super::event::SecurityEvent;
use super::sink::{SecurityEventSink, SinkError, SinkResult};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Configuration for the JSON Lines sink.
#[derive(Debug, Clone)]
pub struct JsonLinesSinkConfig {
    /// Path to the event log file.
    pub file_path: PathBuf,
    /// Maximum file size in bytes before rotation.
    pub max_file_size: Option<u64>,
}

impl JsonLinesSinkConfig {
    /// Create a configuration for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
            max_file_size: Some(50 * 1024 * 1024),
        }
    }

    /// Set maximum file size before rotation.
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Disable rotation.
    pub fn no_size_limit(mut self) -> Self {
        self.max_file_size = None;
        self
    }
}

/// Append-only sink writing one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink {
    config: JsonLinesSinkConfig,
    writer: Mutex<File>,
}

impl JsonLinesSink {
    /// Create a sink, creating parent directories and the file as needed.
    pub fn new(config: JsonLinesSinkConfig) -> SinkResult<Self> {
        let file = open_append(&config.file_path)?;
        Ok(Self {
            config,
            writer: Mutex::new(file),
        })
    }

    /// Create a sink for `path` with default configuration.
    pub fn open(path: impl Into<PathBuf>) -> SinkResult<Self> {
        Self::new(JsonLinesSinkConfig::new(path))
    }

    /// Path of the active file.
    pub fn path(&self) -> &Path {
        &self.config.file_path
    }

    fn needs_rotation(&self) -> bool {
        match self.config.max_file_size {
            Some(max) => std::fs::metadata(&self.config.file_path)
                .map(|m| m.len() >= max)
                .unwrap_or(false),
            None => false,
        }
    }

    /// First unused rotation name for the current millisecond.
    fn rotated_path(&self) -> PathBuf {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3f").to_string();
        let mut seq = 0u32;
        loop {
            let candidate = self
                .config
                .file_path
                .with_extension(format!("{}-{}.jsonl", stamp, seq));
            if !candidate.exists() {
                return candidate;
            }
            seq += 1;
        }
    }

    fn rotate(&self, file: &mut File) -> SinkResult<()> {
        let rotated = self.rotated_path();

        std::fs::rename(&self.config.file_path, &rotated)
            .map_err(|e| SinkError::IoError(format!("Failed to rotate file: {}", e)))?;
        *file = open_append(&self.config.file_path)?;

        tracing::debug!(rotated = %rotated.display(), "security event log rotated");
        Ok(())
    }
}

fn open_append(path: &Path) -> SinkResult<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SinkError::IoError(format!("Failed to create directories: {}", e)))?;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| SinkError::IoError(format!("Failed to open file: {}", e)))
}

impl SecurityEventSink for JsonLinesSink {
    fn write(&self, event: &SecurityEvent) -> SinkResult<()> {
        let json = serde_json::to_string(event)
            .map_err(|e| SinkError::SerializationError(e.to_string()))?;

        let mut file = self
            .writer
            .lock()
            .map_err(|e| SinkError::WriteError(format!("Failed to acquire lock: {}", e)))?;

        if self.needs_rotation() {
            self.rotate(&mut file)?;
        }

        writeln!(file, "{}", json)
            .and_then(|_| file.flush())
            .map_err(|e| SinkError::IoError(format!("Failed to write: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::SecurityEventKind;
    use crate::raw::RawInput;
    use tempfile::TempDir;

    fn read_events(path: &Path) -> Vec<SecurityEvent> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn appends_json_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("security.jsonl");
        let sink = JsonLinesSink::open(&path).unwrap();

        sink.write(&SecurityEvent::new(
            SecurityEventKind::SqlInjectionAttempt,
            &RawInput::from("' or 1=1"),
        ))
        .unwrap();
        sink.write(
            &SecurityEvent::new(SecurityEventKind::FailedLoginAttempt, &RawInput::from("ana"))
                .subject("ana"),
        )
        .unwrap();

        let events = read_events(sink.path());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].truncated_input, "' or 1=1");
        assert_eq!(events[1].subject_id.as_deref(), Some("ana"));
    }

    #[test]
    fn reopening_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("security.jsonl");
        for _ in 0..2 {
            let sink = JsonLinesSink::open(&path).unwrap();
            sink.write(&SecurityEvent::new(
                SecurityEventKind::LoginSystemError,
                &RawInput::Missing,
            ))
            .unwrap();
        }
        assert_eq!(read_events(&path).len(), 2);
    }

    #[test]
    fn rotates_when_size_exceeded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("security.jsonl");
        let sink = JsonLinesSink::new(JsonLinesSinkConfig::new(&path).max_size(1)).unwrap();

        let event = SecurityEvent::new(SecurityEventKind::SqlInjectionAttempt, &RawInput::from("#"));
        sink.write(&event).unwrap();
        sink.write(&event).unwrap();

        assert_eq!(read_events(&path).len(), 1);
        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 2);
    }

    #[test]
    fn rapid_rotation_keeps_every_event() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("security.jsonl");
        let sink = JsonLinesSink::new(JsonLinesSinkConfig::new(&path).max_size(1)).unwrap();

        for i in 0..20 {
            let raw = RawInput::from(format!("' or {}={}", i, i));
            sink.write(&SecurityEvent::new(SecurityEventKind::SqlInjectionAttempt, &raw))
                .unwrap();
        }

        let on_disk: usize = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| read_events(&entry.unwrap().path()).len())
            .sum();
        assert_eq!(on_disk, 20);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 20);
    }
}
