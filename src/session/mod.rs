//! Append-only interaction logs, one file per level
//!
//! The file is opened, appended and closed for every interaction; earlier
//! entries are never rewritten.

use crate::levels::Level;
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const USER_MARKER: &str = "] USER: ";

#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<log_dir>/level{N}_log.txt`
    pub fn for_level(log_dir: &Path, level: Level) -> Self {
        Self::new(log_dir.join(level.log_file_name()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one prompt/response block.
    pub fn record(&self, prompt: &str, response: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write!(
            file,
            "[{ts}] USER: {prompt}\n[{ts}] ASSISTANT: {response}\n\n",
            ts = timestamp
        )?;
        file.flush()
    }

    /// Number of recorded interactions; a missing file counts as zero.
    pub fn count_entries(&self) -> io::Result<usize> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content
                .lines()
                .filter(|line| line.starts_with('[') && line.contains(USER_MARKER))
                .count()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let log = SessionLog::for_level(&dir.path().join("logs"), Level::Two);
        assert_eq!(log.count_entries().unwrap(), 0);

        log.record("15 + 23", "Calculator result: 38").unwrap();
        log.record("Why is the sky blue?", "Answer: Rayleigh\nscattering").unwrap();
        log.record("hi", "Answer: Here is a concise answer.").unwrap();

        assert!(log.path().ends_with("logs/level2_log.txt"));
        assert_eq!(log.count_entries().unwrap(), 3);

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("USER: 15 + 23\n"));
        assert!(content.contains("ASSISTANT: Calculator result: 38\n\n"));
    }

    #[test]
    fn test_later_runs_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level1_log.txt");

        SessionLog::new(&path).record("first", "one").unwrap();
        // A fresh handle stands in for a second process run
        SessionLog::new(&path).record("second", "two").unwrap();

        let log = SessionLog::new(&path);
        assert_eq!(log.count_entries().unwrap(), 2);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.find("USER: first").unwrap() < content.find("USER: second").unwrap());
    }
}
