//! Append-only fortune log, one `<epoch>\t<text>` record per line

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use rand::Rng;
use tracing::warn;

use crate::consts::TAG;
use crate::core::{Fortune, LogEntry, now_epoch};
use crate::error::{LogReadError, PersistError};

#[derive(Debug, Clone)]
pub(crate) struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[cfg(test)]
    pub(crate) fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Best-effort append: failures are reported and swallowed
    pub(crate) fn append(&self, fortune: &Fortune) {
        if let Err(e) = self.try_append(fortune, now_epoch()) {
            warn!("{TAG} {e}");
        }
    }

    /// The whole record goes out in a single write on an append-mode handle
    pub(crate) fn try_append(&self, fortune: &Fortune, timestamp: i64) -> Result<(), PersistError> {
        let line = LogEntry::format_line(timestamp, fortune);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(PersistError::WriteLog)?;
        file.write_all(line.as_bytes())
            .map_err(PersistError::WriteLog)
    }

    /// Raw log contents, `None` when there is no log
    pub(crate) fn dump_all(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    /// Every parseable record; malformed lines are skipped
    pub(crate) fn entries(&self) -> Result<Vec<LogEntry>, LogReadError> {
        let content = fs::read_to_string(&self.path).map_err(LogReadError::Read)?;
        Ok(content.lines().filter_map(LogEntry::parse_line).collect())
    }

    pub(crate) fn sample_random(&self) -> Result<LogEntry, LogReadError> {
        self.sample_with(&mut rand::thread_rng())
    }

    pub(crate) fn sample_with<R: Rng>(&self, rng: &mut R) -> Result<LogEntry, LogReadError> {
        let mut entries = self.entries()?;
        if entries.is_empty() {
            return Err(LogReadError::Empty);
        }
        let index = rng.gen_range(0..entries.len());
        Ok(entries.swap_remove(index))
    }
}
