//! Core data types shared by the cache, the log and the generation client
//!
//! A `Fortune` can only be built from real content, so nothing that
//! represents a failure can reach the cache or the log.

use std::fmt;

use chrono::Utc;

use crate::consts::{FORTUNE_MARKER, TAG};

/// Current time as epoch seconds
pub(crate) fn now_epoch() -> i64 {
    Utc::now().timestamp()
}

/// A generated fortune, guaranteed non-blank and free of the diagnostic tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fortune(String);

impl Fortune {
    /// Validate text read back from disk
    pub(crate) fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with(TAG) {
            return None;
        }
        Some(Self(text.to_string()))
    }

    /// Wrap raw model output: prefixed with the fortune marker and folded
    /// onto one line, since each log record is a single line
    pub(crate) fn generated(raw: &str) -> Option<Self> {
        let text = raw
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            return None;
        }
        Some(Self(format!("{FORTUNE_MARKER} {text}")))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fortune {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The single cached fortune and when it was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CachedFortune {
    pub(crate) fortune: Fortune,
    /// Epoch seconds
    pub(crate) timestamp: i64,
}

impl CachedFortune {
    pub(crate) fn age_at(&self, now: i64) -> i64 {
        now - self.timestamp
    }

    /// Fresh iff age < ttl; an entry exactly `ttl` seconds old is stale
    pub(crate) fn is_fresh_at(&self, ttl: u64, now: i64) -> bool {
        i128::from(self.age_at(now)) < i128::from(ttl)
    }
}

/// One line of the fortune log: "<epoch>\t<text>"
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogEntry {
    pub(crate) timestamp: i64,
    pub(crate) text: String,
}

impl LogEntry {
    pub(crate) fn parse_line(line: &str) -> Option<Self> {
        let (timestamp, text) = line.split_once('\t')?;
        let timestamp = timestamp.trim().parse::<i64>().ok()?;
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            timestamp,
            text: text.to_string(),
        })
    }

    pub(crate) fn format_line(timestamp: i64, fortune: &Fortune) -> String {
        format!("{timestamp}\t{fortune}\n")
    }
}
