pub(crate) mod paths;
pub(crate) mod types;

pub(crate) use paths::AppPaths;
pub(crate) use types::{CachedFortune, Fortune, LogEntry, now_epoch};
