//! On-disk state: the single cached fortune and the append-only log

pub(crate) mod cache;
pub(crate) mod log;

pub(crate) use cache::{CacheStore, ClearOutcome};
pub(crate) use log::LogStore;
