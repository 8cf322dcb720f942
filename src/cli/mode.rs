//! Run mode selection
//!
//! Exactly one mode per invocation. The worker flag is checked first so a
//! spawned child can never fall into a mode that spawns again.

use super::args::Cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Internal: background refresh of cache and log
    PrefetchWorker,
    /// Print the whole fortune log
    ShowLog,
    /// Print a random fortune from the log, no API call
    LogRandom,
    /// Serve from cache or fetch, then maybe prefetch
    Normal,
}

impl From<&Cli> for Mode {
    fn from(cli: &Cli) -> Self {
        if cli.prefetch_worker {
            Mode::PrefetchWorker
        } else if cli.show_log {
            Mode::ShowLog
        } else if cli.log_random {
            Mode::LogRandom
        } else {
            Mode::Normal
        }
    }
}
