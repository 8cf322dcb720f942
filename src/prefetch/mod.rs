//! Background prefetch
//!
//! The parent hands the resolved prompt/model/key to a detached copy of
//! itself running with `--prefetch-worker` and never waits on it. The next
//! invocation sees whatever the worker managed to write to the cache.

mod spawn;

pub(crate) use spawn::ProcessPrefetcher;

use crate::error::SpawnError;

/// Everything the worker needs, passed as fresh CLI arguments
#[derive(Debug, Clone, Copy)]
pub(crate) struct PrefetchRequest<'a> {
    pub(crate) prompt: &'a str,
    pub(crate) model: &'a str,
    pub(crate) api_key: &'a str,
    pub(crate) verbose: bool,
}

impl PrefetchRequest<'_> {
    /// `--flag=value` form keeps values that start with '-' intact
    pub(crate) fn worker_args(&self) -> Vec<String> {
        let mut args = vec![
            "--prefetch-worker".to_string(),
            format!("--prompt={}", self.prompt),
            format!("--model={}", self.model),
        ];
        if !self.api_key.is_empty() {
            args.push(format!("--api-key={}", self.api_key));
        }
        args
    }
}

/// Fire-and-forget launcher; returns the worker's pid
pub(crate) trait Prefetcher {
    fn start(&self, request: &PrefetchRequest<'_>) -> Result<u32, SpawnError>;
}
