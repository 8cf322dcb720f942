//! CLI argument definitions
//!
//! Flags for prompt/model/key overrides, cache control and the run modes.

use clap::Parser;

use crate::config::FlagValues;
use crate::consts::DEFAULT_CACHE_TTL;

#[derive(Debug, Parser)]
#[command(name = "fortunebot")]
#[command(about = "AI fortune cookies for your terminal, cached and prefetched", version)]
pub(crate) struct Cli {
    /// Override prompt for the fortune
    #[arg(long)]
    pub(crate) prompt: Option<String>,

    /// OpenAI API key
    #[arg(long, value_name = "KEY")]
    pub(crate) api_key: Option<String>,

    /// Model to use
    #[arg(long)]
    pub(crate) model: Option<String>,

    /// Cache TTL in seconds (0 disables cache)
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_CACHE_TTL)]
    pub(crate) cache_ttl: u64,

    /// Disable cache
    #[arg(long)]
    pub(crate) no_cache: bool,

    /// Delete cache before running
    #[arg(long)]
    pub(crate) clear_cache: bool,

    /// Disable background prefetch
    #[arg(long)]
    pub(crate) no_prefetch: bool,

    /// Verbose output
    #[arg(long)]
    pub(crate) verbose: bool,

    /// Quiet output (default; overrides --verbose)
    #[arg(long)]
    pub(crate) quiet: bool,

    /// Print fortune log and exit
    #[arg(long)]
    pub(crate) show_log: bool,

    /// Internal: run as prefetch worker
    #[arg(long, hide = true)]
    pub(crate) prefetch_worker: bool,

    /// Print a random fortune from the log instead of calling the API
    #[arg(short = 'r', long)]
    pub(crate) log_random: bool,
}

impl Cli {
    pub(crate) fn verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    pub(crate) fn caching_enabled(&self) -> bool {
        !self.no_cache && self.cache_ttl > 0
    }

    pub(crate) fn flag_values(&self) -> FlagValues<'_> {
        FlagValues {
            prompt: self.prompt.as_deref(),
            api_key: self.api_key.as_deref(),
            model: self.model.as_deref(),
        }
    }
}
