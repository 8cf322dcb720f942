/// Tag prefixed to every user-visible diagnostic: "[fortunebot] Error: ..."
pub(crate) const TAG: &str = "[fortunebot]";

/// Marker prepended to every generated fortune
pub(crate) const FORTUNE_MARKER: &str = "🤖";

pub(crate) const DEFAULT_PROMPT: &str = "Generate a very short, funny fortune cookie message about AI, programmers, or neural networks. Maximum 2 short sentences.";

pub(crate) const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default cache TTL in seconds; 0 disables caching
pub(crate) const DEFAULT_CACHE_TTL: u64 = 60;

/// Set by the parent on the worker process: "true" or "false"
pub(crate) const VERBOSE_ENV: &str = "FORTUNEBOT_VERBOSE";

/// Tracing filter override, e.g. FORTUNEBOT_LOG=debug
pub(crate) const LOG_FILTER_ENV: &str = "FORTUNEBOT_LOG";
