//! Run-mode orchestration: serve from cache or fetch, then maybe prefetch
//!
//! A cache hit is printed immediately whether it is fresh or stale; the
//! distinction only changes what verbose output says. Refreshing is always
//! left to a background worker, so the foreground makes a network call only
//! on a cache miss or when caching is disabled.

use std::io::{self, Write};
use std::process::ExitCode;

use tracing::{info, warn};

use crate::cli::{Cli, Mode};
use crate::client::FortuneSource;
use crate::config::{Environment, FileConfig, FlagValues, ResolvedConfig, Resolver};
use crate::consts::{TAG, VERBOSE_ENV};
use crate::core::{AppPaths, now_epoch};
use crate::prefetch::{PrefetchRequest, Prefetcher};
use crate::store::{CacheStore, ClearOutcome, LogStore};
use crate::utils::{format_age, mask_key};

/// Per-process context: paths, environment and the optional config file
pub(crate) struct AppContext {
    pub(crate) paths: AppPaths,
    pub(crate) env: Environment,
    pub(crate) file_config: Option<FileConfig>,
}

impl AppContext {
    pub(crate) fn load(paths: AppPaths, env: Environment) -> Self {
        let file_config = FileConfig::load(&paths.config_file);
        Self {
            paths,
            env,
            file_config,
        }
    }

    pub(crate) fn resolve(&self, flags: FlagValues<'_>) -> ResolvedConfig {
        Resolver::new(&self.env, self.file_config.as_ref(), &self.paths.config_file).resolve(flags)
    }
}

/// Whether the parent asked the worker to narrate
pub(crate) fn worker_verbose(env: &Environment) -> bool {
    matches!(env.get(VERBOSE_ENV).as_deref(), Some("true" | "1"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Success,
    Failure,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

pub(crate) struct App<'a> {
    ctx: &'a AppContext,
    cache: CacheStore,
    log: LogStore,
    source: &'a dyn FortuneSource,
    prefetcher: &'a dyn Prefetcher,
}

impl<'a> App<'a> {
    pub(crate) fn new(
        ctx: &'a AppContext,
        source: &'a dyn FortuneSource,
        prefetcher: &'a dyn Prefetcher,
    ) -> Self {
        Self {
            ctx,
            cache: CacheStore::new(ctx.paths.cache_file.clone()),
            log: LogStore::new(ctx.paths.log_file.clone()),
            source,
            prefetcher,
        }
    }

    /// Dispatch on the run mode. `out` receives fortunes, `err` user-facing
    /// failures; diagnostics go through `tracing`.
    pub(crate) fn run(&self, cli: &Cli, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<Outcome> {
        match Mode::from(cli) {
            Mode::PrefetchWorker => self.run_worker(cli, err),
            Mode::ShowLog => self.show_log(out),
            Mode::LogRandom => self.log_random(out, err),
            Mode::Normal => self.run_normal(cli, out, err),
        }
    }

    fn run_normal(&self, cli: &Cli, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<Outcome> {
        if cli.clear_cache {
            self.clear_cache(out)?;
        }

        let verbose = cli.verbose();
        let config = self.ctx.resolve(cli.flag_values());
        if verbose {
            report_config(&config);
        }

        let request = PrefetchRequest {
            prompt: &config.prompt.value,
            model: &config.model.value,
            api_key: &config.api_key.value,
            verbose,
        };
        let prefetch = !cli.no_prefetch;

        if cli.caching_enabled() {
            if let Some(cached) = self.cache.load() {
                let now = now_epoch();
                let age = format_age(cached.age_at(now));
                if cached.is_fresh_at(cli.cache_ttl, now) {
                    info!("Using fresh cache (age {age} < TTL {}s).", cli.cache_ttl);
                } else {
                    info!(
                        "Cache stale (age {age} >= TTL {}s). Serving stale and refreshing in the background...",
                        cli.cache_ttl
                    );
                }
                writeln!(out, "{}", cached.fortune)?;
                if prefetch {
                    self.start_prefetch(&request);
                }
                return Ok(Outcome::Success);
            }
            info!("No cache found. Fetching fresh fortune...");
        } else {
            info!("Caching disabled. Fetching fresh fortune...");
        }

        let fortune = match self
            .source
            .generate(request.prompt, request.api_key, request.model)
        {
            Ok(fortune) => fortune,
            Err(e) => {
                writeln!(err, "{TAG} Error: {e}")?;
                return Ok(Outcome::Failure);
            }
        };

        self.log.append(&fortune);
        writeln!(out, "{fortune}")?;
        // Saved and prefetched even when caching is disabled: a later run
        // with caching on can then start from a warm cache.
        self.cache.save(&fortune);
        if prefetch {
            self.start_prefetch(&request);
        }
        Ok(Outcome::Success)
    }

    /// One fetch, persisted on success. Never spawns another worker.
    fn run_worker(&self, cli: &Cli, err: &mut dyn Write) -> io::Result<Outcome> {
        let config = self.ctx.resolve(cli.flag_values());
        match self.source.generate(
            &config.prompt.value,
            &config.api_key.value,
            &config.model.value,
        ) {
            Ok(fortune) => {
                self.log.append(&fortune);
                self.cache.save(&fortune);
                info!("Background prefetch complete; cache updated.");
                Ok(Outcome::Success)
            }
            Err(e) => {
                writeln!(err, "{TAG} Background prefetch failed: {e}")?;
                Ok(Outcome::Failure)
            }
        }
    }

    fn show_log(&self, out: &mut dyn Write) -> io::Result<Outcome> {
        match self.log.dump_all() {
            Some(content) => write!(out, "{content}")?,
            None => writeln!(out, "{TAG} No log file found.")?,
        }
        Ok(Outcome::Success)
    }

    fn log_random(&self, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<Outcome> {
        match self.log.sample_random() {
            Ok(entry) => {
                info!("Showing random fortune from log (no API call).");
                writeln!(out, "{}", entry.text)?;
                Ok(Outcome::Success)
            }
            Err(e) => {
                writeln!(err, "{TAG} {e}")?;
                Ok(Outcome::Failure)
            }
        }
    }

    fn clear_cache(&self, out: &mut dyn Write) -> io::Result<()> {
        match self.cache.clear() {
            Ok(ClearOutcome::Cleared) => writeln!(out, "{TAG} Cache cleared."),
            Ok(ClearOutcome::NothingToClear) => writeln!(out, "{TAG} No cache to clear."),
            Err(e) => {
                warn!("{TAG} {e}");
                Ok(())
            }
        }
    }

    /// Spawn failures never affect the foreground result
    fn start_prefetch(&self, request: &PrefetchRequest<'_>) {
        match self.prefetcher.start(request) {
            Ok(pid) => info!("Background prefetch started (pid {pid})."),
            Err(e) if request.verbose => warn!("{TAG} {e}"),
            Err(_) => {}
        }
    }
}

fn report_config(config: &ResolvedConfig) {
    info!("Using prompt (source: {})", config.prompt.source);
    info!(
        "Using model: {} (source: {})",
        config.model.value, config.model.source
    );
    if config.api_key.value.is_empty() {
        info!(
            "No API key found (sources checked: {})",
            config.api_key.source
        );
    } else {
        info!(
            "Using API key from: {} ({})",
            config.api_key.source,
            mask_key(&config.api_key.value)
        );
    }
}
