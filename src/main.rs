mod app;
mod cli;
mod client;
mod config;
mod consts;
mod core;
mod error;
mod prefetch;
mod store;
mod utils;

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::{App, AppContext, worker_verbose};
use cli::{Cli, Mode};
use client::OpenAiClient;
use config::{Environment, env_file_candidates};
use config::env::ENV_FILE_ENV;
use consts::{LOG_FILTER_ENV, TAG};
use crate::core::AppPaths;
use prefetch::ProcessPrefetcher;

/// Diagnostics go to stderr; stdout is reserved for fortunes
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .compact()
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut env = Environment::process();
    let verbose = match Mode::from(&cli) {
        Mode::PrefetchWorker => worker_verbose(&env),
        _ => cli.verbose(),
    };
    init_tracing(verbose);

    let paths = AppPaths::discover();
    let cwd = std::env::current_dir().ok();
    let candidates = env_file_candidates(
        env.get(ENV_FILE_ENV).as_deref(),
        &paths,
        cwd.as_deref(),
    );
    env.apply_first_env_file(&candidates);

    let ctx = AppContext::load(paths, env);
    let client = OpenAiClient::new();
    let prefetcher = ProcessPrefetcher::new(
        ctx.paths.exe.clone(),
        ctx.env
            .overrides()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    );
    let app = App::new(&ctx, &client, &prefetcher);

    let result = app.run(&cli, &mut io::stdout().lock(), &mut io::stderr().lock());
    match result {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            eprintln!("{TAG} {e}");
            ExitCode::FAILURE
        }
    }
}
