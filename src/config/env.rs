//! Environment lookup with `fortunebot.env` overrides
//!
//! Values from the first env file found take precedence over the inherited
//! process environment. The process environment itself is never modified;
//! overrides are forwarded explicitly to the background worker.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::AppPaths;

/// Explicit env-file path, checked before every other candidate
pub(crate) const ENV_FILE_ENV: &str = "FORTUNEBOT_ENV";

const ENV_FILE_NAME: &str = "fortunebot.env";

#[derive(Debug, Clone, Default)]
pub(crate) struct Environment {
    overrides: BTreeMap<String, String>,
    inherit: bool,
}

impl Environment {
    /// Lookups fall through to the real process environment
    pub(crate) fn process() -> Self {
        Self {
            overrides: BTreeMap::new(),
            inherit: true,
        }
    }

    /// Only the given variables exist; used by tests
    #[cfg(test)]
    pub(crate) fn isolated<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            overrides: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            inherit: false,
        }
    }

    /// Non-blank value of `key`, env-file overrides first
    pub(crate) fn get(&self, key: &str) -> Option<String> {
        let value = match self.overrides.get(key) {
            Some(v) => Some(v.clone()),
            None if self.inherit => std::env::var(key).ok(),
            None => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Variables loaded from an env file, to pass on to child processes
    pub(crate) fn overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply the first readable env file among `candidates`.
    ///
    /// Files are not merged: once one is read, the rest are ignored. Values
    /// are taken literally, with no quote stripping or `$VAR` expansion.
    /// Returns the path that was applied.
    pub(crate) fn apply_first_env_file(&mut self, candidates: &[PathBuf]) -> Option<PathBuf> {
        for path in candidates {
            let Ok(content) = fs::read_to_string(path) else {
                continue;
            };
            for (lineno, line) in content.lines().enumerate() {
                match parse_env_line(line) {
                    EnvLine::Pair(key, value) => {
                        self.overrides.insert(key.to_string(), value.to_string());
                    }
                    EnvLine::Ignored => {}
                    EnvLine::Malformed => {
                        debug!("Skipping line {} in {}", lineno + 1, path.display());
                    }
                }
            }
            debug!("Loaded env file {}", path.display());
            return Some(path.clone());
        }
        None
    }
}

#[derive(Debug, PartialEq, Eq)]
enum EnvLine<'a> {
    Pair(&'a str, &'a str),
    /// Blank line or `#` comment
    Ignored,
    Malformed,
}

/// `KEY=VALUE`, split at the first `=`, both sides trimmed
fn parse_env_line(line: &str) -> EnvLine<'_> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return EnvLine::Ignored;
    }
    match line.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => EnvLine::Pair(key.trim(), value.trim()),
        _ => EnvLine::Malformed,
    }
}

/// Env-file locations in lookup order, without duplicates
pub(crate) fn env_file_candidates(
    explicit: Option<&str>,
    paths: &AppPaths,
    cwd: Option<&Path>,
) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    let mut add = |p: PathBuf| {
        if !p.as_os_str().is_empty() && !candidates.contains(&p) {
            candidates.push(p);
        }
    };

    if let Some(custom) = explicit.filter(|s| !s.trim().is_empty()) {
        add(PathBuf::from(custom));
    }
    if let Some(dir) = paths.exe_dir() {
        add(dir.join(ENV_FILE_NAME));
    }
    match cwd {
        Some(dir) => add(dir.join(ENV_FILE_NAME)),
        None => add(PathBuf::from(ENV_FILE_NAME)),
    }
    if let Some(dir) = paths.config_dir() {
        add(dir.join(ENV_FILE_NAME));
    }
    add(PathBuf::from(ENV_FILE_NAME));

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_ignores_blank_values() {
        let env = Environment::isolated([("A", "x"), ("B", "  ")]);
        assert_eq!(env.get("A"), Some("x".to_string()));
        assert_eq!(env.get("B"), None);
        assert_eq!(env.get("C"), None);
    }

    #[test]
    fn applies_only_first_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.env");
        let second = dir.path().join("second.env");
        fs::write(
            &first,
            "# comment\n\nFORTUNEBOT_MODEL=gpt-test\nnot a pair\n=orphan\nFORTUNEBOT_PROMPT=hi there\n",
        )
        .unwrap();
        fs::write(&second, "OPENAI_API_KEY=sk-second\n").unwrap();

        let mut env = Environment::isolated([("FORTUNEBOT_MODEL", "from-process")]);
        let applied = env.apply_first_env_file(&[
            dir.path().join("missing.env"),
            first.clone(),
            second,
        ]);

        assert_eq!(applied, Some(first));
        assert_eq!(env.get("FORTUNEBOT_MODEL"), Some("gpt-test".to_string()));
        assert_eq!(env.get("FORTUNEBOT_PROMPT"), Some("hi there".to_string()));
        assert_eq!(env.get("OPENAI_API_KEY"), None);
    }

    #[test]
    fn values_are_literal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("fortunebot.env");
        fs::write(
            &file,
            "FORTUNEBOT_PROMPT=Tell me a joke about Rust\n\
             FORTUNEBOT_API_KEY = sk-spaced\n\
             FORTUNEBOT_MODEL=gpt-$HOME-x\n\
             OPENAI_MODEL=a'b\n\
             QUOTED=\"kept\"\n\
             EQUALS=a=b\n\
             AFTER=ok\n",
        )
        .unwrap();

        let mut env = Environment::isolated(Vec::<(String, String)>::new());
        assert_eq!(env.apply_first_env_file(&[file.clone()]), Some(file));

        let get = |k: &str| env.get(k);
        assert_eq!(get("FORTUNEBOT_PROMPT").as_deref(), Some("Tell me a joke about Rust"));
        assert_eq!(get("FORTUNEBOT_API_KEY").as_deref(), Some("sk-spaced"));
        assert_eq!(get("FORTUNEBOT_MODEL").as_deref(), Some("gpt-$HOME-x"));
        assert_eq!(get("OPENAI_MODEL").as_deref(), Some("a'b"));
        assert_eq!(get("QUOTED").as_deref(), Some("\"kept\""));
        assert_eq!(get("EQUALS").as_deref(), Some("a=b"));
        assert_eq!(get("AFTER").as_deref(), Some("ok"));
    }

    #[test]
    fn env_line_shapes() {
        assert_eq!(parse_env_line("   "), EnvLine::Ignored);
        assert_eq!(parse_env_line("  # KEY=value"), EnvLine::Ignored);
        assert_eq!(parse_env_line("no equals"), EnvLine::Malformed);
        assert_eq!(parse_env_line(" = value"), EnvLine::Malformed);
        assert_eq!(parse_env_line("EMPTY="), EnvLine::Pair("EMPTY", ""));
        assert_eq!(parse_env_line(" K = v w "), EnvLine::Pair("K", "v w"));
    }

    #[test]
    fn no_candidate_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = Environment::isolated(Vec::<(String, String)>::new());
        assert!(env
            .apply_first_env_file(&[dir.path().join("nope.env")])
            .is_none());
        assert_eq!(env.overrides().count(), 0);
    }

    #[test]
    fn candidates_order_and_dedup() {
        let paths = AppPaths::rooted(
            Path::new("/home/ada"),
            Some(PathBuf::from("/opt/bin/fortunebot")),
        );
        let candidates = env_file_candidates(
            Some("/etc/custom.env"),
            &paths,
            Some(Path::new("/opt/bin")),
        );
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/etc/custom.env"),
                PathBuf::from("/opt/bin/fortunebot.env"),
                PathBuf::from("/home/ada/.config/fortunebot/fortunebot.env"),
                PathBuf::from("fortunebot.env"),
            ]
        );
    }

    #[test]
    fn candidates_without_cwd_or_exe() {
        let paths = AppPaths::rooted(Path::new("/home/ada"), None);
        let candidates = env_file_candidates(Some("  "), &paths, None);
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("fortunebot.env"),
                PathBuf::from("/home/ada/.config/fortunebot/fortunebot.env"),
            ]
        );
    }
}
