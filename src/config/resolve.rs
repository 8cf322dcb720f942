//! Precedence chain for prompt, API key and model
//!
//! flag > primary env > secondary env > config file > built-in default.
//! Resolution never fails: a missing API key resolves to "" with
//! provenance "none found" and is only rejected by the generation client.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::consts::{DEFAULT_MODEL, DEFAULT_PROMPT};

use super::env::Environment;
use super::file::FileConfig;

/// Where a resolved value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Provenance {
    Flag(&'static str),
    Env(&'static str),
    File(PathBuf),
    Default,
    NoneFound,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Flag(flag) => write!(f, "{flag} flag"),
            Provenance::Env(var) => write!(f, "env {var}"),
            Provenance::File(path) => write!(f, "{}", path.display()),
            Provenance::Default => f.write_str("built-in default"),
            Provenance::NoneFound => f.write_str("none found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub(crate) value: String,
    pub(crate) source: Provenance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedConfig {
    pub(crate) prompt: Resolved,
    pub(crate) api_key: Resolved,
    pub(crate) model: Resolved,
}

/// Raw CLI overrides; blank values are ignored
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FlagValues<'a> {
    pub(crate) prompt: Option<&'a str>,
    pub(crate) api_key: Option<&'a str>,
    pub(crate) model: Option<&'a str>,
}

struct Field {
    flag: &'static str,
    env: &'static [&'static str],
    default: Option<&'static str>,
}

const PROMPT: Field = Field {
    flag: "--prompt",
    env: &["FORTUNEBOT_PROMPT"],
    default: Some(DEFAULT_PROMPT),
};

const API_KEY: Field = Field {
    flag: "--api-key",
    env: &["FORTUNEBOT_API_KEY", "OPENAI_API_KEY"],
    default: None,
};

const MODEL: Field = Field {
    flag: "--model",
    env: &["FORTUNEBOT_MODEL", "OPENAI_MODEL"],
    default: Some(DEFAULT_MODEL),
};

pub(crate) struct Resolver<'a> {
    env: &'a Environment,
    file: Option<&'a FileConfig>,
    file_path: &'a Path,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(env: &'a Environment, file: Option<&'a FileConfig>, file_path: &'a Path) -> Self {
        Self {
            env,
            file,
            file_path,
        }
    }

    pub(crate) fn resolve(&self, flags: FlagValues<'_>) -> ResolvedConfig {
        let file = self.file;
        ResolvedConfig {
            prompt: self.resolve_field(
                &PROMPT,
                flags.prompt,
                file.and_then(|c| c.default_prompt.as_deref()),
            ),
            api_key: self.resolve_field(
                &API_KEY,
                flags.api_key,
                file.and_then(|c| c.api_key.as_deref()),
            ),
            model: self.resolve_field(&MODEL, flags.model, file.and_then(|c| c.model.as_deref())),
        }
    }

    fn resolve_field(&self, field: &Field, flag: Option<&str>, file_value: Option<&str>) -> Resolved {
        if let Some(value) = flag.filter(|v| !v.trim().is_empty()) {
            return Resolved {
                value: value.to_string(),
                source: Provenance::Flag(field.flag),
            };
        }

        for var in field.env {
            if let Some(value) = self.env.get(var) {
                return Resolved {
                    value,
                    source: Provenance::Env(*var),
                };
            }
        }

        if let Some(value) = file_value.filter(|v| !v.trim().is_empty()) {
            return Resolved {
                value: value.to_string(),
                source: Provenance::File(self.file_path.to_path_buf()),
            };
        }

        match field.default {
            Some(default) => Resolved {
                value: default.to_string(),
                source: Provenance::Default,
            },
            None => Resolved {
                value: String::new(),
                source: Provenance::NoneFound,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "/home/ada/.config/fortunebot/config.json";

    fn full_file() -> FileConfig {
        FileConfig {
            api_key: Some("sk-file".to_string()),
            default_prompt: Some("file prompt".to_string()),
            model: Some("file-model".to_string()),
        }
    }

    fn full_env() -> Environment {
        Environment::isolated([
            ("FORTUNEBOT_PROMPT", "env prompt"),
            ("FORTUNEBOT_API_KEY", "sk-primary"),
            ("OPENAI_API_KEY", "sk-secondary"),
            ("FORTUNEBOT_MODEL", "primary-model"),
            ("OPENAI_MODEL", "secondary-model"),
        ])
    }

    #[test]
    fn flags_win_over_everything() {
        let env = full_env();
        let file = full_file();
        let resolved = Resolver::new(&env, Some(&file), Path::new(CONFIG)).resolve(FlagValues {
            prompt: Some("flag prompt"),
            api_key: Some("sk-flag"),
            model: Some("flag-model"),
        });

        assert_eq!(resolved.prompt.value, "flag prompt");
        assert_eq!(resolved.prompt.source, Provenance::Flag("--prompt"));
        assert_eq!(resolved.api_key.value, "sk-flag");
        assert_eq!(resolved.api_key.source.to_string(), "--api-key flag");
        assert_eq!(resolved.model.value, "flag-model");
        assert_eq!(resolved.model.source, Provenance::Flag("--model"));
    }

    #[test]
    fn blank_flags_fall_through_to_primary_env() {
        let env = full_env();
        let file = full_file();
        let resolved = Resolver::new(&env, Some(&file), Path::new(CONFIG)).resolve(FlagValues {
            prompt: Some("  "),
            api_key: Some(""),
            model: None,
        });

        assert_eq!(resolved.prompt.value, "env prompt");
        assert_eq!(resolved.api_key.value, "sk-primary");
        assert_eq!(resolved.api_key.source.to_string(), "env FORTUNEBOT_API_KEY");
        assert_eq!(resolved.model.value, "primary-model");
    }

    #[test]
    fn secondary_env_before_file() {
        let env = Environment::isolated([
            ("OPENAI_API_KEY", "sk-secondary"),
            ("OPENAI_MODEL", "secondary-model"),
        ]);
        let file = full_file();
        let resolved = Resolver::new(&env, Some(&file), Path::new(CONFIG)).resolve(FlagValues::default());

        assert_eq!(resolved.api_key.value, "sk-secondary");
        assert_eq!(resolved.api_key.source, Provenance::Env("OPENAI_API_KEY"));
        assert_eq!(resolved.model.value, "secondary-model");
        // prompt has no secondary variable
        assert_eq!(resolved.prompt.value, "file prompt");
        assert_eq!(resolved.prompt.source.to_string(), CONFIG);
    }

    #[test]
    fn file_before_defaults() {
        let env = Environment::isolated(Vec::<(String, String)>::new());
        let file = full_file();
        let resolved = Resolver::new(&env, Some(&file), Path::new(CONFIG)).resolve(FlagValues::default());

        assert_eq!(resolved.api_key.value, "sk-file");
        assert_eq!(resolved.api_key.source, Provenance::File(PathBuf::from(CONFIG)));
        assert_eq!(resolved.model.value, "file-model");
    }

    #[test]
    fn defaults_and_missing_key() {
        let env = Environment::isolated(Vec::<(String, String)>::new());
        let file = FileConfig {
            api_key: Some("   ".to_string()),
            ..FileConfig::default()
        };
        let resolved = Resolver::new(&env, Some(&file), Path::new(CONFIG)).resolve(FlagValues::default());

        assert_eq!(resolved.prompt.value, DEFAULT_PROMPT);
        assert_eq!(resolved.prompt.source.to_string(), "built-in default");
        assert_eq!(resolved.model.value, DEFAULT_MODEL);
        assert_eq!(resolved.api_key.value, "");
        assert_eq!(resolved.api_key.source.to_string(), "none found");
    }

    #[test]
    fn no_config_file_at_all() {
        let env = Environment::isolated([("FORTUNEBOT_PROMPT", "env prompt")]);
        let resolved = Resolver::new(&env, None, Path::new(CONFIG)).resolve(FlagValues::default());

        assert_eq!(resolved.prompt.source, Provenance::Env("FORTUNEBOT_PROMPT"));
        assert_eq!(resolved.model.source, Provenance::Default);
        assert_eq!(resolved.api_key.source, Provenance::NoneFound);
    }
}
