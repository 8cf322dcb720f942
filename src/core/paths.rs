//! On-disk locations, computed once per process and passed to each store

use std::path::{Path, PathBuf};

const APP_DIR: &str = "fortunebot";
const CONFIG_FILE_NAME: &str = "config.json";
const CACHE_FILE_NAME: &str = "cache.json";
const LOG_FILE_NAME: &str = "fortunebot.log";

#[derive(Debug, Clone)]
pub(crate) struct AppPaths {
    /// ~/.config/fortunebot/config.json
    pub(crate) config_file: PathBuf,
    /// ~/.local/share/fortunebot/cache.json
    pub(crate) cache_file: PathBuf,
    /// fortunebot.log beside the executable
    pub(crate) log_file: PathBuf,
    /// The running executable, re-executed for background prefetch
    pub(crate) exe: Option<PathBuf>,
}

impl AppPaths {
    pub(crate) fn discover() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::rooted(&home, std::env::current_exe().ok())
    }

    pub(crate) fn rooted(home: &Path, exe: Option<PathBuf>) -> Self {
        let log_file = exe
            .as_deref()
            .and_then(Path::parent)
            .map(|dir| dir.join(LOG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME));

        Self {
            config_file: home.join(".config").join(APP_DIR).join(CONFIG_FILE_NAME),
            cache_file: home
                .join(".local")
                .join("share")
                .join(APP_DIR)
                .join(CACHE_FILE_NAME),
            log_file,
            exe,
        }
    }

    pub(crate) fn exe_dir(&self) -> Option<&Path> {
        self.exe.as_deref().and_then(Path::parent)
    }

    pub(crate) fn config_dir(&self) -> Option<&Path> {
        self.config_file.parent()
    }
}
