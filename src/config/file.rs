use serde::Deserialize;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::consts::TAG;

/// Optional ~/.config/fortunebot/config.json; every field may be absent
#[derive(Debug, Default, Clone, Deserialize)]
pub(crate) struct FileConfig {
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    #[serde(default)]
    pub(crate) default_prompt: Option<String>,
    #[serde(default)]
    pub(crate) model: Option<String>,
}

impl FileConfig {
    /// Read the config file; a missing or malformed file yields `None`
    pub(crate) fn load(path: &Path) -> Option<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No config at {}: {e}", path.display());
                return None;
            }
        };
        match serde_json::from_str::<FileConfig>(&content) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                warn!("{TAG} Failed to parse {}: {e}", path.display());
                None
            }
        }
    }
}
