use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{read_json, write_json, ConfigError, CONFIG_DIR};
use crate::loader::script::{default_script, ScriptStep};

const APP_CONFIG_FILE: &str = "pharaohs_legacy.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_title: String,
    /// Directory with `logo.png`; `~` is expanded.
    pub asset_dir: String,
    /// Address shown by the placeholder content host.
    pub content_url: String,
    /// Timeline the demo loader plays on startup.
    pub demo_script: Vec<ScriptStep>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "Pharaohs Legacy".to_string(),
            asset_dir: "assets".to_string(),
            content_url: "https://pharaohs-legacy.app/".to_string(),
            demo_script: default_script(),
        }
    }
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        CONFIG_DIR.join(APP_CONFIG_FILE)
    }

    pub fn resolved_asset_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.asset_dir).into_owned())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        read_json(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        write_json(path, self)
    }

    pub fn load() -> Self {
        Self::load_or_seed(&Self::default_path())
    }

    pub fn load_or_seed(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            match config.save_to(path) {
                Ok(()) => info!("Wrote default app config to {}", path.display()),
                Err(e) => warn!("Could not write default app config: {}", e),
            }
            return config;
        }
        match Self::load_from(path) {
            Ok(config) => {
                info!("Loaded app config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring app config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
