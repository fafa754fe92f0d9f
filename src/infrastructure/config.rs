use crate::domain::{config::TransferConfig, error::{TransferError, TransferResult}};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "uboot-transfer";
const PROJECT_DIR: &str = ".uboot-transfer";
const CONFIG_FILE: &str = "config.toml";

/// Configuration manager
pub struct ConfigManager {
    global_config_path: Option<PathBuf>,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create a manager rooted at the user's config directory and the current working directory
    pub fn new() -> Self {
        let global_config_path = dirs::home_dir()
            .map(|home| home.join(".config").join(CONFIG_DIR).join(CONFIG_FILE));
        let project_config_path = std::env::current_dir()
            .ok()
            .and_then(|dir| Self::find_project_config_path(&dir));

        Self {
            global_config_path,
            project_config_path,
        }
    }

    /// Create a manager with explicit locations
    pub fn with_paths(global_config_path: Option<PathBuf>, project_config_path: Option<PathBuf>) -> Self {
        Self {
            global_config_path,
            project_config_path,
        }
    }

    /// Load configuration from files
    ///
    /// The global file provides every section. A project file, when found,
    /// replaces the `serial` and `xmodem` sections.
    pub fn load_config(&self) -> TransferResult<TransferConfig> {
        let mut config = TransferConfig::default();

        if let Some(global_path) = &self.global_config_path {
            if global_path.exists() {
                config = self.load_config_from_path(global_path)?;
            }
        }

        if let Some(project_path) = &self.project_config_path {
            if project_path.exists() {
                let project_config = self.load_config_from_path(project_path)?;
                config.serial = project_config.serial;
                config.xmodem = project_config.xmodem;
            }
        }

        Ok(config)
    }

    /// Find project configuration path by walking up directory tree
    pub fn find_project_config_path(start: &Path) -> Option<PathBuf> {
        let mut path = start;

        loop {
            let config_path = path.join(PROJECT_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> TransferResult<TransferConfig> {
        let content = fs::read_to_string(path).map_err(|e| TransferError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| TransferError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
