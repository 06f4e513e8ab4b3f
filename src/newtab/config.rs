use crate::error::{NewtabError, Result};
use crate::urls::DEFAULT_FAVICON_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_BACKUP_PREFIX: &str = "newtab-backup";
const MAX_FAVICON_SIZE: u32 = 256;

/// Tool configuration, stored in `<data_dir>/config.json`.
///
/// This is about the command line tool itself. Page settings live in the
/// synchronized store, see [`crate::settings`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewtabConfig {
    /// File name prefix for exported backups
    #[serde(default = "default_backup_prefix")]
    pub backup_prefix: String,

    /// Gzip exported backups
    #[serde(default)]
    pub compress_backups: bool,

    /// Pixel size requested from the favicon service for new bookmarks
    #[serde(default = "default_favicon_size")]
    pub favicon_size: u32,
}

fn default_backup_prefix() -> String {
    DEFAULT_BACKUP_PREFIX.to_string()
}

fn default_favicon_size() -> u32 {
    DEFAULT_FAVICON_SIZE
}

impl Default for NewtabConfig {
    fn default() -> Self {
        Self {
            backup_prefix: default_backup_prefix(),
            compress_backups: false,
            favicon_size: default_favicon_size(),
        }
    }
}

impl NewtabConfig {
    pub const KEYS: [&'static str; 3] = ["backup_prefix", "compress_backups", "favicon_size"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NewtabError::Io)?;
        let config: NewtabConfig =
            serde_json::from_str(&content).map_err(NewtabError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NewtabError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(NewtabError::Serialization)?;
        fs::write(config_path, content).map_err(NewtabError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "backup_prefix" => Some(self.backup_prefix.clone()),
            "compress_backups" => Some(self.compress_backups.to_string()),
            "favicon_size" => Some(self.favicon_size.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        match key {
            "backup_prefix" => {
                if value.is_empty() || value.contains(['/', '\\']) {
                    return Err(format!("Invalid backup prefix: {:?}", value));
                }
                self.backup_prefix = value.to_string();
            }
            "compress_backups" => {
                self.compress_backups = match value {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => return Err(format!("Expected true or false, got {}", value)),
                };
            }
            "favicon_size" => {
                let size: u32 = value
                    .parse()
                    .map_err(|_| format!("Expected a pixel size, got {}", value))?;
                if size == 0 || size > MAX_FAVICON_SIZE {
                    return Err(format!("Favicon size must be 1..={}", MAX_FAVICON_SIZE));
                }
                self.favicon_size = size;
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}
