use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ImportConfig {
    /// Check incoming contacts against the index before inserting
    pub skip_duplicates: bool,
    /// Merge duplicates into the existing contact instead of dropping them
    pub merge: bool,
    /// Number of phone property slots (`phone`, `phone2`, ...)
    pub phone_slots: usize,
    /// Number of email property slots (`email`, `email2`, ...)
    pub email_slots: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            skip_duplicates: true,
            merge: true,
            phone_slots: 3,
            email_slots: 3,
        }
    }
}

impl CliConfig {
    /// Loads the config file, writing a default one first if it is missing.
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            let default_config = toml::to_string_pretty(&CliConfig::default())
                .map_err(|e| {
                    ConfigError::Message(format!("Failed to render default config: {e}"))
                })?;
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()).format(FileFormat::Toml))
            .build()?;

        let config: CliConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("cardex").join("cardex.toml")
    } else {
        PathBuf::from("cardex.toml")
    }
}
