//! Application settings (catalog endpoint, database location, listen address).
//!
//! Values are resolved per field with the priority chain
//! environment variable > `settings.toml` > built-in default. Command-line
//! flags are applied on top by the server binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tcg_shelf_fetcher::{ClientOptions, DEFAULT_BASE_URL, DEFAULT_CARDS_PATH};

use crate::error::SettingsError;

pub const ENV_CATALOG_URL: &str = "TCG_SHELF_CATALOG_URL";
pub const ENV_CARDS_PATH: &str = "TCG_SHELF_CARDS_PATH";
pub const ENV_DATABASE: &str = "TCG_SHELF_DB";
pub const ENV_HOST: &str = "TCG_SHELF_HOST";
pub const ENV_PORT: &str = "TCG_SHELF_PORT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

/// Canonical path to the settings file: `~/.config/tcg-shelf/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("tcg-shelf").join("settings.toml")
}

/// Default collection database: `~/.local/share/tcg-shelf/collection.db`.
pub fn default_database_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("tcg-shelf").join("collection.db")
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub catalog_url: String,
    pub cards_path: String,
    pub name_timeout: Duration,
    pub id_timeout: Duration,
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        let client = ClientOptions::default();
        Self {
            catalog_url: DEFAULT_BASE_URL.to_string(),
            cards_path: DEFAULT_CARDS_PATH.to_string(),
            name_timeout: client.name_timeout,
            id_timeout: client.id_timeout,
            database_path: default_database_path(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// TOML file format. Every field is optional.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SettingsFile {
    pub catalog: CatalogSection,
    pub database: DatabaseSection,
    pub server: ServerSection,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Settings {
    /// Load settings from the process environment and a settings file.
    ///
    /// With `explicit_path`, that file must exist. Otherwise the canonical
    /// [`settings_path`] is read if present and silently skipped if not.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, SettingsError> {
        let file = match explicit_path {
            Some(path) => Some(read_settings_file(path)?),
            None => {
                let path = settings_path();
                if path.exists() {
                    Some(read_settings_file(&path)?)
                } else {
                    log::debug!("No settings file at {}, using defaults", path.display());
                    None
                }
            }
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with environment lookups over the defaults.
    pub fn resolve(
        file: Option<SettingsFile>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let file = file.unwrap_or_default();
        let defaults = Settings::default();

        let catalog_url = env(ENV_CATALOG_URL)
            .or(file.catalog.base_url)
            .unwrap_or(defaults.catalog_url);
        let cards_path = env(ENV_CARDS_PATH)
            .or(file.catalog.cards_path)
            .unwrap_or(defaults.cards_path);
        let database_path = env(ENV_DATABASE)
            .map(PathBuf::from)
            .or(file.database.path)
            .unwrap_or(defaults.database_path);
        let host = env(ENV_HOST)
            .or(file.server.host)
            .unwrap_or(defaults.host);
        let port = match env(ENV_PORT) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| SettingsError::Invalid {
                key: ENV_PORT,
                message: format!("'{raw}' is not a port number: {e}"),
            })?,
            None => file.server.port.unwrap_or(defaults.port),
        };

        let name_timeout = file
            .catalog
            .name_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.name_timeout);
        let id_timeout = file
            .catalog
            .id_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.id_timeout);
        if name_timeout.is_zero() || id_timeout.is_zero() {
            return Err(SettingsError::Invalid {
                key: "catalog timeout",
                message: "timeouts must be at least one second".to_string(),
            });
        }

        Ok(Self {
            catalog_url,
            cards_path,
            name_timeout,
            id_timeout,
            database_path,
            host,
            port,
        })
    }

    /// Catalog client options derived from these settings.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.catalog_url.clone(),
            cards_path: self.cards_path.clone(),
            name_timeout: self.name_timeout,
            id_timeout: self.id_timeout,
        }
    }

    /// `host:port` as given, for binding.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Render the resolved settings in settings-file form.
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        let file = SettingsFile {
            catalog: CatalogSection {
                base_url: Some(self.catalog_url.clone()),
                cards_path: Some(self.cards_path.clone()),
                name_timeout_secs: Some(self.name_timeout.as_secs()),
                id_timeout_secs: Some(self.id_timeout.as_secs()),
            },
            database: DatabaseSection {
                path: Some(self.database_path.clone()),
            },
            server: ServerSection {
                host: Some(self.host.clone()),
                port: Some(self.port),
            },
        };
        Ok(toml::to_string_pretty(&file)?)
    }
}

fn read_settings_file(path: &Path) -> Result<SettingsFile, SettingsError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: SettingsFile = toml::from_str(&contents)?;
    log::debug!("Loaded settings from {}", path.display());
    Ok(file)
}
