use std::path::PathBuf;

use tcg_shelf_db::StoreError;
use thiserror::Error;

/// Why a card was not saved into the collection.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The submitted card has no usable id.
    #[error("missing/invalid id: a card id is required to save a card")]
    InvalidId,

    /// The catalog lookup came back empty, failed, or returned another card.
    #[error("cannot find full data for id '{id}'")]
    FullDataUnavailable { id: String },

    /// The enriched record does not reference a set.
    #[error("incomplete data: missing set id for card '{id}' after enrichment")]
    MissingSetId { id: String },

    /// The store refused the card (duplicate, integrity failure, ...).
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors loading the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },
}
