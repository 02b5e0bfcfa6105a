//! Application layer: the collection manager and its settings.
//!
//! [`CollectionManager`] is the only thing the HTTP layer talks to. It proxies
//! catalog searches and runs the enrichment workflow that turns a brief
//! search hit into a complete record before it reaches the store.

pub mod error;
pub mod manager;
pub mod settings;

pub use error::{SaveError, SettingsError};
pub use manager::CollectionManager;
pub use settings::{Settings, default_database_path, settings_path};

pub use tcg_shelf_core as core;
pub use tcg_shelf_db as db;
pub use tcg_shelf_fetcher as fetcher;
