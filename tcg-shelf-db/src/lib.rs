//! SQLite persistence layer for the card collection.
//!
//! Two tables, `set` and `card`, linked by `card.set_id`. Free functions in
//! [`operations`] and [`queries`] work on any `Connection` (or transaction);
//! [`CollectionStore`] owns a connection and is what the application shares.

pub mod error;
pub mod operations;
pub mod queries;
pub mod schema;
pub mod store;

pub use error::StoreError;
pub use operations::{create_card, delete_card, ensure_set};
pub use queries::{find_set, get_card, list_cards, list_sets};
pub use schema::{SchemaError, open_database, open_memory};
pub use store::CollectionStore;
