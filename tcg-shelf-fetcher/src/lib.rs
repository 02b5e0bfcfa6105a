pub mod catalog;
pub mod client;
pub mod error;
pub mod types;

pub use catalog::CardCatalog;
pub use client::{ClientOptions, DEFAULT_BASE_URL, DEFAULT_CARDS_PATH, TcgdexClient};
pub use error::FetchError;
pub use types::{Detail, RawCard, RawSet, card_from_raw};
