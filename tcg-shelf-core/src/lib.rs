//! Card collection data model and catalog value normalization.
//!
//! This crate has no I/O. The fetcher produces these records, the database
//! crate persists them, and the server serializes them onto the wire.

pub mod normalize;
pub mod types;

pub use normalize::{image_url_from_base, is_missing, normalize_name};
pub use types::*;
