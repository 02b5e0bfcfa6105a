//! Endpoint handlers.

pub mod collection;
pub mod request_utils;
pub mod response;
pub mod search;

pub use collection::{delete_card, get_collected_card, list_collection, save_card};
pub use search::{search_by_id, search_by_name};
