//! REST interface for the card collection.
//!
//! Exposes the collection manager's operations under `/collection-api/` and
//! translates their results into status codes and JSON bodies.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::{ApiError, ServerError};
pub use router::{AppState, Router};
pub use server::Server;
