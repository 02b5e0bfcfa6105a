use std::future::Future;

use tcg_shelf_core::CardRecord;

use crate::error::FetchError;

/// A source of card data, searchable by name and by exact id.
///
/// The collection manager only ever talks to the catalog through this trait,
/// so tests can substitute an in-memory catalog for the HTTP client.
pub trait CardCatalog: Send + Sync {
    /// Name-filtered search. Results are brief records: only id, name and
    /// image are populated, everything else holds the `N/A` sentinel.
    ///
    /// An empty query returns `Ok(vec![])` without contacting the catalog.
    fn search_by_name(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<CardRecord>, FetchError>> + Send;

    /// Exact lookup returning the fully detailed record.
    ///
    /// `Ok(None)` means the catalog has no such card (or `id` was empty).
    fn search_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<CardRecord>, FetchError>> + Send;
}
