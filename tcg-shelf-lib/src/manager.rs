use std::sync::Arc;

use tcg_shelf_core::{CardRecord, StoredCard, is_missing};
use tcg_shelf_db::{CollectionStore, StoreError};
use tcg_shelf_fetcher::{CardCatalog, FetchError};

use crate::error::SaveError;

/// Orchestrates catalog lookups and the local collection.
///
/// Searches are proxied to the catalog as-is. Saving always re-fetches the
/// card by id first, so only complete records are persisted; the extra
/// lookup is paid once per kept card rather than once per search hit.
///
/// SQLite work runs on tokio's blocking pool, so these methods need a
/// running runtime.
pub struct CollectionManager<C> {
    catalog: C,
    store: Arc<CollectionStore>,
}

impl<C: CardCatalog> CollectionManager<C> {
    pub fn new(catalog: C, store: CollectionStore) -> Self {
        Self {
            catalog,
            store: Arc::new(store),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    /// Brief search results for a name. An empty query never reaches the
    /// catalog.
    pub async fn search_cards_by_name(&self, query: &str) -> Result<Vec<CardRecord>, FetchError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let cards = self.catalog.search_by_name(query).await.inspect_err(|e| {
            log::error!("Name search for '{query}' failed: {e}");
        })?;
        log::info!("Found {} cards matching '{query}'", cards.len());
        Ok(cards)
    }

    /// Full record for an id, or `None` when the catalog has no such card.
    pub async fn search_card_by_id(&self, id: &str) -> Result<Option<CardRecord>, FetchError> {
        if id.is_empty() {
            return Ok(None);
        }
        self.catalog.search_by_id(id).await
    }

    /// Enrich a (possibly brief) card from the catalog and save it.
    ///
    /// Whatever fields the caller sent besides `id` are ignored; the stored
    /// record is exactly what the catalog returns for that id.
    pub async fn save_card(&self, card: &CardRecord) -> Result<String, SaveError> {
        if is_missing(&card.id) {
            return Err(SaveError::InvalidId);
        }
        let id = card.id.as_str();

        log::info!("Looking up full data for '{id}' before saving");
        let full = match self.search_card_by_id(id).await {
            Ok(Some(full)) if full.id == id => full,
            Ok(Some(other)) => {
                log::warn!("Catalog returned '{}' when asked for '{id}'", other.id);
                return Err(SaveError::FullDataUnavailable { id: id.to_string() });
            }
            Ok(None) => {
                return Err(SaveError::FullDataUnavailable { id: id.to_string() });
            }
            Err(e) => {
                log::warn!("Enrichment lookup for '{id}' failed: {e}");
                return Err(SaveError::FullDataUnavailable { id: id.to_string() });
            }
        };

        if !full.has_valid_set_id() {
            return Err(SaveError::MissingSetId { id: id.to_string() });
        }

        Ok(self.with_store(move |store| store.create_card(&full)).await?)
    }

    /// Collected cards by name, optionally filtered by a name substring.
    pub async fn get_collection(
        &self,
        name_filter: Option<&str>,
    ) -> Result<Vec<StoredCard>, StoreError> {
        let filter = name_filter.map(str::to_string);
        self.with_store(move |store| store.list_cards(filter.as_deref()))
            .await
    }

    pub async fn get_card(&self, id: &str) -> Result<Option<StoredCard>, StoreError> {
        let id = id.to_string();
        self.with_store(move |store| store.get_card(&id)).await
    }

    pub async fn delete_card(&self, id: &str) -> Result<String, StoreError> {
        log::info!("Deleting card '{id}' from collection");
        let id = id.to_string();
        self.with_store(move |store| store.delete_card(&id)).await
    }

    /// Run a store operation on the blocking pool.
    async fn with_store<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&CollectionStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| {
                log::error!("Store task failed: {e}");
                StoreError::Worker(e.to_string())
            })?
    }
}
