use std::time::Duration;

use reqwest::{StatusCode, Url};
use tcg_shelf_core::CardRecord;
use tokio::time::Instant;

use crate::catalog::CardCatalog;
use crate::error::FetchError;
use crate::types::{Detail, RawCard, card_from_raw};

pub const DEFAULT_BASE_URL: &str = "https://api.tcgdex.net/v2/en";
pub const DEFAULT_CARDS_PATH: &str = "/cards";
const NAME_SEARCH_TIMEOUT: Duration = Duration::from_secs(15);
const ID_SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the catalog lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub cards_path: String,
    pub name_timeout: Duration,
    pub id_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cards_path: DEFAULT_CARDS_PATH.to_string(),
            name_timeout: NAME_SEARCH_TIMEOUT,
            id_timeout: ID_SEARCH_TIMEOUT,
        }
    }
}

/// HTTP client for the TCGdex card catalog.
///
/// Requests are one-shot: fixed timeout, no retry, no caching. Repeated
/// searches always hit the remote catalog again.
pub struct TcgdexClient {
    http: reqwest::Client,
    cards_url: Url,
    name_timeout: Duration,
    id_timeout: Duration,
}

impl TcgdexClient {
    pub fn new(options: ClientOptions) -> Result<Self, FetchError> {
        let raw = format!(
            "{}/{}",
            options.base_url.trim_end_matches('/'),
            options.cards_path.trim_start_matches('/')
        );
        let cards_url = Url::parse(&raw)
            .map_err(|e| FetchError::config(format!("Invalid catalog URL '{raw}': {e}")))?;
        if cards_url.cannot_be_a_base() {
            return Err(FetchError::config(format!(
                "Catalog URL '{raw}' cannot take path segments"
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("tcg-shelf/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            cards_url,
            name_timeout: options.name_timeout,
            id_timeout: options.id_timeout,
        })
    }

    /// The resolved cards endpoint, e.g. `https://api.tcgdex.net/v2/en/cards`.
    pub fn cards_url(&self) -> &Url {
        &self.cards_url
    }

    async fn fetch_by_name(&self, query: &str) -> Result<Vec<CardRecord>, FetchError> {
        let started = Instant::now();
        let resp = self
            .http
            .get(self.cards_url.clone())
            .query(&[("name", query)])
            .timeout(self.name_timeout)
            .send()
            .await?;
        log::debug!("Catalog name search '{query}' responded in {:.2?}", started.elapsed());

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: resp.url().to_string(),
            });
        }

        let bytes = resp.bytes().await?;
        let parse_started = Instant::now();
        let raw: Option<Vec<RawCard>> = serde_json::from_slice(&bytes)?;
        log::debug!("Parsed name search payload in {:.2?}", parse_started.elapsed());

        let cards: Vec<CardRecord> = raw
            .unwrap_or_default()
            .iter()
            .map(|card| card_from_raw(card, Detail::Brief))
            .collect();
        Ok(cards)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<CardRecord>, FetchError> {
        let mut url = self.cards_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::config("Catalog URL cannot take path segments"))?
            .pop_if_empty()
            .push(id);

        let started = Instant::now();
        let resp = self
            .http
            .get(url)
            .timeout(self.id_timeout)
            .send()
            .await?;
        log::debug!("Catalog id lookup '{id}' responded in {:.2?}", started.elapsed());

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: resp.url().to_string(),
            });
        }

        let bytes = resp.bytes().await?;
        let parse_started = Instant::now();
        let raw: Option<RawCard> = serde_json::from_slice(&bytes)?;
        log::debug!("Parsed id lookup payload in {:.2?}", parse_started.elapsed());

        // A payload without an id is treated as "no such card".
        Ok(raw
            .filter(|card| card.id.is_some())
            .map(|card| card_from_raw(&card, Detail::Full)))
    }
}

impl CardCatalog for TcgdexClient {
    async fn search_by_name(&self, query: &str) -> Result<Vec<CardRecord>, FetchError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        match self.fetch_by_name(query).await {
            Ok(cards) => {
                log::debug!("Catalog name search '{query}' found {} cards", cards.len());
                Ok(cards)
            }
            Err(e) => {
                log::warn!("Error fetching cards named '{query}' from catalog: {e}");
                Err(e)
            }
        }
    }

    async fn search_by_id(&self, id: &str) -> Result<Option<CardRecord>, FetchError> {
        if id.is_empty() {
            return Ok(None);
        }
        self.fetch_by_id(id).await.inspect_err(|e| {
            log::warn!("Error fetching card '{id}' from catalog: {e}");
        })
    }
}
