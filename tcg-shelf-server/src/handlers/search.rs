//! Catalog search endpoints.

use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response, StatusCode};
use tcg_shelf_fetcher::CardCatalog;

use super::request_utils::{parse_query_params, required_param};
use super::response::json_response;
use crate::error::ApiError;
use crate::router::AppState;

const CATALOG_UNAVAILABLE: &str = "External API error or timeout.";

/// `GET /collection-api/search-by-name?name=...`
pub async fn search_by_name<C: CardCatalog>(
    req: Request<Incoming>,
    state: AppState<C>,
) -> Result<Response<Bytes>, ApiError> {
    let params = parse_query_params(req.uri().query());
    let name = required_param(&params, "name")?;

    let cards = state
        .manager
        .search_cards_by_name(name)
        .await
        .map_err(|_| ApiError::Unavailable(CATALOG_UNAVAILABLE.to_string()))?;
    if cards.is_empty() {
        return Err(ApiError::not_found(format!(
            "No cards found matching '{name}'"
        )));
    }
    Ok(json_response(StatusCode::OK, &cards))
}

/// `GET /collection-api/search-by-id?id=...`
pub async fn search_by_id<C: CardCatalog>(
    req: Request<Incoming>,
    state: AppState<C>,
) -> Result<Response<Bytes>, ApiError> {
    let params = parse_query_params(req.uri().query());
    let id = required_param(&params, "id")?;

    match state.manager.search_card_by_id(id).await {
        Ok(Some(card)) => Ok(json_response(StatusCode::OK, &card)),
        Ok(None) => Err(ApiError::not_found(format!("No card found with ID '{id}'"))),
        Err(_) => Err(ApiError::Unavailable(CATALOG_UNAVAILABLE.to_string())),
    }
}
