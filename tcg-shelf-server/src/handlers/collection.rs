//! Local collection endpoints.

use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response, StatusCode};
use tcg_shelf_core::{CardRecord, NOT_AVAILABLE};
use tcg_shelf_db::StoreError;
use tcg_shelf_fetcher::CardCatalog;

use super::request_utils::{parse_query_params, read_body, required_param};
use super::response::{json_response, message_response};
use crate::error::ApiError;
use crate::router::AppState;

const INVALID_CARD: &str = "Invalid card data provided";

/// `GET /collection-api/collection[?name=...]`
pub async fn list_collection<C: CardCatalog>(
    req: Request<Incoming>,
    state: AppState<C>,
) -> Result<Response<Bytes>, ApiError> {
    let params = parse_query_params(req.uri().query());
    let filter = params.get("name").map(String::as_str).filter(|f| !f.is_empty());

    let cards = state
        .manager
        .get_collection(filter)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(json_response(StatusCode::OK, &cards))
}

/// `GET /collection-api/collection/{id}`
pub async fn get_collected_card<C: CardCatalog>(
    id: &str,
    state: AppState<C>,
) -> Result<Response<Bytes>, ApiError> {
    match state.manager.get_card(id).await {
        Ok(Some(card)) => Ok(json_response(StatusCode::OK, &card)),
        Ok(None) => Err(ApiError::not_found(format!(
            "Card ID {id} not found in collection."
        ))),
        Err(e) => Err(ApiError::internal(e.to_string())),
    }
}

/// `POST /collection-api/collection` with a card JSON body.
///
/// The body needs at least an `id`; everything else is re-fetched from the
/// catalog before saving.
pub async fn save_card<C: CardCatalog>(
    req: Request<Incoming>,
    state: AppState<C>,
) -> Result<Response<Bytes>, ApiError> {
    let body = read_body(req).await?;
    let card = parse_card(&body)?;

    match state.manager.save_card(&card).await {
        Ok(message) => Ok(message_response(StatusCode::CREATED, &message)),
        Err(e) => {
            log::info!("Save of '{}' rejected: {e}", card.id);
            Err(ApiError::Conflict(e.to_string()))
        }
    }
}

/// Only a string `id` is required. `name` and `image_url` are carried along
/// when they are strings; every other field is ignored.
fn parse_card(body: &[u8]) -> Result<CardRecord, ApiError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| ApiError::bad_request(INVALID_CARD))?;
    let id = value
        .get("id")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| ApiError::bad_request(INVALID_CARD))?;
    let text = |key: &str| {
        value
            .get(key)
            .and_then(serde_json::Value::as_str)
            .unwrap_or(NOT_AVAILABLE)
            .to_string()
    };
    Ok(CardRecord::brief(id, text("name"), text("image_url")))
}

/// `DELETE /collection-api/collection?id=...`
pub async fn delete_card<C: CardCatalog>(
    req: Request<Incoming>,
    state: AppState<C>,
) -> Result<Response<Bytes>, ApiError> {
    let params = parse_query_params(req.uri().query());
    let id = required_param(&params, "id")?;

    match state.manager.delete_card(id).await {
        Ok(message) => Ok(message_response(StatusCode::OK, &message)),
        Err(e @ StoreError::NotFound { .. }) => Err(ApiError::NotFound(e.to_string())),
        Err(e) => Err(ApiError::internal(e.to_string())),
    }
}
