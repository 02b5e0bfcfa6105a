//! Matchit routing configuration.

use std::sync::Arc;

use hyper::body::{Bytes, Incoming};
use hyper::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    HeaderValue,
};
use hyper::{Method, Request, Response, StatusCode};
use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;
use tcg_shelf_fetcher::CardCatalog;
use tcg_shelf_lib::CollectionManager;

use crate::error::ApiError;
use crate::handlers;
use crate::handlers::request_utils::build_empty_response;

/// Shared application state.
pub struct AppState<C> {
    pub manager: Arc<CollectionManager<C>>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

/// HTTP request router.
pub struct Router<C> {
    inner: MatchitRouter<RouteHandler>,
    state: AppState<C>,
}

impl<C: CardCatalog> Router<C> {
    pub fn new(manager: Arc<CollectionManager<C>>) -> Self {
        let mut router = MatchitRouter::new();

        // Catalog proxy
        router
            .insert("/collection-api/search-by-name", RouteHandler::SearchByName)
            .expect("Failed to insert search-by-name route");
        router
            .insert("/collection-api/search-by-id", RouteHandler::SearchById)
            .expect("Failed to insert search-by-id route");

        // Local collection
        router
            .insert("/collection-api/collection", RouteHandler::Collection)
            .expect("Failed to insert collection route");
        router
            .insert("/collection-api/collection/{id}", RouteHandler::CollectionItem)
            .expect("Failed to insert collection/{id} route");

        Self {
            inner: router,
            state: AppState { manager },
        }
    }

    /// Route a request to its handler and render the outcome.
    ///
    /// Every response carries a permissive CORS origin header so the browser
    /// client can be served from anywhere.
    pub async fn route(&self, req: Request<Incoming>) -> Response<Bytes> {
        let mut response = match self.dispatch(req).await {
            Ok(response) => response,
            Err(err) => err.into(),
        };
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        response
    }

    async fn dispatch(&self, req: Request<Incoming>) -> Result<Response<Bytes>, ApiError> {
        let path = req.uri().path().to_string();
        let matched = self
            .inner
            .at(&path)
            .map_err(|_| ApiError::RouteNotFound(path.clone()))?;
        let handler = *matched.value;

        if req.method() == Method::OPTIONS {
            return Ok(preflight_response());
        }

        let method = req.method().clone();
        let state = self.state.clone();
        match (handler, &method) {
            (RouteHandler::SearchByName, &Method::GET) => {
                handlers::search_by_name(req, state).await
            }
            (RouteHandler::SearchById, &Method::GET) => handlers::search_by_id(req, state).await,
            (RouteHandler::Collection, &Method::GET) => {
                handlers::list_collection(req, state).await
            }
            (RouteHandler::Collection, &Method::POST) => handlers::save_card(req, state).await,
            (RouteHandler::Collection, &Method::DELETE) => {
                handlers::delete_card(req, state).await
            }
            (RouteHandler::CollectionItem, &Method::GET) => {
                let raw = matched.params.get("id").unwrap_or_default();
                let id = percent_decode_str(raw).decode_utf8_lossy().into_owned();
                handlers::get_collected_card(&id, state).await
            }
            _ => Err(ApiError::MethodNotAllowed),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum RouteHandler {
    SearchByName,
    SearchById,
    Collection,
    CollectionItem,
}

fn preflight_response() -> Response<Bytes> {
    let mut response = build_empty_response(StatusCode::NO_CONTENT);
    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, DELETE, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}
