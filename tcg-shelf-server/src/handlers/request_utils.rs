//! Request and response helpers shared by the endpoint handlers.

use std::collections::HashMap;
use std::time::Duration;

use http_body_util::{BodyExt, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response, StatusCode};
use percent_encoding::percent_decode_str;
use tokio::time;

use crate::error::ApiError;

/// How long a client may take to send a request body.
pub const BODY_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest request body accepted. A card payload is a handful of short fields.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Decoded query-string parameters. The first occurrence of a key wins.
pub type QueryParams = HashMap<String, String>;

/// Read the whole request body, bounded in both time and size.
pub async fn read_body(req: Request<Incoming>) -> Result<Bytes, ApiError> {
    let body = Limited::new(req.into_body(), MAX_BODY_BYTES);
    let collected = time::timeout(BODY_TIMEOUT, body.collect())
        .await
        .map_err(|_| ApiError::bad_request("Timed out reading request body"))?
        .map_err(|e| ApiError::bad_request(format!("Failed to read request body: {e}")))?;
    Ok(collected.to_bytes())
}

/// Parse a form-style query string (`a=1&b=two+words`).
///
/// Keys without `=` map to an empty value. `+` decodes to a space.
pub fn parse_query_params(query: Option<&str>) -> QueryParams {
    let mut params = QueryParams::new();
    let Some(query) = query else {
        return params;
    };
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params
            .entry(decode_component(key))
            .or_insert_with(|| decode_component(value));
    }
    params
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Fetch a parameter that must be present and non-empty.
pub fn required_param<'a>(params: &'a QueryParams, key: &str) -> Result<&'a str, ApiError> {
    match params.get(key).map(String::as_str) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::bad_request(format!(
            "Missing '{key}' query parameter"
        ))),
    }
}

/// Build a response with a JSON body.
pub fn build_response(status: StatusCode, json: Vec<u8>) -> Response<Bytes> {
    let mut response = Response::new(Bytes::from(json));
    *response.status_mut() = status;
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("application/json"),
    );
    response
}

/// Build a response with no body.
pub fn build_empty_response(status: StatusCode) -> Response<Bytes> {
    let mut response = Response::new(Bytes::new());
    *response.status_mut() = status;
    response
}
