//! JSON body shapes returned by the API.

use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::request_utils::build_response;

/// Body for operations that only report an outcome.
#[derive(Debug, Serialize)]
pub struct MessageBody<'a> {
    pub message: &'a str,
}

/// Serialize `body` as the JSON payload of a response.
///
/// Serialization of the API's own types cannot fail in practice; if it
/// does, an empty object is sent rather than dropping the status.
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response<Bytes> {
    let json = serde_json::to_vec(body).unwrap_or_else(|e| {
        log::error!("Failed to serialize response body: {e}");
        b"{}".to_vec()
    });
    build_response(status, json)
}

pub fn message_response(status: StatusCode, message: &str) -> Response<Bytes> {
    json_response(status, &MessageBody { message })
}
