use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tcg_shelf_fetcher::{CardCatalog, ClientOptions, FetchError, TcgdexClient};
use tokio::net::TcpListener;

/// Serve canned catalog responses on an ephemeral port. Returns the base URL.
async fn spawn_catalog<F>(handler: F) -> String
where
    F: Fn(&str, Option<&str>) -> (u16, String) + Send + Sync + 'static,
{
    let handler = Arc::new(handler);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let (status, body) = handler(req.uri().path(), req.uri().query());
                    async move {
                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(status)
                                .header("Content-Type", "application/json")
                                .body(Full::new(Bytes::from(body)))
                                .unwrap(),
                        )
                    }
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });
    format!("http://{addr}")
}

/// Like [`spawn_catalog`], but every response is held back for `delay`.
async fn spawn_slow_catalog(delay: Duration, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let service = service_fn(move |_req: Request<Incoming>| async move {
                    tokio::time::sleep(delay).await;
                    Ok::<_, Infallible>(Response::new(Full::new(Bytes::from(body))))
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });
    format!("http://{addr}")
}

fn client_for(base_url: String) -> TcgdexClient {
    TcgdexClient::new(ClientOptions {
        base_url,
        ..ClientOptions::default()
    })
    .unwrap()
}

const PIKACHU_LIST: &str = r#"[
    {"id": "base1-58", "localId": "58", "name": "Pikachu", "image": "https://assets.tcgdex.net/en/base/base1/58"},
    {"id": "jungle-60", "localId": "60", "name": "Pikachu"}
]"#;

const PIKACHU_FULL: &str = r#"{
    "id": "base1-58",
    "localId": "58",
    "name": "Pikachu",
    "image": "https://assets.tcgdex.net/en/base/base1/58",
    "rarity": "Common",
    "types": ["Lightning"],
    "set": {"id": "base1", "name": "Base Set"}
}"#;

#[tokio::test]
async fn name_search_maps_brief_records() {
    let base = spawn_catalog(|path, query| {
        assert_eq!(path, "/cards");
        assert_eq!(query, Some("name=Pikachu"));
        (200, PIKACHU_LIST.to_string())
    })
    .await;

    let cards = client_for(base).search_by_name("Pikachu").await.unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].id, "base1-58");
    assert_eq!(
        cards[0].image_url,
        "https://assets.tcgdex.net/en/base/base1/58/high.webp"
    );
    assert_eq!(cards[1].image_url, "placeholder.png");
    assert!(cards.iter().all(|c| c.set_name == "N/A" && c.set_id == "N/A"));
}

#[tokio::test]
async fn name_query_is_url_encoded() {
    let base = spawn_catalog(|_, query| {
        assert_eq!(query, Some("name=Mr.+Mime%27s"));
        (200, "[]".to_string())
    })
    .await;

    let cards = client_for(base).search_by_name("Mr. Mime's").await.unwrap();
    assert!(cards.is_empty());
}

#[tokio::test]
async fn empty_query_skips_remote_call() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let base = spawn_catalog(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        (200, PIKACHU_LIST.to_string())
    })
    .await;

    let client = client_for(base);
    assert!(client.search_by_name("").await.unwrap().is_empty());
    assert!(client.search_by_id("").await.unwrap().is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn null_payload_is_empty_result() {
    let base = spawn_catalog(|_, _| (200, "null".to_string())).await;
    let cards = client_for(base).search_by_name("Nothing").await.unwrap();
    assert!(cards.is_empty());
}

#[tokio::test]
async fn server_error_is_reported() {
    let base = spawn_catalog(|_, _| (500, "{}".to_string())).await;
    let err = client_for(base).search_by_name("Pikachu").await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 500, .. }));
}

#[tokio::test]
async fn malformed_payload_is_reported() {
    let base = spawn_catalog(|_, _| (200, "<html>".to_string())).await;
    let err = client_for(base).search_by_name("Pikachu").await.unwrap_err();
    assert!(matches!(err, FetchError::Json(_)));
}

#[tokio::test]
async fn unreachable_catalog_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(format!("http://{addr}"))
        .search_by_id("base1-58")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Http(_)));
}

#[tokio::test]
async fn id_lookup_maps_full_record() {
    let base = spawn_catalog(|path, _| {
        assert_eq!(path, "/cards/base1-58");
        (200, PIKACHU_FULL.to_string())
    })
    .await;

    let card = client_for(base)
        .search_by_id("base1-58")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(card.set_id, "base1");
    assert_eq!(card.set_name, "Base Set");
    assert_eq!(card.card_type, "Lightning");
    assert_eq!(card.rarity, "Common");
}

#[tokio::test]
async fn id_lookup_not_found_is_none() {
    let base = spawn_catalog(|_, _| {
        (404, r#"{"error": "not found"}"#.to_string())
    })
    .await;
    assert!(client_for(base).search_by_id("nope-1").await.unwrap().is_none());
}

#[tokio::test]
async fn id_lookup_without_id_field_is_none() {
    let base = spawn_catalog(|_, _| (200, r#"{"name": "Ghost"}"#.to_string())).await;
    assert!(client_for(base).search_by_id("ghost-1").await.unwrap().is_none());
}

#[tokio::test]
async fn id_is_sent_as_encoded_path_segment() {
    let base = spawn_catalog(|path, _| {
        assert_eq!(path, "/cards/a%2Fb");
        (200, "{}".to_string())
    })
    .await;
    assert!(client_for(base).search_by_id("a/b").await.unwrap().is_none());
}

#[test]
fn base_url_with_trailing_slash_is_joined() {
    let client = client_for("http://localhost:9999/v2/en/".to_string());
    assert_eq!(client.cards_url().as_str(), "http://localhost:9999/v2/en/cards");
}

#[test]
fn invalid_base_url_is_config_error() {
    let result = TcgdexClient::new(ClientOptions {
        base_url: "not a url".to_string(),
        ..ClientOptions::default()
    });
    assert!(matches!(result, Err(FetchError::Config(_))));
}

#[tokio::test]
async fn slow_id_lookup_times_out() {
    let base = spawn_slow_catalog(Duration::from_secs(3), PIKACHU_FULL).await;
    let client = TcgdexClient::new(ClientOptions {
        base_url: base,
        id_timeout: Duration::from_millis(500),
        ..ClientOptions::default()
    })
    .unwrap();

    let err = client.search_by_id("base1-58").await.unwrap_err();
    assert!(err.is_timeout(), "{err}");
}

#[tokio::test]
async fn slow_name_search_times_out() {
    let base = spawn_slow_catalog(Duration::from_secs(3), PIKACHU_LIST).await;
    let client = TcgdexClient::new(ClientOptions {
        base_url: base,
        name_timeout: Duration::from_millis(500),
        ..ClientOptions::default()
    })
    .unwrap();

    let err = client.search_by_name("Pikachu").await.unwrap_err();
    assert!(err.is_timeout(), "{err}");
}

#[test]
fn default_timeouts_match_catalog_contract() {
    let options = ClientOptions::default();
    assert_eq!(options.name_timeout, Duration::from_secs(15));
    assert_eq!(options.id_timeout, Duration::from_secs(10));
}
