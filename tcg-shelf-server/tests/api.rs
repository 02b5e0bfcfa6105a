use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::StatusCode;
use serde_json::{Value, json};
use tcg_shelf_core::CardRecord;
use tcg_shelf_db::CollectionStore;
use tcg_shelf_fetcher::{CardCatalog, Detail, FetchError, RawCard, card_from_raw};
use tcg_shelf_lib::CollectionManager;
use tcg_shelf_server::{Router, Server};

struct FakeCatalog {
    cards: Vec<RawCard>,
    offline: AtomicBool,
}

impl CardCatalog for FakeCatalog {
    async fn search_by_name(&self, query: &str) -> Result<Vec<CardRecord>, FetchError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::config("catalog offline"));
        }
        let needle = query.to_lowercase();
        Ok(self
            .cards
            .iter()
            .filter(|c| {
                c.name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .map(|c| card_from_raw(c, Detail::Brief))
            .collect())
    }

    async fn search_by_id(&self, id: &str) -> Result<Option<CardRecord>, FetchError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::config("catalog offline"));
        }
        Ok(self
            .cards
            .iter()
            .find(|c| c.id.as_deref() == Some(id))
            .map(|c| card_from_raw(c, Detail::Full)))
    }
}

const CATALOG: &str = r#"[
    {"id": "base1-58", "name": "Pikachu", "image": "https://assets.tcgdex.net/en/base/base1/58",
     "rarity": "Common", "types": ["Lightning"], "set": {"id": "base1", "name": "Base Set"}},
    {"id": "base1-14", "name": "Raichu", "image": "https://assets.tcgdex.net/en/base/base1/14",
     "rarity": "Rare", "types": ["Lightning"], "set": {"id": "base1", "name": "Base Set"}},
    {"id": "base1-44", "name": "Bulbasaur",
     "rarity": "Common", "types": ["Grass"], "set": {"id": "base1", "name": "Base Set"}},
    {"id": "promo-1", "name": "Setless Pikachu"},
    {"id": "a b", "name": "Spaced Out", "set": {"id": "odd", "name": "Odd Set"}}
]"#;

struct TestServer {
    base: String,
    http: reqwest::Client,
    manager: Arc<CollectionManager<FakeCatalog>>,
}

impl TestServer {
    async fn start() -> Self {
        let catalog = FakeCatalog {
            cards: serde_json::from_str(CATALOG).unwrap(),
            offline: AtomicBool::new(false),
        };
        let manager = Arc::new(CollectionManager::new(
            catalog,
            CollectionStore::open_memory().unwrap(),
        ));
        let server = Server::bind("127.0.0.1:0", Router::new(Arc::clone(&manager)))
            .await
            .unwrap();
        let base = format!("http://{}/collection-api", server.local_addr().unwrap());
        tokio::spawn(server.serve());
        Self {
            base,
            http: reqwest::Client::new(),
            manager,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn go_offline(&self) {
        self.manager.catalog().offline.store(true, Ordering::SeqCst);
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.http.get(self.url(path)).send().await.unwrap();
        (resp.status(), resp.json().await.unwrap())
    }

    async fn post(&self, body: &Value) -> (StatusCode, Value) {
        let resp = self
            .http
            .post(self.url("/collection"))
            .json(body)
            .send()
            .await
            .unwrap();
        (resp.status(), resp.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.http.delete(self.url(path)).send().await.unwrap();
        (resp.status(), resp.json().await.unwrap())
    }
}

#[tokio::test]
async fn search_by_name_statuses() {
    let srv = TestServer::start().await;

    let (status, body) = srv.get("/search-by-name").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = srv.get("/search-by-name?name=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = srv.get("/search-by-name?name=Mewtwo").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No cards found matching 'Mewtwo'");

    let (status, body) = srv.get("/search-by-name?name=pika").await;
    assert_eq!(status, StatusCode::OK);
    let cards = body.as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["id"], "base1-58");
    assert_eq!(
        cards[0]["image_url"],
        "https://assets.tcgdex.net/en/base/base1/58/high.webp"
    );
    assert_eq!(cards[0]["set"], "N/A");
    assert_eq!(cards[0]["type"], "N/A");

    srv.go_offline();
    let (status, body) = srv.get("/search-by-name?name=pika").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn search_by_id_statuses() {
    let srv = TestServer::start().await;

    let (status, _) = srv.get("/search-by-id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = srv.get("/search-by-id?id=nope-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No card found with ID 'nope-1'");

    let (status, body) = srv.get("/search-by-id?id=base1-58").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["set"], "Base Set");
    assert_eq!(body["set_id"], "base1");
    assert_eq!(body["type"], "Lightning");
    assert_eq!(body["rarity"], "Common");

    let (status, body) = srv.get("/search-by-id?id=a+b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "a b");

    srv.go_offline();
    let (status, _) = srv.get("/search-by-id?id=base1-58").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn save_list_and_delete() {
    let srv = TestServer::start().await;

    let (status, body) = srv.get("/collection").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    for id in ["base1-58", "base1-14", "base1-44"] {
        let submitted = json!({ "id": id, "name": "ignored", "set": null, "rarity": null });
        let (status, body) = srv.post(&submitted).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert!(body["message"].as_str().unwrap().contains("successfully added"));
    }

    let (status, body) = srv.post(&json!({ "id": "base1-58" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Card ID base1-58 is already in the collection.");

    let (status, body) = srv.get("/collection").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Bulbasaur", "Pikachu", "Raichu"]);
    assert_eq!(body[1]["set"], "Base Set");
    assert_eq!(body[1]["type"], "Lightning");

    let (_, body) = srv.get("/collection?name=CHU").await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = srv.get("/collection/base1-44").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Bulbasaur");
    assert_eq!(body["image_url"], "placeholder.png");

    let (status, body) = srv.delete("/collection?id=base1-58").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Card ID base1-58 deleted.");

    let (status, body) = srv.delete("/collection?id=base1-58").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Card ID base1-58 not found.");

    let (status, _) = srv.delete("/collection").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = srv.get("/collection/base1-58").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn rejected_saves() {
    let srv = TestServer::start().await;

    let (status, body) = srv.post(&json!({ "name": "Pikachu" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid card data provided");

    let resp = srv
        .http
        .post(srv.url("/collection"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let (status, body) = srv.post(&json!({ "id": "" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("missing/invalid id"));

    let (status, body) = srv.post(&json!({ "id": "nope-1" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("cannot find full data"));

    let (status, body) = srv.post(&json!({ "id": "promo-1" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("missing set id"));

    srv.go_offline();
    let (status, _) = srv.post(&json!({ "id": "base1-58" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = srv.get("/collection").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn item_path_is_percent_decoded() {
    let srv = TestServer::start().await;
    let (status, _) = srv.post(&json!({ "id": "a b" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = srv.get("/collection/a%20b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["set"], "Odd Set");
}

#[tokio::test]
async fn routing_and_cors() {
    let srv = TestServer::start().await;

    let resp = srv
        .http
        .request(reqwest::Method::OPTIONS, srv.url("/collection"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert!(
        resp.headers()["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .contains("DELETE")
    );

    let resp = srv.http.get(srv.url("/collection")).send().await.unwrap();
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(resp.headers()["content-type"], "application/json");

    let resp = srv.http.put(srv.url("/collection")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let resp = srv
        .http
        .post(srv.url("/search-by-name?name=pika"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let (status, body) = srv.get("/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("/collection-api/nowhere"));
}
