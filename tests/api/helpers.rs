use std::{
    net::TcpListener,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use dinescore::{
    configuration::GeminiSettings,
    dal::restaurant_db,
    services::{GeminiClient, RawResponse, Transport, TransportError},
    startup::run,
};
use serde_json::{json, Value};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tempfile::TempDir;

/// Stands in for Gemini: replays canned answers and counts requests.
pub struct CannedGemini {
    responses: Mutex<Vec<Result<RawResponse, TransportError>>>,
    calls: Mutex<usize>,
}

impl CannedGemini {
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Transport for CannedGemini {
    async fn post_json(
        &self,
        _url: &str,
        _api_key: &str,
        _payload: &Value,
    ) -> Result<RawResponse, TransportError> {
        *self.calls.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(TransportError::Connection("no canned response".into())))
    }
}

pub fn model_answer(text: &str) -> Result<RawResponse, TransportError> {
    Ok(RawResponse {
        status: 200,
        body: json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        })
        .to_string(),
    })
}

pub fn provider_failure(status: u16, body: &str) -> Result<RawResponse, TransportError> {
    Ok(RawResponse {
        status,
        body: body.to_string(),
    })
}

pub struct TestApp {
    pub address: String,
    pub db_pool: SqlitePool,
    pub gemini: Arc<CannedGemini>,
    pub client: reqwest::Client,
    _db_dir: TempDir,
}

impl TestApp {
    pub async fn post_search(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/search", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_review(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/reviews/analyze", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Starts the app on a random port. `responses` are handed out in order.
pub async fn spawn_app(responses: Vec<Result<RawResponse, TransportError>>) -> TestApp {
    let db_dir = tempfile::tempdir().expect("Failed to create temp dir.");
    let options = SqliteConnectOptions::new()
        .filename(db_dir.path().join("restaurants.db"))
        .create_if_missing(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await
        .expect("Failed to open the database.");
    restaurant_db::init_db(&db_pool)
        .await
        .expect("Failed to create the restaurants table.");

    let gemini = Arc::new(CannedGemini {
        responses: Mutex::new(responses.into_iter().rev().collect()),
        calls: Mutex::new(0),
    });
    let settings = GeminiSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        model: "gemini-test".to_string(),
        api_key: Some("test-key".to_string()),
        timeout_milliseconds: 1_000,
    };
    let gemini_client = GeminiClient::with_transport(&settings, gemini.clone())
        .expect("Failed to build the Gemini client.");

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let server = run(listener, db_pool.clone(), gemini_client).expect("Failed to bind address");
    tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        db_pool,
        gemini,
        client: reqwest::Client::new(),
        _db_dir: db_dir,
    }
}
