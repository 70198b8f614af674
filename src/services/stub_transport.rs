use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::llm_client::{RawResponse, Transport, TransportError};
use crate::configuration::GeminiSettings;

#[derive(Debug, Clone)]
pub struct SentRequest {
    pub url: String,
    pub api_key: String,
    pub payload: Value,
}

/// Replays canned responses in order and records what was sent.
pub struct StubTransport {
    responses: Mutex<Vec<Result<RawResponse, TransportError>>>,
    sent: Mutex<Vec<SentRequest>>,
}

impl StubTransport {
    pub fn new(responses: Vec<Result<RawResponse, TransportError>>) -> Arc<Self> {
        Arc::new(StubTransport {
            responses: Mutex::new(responses.into_iter().rev().collect()),
            sent: Mutex::new(vec![]),
        })
    }

    pub fn ok(body: String) -> Arc<Self> {
        StubTransport::with_status(200, &body)
    }

    pub fn with_status(status: u16, body: &str) -> Arc<Self> {
        StubTransport::new(vec![Ok(RawResponse {
            status,
            body: body.to_string(),
        })])
    }

    pub fn failing(error: TransportError) -> Arc<Self> {
        StubTransport::new(vec![Err(error)])
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<SentRequest> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        payload: &Value,
    ) -> Result<RawResponse, TransportError> {
        self.sent.lock().unwrap().push(SentRequest {
            url: url.to_string(),
            api_key: api_key.to_string(),
            payload: payload.clone(),
        });

        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(TransportError::Connection("no canned response left".into())))
    }
}

/// Wraps `text` the way Gemini wraps the first candidate's output.
pub fn envelope(text: &str) -> String {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

pub fn settings(api_key: Option<&str>) -> GeminiSettings {
    GeminiSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        model: "gemini-test".to_string(),
        api_key: api_key.map(str::to_string),
        timeout_milliseconds: 1_000,
    }
}
