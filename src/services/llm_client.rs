use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::configuration::GeminiSettings;

const BODY_SNIPPET_LEN: usize = 512;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connection(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM client is misconfigured: {0}")]
    Configuration(String),
    #[error("failed to reach the LLM provider: {0}")]
    Transport(#[from] TransportError),
    #[error("LLM provider returned status {status}: {}", snippet(.body))]
    Provider { status: u16, body: String },
    #[error("unexpected response envelope from the LLM provider: {0}")]
    ResponseShape(String),
    #[error("LLM output is not valid JSON ({source}): {}", snippet(.text))]
    Decode {
        #[source]
        source: serde_json::Error,
        text: String,
    },
}

impl LlmError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LlmError::Transport(TransportError::Timeout))
    }
}

fn snippet(text: &str) -> &str {
    match text.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Everything one schema-constrained generation needs.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system_instruction: String,
    pub user_content: String,
    pub response_schema: Value,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Moves a JSON payload to the provider and hands back status and body untouched.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        payload: &Value,
    ) -> Result<RawResponse, TransportError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("cannot build HTTP client: {}", e)))?;

        Ok(ReqwestTransport { client })
    }
}

fn transport_error(e: reqwest::Error) -> TransportError {
    match e.is_timeout() {
        true => TransportError::Timeout,
        false => TransportError::Connection(e.to_string()),
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        payload: &Value,
    ) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(payload)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;

        Ok(RawResponse { status, body })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
    system_instruction: RequestContent<'a>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn build_payload(request: &LlmRequest) -> Result<Value, LlmError> {
    let payload = GenerateContentRequest {
        contents: [RequestContent {
            role: Some("user"),
            parts: [RequestPart {
                text: &request.user_content,
            }],
        }],
        system_instruction: RequestContent {
            role: None,
            parts: [RequestPart {
                text: &request.system_instruction,
            }],
        },
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: &request.response_schema,
            temperature: request.temperature,
        },
    };

    serde_json::to_value(payload)
        .map_err(|e| LlmError::Configuration(format!("cannot encode request: {}", e)))
}

fn candidate_text(body: &str) -> Result<String, LlmError> {
    let envelope: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::ResponseShape(format!("envelope is not JSON: {}", e)))?;

    let candidate = envelope
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::ResponseShape("no candidates".to_string()))?;

    candidate
        .content
        .ok_or_else(|| LlmError::ResponseShape("candidate has no content".to_string()))?
        .parts
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::ResponseShape("content has no parts".to_string()))?
        .text
        .ok_or_else(|| LlmError::ResponseShape("first part has no text".to_string()))
}

/// Client for Gemini's `generateContent` with JSON-constrained output.
///
/// Construction validates the credential, so a client that exists can always
/// attempt a call. One call is one HTTP request: no retries, no caching.
#[derive(Clone)]
pub struct GeminiClient {
    transport: Arc<dyn Transport>,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings) -> Result<Self, LlmError> {
        // Check the key before building anything that could touch the network.
        validated_key(settings)?;
        let transport = ReqwestTransport::new(settings.timeout())?;
        GeminiClient::with_transport(settings, Arc::new(transport))
    }

    pub fn with_transport(
        settings: &GeminiSettings,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, LlmError> {
        let api_key = validated_key(settings)?;

        Ok(GeminiClient {
            transport,
            endpoint: settings.endpoint(),
            model: settings.model.clone(),
            api_key,
        })
    }

    pub async fn generate_json(&self, request: &LlmRequest) -> Result<Value, LlmError> {
        if !(0.0..=1.0).contains(&request.temperature) {
            return Err(LlmError::Configuration(format!(
                "temperature must be within [0, 1], got {}",
                request.temperature
            )));
        }

        let payload = build_payload(request)?;
        log::info!(
            "Calling {} ({} chars of user content)",
            self.model,
            request.user_content.chars().count()
        );

        let response = self
            .transport
            .post_json(&self.endpoint, &self.api_key, &payload)
            .await
            .inspect_err(|e| log::error!("Transport failure calling {}: {}", self.model, e))?;
        log::info!("{} answered with status {}", self.model, response.status);

        if !(200..300).contains(&response.status) {
            log::warn!(
                "{} answered with status {}: {}",
                self.model,
                response.status,
                snippet(&response.body)
            );
            return Err(LlmError::Provider {
                status: response.status,
                body: response.body,
            });
        }

        let text = candidate_text(&response.body).inspect_err(|e| log::warn!("{}", e))?;

        serde_json::from_str(&text).map_err(|source| LlmError::Decode { source, text })
    }
}

fn validated_key(settings: &GeminiSettings) -> Result<String, LlmError> {
    settings
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            LlmError::Configuration(
                "no Gemini API key configured (set APP_GEMINI__API_KEY or GEMINI_API_KEY)"
                    .to_string(),
            )
        })
}
