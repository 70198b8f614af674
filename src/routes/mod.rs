pub mod default_route;
pub mod restaurant_route;
pub mod review_route;
pub mod search_route;

use actix_web::{http::StatusCode, HttpResponse};
use serde_json::json;

use crate::services::LlmError;

/// Upstream trouble is the gateway's problem, not the client's.
fn llm_error_status(e: &LlmError) -> StatusCode {
    match e {
        LlmError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        e if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn error_body(status: StatusCode, message: String) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message }))
}
