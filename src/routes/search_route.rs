use actix_web::{http::StatusCode, route, web, HttpResponse, ResponseError};
use serde::Deserialize;
use sqlx::SqlitePool;

use super::{error_body, llm_error_status};
use crate::services::{search_in_store, GeminiClient, SearchError};

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
}

impl ResponseError for SearchError {
    fn status_code(&self) -> StatusCode {
        match self {
            SearchError::EmptyQuery => StatusCode::BAD_REQUEST,
            SearchError::Llm(e) => llm_error_status(e),
            SearchError::Validation(_) => StatusCode::BAD_GATEWAY,
            SearchError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            SearchError::Store(e) => {
                log::error!("Failed to read restaurants for search: {}", e);
                error_body(self.status_code(), "Failed to read restaurants".to_string())
            }
            _ => error_body(self.status_code(), self.to_string()),
        }
    }
}

#[route("/search", method = "GET", method = "POST")]
pub async fn search_restaurants(
    body: web::Json<SearchRequest>,
    pool: web::Data<SqlitePool>,
    gemini_client: web::Data<GeminiClient>,
) -> Result<HttpResponse, SearchError> {
    let result = search_in_store(&pool, &gemini_client, &body.query)
        .await
        .inspect_err(|e| log::warn!("Search failed: {}", e))?;

    Ok(HttpResponse::Ok().json(result))
}
