use actix_web::{http::StatusCode, post, web, HttpResponse, ResponseError};
use serde::Deserialize;

use super::{error_body, llm_error_status};
use crate::services::{analyze_review_text, AnalysisError, GeminiClient};

#[derive(Deserialize)]
struct AnalyzeReviewRequest {
    review: String,
}

impl ResponseError for AnalysisError {
    fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::Llm(e) => llm_error_status(e),
            AnalysisError::Validation(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), self.to_string())
    }
}

#[post("/analyze")]
pub async fn analyze_review(
    body: web::Json<AnalyzeReviewRequest>,
    gemini_client: web::Data<GeminiClient>,
) -> Result<HttpResponse, AnalysisError> {
    let rating = analyze_review_text(&gemini_client, &body.review).await?;
    Ok(HttpResponse::Ok().json(rating))
}
