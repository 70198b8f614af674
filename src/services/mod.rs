pub mod llm_client;
pub mod restaurant_matcher;
pub mod review_analyzer;
#[cfg(test)]
pub(crate) mod stub_transport;

pub use llm_client::{GeminiClient, LlmError, LlmRequest, RawResponse, Transport, TransportError};
pub use restaurant_matcher::{search_in_store, search_restaurants, SearchError};
pub use review_analyzer::{analyze_review_text, AnalysisError};
