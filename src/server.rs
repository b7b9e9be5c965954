//! HTTP surface: router, shared state, and response assembly.
//!
//! Public contract: every handled request answers HTTP 200, carrying degraded
//! outcomes (validation messages, provider errors, FAQ fallbacks) in the answer
//! text. 4xx only occurs for transport-level malformed JSON, via the extractor.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::provider::{GeminiProvider, HuggingFaceProvider};
use crate::request::AskRequest;
use crate::resolver::{self, AnswerResult};
use crate::search::{SearchClient, SearchResult};
use crate::{config, request};

const EMPTY_ANSWER_FALLBACK: &str = "Sorry, I couldn't find an answer.";
const LANDING_PAGE: &str = include_str!("../static/index.html");

/// Shared across handlers. Each adapter is present only when its credentials
/// were configured at startup.
pub struct AppState {
    pub search: Option<SearchClient>,
    pub gemini: Option<GeminiProvider>,
    pub huggingface: Option<HuggingFaceProvider>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub sources: Vec<SearchResult>,
}

impl From<AnswerResult> for AnswerResponse {
    fn from(result: AnswerResult) -> Self {
        let answer = if result.answer.trim().is_empty() {
            EMPTY_ANSWER_FALLBACK.to_string()
        } else {
            result.answer
        };
        Self {
            answer,
            sources: result.sources,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/api/v1/search_answer", post(search_answer))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn run(state: AppState) -> std::io::Result<()> {
    let addr = config::bind_addr();
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{addr}");
    axum::serve(listener, app).await
}

async fn home() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

async fn search_answer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskRequest>,
) -> Json<AnswerResponse> {
    let question = match request::normalize(&body) {
        Ok(question) => question,
        Err(e) => {
            return Json(AnswerResponse {
                answer: e.to_string(),
                sources: Vec::new(),
            });
        }
    };

    let result = resolver::resolve(
        state.search.as_ref(),
        state.gemini.as_ref(),
        state.huggingface.as_ref(),
        &question,
    )
    .await;

    Json(result.into())
}
