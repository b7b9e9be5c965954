mod config;
mod faq;
mod provider;
mod request;
mod resolver;
mod search;
mod server;

pub const USER_AGENT: &str = concat!("medibot/", env!("CARGO_PKG_VERSION"));

use std::time::Duration;

use reqwest::Client;
use tracing::info;

use provider::{GeminiProvider, HuggingFaceProvider};
use search::SearchClient;
use server::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medibot=info".parse()?),
        )
        .init();

    let http = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()?;

    let state = AppState {
        search: SearchClient::from_env(http.clone()),
        gemini: GeminiProvider::from_env(http.clone()),
        huggingface: HuggingFaceProvider::from_env(http),
    };

    info!(
        search = state.search.is_some(),
        gemini = state.gemini.is_some(),
        huggingface = state.huggingface.is_some(),
        "starting medibot"
    );

    server::run(state).await?;
    Ok(())
}
