//! Generative-text provider adapters and the failover error taxonomy.

mod gemini;
mod huggingface;
mod prompt;

pub use gemini::GeminiProvider;
pub use huggingface::HuggingFaceProvider;
pub use prompt::build_prompt;

/// Closed error kinds shared by every provider adapter. Failover policy
/// dispatches on `is_quota`, never on error-message contents.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API rate limit exceeded. Please retry later.")]
    RateLimited,

    #[error("API quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("provider returned an empty completion")]
    EmptyCompletion,
}

impl ProviderError {
    /// Only quota-kind failures move the chain on to the next provider; every
    /// other failure is surfaced to the caller as the answer text.
    pub fn is_quota(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited | ProviderError::QuotaExhausted(_)
        )
    }
}

/// Abstraction over a completion call. Implemented by `GeminiProvider` and
/// `HuggingFaceProvider` for production; mock implementations used in tests.
pub trait AnswerProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}
