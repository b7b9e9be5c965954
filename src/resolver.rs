//! The answer-resolution chain: greeting short-circuit, web search, primary
//! provider, secondary provider on quota exhaustion, static FAQ fallback.

use tracing::{debug, warn};

use crate::faq;
use crate::provider::{AnswerProvider, build_prompt};
use crate::request::NormalizedQuestion;
use crate::search::{SearchClient, SearchResult, format_citation_block};

/// The unit returned to the transport layer. `sources` always comes from the
/// single search call made for this request, or is empty.
#[derive(Debug)]
pub struct AnswerResult {
    pub answer: String,
    pub sources: Vec<SearchResult>,
}

impl AnswerResult {
    fn without_sources(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
        }
    }
}

/// Resolves a question through the ordered provider chain.
///
/// Policy, short-circuiting on first success:
/// 1. greeting words answer immediately, with no outbound call at all;
/// 2. the primary provider's completion wins when it succeeds;
/// 3. a quota-kind primary failure hands the same prompt to the secondary,
///    while any other primary failure is surfaced as the answer text;
/// 4. with no provider left, the FAQ table is scanned in definition order,
///    and a fixed deflection covers everything else.
///
/// A search failure only costs the citations; it never fails the request.
pub async fn resolve(
    search: Option<&SearchClient>,
    primary: Option<&impl AnswerProvider>,
    secondary: Option<&impl AnswerProvider>,
    question: &NormalizedQuestion,
) -> AnswerResult {
    if faq::is_greeting(&question.text) {
        debug!("greeting short-circuit");
        return AnswerResult::without_sources(faq::GREETING_REPLY);
    }

    let results = match search {
        Some(client) => match client.search(&question.text).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "search failed, answering without citations");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let citation_block = format_citation_block(&results);
    let prompt = build_prompt(
        &question.text,
        &citation_block,
        question.prior_topic_for_followup(),
    );

    if let Some(provider) = primary {
        match provider.complete(&prompt).await {
            Ok(answer) => {
                return AnswerResult {
                    answer,
                    sources: results,
                };
            }
            Err(e) if e.is_quota() => {
                warn!(error = %e, "primary provider exhausted, failing over");
            }
            Err(e) => {
                warn!(error = %e, "primary provider failed");
                return AnswerResult::without_sources(e.to_string());
            }
        }
    }

    if let Some(provider) = secondary {
        match provider.complete(&prompt).await {
            Ok(answer) => {
                return AnswerResult {
                    answer,
                    sources: results,
                };
            }
            Err(e) => {
                warn!(error = %e, "secondary provider failed");
                return AnswerResult::without_sources(e.to_string());
            }
        }
    }

    match faq::faq_answer(&question.text) {
        Some(answer) => AnswerResult::without_sources(answer),
        None => AnswerResult::without_sources(faq::DEFLECTION),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use reqwest::Client;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::provider::ProviderError;

    enum Reply {
        Text(&'static str),
        RateLimited,
        Quota,
        Broken,
    }

    struct MockProvider {
        reply: Reply,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl MockProvider {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_prompt(&self) -> Option<String> {
            self.last_prompt.lock().unwrap().clone()
        }
    }

    impl AnswerProvider for MockProvider {
        async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::RateLimited => Err(ProviderError::RateLimited),
                Reply::Quota => Err(ProviderError::QuotaExhausted("billing".into())),
                Reply::Broken => Err(ProviderError::Api {
                    code: 400,
                    message: "invalid request".into(),
                }),
            }
        }
    }

    fn question(text: &str) -> NormalizedQuestion {
        NormalizedQuestion::from_text(text)
    }

    async fn search_stub(items: serde_json::Value) -> (MockServer, SearchClient) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": items })),
            )
            .mount(&server)
            .await;
        let client = SearchClient::with_base_url(Client::new(), &server.uri());
        (server, client)
    }

    #[tokio::test]
    async fn greeting_skips_search_and_providers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let search = SearchClient::with_base_url(Client::new(), &server.uri());
        let primary = MockProvider::new(Reply::Text("unused"));

        let result = resolve(
            Some(&search),
            Some(&primary),
            None::<&MockProvider>,
            &question("hello"),
        )
        .await;

        assert_eq!(result.answer, faq::GREETING_REPLY);
        assert!(result.sources.is_empty());
        assert_eq!(primary.calls(), 0);
    }

    #[tokio::test]
    async fn primary_success_returns_text_and_sources() {
        let (_server, search) = search_stub(serde_json::json!([
            {"title": "T", "snippet": "S", "link": "https://t.example"}
        ]))
        .await;
        let primary = MockProvider::new(Reply::Text("answer [1]"));

        let result = resolve(
            Some(&search),
            Some(&primary),
            None::<&MockProvider>,
            &question("what is flu?"),
        )
        .await;

        assert_eq!(result.answer, "answer [1]");
        assert_eq!(result.sources.len(), 1);
        assert!(primary.last_prompt().unwrap().contains("1. T"));
    }

    #[tokio::test]
    async fn quota_failure_hands_same_citation_block_to_secondary() {
        let (_server, search) = search_stub(serde_json::json!([
            {"title": "T", "snippet": "S", "link": "https://t.example"}
        ]))
        .await;
        let primary = MockProvider::new(Reply::Quota);
        let secondary = MockProvider::new(Reply::Text("backup answer"));

        let result = resolve(
            Some(&search),
            Some(&primary),
            Some(&secondary),
            &question("what is flu?"),
        )
        .await;

        assert_eq!(result.answer, "backup answer");
        assert_eq!(result.sources.len(), 1);
        assert_eq!(secondary.calls(), 1);
        assert_eq!(primary.last_prompt(), secondary.last_prompt());
    }

    #[tokio::test]
    async fn rate_limit_also_fails_over() {
        let primary = MockProvider::new(Reply::RateLimited);
        let secondary = MockProvider::new(Reply::Text("backup"));

        let result = resolve(
            None,
            Some(&primary),
            Some(&secondary),
            &question("what is flu?"),
        )
        .await;

        assert_eq!(result.answer, "backup");
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn functional_primary_error_never_reaches_secondary() {
        let primary = MockProvider::new(Reply::Broken);
        let secondary = MockProvider::new(Reply::Text("unused"));

        let result = resolve(
            None,
            Some(&primary),
            Some(&secondary),
            &question("what is flu?"),
        )
        .await;

        assert_eq!(result.answer, "API error (400): invalid request");
        assert!(result.sources.is_empty());
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn secondary_failure_surfaces_error_text() {
        let primary = MockProvider::new(Reply::Quota);
        let secondary = MockProvider::new(Reply::Broken);

        let result = resolve(
            None,
            Some(&primary),
            Some(&secondary),
            &question("what is flu?"),
        )
        .await;

        assert_eq!(result.answer, "API error (400): invalid request");
        assert!(result.sources.is_empty());
    }

    #[tokio::test]
    async fn no_providers_falls_to_faq_in_definition_order() {
        let result = resolve(
            None,
            None::<&MockProvider>,
            None::<&MockProvider>,
            &question("I have cold symptoms and a fever"),
        )
        .await;

        assert_eq!(result.answer, faq::FAQ_TABLE[0].1);
        assert!(result.sources.is_empty());
    }

    #[tokio::test]
    async fn quota_on_both_absent_secondary_falls_to_faq() {
        let primary = MockProvider::new(Reply::Quota);

        let result = resolve(
            None,
            Some(&primary),
            None::<&MockProvider>,
            &question("I have a headache"),
        )
        .await;

        let expected = faq::faq_answer("I have a headache").unwrap();
        assert_eq!(result.answer, expected);
    }

    #[tokio::test]
    async fn no_match_anywhere_returns_deflection() {
        let result = resolve(
            None,
            None::<&MockProvider>,
            None::<&MockProvider>,
            &question("how do vaccines work?"),
        )
        .await;

        assert_eq!(result.answer, faq::DEFLECTION);
        assert!(result.sources.is_empty());
    }

    #[tokio::test]
    async fn search_failure_degrades_to_no_citations() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let search = SearchClient::with_base_url(Client::new(), &server.uri());
        let primary = MockProvider::new(Reply::Text("answer without citations"));

        let result = resolve(
            Some(&search),
            Some(&primary),
            None::<&MockProvider>,
            &question("what is flu?"),
        )
        .await;

        assert_eq!(result.answer, "answer without citations");
        assert!(result.sources.is_empty());
        assert!(
            primary
                .last_prompt()
                .unwrap()
                .contains("Web results: none available.")
        );
    }
}
