//! Request-body normalization: extract the question to answer from either a
//! flat `{"question": ...}` payload or a chat-style message list.

use serde::Deserialize;

/// Body of `POST /api/v1/search_answer`. The flat form is tried first; a body
/// matching neither is rejected by the JSON extractor before we see it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AskRequest {
    Question { question: String },
    Conversation { messages: Vec<Message> },
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Input problems are user-correctable; their display text is returned as the
/// answer with a 200, never as an HTTP error.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Please enter a question.")]
    EmptyQuestion,

    #[error("No user message found in the conversation.")]
    MissingUserTurn,
}

/// The question to answer, plus the previous user turn (when the caller sent a
/// conversation) for pronoun disambiguation. Disambiguation context always comes
/// from the caller's payload; the process holds no cross-request state.
#[derive(Debug)]
pub struct NormalizedQuestion {
    pub text: String,
    prior_topic: Option<String>,
}

impl NormalizedQuestion {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prior_topic: None,
        }
    }

    /// The earlier user turn, only when the current question reads as a
    /// follow-up ("what causes it?"). Standalone questions get no extra context.
    pub fn prior_topic_for_followup(&self) -> Option<&str> {
        if is_followup(&self.text) {
            self.prior_topic.as_deref()
        } else {
            None
        }
    }
}

pub fn normalize(request: &AskRequest) -> Result<NormalizedQuestion, InputError> {
    match request {
        AskRequest::Question { question } => {
            let text = question.trim();
            if text.is_empty() {
                return Err(InputError::EmptyQuestion);
            }
            Ok(NormalizedQuestion::from_text(text))
        }
        AskRequest::Conversation { messages } => {
            let mut user_turns = messages.iter().rev().filter(|m| m.role == "user");
            let current = user_turns.next().ok_or(InputError::MissingUserTurn)?;
            let text = current.content.trim();
            if text.is_empty() {
                return Err(InputError::EmptyQuestion);
            }
            let prior_topic = user_turns
                .next()
                .map(|m| m.content.trim().to_string())
                .filter(|c| !c.is_empty());
            Ok(NormalizedQuestion {
                text: text.to_string(),
                prior_topic,
            })
        }
    }
}

const FOLLOWUP_PRONOUNS: &[&str] = &["it", "that", "this", "they", "them"];

fn is_followup(question: &str) -> bool {
    question
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| FOLLOWUP_PRONOUNS.contains(&word))
}
