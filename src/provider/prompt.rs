use std::fmt::Write;

const INSTRUCTION: &str = "You are a careful health information assistant. Answer the \
question using the numbered web results below. Cite the results you rely on inline as \
[1], [2], and so on, matching their numbers. If the results do not cover the question, \
say so plainly and suggest seeing a medical professional.";

/// Builds the single prompt given to whichever provider runs, embedding the
/// citation block so a `[n]` in the completion resolves to the nth result.
pub fn build_prompt(question: &str, citation_block: &str, prior_topic: Option<&str>) -> String {
    let mut prompt = String::from(INSTRUCTION);
    prompt.push_str("\n\n");

    if let Some(topic) = prior_topic {
        let _ = writeln!(prompt, "Earlier question, for context: {topic}\n");
    }

    if citation_block.is_empty() {
        prompt.push_str("Web results: none available.\n\n");
    } else {
        let _ = write!(prompt, "Web results:\n{citation_block}");
    }

    let _ = writeln!(prompt, "Question: {question}");
    prompt
}
