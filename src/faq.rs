//! Static fallback content: the greeting set and the ordered FAQ table.

/// Matched case-insensitively, exact or as the leading word(s) of the question.
pub const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

pub const GREETING_REPLY: &str =
    "Hello! I'm Medibot. Ask me a health question and I'll look it up for you.";

pub const DEFLECTION: &str = "I don't know. Please consult a medical professional.";

/// Scanned in definition order; the first keyword contained in the lowercased
/// question wins. Order is the documented priority, not an accident of a map.
pub const FAQ_TABLE: &[(&str, &str)] = &[
    (
        "cold symptoms",
        "Common cold symptoms include a runny nose, sore throat, sneezing, and a mild \
         cough. Rest and fluids usually help; see a doctor if symptoms last more than \
         ten days or get worse.",
    ),
    (
        "fever symptoms",
        "A temperature above 38\u{b0}C (100.4\u{b0}F), often with chills or sweating, \
         usually signals an infection. Stay hydrated and rest; seek care if it passes \
         39.4\u{b0}C (103\u{b0}F) or lasts more than three days.",
    ),
    (
        "sore throat",
        "Most sore throats are viral and clear up within a week. Warm drinks and \
         lozenges ease the pain; see a doctor for severe pain, trouble swallowing, or \
         a fever above 38\u{b0}C.",
    ),
    (
        "headache",
        "Tension headaches respond to rest, hydration, and over-the-counter pain \
         relief. A sudden severe headache, or one with fever, stiff neck, or vision \
         changes, needs urgent medical attention.",
    ),
    (
        "flu",
        "Influenza brings fever, body aches, fatigue, and a dry cough, typically for \
         one to two weeks. Rest, fluids, and staying home help; antivirals work best \
         within 48 hours of onset.",
    ),
];

/// A greeting bypasses search and every provider.
pub fn is_greeting(question: &str) -> bool {
    let q = question.trim().to_lowercase();
    GREETINGS.iter().any(|g| {
        q == *g || (q.starts_with(g) && !q[g.len()..].starts_with(|c: char| c.is_alphanumeric()))
    })
}

pub fn faq_answer(question: &str) -> Option<&'static str> {
    let lowered = question.to_lowercase();
    FAQ_TABLE
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, answer)| *answer)
}
