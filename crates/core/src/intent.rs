use regex::Regex;

/// Deterministic pre-classification of a user turn.
///
/// The hosted model still decides which tool to call; this classifier only
/// feeds logging and lets the chat loop annotate turns without a network
/// round-trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserIntent {
    SearchProducts { query: String },
    ProductDetails { id: String },
    Smalltalk,
}

#[derive(Clone, Debug)]
pub struct IntentClassifier {
    details_cue: Regex,
    id_token: Regex,
    search_cue: Regex,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self {
            details_cue: Regex::new(
                r"(?i)\b(?:details?|specs?|specifications?|info|information|stock|availability|available|price of|product|item)\b",
            )
            .expect("hard-coded details pattern compiles"),
            id_token: Regex::new(r"#?\b(\d{3,8})\b").expect("hard-coded id pattern compiles"),
            search_cue: Regex::new(
                r"(?i)\b(?:search(?: for)?|find(?: me)?|look(?:ing)? for|recommend(?: me)?|suggest|show me|browse|need|want(?: to buy)?|buy)\b\s+(.+)",
            )
            .expect("hard-coded search pattern compiles"),
        }
    }

    pub fn classify(&self, text: &str) -> UserIntent {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return UserIntent::Smalltalk;
        }

        if self.details_cue.is_match(trimmed) {
            if let Some(captures) = self.id_token.captures(trimmed) {
                if let Some(id) = captures.get(1) {
                    return UserIntent::ProductDetails { id: id.as_str().to_string() };
                }
            }
        }

        if let Some(captures) = self.search_cue.captures(trimmed) {
            if let Some(raw_query) = captures.get(1) {
                let query = clean_query(raw_query.as_str());
                if !query.is_empty() {
                    return UserIntent::SearchProducts { query };
                }
            }
        }

        UserIntent::Smalltalk
    }
}

fn clean_query(raw: &str) -> String {
    let mut query = raw.trim().trim_end_matches(['?', '!', '.']).trim();
    for article in ["a ", "an ", "some ", "the "] {
        if let Some(stripped) = strip_prefix_ignore_case(query, article) {
            query = stripped.trim();
            break;
        }
    }
    query.to_string()
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    if text.len() >= prefix.len() && text[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}
