//! Rewriter / generator collaborator.
//!
//! The engine hands raw evidence to a `LanguageModel` for phrasing. The
//! template model shipped here is a pure text transform.

/// Phrasing hints understood by `TemplateModel`
pub mod hint {
    pub const EXPLAIN: &str = "explain";
    pub const PRICE: &str = "price";
    pub const VERBATIM: &str = "verbatim";
}

pub trait LanguageModel: Send {
    /// Turn a raw summary into the final answer text
    fn rewrite(&self, question: &str, raw_summary: &str, source_label: &str, hint: Option<&str>) -> String;

    /// Free conversation when no lookup is warranted
    fn generate(&self, prompt: &str) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct TemplateModel {
    assistant_name: String,
}

impl TemplateModel {
    pub fn new(assistant_name: &str) -> Self {
        Self {
            assistant_name: assistant_name.to_string(),
        }
    }
}

impl LanguageModel for TemplateModel {
    fn rewrite(&self, question: &str, raw_summary: &str, source_label: &str, hint: Option<&str>) -> String {
        let summary = raw_summary.trim();
        if summary.is_empty() {
            return String::new();
        }
        match hint {
            Some(hint::VERBATIM) => summary.to_string(),
            Some(hint::EXPLAIN) => format!(
                "Here is a concise explanation of '{}', based on {}: {}",
                question.trim(),
                source_label,
                summary
            ),
            _ => format!("{} (source: {})", summary, source_label),
        }
    }

    fn generate(&self, prompt: &str) -> String {
        let lower = prompt.trim().to_lowercase();
        let greeting = ["hello", "hi", "hey", "good morning", "good evening"]
            .iter()
            .any(|g| lower == *g || lower.starts_with(&format!("{} ", g)) || lower.starts_with(&format!("{},", g)));
        if greeting {
            let name = if self.assistant_name.is_empty() {
                "your research assistant"
            } else {
                self.assistant_name.as_str()
            };
            return format!("Hello! I'm {}. Ask me a question and I'll look it up.", name);
        }
        if lower.starts_with("thank") {
            return "You're welcome.".to_string();
        }
        "I don't have a sourced answer for that. Ask me about a topic, a price, the weather, sports or the news and I'll look it up.".to_string()
    }
}
