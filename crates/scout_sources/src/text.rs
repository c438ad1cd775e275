//! Small text helpers shared by the adapters.

use scout_common::semantic::tokenize;

/// Question scaffolding stripped before a subject search
const LEADING_PHRASES: &[&str] = &[
    "who is the current",
    "what is the current",
    "who's the current",
    "tell me about",
    "definition of",
    "what is an",
    "what is a",
    "what is the",
    "what is",
    "what's",
    "what are",
    "who is the",
    "who is",
    "who was",
    "who's",
    "define",
    "explain",
];

/// Words that carry no subject for search backends
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "of", "in", "on", "for", "to", "is", "are", "was", "were", "who", "what",
    "when", "where", "which", "how", "did", "does", "do", "me", "tell", "about", "current",
    "currently", "latest", "today", "now", "last", "night", "this", "week", "year", "please",
];

/// Strip question scaffolding and trailing punctuation
pub fn subject_of(query: &str) -> String {
    let trimmed = query
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
    let lower = trimmed.to_lowercase();
    for phrase in LEADING_PHRASES {
        if let Some(rest) = lower.strip_prefix(phrase) {
            if rest.is_empty() || rest.starts_with(' ') {
                let start = trimmed.len().saturating_sub(rest.len());
                return trimmed.get(start..).unwrap_or(rest).trim().to_string();
            }
        }
    }
    trimmed.to_string()
}

/// Lower-case content words of `query`
pub fn content_terms(query: &str) -> Vec<String> {
    tokenize(query)
        .into_iter()
        .filter(|t| t.len() > 1 && !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

/// At most `max` characters, cut at a word boundary with "..." appended
pub fn truncate(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max).collect();
    let cut = match cut.rfind(' ') {
        Some(pos) if pos > max / 2 => &cut[..pos],
        _ => cut.as_str(),
    };
    format!("{}...", cut.trim_end_matches(|c: char| c.is_ascii_punctuation()))
}

/// `64250.123` -> `$64,250.12`
pub fn format_usd(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Remove the HTML tags some feeds embed in descriptions
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_of() {
        assert_eq!(subject_of("What is the Eiffel Tower?"), "Eiffel Tower");
        assert_eq!(subject_of("who is Ada Lovelace"), "Ada Lovelace");
        assert_eq!(subject_of("whatever works"), "whatever works");
        assert_eq!(subject_of("Rust"), "Rust");
    }

    #[test]
    fn test_content_terms() {
        assert_eq!(content_terms("who won the Giants game last night?"), vec!["won", "giants", "game"]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short  text", 50), "short text");
        let long = "word ".repeat(40);
        let cut = truncate(&long, 22);
        assert!(cut.ends_with("..."));
        assert!(cut.chars().count() <= 25);
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(64250.123), "$64,250.12");
        assert_eq!(format_usd(0.5), "$0.50");
        assert_eq!(format_usd(1234567.0), "$1,234,567.00");
        assert_eq!(format_usd(999.999), "$1,000.00");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
    }
}
