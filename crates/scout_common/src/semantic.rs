//! Term vectors and cosine similarity for related-topic suggestions.

use std::collections::BTreeMap;

/// Term frequency vector keyed by lower-cased word
pub type TermVector = BTreeMap<String, f64>;

/// Lower-cased alphanumeric word tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

pub fn term_vector(text: &str) -> TermVector {
    let mut v = TermVector::new();
    for token in tokenize(text) {
        *v.entry(token).or_insert(0.0) += 1.0;
    }
    v
}

/// Cosine similarity in [0, 1]; 0 when either vector is empty
pub fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(k, x)| large.get(k).map(|y| x * y))
        .sum();
    let norm = |v: &TermVector| v.values().map(|x| x * x).sum::<f64>().sqrt();
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
