//! Plain-text documents on disk (local corpus, SECONDARY).
//!
//! Every `.txt` file directly under the corpus directory is scored by how
//! many distinct query terms it contains; the best file wins.

use crate::error::FetchResult;
use crate::text::{content_terms, truncate};
use scout_common::{Adapter, EvidenceResult, SourceKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const NAME: &str = "local_corpus";
const SNIPPET_CHARS: usize = 500;

pub struct LocalCorpusAdapter {
    dir: PathBuf,
}

impl LocalCorpusAdapter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn lookup(&self, query: &str) -> FetchResult<EvidenceResult> {
        let terms = content_terms(query);
        if terms.is_empty() || !self.dir.is_dir() {
            return Ok(EvidenceResult::not_found(NAME));
        }
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %self.dir.display(), error = %e, "corpus unreadable");
                return Ok(EvidenceResult::not_found(NAME));
            }
        };

        let mut best: Option<(usize, PathBuf, String)> = None;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let Ok(content) = fs::read_to_string(&path) else {
                debug!(path = %path.display(), "skipping unreadable corpus file");
                continue;
            };
            let score = score_document(&content, &terms);
            if score == 0 {
                continue;
            }
            // Ties go to the lexically first path so results are stable
            let better = match &best {
                None => true,
                Some((s, p, _)) => score > *s || (score == *s && path < *p),
            };
            if better {
                best = Some((score, path, content));
            }
        }

        Ok(match best {
            Some((score, path, content)) => evidence(score, &path, &content),
            None => EvidenceResult::not_found(NAME),
        })
    }
}

impl Adapter for LocalCorpusAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::LocalCorpus
    }

    fn fetch(&self, query: &str) -> EvidenceResult {
        self.lookup(query).unwrap_or_else(|e| e.into_evidence(NAME))
    }
}

/// Number of distinct terms present in `content`
pub fn score_document(content: &str, terms: &[String]) -> usize {
    let lower = content.to_lowercase();
    let mut seen: Vec<&str> = Vec::new();
    for term in terms {
        if !seen.contains(&term.as_str()) && lower.contains(term.as_str()) {
            seen.push(term);
        }
    }
    seen.len()
}

fn evidence(score: usize, path: &Path, content: &str) -> EvidenceResult {
    let confidence = (0.4 + 0.05 * score as f64).min(0.9);
    EvidenceResult::found(NAME, truncate(content, SNIPPET_CHARS), confidence)
        .with_url(path.display().to_string())
        .with_meta("score", score as u64)
}
