//! Self-referential questions about the assistant itself.
//!
//! Each question maps to a canonical slot with a fixed answer. These never
//! go to retrieval and are never time-sensitive.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySlot {
    WhoAreYou,
    Purpose,
    Capabilities,
    KnowledgeSource,
    Limitations,
    Creator,
}

impl IdentitySlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentitySlot::WhoAreYou => "who_are_you",
            IdentitySlot::Purpose => "purpose",
            IdentitySlot::Capabilities => "capabilities",
            IdentitySlot::KnowledgeSource => "knowledge_source",
            IdentitySlot::Limitations => "limitations",
            IdentitySlot::Creator => "creator",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "who_are_you" => Some(IdentitySlot::WhoAreYou),
            "purpose" => Some(IdentitySlot::Purpose),
            "capabilities" => Some(IdentitySlot::Capabilities),
            "knowledge_source" => Some(IdentitySlot::KnowledgeSource),
            "limitations" => Some(IdentitySlot::Limitations),
            "creator" => Some(IdentitySlot::Creator),
            _ => None,
        }
    }

    /// Fixed answer naming the configured assistant
    pub fn answer(&self, name: &str) -> String {
        match self {
            IdentitySlot::WhoAreYou => format!(
                "I'm {}, a research assistant that looks things up in trusted sources and tells you where each answer came from.",
                name
            ),
            IdentitySlot::Purpose => format!(
                "{} exists to answer questions with evidence: it checks structured sources first, then encyclopedias, then news, and says so when it cannot find a reliable answer.",
                name
            ),
            IdentitySlot::Capabilities => "I can look up facts, current prices, weather, sports results, news headlines and bestseller lists. I remember what you ask me to remember, and I learn from your corrections.".to_string(),
            IdentitySlot::KnowledgeSource => "My answers come from public sources such as Wikidata, Wikipedia, news feeds and dedicated sports, finance and weather services, plus anything I've stored from earlier lookups.".to_string(),
            IdentitySlot::Limitations => "I only know what my sources return. When they disagree or come up empty I'll tell you instead of guessing, and I won't name a winner from a news snippet alone.".to_string(),
            IdentitySlot::Creator => format!("{} was built by an independent open-source team.", name),
        }
    }
}
