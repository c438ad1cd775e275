//! Correction Loop.
//!
//! A disputed topic is re-verified with the cache bypassed. Every attempt is
//! logged as a `DisputeRecord`, found or not. New evidence replaces the stored
//! fact wholesale and marks it corrected; otherwise the old fact stays.

use crate::disputes::{DisputeLog, DisputeRecord};
use crate::error::Result;
use crate::fact_store::{FactMetadata, FactStore};
use crate::orchestrator::{Scout, SearchRequest};
use crate::policy::SearchPolicy;
use crate::types::{Metadata, TruthResult};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum CorrectionOutcome {
    /// New evidence replaced the fact
    Resolved {
        topic: String,
        dispute_id: Uuid,
        truth: TruthResult,
    },
    /// Logged, but no independent evidence was found; the old fact is untouched
    Unresolved { topic: String, dispute_id: Uuid },
    /// Neither an explicit nor a recent topic was available
    NoTopic,
}

/// Stores the correction loop reads and writes
pub struct CorrectionContext<'a> {
    pub scout: &'a mut Scout,
    pub facts: &'a mut FactStore,
    pub disputes: &'a mut DisputeLog,
}

/// Re-verify `topic` against fresh evidence and record the dispute.
///
/// Fails only if the dispute or the corrected fact cannot be persisted.
pub fn apply_correction(
    ctx: &mut CorrectionContext<'_>,
    topic: Option<&str>,
    correction_text: &str,
    policy: Option<&SearchPolicy>,
) -> Result<CorrectionOutcome> {
    let Some(topic) = topic.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(CorrectionOutcome::NoTopic);
    };

    let truth = ctx.scout.search(
        &SearchRequest::new(topic)
            .ignore_cache(true)
            .with_policy(policy),
    );

    let old = ctx.facts.get(topic).cloned();
    let record = DisputeRecord {
        id: Uuid::new_v4(),
        topic: topic.to_string(),
        user_correction_text: correction_text.to_string(),
        old_summary: old.as_ref().map(|f| f.summary.clone()),
        old_metadata: old
            .as_ref()
            .map(|f| fact_metadata_map(&f.metadata))
            .unwrap_or_default(),
        new_evidence_summary: truth.is_found().then(|| truth.canonical_summary.clone()),
        new_evidence_source: truth.is_found().then(|| truth.source_name.clone()),
        new_evidence_confidence: truth.confidence,
        created_at: Utc::now(),
    };
    let dispute_id = record.id;
    ctx.disputes.append(record)?;

    if !truth.is_found() {
        info!(topic, "correction logged, no new evidence");
        return Ok(CorrectionOutcome::Unresolved {
            topic: topic.to_string(),
            dispute_id,
        });
    }

    ctx.facts.put(
        topic,
        &truth.canonical_summary,
        FactMetadata {
            source: truth.source_name.clone(),
            confidence: truth.confidence,
            url: truth.url.clone(),
            corrected: true,
        },
    )?;
    info!(topic, source = %truth.source_name, "fact corrected");
    Ok(CorrectionOutcome::Resolved {
        topic: topic.to_string(),
        dispute_id,
        truth,
    })
}

fn fact_metadata_map(meta: &FactMetadata) -> Metadata {
    match serde_json::to_value(meta) {
        Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
        _ => Metadata::new(),
    }
}
