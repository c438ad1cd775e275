//! Terminal rendering for status and maintenance output.

use owo_colors::OwoColorize;
use scout_common::{EngineStatus, MaintenanceReport};
use std::fmt::Write;

/// Key column width
const KW: usize = 16;

fn label(key: &str, color: bool) -> String {
    let padded = format!("{:width$}", key, width = KW);
    if color {
        padded.bright_cyan().to_string()
    } else {
        padded
    }
}

pub fn render_status(status: &EngineStatus, color: bool) -> String {
    let mut out = String::new();
    let header = format!("scout v{}", scout_common::VERSION);
    if color {
        let _ = writeln!(out, "{}", header.bold());
    } else {
        let _ = writeln!(out, "{}", header);
    }
    let rows = [
        ("data_dir", status.data_dir.display().to_string()),
        ("cutoff", status.knowledge_cutoff.to_string()),
        ("facts", status.facts.to_string()),
        ("cache_entries", status.cache_entries.to_string()),
        ("unknowns", status.unknowns.to_string()),
        ("disputes", status.disputes.to_string()),
        ("policies", status.policies.to_string()),
        ("profile_facts", status.profile_facts.to_string()),
    ];
    for (key, value) in rows {
        let _ = writeln!(out, "{} {}", label(key, color), value);
    }
    let adapters = if status.adapters.is_empty() {
        "none".to_string()
    } else {
        status.adapters.join(", ")
    };
    let _ = writeln!(out, "{} {}", label("adapters", color), adapters);
    out
}

pub fn render_maintenance(report: &MaintenanceReport, days: i64, color: bool) -> String {
    let summary = format!(
        "pruned {} unknown queries and {} negative cache entries older than {} days",
        report.unknowns_pruned, report.cache_pruned, days
    );
    if color {
        summary.green().to_string()
    } else {
        summary
    }
}
