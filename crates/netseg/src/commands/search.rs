//! Search command handler.

use std::fmt::Write as _;

use tabled::Tabled;

use netseg_core::model::{RuleHit, SegmentHit};
use netseg_core::{Analyzer, MemoryStore, SearchResults, SearchScope};

use crate::cli::{GlobalOpts, SearchArgs, SearchKind};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SegmentHitRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Segment")]
    name: String,
    #[tabled(rename = "IP Range")]
    ip_range: String,
    #[tabled(rename = "Zone")]
    zone_type: String,
}

impl From<&SegmentHit> for SegmentHitRow {
    fn from(h: &SegmentHit) -> Self {
        Self {
            id: h.id.to_string(),
            name: h.name.clone(),
            ip_range: h.ip_range.clone(),
            zone_type: h.zone_type.clone(),
        }
    }
}

#[derive(Tabled)]
struct RuleHitRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Rule")]
    rule_name: String,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Action")]
    action: String,
}

impl From<&RuleHit> for RuleHitRow {
    fn from(h: &RuleHit) -> Self {
        Self {
            id: h.id.to_string(),
            rule_name: h.rule_name.clone(),
            protocol: h.protocol.to_string(),
            action: h.action.to_string(),
        }
    }
}

fn results_detail(results: &SearchResults, scope: SearchScope) -> String {
    let mut out = String::new();
    if scope != SearchScope::Rules {
        let rows: Vec<SegmentHitRow> = results.segments.iter().map(SegmentHitRow::from).collect();
        let _ = writeln!(out, "Segments ({})", rows.len());
        let _ = writeln!(out, "{}", output::render_table(&rows));
    }
    if scope != SearchScope::Segments {
        if !out.is_empty() {
            out.push('\n');
        }
        let rows: Vec<RuleHitRow> = results.rules.iter().map(RuleHitRow::from).collect();
        let _ = writeln!(out, "Rules ({})", rows.len());
        let _ = writeln!(out, "{}", output::render_table(&rows));
    }
    out.trim_end().to_owned()
}

/// `segment <id>` / `rule <id>` lines.
fn results_plain(results: &SearchResults) -> String {
    results
        .segments
        .iter()
        .map(|s| format!("segment {}", s.id))
        .chain(results.rules.iter().map(|r| format!("rule {}", r.id)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn handle(
    analyzer: &Analyzer<MemoryStore>,
    args: SearchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.query.trim().is_empty() {
        return Err(CliError::Validation {
            field: "query".into(),
            reason: "search text must not be empty".into(),
        });
    }
    let scope = match args.kind {
        None => SearchScope::All,
        Some(SearchKind::Segment) => SearchScope::Segments,
        Some(SearchKind::Rule) => SearchScope::Rules,
    };
    let results = analyzer.search(&args.query, scope).await?;
    let out = output::render_single(
        global.output_format(),
        &results,
        |r| results_detail(r, scope),
        results_plain,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
