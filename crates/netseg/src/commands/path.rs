//! Path analysis command handler.

use std::fmt::Write as _;

use tabled::Tabled;

use netseg_core::model::{PathAnalysis, RuleApplied};
use netseg_core::{Analyzer, MemoryStore, PathQuery, SegmentId};

use crate::cli::{GlobalOpts, PathArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct HopRow {
    #[tabled(rename = "Hop")]
    hop: usize,
    #[tabled(rename = "Rule")]
    rule_id: String,
    #[tabled(rename = "Name")]
    rule_name: String,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Ports")]
    ports: String,
}

impl HopRow {
    fn new(hop: usize, rule: &RuleApplied) -> Self {
        Self {
            hop,
            rule_id: rule.rule_id.to_string(),
            rule_name: rule.rule_name.clone(),
            protocol: rule.protocol.to_string(),
            ports: util::or_dash(rule.port_range.as_deref()),
        }
    }
}

fn path_detail(result: &PathAnalysis, color: bool) -> String {
    if !result.reachable {
        return format!("Reachable: {}", output::bad("no", color));
    }
    let route = result
        .path
        .iter()
        .map(|stop| stop.segment_name.as_str())
        .collect::<Vec<_>>()
        .join(" -> ");
    let rows: Vec<HopRow> = result
        .rules_applied
        .iter()
        .enumerate()
        .map(|(i, rule)| HopRow::new(i + 1, rule))
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "Reachable: {}", output::good("yes", color));
    let _ = writeln!(out, "Path:      {route}");
    if rows.is_empty() {
        let _ = write!(out, "Rules:     - (same segment)");
    } else {
        let _ = write!(out, "{}", output::render_table(&rows));
    }
    out
}

/// Segment names along the path, one per line; empty when unreachable.
fn path_plain(result: &PathAnalysis) -> String {
    result
        .path
        .iter()
        .map(|stop| stop.segment_name.clone())
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn handle(
    analyzer: &Analyzer<MemoryStore>,
    args: PathArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut query = PathQuery::new(SegmentId(args.source), SegmentId(args.destination));
    if let Some(protocol) = args.protocol {
        query = query.protocol(util::map_protocol(protocol));
    }
    if let Some(port) = args.port {
        query = query.port(port);
    }

    let result = analyzer.path(&query).await?;
    let color = output::should_color(global.color_mode());
    let out = output::render_single(
        global.output_format(),
        &result,
        |r| path_detail(r, color),
        path_plain,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
