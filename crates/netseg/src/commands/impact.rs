//! Rule impact command handler.

use std::fmt::Write as _;

use tabled::Tabled;

use netseg_core::model::{AffectedConnection, DependentPath, RuleImpact};
use netseg_core::{Analyzer, MemoryStore, RuleId};

use crate::cli::{GlobalOpts, ImpactArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ConnectionRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Ports")]
    port: String,
}

impl From<&AffectedConnection> for ConnectionRow {
    fn from(c: &AffectedConnection) -> Self {
        Self {
            source: c.source_segment.clone(),
            destination: c.destination_segment.clone(),
            protocol: c.protocol.to_string(),
            port: util::or_dash(c.port.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct DependentRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Via Rules")]
    via: String,
}

impl From<&DependentPath> for DependentRow {
    fn from(d: &DependentPath) -> Self {
        Self {
            source: d.source.clone(),
            destination: d.destination.clone(),
            via: d.via.join(" -> "),
        }
    }
}

fn impact_detail(impact: &RuleImpact, color: bool) -> String {
    let direct: Vec<ConnectionRow> = impact
        .affected_connections
        .iter()
        .map(ConnectionRow::from)
        .collect();
    let dependent: Vec<DependentRow> = impact
        .dependent_paths
        .iter()
        .map(DependentRow::from)
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "Direct connections ({})", direct.len());
    let _ = writeln!(out, "{}", output::render_table(&direct));
    let _ = writeln!(out, "\nDependent paths ({})", dependent.len());
    let _ = writeln!(out, "{}", output::render_table(&dependent));
    let _ = write!(out, "\n{}", output::warn(&impact.warning, color));
    out
}

/// `source -> destination` for each dependent path.
fn impact_plain(impact: &RuleImpact) -> String {
    impact
        .dependent_paths
        .iter()
        .map(|d| format!("{} -> {}", d.source, d.destination))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn handle(
    analyzer: &Analyzer<MemoryStore>,
    args: ImpactArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let impact = analyzer.rule_impact(RuleId(args.rule_id)).await?;
    if !impact.dependent_paths.is_empty() {
        tracing::info!(
            rule_id = args.rule_id,
            dependent = impact.dependent_paths.len(),
            "rule carries transit traffic"
        );
    }
    let color = output::should_color(global.color_mode());
    let out = output::render_single(
        global.output_format(),
        &impact,
        |i| impact_detail(i, color),
        impact_plain,
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
