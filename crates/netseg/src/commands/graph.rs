//! Topology graph command handler.

use std::fmt::Write as _;

use tabled::Tabled;

use netseg_core::model::{TopologyEdge, TopologyGraph, TopologyNode};
use netseg_core::{Analyzer, MemoryStore, TopologyFilter};

use crate::cli::{GlobalOpts, GraphArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Node")]
    id: String,
    #[tabled(rename = "Name")]
    label: String,
    #[tabled(rename = "IP Range")]
    ip_range: String,
    #[tabled(rename = "Zone")]
    zone_type: String,
}

impl From<&TopologyNode> for NodeRow {
    fn from(n: &TopologyNode) -> Self {
        Self {
            id: n.id.clone(),
            label: n.label.clone(),
            ip_range: n.ip_range.clone(),
            zone_type: n.zone_type.clone(),
        }
    }
}

#[derive(Tabled)]
struct EdgeRow {
    #[tabled(rename = "Edge")]
    id: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Rules")]
    rules: String,
    #[tabled(rename = "Ports")]
    ports: String,
}

impl From<&TopologyEdge> for EdgeRow {
    fn from(e: &TopologyEdge) -> Self {
        let rules = e
            .metadata
            .rule_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            id: e.id.clone(),
            from: e.from.clone(),
            to: e.to.clone(),
            label: e.label.clone(),
            rules,
            ports: if e.metadata.ports.is_empty() {
                "-".into()
            } else {
                e.metadata.ports.join(", ")
            },
        }
    }
}

fn graph_detail(g: &TopologyGraph) -> String {
    let nodes: Vec<NodeRow> = g.nodes.iter().map(NodeRow::from).collect();
    let edges: Vec<EdgeRow> = g.edges.iter().map(EdgeRow::from).collect();
    let mut out = String::new();
    let _ = writeln!(out, "Segments ({})", nodes.len());
    let _ = writeln!(out, "{}", output::render_table(&nodes));
    let _ = writeln!(out, "\nConnections ({})", edges.len());
    let _ = write!(out, "{}", output::render_table(&edges));
    out
}

/// `from -> to  label`, one edge per line.
fn graph_plain(g: &TopologyGraph) -> String {
    g.edges
        .iter()
        .map(|e| format!("{} -> {}\t{}", e.from, e.to, e.label))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn handle(
    analyzer: &Analyzer<MemoryStore>,
    args: GraphArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let filter = TopologyFilter::new(
        args.zone,
        util::map_protocols(&args.protocol),
        args.action.map(util::map_action),
    );
    let graph = analyzer.topology(&filter).await?;
    let out = output::render_single(global.output_format(), &graph, graph_detail, graph_plain)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
