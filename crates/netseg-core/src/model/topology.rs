// ── Topology graph response types ──
//
// Field names are consumed verbatim by the map frontend.

use serde::{Deserialize, Serialize};

use super::ids::RuleId;
use super::rule::{Action, Protocol};

/// One visible segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyNode {
    /// `segment-<id>`
    pub id: String,
    pub label: String,
    pub ip_range: String,
    pub zone_type: String,
    pub color: String,
    pub description: Option<String>,
}

/// Aggregated view of every visible rule between one ordered segment pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeMetadata {
    pub rule_ids: Vec<RuleId>,
    pub protocols: Vec<Protocol>,
    pub ports: Vec<String>,
    pub actions: Vec<Action>,
    pub descriptions: Vec<String>,
}

/// Directed edge `from -> to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyEdge {
    /// `edge-<source>-<dest>`
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: String,
    pub metadata: EdgeMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyGraph {
    pub nodes: Vec<TopologyNode>,
    pub edges: Vec<TopologyEdge>,
}
