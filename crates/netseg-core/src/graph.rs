//! Topology graph builder.
//!
//! Turns a segment + rule snapshot into the node/edge structure rendered by
//! the map view. Rules sharing an ordered `(source, destination)` pair are
//! merged into a single edge; every set-valued field is emitted sorted so
//! identical inputs always serialize identically.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::model::{
    Action, EdgeMetadata, Protocol, Rule, RuleId, Segment, SegmentId, TopologyEdge, TopologyGraph,
    TopologyNode,
};
use crate::store::{RuleFilter, SegmentFilter};

/// Visibility filters for a topology query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyFilter {
    pub segments: SegmentFilter,
    pub rules: RuleFilter,
}

impl TopologyFilter {
    pub fn new(zone_types: Vec<String>, protocols: Vec<Protocol>, action: Option<Action>) -> Self {
        Self {
            segments: SegmentFilter { zone_types },
            rules: RuleFilter {
                protocols,
                action,
                firewall_id: None,
            },
        }
    }
}

/// Build the filtered, rule-merged topology graph.
///
/// A candidate rule whose source or destination is not a visible node is
/// dropped; the graph never carries edges to hidden segments. Rules naming a
/// segment absent from `segments` altogether are logged and skipped.
pub fn build_topology(segments: &[Segment], rules: &[Rule], filter: &TopologyFilter) -> TopologyGraph {
    let mut visible: Vec<&Segment> = segments
        .iter()
        .filter(|s| filter.segments.matches(s))
        .collect();
    visible.sort_by_key(|s| s.id);
    let visible_ids: HashSet<SegmentId> = visible.iter().map(|s| s.id).collect();
    let known_ids: HashSet<SegmentId> = segments.iter().map(|s| s.id).collect();

    let mut candidates: Vec<&Rule> = rules.iter().filter(|r| filter.rules.matches(r)).collect();
    candidates.sort_by_key(|r| r.id);

    let mut merged: BTreeMap<(SegmentId, SegmentId), EdgeAccumulator> = BTreeMap::new();
    for rule in candidates {
        let key = (rule.source_segment_id, rule.destination_segment_id);
        if let Some(missing) = [key.0, key.1].into_iter().find(|id| !known_ids.contains(id)) {
            tracing::warn!(
                rule_id = %rule.id,
                rule_name = %rule.rule_name,
                segment_id = %missing,
                "rule references a missing segment; skipping"
            );
            continue;
        }
        if !visible_ids.contains(&key.0) || !visible_ids.contains(&key.1) {
            continue;
        }
        merged.entry(key).or_default().add(rule);
    }

    let nodes: Vec<TopologyNode> = visible.into_iter().map(node_for).collect();
    let edges: Vec<TopologyEdge> = merged
        .into_iter()
        .map(|((from, to), acc)| acc.into_edge(from, to))
        .collect();

    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "topology built");
    TopologyGraph { nodes, edges }
}

fn node_for(segment: &Segment) -> TopologyNode {
    TopologyNode {
        id: segment.id.node_key(),
        label: segment.name.clone(),
        ip_range: segment.ip_range.clone(),
        zone_type: segment.zone_type.clone(),
        color: segment.color.clone(),
        description: segment.description.clone(),
    }
}

// ── Edge merge ──────────────────────────────────────────────────────

#[derive(Default)]
struct EdgeAccumulator {
    rule_ids: Vec<RuleId>,
    protocols: BTreeSet<Protocol>,
    ports: BTreeSet<String>,
    actions: BTreeSet<Action>,
    descriptions: Vec<String>,
}

impl EdgeAccumulator {
    fn add(&mut self, rule: &Rule) {
        self.rule_ids.push(rule.id);
        self.protocols.insert(rule.protocol);
        self.actions.insert(rule.action);
        if let Some(ports) = rule.port_expr() {
            self.ports.insert(ports.to_owned());
        }
        if let Some(text) = rule.description_text() {
            self.descriptions.push(text.to_owned());
        }
    }

    fn into_edge(mut self, from: SegmentId, to: SegmentId) -> TopologyEdge {
        self.rule_ids.sort();
        let label = format!(
            "{} ({})",
            join(self.protocols.iter().map(|p| p.as_str())),
            join(self.actions.iter().map(|a| a.as_str())),
        );

        TopologyEdge {
            id: format!("edge-{from}-{to}"),
            from: from.node_key(),
            to: to.node_key(),
            label,
            metadata: EdgeMetadata {
                rule_ids: self.rule_ids,
                protocols: self.protocols.into_iter().collect(),
                ports: self.ports.into_iter().collect(),
                actions: self.actions.into_iter().collect(),
                descriptions: self.descriptions,
            },
        }
    }
}

fn join<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(", ")
}
