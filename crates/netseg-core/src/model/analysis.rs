// ── Path, impact and search response types ──

use serde::{Deserialize, Serialize};

use super::ids::{RuleId, SegmentId};
use super::rule::{Action, Protocol, Rule};
use super::segment::Segment;

// ── Path analysis ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStop {
    pub segment_id: SegmentId,
    pub segment_name: String,
}

impl From<&Segment> for PathStop {
    fn from(segment: &Segment) -> Self {
        Self {
            segment_id: segment.id,
            segment_name: segment.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleApplied {
    pub rule_id: RuleId,
    pub rule_name: String,
    pub protocol: Protocol,
    pub port_range: Option<String>,
}

impl From<&Rule> for RuleApplied {
    fn from(rule: &Rule) -> Self {
        Self {
            rule_id: rule.id,
            rule_name: rule.rule_name.clone(),
            protocol: rule.protocol,
            port_range: rule.port_range.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathAnalysis {
    pub reachable: bool,
    pub path: Vec<PathStop>,
    pub rules_applied: Vec<RuleApplied>,
}

impl PathAnalysis {
    pub fn unreachable() -> Self {
        Self::default()
    }

    /// Number of rules traversed.
    pub fn hops(&self) -> usize {
        self.rules_applied.len()
    }
}

// ── Rule impact ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedConnection {
    pub source_segment: String,
    pub destination_segment: String,
    pub protocol: Protocol,
    pub port: Option<String>,
}

/// A reachable segment pair that loses every path once the rule is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentPath {
    pub source: String,
    pub destination: String,
    /// Rule ids along the shortest path before removal.
    pub via: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleImpact {
    pub affected_connections: Vec<AffectedConnection>,
    pub dependent_paths: Vec<DependentPath>,
    pub warning: String,
}

// ── Search ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentHit {
    pub id: SegmentId,
    pub name: String,
    pub ip_range: String,
    pub zone_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleHit {
    pub id: RuleId,
    pub rule_name: String,
    pub protocol: Protocol,
    pub action: Action,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub segments: Vec<SegmentHit>,
    pub rules: Vec<RuleHit>,
}
