// ── Snapshot collaborator boundary ──
//
// Analysis never talks to storage directly. Each request pulls flat,
// pre-fetched lists through `SnapshotSource` and works on them in memory.

mod memory;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{Action, FirewallId, Protocol, Rule, RuleId, Segment, SegmentId};

pub use memory::MemoryStore;

// ── Filters ─────────────────────────────────────────────────────────

/// Segment visibility filter. An empty zone list admits every segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentFilter {
    pub zone_types: Vec<String>,
}

impl SegmentFilter {
    pub fn zones<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            zone_types: zones.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, segment: &Segment) -> bool {
        self.zone_types.is_empty() || self.zone_types.iter().any(|z| *z == segment.zone_type)
    }
}

/// Rule candidate filter. Empty/absent dimensions do not filter.
///
/// A rule with protocol `ANY` passes every protocol filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFilter {
    pub protocols: Vec<Protocol>,
    pub action: Option<Action>,
    pub firewall_id: Option<FirewallId>,
}

impl RuleFilter {
    pub fn allow_only() -> Self {
        Self {
            action: Some(Action::Allow),
            ..Self::default()
        }
    }

    pub fn matches(&self, rule: &Rule) -> bool {
        let protocol_ok = self.protocols.is_empty()
            || self.protocols.iter().any(|p| rule.protocol.matches(*p));
        let action_ok = self.action.is_none_or(|a| a == rule.action);
        let firewall_ok = self.firewall_id.is_none_or(|f| f == rule.firewall_id);
        protocol_ok && action_ok && firewall_ok
    }
}

// ── Snapshot ────────────────────────────────────────────────────────

/// Immutable segment + rule lists, both sorted by id ascending.
///
/// Sorted rule enumeration is what makes breadth-first tie-breaks
/// reproducible across runs and stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SnapshotRecords")]
pub struct Snapshot {
    segments: Vec<Segment>,
    rules: Vec<Rule>,
}

/// Wire shape of a snapshot export: `{segments: [...], rules: [...]}`.
#[derive(Debug, Deserialize)]
struct SnapshotRecords {
    #[serde(default)]
    segments: Vec<Segment>,
    #[serde(default)]
    rules: Vec<Rule>,
}

impl From<SnapshotRecords> for Snapshot {
    fn from(records: SnapshotRecords) -> Self {
        Self::new(records.segments, records.rules)
    }
}

impl Snapshot {
    pub fn new(mut segments: Vec<Segment>, mut rules: Vec<Rule>) -> Self {
        segments.sort_by_key(|s| s.id);
        rules.sort_by_key(|r| r.id);
        Self { segments, rules }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments
            .binary_search_by_key(&id, |s| s.id)
            .ok()
            .and_then(|idx| self.segments.get(idx))
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .and_then(|idx| self.rules.get(idx))
    }
}

// ── Collaborator trait ──────────────────────────────────────────────

/// Read-only access to the segment/rule store.
///
/// Implementations return owned lists sorted by id ascending and must
/// never expose mutation to the analysis layer.
pub trait SnapshotSource: Send + Sync {
    fn list_segments(
        &self,
        filter: &SegmentFilter,
    ) -> impl Future<Output = Result<Vec<Segment>, CoreError>> + Send;

    fn list_rules(
        &self,
        filter: &RuleFilter,
    ) -> impl Future<Output = Result<Vec<Rule>, CoreError>> + Send;

    fn get_rule(&self, id: RuleId) -> impl Future<Output = Result<Rule, CoreError>> + Send;

    fn get_segment(&self, id: SegmentId)
    -> impl Future<Output = Result<Segment, CoreError>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{rule, segment};

    #[test]
    fn snapshot_sorts_by_id() {
        let snap = Snapshot::new(
            vec![segment(3, "C", "Internal"), segment(1, "A", "DMZ")],
            vec![
                rule(9, 1, 3, Protocol::Tcp, None, Action::Allow),
                rule(2, 3, 1, Protocol::Udp, None, Action::Deny),
            ],
        );
        let seg_ids: Vec<_> = snap.segments().iter().map(|s| s.id.get()).collect();
        let rule_ids: Vec<_> = snap.rules().iter().map(|r| r.id.get()).collect();
        assert_eq!(seg_ids, [1, 3]);
        assert_eq!(rule_ids, [2, 9]);
        assert_eq!(snap.segment(SegmentId(3)).unwrap().name, "C");
        assert!(snap.rule(RuleId(5)).is_none());
    }

    #[test]
    fn snapshot_deserializes_and_sorts() {
        let snap: Snapshot = serde_json::from_value(serde_json::json!({
            "segments": [
                {"id": 2, "name": "B", "ip_range": "10.0.2.0/24", "zone_type": "Internal", "color": "#fff"},
                {"id": 1, "name": "A", "ip_range": "10.0.1.0/24", "zone_type": "DMZ", "color": "#000"}
            ]
        }))
        .unwrap();
        assert_eq!(snap.segments()[0].name, "A");
        assert!(snap.rules().is_empty());
    }

    #[test]
    fn rule_filter_treats_any_as_wildcard() {
        let any = rule(1, 1, 2, Protocol::Any, None, Action::Allow);
        let udp = rule(2, 1, 2, Protocol::Udp, None, Action::Allow);
        let filter = RuleFilter {
            protocols: vec![Protocol::Tcp],
            ..RuleFilter::default()
        };
        assert!(filter.matches(&any));
        assert!(!filter.matches(&udp));
    }

    #[test]
    fn rule_filter_checks_action_and_firewall() {
        let deny = rule(1, 1, 2, Protocol::Tcp, None, Action::Deny);
        assert!(!RuleFilter::allow_only().matches(&deny));
        assert!(RuleFilter::default().matches(&deny));

        let other_fw = RuleFilter {
            firewall_id: Some(FirewallId(99)),
            ..RuleFilter::default()
        };
        assert!(!other_fw.matches(&deny));
    }

    #[test]
    fn segment_filter_is_exact_and_empty_means_all() {
        let dmz = segment(1, "A", "DMZ");
        assert!(SegmentFilter::default().matches(&dmz));
        assert!(SegmentFilter::zones(["DMZ"]).matches(&dmz));
        assert!(!SegmentFilter::zones(["Internal"]).matches(&dmz));
    }
}
