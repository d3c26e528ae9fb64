//! Reachability search over the ALLOW subgraph.
//!
//! Adjacency is built from ALLOW rules only, narrowed by the requested
//! protocol and port. Breadth-first search records a predecessor
//! `(segment, rule)` for every discovered segment, so the shortest path
//! (in rule hops) is rebuilt by walking back from the target instead of
//! carrying a path copy in every queue entry.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::config::SearchLimits;
use crate::error::CoreError;
use crate::model::{PathAnalysis, PathStop, Protocol, Rule, RuleApplied, RuleId, Segment, SegmentId};
use crate::port::PortRange;

/// A point-to-point reachability question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathQuery {
    pub source: SegmentId,
    pub destination: SegmentId,
    pub protocol: Option<Protocol>,
    pub port: Option<u16>,
}

impl PathQuery {
    pub fn new(source: SegmentId, destination: SegmentId) -> Self {
        Self {
            source,
            destination,
            protocol: None,
            port: None,
        }
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

/// Answer a reachability query against a snapshot.
///
/// Unknown endpoints are "not reachable", never an error. A segment always
/// reaches itself, even with no outgoing rules.
pub fn find_path(
    segments: &[Segment],
    rules: &[Rule],
    query: &PathQuery,
    limits: SearchLimits,
) -> Result<PathAnalysis, CoreError> {
    let find = |id: SegmentId| segments.iter().find(|s| s.id == id);
    let (Some(source), Some(_)) = (find(query.source), find(query.destination)) else {
        tracing::debug!(
            source = %query.source,
            destination = %query.destination,
            "path endpoint not in snapshot"
        );
        return Ok(PathAnalysis::unreachable());
    };

    if query.source == query.destination {
        return Ok(PathAnalysis {
            reachable: true,
            path: vec![PathStop::from(source)],
            rules_applied: Vec::new(),
        });
    }

    let graph = AllowGraph::build(segments, rules, query.protocol, query.port)?;
    let tree = graph.search(query.source, Some(query.destination), None, limits)?;
    let Some((stops, hops)) = tree.path_to(query.destination) else {
        return Ok(PathAnalysis::unreachable());
    };

    let path = stops
        .iter()
        .filter_map(|id| graph.segment(*id))
        .map(PathStop::from)
        .collect();
    let rules_applied = hops.into_iter().map(RuleApplied::from).collect();

    Ok(PathAnalysis {
        reachable: true,
        path,
        rules_applied,
    })
}

// ── ALLOW subgraph ──────────────────────────────────────────────────

/// Adjacency over ALLOW rules whose endpoints both exist.
pub(crate) struct AllowGraph<'a> {
    segments: BTreeMap<SegmentId, &'a Segment>,
    /// Outgoing `(destination, rule)` pairs in rule-id order.
    adjacency: HashMap<SegmentId, Vec<(SegmentId, &'a Rule)>>,
}

impl<'a> AllowGraph<'a> {
    /// Build the adjacency, keeping rules that match `protocol` (or are
    /// `ANY`) and whose port expression admits `port`. Rules without a
    /// port expression admit every port.
    pub(crate) fn build(
        segments: &'a [Segment],
        rules: &'a [Rule],
        protocol: Option<Protocol>,
        port: Option<u16>,
    ) -> Result<Self, CoreError> {
        let segments: BTreeMap<SegmentId, &Segment> = segments.iter().map(|s| (s.id, s)).collect();

        let mut ordered: Vec<&Rule> = rules.iter().filter(|r| r.is_allow()).collect();
        ordered.sort_by_key(|r| r.id);

        let mut adjacency: HashMap<SegmentId, Vec<(SegmentId, &Rule)>> = HashMap::new();
        for rule in ordered {
            if protocol.is_some_and(|p| !rule.protocol.matches(p)) {
                continue;
            }
            if let (Some(port), Some(expr)) = (port, rule.port_expr()) {
                let range = PortRange::parse(expr).map_err(|e| CoreError::InvalidPortRange {
                    rule_id: rule.id,
                    token: e.token,
                    reason: e.reason,
                })?;
                if !range.contains(port) {
                    continue;
                }
            }
            if let Some(missing) = [rule.source_segment_id, rule.destination_segment_id]
                .into_iter()
                .find(|id| !segments.contains_key(id))
            {
                tracing::warn!(
                    rule_id = %rule.id,
                    rule_name = %rule.rule_name,
                    segment_id = %missing,
                    "rule references a missing segment; skipping"
                );
                continue;
            }
            adjacency
                .entry(rule.source_segment_id)
                .or_default()
                .push((rule.destination_segment_id, rule));
        }

        Ok(Self {
            segments,
            adjacency,
        })
    }

    pub(crate) fn segment(&self, id: SegmentId) -> Option<&'a Segment> {
        self.segments.get(&id).copied()
    }

    /// Segment ids in ascending order.
    pub(crate) fn segment_ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.segments.keys().copied()
    }

    fn neighbors(&self, id: SegmentId) -> &[(SegmentId, &'a Rule)] {
        self.adjacency
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Breadth-first search from `source`.
    ///
    /// Stops early once `target` is dequeued; with no target the sweep
    /// covers everything reachable. Edges contributed by `excluded` are
    /// ignored. Each segment is expanded at most once.
    pub(crate) fn search(
        &self,
        source: SegmentId,
        target: Option<SegmentId>,
        excluded: Option<RuleId>,
        limits: SearchLimits,
    ) -> Result<SearchTree<'a>, CoreError> {
        let mut tree = SearchTree {
            source,
            parents: HashMap::new(),
        };
        let mut discovered = HashSet::from([source]);
        let mut queue = VecDeque::from([source]);
        let mut expanded = 0usize;

        while let Some(current) = queue.pop_front() {
            if target == Some(current) {
                break;
            }

            expanded += 1;
            if let Some(limit) = limits.max_visits {
                if expanded > limit {
                    tracing::warn!(%source, limit, "search visit budget exhausted");
                    return Err(CoreError::SearchTruncated { limit });
                }
            }

            for &(next, rule) in self.neighbors(current) {
                if excluded == Some(rule.id) || !discovered.insert(next) {
                    continue;
                }
                tree.parents.insert(next, (current, rule));
                queue.push_back(next);
            }
        }

        Ok(tree)
    }
}

// ── Search tree ─────────────────────────────────────────────────────

/// Predecessor map produced by one breadth-first search.
pub(crate) struct SearchTree<'a> {
    source: SegmentId,
    parents: HashMap<SegmentId, (SegmentId, &'a Rule)>,
}

impl<'a> SearchTree<'a> {
    pub(crate) fn reaches(&self, id: SegmentId) -> bool {
        id == self.source || self.parents.contains_key(&id)
    }

    /// Segments reached from the source, excluding the source itself.
    pub(crate) fn reached(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.parents.keys().copied()
    }

    /// Whether any tree edge was contributed by `rule`.
    pub(crate) fn uses_rule(&self, rule: RuleId) -> bool {
        self.parents.values().any(|(_, r)| r.id == rule)
    }

    /// Walk predecessors back from `target`, returning stops and rules in
    /// travel order.
    pub(crate) fn path_to(&self, target: SegmentId) -> Option<(Vec<SegmentId>, Vec<&'a Rule>)> {
        let mut stops = vec![target];
        let mut hops = Vec::new();
        let mut current = target;
        while current != self.source {
            let &(previous, rule) = self.parents.get(&current)?;
            hops.push(rule);
            stops.push(previous);
            current = previous;
        }
        stops.reverse();
        hops.reverse();
        Some((stops, hops))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Action;
    use crate::test_support::{rule, segment};

    fn abc() -> Vec<Segment> {
        vec![
            segment(1, "A", "External"),
            segment(2, "B", "DMZ"),
            segment(3, "C", "Internal"),
        ]
    }

    fn names(analysis: &PathAnalysis) -> Vec<&str> {
        analysis
            .path
            .iter()
            .map(|s| s.segment_name.as_str())
            .collect()
    }

    fn rule_ids(analysis: &PathAnalysis) -> Vec<i64> {
        analysis.rules_applied.iter().map(|r| r.rule_id.get()).collect()
    }

    #[test]
    fn two_hop_path_with_port_match() {
        let rules = vec![
            rule(1, 1, 2, Protocol::Tcp, Some("80,8080"), Action::Allow),
            rule(2, 2, 3, Protocol::Tcp, Some("8000-9000"), Action::Allow),
        ];
        let query = PathQuery::new(SegmentId(1), SegmentId(3))
            .protocol(Protocol::Tcp)
            .port(8080);
        let result = find_path(&abc(), &rules, &query, SearchLimits::UNBOUNDED).unwrap();

        assert!(result.reachable);
        assert_eq!(names(&result), ["A", "B", "C"]);
        assert_eq!(rule_ids(&result), [1, 2]);
    }

    #[test]
    fn port_mismatch_on_second_hop_blocks_path() {
        let rules = vec![
            rule(1, 1, 2, Protocol::Tcp, Some("80,8080"), Action::Allow),
            rule(2, 2, 3, Protocol::Tcp, Some("8000-9000"), Action::Allow),
        ];
        let query = PathQuery::new(SegmentId(1), SegmentId(3))
            .protocol(Protocol::Tcp)
            .port(80);
        let result = find_path(&abc(), &rules, &query, SearchLimits::UNBOUNDED).unwrap();
        assert_eq!(result, PathAnalysis::unreachable());
    }

    #[test]
    fn self_query_is_reachable_without_rules() {
        let result = find_path(
            &abc(),
            &[],
            &PathQuery::new(SegmentId(2), SegmentId(2)),
            SearchLimits::UNBOUNDED,
        )
        .unwrap();
        assert!(result.reachable);
        assert_eq!(names(&result), ["B"]);
        assert!(result.rules_applied.is_empty());
    }

    #[test]
    fn self_query_ignores_unrelated_malformed_ports() {
        let rules = vec![rule(9, 2, 3, Protocol::Tcp, Some("http"), Action::Allow)];
        let query = PathQuery::new(SegmentId(1), SegmentId(1)).port(80);
        let result = find_path(&abc(), &rules, &query, SearchLimits::UNBOUNDED).unwrap();
        assert!(result.reachable);
        assert_eq!(names(&result), ["A"]);
        assert!(result.rules_applied.is_empty());
    }

    #[test]
    fn unknown_endpoints_are_unreachable() {
        let rules = vec![rule(1, 1, 2, Protocol::Tcp, None, Action::Allow)];
        for (src, dst) in [(1, 99), (99, 1), (99, 99)] {
            let query = PathQuery::new(SegmentId(src), SegmentId(dst));
            let result = find_path(&abc(), &rules, &query, SearchLimits::UNBOUNDED).unwrap();
            assert!(!result.reachable, "{src}->{dst}");
            assert!(result.path.is_empty());
        }
    }

    #[test]
    fn deny_rules_never_carry_traffic() {
        let rules = vec![rule(1, 1, 2, Protocol::Tcp, None, Action::Deny)];
        let query = PathQuery::new(SegmentId(1), SegmentId(2));
        let result = find_path(&abc(), &rules, &query, SearchLimits::UNBOUNDED).unwrap();
        assert!(!result.reachable);
    }

    #[test]
    fn any_rule_matches_requested_protocol() {
        let rules = vec![rule(1, 1, 2, Protocol::Any, None, Action::Allow)];
        for protocol in [Protocol::Tcp, Protocol::Udp, Protocol::Icmp] {
            let query = PathQuery::new(SegmentId(1), SegmentId(2)).protocol(protocol);
            let result = find_path(&abc(), &rules, &query, SearchLimits::UNBOUNDED).unwrap();
            assert!(result.reachable, "{protocol}");
        }
    }

    #[test]
    fn protocol_mismatch_blocks_path() {
        let rules = vec![rule(1, 1, 2, Protocol::Udp, None, Action::Allow)];
        let query = PathQuery::new(SegmentId(1), SegmentId(2)).protocol(Protocol::Tcp);
        let result = find_path(&abc(), &rules, &query, SearchLimits::UNBOUNDED).unwrap();
        assert!(!result.reachable);
    }

    #[test]
    fn rule_without_ports_admits_any_port() {
        let rules = vec![rule(1, 1, 2, Protocol::Tcp, None, Action::Allow)];
        let query = PathQuery::new(SegmentId(1), SegmentId(2)).port(31337);
        let result = find_path(&abc(), &rules, &query, SearchLimits::UNBOUNDED).unwrap();
        assert!(result.reachable);
    }

    #[test]
    fn port_zero_is_a_real_port() {
        let rules = vec![rule(1, 1, 2, Protocol::Tcp, Some("1-1024"), Action::Allow)];
        let query = PathQuery::new(SegmentId(1), SegmentId(2)).port(0);
        let result = find_path(&abc(), &rules, &query, SearchLimits::UNBOUNDED).unwrap();
        assert!(!result.reachable);
    }

    #[test]
    fn malformed_port_range_is_an_error() {
        let rules = vec![rule(7, 1, 2, Protocol::Tcp, Some("80,http"), Action::Allow)];
        let query = PathQuery::new(SegmentId(1), SegmentId(2)).port(80);
        let err = find_path(&abc(), &rules, &query, SearchLimits::UNBOUNDED).unwrap_err();
        match err {
            CoreError::InvalidPortRange { rule_id, token, .. } => {
                assert_eq!(rule_id, RuleId(7));
                assert_eq!(token, "http");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_ports_are_ignored_without_port_query() {
        let rules = vec![rule(7, 1, 2, Protocol::Tcp, Some("bogus"), Action::Allow)];
        let query = PathQuery::new(SegmentId(1), SegmentId(2));
        let result = find_path(&abc(), &rules, &query, SearchLimits::UNBOUNDED).unwrap();
        assert!(result.reachable);
    }

    #[test]
    fn shortest_path_wins_over_earlier_longer_one() {
        let segs: Vec<_> = (1..=4).map(|i| segment(i, &format!("S{i}"), "Internal")).collect();
        let rules = vec![
            rule(1, 1, 2, Protocol::Tcp, None, Action::Allow),
            rule(2, 2, 3, Protocol::Tcp, None, Action::Allow),
            rule(3, 3, 4, Protocol::Tcp, None, Action::Allow),
            rule(4, 1, 4, Protocol::Tcp, None, Action::Allow),
        ];
        let query = PathQuery::new(SegmentId(1), SegmentId(4));
        let result = find_path(&segs, &rules, &query, SearchLimits::UNBOUNDED).unwrap();
        assert_eq!(result.hops(), 1);
        assert_eq!(rule_ids(&result), [4]);
    }

    #[test]
    fn ties_break_by_lowest_rule_id() {
        let segs: Vec<_> = (1..=4).map(|i| segment(i, &format!("S{i}"), "Internal")).collect();
        let rules = vec![
            rule(10, 1, 3, Protocol::Tcp, None, Action::Allow),
            rule(11, 3, 4, Protocol::Tcp, None, Action::Allow),
            rule(5, 1, 2, Protocol::Tcp, None, Action::Allow),
            rule(6, 2, 4, Protocol::Tcp, None, Action::Allow),
        ];
        let query = PathQuery::new(SegmentId(1), SegmentId(4));
        let result = find_path(&segs, &rules, &query, SearchLimits::UNBOUNDED).unwrap();
        assert_eq!(rule_ids(&result), [5, 6]);
    }

    #[test]
    fn cycles_terminate() {
        let rules = vec![
            rule(1, 1, 2, Protocol::Tcp, None, Action::Allow),
            rule(2, 2, 1, Protocol::Tcp, None, Action::Allow),
            rule(3, 2, 2, Protocol::Tcp, None, Action::Allow),
        ];
        let query = PathQuery::new(SegmentId(1), SegmentId(3));
        let result = find_path(&abc(), &rules, &query, SearchLimits::UNBOUNDED).unwrap();
        assert!(!result.reachable);
    }

    #[test]
    fn dangling_rule_is_skipped_not_fatal() {
        let rules = vec![
            rule(1, 1, 42, Protocol::Tcp, None, Action::Allow),
            rule(2, 1, 2, Protocol::Tcp, None, Action::Allow),
        ];
        let query = PathQuery::new(SegmentId(1), SegmentId(2));
        let result = find_path(&abc(), &rules, &query, SearchLimits::UNBOUNDED).unwrap();
        assert_eq!(rule_ids(&result), [2]);
    }

    #[test]
    fn visit_budget_truncates_search() {
        let segs: Vec<_> = (1..=5).map(|i| segment(i, &format!("S{i}"), "Internal")).collect();
        let rules: Vec<_> = (1..5)
            .map(|i| rule(i, i, i + 1, Protocol::Tcp, None, Action::Allow))
            .collect();
        let query = PathQuery::new(SegmentId(1), SegmentId(5));

        let err = find_path(&segs, &rules, &query, SearchLimits::with_max_visits(2)).unwrap_err();
        assert!(matches!(err, CoreError::SearchTruncated { limit: 2 }));

        let ok = find_path(&segs, &rules, &query, SearchLimits::with_max_visits(4)).unwrap();
        assert_eq!(ok.hops(), 4);
    }

    #[test]
    fn search_tree_excludes_rule() {
        let segs = abc();
        let rules = vec![
            rule(1, 1, 2, Protocol::Tcp, None, Action::Allow),
            rule(2, 2, 3, Protocol::Tcp, None, Action::Allow),
        ];
        let graph = AllowGraph::build(&segs, &rules, None, None).unwrap();
        let full = graph
            .search(SegmentId(1), None, None, SearchLimits::UNBOUNDED)
            .unwrap();
        assert!(full.reaches(SegmentId(3)));
        assert!(full.uses_rule(RuleId(2)));

        let cut = graph
            .search(SegmentId(1), None, Some(RuleId(2)), SearchLimits::UNBOUNDED)
            .unwrap();
        assert!(cut.reaches(SegmentId(2)));
        assert!(!cut.reaches(SegmentId(3)));
    }
}
