// ── Analysis facade ──
//
// One entry point per request type. Every method pulls the lists it needs
// from the `SnapshotSource` up front and then runs a pure, synchronous
// computation; nothing is cached between calls.

use crate::config::SearchLimits;
use crate::error::CoreError;
use crate::graph::{self, TopologyFilter};
use crate::impact;
use crate::model::{
    PathAnalysis, Rule, RuleId, RuleImpact, SearchResults, Segment, SegmentId, TopologyGraph,
};
use crate::path::{self, PathQuery};
use crate::search::{self, SearchScope};
use crate::store::{RuleFilter, SegmentFilter, SnapshotSource};

pub struct Analyzer<S> {
    source: S,
    limits: SearchLimits,
}

impl<S: SnapshotSource> Analyzer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            limits: SearchLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Filtered, rule-merged topology graph.
    pub async fn topology(&self, filter: &TopologyFilter) -> Result<TopologyGraph, CoreError> {
        tracing::debug!(?filter, "building topology");
        // Zone filtering happens in the builder so it can tell hidden
        // segments from missing ones.
        let segments = self.source.list_segments(&SegmentFilter::default()).await?;
        let rules = self.source.list_rules(&filter.rules).await?;
        Ok(graph::build_topology(&segments, &rules, filter))
    }

    /// Point-to-point reachability under the ALLOW policy.
    pub async fn path(&self, query: &PathQuery) -> Result<PathAnalysis, CoreError> {
        tracing::debug!(?query, "analyzing path");
        let segments = self.source.list_segments(&SegmentFilter::default()).await?;
        let rules = self.source.list_rules(&RuleFilter::allow_only()).await?;
        let result = path::find_path(&segments, &rules, query, self.limits)?;
        tracing::debug!(reachable = result.reachable, hops = result.hops(), "path analyzed");
        Ok(result)
    }

    /// What breaks if `rule_id` is removed.
    pub async fn rule_impact(&self, rule_id: RuleId) -> Result<RuleImpact, CoreError> {
        tracing::debug!(%rule_id, "analyzing rule impact");
        let target = self.source.get_rule(rule_id).await?;
        let segments = self.source.list_segments(&SegmentFilter::default()).await?;
        let mut rules = self.source.list_rules(&RuleFilter::allow_only()).await?;
        if !rules.iter().any(|r| r.id == target.id) {
            rules.push(target);
        }
        impact::analyze_rule_impact(&segments, &rules, rule_id, self.limits)
    }

    pub async fn search(&self, query: &str, scope: SearchScope) -> Result<SearchResults, CoreError> {
        let segments = self.source.list_segments(&SegmentFilter::default()).await?;
        let rules = self.source.list_rules(&RuleFilter::default()).await?;
        Ok(search::search(&segments, &rules, query, scope))
    }

    // ── Entity access ────────────────────────────────────────────────

    pub async fn segments(&self, filter: &SegmentFilter) -> Result<Vec<Segment>, CoreError> {
        self.source.list_segments(filter).await
    }

    pub async fn segment(&self, id: SegmentId) -> Result<Segment, CoreError> {
        self.source.get_segment(id).await
    }

    pub async fn rules(&self, filter: &RuleFilter) -> Result<Vec<Rule>, CoreError> {
        self.source.list_rules(filter).await
    }

    pub async fn rule(&self, id: RuleId) -> Result<Rule, CoreError> {
        self.source.get_rule(id).await
    }
}
