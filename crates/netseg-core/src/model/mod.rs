// ── Domain model ──
//
// Input records (segments, rules) as delivered by the store, plus the
// response shapes produced by graph, path, impact and search queries.

pub mod analysis;
pub mod ids;
pub mod rule;
pub mod segment;
pub mod topology;

// ── Re-exports ──────────────────────────────────────────────────────

pub use ids::{FirewallId, RuleId, SegmentId};

pub use rule::{Action, Protocol, Rule};
pub use segment::Segment;

pub use topology::{EdgeMetadata, TopologyEdge, TopologyGraph, TopologyNode};

pub use analysis::{
    AffectedConnection, DependentPath, PathAnalysis, PathStop, RuleApplied, RuleHit, RuleImpact,
    SearchResults, SegmentHit,
};
