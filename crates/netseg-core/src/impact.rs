//! Rule removal impact analysis.
//!
//! Reports the connection a rule grants directly, plus every other segment
//! pair that is reachable today and would become unreachable without it.
//! The result is advisory; nothing here blocks a deletion.
//!
//! Dependent pairs are found with one breadth-first sweep per source
//! segment. A source whose shortest-path tree never uses the candidate
//! rule keeps all its paths after removal, so only sources whose tree
//! does use it are swept a second time with the rule excluded.

use crate::config::SearchLimits;
use crate::error::CoreError;
use crate::model::{AffectedConnection, DependentPath, Rule, RuleId, RuleImpact, Segment, SegmentId};
use crate::path::AllowGraph;

/// Analyze the effect of removing `rule_id` from the policy.
///
/// Fails with `RuleNotFound` for an unknown rule and `SegmentNotFound` when
/// the rule points at a segment missing from the snapshot.
pub fn analyze_rule_impact(
    segments: &[Segment],
    rules: &[Rule],
    rule_id: RuleId,
    limits: SearchLimits,
) -> Result<RuleImpact, CoreError> {
    let rule = rules
        .iter()
        .find(|r| r.id == rule_id)
        .ok_or(CoreError::RuleNotFound { id: rule_id })?;
    let source = segment_named(segments, rule.source_segment_id)?;
    let destination = segment_named(segments, rule.destination_segment_id)?;

    let affected_connections = vec![AffectedConnection {
        source_segment: source.name.clone(),
        destination_segment: destination.name.clone(),
        protocol: rule.protocol,
        port: rule.port_range.clone(),
    }];

    let dependent_paths = if rule.is_allow() {
        dependent_paths(segments, rules, rule, limits)?
    } else {
        Vec::new()
    };

    let warning = format!(
        "This rule is critical for {} direct connection(s) and {} dependent path(s)",
        affected_connections.len(),
        dependent_paths.len()
    );
    tracing::debug!(
        rule_id = %rule.id,
        dependent = dependent_paths.len(),
        "rule impact analyzed"
    );

    Ok(RuleImpact {
        affected_connections,
        dependent_paths,
        warning,
    })
}

fn segment_named(segments: &[Segment], id: SegmentId) -> Result<&Segment, CoreError> {
    segments
        .iter()
        .find(|s| s.id == id)
        .ok_or(CoreError::SegmentNotFound { id })
}

/// Pairs whose reachability flips from true to false, ordered by
/// `(source id, destination id)`. The rule's own endpoint pair is reported
/// as the direct connection and left out here.
fn dependent_paths(
    segments: &[Segment],
    rules: &[Rule],
    candidate: &Rule,
    limits: SearchLimits,
) -> Result<Vec<DependentPath>, CoreError> {
    let graph = AllowGraph::build(segments, rules, None, None)?;
    let direct = (candidate.source_segment_id, candidate.destination_segment_id);
    let mut dependent = Vec::new();

    for source in graph.segment_ids() {
        let before = graph.search(source, None, None, limits)?;
        if !before.uses_rule(candidate.id) {
            continue;
        }
        let after = graph.search(source, None, Some(candidate.id), limits)?;

        let mut lost: Vec<SegmentId> = before
            .reached()
            .filter(|target| !after.reaches(*target) && (source, *target) != direct)
            .collect();
        lost.sort();

        for target in lost {
            let via = before
                .path_to(target)
                .map(|(_, hops)| hops.iter().map(|r| r.id.to_string()).collect())
                .unwrap_or_default();
            let (Some(from), Some(to)) = (graph.segment(source), graph.segment(target)) else {
                continue;
            };
            dependent.push(DependentPath {
                source: from.name.clone(),
                destination: to.name.clone(),
                via,
            });
        }
    }

    Ok(dependent)
}
