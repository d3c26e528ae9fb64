//! Free-text lookup over segments and rules.

use crate::model::{Rule, RuleHit, SearchResults, Segment, SegmentHit};

/// Which entity kinds a search covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchScope {
    #[default]
    All,
    Segments,
    Rules,
}

impl SearchScope {
    fn segments(self) -> bool {
        matches!(self, Self::All | Self::Segments)
    }

    fn rules(self) -> bool {
        matches!(self, Self::All | Self::Rules)
    }
}

/// Case-insensitive substring search. Segments match on name or IP range,
/// rules on name or description. Results keep snapshot (id) order.
pub fn search(segments: &[Segment], rules: &[Rule], query: &str, scope: SearchScope) -> SearchResults {
    let needle = query.trim().to_lowercase();
    let hit = |field: &str| field.to_lowercase().contains(&needle);

    let mut results = SearchResults::default();

    if scope.segments() {
        results.segments = segments
            .iter()
            .filter(|s| hit(&s.name) || hit(&s.ip_range))
            .map(|s| SegmentHit {
                id: s.id,
                name: s.name.clone(),
                ip_range: s.ip_range.clone(),
                zone_type: s.zone_type.clone(),
            })
            .collect();
    }

    if scope.rules() {
        results.rules = rules
            .iter()
            .filter(|r| hit(&r.rule_name) || r.description.as_deref().is_some_and(hit))
            .map(|r| RuleHit {
                id: r.id,
                rule_name: r.rule_name.clone(),
                protocol: r.protocol,
                action: r.action,
            })
            .collect();
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Action, Protocol};
    use crate::test_support::{rule, segment};

    fn fixture() -> (Vec<Segment>, Vec<Rule>) {
        let segments = vec![
            segment(1, "DMZ Web", "DMZ"),
            segment(2, "Web Servers", "Internal"),
            segment(3, "DB Servers", "Internal"),
        ];
        let mut rules = vec![
            rule(1, 1, 2, Protocol::Tcp, Some("443"), Action::Allow),
            rule(2, 2, 3, Protocol::Tcp, Some("5432"), Action::Allow),
        ];
        rules[1].description = Some("Postgres from web tier".into());
        (segments, rules)
    }

    #[test]
    fn matches_names_case_insensitively() {
        let (segments, rules) = fixture();
        let results = search(&segments, &rules, "WEB", SearchScope::Segments);
        let names: Vec<_> = results.segments.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["DMZ Web", "Web Servers"]);
        assert!(results.rules.is_empty());
    }

    #[test]
    fn matches_ip_range_fragment() {
        let (segments, rules) = fixture();
        let results = search(&segments, &rules, "10.0.3", SearchScope::All);
        assert_eq!(results.segments.len(), 1);
        assert_eq!(results.segments[0].name, "DB Servers");
    }

    #[test]
    fn rules_match_on_description() {
        let (segments, rules) = fixture();
        let results = search(&segments, &rules, "postgres", SearchScope::Rules);
        assert_eq!(results.rules.len(), 1);
        assert_eq!(results.rules[0].rule_name, "rule-2");
        assert!(results.segments.is_empty());
    }
}
