// ── Firewall rule domain types ──

use serde::{Deserialize, Serialize};

use super::ids::{FirewallId, RuleId, SegmentId};
use crate::error::CoreError;

/// Transport protocol a rule applies to.
///
/// Variants are declared in alphabetical order of their wire names so the
/// derived `Ord` matches sorted string output.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Protocol {
    Any,
    Icmp,
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether a rule carrying `self` admits traffic of `requested`.
    /// `ANY` on the rule side admits everything.
    pub fn matches(self, requested: Self) -> bool {
        self == Self::Any || self == requested
    }
}

impl TryFrom<String> for Protocol {
    type Error = CoreError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.trim().parse().map_err(|_| {
            CoreError::validation(format!(
                "unknown protocol '{raw}' (expected TCP, UDP, ICMP or ANY)"
            ))
        })
    }
}

/// Verdict of a rule.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Action {
    Allow,
    Deny,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl TryFrom<String> for Action {
    type Error = CoreError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.trim().parse().map_err(|_| {
            CoreError::validation(format!("unknown action '{raw}' (expected ALLOW or DENY)"))
        })
    }
}

/// A directional policy statement between two segments.
///
/// Segment references are plain ids; a rule whose endpoints are missing
/// from the segment snapshot is unusable and skipped by analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub firewall_id: FirewallId,
    pub rule_name: String,
    pub source_segment_id: SegmentId,
    pub destination_segment_id: SegmentId,
    pub protocol: Protocol,
    /// Port list/range expression; `None` means all ports.
    #[serde(default)]
    pub port_range: Option<String>,
    pub action: Action,
    #[serde(default)]
    pub description: Option<String>,
}

impl Rule {
    /// Port expression, treating an empty or blank string as absent.
    pub fn port_expr(&self) -> Option<&str> {
        self.port_range
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Description, treating an empty string as absent.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_allow(&self) -> bool {
        self.action == Action::Allow
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn protocol_parses_case_insensitively() {
        assert_eq!("tcp".parse::<Protocol>().unwrap(), Protocol::Tcp);
        assert_eq!("Udp".parse::<Protocol>().unwrap(), Protocol::Udp);
        assert_eq!(Protocol::try_from(" icmp ".to_owned()).unwrap(), Protocol::Icmp);
    }

    #[test]
    fn protocol_rejects_unknown() {
        let err = Protocol::try_from("SCTP".to_owned()).unwrap_err();
        assert!(err.to_string().contains("SCTP"));
    }

    #[test]
    fn protocol_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Protocol::Any).unwrap(), "\"ANY\"");
        assert_eq!(Protocol::Tcp.to_string(), "TCP");
    }

    #[test]
    fn any_matches_every_protocol() {
        for p in [Protocol::Tcp, Protocol::Udp, Protocol::Icmp, Protocol::Any] {
            assert!(Protocol::Any.matches(p));
        }
        assert!(!Protocol::Tcp.matches(Protocol::Udp));
        assert!(!Protocol::Tcp.matches(Protocol::Any));
    }

    #[test]
    fn derived_order_follows_wire_names() {
        let mut all = vec![Protocol::Udp, Protocol::Tcp, Protocol::Any, Protocol::Icmp];
        all.sort();
        let names: Vec<_> = all.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, ["ANY", "ICMP", "TCP", "UDP"]);
    }

    #[test]
    fn rule_deserializes_lower_case_fields() {
        let rule: Rule = serde_json::from_value(serde_json::json!({
            "id": 1,
            "firewall_id": 1,
            "rule_name": "web",
            "source_segment_id": 1,
            "destination_segment_id": 2,
            "protocol": "tcp",
            "port_range": "80",
            "action": "allow"
        }))
        .unwrap();
        assert_eq!(rule.protocol, Protocol::Tcp);
        assert_eq!(rule.action, Action::Allow);
        assert!(rule.description.is_none());
    }

    #[test]
    fn blank_port_range_is_absent() {
        let mut rule: Rule = serde_json::from_value(serde_json::json!({
            "id": 1,
            "firewall_id": 1,
            "rule_name": "any",
            "source_segment_id": 1,
            "destination_segment_id": 2,
            "protocol": "ANY",
            "port_range": "  ",
            "action": "DENY"
        }))
        .unwrap();
        assert!(rule.port_expr().is_none());
        rule.port_range = Some("22".into());
        assert_eq!(rule.port_expr(), Some("22"));
    }
}
