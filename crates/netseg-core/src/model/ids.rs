// ── Core identity types ──
//
// Segments, rules and firewalls are keyed by the integer primary keys of
// the upstream store. Each gets its own newtype so a rule id can never be
// passed where a segment id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

integer_id! {
    /// Identifier of a network segment.
    SegmentId
}

integer_id! {
    /// Identifier of a firewall rule.
    RuleId
}

integer_id! {
    /// Identifier of the firewall device owning a rule. Opaque to analysis.
    FirewallId
}

impl SegmentId {
    /// Namespaced node key used in topology graphs (`segment-<id>`).
    pub fn node_key(self) -> String {
        format!("segment-{}", self.0)
    }
}
