//! Reachability analysis over network segmentation policy.
//!
//! Segments are nodes, firewall rules are directed edges. This crate
//! answers three questions against an immutable snapshot of both:
//!
//! - **[`graph`]**: what does the (filtered) policy graph look like, with
//!   parallel rules merged into one edge per ordered segment pair?
//! - **[`path`]**: can traffic from segment X reach segment Y under a
//!   given protocol/port, and via which rules?
//! - **[`impact`]**: which connections lose their only path if rule R
//!   is removed?
//!
//! Snapshots arrive through the [`SnapshotSource`] trait; [`MemoryStore`]
//! is the bundled implementation. [`Analyzer`] ties a source to the
//! algorithms, one async method per request.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod graph;
pub mod impact;
pub mod model;
pub mod path;
pub mod port;
pub mod search;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use analyzer::Analyzer;
pub use config::SearchLimits;
pub use error::CoreError;
pub use graph::{TopologyFilter, build_topology};
pub use impact::analyze_rule_impact;
pub use path::{PathQuery, find_path};
pub use port::{PortRange, PortRangeError};
pub use search::SearchScope;
pub use store::{MemoryStore, RuleFilter, SegmentFilter, Snapshot, SnapshotSource};

pub use model::{
    Action, FirewallId, PathAnalysis, Protocol, Rule, RuleId, RuleImpact, SearchResults, Segment,
    SegmentId, TopologyGraph,
};

#[cfg(test)]
pub(crate) mod test_support {
    use std::io;
    use std::sync::{Arc, Mutex};

    use crate::model::{Action, FirewallId, Protocol, Rule, RuleId, Segment, SegmentId};

    pub(crate) fn segment(id: i64, name: &str, zone: &str) -> Segment {
        Segment {
            id: SegmentId(id),
            name: name.to_owned(),
            ip_range: format!("10.0.{id}.0/24"),
            zone_type: zone.to_owned(),
            color: "#4ECDC4".to_owned(),
            description: None,
        }
    }

    pub(crate) fn rule(
        id: i64,
        source: i64,
        destination: i64,
        protocol: Protocol,
        ports: Option<&str>,
        action: Action,
    ) -> Rule {
        Rule {
            id: RuleId(id),
            firewall_id: FirewallId(1),
            rule_name: format!("rule-{id}"),
            source_segment_id: SegmentId(source),
            destination_segment_id: SegmentId(destination),
            protocol,
            port_range: ports.map(str::to_owned),
            action,
            description: None,
        }
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        #[allow(clippy::unwrap_used)]
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with a thread-local subscriber and return what it logged at
    /// WARN and above.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        (out, logs)
    }
}
