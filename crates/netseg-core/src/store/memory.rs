// ── In-memory snapshot store ──
//
// Holds one immutable `Snapshot` behind an `ArcSwap`. Readers grab the
// current `Arc` without locking; `replace` swaps in a whole new snapshot
// and in-flight requests finish on the one they already loaded.

use std::future::{Future, ready};
use std::sync::Arc;

use arc_swap::ArcSwap;

use super::{RuleFilter, SegmentFilter, Snapshot, SnapshotSource};
use crate::error::CoreError;
use crate::model::{Rule, RuleId, Segment, SegmentId};

pub struct MemoryStore {
    snapshot: ArcSwap<Snapshot>,
}

impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(snapshot),
        }
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }

    /// Atomically install a new snapshot, returning the previous one.
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let previous = self.snapshot.swap(Arc::new(snapshot));
        tracing::debug!(
            segments = self.snapshot.load().segments().len(),
            rules = self.snapshot.load().rules().len(),
            "snapshot replaced"
        );
        previous
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Snapshot::default())
    }
}

impl From<Snapshot> for MemoryStore {
    fn from(snapshot: Snapshot) -> Self {
        Self::new(snapshot)
    }
}

impl SnapshotSource for MemoryStore {
    fn list_segments(
        &self,
        filter: &SegmentFilter,
    ) -> impl Future<Output = Result<Vec<Segment>, CoreError>> + Send {
        let snap = self.snapshot.load();
        let segments = snap
            .segments()
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        ready(Ok(segments))
    }

    fn list_rules(
        &self,
        filter: &RuleFilter,
    ) -> impl Future<Output = Result<Vec<Rule>, CoreError>> + Send {
        let snap = self.snapshot.load();
        let rules = snap
            .rules()
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        ready(Ok(rules))
    }

    fn get_rule(&self, id: RuleId) -> impl Future<Output = Result<Rule, CoreError>> + Send {
        let found = self
            .snapshot
            .load()
            .rule(id)
            .cloned()
            .ok_or(CoreError::RuleNotFound { id });
        ready(found)
    }

    fn get_segment(
        &self,
        id: SegmentId,
    ) -> impl Future<Output = Result<Segment, CoreError>> + Send {
        let found = self
            .snapshot
            .load()
            .segment(id)
            .cloned()
            .ok_or(CoreError::SegmentNotFound { id });
        ready(found)
    }
}
