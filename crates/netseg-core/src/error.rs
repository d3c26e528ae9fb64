// ── Core error types ──
//
// Errors surfaced by the analysis layer. Reachability questions about
// unknown segments are answered with "not reachable", so the NotFound
// variants only appear where an operation requires the entity to exist.

use thiserror::Error;

use crate::model::{RuleId, SegmentId};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Segment not found: {id}")]
    SegmentNotFound { id: SegmentId },

    #[error("Rule not found: {id}")]
    RuleNotFound { id: RuleId },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Rule {rule_id} has malformed port range token '{token}': {reason}")]
    InvalidPortRange {
        rule_id: RuleId,
        token: String,
        reason: String,
    },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Search budget ────────────────────────────────────────────────
    #[error("Search truncated after visiting {limit} segments")]
    SearchTruncated { limit: usize },

    // ── Collaborator errors ──────────────────────────────────────────
    #[error("Snapshot unavailable: {message}")]
    Snapshot { message: String },
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether this error means a required entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SegmentNotFound { .. } | Self::RuleNotFound { .. })
    }
}
