// ── Network segment domain type ──

use serde::{Deserialize, Serialize};

use super::ids::SegmentId;

/// A named network zone, identified by a CIDR block and a zone class.
///
/// `zone_type` is an open set (External, DMZ, Internal, Management, ...);
/// the analysis layer compares it verbatim and never rejects new values.
/// CIDR and color fields are validated by the owning store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub name: String,
    pub ip_range: String,
    pub zone_type: String,
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
}
