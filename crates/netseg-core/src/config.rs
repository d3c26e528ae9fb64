// ── Runtime analysis configuration ──
//
// Tuning knobs handed in by the CLI. Core never reads config files.

/// Bounds applied to every breadth-first search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of segments a single search may expand.
    /// `None` leaves searches unbounded.
    pub max_visits: Option<usize>,
}

impl SearchLimits {
    pub const UNBOUNDED: Self = Self { max_visits: None };

    pub fn with_max_visits(max_visits: usize) -> Self {
        Self {
            max_visits: Some(max_visits),
        }
    }
}
