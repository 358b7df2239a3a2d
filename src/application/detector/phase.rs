//! Detection cycle phases.

use std::fmt;

/// Where a detection cycle currently is.
///
/// A cycle walks `Idle -> Fetching -> Aggregating -> Filtering -> Ranked`
/// and returns to `Idle` once its report is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePhase {
    #[default]
    Idle,
    Fetching,
    Aggregating,
    Filtering,
    Ranked,
}

impl CyclePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Aggregating => "aggregating",
            Self::Filtering => "filtering",
            Self::Ranked => "ranked",
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
