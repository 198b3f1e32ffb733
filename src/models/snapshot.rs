// Result of one poll cycle as seen by the renderer

use super::ContainerRecord;

/// Immutable outcome of a poll cycle. Records and error always come from the
/// same cycle; a new cycle replaces the whole value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollSnapshot {
    /// Number of completed cycles, 0 before the first one finishes.
    pub cycle: u64,
    pub records: Vec<ContainerRecord>,
    /// Top-level failure of the cycle (listing failed), if any.
    pub error: Option<String>,
}

impl PollSnapshot {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
