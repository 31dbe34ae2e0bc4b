use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Server-owned activity record. Read on every sync cycle, never mutated
/// locally; the whole collection is replaced on each fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

/// The activity collection keyed by activity name. Iteration order is the
/// server's JSON object order and doubles as display order.
pub type ActivityMap = IndexMap<String, Activity>;

impl Activity {
    /// Remaining capacity. Not clamped: a server that over-enrolls shows up
    /// as a negative count.
    pub fn spots_left(&self) -> i64 {
        i64::from(self.max_participants) - self.participants.len() as i64
    }
}
