use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A match's place in the total order: timestamp first, id as tie-breaker.
/// Field order matters for the derived `Ord`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchPosition {
    pub played_at: DateTime<FixedOffset>,
    pub match_id: i32
}

impl MatchPosition {
    pub fn new(played_at: DateTime<FixedOffset>, match_id: i32) -> MatchPosition {
        MatchPosition { played_at, match_id }
    }
}
