use crate::model::structures::{
    match_position::MatchPosition, model_kind::ModelKind, rating_context::RatingContext, rating_state::RatingState,
    surface::Surface, tournament_tier::TournamentTier
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A played match as delivered by ingestion. Never mutated by the processor.
///
/// Participant references are optional because ingested rows can be incomplete;
/// such matches are skipped rather than rated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub id: i32,
    pub competitor_a: Option<i32>,
    pub competitor_b: Option<i32>,
    pub winner: Option<i32>,
    pub played_at: DateTime<FixedOffset>,
    pub surface: Option<Surface>,
    pub tournament_tier: Option<TournamentTier>
}

impl Match {
    pub fn position(&self) -> MatchPosition {
        MatchPosition::new(self.played_at, self.id)
    }
}

/// Sorts matches into the total order (timestamp, then id).
pub fn sort_matches(matches: &mut [Match]) {
    matches.sort_by_key(|m| m.position());
}

/// One append-only rating record: the state of one competitor's chain right after one match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingSnapshot {
    pub competitor_id: i32,
    pub model: ModelKind,
    pub context: RatingContext,
    pub state: RatingState,
    pub match_id: i32,
    pub position: MatchPosition
}
