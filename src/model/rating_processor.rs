use itertools::Itertools;
use tracing::{debug, warn};

use crate::{
    database::db_structs::{Match, RatingSnapshot},
    error::{ProcessorError, Result},
    model::{
        rating_model::{model_for, RatingModel, Stakes},
        rating_tracker::{RatingKey, RatingTracker},
        structures::{
            model_kind::ModelKind, outcome::Outcome, rating_context::RatingContext,
            tournament_tier::tournament_weight
        }
    }
};

/// What one match produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RatedMatch {
    pub match_id: i32,
    pub snapshots: Vec<RatingSnapshot>,
    /// Models whose update was rejected as non-finite; their snapshots repeat the pre-match state.
    pub rejected: Vec<ModelKind>
}

/// Totals from folding a sequence of matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessSummary {
    pub processed: usize,
    pub skipped: usize,
    pub numeric_rejections: usize
}

impl ProcessSummary {
    pub fn record(&mut self, result: &Result<RatedMatch>) {
        match result {
            Ok(rated) => {
                self.processed += 1;
                self.numeric_rejections += rated.rejected.len();
            }
            Err(_) => self.skipped += 1
        }
    }
}

/// Resolves the two competitors and the outcome, or the reason the match cannot be rated.
pub fn participants(match_: &Match) -> Result<(i32, i32, Outcome)> {
    let (Some(a), Some(b), Some(winner)) = (match_.competitor_a, match_.competitor_b, match_.winner) else {
        return Err(ProcessorError::MissingParticipant { match_id: match_.id });
    };

    if a == b {
        return Err(ProcessorError::MissingParticipant { match_id: match_.id });
    }

    if winner == a {
        Ok((a, b, Outcome::FirstWon))
    } else if winner == b {
        Ok((a, b, Outcome::SecondWon))
    } else {
        Err(ProcessorError::InvalidWinner {
            match_id: match_.id,
            winner
        })
    }
}

/// Folds matches, in total order, into the rating chains of a fixed set of models.
///
/// Per match and per model: load both competitors' overall state, rate, store, then do the
/// same for the surface context when the match has one. The tracker is the only state
/// carried between matches.
pub struct RatingProcessor {
    pub rating_tracker: RatingTracker,
    models: Vec<Box<dyn RatingModel>>
}

impl RatingProcessor {
    pub fn new(kinds: &[ModelKind]) -> RatingProcessor {
        Self::from_models(kinds.iter().unique().map(|k| model_for(*k)).collect())
    }

    pub fn from_models(models: Vec<Box<dyn RatingModel>>) -> RatingProcessor {
        RatingProcessor {
            rating_tracker: RatingTracker::new(),
            models
        }
    }

    pub fn model_kinds(&self) -> Vec<ModelKind> {
        self.models.iter().map(|m| m.kind()).collect()
    }

    /// Every chain the match would read and write, whether or not the match is valid.
    pub fn keys_for(&self, match_: &Match) -> Vec<RatingKey> {
        let competitors = [match_.competitor_a, match_.competitor_b]
            .into_iter()
            .flatten()
            .collect_vec();
        let contexts = RatingContext::for_match(match_.surface);

        let mut keys = Vec::with_capacity(self.models.len() * contexts.len() * competitors.len());
        for model in &self.models {
            for context in &contexts {
                for competitor_id in &competitors {
                    keys.push((*competitor_id, model.kind(), *context));
                }
            }
        }

        keys
    }

    /// Rates one match under every model and every applicable context.
    ///
    /// Returns `MissingParticipant` / `InvalidWinner` without touching any state when the
    /// match cannot be rated; those errors are already logged.
    pub fn process_match(&mut self, match_: &Match) -> Result<RatedMatch> {
        let (a, b, outcome) = match participants(match_) {
            Ok(p) => p,
            Err(e) => {
                warn!(match_id = match_.id, "Skipping match: {}", e);
                return Err(e);
            }
        };

        let weight = tournament_weight(match_.tournament_tier);
        let position = match_.position();
        let contexts = RatingContext::for_match(match_.surface);

        let mut snapshots = Vec::with_capacity(self.models.len() * contexts.len() * 2);
        let mut rejected = Vec::new();

        for model in &self.models {
            let kind = model.kind();
            let prior = model.prior();

            for context in &contexts {
                let tracker = &mut self.rating_tracker;

                let state_a = tracker.get(a, kind, *context, prior);
                let state_b = tracker.get(b, kind, *context, prior);
                let stakes = Stakes::new(
                    weight,
                    tracker.experience_tier(a, kind, *context),
                    tracker.experience_tier(b, kind, *context)
                );

                let result = model.update(&state_a, &state_b, outcome, &stakes);
                if result.is_rejected() {
                    let e = ProcessorError::NumericInstability {
                        match_id: match_.id,
                        model: kind
                    };
                    warn!(match_id = match_.id, context = %context, "{}; keeping pre-match ratings", e);
                    if !rejected.contains(&kind) {
                        rejected.push(kind);
                    }
                }

                let (new_a, new_b) = result.states();
                tracker.put(a, kind, *context, new_a, position);
                tracker.put(b, kind, *context, new_b, position);

                for (competitor_id, state) in [(a, new_a), (b, new_b)] {
                    snapshots.push(RatingSnapshot {
                        competitor_id,
                        model: kind,
                        context: *context,
                        state,
                        match_id: match_.id,
                        position
                    });
                }
            }
        }

        debug!(match_id = match_.id, snapshots = snapshots.len(), "Rated match");

        Ok(RatedMatch {
            match_id: match_.id,
            snapshots,
            rejected
        })
    }
}
