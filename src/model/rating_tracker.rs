use indexmap::IndexMap;
use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;

use crate::model::structures::{
    experience_tier::ExperienceTier, match_position::MatchPosition, model_kind::ModelKind,
    rating_context::RatingContext, rating_state::RatingState
};

/// (competitor, model, context)
pub type RatingKey = (i32, ModelKind, RatingContext);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedRating {
    pub state: RatingState,
    /// Number of snapshots recorded on this chain so far; drives the experience tier.
    pub rated_count: u32,
    /// Position of the match that produced `state`, if any.
    pub position: Option<MatchPosition>
}

/// Aggregate over the current ratings of one (model, context) pair.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChainSummary {
    pub model: ModelKind,
    pub context: RatingContext,
    pub competitors: usize,
    pub mean_rating: f64,
    pub min_rating: f64,
    pub max_rating: f64,
    pub mean_deviation: Option<f64>
}

/// In-memory current-state cache for every rating chain touched by a run.
///
/// Lookups never fall through to persistence; callers that resume mid-stream seed the
/// tracker first (see `seed`). A missing key resolves to the caller-supplied prior.
pub struct RatingTracker {
    ratings: IndexMap<RatingKey, TrackedRating>,
    /// Ratings per (competitor, model) across every context.
    model_counts: IndexMap<(i32, ModelKind), u32>
}

impl Default for RatingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingTracker {
    pub fn new() -> RatingTracker {
        RatingTracker {
            ratings: IndexMap::new(),
            model_counts: IndexMap::new()
        }
    }

    /// Current state for the key, or `prior` when the chain has never been rated.
    pub fn get(&self, competitor_id: i32, model: ModelKind, context: RatingContext, prior: RatingState) -> RatingState {
        self.ratings
            .get(&(competitor_id, model, context))
            .map_or(prior, |r| r.state)
    }

    /// Overwrites the cached state for the key and counts one more rating on the chain.
    /// This does not persist anything.
    pub fn put(
        &mut self,
        competitor_id: i32,
        model: ModelKind,
        context: RatingContext,
        state: RatingState,
        position: MatchPosition
    ) {
        let entry = self
            .ratings
            .entry((competitor_id, model, context))
            .or_insert(TrackedRating {
                state,
                rated_count: 0,
                position: None
            });

        entry.state = state;
        entry.rated_count += 1;
        entry.position = Some(position);

        *self.model_counts.entry((competitor_id, model)).or_insert(0) += 1;
    }

    /// Installs a chain's state as loaded from persistence, without counting a new rating.
    pub fn seed(&mut self, key: RatingKey, tracked: TrackedRating) {
        self.ratings.insert(key, tracked);
    }

    /// Installs a competitor's rating count across all contexts of a model.
    pub fn seed_model_count(&mut self, competitor_id: i32, model: ModelKind, count: u32) {
        self.model_counts.insert((competitor_id, model), count);
    }

    pub fn has_model_count(&self, competitor_id: i32, model: ModelKind) -> bool {
        self.model_counts.contains_key(&(competitor_id, model))
    }

    pub fn model_count(&self, competitor_id: i32, model: ModelKind) -> u32 {
        self.model_counts.get(&(competitor_id, model)).copied().unwrap_or(0)
    }

    pub fn contains(&self, competitor_id: i32, model: ModelKind, context: RatingContext) -> bool {
        self.ratings.contains_key(&(competitor_id, model, context))
    }

    pub fn rated_count(&self, competitor_id: i32, model: ModelKind, context: RatingContext) -> u32 {
        self.ratings
            .get(&(competitor_id, model, context))
            .map_or(0, |r| r.rated_count)
    }

    /// The overall chain's tier counts every rating under the model, surface ratings included;
    /// a surface chain's tier counts only that surface.
    pub fn experience_tier(&self, competitor_id: i32, model: ModelKind, context: RatingContext) -> ExperienceTier {
        let count = match context {
            RatingContext::Overall => self.model_count(competitor_id, model),
            RatingContext::Surface(_) => self.rated_count(competitor_id, model, context)
        };

        ExperienceTier::from_rated_count(count)
    }

    pub fn get_tracked(&self, competitor_id: i32, model: ModelKind, context: RatingContext) -> Option<&TrackedRating> {
        self.ratings.get(&(competitor_id, model, context))
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// All tracked chains, in first-touched order.
    pub fn iter(&self) -> impl Iterator<Item = (&RatingKey, &TrackedRating)> {
        self.ratings.iter()
    }

    /// Count / mean / min / max of current ratings per (model, context).
    /// Chains are independent, so each group is aggregated in parallel.
    pub fn summarize(&self) -> Vec<ChainSummary> {
        let groups = self
            .ratings
            .iter()
            .map(|((_, model, context), tracked)| ((*model, *context), tracked.state))
            .into_group_map();

        let mut summaries: Vec<ChainSummary> = groups
            .into_par_iter()
            .map(|((model, context), states)| {
                let n = states.len();
                let ratings = states.iter().map(|s| s.rating).collect_vec();
                let deviations = states.iter().filter_map(|s| s.deviation).collect_vec();

                ChainSummary {
                    model,
                    context,
                    competitors: n,
                    mean_rating: ratings.iter().sum::<f64>() / n as f64,
                    min_rating: ratings.iter().cloned().fold(f64::INFINITY, f64::min),
                    max_rating: ratings.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
                    mean_deviation: if deviations.is_empty() {
                        None
                    } else {
                        Some(deviations.iter().sum::<f64>() / deviations.len() as f64)
                    }
                }
            })
            .collect();

        summaries.sort_by(|a, b| (a.model, a.context).cmp(&(b.model, b.context)));
        summaries
    }
}
