use crate::model::structures::{
    experience_tier::ExperienceTier, model_kind::ModelKind, outcome::Outcome, rating_state::RatingState
};

/// What a single match is worth to each side: the tournament weight, plus the
/// experience tier of each competitor on the chain being updated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stakes {
    pub tournament_weight: f64,
    pub tier_a: ExperienceTier,
    pub tier_b: ExperienceTier
}

impl Stakes {
    pub fn new(tournament_weight: f64, tier_a: ExperienceTier, tier_b: ExperienceTier) -> Stakes {
        Stakes {
            tournament_weight,
            tier_a,
            tier_b
        }
    }

    /// Per-side step multiplier: experience base rate × tournament weight.
    pub fn k_factors(&self) -> (f64, f64) {
        (
            self.tier_a.base_rate() * self.tournament_weight,
            self.tier_b.base_rate() * self.tournament_weight
        )
    }
}

/// Closed range a value is clamped into before it is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Bounds {
        Bounds { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Result of one model update for both participants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateResult {
    Rated(RatingState, RatingState),
    /// The model produced NaN/Infinity; the pre-match states are carried through unchanged.
    Rejected(RatingState, RatingState)
}

impl UpdateResult {
    pub fn states(&self) -> (RatingState, RatingState) {
        match self {
            UpdateResult::Rated(a, b) | UpdateResult::Rejected(a, b) => (*a, *b)
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, UpdateResult::Rejected(..))
    }
}

/// A pairwise rating algorithm. Implementations are pure: no state beyond their constants.
pub trait RatingModel: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// State assumed for a competitor with no rating on a chain.
    fn prior(&self) -> RatingState;

    fn rating_bounds(&self) -> Bounds;

    fn deviation_bounds(&self) -> Option<Bounds> {
        None
    }

    fn volatility_bounds(&self) -> Option<Bounds> {
        None
    }

    /// Raw update. May return out-of-range or non-finite values; callers go through `update`.
    fn rate(&self, a: &RatingState, b: &RatingState, outcome: Outcome, stakes: &Stakes) -> (RatingState, RatingState);

    fn clamp(&self, state: RatingState) -> RatingState {
        RatingState {
            rating: self.rating_bounds().clamp(state.rating),
            deviation: match (state.deviation, self.deviation_bounds()) {
                (Some(d), Some(bounds)) => Some(bounds.clamp(d)),
                (d, _) => d
            },
            volatility: match (state.volatility, self.volatility_bounds()) {
                (Some(v), Some(bounds)) => Some(bounds.clamp(v)),
                (v, _) => v
            }
        }
    }

    /// Rates a match, rejecting non-finite results and clamping everything else into range.
    fn update(&self, a: &RatingState, b: &RatingState, outcome: Outcome, stakes: &Stakes) -> UpdateResult {
        let (new_a, new_b) = self.rate(a, b, outcome, stakes);

        if !new_a.is_finite() || !new_b.is_finite() {
            return UpdateResult::Rejected(*a, *b);
        }

        UpdateResult::Rated(self.clamp(new_a), self.clamp(new_b))
    }
}

/// Instantiates the model for a kind.
pub fn model_for(kind: ModelKind) -> Box<dyn RatingModel> {
    match kind {
        ModelKind::Elo => Box::new(crate::model::elo::EloModel),
        ModelKind::Glicko2 => Box::new(crate::model::glicko2::Glicko2Model),
        ModelKind::TrueSkill => Box::new(crate::model::trueskill::TrueSkillModel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structures::{model_kind::ModelKind, outcome::Outcome};

    struct BrokenModel;

    impl RatingModel for BrokenModel {
        fn kind(&self) -> ModelKind {
            ModelKind::Elo
        }

        fn prior(&self) -> RatingState {
            RatingState::new(1500.0, None, None)
        }

        fn rating_bounds(&self) -> Bounds {
            Bounds::new(0.0, 10.0)
        }

        fn rate(&self, a: &RatingState, b: &RatingState, _: Outcome, _: &Stakes) -> (RatingState, RatingState) {
            (RatingState::new(f64::NAN, None, None), RatingState::new(b.rating + 1e9, None, None))
        }
    }

    fn stakes() -> Stakes {
        Stakes::new(1.0, ExperienceTier::New, ExperienceTier::New)
    }

    #[test]
    fn test_nan_is_rejected() {
        let a = RatingState::new(5.0, None, None);
        let b = RatingState::new(6.0, None, None);
        let result = BrokenModel.update(&a, &b, Outcome::FirstWon, &stakes());

        assert!(result.is_rejected());
        assert_eq!(result.states(), (a, b));
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = Bounds::new(800.0, 2200.0);
        assert_eq!(bounds.clamp(100.0), 800.0);
        assert_eq!(bounds.clamp(3000.0), 2200.0);
        assert_eq!(bounds.clamp(1500.0), 1500.0);
        assert!(bounds.contains(800.0));
        assert!(!bounds.contains(799.9));
    }

    #[test]
    fn test_k_factors_are_per_side() {
        let stakes = Stakes::new(1.5, ExperienceTier::New, ExperienceTier::Established);
        assert_eq!(stakes.k_factors(), (60.0, 48.0));
    }
}
