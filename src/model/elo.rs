use crate::model::{
    constants::{ELO_DEFAULT_RATING, ELO_RATING_CEILING, ELO_RATING_FLOOR, ELO_SCALE},
    rating_model::{Bounds, RatingModel, Stakes},
    structures::{model_kind::ModelKind, outcome::Outcome, rating_state::RatingState}
};

/// Logistic Elo with per-side K (experience base rate × tournament weight).
pub struct EloModel;

impl EloModel {
    /// `E_i = 1 / (1 + 10^((R_j - R_i) / 400))`
    pub fn expected_score(rating: f64, opponent: f64) -> f64 {
        1.0 / (1.0 + 10f64.powf((opponent - rating) / ELO_SCALE))
    }
}

impl RatingModel for EloModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Elo
    }

    fn prior(&self) -> RatingState {
        RatingState::new(ELO_DEFAULT_RATING, None, None)
    }

    fn rating_bounds(&self) -> Bounds {
        Bounds::new(ELO_RATING_FLOOR, ELO_RATING_CEILING)
    }

    fn rate(&self, a: &RatingState, b: &RatingState, outcome: Outcome, stakes: &Stakes) -> (RatingState, RatingState) {
        let expected_a = Self::expected_score(a.rating, b.rating);
        let expected_b = 1.0 - expected_a;
        let (actual_a, actual_b) = outcome.scores();
        let (k_a, k_b) = stakes.k_factors();

        (
            RatingState::new(a.rating + k_a * (actual_a - expected_a), None, None),
            RatingState::new(b.rating + k_b * (actual_b - expected_b), None, None)
        )
    }
}
