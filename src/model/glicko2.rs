use std::f64::consts::PI;

use crate::model::{
    constants::*,
    rating_model::{Bounds, RatingModel, Stakes},
    structures::{model_kind::ModelKind, outcome::Outcome, rating_state::RatingState}
};

/// Simplified Glicko2 on the native rating scale.
///
/// Differences from canonical Glicko-2:
/// - no conversion to the internal (÷173.7178) scale
/// - mu moves by a fixed K (scaled by tournament weight) times the expected-score error
/// - phi shrinks by a constant factor per match down to a floor and never re-widens
/// - volatility is carried forward, never solved for
pub struct Glicko2Model;

impl Glicko2Model {
    /// Impact of an opponent's deviation: `g(phi) = 1 / sqrt(1 + 3 * phi^2 / pi^2)`
    pub fn g(phi: f64) -> f64 {
        1.0 / (1.0 + 3.0 * phi.powi(2) / PI.powi(2)).sqrt()
    }

    /// Expected score of `mu` against an opponent with `opponent_mu` / `opponent_phi`.
    pub fn expected_score(mu: f64, opponent_mu: f64, opponent_phi: f64) -> f64 {
        1.0 / (1.0 + (-Self::g(opponent_phi) * (mu - opponent_mu)).exp())
    }

    fn decay_deviation(phi: f64) -> f64 {
        (phi * GLICKO2_DEVIATION_DECAY).max(GLICKO2_DEVIATION_FLOOR)
    }
}

impl RatingModel for Glicko2Model {
    fn kind(&self) -> ModelKind {
        ModelKind::Glicko2
    }

    fn prior(&self) -> RatingState {
        RatingState::new(
            GLICKO2_DEFAULT_RATING,
            Some(GLICKO2_DEFAULT_DEVIATION),
            Some(GLICKO2_DEFAULT_VOLATILITY)
        )
    }

    fn rating_bounds(&self) -> Bounds {
        Bounds::new(GLICKO2_RATING_FLOOR, GLICKO2_RATING_CEILING)
    }

    fn deviation_bounds(&self) -> Option<Bounds> {
        Some(Bounds::new(GLICKO2_DEVIATION_FLOOR, GLICKO2_DEVIATION_CEILING))
    }

    fn volatility_bounds(&self) -> Option<Bounds> {
        Some(Bounds::new(GLICKO2_VOLATILITY_FLOOR, GLICKO2_VOLATILITY_CEILING))
    }

    fn rate(&self, a: &RatingState, b: &RatingState, outcome: Outcome, stakes: &Stakes) -> (RatingState, RatingState) {
        let phi_a = a.deviation.unwrap_or(GLICKO2_DEFAULT_DEVIATION);
        let phi_b = b.deviation.unwrap_or(GLICKO2_DEFAULT_DEVIATION);
        let vol_a = a.volatility.unwrap_or(GLICKO2_DEFAULT_VOLATILITY);
        let vol_b = b.volatility.unwrap_or(GLICKO2_DEFAULT_VOLATILITY);

        let expected_a = Self::expected_score(a.rating, b.rating, phi_b);
        let expected_b = Self::expected_score(b.rating, a.rating, phi_a);
        let (actual_a, actual_b) = outcome.scores();

        let k = GLICKO2_BASE_K * stakes.tournament_weight;

        (
            RatingState::new(
                a.rating + k * (actual_a - expected_a),
                Some(Self::decay_deviation(phi_a)),
                Some(vol_a)
            ),
            RatingState::new(
                b.rating + k * (actual_b - expected_b),
                Some(Self::decay_deviation(phi_b)),
                Some(vol_b)
            )
        )
    }
}
