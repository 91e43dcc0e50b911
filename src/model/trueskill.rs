use crate::model::{
    constants::*,
    rating_model::{Bounds, RatingModel, Stakes},
    structures::{model_kind::ModelKind, outcome::Outcome, rating_state::RatingState}
};

/// Simplified two-player TrueSkill.
///
/// The Gaussian factor-graph update is replaced by a logistic expectation over the
/// combined performance spread `c`, and each side takes a share of the step proportional
/// to its own performance variance. Sigma shrinks by a constant factor per match.
pub struct TrueSkillModel;

impl TrueSkillModel {
    pub fn performance_variance(sigma: f64) -> f64 {
        sigma.powi(2) + TRUESKILL_BETA.powi(2)
    }

    /// `c = sqrt(2 * beta^2 + sigma_a^2 + sigma_b^2)`
    pub fn combined_spread(sigma_a: f64, sigma_b: f64) -> f64 {
        (2.0 * TRUESKILL_BETA.powi(2) + sigma_a.powi(2) + sigma_b.powi(2)).sqrt()
    }

    pub fn expected_score(mu: f64, opponent_mu: f64, c: f64) -> f64 {
        1.0 / (1.0 + (-(mu - opponent_mu) / c).exp())
    }

    fn decay_sigma(sigma: f64) -> f64 {
        (sigma * TRUESKILL_SIGMA_DECAY).max(TRUESKILL_SIGMA_FLOOR)
    }
}

impl RatingModel for TrueSkillModel {
    fn kind(&self) -> ModelKind {
        ModelKind::TrueSkill
    }

    fn prior(&self) -> RatingState {
        RatingState::new(TRUESKILL_DEFAULT_RATING, Some(TRUESKILL_DEFAULT_SIGMA), None)
    }

    fn rating_bounds(&self) -> Bounds {
        Bounds::new(TRUESKILL_RATING_FLOOR, TRUESKILL_RATING_CEILING)
    }

    fn deviation_bounds(&self) -> Option<Bounds> {
        Some(Bounds::new(TRUESKILL_SIGMA_FLOOR, TRUESKILL_SIGMA_CEILING))
    }

    fn rate(&self, a: &RatingState, b: &RatingState, outcome: Outcome, stakes: &Stakes) -> (RatingState, RatingState) {
        let sigma_a = a.deviation.unwrap_or(TRUESKILL_DEFAULT_SIGMA);
        let sigma_b = b.deviation.unwrap_or(TRUESKILL_DEFAULT_SIGMA);

        let var_a = Self::performance_variance(sigma_a);
        let var_b = Self::performance_variance(sigma_b);
        let share_a = var_a / (var_a + var_b);
        let share_b = var_b / (var_a + var_b);

        let c = Self::combined_spread(sigma_a, sigma_b);
        let expected_a = Self::expected_score(a.rating, b.rating, c);
        let expected_b = 1.0 - expected_a;
        let (actual_a, actual_b) = outcome.scores();

        // A full upset against an even opponent moves the pair apart by 2 * beta at weight 1.0.
        let step = 2.0 * TRUESKILL_BETA * stakes.tournament_weight.sqrt();

        (
            RatingState::new(
                a.rating + step * share_a * (actual_a - expected_a),
                Some(Self::decay_sigma(sigma_a)),
                None
            ),
            RatingState::new(
                b.rating + step * share_b * (actual_b - expected_b),
                Some(Self::decay_sigma(sigma_b)),
                None
            )
        )
    }
}
