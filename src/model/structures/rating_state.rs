use serde::{Deserialize, Serialize};

/// One competitor's state on one chain. `deviation` is phi (Glicko2) or sigma (TrueSkill);
/// Elo carries neither deviation nor volatility.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RatingState {
    pub rating: f64,
    pub deviation: Option<f64>,
    pub volatility: Option<f64>
}

impl RatingState {
    pub fn new(rating: f64, deviation: Option<f64>, volatility: Option<f64>) -> RatingState {
        RatingState {
            rating,
            deviation,
            volatility
        }
    }

    pub fn is_finite(&self) -> bool {
        self.rating.is_finite()
            && self.deviation.map_or(true, f64::is_finite)
            && self.volatility.map_or(true, f64::is_finite)
    }
}
