use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    FirstWon,
    SecondWon
}

impl Outcome {
    /// Actual scores (first, second).
    pub fn scores(&self) -> (f64, f64) {
        match self {
            Outcome::FirstWon => (1.0, 0.0),
            Outcome::SecondWon => (0.0, 1.0)
        }
    }
}
