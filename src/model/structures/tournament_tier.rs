use serde_repr::{Deserialize_repr, Serialize_repr};
use strum_macros::EnumIter;

/// Tournament importance. Higher tiers move ratings further per match.
#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[repr(u8)]
pub enum TournamentTier {
    GrandSlam = 0,
    Masters = 1,
    Atp1000 = 2,
    Atp500 = 3,
    Atp250 = 4,
    Challenger = 5,
    Futures = 6
}

pub const DEFAULT_TOURNAMENT_WEIGHT: f64 = 1.0;

impl TournamentTier {
    pub fn weight(&self) -> f64 {
        match self {
            TournamentTier::GrandSlam => 1.5,
            TournamentTier::Masters => 1.3,
            TournamentTier::Atp1000 => 1.2,
            TournamentTier::Atp500 => 1.1,
            TournamentTier::Atp250 => 1.0,
            TournamentTier::Challenger => 0.8,
            TournamentTier::Futures => 0.6
        }
    }

    /// Parses a tournament level as found in ingested data: either the single-letter /
    /// numeric codes (`G`, `M`, `1000`, `500`, `250`, `C`, `F`) or long names
    /// (`grand_slam`, `atp_1000`, ...). `M` and `1000` are distinct levels.
    pub fn from_level(level: &str) -> Option<TournamentTier> {
        match level.trim().to_lowercase().as_str() {
            "g" | "grand_slam" | "grandslam" => Some(TournamentTier::GrandSlam),
            "m" | "masters" => Some(TournamentTier::Masters),
            "1000" | "atp_1000" => Some(TournamentTier::Atp1000),
            "500" | "atp_500" => Some(TournamentTier::Atp500),
            "250" | "atp_250" => Some(TournamentTier::Atp250),
            "c" | "challenger" => Some(TournamentTier::Challenger),
            "f" | "futures" => Some(TournamentTier::Futures),
            _ => None
        }
    }
}

/// Weight for an optional tier; unknown tiers count as a regular tour event.
pub fn tournament_weight(tier: Option<TournamentTier>) -> f64 {
    tier.map_or(DEFAULT_TOURNAMENT_WEIGHT, |t| t.weight())
}
