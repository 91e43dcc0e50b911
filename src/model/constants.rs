// Experience tiers
pub const DEVELOPING_THRESHOLD: u32 = 10;
pub const ESTABLISHED_THRESHOLD: u32 = 30;
pub const NEW_K_FACTOR: f64 = 40.0;
pub const DEVELOPING_K_FACTOR: f64 = 35.0;
pub const ESTABLISHED_K_FACTOR: f64 = 32.0;

// Elo
pub const ELO_DEFAULT_RATING: f64 = 1500.0;
pub const ELO_SCALE: f64 = 400.0;
pub const ELO_RATING_FLOOR: f64 = 100.0;
pub const ELO_RATING_CEILING: f64 = 4000.0;

// Glicko2 (native scale, simplified)
pub const GLICKO2_DEFAULT_RATING: f64 = 1500.0;
pub const GLICKO2_DEFAULT_DEVIATION: f64 = 350.0;
pub const GLICKO2_DEFAULT_VOLATILITY: f64 = 0.06;
pub const GLICKO2_BASE_K: f64 = 24.0;
pub const GLICKO2_DEVIATION_DECAY: f64 = 0.998;
pub const GLICKO2_RATING_FLOOR: f64 = 800.0;
pub const GLICKO2_RATING_CEILING: f64 = 2200.0;
pub const GLICKO2_DEVIATION_FLOOR: f64 = 20.0;
pub const GLICKO2_DEVIATION_CEILING: f64 = 350.0;
pub const GLICKO2_VOLATILITY_FLOOR: f64 = 0.01;
pub const GLICKO2_VOLATILITY_CEILING: f64 = 0.2;

// TrueSkill (simplified)
pub const TRUESKILL_DEFAULT_RATING: f64 = 1500.0;
pub const TRUESKILL_DEFAULT_SIGMA: f64 = 500.0;
pub const TRUESKILL_BETA: f64 = 200.0;
pub const TRUESKILL_SIGMA_DECAY: f64 = 0.995;
pub const TRUESKILL_RATING_FLOOR: f64 = 0.0;
pub const TRUESKILL_RATING_CEILING: f64 = 3000.0;
pub const TRUESKILL_SIGMA_FLOOR: f64 = 10.0;
pub const TRUESKILL_SIGMA_CEILING: f64 = 1000.0;

// Persistence
pub const DEFAULT_BATCH_SIZE: usize = 4000;
