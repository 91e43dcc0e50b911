use crate::{
    database::db_structs::Match,
    model::structures::{surface::Surface, tournament_tier::TournamentTier}
};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strum::IntoEnumIterator;

/// Midnight UTC, `days` days after 2020-01-01.
pub fn timestamp(days: i64) -> DateTime<FixedOffset> {
    let epoch = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap().fixed_offset();
    epoch + Duration::days(days)
}

pub fn generate_match(
    id: i32,
    competitor_a: i32,
    competitor_b: i32,
    winner: i32,
    day: i64,
    surface: Option<Surface>,
    tournament_tier: Option<TournamentTier>
) -> Match {
    Match {
        id,
        competitor_a: Some(competitor_a),
        competitor_b: Some(competitor_b),
        winner: Some(winner),
        played_at: timestamp(day),
        surface,
        tournament_tier
    }
}

/// `n` valid matches between `n_competitors` competitors (ids 1..=n), one per day, ids
/// ascending, with random pairings, winners, surfaces and tiers. Seeded for reproducibility.
pub fn generate_random_matches(n: usize, n_competitors: i32, seed: u64) -> Vec<Match> {
    generate_random_matches_from(1, 0, n, n_competitors, seed)
}

/// Like `generate_random_matches`, starting from match id `first_id` on day `first_day`.
/// Useful for appending a tail to an existing history.
pub fn generate_random_matches_from(
    first_id: i32,
    first_day: i64,
    n: usize,
    n_competitors: i32,
    seed: u64
) -> Vec<Match> {
    if n_competitors < 2 {
        panic!("At least two competitors are required");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let surfaces = Surface::iter().collect::<Vec<_>>();
    let tiers = TournamentTier::iter().collect::<Vec<_>>();

    (0..n)
        .map(|i| {
            let a = rng.random_range(1..=n_competitors);
            let mut b = rng.random_range(1..=n_competitors);
            while b == a {
                b = rng.random_range(1..=n_competitors);
            }

            let winner = if rng.random_bool(0.5) { a } else { b };
            let surface = if rng.random_bool(0.8) {
                Some(surfaces[rng.random_range(0..surfaces.len())])
            } else {
                None
            };
            let tier = if rng.random_bool(0.9) {
                Some(tiers[rng.random_range(0..tiers.len())])
            } else {
                None
            };

            generate_match(
                first_id + i as i32,
                a,
                b,
                winner,
                first_day + i as i64,
                surface,
                tier
            )
        })
        .collect()
}

/// Competitor 1 beats competitor 2 `n` times in a row at the highest weight.
pub fn generate_streak(n: usize) -> Vec<Match> {
    (0..n)
        .map(|i| {
            generate_match(
                i as i32 + 1,
                1,
                2,
                1,
                i as i64,
                Some(Surface::Clay),
                Some(TournamentTier::GrandSlam)
            )
        })
        .collect()
}
