use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The rating algorithm a snapshot was produced by.
///
/// Persisted as the lowercase name (`elo`, `glicko2`, `trueskill`).
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ModelKind {
    Elo,
    Glicko2,
    TrueSkill
}
