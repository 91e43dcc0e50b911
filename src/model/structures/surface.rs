use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Surface {
    Hard,
    Clay,
    Grass,
    Carpet
}

impl Surface {
    /// Maps free-form court descriptions ("Hard (indoor)", "red clay") onto a surface.
    /// Returns `None` when nothing recognisable is present.
    pub fn normalize(raw: &str) -> Option<Surface> {
        let lowered = raw.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }

        if lowered.contains("hard") {
            Some(Surface::Hard)
        } else if lowered.contains("clay") {
            Some(Surface::Clay)
        } else if lowered.contains("grass") {
            Some(Surface::Grass)
        } else if lowered.contains("carpet") {
            Some(Surface::Carpet)
        } else {
            None
        }
    }
}
