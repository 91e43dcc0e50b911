use crate::model::constants::{
    DEVELOPING_K_FACTOR, DEVELOPING_THRESHOLD, ESTABLISHED_K_FACTOR, ESTABLISHED_THRESHOLD, NEW_K_FACTOR
};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Learning-rate bracket from how many ratings a competitor already has on one chain.
#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExperienceTier {
    New = 0,
    Developing = 1,
    Established = 2
}

impl ExperienceTier {
    pub fn from_rated_count(count: u32) -> ExperienceTier {
        if count < DEVELOPING_THRESHOLD {
            ExperienceTier::New
        } else if count < ESTABLISHED_THRESHOLD {
            ExperienceTier::Developing
        } else {
            ExperienceTier::Established
        }
    }

    pub fn base_rate(&self) -> f64 {
        match self {
            ExperienceTier::New => NEW_K_FACTOR,
            ExperienceTier::Developing => DEVELOPING_K_FACTOR,
            ExperienceTier::Established => ESTABLISHED_K_FACTOR
        }
    }
}
