use super::surface::Surface;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scope a rating chain is tracked under. Overall and per-surface chains share no state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RatingContext {
    Overall,
    Surface(Surface)
}

impl RatingContext {
    /// The nullable surface column value for this context.
    pub fn surface(&self) -> Option<Surface> {
        match self {
            RatingContext::Overall => None,
            RatingContext::Surface(s) => Some(*s)
        }
    }

    /// Contexts a match is rated under: overall always, plus its surface when known.
    pub fn for_match(surface: Option<Surface>) -> Vec<RatingContext> {
        let mut contexts = vec![RatingContext::Overall];
        if let Some(s) = surface {
            contexts.push(RatingContext::Surface(s));
        }

        contexts
    }
}

impl From<Option<Surface>> for RatingContext {
    fn from(surface: Option<Surface>) -> Self {
        match surface {
            Some(s) => RatingContext::Surface(s),
            None => RatingContext::Overall
        }
    }
}

impl fmt::Display for RatingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingContext::Overall => write!(f, "overall"),
            RatingContext::Surface(s) => write!(f, "{}", s)
        }
    }
}
