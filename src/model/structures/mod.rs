pub mod experience_tier;
pub mod match_position;
pub mod model_kind;
pub mod outcome;
pub mod rating_context;
pub mod rating_state;
pub mod surface;
pub mod tournament_tier;
