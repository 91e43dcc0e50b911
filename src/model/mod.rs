pub mod constants;
pub mod elo;
pub mod glicko2;
pub mod rating_model;
pub mod rating_processor;
pub mod rating_tracker;
pub mod rating_utils;
pub mod recalc;
pub mod structures;
pub mod trueskill;
