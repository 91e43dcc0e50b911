use std::{collections::BTreeMap, sync::Once};

use strum::IntoEnumIterator;
use tennis_rating_processor::{
    database::db_structs::RatingSnapshot,
    model::structures::{model_kind::ModelKind, rating_context::RatingContext, rating_state::RatingState}
};

static INIT: Once = Once::new();

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn all_models() -> Vec<ModelKind> {
    ModelKind::iter().collect()
}

/// Final state of every (competitor, model, context) chain in a snapshot log.
pub fn chain_heads(snapshots: &[RatingSnapshot]) -> BTreeMap<(i32, ModelKind, RatingContext), RatingState> {
    let mut heads = BTreeMap::new();
    let mut ordered = snapshots.to_vec();
    ordered.sort_by_key(|s| s.position);

    for s in ordered {
        heads.insert((s.competitor_id, s.model, s.context), s.state);
    }

    heads
}
