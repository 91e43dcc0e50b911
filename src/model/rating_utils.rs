use crate::{
    database::{db_structs::RatingSnapshot, snapshot_store::SnapshotStore},
    error::Result,
    model::{
        rating_model::model_for,
        structures::{model_kind::ModelKind, rating_context::RatingContext, rating_state::RatingState}
    }
};

/// Latest state of a chain, or the model's prior if the competitor was never rated in it.
pub async fn current_rating<S: SnapshotStore + ?Sized>(
    store: &S,
    competitor_id: i32,
    model: ModelKind,
    context: RatingContext
) -> Result<RatingState> {
    Ok(store
        .latest_snapshot(competitor_id, model, context, None)
        .await?
        .map_or_else(|| model_for(model).prior(), |s| s.state))
}

/// Every snapshot of a chain, oldest first.
pub async fn rating_history<S: SnapshotStore + ?Sized>(
    store: &S,
    competitor_id: i32,
    model: ModelKind,
    context: RatingContext
) -> Result<Vec<RatingSnapshot>> {
    store.snapshot_history(competitor_id, model, context).await
}
