use async_trait::async_trait;

use crate::{
    database::db_structs::{Match, RatingSnapshot},
    error::Result,
    model::structures::{match_position::MatchPosition, model_kind::ModelKind, rating_context::RatingContext}
};

/// Persistence for the match stream and the append-only snapshot log.
///
/// `before`, where present, restricts a lookup to snapshots produced by matches strictly
/// earlier in the total order than the given position; `None` means the whole log.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Every match, in total order.
    async fn matches(&self) -> Result<Vec<Match>>;

    /// Matches without a single snapshot for `model`, in total order.
    async fn unrated_matches(&self, model: ModelKind) -> Result<Vec<Match>>;

    async fn latest_snapshot(
        &self,
        competitor_id: i32,
        model: ModelKind,
        context: RatingContext,
        before: Option<MatchPosition>
    ) -> Result<Option<RatingSnapshot>>;

    async fn count_snapshots(
        &self,
        competitor_id: i32,
        model: ModelKind,
        context: RatingContext,
        before: Option<MatchPosition>
    ) -> Result<u32>;

    /// Snapshots for a competitor under `model` across every context.
    async fn count_model_snapshots(
        &self,
        competitor_id: i32,
        model: ModelKind,
        before: Option<MatchPosition>
    ) -> Result<u32>;

    /// Position of the latest match that has at least one snapshot for `model`.
    async fn latest_rated_position(&self, model: ModelKind) -> Result<Option<MatchPosition>>;

    /// Appends all snapshots atomically: either every row is durable afterwards or none is.
    async fn append_snapshots(&self, snapshots: &[RatingSnapshot]) -> Result<()>;

    async fn clear_snapshots(&self, models: &[ModelKind]) -> Result<()>;

    /// A chain's snapshots in total order.
    async fn snapshot_history(
        &self,
        competitor_id: i32,
        model: ModelKind,
        context: RatingContext
    ) -> Result<Vec<RatingSnapshot>>;
}
