use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        RwLock
    }
};

use async_trait::async_trait;
use itertools::Itertools;

use crate::{
    database::{
        db_structs::{sort_matches, Match, RatingSnapshot},
        snapshot_store::SnapshotStore
    },
    error::{ProcessorError, Result},
    model::structures::{match_position::MatchPosition, model_kind::ModelKind, rating_context::RatingContext}
};

/// `SnapshotStore` held entirely in memory. Used for tests and dry runs.
///
/// `fail_appends_after` makes every append after the first `n` successful ones fail, to
/// exercise the fatal persistence path.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    matches: RwLock<Vec<Match>>,
    snapshots: RwLock<Vec<RatingSnapshot>>,
    successful_appends: AtomicUsize,
    fail_appends_after: Option<usize>
}

impl InMemoryStore {
    pub fn new(matches: Vec<Match>) -> InMemoryStore {
        let store = InMemoryStore::default();
        store.add_matches(matches);
        store
    }

    pub fn failing_after(matches: Vec<Match>, successful_appends: usize) -> InMemoryStore {
        InMemoryStore {
            fail_appends_after: Some(successful_appends),
            ..InMemoryStore::new(matches)
        }
    }

    /// Adds matches as ingestion would; keeps the stream in total order.
    pub fn add_matches(&self, matches: Vec<Match>) {
        let mut stored = self.matches.write().unwrap_or_else(|e| e.into_inner());
        stored.extend(matches);
        sort_matches(&mut stored);
    }

    /// Every snapshot, in insertion order.
    pub fn snapshots(&self) -> Vec<RatingSnapshot> {
        self.snapshots.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn read_snapshots(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<RatingSnapshot>>> {
        self.snapshots
            .read()
            .map_err(|_| ProcessorError::Store("snapshot lock poisoned".to_string()))
    }

    fn chain<'a>(
        snapshots: &'a [RatingSnapshot],
        competitor_id: i32,
        model: ModelKind,
        context: RatingContext,
        before: Option<MatchPosition>
    ) -> impl Iterator<Item = &'a RatingSnapshot> {
        snapshots.iter().filter(move |s| {
            s.competitor_id == competitor_id
                && s.model == model
                && s.context == context
                && before.map_or(true, |p| s.position < p)
        })
    }
}

#[async_trait]
impl SnapshotStore for InMemoryStore {
    async fn matches(&self) -> Result<Vec<Match>> {
        let matches = self
            .matches
            .read()
            .map_err(|_| ProcessorError::Store("match lock poisoned".to_string()))?;

        Ok(matches.clone())
    }

    async fn unrated_matches(&self, model: ModelKind) -> Result<Vec<Match>> {
        let rated: HashSet<i32> = self
            .read_snapshots()?
            .iter()
            .filter(|s| s.model == model)
            .map(|s| s.match_id)
            .collect();

        Ok(self
            .matches()
            .await?
            .into_iter()
            .filter(|m| !rated.contains(&m.id))
            .collect())
    }

    async fn latest_snapshot(
        &self,
        competitor_id: i32,
        model: ModelKind,
        context: RatingContext,
        before: Option<MatchPosition>
    ) -> Result<Option<RatingSnapshot>> {
        let snapshots = self.read_snapshots()?;

        Ok(Self::chain(&snapshots, competitor_id, model, context, before)
            .max_by_key(|s| s.position)
            .cloned())
    }

    async fn count_snapshots(
        &self,
        competitor_id: i32,
        model: ModelKind,
        context: RatingContext,
        before: Option<MatchPosition>
    ) -> Result<u32> {
        let snapshots = self.read_snapshots()?;

        Ok(Self::chain(&snapshots, competitor_id, model, context, before).count() as u32)
    }

    async fn count_model_snapshots(
        &self,
        competitor_id: i32,
        model: ModelKind,
        before: Option<MatchPosition>
    ) -> Result<u32> {
        Ok(self
            .read_snapshots()?
            .iter()
            .filter(|s| s.competitor_id == competitor_id && s.model == model && before.map_or(true, |p| s.position < p))
            .count() as u32)
    }

    async fn latest_rated_position(&self, model: ModelKind) -> Result<Option<MatchPosition>> {
        Ok(self
            .read_snapshots()?
            .iter()
            .filter(|s| s.model == model)
            .map(|s| s.position)
            .max())
    }

    async fn append_snapshots(&self, snapshots: &[RatingSnapshot]) -> Result<()> {
        if let Some(limit) = self.fail_appends_after {
            if self.successful_appends.load(Ordering::SeqCst) >= limit {
                return Err(ProcessorError::Store("simulated write failure".to_string()));
            }
        }

        self.snapshots
            .write()
            .map_err(|_| ProcessorError::Store("snapshot lock poisoned".to_string()))?
            .extend_from_slice(snapshots);
        self.successful_appends.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }

    async fn clear_snapshots(&self, models: &[ModelKind]) -> Result<()> {
        self.snapshots
            .write()
            .map_err(|_| ProcessorError::Store("snapshot lock poisoned".to_string()))?
            .retain(|s| !models.contains(&s.model));

        Ok(())
    }

    async fn snapshot_history(
        &self,
        competitor_id: i32,
        model: ModelKind,
        context: RatingContext
    ) -> Result<Vec<RatingSnapshot>> {
        let snapshots = self.read_snapshots()?;

        Ok(Self::chain(&snapshots, competitor_id, model, context, None)
            .sorted_by_key(|s| s.position)
            .cloned()
            .collect())
    }
}
