use tracing::debug;

use crate::{
    database::{db_structs::RatingSnapshot, snapshot_store::SnapshotStore},
    error::{ProcessorError, Result}
};

/// Buffers snapshots and appends them to the store in bulk.
///
/// Snapshots are accepted a whole match at a time and a flush only happens between
/// matches, so a committed batch never holds part of a match. Batch size affects write
/// latency only, never results.
pub struct SnapshotBatchWriter<'a, S: SnapshotStore + ?Sized> {
    store: &'a S,
    batch_size: usize,
    buffer: Vec<RatingSnapshot>,
    committed: usize
}

impl<'a, S: SnapshotStore + ?Sized> SnapshotBatchWriter<'a, S> {
    pub fn new(store: &'a S, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            store,
            batch_size,
            buffer: Vec::with_capacity(batch_size),
            committed: 0
        }
    }

    /// Queues one match's snapshots, flushing when the buffer has reached the batch size.
    pub async fn push_match(&mut self, snapshots: Vec<RatingSnapshot>) -> Result<()> {
        self.buffer.extend(snapshots);

        if self.buffer.len() >= self.batch_size {
            self.flush().await?;
        }

        Ok(())
    }

    /// Writes everything buffered. Any failure is fatal to the run.
    pub async fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        if let Err(e) = self.store.append_snapshots(&self.buffer).await {
            return Err(ProcessorError::PersistenceHalted {
                committed: self.committed,
                source: Box::new(e)
            });
        }

        self.committed += self.buffer.len();
        debug!(batch = self.buffer.len(), committed = self.committed, "Flushed snapshot batch");
        self.buffer.clear();

        Ok(())
    }

    /// Flushes the remainder and returns the total number of snapshots committed.
    pub async fn finish(mut self) -> Result<usize> {
        self.flush().await?;
        Ok(self.committed)
    }

    pub fn committed(&self) -> usize {
        self.committed
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::SnapshotBatchWriter;
    use crate::{
        database::memory_store::InMemoryStore,
        error::ProcessorError,
        model::{rating_processor::RatingProcessor, structures::model_kind::ModelKind},
        utils::test_utils::{generate_match, generate_random_matches}
    };
    use strum::IntoEnumIterator;

    #[tokio::test]
    async fn test_flushes_on_match_boundaries() {
        let store = InMemoryStore::new(vec![]);
        let mut processor = RatingProcessor::new(&ModelKind::iter().collect::<Vec<_>>());
        let mut writer = SnapshotBatchWriter::new(&store, 10);

        // 6 snapshots per overall-only match: nothing flushed after the first, 12 after the second.
        let first = processor.process_match(&generate_match(1, 1, 2, 1, 0, None, None)).unwrap();
        writer.push_match(first.snapshots).await.unwrap();
        assert_eq!(writer.committed(), 0);
        assert_eq!(writer.buffered(), 6);

        let second = processor.process_match(&generate_match(2, 1, 2, 2, 1, None, None)).unwrap();
        writer.push_match(second.snapshots).await.unwrap();
        assert_eq!(writer.committed(), 12);
        assert_eq!(writer.buffered(), 0);

        assert_eq!(writer.finish().await.unwrap(), 12);
        assert_eq!(store.snapshots().len(), 12);
    }

    #[tokio::test]
    async fn test_batch_size_does_not_change_results() {
        let matches = generate_random_matches(80, 6, 11);
        let models = ModelKind::iter().collect::<Vec<_>>();

        let mut results = Vec::new();
        for batch_size in [1, 7, 5000] {
            let store = InMemoryStore::new(vec![]);
            let mut processor = RatingProcessor::new(&models);
            let mut writer = SnapshotBatchWriter::new(&store, batch_size);
            for m in &matches {
                writer.push_match(processor.process_match(m).unwrap().snapshots).await.unwrap();
            }
            writer.finish().await.unwrap();
            results.push(store.snapshots());
        }

        assert_eq!(results[0], results[1]);
        assert_eq!(results[1], results[2]);
    }

    #[tokio::test]
    async fn test_failure_is_fatal_and_reports_committed() {
        let store = InMemoryStore::failing_after(vec![], 1);
        let mut processor = RatingProcessor::new(&[ModelKind::Elo]);
        let mut writer = SnapshotBatchWriter::new(&store, 2);

        let first = processor.process_match(&generate_match(1, 1, 2, 1, 0, None, None)).unwrap();
        writer.push_match(first.snapshots).await.unwrap();

        let second = processor.process_match(&generate_match(2, 1, 2, 1, 1, None, None)).unwrap();
        let err = writer.push_match(second.snapshots).await.unwrap_err();

        assert!(matches!(err, ProcessorError::PersistenceHalted { committed: 2, .. }));
        assert_eq!(store.snapshots().len(), 2);
    }
}
