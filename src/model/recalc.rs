use std::collections::HashSet;

use clap::ValueEnum;
use itertools::Itertools;
use serde::Serialize;
use strum_macros::Display;
use tracing::{info, warn};

use crate::{
    database::{batch_writer::SnapshotBatchWriter, db_structs::Match, snapshot_store::SnapshotStore},
    error::{ProcessorError, Result},
    model::{
        rating_processor::{participants, ProcessSummary, RatingProcessor},
        rating_tracker::{ChainSummary, TrackedRating},
        structures::model_kind::ModelKind
    },
    utils::progress_utils::progress_bar
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunMode {
    /// Clear the selected models' snapshots and replay the whole match history.
    Full,
    /// Rate only matches that have no snapshot yet.
    Incremental
}

/// What a run did. Logged as JSON by the binary.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunReport {
    pub mode: RunMode,
    pub models: Vec<ModelKind>,
    pub matches_processed: usize,
    pub matches_skipped: usize,
    pub numeric_rejections: usize,
    pub snapshots_written: usize,
    /// Current ratings of every chain touched by the run.
    pub chains: Vec<ChainSummary>
}

/// Replays the entire match history for `models` from their priors.
///
/// Must not overlap with another writer; `DbClient::try_acquire_writer_lock` guards this
/// for Postgres.
pub async fn full_recompute<S: SnapshotStore + ?Sized>(
    store: &S,
    models: &[ModelKind],
    batch_size: usize
) -> Result<RunReport> {
    info!(?models, "Starting full recompute");
    store.clear_snapshots(models).await?;

    let matches = store.matches().await?;
    let mut processor = RatingProcessor::new(models);
    let mut writer = SnapshotBatchWriter::new(store, batch_size);

    let summary = fold(&mut processor, &matches, &mut writer).await?;
    let snapshots_written = writer.finish().await?;

    let report = RunReport {
        mode: RunMode::Full,
        models: processor.model_kinds(),
        matches_processed: summary.processed,
        matches_skipped: summary.skipped,
        numeric_rejections: summary.numeric_rejections,
        snapshots_written,
        chains: processor.rating_tracker.summarize()
    };

    info!(
        processed = report.matches_processed,
        skipped = report.matches_skipped,
        snapshots = report.snapshots_written,
        "Full recompute complete"
    );

    Ok(report)
}

/// Rates, per model, the tail of matches that model has not seen yet.
///
/// Every chain is seeded from the log as of strictly before the match that first touches
/// it. Refuses with `OutOfOrderBackfill` when an unrated match sorts before the latest
/// rated one, since the chains downstream of it would be stale; nothing is written then.
pub async fn incremental_update<S: SnapshotStore + ?Sized>(
    store: &S,
    models: &[ModelKind],
    batch_size: usize
) -> Result<RunReport> {
    let mut tails = Vec::with_capacity(models.len());
    for model in models.iter().copied().unique().collect_vec() {
        let tail = unrated_tail(store, model).await?;
        tails.push((model, tail));
    }

    let mut writer = SnapshotBatchWriter::new(store, batch_size);
    let mut processed = HashSet::new();
    let mut skipped = HashSet::new();
    let mut numeric_rejections = 0;
    let mut chains = Vec::new();

    for (model, tail) in &tails {
        if tail.is_empty() {
            info!(%model, "No unrated matches");
            continue;
        }

        info!(%model, matches = tail.len(), "Rating unrated matches");
        let mut processor = RatingProcessor::new(&[*model]);
        seed_tracker(store, &mut processor, tail).await?;

        let bar = progress_bar(tail.len() as u64, format!("Rating {model} tail"));
        for m in tail {
            let result = processor.process_match(m);
            match result {
                Ok(rated) => {
                    processed.insert(m.id);
                    numeric_rejections += rated.rejected.len();
                    writer.push_match(rated.snapshots).await?;
                }
                Err(e) if e.is_recoverable() => {
                    skipped.insert(m.id);
                }
                Err(e) => return Err(e)
            }

            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }

        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        chains.extend(processor.rating_tracker.summarize());
    }

    let snapshots_written = writer.finish().await?;

    let report = RunReport {
        mode: RunMode::Incremental,
        models: tails.iter().map(|(m, _)| *m).collect(),
        matches_processed: processed.len(),
        matches_skipped: skipped.len(),
        numeric_rejections,
        snapshots_written,
        chains
    };

    info!(
        processed = report.matches_processed,
        skipped = report.matches_skipped,
        snapshots = report.snapshots_written,
        "Incremental update complete"
    );

    Ok(report)
}

/// Unrated matches for `model` that still need rating, or `OutOfOrderBackfill`.
///
/// Unrateable matches never receive snapshots, so the ones that sort before the latest
/// rated match were already skipped by an earlier run and are dropped here.
async fn unrated_tail<S: SnapshotStore + ?Sized>(store: &S, model: ModelKind) -> Result<Vec<Match>> {
    let unrated = store.unrated_matches(model).await?;
    let Some(latest) = store.latest_rated_position(model).await? else {
        return Ok(unrated);
    };

    let mut tail = Vec::with_capacity(unrated.len());
    for m in unrated {
        if m.position() > latest {
            tail.push(m);
        } else if participants(&m).is_ok() {
            warn!(match_id = m.id, %model, "Unrated match sorts before already-rated matches");
            return Err(ProcessorError::OutOfOrderBackfill { match_id: m.id, model });
        }
    }

    Ok(tail)
}

/// Loads every chain the tail touches, and each competitor's rating count per model, as of
/// strictly before the first match touching it.
async fn seed_tracker<S: SnapshotStore + ?Sized>(store: &S, processor: &mut RatingProcessor, tail: &[Match]) -> Result<()> {
    for m in tail {
        let before = Some(m.position());
        for (competitor_id, kind, context) in processor.keys_for(m) {
            let tracker = &mut processor.rating_tracker;
            if !tracker.has_model_count(competitor_id, kind) {
                let count = store.count_model_snapshots(competitor_id, kind, before).await?;
                if count > 0 {
                    tracker.seed_model_count(competitor_id, kind, count);
                }
            }

            if tracker.contains(competitor_id, kind, context) {
                continue;
            }

            let Some(latest) = store.latest_snapshot(competitor_id, kind, context, before).await? else {
                continue;
            };
            let rated_count = store.count_snapshots(competitor_id, kind, context, before).await?;

            tracker.seed(
                (competitor_id, kind, context),
                TrackedRating {
                    state: latest.state,
                    rated_count,
                    position: Some(latest.position)
                }
            );
        }
    }

    Ok(())
}

async fn fold<S: SnapshotStore + ?Sized>(
    processor: &mut RatingProcessor,
    matches: &[Match],
    writer: &mut SnapshotBatchWriter<'_, S>
) -> Result<ProcessSummary> {
    let bar = progress_bar(matches.len() as u64, "Processing matches".to_string());
    let mut summary = ProcessSummary::default();

    for m in matches {
        let result = processor.process_match(m);
        summary.record(&result);

        match result {
            Ok(rated) => writer.push_match(rated.snapshots).await?,
            Err(e) if e.is_recoverable() => {}
            Err(e) => return Err(e)
        }

        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    Ok(summary)
}
