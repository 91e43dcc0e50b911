use crate::model::structures::model_kind::ModelKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Non-fatal: the match is skipped.
    #[error("match {match_id} does not name two distinct competitors and a winner")]
    MissingParticipant { match_id: i32 },

    /// Non-fatal: the match is skipped.
    #[error("match {match_id} names winner {winner} who is not one of its competitors")]
    InvalidWinner { match_id: i32, winner: i32 },

    /// Non-fatal: the pre-match states are kept for this model.
    #[error("{model} produced a non-finite rating for match {match_id}")]
    NumericInstability { match_id: i32, model: ModelKind },

    #[error(
        "match {match_id} is unrated for {model} but sorts before already-rated matches; \
        run a full recompute instead"
    )]
    OutOfOrderBackfill { match_id: i32, model: ModelKind },

    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("snapshot store error: {0}")]
    Store(String),

    /// Fatal: in-memory state may be ahead of the log. Resume from the committed snapshots.
    #[error("persistence failed after {committed} snapshots were committed: {source}")]
    PersistenceHalted {
        committed: usize,
        #[source]
        source: Box<ProcessorError>
    },

    #[error("another writer holds the rating lock")]
    WriterLocked
}

impl ProcessorError {
    /// Whether a run can continue past this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProcessorError::MissingParticipant { .. }
                | ProcessorError::InvalidWinner { .. }
                | ProcessorError::NumericInstability { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
