use super::{
    db_structs::{Match, RatingSnapshot},
    snapshot_store::SnapshotStore
};
use crate::{
    error::{ProcessorError, Result},
    model::structures::{
        match_position::MatchPosition, model_kind::ModelKind, rating_context::RatingContext,
        rating_state::RatingState, surface::Surface, tournament_tier::TournamentTier
    }
};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use postgres_types::ToSql;
use std::{str::FromStr, sync::Arc};
use tokio_postgres::{Client, NoTls, Row};
use tracing::{error, info, warn};

/// Advisory lock key held by the single writer for the lifetime of its session.
const WRITER_LOCK_KEY: i64 = 0x7465_6e6e_6973;

const SNAPSHOT_COLUMNS: &str = "competitor_id, model, surface, rating, deviation, volatility, match_id, played_at";

#[derive(Clone)]
pub struct DbClient {
    client: Arc<Client>
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient {
            client: Arc::new(client)
        })
    }

    /// Takes the session-level writer lock. Returns `false` if another session holds it.
    pub async fn try_acquire_writer_lock(&self) -> Result<bool> {
        let row = self
            .client
            .query_one("SELECT pg_try_advisory_lock($1)", &[&WRITER_LOCK_KEY])
            .await?;

        Ok(row.get(0))
    }

    pub async fn release_writer_lock(&self) -> Result<()> {
        let row = self
            .client
            .query_one("SELECT pg_advisory_unlock($1)", &[&WRITER_LOCK_KEY])
            .await?;

        if !row.get::<_, bool>(0) {
            warn!("Writer lock was not held by this session");
        }

        Ok(())
    }

    /// Creates the tables this processor reads and writes, if missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        self.client
            .batch_execute(
                "
            CREATE TABLE IF NOT EXISTS matches (
                id INTEGER PRIMARY KEY,
                competitor_a INTEGER,
                competitor_b INTEGER,
                winner INTEGER,
                played_at TIMESTAMPTZ NOT NULL,
                surface TEXT,
                tournament_level TEXT
            );
            CREATE TABLE IF NOT EXISTS rating_snapshots (
                id BIGSERIAL PRIMARY KEY,
                competitor_id INTEGER NOT NULL,
                model TEXT NOT NULL,
                surface TEXT,
                rating DOUBLE PRECISION NOT NULL,
                deviation DOUBLE PRECISION,
                volatility DOUBLE PRECISION,
                match_id INTEGER NOT NULL REFERENCES matches (id),
                played_at TIMESTAMPTZ NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS rating_snapshots_chain_match
                ON rating_snapshots (competitor_id, model, COALESCE(surface, ''), match_id);
            CREATE INDEX IF NOT EXISTS rating_snapshots_chain_position
                ON rating_snapshots (competitor_id, model, surface, played_at, match_id);",
            )
            .await?;

        Ok(())
    }

    fn match_from_row(row: &Row) -> Match {
        Match {
            id: row.get("id"),
            competitor_a: row.get("competitor_a"),
            competitor_b: row.get("competitor_b"),
            winner: row.get("winner"),
            played_at: row.get("played_at"),
            surface: row
                .get::<_, Option<String>>("surface")
                .as_deref()
                .and_then(Surface::normalize),
            tournament_tier: row
                .get::<_, Option<String>>("tournament_level")
                .as_deref()
                .and_then(TournamentTier::from_level)
        }
    }

    fn snapshot_from_row(row: &Row) -> Result<RatingSnapshot> {
        let model: String = row.get("model");
        let model = ModelKind::from_str(&model).map_err(|_| ProcessorError::Store(format!("unknown model '{model}'")))?;

        let surface = match row.get::<_, Option<String>>("surface") {
            Some(s) => Some(Surface::from_str(&s).map_err(|_| ProcessorError::Store(format!("unknown surface '{s}'")))?),
            None => None
        };

        let match_id: i32 = row.get("match_id");
        let played_at: DateTime<FixedOffset> = row.get("played_at");

        Ok(RatingSnapshot {
            competitor_id: row.get("competitor_id"),
            model,
            context: RatingContext::from(surface),
            state: RatingState::new(row.get("rating"), row.get("deviation"), row.get("volatility")),
            match_id,
            position: MatchPosition::new(played_at, match_id)
        })
    }

    async fn query_matches(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Match>> {
        let rows = self.client.query(sql, params).await?;
        Ok(rows.iter().map(Self::match_from_row).collect())
    }
}

#[async_trait]
impl SnapshotStore for DbClient {
    async fn matches(&self) -> Result<Vec<Match>> {
        info!("Fetching matches...");
        let matches = self
            .query_matches(
                "SELECT id, competitor_a, competitor_b, winner, played_at, surface, tournament_level
                FROM matches ORDER BY played_at, id",
                &[]
            )
            .await?;

        info!(count = matches.len(), "Match fetching complete");
        Ok(matches)
    }

    async fn unrated_matches(&self, model: ModelKind) -> Result<Vec<Match>> {
        let model = model.to_string();
        self.query_matches(
            "SELECT m.id, m.competitor_a, m.competitor_b, m.winner, m.played_at, m.surface, m.tournament_level
            FROM matches m
            WHERE NOT EXISTS (SELECT 1 FROM rating_snapshots s WHERE s.match_id = m.id AND s.model = $1)
            ORDER BY m.played_at, m.id",
            &[&model]
        )
        .await
    }

    async fn latest_snapshot(
        &self,
        competitor_id: i32,
        model: ModelKind,
        context: RatingContext,
        before: Option<MatchPosition>
    ) -> Result<Option<RatingSnapshot>> {
        let model = model.to_string();
        let surface = context.surface().map(|s| s.to_string());
        let (played_at, match_id) = before.map_or((None, None), |p| (Some(p.played_at), Some(p.match_id)));

        let row = self
            .client
            .query_opt(
                &format!(
                    "SELECT {SNAPSHOT_COLUMNS} FROM rating_snapshots
                    WHERE competitor_id = $1 AND model = $2 AND surface IS NOT DISTINCT FROM $3
                      AND ($4::timestamptz IS NULL OR (played_at, match_id) < ($4, $5::int4))
                    ORDER BY played_at DESC, match_id DESC
                    LIMIT 1"
                ),
                &[&competitor_id, &model, &surface, &played_at, &match_id]
            )
            .await?;

        row.as_ref().map(Self::snapshot_from_row).transpose()
    }

    async fn count_snapshots(
        &self,
        competitor_id: i32,
        model: ModelKind,
        context: RatingContext,
        before: Option<MatchPosition>
    ) -> Result<u32> {
        let model = model.to_string();
        let surface = context.surface().map(|s| s.to_string());
        let (played_at, match_id) = before.map_or((None, None), |p| (Some(p.played_at), Some(p.match_id)));

        let row = self
            .client
            .query_one(
                "SELECT COUNT(*) FROM rating_snapshots
                WHERE competitor_id = $1 AND model = $2 AND surface IS NOT DISTINCT FROM $3
                  AND ($4::timestamptz IS NULL OR (played_at, match_id) < ($4, $5::int4))",
                &[&competitor_id, &model, &surface, &played_at, &match_id]
            )
            .await?;

        Ok(row.get::<_, i64>(0) as u32)
    }

    async fn count_model_snapshots(
        &self,
        competitor_id: i32,
        model: ModelKind,
        before: Option<MatchPosition>
    ) -> Result<u32> {
        let model = model.to_string();
        let (played_at, match_id) = before.map_or((None, None), |p| (Some(p.played_at), Some(p.match_id)));

        let row = self
            .client
            .query_one(
                "SELECT COUNT(*) FROM rating_snapshots
                WHERE competitor_id = $1 AND model = $2
                  AND ($3::timestamptz IS NULL OR (played_at, match_id) < ($3, $4::int4))",
                &[&competitor_id, &model, &played_at, &match_id]
            )
            .await?;

        Ok(row.get::<_, i64>(0) as u32)
    }

    async fn latest_rated_position(&self, model: ModelKind) -> Result<Option<MatchPosition>> {
        let model = model.to_string();
        let row = self
            .client
            .query_opt(
                "SELECT played_at, match_id FROM rating_snapshots WHERE model = $1
                ORDER BY played_at DESC, match_id DESC LIMIT 1",
                &[&model]
            )
            .await?;

        Ok(row.map(|r| MatchPosition::new(r.get("played_at"), r.get("match_id"))))
    }

    /// One INSERT over unnested column arrays, so the whole batch lands or none of it does.
    async fn append_snapshots(&self, snapshots: &[RatingSnapshot]) -> Result<()> {
        if snapshots.is_empty() {
            return Ok(());
        }

        let competitor_ids: Vec<i32> = snapshots.iter().map(|s| s.competitor_id).collect();
        let models: Vec<String> = snapshots.iter().map(|s| s.model.to_string()).collect();
        let surfaces: Vec<Option<String>> = snapshots
            .iter()
            .map(|s| s.context.surface().map(|x| x.to_string()))
            .collect();
        let ratings: Vec<f64> = snapshots.iter().map(|s| s.state.rating).collect();
        let deviations: Vec<Option<f64>> = snapshots.iter().map(|s| s.state.deviation).collect();
        let volatilities: Vec<Option<f64>> = snapshots.iter().map(|s| s.state.volatility).collect();
        let match_ids: Vec<i32> = snapshots.iter().map(|s| s.match_id).collect();
        let played_ats: Vec<DateTime<FixedOffset>> = snapshots.iter().map(|s| s.position.played_at).collect();

        let values: &[&(dyn ToSql + Sync)] = &[
            &competitor_ids,
            &models,
            &surfaces,
            &ratings,
            &deviations,
            &volatilities,
            &match_ids,
            &played_ats
        ];

        self.client
            .execute(
                &format!(
                    "INSERT INTO rating_snapshots ({SNAPSHOT_COLUMNS})
                    SELECT * FROM UNNEST($1::int4[], $2::text[], $3::text[], $4::float8[], $5::float8[],
                                         $6::float8[], $7::int4[], $8::timestamptz[])"
                ),
                values
            )
            .await?;

        Ok(())
    }

    async fn clear_snapshots(&self, models: &[ModelKind]) -> Result<()> {
        let models: Vec<String> = models.iter().map(|m| m.to_string()).collect();
        let deleted = self
            .client
            .execute("DELETE FROM rating_snapshots WHERE model = ANY($1)", &[&models])
            .await?;

        info!(deleted, "Cleared rating snapshots");
        Ok(())
    }

    async fn snapshot_history(
        &self,
        competitor_id: i32,
        model: ModelKind,
        context: RatingContext
    ) -> Result<Vec<RatingSnapshot>> {
        let model = model.to_string();
        let surface = context.surface().map(|s| s.to_string());

        let rows = self
            .client
            .query(
                &format!(
                    "SELECT {SNAPSHOT_COLUMNS} FROM rating_snapshots
                    WHERE competitor_id = $1 AND model = $2 AND surface IS NOT DISTINCT FROM $3
                    ORDER BY played_at, match_id"
                ),
                &[&competitor_id, &model, &surface]
            )
            .await?;

        rows.iter().map(Self::snapshot_from_row).collect()
    }
}
