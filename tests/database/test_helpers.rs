use lazy_static::lazy_static;
use std::sync::Arc;
use tennis_rating_processor::{
    database::{db::DbClient, db_structs::Match},
    model::structures::tournament_tier::TournamentTier
};
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio_postgres::{Client, NoTls};

pub struct TestDatabase {
    pub connection_string: String,
    _container: Container<'static, Postgres>
}

impl TestDatabase {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        lazy_static! {
            static ref DOCKER: Arc<Cli> = Arc::new(Cli::default());
        }

        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        let connection_string = format!(
            "host=localhost port={} user=postgres password=postgres dbname=postgres",
            port
        );

        DbClient::connect(&connection_string).await?.ensure_schema().await?;

        Ok(TestDatabase {
            connection_string,
            _container: container
        })
    }

    pub async fn get_client(&self) -> Result<Client, Box<dyn std::error::Error>> {
        let (client, connection) = tokio_postgres::connect(&self.connection_string, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                eprintln!("Database connection error: {}", e);
            }
        });

        Ok(client)
    }

    /// Inserts matches the way ingestion stores them: free-text surface and level code.
    pub async fn insert_matches(&self, matches: &[Match]) -> Result<(), Box<dyn std::error::Error>> {
        let client = self.get_client().await?;

        for m in matches {
            let surface = m.surface.map(|s| s.to_string());
            let level = m.tournament_tier.map(level_code);
            client
                .execute(
                    "INSERT INTO matches (id, competitor_a, competitor_b, winner, played_at, surface, tournament_level)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)",
                    &[
                        &m.id,
                        &m.competitor_a,
                        &m.competitor_b,
                        &m.winner,
                        &m.played_at,
                        &surface,
                        &level
                    ]
                )
                .await?;
        }

        Ok(())
    }
}

fn level_code(tier: TournamentTier) -> &'static str {
    match tier {
        TournamentTier::GrandSlam => "G",
        TournamentTier::Masters => "M",
        TournamentTier::Atp1000 => "1000",
        TournamentTier::Atp500 => "500",
        TournamentTier::Atp250 => "250",
        TournamentTier::Challenger => "C",
        TournamentTier::Futures => "F"
    }
}
