use clap::Parser;
use tennis_rating_processor::{
    args::Args,
    database::db::DbClient,
    error::{ProcessorError, Result},
    model::recalc::{full_recompute, incremental_update, RunMode, RunReport}
};
use tracing::{error, info};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(EnvFilter::new(&args.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();

    match run(&args).await {
        Ok(report) => match serde_json::to_string(&report) {
            Ok(json) => info!(report = %json, "Run complete"),
            Err(e) => error!("Failed to serialize run report: {}", e)
        },
        Err(e) => {
            error!("Run failed: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(args: &Args) -> Result<RunReport> {
    let client = DbClient::connect(&args.connection_string).await?;
    client.ensure_schema().await?;

    if !client.try_acquire_writer_lock().await? {
        return Err(ProcessorError::WriterLocked);
    }

    info!(mode = %args.mode, models = ?args.models, batch_size = args.batch_size, "Starting run");
    let result = match args.mode {
        RunMode::Full => full_recompute(&client, &args.models, args.batch_size).await,
        RunMode::Incremental => incremental_update(&client, &args.models, args.batch_size).await
    };

    client.release_writer_lock().await?;
    result
}
