use anyhow::Context;
use clap::Parser;
use gridops_api::admin::{execute, Cli};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridops_api=info,gridops_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let pool = gridops_db::create_pool(&cli.database_url)
        .await
        .context("connecting to database")?;

    execute(&pool, cli.command).await
}
