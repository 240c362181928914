use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use vigia_core::{CredentialProvider, EnvConfigProvider, EnvCredentialProvider};
use vigia_notify::{EmailNotifier, HttpMailTransport};
use vigia_sources::Pipeline;
use vigia_storage::{PostgresStore, PostgresStoreFactory};
use vigia_web::{create_app, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about = "Health news collector", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute one collection run: fetch, deduplicate, store, notify.
    Run,
    /// Serve the stored article set over HTTP.
    Serve {
        #[arg(long, default_value = "0.0.0.0:3000")]
        addr: String,
    },
}

fn mail_transport() -> HttpMailTransport {
    let endpoint = std::env::var("VIGIA_MAIL_ENDPOINT").unwrap_or_default();
    let token = std::env::var("VIGIA_MAIL_TOKEN").unwrap_or_default();
    let sender = std::env::var("VIGIA_MAIL_SENDER").unwrap_or_default();
    HttpMailTransport::new(&endpoint, &token, &sender)
}

async fn run() -> anyhow::Result<()> {
    let notifier = EmailNotifier::new(Box::new(mail_transport()));
    let pipeline = Pipeline::new(
        Box::new(EnvConfigProvider::new()),
        Box::new(EnvCredentialProvider::new()),
        Box::new(PostgresStoreFactory::new()),
        Box::new(notifier),
    )?;

    let summary = pipeline.run().await;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if summary.status_code() != 200 {
        std::process::exit(1);
    }
    Ok(())
}

async fn serve(addr: &str) -> anyhow::Result<()> {
    let credentials = EnvCredentialProvider::new()
        .get()
        .await
        .context("database credentials are required to serve articles")?;
    let store = PostgresStore::connect(&credentials, "postgres").await?;

    let app = create_app(AppState::new(Arc::new(store)));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {}", addr))?;
    info!("serving articles on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run => run().await,
        Commands::Serve { addr } => serve(&addr).await,
    }
}
