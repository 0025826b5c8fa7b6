use anyhow::{Context, Result};
use clap::Parser;
use mediclarity::{
    api::{self, AppState},
    config,
    extraction::PdfTextExtractor,
    logging,
    mail::HttpMailer,
    processing::ReportService,
    summarization::OpenAiSummarizationClient,
};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(
    name = "mediclarity",
    about = "Medical report summaries and contact-form mail relay"
)]
struct Cli {
    /// Listen on this port instead of `PORT`.
    #[arg(long)]
    port: Option<u16>,
    /// Load environment variables from this file before the default `.env`.
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.env_file {
        dotenvy::from_path(path)
            .with_context(|| format!("failed to load env file {}", path.display()))?;
    }

    // `.env` may carry RUST_LOG and the log file path, so tracing starts after it is read.
    let config = config::load_config().context("failed to load configuration")?;
    logging::init_tracing(&config.log_file);
    config::log_summary(&config);

    let summarizer = OpenAiSummarizationClient::from_config(&config)
        .context("failed to build summarization client")?;
    let reports = ReportService::new(Box::new(PdfTextExtractor::new()), Box::new(summarizer));
    let mailer = HttpMailer::from_config(&config).context("failed to build mail client")?;

    let port = cli.port.unwrap_or(config.port);
    let app = api::create_router(AppState {
        config,
        reports: Arc::new(reports),
        mailer: Arc::new(mailer),
    });

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    tracing::info!("Server running on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
