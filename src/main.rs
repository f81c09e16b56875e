use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use medai_backend::{create_router, load_config, Container};

#[derive(Parser)]
#[command(name = "medai-backend")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    verbose: bool,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Path to a JSON config file (takes precedence over MEDAI_CONFIG_PATH)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(cli.config.as_deref());
    info!(
        "Model target: {} (region: {})",
        config.model.invocation_target(),
        config.aws.region.as_deref().unwrap_or("SDK default chain"),
    );

    let container = Arc::new(Container::new(config));
    let app = create_router(container);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("MedAI backend listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
