use anyhow::{anyhow, Result};
use clap::Parser;
use server::build_app;
use sommelier_core::SearchConfig;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Catalog file (.json/.jsonl) or directory of them
    #[arg(long, default_value = "./data/wines.jsonl")]
    catalog: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Minimum document frequency for a term to carry weight
    #[arg(long, default_value_t = 200)]
    min_df: u32,
    /// Maximum fraction of documents a weighted term may appear in
    #[arg(long, default_value_t = 0.2)]
    max_df_ratio: f64,
    /// Give up if the index is not built within this many seconds
    #[arg(long, default_value_t = 120)]
    build_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = SearchConfig::with_df_cutoffs(args.min_df, args.max_df_ratio);

    let catalog = args.catalog.clone();
    let build = tokio::task::spawn_blocking(move || build_app(&catalog, config));
    let app = tokio::time::timeout(Duration::from_secs(args.build_timeout_secs), build)
        .await
        .map_err(|_| anyhow!("index build exceeded {}s", args.build_timeout_secs))???;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
