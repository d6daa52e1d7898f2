use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use upload_transform::config::ServiceConfig;
use upload_transform::server;

/// Upload endpoint averaging CSV columns and filtering JSON person lists.
#[derive(Debug, Parser)]
#[command(name = "upload-transform", version, about)]
struct Cli {
    /// TOML config file. Environment variables override its values.
    #[arg(short, long, env = "UPLOAD_TRANSFORM_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address; overrides config and `BIND_ADDR`.
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Log level used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ServiceConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    server::serve(config).await.context("running server")
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    if let Err(e) = run(cli).await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}
