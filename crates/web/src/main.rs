use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use mockapi_web::ServerConfig;

/// Mock REST API for caching, versioning and reliability tests
#[derive(Parser)]
#[command(name = "mockapi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config file; missing files fall back to defaults
    #[arg(long, default_value = "mockapi.toml")]
    config: PathBuf,

    /// Listen host
    #[arg(long, env = "MOCKAPI_HOST")]
    host: Option<String>,

    /// Listen port
    #[arg(short, long, env = "MOCKAPI_PORT")]
    port: Option<u16>,

    /// Directory served for non-API paths
    #[arg(long, env = "MOCKAPI_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Mark static responses as uncacheable
    #[arg(long)]
    static_no_cache: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut cfg = ServerConfig::load(&self.config)?;
        if let Some(host) = self.host {
            cfg.host = host;
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(dir) = self.static_dir {
            cfg.static_dir = dir;
        }
        if self.static_no_cache {
            cfg.static_no_cache = true;
        }
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = Cli::parse().into_config()?;

    info!(
        "Starting mock API on {}:{} (static: {})",
        cfg.host,
        cfg.port,
        cfg.static_dir.display()
    );

    mockapi_web::serve(cfg).await
}
