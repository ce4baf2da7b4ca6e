use std::path::PathBuf;

use clap::Parser;
use jhttp::config::ServerConfig;
use jhttp::server::Server;

/// Concurrent static file server
#[derive(Debug, Parser)]
#[command(name = "jhttp", version)]
struct Cli {
    /// Document root to serve
    docroot: Option<PathBuf>,

    /// Port to listen on
    port: Option<u16>,

    /// YAML configuration file
    #[arg(short, long, env = "JHTTP_CONFIG")]
    config: Option<PathBuf>,

    /// Worker pool size
    #[arg(long)]
    pool_size: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let mut cfg = ServerConfig::load(cli.config.as_deref())?;
    if let Some(root) = cli.docroot {
        cfg.document_root = root;
    }
    if let Some(port) = cli.port {
        cfg.port = port;
    }
    if let Some(size) = cli.pool_size {
        cfg.pool_size = size;
    }

    let server = Server::bind(&cfg).await?;
    let handle = server.handle();
    let serving = server.run();
    tokio::pin!(serving);

    tokio::select! {
        res = &mut serving => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            handle.stop();
            serving.await?;
        }
    }

    Ok(())
}
