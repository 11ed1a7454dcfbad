//! News and link-preview proxy for the cyberfolio terminal.

use anyhow::Result;
use clap::Parser;
use cyberfolio_server::{shutdown_signal, ProxyServer, ServerConfig, DEFAULT_FEED_URL};
use log::LevelFilter;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Cyberfolio Server - CVE feed and link-preview proxy")]
struct Cli {
    #[clap(long, default_value = "127.0.0.1:3000")]
    bind_addr: String,

    #[clap(long, env = "CYBERFOLIO_FEED_URL", default_value = DEFAULT_FEED_URL, help = "RSS document relayed by /api/news")]
    feed_url: String,

    #[clap(long, short, default_value = "info")]
    log_level: String,

    #[clap(long, help = "Disable the permissive CORS layer")]
    no_cors: bool,

    #[clap(long, default_value_t = 15, help = "Upstream request timeout in seconds")]
    request_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    let config = ServerConfig::new()
        .with_bind_addr_str(&cli.bind_addr)
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", cli.bind_addr, e))?
        .with_feed_url(cli.feed_url)
        .with_cors(!cli.no_cors)
        .with_request_timeout(Duration::from_secs(cli.request_timeout));
    log::info!("Relaying news from {}", config.feed_url);

    let server = ProxyServer::new(config)?;
    server.serve_with_shutdown(shutdown_signal()).await?;

    Ok(())
}
