use std::net::SocketAddr;

use clap::Parser;

/// Process configuration (§6a). Parsed once at startup from CLI flags,
/// mirroring the teacher's `clap`-derived `Cli`, trimmed down to what this
/// service actually needs: which markets exist and where to bind.
#[derive(Debug, Parser)]
#[command(name = "order_book_engine", about = "Multi-market limit order book engine")]
pub struct Config {
    /// Markets to create on startup, e.g. --markets BTC_USD --markets ETH_USD
    #[arg(long = "markets", required = true, num_args = 1..)]
    pub markets: Vec<String>,

    /// Address to bind the HTTP API to.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub bind_addr: SocketAddr,

    /// tracing log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}
