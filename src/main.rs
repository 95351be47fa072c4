use std::sync::Arc;

use clap::Parser;
use order_book_engine::api;
use order_book_engine::config::Config;
use order_book_engine::exchange::Exchange;
use order_book_engine::utils::shutdown_token;
use tokio::net::TcpListener;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(config.log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let token = shutdown_token();
    let exchange = Arc::new(Exchange::new(config.markets.clone()));
    let app = api::router(exchange);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, markets = ?config.markets, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(token.cancelled_owned())
        .await?;

    Ok(())
}
