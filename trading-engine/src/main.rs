//! Trading desk server
//!
//! Seeds the default instruments, starts the price simulator, connects the
//! trade store and serves the HTTP and WebSocket API until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use api_gateway::config::AppConfig;
use api_gateway::AppState;
use clap::Parser;
use common::PriceSnapshot;
use dotenv::dotenv;
use market_data::MarketDataService;
use order_service::{OrderService, OrderServiceConfig, RepositoryType};
use tokio::signal;
use tracing::{debug, error, info, Level};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Address to listen on, overrides PORT
    #[clap(short, long)]
    addr: Option<SocketAddr>,

    /// Keep the trade log in memory instead of PostgreSQL
    #[clap(long)]
    in_memory: bool,

    /// PostgreSQL connection string, overrides DATABASE_URL
    #[clap(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let args = Args::parse();

    let env_debug = std::env::var("DEBUG").unwrap_or_else(|_| "0".to_string());
    let log_level = if env_debug == "1" { Level::DEBUG } else { Level::INFO };
    init_tracing(log_level)?;

    info!("Starting trading desk server...");

    let config = AppConfig::new();
    debug!("Configuration: {:?}", config);

    let market_data_service = Arc::new(MarketDataService::with_prices(
        PriceSnapshot::default_instruments(),
        config.ws_buffer,
    ));
    let simulator = market_data_service
        .simulator(config.tick_interval)
        .spawn();
    info!(
        "Price simulator running every {:?} over {} symbols",
        config.tick_interval,
        market_data_service.snapshot().len()
    );

    let repo_type = if args.in_memory {
        info!("Using in-memory trade log");
        RepositoryType::InMemory
    } else {
        let mut store_config = OrderServiceConfig::from_env();
        if let Some(url) = args.database_url {
            store_config.database_url = url;
        }
        RepositoryType::Postgres(store_config)
    };

    let order_service = match OrderService::with_repository(market_data_service.store(), repo_type).await {
        Ok(service) => Arc::new(service),
        Err(e) => {
            error!("Failed to initialize trade store: {}", e);
            simulator.abort();
            return Err(e.into());
        }
    };

    let state = Arc::new(AppState::new(market_data_service, order_service));
    let app = api_gateway::app(state, &config, log_level)?;

    let addr = args
        .addr
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], config.port)));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    simulator.abort();
    info!("Shutting down");
    Ok(())
}

/// Install the global tracing subscriber
fn init_tracing(log_level: Level) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .parse("tower_http=debug,api_gateway=debug,market_data=info,order_service=debug,trading_engine=debug")?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(FmtSpan::CLOSE)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        info!("Tracing initialized");
        debug!("Debug logging enabled");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
