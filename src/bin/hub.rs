use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use clap::Parser;
use rds_stats::{
    Aggregator, StatStore, SubscriberRegistry,
    api::{ApiConfig, ApiState, spawn_api_server},
    config::{Config, read_config_file},
    discord::DiscordManager,
    ingest::{IngestSocket, Ingestor},
};
use tracing::{error, info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (JSON)
    #[arg(short, long)]
    file: Option<String>,

    /// Discord web hook URL for Cargo Ship alerts
    #[arg(long)]
    alert_cargoship: Option<String>,

    /// HTTP/WebSocket service address
    #[arg(long)]
    http_listen_addr: Option<SocketAddr>,

    /// Unix datagram socket the game plugin sends events to
    #[arg(long)]
    socket_path: Option<PathBuf>,

    /// Largest accepted event datagram in bytes; longer ones are truncated
    #[arg(long)]
    max_message_size: Option<usize>,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("rds_stats", LevelFilter::DEBUG),
        ("rds_stats_hub", LevelFilter::TRACE),
        ("tower_http", LevelFilter::INFO),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

fn load_config(args: Args) -> anyhow::Result<Config> {
    let config = match &args.file {
        Some(file) => read_config_file(file)?,
        None => Config::default(),
    };
    let mut config = config.with_env();

    if let Some(url) = args.alert_cargoship {
        config.alert_cargoship = Some(url);
    }
    if let Some(addr) = args.http_listen_addr {
        config.http_listen_addr = addr;
    }
    if let Some(path) = args.socket_path {
        config.socket_path = path;
    }
    if let Some(size) = args.max_message_size {
        config.max_message_size = size;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = load_config(args)?;
    if config.alert_cargoship.is_none() {
        info!("no cargo ship webhook configured, alerts will only be logged");
    }

    let stats = StatStore::new();
    let registry = SubscriberRegistry::new();
    let notifier = Arc::new(DiscordManager::new(config.alert_cargoship.clone()));
    let aggregator = Aggregator::new(stats.clone(), notifier);

    let socket = IngestSocket::bind(&config.socket_path)?;

    spawn_api_server(
        ApiConfig {
            bind_addr: config.http_listen_addr,
        },
        ApiState::new(stats, registry.clone()),
    )
    .await?;

    let ingestor = Ingestor::new(aggregator, registry, config.max_message_size);
    let Err(e) = ingestor.run(socket).await;
    error!("ingestion stopped: {e}");

    Err(e.into())
}
