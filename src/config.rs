use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use tracing::{trace, warn};

const ENV_ALERT_CARGOSHIP: &str = "RDS_STATS_ALERT_CARGOSHIP";
const ENV_LISTEN_ADDR: &str = "RDS_STATS_LISTEN_ADDR";
const ENV_SOCKET: &str = "RDS_STATS_SOCKET";

const DEFAULT_LISTEN_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);

/// Largest datagram accepted from the producer; longer ones are truncated
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Discord webhook URL for cargo ship alerts
    #[serde(default)]
    pub alert_cargoship: Option<String>,

    /// HTTP/WebSocket service address
    #[serde(default = "default_listen_addr")]
    pub http_listen_addr: SocketAddr,

    /// Path of the Unix datagram socket the game plugin writes to
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,

    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alert_cargoship: None,
            http_listen_addr: default_listen_addr(),
            socket_path: default_socket_path(),
            max_message_size: default_max_message_size(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    DEFAULT_LISTEN_ADDR
}

fn default_socket_path() -> PathBuf {
    PathBuf::from("/tmp/rds-stats-collector.sock")
}

fn default_max_message_size() -> usize {
    DEFAULT_MAX_MESSAGE_SIZE
}

impl Config {
    /// Override fields from `RDS_STATS_*` environment variables
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_ALERT_CARGOSHIP)
            && !url.is_empty()
        {
            self.alert_cargoship = Some(url);
        }

        if let Ok(addr) = std::env::var(ENV_LISTEN_ADDR) {
            match addr.parse() {
                Ok(addr) => self.http_listen_addr = addr,
                Err(e) => warn!("ignoring {ENV_LISTEN_ADDR}={addr}: {e}"),
            }
        }

        if let Ok(path) = std::env::var(ENV_SOCKET) {
            self.socket_path = PathBuf::from(path);
        }

        self
    }
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|e| anyhow::anyhow!("Invalid configuration file provided: {e}"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
