//! Ingestion loop reading activity events from the local Unix datagram socket
//!
//! ## States
//!
//! ```text
//! Running --(datagram, decoded or not)--> Running
//! Running --(receive error)-------------> Terminated
//! ```
//!
//! Datagrams longer than `max_message_size` are truncated by the kernel.
//! Truncated JSON fails to decode and is dropped like any other malformed event.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use tokio::net::UnixDatagram;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::aggregator::{Aggregator, Outcome};
use crate::error::{HubError, HubResult};
use crate::event::ActivityEvent;
use crate::registry::SubscriberRegistry;

/// Bound Unix datagram socket. The socket file is removed on drop.
#[derive(Debug)]
pub struct IngestSocket {
    socket: UnixDatagram,
    path: PathBuf,
}

impl IngestSocket {
    /// Bind at `path`, replacing a stale socket file left by an earlier run
    pub fn bind(path: impl AsRef<Path>) -> HubResult<Self> {
        let path = path.as_ref().to_path_buf();
        match std::fs::remove_file(&path) {
            Ok(()) => debug!("removed stale socket at {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("could not remove stale socket at {}: {e}", path.display()),
        }

        let socket = UnixDatagram::bind(&path).map_err(|source| HubError::Bind {
            path: path.clone(),
            source,
        })?;
        info!("listening for activity events on {}", path.display());

        Ok(Self { socket, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for IngestSocket {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Receives datagrams, fans them out and feeds the aggregator
pub struct Ingestor {
    aggregator: Aggregator,
    registry: SubscriberRegistry,
    max_message_size: usize,
}

impl Ingestor {
    pub fn new(aggregator: Aggregator, registry: SubscriberRegistry, max_message_size: usize) -> Self {
        Self {
            aggregator,
            registry,
            max_message_size: max_message_size.max(1),
        }
    }

    /// Run until the socket fails. Only returns with a transport error.
    #[instrument(skip_all, fields(socket = %socket.path().display()))]
    pub async fn run(self, socket: IngestSocket) -> HubResult<Infallible> {
        let mut buffer = vec![0u8; self.max_message_size];
        loop {
            let received = match socket.socket.recv(&mut buffer).await {
                Ok(received) => received,
                Err(e) => {
                    error!("error reading from Unix socket: {e}");
                    return Err(HubError::Transport(e));
                }
            };

            if received == buffer.len() {
                warn!(
                    "datagram filled the {} byte buffer and may have been truncated",
                    buffer.len()
                );
            }

            self.handle_datagram(&buffer[..received]).await;
        }
    }

    /// Broadcast one raw datagram, then decode and apply it
    pub async fn handle_datagram(&self, payload: &[u8]) -> Option<Outcome> {
        let raw = String::from_utf8_lossy(payload);
        let report = self.registry.broadcast(&raw).await;
        trace!(
            "raw event fanned out to {} subscribers ({} failed)",
            report.delivered, report.failed
        );

        let event = match ActivityEvent::decode(payload) {
            Ok(event) => event,
            Err(e) => {
                error!("error while decoding inbound message: {e}");
                return None;
            }
        };

        debug!(
            "got message: timestamp: {}, category: {}, subject: '{}', object: '{}'",
            event.timestamp, event.category, event.subject, event.object
        );
        Some(self.aggregator.apply(&event).await)
    }
}
