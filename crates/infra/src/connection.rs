//! Persistence connection state and supervision.
//!
//! The live connection status is an explicit handle ([`ConnectionStatus`])
//! shared between the supervisor that updates it and whoever reports it (the
//! health probe reads it through [`ConnectionProbe`]). Nothing here blocks or
//! queues requests: while disconnected, store operations simply fail.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::store::StoreError;

/// Fixed delay between connection attempts, and between liveness checks.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
        }
    }
}

/// Read-only view of the cached connection state.
pub trait ConnectionProbe: Send + Sync {
    fn state(&self) -> ConnectionState;

    fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }
}

/// Shared, cached connection status.
#[derive(Debug, Default)]
pub struct ConnectionStatus {
    connected: AtomicBool,
}

impl ConnectionStatus {
    pub fn new(connected: bool) -> Arc<Self> {
        Arc::new(Self {
            connected: AtomicBool::new(connected),
        })
    }

    /// Record the latest observation, returning the previous state.
    pub fn set(&self, state: ConnectionState) -> ConnectionState {
        let was = self
            .connected
            .swap(state == ConnectionState::Connected, Ordering::SeqCst);
        if was {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }
}

impl ConnectionProbe for ConnectionStatus {
    fn state(&self) -> ConnectionState {
        if self.connected.load(Ordering::SeqCst) {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }
}

/// Something the supervisor can connect to and then keep checking.
#[async_trait::async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Establish the connection and prepare storage (run once on first success).
    async fn connect(&self) -> Result<(), StoreError>;

    /// Cheap liveness check.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Spawn the supervisor task for `connector`.
pub fn spawn_supervisor<C: Connector>(
    connector: C,
    status: Arc<ConnectionStatus>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(supervise(connector, status, interval))
}

/// Connect with indefinite fixed-delay retry, then observe the connection.
///
/// State transitions are logged and cached, never acted upon otherwise.
pub async fn supervise<C: Connector>(connector: C, status: Arc<ConnectionStatus>, interval: Duration) {
    let mut attempt: u64 = 0;
    loop {
        attempt += 1;
        match connector.connect().await {
            Ok(()) => {
                status.set(ConnectionState::Connected);
                info!(attempt, "database connected");
                break;
            }
            Err(e) => {
                warn!(attempt, error = %e, "database connection failed");
                info!(delay_secs = interval.as_secs(), "retrying database connection");
                tokio::time::sleep(interval).await;
            }
        }
    }

    loop {
        tokio::time::sleep(interval).await;
        let observed = match connector.ping().await {
            Ok(()) => ConnectionState::Connected,
            Err(_) => ConnectionState::Disconnected,
        };
        match (status.set(observed), observed) {
            (ConnectionState::Connected, ConnectionState::Disconnected) => {
                warn!("database disconnected; waiting for it to come back")
            }
            (ConnectionState::Disconnected, ConnectionState::Connected) => {
                info!("database reconnected")
            }
            _ => {}
        }
    }
}
