//! Stream connection manager: lifecycle of the live ticker feed.
//!
//! State machine: `idle -> connecting -> connected -> (failed | connecting)`.
//! The manager owns the transport handle exclusively; only the derived
//! [`ConnectionStatus`] is observable outside. Reconnection after a failure
//! is deliberately the caller's decision - there is no retry loop in here.

use crate::{
    config::DashboardConfig,
    error::DataError,
    normalize::Normalizer,
    registry::SymbolRegistry,
    store::StateStore,
    ticker::TickerMessage,
    transport::{StreamConnection, StreamConnector},
};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

/// Connection lifecycle states observable outside the manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Idle,
    Connecting,
    Connected,
    Failed,
}

/// Subscribe frame sent once per connection, naming every tracked ticker
/// channel.
#[derive(Debug, Serialize)]
struct SubscribeFrame<'a> {
    method: &'static str,
    params: &'a [String],
    id: u32,
}

impl<'a> SubscribeFrame<'a> {
    fn new(params: &'a [String]) -> Self {
        Self {
            method: "SUBSCRIBE",
            params,
            id: 1,
        }
    }
}

/// Owns the live feed: connect, subscribe, dispatch inbound frames into the
/// normalizer and state store, surface failures.
pub struct MarketFeed {
    connector: Arc<dyn StreamConnector>,
    normalizer: Normalizer,
    store: Arc<StateStore>,
    stream_url: String,
    channels: Vec<String>,
    status_tx: watch::Sender<ConnectionStatus>,
    _status_rx: watch::Receiver<ConnectionStatus>,
    last_error: Arc<Mutex<Option<String>>>,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl MarketFeed {
    pub fn new(
        config: &DashboardConfig,
        connector: Arc<dyn StreamConnector>,
        registry: Arc<SymbolRegistry>,
        store: Arc<StateStore>,
    ) -> Self {
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Idle);
        Self {
            connector,
            normalizer: Normalizer::new(registry, config.quote.clone()),
            store,
            stream_url: config.stream_url.clone(),
            channels: config.ticker_channels(),
            status_tx,
            _status_rx: status_rx,
            last_error: Arc::new(Mutex::new(None)),
            shutdown_tx: Mutex::new(None),
        }
    }

    /// Open the transport, subscribe, and start the read loop.
    ///
    /// Transitions to Connected only once the transport is open and the
    /// subscribe frame is on the wire. A no-op when already connecting or
    /// connected.
    pub async fn connect(&self) -> Result<(), DataError> {
        if matches!(
            self.status(),
            ConnectionStatus::Connecting | ConnectionStatus::Connected
        ) {
            debug!("connect called while already connecting/connected");
            return Ok(());
        }

        self.set_status(ConnectionStatus::Connecting);
        *self.last_error.lock() = None;

        let mut connection = match self.connector.connect(&self.stream_url).await {
            Ok(connection) => connection,
            Err(error) => {
                self.record_failure(error.to_string());
                return Err(DataError::Transport(error));
            }
        };

        let frame = match serde_json::to_string(&SubscribeFrame::new(&self.channels)) {
            Ok(frame) => frame,
            Err(error) => {
                connection.close().await;
                self.record_failure(error.to_string());
                return Err(DataError::Subscribe(error.to_string()));
            }
        };

        if let Err(error) = connection.send(frame).await {
            connection.close().await;
            self.record_failure(error.to_string());
            return Err(DataError::Transport(error));
        }

        info!(url = %self.stream_url, channels = self.channels.len(), "ticker stream connected");
        self.set_status(ConnectionStatus::Connected);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        *self.shutdown_tx.lock() = Some(shutdown_tx);

        tokio::spawn(run_read_loop(
            connection,
            self.normalizer.clone(),
            Arc::clone(&self.store),
            self.status_tx.clone(),
            Arc::clone(&self.last_error),
            shutdown_rx,
        ));

        Ok(())
    }

    /// Stop the read loop and close the transport. Idempotent.
    pub fn disconnect(&self) {
        if let Some(shutdown) = self.shutdown_tx.lock().take() {
            let _ = shutdown.send(());
        }

        if matches!(
            self.status(),
            ConnectionStatus::Connecting | ConnectionStatus::Connected
        ) {
            info!("ticker stream disconnected");
            self.set_status(ConnectionStatus::Idle);
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status_tx.borrow()
    }

    /// Watch handle for status transitions.
    pub fn status_watch(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_tx.subscribe()
    }

    /// Message recorded by the most recent transport failure.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    fn set_status(&self, status: ConnectionStatus) {
        let _ = self.status_tx.send(status);
    }

    fn record_failure(&self, message: String) {
        warn!(error = %message, "ticker stream failed");
        *self.last_error.lock() = Some(message);
        self.set_status(ConnectionStatus::Failed);
    }
}

/// Single ingestion path: frames are processed strictly in arrival order.
async fn run_read_loop(
    mut connection: Box<dyn StreamConnection>,
    normalizer: Normalizer,
    store: Arc<StateStore>,
    status_tx: watch::Sender<ConnectionStatus>,
    last_error: Arc<Mutex<Option<String>>>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                debug!("read loop shutting down");
                connection.close().await;
                return;
            }
            frame = connection.recv() => match frame {
                Some(Ok(text)) => handle_frame(&text, &normalizer, &store),
                Some(Err(error)) => {
                    warn!(%error, "ticker stream transport error");
                    *last_error.lock() = Some(error.to_string());
                    let _ = status_tx.send(ConnectionStatus::Failed);
                    return;
                }
                None => {
                    warn!("ticker stream closed unexpectedly");
                    *last_error.lock() = Some("connection closed unexpectedly".to_string());
                    let _ = status_tx.send(ConnectionStatus::Failed);
                    return;
                }
            }
        }
    }
}

/// Parse one inbound frame and upsert the resulting record.
///
/// Parse failures and unrecognised events are logged and discarded; they
/// never tear down the connection.
fn handle_frame(text: &str, normalizer: &Normalizer, store: &StateStore) {
    match serde_json::from_str::<TickerMessage>(text) {
        Ok(TickerMessage::Ticker(tick)) => {
            if let Some(record) = normalizer.normalize(&tick) {
                store.upsert(record);
            }
        }
        Ok(TickerMessage::Ignore) => {
            debug!("ignoring non-ticker frame");
        }
        Err(error) => {
            debug!(%error, frame = %text.get(..100).unwrap_or(text), "failed to parse inbound frame");
        }
    }
}
