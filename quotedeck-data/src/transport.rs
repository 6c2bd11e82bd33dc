//! Transport capability seams and their live implementations.
//!
//! The core only requires "open a duplex stream", "send a frame", "receive
//! the next frame" and "issue an HTTP GET". Everything network-specific
//! lives behind these traits so the state machines stay testable with
//! in-memory fakes.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;
use url::Url;

/// Failures at the transport boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("failed to send: {0}")]
    Send(String),

    #[error("failed to receive: {0}")]
    Recv(String),

    #[error("connection closed by peer")]
    Closed,

    #[error("http request failed: {0}")]
    Http(String),

    #[error("invalid url: {0}")]
    Url(String),
}

/// An open duplex stream of text frames.
#[async_trait]
pub trait StreamConnection: Send {
    /// Send one text frame.
    async fn send(&mut self, text: String) -> Result<(), TransportError>;

    /// Next inbound text frame; `None` once the peer has closed the stream.
    async fn recv(&mut self) -> Option<Result<String, TransportError>>;

    /// Close the stream. Errors on close are not interesting.
    async fn close(&mut self);
}

/// Opens [`StreamConnection`]s.
#[async_trait]
pub trait StreamConnector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn StreamConnection>, TransportError>;
}

/// HTTP-GET capability: one request, status code and raw body back.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get(&self, url: &Url) -> Result<(u16, Bytes), TransportError>;
}

/// Live websocket transport over `tokio-tungstenite`.
#[derive(Debug, Clone, Default)]
pub struct WsConnector;

impl WsConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StreamConnector for WsConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn StreamConnection>, TransportError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|error| TransportError::Connect(error.to_string()))?;

        Ok(Box::new(WsConnection { inner: stream }))
    }
}

struct WsConnection {
    inner: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
}

#[async_trait]
impl StreamConnection for WsConnection {
    async fn send(&mut self, text: String) -> Result<(), TransportError> {
        self.inner
            .send(Message::Text(text.into()))
            .await
            .map_err(|error| TransportError::Send(error.to_string()))
    }

    async fn recv(&mut self) -> Option<Result<String, TransportError>> {
        while let Some(message) = self.inner.next().await {
            match message {
                Ok(Message::Text(text)) => return Some(Ok(text.to_string())),
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "websocket closed by peer");
                    return None;
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Heartbeat - tungstenite answers pings automatically
                }
                Ok(_) => {}
                Err(error) => return Some(Err(TransportError::Recv(error.to_string()))),
            }
        }
        None
    }

    async fn close(&mut self) {
        let _ = self.inner.close(None).await;
    }
}

/// Live HTTP-GET capability over `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpFetch for HttpClient {
    async fn get(&self, url: &Url) -> Result<(u16, Bytes), TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|error| TransportError::Http(error.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|error| TransportError::Http(error.to_string()))?;

        Ok((status, body))
    }
}
