use crate::config::SessionConfig;
use crate::params::SimulationParameters;
use crate::prelude::TransportError;
use crate::stream::connection::{Connector, StreamConnection, StreamEvent};
use crate::stream::sse::SseDecoder;
use crate::wire::decode_update;
use log::{debug, info, warn};
use reqwest::header::ACCEPT;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::timeout;

pub const STREAM_PATH: &str = "/api/simulation/stream";
pub const HEALTH_PATH: &str = "/api/simulation/health";

/// Opens SSE subscriptions against `{base_url}/api/simulation/stream`.
///
/// Pump tasks are spawned on the runtime captured at construction, so `open`
/// may be called from any thread.
pub struct HttpConnector {
    runtime: Handle,
    client: reqwest::Client,
    stream_url: String,
    connect_timeout: Duration,
    channel_capacity: usize,
    next_id: u64,
}

impl HttpConnector {
    /// Binds to the runtime the caller is running in.
    pub fn new(config: &SessionConfig) -> Result<Self, TransportError> {
        let runtime = Handle::try_current()
            .map_err(|err| TransportError::Connect(format!("no tokio runtime: {err}")))?;
        Self::with_runtime(config, runtime)
    }

    pub fn with_runtime(config: &SessionConfig, runtime: Handle) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| TransportError::Connect(err.to_string()))?;
        Ok(Self {
            runtime,
            client,
            stream_url: config.stream_url(),
            connect_timeout: config.connect_timeout(),
            channel_capacity: config.channel_capacity.max(1),
            next_id: 0,
        })
    }

    pub fn stream_url(&self) -> &str {
        &self.stream_url
    }
}

impl Connector for HttpConnector {
    fn open(&mut self, params: &SimulationParameters) -> StreamConnection {
        self.next_id += 1;
        let id = self.next_id;
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let request = self
            .client
            .get(&self.stream_url)
            .header(ACCEPT, "text/event-stream")
            .query(&params.to_query());
        info!("stream {} connecting to {}", id, self.stream_url);
        let task = self.runtime.spawn(pump(id, request, self.connect_timeout, tx));
        StreamConnection::new(id, rx, Some(task))
    }
}

async fn pump(
    id: u64,
    request: reqwest::RequestBuilder,
    connect_timeout: Duration,
    tx: mpsc::Sender<StreamEvent>,
) {
    if let Err(err) = subscribe(id, request, connect_timeout, &tx).await {
        debug!("stream {} terminated: {}", id, err);
        let _ = tx.send(StreamEvent::Failed(err)).await;
    }
}

// Returns Ok only when the consumer went away first.
async fn subscribe(
    id: u64,
    request: reqwest::RequestBuilder,
    connect_timeout: Duration,
    tx: &mpsc::Sender<StreamEvent>,
) -> Result<(), TransportError> {
    let mut response = match timeout(connect_timeout, request.send()).await {
        Err(_) => return Err(TransportError::Timeout(connect_timeout)),
        Ok(result) => result.map_err(|err| TransportError::Connect(err.to_string()))?,
    };
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status(status.as_u16()));
    }
    if tx.send(StreamEvent::Opened).await.is_err() {
        return Ok(());
    }

    let mut decoder = SseDecoder::new();
    loop {
        let chunk = response
            .chunk()
            .await
            .map_err(|err| TransportError::Dropped(err.to_string()))?;
        let Some(chunk) = chunk else {
            return Err(TransportError::Ended);
        };
        for payload in decoder.feed(&chunk) {
            let event = match decode_update(&payload) {
                Ok(update) => StreamEvent::Update(update),
                Err(err) => {
                    warn!("stream {}: skipping malformed event: {}", id, err);
                    StreamEvent::Skipped(err)
                }
            };
            if tx.send(event).await.is_err() {
                return Ok(());
            }
        }
    }
}

/// One-shot GET of the server's health endpoint, bounded by the connect timeout.
pub async fn probe_health(config: &SessionConfig) -> Result<String, TransportError> {
    let client = reqwest::Client::builder()
        .timeout(config.connect_timeout())
        .build()
        .map_err(|err| TransportError::Connect(err.to_string()))?;
    let response = client
        .get(config.health_url())
        .send()
        .await
        .map_err(|err| TransportError::Connect(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status(status.as_u16()));
    }
    response
        .text()
        .await
        .map_err(|err| TransportError::Dropped(err.to_string()))
}
