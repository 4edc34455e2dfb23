use crate::params::SimulationParameters;
use crate::prelude::{MessageParseError, TransportError};
use crate::wire::StreamUpdate;
use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Typed events a subscription delivers to its single consumer, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Handshake succeeded; the server is about to push events.
    Opened,
    Update(StreamUpdate),
    /// A payload failed to decode. The subscription keeps running.
    Skipped(MessageParseError),
    /// Terminal. Nothing follows on this subscription.
    Failed(TransportError),
}

/// Exclusively owned handle to one live subscription.
///
/// Closing (explicitly or by drop) aborts the pump task and discards anything
/// still queued, so no event is observed after `close` returns.
pub struct StreamConnection {
    id: u64,
    events: mpsc::Receiver<StreamEvent>,
    task: Option<JoinHandle<()>>,
    open: bool,
}

impl StreamConnection {
    pub fn new(id: u64, events: mpsc::Receiver<StreamEvent>, task: Option<JoinHandle<()>>) -> Self {
        Self {
            id,
            events,
            task,
            open: true,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Next event, or `None` once closed or once the producer is gone.
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        if !self.open {
            return None;
        }
        self.events.recv().await
    }

    /// Tears the subscription down. Returns `false` if it was already closed.
    pub fn close(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.open = false;
        self.events.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        debug!("stream connection {} closed", self.id);
        true
    }
}

impl Drop for StreamConnection {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens subscriptions for the controller. Implementations must not block and
/// must not require the caller to be inside an async context.
pub trait Connector: Send {
    fn open(&mut self, params: &SimulationParameters) -> StreamConnection;
}
