use crate::prelude::ValidationError;
use crate::session::SessionState;
use crate::wire::{Frame, StatsSample};
use log::debug;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Latest frame paired with the full history window at the time it arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderUpdate {
    pub frame: Arc<Frame>,
    pub history: Vec<StatsSample>,
}

/// Consumer of session output. Called on the ingestion path, so every method
/// must return promptly; slow drawing belongs on the other side of a queue.
pub trait RenderSink: Send {
    fn on_state(&mut self, _state: &SessionState) {}

    fn on_update(&mut self, update: RenderUpdate);

    /// Latest frame and history were discarded by a reset.
    fn on_cleared(&mut self) {}

    fn on_param_rejected(&mut self, _error: &ValidationError) {}
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn on_state(&mut self, state: &SessionState) {
        (**self).on_state(state)
    }

    fn on_update(&mut self, update: RenderUpdate) {
        (**self).on_update(update)
    }

    fn on_cleared(&mut self) {
        (**self).on_cleared()
    }

    fn on_param_rejected(&mut self, error: &ValidationError) {
        (**self).on_param_rejected(error)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderNotice {
    State(SessionState),
    Update(RenderUpdate),
    Cleared,
    Rejected(ValidationError),
}

/// Forwards every notice over an unbounded queue, preserving order.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<RenderNotice>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RenderNotice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, notice: RenderNotice) {
        if self.tx.send(notice).is_err() {
            debug!("render receiver dropped; notice discarded");
        }
    }
}

impl RenderSink for ChannelSink {
    fn on_state(&mut self, state: &SessionState) {
        self.forward(RenderNotice::State(state.clone()));
    }

    fn on_update(&mut self, update: RenderUpdate) {
        self.forward(RenderNotice::Update(update));
    }

    fn on_cleared(&mut self) {
        self.forward(RenderNotice::Cleared);
    }

    fn on_param_rejected(&mut self, error: &ValidationError) {
        self.forward(RenderNotice::Rejected(error.clone()));
    }
}
