use crate::prelude::ValidationError;
use crate::render::sink::{RenderSink, RenderUpdate};
use crate::session::SessionState;
use crate::wire::{Frame, StatsSample};
use std::sync::{Arc, Mutex};

/// Coalesced view for a polling renderer: only the newest frame is kept, the
/// history window is always the most recent one delivered.
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    pub state: SessionState,
    pub frame: Option<Arc<Frame>>,
    pub history: Vec<StatsSample>,
    pub status: String,
    /// Bumped on every change so pollers can skip redundant redraws.
    pub revision: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SharedView {
    inner: Arc<Mutex<ViewModel>>,
}

impl SharedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewModel {
        if let Ok(view) = self.inner.lock() {
            view.clone()
        } else {
            ViewModel::default()
        }
    }

    pub fn revision(&self) -> u64 {
        self.inner.lock().map(|view| view.revision).unwrap_or(0)
    }

    pub fn sink(&self) -> ViewSink {
        ViewSink { view: self.clone() }
    }

    fn modify(&self, apply: impl FnOnce(&mut ViewModel)) {
        if let Ok(mut view) = self.inner.lock() {
            apply(&mut view);
            view.revision += 1;
        }
    }
}

/// Sink half of a [`SharedView`].
pub struct ViewSink {
    view: SharedView,
}

impl RenderSink for ViewSink {
    fn on_state(&mut self, state: &SessionState) {
        self.view.modify(|view| {
            view.state = state.clone();
            view.status = state.describe();
        });
    }

    fn on_update(&mut self, update: RenderUpdate) {
        self.view.modify(|view| {
            view.status = format!("Live step {}", update.frame.step);
            view.frame = Some(update.frame);
            view.history = update.history;
        });
    }

    fn on_cleared(&mut self) {
        self.view.modify(|view| {
            view.frame = None;
            view.history.clear();
        });
    }

    fn on_param_rejected(&mut self, error: &ValidationError) {
        self.view.modify(|view| view.status = format!("Rejected: {error}"));
    }
}
