use log::info;
use sirstream::render::ViewSink;
use sirstream::wire::AgentStatus;
use sirstream::{RenderSink, RenderUpdate, SessionState, ValidationError};

/// Logs each update and mirrors everything into a shared view for `status`.
pub struct LogSink {
    view: ViewSink,
}

impl LogSink {
    pub fn new(view: ViewSink) -> Self {
        Self { view }
    }
}

impl RenderSink for LogSink {
    fn on_state(&mut self, state: &SessionState) {
        println!("[SESSION] {}", state);
        self.view.on_state(state);
    }

    fn on_update(&mut self, update: RenderUpdate) {
        if let Some(stats) = update.history.last() {
            info!(
                "step {} | agents {} | infected on canvas {} | S {} I {} R {} | window {}",
                update.frame.step,
                update.frame.agents.len(),
                update.frame.count(AgentStatus::Infected),
                stats.s,
                stats.i,
                stats.r,
                update.history.len()
            );
        }
        self.view.on_update(update);
    }

    fn on_cleared(&mut self) {
        println!("[SESSION] frame and history cleared");
        self.view.on_cleared();
    }

    fn on_param_rejected(&mut self, error: &ValidationError) {
        println!("[PARAM] rejected: {}", error);
        self.view.on_param_rejected(error);
    }
}
