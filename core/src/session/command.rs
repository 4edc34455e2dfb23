use crate::params::ParamField;
use tokio::sync::mpsc;

/// Operator actions accepted by the session actor.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    SetParam { field: ParamField, value: String },
    Start,
    Stop,
    Reset,
    Shutdown,
}

/// Cloneable sender side of a running session actor.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Returns `false` once the actor has exited.
    pub fn send(&self, command: SessionCommand) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn set_param(&self, field: ParamField, value: impl Into<String>) -> bool {
        self.send(SessionCommand::SetParam {
            field,
            value: value.into(),
        })
    }

    pub fn start(&self) -> bool {
        self.send(SessionCommand::Start)
    }

    pub fn stop(&self) -> bool {
        self.send(SessionCommand::Stop)
    }

    pub fn reset(&self) -> bool {
        self.send(SessionCommand::Reset)
    }

    pub fn shutdown(&self) -> bool {
        self.send(SessionCommand::Shutdown)
    }
}
