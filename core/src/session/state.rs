use std::fmt;

/// Operator-visible lifecycle of a streaming session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Connecting,
    Playing,
    /// Transport failure. Holds a readable cause; the operator must restart.
    Error(String),
}

impl SessionState {
    /// A subscription exists in these states and only these.
    pub fn is_live(&self) -> bool {
        matches!(self, SessionState::Connecting | SessionState::Playing)
    }

    pub fn describe(&self) -> String {
        match self {
            SessionState::Idle => "Idle".into(),
            SessionState::Connecting => "Connecting...".into(),
            SessionState::Playing => "Live".into(),
            SessionState::Error(cause) => format!("Stream error: {cause}"),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
