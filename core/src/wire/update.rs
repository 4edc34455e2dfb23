use crate::prelude::MessageParseError;
use crate::wire::frame::{AgentStatus, Frame};
use serde::{Deserialize, Serialize};

/// Aggregate compartment counts at one step, charted against `step`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsSample {
    pub step: u64,
    pub s: u64,
    pub i: u64,
    pub r: u64,
}

impl StatsSample {
    pub fn new(step: u64, s: u64, i: u64, r: u64) -> Self {
        Self { step, s, i, r }
    }

    pub fn count(&self, status: AgentStatus) -> u64 {
        match status {
            AgentStatus::Susceptible => self.s,
            AgentStatus::Infected => self.i,
            AgentStatus::Recovered => self.r,
        }
    }

    pub fn total(&self) -> u64 {
        self.s.saturating_add(self.i).saturating_add(self.r)
    }
}

/// One event payload: `{ "frame": {...}, "stats": {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamUpdate {
    pub frame: Frame,
    pub stats: StatsSample,
}

pub fn decode_update(payload: &str) -> Result<StreamUpdate, MessageParseError> {
    serde_json::from_str(payload).map_err(|err| MessageParseError::InvalidJson(err.to_string()))
}
