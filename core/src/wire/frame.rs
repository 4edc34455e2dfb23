use crate::prelude::MessageParseError;
use serde::{Deserialize, Serialize};

/// Compartment an agent currently occupies. Encoded on the wire as `0..=2`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum AgentStatus {
    Susceptible,
    Infected,
    Recovered,
}

impl AgentStatus {
    pub const ALL: [AgentStatus; 3] = [
        AgentStatus::Susceptible,
        AgentStatus::Infected,
        AgentStatus::Recovered,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgentStatus::Susceptible => "Susceptible",
            AgentStatus::Infected => "Infected",
            AgentStatus::Recovered => "Recovered",
        }
    }
}

impl TryFrom<u8> for AgentStatus {
    type Error = MessageParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AgentStatus::Susceptible),
            1 => Ok(AgentStatus::Infected),
            2 => Ok(AgentStatus::Recovered),
            other => Err(MessageParseError::UnknownStatus(other)),
        }
    }
}

impl From<AgentStatus> for u8 {
    fn from(status: AgentStatus) -> Self {
        match status {
            AgentStatus::Susceptible => 0,
            AgentStatus::Infected => 1,
            AgentStatus::Recovered => 2,
        }
    }
}

/// Position and status of one agent at a single step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgentState {
    pub x: f64,
    pub y: f64,
    pub status: AgentStatus,
}

/// Full agent snapshot for one simulation instant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    pub step: u64,
    #[serde(default)]
    pub agents: Vec<AgentState>,
}

impl Frame {
    pub fn count(&self, status: AgentStatus) -> usize {
        self.agents
            .iter()
            .filter(|agent| agent.status == status)
            .count()
    }
}
