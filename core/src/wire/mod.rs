pub mod frame;
pub mod update;

pub use frame::{AgentState, AgentStatus, Frame};
pub use update::{decode_update, StatsSample, StreamUpdate};
