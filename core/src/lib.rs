//! Streaming-session core for the live SIR simulation client.
//!
//! A [`session::SessionController`] owns one SSE subscription at a time, keeps
//! the latest frame plus a bounded stats history, and pushes both into a
//! [`render::RenderSink`]. Operator edits go through the
//! [`params::ParameterStore`], which only ever holds in-domain values.

pub mod config;
pub mod history;
pub mod params;
pub mod prelude;
pub mod render;
pub mod session;
pub mod stream;
pub mod telemetry;
pub mod wire;

pub use config::SessionConfig;
pub use history::HistoryBuffer;
pub use params::{ParamField, ParameterStore, SimulationParameters};
pub use prelude::{MessageParseError, TransportError, ValidationError};
pub use render::{RenderSink, RenderUpdate};
pub use session::{SessionCommand, SessionController, SessionHandle, SessionState};
pub use stream::{Connector, HttpConnector, StreamConnection, StreamEvent};
