pub mod connection;
pub mod http;
pub mod sse;

pub use connection::{Connector, StreamConnection, StreamEvent};
pub use http::{probe_health, HttpConnector, HEALTH_PATH, STREAM_PATH};
pub use sse::SseDecoder;
