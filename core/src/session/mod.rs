pub mod command;
pub mod controller;
pub mod state;

pub use command::{SessionCommand, SessionHandle};
pub use controller::SessionController;
pub use state::SessionState;
