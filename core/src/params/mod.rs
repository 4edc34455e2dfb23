pub mod fields;
pub mod store;

pub use fields::{FieldBounds, ParamField};
pub use store::{ParameterStore, SimulationParameters};
