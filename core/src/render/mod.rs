pub mod sink;
pub mod view;

pub use sink::{ChannelSink, RenderNotice, RenderSink, RenderUpdate};
pub use view::{SharedView, ViewModel, ViewSink};
