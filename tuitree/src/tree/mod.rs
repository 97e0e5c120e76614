mod node;
mod widget;

pub use node::{NodeId, Tree};
pub use widget::Widget;
