pub mod adapter;
pub mod canvas;
pub mod event;
pub mod terminal;
pub mod text;
pub mod tree;
pub mod types;

pub use adapter::{HostAdapter, SizeRequest, Sizing};
pub use canvas::{Canvas, Cell};
pub use event::{Key, KeyboardEvent, Modifiers, MouseAction, MouseButton, MouseEvent};
pub use terminal::Terminal;
pub use tree::{NodeId, Tree, Widget};
pub use types::{Rgb, TextStyle};
