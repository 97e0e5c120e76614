use crate::canvas::Canvas;
use crate::event::{KeyboardEvent, MouseEvent};

use super::NodeId;

/// Behavior attached to a node in a [`Tree`](super::Tree).
///
/// The event methods default to "not interested", which lets the event
/// bubble on to the parent; a widget overrides only the family it cares
/// about and returns `true` to consume. Keyboard and mouse are separate
/// methods so a widget may opt into one without the other.
///
/// The tree is driven by a single thread, so there is no `Send`/`Sync`
/// bound and widgets may hold `Rc`/`Cell` state freely.
pub trait Widget {
    /// Natural (width, height) when the host imposes no constraint.
    fn intrinsic_size(&self) -> (u16, u16);

    /// Rows needed at the given width. Defaults to the intrinsic height.
    fn rows(&self, width: u16) -> u16 {
        let _ = width;
        self.intrinsic_size().1
    }

    /// Paint onto the canvas, tagging every written cell with `id` so the
    /// canvas can resolve mouse hits back to this node.
    fn render(&self, id: NodeId, canvas: &mut Canvas);

    fn on_keyboard(&mut self, event: &KeyboardEvent) -> bool {
        let _ = event;
        false
    }

    fn on_mouse(&mut self, event: &MouseEvent) -> bool {
        let _ = event;
        false
    }
}
