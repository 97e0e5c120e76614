use crate::canvas::Canvas;
use crate::event::{Key, KeyboardEvent, Modifiers, MouseAction, MouseButton, MouseEvent};
use crate::tree::{NodeId, Tree};

/// Sizing protocols a host may negotiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sizing {
    /// Width and height both imposed by the host.
    Box,
    /// Width imposed, height reported by the widget.
    Flow,
    /// The widget picks its own size.
    Fixed,
}

/// The size shape a host hands to [`HostAdapter::render`]: two dimensions,
/// one, or none, selecting the corresponding [`Sizing`] protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRequest {
    Box { width: u16, height: u16 },
    Flow { width: u16 },
    Fixed,
}

/// Bridges one widget tree to a host render/input runtime.
///
/// The host negotiates size through [`sizing`](Self::sizing) and
/// [`rows`](Self::rows), asks for frames through
/// [`render`](Self::render), and forwards raw input through
/// [`mouse_event`](Self::mouse_event) and [`keypress`](Self::keypress).
/// The adapter keeps the most recently rendered canvas so mouse
/// coordinates can be resolved against what is actually on screen; render
/// installs its canvas before returning, which is the only ordering the
/// adapter requires of its caller.
pub struct HostAdapter {
    tree: Tree,
    root: NodeId,
    canvas: Option<Canvas>,
}

impl HostAdapter {
    pub fn new(tree: Tree, root: NodeId) -> Self {
        debug_assert!(tree.contains(root), "root must live in the tree");
        Self {
            tree,
            root,
            canvas: None,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The most recently rendered canvas, if any frame has been produced.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// The adapted tree is always eligible for focus and keyboard input.
    pub fn selectable(&self) -> bool {
        true
    }

    /// All three sizing protocols are supported.
    pub fn sizing(&self) -> &'static [Sizing] {
        &[Sizing::Box, Sizing::Flow, Sizing::Fixed]
    }

    /// The root widget's required row count for the given width.
    pub fn rows(&self, width: u16) -> u16 {
        self.tree.widget(self.root).map_or(0, |w| w.rows(width))
    }

    /// Allocate a canvas per the request, render the tree into it, retain
    /// it for hit-testing, and return a view of it.
    pub fn render(&mut self, request: SizeRequest) -> &Canvas {
        let (width, height) = match request {
            SizeRequest::Box { width, height } => (width, height),
            SizeRequest::Flow { width } => (width, self.rows(width)),
            SizeRequest::Fixed => self
                .tree
                .widget(self.root)
                .map_or((0, 0), |w| w.intrinsic_size()),
        };
        let mut canvas = Canvas::new(width, height);
        self.tree.render(self.root, &mut canvas);
        self.canvas.insert(canvas)
    }

    /// Hit-test (x, y) against the last rendered frame and dispatch a
    /// mouse event at the topmost node there, bubbling upward. Without a
    /// frame, or over an unpainted cell, the event is unhandled.
    pub fn mouse_event(
        &mut self,
        _request: SizeRequest,
        action: MouseAction,
        button: MouseButton,
        x: u16,
        y: u16,
    ) -> bool {
        let Some(canvas) = &self.canvas else {
            return false;
        };
        let Some(target) = canvas.hit_test(x, y) else {
            return false;
        };
        self.tree
            .dispatch_mouse(target, &MouseEvent::new(action, button))
    }

    /// Dispatch a key at the focused leaf recorded in the root's focus
    /// slot, bubbling upward. With no focus recorded the key is unhandled.
    pub fn keypress(&mut self, _request: SizeRequest, key: Key, modifiers: Modifiers) -> bool {
        match self.tree.focus_of(self.root) {
            Some(focus) => self
                .tree
                .dispatch_keyboard(focus, &KeyboardEvent::with_modifiers(key, modifiers)),
            None => false,
        }
    }
}
