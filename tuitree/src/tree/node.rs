use slotmap::SlotMap;

use crate::canvas::Canvas;
use crate::event::{KeyboardEvent, MouseEvent};

use super::Widget;

slotmap::new_key_type! {
    /// Key of a node in a [`Tree`]. Keys are generational: after a node is
    /// removed its key misses on lookup instead of aliasing a newer node.
    pub struct NodeId;
}

struct Node {
    widget: Box<dyn Widget>,
    parent: Option<NodeId>,
    focus: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A tree of widgets with parent back-references and a mirrored focus
/// chain.
///
/// Children are owned by their parent in insertion order; insertion order
/// is paint order, so later siblings end up on top for hit-testing. The
/// focus chain is mirrored rather than centralized: every ancestor of the
/// focused leaf stores the leaf in its own focus slot, and the queries
/// below verify that mirror instead of trusting a single source.
///
/// Several independent trees may coexist; there is no global state.
#[derive(Default)]
pub struct Tree {
    nodes: SlotMap<NodeId, Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node. Use it as a root, or attach it later.
    pub fn insert(&mut self, widget: impl Widget + 'static) -> NodeId {
        self.nodes.insert(Node {
            widget: Box::new(widget),
            parent: None,
            focus: None,
            children: Vec::new(),
        })
    }

    /// Create a node already wired under `parent`.
    pub fn insert_child(&mut self, parent: NodeId, widget: impl Widget + 'static) -> NodeId {
        let child = self.insert(widget);
        self.add_child(parent, child);
        child
    }

    /// Create a node that adopts `children` in the given order, wiring
    /// each child's back-reference before returning.
    pub fn insert_with_children(
        &mut self,
        widget: impl Widget + 'static,
        children: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        let node = self.insert(widget);
        for child in children {
            self.add_child(node, child);
        }
        node
    }

    /// Append `child` to the end of `parent`'s children and point its
    /// back-reference at `parent`. A child that already sits in another
    /// node's child list is detached from there first, so a node has at
    /// most one parent at a time.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(parent != child, "node cannot contain itself");
        debug_assert!(
            self.ancestors(parent).all(|a| a != child),
            "attaching an ancestor would form a cycle"
        );
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return;
        }
        if let Some(old) = self.nodes[child].parent {
            if let Some(data) = self.nodes.get_mut(old) {
                data.children.retain(|&c| c != child);
            }
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Remove `node` and its whole subtree. Focus slots elsewhere that
    /// still name a removed node simply stop matching.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            if let Some(data) = self.nodes.get_mut(parent) {
                data.children.retain(|&c| c != node);
            }
        }
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes.remove(id) {
                stack.extend(data.children);
            }
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match self.nodes.get(node) {
            Some(data) => &data.children,
            None => &[],
        }
    }

    /// Strict ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.parent(node);
        std::iter::from_fn(move || {
            let id = current?;
            current = self.parent(id);
            Some(id)
        })
    }

    pub fn widget(&self, node: NodeId) -> Option<&dyn Widget> {
        self.nodes.get(node).map(|n| n.widget.as_ref())
    }

    pub fn widget_mut(&mut self, node: NodeId) -> Option<&mut dyn Widget> {
        self.nodes.get_mut(node).map(|n| n.widget.as_mut())
    }

    // ------------------------------------------------------------------
    // Focus chain
    // ------------------------------------------------------------------

    /// The raw focus slot of `node`. `None` means "defer to self".
    pub fn focus_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.focus)
    }

    /// Overwrite one focus slot without touching the rest of the chain.
    pub fn set_focus(&mut self, node: NodeId, slot: Option<NodeId>) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.focus = slot;
        }
    }

    /// Record `target` as the focused leaf in `node`'s own slot and in
    /// every ancestor's slot up to the root. O(depth). Sibling subtrees
    /// keep whatever their slots held, and so does the previous leaf's own
    /// slot: only the path from `node` to the root is written.
    pub fn capture_focus(&mut self, node: NodeId, target: NodeId) {
        log::debug!("[focus] capture {target:?} from {node:?}");
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(data) = self.nodes.get_mut(id) else {
                break;
            };
            data.focus = Some(target);
            current = data.parent;
        }
    }

    /// Make `node` the focused leaf for the whole chain above it.
    pub fn take_focus(&mut self, node: NodeId) {
        self.capture_focus(node, node);
    }

    /// Whether the chain above `node` consistently names `node`'s focus
    /// candidate: its own slot, or `node` itself when the slot is empty.
    /// Any ancestor whose slot disagrees invalidates the whole path. Only
    /// the path above `node` is checked; `node`'s own slot is the
    /// candidate, not a subject of the check.
    pub fn is_focused(&self, node: NodeId) -> bool {
        let Some(data) = self.nodes.get(node) else {
            return false;
        };
        let leaf = data.focus.unwrap_or(node);
        let mut current = data.parent;
        while let Some(id) = current {
            let Some(ancestor) = self.nodes.get(id) else {
                return false;
            };
            if ancestor.focus != Some(leaf) {
                return false;
            }
            current = ancestor.parent;
        }
        true
    }

    /// Whether `node` is the one true focused leaf: its own slot names
    /// itself and [`is_focused`](Self::is_focused) holds. A node whose
    /// slot consistently names a descendant is on the focus path but does
    /// not have focus.
    pub fn has_focus(&self, node: NodeId) -> bool {
        self.focus_of(node) == Some(node) && self.is_focused(node)
    }

    // ------------------------------------------------------------------
    // Event dispatch
    // ------------------------------------------------------------------

    /// Offer `event` to `node`, then to each ancestor in turn, until one
    /// consumes it. Each node on the chain is visited at most once, the
    /// root included. Returns whether anyone consumed the event; a missing
    /// node is unhandled, not a fault.
    pub fn dispatch_keyboard(&mut self, node: NodeId, event: &KeyboardEvent) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(data) = self.nodes.get_mut(id) else {
                return false;
            };
            if data.widget.on_keyboard(event) {
                log::trace!("[dispatch] {event:?} consumed by {id:?}");
                return true;
            }
            current = data.parent;
        }
        log::trace!("[dispatch] {event:?} unhandled");
        false
    }

    /// Mouse counterpart of [`dispatch_keyboard`](Self::dispatch_keyboard).
    pub fn dispatch_mouse(&mut self, node: NodeId, event: &MouseEvent) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(data) = self.nodes.get_mut(id) else {
                return false;
            };
            if data.widget.on_mouse(event) {
                log::trace!("[dispatch] {event:?} consumed by {id:?}");
                return true;
            }
            current = data.parent;
        }
        log::trace!("[dispatch] {event:?} unhandled");
        false
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Paint `node`, then its children in order. Later siblings overpaint
    /// earlier ones, which is what makes the canvas owner grid report the
    /// topmost node on a hit.
    pub fn render(&self, node: NodeId, canvas: &mut Canvas) {
        let Some(data) = self.nodes.get(node) else {
            return;
        };
        data.widget.render(node, canvas);
        for &child in &data.children {
            self.render(child, canvas);
        }
    }
}
