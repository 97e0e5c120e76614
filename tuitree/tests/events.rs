use std::cell::Cell;
use std::rc::Rc;

use tuitree::{
    Canvas, Key, KeyboardEvent, MouseAction, MouseButton, MouseEvent, NodeId, Tree, Widget,
};

/// Counts how often each handler family fires and answers with a
/// preconfigured verdict.
struct Probe {
    keys: Rc<Cell<u32>>,
    mice: Rc<Cell<u32>>,
    consume_keys: bool,
    consume_mice: bool,
}

fn probe(consume_keys: bool, consume_mice: bool) -> (Probe, Rc<Cell<u32>>, Rc<Cell<u32>>) {
    let keys = Rc::new(Cell::new(0));
    let mice = Rc::new(Cell::new(0));
    let widget = Probe {
        keys: Rc::clone(&keys),
        mice: Rc::clone(&mice),
        consume_keys,
        consume_mice,
    };
    (widget, keys, mice)
}

impl Widget for Probe {
    fn intrinsic_size(&self) -> (u16, u16) {
        (0, 0)
    }

    fn render(&self, _id: NodeId, _canvas: &mut Canvas) {}

    fn on_keyboard(&mut self, _event: &KeyboardEvent) -> bool {
        self.keys.set(self.keys.get() + 1);
        self.consume_keys
    }

    fn on_mouse(&mut self, _event: &MouseEvent) -> bool {
        self.mice.set(self.mice.get() + 1);
        self.consume_mice
    }
}

fn key_event() -> KeyboardEvent {
    KeyboardEvent::new(Key::Char('x'))
}

fn mouse_event() -> MouseEvent {
    MouseEvent::new(MouseAction::Press, MouseButton::Left)
}

// ============================================================================
// Bubbling
// ============================================================================

#[test]
fn event_bubbles_to_grandparent_exactly_once() {
    let mut tree = Tree::new();
    let (widget_a, a_keys, _) = probe(true, false);
    let (widget_b, b_keys, _) = probe(false, false);
    let (widget_c, c_keys, _) = probe(false, false);
    let a = tree.insert(widget_a);
    let b = tree.insert_child(a, widget_b);
    let c = tree.insert_child(b, widget_c);

    assert!(tree.dispatch_keyboard(c, &key_event()));
    assert_eq!(c_keys.get(), 1);
    assert_eq!(b_keys.get(), 1);
    assert_eq!(a_keys.get(), 1);
}

#[test]
fn nearer_handler_short_circuits_the_chain() {
    let mut tree = Tree::new();
    let (widget_a, a_keys, _) = probe(true, false);
    let (widget_b, b_keys, _) = probe(true, false);
    let (widget_c, _, _) = probe(false, false);
    let a = tree.insert(widget_a);
    let b = tree.insert_child(a, widget_b);
    let c = tree.insert_child(b, widget_c);

    assert!(tree.dispatch_keyboard(c, &key_event()));
    assert_eq!(b_keys.get(), 1);
    assert_eq!(a_keys.get(), 0);
}

#[test]
fn target_gets_first_chance() {
    let mut tree = Tree::new();
    let (widget_a, a_keys, _) = probe(true, false);
    let (widget_c, c_keys, _) = probe(true, false);
    let a = tree.insert(widget_a);
    let c = tree.insert_child(a, widget_c);

    assert!(tree.dispatch_keyboard(c, &key_event()));
    assert_eq!(c_keys.get(), 1);
    assert_eq!(a_keys.get(), 0);
}

#[test]
fn unhandled_event_visits_every_ancestor_once() {
    let mut tree = Tree::new();
    let (widget_a, a_keys, _) = probe(false, false);
    let (widget_b, b_keys, _) = probe(false, false);
    let (widget_c, c_keys, _) = probe(false, false);
    let a = tree.insert(widget_a);
    let b = tree.insert_child(a, widget_b);
    let c = tree.insert_child(b, widget_c);

    assert!(!tree.dispatch_keyboard(c, &key_event()));
    assert_eq!(c_keys.get(), 1);
    assert_eq!(b_keys.get(), 1);
    assert_eq!(a_keys.get(), 1);
}

#[test]
fn keyboard_and_mouse_families_are_independent() {
    let mut tree = Tree::new();
    let (widget_a, a_keys, a_mice) = probe(true, true);
    // b consumes mouse but declines keyboard
    let (widget_b, b_keys, b_mice) = probe(false, true);
    let (widget_c, _, _) = probe(false, false);
    let a = tree.insert(widget_a);
    let b = tree.insert_child(a, widget_b);
    let c = tree.insert_child(b, widget_c);

    // Keyboard bubbles past b to a.
    assert!(tree.dispatch_keyboard(c, &key_event()));
    assert_eq!(b_keys.get(), 1);
    assert_eq!(a_keys.get(), 1);

    // Mouse stops at b.
    assert!(tree.dispatch_mouse(c, &mouse_event()));
    assert_eq!(b_mice.get(), 1);
    assert_eq!(a_mice.get(), 0);
}

#[test]
fn every_node_on_the_chain_sees_the_same_event() {
    struct Observer {
        seen: Rc<Cell<Option<Key>>>,
    }

    impl Widget for Observer {
        fn intrinsic_size(&self) -> (u16, u16) {
            (0, 0)
        }

        fn render(&self, _id: NodeId, _canvas: &mut Canvas) {}

        fn on_keyboard(&mut self, event: &KeyboardEvent) -> bool {
            self.seen.set(Some(event.key));
            false
        }
    }

    let mut tree = Tree::new();
    let seen_a = Rc::new(Cell::new(None));
    let seen_b = Rc::new(Cell::new(None));
    let a = tree.insert(Observer {
        seen: Rc::clone(&seen_a),
    });
    let b = tree.insert_child(a, Observer {
        seen: Rc::clone(&seen_b),
    });

    tree.dispatch_keyboard(b, &KeyboardEvent::new(Key::Enter));
    assert_eq!(seen_a.get(), Some(Key::Enter));
    assert_eq!(seen_b.get(), Some(Key::Enter));
}

#[test]
fn dispatch_at_root_with_no_handler_reports_unhandled() {
    let mut tree = Tree::new();
    let (widget, keys, _) = probe(false, false);
    let root = tree.insert(widget);

    assert!(!tree.dispatch_keyboard(root, &key_event()));
    assert_eq!(keys.get(), 1);
}

// ============================================================================
// Child wiring
// ============================================================================

#[test]
fn add_child_wires_parent_and_appends() {
    let mut tree = Tree::new();
    let (container, _, _) = probe(false, false);
    let (first, _, _) = probe(false, false);
    let (second, _, _) = probe(false, false);
    let parent = tree.insert(container);
    let a = tree.insert(first);
    let b = tree.insert(second);

    tree.add_child(parent, a);
    tree.add_child(parent, b);

    assert_eq!(tree.parent(a), Some(parent));
    assert_eq!(tree.parent(b), Some(parent));
    assert_eq!(tree.children(parent), &[a, b]);
}

#[test]
fn re_adding_a_child_moves_it_to_the_end_once() {
    let mut tree = Tree::new();
    let (container, _, _) = probe(false, false);
    let parent = tree.insert(container);
    let a = tree.insert(probe(false, false).0);
    let b = tree.insert(probe(false, false).0);

    tree.add_child(parent, a);
    tree.add_child(parent, b);
    tree.add_child(parent, a);

    assert_eq!(tree.children(parent), &[b, a]);
    assert_eq!(tree.parent(a), Some(parent));
}

#[test]
fn add_child_detaches_from_previous_parent() {
    let mut tree = Tree::new();
    let old = tree.insert(probe(false, false).0);
    let new = tree.insert(probe(false, false).0);
    let child = tree.insert_child(old, probe(false, false).0);

    tree.add_child(new, child);

    assert_eq!(tree.parent(child), Some(new));
    assert!(tree.children(old).is_empty());
    assert_eq!(tree.children(new), &[child]);
}

#[test]
fn insert_with_children_adopts_in_order() {
    let mut tree = Tree::new();
    let a = tree.insert(probe(false, false).0);
    let b = tree.insert(probe(false, false).0);
    let parent = tree.insert_with_children(probe(false, false).0, [a, b]);

    assert_eq!(tree.children(parent), &[a, b]);
    assert_eq!(tree.parent(a), Some(parent));
    assert_eq!(tree.parent(b), Some(parent));
}

#[test]
fn insert_child_wires_parent_on_creation() {
    let mut tree = Tree::new();
    let parent = tree.insert(probe(false, false).0);
    let child = tree.insert_child(parent, probe(false, false).0);

    assert_eq!(tree.parent(child), Some(parent));
    assert_eq!(tree.children(parent), &[child]);
}

#[test]
fn remove_drops_the_whole_subtree() {
    let mut tree = Tree::new();
    let root = tree.insert(probe(false, false).0);
    let mid = tree.insert_child(root, probe(false, false).0);
    let leaf = tree.insert_child(mid, probe(false, false).0);

    tree.remove(mid);

    assert!(tree.contains(root));
    assert!(!tree.contains(mid));
    assert!(!tree.contains(leaf));
    assert!(tree.children(root).is_empty());
    assert!(!tree.dispatch_keyboard(leaf, &key_event()));
}
