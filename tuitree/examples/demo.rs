use std::fs::File;
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, KeyCode, MouseEventKind};
use simplelog::{Config, LevelFilter, WriteLogger};
use tuitree::{
    Canvas, Cell, HostAdapter, Key, KeyboardEvent, MouseEvent, NodeId, Rgb, Terminal, TextStyle,
    Tree, Widget,
};

/// Fills the screen behind the panels.
struct Backdrop;

impl Widget for Backdrop {
    fn intrinsic_size(&self) -> (u16, u16) {
        (80, 24)
    }

    fn render(&self, id: NodeId, canvas: &mut Canvas) {
        canvas.fill(Cell::new(' ').with_bg(Rgb::new(18, 18, 28)), id);
    }
}

/// A clickable panel that toggles between lit and unlit. Click it, or
/// focus it with Tab and hit Enter or Space.
struct Panel {
    label: &'static str,
    x: u16,
    y: u16,
    lit: bool,
}

impl Widget for Panel {
    fn intrinsic_size(&self) -> (u16, u16) {
        (self.label.len() as u16 + 4, 3)
    }

    fn render(&self, id: NodeId, canvas: &mut Canvas) {
        let (w, h) = self.intrinsic_size();
        let bg = if self.lit {
            Rgb::new(64, 112, 64)
        } else {
            Rgb::new(48, 48, 72)
        };
        for dy in 0..h {
            for dx in 0..w {
                canvas.put(self.x + dx, self.y + dy, Cell::new(' ').with_bg(bg), id);
            }
        }
        let text = Cell::new(' ').with_bg(bg).with_style(TextStyle::new().bold());
        canvas.put_str(self.x + 2, self.y + 1, self.label, text, id);
    }

    fn on_keyboard(&mut self, event: &KeyboardEvent) -> bool {
        match event.key {
            Key::Enter | Key::Char(' ') => {
                self.lit = !self.lit;
                true
            }
            _ => false,
        }
    }

    fn on_mouse(&mut self, _event: &MouseEvent) -> bool {
        self.lit = !self.lit;
        true
    }
}

fn cycle_focus(adapter: &mut HostAdapter) {
    let root = adapter.root();
    let panels = adapter.tree().children(root).to_vec();
    if panels.is_empty() {
        return;
    }
    let next = match adapter
        .tree()
        .focus_of(root)
        .and_then(|current| panels.iter().position(|&p| p == current))
    {
        Some(i) => panels[(i + 1) % panels.len()],
        None => panels[0],
    };
    adapter.tree_mut().take_focus(next);
}

fn main() -> std::io::Result<()> {
    // Set up file logging
    let log_file = File::create("demo.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let mut tree = Tree::new();
    let root = tree.insert(Backdrop);
    for (i, label) in ["alpha", "beta", "gamma"].into_iter().enumerate() {
        tree.insert_child(
            root,
            Panel {
                label,
                x: 4 + i as u16 * 14,
                y: 3,
                lit: false,
            },
        );
    }
    if let Some(&first) = tree.children(root).first() {
        tree.take_focus(first);
    }

    let mut adapter = HostAdapter::new(tree, root);
    let mut term = Terminal::new()?;

    loop {
        term.render(&mut adapter)?;

        let events = term.poll(Some(Duration::from_millis(100)))?;
        for event in &events {
            match event {
                CrosstermEvent::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Tab => cycle_focus(&mut adapter),
                    _ => {}
                },
                CrosstermEvent::Mouse(mouse) => {
                    // Focus follows clicks.
                    if let MouseEventKind::Down(_) = mouse.kind {
                        let target = adapter
                            .canvas()
                            .and_then(|c| c.hit_test(mouse.column, mouse.row));
                        if let Some(target) = target {
                            adapter.tree_mut().take_focus(target);
                        }
                    }
                }
                _ => {}
            }
        }
        term.deliver(&mut adapter, &events);
    }
}
