use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent, KeyEventKind},
    execute, queue,
    style::{Attribute, Color as CtColor, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};

use crate::adapter::{HostAdapter, SizeRequest};
use crate::canvas::{Canvas, Cell};
use crate::event::mouse_action;
use crate::types::{Rgb, TextStyle};

/// Crossterm-backed host runtime: raw-mode terminal setup, event polling,
/// and frame flushing for one [`HostAdapter`].
pub struct Terminal {
    stdout: io::Stdout,
    previous: Option<Canvas>,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;

        Ok(Self {
            stdout,
            previous: None,
        })
    }

    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll(&self, timeout: Option<Duration>) -> io::Result<Vec<CrosstermEvent>> {
        let mut events = Vec::new();

        let has_event = match timeout {
            Some(dur) => event::poll(dur)?,
            None => {
                // Block until event
                events.push(event::read()?);
                return Ok(events);
            }
        };

        if has_event {
            events.push(event::read()?);
            // Drain any additional pending events
            while event::poll(Duration::ZERO)? {
                events.push(event::read()?);
            }
        }

        Ok(events)
    }

    /// Render the adapter box-constrained at the current terminal size and
    /// flush the cells that changed since the previous frame.
    pub fn render(&mut self, adapter: &mut HostAdapter) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        let canvas = adapter.render(SizeRequest::Box { width, height }).clone();
        self.flush_canvas(&canvas)?;
        self.previous = Some(canvas);
        Ok(())
    }

    /// Translate raw input callbacks into adapter dispatch. Returns
    /// whether any event was consumed by the tree. Key release and repeat
    /// callbacks are ignored.
    pub fn deliver(&mut self, adapter: &mut HostAdapter, events: &[CrosstermEvent]) -> bool {
        let request = match &self.previous {
            Some(c) => SizeRequest::Box {
                width: c.width(),
                height: c.height(),
            },
            None => SizeRequest::Fixed,
        };

        let mut consumed = false;
        for raw in events {
            match raw {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    consumed |= adapter.keypress(request, key.code.into(), key.modifiers.into());
                }
                CrosstermEvent::Mouse(mouse) => {
                    if let Some((action, button)) = mouse_action(mouse.kind) {
                        consumed |=
                            adapter.mouse_event(request, action, button, mouse.column, mouse.row);
                    }
                }
                CrosstermEvent::Resize(..) => {
                    // Stale frame; repaint everything next render.
                    self.previous = None;
                }
                _ => {}
            }
        }
        consumed
    }

    fn flush_canvas(&mut self, canvas: &Canvas) -> io::Result<()> {
        // Diff against the previous frame when sizes match, else repaint.
        let changed: Vec<(u16, u16, Cell)> = match &self.previous {
            Some(prev) if prev.width() == canvas.width() && prev.height() == canvas.height() => {
                canvas.diff(prev).map(|(x, y, c)| (x, y, *c)).collect()
            }
            _ => canvas.iter().map(|(x, y, c)| (x, y, *c)).collect(),
        };

        let stdout = &mut self.stdout;
        queue!(stdout, SetAttribute(Attribute::Reset))?;

        let mut fg = Rgb::new(255, 255, 255);
        let mut bg = Rgb::new(0, 0, 0);
        let mut attrs = TextStyle::new();

        for (x, y, cell) in changed {
            // The wide glyph to the left already occupies this cell.
            if cell.wide_continuation {
                continue;
            }
            queue!(stdout, cursor::MoveTo(x, y))?;
            if cell.fg != fg {
                queue!(stdout, SetForegroundColor(ct_color(cell.fg)))?;
                fg = cell.fg;
            }
            if cell.bg != bg {
                queue!(stdout, SetBackgroundColor(ct_color(cell.bg)))?;
                bg = cell.bg;
            }
            if cell.style != attrs {
                shift_attributes(stdout, attrs, cell.style)?;
                attrs = cell.style;
            }
            queue!(stdout, Print(cell.ch))?;
        }

        queue!(stdout, SetAttribute(Attribute::Reset))?;
        stdout.flush()
    }
}

fn ct_color(rgb: Rgb) -> CtColor {
    CtColor::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn shift_attributes(out: &mut impl Write, from: TextStyle, to: TextStyle) -> io::Result<()> {
    if to.bold != from.bold {
        let attr = if to.bold {
            Attribute::Bold
        } else {
            Attribute::NormalIntensity
        };
        queue!(out, SetAttribute(attr))?;
    }
    if to.dim != from.dim {
        let attr = if to.dim {
            Attribute::Dim
        } else {
            Attribute::NormalIntensity
        };
        queue!(out, SetAttribute(attr))?;
    }
    if to.italic != from.italic {
        let attr = if to.italic {
            Attribute::Italic
        } else {
            Attribute::NoItalic
        };
        queue!(out, SetAttribute(attr))?;
    }
    if to.underline != from.underline {
        let attr = if to.underline {
            Attribute::Underlined
        } else {
            Attribute::NoUnderline
        };
        queue!(out, SetAttribute(attr))?;
    }
    Ok(())
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
