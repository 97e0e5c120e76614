use crate::text::char_width;
use crate::tree::NodeId;

use super::Cell;

/// A width x height grid of cells, plus a record of which node painted each
/// cell last. Mouse hit-testing consults the owner grid: because children
/// paint after their parents and later siblings after earlier ones, the
/// recorded owner is always the topmost node at that cell.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    owners: Vec<Option<NodeId>>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
            owners: vec![None; len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    /// Paint one cell on behalf of `owner`. Out-of-bounds writes are
    /// silently dropped.
    pub fn put(&mut self, x: u16, y: u16, cell: Cell, owner: NodeId) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
            self.owners[idx] = Some(owner);
        }
    }

    /// Paint a string starting at (x, y), taking colors and attributes from
    /// `template`. Wide characters occupy two cells, the trailing one
    /// flagged as a continuation; zero-width characters are skipped.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, template: Cell, owner: NodeId) {
        let mut x = x;
        for ch in text.chars() {
            let w = char_width(ch) as u16;
            if w == 0 {
                continue;
            }
            if x >= self.width {
                break;
            }
            let mut cell = template;
            cell.ch = ch;
            cell.wide_continuation = false;
            self.put(x, y, cell, owner);
            if w == 2 {
                let mut cont = template;
                cont.ch = ' ';
                cont.wide_continuation = true;
                self.put(x + 1, y, cont, owner);
            }
            x += w;
        }
    }

    /// Fill every cell on behalf of `owner`.
    pub fn fill(&mut self, cell: Cell, owner: NodeId) {
        self.cells.fill(cell);
        self.owners.fill(Some(owner));
    }

    /// The node that painted (x, y) last, if any. Out-of-range coordinates
    /// and unpainted cells have no target.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<NodeId> {
        self.index(x, y).and_then(|idx| self.owners[idx])
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
        self.owners.fill(None);
    }

    /// Every cell with its coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let x = (i % width) as u16;
            let y = (i / width) as u16;
            (x, y, cell)
        })
    }

    /// Cells that differ from `other`. Only meaningful when both canvases
    /// have the same dimensions.
    pub fn diff<'a>(&'a self, other: &'a Canvas) -> impl Iterator<Item = (u16, u16, &'a Cell)> {
        let width = self.width as usize;
        self.cells
            .iter()
            .zip(other.cells.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(move |(i, (cell, _))| {
                let x = (i % width) as u16;
                let y = (i / width) as u16;
                (x, y, cell)
            })
    }
}
