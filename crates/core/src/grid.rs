//! Double-buffered cell grid.

use termcell_types::{Attr, Cell};

/// Back (desired) and front (last rendered) cell buffers of equal size.
///
/// Both buffers are row-major and always share the same dimensions. Writes
/// only ever touch the back buffer; the renderer is the sole writer of the
/// front buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    width: u16,
    height: u16,
    blank: Cell,
    back: Vec<Cell>,
    front: Vec<Cell>,
}

impl CellGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_blank(width, height, Cell::default())
    }

    pub fn with_blank(width: u16, height: u16, blank: Cell) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            blank,
            back: vec![blank; len],
            front: vec![blank; len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// The cell used by `clear` and to fill newly exposed area on resize.
    pub fn blank(&self) -> Cell {
        self.blank
    }

    /// Change the colors of the blank cell. Existing content is untouched.
    pub fn set_clear_attributes(&mut self, fg: Attr, bg: Attr) {
        self.blank = Cell::blank(fg, bg);
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Desired-state cell at `(x, y)`.
    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x, y).map(|i| self.back[i])
    }

    /// Last-rendered cell at `(x, y)`.
    pub fn front(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x, y).map(|i| self.front[i])
    }

    /// Write one cell. Coordinates outside the grid are ignored.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.idx(x, y) {
            self.back[i] = cell;
        }
    }

    /// Write a string left to right starting at `(x, y)`, one codepoint per
    /// column. Returns the number of codepoints consumed, including any that
    /// fell outside the grid.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, fg: Attr, bg: Attr) -> usize {
        let mut n = 0;
        for (i, ch) in s.chars().enumerate() {
            if let Ok(dx) = u16::try_from(i) {
                self.set(x.saturating_add(dx), y, Cell::new(ch, fg, bg));
            }
            n += 1;
        }
        n
    }

    /// Fill the back buffer with the blank cell.
    pub fn clear(&mut self) {
        self.back.fill(self.blank);
    }

    /// Fill the front buffer with the blank cell, so the next render diffs
    /// against a freshly cleared screen.
    pub fn invalidate_front(&mut self) {
        self.front.fill(self.blank);
    }

    /// Reallocate both buffers.
    ///
    /// The top-left `min(w) x min(h)` rectangle keeps its content; everything
    /// else becomes the blank cell. Returns false if the size did not change.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.back = resized(&self.back, self.width, self.height, width, height, self.blank);
        self.front = resized(&self.front, self.width, self.height, width, height, self.blank);
        self.width = width;
        self.height = height;
        true
    }

    /// Back buffer (read-only) and front buffer (mutable) for the renderer.
    pub(crate) fn buffers_mut(&mut self) -> (&[Cell], &mut [Cell]) {
        (&self.back, &mut self.front)
    }
}

fn resized(old: &[Cell], old_w: u16, old_h: u16, w: u16, h: u16, blank: Cell) -> Vec<Cell> {
    let mut cells = vec![blank; (w as usize) * (h as usize)];
    let min_w = old_w.min(w) as usize;
    let min_h = old_h.min(h) as usize;
    for row in 0..min_h {
        let src = row * old_w as usize;
        let dst = row * w as usize;
        cells[dst..dst + min_w].copy_from_slice(&old[src..src + min_w]);
    }
    cells
}
