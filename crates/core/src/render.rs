//! Diff renderer: turns back-buffer changes into terminal output.
//!
//! The renderer never writes to a terminal itself. It encodes into a
//! [`ByteStream`] which the session flushes in one write per frame.

use termcell_types::{Attr, Cell, OutputMode, CONTINUATION};
use unicode_width::UnicodeWidthChar;

use crate::bytes::ByteStream;
use crate::caps::{Caps, Func};
use crate::encode::{write_attr, write_cursor};
use crate::grid::CellGrid;

/// Display width of a glyph in columns (at least 1).
pub fn glyph_width(ch: char) -> u16 {
    UnicodeWidthChar::width(ch).unwrap_or(1).max(1) as u16
}

/// Output-side caches that let consecutive writes skip redundant sequences.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    /// Column and row of the last glyph written.
    last_pos: Option<(u16, u16)>,
    /// Attribute pair of the last SGR emitted.
    last_attr: Option<(Attr, Attr)>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget where the terminal cursor is.
    pub fn invalidate_position(&mut self) {
        self.last_pos = None;
    }

    /// Forget the active attributes, forcing the next cell to emit them.
    pub fn invalidate_attr(&mut self) {
        self.last_attr = None;
    }

    pub fn last_attr(&self) -> Option<(Attr, Attr)> {
        self.last_attr
    }

    /// Emit an attribute change unless `(fg, bg)` is already active.
    pub fn send_attr(
        &mut self,
        out: &mut ByteStream,
        caps: &Caps,
        mode: OutputMode,
        fg: Attr,
        bg: Attr,
    ) {
        if self.last_attr == Some((fg, bg)) {
            return;
        }
        write_attr(out, caps, fg, bg, mode);
        self.last_attr = Some((fg, bg));
    }

    fn send_char(&mut self, out: &mut ByteStream, x: u16, y: u16, ch: char, width: u16) {
        let adjacent = matches!(self.last_pos, Some((lx, ly)) if ly == y && lx.checked_add(1) == Some(x));
        if !adjacent {
            write_cursor(out, x, y);
        }
        self.last_pos = Some((x.saturating_add(width - 1), y));
        out.push_char(if ch == CONTINUATION { ' ' } else { ch });
    }

    /// Encode every back/front difference into `out` and bring the front
    /// buffer up to date.
    ///
    /// `cursor` is the logical cursor; when `Some`, the terminal cursor is
    /// moved there after the scan.
    pub fn encode_diff_into(
        &mut self,
        grid: &mut CellGrid,
        caps: &Caps,
        mode: OutputMode,
        cursor: Option<(u16, u16)>,
        out: &mut ByteStream,
    ) {
        self.last_pos = None;

        let w = grid.width();
        let h = grid.height();
        let (back, front) = grid.buffers_mut();

        for y in 0..h {
            let row = y as usize * w as usize;
            let mut x = 0u16;
            while x < w {
                let i = row + x as usize;
                let cell = back[i];
                let cw = glyph_width(cell.ch);

                if cell == front[i] {
                    x = x.saturating_add(cw);
                    continue;
                }

                front[i] = cell;
                self.send_attr(out, caps, mode, cell.fg, cell.bg);

                if cw > 1 && x >= w - (cw - 1) {
                    // No room for the wide glyph; blank out the rest of the row.
                    for fx in x..w {
                        self.send_char(out, fx, y, ' ', 1);
                    }
                } else {
                    self.send_char(out, x, y, cell.ch, cw);
                    for k in 1..cw as usize {
                        front[i + k] = Cell::new(CONTINUATION, cell.fg, cell.bg);
                    }
                }
                x = x.saturating_add(cw);
            }
        }

        if let Some((cx, cy)) = cursor {
            write_cursor(out, cx, cy);
        }
    }

    /// Encode a whole-screen clear using the grid's blank attributes.
    pub fn encode_clear_into(
        &mut self,
        grid: &CellGrid,
        caps: &Caps,
        mode: OutputMode,
        cursor: Option<(u16, u16)>,
        out: &mut ByteStream,
    ) {
        let blank = grid.blank();
        self.send_attr(out, caps, mode, blank.fg, blank.bg);
        out.append(caps.func(Func::ClearScreen));
        if let Some((cx, cy)) = cursor {
            write_cursor(out, cx, cy);
        }
        self.last_pos = None;
    }
}
