//! Terminal-independent frame model.
//!
//! This crate holds everything on the output path that can be tested without a
//! TTY: the [`ByteStream`] staging buffer, the precompiled capability tables,
//! the double-buffered [`CellGrid`], escape-sequence encoding and the diff
//! [`Renderer`].
//!
//! # Module Structure
//!
//! - [`bytes`]: append-only byte accumulator with a single-write flush
//! - [`caps`]: control sequences per terminal family, looked up by `TERM`
//! - [`grid`]: back/front cell buffers with resize that keeps the overlap
//! - [`encode`]: cursor, SGR and title sequences for each output mode
//! - [`render`]: back-vs-front diff with cursor and attribute coalescing
//!
//! # Example
//!
//! ```
//! use termcell_core::{ByteStream, Caps, CellGrid, Renderer};
//! use termcell_types::{Attr, Cell, Color, OutputMode};
//!
//! let mut grid = CellGrid::new(80, 24);
//! grid.set(0, 0, Cell::new('X', Attr::new(Color::RED), Attr::DEFAULT));
//!
//! let mut renderer = Renderer::new();
//! let mut out = ByteStream::new();
//! renderer.encode_diff_into(&mut grid, Caps::xterm(), OutputMode::Normal, None, &mut out);
//! assert!(out.as_slice().ends_with(b"\x1b[31m\x1b[1;1HX"));
//!
//! // Nothing changed, nothing to send.
//! out.clear();
//! renderer.encode_diff_into(&mut grid, Caps::xterm(), OutputMode::Normal, None, &mut out);
//! assert!(out.is_empty());
//! ```

pub mod bytes;
pub mod caps;
pub mod encode;
pub mod grid;
pub mod render;

pub use termcell_types as types;

pub use bytes::ByteStream;
pub use caps::{Caps, Func};
pub use grid::CellGrid;
pub use render::{glyph_width, Renderer};
