//! termcell (workspace facade crate).
//!
//! A self-contained terminal library: raw-mode session, double-buffered cell
//! grid with a diff renderer, and an input decoder for keys, mouse reports and
//! resizes. The implementation lives in dedicated crates under `crates/`; this
//! package re-exports them under one name.

pub use termcell_core as core;
pub use termcell_input as input;
pub use termcell_term as term;
pub use termcell_types as types;

pub use termcell_term::{Session, SessionConfig, SessionError};
pub use termcell_types::{
    Attr, Cell, Color, Event, Features, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent,
    MouseKind, OutputMode, Style,
};
