//! Terminal input decoding.
//!
//! Turns the raw byte stream read from a TTY into [`Event`]s. The decoder is
//! independent of any descriptor: bytes are pushed in and events are pulled
//! out, so it is fully testable without a terminal.

pub mod decoder;
pub mod keys;
pub mod mouse;
pub mod utf8;

pub use termcell_types as types;

pub use decoder::{Decoded, InputDecoder, State};
pub use termcell_types::Event;
