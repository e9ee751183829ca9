//! Terminal session and event loop.
//!
//! [`Session`] owns the TTY for the lifetime of a full-screen program: it puts
//! the device into raw mode, applies the optional features (alternate screen,
//! keypad mode, hidden cursor, mouse reporting), renders the cell grid and
//! turns input bytes and `SIGWINCH` into [`Event`]s.
//!
//! ```no_run
//! use termcell_term::{Session, SessionConfig};
//! use termcell_types::{Attr, Color, Event, KeyCode};
//!
//! # fn main() -> termcell_term::Result<()> {
//! let mut session = Session::init_with(SessionConfig::from_env())?;
//! session.put_str(0, 0, "press q", Attr::new(Color::GREEN), Attr::DEFAULT);
//! session.render()?;
//! loop {
//!     if let Event::Key(key) = session.poll(-1)? {
//!         if key.code == KeyCode::Char('q') {
//!             break;
//!         }
//!     }
//! }
//! session.shutdown()
//! # }
//! ```

pub mod config;
pub mod error;
mod event_loop;
pub mod session;
pub mod tty;
pub mod winch;

pub use termcell_core as core;
pub use termcell_types as types;

pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use session::Session;
pub use termcell_types::Event;
