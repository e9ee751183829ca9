use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a terminal session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to open terminal device {}: {source}", path.display())]
    TtyOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported terminal type {}", .0.as_deref().unwrap_or("(TERM not set)"))]
    UnsupportedTerminal(Option<String>),

    #[error("failed to set up resize notification: {0}")]
    SignalSetup(#[source] io::Error),

    #[error("a terminal session is already active in this process")]
    AlreadyActive,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
