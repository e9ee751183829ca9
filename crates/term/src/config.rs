//! Session configuration.

use std::path::PathBuf;

use termcell_types::{Features, OutputMode};

pub const DEFAULT_TTY: &str = "/dev/tty";

/// How a [`Session`](crate::Session) opens and sets up the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub tty_path: PathBuf,
    /// Capability table name; `None` fails with `UnsupportedTerminal`.
    pub term: Option<String>,
    pub color_mode: OutputMode,
    pub features: Features,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tty_path: PathBuf::from(DEFAULT_TTY),
            term: None,
            color_mode: OutputMode::Normal,
            features: Features::all(),
        }
    }
}

impl SessionConfig {
    /// Read configuration from the environment.
    ///
    /// - `TERMCELL_TTY`: terminal device (default `/dev/tty`)
    /// - `TERM`: capability table name
    /// - `TERMCELL_COLOR`: `normal`, `256` or `truecolor`; when unset,
    ///   `COLORTERM=truecolor|24bit` selects truecolor
    /// - `TERMCELL_FEATURES`: comma list of `hide-cursor`, `alt-screen`,
    ///   `keypad`, `mouse`, or `all`/`none`
    pub fn from_env() -> Self {
        use std::env;

        let tty_path = env::var("TERMCELL_TTY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TTY));

        let term = env::var("TERM").ok().filter(|s| !s.is_empty());

        let color_mode = env::var("TERMCELL_COLOR")
            .ok()
            .and_then(|s| OutputMode::from_str(s.trim()))
            .or_else(|| {
                env::var("COLORTERM")
                    .ok()
                    .filter(|s| s == "truecolor" || s == "24bit")
                    .map(|_| OutputMode::Truecolor)
            })
            .unwrap_or_default();

        let features = env::var("TERMCELL_FEATURES")
            .ok()
            .and_then(|s| Features::from_list(&s))
            .unwrap_or_else(Features::all);

        Self {
            tty_path,
            term,
            color_mode,
            features,
        }
    }

    pub fn with_tty_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tty_path = path.into();
        self
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    pub fn with_color_mode(mut self, mode: OutputMode) -> Self {
        self.color_mode = mode;
        self
    }

    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }
}
