//! Precompiled terminal capability tables.
//!
//! No terminfo parsing happens at runtime. A handful of terminal families are
//! described here directly, and `TERM` is matched against them: exact name
//! first, then alias prefixes, then substring.

use termcell_types::KeyCode;

/// Output capabilities, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    EnterCa,
    ExitCa,
    ShowCursor,
    HideCursor,
    ClearScreen,
    Sgr0,
    Underline,
    Bold,
    Blink,
    Reverse,
    EnterKeypad,
    ExitKeypad,
    EnterMouse,
    ExitMouse,
}

const FUNC_COUNT: usize = 14;
const KEY_COUNT: usize = 22;

/// Key identities matching the order of every `keys` table.
const KEY_ORDER: [KeyCode; KEY_COUNT] = [
    KeyCode::F(1),
    KeyCode::F(2),
    KeyCode::F(3),
    KeyCode::F(4),
    KeyCode::F(5),
    KeyCode::F(6),
    KeyCode::F(7),
    KeyCode::F(8),
    KeyCode::F(9),
    KeyCode::F(10),
    KeyCode::F(11),
    KeyCode::F(12),
    KeyCode::Insert,
    KeyCode::Delete,
    KeyCode::Home,
    KeyCode::End,
    KeyCode::PageUp,
    KeyCode::PageDown,
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
];

// Normal tracking, button-event tracking, urxvt and SGR extended coordinates.
const ENTER_MOUSE: &str = "\x1b[?1000h\x1b[?1002h\x1b[?1015h\x1b[?1006h";
const EXIT_MOUSE: &str = "\x1b[?1006l\x1b[?1015l\x1b[?1002l\x1b[?1000l";

/// Control sequences for one terminal family.
#[derive(Debug)]
pub struct Caps {
    pub name: &'static str,
    aliases: &'static [&'static str],
    keys: [&'static str; KEY_COUNT],
    funcs: [&'static str; FUNC_COUNT],
}

impl Caps {
    pub fn func(&self, f: Func) -> &'static [u8] {
        self.funcs[f as usize].as_bytes()
    }

    /// Key sequences this terminal sends, paired with their identity.
    pub fn keys(&self) -> impl Iterator<Item = (&'static [u8], KeyCode)> + '_ {
        self.keys
            .iter()
            .copied()
            .zip(KEY_ORDER.iter().copied())
            .filter(|(seq, _)| !seq.is_empty())
            .map(|(seq, code)| (seq.as_bytes(), code))
    }

    /// Whether the terminal supports mouse reporting at all.
    pub fn has_mouse(&self) -> bool {
        !self.funcs[Func::EnterMouse as usize].is_empty()
    }

    /// Find the table for a `TERM` value.
    ///
    /// ```
    /// use termcell_core::caps::Caps;
    ///
    /// assert_eq!(Caps::lookup("xterm-256color").unwrap().name, "xterm");
    /// assert_eq!(Caps::lookup("tmux-256color").unwrap().name, "screen");
    /// assert!(Caps::lookup("dumb").is_none());
    /// ```
    pub fn lookup(term: &str) -> Option<&'static Caps> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        TERMS
            .iter()
            .find(|c| c.name == term)
            .or_else(|| {
                TERMS
                    .iter()
                    .find(|c| c.aliases.iter().any(|a| term.starts_with(a)))
            })
            .or_else(|| TERMS.iter().find(|c| term.contains(c.name)))
    }

    /// The table used when nothing else is known.
    pub fn xterm() -> &'static Caps {
        &TERMS[3]
    }
}

/// Sequences every supported terminal may send regardless of its own table:
/// normal-mode cursor keys, the rxvt/vt220 home/end/function variants and
/// shift+tab.
pub static COMMON_KEYS: &[(&str, KeyCode)] = &[
    ("\x1b[A", KeyCode::Up),
    ("\x1b[B", KeyCode::Down),
    ("\x1b[C", KeyCode::Right),
    ("\x1b[D", KeyCode::Left),
    ("\x1bOA", KeyCode::Up),
    ("\x1bOB", KeyCode::Down),
    ("\x1bOC", KeyCode::Right),
    ("\x1bOD", KeyCode::Left),
    ("\x1b[H", KeyCode::Home),
    ("\x1b[F", KeyCode::End),
    ("\x1bOH", KeyCode::Home),
    ("\x1bOF", KeyCode::End),
    ("\x1b[1~", KeyCode::Home),
    ("\x1b[4~", KeyCode::End),
    ("\x1b[7~", KeyCode::Home),
    ("\x1b[8~", KeyCode::End),
    ("\x1bOP", KeyCode::F(1)),
    ("\x1bOQ", KeyCode::F(2)),
    ("\x1bOR", KeyCode::F(3)),
    ("\x1bOS", KeyCode::F(4)),
    ("\x1b[11~", KeyCode::F(1)),
    ("\x1b[12~", KeyCode::F(2)),
    ("\x1b[13~", KeyCode::F(3)),
    ("\x1b[14~", KeyCode::F(4)),
    ("\x1b[Z", KeyCode::BackTab),
];

const RXVT_KEYS: [&str; KEY_COUNT] = [
    "\x1b[11~", "\x1b[12~", "\x1b[13~", "\x1b[14~", "\x1b[15~", "\x1b[17~", "\x1b[18~",
    "\x1b[19~", "\x1b[20~", "\x1b[21~", "\x1b[23~", "\x1b[24~", "\x1b[2~", "\x1b[3~", "\x1b[7~",
    "\x1b[8~", "\x1b[5~", "\x1b[6~", "\x1b[A", "\x1b[B", "\x1b[D", "\x1b[C",
];

const XTERM_KEYS: [&str; KEY_COUNT] = [
    "\x1bOP", "\x1bOQ", "\x1bOR", "\x1bOS", "\x1b[15~", "\x1b[17~", "\x1b[18~", "\x1b[19~",
    "\x1b[20~", "\x1b[21~", "\x1b[23~", "\x1b[24~", "\x1b[2~", "\x1b[3~", "\x1bOH", "\x1bOF",
    "\x1b[5~", "\x1b[6~", "\x1bOA", "\x1bOB", "\x1bOD", "\x1bOC",
];

static TERMS: [Caps; 6] = [
    Caps {
        name: "rxvt-256color",
        aliases: &[],
        keys: RXVT_KEYS,
        funcs: [
            "\x1b7\x1b[?47h",
            "\x1b[2J\x1b[?47l\x1b8",
            "\x1b[?25h",
            "\x1b[?25l",
            "\x1b[H\x1b[2J",
            "\x1b[m",
            "\x1b[4m",
            "\x1b[1m",
            "\x1b[5m",
            "\x1b[7m",
            "\x1b=",
            "\x1b>",
            ENTER_MOUSE,
            EXIT_MOUSE,
        ],
    },
    Caps {
        name: "Eterm",
        aliases: &[],
        keys: RXVT_KEYS,
        funcs: [
            "\x1b7\x1b[?47h",
            "\x1b[2J\x1b[?47l\x1b8",
            "\x1b[?25h",
            "\x1b[?25l",
            "\x1b[H\x1b[2J",
            "\x1b[m",
            "\x1b[4m",
            "\x1b[1m",
            "\x1b[5m",
            "\x1b[7m",
            "",
            "",
            "",
            "",
        ],
    },
    Caps {
        name: "screen",
        aliases: &["tmux"],
        keys: [
            "\x1bOP", "\x1bOQ", "\x1bOR", "\x1bOS", "\x1b[15~", "\x1b[17~", "\x1b[18~",
            "\x1b[19~", "\x1b[20~", "\x1b[21~", "\x1b[23~", "\x1b[24~", "\x1b[2~", "\x1b[3~",
            "\x1b[1~", "\x1b[4~", "\x1b[5~", "\x1b[6~", "\x1bOA", "\x1bOB", "\x1bOD", "\x1bOC",
        ],
        funcs: [
            "\x1b[?1049h",
            "\x1b[?1049l",
            "\x1b[34h\x1b[?25h",
            "\x1b[?25l",
            "\x1b[H\x1b[J",
            "\x1b[m",
            "\x1b[4m",
            "\x1b[1m",
            "\x1b[5m",
            "\x1b[7m",
            "\x1b[?1h\x1b=",
            "\x1b[?1l\x1b>",
            ENTER_MOUSE,
            EXIT_MOUSE,
        ],
    },
    Caps {
        name: "xterm",
        aliases: &["st-", "alacritty", "kitty", "foot", "wezterm", "cygwin", "ghostty"],
        keys: XTERM_KEYS,
        funcs: [
            "\x1b[?1049h",
            "\x1b[?1049l",
            "\x1b[?12l\x1b[?25h",
            "\x1b[?25l",
            "\x1b[H\x1b[2J",
            "\x1b(B\x1b[m",
            "\x1b[4m",
            "\x1b[1m",
            "\x1b[5m",
            "\x1b[7m",
            "\x1b[?1h\x1b=",
            "\x1b[?1l\x1b>",
            ENTER_MOUSE,
            EXIT_MOUSE,
        ],
    },
    Caps {
        name: "linux",
        aliases: &[],
        keys: [
            "\x1b[[A", "\x1b[[B", "\x1b[[C", "\x1b[[D", "\x1b[[E", "\x1b[17~", "\x1b[18~",
            "\x1b[19~", "\x1b[20~", "\x1b[21~", "\x1b[23~", "\x1b[24~", "\x1b[2~", "\x1b[3~",
            "\x1b[1~", "\x1b[4~", "\x1b[5~", "\x1b[6~", "\x1b[A", "\x1b[B", "\x1b[D", "\x1b[C",
        ],
        funcs: [
            "",
            "",
            "\x1b[?25h\x1b[?0c",
            "\x1b[?25l\x1b[?1c",
            "\x1b[H\x1b[J",
            "\x1b[0;10m",
            "\x1b[4m",
            "\x1b[1m",
            "\x1b[5m",
            "\x1b[7m",
            "",
            "",
            "",
            "",
        ],
    },
    Caps {
        name: "rxvt-unicode",
        aliases: &["rxvt"],
        keys: RXVT_KEYS,
        funcs: [
            "\x1b[?1049h",
            "\x1b[r\x1b[?1049l",
            "\x1b[?25h",
            "\x1b[?25l",
            "\x1b[H\x1b[2J",
            "\x1b[m\x1b(B",
            "\x1b[4m",
            "\x1b[1m",
            "\x1b[5m",
            "\x1b[7m",
            "\x1b=",
            "\x1b>",
            ENTER_MOUSE,
            EXIT_MOUSE,
        ],
    },
];
