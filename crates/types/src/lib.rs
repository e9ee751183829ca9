//! Shared data types for termcell.
//!
//! Everything in this crate is plain data: cells, colors, output modes and the
//! events produced by the input side. Nothing here touches a file descriptor,
//! so the grid, the renderer and the decoder can all be exercised without a
//! real terminal.
//!
//! # Color values
//!
//! A [`Color`] is a single `u32` whose meaning depends on the session's
//! [`OutputMode`]:
//!
//! | Mode | Value | Meaning |
//! |------|-------|---------|
//! | any | `0` | terminal default (no sequence emitted) |
//! | `Normal` | `1..=8` | black, red, green, yellow, blue, magenta, cyan, white |
//! | `Normal` | `9..=16` | bright variants of the above |
//! | `Palette256` | `1..=16` | palette entries `0..=15` |
//! | `Palette256` | `17..=255` | palette entry of the same number |
//! | `Truecolor` | `0xRRGGBB` | 24-bit color |
//!
//! # Examples
//!
//! ```
//! use termcell_types::{Attr, Cell, Color, KeyCode, KeyEvent, Modifiers, OutputMode, Style};
//!
//! let cell = Cell::new('X', Attr::new(Color::RED).with(Style::BOLD), Attr::DEFAULT);
//! assert_eq!(cell.ch, 'X');
//! assert!(cell.fg.style.contains(Style::BOLD));
//!
//! assert_eq!(OutputMode::from_str("256"), Some(OutputMode::Palette256));
//!
//! let key = KeyEvent::new(KeyCode::Char('c'), Modifiers::CONTROL);
//! assert_eq!(key.codepoint(), Some('c'));
//! ```

use bitflags::bitflags;

/// Longest escape sequence the input decoder will buffer (fits urxvt mouse reports).
pub const MAX_SEQ: usize = 14;

/// Grid width used when the TTY reports a zero-sized window.
pub const FALLBACK_WIDTH: u16 = 80;

/// Grid height used when the TTY reports a zero-sized window.
pub const FALLBACK_HEIGHT: u16 = 24;

/// Codepoint stored in the cell that follows a wide glyph.
pub const CONTINUATION: char = '\0';

/// A color value, interpreted under the active [`OutputMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const DEFAULT: Color = Color(0);
    pub const BLACK: Color = Color(1);
    pub const RED: Color = Color(2);
    pub const GREEN: Color = Color(3);
    pub const YELLOW: Color = Color(4);
    pub const BLUE: Color = Color(5);
    pub const MAGENTA: Color = Color(6);
    pub const CYAN: Color = Color(7);
    pub const WHITE: Color = Color(8);
    pub const BRIGHT_BLACK: Color = Color(9);
    pub const BRIGHT_RED: Color = Color(10);
    pub const BRIGHT_GREEN: Color = Color(11);
    pub const BRIGHT_YELLOW: Color = Color(12);
    pub const BRIGHT_BLUE: Color = Color(13);
    pub const BRIGHT_MAGENTA: Color = Color(14);
    pub const BRIGHT_CYAN: Color = Color(15);
    pub const BRIGHT_WHITE: Color = Color(16);

    /// Palette or ANSI index, meaningful in `Normal` and `Palette256` modes.
    pub const fn index(n: u8) -> Self {
        Color(n as u32)
    }

    /// 24-bit value, meaningful in `Truecolor` mode.
    ///
    /// `rgb(0, 0, 0)` is indistinguishable from [`Color::DEFAULT`].
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn is_default(self) -> bool {
        self.0 == 0
    }

    /// Red, green and blue components of a 24-bit value.
    pub const fn components(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }

    /// Approximate a 24-bit value with the nearest entry of the 6x6x6 cube.
    ///
    /// The result is meant for `Palette256` mode. The cube's black corner
    /// (entry 16) collides with the `1..=16` remap, so it is reported as the
    /// darkest grayscale entry (232) instead.
    ///
    /// ```
    /// use termcell_types::Color;
    ///
    /// assert_eq!(Color::rgb(255, 0, 0).to_palette(), Color(196));
    /// assert_eq!(Color::rgb(255, 255, 255).to_palette(), Color(231));
    /// assert_eq!(Color::rgb(0, 0, 0).to_palette(), Color(232));
    /// ```
    pub fn to_palette(self) -> Color {
        // Midpoints between the cube levels 0x00, 0x5f, 0x87, 0xaf, 0xd7, 0xff.
        const STEPS: [u16; 6] = [47, 115, 155, 195, 235, 256];

        let level = |c: u8| -> u32 {
            STEPS
                .iter()
                .position(|&step| step > c as u16)
                .unwrap_or(5) as u32
        };

        let (r, g, b) = self.components();
        let idx = 16 + level(r) * 36 + level(g) * 6 + level(b);
        if idx == 16 {
            Color(232)
        } else {
            Color(idx)
        }
    }
}

bitflags! {
    /// Text style bits carried by an [`Attr`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Style: u8 {
        const BOLD = 0b0001;
        const UNDERLINE = 0b0010;
        const REVERSE = 0b0100;
        const BLINK = 0b1000;
    }
}

/// One channel (foreground or background) of a cell's appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attr {
    pub color: Color,
    pub style: Style,
}

impl Attr {
    pub const DEFAULT: Attr = Attr {
        color: Color::DEFAULT,
        style: Style::empty(),
    };

    pub const fn new(color: Color) -> Self {
        Self {
            color,
            style: Style::empty(),
        }
    }

    pub const fn with(self, style: Style) -> Self {
        Self {
            color: self.color,
            style: self.style.union(style),
        }
    }

    pub const fn is_plain_default(self) -> bool {
        self.color.is_default() && self.style.is_empty()
    }
}

impl From<Color> for Attr {
    fn from(color: Color) -> Self {
        Attr::new(color)
    }
}

/// A single character position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub fg: Attr,
    pub bg: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(Attr::DEFAULT, Attr::DEFAULT)
    }
}

impl Cell {
    pub const fn new(ch: char, fg: Attr, bg: Attr) -> Self {
        Self { ch, fg, bg }
    }

    /// A space with the given attributes.
    pub const fn blank(fg: Attr, bg: Attr) -> Self {
        Self { ch: ' ', fg, bg }
    }

    /// True for the placeholder cell that follows a wide glyph.
    pub const fn is_continuation(&self) -> bool {
        self.ch == CONTINUATION
    }
}

/// How color values are turned into escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputMode {
    /// 8 standard colors plus their bright variants.
    #[default]
    Normal,
    /// xterm 256-color palette.
    Palette256,
    /// 24-bit direct color.
    Truecolor,
}

impl OutputMode {
    /// Parse a mode name (case-insensitive).
    ///
    /// Accepts `normal`/`16`, `256`/`palette`, `truecolor`/`24bit`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "16" | "8" => Some(OutputMode::Normal),
            "256" | "palette" | "palette256" => Some(OutputMode::Palette256),
            "truecolor" | "24bit" | "rgb" => Some(OutputMode::Truecolor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Normal => "normal",
            OutputMode::Palette256 => "256",
            OutputMode::Truecolor => "truecolor",
        }
    }
}

bitflags! {
    /// Optional terminal features a session can switch on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Features: u8 {
        const HIDE_CURSOR = 0b0001;
        const ALT_SCREEN = 0b0010;
        const KEYPAD = 0b0100;
        const MOUSE = 0b1000;
    }
}

impl Features {
    /// Parse a comma-separated feature list.
    ///
    /// `all` and `none` are accepted as shorthands; unknown names yield `None`.
    ///
    /// ```
    /// use termcell_types::Features;
    ///
    /// assert_eq!(Features::from_list("mouse, altscreen"), Some(Features::MOUSE | Features::ALT_SCREEN));
    /// assert_eq!(Features::from_list("all"), Some(Features::all()));
    /// assert_eq!(Features::from_list("sparkles"), None);
    /// ```
    pub fn from_list(s: &str) -> Option<Self> {
        let mut out = Features::empty();
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            out |= match name.to_lowercase().as_str() {
                "all" => Features::all(),
                "none" => Features::empty(),
                "hidecursor" | "hide_cursor" | "hide-cursor" | "nocursor" => Features::HIDE_CURSOR,
                "altscreen" | "alt_screen" | "alt-screen" | "alternate" => Features::ALT_SCREEN,
                "keypad" => Features::KEYPAD,
                "mouse" => Features::MOUSE,
                _ => return None,
            };
        }
        Some(out)
    }
}

bitflags! {
    /// Modifier keys reported alongside key and mouse events.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT = 0b0010;
        const CONTROL = 0b0100;
    }
}

/// Symbolic key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable codepoint, or the letter of a Ctrl+letter chord.
    Char(char),
    Enter,
    Tab,
    BackTab,
    Backspace,
    Escape,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// Function key `F1..=F12`.
    F(u8),
}

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// The codepoint carried by the key, if any.
    pub fn codepoint(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(ch) => Some(ch),
            _ => None,
        }
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
    /// Legacy reports do not say which button was released.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseKind {
    Press,
    Release,
    /// Motion with a button held.
    Drag,
}

/// A decoded mouse report. Coordinates are zero-based cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub x: u16,
    pub y: u16,
    pub button: MouseButton,
    pub kind: MouseKind,
    pub modifiers: Modifiers,
}

/// One result of polling a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
    /// The poll timeout elapsed with nothing to report.
    Timeout,
}

impl Event {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Event::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_plain_space() {
        let cell = Cell::default();
        assert_eq!(cell.ch, ' ');
        assert!(cell.fg.is_plain_default());
        assert!(cell.bg.is_plain_default());
        assert!(!cell.is_continuation());
    }

    #[test]
    fn rgb_components_round_trip() {
        let c = Color::rgb(0x12, 0x34, 0x56);
        assert_eq!(c.value(), 0x123456);
        assert_eq!(c.components(), (0x12, 0x34, 0x56));
    }

    #[test]
    fn palette_approximation_uses_cube_levels() {
        // 0x5f is the second cube level on every channel.
        assert_eq!(Color::rgb(0x5f, 0x5f, 0x5f).to_palette(), Color(16 + 36 + 6 + 1));
        assert_eq!(Color::rgb(0, 0, 255).to_palette(), Color(21));
        assert_eq!(Color::rgb(46, 46, 46).to_palette(), Color(232));
    }

    #[test]
    fn output_mode_names() {
        for mode in [OutputMode::Normal, OutputMode::Palette256, OutputMode::Truecolor] {
            assert_eq!(OutputMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(OutputMode::from_str("TrueColor"), Some(OutputMode::Truecolor));
        assert_eq!(OutputMode::from_str("cga"), None);
    }

    #[test]
    fn feature_list_parsing() {
        assert_eq!(Features::from_list(""), Some(Features::empty()));
        assert_eq!(Features::from_list("none"), Some(Features::empty()));
        assert_eq!(
            Features::from_list("hide_cursor,keypad"),
            Some(Features::HIDE_CURSOR | Features::KEYPAD)
        );
    }

    #[test]
    fn attr_with_accumulates_styles() {
        let a = Attr::new(Color::BLUE).with(Style::BOLD).with(Style::UNDERLINE);
        assert_eq!(a.style, Style::BOLD | Style::UNDERLINE);
        assert!(!a.is_plain_default());
    }
}
