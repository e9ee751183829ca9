//! Escape-sequence encoding for cursor moves, colors and titles.
//!
//! All functions append to a [`ByteStream`]; none of them write to a terminal.

use termcell_types::{Attr, Color, OutputMode, Style};

use crate::bytes::ByteStream;
use crate::caps::{Caps, Func};

/// `ESC [ row ; col H` with one-based coordinates.
pub fn write_cursor(out: &mut ByteStream, x: u16, y: u16) {
    out.puts("\x1b[");
    out.push_decimal(y as u32 + 1);
    out.push(b';');
    out.push_decimal(x as u32 + 1);
    out.push(b'H');
}

/// Color SGR for a foreground/background pair.
///
/// A default channel contributes nothing; when both are default no bytes are
/// written at all.
pub fn write_sgr(out: &mut ByteStream, fg: Color, bg: Color, mode: OutputMode) {
    if fg.is_default() && bg.is_default() {
        return;
    }

    out.puts("\x1b[");
    match mode {
        OutputMode::Truecolor => {
            if !fg.is_default() {
                write_rgb(out, b"38;2;", fg);
                if !bg.is_default() {
                    out.push(b';');
                }
            }
            if !bg.is_default() {
                write_rgb(out, b"48;2;", bg);
            }
        }
        OutputMode::Palette256 => {
            if !fg.is_default() {
                out.puts("38;5;");
                out.push_decimal(palette_index(fg));
                if !bg.is_default() {
                    out.push(b';');
                }
            }
            if !bg.is_default() {
                out.puts("48;5;");
                out.push_decimal(palette_index(bg));
            }
        }
        OutputMode::Normal => {
            if !fg.is_default() {
                let n = fg.value().min(16);
                if n > 8 {
                    out.puts("1;3");
                    out.push_decimal(n - 9);
                } else {
                    out.push(b'3');
                    out.push_decimal(n - 1);
                }
                if !bg.is_default() {
                    out.push(b';');
                }
            }
            if !bg.is_default() {
                let n = bg.value().min(16);
                if n > 8 {
                    out.puts("10");
                    out.push_decimal(n - 9);
                } else {
                    out.push(b'4');
                    out.push_decimal(n - 1);
                }
            }
        }
    }
    out.push(b'm');
}

fn write_rgb(out: &mut ByteStream, prefix: &[u8], color: Color) {
    let (r, g, b) = color.components();
    out.append(prefix);
    out.push_decimal(r as u32);
    out.push(b';');
    out.push_decimal(g as u32);
    out.push(b';');
    out.push_decimal(b as u32);
}

// Values 1..=16 address palette entries 0..=15.
fn palette_index(color: Color) -> u32 {
    let n = color.value() & 0xFF;
    match n {
        0 => 0,
        1..=16 => n - 1,
        _ => n,
    }
}

/// Full attribute change: reset, style sequences, then colors.
pub fn write_attr(out: &mut ByteStream, caps: &Caps, fg: Attr, bg: Attr, mode: OutputMode) {
    out.append(caps.func(Func::Sgr0));

    let style = fg.style | bg.style;
    if style.contains(Style::BOLD) {
        out.append(caps.func(Func::Bold));
    }
    if style.contains(Style::BLINK) {
        out.append(caps.func(Func::Blink));
    }
    if style.contains(Style::UNDERLINE) {
        out.append(caps.func(Func::Underline));
    }
    if style.contains(Style::REVERSE) {
        out.append(caps.func(Func::Reverse));
    }

    write_sgr(out, fg.color, bg.color, mode);
}

/// Window title: `ESC ] 0 ; title BEL`. Control bytes in `title` are dropped.
pub fn write_title(out: &mut ByteStream, title: &str) {
    out.puts("\x1b]0;");
    for ch in title.chars().filter(|c| !c.is_control()) {
        out.push_char(ch);
    }
    out.push(0x07);
}
