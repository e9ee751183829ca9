//! Mouse report parsing.
//!
//! Three encodings are recognized:
//!
//! - X10: `ESC [ M b x y`, each value a single byte offset by 32
//! - SGR (1006): `ESC [ < b ; x ; y M` for press and `m` for release
//! - urxvt (1015): `ESC [ b ; x ; y M`, button offset by 32
//!
//! Coordinates are one-based on the wire and zero-based in [`MouseEvent`].

use termcell_types::{Modifiers, MouseButton, MouseEvent, MouseKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseParse {
    Complete(MouseEvent),
    /// The bytes so far could still become a mouse report.
    Partial,
    NoMatch,
}

/// Try to parse `seq`, which starts with ESC, as a mouse report.
pub fn parse(seq: &[u8]) -> MouseParse {
    match seq {
        [0x1b] | [0x1b, b'['] => MouseParse::Partial,
        [0x1b, b'[', b'M', rest @ ..] => parse_x10(rest),
        [0x1b, b'[', b'<', rest @ ..] => match parse_params(rest) {
            Params::Done([b, x, y], fin) => {
                MouseParse::Complete(decode(b, x.saturating_sub(1), y.saturating_sub(1), Some(fin)))
            }
            Params::Partial => MouseParse::Partial,
            Params::Invalid => MouseParse::NoMatch,
        },
        [0x1b, b'[', b'0'..=b'9', ..] => match parse_params(&seq[2..]) {
            Params::Done([b, x, y], b'M') => MouseParse::Complete(decode(
                b.saturating_sub(32),
                x.saturating_sub(1),
                y.saturating_sub(1),
                None,
            )),
            Params::Done(..) | Params::Invalid => MouseParse::NoMatch,
            Params::Partial => MouseParse::Partial,
        },
        _ => MouseParse::NoMatch,
    }
}

fn parse_x10(rest: &[u8]) -> MouseParse {
    match rest {
        [b, x, y] => MouseParse::Complete(decode(
            b.wrapping_sub(32) as u32,
            x.saturating_sub(33) as u32,
            y.saturating_sub(33) as u32,
            None,
        )),
        _ if rest.len() < 3 => MouseParse::Partial,
        _ => MouseParse::NoMatch,
    }
}

enum Params {
    Done([u32; 3], u8),
    Partial,
    Invalid,
}

// `n;n;n` followed by `M` or `m`.
fn parse_params(body: &[u8]) -> Params {
    let mut vals = [0u32; 3];
    let mut idx = 0;
    let mut digits = 0;
    for &b in body {
        match b {
            b'0'..=b'9' => {
                vals[idx] = vals[idx].saturating_mul(10).saturating_add((b - b'0') as u32);
                digits += 1;
            }
            b';' if digits > 0 && idx < 2 => {
                idx += 1;
                digits = 0;
            }
            b'M' | b'm' if digits > 0 && idx == 2 => return Params::Done(vals, b),
            _ => return Params::Invalid,
        }
    }
    Params::Partial
}

fn decode(cb: u32, x: u32, y: u32, sgr_final: Option<u8>) -> MouseEvent {
    let mut modifiers = Modifiers::empty();
    if cb & 4 != 0 {
        modifiers |= Modifiers::SHIFT;
    }
    if cb & 8 != 0 {
        modifiers |= Modifiers::ALT;
    }
    if cb & 16 != 0 {
        modifiers |= Modifiers::CONTROL;
    }

    let wheel = cb & 64 != 0;
    let button = if wheel {
        if cb & 1 == 0 {
            MouseButton::WheelUp
        } else {
            MouseButton::WheelDown
        }
    } else {
        match cb & 3 {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::Unknown,
        }
    };

    let kind = if sgr_final == Some(b'm') || (!wheel && cb & 3 == 3) {
        MouseKind::Release
    } else if cb & 32 != 0 {
        MouseKind::Drag
    } else {
        MouseKind::Press
    };

    MouseEvent {
        x: x.min(u16::MAX as u32) as u16,
        y: y.min(u16::MAX as u32) as u16,
        button,
        kind,
        modifiers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(seq: &[u8]) -> MouseEvent {
        match parse(seq) {
            MouseParse::Complete(ev) => ev,
            other => panic!("expected a mouse event for {seq:?}, got {other:?}"),
        }
    }

    #[test]
    fn x10_press_and_release() {
        let ev = complete(b"\x1b[M !!");
        assert_eq!((ev.x, ev.y, ev.button, ev.kind), (0, 0, MouseButton::Left, MouseKind::Press));

        let ev = complete(b"\x1b[M#*+");
        assert_eq!((ev.x, ev.y), (9, 10));
        assert_eq!((ev.button, ev.kind), (MouseButton::Unknown, MouseKind::Release));
    }

    #[test]
    fn x10_is_partial_until_three_bytes() {
        assert_eq!(parse(b"\x1b[M"), MouseParse::Partial);
        assert_eq!(parse(b"\x1b[M !"), MouseParse::Partial);
    }

    #[test]
    fn sgr_press_release_and_wheel() {
        let ev = complete(b"\x1b[<0;10;5M");
        assert_eq!((ev.x, ev.y, ev.button, ev.kind), (9, 4, MouseButton::Left, MouseKind::Press));

        let ev = complete(b"\x1b[<2;1;1m");
        assert_eq!((ev.button, ev.kind), (MouseButton::Right, MouseKind::Release));

        assert_eq!(complete(b"\x1b[<64;3;3M").button, MouseButton::WheelUp);
        assert_eq!(complete(b"\x1b[<65;3;3M").button, MouseButton::WheelDown);
    }

    #[test]
    fn sgr_motion_and_modifiers() {
        let ev = complete(b"\x1b[<48;2;2M");
        assert_eq!((ev.button, ev.kind), (MouseButton::Left, MouseKind::Drag));
        assert_eq!(ev.modifiers, Modifiers::CONTROL);

        let ev = complete(b"\x1b[<13;2;2M");
        assert_eq!(ev.button, MouseButton::Middle);
        assert_eq!(ev.modifiers, Modifiers::SHIFT | Modifiers::ALT);
    }

    #[test]
    fn urxvt_report() {
        let ev = complete(b"\x1b[32;80;24M");
        assert_eq!((ev.x, ev.y, ev.button, ev.kind), (79, 23, MouseButton::Left, MouseKind::Press));
    }

    #[test]
    fn key_sequences_are_not_mouse() {
        assert_eq!(parse(b"\x1b[A"), MouseParse::NoMatch);
        assert_eq!(parse(b"\x1b[15~"), MouseParse::NoMatch);
        assert_eq!(parse(b"\x1b[1;5A"), MouseParse::NoMatch);
        assert_eq!(parse(b"\x1bOP"), MouseParse::NoMatch);
        assert_eq!(parse(b"\x1b[1"), MouseParse::Partial);
    }
}
