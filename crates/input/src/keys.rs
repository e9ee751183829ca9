//! Key identification: C0 controls, capability-table sequences and the
//! xterm modifier encoding.

use arrayvec::ArrayVec;

use termcell_core::caps::{Caps, COMMON_KEYS};
use termcell_types::{KeyCode, KeyEvent, Modifiers, MAX_SEQ};

/// Result of matching a candidate sequence against the key tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMatch {
    Exact(KeyCode),
    /// A longer known sequence starts with the candidate.
    Prefix,
    None,
}

/// Decode a single byte in `0..=127` (other than ESC).
pub fn decode_control(byte: u8) -> KeyEvent {
    let ctrl = Modifiers::CONTROL;
    match byte {
        0x00 => KeyEvent::new(KeyCode::Char(' '), ctrl),
        0x08 => KeyEvent::new(KeyCode::Backspace, ctrl),
        0x09 => KeyCode::Tab.into(),
        0x0D => KeyCode::Enter.into(),
        0x1B => KeyCode::Escape.into(),
        0x01..=0x1A => KeyEvent::new(KeyCode::Char((b'a' + byte - 1) as char), ctrl),
        0x1C..=0x1F => KeyEvent::new(KeyCode::Char((byte + 0x40) as char), ctrl),
        0x7F => KeyCode::Backspace.into(),
        _ => KeyCode::Char(byte as char).into(),
    }
}

/// Match `seq` against the terminal's table and the common sequences.
pub fn lookup(caps: &Caps, seq: &[u8]) -> TableMatch {
    let common = COMMON_KEYS.iter().map(|&(s, code)| (s.as_bytes(), code));
    let mut prefix = false;
    for (known, code) in caps.keys().chain(common) {
        if known == seq {
            return TableMatch::Exact(code);
        }
        if known.len() > seq.len() && known.starts_with(seq) {
            prefix = true;
        }
    }
    if prefix {
        TableMatch::Prefix
    } else {
        TableMatch::None
    }
}

/// Decode `ESC [ 1 ; m X` and `ESC [ n ; m ~`, where `m - 1` is a bit set of
/// shift (1), alt (2) and ctrl (4).
pub fn parse_modified(caps: &Caps, seq: &[u8]) -> Option<KeyEvent> {
    let body = seq.strip_prefix(b"\x1b[")?;
    let (&last, params) = body.split_last()?;
    let semi = params.iter().position(|&b| b == b';')?;
    let (num, param) = (&params[..semi], &params[semi + 1..]);
    if num.is_empty() || !num.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let m = param_value(param)?;

    let mut base: ArrayVec<u8, MAX_SEQ> = ArrayVec::new();
    match last {
        b'~' => {
            base.try_extend_from_slice(b"\x1b[").ok()?;
            base.try_extend_from_slice(num).ok()?;
            base.try_push(b'~').ok()?;
        }
        b'P'..=b'S' if num == b"1" => {
            base.try_extend_from_slice(&[0x1b, b'O', last]).ok()?;
        }
        b'A'..=b'D' | b'H' | b'F' if num == b"1" => {
            base.try_extend_from_slice(&[0x1b, b'[', last]).ok()?;
        }
        _ => return None,
    }

    match lookup(caps, &base) {
        TableMatch::Exact(code) => Some(KeyEvent::new(code, modifiers_from_param(m))),
        _ => None,
    }
}

fn param_value(digits: &[u8]) -> Option<u32> {
    if digits.is_empty() || digits.len() > 3 {
        return None;
    }
    digits.iter().try_fold(0u32, |acc, &d| {
        d.is_ascii_digit().then(|| acc * 10 + (d - b'0') as u32)
    })
}

fn modifiers_from_param(m: u32) -> Modifiers {
    let bits = m.saturating_sub(1);
    let mut mods = Modifiers::empty();
    if bits & 1 != 0 {
        mods |= Modifiers::SHIFT;
    }
    if bits & 2 != 0 {
        mods |= Modifiers::ALT;
    }
    if bits & 4 != 0 {
        mods |= Modifiers::CONTROL;
    }
    mods
}
