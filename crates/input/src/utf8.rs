//! UTF-8 helpers for the input side.

/// Number of bytes a sequence starting with `lead` occupies, or `None` if
/// `lead` cannot start a well-formed sequence.
pub fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

pub fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Decode exactly one codepoint from `bytes`.
///
/// Overlong forms, surrogates and trailing bytes are rejected.
pub fn decode(bytes: &[u8]) -> Option<char> {
    let s = std::str::from_utf8(bytes).ok()?;
    let mut chars = s.chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_byte_lengths() {
        assert_eq!(sequence_len(b'a'), Some(1));
        assert_eq!(sequence_len(0xC3), Some(2));
        assert_eq!(sequence_len(0xE6), Some(3));
        assert_eq!(sequence_len(0xF0), Some(4));
        assert_eq!(sequence_len(0x80), None);
        assert_eq!(sequence_len(0xC0), None);
        assert_eq!(sequence_len(0xFF), None);
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(decode(&[0xC3, 0xA9]), Some('é'));
        assert_eq!(decode(&[0xE0, 0x80, 0x80]), None);
        assert_eq!(decode(&[0xED, 0xA0, 0x80]), None);
        assert_eq!(decode(b"ab"), None);
    }
}
