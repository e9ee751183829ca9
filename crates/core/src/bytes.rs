//! Growable byte accumulator used for staged output and input reads.

use std::io::{self, Read, Write};

use arrayvec::ArrayVec;

/// Append-only byte buffer.
///
/// Output is staged here and written to the terminal in one explicit
/// [`ByteStream::flush_to`] call, so a frame never reaches the TTY half-written.
/// On the input side, bytes read from the TTY wait here until the decoder
/// [`consume`](ByteStream::consume)s them.
#[derive(Debug, Clone, Default)]
pub struct ByteStream {
    buf: Vec<u8>,
    // Bytes before `start` have been consumed but not yet compacted away.
    start: usize,
}

impl ByteStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            start: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[self.start..]
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.start = 0;
    }

    pub fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn puts(&mut self, s: &str) {
        self.append(s.as_bytes());
    }

    /// Append the UTF-8 encoding of `ch`.
    pub fn push_char(&mut self, ch: char) {
        let mut tmp = [0u8; 4];
        self.append(ch.encode_utf8(&mut tmp).as_bytes());
    }

    /// Append `n` as decimal ASCII digits.
    pub fn push_decimal(&mut self, mut n: u32) {
        let mut digits: ArrayVec<u8, 10> = ArrayVec::new();
        loop {
            digits.push(b'0' + (n % 10) as u8);
            n /= 10;
            if n == 0 {
                break;
            }
        }
        for &d in digits.iter().rev() {
            self.buf.push(d);
        }
    }

    /// Drop the first `n` bytes (all of them if `n >= len`).
    ///
    /// Consumed bytes are only moved out once they make up half the buffer,
    /// so draining a long burst one event at a time stays linear.
    pub fn consume(&mut self, n: usize) {
        if n >= self.len() {
            self.clear();
            return;
        }
        self.start += n;
        if self.start * 2 >= self.buf.len() {
            self.buf.drain(..self.start);
            self.start = 0;
        }
    }

    /// Write everything staged to `w` in a single call and empty the buffer.
    ///
    /// The buffer is emptied even when the write fails; a partially written
    /// frame is not retried.
    pub fn flush_to<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let res = w.write_all(self.as_slice()).and_then(|_| w.flush());
        self.clear();
        res
    }

    /// Append whatever `r` has available right now.
    ///
    /// Reads until the source reports no more data (`Ok(0)` or `WouldBlock`).
    /// Returns the number of bytes appended.
    pub fn read_from<R: Read>(&mut self, r: &mut R) -> io::Result<usize> {
        let mut chunk = [0u8; 256];
        let mut total = 0;
        loop {
            match r.read(&mut chunk) {
                Ok(0) => return Ok(total),
                Ok(n) => {
                    self.append(&chunk[..n]);
                    total += n;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(total),
                Err(e) => return Err(e),
            }
        }
    }
}

impl PartialEq for ByteStream {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for ByteStream {}

impl Write for ByteStream {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.append(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_conversion_is_plain_digits() {
        let mut b = ByteStream::new();
        for n in [0u32, 7, 10, 255, 4_294_967_295] {
            b.clear();
            b.push_decimal(n);
            assert_eq!(b.as_slice(), n.to_string().as_bytes());
        }
    }

    #[test]
    fn consume_drops_prefix() {
        let mut b = ByteStream::new();
        b.puts("\x1b[Aq");
        b.consume(3);
        assert_eq!(b.as_slice(), b"q");
        b.consume(10);
        assert!(b.is_empty());
    }

    #[test]
    fn consume_compacts_only_past_half() {
        let mut b = ByteStream::new();
        b.puts("abcdefghij");
        b.consume(2);
        assert_eq!(b.as_slice(), b"cdefghij");
        assert_eq!(b.start, 2);
        assert_eq!(b.buf.len(), 10);

        b.consume(3);
        assert_eq!(b.as_slice(), b"fghij");
        assert_eq!(b.start, 0);
        assert_eq!(b.buf.len(), 5);

        b.puts("kl");
        assert_eq!(b.as_slice(), b"fghijkl");
    }

    #[test]
    fn long_burst_drains_one_byte_at_a_time() {
        let mut b = ByteStream::new();
        let data: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
        b.append(&data);
        let mut seen = Vec::with_capacity(data.len());
        while let Some(&byte) = b.as_slice().first() {
            seen.push(byte);
            b.consume(1);
        }
        assert_eq!(seen, data);
        assert!(b.is_empty());
    }

    #[test]
    fn flush_writes_once_and_empties() {
        let mut b = ByteStream::new();
        b.puts("hello");
        b.push_char('é');
        let mut sink = Vec::new();
        b.flush_to(&mut sink).unwrap();
        assert_eq!(sink, "helloé".as_bytes());
        assert!(b.is_empty());

        // Nothing staged: nothing written.
        b.flush_to(&mut sink).unwrap();
        assert_eq!(sink.len(), "helloé".len());
    }

    #[test]
    fn read_from_stops_at_end_of_available_data() {
        let mut b = ByteStream::new();
        let data = vec![b'x'; 1000];
        let n = b.read_from(&mut data.as_slice()).unwrap();
        assert_eq!(n, 1000);
        assert_eq!(b.len(), 1000);
    }
}
