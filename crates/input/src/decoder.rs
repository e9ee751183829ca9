//! Byte-stream to event state machine.

use arrayvec::ArrayVec;
use termcell_core::bytes::ByteStream;
use termcell_core::caps::Caps;
use termcell_types::{Event, KeyCode, KeyEvent, Modifiers, MAX_SEQ};
use tracing::trace;

use crate::keys::{self, TableMatch};
use crate::mouse::{self, MouseParse};
use crate::utf8;

const ESC: u8 = 0x1b;

/// Outcome of one decode attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Event(Event),
    /// More bytes are needed before anything can be reported.
    Incomplete,
    /// The given number of bytes formed no known input and were discarded.
    Invalid(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Utf8Continuation { remaining: u8, alt: bool },
    /// Collecting an escape sequence; `alt` is set when it was itself
    /// preceded by an ESC.
    EscapeSequence { alt: bool },
    /// A lone ESC with nothing after it yet.
    AwaitingDisambiguation,
}

/// Incremental input decoder.
///
/// Raw bytes go into [`buffer_mut`](Self::buffer_mut) (or [`feed`](Self::feed));
/// each call to [`next_event`](Self::next_event) reports at most one result and
/// consumes only the bytes that produced it. An ESC that interrupts a sequence
/// stays in the buffer and starts the next decode.
#[derive(Debug)]
pub struct InputDecoder {
    caps: &'static Caps,
    state: State,
    seq: ArrayVec<u8, MAX_SEQ>,
    input: ByteStream,
    pos: usize,
}

impl Default for InputDecoder {
    fn default() -> Self {
        Self::new(Caps::xterm())
    }
}

impl InputDecoder {
    pub fn new(caps: &'static Caps) -> Self {
        Self {
            caps,
            state: State::Idle,
            seq: ArrayVec::new(),
            input: ByteStream::with_capacity(256),
            pos: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.input.append(bytes);
    }

    /// Staging buffer for raw input, for reading straight from a descriptor.
    pub fn buffer_mut(&mut self) -> &mut ByteStream {
        &mut self.input
    }

    /// Bytes received but not yet examined.
    pub fn has_pending(&self) -> bool {
        !self.input.is_empty()
    }

    /// Decode the next event.
    ///
    /// `maybe_more` tells the decoder whether further input may still arrive.
    /// While it is `true`, a lone ESC or an unfinished sequence yields
    /// [`Decoded::Incomplete`]; once it is `false` whatever was collected is
    /// resolved.
    pub fn next_event(&mut self, maybe_more: bool) -> Decoded {
        let res = self.run(maybe_more);
        self.input.consume(self.pos);
        self.pos = 0;
        if let Decoded::Invalid(n) = res {
            trace!(bytes = n, "discarded unrecognized input");
        }
        res
    }

    fn run(&mut self, maybe_more: bool) -> Decoded {
        while let Some(&byte) = self.input.as_slice().get(self.pos) {
            if let Some(res) = self.step(byte) {
                return res;
            }
        }
        self.end_of_input(maybe_more)
    }

    fn reset(&mut self) {
        self.state = State::Idle;
        self.seq.clear();
    }

    fn discard(&mut self, extra: usize) -> Decoded {
        let alt = matches!(self.state, State::EscapeSequence { alt: true });
        let n = self.seq.len() + extra + alt as usize;
        self.reset();
        Decoded::Invalid(n)
    }

    fn emit(&mut self, event: Event) -> Option<Decoded> {
        self.reset();
        Some(Decoded::Event(event))
    }

    fn step(&mut self, byte: u8) -> Option<Decoded> {
        match self.state {
            State::Idle => {
                self.pos += 1;
                match byte {
                    ESC => {
                        self.seq.push(ESC);
                        self.state = State::EscapeSequence { alt: false };
                        None
                    }
                    0x00..=0x7f => self.emit(Event::Key(keys::decode_control(byte))),
                    _ => self.begin_utf8(byte, false),
                }
            }
            State::Utf8Continuation { remaining, alt } => {
                if !utf8::is_continuation(byte) {
                    // Leave the byte for the next decode.
                    return Some(self.discard(0));
                }
                self.pos += 1;
                self.seq.push(byte);
                if remaining > 1 {
                    self.state = State::Utf8Continuation { remaining: remaining - 1, alt };
                    return None;
                }
                match utf8::decode(&self.seq) {
                    Some(ch) => {
                        let mods = if alt { Modifiers::ALT } else { Modifiers::empty() };
                        self.emit(Event::Key(KeyEvent::new(KeyCode::Char(ch), mods)))
                    }
                    None => Some(self.discard(0)),
                }
            }
            State::AwaitingDisambiguation => {
                if byte == b'[' || byte == b'O' {
                    self.state = State::EscapeSequence { alt: false };
                    return self.step(byte);
                }
                // The pending ESC was a key press; `byte` starts the next decode.
                self.emit(Event::Key(KeyCode::Escape.into()))
            }
            State::EscapeSequence { alt } => self.step_escape(byte, alt),
        }
    }

    fn begin_utf8(&mut self, lead: u8, alt: bool) -> Option<Decoded> {
        self.seq.clear();
        match utf8::sequence_len(lead) {
            Some(len) if len > 1 => {
                self.seq.push(lead);
                self.state = State::Utf8Continuation { remaining: len as u8 - 1, alt };
                None
            }
            _ => {
                self.reset();
                Some(Decoded::Invalid(1 + alt as usize))
            }
        }
    }

    fn step_escape(&mut self, byte: u8, alt: bool) -> Option<Decoded> {
        if byte == ESC {
            if self.seq.len() == 1 {
                if !alt {
                    self.pos += 1;
                    self.state = State::EscapeSequence { alt: true };
                    return None;
                }
                // ESC ESC ESC: the third one seeds the next decode.
                return self.emit(alt_escape());
            }
            let res = self.resolve_unfinished(alt);
            self.reset();
            return Some(res);
        }

        if self.seq.len() == 1 && byte != b'[' && byte != b'O' {
            self.pos += 1;
            return if byte < 0x80 {
                let mut key = keys::decode_control(byte);
                key.modifiers |= Modifiers::ALT;
                self.emit(Event::Key(key))
            } else {
                self.begin_utf8(byte, true)
            };
        }

        self.pos += 1;
        if self.seq.try_push(byte).is_err() {
            return Some(self.discard(1));
        }
        self.classify(alt)
    }

    fn classify(&mut self, alt: bool) -> Option<Decoded> {
        let extra = if alt { Modifiers::ALT } else { Modifiers::empty() };

        match mouse::parse(&self.seq) {
            MouseParse::Complete(mut ev) => {
                ev.modifiers |= extra;
                return self.emit(Event::Mouse(ev));
            }
            MouseParse::Partial => return None,
            MouseParse::NoMatch => {}
        }

        match keys::lookup(self.caps, &self.seq) {
            TableMatch::Exact(code) => return self.emit(Event::Key(KeyEvent::new(code, extra))),
            TableMatch::Prefix => return None,
            TableMatch::None => {}
        }

        if let Some(mut key) = keys::parse_modified(self.caps, &self.seq) {
            key.modifiers |= extra;
            return self.emit(Event::Key(key));
        }

        if self.seq[1] == b'[' && csi_unfinished(&self.seq[2..]) {
            return None;
        }
        Some(self.discard(0))
    }

    // What to report for a collected sequence that can no longer grow.
    fn resolve_unfinished(&mut self, alt: bool) -> Decoded {
        if self.seq.len() == 2 {
            // `ESC [` or `ESC O` on their own are the Alt chords.
            let mut key = keys::decode_control(self.seq[1]);
            key.modifiers |= Modifiers::ALT;
            return Decoded::Event(Event::Key(key));
        }
        let n = self.seq.len() + alt as usize;
        Decoded::Invalid(n)
    }

    fn end_of_input(&mut self, maybe_more: bool) -> Decoded {
        match self.state {
            State::Idle => Decoded::Incomplete,
            State::Utf8Continuation { .. } if maybe_more => Decoded::Incomplete,
            State::Utf8Continuation { .. } => self.discard(0),
            State::AwaitingDisambiguation if maybe_more => Decoded::Incomplete,
            State::AwaitingDisambiguation => {
                self.reset();
                Decoded::Event(Event::Key(KeyCode::Escape.into()))
            }
            State::EscapeSequence { alt: true } if self.seq.len() == 1 => {
                self.reset();
                Decoded::Event(alt_escape())
            }
            State::EscapeSequence { alt: false } if self.seq.len() == 1 => {
                if maybe_more {
                    self.state = State::AwaitingDisambiguation;
                    Decoded::Incomplete
                } else {
                    self.reset();
                    Decoded::Event(Event::Key(KeyCode::Escape.into()))
                }
            }
            State::EscapeSequence { .. } if maybe_more => Decoded::Incomplete,
            State::EscapeSequence { alt } => {
                let res = self.resolve_unfinished(alt);
                self.reset();
                res
            }
        }
    }
}

fn alt_escape() -> Event {
    Event::Key(KeyEvent::new(KeyCode::Escape, Modifiers::ALT))
}

// Parameter and intermediate bytes only: the final byte has not arrived.
fn csi_unfinished(body: &[u8]) -> bool {
    body.iter().all(|&b| (0x20..=0x3f).contains(&b))
}
