//! Waiting for input and resize notifications.

use std::io;
use std::time::{Duration, Instant};

use termcell_input::Decoded;
use termcell_types::Event;

use crate::error::Result;
use crate::session::Session;

impl Session {
    /// Wait for the next event.
    ///
    /// `timeout_ms < 0` blocks until something happens, `0` only looks at
    /// what is already available, and a positive value waits at most that
    /// long before returning [`Event::Timeout`].
    ///
    /// A lone ESC is not reported until the byte after it arrives or the
    /// terminal hangs up; until then the call keeps waiting within its
    /// timeout.
    pub fn poll(&mut self, timeout_ms: i32) -> Result<Event> {
        let deadline = (timeout_ms > 0)
            .then(|| Instant::now() + Duration::from_millis(timeout_ms as u64));

        loop {
            if let Some(ev) = self.decode_pending(true) {
                return Ok(ev);
            }

            let wait = match deadline {
                Some(at) => remaining_ms(at),
                None if timeout_ms < 0 => -1,
                None => 0,
            };

            let mut fds = [
                libc::pollfd {
                    fd: self.tty.fd(),
                    events: libc::POLLIN,
                    revents: 0,
                },
                libc::pollfd {
                    fd: self.winch.as_ref().map_or(-1, |w| w.fd()),
                    events: libc::POLLIN,
                    revents: 0,
                },
            ];
            let n = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, wait) };
            if n < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err.into());
            }
            if n == 0 {
                return Ok(Event::Timeout);
            }

            if fds[1].revents & libc::POLLIN != 0 {
                if let Some(winch) = self.winch.as_mut() {
                    winch.drain()?;
                }
                let (width, height) = self.refresh_size()?;
                return Ok(Event::Resize { width, height });
            }

            let revents = fds[0].revents;
            let mut hangup = revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0;
            if revents & libc::POLLIN != 0 {
                match self.tty.read_into(self.decoder.buffer_mut()) {
                    Ok(_) => {}
                    // A pseudo-terminal whose other side is gone.
                    Err(e) if e.raw_os_error() == Some(libc::EIO) => hangup = true,
                    Err(e) => return Err(e.into()),
                }
            }

            if hangup {
                if let Some(ev) = self.decode_pending(false) {
                    return Ok(ev);
                }
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
            }
        }
    }

    /// Wait at most `timeout_ms` for the next event.
    pub fn peek(&mut self, timeout_ms: u32) -> Result<Event> {
        self.poll(timeout_ms.min(i32::MAX as u32) as i32)
    }

    /// Block until the next event.
    pub fn wait(&mut self) -> Result<Event> {
        self.poll(-1)
    }

    fn decode_pending(&mut self, maybe_more: bool) -> Option<Event> {
        loop {
            match self.decoder.next_event(maybe_more) {
                Decoded::Event(ev) => return Some(ev),
                Decoded::Incomplete => return None,
                Decoded::Invalid(_) => continue,
            }
        }
    }
}

fn remaining_ms(deadline: Instant) -> i32 {
    let left = deadline.saturating_duration_since(Instant::now());
    // Round up so a sub-millisecond remainder still waits.
    let ms = left.as_micros().div_ceil(1000);
    ms.min(i32::MAX as u128) as i32
}
