//! SIGWINCH delivered through a socket pair.
//!
//! The signal handler installed by `signal-hook` only writes one byte to the
//! write end; the event loop polls the read end next to the TTY.

use std::io::{self, Read};
use std::os::unix::io::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;

use signal_hook::consts::SIGWINCH;
use signal_hook::low_level::{self, pipe};
use signal_hook::SigId;

pub struct WinchPipe {
    read: UnixStream,
    id: SigId,
}

impl WinchPipe {
    pub fn register() -> io::Result<Self> {
        let (read, write) = UnixStream::pair()?;
        read.set_nonblocking(true)?;
        write.set_nonblocking(true)?;
        let id = pipe::register(SIGWINCH, write)?;
        Ok(Self { read, id })
    }

    pub fn fd(&self) -> RawFd {
        self.read.as_raw_fd()
    }

    /// Empty the pipe. Returns whether any notification was pending.
    pub fn drain(&mut self) -> io::Result<bool> {
        let mut buf = [0u8; 32];
        let mut seen = false;
        loop {
            match self.read.read(&mut buf) {
                Ok(0) => return Ok(seen),
                Ok(_) => seen = true,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(seen),
                Err(e) => return Err(e),
            }
        }
    }
}

impl Drop for WinchPipe {
    fn drop(&mut self) {
        low_level::unregister(self.id);
    }
}
