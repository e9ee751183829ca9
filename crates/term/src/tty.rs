//! Raw-mode terminal device.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;

use termcell_core::ByteStream;
use tracing::warn;

/// An open terminal device and the mode it had before we touched it.
///
/// Dropping a `Tty` restores the saved mode.
pub struct Tty {
    file: File,
    saved: libc::termios,
    raw: bool,
}

impl Tty {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY | libc::O_CLOEXEC)
            .open(path)?;
        Self::from_file(file)
    }

    /// Take ownership of an already open terminal.
    pub fn from_file(file: File) -> io::Result<Self> {
        let saved = get_attr(file.as_raw_fd())?;
        Ok(Self {
            file,
            saved,
            raw: false,
        })
    }

    pub fn fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn enter_raw(&mut self) -> io::Result<()> {
        let mut tios = self.saved;
        make_raw(&mut tios);
        set_attr(self.fd(), &tios)?;
        self.raw = true;
        Ok(())
    }

    /// Put back the mode saved at open. No-op unless raw mode is active.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.raw {
            return Ok(());
        }
        self.raw = false;
        set_attr(self.fd(), &self.saved)
    }

    /// Window size in cells as `(columns, rows)`, if the device reports one.
    pub fn size(&self) -> Option<(u16, u16)> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let ret = unsafe { libc::ioctl(self.fd(), libc::TIOCGWINSZ, &mut ws) };
        if ret < 0 || ws.ws_col == 0 || ws.ws_row == 0 {
            return None;
        }
        Some((ws.ws_col, ws.ws_row))
    }

    /// Append everything currently readable to `buf`.
    pub fn read_into(&mut self, buf: &mut ByteStream) -> io::Result<usize> {
        buf.read_from(&mut self.file)
    }

    /// Write all of `buf` in one call and empty it.
    pub fn write_from(&mut self, buf: &mut ByteStream) -> io::Result<()> {
        buf.flush_to(&mut self.file)
    }
}

impl Drop for Tty {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

/// Raw mode: no input translation, no echo, no signals from keys, 8-bit
/// characters, reads return immediately.
pub fn make_raw(tios: &mut libc::termios) {
    tios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON);
    tios.c_oflag &= !libc::OPOST;
    tios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    tios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    tios.c_cflag |= libc::CS8;
    tios.c_cc[libc::VMIN] = 0;
    tios.c_cc[libc::VTIME] = 0;
}

fn get_attr(fd: RawFd) -> io::Result<libc::termios> {
    let mut tios: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &mut tios) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(tios)
}

fn set_attr(fd: RawFd, tios: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, tios) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
