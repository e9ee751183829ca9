//! End-to-end session tests on a pseudo-terminal.
//!
//! The test holds the master side and plays the terminal: it sets the window
//! size, types bytes and reads back what the session rendered.

use std::ffi::CStr;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, FromRawFd, RawFd};
use std::time::{Duration, Instant};

use serial_test::serial;

use termcell::{
    Attr, Color, Event, Features, KeyCode, KeyEvent, Modifiers, MouseButton, Session,
    SessionConfig, SessionError,
};

struct Pty {
    master: File,
    slave: File,
}

fn open_pty(cols: u16, rows: u16) -> Pty {
    let fd = unsafe { libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY) };
    assert!(fd >= 0, "posix_openpt failed");
    unsafe {
        assert_eq!(libc::grantpt(fd), 0);
        assert_eq!(libc::unlockpt(fd), 0);
    }
    let name = unsafe { CStr::from_ptr(libc::ptsname(fd)) }
        .to_str()
        .unwrap()
        .to_owned();
    let master = unsafe { File::from_raw_fd(fd) };
    let slave = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(name)
        .unwrap();
    set_size(&master, cols, rows);
    Pty { master, slave }
}

fn set_size(f: &File, cols: u16, rows: u16) {
    let ws = libc::winsize {
        ws_row: rows,
        ws_col: cols,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    assert!(unsafe { libc::ioctl(f.as_raw_fd(), libc::TIOCSWINSZ, &ws) } >= 0);
}

fn lflag(fd: RawFd) -> libc::tcflag_t {
    let mut tios: libc::termios = unsafe { std::mem::zeroed() };
    assert_eq!(unsafe { libc::tcgetattr(fd, &mut tios) }, 0);
    tios.c_lflag
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Read from the master until `needle` shows up or two seconds pass.
fn read_until(master: &mut File, needle: &[u8]) -> Vec<u8> {
    let deadline = Instant::now() + Duration::from_secs(2);
    let mut out = Vec::new();
    let mut chunk = [0u8; 4096];
    while !contains(&out, needle) && Instant::now() < deadline {
        let mut pfd = libc::pollfd {
            fd: master.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        if unsafe { libc::poll(&mut pfd, 1, 100) } <= 0 {
            continue;
        }
        match master.read(&mut chunk) {
            Ok(n) => out.extend_from_slice(&chunk[..n]),
            Err(_) => break,
        }
    }
    out
}

fn config() -> SessionConfig {
    SessionConfig::default()
        .with_term("xterm")
        .with_features(Features::ALT_SCREEN | Features::HIDE_CURSOR | Features::MOUSE)
}

#[test]
#[serial]
fn session_reads_size_and_renders_diff() {
    let mut pty = open_pty(100, 30);
    let mut session = Session::from_file(pty.slave.try_clone().unwrap(), config()).unwrap();
    assert_eq!((session.width(), session.height()), (100, 30));

    let setup = read_until(&mut pty.master, b"\x1b[H\x1b[2J");
    assert!(contains(&setup, b"\x1b[?1049h"));
    assert!(contains(&setup, b"\x1b[?25l"));
    assert!(contains(&setup, b"\x1b[?1000h"));

    session.set_cell(0, 0, 'X', Attr::new(Color::RED), Attr::DEFAULT);
    session.render().unwrap();
    let frame = read_until(&mut pty.master, b"\x1b[1;1HX");
    assert!(contains(&frame, b"\x1b[31m\x1b[1;1HX"));

    session.shutdown().unwrap();
}

#[test]
#[serial]
fn keys_and_mouse_arrive_as_events() {
    let mut pty = open_pty(80, 24);
    let mut session = Session::from_file(pty.slave.try_clone().unwrap(), config()).unwrap();

    pty.master.write_all(b"q\x1b[A\x1b[1;5D\x1b[<0;3;4M").unwrap();
    assert_eq!(session.poll(1000).unwrap(), Event::Key(KeyCode::Char('q').into()));
    assert_eq!(session.poll(1000).unwrap(), Event::Key(KeyCode::Up.into()));
    assert_eq!(
        session.poll(1000).unwrap(),
        Event::Key(KeyEvent::new(KeyCode::Left, Modifiers::CONTROL))
    );
    match session.poll(1000).unwrap() {
        Event::Mouse(m) => assert_eq!((m.x, m.y, m.button), (2, 3, MouseButton::Left)),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(session.poll(0).unwrap(), Event::Timeout);
}

#[test]
#[serial]
fn lone_escape_times_out_instead_of_guessing() {
    let mut pty = open_pty(80, 24);
    let mut session = Session::from_file(pty.slave.try_clone().unwrap(), config()).unwrap();

    pty.master.write_all(b"\x1b").unwrap();
    assert_eq!(session.poll(100).unwrap(), Event::Timeout);

    // The rest of the sequence shows up late.
    pty.master.write_all(b"[B").unwrap();
    assert_eq!(session.poll(1000).unwrap(), Event::Key(KeyCode::Down.into()));
}

#[test]
#[serial]
fn escape_then_pause_then_key_is_two_presses() {
    let mut pty = open_pty(80, 24);
    let mut session = Session::from_file(pty.slave.try_clone().unwrap(), config()).unwrap();

    pty.master.write_all(b"\x1b").unwrap();
    assert_eq!(session.poll(100).unwrap(), Event::Timeout);

    pty.master.write_all(b"x").unwrap();
    assert_eq!(session.poll(1000).unwrap(), Event::Key(KeyCode::Escape.into()));
    assert_eq!(session.poll(1000).unwrap(), Event::Key(KeyCode::Char('x').into()));
    assert_eq!(session.poll(0).unwrap(), Event::Timeout);
}

#[test]
#[serial]
fn cursor_calls_keep_hide_cursor_feature_in_sync() {
    let mut pty = open_pty(80, 24);
    let mut session = Session::from_file(pty.slave.try_clone().unwrap(), config()).unwrap();
    read_until(&mut pty.master, b"\x1b[H\x1b[2J");
    assert!(session.features().contains(Features::HIDE_CURSOR));

    session.set_cursor(1, 1);
    session.flush().unwrap();
    read_until(&mut pty.master, b"\x1b[2;2H");
    assert!(!session.features().contains(Features::HIDE_CURSOR));

    session.configure(Features::all()).unwrap();
    let out = read_until(&mut pty.master, b"\x1b[?25l");
    assert!(contains(&out, b"\x1b[?25l"));
    assert!(session.features().contains(Features::HIDE_CURSOR));
    assert_eq!(session.cursor(), None);

    session.set_cursor(0, 0);
    session.hide_cursor();
    assert!(session.features().contains(Features::HIDE_CURSOR));
    assert_eq!(session.cursor(), None);
}

#[test]
#[serial]
fn non_terminal_file_is_a_tty_open_error() {
    let file = File::open("/dev/null").unwrap();
    let res = Session::from_file(file, config());
    assert!(matches!(res, Err(SessionError::TtyOpen { .. })));
}

#[test]
#[serial]
fn hangup_settles_pending_escape() {
    let pty = open_pty(80, 24);
    let Pty { mut master, slave } = pty;
    let mut session = Session::from_file(slave.try_clone().unwrap(), config()).unwrap();

    master.write_all(b"\x1b").unwrap();
    assert_eq!(session.poll(100).unwrap(), Event::Timeout);

    drop(master);
    assert_eq!(session.poll(1000).unwrap(), Event::Key(KeyCode::Escape.into()));
    assert!(matches!(session.poll(1000), Err(SessionError::Io(_))));
}

#[test]
#[serial]
fn sigwinch_reports_new_size() {
    let pty = open_pty(80, 24);
    let mut session = Session::from_file(pty.slave.try_clone().unwrap(), config()).unwrap();
    session.put_str(0, 0, "keep", Attr::DEFAULT, Attr::DEFAULT);

    set_size(&pty.master, 120, 40);
    assert_eq!(unsafe { libc::raise(libc::SIGWINCH) }, 0);

    assert_eq!(
        session.poll(1000).unwrap(),
        Event::Resize {
            width: 120,
            height: 40
        }
    );
    assert_eq!((session.width(), session.height()), (120, 40));
    assert_eq!(session.cell(3, 0).map(|c| c.ch), Some('p'));
}

#[test]
#[serial]
fn shutdown_restores_mode_and_is_idempotent() {
    let pty = open_pty(80, 24);
    let probe = pty.slave.as_raw_fd();
    assert_ne!(lflag(probe) & libc::ICANON, 0);

    let mut session = Session::from_file(pty.slave.try_clone().unwrap(), config()).unwrap();
    assert_eq!(lflag(probe) & (libc::ICANON | libc::ECHO), 0);

    session.shutdown().unwrap();
    assert!(session.is_closed());
    assert_ne!(lflag(probe) & libc::ICANON, 0);
    session.shutdown().unwrap();
}

#[test]
#[serial]
fn only_one_session_at_a_time() {
    let pty = open_pty(80, 24);
    let first = Session::from_file(pty.slave.try_clone().unwrap(), config()).unwrap();
    assert!(matches!(
        Session::from_file(pty.slave.try_clone().unwrap(), config()),
        Err(SessionError::AlreadyActive)
    ));

    drop(first);
    let second = Session::from_file(pty.slave.try_clone().unwrap(), config());
    assert!(second.is_ok());
}

#[test]
#[serial]
fn unknown_terminal_fails_before_touching_the_tty() {
    let pty = open_pty(80, 24);
    let probe = pty.slave.as_raw_fd();
    let res = Session::from_file(
        pty.slave.try_clone().unwrap(),
        SessionConfig::default().with_term("vt52"),
    );
    assert!(matches!(res, Err(SessionError::UnsupportedTerminal(Some(_)))));
    assert_ne!(lflag(probe) & libc::ICANON, 0);
}
