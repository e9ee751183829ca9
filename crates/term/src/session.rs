//! Terminal session: raw mode, screen state and output.

use std::fs::File;
use std::marker::PhantomData;
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use arrayvec::ArrayVec;
use termcell_core::caps::{Caps, Func};
use termcell_core::encode::{write_cursor, write_title};
use termcell_core::{ByteStream, CellGrid, Renderer};
use termcell_input::InputDecoder;
use termcell_types::{Attr, Cell, Features, OutputMode, FALLBACK_HEIGHT, FALLBACK_WIDTH};
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::tty::Tty;
use crate::winch::WinchPipe;

static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Marks the process-wide session slot as taken until dropped.
struct ActiveGuard;

impl ActiveGuard {
    fn acquire() -> Result<Self> {
        ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ActiveGuard)
            .map_err(|_| SessionError::AlreadyActive)
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE.store(false, Ordering::Release);
    }
}

/// Owner of the terminal for the lifetime of the program's UI.
///
/// All output is staged and only reaches the device on [`render`](Self::render),
/// [`flush`](Self::flush) or the operations documented as flushing. Only one
/// session can be active per process.
pub struct Session {
    pub(crate) tty: Tty,
    pub(crate) winch: Option<WinchPipe>,
    pub(crate) caps: &'static Caps,
    pub(crate) grid: CellGrid,
    pub(crate) renderer: Renderer,
    pub(crate) decoder: InputDecoder,
    pub(crate) out: ByteStream,
    mode: OutputMode,
    // Enabled features in the order they were switched on.
    enabled: ArrayVec<Features, 4>,
    cursor: Option<(u16, u16)>,
    title_set: bool,
    closed: bool,
    _active: ActiveGuard,
    // Single-threaded by contract.
    _not_sync: PhantomData<std::cell::Cell<()>>,
}

impl Session {
    /// Open the session described by the environment.
    pub fn init() -> Result<Self> {
        Self::init_with(SessionConfig::from_env())
    }

    pub fn init_with(config: SessionConfig) -> Result<Self> {
        let active = ActiveGuard::acquire()?;
        let caps = resolve_caps(config.term.as_deref())?;
        let tty = Tty::open(&config.tty_path).map_err(|source| SessionError::TtyOpen {
            path: config.tty_path.clone(),
            source,
        })?;
        Self::start(tty, caps, &config, active)
    }

    /// Run a session on an already open terminal, such as a pseudo-terminal.
    /// `config.tty_path` is ignored; a file that is not a terminal is reported
    /// as [`SessionError::TtyOpen`] under its `/proc/self/fd` path.
    pub fn from_file(file: File, config: SessionConfig) -> Result<Self> {
        let active = ActiveGuard::acquire()?;
        let caps = resolve_caps(config.term.as_deref())?;
        let fd = file.as_raw_fd();
        let tty = Tty::from_file(file).map_err(|source| SessionError::TtyOpen {
            path: PathBuf::from(format!("/proc/self/fd/{fd}")),
            source,
        })?;
        Self::start(tty, caps, &config, active)
    }

    fn start(
        mut tty: Tty,
        caps: &'static Caps,
        config: &SessionConfig,
        active: ActiveGuard,
    ) -> Result<Self> {
        let winch = WinchPipe::register().map_err(SessionError::SignalSetup)?;
        tty.enter_raw()?;

        let (width, height) = tty.size().unwrap_or((FALLBACK_WIDTH, FALLBACK_HEIGHT));
        debug!(
            term = caps.name,
            width,
            height,
            mode = config.color_mode.as_str(),
            "terminal session opened"
        );

        let mut session = Self {
            tty,
            winch: Some(winch),
            caps,
            grid: CellGrid::new(width, height),
            renderer: Renderer::new(),
            decoder: InputDecoder::new(caps),
            out: ByteStream::with_capacity(32 * 1024),
            mode: config.color_mode,
            enabled: ArrayVec::new(),
            cursor: None,
            title_set: false,
            closed: false,
            _active: active,
            _not_sync: PhantomData,
        };
        session.configure(config.features)?;
        session.clear_screen()?;
        Ok(session)
    }

    pub fn caps(&self) -> &'static Caps {
        self.caps
    }

    /// Features currently switched on.
    pub fn features(&self) -> Features {
        self.enabled.iter().fold(Features::empty(), |acc, f| acc | *f)
    }

    /// Switch optional features on or off. Only features whose state changes
    /// emit anything; the staged output is flushed.
    pub fn configure(&mut self, features: Features) -> Result<()> {
        for feature in self.enabled.clone().into_iter().rev() {
            if !features.contains(feature) {
                self.exit_feature(feature);
                self.enabled.retain(|f| *f != feature);
            }
        }
        for feature in [
            Features::ALT_SCREEN,
            Features::KEYPAD,
            Features::HIDE_CURSOR,
            Features::MOUSE,
        ] {
            if features.contains(feature) && !self.features().contains(feature) {
                self.enter_feature(feature);
                self.enabled.push(feature);
            }
        }
        debug!(?features, "terminal features configured");
        self.flush()
    }

    fn enter_feature(&mut self, feature: Features) {
        if feature == Features::ALT_SCREEN {
            self.out.append(self.caps.func(Func::EnterCa));
        } else if feature == Features::KEYPAD {
            self.out.append(self.caps.func(Func::EnterKeypad));
        } else if feature == Features::HIDE_CURSOR {
            self.out.append(self.caps.func(Func::HideCursor));
            self.cursor = None;
        } else if feature == Features::MOUSE {
            self.out.append(self.caps.func(Func::EnterMouse));
        }
    }

    fn exit_feature(&mut self, feature: Features) {
        if feature == Features::ALT_SCREEN {
            self.out.append(self.caps.func(Func::ExitCa));
            self.out.append(self.caps.func(Func::ClearScreen));
        } else if feature == Features::KEYPAD {
            self.out.append(self.caps.func(Func::ExitKeypad));
        } else if feature == Features::HIDE_CURSOR {
            self.out.append(self.caps.func(Func::ShowCursor));
        } else if feature == Features::MOUSE {
            self.out.append(self.caps.func(Func::ExitMouse));
        }
    }

    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    pub fn color_mode(&self) -> OutputMode {
        self.mode
    }

    /// Change how colors are encoded from the next render on.
    pub fn set_color_mode(&mut self, mode: OutputMode) {
        if mode != self.mode {
            self.mode = mode;
            self.renderer.invalidate_attr();
        }
    }

    /// Write one cell of the back buffer. Out-of-range coordinates are ignored.
    pub fn set_cell(&mut self, x: u16, y: u16, ch: char, fg: Attr, bg: Attr) {
        self.grid.set(x, y, Cell::new(ch, fg, bg));
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.grid.get(x, y)
    }

    /// Write `s` starting at `(x, y)`; returns the number of codepoints written.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, fg: Attr, bg: Attr) -> usize {
        self.grid.put_str(x, y, s, fg, bg)
    }

    /// Fill the back buffer with blank cells.
    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Attributes used for blank cells by `clear`, resize and screen clears.
    pub fn set_clear_attributes(&mut self, fg: Attr, bg: Attr) {
        self.grid.set_clear_attributes(fg, bg);
    }

    /// Clear the physical screen now and flush.
    pub fn clear_screen(&mut self) -> Result<()> {
        self.renderer
            .encode_clear_into(&self.grid, self.caps, self.mode, self.cursor, &mut self.out);
        self.flush()
    }

    /// Send the difference between the back buffer and the screen.
    pub fn render(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.renderer
            .encode_diff_into(&mut self.grid, self.caps, self.mode, self.cursor, &mut self.out);
        self.flush()
    }

    /// Show the cursor at `(x, y)`. A visible cursor switches
    /// [`Features::HIDE_CURSOR`] off.
    pub fn set_cursor(&mut self, x: u16, y: u16) {
        if self.cursor.is_none() {
            self.out.append(self.caps.func(Func::ShowCursor));
        }
        self.enabled.retain(|f| *f != Features::HIDE_CURSOR);
        self.cursor = Some((x, y));
        write_cursor(&mut self.out, x, y);
    }

    /// Hide the cursor; [`Features::HIDE_CURSOR`] is on afterwards.
    pub fn hide_cursor(&mut self) {
        self.out.append(self.caps.func(Func::HideCursor));
        self.cursor = None;
        if !self.features().contains(Features::HIDE_CURSOR) {
            self.enabled.push(Features::HIDE_CURSOR);
        }
    }

    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        write_title(&mut self.out, title);
        self.title_set = true;
        self.flush()
    }

    pub fn clear_title(&mut self) -> Result<()> {
        write_title(&mut self.out, "");
        self.title_set = false;
        self.flush()
    }

    /// Stage raw bytes for output as they are.
    pub fn send(&mut self, bytes: &[u8]) {
        self.out.append(bytes);
    }

    pub fn flush(&mut self) -> Result<()> {
        self.tty.write_from(&mut self.out)?;
        Ok(())
    }

    /// Resize both buffers, keeping the overlapping content, and redraw from
    /// a cleared screen.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.grid.resize(width, height);
        self.grid.invalidate_front();
        self.renderer.invalidate_position();
        debug!(width, height, "terminal resized");
        self.clear_screen()
    }

    /// Re-read the device size and apply it.
    pub(crate) fn refresh_size(&mut self) -> Result<(u16, u16)> {
        let (w, h) = self
            .tty
            .size()
            .unwrap_or((FALLBACK_WIDTH, FALLBACK_HEIGHT));
        self.resize(w, h)?;
        Ok((w, h))
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Undo everything `init` did and give the terminal back.
    ///
    /// Every step runs even if an earlier one fails; the first failure is
    /// returned. Calling it again does nothing.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if self.title_set {
            write_title(&mut self.out, "");
            self.title_set = false;
        }
        self.out.append(self.caps.func(Func::Sgr0));
        let mut cursor_shown = false;
        while let Some(feature) = self.enabled.pop() {
            cursor_shown |= feature == Features::HIDE_CURSOR;
            self.exit_feature(feature);
        }
        if !cursor_shown && self.cursor.is_none() {
            self.out.append(self.caps.func(Func::ShowCursor));
        }

        let mut first_err = None;
        if let Err(e) = self.tty.write_from(&mut self.out) {
            warn!(error = %e, "failed to flush terminal on shutdown");
            first_err.get_or_insert(e);
        }
        if let Err(e) = self.tty.restore() {
            warn!(error = %e, "failed to restore terminal mode");
            first_err.get_or_insert(e);
        }
        self.winch = None;
        debug!("terminal session closed");

        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

fn resolve_caps(term: Option<&str>) -> Result<&'static Caps> {
    let name = term.ok_or(SessionError::UnsupportedTerminal(None))?;
    Caps::lookup(name).ok_or_else(|| SessionError::UnsupportedTerminal(Some(name.to_string())))
}
