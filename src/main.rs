//! termcell demo (default binary).
//!
//! Paints a hue gradient over the whole screen and reports the last event on
//! a status line. `m` cycles the color mode; `q`, Esc or Ctrl+C quits.
//!
//! Set `TERMCELL_LOG=/path/to/file` to write a trace log (the terminal itself
//! is busy showing the UI).

use std::env;
use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use termcell::{Attr, Color, Event, KeyCode, Modifiers, OutputMode, Session, SessionConfig, Style};

fn main() -> Result<()> {
    init_logging();

    let mut session =
        Session::init_with(SessionConfig::from_env()).context("failed to start terminal session")?;
    info!(
        width = session.width(),
        height = session.height(),
        "demo started"
    );

    let result = run(&mut session);

    // Always try to restore terminal state.
    let _ = session.shutdown();
    result
}

fn init_logging() {
    let Some(path) = env::var_os("TERMCELL_LOG").filter(|p| !p.is_empty()) else {
        return;
    };
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_env("TERMCELL_LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(session: &mut Session) -> Result<()> {
    session.set_title("termcell")?;
    let mut status = String::from("press m to cycle color modes, q to quit");

    loop {
        draw(session, &status);
        session.render()?;

        match session.wait()? {
            Event::Key(key) => {
                let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Escape)
                    || (key.code == KeyCode::Char('c') && key.modifiers.contains(Modifiers::CONTROL));
                if quit {
                    return Ok(());
                }
                if key.code == KeyCode::Char('m') {
                    let next = match session.color_mode() {
                        OutputMode::Normal => OutputMode::Palette256,
                        OutputMode::Palette256 => OutputMode::Truecolor,
                        OutputMode::Truecolor => OutputMode::Normal,
                    };
                    session.set_color_mode(next);
                }
                status = format!("{key:?}");
            }
            Event::Mouse(mouse) => status = format!("{mouse:?}"),
            Event::Resize { width, height } => status = format!("resized to {width}x{height}"),
            Event::Timeout => {}
        }
    }
}

fn draw(session: &mut Session, status: &str) {
    let (w, h) = (session.width(), session.height());
    let mode = session.color_mode();
    let range = (w as f64 * h as f64).max(1.0);

    session.clear();
    let mut pos = 0.0;
    for y in 0..h.saturating_sub(1) {
        let rgb = hue(pos / range);
        let bg = match mode {
            OutputMode::Truecolor => rgb,
            OutputMode::Palette256 => rgb.to_palette(),
            OutputMode::Normal => Color((y as u32 % 8) + 1),
        };
        for x in 0..w {
            session.set_cell(x, y, ' ', Attr::DEFAULT, Attr::new(bg));
        }
        pos += w as f64;
    }

    let bar = Attr::new(Color::BLACK);
    let bar_bg = Attr::new(Color::WHITE);
    let bottom = h.saturating_sub(1);
    for x in 0..w {
        session.set_cell(x, bottom, ' ', bar, bar_bg);
    }
    let label = format!("[{}] ", mode.as_str());
    let n = session.put_str(0, bottom, &label, bar.with(Style::BOLD), bar_bg) as u16;
    session.put_str(n, bottom, status, bar, bar_bg);
}

/// Walk the color wheel: red, yellow, green, cyan, blue, magenta.
fn hue(ratio: f64) -> Color {
    let normalized = (ratio.clamp(0.0, 1.0) * 256.0 * 6.0) as u32;
    let x = (normalized % 256) as u8;
    let (r, g, b) = match normalized / 256 {
        0 => (255, x, 0),
        1 => (255 - x, 255, 0),
        2 => (0, 255, x),
        3 => (0, 255 - x, 255),
        4 => (x, 0, 255),
        _ => (255, 0, 255 - x),
    };
    Color::rgb(r, g, b)
}
