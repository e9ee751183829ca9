//! Prints every decoded event until `q` is pressed.
//!
//! Useful for checking what a terminal sends for a key or mouse action.

use anyhow::Result;

use termcell::{Attr, Color, Event, Features, KeyCode, Session, SessionConfig};

fn main() -> Result<()> {
    let config = SessionConfig::from_env().with_features(Features::all());
    let mut session = Session::init_with(config)?;

    let result = run(&mut session);
    let _ = session.shutdown();
    result
}

fn run(session: &mut Session) -> Result<()> {
    let header = Attr::new(Color::YELLOW);
    let mut lines: Vec<String> = Vec::new();

    loop {
        session.clear();
        session.put_str(0, 0, "input-test: press q to quit", header, Attr::DEFAULT);
        let rows = session.height().saturating_sub(1) as usize;
        let start = lines.len().saturating_sub(rows);
        for (i, line) in lines[start..].iter().enumerate() {
            session.put_str(0, i as u16 + 1, line, Attr::DEFAULT, Attr::DEFAULT);
        }
        session.render()?;

        let ev = session.wait()?;
        if let Event::Key(key) = ev {
            if key.code == KeyCode::Char('q') && key.modifiers.is_empty() {
                return Ok(());
            }
        }
        lines.push(format!("{ev:?}"));
        if lines.len() > 1000 {
            lines.drain(..500);
        }
    }
}
