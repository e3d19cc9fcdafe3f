use std::io::{self, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::editor::Key;

/// Raw keystroke input plus echo output.
pub trait Terminal {
    fn enable_raw_mode(&mut self) -> io::Result<()>;

    fn disable_raw_mode(&mut self) -> io::Result<()>;

    /// Blocks until the next key press.
    fn read_key(&mut self) -> io::Result<Key>;

    fn write_str(&mut self, s: &str) -> io::Result<()>;
}

/// The process terminal, driven through crossterm.
pub struct CrosstermTerminal {
    out: io::Stdout,
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        CrosstermTerminal { out: io::stdout() }
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for CrosstermTerminal {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }

    fn read_key(&mut self) -> io::Result<Key> {
        loop {
            if let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            {
                if kind != KeyEventKind::Release {
                    return Ok(translate(code, modifiers));
                }
            }
        }
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())?;
        self.out.flush()
    }
}

/// Maps a crossterm key to the editor's key set.
pub fn translate(code: KeyCode, modifiers: KeyModifiers) -> Key {
    let chorded = modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        KeyCode::Char(c) if !chorded => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        _ => Key::Other,
    }
}

/// Holds a terminal in raw mode for as long as it lives.
///
/// Raw mode is released when the session is dropped, so every exit path
/// (completion, cancellation, `?` on an I/O error, unwinding) restores the
/// terminal.
pub struct RawSession<'a, T: Terminal + ?Sized> {
    terminal: &'a mut T,
}

impl<'a, T: Terminal + ?Sized> RawSession<'a, T> {
    pub fn enter(terminal: &'a mut T) -> io::Result<Self> {
        terminal.enable_raw_mode()?;
        Ok(RawSession { terminal })
    }

    pub fn read_key(&mut self) -> io::Result<Key> {
        self.terminal.read_key()
    }

    pub fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.terminal.write_str(s)
    }
}

impl<T: Terminal + ?Sized> Drop for RawSession<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.terminal.disable_raw_mode() {
            log::warn!("failed to restore terminal mode: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::mock::ScriptedTerminal;

    #[test]
    fn test_translate() {
        assert_eq!(translate(KeyCode::Char('a'), KeyModifiers::NONE), Key::Char('a'));
        assert_eq!(translate(KeyCode::Char('A'), KeyModifiers::SHIFT), Key::Char('A'));
        assert_eq!(translate(KeyCode::Char('c'), KeyModifiers::CONTROL), Key::Interrupt);
        assert_eq!(translate(KeyCode::Char('x'), KeyModifiers::CONTROL), Key::Other);
        assert_eq!(translate(KeyCode::Esc, KeyModifiers::NONE), Key::Escape);
        assert_eq!(translate(KeyCode::Enter, KeyModifiers::NONE), Key::Enter);
        assert_eq!(translate(KeyCode::Backspace, KeyModifiers::NONE), Key::Backspace);
        assert_eq!(translate(KeyCode::Tab, KeyModifiers::NONE), Key::Other);
    }

    #[test]
    fn test_session_releases_on_drop() {
        let mut term = ScriptedTerminal::new(vec![]);
        {
            let _session = RawSession::enter(&mut term).unwrap();
        }
        assert!(!term.is_raw());
        assert_eq!(term.raw_sessions(), 1);
    }
}
