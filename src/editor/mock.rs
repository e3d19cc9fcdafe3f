use std::collections::VecDeque;
use std::io;

use crate::editor::terminal::Terminal;
use crate::editor::Key;

/// Terminal double that replays a fixed key sequence.
///
/// Tracks raw-mode state so tests can assert it was released. Reading past
/// the end of the script fails with `UnexpectedEof`.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    keys: VecDeque<Key>,
    raw: bool,
    raw_sessions: usize,
    output: String,
}

impl ScriptedTerminal {
    pub fn new(keys: Vec<Key>) -> Self {
        ScriptedTerminal {
            keys: keys.into(),
            ..Default::default()
        }
    }

    /// Types `text` one character at a time, then presses Enter.
    pub fn typing(text: &str) -> Self {
        let mut keys: Vec<Key> = text.chars().map(Key::Char).collect();
        keys.push(Key::Enter);
        Self::new(keys)
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// How many times raw mode was entered.
    pub fn raw_sessions(&self) -> usize {
        self.raw_sessions
    }

    /// Everything echoed so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn remaining_keys(&self) -> usize {
        self.keys.len()
    }
}

impl Terminal for ScriptedTerminal {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        self.raw = true;
        self.raw_sessions += 1;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        self.raw = false;
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted"))
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.output.push_str(s);
        Ok(())
    }
}
