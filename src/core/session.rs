//! Session management
//!
//! A session is one emulated terminal: its state, the scanner holding any
//! partial sequence between reads, and the capability entry of the terminal
//! type it emulates.

use std::sync::Arc;

use tracing::{debug, warn};

use super::term::{
    dispatch, DispatchContext, Modes, Notification, ScannerLimits, TerminalState, Token, VtParser,
};
use crate::termcap::{Capability, ResolvedEntry, TermcapDb, TermcapError};

/// How much [`Session::reset`] restores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetLevel {
    /// Modes, margins, attributes and cursor; the screen is kept
    Soft,
    /// Everything, including screen, title and partial input
    Full,
}

/// A terminal session
pub struct Session {
    /// Terminal state
    pub state: TerminalState,
    /// VT parser
    parser: VtParser,
    /// Emulated terminal type name
    term: String,
    db: Option<Arc<TermcapDb>>,
    capabilities: Option<Arc<ResolvedEntry>>,
    /// Tail of a multi-byte UTF-8 character split across reads
    utf8_pending: Vec<u8>,
}

impl Session {
    /// Create a new session emulating `term`
    pub fn new(cols: u16, rows: u16, term: &str, db: Option<Arc<TermcapDb>>) -> Self {
        Self::with_limits(cols, rows, term, db, ScannerLimits::default())
    }

    pub fn with_limits(
        cols: u16,
        rows: u16,
        term: &str,
        db: Option<Arc<TermcapDb>>,
        limits: ScannerLimits,
    ) -> Self {
        let mut session = Self {
            state: TerminalState::new(cols, rows),
            parser: VtParser::with_limits(limits),
            term: term.to_string(),
            db,
            capabilities: None,
            utf8_pending: Vec::new(),
        };
        session.resolve_capabilities();
        session
    }

    /// Look up the terminal type and derive the baseline modes from it.
    /// An unknown type falls back to built-in defaults.
    fn resolve_capabilities(&mut self) {
        self.capabilities = match &self.db {
            Some(db) => match db.resolve(&self.term) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("{}; using built-in defaults", e);
                    None
                }
            },
            None => {
                debug!("No capability database, using built-in defaults for {}", self.term);
                None
            }
        };

        let auto_wrap = self.capabilities.as_ref().map_or(true, |caps| caps.flag("am"));
        self.state.set_baseline_modes(Modes::baseline(auto_wrap));
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Resolved capabilities of the emulated type, if it was found
    pub fn capabilities(&self) -> Option<&ResolvedEntry> {
        self.capabilities.as_deref()
    }

    /// Feed codepoints into the terminal
    pub fn feed(&mut self, input: &[char]) -> Vec<Notification> {
        let tokens = self.parser.feed(input);
        self.apply(tokens)
    }

    pub fn feed_str(&mut self, input: &str) -> Vec<Notification> {
        let tokens = self.parser.feed_str(input);
        self.apply(tokens)
    }

    /// Feed raw UTF-8 bytes into the terminal. A character split across
    /// calls is held back until its remaining bytes arrive; invalid bytes
    /// become U+FFFD.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Vec<Notification> {
        self.utf8_pending.extend_from_slice(bytes);

        let mut chars = Vec::with_capacity(self.utf8_pending.len());
        let mut rest = &self.utf8_pending[..];
        loop {
            match std::str::from_utf8(rest) {
                Ok(s) => {
                    chars.extend(s.chars());
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, tail) = rest.split_at(e.valid_up_to());
                    if let Ok(s) = std::str::from_utf8(valid) {
                        chars.extend(s.chars());
                    }
                    match e.error_len() {
                        Some(len) => {
                            chars.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[len..];
                        }
                        // Incomplete sequence at the end: wait for more
                        None => {
                            rest = tail;
                            break;
                        }
                    }
                }
            }
        }
        let consumed = self.utf8_pending.len() - rest.len();
        self.utf8_pending.drain(..consumed);

        self.feed(&chars)
    }

    fn apply(&mut self, tokens: Vec<Token>) -> Vec<Notification> {
        let ctx = DispatchContext {
            capabilities: self.capabilities.as_deref(),
            term_name: &self.term,
        };
        let mut notifications = Vec::new();
        for token in tokens {
            match token {
                Token::Print(text) => self.state.put_str(&text),
                Token::Sequence(event) => {
                    notifications.extend(dispatch(&mut self.state, &event, &ctx))
                }
            }
        }
        notifications
    }

    /// Reset the terminal to its baseline
    pub fn reset(&mut self, level: ResetLevel) {
        match level {
            ResetLevel::Soft => self.state.soft_reset(),
            ResetLevel::Full => {
                self.state.full_reset();
                self.parser.reset();
                self.utf8_pending.clear();
            }
        }
    }

    /// Resize the terminal
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.state.resize(cols, rows);
    }

    /// Look up a capability of the emulated terminal type
    pub fn query_capability(&self, cap: &str) -> Result<Capability, TermcapError> {
        match &self.capabilities {
            Some(entry) => Ok(entry.get(cap)),
            None => Err(TermcapError::NotFound(self.term.clone())),
        }
    }

    /// Re-read the capability file and re-resolve this session's type
    pub fn reload_capabilities(&mut self) -> Result<(), TermcapError> {
        if let Some(db) = &self.db {
            db.reload()?;
        }
        self.resolve_capabilities();
        Ok(())
    }

    /// Get the terminal title
    pub fn title(&self) -> &str {
        &self.state.title
    }
}
