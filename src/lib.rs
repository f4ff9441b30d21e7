//! termcore - protocol core of a terminal emulator
//!
//! Turns the byte stream a hosted program writes into terminal-state changes
//! and answers questions about what a terminal type can do.
//!
//! - **core**: Control-sequence scanner, dispatch engine, terminal state and
//!   the `Session` tying them together
//! - **termcap**: Termcap-style capability database with inheritance
//! - **grapheme**: Emoji sequence classifier deciding cell grouping
//! - **config**: TOML configuration
//!
//! ```no_run
//! use std::sync::Arc;
//! use termcore::{Session, TermcapDb};
//!
//! let db = Arc::new(TermcapDb::load("/etc/termcap")?);
//! let mut session = Session::new(80, 24, "vt100", Some(db));
//! for notification in session.feed_bytes(b"\x1b[1;2Hhello\x1b[6n") {
//!     println!("{:?}", notification);
//! }
//! # Ok::<(), termcore::TermcapError>(())
//! ```

pub mod config;
pub mod core;
pub mod grapheme;
pub mod termcap;

pub use crate::config::{Config, ConfigError};
pub use crate::core::session::{ResetLevel, Session};
pub use crate::core::term::{
    dispatch, DispatchContext, Notification, NotificationSet, SequenceEvent, TerminalState,
    VtParser,
};
pub use crate::termcap::{CapValue, Capability, ResolvedEntry, TermcapDb, TermcapError};
