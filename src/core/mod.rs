//! Core terminal emulation components.
//!
//! This module contains the protocol-interpretation logic:
//!
//! - **term**: Sequence scanner, dispatch engine and terminal state
//! - **session**: One emulated terminal: state + scanner + capabilities
//!
//! # Architecture
//!
//! ```text
//! Session
//! ├── VtParser (partial sequences between reads)
//! ├── TerminalState
//! │   ├── Screen (cell grid + attributes)
//! │   ├── Cursor (position + saved copy)
//! │   └── Modes
//! └── ResolvedEntry (capabilities of the emulated type)
//! ```

pub mod session;
pub mod term;
