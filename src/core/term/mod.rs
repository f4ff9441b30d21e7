//! Control-sequence interpretation.
//!
//! - **sequence**: Scanner output types (`SequenceEvent`, `Token`)
//! - **parser**: `VtParser`, the codepoint-level scanner
//! - **dispatch**: Applies events to state, collects notifications
//! - **state**: Cell grid, cursor, margins and modes
//!
//! ```text
//! codepoints ─▶ VtParser ─┬─ Token::Print ────▶ TerminalState::put_str
//!                         └─ Token::Sequence ─▶ dispatch ─▶ NotificationSet
//! ```

pub mod dispatch;
pub mod parser;
pub mod sequence;
pub mod state;

pub use dispatch::{
    dispatch, DispatchContext, Notification, NotificationSet, PrintRequest, PrintScope, Response,
};
pub use parser::{ScannerLimits, VtParser};
pub use sequence::{Param, SequenceEvent, SequenceKind, Terminator, Token};
pub use state::{Cell, CellAttrs, CellContent, Color, Modes, TerminalState};
