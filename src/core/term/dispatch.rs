//! Sequence dispatch
//!
//! Applies scanned [`SequenceEvent`]s to [`TerminalState`]. Each event is
//! looked up by kind, private marker, intermediates and final byte; events
//! with no handler are logged and dropped without touching state.
//!
//! Handlers never write to the host. Everything the outside world has to act
//! on (bells, titles, replies for the program, printer requests) is returned
//! as a [`NotificationSet`].

use std::fmt::Write as _;

use tracing::debug;

use super::sequence::{Param, SequenceEvent, SequenceKind};
use super::state::{AttrFlags, Color, Modes, TerminalState};
use crate::termcap::{CapValue, Capability, ResolvedEntry};

/// Bytes to be written back to the hosted program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Cursor position report: ESC [ row ; col R
    CursorPosition(u16, u16),
    /// Device attributes response
    DeviceAttributes,
    /// Secondary device attributes response
    SecondaryDeviceAttributes,
    /// Operating status: ESC [ 0 n
    StatusOk,
    /// Printer status: ESC [ ? 13 n
    NoPrinter,
    /// Answer taken verbatim from a capability string
    Raw(Vec<u8>),
    /// XTGETTCAP answer: DCS valid + r payload ST
    TermcapReply { valid: bool, payload: String },
}

impl Response {
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Response::CursorPosition(row, col) => format!("\x1b[{};{}R", row, col).into_bytes(),
            Response::DeviceAttributes => {
                // VT220 response
                b"\x1b[?62;c".to_vec()
            }
            Response::SecondaryDeviceAttributes => b"\x1b[>1;10;0c".to_vec(),
            Response::StatusOk => b"\x1b[0n".to_vec(),
            Response::NoPrinter => b"\x1b[?13n".to_vec(),
            Response::Raw(bytes) => bytes.clone(),
            Response::TermcapReply { valid, payload } => {
                format!("\x1bP{}+r{}\x1b\\", u8::from(*valid), payload).into_bytes()
            }
        }
    }
}

/// What a print request covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintScope {
    /// The page, or only the scroll region unless print extent is set
    Page,
    CursorLine,
    /// The composed display including status lines
    Composed,
    AllPages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintRequest {
    pub scope: PrintScope,
    /// DECPEX was set when the request was made
    pub full_page: bool,
    /// DECPFF was set when the request was made
    pub form_feed: bool,
}

/// Externally observable effect of a dispatched sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Bell,
    TitleChanged(String),
    IconNameChanged(String),
    /// XTWINOPS resize; dimensions already default to the current size
    ResizeRequested { cols: u16, rows: u16 },
    PrinterSession(bool),
    Print(PrintRequest),
    Reply(Response),
}

/// Notifications raised by one or more dispatches, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationSet(Vec<Notification>);

impl NotificationSet {
    pub fn push(&mut self, notification: Notification) {
        self.0.push(notification);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.0.iter()
    }

    /// All reply bytes concatenated in order
    pub fn reply_bytes(&self) -> Vec<u8> {
        self.0
            .iter()
            .filter_map(|n| match n {
                Notification::Reply(r) => Some(r.to_bytes()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn into_vec(self) -> Vec<Notification> {
        self.0
    }
}

impl IntoIterator for NotificationSet {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Extend<Notification> for NotificationSet {
    fn extend<I: IntoIterator<Item = Notification>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

/// Read-only session facts handlers may consult
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchContext<'a> {
    /// Resolved entry of the emulated terminal type, if any
    pub capabilities: Option<&'a ResolvedEntry>,
    pub term_name: &'a str,
}

/// Apply one event to the terminal state.
pub fn dispatch(
    state: &mut TerminalState,
    event: &SequenceEvent,
    ctx: &DispatchContext<'_>,
) -> NotificationSet {
    let mut out = NotificationSet::default();
    let handled = match event.kind {
        SequenceKind::Control => execute_control(state, event.final_byte, &mut out),
        SequenceKind::Escape => execute_escape(state, event),
        SequenceKind::Csi => execute_csi(state, event, ctx, &mut out),
        SequenceKind::Osc => execute_osc(state, event, &mut out),
        SequenceKind::Dcs => execute_dcs(event, ctx, &mut out),
    };
    // A recognized sequence ends the grapheme cluster being built; ignored
    // ones leave the state untouched
    if handled {
        state.break_cluster();
    }
    out
}

// The execute_* handlers return false when the event was not recognized or
// was ignored.

fn execute_control(state: &mut TerminalState, byte: u8, out: &mut NotificationSet) -> bool {
    match byte {
        0x07 => out.push(Notification::Bell),
        0x08 => state.backspace(),
        0x09 => state.horizontal_tab(),
        0x0A..=0x0C => {
            if state.modes.contains(Modes::LINEFEED_NEWLINE) {
                state.carriage_return();
            }
            state.linefeed();
        }
        0x0D => state.carriage_return(),
        _ => {
            debug!("Unhandled control: {:#04x}", byte);
            return false;
        }
    }
    true
}

fn execute_escape(state: &mut TerminalState, event: &SequenceEvent) -> bool {
    match (event.intermediates.as_slice(), event.final_byte) {
        ([], b'7') => state.save_cursor(),
        ([], b'8') => state.restore_cursor(),
        ([], b'D') => state.index(),
        ([], b'E') => state.next_line(),
        ([], b'M') => state.reverse_index(),
        ([], b'c') => state.full_reset(),
        ([b'#'], b'8') => state.screen_alignment(),
        // ST closing an ignored string
        ([], b'\\') => return false,
        (intermediates, final_byte) => {
            debug!(
                "Unknown ESC: intermediates={:?}, final={:?}",
                intermediates, final_byte as char
            );
            return false;
        }
    }
    true
}

fn execute_csi(
    state: &mut TerminalState,
    ev: &SequenceEvent,
    ctx: &DispatchContext<'_>,
    out: &mut NotificationSet,
) -> bool {
    match (ev.private, ev.intermediates.as_slice(), ev.final_byte) {
        // Cursor movement
        (None, [], b'A') => state.cursor_up(ev.count(0, 1)),
        (None, [], b'B') => state.cursor_down(ev.count(0, 1)),
        (None, [], b'C') => state.cursor_forward(ev.count(0, 1)),
        (None, [], b'D') => state.cursor_backward(ev.count(0, 1)),
        (None, [], b'E') => {
            // CNL - Cursor Next Line
            state.cursor_down(ev.count(0, 1));
            state.carriage_return();
        }
        (None, [], b'F') => {
            // CPL - Cursor Previous Line
            state.cursor_up(ev.count(0, 1));
            state.carriage_return();
        }
        (None, [], b'G') => state.set_column(ev.count(0, 1)),
        (None, [], b'H' | b'f') => state.cursor_position(ev.count(0, 1), ev.count(1, 1)),
        (None, [], b'd') => state.set_row(ev.count(0, 1)),

        // Erase
        (None, [], b'J') => state.erase_in_display(ev.param(0, 0)),
        (None, [], b'K') => state.erase_in_line(ev.param(0, 0)),

        // Line and character editing
        (None, [], b'L') => state.insert_lines(ev.count(0, 1)),
        (None, [], b'M') => state.delete_lines(ev.count(0, 1)),
        (None, [], b'@') => state.insert_chars(ev.count(0, 1)),
        (None, [], b'P') => state.delete_chars(ev.count(0, 1)),
        (None, [], b'X') => state.erase_chars(ev.count(0, 1)),

        // Scroll
        (None, [], b'S') => state.scroll_up(ev.count(0, 1)),
        (None, [], b'T') => state.scroll_down(ev.count(0, 1)),

        // Scroll region
        (None, [], b'r') => {
            let top = ev.count(0, 1);
            let bottom = ev.count(1, state.rows);
            if !state.set_scroll_region(top, bottom) {
                debug!("Ignoring invalid margins {};{}", top, bottom);
                return false;
            }
        }

        (None, [], b'm') => execute_sgr(ev, state),

        // Save/restore cursor
        (None, [], b's') => state.save_cursor(),
        (None, [], b'u') => state.restore_cursor(),

        // Modes
        (None, [], b'h' | b'l') => {
            let enable = ev.final_byte == b'h';
            for p in &ev.params {
                let mode = p.or(0);
                if !state.set_mode(mode, enable) {
                    debug!("Unknown mode {}", mode);
                }
            }
        }
        (Some(b'?'), [], b'h' | b'l') => {
            let enable = ev.final_byte == b'h';
            for p in &ev.params {
                let mode = p.or(0);
                if !state.set_private_mode(mode, enable) {
                    debug!("Unknown private mode {}", mode);
                }
            }
        }

        // Device Status Report
        (None, [], b'n') => match ev.param(0, 0) {
            5 => out.push(Notification::Reply(Response::StatusOk)),
            6 => {
                let (row, col) = state.report_position();
                out.push(Notification::Reply(Response::CursorPosition(row, col)));
            }
            n => {
                debug!("Unknown DSR {}", n);
                return false;
            }
        },
        (Some(b'?'), [], b'n') => match ev.param(0, 0) {
            15 => out.push(Notification::Reply(Response::NoPrinter)),
            n => {
                debug!("Unknown DEC DSR {}", n);
                return false;
            }
        },

        // Device Attributes
        (None, [], b'c') if ev.param(0, 0) == 0 => {
            let answer = ctx
                .capabilities
                .and_then(|caps| caps.string("u8"))
                .filter(|s| !s.is_empty());
            let response = match answer {
                Some(bytes) => Response::Raw(bytes.to_vec()),
                None => Response::DeviceAttributes,
            };
            out.push(Notification::Reply(response));
        }
        (Some(b'>'), [], b'c') if ev.param(0, 0) == 0 => {
            out.push(Notification::Reply(Response::SecondaryDeviceAttributes))
        }

        // XTWINOPS
        (None, [], b't') => match ev.param(0, 0) {
            8 => {
                let rows = ev.count(1, state.rows);
                let cols = ev.count(2, state.cols);
                out.push(Notification::ResizeRequested { cols, rows });
            }
            n => {
                debug!("Unsupported window operation {}", n);
                return false;
            }
        },

        // DECSTR
        (None, [b'!'], b'p') => {
            if ev.has_params() {
                debug!("Ignoring DECSTR with parameters {:?}", ev.params);
                return false;
            } else {
                state.soft_reset();
            }
        }

        // DECTST
        (None, [], b'y') => {
            if ev.param(0, 0) == 4 {
                state.full_reset();
            } else {
                debug!("Ignoring DECTST {:?}", ev.params);
                return false;
            }
        }

        // Media copy
        (None, [], b'i') => match ev.param(0, 0) {
            0 => out.push(print_request(state, PrintScope::Page)),
            4 => state.modes.remove(Modes::PRINTER_CONTROLLER),
            5 => state.modes.insert(Modes::PRINTER_CONTROLLER),
            n => {
                debug!("Unknown media copy {}", n);
                return false;
            }
        },
        (Some(b'?'), [], b'i') => match ev.param(0, 0) {
            1 => out.push(print_request(state, PrintScope::CursorLine)),
            4 => state.modes.remove(Modes::AUTO_PRINT),
            5 => state.modes.insert(Modes::AUTO_PRINT),
            8 => {
                state.modes.remove(Modes::PRINTER_SESSION);
                out.push(Notification::PrinterSession(false));
            }
            9 => {
                state.modes.insert(Modes::PRINTER_SESSION);
                out.push(Notification::PrinterSession(true));
            }
            10 => out.push(print_request(state, PrintScope::Composed)),
            11 => out.push(print_request(state, PrintScope::AllPages)),
            n => {
                debug!("Unknown DEC media copy {}", n);
                return false;
            }
        },

        _ => {
            // Unknown sequence
            debug!(
                "Unknown CSI: private={:?}, intermediates={:?}, params={:?}, final={:?}",
                ev.private.map(char::from),
                ev.intermediates,
                ev.params,
                ev.final_byte as char
            );
            return false;
        }
    }
    true
}

fn print_request(state: &TerminalState, scope: PrintScope) -> Notification {
    Notification::Print(PrintRequest {
        scope,
        full_page: state.modes.contains(Modes::PRINT_EXTENT),
        form_feed: state.modes.contains(Modes::PRINT_FORM_FEED),
    })
}

fn execute_sgr(ev: &SequenceEvent, state: &mut TerminalState) {
    if ev.params.is_empty() {
        state.current_attrs.reset();
        return;
    }

    let attrs = &mut state.current_attrs;
    let mut groups = ev.param_groups().into_iter();

    while let Some(group) = groups.next() {
        let param = group[0].or(0);
        match param {
            0 => attrs.reset(),
            1 => attrs.flags |= AttrFlags::BOLD,
            2 => attrs.flags |= AttrFlags::DIM,
            3 => attrs.flags |= AttrFlags::ITALIC,
            4 => attrs.flags |= AttrFlags::UNDERLINE,
            5 => attrs.flags |= AttrFlags::BLINK,
            7 => attrs.flags |= AttrFlags::INVERSE,
            8 => attrs.flags |= AttrFlags::HIDDEN,
            9 => attrs.flags |= AttrFlags::STRIKETHROUGH,

            22 => attrs.flags &= !(AttrFlags::BOLD | AttrFlags::DIM),
            23 => attrs.flags &= !AttrFlags::ITALIC,
            24 => attrs.flags &= !AttrFlags::UNDERLINE,
            25 => attrs.flags &= !AttrFlags::BLINK,
            27 => attrs.flags &= !AttrFlags::INVERSE,
            28 => attrs.flags &= !AttrFlags::HIDDEN,
            29 => attrs.flags &= !AttrFlags::STRIKETHROUGH,

            30..=37 => attrs.fg = Color::Indexed((param - 30) as u8),
            38 => {
                if let Some(color) = extended_color(group, &mut groups) {
                    attrs.fg = color;
                }
            }
            39 => attrs.fg = Color::Default,

            40..=47 => attrs.bg = Color::Indexed((param - 40) as u8),
            48 => {
                if let Some(color) = extended_color(group, &mut groups) {
                    attrs.bg = color;
                }
            }
            49 => attrs.bg = Color::Default,

            // Bright colors
            90..=97 => attrs.fg = Color::Indexed((param - 90 + 8) as u8),
            100..=107 => attrs.bg = Color::Indexed((param - 100 + 8) as u8),

            _ => {}
        }
    }
}

/// Color selector of SGR 38/48. The colon form keeps everything in `group`
/// (`38:5:n`, `38:2:cs:r:g:b` or `38:2:r:g:b`); the legacy form takes
/// `5;n` or `2;r;g;b` from the following groups. Values above 255 are ignored.
fn extended_color<'a>(
    group: &[Param],
    rest: &mut impl Iterator<Item = &'a [Param]>,
) -> Option<Color> {
    if group.len() > 1 {
        let values: Vec<u16> = group[1..].iter().map(|p| p.or(0)).collect();
        return match values.as_slice() {
            [5, n, ..] => indexed(*n),
            // With a colorspace id before the components
            [2, _, r, g, b, ..] => rgb(*r, *g, *b),
            [2, r, g, b] => rgb(*r, *g, *b),
            _ => None,
        };
    }

    let mut next = || rest.next().map(|g| g[0].or(0));
    match next()? {
        5 => indexed(next()?),
        2 => {
            let r = next().unwrap_or(0);
            let g = next().unwrap_or(0);
            let b = next().unwrap_or(0);
            rgb(r, g, b)
        }
        _ => None,
    }
}

fn indexed(n: u16) -> Option<Color> {
    u8::try_from(n).ok().map(Color::Indexed)
}

fn rgb(r: u16, g: u16, b: u16) -> Option<Color> {
    Some(Color::Rgb(
        u8::try_from(r).ok()?,
        u8::try_from(g).ok()?,
        u8::try_from(b).ok()?,
    ))
}

fn execute_osc(state: &mut TerminalState, ev: &SequenceEvent, out: &mut NotificationSet) -> bool {
    let Some(code) = ev.params.first().map(|p| p.or(0)) else {
        debug!("OSC without command number: {:?}", ev.payload);
        return false;
    };

    match code {
        0 => {
            state.set_title(&ev.payload);
            state.set_icon_name(&ev.payload);
            out.push(Notification::IconNameChanged(state.icon_name.clone()));
            out.push(Notification::TitleChanged(state.title.clone()));
        }
        1 => {
            state.set_icon_name(&ev.payload);
            out.push(Notification::IconNameChanged(state.icon_name.clone()));
        }
        2 => {
            state.set_title(&ev.payload);
            out.push(Notification::TitleChanged(state.title.clone()));
        }
        _ => {
            debug!("Unknown OSC {}", code);
            return false;
        }
    }
    true
}

fn execute_dcs(ev: &SequenceEvent, ctx: &DispatchContext<'_>, out: &mut NotificationSet) -> bool {
    match (ev.private, ev.intermediates.as_slice(), ev.final_byte) {
        (None, [b'+'], b'q') => request_termcap(&ev.payload, ctx, out),
        (private, intermediates, final_byte) => {
            debug!(
                "Unknown DCS: private={:?}, intermediates={:?}, final={:?}",
                private.map(char::from),
                intermediates,
                final_byte as char
            );
            return false;
        }
    }
    true
}

/// XTGETTCAP: answer each hex-encoded capability name in turn, stopping at
/// the first one that cannot be answered.
fn request_termcap(payload: &str, ctx: &DispatchContext<'_>, out: &mut NotificationSet) {
    for hex_name in payload.split(';') {
        let answer = hex_decode(hex_name)
            .and_then(|name| String::from_utf8(name).ok())
            .and_then(|name| termcap_answer(&name, ctx));

        let response = match answer {
            Some(Capability::Present(CapValue::Flag)) => Response::TermcapReply {
                valid: true,
                payload: hex_name.to_string(),
            },
            Some(Capability::Present(CapValue::Number(n))) => Response::TermcapReply {
                valid: true,
                payload: format!("{}={}", hex_name, hex_encode(n.to_string().as_bytes())),
            },
            Some(Capability::Present(CapValue::Str(s))) => Response::TermcapReply {
                valid: true,
                payload: format!("{}={}", hex_name, hex_encode(&s)),
            },
            _ => {
                out.push(Notification::Reply(Response::TermcapReply {
                    valid: false,
                    payload: hex_name.to_string(),
                }));
                return;
            }
        };
        out.push(Notification::Reply(response));
    }
}

/// Colors assumed when the entry does not say
const DEFAULT_COLORS: i64 = 256;

fn termcap_answer(name: &str, ctx: &DispatchContext<'_>) -> Option<Capability> {
    match name {
        "TN" | "name" => Some(Capability::Present(CapValue::Str(
            ctx.term_name.as_bytes().to_vec(),
        ))),
        "Co" | "colors" => {
            let colors = ctx
                .capabilities
                .and_then(|caps| caps.number("Co").or_else(|| caps.number("colors")))
                .unwrap_or(DEFAULT_COLORS);
            Some(Capability::Present(CapValue::Number(colors)))
        }
        _ => match ctx.capabilities?.get(name) {
            Capability::NotPresent => None,
            present => Some(present),
        },
    }
}

fn hex_decode(text: &str) -> Option<Vec<u8>> {
    if text.is_empty() || text.len() % 2 != 0 || !text.is_ascii() {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).ok())
        .collect()
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02X}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::term::parser::VtParser;
    use crate::core::term::sequence::Token;
    use crate::core::term::state::CellAttrs;
    use crate::termcap::TermcapDb;

    fn run(state: &mut TerminalState, input: &str, ctx: &DispatchContext<'_>) -> Vec<Notification> {
        let mut parser = VtParser::new();
        let mut out = Vec::new();
        for token in parser.feed_str(input) {
            match token {
                Token::Print(text) => state.put_str(&text),
                Token::Sequence(ev) => out.extend(dispatch(state, &ev, ctx)),
            }
        }
        out
    }

    fn plain(state: &mut TerminalState, input: &str) -> Vec<Notification> {
        run(state, input, &DispatchContext::default())
    }

    fn replies(notifications: &[Notification]) -> Vec<u8> {
        notifications
            .iter()
            .filter_map(|n| match n {
                Notification::Reply(r) => Some(r.to_bytes()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn test_cursor_movement() {
        let mut state = TerminalState::new(80, 24);
        plain(&mut state, "\x1b[1;2H");
        assert_eq!((state.cursor.row, state.cursor.col), (0, 1));

        plain(&mut state, "\x1b[5;10H");
        assert_eq!((state.cursor.row, state.cursor.col), (4, 9));
    }

    #[test]
    fn test_zero_count_means_one() {
        let mut state = TerminalState::new(80, 24);
        plain(&mut state, "\x1b[10;10H\x1b[0A\x1b[C");
        assert_eq!((state.cursor.row, state.cursor.col), (8, 10));
        plain(&mut state, "\x1b[0;0H");
        assert_eq!((state.cursor.row, state.cursor.col), (0, 0));
    }

    #[test]
    fn test_overflowing_param_is_discarded() {
        let mut state = TerminalState::new(10, 3);
        plain(&mut state, "abc\x1b[H");
        plain(&mut state, "\x1b[99999999Xok");
        assert_eq!(state.row_text(0), "okc");
    }

    #[test]
    fn test_unknown_csi_then_text() {
        let mut state = TerminalState::new(10, 3);
        let notes = plain(&mut state, "\x1b[5zhi");
        assert!(notes.is_empty());
        assert_eq!(state.row_text(0), "hi");
    }

    #[test]
    fn test_sgr_colors() {
        let mut state = TerminalState::new(80, 24);
        plain(&mut state, "\x1b[31m");
        assert_eq!(state.current_attrs.fg, Color::Indexed(1));

        plain(&mut state, "\x1b[1;38;5;200;48;2;1;2;3m");
        assert_eq!(state.current_attrs.fg, Color::Indexed(200));
        assert_eq!(state.current_attrs.bg, Color::Rgb(1, 2, 3));
        assert!(state.current_attrs.flags.contains(AttrFlags::BOLD));

        plain(&mut state, "\x1b[m");
        assert_eq!(state.current_attrs, CellAttrs::default());
    }

    #[test]
    fn test_sgr_colon_colors() {
        let mut state = TerminalState::new(80, 24);
        plain(&mut state, "\x1b[38:2::10:20:30m");
        assert_eq!(state.current_attrs.fg, Color::Rgb(10, 20, 30));

        plain(&mut state, "\x1b[48:5:100;1m");
        assert_eq!(state.current_attrs.bg, Color::Indexed(100));
        assert!(state.current_attrs.flags.contains(AttrFlags::BOLD));

        plain(&mut state, "\x1b[38:2:1:2:3m");
        assert_eq!(state.current_attrs.fg, Color::Rgb(1, 2, 3));
    }

    #[test]
    fn test_sgr_out_of_range_color_ignored() {
        let mut state = TerminalState::new(80, 24);
        plain(&mut state, "\x1b[31m");
        plain(&mut state, "\x1b[38;5;300m");
        assert_eq!(state.current_attrs.fg, Color::Indexed(1));
        plain(&mut state, "\x1b[38;2;300;1;1m");
        assert_eq!(state.current_attrs.fg, Color::Indexed(1));
        plain(&mut state, "\x1b[48:2::1:256:1m");
        assert_eq!(state.current_attrs.bg, Color::Default);
    }

    #[test]
    fn test_unknown_sequence_keeps_emoji_cluster() {
        let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F466}";
        let mut plain_state = TerminalState::new(10, 3);
        plain(&mut plain_state, family);

        let mut state = TerminalState::new(10, 3);
        plain(&mut state, "\u{1F468}\x1b[5z\u{200D}\x1b]99;x\x07\u{1F469}\u{200D}\u{1F466}");

        assert_eq!(state.row_text(0), plain_state.row_text(0));
        assert_eq!(state.cell(0, 0).unwrap().content.len(), 5);
        assert_eq!(state.cursor.col, 2);

        // A recognized sequence still ends the cluster
        let mut split = TerminalState::new(10, 3);
        plain(&mut split, "\u{1F468}\x1b[m\u{200D}\u{1F469}");
        assert_eq!(split.cell(0, 2).unwrap().content.as_slice(), &['\u{1F469}']);
        assert_eq!(split.cursor.col, 4);
    }

    #[test]
    fn test_bell_and_linefeed_newline() {
        let mut state = TerminalState::new(10, 3);
        let notes = plain(&mut state, "ab\x07\n");
        assert_eq!(notes, vec![Notification::Bell]);
        assert_eq!((state.cursor.row, state.cursor.col), (1, 2));

        plain(&mut state, "\x1b[20h\n");
        assert_eq!((state.cursor.row, state.cursor.col), (2, 0));
    }

    #[test]
    fn test_device_status_reports() {
        let mut state = TerminalState::new(80, 24);
        let notes = plain(&mut state, "\x1b[3;7H\x1b[6n\x1b[5n\x1b[?15n");
        assert_eq!(replies(&notes), b"\x1b[3;7R\x1b[0n\x1b[?13n");
    }

    #[test]
    fn test_device_attributes_default() {
        let mut state = TerminalState::new(80, 24);
        let notes = plain(&mut state, "\x1b[c\x1b[>c");
        assert_eq!(replies(&notes), b"\x1b[?62;c\x1b[>1;10;0c");
    }

    #[test]
    fn test_device_attributes_from_capability() {
        let db = TermcapDb::parse("t:u8=\\E[?1;2c:");
        let entry = db.resolve("t").unwrap();
        let ctx = DispatchContext {
            capabilities: Some(&entry),
            term_name: "t",
        };
        let mut state = TerminalState::new(80, 24);
        let notes = run(&mut state, "\x1b[0c", &ctx);
        assert_eq!(replies(&notes), b"\x1b[?1;2c");
    }

    #[test]
    fn test_xtgettcap() {
        let db = TermcapDb::parse("xterm:am:co#80:kb=^H:");
        let entry = db.resolve("xterm").unwrap();
        let ctx = DispatchContext {
            capabilities: Some(&entry),
            term_name: "xterm",
        };
        let mut state = TerminalState::new(80, 24);

        // "kb" and "TN"
        let notes = run(&mut state, "\x1bP+q6b62;544e\x1b\\", &ctx);
        assert_eq!(
            replies(&notes),
            b"\x1bP1+r6b62=08\x1b\\\x1bP1+r544e=787465726D\x1b\\".to_vec()
        );

        // "am" is a flag; "zz" is unknown and stops the list before "co"
        let notes = run(&mut state, "\x1bP+q616d;7a7a;636f\x1b\\", &ctx);
        assert_eq!(
            notes,
            vec![
                Notification::Reply(Response::TermcapReply {
                    valid: true,
                    payload: "616d".into()
                }),
                Notification::Reply(Response::TermcapReply {
                    valid: false,
                    payload: "7a7a".into()
                }),
            ]
        );
    }

    #[test]
    fn test_xtgettcap_colors_default() {
        let mut state = TerminalState::new(80, 24);
        let notes = plain(&mut state, "\x1bP+q436f\x1b\\");
        assert_eq!(replies(&notes), b"\x1bP1+r436f=323536\x1b\\");
    }

    #[test]
    fn test_titles() {
        let mut state = TerminalState::new(80, 24);
        let notes = plain(&mut state, "\x1b]0;both\x07\x1b]2;win\x1b\\\x1b]1;icon\x07");
        assert_eq!(state.title, "win");
        assert_eq!(state.icon_name, "icon");
        assert_eq!(
            notes,
            vec![
                Notification::IconNameChanged("both".into()),
                Notification::TitleChanged("both".into()),
                Notification::TitleChanged("win".into()),
                Notification::IconNameChanged("icon".into()),
            ]
        );
    }

    #[test]
    fn test_resize_request() {
        let mut state = TerminalState::new(80, 24);
        let notes = plain(&mut state, "\x1b[8;30;100t\x1b[8;;50t");
        assert_eq!(
            notes,
            vec![
                Notification::ResizeRequested { cols: 100, rows: 30 },
                Notification::ResizeRequested { cols: 50, rows: 24 },
            ]
        );
    }

    #[test]
    fn test_decstr_with_params_is_ignored() {
        let mut state = TerminalState::new(10, 5);
        plain(&mut state, "\x1b[4h\x1b[3;5H\x1b[1!p");
        assert!(state.modes.contains(Modes::INSERT));
        assert_eq!(state.cursor.row, 2);

        plain(&mut state, "\x1b[!p");
        assert!(!state.modes.contains(Modes::INSERT));
        assert_eq!((state.cursor.row, state.cursor.col), (0, 0));
    }

    #[test]
    fn test_dectst_full_reset() {
        let mut state = TerminalState::new(10, 5);
        plain(&mut state, "text\x1b[2;1y");
        assert_eq!(state.row_text(0), "text");
        plain(&mut state, "\x1b[4;1y");
        assert_eq!(state.row_text(0), "");
    }

    #[test]
    fn test_ris() {
        let mut state = TerminalState::new(10, 5);
        plain(&mut state, "\x1b]2;t\x07\x1b[2;4rhello\x1b[?7l\x1bc");
        assert_eq!(state.screen_text(), "\n\n\n\n");
        assert!(state.title.is_empty());
        assert_eq!(state.scroll_region, (0, 4));
        assert!(state.modes.contains(Modes::AUTO_WRAP));
    }

    #[test]
    fn test_decaln() {
        let mut state = TerminalState::new(3, 2);
        plain(&mut state, "\x1b#8");
        assert_eq!(state.screen_text(), "EEE\nEEE");
    }

    #[test]
    fn test_media_copy() {
        let mut state = TerminalState::new(10, 5);
        let notes = plain(&mut state, "\x1b[?19h\x1b[?18h\x1b[i\x1b[?19l\x1b[?1i\x1b[?10i\x1b[?11i");
        assert_eq!(
            notes,
            vec![
                Notification::Print(PrintRequest {
                    scope: PrintScope::Page,
                    full_page: true,
                    form_feed: true
                }),
                Notification::Print(PrintRequest {
                    scope: PrintScope::CursorLine,
                    full_page: false,
                    form_feed: true
                }),
                Notification::Print(PrintRequest {
                    scope: PrintScope::Composed,
                    full_page: false,
                    form_feed: true
                }),
                Notification::Print(PrintRequest {
                    scope: PrintScope::AllPages,
                    full_page: false,
                    form_feed: true
                }),
            ]
        );
    }

    #[test]
    fn test_printer_modes() {
        let mut state = TerminalState::new(10, 5);
        plain(&mut state, "\x1b[?5i\x1b[5i");
        assert!(state.modes.contains(Modes::AUTO_PRINT | Modes::PRINTER_CONTROLLER));
        plain(&mut state, "\x1b[?4i\x1b[4i");
        assert!(!state.modes.intersects(Modes::AUTO_PRINT | Modes::PRINTER_CONTROLLER));

        let notes = plain(&mut state, "\x1b[?9i\x1b[?8i");
        assert_eq!(
            notes,
            vec![
                Notification::PrinterSession(true),
                Notification::PrinterSession(false)
            ]
        );
        assert!(!state.modes.contains(Modes::PRINTER_SESSION));
    }

    #[test]
    fn test_private_modes() {
        let mut state = TerminalState::new(10, 5);
        plain(&mut state, "\x1b[?25;2004l\x1b[?1h");
        assert!(!state.modes.contains(Modes::CURSOR_VISIBLE));
        assert!(!state.modes.contains(Modes::BRACKETED_PASTE));
        assert!(state.modes.contains(Modes::APPLICATION_CURSOR));
    }

    #[test]
    fn test_reply_bytes() {
        let mut set = NotificationSet::default();
        set.push(Notification::Bell);
        set.push(Notification::Reply(Response::StatusOk));
        assert_eq!(set.reply_bytes(), b"\x1b[0n");
        assert_eq!(set.len(), 2);
    }
}
