//! VT sequence scanner
//!
//! Recognizes ANSI/VT escape sequence grammar in a codepoint stream and turns
//! it into [`Token`]s: runs of printable text and structured
//! [`SequenceEvent`]s. The scanner never touches terminal state; the
//! dispatcher applies the events.
//!
//! State survives between [`VtParser::feed`] calls, so a sequence split across
//! reads is recognized exactly as if it had arrived in one piece. Malformed
//! input is dropped up to the next point where the grammar resynchronizes;
//! it is never reported as an error.

use tracing::trace;

use super::sequence::{Param, SequenceEvent, SequenceKind, Terminator, Token};

pub const MAX_PARAMS: usize = 32;
pub const MAX_PARAM_VALUE: u32 = 0xFFFF;
pub const MAX_INTERMEDIATES: usize = 2;
pub const MAX_STRING_LEN: usize = 4096;

/// Per-session scanner limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScannerLimits {
    pub max_params: usize,
    pub max_string_len: usize,
}

impl Default for ScannerLimits {
    fn default() -> Self {
        Self {
            max_params: MAX_PARAMS,
            max_string_len: MAX_STRING_LEN,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum ParserState {
    #[default]
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    /// Malformed CSI: swallow until a final byte
    CsiIgnore,
    OscString,
    DcsEntry,
    DcsParam,
    DcsIntermediate,
    DcsPassthrough,
    /// Malformed DCS: swallow until ST
    DcsIgnore,
    /// ESC received inside an OSC/DCS payload, waiting for backslash
    StringEscape,
    /// SOS, PM and APC payloads are dropped
    IgnoreString,
}

/// Scanner state machine
pub struct VtParser {
    state: ParserState,
    limits: ScannerLimits,
    params: Vec<Param>,
    /// Parallel to `params`: the field was introduced by ':'
    sub_params: Vec<bool>,
    sub_pending: bool,
    current_param: Option<u32>,
    has_params: bool,
    private: Option<u8>,
    intermediates: Vec<u8>,
    /// Final byte of the DCS whose payload is being collected
    dcs_final: u8,
    string_kind: SequenceKind,
    payload: String,
    payload_len: usize,
    overflow: bool,
    /// Printable run not yet emitted
    text: String,
}

impl Default for VtParser {
    fn default() -> Self {
        Self::new()
    }
}

impl VtParser {
    pub fn new() -> Self {
        Self::with_limits(ScannerLimits::default())
    }

    pub fn with_limits(limits: ScannerLimits) -> Self {
        Self {
            state: ParserState::Ground,
            limits,
            params: Vec::with_capacity(16),
            sub_params: Vec::with_capacity(16),
            sub_pending: false,
            current_param: None,
            has_params: false,
            private: None,
            intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            dcs_final: 0,
            string_kind: SequenceKind::Osc,
            payload: String::new(),
            payload_len: 0,
            overflow: false,
            text: String::new(),
        }
    }

    /// Scan a chunk of codepoints.
    ///
    /// Printable text is emitted as runs; a run still open at the end of the
    /// chunk is flushed, while an unfinished sequence stays buffered for the
    /// next call.
    pub fn feed(&mut self, input: &[char]) -> Vec<Token> {
        self.feed_chars(input.iter().copied())
    }

    pub fn feed_str(&mut self, input: &str) -> Vec<Token> {
        self.feed_chars(input.chars())
    }

    pub fn feed_chars(&mut self, input: impl IntoIterator<Item = char>) -> Vec<Token> {
        let mut out = Vec::new();
        for c in input {
            self.advance(c, &mut out);
        }
        self.flush_text(&mut out);
        out
    }

    /// True when no partial sequence is buffered.
    pub fn is_ground(&self) -> bool {
        self.state == ParserState::Ground
    }

    /// Drop any partial sequence.
    pub fn reset(&mut self) {
        self.clear_sequence();
        self.payload.clear();
        self.payload_len = 0;
        self.text.clear();
        self.state = ParserState::Ground;
    }

    fn advance(&mut self, c: char, out: &mut Vec<Token>) {
        match self.state {
            ParserState::OscString | ParserState::DcsPassthrough => return self.string_char(c, out),
            ParserState::StringEscape => return self.string_escape(c, out),
            ParserState::IgnoreString | ParserState::DcsIgnore => return self.ignore_string(c),
            _ => {}
        }

        let cp = c as u32;
        match cp {
            0x1B => {
                self.flush_text(out);
                self.enter_escape();
            }
            0x18 | 0x1A => {
                // CAN / SUB cancel the sequence in progress
                self.flush_text(out);
                if self.state != ParserState::Ground {
                    trace!("sequence cancelled in {:?}", self.state);
                }
                self.state = ParserState::Ground;
            }
            0x00..=0x1F => {
                // C0 controls execute immediately, even mid-sequence
                self.flush_text(out);
                out.push(Token::Sequence(SequenceEvent::control(cp as u8)));
            }
            0x7F => {}
            0x80..=0x9F => {
                self.flush_text(out);
                self.c1_control(cp as u8, out);
            }
            _ => match self.state {
                ParserState::Ground => self.text.push(c),
                ParserState::Escape => self.escape(c, out),
                ParserState::EscapeIntermediate => self.escape_intermediate(c, out),
                ParserState::CsiEntry
                | ParserState::CsiParam
                | ParserState::DcsEntry
                | ParserState::DcsParam => self.param_char(c, out),
                ParserState::CsiIntermediate | ParserState::DcsIntermediate => {
                    self.intermediate_char(c, out)
                }
                ParserState::CsiIgnore => self.csi_ignore(c, out),
                // string states were handled above
                _ => {}
            },
        }
    }

    fn flush_text(&mut self, out: &mut Vec<Token>) {
        if !self.text.is_empty() {
            out.push(Token::Print(std::mem::take(&mut self.text)));
        }
    }

    fn clear_sequence(&mut self) {
        self.params.clear();
        self.sub_params.clear();
        self.sub_pending = false;
        self.current_param = None;
        self.has_params = false;
        self.private = None;
        self.intermediates.clear();
        self.overflow = false;
    }

    fn enter_escape(&mut self) {
        self.clear_sequence();
        self.state = ParserState::Escape;
    }

    fn enter_csi(&mut self) {
        self.clear_sequence();
        self.state = ParserState::CsiEntry;
    }

    fn enter_osc(&mut self) {
        self.clear_sequence();
        self.payload.clear();
        self.payload_len = 0;
        self.string_kind = SequenceKind::Osc;
        self.state = ParserState::OscString;
    }

    fn enter_dcs(&mut self) {
        self.clear_sequence();
        self.string_kind = SequenceKind::Dcs;
        self.state = ParserState::DcsEntry;
    }

    fn in_dcs(&self) -> bool {
        matches!(
            self.state,
            ParserState::DcsEntry | ParserState::DcsParam | ParserState::DcsIntermediate
        )
    }

    /// Enter the error-recovery state for the current sequence family.
    fn malformed(&mut self) {
        trace!("malformed sequence in {:?}", self.state);
        self.state = if self.in_dcs() {
            ParserState::DcsIgnore
        } else {
            ParserState::CsiIgnore
        };
    }

    /// Abandon the sequence and rescan `c` as ordinary input.
    fn abort_and_rescan(&mut self, c: char, out: &mut Vec<Token>) {
        trace!("unexpected {:?} in {:?}, back to ground", c, self.state);
        self.clear_sequence();
        self.state = ParserState::Ground;
        self.advance(c, out);
    }

    fn c1_control(&mut self, byte: u8, out: &mut Vec<Token>) {
        match byte {
            0x90 => self.enter_dcs(),
            0x9B => self.enter_csi(),
            0x9D => self.enter_osc(),
            0x98 | 0x9E | 0x9F => self.state = ParserState::IgnoreString,
            0x9C => self.state = ParserState::Ground,
            _ => {
                // 8-bit form of ESC Fe
                self.state = ParserState::Ground;
                out.push(Token::Sequence(SequenceEvent::escape(&[], byte - 0x40)));
            }
        }
    }

    fn collect_intermediate(&mut self, byte: u8) {
        if self.intermediates.len() < MAX_INTERMEDIATES {
            self.intermediates.push(byte);
        } else {
            self.overflow = true;
        }
    }

    fn escape(&mut self, c: char, out: &mut Vec<Token>) {
        match c {
            '[' => self.enter_csi(),
            ']' => self.enter_osc(),
            'P' => self.enter_dcs(),
            'X' | '^' | '_' => self.state = ParserState::IgnoreString,
            ' '..='/' => {
                self.collect_intermediate(c as u8);
                self.state = ParserState::EscapeIntermediate;
            }
            '0'..='~' => {
                self.state = ParserState::Ground;
                out.push(Token::Sequence(SequenceEvent::escape(&[], c as u8)));
            }
            _ => self.abort_and_rescan(c, out),
        }
    }

    fn escape_intermediate(&mut self, c: char, out: &mut Vec<Token>) {
        match c {
            ' '..='/' => self.collect_intermediate(c as u8),
            '0'..='~' => {
                self.state = ParserState::Ground;
                if !self.overflow {
                    out.push(Token::Sequence(SequenceEvent::escape(
                        &self.intermediates,
                        c as u8,
                    )));
                }
            }
            _ => self.abort_and_rescan(c, out),
        }
    }

    fn param_char(&mut self, c: char, out: &mut Vec<Token>) {
        let dcs = self.in_dcs();
        let entry = matches!(self.state, ParserState::CsiEntry | ParserState::DcsEntry);
        let param_state = if dcs {
            ParserState::DcsParam
        } else {
            ParserState::CsiParam
        };

        match c {
            '<'..='?' if entry => {
                self.private = Some(c as u8);
                self.state = param_state;
            }
            '0'..='9' => {
                self.state = param_state;
                self.push_digit(c as u32 - '0' as u32);
            }
            ':' | ';' => {
                self.state = param_state;
                if self.finish_param() {
                    self.sub_pending = c == ':';
                }
            }
            '<'..='?' => self.malformed(),
            ' '..='/' => {
                if self.end_params() {
                    self.collect_intermediate(c as u8);
                    self.state = if dcs {
                        ParserState::DcsIntermediate
                    } else {
                        ParserState::CsiIntermediate
                    };
                }
            }
            '@'..='~' => {
                if self.end_params() {
                    self.finish_sequence(c as u8, out);
                } else if !dcs {
                    // The final byte still closes the malformed CSI; a DCS
                    // stays in DcsIgnore until its string terminator
                    self.state = ParserState::Ground;
                }
            }
            _ => self.abort_and_rescan(c, out),
        }
    }

    fn intermediate_char(&mut self, c: char, out: &mut Vec<Token>) {
        match c {
            ' '..='/' => self.collect_intermediate(c as u8),
            '@'..='~' => self.finish_sequence(c as u8, out),
            '0'..='?' => self.malformed(),
            _ => self.abort_and_rescan(c, out),
        }
    }

    fn csi_ignore(&mut self, c: char, out: &mut Vec<Token>) {
        match c {
            '@'..='~' => self.state = ParserState::Ground,
            ' '..='?' => {}
            _ => self.abort_and_rescan(c, out),
        }
    }

    fn push_digit(&mut self, digit: u32) {
        let value = self.current_param.unwrap_or(0) * 10 + digit;
        if value > MAX_PARAM_VALUE {
            self.malformed();
        } else {
            self.current_param = Some(value);
            self.has_params = true;
        }
    }

    /// Close the current parameter field. Returns false when the sequence
    /// became malformed.
    fn finish_param(&mut self) -> bool {
        if self.params.len() >= self.limits.max_params {
            self.malformed();
            return false;
        }
        let param = match self.current_param.take() {
            Some(v) => Param::Value(v as u16),
            None => Param::Default,
        };
        self.params.push(param);
        self.sub_params.push(std::mem::take(&mut self.sub_pending));
        self.has_params = true;
        true
    }

    /// Close the trailing parameter field, if any field was started.
    fn end_params(&mut self) -> bool {
        if self.has_params {
            self.finish_param()
        } else {
            true
        }
    }

    fn finish_sequence(&mut self, final_byte: u8, out: &mut Vec<Token>) {
        if self.in_dcs() {
            self.dcs_final = final_byte;
            self.payload.clear();
            self.payload_len = 0;
            self.state = ParserState::DcsPassthrough;
            return;
        }

        self.state = ParserState::Ground;
        if self.overflow {
            trace!("dropping CSI with too many intermediates");
            return;
        }
        out.push(Token::Sequence(SequenceEvent {
            kind: SequenceKind::Csi,
            params: std::mem::take(&mut self.params),
            sub_params: std::mem::take(&mut self.sub_params),
            private: self.private.take(),
            intermediates: std::mem::take(&mut self.intermediates),
            final_byte,
            payload: String::new(),
            terminator: None,
        }));
    }

    fn push_payload(&mut self, c: char) {
        if self.payload_len >= self.limits.max_string_len {
            self.overflow = true;
        } else {
            self.payload.push(c);
            self.payload_len += 1;
        }
    }

    fn string_char(&mut self, c: char, out: &mut Vec<Token>) {
        match c as u32 {
            0x07 => self.finish_string(Terminator::Bel, out),
            0x1B => self.state = ParserState::StringEscape,
            0x9C => self.finish_string(Terminator::St, out),
            0x18 | 0x1A => {
                trace!("string cancelled");
                self.state = ParserState::Ground;
            }
            0x00..=0x1F if self.string_kind == SequenceKind::Dcs => self.push_payload(c),
            0x00..=0x1F | 0x7F..=0x9F => {}
            _ => self.push_payload(c),
        }
    }

    fn string_escape(&mut self, c: char, out: &mut Vec<Token>) {
        self.finish_string(Terminator::St, out);
        if c != '\\' {
            // ESC not followed by backslash ends the string and starts a new
            // escape sequence
            self.enter_escape();
            self.advance(c, out);
        }
    }

    fn ignore_string(&mut self, c: char) {
        match c as u32 {
            0x1B => self.enter_escape(),
            0x9C | 0x18 | 0x1A => self.state = ParserState::Ground,
            0x07 if self.state == ParserState::DcsIgnore => self.state = ParserState::Ground,
            _ => {}
        }
    }

    fn finish_string(&mut self, terminator: Terminator, out: &mut Vec<Token>) {
        self.state = ParserState::Ground;
        if self.overflow {
            trace!("dropping oversized {:?} payload", self.string_kind);
            self.payload.clear();
            return;
        }

        let payload = std::mem::take(&mut self.payload);
        let event = match self.string_kind {
            SequenceKind::Osc => {
                // "Ps ; Pt": a leading number selects the command
                let (params, text) = match payload.split_once(';') {
                    Some((code, rest)) => (osc_code(code), rest.to_string()),
                    None => match osc_code(&payload) {
                        params if params.is_empty() => (params, payload),
                        params => (params, String::new()),
                    },
                };
                SequenceEvent {
                    kind: SequenceKind::Osc,
                    params,
                    sub_params: Vec::new(),
                    private: None,
                    intermediates: Vec::new(),
                    final_byte: 0,
                    payload: text,
                    terminator: Some(terminator),
                }
            }
            _ => SequenceEvent {
                kind: SequenceKind::Dcs,
                params: std::mem::take(&mut self.params),
                sub_params: std::mem::take(&mut self.sub_params),
                private: self.private.take(),
                intermediates: std::mem::take(&mut self.intermediates),
                final_byte: self.dcs_final,
                payload,
                terminator: Some(terminator),
            },
        };
        out.push(Token::Sequence(event));
    }
}

fn osc_code(code: &str) -> Vec<Param> {
    match code.parse::<u16>() {
        Ok(n) if !code.starts_with('+') => vec![Param::Value(n)],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequences(tokens: &[Token]) -> Vec<&SequenceEvent> {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Sequence(ev) => Some(ev),
                Token::Print(_) => None,
            })
            .collect()
    }

    fn text(tokens: &[Token]) -> String {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Print(s) => Some(s.as_str()),
                Token::Sequence(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_cursor_position_params() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\x1b[1;2H");

        assert_eq!(tokens.len(), 1);
        let ev = sequences(&tokens)[0];
        assert_eq!(ev.kind, SequenceKind::Csi);
        assert_eq!(ev.params, vec![Param::Value(1), Param::Value(2)]);
        assert_eq!(ev.final_byte, b'H');
        assert!(parser.is_ground());
    }

    #[test]
    fn test_omitted_params() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\x1b[;5H\x1b[5;H\x1b[H");
        let evs = sequences(&tokens);

        assert_eq!(evs[0].params, vec![Param::Default, Param::Value(5)]);
        assert_eq!(evs[1].params, vec![Param::Value(5), Param::Default]);
        assert!(evs[2].params.is_empty());
    }

    #[test]
    fn test_private_marker_and_intermediates() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\x1b[?25l\x1b[!p\x1b[2 q");
        let evs = sequences(&tokens);

        assert_eq!(evs[0].private, Some(b'?'));
        assert_eq!(evs[0].params, vec![Param::Value(25)]);
        assert_eq!(evs[1].intermediates, vec![b'!']);
        assert_eq!(evs[1].final_byte, b'p');
        assert_eq!(evs[2].intermediates, vec![b' ']);
        assert_eq!(evs[2].params, vec![Param::Value(2)]);
    }

    #[test]
    fn test_text_runs_around_sequences() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("ab\x1b[mcd");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], Token::Print("ab".into()));
        assert_eq!(tokens[2], Token::Print("cd".into()));
    }

    #[test]
    fn test_split_sequence_resumes() {
        let mut parser = VtParser::new();
        let mut tokens = Vec::new();
        for c in "\x1b[12;34Hx".chars() {
            tokens.extend(parser.feed(&[c]));
        }

        let evs = sequences(&tokens);
        assert_eq!(evs.len(), 1);
        assert_eq!(evs[0].params, vec![Param::Value(12), Param::Value(34)]);
        assert_eq!(text(&tokens), "x");
    }

    #[test]
    fn test_param_overflow_discards_sequence() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\x1b[99999999Xok");

        assert!(sequences(&tokens).is_empty());
        assert_eq!(text(&tokens), "ok");
        assert!(parser.is_ground());
    }

    #[test]
    fn test_too_many_params_discards_sequence() {
        let mut parser = VtParser::new();
        let input = format!("\x1b[{}m!", vec!["1"; MAX_PARAMS + 1].join(";"));
        let tokens = parser.feed_str(&input);

        assert!(sequences(&tokens).is_empty());
        assert_eq!(text(&tokens), "!");
    }

    #[test]
    fn test_one_param_over_limit_keeps_following_text() {
        let mut parser = VtParser::new();
        let input = format!("\x1b[{}mHello", "1;".repeat(MAX_PARAMS));
        let tokens = parser.feed_str(&input);

        assert!(sequences(&tokens).is_empty());
        assert_eq!(text(&tokens), "Hello");
        assert!(parser.is_ground());
    }

    #[test]
    fn test_dcs_over_limit_ignores_payload() {
        let mut parser = VtParser::new();
        let input = format!("\x1bP{}qdata\x1b\\ok", "1;".repeat(MAX_PARAMS));
        let tokens = parser.feed_str(&input);

        assert!(sequences(&tokens)
            .iter()
            .all(|ev| ev.kind == SequenceKind::Escape));
        assert_eq!(text(&tokens), "ok");
        assert!(parser.is_ground());
    }

    #[test]
    fn test_colon_sub_params() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\x1b[1;38:2::10:20:30m");
        let ev = sequences(&tokens)[0];

        assert_eq!(ev.params.len(), 7);
        assert_eq!(
            ev.sub_params,
            vec![false, false, true, true, true, true, true]
        );
        let groups = ev.param_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], &[Param::Value(1)]);
        assert_eq!(groups[1][0], Param::Value(38));
        assert_eq!(groups[1][2], Param::Default);
    }

    #[test]
    fn test_misplaced_private_marker() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\x1b[1?hok");

        assert!(sequences(&tokens).is_empty());
        assert_eq!(text(&tokens), "ok");
    }

    #[test]
    fn test_control_inside_csi_executes() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\x1b[1\n;2H");
        let evs = sequences(&tokens);

        assert_eq!(evs.len(), 2);
        assert_eq!(evs[0].kind, SequenceKind::Control);
        assert_eq!(evs[0].final_byte, b'\n');
        assert_eq!(evs[1].params, vec![Param::Value(1), Param::Value(2)]);
    }

    #[test]
    fn test_cancel_aborts_sequence() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\x1b[1\x18A");

        assert!(sequences(&tokens).is_empty());
        assert_eq!(text(&tokens), "A");
    }

    #[test]
    fn test_osc_terminators() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\x1b]0;hello\x07\x1b]2;world\x1b\\");
        let evs = sequences(&tokens);

        assert_eq!(evs.len(), 2);
        assert_eq!(evs[0].params, vec![Param::Value(0)]);
        assert_eq!(evs[0].payload, "hello");
        assert_eq!(evs[0].terminator, Some(Terminator::Bel));
        assert_eq!(evs[1].params, vec![Param::Value(2)]);
        assert_eq!(evs[1].payload, "world");
        assert_eq!(evs[1].terminator, Some(Terminator::St));
    }

    #[test]
    fn test_osc_split_across_feeds() {
        let mut parser = VtParser::new();
        let mut tokens = parser.feed_str("\x1b]2;ti");
        assert!(tokens.is_empty());
        tokens.extend(parser.feed_str("tle\x1b"));
        tokens.extend(parser.feed_str("\\"));

        let evs = sequences(&tokens);
        assert_eq!(evs.len(), 1);
        assert_eq!(evs[0].payload, "title");
    }

    #[test]
    fn test_osc_oversized_payload_dropped() {
        let mut parser = VtParser::with_limits(ScannerLimits {
            max_params: MAX_PARAMS,
            max_string_len: 8,
        });
        let tokens = parser.feed_str("\x1b]2;a very long title\x07ok");

        assert!(sequences(&tokens).is_empty());
        assert_eq!(text(&tokens), "ok");
    }

    #[test]
    fn test_dcs_payload() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\x1bP+q544e\x1b\\");
        let evs = sequences(&tokens);

        assert_eq!(evs.len(), 1);
        assert_eq!(evs[0].kind, SequenceKind::Dcs);
        assert_eq!(evs[0].intermediates, vec![b'+']);
        assert_eq!(evs[0].final_byte, b'q');
        assert_eq!(evs[0].payload, "544e");
    }

    #[test]
    fn test_c1_controls() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\u{9b}5A\u{84}");
        let evs = sequences(&tokens);

        assert_eq!(evs[0].kind, SequenceKind::Csi);
        assert_eq!(evs[0].final_byte, b'A');
        assert_eq!(evs[1].kind, SequenceKind::Escape);
        assert_eq!(evs[1].final_byte, b'D');
    }

    #[test]
    fn test_escape_followed_by_text_recovers() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\x1b\u{e9}t");

        assert!(sequences(&tokens).is_empty());
        assert_eq!(text(&tokens), "\u{e9}t");
    }

    #[test]
    fn test_apc_is_ignored() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\x1b_hidden\x1b\\ok");

        assert_eq!(text(&tokens), "ok");
        assert!(parser.is_ground());
    }

    #[test]
    fn test_escape_intermediate() {
        let mut parser = VtParser::new();
        let tokens = parser.feed_str("\x1b#8\x1b(B");
        let evs = sequences(&tokens);

        assert_eq!(evs[0].intermediates, vec![b'#']);
        assert_eq!(evs[0].final_byte, b'8');
        assert_eq!(evs[1].intermediates, vec![b'(']);
        assert_eq!(evs[1].final_byte, b'B');
    }

    #[test]
    fn test_reset_drops_partial_sequence() {
        let mut parser = VtParser::new();
        parser.feed_str("\x1b[12");
        assert!(!parser.is_ground());
        parser.reset();
        let tokens = parser.feed_str("H");
        assert_eq!(text(&tokens), "H");
    }
}
