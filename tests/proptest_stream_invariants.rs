//! Property-based invariant tests for the protocol core.
//!
//! Verifies:
//! 1. Chunking: any split of an input stream yields the same state and
//!    notifications as feeding it whole
//! 2. Byte chunking: the same holds for raw UTF-8 split mid-character
//! 3. Cursor bounds: the cursor and margins never leave the screen
//! 4. Scanner recovery: after CAN the scanner is back in ground state
//! 5. Termcap: resolution terminates on arbitrary inheritance graphs and
//!    every entry keeps its own capabilities

use std::fmt::Write as _;
use std::sync::Arc;

use proptest::prelude::*;
use termcore::core::term::VtParser;
use termcore::{Capability, CapValue, Session, TermcapDb};

const CAPS: &str = "\
vt100|dec vt100:am:co#80:li#24:u8=\\E[?1;0c:
";

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{1,6}",
        Just("\r\n".to_string()),
        Just("\x07".to_string()),
        Just("\x08\t".to_string()),
        (1u16..30, 1u16..90).prop_map(|(r, c)| format!("\x1b[{};{}H", r, c)),
        (0u16..4).prop_map(|n| format!("\x1b[{}J", n)),
        (0u16..3).prop_map(|n| format!("\x1b[{}K", n)),
        (0u16..5).prop_map(|n| format!("\x1b[{}L\x1b[{}M", n, n)),
        (0u16..5).prop_map(|n| format!("\x1b[{}@\x1b[{}P", n, n)),
        (1u16..10, 1u16..10).prop_map(|(t, b)| format!("\x1b[{};{}r", t, b)),
        prop_oneof![Just(1u16), Just(4), Just(7), Just(31), Just(42)]
            .prop_map(|n| format!("\x1b[{}m", n)),
        Just("\x1b[38;5;196m\x1b[0m".to_string()),
        Just("\x1b[?7l".to_string()),
        Just("\x1b[?7h".to_string()),
        Just("\x1b[?6h".to_string()),
        Just("\x1b[4h".to_string()),
        Just("\x1b7\x1b8".to_string()),
        Just("\x1bD\x1bM\x1bE".to_string()),
        Just("\x1b[6n".to_string()),
        Just("\x1b[c".to_string()),
        "[a-z]{0,8}".prop_map(|t| format!("\x1b]2;{}\x07", t)),
        "[a-z]{0,8}".prop_map(|t| format!("\x1b]0;{}\x1b\\", t)),
        Just("\x1bP+q436f\x1b\\".to_string()),
        Just("\x1b[12\x18".to_string()),
        Just("\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}".to_string()),
        Just("\u{1F1FA}\u{1F1F8}".to_string()),
        Just("\u{2764}\u{FE0F}".to_string()),
        Just("e\u{301}".to_string()),
        Just("\u{4E2D}\u{6587}".to_string()),
    ]
}

fn arb_stream() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_fragment(), 0..24).prop_map(|parts| parts.concat())
}

fn db() -> Option<Arc<TermcapDb>> {
    Some(Arc::new(TermcapDb::parse(CAPS)))
}

fn split_points(len: usize, raw: Vec<usize>) -> Vec<usize> {
    let mut points: Vec<usize> = raw.into_iter().map(|p| p % (len + 1)).collect();
    points.push(0);
    points.push(len);
    points.sort_unstable();
    points.dedup();
    points
}

// ── 1. Chunking ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn chunked_feed_matches_whole(
        stream in arb_stream(),
        raw_splits in prop::collection::vec(any::<usize>(), 0..6),
    ) {
        let chars: Vec<char> = stream.chars().collect();

        let mut whole = Session::new(12, 6, "vt100", db());
        let expected = whole.feed(&chars);

        let mut chunked = Session::new(12, 6, "vt100", db());
        let mut got = Vec::new();
        for window in split_points(chars.len(), raw_splits).windows(2) {
            got.extend(chunked.feed(&chars[window[0]..window[1]]));
        }

        prop_assert_eq!(got, expected);
        prop_assert_eq!(chunked.state, whole.state);
    }
}

// ── 2. Byte chunking ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn byte_chunks_match_whole(
        stream in arb_stream(),
        raw_splits in prop::collection::vec(any::<usize>(), 0..6),
    ) {
        let bytes = stream.as_bytes();

        let mut whole = Session::new(12, 6, "vt100", db());
        let expected = whole.feed_bytes(bytes);

        let mut chunked = Session::new(12, 6, "vt100", db());
        let mut got = Vec::new();
        for window in split_points(bytes.len(), raw_splits).windows(2) {
            got.extend(chunked.feed_bytes(&bytes[window[0]..window[1]]));
        }

        prop_assert_eq!(got, expected);
        prop_assert_eq!(chunked.state, whole.state);
    }
}

// ── 3. Cursor bounds ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn cursor_stays_on_screen(
        stream in arb_stream(),
        cols in 1u16..20,
        rows in 1u16..10,
    ) {
        let mut session = Session::new(cols, rows, "vt100", db());
        session.feed_str(&stream);
        let state = &session.state;
        // One past the last column while a wrap is pending
        prop_assert!(state.cursor.col <= cols);
        prop_assert!(state.cursor.row < rows);
        prop_assert!(state.scroll_region.0 < state.scroll_region.1 || rows == 1);
        prop_assert!(state.scroll_region.1 < rows);
    }
}

// ── 4. Scanner recovery ───────────────────────────────────────────────

proptest! {
    #[test]
    fn cancel_returns_to_ground(stream in arb_stream(), junk in "[\\x1b\\[0-9;?P\\]]{0,12}") {
        let mut parser = VtParser::new();
        parser.feed_str(&stream);
        parser.feed_str(&junk);
        parser.feed_str("\x18");
        prop_assert!(parser.is_ground());
    }
}

// ── 5. Termcap inheritance ────────────────────────────────────────────

fn arb_graph() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..8).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(0..n + 2, 0..3), n)
    })
}

proptest! {
    #[test]
    fn resolution_terminates(graph in arb_graph()) {
        let mut text = String::new();
        for (i, parents) in graph.iter().enumerate() {
            write!(text, "t{}:n{}#{}:", i, i, i).unwrap();
            for parent in parents {
                // Indices past the end name undefined entries
                write!(text, "tc=t{}:", parent).unwrap();
            }
            text.push('\n');
        }

        let db = TermcapDb::parse(&text);
        for i in 0..graph.len() {
            let entry = db.resolve(&format!("t{}", i)).unwrap();
            prop_assert_eq!(
                entry.get(&format!("n{}", i)),
                Capability::Present(CapValue::Number(i as i64))
            );
            for &parent in &graph[i] {
                if parent < graph.len() {
                    let parent_cap = format!("n{}", parent);
                    prop_assert!(entry.get(&parent_cap).is_present());
                }
            }
        }
    }
}
