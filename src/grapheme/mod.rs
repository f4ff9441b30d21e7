//! Emoji grapheme classifier
//!
//! Decides whether a codepoint continues the emoji sequence already stored in
//! a cell. The answer comes from a prefix trie built once from the table in
//! [`table`]; it is queried for every inserted character, so lookups walk
//! borrowed slices and never allocate.
//!
//! ```text
//! root ─ U+1F468 ─ U+200D ─ U+1F469 ─ U+200D ─ U+1F466   (family)
//!      └ U+1F1FA ─ U+1F1F8                               (flag: US)
//! ```

mod table;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// Arena slot: a contiguous run of edges in [`EmojiTrie::edges`].
#[derive(Clone, Copy, Debug)]
struct Node {
    first_edge: u32,
    edge_count: u32,
    /// A complete known sequence ends here
    terminal: bool,
}

#[derive(Clone, Copy, Debug)]
struct Edge {
    codepoint: u32,
    child: u32,
}

/// Read-only prefix matcher over known emoji sequences.
///
/// Nodes live in an arena addressed by index; edges of each node are sorted by
/// codepoint so a step is a binary search.
#[derive(Debug)]
pub struct EmojiTrie {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    max_len: usize,
    /// Codepoints seen at position 1 or later of some sequence, sorted.
    combining: Vec<u32>,
}

const ROOT: u32 = 0;

impl EmojiTrie {
    /// Build from the built-in table.
    pub fn build() -> Self {
        Self::from_sequences(table::sequences())
    }

    /// Build from an arbitrary set of sequences. Sequences shorter than two
    /// codepoints are skipped: a lone codepoint is never a multi-codepoint
    /// grapheme.
    pub fn from_sequences<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u32]>,
    {
        let mut children: Vec<BTreeMap<u32, usize>> = vec![BTreeMap::new()];
        let mut terminal = vec![false];
        let mut combining = BTreeSet::new();
        let mut max_len = 0;

        for seq in sequences {
            let seq = seq.as_ref();
            if seq.len() < 2 {
                continue;
            }
            max_len = max_len.max(seq.len());

            let mut node = 0usize;
            for (i, &cp) in seq.iter().enumerate() {
                if i > 0 {
                    combining.insert(cp);
                }
                node = match children[node].get(&cp) {
                    Some(&next) => next,
                    None => {
                        let next = children.len();
                        children.push(BTreeMap::new());
                        terminal.push(false);
                        children[node].insert(cp, next);
                        next
                    }
                };
            }
            terminal[node] = true;
        }

        let mut nodes = Vec::with_capacity(children.len());
        let mut edges = Vec::new();
        for (map, &is_terminal) in children.iter().zip(&terminal) {
            nodes.push(Node {
                first_edge: edges.len() as u32,
                edge_count: map.len() as u32,
                terminal: is_terminal,
            });
            edges.extend(map.iter().map(|(&codepoint, &child)| Edge {
                codepoint,
                child: child as u32,
            }));
        }

        Self {
            nodes,
            edges,
            max_len,
            combining: combining.into_iter().collect(),
        }
    }

    fn step(&self, node: u32, cp: u32) -> Option<u32> {
        let node = self.nodes[node as usize];
        let start = node.first_edge as usize;
        let edges = &self.edges[start..start + node.edge_count as usize];
        edges
            .binary_search_by_key(&cp, |e| e.codepoint)
            .ok()
            .map(|i| edges[i].child)
    }

    fn walk(&self, seq: impl Iterator<Item = char>) -> Option<u32> {
        seq.into_iter()
            .try_fold(ROOT, |node, c| self.step(node, c as u32))
    }

    /// Whether `current` followed by `next` is a prefix of (or equal to) a
    /// known sequence. Walks longer than the longest known sequence are
    /// rejected before touching the trie.
    pub fn extends(&self, current: &[char], next: char) -> bool {
        if current.len() + 1 > self.max_len {
            return false;
        }
        self.walk(current.iter().copied().chain(std::iter::once(next)))
            .is_some()
    }

    /// Whether `seq` is exactly one of the known sequences.
    pub fn is_complete(&self, seq: &[char]) -> bool {
        if seq.len() > self.max_len {
            return false;
        }
        self.walk(seq.iter().copied())
            .map_or(false, |node| self.nodes[node as usize].terminal)
    }

    /// Whether `c` ever appears after the first position of a known sequence.
    pub fn is_combining(&self, c: char) -> bool {
        self.combining.binary_search(&(c as u32)).is_ok()
    }

    /// Length of the longest known sequence.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

static EMOJI_TRIE: OnceLock<EmojiTrie> = OnceLock::new();

/// The process-wide trie, built on first use.
pub fn trie() -> &'static EmojiTrie {
    EMOJI_TRIE.get_or_init(EmojiTrie::build)
}

/// Whether `next` belongs in the same cell as `current`.
pub fn extends(current: &[char], next: char) -> bool {
    trie().extends(current, next)
}

pub fn is_complete(seq: &[char]) -> bool {
    trie().is_complete(seq)
}

pub fn is_emoji_combining(c: char) -> bool {
    trie().is_combining(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(cp: u32) -> char {
        char::from_u32(cp).unwrap()
    }

    #[test]
    fn test_family_prefix_walk() {
        let man = ch(0x1F468);
        let zwj = ch(0x200D);
        let woman = ch(0x1F469);

        assert!(extends(&[], man));
        assert!(extends(&[man], zwj));
        assert!(extends(&[man, zwj], woman));
        assert!(!extends(&[man, zwj, woman], 'A'));
    }

    #[test]
    fn test_plain_text_does_not_extend() {
        assert!(!extends(&['a'], 'b'));
        assert!(!extends(&[], 'a'));
        assert!(!extends(&['1'], '2'));
    }

    #[test]
    fn test_regional_indicators_pair_once() {
        let r = ch(0x1F1FA);
        let s = ch(0x1F1F8);
        assert!(extends(&[r], s));
        assert!(is_complete(&[r, s]));
        // A third indicator starts a new flag.
        assert!(!extends(&[r, s], r));

        // Unassigned pairs also join.
        let z = ch(0x1F1FF);
        assert!(extends(&[z], z));
    }

    #[test]
    fn test_keycap_and_skin_tone() {
        assert!(extends(&['#'], ch(0xFE0F)));
        assert!(extends(&['#', ch(0xFE0F)], ch(0x20E3)));
        assert!(extends(&['7'], ch(0x20E3)));

        let wave = ch(0x1F44B);
        assert!(extends(&[wave], ch(0x1F3FD)));
        assert!(!extends(&[ch(0x1F600)], ch(0x1F3FD)));
    }

    #[test]
    fn test_longest_sequence_fits_cell() {
        // kiss: woman (tone), heart, kiss mark, man (tone)
        let seq: Vec<char> = [
            0x1F469, 0x1F3FB, 0x200D, 0x2764, 0xFE0F, 0x200D, 0x1F48B, 0x200D, 0x1F468, 0x1F3FC,
        ]
        .into_iter()
        .map(ch)
        .collect();
        for i in 0..seq.len() {
            assert!(extends(&seq[..i], seq[i]), "prefix {} failed", i);
        }
        assert!(is_complete(&seq));
        assert_eq!(trie().max_len(), seq.len());
        assert!(trie().max_len() <= crate::core::term::CellContent::MAX_LEN);
    }

    #[test]
    fn test_overflow_is_rejected() {
        let long = vec![ch(0x1F468); trie().max_len()];
        assert!(!extends(&long, ch(0x200D)));
    }

    #[test]
    fn test_prefix_is_not_complete() {
        let man = ch(0x1F468);
        let zwj = ch(0x200D);
        assert!(!is_complete(&[man, zwj]));
        assert!(!is_complete(&[man]));
    }

    #[test]
    fn test_combining_set() {
        assert!(is_emoji_combining(ch(0x200D)));
        assert!(is_emoji_combining(ch(0xFE0F)));
        assert!(is_emoji_combining(ch(0x1F3FB)));
        assert!(!is_emoji_combining('a'));
    }

    #[test]
    fn test_custom_table_shape() {
        // "ab", "ac", "d e" style table
        let trie = EmojiTrie::from_sequences([vec![1u32, 2], vec![1, 3], vec![4, 5, 6], vec![7]]);
        // root, 1, 2, 3, 4, 5, 6; the lone 7 is skipped
        assert_eq!(trie.node_count(), 7);
        assert_eq!(trie.max_len(), 3);
        assert!(!trie.extends(&[], ch(7)));
        assert!(trie.is_complete(&[ch(1), ch(3)]));
        assert!(!trie.extends(&[ch(4), ch(5), ch(6)], ch(1)));
    }

    #[test]
    fn test_lookups_leave_trie_untouched() {
        let before = trie().node_count();
        for cp in 0x1F300..0x1F320 {
            let _ = extends(&[ch(cp)], ch(0x200D));
        }
        assert_eq!(trie().node_count(), before);
    }

    #[test]
    fn test_concurrent_first_use() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| trie() as *const EmojiTrie as usize))
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }
}
