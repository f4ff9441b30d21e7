//! Inheritance resolution
//!
//! Merges a record with its `tc=`/`use=` ancestors. The walk is an explicit
//! depth-first traversal: the child's own fields win, then each parent in
//! source order together with its ancestors. A field decided once (including
//! a `name@` cancellation) is never overridden later in the walk.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use tracing::warn;

use super::parse::{FieldValue, Record};

/// A resolved capability value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CapValue {
    Flag,
    Number(i64),
    /// Raw bytes; may be empty or contain NUL.
    Str(Vec<u8>),
}

/// Result of a single capability lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Capability {
    NotPresent,
    Present(CapValue),
}

impl Capability {
    pub fn is_present(&self) -> bool {
        matches!(self, Capability::Present(_))
    }
}

/// Problems met while resolving; resolution always completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveWarning {
    /// `from` inherits from `to`, which is already being resolved
    InheritanceCycle { from: String, to: String },
    UnknownParent { from: String, parent: String },
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveWarning::InheritanceCycle { from, to } => {
                write!(f, "inheritance cycle: {} -> {}", from, to)
            }
            ResolveWarning::UnknownParent { from, parent } => {
                write!(f, "{} inherits from unknown type {}", from, parent)
            }
        }
    }
}

/// A terminal type with all inherited capabilities merged in.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedEntry {
    /// The name the entry was requested by
    pub name: String,
    pub aliases: Vec<String>,
    caps: BTreeMap<String, CapValue>,
    warnings: Vec<ResolveWarning>,
}

impl ResolvedEntry {
    pub fn get(&self, cap: &str) -> Capability {
        match self.caps.get(cap) {
            Some(value) => Capability::Present(value.clone()),
            None => Capability::NotPresent,
        }
    }

    pub fn flag(&self, cap: &str) -> bool {
        self.caps.contains_key(cap)
    }

    pub fn number(&self, cap: &str) -> Option<i64> {
        match self.caps.get(cap) {
            Some(CapValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn string(&self, cap: &str) -> Option<&[u8]> {
        match self.caps.get(cap) {
            Some(CapValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// All capabilities, sorted by name
    pub fn capabilities(&self) -> impl Iterator<Item = (&str, &CapValue)> {
        self.caps.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn warnings(&self) -> &[ResolveWarning] {
        &self.warnings
    }
}

enum Frame {
    Enter(usize),
    Exit(usize),
}

/// Resolve `name` against `records`. `index` maps every alias to its record.
pub(super) fn resolve(
    name: &str,
    records: &[Record],
    index: &HashMap<String, usize>,
) -> Option<ResolvedEntry> {
    let &root = index.get(name)?;

    let mut decided: HashSet<&str> = HashSet::new();
    let mut caps = BTreeMap::new();
    let mut warnings = Vec::new();
    let mut visited = HashSet::new();
    let mut on_path = HashSet::new();
    let mut stack = vec![Frame::Enter(root)];

    while let Some(frame) = stack.pop() {
        let idx = match frame {
            Frame::Exit(idx) => {
                on_path.remove(&idx);
                continue;
            }
            Frame::Enter(idx) => idx,
        };
        // Reached again through another branch
        if !visited.insert(idx) {
            continue;
        }
        on_path.insert(idx);

        let record = &records[idx];
        for field in &record.fields {
            if !decided.insert(field.name.as_str()) {
                continue;
            }
            let value = match &field.value {
                FieldValue::Flag => CapValue::Flag,
                FieldValue::Number(n) => CapValue::Number(*n),
                FieldValue::Str(s) => CapValue::Str(s.clone()),
                FieldValue::Cancelled => continue,
            };
            caps.insert(field.name.clone(), value);
        }

        let mut next = Vec::with_capacity(record.parents.len());
        for parent in &record.parents {
            match index.get(parent.as_str()) {
                None => {
                    warn!("{}: unknown parent terminal type {}", record.name(), parent);
                    warnings.push(ResolveWarning::UnknownParent {
                        from: record.name().to_string(),
                        parent: parent.clone(),
                    });
                }
                Some(&p) if on_path.contains(&p) => {
                    warn!("{}: inheritance cycle through {}", record.name(), parent);
                    warnings.push(ResolveWarning::InheritanceCycle {
                        from: record.name().to_string(),
                        to: parent.clone(),
                    });
                }
                Some(&p) => next.push(p),
            }
        }

        stack.push(Frame::Exit(idx));
        // Earlier parents must be walked first
        stack.extend(next.into_iter().rev().map(Frame::Enter));
    }

    Some(ResolvedEntry {
        name: name.to_string(),
        aliases: records[root].aliases.clone(),
        caps,
        warnings,
    })
}
