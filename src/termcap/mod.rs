//! Terminal capability database
//!
//! Loads termcap-style descriptions of terminal types and answers capability
//! queries against them, following `tc=`/`use=` inheritance.
//!
//! ```text
//! vt100|dec vt100:am:co#80:bl=^G:
//! vt100-nam|vt100 without margins:am@:tc=vt100:
//! ```
//!
//! Resolved entries are cached per requested name and shared as
//! `Arc<ResolvedEntry>`. The database is `Send + Sync`; lookups take a read
//! lock and [`TermcapDb::reload`] swaps in the re-read file under the write
//! lock.

mod parse;
mod resolve;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info};

pub use parse::{parse_number, unescape, Field, FieldValue, Record};
pub use resolve::{CapValue, Capability, ResolveWarning, ResolvedEntry};

#[derive(Error, Debug)]
pub enum TermcapError {
    #[error("Failed to read capability file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Terminal type not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, TermcapError>;

#[derive(Default)]
struct Inner {
    records: Vec<Record>,
    /// Alias to record index
    index: HashMap<String, usize>,
    cache: HashMap<String, Arc<ResolvedEntry>>,
}

impl Inner {
    fn from_records(records: Vec<Record>) -> Self {
        let mut index = HashMap::new();
        for (i, record) in records.iter().enumerate() {
            for alias in &record.aliases {
                match index.get(alias) {
                    Some(&first) => debug!(
                        "duplicate terminal name {} (record {}), keeping record {}",
                        alias, i, first
                    ),
                    None => {
                        index.insert(alias.clone(), i);
                    }
                }
            }
        }
        Self {
            records,
            index,
            cache: HashMap::new(),
        }
    }
}

/// Capability database
pub struct TermcapDb {
    /// Source file, when loaded from disk
    path: Option<PathBuf>,
    inner: RwLock<Inner>,
}

impl TermcapDb {
    /// Load and parse a capability file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = Inner::from_records(read_records(&path)?);
        info!(
            "Loaded {} terminal types from {}",
            inner.records.len(),
            path.display()
        );
        Ok(Self {
            path: Some(path),
            inner: RwLock::new(inner),
        })
    }

    /// Build a database from capability source text.
    pub fn parse(text: &str) -> Self {
        Self {
            path: None,
            inner: RwLock::new(Inner::from_records(parse::parse_records(text))),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Re-read the source file and drop every cached entry. Databases built
    /// from text have nothing to re-read and are left as they are.
    pub fn reload(&self) -> Result<()> {
        let Some(path) = &self.path else {
            debug!("reload requested for in-memory capability database");
            return Ok(());
        };
        // Read outside the lock so queries keep running meanwhile
        let fresh = Inner::from_records(read_records(path)?);
        let count = fresh.records.len();
        *self.inner.write() = fresh;
        info!("Reloaded {} terminal types from {}", count, path.display());
        Ok(())
    }

    /// Resolved entry for a terminal type name or alias.
    pub fn resolve(&self, name: &str) -> Result<Arc<ResolvedEntry>> {
        if let Some(entry) = self.inner.read().cache.get(name) {
            return Ok(Arc::clone(entry));
        }

        let mut inner = self.inner.write();
        // Another thread may have filled it in between the locks
        if let Some(entry) = inner.cache.get(name) {
            return Ok(Arc::clone(entry));
        }
        let entry = resolve::resolve(name, &inner.records, &inner.index)
            .ok_or_else(|| TermcapError::NotFound(name.to_string()))?;
        let entry = Arc::new(entry);
        inner.cache.insert(name.to_string(), Arc::clone(&entry));
        Ok(entry)
    }

    /// Look up one capability of a terminal type.
    pub fn query(&self, term: &str, cap: &str) -> Result<Capability> {
        Ok(self.resolve(term)?.get(cap))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().index.contains_key(name)
    }

    /// Primary names of all records, in file order
    pub fn names(&self) -> Vec<String> {
        self.inner
            .read()
            .records
            .iter()
            .map(|r| r.name().to_string())
            .collect()
    }
}

fn read_records(path: &Path) -> Result<Vec<Record>> {
    let bytes = fs::read(path).map_err(|source| TermcapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse::parse_records(&String::from_utf8_lossy(&bytes)))
}
