//! Immutable redirect table and its atomically swappable handle.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::domain::entities::RedirectEntry;

/// Nested redirect map: site prefix → exact request path → entry.
///
/// Built once by the loader and never mutated afterwards. Every known prefix
/// has a (possibly empty) sub-table.
#[derive(Debug, Clone, Default)]
pub struct StaticTable {
    prefixes: HashMap<String, HashMap<String, RedirectEntry>>,
}

impl StaticTable {
    /// Creates a table with an empty sub-table for each known prefix.
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| (p.into(), HashMap::new()))
                .collect(),
        }
    }

    /// Inserts an entry, replacing any previous one for the same path.
    ///
    /// Returns `false` if the prefix is not known to this table.
    pub(crate) fn insert(&mut self, prefix: &str, path: String, entry: RedirectEntry) -> bool {
        match self.prefixes.get_mut(prefix) {
            Some(paths) => {
                paths.insert(path, entry);
                true
            }
            None => false,
        }
    }

    pub fn lookup(&self, prefix: &str, path: &str) -> Option<&RedirectEntry> {
        self.prefixes.get(prefix)?.get(path)
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains_key(prefix)
    }

    /// Number of entries under one prefix (0 for unknown prefixes).
    pub fn prefix_len(&self, prefix: &str) -> usize {
        self.prefixes.get(prefix).map_or(0, HashMap::len)
    }

    /// Total number of entries across all prefixes.
    pub fn len(&self) -> usize {
        self.prefixes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.keys().map(String::as_str)
    }
}

/// Shared reference to the active [`StaticTable`].
///
/// Starts empty. Publishing replaces the whole table in a single atomic store,
/// so readers see either the previous table or the new one, never a mix.
/// Cloning the handle shares the same slot.
#[derive(Clone, Default)]
pub struct StaticTableHandle {
    active: Arc<ArcSwapOption<StaticTable>>,
}

impl StaticTableHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active table, if one has been published.
    pub fn current(&self) -> Option<Arc<StaticTable>> {
        self.active.load_full()
    }

    /// Atomically replaces the active table.
    pub fn publish(&self, table: StaticTable) {
        self.active.store(Some(Arc::new(table)));
    }

    pub fn is_loaded(&self) -> bool {
        self.active.load().is_some()
    }

    /// Looks up an entry in the active table.
    pub fn lookup(&self, prefix: &str, path: &str) -> Option<RedirectEntry> {
        let guard = self.active.load();
        guard.as_ref()?.lookup(prefix, path).cloned()
    }
}
