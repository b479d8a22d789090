#[cfg(test)]
#[path = "./table_tests.rs"]
mod tests;

use crate::value::{Item, Key};
use foldhash::HashMap;

type TableEntry = (Key, Item);

/// Tables with at least this many entries get a hash index alongside the
/// entry list; smaller tables are scanned linearly.
pub(crate) const INDEXED_TABLE_THRESHOLD: usize = 6;

/// A TOML table: key-value pairs kept in insertion order.
///
/// Lookups on small tables scan the entry list; once a table reaches
/// [`INDEXED_TABLE_THRESHOLD`] entries a [`foldhash`] index is built so
/// that documents with wide tables stay linear to parse.
///
/// Equality ignores both spans and entry order.
#[derive(Clone, Default)]
pub struct Table {
    entries: Vec<TableEntry>,
    index: Option<HashMap<String, usize>>,
}

/// Shared empty table handed out for absent lookups.
pub(crate) static EMPTY_TABLE: Table = Table::new();

impl Table {
    /// Creates an empty table.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: None,
        }
    }

    /// Inserts a key-value pair, returning its entry index. Does **not**
    /// check for duplicates.
    pub(crate) fn insert(&mut self, key: Key, value: Item) -> usize {
        let idx = self.entries.len();
        if let Some(index) = &mut self.index {
            index.insert(key.name.clone(), idx);
        } else if idx + 1 >= INDEXED_TABLE_THRESHOLD {
            let mut index = HashMap::default();
            index.reserve(idx + 1);
            for (i, (k, _)) in self.entries.iter().enumerate() {
                index.insert(k.name.clone(), i);
            }
            index.insert(key.name.clone(), idx);
            self.index = Some(index);
        }
        self.entries.push((key, value));
        idx
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn find_index(&self, name: &str) -> Option<usize> {
        match &self.index {
            Some(index) => index.get(name).copied(),
            None => self.entries.iter().position(|(k, _)| k.name == name),
        }
    }

    /// Returns references to both key and value for `name`.
    pub fn get_key_value(&self, name: &str) -> Option<(&Key, &Item)> {
        let (key, item) = &self.entries[self.find_index(name)?];
        Some((key, item))
    }

    /// Returns a reference to the value for `name`.
    pub fn get(&self, name: &str) -> Option<&Item> {
        Some(&self.entries[self.find_index(name)?].1)
    }

    /// Returns `true` if the table contains the key.
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.find_index(name).is_some()
    }

    /// Returns a slice of all entries in insertion order.
    #[inline]
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// Returns an iterator over all entries (key-value pairs).
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, TableEntry> {
        self.entries.iter()
    }

    /// Returns an iterator over the keys in insertion order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    #[inline]
    pub(crate) fn entry_at(&self, idx: usize) -> (&Key, &Item) {
        let (key, item) = &self.entries[idx];
        (key, item)
    }

    #[inline]
    pub(crate) fn item_at_mut(&mut self, idx: usize) -> &mut Item {
        &mut self.entries[idx].1
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(&k.name).is_some_and(|o| o == v))
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a TableEntry;
    type IntoIter = std::slice::Iter<'a, TableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Table {
    type Item = TableEntry;
    type IntoIter = std::vec::IntoIter<TableEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
