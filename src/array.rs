#[cfg(test)]
#[path = "./array_tests.rs"]
mod tests;

use crate::value::Item;

/// An ordered sequence of TOML [`Item`]s.
///
/// Elements may be of mixed types. Indexing with [`get`](Self::get) never
/// panics; an out of range index yields [`None`].
#[derive(Clone, Default, PartialEq)]
pub struct Array {
    values: Vec<Item>,
}

impl Array {
    /// Creates an empty array.
    #[inline]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Creates an array containing a single value.
    pub(crate) fn with_single(value: Item) -> Self {
        Self {
            values: vec![value],
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, value: Item) {
        self.values.push(value);
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the array contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns a reference to the element at the given index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.values.get(index)
    }

    #[inline]
    pub(crate) fn last_mut(&mut self) -> Option<&mut Item> {
        self.values.last_mut()
    }

    /// Returns an iterator over references to the elements.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.values.iter()
    }

    /// Returns the contents as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Item] {
        &self.values
    }
}

impl std::fmt::Debug for Array {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.values).finish()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for Array {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
