//! Source locations.

#[cfg(test)]
#[path = "./span_tests.rs"]
mod tests;

use std::ops::Range;

/// A half-open byte range `start..end` within the parsed text.
///
/// Every parsed [`Item`](crate::Item) and [`Key`](crate::Key) remembers the
/// span it was read from, and every [`Error`](crate::Error) points at one.
/// Offsets are 32-bit, which is why inputs are capped in size.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// True when the span covers no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    /// The span as a `usize` range, for slicing the source text.
    #[inline]
    pub fn range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn join(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl From<Range<u32>> for Span {
    fn from(r: Range<u32>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(s: Span) -> Self {
        s.range()
    }
}
