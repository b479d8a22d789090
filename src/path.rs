//! Dotted, optionally indexed query paths such as `servers.alpha.ip` or
//! `products[1].name`.

#[cfg(test)]
#[path = "./path_tests.rs"]
mod tests;

use crate::table::Table;
use crate::value::Item;

/// One step of a [`Path`]: a key, optionally followed by an array index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<'p> {
    pub key: &'p str,
    pub index: Option<usize>,
}

impl<'p> Segment<'p> {
    fn parse(text: &'p str) -> Option<Self> {
        let (key, index) = match text.split_once('[') {
            None => (text, None),
            Some((key, rest)) => {
                let digits = rest.strip_suffix(']')?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                (key, Some(digits.parse().ok()?))
            }
        };
        if key.is_empty() || key.contains(']') {
            return None;
        }
        Some(Segment { key, index })
    }

    /// Looks this segment up in `table`.
    fn lookup<'t>(&self, table: &'t Table) -> Option<&'t Item> {
        let item = table.get(self.key)?;
        match self.index {
            None => Some(item),
            Some(i) => item.as_array()?.get(i),
        }
    }
}

/// A parsed query path.
///
/// Keys are split on `.`; a key may carry one `[N]` index selecting an
/// element of the array it names. Keys containing `.`, `[` or `]` cannot be
/// addressed through a path; use [`Table::get`] for those.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<'p> {
    segments: Vec<Segment<'p>>,
}

impl<'p> Path<'p> {
    /// Parses a query path, returning [`None`] if it is malformed: an empty
    /// segment, an empty or non-numeric index, an unclosed bracket, or text
    /// after the closing bracket.
    pub fn parse(path: &'p str) -> Option<Self> {
        let segments = path
            .split('.')
            .map(Segment::parse)
            .collect::<Option<Vec<_>>>()?;
        Some(Path { segments })
    }

    pub fn segments(&self) -> &[Segment<'p>] {
        &self.segments
    }

    /// Walks the path from `root`. Any missing key, out of range index, or
    /// attempt to descend through a non-table yields [`None`].
    pub fn resolve<'t>(&self, root: &'t Table) -> Option<&'t Item> {
        let (last, parents) = self.segments.split_last()?;
        let mut table = root;
        for segment in parents {
            table = segment.lookup(table)?.as_table()?;
        }
        last.lookup(table)
    }
}

/// Resolves `path` against `root`; a malformed path resolves to nothing.
pub fn resolve<'t>(root: &'t Table, path: &str) -> Option<&'t Item> {
    Path::parse(path)?.resolve(root)
}
