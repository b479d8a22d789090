//! Typed, path-based lookups on a parsed document.
//!
//! Absence is an ordinary outcome here, not an error: scalar getters return
//! [`None`] for a missing path and for a value of another type alike,
//! [`Table::get_list`] returns an empty `Vec`, and [`Table::get_table`]
//! returns a shared empty table.

#[cfg(test)]
#[path = "./query_tests.rs"]
mod tests;

use crate::array::Array;
use crate::datetime::Datetime;
use crate::path;
use crate::table::{EMPTY_TABLE, Table};
use crate::value::{Item, Value};

/// Conversion from a borrowed [`Item`] to a typed value.
///
/// Returns [`None`] when the item holds a different type; no conversion
/// between types is ever attempted.
///
/// # Examples
///
/// ```
/// use toml_query::FromItem;
///
/// let root = toml_query::parse("n = 5\ns = \"five\"")?;
/// let n = root.get("n").unwrap();
/// assert_eq!(i64::from_item(n), Some(5));
/// assert_eq!(<&str>::from_item(n), None);
/// # Ok::<(), toml_query::Error>(())
/// ```
pub trait FromItem<'a>: Sized {
    fn from_item(item: &'a Item) -> Option<Self>;
}

impl<'a> FromItem<'a> for &'a Item {
    fn from_item(item: &'a Item) -> Option<Self> {
        Some(item)
    }
}

impl<'a> FromItem<'a> for &'a str {
    fn from_item(item: &'a Item) -> Option<Self> {
        match item.value() {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl<'a> FromItem<'a> for String {
    fn from_item(item: &'a Item) -> Option<Self> {
        <&str>::from_item(item).map(str::to_owned)
    }
}

impl<'a> FromItem<'a> for i64 {
    fn from_item(item: &'a Item) -> Option<Self> {
        match item.value() {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl<'a> FromItem<'a> for f64 {
    fn from_item(item: &'a Item) -> Option<Self> {
        match item.value() {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl<'a> FromItem<'a> for bool {
    fn from_item(item: &'a Item) -> Option<Self> {
        match item.value() {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl<'a> FromItem<'a> for &'a Datetime {
    fn from_item(item: &'a Item) -> Option<Self> {
        match item.value() {
            Value::Datetime(d) => Some(d),
            _ => None,
        }
    }
}

impl<'a> FromItem<'a> for Datetime {
    fn from_item(item: &'a Item) -> Option<Self> {
        <&Datetime>::from_item(item).copied()
    }
}

impl<'a> FromItem<'a> for &'a Array {
    fn from_item(item: &'a Item) -> Option<Self> {
        match item.value() {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl<'a> FromItem<'a> for &'a Table {
    fn from_item(item: &'a Item) -> Option<Self> {
        match item.value() {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }
}

/// All or nothing: an array converts only if every element does.
impl<'a, T: FromItem<'a>> FromItem<'a> for Vec<T> {
    fn from_item(item: &'a Item) -> Option<Self> {
        <&Array>::from_item(item)?.iter().map(T::from_item).collect()
    }
}

impl Table {
    /// Resolves a dotted, optionally indexed path such as `a.b[0].c`.
    ///
    /// Returns [`None`] when any part of the path is missing, when it tries
    /// to descend through a value that is not a table, or when the path
    /// itself is malformed.
    pub fn resolve(&self, path: &str) -> Option<&Item> {
        path::resolve(self, path)
    }

    /// Resolves `path` and converts the value with [`FromItem`].
    pub fn get_as<'a, T: FromItem<'a>>(&'a self, path: &str) -> Option<T> {
        T::from_item(self.resolve(path)?)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get_as(path)
    }

    pub fn get_integer(&self, path: &str) -> Option<i64> {
        self.get_as(path)
    }

    /// Integers are not widened: a path holding `1` yields [`None`].
    pub fn get_float(&self, path: &str) -> Option<f64> {
        self.get_as(path)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get_as(path)
    }

    pub fn get_datetime(&self, path: &str) -> Option<&Datetime> {
        self.get_as(path)
    }

    pub fn get_array(&self, path: &str) -> Option<&Array> {
        self.get_as(path)
    }

    /// Returns the array at `path` with every element converted to `T`.
    ///
    /// The result is empty when the path is missing, does not name an
    /// array, or holds any element that is not a `T`.
    ///
    /// ```
    /// let root = toml_query::parse("ports = [80, 443]\nmixed = [1, \"x\"]")?;
    /// assert_eq!(root.get_list::<i64>("ports"), [80, 443]);
    /// assert!(root.get_list::<i64>("mixed").is_empty());
    /// assert!(root.get_list::<&str>("absent").is_empty());
    /// # Ok::<(), toml_query::Error>(())
    /// ```
    pub fn get_list<'a, T: FromItem<'a>>(&'a self, path: &str) -> Vec<T> {
        self.get_as::<Vec<T>>(path).unwrap_or_default()
    }

    /// Returns the table at `path`, or an empty table when the path is
    /// missing or names a value of another type.
    ///
    /// ```
    /// let root = toml_query::parse("[group]\nkey = \"value\"")?;
    /// assert_eq!(root.get_table("group").get_str("key"), Some("value"));
    /// assert!(root.get_table("nope").is_empty());
    /// # Ok::<(), toml_query::Error>(())
    /// ```
    pub fn get_table(&self, path: &str) -> &Table {
        self.get_as(path).unwrap_or(&EMPTY_TABLE)
    }
}
