#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;

use crate::{Array, Datetime, Span, Table};
use std::fmt;

// Container state recorded on each item. The parser uses it to enforce the
// table redefinition rules; it is not observable through the public API.
pub(crate) const FLAG_NONE: u8 = 0;
pub(crate) const FLAG_ARRAY: u8 = 2;
pub(crate) const FLAG_AOT: u8 = 3;
/// Implicitly created by a header such as `[a.b]` for `a`.
pub(crate) const FLAG_TABLE: u8 = 4;
pub(crate) const FLAG_DOTTED: u8 = 5;
pub(crate) const FLAG_HEADER: u8 = 6;
/// Inline tables are closed as soon as their `}` is read.
pub(crate) const FLAG_FROZEN: u8 = 7;

/// A TOML value.
///
/// Obtained from an [`Item`] via [`Item::value`]; every typed accessor in the
/// crate is an exhaustive match over this enum.
#[derive(Clone)]
pub enum Value {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// An offset date-time, local date-time, local date or local time.
    Datetime(Datetime),
    /// An array value.
    Array(Array),
    /// A table value.
    Table(Table),
}

impl Value {
    /// Returns the TOML type name (e.g. `"string"`, `"integer"`, `"table"`).
    pub fn type_str(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Datetime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            // NaN equals NaN so that parsing the same text twice compares equal.
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Datetime(a), Value::Datetime(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => s.fmt(f),
            Value::Integer(i) => i.fmt(f),
            Value::Float(v) => v.fmt(f),
            Value::Boolean(b) => b.fmt(f),
            Value::Datetime(d) => fmt::Display::fmt(d, f),
            Value::Array(a) => a.fmt(f),
            Value::Table(t) => t.fmt(f),
        }
    }
}

/// A parsed TOML value together with its source span.
///
/// Use the `as_*` methods ([`as_str`](Self::as_str),
/// [`as_integer`](Self::as_integer), [`as_table`](Self::as_table), etc.) to
/// extract a value of a specific type, or [`value`](Self::value) to match on
/// the [`Value`] enum. None of the accessors convert between types: asking a
/// string for an integer yields [`None`].
///
/// # Examples
///
/// ```
/// let table = toml_query::parse("x = 42")?;
/// let item = table.get("x").unwrap();
/// assert_eq!(item.as_integer(), Some(42));
/// assert_eq!(item.as_str(), None);
/// assert_eq!(item.type_str(), "integer");
/// # Ok::<(), toml_query::Error>(())
/// ```
#[derive(Clone)]
pub struct Item {
    value: Value,
    span: Span,
    flag: u8,
}

impl Item {
    #[inline]
    fn raw(value: Value, flag: u8, span: Span) -> Self {
        Self { value, span, flag }
    }

    #[inline]
    pub(crate) fn string(s: String, span: Span) -> Self {
        Self::raw(Value::String(s), FLAG_NONE, span)
    }

    #[inline]
    pub(crate) fn integer(i: i64, span: Span) -> Self {
        Self::raw(Value::Integer(i), FLAG_NONE, span)
    }

    #[inline]
    pub(crate) fn float(f: f64, span: Span) -> Self {
        Self::raw(Value::Float(f), FLAG_NONE, span)
    }

    #[inline]
    pub(crate) fn boolean(b: bool, span: Span) -> Self {
        Self::raw(Value::Boolean(b), FLAG_NONE, span)
    }

    #[inline]
    pub(crate) fn datetime(d: Datetime, span: Span) -> Self {
        Self::raw(Value::Datetime(d), FLAG_NONE, span)
    }

    #[inline]
    pub(crate) fn array(a: Array, span: Span) -> Self {
        Self::raw(Value::Array(a), FLAG_ARRAY, span)
    }

    /// Creates an array-of-tables value.
    #[inline]
    pub(crate) fn array_aot(a: Array, span: Span) -> Self {
        Self::raw(Value::Array(a), FLAG_AOT, span)
    }

    /// Creates an implicitly defined table.
    #[inline]
    pub(crate) fn table(t: Table, span: Span) -> Self {
        Self::raw(Value::Table(t), FLAG_TABLE, span)
    }

    /// Creates a frozen (inline) table value.
    #[inline]
    pub(crate) fn table_frozen(t: Table, span: Span) -> Self {
        Self::raw(Value::Table(t), FLAG_FROZEN, span)
    }

    /// Creates a table explicitly opened by `[header]`.
    #[inline]
    pub(crate) fn table_header(t: Table, span: Span) -> Self {
        Self::raw(Value::Table(t), FLAG_HEADER, span)
    }

    /// Creates a table created by dotted-key navigation.
    #[inline]
    pub(crate) fn table_dotted(t: Table, span: Span) -> Self {
        Self::raw(Value::Table(t), FLAG_DOTTED, span)
    }
}

impl Item {
    /// Returns the byte-offset span of this value in the source document.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the TOML type name (e.g. `"string"`, `"integer"`, `"table"`).
    #[inline]
    pub fn type_str(&self) -> &'static str {
        self.value.type_str()
    }

    /// Returns a borrowed view for pattern matching.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consumes the item, returning the value without its span.
    #[inline]
    pub fn into_value(self) -> Value {
        self.value
    }

    #[inline]
    pub(crate) fn is_table(&self) -> bool {
        self.flag >= FLAG_TABLE
    }

    #[inline]
    pub(crate) fn is_frozen(&self) -> bool {
        self.flag == FLAG_FROZEN
    }

    #[inline]
    pub(crate) fn is_aot(&self) -> bool {
        self.flag == FLAG_AOT
    }

    #[inline]
    pub(crate) fn has_header_bit(&self) -> bool {
        self.flag == FLAG_HEADER
    }

    #[inline]
    pub(crate) fn has_dotted_bit(&self) -> bool {
        self.flag == FLAG_DOTTED
    }

    /// Marks an implicitly created table as explicitly defined by a header.
    #[inline]
    pub(crate) fn set_header(&mut self, span: Span) {
        self.flag = FLAG_HEADER;
        self.span = span;
    }

    #[inline]
    pub(crate) fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The table a header or dotted key walks into through this item: the
    /// table itself, or the most recent table of an array of tables.
    pub(crate) fn descend_mut(&mut self) -> Option<&mut Table> {
        match &mut self.value {
            Value::Table(table) => Some(table),
            Value::Array(array) if self.flag == FLAG_AOT => array.last_mut()?.as_table_mut(),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn as_table_mut(&mut self) -> Option<&mut Table> {
        match &mut self.value {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn as_array_mut(&mut self) -> Option<&mut Array> {
        match &mut self.value {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }
}

impl Item {
    /// Returns a borrowed string if this is a string value.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns an `i64` if this is an integer value.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Returns an `f64` if this is a float value.
    ///
    /// Integers are not converted; `as_float` on `1` yields [`None`].
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self.value {
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    /// Returns a `bool` if this is a boolean value.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }

    /// Returns a borrowed date-time if this is a date-time value.
    #[inline]
    pub fn as_datetime(&self) -> Option<&Datetime> {
        match &self.value {
            Value::Datetime(d) => Some(d),
            _ => None,
        }
    }

    /// Returns a borrowed array if this is an array value.
    #[inline]
    pub fn as_array(&self) -> Option<&Array> {
        match &self.value {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a borrowed table if this is a table value.
    #[inline]
    pub fn as_table(&self) -> Option<&Table> {
        match &self.value {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Returns true if the value is a table and is non-empty.
    #[inline]
    pub fn has_keys(&self) -> bool {
        self.as_table().is_some_and(|t| !t.is_empty())
    }

    /// Returns true if the value is a table and has the specified key.
    #[inline]
    pub fn has_key(&self, key: &str) -> bool {
        self.as_table().is_some_and(|t| t.contains_key(key))
    }
}

/// Spans are ignored: two items are equal when their values are.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

/// A TOML table key with its source span.
///
/// Keys appear as the first element in `(`[`Key`]`, `[`Item`]`)` entry pairs
/// when iterating over a [`Table`].
#[derive(Clone)]
pub struct Key {
    /// The key name, with quotes removed and escapes resolved.
    pub name: String,
    /// The byte-offset span of the key in the source document.
    pub span: Span,
}

impl Key {
    /// Returns the key name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq(&other.name)
    }
}

impl Eq for Key {}
