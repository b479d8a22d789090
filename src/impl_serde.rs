#![cfg_attr(docsrs, doc(cfg(feature = "serde")))]

//! Provides [`serde::Serialize`] for the document tree.
//!
//! Tables serialize as maps in document order, arrays as sequences, and
//! datetimes as their TOML text. Spans are not serialized.

#[cfg(test)]
#[path = "./impl_serde_tests.rs"]
mod tests;

use serde::ser::{SerializeMap, SerializeSeq};

use crate::{Array, Datetime, Item, Table, Value};

impl serde::Serialize for Value {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::String(s) => ser.serialize_str(s),
            Value::Integer(i) => ser.serialize_i64(*i),
            Value::Float(f) => ser.serialize_f64(*f),
            Value::Boolean(b) => ser.serialize_bool(*b),
            Value::Datetime(dt) => dt.serialize(ser),
            Value::Array(arr) => arr.serialize(ser),
            Value::Table(tab) => tab.serialize(ser),
        }
    }
}

impl serde::Serialize for Item {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value().serialize(ser)
    }
}

impl serde::Serialize for Array {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = ser.serialize_seq(Some(self.len()))?;
        for ele in self {
            seq.serialize_element(ele)?;
        }
        seq.end()
    }
}

impl serde::Serialize for Table {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = ser.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k.as_str(), v)?;
        }
        map.end()
    }
}

impl serde::Serialize for Datetime {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ser.collect_str(self)
    }
}
