//! A strict TOML parser producing an owned document tree, with span
//! information for every key and value and a small query layer for
//! reading values by dotted path.
//!
//! [`parse`] turns a whole document into a root [`Table`] or reports the
//! first [`Error`], with its byte span and line/column. Lookups such as
//! [`Table::get_str`] take paths like `servers.alpha.ip` or
//! `products[1].name` and treat a missing or mistyped value as absent.
//!
//! # Examples
//!
//! ```
//! use toml_query::Error;
//!
//! let content = r#"
//! title = "config"
//!
//! [database]
//! ports = [8000, 8001]
//! enabled = true
//!
//! [[products]]
//! name = "hammer"
//!
//! [[products]]
//! name = "nail"
//! sku = 284758393
//! "#;
//!
//! let root = toml_query::parse(content)?;
//!
//! assert_eq!(root.get_str("title"), Some("config"));
//! assert_eq!(root.get_list::<i64>("database.ports"), [8000, 8001]);
//! assert_eq!(root.get_bool("database.enabled"), Some(true));
//! assert_eq!(root.get_str("products[1].name"), Some("nail"));
//! assert_eq!(root.get_integer("products[0].sku"), None);
//! assert!(root.get_table("missing").is_empty());
//! # Ok::<(), Error>(())
//! ```
//!
//! Errors carry a stable code and the location of the problem:
//!
//! ```
//! let err = toml_query::parse("a = 1\na = 2").unwrap_err();
//! assert_eq!(err.kind.code(), "duplicate-key");
//! assert_eq!(err.line_info, Some((1, 0)));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod array;
mod datetime;
mod error;
mod parser;
mod path;
mod query;
mod span;
mod table;
mod tokens;
mod value;

pub use array::Array;
pub use datetime::{Date, Datetime, Offset, Time};
pub use error::{Error, ErrorKind};
pub use parser::parse;
pub use path::{Path, Segment, resolve};
pub use query::FromItem;
pub use span::Span;
pub use table::Table;
pub use tokens::{Token, Tokenizer, tokenize};
pub use value::{Item, Key, Value};

#[cfg(feature = "serde")]
pub mod impl_serde;
