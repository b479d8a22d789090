use crate::Span;
use std::fmt::{self, Debug, Display};

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

/// The reason a document failed to parse.
///
/// A parse either produces a complete document or exactly one `Error`
/// describing the first violation encountered.
#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    /// Location of the offending construct. Some kinds also carry the span
    /// of an earlier, conflicting definition.
    pub span: Span,
    /// Zero-based line and column of `span.start`.
    pub line_info: Option<(usize, usize)>,
}

impl std::error::Error for Error {}

impl From<(ErrorKind, Span)> for Error {
    fn from((kind, span): (ErrorKind, Span)) -> Self {
        Self {
            kind,
            span,
            line_info: None,
        }
    }
}

#[derive(Clone, PartialEq)]
pub enum ErrorKind {
    /// The input ended where a value was required.
    UnexpectedEof,

    /// The input is larger than 512 MiB.
    FileTooLarge,

    /// A control character appeared inside a string.
    InvalidCharInString(char),

    /// `\` followed by a character that is not a known escape.
    InvalidEscape(char),

    /// A non-hex digit inside `\x`, `\u` or `\U`.
    InvalidHexEscape(char),

    /// A hex escape naming a surrogate or a value beyond U+10FFFF.
    InvalidEscapeValue(u32),

    /// A character that cannot start any token.
    Unexpected(char),

    /// The input ended inside a string.
    UnterminatedString,

    InvalidNumber,

    InvalidDatetime,

    /// A token other than the one the grammar requires here.
    Wanted {
        expected: &'static str,
        found: &'static str,
    },

    /// A `[header]` naming a table that an earlier header already defined.
    DuplicateTable { name: String, first: Span },

    /// A key bound twice in the same table, or a header reusing a key that
    /// holds a value.
    DuplicateKey { key: String, first: Span },

    /// `[[name]]` where `name` is already a table.
    RedefineAsArray,

    /// A `"""` or `'''` string used as a key.
    MultilineStringKey,

    /// A dotted key tried to reach into a value, an inline table, or a table
    /// defined by a header.
    DottedKeyInvalidType { first: Span },

    /// A bare word where a value was expected.
    UnquotedString,

    /// Arrays and inline tables nested too deeply.
    RecursionLimit,
}

impl ErrorKind {
    /// Stable kebab-case code identifying the kind, e.g. `duplicate-key`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnexpectedEof => "unexpected-eof",
            Self::FileTooLarge => "file-too-large",
            Self::InvalidCharInString(..) => "invalid-char-in-string",
            Self::InvalidEscape(..) => "invalid-escape",
            Self::InvalidHexEscape(..) => "invalid-hex-escape",
            Self::InvalidEscapeValue(..) => "invalid-escape-value",
            Self::Unexpected(..) => "unexpected",
            Self::UnterminatedString => "unterminated-string",
            Self::InvalidNumber => "invalid-number",
            Self::InvalidDatetime => "invalid-datetime",
            Self::Wanted { .. } => "wanted",
            Self::DuplicateTable { .. } => "duplicate-table",
            Self::DuplicateKey { .. } => "duplicate-key",
            Self::RedefineAsArray => "redefine-as-array",
            Self::MultilineStringKey => "multiline-string-key",
            Self::DottedKeyInvalidType { .. } => "dotted-key-invalid-type",
            Self::UnquotedString => "unquoted-string",
            Self::RecursionLimit => "recursion-limit",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// Shows whitespace and control characters as escapes.
struct Printable(char);

impl Display for Printable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_whitespace() || self.0.is_control() {
            write!(f, "{}", self.0.escape_default())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::UnexpectedEof => f.write_str("unexpected end of input")?,
            ErrorKind::FileTooLarge => f.write_str("input exceeds the 512MiB limit")?,
            ErrorKind::InvalidCharInString(c) => {
                write!(f, "character `{}` is not allowed in a string", Printable(*c))?
            }
            ErrorKind::InvalidEscape(c) => write!(f, "unknown escape `\\{}`", Printable(*c))?,
            ErrorKind::InvalidHexEscape(c) => {
                write!(f, "`{}` is not a hex digit", Printable(*c))?
            }
            ErrorKind::InvalidEscapeValue(v) => {
                write!(f, "escape value {v:#x} is not a unicode scalar value")?
            }
            ErrorKind::Unexpected(c) => write!(f, "unexpected character `{}`", Printable(*c))?,
            ErrorKind::UnterminatedString => f.write_str("unterminated string")?,
            ErrorKind::InvalidNumber => f.write_str("invalid number")?,
            ErrorKind::InvalidDatetime => f.write_str("invalid date or time")?,
            ErrorKind::Wanted { expected, found } => write!(f, "expected {expected}, found {found}")?,
            ErrorKind::DuplicateTable { name, .. } => write!(f, "table `{name}` is defined twice")?,
            ErrorKind::DuplicateKey { key, .. } => write!(f, "key `{key}` is defined twice")?,
            ErrorKind::RedefineAsArray => f.write_str("table redefined as an array of tables")?,
            ErrorKind::MultilineStringKey => f.write_str("keys cannot be multiline strings")?,
            ErrorKind::DottedKeyInvalidType { .. } => {
                f.write_str("dotted key cannot extend this value")?
            }
            ErrorKind::UnquotedString => f.write_str("unquoted string, strings must be quoted")?,
            ErrorKind::RecursionLimit => f.write_str("values nested too deeply")?,
        }
        if let Some((line, col)) = self.line_info {
            write!(f, " at line {} column {}", line + 1, col + 1)?;
        }
        Ok(())
    }
}

#[cfg(feature = "reporting")]
#[cfg_attr(docsrs, doc(cfg(feature = "reporting")))]
impl Error {
    /// Converts this error into a [`codespan_reporting`] diagnostic for the
    /// file `fid`. Conflicts label both the new and the earlier definition.
    pub fn to_diagnostic<FileId: Copy + PartialEq>(
        &self,
        fid: FileId,
    ) -> codespan_reporting::diagnostic::Diagnostic<FileId> {
        use codespan_reporting::diagnostic::{Diagnostic, Label};

        let diag = Diagnostic::error()
            .with_code(self.kind.code())
            .with_message(self.to_string());
        let here = Label::primary(fid, self.span);

        let labels = match &self.kind {
            ErrorKind::DuplicateKey { first, .. } => vec![
                Label::secondary(fid, *first).with_message("first defined here"),
                here.with_message("defined again here"),
            ],
            ErrorKind::DuplicateTable { first, .. } => vec![
                Label::secondary(fid, *first).with_message("first defined here"),
                here.with_message("defined again here"),
            ],
            ErrorKind::DottedKeyInvalidType { first } => vec![
                Label::secondary(fid, *first).with_message("not extendable"),
                here.with_message("extended here"),
            ],
            ErrorKind::Wanted { expected, .. } => vec![here.with_message(format!("expected {expected}"))],
            ErrorKind::UnquotedString => vec![here.with_message("add quotes")],
            _ => vec![here],
        };
        diag.with_labels(labels)
    }
}
