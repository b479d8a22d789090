//! Lexical analysis: turns TOML source text into a stream of [`Token`]s.
//!
//! Whitespace and comments are discarded; newlines are significant in TOML
//! and are kept as [`Token::Newline`]. Strings are fully decoded here, so the
//! parser never sees an escape sequence.

#[cfg(test)]
#[path = "./tokens_tests.rs"]
mod tests;

use crate::Span;
use crate::datetime::Datetime;
use crate::error::{Error, ErrorKind};
use std::borrow::Cow;

/// A single lexical unit of a TOML document.
#[derive(Clone, Debug, PartialEq)]
pub enum Token<'a> {
    Newline,
    Equals,
    Period,
    Comma,
    Colon,
    Plus,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    /// A run of `A-Za-z0-9_-`: a bare key, or the raw text of a number,
    /// boolean or date.
    Keylike(&'a str),
    /// A quoted string of any of the four styles.
    String {
        /// Source text including the quotes.
        src: &'a str,
        /// Decoded contents.
        val: Cow<'a, str>,
        /// Whether the string used triple quotes.
        multiline: bool,
    },
}

impl Token<'_> {
    /// Describes the token for "expected X, found Y" diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Newline => "a newline",
            Token::Equals => "an equals",
            Token::Period => "a period",
            Token::Comma => "a comma",
            Token::Colon => "a colon",
            Token::Plus => "a plus",
            Token::LeftBrace => "a left brace",
            Token::RightBrace => "a right brace",
            Token::LeftBracket => "a left bracket",
            Token::RightBracket => "a right bracket",
            Token::Keylike(_) => "an identifier",
            Token::String { .. } => "a string",
        }
    }
}

/// Pull-based tokenizer with a single token of lookahead.
pub struct Tokenizer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    cursor: usize,
    peeked: Option<(Span, Token<'a>)>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            bytes: input.as_bytes(),
            // Skip a UTF-8 byte order mark; spans stay relative to `input`.
            cursor: if input.starts_with('\u{feff}') { 3 } else { 0 },
            peeked: None,
        }
    }

    /// The full source text.
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Returns the next token, or [`None`] at end of input.
    pub fn next_token(&mut self) -> Result<Option<(Span, Token<'a>)>, Error> {
        if let Some(token) = self.peeked.take() {
            return Ok(Some(token));
        }
        self.scan()
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<Option<(Span, Token<'a>)>, Error> {
        if self.peeked.is_none() {
            self.peeked = self.scan()?;
        }
        Ok(self.peeked.clone())
    }

    /// Consumes the next token if it equals `expected`.
    pub fn eat(&mut self, expected: Token<'a>) -> Result<bool, Error> {
        Ok(self.eat_spanned(expected)?.is_some())
    }

    /// Consumes the next token if it equals `expected`, returning its span.
    pub fn eat_spanned(&mut self, expected: Token<'a>) -> Result<Option<Span>, Error> {
        match self.peek_token()? {
            Some((span, token)) if token == expected => {
                self.peeked = None;
                Ok(Some(span))
            }
            _ => Ok(None),
        }
    }

    /// Consumes the next token, failing unless it equals `expected`.
    pub fn expect(&mut self, expected: Token<'a>) -> Result<Span, Error> {
        match self.next_token()? {
            Some((span, token)) if token == expected => Ok(span),
            Some((span, token)) => Err(self.error(
                span.start as usize,
                Some(span.end as usize),
                ErrorKind::Wanted {
                    expected: expected.describe(),
                    found: token.describe(),
                },
            )),
            None => Err(self.eof_error(expected.describe())),
        }
    }

    /// Consumes a newline, or succeeds at end of input.
    pub fn expect_newline_or_eof(&mut self) -> Result<(), Error> {
        match self.next_token()? {
            None | Some((_, Token::Newline)) => Ok(()),
            Some((span, token)) => Err(self.error(
                span.start as usize,
                Some(span.end as usize),
                ErrorKind::Wanted {
                    expected: "newline",
                    found: token.describe(),
                },
            )),
        }
    }

    /// Skips any run of newline tokens.
    pub fn eat_newlines(&mut self) -> Result<(), Error> {
        while self.eat(Token::Newline)? {}
        Ok(())
    }

    /// Re-reads the source at `start` as a date-time. On success the cursor
    /// moves past the date-time and any lookahead is discarded.
    pub fn datetime_at(&mut self, start: usize) -> Option<(Span, Datetime)> {
        let (len, value) = Datetime::munch(&self.bytes[start..])?;
        self.cursor = start + len;
        self.peeked = None;
        Some((Span::new(start as u32, self.cursor as u32), value))
    }

    /// Builds an error at `start..end` with line information filled in.
    pub(crate) fn error(&self, start: usize, end: Option<usize>, kind: ErrorKind) -> Error {
        Error {
            kind,
            span: Span::new(start as u32, end.unwrap_or(start + 1) as u32),
            line_info: Some(self.to_linecol(start)),
        }
    }

    pub(crate) fn eof_error(&self, expected: &'static str) -> Error {
        self.error(
            self.bytes.len(),
            None,
            ErrorKind::Wanted {
                expected,
                found: "eof",
            },
        )
    }

    fn to_linecol(&self, offset: usize) -> (usize, usize) {
        let mut line_start = 0;
        let mut line_num = 0;
        for (i, &b) in self.bytes.iter().enumerate() {
            if i >= offset {
                return (line_num, offset - line_start);
            }
            if b == b'\n' {
                line_num += 1;
                line_start = i + 1;
            }
        }
        (line_num, offset.saturating_sub(line_start))
    }

    // -- cursor operations --------------------------------------------------

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    #[inline]
    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.cursor + offset).copied()
    }

    #[inline]
    fn eat_byte(&mut self, b: u8) -> bool {
        if self.peek_byte() == Some(b) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Decodes the (possibly multi-byte) character at `at`.
    fn char_at(&self, at: usize) -> char {
        self.input[at..].chars().next().unwrap_or('\u{FFFD}')
    }

    fn eat_whitespace(&mut self) {
        while let Some(b' ' | b'\t') = self.peek_byte() {
            self.cursor += 1;
        }
    }

    fn eat_comment(&mut self) -> Result<(), Error> {
        if !self.eat_byte(b'#') {
            return Ok(());
        }
        while let Some(0x09 | 0x20..=0x7E | 0x80..) = self.peek_byte() {
            self.cursor += 1;
        }
        match self.peek_byte() {
            None | Some(b'\n') => Ok(()),
            Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => Ok(()),
            Some(_) => Err(self.error(
                self.cursor,
                None,
                ErrorKind::Unexpected(self.char_at(self.cursor)),
            )),
        }
    }

    // -- scanning -----------------------------------------------------------

    fn scan(&mut self) -> Result<Option<(Span, Token<'a>)>, Error> {
        self.eat_whitespace();
        self.eat_comment()?;

        let start = self.cursor;
        let Some(b) = self.peek_byte() else {
            return Ok(None);
        };
        self.cursor += 1;

        let token = match b {
            b'\n' => Token::Newline,
            b'\r' if self.eat_byte(b'\n') => Token::Newline,
            b'=' => Token::Equals,
            b'.' => Token::Period,
            b',' => Token::Comma,
            b':' => Token::Colon,
            b'+' => Token::Plus,
            b'{' => Token::LeftBrace,
            b'}' => Token::RightBrace,
            b'[' => Token::LeftBracket,
            b']' => Token::RightBracket,
            b'"' | b'\'' => return self.read_string(start, b).map(Some),
            b if is_keylike_byte(b) => {
                while let Some(b) = self.peek_byte() {
                    if !is_keylike_byte(b) {
                        break;
                    }
                    self.cursor += 1;
                }
                Token::Keylike(&self.input[start..self.cursor])
            }
            _ => {
                return Err(self.error(start, None, ErrorKind::Unexpected(self.char_at(start))));
            }
        };
        Ok(Some((Span::new(start as u32, self.cursor as u32), token)))
    }

    // -- string parsing -----------------------------------------------------

    /// Reads a string of either quote style. `start` is the byte offset of
    /// the opening quote; the cursor is positioned right after it.
    fn read_string(&mut self, start: usize, delim: u8) -> Result<(Span, Token<'a>), Error> {
        let mut multiline = false;
        if self.eat_byte(delim) {
            if self.eat_byte(delim) {
                multiline = true;
            } else {
                return Ok((
                    Span::new(start as u32, self.cursor as u32),
                    Token::String {
                        src: &self.input[start..self.cursor],
                        val: Cow::Borrowed(""),
                        multiline: false,
                    },
                ));
            }
        }

        // A newline immediately following the opening delimiter is trimmed.
        if multiline {
            if self.peek_byte() == Some(b'\n') {
                self.cursor += 1;
            } else if self.peek_byte() == Some(b'\r') && self.peek_byte_at(1) == Some(b'\n') {
                self.cursor += 2;
            }
        }
        let content_start = self.cursor;

        let mut owned: Option<String> = None;
        loop {
            let i = self.cursor;
            let Some(&b) = self.bytes.get(i) else {
                return Err(self.error(start, None, ErrorKind::UnterminatedString));
            };
            self.cursor = i + 1;

            match b {
                b'\r' => {
                    if !self.eat_byte(b'\n') {
                        return Err(self.error(i, None, ErrorKind::InvalidCharInString('\r')));
                    }
                    if !multiline {
                        return Err(self.error(i, None, ErrorKind::InvalidCharInString('\n')));
                    }
                    if let Some(buf) = &mut owned {
                        buf.push_str("\r\n");
                    }
                }
                b'\n' => {
                    if !multiline {
                        return Err(self.error(i, None, ErrorKind::InvalidCharInString('\n')));
                    }
                    if let Some(buf) = &mut owned {
                        buf.push('\n');
                    }
                }
                d if d == delim => {
                    let content_end = if multiline {
                        if !self.eat_byte(delim) {
                            if let Some(buf) = &mut owned {
                                buf.push(delim as char);
                            }
                            continue;
                        }
                        if !self.eat_byte(delim) {
                            if let Some(buf) = &mut owned {
                                buf.push(delim as char);
                                buf.push(delim as char);
                            }
                            continue;
                        }
                        // Up to two quotes directly before the closing
                        // delimiter belong to the content.
                        let mut extra = 0;
                        while extra < 2 && self.eat_byte(delim) {
                            if let Some(buf) = &mut owned {
                                buf.push(delim as char);
                            }
                            extra += 1;
                        }
                        i + extra
                    } else {
                        i
                    };

                    let val = match owned {
                        Some(buf) => Cow::Owned(buf),
                        None => Cow::Borrowed(&self.input[content_start..content_end]),
                    };
                    return Ok((
                        Span::new(start as u32, self.cursor as u32),
                        Token::String {
                            src: &self.input[start..self.cursor],
                            val,
                            multiline,
                        },
                    ));
                }
                b'\\' if delim == b'"' => {
                    let mut buf = owned
                        .take()
                        .unwrap_or_else(|| self.input[content_start..i].to_owned());
                    self.read_basic_escape(&mut buf, start, multiline)?;
                    owned = Some(buf);
                }
                0x09 | 0x20..=0x7E => {
                    if let Some(buf) = &mut owned {
                        buf.push(b as char);
                    }
                }
                0x80.. => {
                    let ch = self.char_at(i);
                    self.cursor = i + ch.len_utf8();
                    if let Some(buf) = &mut owned {
                        buf.push(ch);
                    }
                }
                _ => {
                    return Err(self.error(i, None, ErrorKind::InvalidCharInString(b as char)));
                }
            }
        }
    }

    fn read_basic_escape(
        &mut self,
        buf: &mut String,
        string_start: usize,
        multi: bool,
    ) -> Result<(), Error> {
        let i = self.cursor;
        let Some(&b) = self.bytes.get(i) else {
            return Err(self.error(string_start, None, ErrorKind::UnterminatedString));
        };
        self.cursor = i + 1;

        match b {
            b'"' => buf.push('"'),
            b'\\' => buf.push('\\'),
            b'b' => buf.push('\u{8}'),
            b'f' => buf.push('\u{c}'),
            b'n' => buf.push('\n'),
            b'r' => buf.push('\r'),
            b't' => buf.push('\t'),
            b'e' => buf.push('\u{1b}'),
            b'u' => buf.push(self.read_hex(4, string_start, i)?),
            b'U' => buf.push(self.read_hex(8, string_start, i)?),
            b'x' => buf.push(self.read_hex(2, string_start, i)?),
            b' ' | b'\t' | b'\n' | b'\r' if multi => {
                // Line-ending backslash (CRLF folding: \r\n counts as \n)
                let c = if b == b'\r' && self.eat_byte(b'\n') {
                    '\n'
                } else {
                    b as char
                };
                if c != '\n' {
                    // Only whitespace may sit between the backslash and the newline.
                    loop {
                        match self.peek_byte() {
                            Some(b' ' | b'\t') => self.cursor += 1,
                            Some(b'\n') => {
                                self.cursor += 1;
                                break;
                            }
                            Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                                self.cursor += 2;
                                break;
                            }
                            _ => return Err(self.error(i, None, ErrorKind::InvalidEscape(c))),
                        }
                    }
                }
                loop {
                    match self.peek_byte() {
                        Some(b' ' | b'\t' | b'\n') => self.cursor += 1,
                        Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => self.cursor += 2,
                        _ => break,
                    }
                }
            }
            _ => {
                let ch = self.char_at(i);
                self.cursor = i + ch.len_utf8();
                return Err(self.error(i, None, ErrorKind::InvalidEscape(ch)));
            }
        }
        Ok(())
    }

    fn read_hex(&mut self, n: usize, string_start: usize, escape_start: usize) -> Result<char, Error> {
        let mut val = 0u32;
        for _ in 0..n {
            let Some(&byte) = self.bytes.get(self.cursor) else {
                return Err(self.error(string_start, None, ErrorKind::UnterminatedString));
            };
            let Some(digit) = (byte as char).to_digit(16) else {
                let at = self.cursor;
                return Err(self.error(at, None, ErrorKind::InvalidHexEscape(self.char_at(at))));
            };
            val = (val << 4) | digit;
            self.cursor += 1;
        }
        match char::from_u32(val) {
            Some(ch) => Ok(ch),
            None => Err(self.error(
                escape_start,
                Some(escape_start + n + 1),
                ErrorKind::InvalidEscapeValue(val),
            )),
        }
    }
}

/// Tokenizes a whole document into a flat vector.
pub fn tokenize(input: &str) -> Result<Vec<(Span, Token<'_>)>, Error> {
    let mut tokenizer = Tokenizer::new(input);
    let mut out = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        out.push(token);
    }
    Ok(out)
}

#[inline]
pub(crate) fn is_keylike_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}
