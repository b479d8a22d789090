//! Recursive-descent TOML parser built on [`Tokenizer`].
//!
//! The document root is owned by [`Parser::parse_document`]; the table that
//! key-value lines land in is tracked as a path of entry indices from the
//! root, replaced each time a `[header]` or `[[header]]` is processed.

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;

use crate::Span;
use crate::array::Array;
use crate::datetime::Datetime;
use crate::error::{Error, ErrorKind};
use crate::table::Table;
use crate::tokens::{Token, Tokenizer};
use crate::value::{Item, Key};

/// Inputs larger than this are rejected with [`ErrorKind::FileTooLarge`];
/// spans store 32-bit offsets.
const MAX_SIZE: usize = 1 << 29;

/// Maximum nesting of arrays and inline tables.
const MAX_RECURSION_DEPTH: usize = 256;

/// Entry indices leading from the root to the current table. An index that
/// lands on an array of tables continues into its last element.
type TablePath = Vec<usize>;

struct Parser<'a> {
    tokens: Tokenizer<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            tokens: Tokenizer::new(input),
            depth: 0,
        }
    }

    fn error(&self, span: Span, kind: ErrorKind) -> Error {
        self.tokens
            .error(span.start as usize, Some(span.end as usize), kind)
    }

    /// Builds a "wanted" error against whatever token comes next.
    fn wanted(&mut self, expected: &'static str) -> Result<Error, Error> {
        Ok(match self.tokens.peek_token()? {
            Some((span, token)) => self.error(
                span,
                ErrorKind::Wanted {
                    expected,
                    found: token.describe(),
                },
            ),
            None => self.tokens.eof_error(expected),
        })
    }

    /// Consumes `expected` only when it starts exactly at `at`, i.e. with no
    /// whitespace between it and the previous token.
    fn eat_adjacent(&mut self, expected: Token<'a>, at: u32) -> Result<Option<Span>, Error> {
        match self.tokens.peek_token()? {
            Some((span, token)) if span.start == at && token == expected => {
                self.tokens.next_token()?;
                Ok(Some(span))
            }
            _ => Ok(None),
        }
    }

    fn keylike_adjacent(&mut self, at: u32) -> Result<Option<(Span, &'a str)>, Error> {
        match self.tokens.peek_token()? {
            Some((span, Token::Keylike(s))) if span.start == at => {
                self.tokens.next_token()?;
                Ok(Some((span, s)))
            }
            _ => Ok(None),
        }
    }

    // -- keys ---------------------------------------------------------------

    fn table_key(&mut self) -> Result<Key, Error> {
        match self.tokens.next_token()? {
            Some((span, Token::Keylike(name))) => Ok(Key {
                name: name.to_owned(),
                span,
            }),
            Some((span, Token::String { val, multiline, .. })) => {
                if multiline {
                    return Err(self.error(span, ErrorKind::MultilineStringKey));
                }
                Ok(Key {
                    name: val.into_owned(),
                    span,
                })
            }
            Some((span, token)) => Err(self.error(
                span,
                ErrorKind::Wanted {
                    expected: "a table key",
                    found: token.describe(),
                },
            )),
            None => Err(self.tokens.eof_error("a table key")),
        }
    }

    /// Reads `key ( "." key )*`, returning the leading segments and the
    /// final key separately.
    fn dotted_key(&mut self) -> Result<(Vec<Key>, Key), Error> {
        let mut parents = Vec::new();
        let mut last = self.table_key()?;
        while self.tokens.eat(Token::Period)? {
            let next = self.table_key()?;
            parents.push(std::mem::replace(&mut last, next));
        }
        Ok((parents, last))
    }

    // -- values -------------------------------------------------------------

    fn value(&mut self) -> Result<Item, Error> {
        let Some((span, token)) = self.tokens.next_token()? else {
            let end = self.tokens.input().len();
            return Err(self.tokens.error(end, None, ErrorKind::UnexpectedEof));
        };
        match token {
            Token::String { val, .. } => Ok(Item::string(val.into_owned(), span)),
            Token::LeftBrace => self.nested(span, Self::inline_table),
            Token::LeftBracket => self.nested(span, Self::array),
            Token::Plus => self.number_leading_plus(span),
            Token::Keylike("true") => Ok(Item::boolean(true, span)),
            Token::Keylike("false") => Ok(Item::boolean(false, span)),
            Token::Keylike(s @ ("inf" | "nan")) => self.number(span, s),
            Token::Keylike(s) => match s.as_bytes()[0] {
                b'0'..=b'9' => {
                    let bytes = &self.tokens.input().as_bytes()[span.start as usize..];
                    if Datetime::looks_like_datetime(bytes) {
                        match self.tokens.datetime_at(span.start as usize) {
                            Some((span, value)) => Ok(Item::datetime(value, span)),
                            None => Err(self.error(span, ErrorKind::InvalidDatetime)),
                        }
                    } else {
                        self.number(span, s)
                    }
                }
                b'-' => self.number(span, s),
                _ => Err(self.error(span, ErrorKind::UnquotedString)),
            },
            token => Err(self.error(
                span,
                ErrorKind::Wanted {
                    expected: "a value",
                    found: token.describe(),
                },
            )),
        }
    }

    /// Runs `f` one nesting level deeper, enforcing the depth limit.
    fn nested(
        &mut self,
        open: Span,
        f: fn(&mut Self, Span) -> Result<Item, Error>,
    ) -> Result<Item, Error> {
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(self.error(open, ErrorKind::RecursionLimit));
        }
        self.depth += 1;
        let result = f(self, open);
        self.depth -= 1;
        result
    }

    /// Parses the rest of an inline table after its `{`. Inline tables are
    /// confined to one line and are frozen once closed.
    fn inline_table(&mut self, open: Span) -> Result<Item, Error> {
        let mut table = Table::new();
        if let Some(close) = self.tokens.eat_spanned(Token::RightBrace)? {
            return Ok(Item::table_frozen(table, open.join(close)));
        }
        loop {
            let (parents, key) = self.dotted_key()?;
            self.tokens.expect(Token::Equals)?;
            let value = self.value()?;
            let mut target = &mut table;
            for parent in &parents {
                target = self.navigate_dotted_key(target, parent)?;
            }
            self.insert_value(target, key, value)?;

            if let Some(close) = self.tokens.eat_spanned(Token::RightBrace)? {
                return Ok(Item::table_frozen(table, open.join(close)));
            }
            if !self.tokens.eat(Token::Comma)? {
                return Err(self.wanted("a comma")?);
            }
        }
    }

    /// Parses the rest of an array literal after its `[`. Newlines may
    /// separate elements and a trailing comma is permitted.
    fn array(&mut self, open: Span) -> Result<Item, Error> {
        let mut array = Array::new();
        loop {
            self.tokens.eat_newlines()?;
            if let Some(close) = self.tokens.eat_spanned(Token::RightBracket)? {
                return Ok(Item::array(array, open.join(close)));
            }
            array.push(self.value()?);
            self.tokens.eat_newlines()?;
            if !self.tokens.eat(Token::Comma)? {
                break;
            }
        }
        self.tokens.eat_newlines()?;
        match self.tokens.eat_spanned(Token::RightBracket)? {
            Some(close) => Ok(Item::array(array, open.join(close))),
            None => Err(self.wanted("a right bracket")?),
        }
    }

    // -- numbers ------------------------------------------------------------

    fn number(&mut self, span: Span, s: &'a str) -> Result<Item, Error> {
        let invalid = |p: &Self, end: u32| p.error(Span::new(span.start, end), ErrorKind::InvalidNumber);

        let radix = if s.starts_with("0x") {
            16
        } else if s.starts_with("0o") {
            8
        } else if s.starts_with("0b") {
            2
        } else {
            0
        };
        if radix != 0 {
            return match integer(&s[2..], radix) {
                Some(v) => Ok(Item::integer(v, span)),
                None => Err(invalid(self, span.end)),
            };
        }

        match s {
            "inf" => return Ok(Item::float(f64::INFINITY, span)),
            "-inf" => return Ok(Item::float(f64::NEG_INFINITY, span)),
            "nan" => return Ok(Item::float(f64::NAN, span)),
            "-nan" => return Ok(Item::float(-f64::NAN, span)),
            _ => {}
        }

        let mut end = span.end;
        let mut fraction = None;
        if !s.contains(['e', 'E']) {
            match self.eat_adjacent(Token::Period, end)? {
                Some(dot) => match self.keylike_adjacent(dot.end)? {
                    Some((after_span, after)) => {
                        end = after_span.end;
                        fraction = Some(after);
                    }
                    None => return Err(invalid(self, dot.end)),
                },
                None => {
                    return match integer(s, 10) {
                        Some(v) => Ok(Item::integer(v, span)),
                        None => Err(invalid(self, end)),
                    };
                }
            }
        }

        // A bare `e` at the end of the mantissa may be followed by `+` and
        // the exponent digits as separate tokens, as in `1e+5` or `1.5e+5`.
        let mantissa_tail = fraction.unwrap_or(s);
        let mut exponent_rest = None;
        if mantissa_tail.ends_with(['e', 'E']) {
            if let Some(plus) = self.eat_adjacent(Token::Plus, end)? {
                end = plus.end;
                match self.keylike_adjacent(end)? {
                    Some((exp_span, exp)) => {
                        end = exp_span.end;
                        exponent_rest = Some(exp);
                    }
                    None => return Err(invalid(self, end)),
                }
            }
        }

        match float(s, fraction, exponent_rest) {
            Some(f) => Ok(Item::float(f, Span::new(span.start, end))),
            None => Err(invalid(self, end)),
        }
    }

    fn number_leading_plus(&mut self, plus: Span) -> Result<Item, Error> {
        match self.keylike_adjacent(plus.end)? {
            // A sign is only valid on decimal integers, floats and inf/nan.
            Some((span, s))
                if !s.starts_with(['-', '+'])
                    && !s.starts_with("0x")
                    && !s.starts_with("0o")
                    && !s.starts_with("0b") =>
            {
                let item = self.number(span, s)?;
                let end = item.span().end;
                Ok(item.with_span(Span::new(plus.start, end)))
            }
            Some((span, _)) => Err(self.error(plus.join(span), ErrorKind::InvalidNumber)),
            None => Err(self.error(plus, ErrorKind::InvalidNumber)),
        }
    }

    // -- table navigation ---------------------------------------------------

    /// Walks one segment of a dotted key, creating the table if missing.
    /// Only tables created by dotted keys or implicitly by headers can be
    /// extended this way.
    fn navigate_dotted_key<'t>(&self, table: &'t mut Table, key: &Key) -> Result<&'t mut Table, Error> {
        if let Some(idx) = table.find_index(&key.name) {
            let (existing_key, existing) = table.entry_at(idx);
            let ok = existing.is_table() && !existing.is_frozen() && !existing.has_header_bit();
            if !ok {
                return Err(self.error(
                    key.span,
                    ErrorKind::DottedKeyInvalidType {
                        first: existing_key.span,
                    },
                ));
            }
            Ok(entry_table(table, idx))
        } else {
            let idx = table.insert(key.clone(), Item::table_dotted(Table::new(), key.span));
            Ok(entry_table(table, idx))
        }
    }

    /// Walks an intermediate segment of a header: through any non-frozen
    /// table, or into the last element of an array of tables.
    fn navigate_header_intermediate<'t>(
        &self,
        table: &'t mut Table,
        key: &Key,
    ) -> Result<(usize, &'t mut Table), Error> {
        if let Some(idx) = table.find_index(&key.name) {
            let (existing_key, existing) = table.entry_at(idx);
            let ok = (existing.is_table() && !existing.is_frozen()) || existing.is_aot();
            if !ok {
                return Err(self.error(
                    key.span,
                    ErrorKind::DuplicateKey {
                        key: key.name.clone(),
                        first: existing_key.span,
                    },
                ));
            }
            Ok((idx, entry_table(table, idx)))
        } else {
            let idx = table.insert(key.clone(), Item::table(Table::new(), key.span));
            Ok((idx, entry_table(table, idx)))
        }
    }

    /// Opens the table named by the last segment of a `[header]`.
    fn navigate_header_table_final(
        &self,
        table: &mut Table,
        key: &Key,
        header: Span,
    ) -> Result<usize, Error> {
        let Some(idx) = table.find_index(&key.name) else {
            return Ok(table.insert(key.clone(), Item::table_header(Table::new(), header)));
        };
        let (existing_key, existing) = table.entry_at(idx);
        let first = existing_key.span;
        if !existing.is_table() || existing.is_frozen() || existing.has_dotted_bit() {
            return Err(self.error(
                key.span,
                ErrorKind::DuplicateKey {
                    key: key.name.clone(),
                    first,
                },
            ));
        }
        if existing.has_header_bit() {
            return Err(self.error(
                header,
                ErrorKind::DuplicateTable {
                    name: key.name.clone(),
                    first: existing.span(),
                },
            ));
        }
        // An implicitly created table is being defined for the first time.
        table.item_at_mut(idx).set_header(header);
        Ok(idx)
    }

    /// Appends a new table for the last segment of a `[[header]]`.
    fn navigate_header_array_final(
        &self,
        table: &mut Table,
        key: &Key,
        header: Span,
    ) -> Result<usize, Error> {
        let element = Item::table_header(Table::new(), header);
        let Some(idx) = table.find_index(&key.name) else {
            let aot = Item::array_aot(Array::with_single(element), header);
            return Ok(table.insert(key.clone(), aot));
        };
        let (existing_key, existing) = table.entry_at(idx);
        let first = existing_key.span;
        let (is_aot, is_table) = (existing.is_aot(), existing.is_table());
        if is_aot {
            if let Some(array) = table.item_at_mut(idx).as_array_mut() {
                array.push(element);
            }
            return Ok(idx);
        }
        if is_table {
            return Err(self.error(header, ErrorKind::RedefineAsArray));
        }
        Err(self.error(
            key.span,
            ErrorKind::DuplicateKey {
                key: key.name.clone(),
                first,
            },
        ))
    }

    fn insert_value(&self, table: &mut Table, key: Key, value: Item) -> Result<(), Error> {
        if let Some((existing_key, _)) = table.get_key_value(&key.name) {
            return Err(self.error(
                key.span,
                ErrorKind::DuplicateKey {
                    key: key.name.clone(),
                    first: existing_key.span,
                },
            ));
        }
        table.insert(key, value);
        Ok(())
    }

    // -- document -----------------------------------------------------------

    fn parse_document(&mut self) -> Result<Table, Error> {
        let mut root = Table::new();
        let mut current = TablePath::new();
        while let Some((_, token)) = self.tokens.peek_token()? {
            match token {
                Token::Newline => {
                    self.tokens.next_token()?;
                }
                Token::LeftBracket => current = self.process_table_header(&mut root)?,
                _ => self.process_key_value(&mut root, &current)?,
            }
        }
        Ok(root)
    }

    /// Handles a `[a.b]` or `[[a.b]]` line and returns the path of the table
    /// subsequent key-value lines are inserted into.
    fn process_table_header(&mut self, root: &mut Table) -> Result<TablePath, Error> {
        let open = self.tokens.expect(Token::LeftBracket)?;
        let is_array = self.eat_adjacent(Token::LeftBracket, open.end)?.is_some();
        let (parents, key) = self.dotted_key()?;
        let mut close = self.tokens.expect(Token::RightBracket)?;
        if is_array {
            match self.eat_adjacent(Token::RightBracket, close.end)? {
                Some(second) => close = second,
                None => return Err(self.wanted_adjacent_bracket(close)?),
            }
        }
        let header = open.join(close);
        self.tokens.expect_newline_or_eof()?;

        let mut path = TablePath::with_capacity(parents.len() + 1);
        let mut table = root;
        for parent in &parents {
            let (idx, next) = self.navigate_header_intermediate(table, parent)?;
            path.push(idx);
            table = next;
        }
        let idx = if is_array {
            self.navigate_header_array_final(table, &key, header)?
        } else {
            self.navigate_header_table_final(table, &key, header)?
        };
        path.push(idx);
        Ok(path)
    }

    /// Error for a `[[header]` whose closing brackets are split apart.
    fn wanted_adjacent_bracket(&mut self, first: Span) -> Result<Error, Error> {
        match self.tokens.peek_token()? {
            Some((span, Token::RightBracket)) => Ok(self.error(
                Span::new(first.end, span.start),
                ErrorKind::Wanted {
                    expected: "a right bracket",
                    found: "whitespace",
                },
            )),
            _ => self.wanted("a right bracket"),
        }
    }

    fn process_key_value(&mut self, root: &mut Table, current: &[usize]) -> Result<(), Error> {
        let (parents, key) = self.dotted_key()?;
        self.tokens.expect(Token::Equals)?;
        let value = self.value()?;
        self.tokens.expect_newline_or_eof()?;

        let mut table = table_at(root, current);
        for parent in &parents {
            table = self.navigate_dotted_key(table, parent)?;
        }
        self.insert_value(table, key, value)
    }
}

/// The table stored at `idx`: the entry itself, or the newest element when
/// the entry is an array of tables.
fn entry_table(table: &mut Table, idx: usize) -> &mut Table {
    table
        .item_at_mut(idx)
        .descend_mut()
        .expect("navigated entries are tables or arrays of tables")
}

fn table_at<'t>(root: &'t mut Table, path: &[usize]) -> &'t mut Table {
    let mut table = root;
    for &idx in path {
        table = entry_table(table, idx);
    }
    table
}

/// Splits `s` into its leading integer (with `_` separators) and the rest.
/// Returns [`None`] for misplaced underscores, an empty digit run, or
/// leading zeros when they are not allowed.
fn parse_integer(
    s: &str,
    allow_sign: bool,
    allow_leading_zeros: bool,
    radix: u32,
) -> Option<(&str, &str)> {
    let mut first = true;
    let mut first_zero = false;
    let mut underscore = false;
    let mut end = s.len();
    for (i, c) in s.char_indices() {
        if i == 0 && (c == '+' || c == '-') && allow_sign {
            continue;
        }
        if c == '0' && first {
            first_zero = true;
        } else if c.is_digit(radix) {
            if !first && first_zero && !allow_leading_zeros {
                return None;
            }
            underscore = false;
        } else if c == '_' && first {
            return None;
        } else if c == '_' && !underscore {
            underscore = true;
        } else {
            end = i;
            break;
        }
        first = false;
    }
    if first || underscore {
        return None;
    }
    Some((&s[..end], &s[end..]))
}

fn integer(s: &str, radix: u32) -> Option<i64> {
    let allow_sign = radix == 10;
    let allow_leading_zeros = radix != 10;
    let (digits, rest) = parse_integer(s, allow_sign, allow_leading_zeros, radix)?;
    if !rest.is_empty() {
        return None;
    }
    i64::from_str_radix(&digits.replace('_', ""), radix).ok()
}

/// Assembles a float from the integral text, the text after `.` (if any)
/// and, for `1e+5` style exponents, the digits after the `+`.
fn float(s: &str, fraction: Option<&str>, exponent_rest: Option<&str>) -> Option<f64> {
    let (integral, mut suffix) = parse_integer(s, true, false, 10)?;

    let mut fraction_digits = None;
    if let Some(after) = fraction {
        if !suffix.is_empty() {
            return None;
        }
        let (digits, rest) = parse_integer(after, false, true, 10)?;
        fraction_digits = Some(digits);
        suffix = rest;
    }

    let mut exponent = None;
    if let Some(marker) = suffix.strip_prefix(['e', 'E']) {
        let (digits, rest) = if marker.is_empty() {
            parse_integer(exponent_rest?, false, true, 10)?
        } else {
            if exponent_rest.is_some() {
                return None;
            }
            parse_integer(marker, true, true, 10)?
        };
        if !rest.is_empty() {
            return None;
        }
        exponent = Some(digits);
    } else if !suffix.is_empty() || exponent_rest.is_some() {
        return None;
    }

    let mut buf: String = integral.chars().filter(|c| *c != '_').collect();
    if let Some(fraction) = fraction_digits {
        buf.push('.');
        buf.extend(fraction.chars().filter(|c| *c != '_'));
    }
    if let Some(exponent) = exponent {
        buf.push('E');
        buf.extend(exponent.chars().filter(|c| *c != '_'));
    }
    let n: f64 = buf.parse().ok()?;
    n.is_finite().then_some(n)
}

/// Parses a TOML document into its root [`Table`].
///
/// Either a complete document is returned or the first error encountered;
/// partially built documents are never exposed.
///
/// # Examples
///
/// ```
/// let root = toml_query::parse("[server]\nport = 8080")?;
/// assert_eq!(root.get_integer("server.port"), Some(8080));
/// # Ok::<(), toml_query::Error>(())
/// ```
pub fn parse(s: &str) -> Result<Table, Error> {
    if s.len() > MAX_SIZE {
        return Err(Error {
            kind: ErrorKind::FileTooLarge,
            span: Span::new(0, 0),
            line_info: None,
        });
    }

    let mut parser = Parser::new(s);
    match parser.parse_document() {
        Ok(root) => {
            log::trace!(keys = root.len(), bytes = s.len(); "parsed TOML document");
            Ok(root)
        }
        Err(err) => {
            log::debug!(code = err.kind.code(), span:? = err.span; "failed to parse TOML document");
            Err(err)
        }
    }
}
