use super::*;

#[test]
fn codes_for_every_kind() {
    let first = Span::new(0, 1);
    let cases: Vec<(ErrorKind, &str)> = vec![
        (ErrorKind::UnexpectedEof, "unexpected-eof"),
        (ErrorKind::FileTooLarge, "file-too-large"),
        (ErrorKind::DottedKeyInvalidType { first }, "dotted-key-invalid-type"),
        (
            ErrorKind::DuplicateKey {
                key: "k".into(),
                first,
            },
            "duplicate-key",
        ),
        (
            ErrorKind::DuplicateTable {
                name: "t".into(),
                first,
            },
            "duplicate-table",
        ),
        (ErrorKind::UnquotedString, "unquoted-string"),
        (ErrorKind::MultilineStringKey, "multiline-string-key"),
        (ErrorKind::RedefineAsArray, "redefine-as-array"),
        (ErrorKind::InvalidCharInString('x'), "invalid-char-in-string"),
        (ErrorKind::InvalidEscape('z'), "invalid-escape"),
        (ErrorKind::InvalidEscapeValue(0xDEAD), "invalid-escape-value"),
        (ErrorKind::InvalidHexEscape('g'), "invalid-hex-escape"),
        (ErrorKind::Unexpected('!'), "unexpected"),
        (ErrorKind::UnterminatedString, "unterminated-string"),
        (ErrorKind::InvalidNumber, "invalid-number"),
        (ErrorKind::InvalidDatetime, "invalid-datetime"),
        (
            ErrorKind::Wanted {
                expected: "a value",
                found: "a newline",
            },
            "wanted",
        ),
        (ErrorKind::RecursionLimit, "recursion-limit"),
    ];

    for (kind, code) in &cases {
        assert_eq!(kind.code(), *code);
        assert_eq!(kind.to_string(), *code);
        assert_eq!(format!("{kind:?}"), *code);
    }
}

fn err(kind: ErrorKind, line_info: Option<(usize, usize)>) -> Error {
    Error {
        kind,
        span: Span::new(4, 5),
        line_info,
    }
}

#[test]
fn error_messages() {
    let cases = [
        (ErrorKind::UnexpectedEof, "unexpected end of input"),
        (ErrorKind::Unexpected('\n'), "unexpected character `\\n`"),
        (ErrorKind::Unexpected('?'), "unexpected character `?`"),
        (ErrorKind::InvalidEscape('q'), "unknown escape `\\q`"),
        (
            ErrorKind::InvalidEscapeValue(0xD800),
            "escape value 0xd800 is not a unicode scalar value",
        ),
        (
            ErrorKind::Wanted {
                expected: "an equals",
                found: "an identifier",
            },
            "expected an equals, found an identifier",
        ),
        (
            ErrorKind::DuplicateKey {
                key: "name".into(),
                first: Span::new(0, 4),
            },
            "key `name` is defined twice",
        ),
        (
            ErrorKind::DuplicateTable {
                name: "a.b".into(),
                first: Span::new(0, 5),
            },
            "table `a.b` is defined twice",
        ),
        (ErrorKind::RecursionLimit, "values nested too deeply"),
    ];
    for (kind, message) in cases {
        assert_eq!(err(kind, None).to_string(), message);
    }
}

#[test]
fn line_info_is_one_based_in_display() {
    let e = err(ErrorKind::InvalidNumber, Some((2, 6)));
    assert_eq!(e.to_string(), "invalid number at line 3 column 7");
}

#[test]
fn from_kind_and_span() {
    let e = Error::from((ErrorKind::RedefineAsArray, Span::new(3, 9)));
    assert_eq!(e.kind, ErrorKind::RedefineAsArray);
    assert_eq!(e.span, Span::new(3, 9));
    assert!(e.line_info.is_none());

    let boxed: Box<dyn std::error::Error> = Box::new(e);
    assert_eq!(boxed.to_string(), "table redefined as an array of tables");
}

#[cfg(feature = "reporting")]
#[test]
fn diagnostics_label_both_definitions() {
    use codespan_reporting::diagnostic::LabelStyle;

    let e = crate::parse("a = 1\na = 2").unwrap_err();
    let diag = e.to_diagnostic(());
    assert_eq!(diag.code.as_deref(), Some("duplicate-key"));
    assert_eq!(diag.labels.len(), 2);
    let primary = diag
        .labels
        .iter()
        .find(|l| l.style == LabelStyle::Primary)
        .unwrap();
    assert_eq!(primary.range, e.span.range());
    let secondary = diag
        .labels
        .iter()
        .find(|l| l.style == LabelStyle::Secondary)
        .unwrap();
    assert_eq!(secondary.range, 0..1);
}
