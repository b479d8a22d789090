//! Randomized documents checked against an independent model, plus
//! corrupted inputs and arbitrary query paths that must never panic.

use oorandom::Rand64;
use toml_query::{Item, Table};

#[derive(Clone, Debug)]
enum Expected {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Array(Vec<Expected>),
    Table(Vec<(String, Expected)>),
}

fn pick<'a, T>(rng: &mut Rand64, items: &'a [T]) -> &'a T {
    &items[rng.rand_range(0..items.len() as u64) as usize]
}

fn range(rng: &mut Rand64, lo: usize, hi_inclusive: usize) -> usize {
    rng.rand_range(lo as u64..hi_inclusive as u64 + 1) as usize
}

fn gen_simple_string(rng: &mut Rand64) -> String {
    let pool = b"abcdefghijklmnopqrstuvwxyz0123456789";
    (0..range(rng, 1, 20))
        .map(|_| *pick(rng, pool) as char)
        .collect()
}

const KEY_BASES: &[&str] = &[
    "name", "cfg", "path", "src", "opt", "val", "item", "data", "meta", "port", "host", "mode",
];

/// Returns the key as written in TOML and the key it should parse to.
/// Distinct `idx` values always give distinct keys.
fn gen_key(rng: &mut Rand64, idx: usize) -> (String, String) {
    let prefix = KEY_BASES[idx % KEY_BASES.len()];
    let base = format!("{prefix}{}", idx / KEY_BASES.len());
    match rng.rand_range(0..6) {
        0 => (base.clone(), base),
        1 => {
            let k = format!("{base}-q_z");
            (k.clone(), k)
        }
        2 => (format!("\"{base}\""), base),
        3 => (format!("'{base}'"), base),
        4 => (format!("\"{base}\\tx\""), format!("{base}\tx")),
        _ => (format!("\"{base}\\u00E9\""), format!("{base}\u{e9}")),
    }
}

fn gen_scalar(rng: &mut Rand64) -> (String, Expected) {
    match rng.rand_range(0..8) {
        0 => {
            let v = (rng.rand_u64() as i64) / 2;
            (v.to_string(), Expected::Integer(v))
        }
        1 => {
            let int_part = rng.rand_range(0..1999) as i64 - 999;
            let frac = rng.rand_range(0..100_000);
            let text = format!("{int_part}.{frac:05}");
            let v = text.parse().unwrap();
            (text, Expected::Float(v))
        }
        2 => {
            let v = rng.rand_range(0..2) == 1;
            (v.to_string(), Expected::Bool(v))
        }
        3 => {
            let s = gen_simple_string(rng);
            (format!("\"{s}\""), Expected::Str(s))
        }
        4 => {
            let s = gen_simple_string(rng);
            let (text, value) = *pick(
                rng,
                &[("\\n", "\n"), ("\\\\", "\\"), ("\\\"", "\""), ("\\u03B1", "\u{3b1}")],
            );
            (format!("\"{s}{text}\""), Expected::Str(format!("{s}{value}")))
        }
        5 => {
            let s = gen_simple_string(rng);
            (format!("'{s}'"), Expected::Str(s))
        }
        6 => {
            let s = gen_simple_string(rng);
            (format!("\"\"\"\n{s}\"\"\""), Expected::Str(s))
        }
        _ => {
            let s = gen_simple_string(rng);
            (format!("'''\n{s}'''"), Expected::Str(s))
        }
    }
}

fn gen_value(rng: &mut Rand64, depth: usize) -> (String, Expected) {
    if depth == 0 {
        return gen_scalar(rng);
    }
    match rng.rand_range(0..6) {
        0 => gen_inline_table(rng, depth - 1),
        1 => gen_array(rng, depth - 1),
        _ => gen_scalar(rng),
    }
}

fn gen_inline_table(rng: &mut Rand64, depth: usize) -> (String, Expected) {
    let mut parts = Vec::new();
    let mut expected = Vec::new();
    for i in 0..range(rng, 0, 5) {
        let (k_toml, k_str) = gen_key(rng, i);
        let (v_toml, v_exp) = gen_value(rng, depth);
        parts.push(format!("{k_toml} = {v_toml}"));
        expected.push((k_str, v_exp));
    }
    (format!("{{{}}}", parts.join(", ")), Expected::Table(expected))
}

fn gen_array(rng: &mut Rand64, depth: usize) -> (String, Expected) {
    let mut parts = Vec::new();
    let mut expected = Vec::new();
    for _ in 0..range(rng, 0, 6) {
        let (v_toml, v_exp) = gen_value(rng, depth);
        parts.push(v_toml);
        expected.push(v_exp);
    }
    let sep = if rng.rand_range(0..2) == 0 { ", " } else { ",\n  " };
    let trailing = if !parts.is_empty() && rng.rand_range(0..3) == 0 { "," } else { "" };
    (
        format!("[{}{trailing}]", parts.join(sep)),
        Expected::Array(expected),
    )
}

fn gen_entries(rng: &mut Rand64, out: &mut String, count: usize) -> Vec<(String, Expected)> {
    let mut expected = Vec::new();
    for idx in 0..count {
        let (key_toml, key_str) = gen_key(rng, idx);
        if rng.rand_range(0..5) == 0 {
            let (sub_toml, sub_str) = gen_key(rng, 0);
            let (val_toml, val_exp) = gen_value(rng, 1);
            out.push_str(&format!("{key_toml}.{sub_toml} = {val_toml}\n"));
            expected.push((key_str, Expected::Table(vec![(sub_str, val_exp)])));
        } else {
            let (val_toml, val_exp) = gen_value(rng, 2);
            out.push_str(&format!("{key_toml} = {val_toml}\n"));
            expected.push((key_str, val_exp));
        }
    }
    expected
}

/// A document with root entries, `[section]` tables and `[[list]]`
/// arrays of tables. Header names continue the root key numbering, so they
/// never collide with root keys.
fn gen_document(rng: &mut Rand64) -> (String, Vec<(String, Expected)>) {
    let mut toml = String::new();
    let n_root = range(rng, 0, 6);
    let mut root = gen_entries(rng, &mut toml, n_root);
    let mut next = n_root;

    for _ in 0..range(rng, 0, 3) {
        let (key_toml, key_str) = gen_key(rng, next);
        next += 1;
        if rng.rand_range(0..2) == 0 {
            toml.push_str(&format!("\n[{key_toml}]\n"));
            let n = range(rng, 0, 4);
            let entries = gen_entries(rng, &mut toml, n);
            root.push((key_str, Expected::Table(entries)));
        } else {
            let mut elements = Vec::new();
            for _ in 0..range(rng, 1, 3) {
                toml.push_str(&format!("\n[[{key_toml}]] # element\n"));
                let n = range(rng, 0, 3);
                elements.push(Expected::Table(gen_entries(rng, &mut toml, n)));
            }
            root.push((key_str, Expected::Array(elements)));
        }
    }
    (toml, root)
}

fn path_safe(key: &str) -> bool {
    !key.is_empty() && !key.contains(['.', '[', ']'])
}

/// Checks `actual` against the model. When every key along the way can be
/// written as a query path, the path must resolve to the very same item.
fn verify_item(root: &Table, actual: &Item, expected: &Expected, path: Option<&str>) {
    if let Some(path) = path {
        let resolved = root
            .resolve(path)
            .unwrap_or_else(|| panic!("{path}: does not resolve"));
        assert!(std::ptr::eq(resolved, actual), "{path}: resolved elsewhere");
    }
    let at = path.unwrap_or("<unaddressable>");
    match expected {
        Expected::Integer(v) => assert_eq!(actual.as_integer(), Some(*v), "{at}"),
        Expected::Float(v) => assert_eq!(actual.as_float(), Some(*v), "{at}"),
        Expected::Bool(v) => assert_eq!(actual.as_bool(), Some(*v), "{at}"),
        Expected::Str(v) => assert_eq!(actual.as_str(), Some(v.as_str()), "{at}"),
        Expected::Array(items) => {
            let arr = actual
                .as_array()
                .unwrap_or_else(|| panic!("{at}: expected array, got {}", actual.type_str()));
            assert_eq!(arr.len(), items.len(), "{at}: array length");
            for (i, (item, exp)) in arr.iter().zip(items).enumerate() {
                let child = path.map(|p| format!("{p}[{i}]"));
                // Only one index per segment: nested arrays are not addressable.
                let child = child.filter(|_| !path.unwrap_or("").ends_with(']'));
                verify_item(root, item, exp, child.as_deref());
            }
        }
        Expected::Table(entries) => {
            let table = actual
                .as_table()
                .unwrap_or_else(|| panic!("{at}: expected table, got {}", actual.type_str()));
            verify_table(root, table, entries, path);
        }
    }
}

fn verify_table(root: &Table, table: &Table, entries: &[(String, Expected)], path: Option<&str>) {
    assert_eq!(table.len(), entries.len(), "{path:?}: table length");
    for ((key, item), (exp_key, exp)) in table.iter().zip(entries) {
        assert_eq!(key.as_str(), exp_key, "{path:?}: key order");
        let child = match path {
            _ if !path_safe(exp_key) => None,
            None if std::ptr::eq(table, root) => Some(exp_key.clone()),
            None => None,
            Some(p) => Some(format!("{p}.{exp_key}")),
        };
        verify_item(root, item, exp, child.as_deref());
    }
}

#[test]
fn generated_documents_match_model() {
    let mut rng = Rand64::new(0x7011_5eed);
    for round in 0..400 {
        let (text, expected) = gen_document(&mut rng);
        let root = toml_query::parse(&text)
            .unwrap_or_else(|e| panic!("round {round}: {e}\n---\n{text}"));
        verify_table(&root, &root, &expected, None);

        let again = toml_query::parse(&text).unwrap();
        assert_eq!(root, again, "round {round}: reparse differs");
    }
}

fn corrupt(rng: &mut Rand64, text: &str) -> String {
    const NOISE: &[&str] = &[
        "[", "]", "[[", "]]", "{", "}", "=", ".", ",", "\"", "'", "\"\"\"", "#", "\n", "\\", "+",
        "-", "e", "1979-05-27", "T", ":", "inf", "0x", "\u{e9}", "\r", "\t", " ",
    ];
    let mut bytes = text.as_bytes().to_vec();
    for _ in 0..range(rng, 1, 4) {
        let at = range(rng, 0, bytes.len());
        match rng.rand_range(0..3) {
            0 if !bytes.is_empty() => {
                let end = range(rng, at, (at + 8).min(bytes.len()));
                bytes.drain(at..end);
            }
            1 => bytes.truncate(at),
            _ => {
                let noise = pick(rng, NOISE).as_bytes();
                bytes.splice(at..at, noise.iter().copied());
            }
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[test]
fn corrupted_documents_never_panic() {
    let mut rng = Rand64::new(0xbad_c0de);
    for _ in 0..2000 {
        let (text, _) = gen_document(&mut rng);
        let broken = corrupt(&mut rng, &text);
        match toml_query::parse(&broken) {
            Ok(root) => {
                let _ = root.get_table("name0").get_str("cfg1");
                let _ = root.get_list::<&Item>("path2");
            }
            Err(err) => {
                assert!(err.span.start as usize <= broken.len(), "{broken:?}");
                assert!(err.line_info.is_some(), "{broken:?}");
                assert!(!err.to_string().is_empty());
            }
        }
    }
}

#[test]
fn arbitrary_paths_never_panic() {
    let root = toml_query::parse(
        "a = 1\nb = [1, [2], {c = 3}]\n[t.u]\nv = \"w\"\n[[x]]\ny = 1\n[[x]]\n",
    )
    .unwrap();
    const PIECES: &[&str] = &["a", "b", "c", "t", "u", "v", "x", "y", ".", "[", "]", "0", "1", "9", "-", " "];
    let mut rng = Rand64::new(42);
    for _ in 0..5000 {
        let path: String = (0..range(&mut rng, 0, 10))
            .map(|_| *pick(&mut rng, PIECES))
            .collect();
        let _ = root.resolve(&path);
        let _ = root.get_str(&path);
        let _ = root.get_integer(&path);
        let _ = root.get_list::<i64>(&path);
        let _ = root.get_table(&path).is_empty();
    }
}
