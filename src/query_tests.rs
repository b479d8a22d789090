use super::*;
use crate::parse;

const DOC: &str = r#"
title = "example"
count = 3
ratio = 0.5
one = 1
on = true
when = 2014-08-04T13:47:00Z
names = ["a", "b"]
matrix = [[1, 2], [3]]
mixed = [1, "two"]
empty = []

[server]
host = "localhost"
ports = [80, 443]

[[server.routes]]
path = "/"

[[server.routes]]
path = "/api"
"#;

#[test]
fn scalar_getters() {
    let root = parse(DOC).unwrap();
    assert_eq!(root.get_str("title"), Some("example"));
    assert_eq!(root.get_integer("count"), Some(3));
    assert_eq!(root.get_float("ratio"), Some(0.5));
    assert_eq!(root.get_bool("on"), Some(true));
    assert_eq!(
        root.get_datetime("when").unwrap().to_string(),
        "2014-08-04T13:47:00Z"
    );
    assert_eq!(root.get_str("server.host"), Some("localhost"));
    assert_eq!(root.get_str("server.routes[1].path"), Some("/api"));
    assert_eq!(root.get_integer("server.ports[0]"), Some(80));
}

#[test]
fn wrong_type_is_absent() {
    let root = parse(DOC).unwrap();
    assert_eq!(root.get_integer("title"), None);
    assert_eq!(root.get_str("count"), None);
    assert_eq!(root.get_float("one"), None);
    assert_eq!(root.get_integer("ratio"), None);
    assert_eq!(root.get_bool("one"), None);
    assert!(root.get_datetime("title").is_none());
    assert!(root.get_array("server").is_none());
    assert!(root.get_table("title").is_empty());
}

#[test]
fn missing_paths() {
    let root = parse(DOC).unwrap();
    for path in ["nope", "server.nope", "title.x", "names[5]", "a.b[0].c", "", "[", "server..host"] {
        assert_eq!(root.get_str(path), None, "path: {path:?}");
        assert_eq!(root.get_integer(path), None, "path: {path:?}");
        assert_eq!(root.get_float(path), None, "path: {path:?}");
        assert_eq!(root.get_bool(path), None, "path: {path:?}");
        assert!(root.get_datetime(path).is_none(), "path: {path:?}");
        assert!(root.get_list::<&str>(path).is_empty(), "path: {path:?}");
        assert!(root.get_table(path).is_empty(), "path: {path:?}");
    }
}

#[test]
fn lists() {
    let root = parse(DOC).unwrap();
    assert_eq!(root.get_list::<&str>("names"), ["a", "b"]);
    assert_eq!(root.get_list::<String>("names"), ["a".to_string(), "b".to_string()]);
    assert_eq!(root.get_list::<i64>("server.ports"), [80, 443]);
    assert_eq!(root.get_list::<Vec<i64>>("matrix"), [vec![1, 2], vec![3]]);
    assert!(root.get_list::<i64>("empty").is_empty());

    // Heterogeneous or mistyped arrays convert all or nothing.
    assert!(root.get_list::<i64>("mixed").is_empty());
    assert!(root.get_list::<i64>("names").is_empty());
    assert_eq!(root.get_list::<&Item>("mixed").len(), 2);

    // A non-array is not a list of one.
    assert!(root.get_list::<&str>("title").is_empty());

    let routes = root.get_list::<&Table>("server.routes");
    let paths: Vec<_> = routes.iter().filter_map(|t| t.get_str("path")).collect();
    assert_eq!(paths, ["/", "/api"]);
}

#[test]
fn tables() {
    let root = parse(DOC).unwrap();
    let server = root.get_table("server");
    assert_eq!(server.get_str("host"), root.get_str("server.host"));
    assert_eq!(root.get_table("server.routes[0]").get_str("path"), Some("/"));

    let missing = root.get_table("nowhere");
    assert!(missing.is_empty());
    assert!(!missing.contains_key("host"));
    assert!(std::ptr::eq(missing, &EMPTY_TABLE));
}

#[test]
fn generic_lookup() {
    let root = parse(DOC).unwrap();
    assert_eq!(root.get_as::<i64>("count"), Some(3));
    assert_eq!(root.get_as::<String>("title").as_deref(), Some("example"));
    assert_eq!(root.get_as::<Datetime>("when").and_then(|d| d.date()).map(|d| d.year), Some(2014));
    assert_eq!(root.get_as::<&Item>("count").map(Item::type_str), Some("integer"));
    assert_eq!(root.get_as::<&Array>("names").map(Array::len), Some(2));
    assert!(root.get_as::<bool>("count").is_none());
    assert!(root.resolve("server.routes").is_some());
}

#[test]
fn empty_document() {
    let root = parse("").unwrap();
    assert!(root.is_empty());
    assert!(root.get_table("anything").is_empty());
    assert!(!parse("[a]").unwrap().is_empty());
    assert!(!parse("# comment\n[a]").unwrap().is_empty());
}
