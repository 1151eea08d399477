use jsonkit_json_path::{
    json_path_to_string, query, query_cached, query_pointers, JsonPathError, JsonPathEval,
    JsonPathParser, QueryCache,
};
use jsonkit_json_pointer::{get, parse_json_pointer};
use proptest::prelude::*;
use serde_json::{json, Value};

fn values(expr: &str, doc: &Value) -> Vec<Value> {
    query(doc, expr)
        .unwrap_or_else(|e| panic!("query failed for '{expr}': {e}"))
        .into_iter()
        .cloned()
        .collect()
}

fn bookstore() -> Value {
    json!({
        "store": {
            "book": [
                {"category": "reference", "author": "Nigel Rees", "price": 8.95},
                {"category": "fiction", "author": "Evelyn Waugh", "price": 12.99},
                {"category": "fiction", "author": "Herman Melville", "isbn": "0-553-21311-3", "price": 8.99},
                {"category": "fiction", "author": "J. R. R. Tolkien", "isbn": "0-395-19395-8", "price": "22.99"}
            ],
            "bicycle": {"color": "red", "price": 19.95}
        }
    })
}

#[test]
fn path_root_and_member_matrix() {
    let doc = bookstore();
    assert_eq!(values("$", &doc), vec![doc.clone()]);
    assert_eq!(values("$.store.bicycle.color", &doc), vec![json!("red")]);
    assert_eq!(values("$['store']['bicycle']['color']", &doc), vec![json!("red")]);
    assert!(values("$.store.car", &doc).is_empty());
    assert_eq!(values("$.a", &json!({"a": null})), vec![json!(null)]);
}

#[test]
fn path_union_matrix() {
    let data = json!(["a", "b", "c", "d", "e", "f", "g"]);
    assert_eq!(values("$[0, 3]", &data), vec![json!("a"), json!("d")]);
    assert_eq!(
        values("$[0:2, 5]", &data),
        vec![json!("a"), json!("b"), json!("f")]
    );
    assert_eq!(values("$[0, 0]", &data), vec![json!("a"), json!("a")]);
}

#[test]
fn path_slice_matrix() {
    let data = json!([0, 1, 2, 3, 4, 5]);
    let cases: &[(&str, Value)] = &[
        ("$[1:3]", json!([1, 2])),
        ("$[:2]", json!([0, 1])),
        ("$[4:]", json!([4, 5])),
        ("$[-2:]", json!([4, 5])),
        ("$[:-4]", json!([0, 1])),
        ("$[::2]", json!([0, 2, 4])),
        ("$[::-1]", json!([5, 4, 3, 2, 1, 0])),
        ("$[5:1:-2]", json!([5, 3])),
        ("$[::0]", json!([])),
        ("$[10:]", json!([])),
    ];
    for (expr, expected) in cases {
        assert_eq!(Value::Array(values(expr, &data)), *expected, "{expr}");
    }
    assert!(values("$[0:2]", &json!({"0": 1})).is_empty());
}

#[test]
fn path_wildcard_and_descendant_matrix() {
    let doc = bookstore();
    assert_eq!(values("$.store.book[*].author", &doc).len(), 4);
    assert_eq!(values("$..author", &doc).len(), 4);
    assert_eq!(values("$.store.*", &doc).len(), 2);
    assert_eq!(values("$..price", &doc).len(), 5);
    assert_eq!(values("$..book[2].author", &doc), vec![json!("Herman Melville")]);
    assert!(values("$[*]", &json!([])).is_empty());
    assert!(values("$[*]", &json!("hello")).is_empty());

    // Every node below the root, parents before children.
    let nested = json!({"a": [1, {"b": 2}]});
    assert_eq!(
        values("$..*", &nested),
        vec![json!([1, {"b": 2}]), json!(1), json!({"b": 2}), json!(2)]
    );
}

#[test]
fn path_segments_expand_breadth_first() {
    let doc = json!({"x": [{"y": 1}, {"y": 2}], "z": [{"y": 3}]});
    assert_eq!(values("$.*[*].y", &doc), vec![json!(1), json!(2), json!(3)]);
}

#[test]
fn path_filter_matrix() {
    let doc = bookstore();
    assert_eq!(
        values("$.store.book[?(@.price < 10)].author", &doc),
        vec![json!("Nigel Rees"), json!("Herman Melville")]
    );
    assert_eq!(values("$.store.book[?(@.isbn)].author", &doc).len(), 2);
    assert_eq!(
        values("$.store.book[?(@.category == 'reference')].author", &doc),
        vec![json!("Nigel Rees")]
    );
    // "22.99" equals 22.99 but does not order against numbers.
    assert_eq!(
        values("$.store.book[?(@.price == 22.99)].author", &doc),
        vec![json!("J. R. R. Tolkien")]
    );
    assert!(values("$.store.book[?(@.price > 20)]", &doc).is_empty());
    // A missing property excludes the item even for `!=`.
    assert_eq!(values("$.store.book[?(@.isbn != 'x')]", &doc).len(), 2);
    assert_eq!(
        values("$.store.book[?(@.category == 'fiction' && @.price < 10)].author", &doc),
        vec![json!("Herman Melville")]
    );
}

#[test]
fn path_pointers_resolve_to_matches() {
    let doc = bookstore();
    for expr in ["$..price", "$.store.book[1:]", "$..[?(@.color)]", "$.store.*"] {
        let matched = query(&doc, expr).unwrap();
        let pointers = query_pointers(&doc, expr).unwrap();
        assert_eq!(matched.len(), pointers.len());
        for (value, pointer) in matched.into_iter().zip(pointers) {
            assert_eq!(get(&doc, &parse_json_pointer(&pointer).unwrap()).unwrap(), value);
        }
    }
}

#[test]
fn path_malformed_queries() {
    let doc = json!({});
    for expr in ["", "$.", "$[", "$['a'", "$[?(@.a ==)]", "$..", "$.a]", "$[1:2:3:4]"] {
        assert!(
            matches!(query(&doc, expr), Err(JsonPathError::MalformedQuery { .. })),
            "{expr}"
        );
    }
}

#[test]
fn path_cache_is_caller_owned() {
    let doc = bookstore();
    let mut cache = QueryCache::new(2);
    for expr in ["$..author", "$..price", "$..author", "$..isbn"] {
        query_cached(&mut cache, &doc, expr).unwrap();
    }
    assert_eq!(cache.len(), 2);
    assert!(cache.contains("$..author"));
    assert!(cache.contains("$..isbn"));
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        "[a-z]{0,4}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-c]", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn count_nodes(value: &Value) -> usize {
    1 + match value {
        Value::Array(arr) => arr.iter().map(count_nodes).sum(),
        Value::Object(map) => map.values().map(count_nodes).sum(),
        _ => 0,
    }
}

proptest! {
    #[test]
    fn prop_descendant_wildcard_visits_every_node(doc in arb_json()) {
        let all = query(&doc, "$..*").unwrap();
        prop_assert_eq!(all.len(), count_nodes(&doc) - 1);
    }

    #[test]
    fn prop_full_slice_matches_wildcard(items in prop::collection::vec(any::<i32>(), 0..12)) {
        let doc = json!(items);
        let sliced = query(&doc, "$[:]").unwrap();
        let all = query(&doc, "$[*]").unwrap();
        prop_assert_eq!(sliced, all);
    }

    #[test]
    fn prop_stringified_path_reparses(
        names in prop::collection::vec("[a-z ']{1,5}", 1..4),
        index in -5isize..5,
    ) {
        let mut expr = String::from("$");
        for name in &names {
            expr.push_str(&format!("[{}]", serde_json::to_string(name).unwrap()));
        }
        expr.push_str(&format!("[{index}]"));
        let parsed = JsonPathParser::parse(&expr).unwrap();
        let text = json_path_to_string(&parsed);
        prop_assert_eq!(JsonPathParser::parse(&text).unwrap(), parsed.clone());
        let doc = json!({});
        prop_assert!(JsonPathEval::eval(&parsed, &doc).is_empty());
    }
}
