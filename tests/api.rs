//! End-to-end exercises of the public surface, one per headline feature.

use jsonquery::{Kind, PathError, add_transformer, get, is_valid_json, minify, parse, pretty};

#[test]
fn field_chain() {
    let json = r#"{"user":{"name":"Alice","roles":["Admin","Editor"]}}"#;
    assert_eq!(get(json, "user.name").as_str(), "Alice");
    assert_eq!(get(json, "user.roles.#").as_i64(), 2);
    assert_eq!(get(json, "user.roles.1").as_str(), "Editor");
    assert!(!get(json, "user.missing").exists());
}

#[test]
fn query_and_pluck() {
    let json = r#"{"items":[{"p":1.2,"n":"a"},{"p":0.8,"n":"b"},{"p":3.5,"n":"c"}]}"#;
    assert_eq!(get(json, "items.#(p>1.0).n").as_str(), "a");
    let all = get(json, "items.#(p>1.0)#.n");
    assert_eq!(all.raw(), r#"["a","c"]"#);
    assert_eq!(all.indexes().len(), 2);
}

#[test]
fn multi_selector_with_literal() {
    let json = r#"{"version":"1.0","items":[1,2,3]}"#;
    assert_eq!(
        get(json, r#"{version,"count":items.#,"ok":!true}"#).raw(),
        r#"{"version":"1.0","count":3,"ok":true}"#
    );
}

#[test]
fn transformer_pipeline() {
    let json = r#"{"tags":["Go","json","fast"]}"#;
    assert_eq!(get(json, "tags.@reverse|0").as_str(), "fast");
}

#[test]
fn custom_transformer() {
    add_transformer("shout", |j, _| format!("{}!!!", j.trim().trim_matches('"')));
    assert_eq!(get(r#"{"g":"hi"}"#, "g.@shout").as_str(), "hi!!!");
}

#[test]
fn cross_kind_order() {
    let ordered = ["null", "false", "3.14", r#""apple""#, "true", r#"{"k":1}"#];
    for w in ordered.windows(2) {
        let a = parse(w[0]);
        let b = parse(w[1]);
        assert!(a.less(&b, true), "{} < {}", w[0], w[1]);
        assert!(!b.less(&a, true));
    }
}

#[test]
fn json_lines() {
    let src = "{\"n\":1}\n{\"n\":2}\n{\"n\":3}\n";
    assert_eq!(get(src, "..n").raw(), "[1,2,3]");
}

#[test]
fn pretty_minify_round_trip() {
    let json = r#"{"a":{"b":[1,2,{"c":"x"}]},"d":null}"#;
    let p = pretty(json, &Default::default());
    assert_eq!(minify(&p), minify(json));
    assert!(is_valid_json(&p));
}

#[test]
fn error_handles_are_inert() {
    let res = get(r#"{"a":1}"#, "a.@bogus");
    assert!(!res.exists());
    assert_eq!(res.kind(), Kind::Null);
    assert_eq!(res.as_i64(), 0);
    assert!(matches!(res.cause(), Some(PathError::UnknownTransformer(_))));
}
