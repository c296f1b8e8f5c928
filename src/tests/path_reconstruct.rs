use super::*;

#[test]
fn simple_round_trips() {
    let json = users_json();
    for path in [
        "user.name",
        "user.roles.1",
        "friends.2.first",
        "friends.0.nets.2",
        "version",
    ] {
        let res = get(json, path);
        assert!(res.exists(), "{path}");
        assert_eq!(res.path(json), path, "reconstruction of {path}");
    }
}

#[test]
fn reconstruction_handles_whitespace_and_nesting() {
    let json = "{\n  \"a\" : [ { \"b\" : [ 10 , 20 ] } ]\n}";
    let res = get(json, "a.0.b.1");
    assert_eq!(res.as_i64(), 20);
    assert_eq!(res.path(json), "a.0.b.1");
}

#[test]
fn keys_needing_escapes() {
    let json = r#"{"fav.movie":"x","a|b":{"c#d":1}}"#;
    let res = get(json, "fav\\.movie");
    assert_eq!(res.path(json), "fav\\.movie");
    let res = get(json, "a\\|b.c\\#d");
    assert_eq!(res.as_i64(), 1);
    assert_eq!(res.path(json), "a\\|b.c\\#d");
    // the reconstructed path resolves back to the same value
    let p = res.path(json);
    assert_eq!(get(json, &p).index(), res.index());
}

#[test]
fn string_values_containing_brackets() {
    let json = r#"{"a":"[not an array]","b":{"c":"}"}}"#;
    assert_eq!(get(json, "a").path(json), "a");
    assert_eq!(get(json, "b.c").path(json), "b.c");
}

#[test]
fn synthetic_results_have_no_path() {
    let json = users_json();
    assert_eq!(get(json, "friends.@reverse").path(json), "");
    assert_eq!(get(json, "{version}").path(json), "");
    assert_eq!(get(json, "friends.#.first").path(json), "");
    assert_eq!(get(json, "missing").path(json), "");
}

#[test]
fn paths_for_query_results() {
    let json = users_json();
    let all = get(json, r#"friends.#(last=="Murphy")#"#);
    let paths = all.paths(json);
    assert_eq!(paths, vec!["friends.0", "friends.2"]);
    for (p, ix) in paths.iter().zip(all.indexes()) {
        assert_eq!(get(json, p).index(), *ix);
    }
}

#[test]
fn paths_for_plucked_fields() {
    let json = users_json();
    let firsts = get(json, "friends.#.first");
    assert_eq!(
        firsts.paths(json),
        vec!["friends.0.first", "friends.1.first", "friends.2.first"]
    );
    assert!(get(json, "user.name").paths(json).is_empty());
}

#[test]
fn root_value_path_is_empty() {
    let json = r#"{"a":1}"#;
    assert_eq!(parse(json).path(json), "");
}
