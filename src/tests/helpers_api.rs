use super::*;

fn store_json() -> &'static str {
    r#"{
      "store": {
        "books": [
          {"title":"Dune","price":9.99,"genre":"scifi"},
          {"title":"Emma","price":7.50,"genre":"classic"},
          {"title":"Hyperion","price":9.99,"genre":"scifi"}
        ],
        "owner": {"name":"Ada"}
      },
      "name": "corner shop"
    }"#
}

#[test]
fn search_collects_recursively() {
    let res = search(store_json(), "name");
    assert_eq!(res.raw(), r#"["corner shop","Ada"]"#);
    let res = search(store_json(), "owner.name");
    assert_eq!(res.raw(), r#"["Ada"]"#);
}

#[test]
fn search_by_key_and_patterns() {
    let res = search_by_key(store_json(), &["title"]);
    assert_eq!(res.raw(), r#"["Dune","Emma","Hyperion"]"#);
    let res = search_by_key(store_json(), &["title", "name"]);
    assert_eq!(res.array().len(), 5);
    let res = search_by_key_pattern(store_json(), "t*e");
    assert_eq!(res.raw(), r#"["Dune","Emma","Hyperion"]"#);
    let res = search_match(store_json(), "pri?e");
    assert_eq!(res.raw(), "[9.99,7.50,9.99]");
}

#[test]
fn find_paths_round_trip() {
    let json = store_json();
    assert_eq!(find_path(json, "Ada"), "store.owner.name");
    assert_eq!(find_path(json, "not here"), "");
    let paths = find_paths(json, "9.99");
    assert_eq!(
        paths,
        vec!["store.books.0.price", "store.books.2.price"]
    );
    for p in &paths {
        assert_eq!(get(json, p).as_f64(), 9.99);
    }
    assert_eq!(find_path_match(json, "Hyper*"), "store.books.2.title");
    assert_eq!(find_paths_match(json, "*i*").len(), 4);
}

#[test]
fn contains_by_kind() {
    let json = store_json();
    assert!(contains(json, "name", "corner"));
    assert!(!contains(json, "name", "mall"));
    assert!(contains(json, "store.owner", "name"));
    assert!(contains(json, "store.books.#.genre", "classic"));
    assert!(contains_match(json, "name", "corner*"));
    assert!(!contains_match(json, "name", "corner"));
    assert!(!contains(json, "missing", "x"));
}

#[test]
fn aggregate_helpers() {
    let json = r#"{"xs":[4,1,"skip",3]}"#;
    assert_eq!(count(json, "xs"), 4);
    assert_eq!(sum(json, "xs"), 8.0);
    assert_eq!(min(json, "xs"), Some(1.0));
    assert_eq!(max(json, "xs"), Some(4.0));
    assert_eq!(avg(json, "xs"), Some(8.0 / 3.0));
    assert_eq!(count(json, "missing"), 0);
    assert_eq!(sum(json, "missing"), 0.0);
    assert_eq!(min(json, "missing"), None);
    assert_eq!(avg(r#"{"xs":[]}"#, "xs"), None);
    // count also covers objects
    assert_eq!(count(r#"{"o":{"a":1,"b":2}}"#, "o"), 2);
}

#[test]
fn filter_and_first_with_predicates() {
    let json = store_json();
    let cheap = filter(json, "store.books", |b| b.get("price").as_f64() < 9.0);
    assert_eq!(cheap.len(), 1);
    assert_eq!(cheap[0].get("title").as_str(), "Emma");

    let hit = first(json, "store.books", |b| b.get("genre").as_str() == "scifi");
    assert_eq!(hit.unwrap().get("title").as_str(), "Dune");
    assert!(first(json, "store.books", |b| b.get("price").as_f64() > 100.0).is_none());
}

#[test]
fn distinct_preserves_first_occurrence() {
    let json = r#"{"xs":[1,2,1,"a",2,"a",3]}"#;
    assert_eq!(distinct(json, "xs").raw(), r#"[1,2,"a",3]"#);
}

#[test]
fn pluck_helper_projects_fields() {
    let res = pluck(store_json(), "store.books", &["title", "price"]);
    assert_eq!(
        res.raw(),
        r#"[{"title":"Dune","price":9.99},{"title":"Emma","price":7.50},{"title":"Hyperion","price":9.99}]"#
    );
    // elements with none of the fields are dropped
    let res = pluck(r#"{"xs":[{"a":1},{"b":2}]}"#, "xs", &["a"]);
    assert_eq!(res.raw(), r#"[{"a":1}]"#);
}

#[test]
fn group_by_first_appearance_order() {
    let res = group_by(store_json(), "store.books", "genre");
    let scifi = res.get("scifi");
    assert_eq!(scifi.array().len(), 2);
    let m = res.map();
    assert_eq!(m[0].0, "scifi");
    assert_eq!(m[1].0, "classic");
}

#[test]
fn sort_by_key_field() {
    let res = sort_by(store_json(), "store.books", "title", true);
    assert_eq!(
        get(res.raw(), "#.title").raw(),
        r#"["Dune","Emma","Hyperion"]"#
    );
    let res = sort_by(store_json(), "store.books", "price", false);
    assert_eq!(res.get("0.price").as_f64(), 9.99);
    assert_eq!(res.get("2.price").as_f64(), 7.5);
}
