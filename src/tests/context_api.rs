use super::*;

#[test]
fn typed_accessors_per_kind() {
    let json = r#"{"n":3.5,"i":42,"s":"7","b":true,"f":false,"z":null,"t":"text"}"#;
    assert_eq!(get(json, "n").as_f64(), 3.5);
    assert_eq!(get(json, "n").as_i64(), 3);
    assert_eq!(get(json, "i").as_u64(), 42);
    assert_eq!(get(json, "s").as_i64(), 7);
    assert_eq!(get(json, "s").as_f64(), 7.0);
    assert!(get(json, "b").as_bool());
    assert_eq!(get(json, "b").as_i64(), 1);
    assert!(!get(json, "f").as_bool());
    assert_eq!(get(json, "z").as_i64(), 0);
    assert_eq!(get(json, "z").as_str(), "");
    assert_eq!(get(json, "t").as_f64(), 0.0);
    assert!(get(json, "b").is_bool());
    assert!(!get(json, "n").is_bool());
}

#[test]
fn overflow_saturates_to_zero() {
    let json = r#"{"big":99999999999999999999999999999,"neg":-5}"#;
    assert_eq!(get(json, "big").as_i64(), 0);
    assert_eq!(get(json, "neg").as_u64(), 0);
    assert_eq!(get(json, "neg").as_i64(), -5);
}

#[test]
fn string_bool_coercions() {
    for truthy in [r#""1""#, r#""t""#, r#""true""#, r#""TRUE""#] {
        assert!(parse(truthy).as_bool(), "{truthy} should be true");
    }
    for falsy in [r#""0""#, r#""no""#, r#""false""#, r#""""#] {
        assert!(!parse(falsy).as_bool(), "{falsy} should be false");
    }
}

#[test]
fn time_accessor() {
    let json = r#"{"ts":"2014-11-28T12:00:09Z","d":"2014-11-28 12:00:09","bad":"yesterday"}"#;
    let ts = get(json, "ts").as_time(None).unwrap();
    assert_eq!(ts.timestamp(), 1_417_176_009);
    let d = get(json, "d").as_time(Some("%Y-%m-%d %H:%M:%S")).unwrap();
    assert_eq!(d.timestamp(), 1_417_176_009);
    assert!(get(json, "bad").as_time(None).is_none());
    assert!(get(json, "missing").as_time(None).is_none());
}

#[test]
fn decoded_strings() {
    let json = r#"{"s":"line\nbreak é 😀"}"#;
    let s = get(json, "s");
    assert_eq!(s.as_str(), "line\nbreak é 😀");
    assert!(s.raw().starts_with('"'));
}

#[test]
fn foreach_objects_and_arrays() {
    let json = r#"{"a":1,"b":2,"c":3}"#;
    let mut seen = Vec::new();
    parse(json).foreach(|k, v| {
        seen.push((k.as_str().into_owned(), v.as_i64()));
        true
    });
    assert_eq!(seen, vec![("a".into(), 1), ("b".into(), 2), ("c".into(), 3)]);

    let mut count = 0;
    parse(json).foreach(|_, _| {
        count += 1;
        count < 2
    });
    assert_eq!(count, 2, "visitor returning false aborts");

    let mut elems = Vec::new();
    parse("[10,20]").foreach(|k, v| {
        elems.push((k.as_i64(), v.as_i64()));
        true
    });
    assert_eq!(elems, vec![(0, 10), (1, 20)]);

    // scalars visit once with a non-existent key
    let mut hits = 0;
    parse("42").foreach(|k, v| {
        assert!(!k.exists());
        assert_eq!(v.as_i64(), 42);
        hits += 1;
        true
    });
    assert_eq!(hits, 1);
}

#[test]
fn array_and_map_materialization() {
    let arr = get(r#"{"xs":[1,"two",true]}"#, "xs").array();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[1].as_str(), "two");

    // first occurrence wins in map()
    let m = parse(r#"{"k":1,"j":2,"k":3}"#).map();
    assert_eq!(m.len(), 2);
    assert_eq!(m[0].0, "k");
    assert_eq!(m[0].1.as_i64(), 1);
    assert_eq!(m[1].0, "j");

    // a scalar materializes as a single-element array
    assert_eq!(parse("5").array().len(), 1);
    assert!(parse("null").array().is_empty());
}

#[test]
fn nested_get_shifts_offsets() {
    let json = r#"{"a":{"b":{"c":1}}}"#;
    let a = get(json, "a");
    let c = a.get("b.c");
    assert_eq!(c.as_i64(), 1);
    assert_eq!(&json[c.index()..c.index() + 1], "1");
    assert_eq!(c.path(json), "a.b.c");
}

#[test]
fn get_multi_runs_each_path() {
    let json = users_json();
    let res = parse(json).get_multi(&["user.name", "friends.#", "missing"]);
    assert_eq!(res[0].as_str(), "Alice");
    assert_eq!(res[1].as_i64(), 3);
    assert!(!res[2].exists());
}

#[test]
fn cross_kind_total_order() {
    let sorted = ["null", "false", "3.14", r#""apple""#, "true", r#"{"k":1}"#];
    let handles: Vec<_> = sorted.iter().map(|s| parse(s)).collect();
    for i in 0..handles.len() {
        for j in 0..handles.len() {
            assert_eq!(
                handles[i].less(&handles[j], true),
                i < j,
                "less({}, {})",
                sorted[i],
                sorted[j]
            );
        }
    }
}

#[test]
fn string_order_case_sensitivity() {
    let a = parse(r#""Apple""#);
    let b = parse(r#""apple""#);
    assert!(a.less(&b, true), "uppercase sorts first byte-wise");
    assert!(!a.less(&b, false));
    assert!(!b.less(&a, false), "equal when case folded");
}

#[test]
fn display_is_the_string_form() {
    assert_eq!(get(r#"{"n":3.5}"#, "n").to_string(), "3.5");
    assert_eq!(get(r#"{"s":"hi"}"#, "s").to_string(), "hi");
    assert_eq!(get(r#"{"b":[1,2]}"#, "b").to_string(), "[1,2]");
}

#[cfg(feature = "serde")]
#[test]
fn value_materializes_recursively() {
    let json = r#"{"a":[1,{"b":"x"},null],"ok":true}"#;
    let v = parse(json).value();
    assert_eq!(v, serde_json::json!({"a":[1,{"b":"x"},null],"ok":true}));
    assert_eq!(get(json, "a.1.b").value(), serde_json::json!("x"));
    assert_eq!(get(json, "nope").value(), serde_json::Value::Null);
}

#[cfg(feature = "serde")]
#[test]
fn context_serializes_as_its_value() {
    let ctx = get(r#"{"a":{"n":1}}"#, "a");
    let out = serde_json::to_string(&ctx).unwrap();
    assert_eq!(out, r#"{"n":1}"#);
}

#[cfg(feature = "serde")]
#[test]
fn engine_agrees_with_serde_oracle() {
    let json = users_json();
    let oracle: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(
        get(json, "friends.1.first").as_str(),
        oracle["friends"][1]["first"].as_str().unwrap()
    );
    assert_eq!(
        get(json, "friends.#").as_u64() as usize,
        oracle["friends"].as_array().unwrap().len()
    );
}
