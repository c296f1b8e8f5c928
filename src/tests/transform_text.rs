use super::*;

fn s(json: &str, path: &str) -> String {
    get(json, path).as_str().into_owned()
}

#[test]
fn case_transformers() {
    let json = r#"{"s":"Hello World"}"#;
    assert_eq!(s(json, "s.@uppercase"), "HELLO WORLD");
    assert_eq!(s(json, "s.@lowercase"), "hello world");
    assert_eq!(s(json, "s.@upper"), "HELLO WORLD");
    assert_eq!(s(json, "s.@lower"), "hello world");
    assert_eq!(s(json, "s.@flip"), "hELLO wORLD");
    assert_eq!(s(r#"{"s":"  padded  "}"#, "s.@trim"), "padded");
}

#[test]
fn word_case_conversions() {
    let json = r#"{"s":"helloWorld two"}"#;
    assert_eq!(s(json, "s.@snakecase"), "hello_world_two");
    assert_eq!(s(json, "s.@camelcase"), "helloWorldTwo");
    assert_eq!(s(json, "s.@kebabcase"), "hello-world-two");
    // aliases resolve to the same functions
    assert_eq!(s(json, "s.@snake"), "hello_world_two");
    assert_eq!(s(json, "s.@camel"), "helloWorldTwo");
    assert_eq!(s(json, "s.@kebab"), "hello-world-two");
}

#[test]
fn hex_and_bin() {
    assert_eq!(s(r#"{"n":255}"#, "n.@hex"), "ff");
    assert_eq!(s(r#"{"n":-16}"#, "n.@hex"), "-10");
    assert_eq!(s(r#"{"n":5}"#, "n.@bin"), "101");
    assert_eq!(s(r#"{"s":"AB"}"#, "s.@hex"), "4142");
    assert_eq!(s(r#"{"s":"A"}"#, "s.@bin"), "01000001");
}

#[test]
fn word_count_emits_a_number() {
    let json = r#"{"s":"one two  three"}"#;
    let res = get(json, "s.@wc");
    assert_eq!(res.kind(), Kind::Number);
    assert_eq!(res.as_i64(), 3);
    assert_eq!(get(json, "s.@wordCount").as_i64(), 3);
}

#[test]
fn padding() {
    assert_eq!(s(r#"{"s":"42"}"#, r#"s.@padLeft:{"width":5,"pad":"0"}"#), "00042");
    assert_eq!(s(r#"{"s":"ab"}"#, r#"s.@padRight:{"width":5,"pad":"xy"}"#), "abxyx");
    // already wide enough: unchanged
    assert_eq!(s(r#"{"s":"hello"}"#, r#"s.@padLeft:{"width":3}"#), "hello");
}

#[test]
fn insert_and_replace() {
    assert_eq!(
        s(r#"{"s":"hello world"}"#, r#"s.@insertAt:{"index":5,"text":","}"#),
        "hello, world"
    );
    assert_eq!(
        s(r#"{"s":"abc"}"#, r#"s.@insertAt:{"index":99,"text":"!"}"#),
        "abc!"
    );
    let json = r#"{"s":"a-b-c"}"#;
    assert_eq!(s(json, r#"s.@replace:{"old":"-","new":"+"}"#), "a+b-c");
    assert_eq!(s(json, r#"s.@replaceAll:{"old":"-","new":"+"}"#), "a+b+c");
}

#[test]
fn text_transformers_emit_valid_json_strings() {
    let json = r#"{"s":"quote\" and \\ slash"}"#;
    let res = get(json, "s.@uppercase");
    assert!(is_valid_json(res.raw()));
    assert!(res.as_str().contains("QUOTE\""));
}

#[test]
fn non_string_inputs_use_raw_text() {
    assert_eq!(s(r#"{"n":12.5}"#, "n.@uppercase"), "12.5");
    assert_eq!(s(r#"{"b":true}"#, "b.@uppercase"), "TRUE");
}
