use super::*;

#[test]
fn project_picks_and_renames() {
    let json = r#"{"a":1,"b":2,"c":3}"#;
    assert_eq!(get(json, r#"@project:{"pick":["c","a"]}"#).raw(), r#"{"a":1,"c":3}"#);
    assert_eq!(
        get(json, r#"@project:{"rename":{"b":"beta"}}"#).raw(),
        r#"{"a":1,"beta":2,"c":3}"#
    );
    assert_eq!(
        get(json, r#"@project:{"pick":["b"],"rename":{"b":"beta"}}"#).raw(),
        r#"{"beta":2}"#
    );
    // non-objects pass through
    assert_eq!(get(r#"[1,2]"#, r#"@project:{"pick":["a"]}"#).raw(), "[1,2]");
}

#[test]
fn filter_operators() {
    let json = r#"[{"n":1,"s":"abc"},{"n":5,"s":"xyz"},{"n":3,"s":"abq"}]"#;
    assert_eq!(
        get(json, r#"@filter:{"key":"n","op":"gt","value":2}"#).raw(),
        r#"[{"n":5,"s":"xyz"},{"n":3,"s":"abq"}]"#
    );
    assert_eq!(
        get(json, r#"@filter:{"key":"n","op":"lte","value":3}"#).raw(),
        r#"[{"n":1,"s":"abc"},{"n":3,"s":"abq"}]"#
    );
    // op defaults to eq, compared on raw JSON
    assert_eq!(
        get(json, r#"@filter:{"key":"s","value":"xyz"}"#).raw(),
        r#"[{"n":5,"s":"xyz"}]"#
    );
    assert_eq!(
        get(json, r#"@filter:{"key":"s","op":"contains","value":"ab"}"#).raw(),
        r#"[{"n":1,"s":"abc"},{"n":3,"s":"abq"}]"#
    );
    assert_eq!(
        get(json, r#"@filter:{"key":"n","op":"ne","value":3}"#).raw(),
        r#"[{"n":1,"s":"abc"},{"n":5,"s":"xyz"}]"#
    );
}

#[test]
fn default_injects_missing_and_null() {
    let json = r#"{"a":null,"b":1}"#;
    assert_eq!(
        get(json, r#"@default:{"a":9,"c":3}"#).raw(),
        r#"{"a":9,"b":1,"c":3}"#
    );
    // present non-null values are left alone
    assert_eq!(
        get(r#"{"a":7}"#, r#"@default:{"a":9}"#).raw(),
        r#"{"a":7}"#
    );
}

#[test]
fn coerce_scalars() {
    assert_eq!(get(r#"{"v":5}"#, r#"v.@coerce:{"to":"string"}"#).raw(), r#""5""#);
    assert_eq!(get(r#"{"v":"3.5"}"#, r#"v.@coerce:{"to":"number"}"#).raw(), "3.5");
    assert_eq!(get(r#"{"v":"abc"}"#, r#"v.@coerce:{"to":"number"}"#).raw(), "null");
    assert_eq!(get(r#"{"v":true}"#, r#"v.@coerce:{"to":"number"}"#).raw(), "1");
    assert_eq!(get(r#"{"v":"t"}"#, r#"v.@coerce:{"to":"bool"}"#).raw(), "true");
    assert_eq!(get(r#"{"v":0}"#, r#"v.@coerce:{"to":"bool"}"#).raw(), "false");
    // containers pass through untouched
    assert_eq!(get(r#"{"v":[1]}"#, r#"v.@coerce:{"to":"string"}"#).raw(), "[1]");
}

#[test]
fn aggregates() {
    let json = r#"{"xs":[3,1,"skip",2,true]}"#;
    assert_eq!(get(json, "xs.@count").as_i64(), 5);
    assert_eq!(get(json, "xs.@first").as_i64(), 3);
    assert_eq!(get(json, "xs.@last").raw(), "true");
    assert_eq!(get(json, "xs.@sum").as_f64(), 6.0);
    assert_eq!(get(json, "xs.@min").as_f64(), 1.0);
    assert_eq!(get(json, "xs.@max").as_f64(), 3.0);
}

#[test]
fn aggregates_on_empty_and_missing() {
    let json = r#"{"xs":[]}"#;
    assert_eq!(get(json, "xs.@count").as_i64(), 0);
    assert_eq!(get(json, "xs.@sum").raw(), "0");
    assert_eq!(get(json, "xs.@min").raw(), "null");
    assert_eq!(get(json, "xs.@first").raw(), "null");
    // non-arrays aggregate to the empty cases
    assert_eq!(get(r#"{"v":1}"#, "v.@count").as_i64(), 0);
}

#[test]
fn pluck_transformer_drops_missing() {
    let json = r#"[{"n":1},{"x":9},{"n":3}]"#;
    assert_eq!(get(json, "@pluck:n").raw(), "[1,3]");
    let json = r#"{"rows":[{"u":{"id":1}},{"u":{}},{"u":{"id":2}}]}"#;
    assert_eq!(get(json, "rows.@pluck:\"u.id\"").raw(), "[1,2]");
}
