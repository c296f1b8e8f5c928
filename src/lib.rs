mod context;
pub mod error;
mod helpers;
mod kind;
mod path;
pub mod pretty;
mod resolver;
mod scanner;
pub mod transform;
mod wildcard;

pub use context::Context;
pub use error::PathError;
pub use helpers::{
    avg, contains, contains_match, count, distinct, filter, find_path, find_path_match,
    find_paths, find_paths_match, first, group_by, max, min, pluck, search, search_by_key,
    search_by_key_pattern, search_match, sort_by, sum,
};
pub use kind::Kind;
pub use pretty::{PrettyOptions, minify, pretty};
pub use scanner::strings::append_json_string;
pub use transform::{add_transformer, is_transformer_registered};
pub use wildcard::wildcard_match;

// ============================================================================
// Core API - Path queries
// ============================================================================

/// Query a JSON document with a dot-notation path.
///
/// The engine runs a single forward scan over the source bytes and returns
/// a [`Context`] handle referencing a slice of the input; the full document
/// is never materialized. Missing paths yield a non-existent handle rather
/// than an error — check with [`Context::exists`].
///
/// # Examples
///
/// ```
/// let json = r#"{"user":{"name":"Alice","roles":["Admin","Editor"]}}"#;
/// assert_eq!(jsonquery::get(json, "user.name").as_str(), "Alice");
/// assert_eq!(jsonquery::get(json, "user.roles.#").as_i64(), 2);
/// assert_eq!(jsonquery::get(json, "user.roles.1").as_str(), "Editor");
/// assert!(!jsonquery::get(json, "user.missing").exists());
/// ```
///
/// Array queries, transformers, and multi-selectors compose in the path:
///
/// ```
/// let json = r#"{"items":[{"p":1.2,"n":"a"},{"p":0.8,"n":"b"},{"p":3.5,"n":"c"}]}"#;
/// assert_eq!(jsonquery::get(json, "items.#(p>1.0).n").as_str(), "a");
/// assert_eq!(jsonquery::get(json, "items.#(p>1.0)#.n").raw(), r#"["a","c"]"#);
/// ```
pub fn get<'a>(json: &'a str, path: &str) -> Context<'a> {
    resolver::resolve(json, path, false)
}

/// Like [`get`], but surfaces malformed-path errors as a `Result` instead
/// of an error-bearing handle.
///
/// # Examples
///
/// ```
/// use jsonquery::PathError;
///
/// let res = jsonquery::try_get(r#"{"a":1}"#, "a.@nope");
/// assert_eq!(res.unwrap_err(), PathError::UnknownTransformer("nope".into()));
/// ```
pub fn try_get<'a>(json: &'a str, path: &str) -> Result<Context<'a>, PathError> {
    let ctx = get(json, path);
    match ctx.cause() {
        Some(err) => Err(err.clone()),
        None => Ok(ctx),
    }
}

/// [`get`] over raw bytes, avoiding a copy for valid UTF-8. Invalid UTF-8
/// falls back to a lossy conversion; the handle then owns its bytes.
///
/// # Examples
///
/// ```
/// let value = jsonquery::get_bytes(br#"{"n":3}"#, "n");
/// assert_eq!(value.as_i64(), 3);
/// ```
pub fn get_bytes<'a>(json: &'a [u8], path: &str) -> Context<'a> {
    match std::str::from_utf8(json) {
        Ok(s) => get(s, path),
        Err(_) => {
            let owned = String::from_utf8_lossy(json).into_owned();
            get(&owned, path).into_owned()
        }
    }
}

/// Capture the first JSON value of the document as a handle without any
/// path resolution. Trailing bytes are ignored.
///
/// # Examples
///
/// ```
/// let doc = jsonquery::parse(r#"  {"ok":true}  "#);
/// assert!(doc.is_object());
/// assert!(doc.get("ok").as_bool());
/// ```
pub fn parse(json: &str) -> Context<'_> {
    context::parse_value(json)
}

/// [`parse`] over raw bytes.
pub fn parse_bytes(json: &[u8]) -> Context<'_> {
    match std::str::from_utf8(json) {
        Ok(s) => parse(s),
        Err(_) => {
            let owned = String::from_utf8_lossy(json).into_owned();
            parse(&owned).into_owned()
        }
    }
}

/// Whether the input is a single well-formed RFC 8259 document. Trailing
/// whitespace is allowed; any other trailing bytes are rejected (unlike
/// [`get`], which only consumes the first value).
///
/// # Examples
///
/// ```
/// assert!(jsonquery::is_valid_json(r#"{"a":[1,2]}"#));
/// assert!(!jsonquery::is_valid_json(r#"{"a":[1,2]} extra"#));
/// assert!(!jsonquery::is_valid_json(r#"{"a":}"#));
/// ```
pub fn is_valid_json(json: &str) -> bool {
    scanner::validate(json.as_bytes())
}

#[cfg(test)]
mod tests;
