//! `#(...)` query predicates: parsing and element matching.

use std::borrow::Cow;

use crate::context::Context;
use crate::error::PathError;
use crate::kind::Kind;
use crate::scanner::{number, strings};
use crate::wildcard::wildcard_match;

/// A parsed `#(key op value)` predicate. `op` is empty for a bare
/// existence query `#(key)`; `all` is set by the trailing `#`.
#[derive(Debug, Default)]
pub(crate) struct Query<'p> {
    pub all: bool,
    pub path: &'p str,
    pub op: &'p str,
    pub value: &'p str,
}

/// Parse a query starting at `#(`. Returns the query and the remainder
/// after the closing `)` (and the optional `#`).
pub(crate) fn parse_query(path: &str) -> Result<(Query<'_>, &str), PathError> {
    let b = path.as_bytes();
    debug_assert!(path.starts_with("#("));
    let mut depth = 1usize;
    let mut i = 2usize;
    while i < b.len() {
        match b[i] {
            b'\\' => i += 1,
            b'"' => {
                i = super::skip_path_string(b, i);
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        i += 1;
    }
    if depth != 0 {
        return Err(PathError::UnterminatedQuery);
    }
    let body = &path[2..i];
    let mut rest = &path[i + 1..];
    let mut q = split_predicate(body);
    if rest.as_bytes().first() == Some(&b'#') {
        q.all = true;
        rest = &rest[1..];
    }
    Ok((q, rest))
}

/// Split a predicate body into sub-path, operator, and value. The
/// operator is the first top-level occurrence of one of the comparison
/// tokens; everything inside strings or nested brackets is opaque.
fn split_predicate(body: &str) -> Query<'_> {
    let b = body.as_bytes();
    let mut depth = 0usize;
    let mut i = 0usize;
    while i < b.len() {
        match b[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'"' => {
                i = super::skip_path_string(b, i);
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => {
                for op in ["==", "!=", "<=", ">=", "!%", "<", ">", "%", "="] {
                    if body[i..].starts_with(op) {
                        return Query {
                            all: false,
                            path: body[..i].trim(),
                            op,
                            value: body[i + op.len()..].trim(),
                        };
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    Query {
        all: false,
        path: body.trim(),
        op: "",
        value: "",
    }
}

/// Evaluate the predicate against the value its sub-path produced for one
/// element. A non-existent candidate never matches.
pub(crate) fn query_matches(q: &Query<'_>, candidate: &Context<'_>) -> bool {
    if !candidate.exists() {
        return false;
    }
    if q.op.is_empty() {
        return true;
    }
    if let Some(class) = q.value.strip_prefix('~') {
        let truthy = candidate.as_bool();
        let is = match class {
            "true" => truthy,
            "false" => !truthy,
            "null" => candidate.kind() == Kind::Null,
            "*" => true,
            _ => return false,
        };
        return match q.op {
            "==" | "=" => is,
            "!=" => !is,
            _ => false,
        };
    }
    let lit = literal_context(q.value);
    match q.op {
        "==" | "=" => kinds_equal(candidate, &lit),
        "!=" => !kinds_equal(candidate, &lit),
        "<" => candidate.less(&lit, true),
        "<=" => candidate.less(&lit, true) || kinds_equal(candidate, &lit),
        ">" => lit.less(candidate, true),
        ">=" => lit.less(candidate, true) || kinds_equal(candidate, &lit),
        "%" => wildcard_match(&candidate.as_str(), &lit.as_str()),
        "!%" => !wildcard_match(&candidate.as_str(), &lit.as_str()),
        _ => false,
    }
}

/// Build a comparison handle from the literal written in the path.
fn literal_context(lit: &str) -> Context<'static> {
    let lit = lit.trim();
    let b = lit.as_bytes();
    match b.first().copied() {
        Some(b'"') => {
            let text = strings::unquote(lit).into_owned();
            Context {
                kind: Kind::String,
                raw: Cow::Owned(lit.to_string()),
                text: Cow::Owned(text),
                ..Context::not_found()
            }
        }
        Some(b't') if lit == "true" => Context {
            kind: Kind::True,
            raw: Cow::Owned("true".to_string()),
            num: 1.0,
            ..Context::not_found()
        },
        Some(b'f') if lit == "false" => Context {
            kind: Kind::False,
            raw: Cow::Owned("false".to_string()),
            ..Context::not_found()
        },
        Some(b'n') if lit == "null" => Context {
            kind: Kind::Null,
            raw: Cow::Owned("null".to_string()),
            ..Context::not_found()
        },
        Some(b'-' | b'0'..=b'9') => Context {
            kind: Kind::Number,
            num: number::parse_f64(lit),
            raw: Cow::Owned(lit.to_string()),
            ..Context::not_found()
        },
        // Bare words compare as strings; this also covers unquoted
        // wildcard patterns next to % / !%.
        _ => Context {
            kind: Kind::String,
            raw: Cow::Owned(strings::json_string(lit)),
            text: Cow::Owned(lit.to_string()),
            ..Context::not_found()
        },
    }
}

/// Kind-normalised equality: numbers by value, strings by decoded bytes,
/// booleans and null by kind, JSON by raw bytes. Mismatched kinds are
/// never equal.
fn kinds_equal(a: &Context<'_>, b: &Context<'_>) -> bool {
    if a.kind() != b.kind() {
        return false;
    }
    match a.kind() {
        Kind::Number => a.as_f64() == b.as_f64(),
        Kind::String => a.as_str() == b.as_str(),
        Kind::Json => a.raw() == b.raw(),
        _ => true,
    }
}
