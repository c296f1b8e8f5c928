//! String-only transformers: case conversion, padding, replacement.
//!
//! Each treats its input as text — unquoting and unescaping JSON strings,
//! using the raw token for everything else — and emits a JSON string
//! (except `wc`, which emits a number).

use std::collections::HashMap;
use std::sync::Arc;

use super::TransformerFn;
use crate::context::parse_value;
use crate::kind::Kind;
use crate::scanner::strings::json_string;

pub(super) fn install(map: &mut HashMap<String, Arc<TransformerFn>>) {
    let mut alias = |names: &[&str], f: Arc<TransformerFn>| {
        for n in names {
            map.insert(n.to_string(), f.clone());
        }
    };

    alias(
        &["uppercase", "upper"],
        Arc::new(|j: &str, _: &str| json_string(&text_input(j).to_uppercase())),
    );
    alias(
        &["lowercase", "lower"],
        Arc::new(|j: &str, _: &str| json_string(&text_input(j).to_lowercase())),
    );
    alias(
        &["flip"],
        Arc::new(|j: &str, _: &str| {
            let flipped: String = text_input(j)
                .chars()
                .flat_map(|c| {
                    if c.is_uppercase() {
                        c.to_lowercase().collect::<Vec<_>>()
                    } else {
                        c.to_uppercase().collect::<Vec<_>>()
                    }
                })
                .collect();
            json_string(&flipped)
        }),
    );
    alias(
        &["trim"],
        Arc::new(|j: &str, _: &str| json_string(text_input(j).trim())),
    );
    alias(
        &["snakecase", "snake"],
        Arc::new(|j: &str, _: &str| {
            let parts: Vec<String> = words(&text_input(j))
                .iter()
                .map(|w| w.to_lowercase())
                .collect();
            json_string(&parts.join("_"))
        }),
    );
    alias(
        &["camelcase", "camel"],
        Arc::new(|j: &str, _: &str| {
            let ws = words(&text_input(j));
            let mut out = String::new();
            for (n, w) in ws.iter().enumerate() {
                if n == 0 {
                    out.push_str(&w.to_lowercase());
                } else {
                    out.push_str(&capitalize(w));
                }
            }
            json_string(&out)
        }),
    );
    alias(
        &["kebabcase", "kebab"],
        Arc::new(|j: &str, _: &str| {
            let parts: Vec<String> = words(&text_input(j))
                .iter()
                .map(|w| w.to_lowercase())
                .collect();
            json_string(&parts.join("-"))
        }),
    );
    alias(&["hex"], Arc::new(hex));
    alias(&["bin"], Arc::new(bin));
    alias(
        &["wc", "wordCount"],
        Arc::new(|j: &str, _: &str| text_input(j).split_whitespace().count().to_string()),
    );
    alias(
        &["padLeft"],
        Arc::new(|j: &str, arg: &str| pad(j, arg, true)),
    );
    alias(
        &["padRight"],
        Arc::new(|j: &str, arg: &str| pad(j, arg, false)),
    );
    alias(&["insertAt"], Arc::new(insert_at));
    alias(
        &["replace"],
        Arc::new(|j: &str, arg: &str| replace(j, arg, false)),
    );
    alias(
        &["replaceAll"],
        Arc::new(|j: &str, arg: &str| replace(j, arg, true)),
    );
}

/// The textual payload of the input: decoded string body, or the trimmed
/// raw token for non-strings.
fn text_input(j: &str) -> String {
    let c = parse_value(j);
    match c.kind() {
        Kind::String => c.as_str().into_owned(),
        _ => j.trim().to_string(),
    }
}

/// Split into words on non-alphanumerics and lower-to-upper camel bumps.
fn words(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut prev_lower = false;
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() && prev_lower && !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
            }
            cur.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_numeric();
        } else {
            if !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
            }
            prev_lower = false;
        }
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

fn capitalize(w: &str) -> String {
    let mut chars = w.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Integers render in base 16; other values hex-encode their UTF-8 bytes.
fn hex(j: &str, _: &str) -> String {
    let c = parse_value(j);
    if c.kind() == Kind::Number && c.as_f64().fract() == 0.0 {
        let n = c.as_i64();
        let s = if n < 0 {
            format!("-{:x}", n.unsigned_abs())
        } else {
            format!("{:x}", n)
        };
        return json_string(&s);
    }
    let enc: String = text_input(j).bytes().map(|b| format!("{:02x}", b)).collect();
    json_string(&enc)
}

/// Integers render in base 2; other values encode each UTF-8 byte as
/// eight bits.
fn bin(j: &str, _: &str) -> String {
    let c = parse_value(j);
    if c.kind() == Kind::Number && c.as_f64().fract() == 0.0 {
        let n = c.as_i64();
        let s = if n < 0 {
            format!("-{:b}", n.unsigned_abs())
        } else {
            format!("{:b}", n)
        };
        return json_string(&s);
    }
    let enc: String = text_input(j).bytes().map(|b| format!("{:08b}", b)).collect();
    json_string(&enc)
}

/// `{"width": n, "pad": s}` — pad to `n` characters; `pad` defaults to a
/// single space and is repeated/truncated to fit exactly.
fn pad(j: &str, arg: &str, left: bool) -> String {
    let s = text_input(j);
    let a = parse_value(arg);
    let width = a.get("width").as_u64() as usize;
    let pad_ctx = a.get("pad");
    let pad = if pad_ctx.exists() {
        pad_ctx.as_str().into_owned()
    } else {
        " ".to_string()
    };
    let have = s.chars().count();
    if width <= have || pad.is_empty() {
        return json_string(&s);
    }
    let fill: String = pad.chars().cycle().take(width - have).collect();
    let out = if left {
        format!("{fill}{s}")
    } else {
        format!("{s}{fill}")
    };
    json_string(&out)
}

/// `{"index": n, "text": s}` — insert at character index `n`, clamped to
/// the string bounds.
fn insert_at(j: &str, arg: &str) -> String {
    let s = text_input(j);
    let a = parse_value(arg);
    let at = (a.get("index").as_u64() as usize).min(s.chars().count());
    let text = a.get("text").as_str().into_owned();
    let mut out = String::with_capacity(s.len() + text.len());
    for (n, c) in s.chars().enumerate() {
        if n == at {
            out.push_str(&text);
        }
        out.push(c);
    }
    if at >= s.chars().count() {
        out.push_str(&text);
    }
    json_string(&out)
}

/// `{"old": s, "new": s}` — replace the first (or every) occurrence.
fn replace(j: &str, arg: &str, all: bool) -> String {
    let s = text_input(j);
    let a = parse_value(arg);
    let old = a.get("old").as_str().into_owned();
    let new = a.get("new").as_str().into_owned();
    if old.is_empty() {
        return json_string(&s);
    }
    let out = if all {
        s.replace(&old, &new)
    } else {
        s.replacen(&old, &new, 1)
    };
    json_string(&out)
}
