//! Direct-call search and aggregation helpers.
//!
//! Everything here is definable by composing [`get`](crate::get) with a
//! built-in transformer or a recursive walk over the document; the
//! functions exist so callers don't have to assemble path strings for the
//! common cases.

use crate::context::{Context, escape_component, parse_value};
use crate::kind::Kind;
use crate::wildcard::wildcard_match;

/// Depth-first visit of every value in the document, outermost first.
/// `comps` holds the escaped path components leading to the node. The
/// visitor returns `false` to stop the walk.
fn walk<'a>(
    node: &Context<'a>,
    comps: &mut Vec<String>,
    visit: &mut dyn FnMut(&[String], &Context<'a>) -> bool,
) -> bool {
    if !visit(comps, node) {
        return false;
    }
    if node.kind() != Kind::Json {
        return true;
    }
    let is_obj = node.is_object();
    let mut cont = true;
    let mut ord = 0usize;
    node.foreach(|k, v| {
        let comp = if is_obj {
            escape_component(&k.as_str())
        } else {
            ord.to_string()
        };
        ord += 1;
        comps.push(comp);
        cont = walk(&v, comps, visit);
        comps.pop();
        cont
    });
    cont
}

fn walk_doc<'a>(json: &'a str, visit: &mut dyn FnMut(&[String], &Context<'a>) -> bool) {
    let root = parse_value(json);
    if root.exists() {
        let mut comps = Vec::new();
        walk(&root, &mut comps, visit);
    }
}

/// Raw tokens of every value occurring at `path` anywhere in the tree,
/// outermost first. The sub-path is applied at each object node (arrays
/// are traversed, not queried, so element plucks don't double-count).
/// Backs the `@search` transformer.
pub(crate) fn search_collect(json: &str, path: &str) -> Vec<String> {
    let mut out = Vec::new();
    walk_doc(json, &mut |_, node| {
        if node.is_object() {
            let hit = node.get(path);
            if hit.exists() && !hit.raw().is_empty() {
                out.push(hit.raw().to_string());
            }
        }
        true
    });
    out
}

fn assemble(parts: Vec<String>) -> Context<'static> {
    let mut out = String::with_capacity(parts.iter().map(|p| p.len() + 1).sum::<usize>() + 2);
    out.push('[');
    for (n, p) in parts.iter().enumerate() {
        if n > 0 {
            out.push(',');
        }
        out.push_str(p);
    }
    out.push(']');
    Context::from_owned_raw(out)
}

/// Recursive descent: collect every value occurring at `path` anywhere in
/// the tree into a new array.
pub fn search(json: &str, path: &str) -> Context<'static> {
    assemble(search_collect(json, path))
}

/// Collect the value of every object member whose key is one of `keys`,
/// anywhere in the tree.
pub fn search_by_key(json: &str, keys: &[&str]) -> Context<'static> {
    let needles: Vec<String> = keys.iter().map(|k| escape_component(k)).collect();
    let mut out = Vec::new();
    walk_doc(json, &mut |comps, node| {
        if let Some(last) = comps.last() {
            if needles.iter().any(|n| n == last) {
                out.push(node.raw().to_string());
            }
        }
        true
    });
    assemble(out)
}

/// Like [`search_by_key`], with a wildcard pattern instead of exact keys.
pub fn search_by_key_pattern(json: &str, pattern: &str) -> Context<'static> {
    let mut out = Vec::new();
    walk_doc(json, &mut |comps, node| {
        if let Some(last) = comps.last() {
            if wildcard_match(last, pattern) {
                out.push(node.raw().to_string());
            }
        }
        true
    });
    assemble(out)
}

/// Collect every value whose path's final component (object key or array
/// index) matches the wildcard pattern.
pub fn search_match(json: &str, pattern: &str) -> Context<'static> {
    search_by_key_pattern(json, pattern)
}

/// The dot-path of the first value whose string form equals `value`, or
/// empty when there is none.
pub fn find_path(json: &str, value: &str) -> String {
    let mut found = String::new();
    walk_doc(json, &mut |comps, node| {
        if node.kind() != Kind::Json && node.as_str() == value {
            found = comps.join(".");
            return false;
        }
        true
    });
    found
}

/// Every dot-path whose value's string form equals `value`.
pub fn find_paths(json: &str, value: &str) -> Vec<String> {
    let mut out = Vec::new();
    walk_doc(json, &mut |comps, node| {
        if node.kind() != Kind::Json && node.as_str() == value {
            out.push(comps.join("."));
        }
        true
    });
    out
}

/// [`find_path`] with a wildcard pattern against the string form.
pub fn find_path_match(json: &str, pattern: &str) -> String {
    let mut found = String::new();
    walk_doc(json, &mut |comps, node| {
        if node.kind() != Kind::Json && wildcard_match(&node.as_str(), pattern) {
            found = comps.join(".");
            return false;
        }
        true
    });
    found
}

/// [`find_paths`] with a wildcard pattern against the string form.
pub fn find_paths_match(json: &str, pattern: &str) -> Vec<String> {
    let mut out = Vec::new();
    walk_doc(json, &mut |comps, node| {
        if node.kind() != Kind::Json && wildcard_match(&node.as_str(), pattern) {
            out.push(comps.join("."));
        }
        true
    });
    out
}

/// Whether the value at `path` contains `target`: substring for strings,
/// member key for objects, element string-equality for arrays, exact
/// string form for other scalars.
pub fn contains(json: &str, path: &str, target: &str) -> bool {
    let c = crate::get(json, path);
    contains_inner(&c, target, false)
}

/// [`contains`] with `target` as a wildcard pattern.
pub fn contains_match(json: &str, path: &str, pattern: &str) -> bool {
    let c = crate::get(json, path);
    contains_inner(&c, pattern, true)
}

fn contains_inner(c: &Context<'_>, target: &str, pattern: bool) -> bool {
    if !c.exists() {
        return false;
    }
    let hit = |s: &str| {
        if pattern {
            wildcard_match(s, target)
        } else {
            s == target
        }
    };
    match c.kind() {
        Kind::String => {
            if pattern {
                wildcard_match(&c.as_str(), target)
            } else {
                c.as_str().contains(target)
            }
        }
        Kind::Json if c.is_object() => {
            let mut found = false;
            c.foreach(|k, _| {
                found = hit(&k.as_str());
                !found
            });
            found
        }
        Kind::Json => {
            let mut found = false;
            c.foreach(|_, v| {
                found = hit(&v.as_str());
                !found
            });
            found
        }
        _ => hit(&c.as_str()),
    }
}

/// Number of elements of the array at `path` (member count for objects);
/// 0 when the path is missing.
pub fn count(json: &str, path: &str) -> usize {
    let c = crate::get(json, path);
    if c.kind() != Kind::Json {
        return 0;
    }
    let mut n = 0usize;
    c.foreach(|_, _| {
        n += 1;
        true
    });
    n
}

fn numeric_elements(json: &str, path: &str) -> Vec<f64> {
    let c = crate::get(json, path);
    let mut out = Vec::new();
    if c.is_array() {
        c.foreach(|_, v| {
            if v.kind() == Kind::Number {
                out.push(v.as_f64());
            }
            true
        });
    }
    out
}

/// Sum of the numeric elements of the array at `path`; 0 when empty or
/// missing. Non-numeric elements are skipped.
pub fn sum(json: &str, path: &str) -> f64 {
    numeric_elements(json, path).into_iter().sum()
}

/// Smallest numeric element, or `None` when there is none.
pub fn min(json: &str, path: &str) -> Option<f64> {
    numeric_elements(json, path).into_iter().reduce(f64::min)
}

/// Largest numeric element, or `None` when there is none.
pub fn max(json: &str, path: &str) -> Option<f64> {
    numeric_elements(json, path).into_iter().reduce(f64::max)
}

/// Mean of the numeric elements, or `None` when there is none.
pub fn avg(json: &str, path: &str) -> Option<f64> {
    let nums = numeric_elements(json, path);
    if nums.is_empty() {
        None
    } else {
        Some(nums.iter().sum::<f64>() / nums.len() as f64)
    }
}

/// Elements of the array at `path` satisfying `predicate`.
pub fn filter<'a, F>(json: &'a str, path: &str, predicate: F) -> Vec<Context<'a>>
where
    F: Fn(&Context<'a>) -> bool,
{
    let c = crate::get(json, path);
    let mut out = Vec::new();
    if c.is_array() {
        c.foreach(|_, v| {
            if predicate(&v) {
                out.push(v);
            }
            true
        });
    }
    out
}

/// First element of the array at `path` satisfying `predicate`.
pub fn first<'a, F>(json: &'a str, path: &str, predicate: F) -> Option<Context<'a>>
where
    F: Fn(&Context<'a>) -> bool,
{
    let c = crate::get(json, path);
    let mut out = None;
    if c.is_array() {
        c.foreach(|_, v| {
            if predicate(&v) {
                out = Some(v);
                return false;
            }
            true
        });
    }
    out
}

/// Unique elements of the array at `path`, first occurrence first,
/// compared by raw token.
pub fn distinct(json: &str, path: &str) -> Context<'static> {
    let c = crate::get(json, path);
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    if c.is_array() {
        c.foreach(|_, v| {
            let raw = v.raw().to_string();
            if seen.insert(raw.clone()) {
                out.push(raw);
            }
            true
        });
    }
    assemble(out)
}

/// Project `fields` out of every element of the array at `path`. Elements
/// with none of the fields are dropped.
pub fn pluck(json: &str, path: &str, fields: &[&str]) -> Context<'static> {
    let c = crate::get(json, path);
    let mut out = Vec::new();
    if c.is_array() {
        c.foreach(|_, e| {
            let mut obj = String::from("{");
            let mut n = 0usize;
            for f in fields {
                let v = e.get(f);
                if v.exists() && !v.raw().is_empty() {
                    if n > 0 {
                        obj.push(',');
                    }
                    crate::scanner::strings::append_json_string(&mut obj, f);
                    obj.push(':');
                    obj.push_str(v.raw());
                    n += 1;
                }
            }
            obj.push('}');
            if n > 0 {
                out.push(obj);
            }
            true
        });
    }
    assemble(out)
}

/// Group the elements of the array at `path` by the string form of
/// `key_field`. Elements missing the key are dropped; group order follows
/// first appearance.
pub fn group_by(json: &str, path: &str, key_field: &str) -> Context<'static> {
    let c = crate::get(json, path);
    let mut order: Vec<String> = Vec::new();
    let mut groups: std::collections::HashMap<String, Vec<String>> =
        std::collections::HashMap::new();
    if c.is_array() {
        c.foreach(|_, e| {
            let k = e.get(key_field);
            if k.exists() {
                let name = k.as_str().into_owned();
                if !groups.contains_key(&name) {
                    order.push(name.clone());
                }
                groups.entry(name).or_default().push(e.raw().to_string());
            }
            true
        });
    }
    let mut out = String::from("{");
    for (n, name) in order.iter().enumerate() {
        if n > 0 {
            out.push(',');
        }
        crate::scanner::strings::append_json_string(&mut out, name);
        out.push(':');
        let mut arr = String::from("[");
        for (m, raw) in groups[name].iter().enumerate() {
            if m > 0 {
                arr.push(',');
            }
            arr.push_str(raw);
        }
        arr.push(']');
        out.push_str(&arr);
    }
    out.push('}');
    Context::from_owned_raw(out)
}

/// Sort the elements of the array at `path` by `key_field` using the
/// cross-kind total order. Elements missing the key sort first. The sort
/// is stable.
pub fn sort_by(json: &str, path: &str, key_field: &str, ascending: bool) -> Context<'static> {
    let c = crate::get(json, path);
    let mut elems: Vec<(Context<'_>, String)> = Vec::new();
    if c.is_array() {
        c.foreach(|_, e| {
            let raw = e.raw().to_string();
            elems.push((e.get(key_field).into_owned(), raw));
            true
        });
    }
    elems.sort_by(|a, b| {
        let ord = if a.0.less(&b.0, true) {
            std::cmp::Ordering::Less
        } else if b.0.less(&a.0, true) {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        };
        if ascending { ord } else { ord.reverse() }
    });
    assemble(elems.into_iter().map(|(_, raw)| raw).collect())
}
