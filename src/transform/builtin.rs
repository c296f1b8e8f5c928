//! Structural, aggregation, and data-shaping transformers.

use std::collections::HashMap;
use std::sync::Arc;

use super::{TransformerFn, arg_path};
use crate::context::{Context, parse_value};
use crate::kind::Kind;
use crate::pretty::{self, PrettyOptions};
use crate::scanner::{number, strings};

pub(super) fn install(map: &mut HashMap<String, Arc<TransformerFn>>) {
    let mut put = |name: &str, f: Arc<TransformerFn>| {
        map.insert(name.to_string(), f);
    };

    put("this", Arc::new(|j: &str, _: &str| j.to_string()));
    put(
        "valid",
        Arc::new(|j: &str, _: &str| {
            if crate::scanner::validate(j.as_bytes()) {
                "true"
            } else {
                "false"
            }
            .to_string()
        }),
    );
    put("pretty", Arc::new(pretty_tr));
    let minify: Arc<TransformerFn> = Arc::new(|j: &str, _: &str| pretty::minify(j));
    put("minify", minify.clone());
    put("ugly", minify);
    put("reverse", Arc::new(reverse));
    put("flatten", Arc::new(flatten));
    put("join", Arc::new(join));
    put("keys", Arc::new(keys));
    put("values", Arc::new(values));
    put(
        "json",
        Arc::new(|j: &str, _: &str| {
            if crate::scanner::validate(j.as_bytes()) {
                j.trim().to_string()
            } else {
                String::new()
            }
        }),
    );
    put(
        "string",
        Arc::new(|j: &str, _: &str| strings::json_string(j.trim())),
    );
    put("group", Arc::new(group));
    put(
        "search",
        Arc::new(|j: &str, arg: &str| {
            let path = arg_path(arg);
            assemble(crate::helpers::search_collect(j, &path))
        }),
    );
    put("project", Arc::new(project));
    put("filter", Arc::new(filter));
    put("default", Arc::new(default_tr));
    put("coerce", Arc::new(coerce));
    put(
        "count",
        Arc::new(|j: &str, _: &str| elements(j).len().to_string()),
    );
    put(
        "first",
        Arc::new(|j: &str, _: &str| {
            elements(j).into_iter().next().unwrap_or_else(|| "null".to_string())
        }),
    );
    put(
        "last",
        Arc::new(|j: &str, _: &str| {
            elements(j).into_iter().next_back().unwrap_or_else(|| "null".to_string())
        }),
    );
    put(
        "sum",
        Arc::new(|j: &str, _: &str| {
            number::format_f64(numbers(j).into_iter().sum::<f64>())
        }),
    );
    put(
        "min",
        Arc::new(|j: &str, _: &str| {
            numbers(j)
                .into_iter()
                .reduce(f64::min)
                .map_or_else(|| "null".to_string(), number::format_f64)
        }),
    );
    put(
        "max",
        Arc::new(|j: &str, _: &str| {
            numbers(j)
                .into_iter()
                .reduce(f64::max)
                .map_or_else(|| "null".to_string(), number::format_f64)
        }),
    );
    put("pluck", Arc::new(pluck));
}

/// Join raw tokens into an array literal.
fn assemble(parts: Vec<String>) -> String {
    let mut out = String::with_capacity(parts.iter().map(|p| p.len() + 1).sum::<usize>() + 2);
    out.push('[');
    for (n, p) in parts.iter().enumerate() {
        if n > 0 {
            out.push(',');
        }
        out.push_str(p);
    }
    out.push(']');
    out
}

/// Raw tokens of the top-level array elements; empty for non-arrays.
fn elements(j: &str) -> Vec<String> {
    let c = parse_value(j);
    let mut out = Vec::new();
    if c.is_array() {
        c.foreach(|_, v| {
            out.push(v.raw().to_string());
            true
        });
    }
    out
}

/// Numeric elements only; everything else is skipped.
fn numbers(j: &str) -> Vec<f64> {
    let c = parse_value(j);
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

fn pretty_tr(j: &str, arg: &str) -> String {
    let mut opts = PrettyOptions::default();
    if !arg.is_empty() {
        let a = parse_value(arg);
        let sort = a.get("sort_keys");
        if sort.exists() {
            opts.sort_keys = sort.as_bool();
        }
        let indent = a.get("indent");
        if indent.exists() {
            opts.indent = indent.as_str().into_owned();
        }
        let prefix = a.get("prefix");
        if prefix.exists() {
            opts.prefix = prefix.as_str().into_owned();
        }
        let width = a.get("width");
        if width.exists() {
            opts.width = width.as_u64() as usize;
        }
    }
    pretty::pretty(j, &opts)
}

/// Reverse array element order or object key order; scalars pass through.
fn reverse(j: &str, _: &str) -> String {
    let c = parse_value(j);
    if c.is_array() {
        let mut elems = elements(j);
        elems.reverse();
        assemble(elems)
    } else if c.is_object() {
        let mut members: Vec<(String, String)> = Vec::new();
        c.foreach(|k, v| {
            members.push((k.raw().to_string(), v.raw().to_string()));
            true
        });
        members.reverse();
        assemble_object(members)
    } else {
        j.to_string()
    }
}

fn assemble_object(members: Vec<(String, String)>) -> String {
    let mut out = String::from("{");
    for (n, (k, v)) in members.iter().enumerate() {
        if n > 0 {
            out.push(',');
        }
        out.push_str(k);
        out.push(':');
        out.push_str(v);
    }
    out.push('}');
    out
}

/// Concatenate immediate nested arrays into the parent; `{"deep":true}`
/// recurses so the result contains no arrays at all.
fn flatten(j: &str, arg: &str) -> String {
    let c = parse_value(j);
    if !c.is_array() {
        return j.to_string();
    }
    let deep = parse_value(arg).get("deep").as_bool();
    let mut out = Vec::new();
    c.foreach(|_, e| {
        if e.is_array() {
            splice(&e, deep, &mut out);
        } else {
            out.push(e.raw().to_string());
        }
        true
    });
    assemble(out)
}

fn splice(arr: &Context<'_>, deep: bool, out: &mut Vec<String>) {
    arr.foreach(|_, inner| {
        if deep && inner.is_array() {
            splice(&inner, true, out);
        } else {
            out.push(inner.raw().to_string());
        }
        true
    });
}

/// Merge an array of objects into one object. `{"preserve":true}` keeps
/// duplicate keys; otherwise the last value wins but the member keeps its
/// first-appearance position.
fn join(j: &str, arg: &str) -> String {
    let c = parse_value(j);
    if !c.is_array() {
        return j.to_string();
    }
    let preserve = parse_value(arg).get("preserve").as_bool();
    let mut members: Vec<(String, String, String)> = Vec::new(); // decoded, raw key, raw value
    let mut at: HashMap<String, usize> = HashMap::new();
    c.foreach(|_, obj| {
        if obj.is_object() {
            obj.foreach(|k, v| {
                let name = k.as_str().into_owned();
                if preserve {
                    members.push((name, k.raw().to_string(), v.raw().to_string()));
                } else if let Some(&pos) = at.get(&name) {
                    members[pos].2 = v.raw().to_string();
                } else {
                    at.insert(name.clone(), members.len());
                    members.push((name, k.raw().to_string(), v.raw().to_string()));
                }
                true
            });
        }
        true
    });
    assemble_object(members.into_iter().map(|(_, k, v)| (k, v)).collect())
}

fn keys(j: &str, _: &str) -> String {
    let c = parse_value(j);
    let mut out = Vec::new();
    if c.is_object() {
        c.foreach(|k, _| {
            out.push(k.raw().to_string());
            true
        });
    }
    assemble(out)
}

fn values(j: &str, _: &str) -> String {
    let c = parse_value(j);
    if c.is_object() {
        let mut out = Vec::new();
        c.foreach(|_, v| {
            out.push(v.raw().to_string());
            true
        });
        return assemble(out);
    }
    j.to_string()
}

/// `{"k":[v1,v2],"j":[u1,u2]}` → `[{"k":v1,"j":u1},{"k":v2,"j":u2}]`,
/// aligned by index. Non-array members are ignored.
fn group(j: &str, _: &str) -> String {
    let c = parse_value(j);
    if !c.is_object() {
        return "[]".to_string();
    }
    let mut cols: Vec<(String, Vec<String>)> = Vec::new();
    c.foreach(|k, v| {
        if v.is_array() {
            let mut vals = Vec::new();
            v.foreach(|_, e| {
                vals.push(e.raw().to_string());
                true
            });
            cols.push((k.raw().to_string(), vals));
        }
        true
    });
    let rows = cols.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    let mut out = Vec::with_capacity(rows);
    for r in 0..rows {
        let members: Vec<(String, String)> = cols
            .iter()
            .filter(|(_, vals)| r < vals.len())
            .map(|(k, vals)| (k.clone(), vals[r].clone()))
            .collect();
        out.push(assemble_object(members));
    }
    assemble(out)
}

/// Keep fields from `arg.pick` and/or apply `arg.rename`, preserving the
/// input member order.
fn project(j: &str, arg: &str) -> String {
    let c = parse_value(j);
    if !c.is_object() {
        return j.to_string();
    }
    let a = parse_value(arg);
    let picks: Vec<String> = a
        .get("pick")
        .array()
        .iter()
        .map(|p| p.as_str().into_owned())
        .collect();
    let renames: HashMap<String, String> = a
        .get("rename")
        .map()
        .into_iter()
        .map(|(k, v)| (k, v.as_str().into_owned()))
        .collect();
    let mut members: Vec<(String, String)> = Vec::new();
    c.foreach(|k, v| {
        let name = k.as_str().into_owned();
        if picks.is_empty() || picks.iter().any(|p| *p == name) {
            let out_key = match renames.get(&name) {
                Some(newname) => strings::json_string(newname),
                None => k.raw().to_string(),
            };
            members.push((out_key, v.raw().to_string()));
        }
        true
    });
    assemble_object(members)
}

/// Keep array elements satisfying `{key, op, value}`. `op` defaults to
/// `eq`; `eq`/`ne` compare raw JSON, ordered ops compare floats,
/// `contains` does substring matching on the string forms.
fn filter(j: &str, arg: &str) -> String {
    let c = parse_value(j);
    if !c.is_array() {
        return j.to_string();
    }
    let a = parse_value(arg);
    let key = a.get("key").as_str().into_owned();
    let op_ctx = a.get("op");
    let op = if op_ctx.exists() {
        op_ctx.as_str().into_owned()
    } else {
        "eq".to_string()
    };
    let want = a.get("value");
    let mut out = Vec::new();
    c.foreach(|_, e| {
        let got = e.get(&key);
        if got.exists() && filter_cmp(&got, &want, &op) {
            out.push(e.raw().to_string());
        }
        true
    });
    assemble(out)
}

fn filter_cmp(got: &Context<'_>, want: &Context<'_>, op: &str) -> bool {
    match op {
        "eq" => got.raw() == want.raw(),
        "ne" => got.raw() != want.raw(),
        "gt" => got.as_f64() > want.as_f64(),
        "gte" => got.as_f64() >= want.as_f64(),
        "lt" => got.as_f64() < want.as_f64(),
        "lte" => got.as_f64() <= want.as_f64(),
        "contains" => got.as_str().contains(want.as_str().as_ref()),
        _ => false,
    }
}

/// Inject `arg` fields that are absent or explicitly null, preserving the
/// input order and appending unseen keys in `arg` order.
fn default_tr(j: &str, arg: &str) -> String {
    let c = parse_value(j);
    let a = parse_value(arg);
    if !c.is_object() || !a.is_object() {
        return j.to_string();
    }
    let defaults = a.map();
    let mut seen: Vec<String> = Vec::new();
    let mut members: Vec<(String, String)> = Vec::new();
    c.foreach(|k, v| {
        let name = k.as_str().into_owned();
        let replace = v.kind() == Kind::Null
            && defaults.iter().any(|(dk, _)| *dk == name);
        let raw = if replace {
            defaults
                .iter()
                .find(|(dk, _)| *dk == name)
                .map(|(_, dv)| dv.raw().to_string())
                .unwrap_or_else(|| v.raw().to_string())
        } else {
            v.raw().to_string()
        };
        members.push((k.raw().to_string(), raw));
        seen.push(name);
        true
    });
    for (name, dv) in &defaults {
        if !seen.iter().any(|s| s == name) {
            members.push((strings::json_string(name), dv.raw().to_string()));
        }
    }
    assemble_object(members)
}

/// Coerce a scalar: `{"to": "string" | "number" | "bool"}`. Objects and
/// arrays pass through untouched; a number that has no finite value
/// becomes null.
fn coerce(j: &str, arg: &str) -> String {
    let c = parse_value(j);
    if c.kind() == Kind::Json || !c.exists() {
        return j.to_string();
    }
    let to = parse_value(arg).get("to").as_str().into_owned();
    match to.as_str() {
        "string" => strings::json_string(&c.as_str()),
        "number" => match c.kind() {
            Kind::Number => number::format_f64(c.as_f64()),
            Kind::True => "1".to_string(),
            Kind::False => "0".to_string(),
            Kind::String => {
                let t = c.as_str();
                match t.trim().parse::<f64>() {
                    Ok(v) => number::format_f64(v),
                    Err(_) => "null".to_string(),
                }
            }
            _ => "null".to_string(),
        },
        "bool" => if c.as_bool() { "true" } else { "false" }.to_string(),
        _ => j.to_string(),
    }
}

/// Map every element through the sub-path, dropping elements where it
/// does not resolve.
fn pluck(j: &str, arg: &str) -> String {
    let c = parse_value(j);
    if !c.is_array() {
        return "[]".to_string();
    }
    let path = arg_path(arg);
    let mut out = Vec::new();
    c.foreach(|_, e| {
        let sub = e.get(&path);
        if sub.exists() && !sub.raw().is_empty() {
            out.push(sub.raw().to_string());
        }
        true
    });
    assemble(out)
}
