//! The value resolver: drives the scanner one path segment at a time.
//!
//! The walker mirrors the shape of a recursive-descent parser: each
//! `walk_*` call consumes exactly one container from the source, either
//! capturing the target value or returning the position just past the
//! container so the caller can keep scanning. Evaluation short-circuits
//! the moment the result is determined.

use std::borrow::Cow;

use crate::context::Context;
use crate::error::PathError;
use crate::kind::Kind;
use crate::path::{self, ArraySeg, query};
use crate::scanner::{self, strings};
use crate::transform;
use crate::wildcard::wildcard_match;

/// Evaluate `path` against `json`. `entry_piped` marks that this call sits
/// directly after a `|`, which disables array name-pluck for the first
/// segment.
pub(crate) fn resolve<'a>(json: &'a str, pstr: &str, entry_piped: bool) -> Context<'a> {
    if let Some(rest) = pstr.strip_prefix("..") {
        return resolve_lines(json, rest);
    }
    if pstr.len() > 1 {
        match pstr.as_bytes()[0] {
            b'@' => return run_transformer(json, pstr),
            b'{' | b'[' => return build_selector(json, pstr),
            _ => {}
        }
    }
    let b = json.as_bytes();
    let mut w = Walker {
        json,
        b,
        value: None,
        pipe: None,
        err: None,
    };
    let i = scanner::skip_ws(b, 0);
    match b.get(i).copied() {
        Some(b'{') => {
            w.walk_object(i + 1, pstr);
        }
        Some(b'[') => {
            w.walk_array(i + 1, pstr, entry_piped);
        }
        _ => return Context::not_found(),
    }
    if let Some(e) = w.err {
        return Context::from_error(e);
    }
    let value = w.value.unwrap_or_else(Context::not_found);
    match w.pipe {
        Some(pipe) if value.exists() => apply_pipe(value, pipe),
        Some(_) => Context::not_found(),
        None => value,
    }
}

/// Apply the remainder after a `|` to an already-resolved value.
fn apply_pipe<'a>(value: Context<'a>, pipe: &str) -> Context<'a> {
    match &value.raw {
        Cow::Borrowed(s) => {
            let src: &'a str = *s;
            let mut res = resolve(src, pipe, true);
            if let Cow::Borrowed(_) = res.raw {
                res.index += value.index;
                for ix in &mut res.indexes {
                    *ix += value.index;
                }
            }
            res
        }
        Cow::Owned(s) => resolve(s, pipe, true).into_owned(),
    }
}

/// JSON-Lines mode: materialize the `\n`-separated documents as one array
/// and run ordinary array semantics over it. Results own their bytes.
fn resolve_lines<'a>(json: &'a str, rest: &str) -> Context<'a> {
    let mut buf = String::with_capacity(json.len() + 2);
    buf.push('[');
    let mut first = true;
    for line in json.split('\n') {
        let t = line.trim_matches(|c| matches!(c, ' ' | '\t' | '\r'));
        if t.is_empty() {
            continue;
        }
        if !first {
            buf.push(',');
        }
        buf.push_str(t);
        first = false;
    }
    buf.push(']');
    if rest.is_empty() {
        return Context::from_owned_raw(buf);
    }
    let mut res = resolve(&buf, rest, false).into_owned();
    res.index = 0;
    res.indexes.clear();
    res
}

fn run_transformer<'a>(json: &'a str, pstr: &str) -> Context<'a> {
    let seg = match path::parse_transformer(pstr) {
        Ok(s) => s,
        Err(e) => return Context::from_error(e),
    };
    let Some(out) = transform::execute(seg.name, json, seg.arg) else {
        return Context::from_error(PathError::UnknownTransformer(seg.name.to_string()));
    };
    if seg.rest.is_empty() {
        return Context::from_owned_raw(out);
    }
    let sep = seg.rest.as_bytes()[0];
    let mut res = resolve(&out, &seg.rest[1..], sep == b'|').into_owned();
    res.index = 0;
    res.indexes.clear();
    res
}

fn build_selector<'a>(json: &'a str, pstr: &str) -> Context<'a> {
    let (sels, open, rest) = match path::parse_sub_selectors(pstr) {
        Ok(t) => t,
        Err(e) => return Context::from_error(e),
    };
    if !(rest.is_empty() || rest.starts_with('.') || rest.starts_with('|')) {
        return Context::from_error(PathError::UnbalancedSelector);
    }
    let mut out = String::with_capacity(64);
    out.push(open as char);
    let mut n = 0usize;
    for sel in &sels {
        let lit = sel.path.strip_prefix('!');
        let (exists, raw): (bool, Cow<'_, str>) = match lit {
            Some(lit) => {
                let lit = lit.trim();
                (scanner::validate(lit.as_bytes()), Cow::Borrowed(lit))
            }
            None => {
                let r = resolve(json, sel.path, false);
                if r.exists() && !r.raw().is_empty() {
                    (true, Cow::Owned(r.raw().to_string()))
                } else {
                    (false, Cow::Borrowed(""))
                }
            }
        };
        if open == b'{' {
            // Objects omit members that did not resolve.
            if !exists {
                continue;
            }
            if n > 0 {
                out.push(',');
            }
            match &sel.name {
                Some(name) => strings::append_json_string(&mut out, name),
                None => strings::append_json_string(&mut out, &infer_name(sel.path)),
            }
            out.push(':');
            out.push_str(&raw);
        } else {
            // Arrays keep positions: missing members become null.
            if n > 0 {
                out.push(',');
            }
            out.push_str(if exists { &raw } else { "null" });
        }
        n += 1;
    }
    out.push(if open == b'{' { '}' } else { ']' });
    if rest.is_empty() {
        return Context::from_owned_raw(out);
    }
    let sep = rest.as_bytes()[0];
    let mut res = resolve(&out, &rest[1..], sep == b'|').into_owned();
    res.index = 0;
    res.indexes.clear();
    res
}

/// Infer an object-selector member name from the last component of its
/// sub-path; anything non-trivial falls back to `_`.
fn infer_name(pstr: &str) -> String {
    let b = pstr.as_bytes();
    let mut depth = 0usize;
    let mut last = 0usize;
    let mut i = 0usize;
    while i < b.len() {
        match b[i] {
            b'\\' => i += 1,
            b'"' => {
                i = path::skip_path_string(b, i);
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'.' | b'|' if depth == 0 => last = i + 1,
            _ => {}
        }
        i += 1;
    }
    let comp = &pstr[last..];
    if is_simple_name(comp) {
        comp.replace('\\', "")
    } else {
        "_".to_string()
    }
}

fn is_simple_name(comp: &str) -> bool {
    !comp.is_empty()
        && comp.bytes().all(|c| {
            c >= b' '
                && !matches!(
                    c,
                    b'[' | b']' | b'{' | b'}' | b'(' | b')' | b'#' | b'|' | b'!' | b'@' | b'*' | b'?'
                )
        })
}

/// Find a top-level `|` inside a per-element sub-path; the right side
/// applies to the assembled result rather than each element.
fn split_possible_pipe(pstr: &str) -> (&str, Option<&str>) {
    let b = pstr.as_bytes();
    let mut depth = 0usize;
    let mut i = 0usize;
    while i < b.len() {
        match b[i] {
            b'\\' => i += 1,
            b'"' => {
                i = path::skip_path_string(b, i);
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'|' if depth == 0 => return (&pstr[..i], Some(&pstr[i + 1..])),
            _ => {}
        }
        i += 1;
    }
    (pstr, None)
}

enum ArrayMode<'p> {
    /// Numeric element index.
    Index(usize),
    /// `#` — element count.
    Count,
    /// Apply a sub-path to every element and collect the results.
    Pluck(Cow<'p, str>),
    /// `#(...)` predicate.
    Query,
    /// Segment cannot match anything; scan to the end for position only.
    Miss,
}

struct Walker<'a, 'p> {
    json: &'a str,
    b: &'a [u8],
    value: Option<Context<'a>>,
    pipe: Option<&'p str>,
    err: Option<PathError>,
}

impl<'a, 'p> Walker<'a, 'p> {
    /// Walk the object whose `{` sits at `start - 1`. Returns the position
    /// just past the consumed region and whether the value was found.
    fn walk_object(&mut self, start: usize, pstr: &'p str) -> (usize, bool) {
        let seg = path::parse_object_seg(pstr);
        if !seg.more && seg.piped {
            self.pipe = Some(seg.pipe);
        }
        // `#` counts the members of an object, mirroring array length.
        let count_mode = seg.raw_part == "#" && !seg.more;
        let mut members = 0usize;
        let mut i = start;
        loop {
            i = scanner::skip_ws(self.b, i);
            match self.b.get(i).copied() {
                None => return (i, false),
                Some(b'}') => {
                    if count_mode {
                        self.value = Some(count_value(members));
                        return (i + 1, true);
                    }
                    return (i + 1, false);
                }
                Some(b',') => {
                    i += 1;
                    continue;
                }
                Some(b'"') => {}
                // Malformed byte where a key belongs: scan forward.
                Some(_) => {
                    i += 1;
                    continue;
                }
            }
            let Some((kend, kesc)) = strings::skip_string(self.b, i) else {
                return (self.b.len(), false);
            };
            let key_raw = &self.json[i + 1..kend - 1];
            let pmatch = if count_mode {
                false
            } else if seg.wild {
                if kesc {
                    wildcard_match(&strings::unescape(key_raw), seg.raw_part)
                } else {
                    wildcard_match(key_raw, seg.raw_part)
                }
            } else if kesc {
                strings::unescape(key_raw) == seg.part.as_ref()
            } else {
                key_raw == seg.part.as_ref()
            };
            let hit = pmatch && !seg.more;
            i = scanner::skip_ws(self.b, kend);
            if self.b.get(i) != Some(&b':') {
                return (self.b.len(), false);
            }
            i = scanner::skip_ws(self.b, i + 1);
            match self.b.get(i).copied() {
                None => return (i, false),
                Some(b'{') => {
                    if pmatch && !hit {
                        let (ni, found) = self.walk_object(i + 1, seg.path);
                        if found {
                            return (ni, true);
                        }
                        i = ni;
                    } else {
                        let Some(end) = scanner::squash(self.b, i) else {
                            return (self.b.len(), false);
                        };
                        if hit {
                            self.value = Some(Context::capture_at(self.json, i, end));
                            return (end, true);
                        }
                        i = end;
                    }
                }
                Some(b'[') => {
                    if pmatch && !hit {
                        let (ni, found) = self.walk_array(i + 1, seg.path, false);
                        if found {
                            return (ni, true);
                        }
                        i = ni;
                    } else {
                        let Some(end) = scanner::squash(self.b, i) else {
                            return (self.b.len(), false);
                        };
                        if hit {
                            self.value = Some(Context::capture_at(self.json, i, end));
                            return (end, true);
                        }
                        i = end;
                    }
                }
                Some(_) => {
                    let Some(end) = scanner::skip_value(self.b, i) else {
                        return (self.b.len(), false);
                    };
                    if hit {
                        self.value = Some(Context::capture_at(self.json, i, end));
                        return (end, true);
                    }
                    i = end;
                }
            }
            members += 1;
        }
    }

    /// Walk the array whose `[` sits at `start - 1`.
    fn walk_array(&mut self, start: usize, pstr: &'p str, entry_piped: bool) -> (usize, bool) {
        let seg = match path::parse_array_seg(pstr) {
            Ok(s) => s,
            Err(e) => {
                self.err = Some(e);
                return (self.b.len(), false);
            }
        };
        if !seg.more && seg.piped {
            self.pipe = Some(seg.pipe);
        }
        let mode = if seg.query.is_some() {
            ArrayMode::Query
        } else if seg.pluck {
            ArrayMode::Pluck(Cow::Borrowed(seg.pluck_key))
        } else if seg.arrch {
            ArrayMode::Count
        } else if let Ok(n) = seg.part.parse::<usize>() {
            ArrayMode::Index(n)
        } else if !seg.raw_part.is_empty() && !entry_piped {
            // A plain name against an array plucks it from every element.
            let key = if seg.more {
                Cow::Owned(format!("{}.{}", seg.raw_part, seg.path))
            } else {
                Cow::Borrowed(seg.raw_part)
            };
            ArrayMode::Pluck(key)
        } else {
            ArrayMode::Miss
        };
        let mut h = 0usize;
        let mut collected: Vec<(String, usize)> = Vec::new();
        let mut i = start;
        loop {
            i = scanner::skip_ws(self.b, i);
            match self.b.get(i).copied() {
                None => return self.finish_array(i, &mode, &seg, h, collected),
                Some(b']') => return self.finish_array(i + 1, &mode, &seg, h, collected),
                Some(b',') => {
                    i += 1;
                    continue;
                }
                Some(_) => {}
            }
            let vstart = i;
            let Some(end) = scanner::skip_value(self.b, i) else {
                let at = self.b.len();
                return self.finish_array(at, &mode, &seg, h, collected);
            };
            match &mode {
                ArrayMode::Index(n) if *n == h => {
                    if seg.more {
                        match self.b[vstart] {
                            b'{' => {
                                let (ni, found) = self.walk_object(vstart + 1, seg.path);
                                if found {
                                    return (ni, true);
                                }
                                i = ni;
                            }
                            b'[' => {
                                let (ni, found) = self.walk_array(vstart + 1, seg.path, false);
                                if found {
                                    return (ni, true);
                                }
                                i = ni;
                            }
                            _ => i = end,
                        }
                    } else {
                        self.value = Some(Context::capture_at(self.json, vstart, end));
                        return (end, true);
                    }
                }
                ArrayMode::Query => {
                    let elem = Context::capture_at(self.json, vstart, end);
                    if self.proc_query(&seg, elem, &mut collected) {
                        return (end, true);
                    }
                    i = end;
                }
                ArrayMode::Pluck(key) => {
                    let elem_raw = &self.json[vstart..end];
                    let sub = resolve(elem_raw, key, false);
                    if sub.exists() && !sub.raw().is_empty() {
                        let abs = match &sub.raw {
                            Cow::Borrowed(_) => vstart + sub.index(),
                            Cow::Owned(_) => vstart,
                        };
                        collected.push((sub.raw().to_string(), abs));
                    }
                    i = end;
                }
                _ => i = end,
            }
            h += 1;
        }
    }

    fn finish_array(
        &mut self,
        after: usize,
        mode: &ArrayMode<'_>,
        seg: &ArraySeg<'p>,
        count: usize,
        collected: Vec<(String, usize)>,
    ) -> (usize, bool) {
        match mode {
            ArrayMode::Count => {
                self.value = Some(count_value(count));
                (after, true)
            }
            ArrayMode::Pluck(_) => {
                self.value = Some(assemble_array(collected));
                (after, true)
            }
            ArrayMode::Query if seg.query.as_ref().is_some_and(|q| q.all) => {
                self.value = Some(assemble_array(collected));
                (after, true)
            }
            _ => (after, self.value.is_some()),
        }
    }

    /// Evaluate the query against one element. Returns true when a
    /// first-match query is satisfied and iteration should stop.
    fn proc_query(
        &mut self,
        seg: &ArraySeg<'p>,
        elem: Context<'a>,
        collected: &mut Vec<(String, usize)>,
    ) -> bool {
        let Some(q) = seg.query.as_ref() else {
            return false;
        };
        let matched = if q.path.is_empty() {
            query::query_matches(q, &elem)
        } else if elem.kind() == Kind::Json {
            query::query_matches(q, &elem.get(q.path))
        } else {
            // A scalar element cannot satisfy a keyed predicate.
            false
        };
        if !matched {
            return false;
        }
        let res: Context<'a> = if seg.more {
            let (left, right) = split_possible_pipe(seg.path);
            if let Some(r) = right {
                self.pipe = Some(r);
            }
            elem.get(left)
        } else {
            elem.clone()
        };
        if q.all {
            if res.exists() && !res.raw().is_empty() {
                let abs = match &res.raw {
                    Cow::Borrowed(_) => res.index(),
                    Cow::Owned(_) => elem.index(),
                };
                collected.push((res.raw().to_string(), abs));
            }
            false
        } else {
            self.value = Some(res);
            true
        }
    }
}

fn count_value(n: usize) -> Context<'static> {
    Context {
        kind: Kind::Number,
        raw: Cow::Owned(n.to_string()),
        num: n as f64,
        ..Context::not_found()
    }
}

/// Join collected element raws into a fresh array, carrying their source
/// offsets in `indexes`.
fn assemble_array(collected: Vec<(String, usize)>) -> Context<'static> {
    let mut out = String::with_capacity(collected.iter().map(|(r, _)| r.len() + 1).sum::<usize>() + 2);
    out.push('[');
    let mut indexes = Vec::with_capacity(collected.len());
    for (n, (raw, ix)) in collected.iter().enumerate() {
        if n > 0 {
            out.push(',');
        }
        out.push_str(raw);
        indexes.push(*ix);
    }
    out.push(']');
    let mut ctx = Context::from_owned_raw(out);
    ctx.indexes = indexes;
    ctx
}
