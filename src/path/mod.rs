//! Path segment lexing.
//!
//! A path is consumed left to right, one segment at a time; each `parse_*`
//! function returns the segment plus the untouched remainder, so plain
//! name lookups never allocate. Escapes (`\.`), wildcards, transformer
//! arguments, queries, and multi-selector bodies are all resolved here so
//! the resolver only deals in structured segments.

pub(crate) mod query;

use std::borrow::Cow;

/// `.` followed by `@`, `{` or `[` applies the next segment to the value
/// as a whole, exactly like `|`. This is what lets `tags.@reverse` and
/// `a.{x,y}` compose without special cases downstream.
#[inline]
pub(crate) fn is_dot_piped(s: &str) -> bool {
    matches!(s.as_bytes().first().copied(), Some(b'@' | b'{' | b'['))
}

/// One object-walk segment.
#[derive(Debug, Default)]
pub(crate) struct ObjectSeg<'p> {
    /// Unescaped name used for exact key comparison.
    pub part: Cow<'p, str>,
    /// Raw segment text; used as the wildcard pattern (its backslash
    /// escapes line up with the matcher's).
    pub raw_part: &'p str,
    pub path: &'p str,
    pub pipe: &'p str,
    pub piped: bool,
    pub more: bool,
    pub wild: bool,
}

pub(crate) fn parse_object_seg(path: &str) -> ObjectSeg<'_> {
    let b = path.as_bytes();
    let mut wild = false;
    let mut esc = false;
    let mut i = 0usize;
    while i < b.len() {
        match b[i] {
            b'|' => {
                return ObjectSeg {
                    part: unescape_part(&path[..i], esc),
                    raw_part: &path[..i],
                    pipe: &path[i + 1..],
                    piped: true,
                    wild,
                    ..Default::default()
                };
            }
            b'.' => {
                let rest = &path[i + 1..];
                let mut seg = ObjectSeg {
                    part: unescape_part(&path[..i], esc),
                    raw_part: &path[..i],
                    wild,
                    ..Default::default()
                };
                if is_dot_piped(rest) {
                    seg.pipe = rest;
                    seg.piped = true;
                } else {
                    seg.path = rest;
                    seg.more = true;
                }
                return seg;
            }
            b'*' | b'?' => {
                wild = true;
                i += 1;
            }
            b'\\' => {
                esc = true;
                i += 2;
            }
            _ => i += 1,
        }
    }
    ObjectSeg {
        part: unescape_part(path, esc),
        raw_part: path,
        wild,
        ..Default::default()
    }
}

fn unescape_part(raw: &str, esc: bool) -> Cow<'_, str> {
    if !esc {
        return Cow::Borrowed(raw);
    }
    // Dropping backslashes cannot break UTF-8: the escape byte is ASCII
    // and everything else is copied verbatim.
    let b = raw.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0usize;
    while i < b.len() {
        if b[i] == b'\\' && i + 1 < b.len() {
            out.push(b[i + 1]);
            i += 2;
        } else {
            out.push(b[i]);
            i += 1;
        }
    }
    Cow::Owned(String::from_utf8_lossy(&out).into_owned())
}

/// One array-walk segment. `#`-forms set `arrch`; `#.rest` sets `pluck`
/// and hands the entire remainder to per-element evaluation.
#[derive(Debug, Default)]
pub(crate) struct ArraySeg<'p> {
    pub part: Cow<'p, str>,
    pub raw_part: &'p str,
    pub path: &'p str,
    pub pipe: &'p str,
    pub piped: bool,
    pub more: bool,
    /// Segment starts with `#`: count, query, or pluck.
    pub arrch: bool,
    /// `#.subpath` — apply `pluck_key` to every element.
    pub pluck: bool,
    pub pluck_key: &'p str,
    pub query: Option<query::Query<'p>>,
}

pub(crate) fn parse_array_seg(path: &str) -> Result<ArraySeg<'_>, crate::PathError> {
    let b = path.as_bytes();
    if b.first() == Some(&b'#') {
        if path.len() == 1 {
            return Ok(ArraySeg {
                part: Cow::Borrowed("#"),
                raw_part: "#",
                arrch: true,
                ..Default::default()
            });
        }
        match b[1] {
            b'.' => {
                return Ok(ArraySeg {
                    part: Cow::Borrowed("#"),
                    raw_part: "#",
                    arrch: true,
                    pluck: true,
                    pluck_key: &path[2..],
                    ..Default::default()
                });
            }
            b'(' => {
                let (q, after) = query::parse_query(path)?;
                let mut seg = ArraySeg {
                    part: Cow::Borrowed(&path[..path.len() - after.len()]),
                    raw_part: &path[..path.len() - after.len()],
                    arrch: true,
                    query: Some(q),
                    ..Default::default()
                };
                let ab = after.as_bytes();
                match ab.first().copied() {
                    None => {}
                    Some(b'|') => {
                        seg.pipe = &after[1..];
                        seg.piped = true;
                    }
                    Some(b'.') => {
                        seg.path = &after[1..];
                        seg.more = true;
                    }
                    // Anything else glued to the query is left for the
                    // resolver to treat as not-found.
                    _ => {}
                }
                return Ok(seg);
            }
            b'|' => {
                return Ok(ArraySeg {
                    part: Cow::Borrowed("#"),
                    raw_part: "#",
                    arrch: true,
                    pipe: &path[2..],
                    piped: true,
                    ..Default::default()
                });
            }
            _ => {}
        }
    }
    // Plain name / index segment: same shape as the object walk.
    let o = parse_object_seg(path);
    Ok(ArraySeg {
        part: o.part,
        raw_part: o.raw_part,
        path: o.path,
        pipe: o.pipe,
        piped: o.piped,
        more: o.more,
        ..Default::default()
    })
}

/// A `{...}` / `[...]` multi-selector member.
#[derive(Debug)]
pub(crate) struct SubSelector<'p> {
    pub name: Option<Cow<'p, str>>,
    pub path: &'p str,
}

/// Split a multi-selector into members. Returns the members, the opening
/// bracket kind, and the remainder after the matching close bracket.
pub(crate) fn parse_sub_selectors(
    path: &str,
) -> Result<(Vec<SubSelector<'_>>, u8, &str), crate::PathError> {
    let b = path.as_bytes();
    let open = b[0];
    debug_assert!(open == b'{' || open == b'[');
    let mut sels = Vec::new();
    let mut depth = 1usize;
    let mut start = 1usize;
    let mut colon: Option<usize> = None;
    let mut opaque = false; // '@' or '!' seen: later colons belong to args
    let mut i = 1usize;
    fn push<'p>(
        path: &'p str,
        sels: &mut Vec<SubSelector<'p>>,
        start: usize,
        end: usize,
        colon: Option<usize>,
    ) {
        let (name, p) = match colon {
            Some(c) => (Some(selector_name(&path[start..c])), &path[c + 1..end]),
            None => (None, &path[start..end]),
        };
        sels.push(SubSelector { name, path: p });
    }
    while i < b.len() {
        match b[i] {
            b'\\' => i += 1,
            b'"' => {
                i = skip_path_string(b, i);
                continue;
            }
            // A transformer anywhere in the member means later colons are
            // argument separators, not a name separator.
            b'@' if depth == 1 => opaque = true,
            b':' if depth == 1 && colon.is_none() && !opaque => colon = Some(i),
            b'{' | b'[' | b'(' => depth += 1,
            b'}' | b']' | b')' => {
                depth -= 1;
                if depth == 0 {
                    push(path, &mut sels, start, i, colon);
                    return Ok((sels, open, &path[i + 1..]));
                }
            }
            b',' if depth == 1 => {
                push(path, &mut sels, start, i, colon);
                start = i + 1;
                colon = None;
                opaque = false;
            }
            _ => {}
        }
        i += 1;
    }
    Err(crate::PathError::UnbalancedSelector)
}

/// A selector name may be a quoted JSON string or a bare identifier.
fn selector_name(raw: &str) -> Cow<'_, str> {
    let t = raw.trim();
    if t.starts_with('"') && t.ends_with('"') && t.len() >= 2 {
        crate::scanner::strings::unquote(t)
    } else {
        Cow::Borrowed(t)
    }
}

/// Advance past a double-quoted run inside a path, honoring backslashes.
/// Returns the index past the closing quote (or end of input).
pub(crate) fn skip_path_string(b: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < b.len() {
        match b[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    i
}

/// A `@name[:arg]` transformer segment.
#[derive(Debug)]
pub(crate) struct TransformSeg<'p> {
    pub name: &'p str,
    pub arg: &'p str,
    /// Remainder including its leading `.` or `|`, or empty.
    pub rest: &'p str,
}

pub(crate) fn parse_transformer(path: &str) -> Result<TransformSeg<'_>, crate::PathError> {
    debug_assert!(path.starts_with('@'));
    let b = path.as_bytes();
    let mut i = 1usize;
    while i < b.len() && !matches!(b[i], b'.' | b'|' | b':') {
        i += 1;
    }
    let name = &path[1..i];
    if name.is_empty() {
        return Err(crate::PathError::EmptyTransformer);
    }
    if i >= b.len() || b[i] != b':' {
        return Ok(TransformSeg {
            name,
            arg: "",
            rest: &path[i..],
        });
    }
    // Argument: everything up to the next top-level '.' or '|', with
    // brackets and JSON strings treated as opaque.
    let arg_start = i + 1;
    let mut depth = 0usize;
    i = arg_start;
    while i < b.len() {
        match b[i] {
            b'\\' => i += 1,
            b'"' => {
                i = skip_path_string(b, i);
                continue;
            }
            b'{' | b'[' | b'(' => depth += 1,
            b'}' | b']' | b')' => depth = depth.saturating_sub(1),
            b'.' | b'|' if depth == 0 => break,
            _ => {}
        }
        i += 1;
    }
    Ok(TransformSeg {
        name,
        arg: &path[arg_start..i],
        rest: &path[i..],
    })
}
