//! The result handle returned by every query.
//!
//! A [`Context`] carries a kind tag, the raw bytes of the matched value
//! (borrowed from the source whenever possible, owned when a transformer
//! or selector produced new bytes), the decoded scalar payloads, and the
//! byte offset of the value inside the source. It is immutable and cheap
//! to clone; everything it exposes is derived lazily from those fields.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, FixedOffset};

use crate::error::PathError;
use crate::kind::{Kind, is_ws};
use crate::scanner::{self, number, strings};

/// The opaque value handle produced by [`get`](crate::get),
/// [`parse`](crate::parse), and their variants.
#[derive(Debug, Clone, Default)]
pub struct Context<'a> {
    pub(crate) kind: Kind,
    pub(crate) raw: Cow<'a, str>,
    /// Decoded string payload; only meaningful for `Kind::String`.
    pub(crate) text: Cow<'a, str>,
    pub(crate) num: f64,
    pub(crate) index: usize,
    /// For `#(...)#` and pluck results: offset of each captured element in
    /// the source.
    pub(crate) indexes: Vec<usize>,
    pub(crate) err: Option<PathError>,
}

impl<'a> Context<'a> {
    // ------------------------------------------------------------------
    // Construction (crate-internal)
    // ------------------------------------------------------------------

    pub(crate) fn not_found() -> Self {
        Self::default()
    }

    pub(crate) fn from_error(err: PathError) -> Self {
        Self {
            err: Some(err),
            ..Self::default()
        }
    }

    /// Build a handle for the single raw token `json[start..end]`.
    pub(crate) fn capture_at(json: &'a str, start: usize, end: usize) -> Self {
        let raw = &json[start..end];
        let mut ctx = Self::capture(raw);
        ctx.index = start;
        ctx
    }

    /// Build a handle for a raw token slice (no surrounding whitespace).
    pub(crate) fn capture(raw: &'a str) -> Self {
        let b = raw.as_bytes();
        let Some(&first) = b.first() else {
            return Self::not_found();
        };
        match first {
            b'"' => {
                let body = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
                let text = if body.as_bytes().contains(&b'\\') {
                    Cow::Owned(strings::unescape(body))
                } else {
                    Cow::Borrowed(body)
                };
                Self {
                    kind: Kind::String,
                    raw: Cow::Borrowed(raw),
                    text,
                    ..Self::default()
                }
            }
            b'{' | b'[' => Self {
                kind: Kind::Json,
                raw: Cow::Borrowed(raw),
                ..Self::default()
            },
            b't' => Self {
                kind: Kind::True,
                raw: Cow::Borrowed(raw),
                num: 1.0,
                ..Self::default()
            },
            b'f' => Self {
                kind: Kind::False,
                raw: Cow::Borrowed(raw),
                ..Self::default()
            },
            b'n' => Self {
                kind: Kind::Null,
                raw: Cow::Borrowed(raw),
                ..Self::default()
            },
            b'-' | b'0'..=b'9' => Self {
                kind: Kind::Number,
                raw: Cow::Borrowed(raw),
                num: number::parse_f64(raw),
                ..Self::default()
            },
            _ => Self::not_found(),
        }
    }

    /// Build a handle from bytes the engine just produced (transformer or
    /// selector output). The handle owns its raw and `index` stays 0.
    ///
    /// The engine does not validate transformer output: bytes that do not
    /// start a JSON value are carried as a de-facto string so callers can
    /// still observe them; downstream segments then see non-existence.
    pub(crate) fn from_owned_raw(s: String) -> Context<'static> {
        let trimmed = s.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r'));
        if trimmed.is_empty() {
            return Context::not_found();
        }
        let mut owned = Context::capture(trimmed).into_owned();
        if !owned.exists() {
            owned = Context {
                kind: Kind::String,
                text: Cow::Owned(trimmed.to_string()),
                ..Context::not_found()
            };
        }
        if trimmed.len() == s.len() {
            owned.raw = Cow::Owned(s);
        } else {
            owned.raw = Cow::Owned(trimmed.to_string());
        }
        owned
    }

    /// Detach the handle from its source buffer.
    pub fn into_owned(self) -> Context<'static> {
        Context {
            kind: self.kind,
            raw: Cow::Owned(self.raw.into_owned()),
            text: Cow::Owned(self.text.into_owned()),
            num: self.num,
            index: self.index,
            indexes: self.indexes,
            err: self.err,
        }
    }

    // ------------------------------------------------------------------
    // Basic observers
    // ------------------------------------------------------------------

    /// The kind of the value.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The raw bytes of the value inside the source, quotes included for
    /// strings. Empty for a non-existent handle.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Byte offset of [`raw`](Self::raw) in the source; 0 when unknown
    /// (e.g. after a transformer produced new bytes).
    pub fn index(&self) -> usize {
        self.index
    }

    /// For `#(...)#` query and pluck results, the byte offset of each
    /// captured element in the source; empty otherwise.
    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    /// Whether the path resolved to a value. An explicit `null` exists; a
    /// missing path does not.
    pub fn exists(&self) -> bool {
        self.kind != Kind::Null || !self.raw.is_empty()
    }

    /// The path error carried by a handle returned from a malformed path.
    pub fn cause(&self) -> Option<&PathError> {
        self.err.as_ref()
    }

    /// True when the value is an object.
    pub fn is_object(&self) -> bool {
        self.kind == Kind::Json && self.raw.as_bytes().first() == Some(&b'{')
    }

    /// True when the value is an array.
    pub fn is_array(&self) -> bool {
        self.kind == Kind::Json && self.raw.as_bytes().first() == Some(&b'[')
    }

    /// True when the value is `true` or `false`.
    pub fn is_bool(&self) -> bool {
        matches!(self.kind, Kind::True | Kind::False)
    }

    // ------------------------------------------------------------------
    // Typed accessors — kind-directed coercions, zero values on failure
    // ------------------------------------------------------------------

    /// Coerce to bool: `true`→true, numbers by non-zero, strings by
    /// parsing `"true"`/`"t"`/`"1"` (case-insensitive); everything else
    /// false.
    pub fn as_bool(&self) -> bool {
        match self.kind {
            Kind::True => true,
            Kind::Number => self.num != 0.0,
            Kind::String => matches!(
                self.text.to_ascii_lowercase().as_str(),
                "1" | "t" | "true"
            ),
            _ => false,
        }
    }

    /// Coerce to `i64`. Out-of-range values yield 0.
    pub fn as_i64(&self) -> i64 {
        match self.kind {
            Kind::True => 1,
            Kind::Number => {
                if let Ok(v) = self.raw.trim().parse::<i64>() {
                    return v;
                }
                float_to_i64(self.num)
            }
            Kind::String => {
                if let Ok(v) = self.text.trim().parse::<i64>() {
                    return v;
                }
                float_to_i64(number::parse_f64(self.text.trim()))
            }
            _ => 0,
        }
    }

    /// Coerce to `u64`. Negative and out-of-range values yield 0.
    pub fn as_u64(&self) -> u64 {
        match self.kind {
            Kind::True => 1,
            Kind::Number => {
                if let Ok(v) = self.raw.trim().parse::<u64>() {
                    return v;
                }
                float_to_u64(self.num)
            }
            Kind::String => {
                if let Ok(v) = self.text.trim().parse::<u64>() {
                    return v;
                }
                float_to_u64(number::parse_f64(self.text.trim()))
            }
            _ => 0,
        }
    }

    /// Coerce to `f64`.
    pub fn as_f64(&self) -> f64 {
        match self.kind {
            Kind::True => 1.0,
            Kind::Number => self.num,
            Kind::String => number::parse_f64(self.text.trim()),
            _ => 0.0,
        }
    }

    /// The string form of the value: decoded text for strings, raw bytes
    /// for numbers and JSON, `"true"`/`"false"` for booleans, empty for
    /// null and non-existent handles.
    pub fn as_str(&self) -> Cow<'_, str> {
        match self.kind {
            Kind::Null => Cow::Borrowed(""),
            Kind::True => Cow::Borrowed("true"),
            Kind::False => Cow::Borrowed("false"),
            Kind::String => Cow::Borrowed(self.text.as_ref()),
            Kind::Number => {
                if self.raw.is_empty() {
                    Cow::Owned(number::format_f64(self.num))
                } else {
                    Cow::Borrowed(self.raw.as_ref())
                }
            }
            Kind::Json => Cow::Borrowed(self.raw.as_ref()),
        }
    }

    /// Parse the string form as a timestamp. `layout` is a chrono format
    /// string; `None` means RFC 3339. `None` is returned on any failure —
    /// the zero value of this accessor.
    pub fn as_time(&self, layout: Option<&str>) -> Option<DateTime<FixedOffset>> {
        let s = self.as_str();
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        match layout {
            None => DateTime::parse_from_rfc3339(s).ok(),
            Some(fmt) => DateTime::parse_from_str(s, fmt).ok().or_else(|| {
                chrono::NaiveDateTime::parse_from_str(s, fmt)
                    .ok()
                    .map(|n| n.and_utc().fixed_offset())
            }),
        }
    }

    /// Materialize into a [`serde_json::Value`], recursively for objects
    /// and arrays. Non-existent and unparseable handles become `Null`.
    #[cfg(feature = "serde")]
    pub fn value(&self) -> serde_json::Value {
        match self.kind {
            Kind::Null => serde_json::Value::Null,
            Kind::True => serde_json::Value::Bool(true),
            Kind::False => serde_json::Value::Bool(false),
            Kind::String => serde_json::Value::String(self.text.clone().into_owned()),
            Kind::Number | Kind::Json => {
                serde_json::from_str(&self.raw).unwrap_or(serde_json::Value::Null)
            }
        }
    }

    // ------------------------------------------------------------------
    // Container traversal
    // ------------------------------------------------------------------

    /// Stream key/value (object) or index/value (array) pairs in document
    /// order. The visitor returns `false` to stop. A scalar handle visits
    /// once with a non-existent key.
    pub fn foreach<F>(&self, mut visitor: F)
    where
        F: FnMut(Context<'a>, Context<'a>) -> bool,
    {
        if !self.exists() {
            return;
        }
        if self.kind != Kind::Json {
            visitor(Context::not_found(), self.clone());
            return;
        }
        let raw: &str = &self.raw;
        let b = raw.as_bytes();
        let is_obj = b.first() == Some(&b'{');
        let mut i = 1usize;
        let mut ord = 0usize;
        loop {
            i = scanner::skip_ws(b, i);
            match b.get(i).copied() {
                None | Some(b'}') | Some(b']') => return,
                Some(b',') => {
                    i += 1;
                    continue;
                }
                _ => {}
            }
            let key = if is_obj {
                if b.get(i) != Some(&b'"') {
                    return;
                }
                let Some((kend, _)) = strings::skip_string(b, i) else {
                    return;
                };
                let key = self.subvalue(i, kend);
                i = scanner::skip_ws(b, kend);
                if b.get(i) != Some(&b':') {
                    return;
                }
                i = scanner::skip_ws(b, i + 1);
                key
            } else {
                let mut k = Context::not_found();
                k.kind = Kind::Number;
                k.num = ord as f64;
                k.raw = Cow::Owned(ord.to_string());
                k
            };
            let Some(end) = scanner::skip_value(b, i) else {
                return;
            };
            let val = self.subvalue(i, end);
            if !visitor(key, val) {
                return;
            }
            ord += 1;
            i = end;
        }
    }

    /// Materialize an array handle into a vector of element handles. A
    /// non-array, existent handle yields a single-element vector.
    pub fn array(&self) -> Vec<Context<'a>> {
        if !self.exists() {
            return Vec::new();
        }
        if !self.is_array() {
            return vec![self.clone()];
        }
        let mut out = Vec::new();
        self.foreach(|_, v| {
            out.push(v);
            true
        });
        out
    }

    /// Materialize an object handle into name/handle pairs. Preserves
    /// first-occurrence order; duplicate keys keep the first value.
    pub fn map(&self) -> Vec<(String, Context<'a>)> {
        let mut out: Vec<(String, Context<'a>)> = Vec::new();
        if !self.is_object() {
            return out;
        }
        let mut seen = std::collections::HashSet::new();
        self.foreach(|k, v| {
            let name = k.as_str().into_owned();
            if seen.insert(name.clone()) {
                out.push((name, v));
            }
            true
        });
        out
    }

    /// Build a handle for `raw[start..end]`, preserving borrowing and
    /// source offsets where possible.
    fn subvalue(&self, start: usize, end: usize) -> Context<'a> {
        match &self.raw {
            Cow::Borrowed(s) => {
                let src: &'a str = *s;
                let mut ctx = Context::capture(&src[start..end]);
                ctx.index = self.index + start;
                ctx
            }
            Cow::Owned(s) => Context::capture(&s[start..end]).into_owned(),
        }
    }

    // ------------------------------------------------------------------
    // Sub-queries
    // ------------------------------------------------------------------

    /// Run a path against this value. Offsets are shifted so that
    /// [`path`](Self::path) reconstruction keeps working through chains.
    pub fn get(&self, path: &str) -> Context<'a> {
        match &self.raw {
            Cow::Borrowed(s) => {
                let src: &'a str = *s;
                let mut res = crate::resolver::resolve(src, path, false);
                if let Cow::Borrowed(_) = res.raw {
                    res.index += self.index;
                    for ix in &mut res.indexes {
                        *ix += self.index;
                    }
                }
                res
            }
            Cow::Owned(s) => crate::resolver::resolve(s, path, false).into_owned(),
        }
    }

    /// Run several paths; the results are independent (no shared caching).
    pub fn get_multi(&self, paths: &[&str]) -> Vec<Context<'a>> {
        paths.iter().map(|p| self.get(p)).collect()
    }

    // ------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------

    /// Total order across kinds: `Null < False < Number < String < True <
    /// JSON`; numbers by value, strings lexicographically, JSON by raw
    /// bytes.
    pub fn less(&self, other: &Context<'_>, case_sensitive: bool) -> bool {
        if self.kind != other.kind {
            return self.kind < other.kind;
        }
        match self.kind {
            Kind::Number => self.num < other.num,
            Kind::String => {
                if case_sensitive {
                    self.text < other.text
                } else {
                    caseless_less(&self.text, &other.text)
                }
            }
            Kind::Json => self.raw < other.raw,
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Backward path reconstruction
    // ------------------------------------------------------------------

    /// Reconstruct the dot-notation path that would regenerate this handle
    /// from `source`, by walking backward from [`index`](Self::index).
    /// Returns an empty string when the handle was produced by a
    /// transformer or multi-selector (its raw no longer sits in the
    /// source), or when the offset does not line up with a value.
    pub fn path(&self, source: &str) -> String {
        if self.err.is_some() || self.raw.is_empty() {
            return String::new();
        }
        if !source[self.index.min(source.len())..].starts_with(self.raw.as_ref()) {
            return String::new();
        }
        let Some(mut comps) = backward_components(source.as_bytes(), source, self.index) else {
            return String::new();
        };
        comps.reverse();
        comps.join(".")
    }

    /// [`path`](Self::path) for every captured element of a `#(...)#` or
    /// pluck result; empty when [`indexes`](Self::indexes) is empty.
    pub fn paths(&self, source: &str) -> Vec<String> {
        let b = source.as_bytes();
        let mut out = Vec::with_capacity(self.indexes.len());
        for &ix in &self.indexes {
            let Some(end) = scanner::skip_value(b, ix) else {
                return Vec::new();
            };
            out.push(Context::capture_at(source, ix, end).path(source));
        }
        out
    }
}

impl fmt::Display for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Context<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

fn float_to_i64(v: f64) -> i64 {
    if v.is_finite() && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
        v as i64
    } else {
        0
    }
}

fn float_to_u64(v: f64) -> u64 {
    if v.is_finite() && v >= 0.0 && v <= u64::MAX as f64 {
        v as u64
    } else {
        0
    }
}

fn caseless_less(a: &str, b: &str) -> bool {
    let mut ai = a.chars().flat_map(char::to_lowercase);
    let mut bi = b.chars().flat_map(char::to_lowercase);
    loop {
        match (ai.next(), bi.next()) {
            (None, None) => return false,
            (None, Some(_)) => return true,
            (Some(_), None) => return false,
            (Some(x), Some(y)) if x != y => return x < y,
            _ => {}
        }
    }
}

// ----------------------------------------------------------------------
// Backward scanning for path()
// ----------------------------------------------------------------------

/// Collect path components (innermost first) for the value starting at
/// byte `idx`. `None` means the surroundings did not look like a value
/// position — e.g. the offset sits inside a string.
fn backward_components(b: &[u8], source: &str, idx: usize) -> Option<Vec<String>> {
    let mut comps = Vec::new();
    let mut i = idx as isize - 1;
    loop {
        while i >= 0 && is_ws(b[i as usize]) {
            i -= 1;
        }
        if i < 0 {
            return Some(comps); // reached the document root
        }
        match b[i as usize] {
            b':' => {
                // Object member: read our key, then walk preceding members
                // back to the opening brace.
                i -= 1;
                while i >= 0 && is_ws(b[i as usize]) {
                    i -= 1;
                }
                if i < 0 || b[i as usize] != b'"' {
                    return None;
                }
                let close = i as usize;
                let open = rev_string_start(b, close)?;
                let body = &source[open + 1..close];
                comps.push(escape_component(&strings::unescape(body)));
                i = open as isize - 1;
                loop {
                    while i >= 0 && is_ws(b[i as usize]) {
                        i -= 1;
                    }
                    if i < 0 {
                        return None;
                    }
                    match b[i as usize] {
                        b',' => {
                            i = rev_skip_member(b, i - 1)?;
                        }
                        b'{' => {
                            i -= 1;
                            break;
                        }
                        _ => return None,
                    }
                }
            }
            b',' | b'[' => {
                // Array element: count how many siblings precede us.
                let mut n = 0usize;
                while b[i as usize] == b',' {
                    i = rev_skip_value(b, i - 1)?;
                    while i >= 0 && is_ws(b[i as usize]) {
                        i -= 1;
                    }
                    if i < 0 {
                        return None;
                    }
                    n += 1;
                }
                if b[i as usize] != b'[' {
                    return None;
                }
                comps.push(n.to_string());
                i -= 1;
            }
            _ => return None,
        }
    }
}

/// Find the opening quote of the string whose closing quote is at `close`.
fn rev_string_start(b: &[u8], close: usize) -> Option<usize> {
    let mut i = close as isize - 1;
    while i >= 0 {
        if b[i as usize] == b'"' {
            let mut j = i - 1;
            let mut slashes = 0usize;
            while j >= 0 && b[j as usize] == b'\\' {
                slashes += 1;
                j -= 1;
            }
            if slashes % 2 == 0 {
                return Some(i as usize);
            }
        }
        i -= 1;
    }
    None
}

/// Skip one value backward; `i` is at its last byte (whitespace already
/// consumed by the caller). Returns the index just before the value.
fn rev_skip_value(b: &[u8], mut i: isize) -> Option<isize> {
    while i >= 0 && is_ws(b[i as usize]) {
        i -= 1;
    }
    if i < 0 {
        return None;
    }
    match b[i as usize] {
        b'"' => {
            let open = rev_string_start(b, i as usize)?;
            Some(open as isize - 1)
        }
        b'}' | b']' => {
            let mut depth = 1usize;
            i -= 1;
            while i >= 0 {
                match b[i as usize] {
                    b'"' => {
                        let open = rev_string_start(b, i as usize)?;
                        i = open as isize - 1;
                        continue;
                    }
                    b'}' | b']' => depth += 1,
                    b'{' | b'[' => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(i - 1);
                        }
                    }
                    _ => {}
                }
                i -= 1;
            }
            None
        }
        _ => {
            // number or literal
            while i >= 0
                && matches!(b[i as usize],
                    b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'.' | b'-' | b'+')
            {
                i -= 1;
            }
            Some(i)
        }
    }
}

/// Skip one `key: value` member backward; `i` is just before the member's
/// trailing comma. Returns the index just before the key's opening quote.
fn rev_skip_member(b: &[u8], mut i: isize) -> Option<isize> {
    i = rev_skip_value(b, i)?;
    while i >= 0 && is_ws(b[i as usize]) {
        i -= 1;
    }
    if i < 0 || b[i as usize] != b':' {
        return None;
    }
    i -= 1;
    while i >= 0 && is_ws(b[i as usize]) {
        i -= 1;
    }
    if i < 0 || b[i as usize] != b'"' {
        return None;
    }
    let open = rev_string_start(b, i as usize)?;
    Some(open as isize - 1)
}

/// Capture the first value of a document as a handle. Best-effort on
/// truncated containers: the handle covers the remaining bytes.
pub(crate) fn parse_value(json: &str) -> Context<'_> {
    let b = json.as_bytes();
    let i = scanner::skip_ws(b, 0);
    if i >= b.len() {
        return Context::not_found();
    }
    match scanner::skip_value(b, i) {
        Some(end) => Context::capture_at(json, i, end),
        None => {
            let mut ctx = Context::capture(&json[i..]);
            ctx.index = i;
            ctx
        }
    }
}

/// Escape path metacharacters in a reconstructed key component.
pub(crate) fn escape_component(comp: &str) -> String {
    let mut out = String::with_capacity(comp.len());
    for c in comp.chars() {
        if matches!(c, '.' | '|' | '#' | '@' | '*' | '?' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
