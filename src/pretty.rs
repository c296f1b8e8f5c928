//! Whitespace-level JSON formatters: [`pretty`] and [`minify`].
//!
//! These operate byte-to-byte on already-valid JSON and never reorder or
//! rewrite tokens (except for optional key sorting in [`pretty`]). They
//! back the `@pretty` / `@minify` transformers and are usable directly.

use crate::scanner::{self, strings};

/// Options for [`pretty`].
#[derive(Debug, Clone)]
pub struct PrettyOptions {
    /// Emit object members sorted by key instead of input order.
    pub sort_keys: bool,
    /// Per-level indentation. Only whitespace characters are honored; any
    /// other string falls back to two spaces.
    pub indent: String,
    /// Prefix prepended to every line. Only whitespace is honored.
    pub prefix: String,
    /// Containers whose single-line form fits within this column budget
    /// are packed onto one line.
    pub width: usize,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            sort_keys: false,
            indent: "  ".to_string(),
            prefix: String::new(),
            width: 80,
        }
    }
}

fn ws_only(s: &str, fallback: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c == ' ' || c == '\t' || c == '\n' || c == '\r') {
        s.to_string()
    } else {
        fallback.to_string()
    }
}

/// Re-emit `json` with indentation. Malformed tails are copied through
/// untouched; the formatter never fails.
pub fn pretty(json: &str, opts: &PrettyOptions) -> String {
    let indent = ws_only(&opts.indent, "  ");
    let prefix = ws_only(&opts.prefix, "");
    let mut out = String::with_capacity(json.len() + json.len() / 4);
    let b = json.as_bytes();
    let i = scanner::skip_ws(b, 0);
    if i >= b.len() {
        return out;
    }
    out.push_str(&prefix);
    let p = Printer {
        json,
        indent,
        prefix,
        width: opts.width,
        sort_keys: opts.sort_keys,
    };
    if p.value(i, 0, &mut out).is_none() {
        // Scanner gave up: fall back to the untouched input.
        return json.to_string();
    }
    out
}

/// Remove every whitespace byte outside of strings.
pub fn minify(json: &str) -> String {
    let b = json.as_bytes();
    let mut out = String::with_capacity(json.len());
    let mut i = 0usize;
    while i < b.len() {
        match b[i] {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            b'"' => match strings::skip_string(b, i) {
                Some((end, _)) => {
                    out.push_str(&json[i..end]);
                    i = end;
                }
                None => {
                    out.push_str(&json[i..]);
                    break;
                }
            },
            _ => {
                out.push(b[i] as char);
                i += 1;
            }
        }
    }
    out
}

struct Printer<'a> {
    json: &'a str,
    indent: String,
    prefix: String,
    width: usize,
    sort_keys: bool,
}

impl<'a> Printer<'a> {
    fn line_budget(&self, depth: usize) -> usize {
        self.width
            .saturating_sub(self.prefix.len() + self.indent.len() * depth)
    }

    fn pad(&self, depth: usize, out: &mut String) {
        out.push('\n');
        out.push_str(&self.prefix);
        for _ in 0..depth {
            out.push_str(&self.indent);
        }
    }

    /// Emit the value at `i`; returns the index past it.
    fn value(&self, i: usize, depth: usize, out: &mut String) -> Option<usize> {
        let b = self.json.as_bytes();
        match *b.get(i)? {
            b'{' | b'[' => {
                let end = scanner::squash(b, i)?;
                let compact = minify(&self.json[i..end]);
                // Packing skips member reordering, so it is off under
                // sort_keys except for empty containers.
                let packable = !self.sort_keys || compact.len() <= 2;
                if packable && (compact.len() <= self.line_budget(depth) || compact.len() <= 2) {
                    out.push_str(&compact);
                    return Some(end);
                }
                if b[i] == b'{' {
                    self.object(i, depth, out)
                } else {
                    self.array(i, depth, out)
                }
            }
            b'"' => {
                let (end, _) = strings::skip_string(b, i)?;
                out.push_str(&self.json[i..end]);
                Some(end)
            }
            _ => {
                let end = scanner::skip_value(b, i)?;
                out.push_str(&self.json[i..end]);
                Some(end)
            }
        }
    }

    fn object(&self, start: usize, depth: usize, out: &mut String) -> Option<usize> {
        let b = self.json.as_bytes();
        out.push('{');
        let mut i = scanner::skip_ws(b, start + 1);
        // Collect (key_range, value_range) pairs so sort_keys can reorder.
        let mut members: Vec<((usize, usize), (usize, usize))> = Vec::new();
        loop {
            if b.get(i) == Some(&b'}') {
                i += 1;
                break;
            }
            if b.get(i) != Some(&b'"') {
                return None;
            }
            let (kend, _) = strings::skip_string(b, i)?;
            let kr = (i, kend);
            i = scanner::skip_ws(b, kend);
            if b.get(i) != Some(&b':') {
                return None;
            }
            i = scanner::skip_ws(b, i + 1);
            let vend = scanner::skip_value(b, i)?;
            members.push((kr, (i, vend)));
            i = scanner::skip_ws(b, vend);
            match b.get(i).copied() {
                Some(b',') => i = scanner::skip_ws(b, i + 1),
                Some(b'}') => {
                    i += 1;
                    break;
                }
                _ => return None,
            }
        }
        if self.sort_keys {
            members.sort_by(|a, b| self.json[a.0.0..a.0.1].cmp(&self.json[b.0.0..b.0.1]));
        }
        for (n, (kr, vr)) in members.iter().enumerate() {
            if n > 0 {
                out.push(',');
            }
            self.pad(depth + 1, out);
            out.push_str(&self.json[kr.0..kr.1]);
            out.push_str(": ");
            self.value(vr.0, depth + 1, out)?;
        }
        if !members.is_empty() {
            self.pad(depth, out);
        }
        out.push('}');
        Some(i)
    }

    fn array(&self, start: usize, depth: usize, out: &mut String) -> Option<usize> {
        let b = self.json.as_bytes();
        out.push('[');
        let mut i = scanner::skip_ws(b, start + 1);
        let mut n = 0usize;
        loop {
            if b.get(i) == Some(&b']') {
                i += 1;
                break;
            }
            if n > 0 {
                out.push(',');
            }
            self.pad(depth + 1, out);
            i = self.value(i, depth + 1, out)?;
            n += 1;
            i = scanner::skip_ws(b, i);
            match b.get(i).copied() {
                Some(b',') => i = scanner::skip_ws(b, i + 1),
                Some(b']') => {
                    i += 1;
                    break;
                }
                _ => return None,
            }
        }
        if n > 0 {
            self.pad(depth, out);
        }
        out.push(']');
        Some(i)
    }
}
