//! ASCII-safe text for the flat CSV representation.
//!
//! `to_safe_text` escapes every non-printable or non-ASCII char:
//!   - control chars and the backslash itself -> `\xHH`
//!   - BMP code points                        -> `\uHHHH`
//!   - anything wider                         -> `\UHHHHHHHH`
//!
//! Escaping the backslash as `\x5c` keeps the output unambiguous, so that
//! `from_safe_text` can leave every other backslash sequence alone.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

fn escape_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\\(?:x[0-9A-Fa-f]{2}|u[0-9A-Fa-f]{4}|U[0-9A-Fa-f]{8})")
            .expect("escape pattern compiles")
    })
}

pub fn to_safe_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let cp = c as u32;
        if c == '\\' || (c.is_ascii() && c.is_ascii_control()) {
            out.push_str(&format!("\\x{:02x}", cp));
        } else if c.is_ascii() {
            out.push(c);
        } else if cp <= 0xFFFF {
            out.push_str(&format!("\\u{:04x}", cp));
        } else {
            out.push_str(&format!("\\U{:08x}", cp));
        }
    }
    out
}

/// Decode `\xHH`, `\uHHHH` and `\UHHHHHHHH` escapes. Sequences that do not name a
/// valid scalar value (e.g. a lone surrogate) and any other backslash are kept verbatim.
pub fn from_safe_text(s: &str) -> Cow<'_, str> {
    if !s.contains('\\') {
        return Cow::Borrowed(s);
    }
    escape_re().replace_all(s, |caps: &Captures| {
        let seq = &caps[0];
        u32::from_str_radix(&seq[2..], 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| seq.to_string())
    })
}
