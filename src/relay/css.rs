//! Stylesheet rewriting.
//!
//! A small scanner walks the stylesheet once, copying comments and string
//! literals verbatim and rewriting every `url(...)` token it finds outside
//! them. Rewritten references are always emitted double-quoted:
//! `url("<proxy endpoint><encoded absolute URL>")`.

use crate::relay::policy::{RewriteContext, CSS_SKIP_PREFIXES};

/// Rewrite every `url(...)` reference in `stylesheet`.
pub fn rewrite(stylesheet: &str, ctx: &RewriteContext) -> String {
    let bytes = stylesheet.as_bytes();
    let mut out = String::with_capacity(stylesheet.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = match stylesheet[i + 2..].find("*/") {
                    Some(end) => i + 2 + end + 2,
                    None => bytes.len(),
                };
            }
            quote @ (b'"' | b'\'') => {
                i = skip_string(bytes, i + 1, quote);
            }
            b'u' | b'U' if starts_url_token(bytes, i) => {
                let open = i + 4;
                match scan_url_body(bytes, open) {
                    Some(close) => {
                        if let Some(rewritten) = rewrite_url_value(&stylesheet[open..close], ctx) {
                            out.push_str(&stylesheet[copied..i]);
                            out.push_str(&rewritten);
                            copied = close + 1;
                        }
                        i = close + 1;
                    }
                    None => i = open,
                }
            }
            _ => i += 1,
        }
    }

    out.push_str(&stylesheet[copied..]);
    out
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b >= 0x80
}

/// `url(` at `i`, not the tail of a longer identifier.
fn starts_url_token(bytes: &[u8], i: usize) -> bool {
    bytes.len() >= i + 4
        && bytes[i..i + 4].eq_ignore_ascii_case(b"url(")
        && (i == 0 || !is_ident_byte(bytes[i - 1]))
}

/// Index just past the closing quote of a string starting before `i`.
fn skip_string(bytes: &[u8], mut i: usize, quote: u8) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            b'\n' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Index of the `)` closing a `url(` whose body starts at `open`.
fn scan_url_body(bytes: &[u8], open: usize) -> Option<usize> {
    let mut i = open;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if let Some(&quote @ (b'"' | b'\'')) = bytes.get(i) {
        i = skip_string(bytes, i + 1, quote);
    }
    bytes[i.min(bytes.len())..]
        .iter()
        .position(|&b| b == b')')
        .map(|offset| i + offset)
}

fn rewrite_url_value(raw: &str, ctx: &RewriteContext) -> Option<String> {
    let value = raw.trim();
    let value = value
        .strip_prefix(['"', '\''])
        .unwrap_or(value);
    let value = value
        .strip_suffix(['"', '\''])
        .unwrap_or(value);

    ctx.rewrite_reference(value, CSS_SKIP_PREFIXES)
        .map(|proxied| format!("url(\"{proxied}\")"))
}
