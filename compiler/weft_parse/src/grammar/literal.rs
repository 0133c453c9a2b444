//! Unquoted literals and string unescaping.

use weft_ir::Value;

/// Parse `word` as a number.
///
/// Accepts an optional leading `-`, ASCII digits and at most one `.`
/// followed by digits. Integers that overflow `i64` become floats.
/// Anything else (`1e3`, `inf`, `.5`, `1.`) is not a number.
pub(super) fn numeric(word: &str) -> Option<Value> {
    let digits = word.strip_prefix('-').unwrap_or(word);
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };
    if !is_digits(integer) {
        return None;
    }
    match fraction {
        None => word
            .parse::<i64>()
            .map(Value::Integer)
            .or_else(|_| word.parse::<f64>().map(Value::Float))
            .ok(),
        Some(fraction) if is_digits(fraction) => word.parse::<f64>().ok().map(Value::Float),
        Some(_) => None,
    }
}

/// Whether `word` can stand alone as an object path such as `user.name`
/// or `items.0`: segments of ASCII letters, digits, `_` and `-` joined by
/// single dots.
pub(super) fn is_object_path(word: &str) -> bool {
    !word.is_empty()
        && word.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        })
}

#[inline]
fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Append `raw` to `out`, replacing every `\x` with `x`.
pub(super) fn unescape_into(out: &mut String, raw: &str) {
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
}
