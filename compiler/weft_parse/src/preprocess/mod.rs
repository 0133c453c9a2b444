//! Namespace declarations embedded in template text.
//!
//! Two forms are recognized before sequencing:
//!
//! - `{namespace f=Vendor\Package\Helpers}` is removed from the text and
//!   binds `f`. Newlines inside the declaration are kept so line numbers in
//!   later diagnostics still match the original.
//! - `xmlns:f="https://example.com/ns/helpers"` inside markup binds `f` to the
//!   attribute value. The attribute itself stays in the text.

use std::borrow::Cow;

use memchr::memmem;
use tracing::debug;
use weft_ir::NamespaceTable;

const DECLARATION: &[u8] = b"{namespace";
const XMLNS: &[u8] = b"xmlns:";

/// Record every namespace declaration in `text` into `namespaces` and
/// return the text with `{namespace ...}` declarations removed.
///
/// Returns the input unchanged (borrowed) when nothing was removed.
pub fn strip_namespace_declarations<'a>(
    text: &'a str,
    namespaces: &mut NamespaceTable,
) -> Cow<'a, str> {
    record_xmlns(text, namespaces);

    let bytes = text.as_bytes();
    let mut output: Option<String> = None;
    let mut copied = 0;
    for start in memmem::find_iter(bytes, DECLARATION) {
        if start < copied {
            continue;
        }
        let Some((end, prefix, identifier)) = parse_declaration(text, start) else {
            continue;
        };
        debug!(prefix, identifier, offset = start, "namespace declaration");
        namespaces.declare(prefix, identifier);

        let out = output.get_or_insert_with(|| String::with_capacity(text.len()));
        out.push_str(&text[copied..start]);
        out.extend(text[start..end].chars().filter(|&c| c == '\n'));
        copied = end;
    }

    match output {
        Some(mut out) => {
            out.push_str(&text[copied..]);
            Cow::Owned(out)
        }
        None => Cow::Borrowed(text),
    }
}

/// Parse `{namespace prefix=Identifier}` at `start`.
///
/// Returns the offset just past `}` with the prefix and identifier.
fn parse_declaration(text: &str, start: usize) -> Option<(usize, &str, &str)> {
    let body_start = start + DECLARATION.len();
    let bytes = text.as_bytes();
    if !bytes.get(body_start)?.is_ascii_whitespace() {
        return None;
    }
    let close = body_start + memchr::memchr2(b'}', b'{', &bytes[body_start..])?;
    if bytes[close] != b'}' {
        return None;
    }
    let (prefix, identifier) = text[body_start..close].split_once('=')?;
    let (prefix, identifier) = (prefix.trim(), identifier.trim());
    if !is_prefix(prefix) || identifier.is_empty() || identifier.contains(char::is_whitespace) {
        return None;
    }
    Some((close + 1, prefix, identifier))
}

fn record_xmlns(text: &str, namespaces: &mut NamespaceTable) {
    let bytes = text.as_bytes();
    for start in memmem::find_iter(bytes, XMLNS) {
        if start > 0 && !bytes[start - 1].is_ascii_whitespace() {
            continue;
        }
        if let Some((prefix, uri)) = parse_xmlns(text, start + XMLNS.len()) {
            debug!(prefix, uri, offset = start, "xmlns declaration");
            namespaces.declare(prefix, uri);
        }
    }
}

/// Parse `prefix="uri"` starting right after `xmlns:`.
fn parse_xmlns(text: &str, start: usize) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    let prefix_len = bytes[start..]
        .iter()
        .take_while(|&&b| is_prefix_byte(b))
        .count();
    if prefix_len == 0 {
        return None;
    }
    let equals = start + prefix_len;
    if bytes.get(equals) != Some(&b'=') {
        return None;
    }
    let quote = *bytes.get(equals + 1)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value_start = equals + 2;
    let value_len = memchr::memchr(quote, &bytes[value_start..])?;
    let uri = &text[value_start..value_start + value_len];
    if uri.is_empty() {
        return None;
    }
    Some((&text[start..equals], uri))
}

fn is_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && prefix.bytes().all(is_prefix_byte)
}

#[inline]
fn is_prefix_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}
