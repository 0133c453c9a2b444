//! Sentinel-terminated template source.
//!
//! The template bytes are copied into a buffer with a `0x00` sentinel
//! appended and the total size rounded up to the next 64-byte boundary.
//! Lookahead near the end of input can read a few bytes past the content
//! without bounds checks failing; it just sees zeros.
//!
//! The original `&str` is kept alongside the buffer so captured spans can
//! be handed out as borrowed string slices with the source's lifetime.

/// Cache line size in bytes, used for buffer alignment padding.
const CACHE_LINE: usize = 64;

/// Template source owned by one parse invocation.
///
/// # Layout
///
/// ```text
/// [template_bytes..., 0x00, padding_zeros...]
///  ^                  ^     ^
///  0                  |     rounded up to 64-byte boundary
///                  len() (sentinel)
/// ```
#[derive(Clone, Debug)]
pub struct Source<'src> {
    text: &'src str,
    /// `[template_bytes..., 0x00 sentinel, 0x00 padding...]`.
    buf: Vec<u8>,
    /// Length of the template content (excludes sentinel and padding).
    len: u32,
}

impl<'src> Source<'src> {
    /// Wrap a template.
    ///
    /// Templates larger than `u32::MAX` bytes are accepted but `len()`
    /// saturates at `u32::MAX`; bytes past that point are never scanned.
    pub fn new(text: &'src str) -> Self {
        let bytes = text.as_bytes();
        let content_len = bytes.len();

        // Round up to next 64-byte boundary (minimum: content + 1 sentinel byte).
        let padded_len = (content_len + 1 + CACHE_LINE - 1) & !(CACHE_LINE - 1);

        let mut buf = vec![0u8; padded_len];
        buf[..content_len].copy_from_slice(bytes);

        Self {
            text,
            buf,
            len: u32::try_from(content_len).unwrap_or(u32::MAX),
        }
    }

    /// The original template text.
    pub fn text(&self) -> &'src str {
        self.text
    }

    /// Template bytes (without sentinel or padding).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }

    /// The full buffer including sentinel and cache-line padding.
    pub fn as_sentinel_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Byte at `offset`, or `0` at and past the end of the content.
    #[inline]
    pub fn byte_at(&self, offset: u32) -> u8 {
        if offset >= self.len {
            return 0;
        }
        self.buf.get(offset as usize).copied().unwrap_or(0)
    }

    /// Borrow `start..end` of the original text.
    ///
    /// Out-of-range or non-boundary spans yield an empty slice. Spans
    /// produced by the splitter always start and end next to ASCII bytes,
    /// so they are valid in practice.
    pub fn slice(&self, start: u32, end: u32) -> &'src str {
        let end = end.min(self.len);
        if start >= end {
            return "";
        }
        self.text.get(start as usize..end as usize).unwrap_or("")
    }

    /// Length of the template content in bytes.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
