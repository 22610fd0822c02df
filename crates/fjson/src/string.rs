//! Small-string-optimized byte storage ([`JString`]) and the JSON escape
//! engine (`write_escaped_contents`/`write_quoted`).
//!
//! The escape engine's lookup table and sliding-cursor flush pattern are
//! adapted from this workspace's own `keyless_json::string` module, which in
//! turn notes it was "adapted almost entirely from serde_json's string
//! formatting" — the lineage this spec calls "a classic design... worth
//! preserving."

use std::fmt;
use std::io::{self, Write};

/// Strings shorter than this are stored inline in the [`JString`] itself;
/// longer strings fall back to a heap-allocated buffer. Chosen to match the
/// spec's suggested small constant while keeping `JString` itself compact.
pub const INLINE_STRING_CAPACITY: usize = 15;

/// A length-prefixed byte string using small-string optimization.
///
/// Embedded NUL bytes are legal and preserved byte-for-byte; `JString` never
/// relies on a NUL terminator for its length (unlike the C original's
/// C-string-escaping path), so there is no embedded-NUL truncation limitation
/// to inherit here — see `DESIGN.md`.
#[derive(Clone)]
pub enum JString {
    Inline {
        len: u8,
        bytes: [u8; INLINE_STRING_CAPACITY],
    },
    Heap(Box<[u8]>),
}

impl JString {
    pub fn new(bytes: &[u8]) -> JString {
        if bytes.len() < INLINE_STRING_CAPACITY {
            let mut buf = [0u8; INLINE_STRING_CAPACITY];
            buf[..bytes.len()].copy_from_slice(bytes);
            JString::Inline {
                len: bytes.len() as u8,
                bytes: buf,
            }
        } else {
            JString::Heap(Box::from(bytes))
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            JString::Inline { len, bytes } => &bytes[..*len as usize],
            JString::Heap(b) => b,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `None` if the stored bytes are not valid UTF-8. The escape engine
    /// below never needs this — it walks bytes directly — but callers that
    /// want a native `&str` view do.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, JString::Inline { .. })
    }
}

impl From<&str> for JString {
    fn from(s: &str) -> Self {
        JString::new(s.as_bytes())
    }
}

impl From<String> for JString {
    fn from(s: String) -> Self {
        JString::new(s.as_bytes())
    }
}

impl From<&[u8]> for JString {
    fn from(b: &[u8]) -> Self {
        JString::new(b)
    }
}

impl From<Vec<u8>> for JString {
    fn from(v: Vec<u8>) -> Self {
        JString::new(&v)
    }
}

impl PartialEq for JString {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for JString {}

impl fmt::Debug for JString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "{:?}", s),
            None => write!(f, "{:?}", self.as_bytes()),
        }
    }
}

const BB: u8 = b'b'; // \x08
const TT: u8 = b't'; // \x09
const NN: u8 = b'n'; // \x0A
const FF: u8 = b'f'; // \x0C
const RR: u8 = b'r'; // \x0D
const QU: u8 = b'"'; // \x22
const BS: u8 = b'\\'; // \x5C
const UU: u8 = b'u'; // \x00..\x1F except the ones named above
const SOL: u8 = b'/'; // \x2F
const __: u8 = 0;

/// Byte classification table: a nonzero entry at index `i` names the escape
/// letter used for byte `i`; `0` means "pass through verbatim". This is the
/// branchless-fast-path design the spec mandates for the common case.
///
/// Solidus (`/`, 0x2F) is escaped here even though most JSON libraries leave
/// it alone, because the must-escape set this crate targets names it
/// explicitly alongside the control characters and the quote/backslash pair.
static ESCAPE: [u8; 256] = [
    //   0   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
    UU, UU, UU, UU, UU, UU, UU, UU, BB, TT, NN, UU, FF, RR, UU, UU, // 0
    UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, UU, // 1
    __, __, QU, __, __, __, __, __, __, __, __, __, __, __, __, SOL, // 2
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 3
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 4
    __, __, __, __, __, __, __, __, __, __, __, __, BS, __, __, __, // 5
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 6
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 7
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
    __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
];

enum CharEscape {
    Quote,
    ReverseSolidus,
    Solidus,
    Backspace,
    FormFeed,
    LineFeed,
    CarriageReturn,
    Tab,
    AsciiControl(u8),
}

impl CharEscape {
    #[inline]
    fn from_escape_table(escape: u8, byte: u8) -> CharEscape {
        match escape {
            BB => CharEscape::Backspace,
            TT => CharEscape::Tab,
            NN => CharEscape::LineFeed,
            FF => CharEscape::FormFeed,
            RR => CharEscape::CarriageReturn,
            QU => CharEscape::Quote,
            BS => CharEscape::ReverseSolidus,
            SOL => CharEscape::Solidus,
            UU => CharEscape::AsciiControl(byte),
            _ => unreachable!(),
        }
    }
}

#[inline]
fn write_char_escape<W: ?Sized + Write>(writer: &mut W, escape: CharEscape) -> io::Result<usize> {
    use CharEscape::*;

    let s: &[u8] = match escape {
        Quote => b"\\\"",
        ReverseSolidus => b"\\\\",
        Solidus => b"\\/",
        Backspace => b"\\b",
        FormFeed => b"\\f",
        LineFeed => b"\\n",
        CarriageReturn => b"\\r",
        Tab => b"\\t",
        AsciiControl(byte) => {
            static HEX_DIGITS: [u8; 16] = *b"0123456789abcdef";
            let bytes = [
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX_DIGITS[(byte >> 4) as usize],
                HEX_DIGITS[(byte & 0xF) as usize],
            ];
            writer.write_all(&bytes)?;
            return Ok(bytes.len());
        }
    };
    writer.write_all(s)?;
    Ok(s.len())
}

/// Writes `value`'s JSON-escaped contents, *without* surrounding quotes, to
/// `writer`. Byte-oriented: UTF-8 continuation bytes pass through untouched,
/// since escaping is a function of the raw byte, never of a decoded code
/// point. Returns the number of bytes written.
pub fn write_escaped_contents<W: ?Sized + Write>(writer: &mut W, value: &[u8]) -> io::Result<usize> {
    let mut start = 0;
    let mut written = 0;

    for (i, &byte) in value.iter().enumerate() {
        let escape = ESCAPE[byte as usize];
        if escape == 0 {
            continue;
        }

        if start < i {
            writer.write_all(&value[start..i])?;
            written += i - start;
        }

        written += write_char_escape(writer, CharEscape::from_escape_table(escape, byte))?;
        start = i + 1;
    }

    if start < value.len() {
        writer.write_all(&value[start..])?;
        written += value.len() - start;
    }

    Ok(written)
}

/// Writes `value` as a complete, quoted JSON string (`"..."`), escaping its
/// contents. Returns the total number of bytes written, quotes included.
pub fn write_quoted<W: ?Sized + Write>(writer: &mut W, value: &[u8]) -> io::Result<usize> {
    writer.write_all(b"\"")?;
    let inner = write_escaped_contents(writer, value)?;
    writer.write_all(b"\"")?;
    Ok(inner + 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_vs_heap_threshold() {
        let short = JString::new(b"abcdef");
        assert!(short.is_inline());
        assert_eq!(short.len(), 6);

        let long = JString::new(&vec![b'x'; 64]);
        assert!(!long.is_inline());
        assert_eq!(long.len(), 64);
    }

    #[test]
    fn embedded_nul_round_trips() {
        let s = JString::new(&[0x20, 0x00, 0x20]);
        assert_eq!(s.as_bytes(), &[0x20, 0x00, 0x20]);
        assert!(s.is_inline());
    }

    #[test]
    fn escapes_control_and_quote_and_backslash() {
        let mut out = Vec::new();
        write_quoted(&mut out, b"a\"b\\c\nd\x01e").unwrap();
        assert_eq!(out, b"\"a\\\"b\\\\c\\nd\\u0001e\"");
    }

    #[test]
    fn escapes_embedded_nul_as_u0000() {
        let mut out = Vec::new();
        write_quoted(&mut out, &[0x20, 0x00, 0x20]).unwrap();
        assert_eq!(out, b"\" \\u0000 \"");
    }

    #[test]
    fn escapes_solidus() {
        let mut out = Vec::new();
        write_quoted(&mut out, b"a/b").unwrap();
        assert_eq!(out, b"\"a\\/b\"");
    }

    #[test]
    fn pass_through_is_untouched_for_non_ascii_utf8() {
        let mut out = Vec::new();
        write_quoted(&mut out, "héllo".as_bytes()).unwrap();
        assert_eq!(out, "\"héllo\"".as_bytes());
    }

    #[test]
    fn write_escaped_contents_reports_byte_count() {
        let mut out = Vec::new();
        let n = write_escaped_contents(&mut out, b"ab\nc").unwrap();
        assert_eq!(n, out.len());
        assert_eq!(out, b"ab\\nc");
    }
}
