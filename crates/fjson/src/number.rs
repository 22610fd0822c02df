//! Numeric formatting (C5): integers via `itoa`, finite doubles via `ryu`
//! plus the `.0`/trailing-zero touch-ups the spec requires, non-finite
//! doubles as literal tokens.
//!
//! Grounded on `keyless_json::serializer::{serialize_i64, serialize_f64}`,
//! which use exactly these two crates for exactly this purpose.

use std::io::{self, Write};

use crate::flags::SerializeFlags;

/// Writes `v` as a decimal integer, shortest unambiguous form.
pub fn write_int<W: ?Sized + Write>(writer: &mut W, v: i64) -> io::Result<usize> {
    let mut buf = itoa::Buffer::new();
    let s = buf.format(v);
    writer.write_all(s.as_bytes())?;
    Ok(s.len())
}

/// A double value, optionally carrying the original textual form it was
/// parsed from (set by [`crate::value::Value::double_from_string`]). When
/// present, that text is emitted verbatim and the formatting rules below are
/// skipped entirely.
#[derive(Clone, Debug, PartialEq)]
pub struct DoubleValue {
    value: f64,
    original_text: Option<Box<str>>,
}

impl DoubleValue {
    pub fn new(value: f64) -> Self {
        DoubleValue {
            value,
            original_text: None,
        }
    }

    pub fn with_original_text(value: f64, text: &str) -> Self {
        DoubleValue {
            value,
            original_text: Some(Box::from(text)),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn original_text(&self) -> Option<&str> {
        self.original_text.as_deref()
    }
}

/// Writes `d` following spec §4.5: preserved text verbatim if present,
/// otherwise `NaN`/`Infinity`/`-Infinity` for non-finite values, otherwise a
/// round-trip-safe finite rendering with an appended `.0` for integer-valued
/// results (unless an exponent is present), trimmed to one trailing zero
/// digit when [`SerializeFlags::NO_TRAILING_ZERO`] is set.
pub fn write_double<W: ?Sized + Write>(
    writer: &mut W,
    d: &DoubleValue,
    flags: SerializeFlags,
) -> io::Result<usize> {
    if let Some(text) = &d.original_text {
        writer.write_all(text.as_bytes())?;
        return Ok(text.len());
    }

    let v = d.value;
    if v.is_nan() {
        writer.write_all(b"NaN")?;
        return Ok(3);
    }
    if v.is_infinite() {
        let s: &[u8] = if v > 0.0 { b"Infinity" } else { b"-Infinity" };
        writer.write_all(s)?;
        return Ok(s.len());
    }

    let mut buf = ryu::Buffer::new();
    // `ryu` always renders with `.`, never a locale comma, so the
    // comma-replacement step spec.md §4.5 describes has nothing to do here.
    let rendered = buf.format_finite(v);
    let formatted = touch_up_finite(rendered, flags);
    writer.write_all(formatted.as_bytes())?;
    Ok(formatted.len())
}

fn touch_up_finite(rendered: &str, flags: SerializeFlags) -> String {
    let has_point_or_exp = rendered.contains('.') || rendered.contains('e') || rendered.contains('E');

    if !has_point_or_exp {
        return format!("{rendered}.0");
    }

    if flags.contains(SerializeFlags::NO_TRAILING_ZERO) {
        if let Some(trimmed) = trim_trailing_zeros(rendered) {
            return trimmed;
        }
    }

    rendered.to_string()
}

/// Trims trailing zeros from the fractional part of a decimal (non-exponent)
/// rendering, keeping exactly one digit after the point. Returns `None` for
/// exponent forms, which are left untouched (the spec only describes this
/// trimming for the plain decimal case).
fn trim_trailing_zeros(rendered: &str) -> Option<String> {
    if rendered.contains('e') || rendered.contains('E') {
        return None;
    }
    let dot = rendered.find('.')?;
    let (int_part, frac_part) = rendered.split_at(dot);
    let frac_digits = &frac_part[1..];
    let trimmed = frac_digits.trim_end_matches('0');
    let kept = if trimmed.is_empty() { "0" } else { trimmed };
    Some(format!("{int_part}.{kept}"))
}
