//! Serializer dispatch (C6) and the layout engine (C7).
//!
//! Each value carries an optional override (installed with
//! [`Value::set_serializer`]); absent an override, `default_serialize`
//! dispatches on the value's kind and recurses through containers,
//! consulting the object key iterator (C3) for object entries.

use std::any::Any;
use std::io::{self, Write};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::number;
use crate::string;
use crate::value::{Payload, Value};

pub use crate::flags::SerializeFlags;

/// The signature a custom per-value serializer must implement: write the
/// value's textual form to `writer` at the given indent `level` under
/// `flags`, returning the number of bytes written.
///
/// `+ Send + Sync` so that `Arc<CustomSerializerFn>` is itself `Send` —
/// without it, a `Value` carrying a custom serializer could never cross a
/// thread boundary, which would contradict this crate's "refcount is the
/// only thing that needs to be thread-safe" model (see `value.rs`).
pub type CustomSerializerFn =
    dyn Fn(&Value, &mut dyn Write, usize, SerializeFlags) -> io::Result<usize> + Send + Sync;

pub(crate) struct CustomSerializer {
    func: Arc<CustomSerializerFn>,
    /// Kept alive only for its `Drop` impl — the idiomatic replacement for
    /// the C original's manual `user_delete(value, user_data)` finalizer.
    /// Dropping this field (on reset, via `Option::take`/reassignment, or on
    /// the value's final release) *is* "invoking user_delete exactly once."
    _user_data: Box<dyn Any + Send + Sync>,
}

#[derive(Default)]
pub(crate) struct SerializerSlot {
    custom: Option<CustomSerializer>,
}

impl Value {
    /// Installs a custom serializer and its owned user data. If a custom
    /// serializer was already installed, its user data is dropped
    /// immediately (matching spec.md §4.6's "invoke prior user_delete before
    /// overwrite").
    pub fn set_serializer<F, D>(&self, func: F, user_data: D)
    where
        F: Fn(&Value, &mut dyn Write, usize, SerializeFlags) -> io::Result<usize> + Send + Sync + 'static,
        D: Send + Sync + 'static,
    {
        let mut slot = self.serializer_slot().borrow_mut();
        slot.custom = Some(CustomSerializer {
            func: Arc::new(func),
            _user_data: Box::new(user_data),
        });
    }

    /// Restores the default serializer for this value's kind, dropping any
    /// installed user data immediately. Equivalent to the C API's
    /// `set_serializer(value, NULL, NULL, NULL)`.
    pub fn clear_serializer(&self) {
        self.serializer_slot().borrow_mut().custom = None;
    }

    /// Serializes this value with the default [`SerializeFlags`] (`SPACED`),
    /// reusing this value's cached scratch buffer across repeated calls to
    /// avoid reallocating it each time.
    pub fn to_string_with_flags(&self, flags: SerializeFlags) -> String {
        let mut buf = self.format_buffer().borrow_mut();
        buf.clear();
        // A `Vec<u8>` sink itself cannot fail; the only way this panics is a
        // custom serializer that lies about its own byte count, a contract
        // violation callers wanting to catch should route through
        // `write_to`/`to_writer` instead of this infallible entry point.
        write_value(Some(self), &mut *buf, 0, flags).expect("custom serializer violated its byte-count contract");
        String::from_utf8(buf.clone()).expect("serializer only ever emits valid UTF-8")
    }

    /// Serializes this value to an arbitrary sink, propagating I/O errors.
    pub fn write_to<W: Write>(&self, writer: &mut W, flags: SerializeFlags) -> Result<usize> {
        write_value(Some(self), writer, 0, flags)
    }
}

/// The "simple" entry point (spec.md §4.7): serializes `value` (which may be
/// `None`, i.e. JSON `null`) with the default flags (`SPACED`).
pub fn to_string(value: Option<&Value>) -> String {
    to_string_with_flags(value, SerializeFlags::default())
}

pub fn to_string_with_flags(value: Option<&Value>, flags: SerializeFlags) -> String {
    let mut buf = Vec::with_capacity(128);
    write_value(value, &mut buf, 0, flags).expect("custom serializer violated its byte-count contract");
    String::from_utf8(buf).expect("serializer only ever emits valid UTF-8")
}

pub fn to_writer<W: Write>(value: Option<&Value>, writer: &mut W, flags: SerializeFlags) -> Result<usize> {
    write_value(value, writer, 0, flags)
}

/// Dispatches on whether `value` carries a custom serializer, falling back
/// to [`default_serialize`]. `None` (the null handle) always serializes as
/// the literal `null`, before any dispatch occurs.
pub fn write_value<W: ?Sized + Write>(
    value: Option<&Value>,
    writer: &mut W,
    level: usize,
    flags: SerializeFlags,
) -> Result<usize> {
    let Some(value) = value else {
        writer.write_all(b"null")?;
        return Ok(4);
    };

    let custom_func = {
        let slot = value.serializer_slot().borrow();
        slot.custom.as_ref().map(|c| Arc::clone(&c.func))
    };

    match custom_func {
        Some(func) => {
            let mut counting = CountingWriter::new(writer);
            let reported = func(value, &mut counting, level, flags)?;
            if reported != counting.count() {
                return Err(Error::InconsistentWrite);
            }
            Ok(reported)
        }
        None => default_serialize(value, writer, level, flags),
    }
}

/// Wraps a sink to track how many bytes actually reach it, so a custom
/// serializer's claimed return value can be checked against reality rather
/// than trusted blindly.
struct CountingWriter<'w, W: ?Sized + Write> {
    inner: &'w mut W,
    count: usize,
}

impl<'w, W: ?Sized + Write> CountingWriter<'w, W> {
    fn new(inner: &'w mut W) -> Self {
        CountingWriter { inner, count: 0 }
    }

    fn count(&self) -> usize {
        self.count
    }
}

impl<'w, W: ?Sized + Write> Write for CountingWriter<'w, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n;
        Ok(n)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf)?;
        self.count += buf.len();
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn default_serialize<W: ?Sized + Write>(
    value: &Value,
    writer: &mut W,
    level: usize,
    flags: SerializeFlags,
) -> Result<usize> {
    match value.payload() {
        Payload::Bool(b) => {
            let s: &[u8] = if *b { b"true" } else { b"false" };
            writer.write_all(s)?;
            Ok(s.len())
        }
        Payload::Int(i) => Ok(number::write_int(writer, *i)?),
        Payload::Double(d) => Ok(number::write_double(writer, d, flags)?),
        Payload::Str(s) => Ok(string::write_quoted(writer, s.as_bytes())?),
        Payload::Object(obj) => write_object(&obj.borrow(), writer, level, flags),
        Payload::Array(arr) => write_array(&arr.borrow(), writer, level, flags),
    }
}

fn write_indent<W: ?Sized + Write>(writer: &mut W, level: usize, flags: SerializeFlags) -> io::Result<usize> {
    if !flags.contains(SerializeFlags::PRETTY) || level == 0 {
        return Ok(0);
    }
    let unit: &[u8] = if flags.contains(SerializeFlags::PRETTY_TAB) {
        b"\t"
    } else {
        b"  "
    };
    for _ in 0..level {
        writer.write_all(unit)?;
    }
    Ok(unit.len() * level)
}

fn write_object<W: ?Sized + Write>(
    obj: &crate::object::Object,
    writer: &mut W,
    level: usize,
    flags: SerializeFlags,
) -> Result<usize> {
    let pretty = flags.contains(SerializeFlags::PRETTY);
    let spaced = flags.contains(SerializeFlags::SPACED);
    let mut written = 1;
    writer.write_all(b"{")?;
    if pretty {
        writer.write_all(b"\n")?;
        written += 1;
    }

    for (i, (key, val)) in obj.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
            written += 1;
            if pretty {
                writer.write_all(b"\n")?;
                written += 1;
            } else if spaced {
                writer.write_all(b" ")?;
                written += 1;
            }
        } else if spaced && !pretty {
            writer.write_all(b" ")?;
            written += 1;
        }

        written += write_indent(writer, level + 1, flags)?;
        written += string::write_quoted(writer, key.as_bytes())?;
        if spaced {
            writer.write_all(b": ")?;
            written += 2;
        } else {
            writer.write_all(b":")?;
            written += 1;
        }
        written += write_value(Some(val), writer, level + 1, flags)?;
    }

    if pretty && obj.len() > 0 {
        writer.write_all(b"\n")?;
        written += 1;
        written += write_indent(writer, level, flags)?;
    }
    if spaced && !pretty {
        writer.write_all(b" ")?;
        written += 1;
    }
    writer.write_all(b"}")?;
    written += 1;
    Ok(written)
}

fn write_array<W: ?Sized + Write>(
    arr: &crate::array::Array,
    writer: &mut W,
    level: usize,
    flags: SerializeFlags,
) -> Result<usize> {
    let pretty = flags.contains(SerializeFlags::PRETTY);
    let spaced = flags.contains(SerializeFlags::SPACED);
    let mut written = 1;
    writer.write_all(b"[")?;
    if pretty {
        writer.write_all(b"\n")?;
        written += 1;
    }

    for (i, element) in arr.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
            written += 1;
            if pretty {
                writer.write_all(b"\n")?;
                written += 1;
            } else if spaced {
                writer.write_all(b" ")?;
                written += 1;
            }
        } else if spaced && !pretty {
            writer.write_all(b" ")?;
            written += 1;
        }

        written += write_indent(writer, level + 1, flags)?;
        written += write_value(element, writer, level + 1, flags)?;
    }

    if pretty && arr.len() > 0 {
        writer.write_all(b"\n")?;
        written += 1;
        written += write_indent(writer, level, flags)?;
    }
    if spaced && !pretty {
        writer.write_all(b" ")?;
        written += 1;
    }
    writer.write_all(b"]")?;
    written += 1;
    Ok(written)
}
