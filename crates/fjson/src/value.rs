//! The value model (C1), lifetime manager (C2), and the typed constructors
//! and cross-kind coercions (C8).
//!
//! `Value` is `Arc<Inner>`: a tagged union (`Payload`) behind an atomically
//! reference-counted pointer. This is spec.md §9's own re-architecture hint
//! taken literally — "the intrusive reference count can be a single atomic
//! counter colocated with the payload" is exactly what `Arc`'s strong count
//! already is. `Inner` holds `RefCell`s for the parts the spec requires to be
//! mutable through a shared handle (the serializer override slot, the
//! object/array payload, the cached format buffer); their presence makes
//! `Arc<Inner>` `Send` but not `Sync`, which is precisely the concurrency
//! model spec.md §5 describes: the refcount may cross threads, nothing else
//! may.

use std::borrow::Cow;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::sync::Arc;

use crate::array::{Array, ArrayIter};
use crate::flags::SerializeFlags;
use crate::number::DoubleValue;
use crate::object::{Object, ObjectIter};
use crate::serialize::{self, SerializerSlot};
use crate::string::JString;

/// The discriminant of the tagged union. `null` is deliberately absent here:
/// per spec.md §3, JSON `null` is represented by the *absence* of a `Value`
/// (`Option<Value>` or `Option<&Value>` throughout this crate's API), never
/// by a stored variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Double,
    String,
    Object,
    Array,
}

pub(crate) enum Payload {
    Bool(bool),
    Int(i64),
    Double(DoubleValue),
    Str(JString),
    Object(RefCell<Object>),
    Array(RefCell<Array>),
}

pub(crate) struct Inner {
    pub(crate) payload: Payload,
    pub(crate) serializer: RefCell<SerializerSlot>,
    pub(crate) format_buffer: RefCell<Vec<u8>>,
}

/// A reference-counted JSON value.
///
/// Cloning a `Value` is cheap (an `Arc` strong-count bump); `acquire`/
/// `release` are provided as explicit, named operations for callers porting
/// code written against the C original's API, but idiomatic Rust code should
/// just `clone()`/let-drop.
#[derive(Clone)]
pub struct Value(Arc<Inner>);

impl Value {
    fn new(payload: Payload) -> Value {
        Value(Arc::new(Inner {
            payload,
            serializer: RefCell::new(SerializerSlot::default()),
            format_buffer: RefCell::new(Vec::new()),
        }))
    }

    pub fn bool(v: bool) -> Value {
        Value::new(Payload::Bool(v))
    }

    pub fn int(v: i64) -> Value {
        Value::new(Payload::Int(v))
    }

    pub fn double(v: f64) -> Value {
        Value::new(Payload::Double(DoubleValue::new(v)))
    }

    /// Constructs a double that remembers `text`, its original textual form.
    /// Serialization emits `text` verbatim rather than reformatting `v`, per
    /// spec.md §4.5's "source ambiguity" carve-out. Fails if `text` doesn't
    /// parse as a finite or non-finite `f64` literal.
    pub fn double_from_string(text: &str) -> Result<Value, std::num::ParseFloatError> {
        let v: f64 = text.parse()?;
        Ok(Value::new(Payload::Double(DoubleValue::with_original_text(
            v, text,
        ))))
    }

    pub fn string(s: impl Into<JString>) -> Value {
        Value::new(Payload::Str(s.into()))
    }

    pub fn object(o: Object) -> Value {
        Value::new(Payload::Object(RefCell::new(o)))
    }

    pub fn array(a: Array) -> Value {
        Value::new(Payload::Array(RefCell::new(a)))
    }

    pub fn empty_object() -> Value {
        Value::object(Object::new())
    }

    pub fn empty_array() -> Value {
        Value::array(Array::new())
    }

    pub fn kind(&self) -> Kind {
        match &self.0.payload {
            Payload::Bool(_) => Kind::Bool,
            Payload::Int(_) => Kind::Int,
            Payload::Double(_) => Kind::Double,
            Payload::Str(_) => Kind::String,
            Payload::Object(_) => Kind::Object,
            Payload::Array(_) => Kind::Array,
        }
    }

    /// Increments the reference count and returns a new handle to the same
    /// value. Equivalent to [`Clone::clone`]; spelled out for callers
    /// porting the C `json_object_get`-style API.
    pub fn acquire(&self) -> Value {
        self.clone()
    }

    /// Decrements the reference count, running finalizers if this was the
    /// last handle. Equivalent to `drop(value)`.
    pub fn release(self) {
        drop(self)
    }

    /// The current strong reference count. Mirrors the C API's debug/assert
    /// use of the refcount; not meaningful across threads without external
    /// synchronization beyond what `Arc` itself gives.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    // -- Coercions (spec.md §4.8) -----------------------------------------

    pub fn as_bool(&self) -> bool {
        match &self.0.payload {
            Payload::Bool(b) => *b,
            Payload::Int(i) => *i != 0,
            Payload::Double(d) => d.value() != 0.0,
            Payload::Str(s) => !s.is_empty(),
            Payload::Object(_) | Payload::Array(_) => false,
        }
    }

    pub fn as_i64(&self) -> i64 {
        match &self.0.payload {
            Payload::Bool(b) => *b as i64,
            Payload::Int(i) => *i,
            // Rust's `as` cast from float to int truncates toward zero and
            // saturates on overflow rather than invoking UB, which is a
            // strictly safer rendition of the C original's truncation rule.
            Payload::Double(d) => d.value() as i64,
            // Full-consumption parse, no whitespace trimming: "42" coerces,
            // "42 " does not (matches the `strtod`-with-full-consumption-check
            // coercion table, spec.md §4.8).
            Payload::Str(s) => s.as_str().and_then(|t| t.parse::<i64>().ok()).unwrap_or(0),
            Payload::Object(_) | Payload::Array(_) => 0,
        }
    }

    pub fn as_i32(&self) -> i32 {
        self.as_i64().clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    pub fn as_f64(&self) -> f64 {
        match &self.0.payload {
            Payload::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Payload::Int(i) => *i as f64,
            Payload::Double(d) => d.value(),
            // Full-consumption parse, no whitespace trimming — see `as_i64`.
            Payload::Str(s) => s
                .as_str()
                .and_then(|t| t.parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(0.0),
            Payload::Object(_) | Payload::Array(_) => 0.0,
        }
    }

    /// For a string value, the borrowed contents (lossily re-decoded if the
    /// stored bytes aren't valid UTF-8). For any other kind, the value's own
    /// `to_string()` rendering, per spec.md §4.8's coercion table.
    pub fn as_str(&self) -> Cow<'_, str> {
        match &self.0.payload {
            Payload::Str(s) => match s.as_str() {
                Some(t) => Cow::Borrowed(t),
                None => Cow::Owned(String::from_utf8_lossy(s.as_bytes()).into_owned()),
            },
            _ => Cow::Owned(serialize::to_string_with_flags(
                Some(self),
                SerializeFlags::default(),
            )),
        }
    }

    // -- Object / array access ---------------------------------------------

    pub fn as_object(&self) -> Option<ObjectRef<'_>> {
        match &self.0.payload {
            Payload::Object(cell) => Some(ObjectRef(cell.borrow())),
            _ => None,
        }
    }

    pub fn as_object_mut(&self) -> Option<ObjectRefMut<'_>> {
        match &self.0.payload {
            Payload::Object(cell) => Some(ObjectRefMut(cell.borrow_mut())),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<ArrayRef<'_>> {
        match &self.0.payload {
            Payload::Array(cell) => Some(ArrayRef(cell.borrow())),
            _ => None,
        }
    }

    pub fn as_array_mut(&self) -> Option<ArrayRefMut<'_>> {
        match &self.0.payload {
            Payload::Array(cell) => Some(ArrayRefMut(cell.borrow_mut())),
            _ => None,
        }
    }

    pub(crate) fn payload(&self) -> &Payload {
        &self.0.payload
    }

    pub(crate) fn serializer_slot(&self) -> &RefCell<SerializerSlot> {
        &self.0.serializer
    }

    pub(crate) fn format_buffer(&self) -> &RefCell<Vec<u8>> {
        &self.0.format_buffer
    }
}

/// Treats `v` as JSON `null` when absent, matching the coercion rules.
pub fn bool_value(v: Option<&Value>) -> bool {
    v.map_or(false, Value::as_bool)
}

pub fn i64_value(v: Option<&Value>) -> i64 {
    v.map_or(0, Value::as_i64)
}

pub fn i32_value(v: Option<&Value>) -> i32 {
    v.map_or(0, Value::as_i32)
}

pub fn f64_value(v: Option<&Value>) -> f64 {
    v.map_or(0.0, Value::as_f64)
}

pub fn str_value(v: Option<&Value>) -> Cow<'_, str> {
    match v {
        Some(value) => value.as_str(),
        None => Cow::Borrowed(""),
    }
}

/// A borrowed, read-only view into an object-kind value's contents.
pub struct ObjectRef<'a>(Ref<'a, Object>);

impl<'a> std::ops::Deref for ObjectRef<'a> {
    type Target = Object;
    fn deref(&self) -> &Object {
        &self.0
    }
}

impl<'a> ObjectRef<'a> {
    pub fn iter(&self) -> ObjectIter<'_> {
        self.0.iter()
    }
}

/// A borrowed, mutable view into an object-kind value's contents.
pub struct ObjectRefMut<'a>(RefMut<'a, Object>);

impl<'a> std::ops::Deref for ObjectRefMut<'a> {
    type Target = Object;
    fn deref(&self) -> &Object {
        &self.0
    }
}

impl<'a> std::ops::DerefMut for ObjectRefMut<'a> {
    fn deref_mut(&mut self) -> &mut Object {
        &mut self.0
    }
}

/// A borrowed, read-only view into an array-kind value's contents.
pub struct ArrayRef<'a>(Ref<'a, Array>);

impl<'a> std::ops::Deref for ArrayRef<'a> {
    type Target = Array;
    fn deref(&self) -> &Array {
        &self.0
    }
}

impl<'a> ArrayRef<'a> {
    pub fn iter(&self) -> ArrayIter<'_> {
        self.0.iter()
    }
}

/// A borrowed, mutable view into an array-kind value's contents.
pub struct ArrayRefMut<'a>(RefMut<'a, Array>);

impl<'a> std::ops::Deref for ArrayRefMut<'a> {
    type Target = Array;
    fn deref(&self) -> &Array {
        &self.0
    }
}

impl<'a> std::ops::DerefMut for ArrayRefMut<'a> {
    fn deref_mut(&mut self) -> &mut Array {
        &mut self.0
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.payload {
            Payload::Bool(b) => write!(f, "Value::Bool({b})"),
            Payload::Int(i) => write!(f, "Value::Int({i})"),
            Payload::Double(d) => write!(f, "Value::Double({})", d.value()),
            Payload::Str(s) => write!(f, "Value::String({s:?})"),
            Payload::Object(o) => write!(f, "Value::Object(len={})", o.borrow().len()),
            Payload::Array(a) => write!(f, "Value::Array(len={})", a.borrow().len()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with_flags(SerializeFlags::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refcount_tracks_clones_and_drops() {
        let v = Value::int(1);
        assert_eq!(v.ref_count(), 1);
        let v2 = v.acquire();
        assert_eq!(v.ref_count(), 2);
        drop(v2);
        assert_eq!(v.ref_count(), 1);
    }

    #[test]
    fn bool_coercions() {
        assert!(Value::int(5).as_bool());
        assert!(!Value::int(0).as_bool());
        assert!(Value::double(0.1).as_bool());
        assert!(!Value::double(0.0).as_bool());
        assert!(Value::string("x").as_bool());
        assert!(!Value::string("").as_bool());
        assert!(!Value::empty_object().as_bool());
    }

    #[test]
    fn int_coercions() {
        assert_eq!(Value::bool(true).as_i64(), 1);
        assert_eq!(Value::double(3.9).as_i64(), 3);
        assert_eq!(Value::double(-3.9).as_i64(), -3);
        assert_eq!(Value::string("42").as_i64(), 42);
        assert_eq!(Value::string("not a number").as_i64(), 0);
        assert_eq!(Value::empty_array().as_i64(), 0);
    }

    #[test]
    fn int32_saturates() {
        assert_eq!(Value::int(i64::MAX).as_i32(), i32::MAX);
        assert_eq!(Value::int(i64::MIN).as_i32(), i32::MIN);
    }

    #[test]
    fn double_coercions() {
        assert_eq!(Value::bool(true).as_f64(), 1.0);
        assert_eq!(Value::int(2).as_f64(), 2.0);
        assert_eq!(Value::string("1.5").as_f64(), 1.5);
        assert_eq!(Value::string("garbage").as_f64(), 0.0);
    }

    #[test]
    fn string_get_on_non_string_uses_to_string() {
        assert_eq!(Value::int(12).as_str(), "12");
        assert_eq!(Value::bool(true).as_str(), "true");
    }

    #[test]
    fn null_value_helpers_use_documented_defaults() {
        assert_eq!(bool_value(None), false);
        assert_eq!(i64_value(None), 0);
        assert_eq!(f64_value(None), 0.0);
        assert_eq!(str_value(None), "");
    }

    #[test]
    fn object_and_array_views_round_trip() {
        let v = Value::empty_object();
        v.as_object_mut().unwrap().insert("a", Value::int(1));
        assert_eq!(v.as_object().unwrap().get("a").unwrap().as_i64(), 1);

        let a = Value::empty_array();
        a.as_array_mut().unwrap().push(Some(Value::int(9)));
        assert_eq!(a.as_array().unwrap().get(0).unwrap().as_i64(), 9);
    }
}
