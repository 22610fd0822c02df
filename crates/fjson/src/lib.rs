//! A compact JSON value model with reference-counted lifetime,
//! small-string-optimized storage, and a pluggable per-value serializer.
//!
//! The crate is organized leaf-first, mirroring the component breakdown it
//! was designed against:
//!
//! - [`string`] — small-string storage and the byte-classified escape engine.
//! - [`number`] — integer and double formatting.
//! - [`object`] — the insertion-ordered object key iterator.
//! - [`array`] — the sparse-fillable array model.
//! - [`value`] — the tagged-union value model, its `Arc`-based lifetime, and
//!   the cross-kind coercions.
//! - [`serialize`] — serializer dispatch (with user override) and the
//!   pretty/spaced/compact layout engine.
//!
//! `null` has no dedicated [`Value`] variant: it is the absence of a value,
//! represented as `Option<Value>`/`Option<&Value>` throughout this crate's
//! public API. See `value`'s module docs for the full rationale.

pub mod array;
pub mod error;
pub mod flags;
pub mod number;
pub mod object;
pub mod serialize;
pub mod string;
pub mod value;

pub use array::Array;
pub use error::{Error, Result};
pub use flags::SerializeFlags;
pub use number::DoubleValue;
pub use object::Object;
pub use serialize::{to_string, to_string_with_flags, to_writer};
pub use value::{bool_value, f64_value, i32_value, i64_value, str_value, Kind, Value};

/// This crate's version, as the single version surface (see spec.md §9 on
/// the C original's two overlapping, differently-named version macros —
/// Cargo already owns this for a Rust crate, so there is exactly one).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn public_api_smoke_test() {
        let mut obj = Object::new();
        obj.insert("name", Value::string("fjson"));
        obj.insert("ok", Value::bool(true));

        let mut arr = Array::new();
        arr.push(Some(Value::int(1)));
        arr.push(Some(Value::int(2)));
        obj.insert("values", Value::array(arr));

        let root = Value::object(obj);
        assert_eq!(
            to_string(Some(&root)),
            r#"{ "name": "fjson", "ok": true, "values": [ 1, 2 ] }"#
        );
    }
}
