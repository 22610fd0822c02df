use fjson::{to_string, to_string_with_flags, Array, Object, SerializeFlags, Value};

#[test]
fn compact_object_matches_reference_layout() {
    let mut obj = Object::new();
    obj.insert("abc", Value::int(12));
    obj.insert("foo", Value::string("bar"));
    let v = Value::object(obj);

    assert_eq!(to_string(Some(&v)), r#"{ "abc": 12, "foo": "bar" }"#);
    assert_eq!(
        to_string_with_flags(Some(&v), SerializeFlags::empty()),
        r#"{"abc":12,"foo":"bar"}"#
    );
}

#[test]
fn pretty_tab_layout_matches_reference() {
    let mut obj = Object::new();
    obj.insert("abc", Value::int(12));
    obj.insert("foo", Value::string("bar"));
    let v = Value::object(obj);

    let flags = SerializeFlags::PRETTY | SerializeFlags::PRETTY_TAB | SerializeFlags::SPACED;
    assert_eq!(
        to_string_with_flags(Some(&v), flags),
        "{\n\t\"abc\": 12,\n\t\"foo\": \"bar\"\n}"
    );
}

#[test]
fn nested_object_and_array_round_trip() {
    let mut inner = Array::new();
    inner.push(Some(Value::int(1)));
    inner.push(Some(Value::int(2)));
    inner.push(None);

    let mut obj = Object::new();
    obj.insert("items", Value::array(inner));
    obj.insert("active", Value::bool(true));
    obj.insert("ratio", Value::double(1.0));

    let root = Value::object(obj);
    let rendered = to_string_with_flags(Some(&root), SerializeFlags::empty());
    assert_eq!(rendered, r#"{"items":[1,2,null],"active":true,"ratio":1.0}"#);
}

#[test]
fn string_values_are_escaped_in_context() {
    let mut obj = Object::new();
    obj.insert("text", Value::string("line1\nline2\t\"quoted\""));
    let v = Value::object(obj);

    let rendered = to_string_with_flags(Some(&v), SerializeFlags::empty());
    assert_eq!(rendered, r#"{"text":"line1\nline2\t\"quoted\""}"#);
}

#[test]
fn null_root_value_serializes_as_null() {
    assert_eq!(to_string(None), "null");
    assert_eq!(to_string_with_flags(None, SerializeFlags::PRETTY), "null");
}

#[test]
fn double_preserves_source_text_when_parsed_from_string() {
    let d = Value::double_from_string("1.500").unwrap();
    assert_eq!(to_string(Some(&d)), "1.500");
}

#[test]
fn coercions_work_through_the_public_api() {
    let v = Value::string("42");
    assert_eq!(v.as_i64(), 42);
    assert_eq!(v.as_f64(), 42.0);
    assert!(v.as_bool());

    let n = Value::int(0);
    assert!(!n.as_bool());
}

#[test]
fn custom_serializer_round_trips_through_public_api() {
    let v = Value::int(7);
    v.set_serializer(
        |_value, writer, _level, _flags| writer.write_all(b"\"seven\"").map(|_| 7),
        (),
    );
    assert_eq!(to_string(Some(&v)), "\"seven\"");

    v.clear_serializer();
    assert_eq!(to_string(Some(&v)), "7");
}

#[test]
fn object_mutation_through_value_handle_is_visible_after_clone() {
    let v = Value::empty_object();
    let alias = v.clone();
    v.as_object_mut().unwrap().insert("k", Value::int(1));

    assert_eq!(alias.as_object().unwrap().get("k").unwrap().as_i64(), 1);
}
