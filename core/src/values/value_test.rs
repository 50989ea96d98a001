use super::*;
use crate::memory::{Memory, SimpleObjectMemory};
use crate::test_utils::{call, eval, p};
use pretty_assertions::assert_eq;

#[test]
fn test_number_from_f64_keeps_integers_exact() {
    assert_eq!(Value::number_from_f64(4.0), Value::Integer(4));
    assert_eq!(Value::number_from_f64(2.5), Value::Float(2.5));
    assert_eq!(Value::number_from_f64(f64::NAN).is_number(), true);
}

#[test]
fn test_truthiness() {
    assert!(Value::Bool(true).is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    assert!(!Value::Null.is_truthy());
    assert!(Value::Integer(0).is_truthy());
    assert!(Value::text("").is_truthy());
}

#[test]
fn test_loose_eq_crosses_numeric_variants() {
    assert!(Value::Integer(1).loose_eq(&Value::Float(1.0)));
    assert!(!Value::Integer(1).loose_eq(&Value::text("1")));
    let a = Value::map([("x", Value::Integer(1)), ("y", Value::Integer(2))]);
    let b = Value::map([("y", Value::Float(2.0)), ("x", Value::Integer(1))]);
    assert!(a.loose_eq(&b));
}

#[test]
fn test_compare_rejects_mixed_kinds() {
    assert_eq!(
        Value::Integer(1).compare(&Value::Float(1.5)),
        Some(core::cmp::Ordering::Less)
    );
    assert_eq!(Value::text("a").compare(&Value::Integer(1)), None);
}

#[test]
fn test_display_matches_invariant_rendering() {
    assert_eq!(Value::Float(1.0).to_string(), "1");
    assert_eq!(Value::Float(2.5).to_string(), "2.5");
    assert_eq!(Value::Null.to_string(), "");
    assert_eq!(
        Value::list([Value::Integer(1), Value::text("a")]).to_string(),
        r#"[1,"a"]"#
    );
}

#[test]
fn test_json_roundtrip_preserves_declared_order() {
    let value = Value::parse_json(r#"{"zeta": 1, "alpha": [true, null, 2.5]}"#).unwrap();
    let keys: Vec<&str> = value.as_map().unwrap().keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
    assert_eq!(value.to_json_string(), r#"{"zeta":1,"alpha":[true,null,2.5]}"#);
}

#[test]
fn test_json_float_keeps_fraction_marker() {
    assert_eq!(Value::Float(1.0).to_json_string(), "1.0");
    assert_eq!(Value::Float(f64::INFINITY).to_json_string(), "null");
}

#[test]
fn test_object_map_case_insensitive_fallback() {
    let mut map = ObjectMap::new();
    map.insert("Name", Value::text("bag"));
    assert_eq!(map.get("name"), Some(&Value::text("bag")));
    assert_eq!(map.get_exact("name"), None);

    map.insert("Name", Value::text("other"));
    assert_eq!(map.len(), 1);
    assert_eq!(map.remove("name"), Some(Value::text("other")));
    assert!(map.is_empty());
}

#[test]
fn test_object_map_keeps_keys_differing_by_case() {
    let map: ObjectMap = [
        ("a".to_string(), Value::Integer(1)),
        ("A".to_string(), Value::Integer(2)),
    ]
    .into_iter()
    .collect();
    assert_eq!(map.len(), 2);
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "A"]);
    assert_eq!(map.get("a"), Some(&Value::Integer(1)));
    assert_eq!(map.get("A"), Some(&Value::Integer(2)));

    let json = Value::from(serde_json::json!({ "a": 1, "A": 2 }));
    assert_eq!(json.as_map().map(ObjectMap::len), Some(2));
    assert_eq!(json.to_json_string(), r#"{"a":1,"A":2}"#);

    let memory = SimpleObjectMemory::from_json(serde_json::json!({ "bag": { "a": 1, "A": 2 } }));
    assert_eq!(eval(&call!("count", p("bag")), &memory), Ok(Value::Integer(2)));
    assert_eq!(memory.get("bag.A"), Some(Value::Integer(2)));
}
