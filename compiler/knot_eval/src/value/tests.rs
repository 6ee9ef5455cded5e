use super::*;
use crate::errors::EvalErrorKind;
use pretty_assertions::assert_eq;

// === Coercions ===

#[test]
fn test_truthiness() {
    assert!(!Value::Unassigned.is_truthy());
    assert!(!Value::Int(0).is_truthy());
    assert!(Value::Int(-3).is_truthy());
    assert!(!Value::Float(f64::NAN).is_truthy());
    assert!(!Value::Float(0.0).is_truthy());
    assert!(Value::Float(0.5).is_truthy());
    assert!(!Value::from("").is_truthy());
    assert!(!Value::from(" False ").is_truthy());
    assert!(Value::from("TRUE").is_truthy());
    assert!(Value::from("0").is_truthy());
    assert!(Value::array(Vec::new()).is_truthy());
}

#[test]
fn test_to_float() {
    assert_eq!(Value::Unassigned.to_float(), Ok(0.0));
    assert_eq!(Value::Int(7).to_float(), Ok(7.0));
    assert_eq!(Value::from(" 2.5 ").to_float(), Ok(2.5));
    assert!(Value::from("abc").to_float().unwrap().is_nan());
    let err = Value::object().to_float().unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::InvalidCast {
            from: "object",
            to: "number"
        }
    );
}

#[test]
fn test_to_int() {
    assert_eq!(Value::Float(-2.9).to_int(), Ok(-2));
    assert_eq!(Value::from("42").to_int(), Ok(42));
    assert_eq!(Value::from("3.7").to_int(), Ok(3));
    assert!(Value::from("x").to_int().is_err());
}

// === Display ===

#[test]
fn test_display_scalars() {
    assert_eq!(Value::Unassigned.to_string(), "");
    assert_eq!(Value::Float(6.0).to_string(), "6");
    assert_eq!(Value::Float(0.25).to_string(), "0.25");
    assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-Infinity");
    assert_eq!(Value::Float(f64::NAN).to_string(), "NaN");
    assert_eq!(Value::from("plain").to_string(), "plain");
}

#[test]
fn test_display_containers() {
    let array = Value::array(vec![Value::Int(1), Value::from("a"), Value::Unassigned]);
    assert_eq!(array.to_string(), r#"[1, "a", unassigned]"#);

    let object = Value::object();
    object.set_key(&Key::Name("b".into()), Value::Int(2)).unwrap();
    object.set_key(&Key::Name("a".into()), array).unwrap();
    assert_eq!(object.to_string(), r#"{a: [1, "a", unassigned], b: 2}"#);
}

#[test]
fn test_display_self_containing_array() {
    let array = Value::array(Vec::new());
    array.set_key(&Key::Index(0), array.clone()).unwrap();
    assert_eq!(array.to_string(), "[[...]]");
}

// === Equality ===

#[test]
fn test_loose_eq() {
    assert!(Value::Int(1).loose_eq(&Value::Float(1.0)));
    assert!(Value::from("1").loose_eq(&Value::Int(1)));
    assert!(!Value::from("1.0").loose_eq(&Value::from("1")));
    assert!(!Value::Float(f64::NAN).loose_eq(&Value::Float(f64::NAN)));
    assert!(Value::Unassigned.loose_eq(&Value::Unassigned));
    assert!(!Value::Unassigned.loose_eq(&Value::Int(0)));
    assert!(Value::Int(i64::MAX).loose_eq(&Value::Int(i64::MAX)));
    assert!(!Value::Int(i64::MAX).loose_eq(&Value::Int(i64::MAX - 1)));
}

#[test]
fn test_loose_eq_containers_by_identity() {
    let a = Value::array(vec![Value::Int(1)]);
    let b = Value::array(vec![Value::Int(1)]);
    assert!(a.loose_eq(&a.clone()));
    assert!(!a.loose_eq(&b));
    assert_eq!(a, b);
}

// === Keyed access ===

#[test]
fn test_key_from_value() {
    assert_eq!(Key::from_value(&Value::Float(2.9)), Ok(Key::Index(2)));
    assert_eq!(Key::from_value(&Value::from("k")), Ok(Key::Name("k".into())));
    assert!(Key::from_value(&Value::Unassigned).is_err());
}

#[test]
fn test_array_read_grows() {
    let array = Value::array(Vec::new());
    assert_eq!(array.get_key(&Key::Index(2)), Ok(Value::Unassigned));
    assert_eq!(array.count(), 3);
}

#[test]
fn test_negative_index() {
    let array = Value::array(vec![Value::Int(10), Value::Int(20), Value::Int(30)]);
    assert_eq!(array.get_key(&Key::Index(-1)), Ok(Value::Int(30)));
    let err = array.get_key(&Key::Index(-4)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::IndexOutOfBounds { index: -4, len: 3 });
}

#[test]
fn test_object_read_does_not_insert() {
    let object = Value::object();
    assert_eq!(object.get_key(&Key::Name("missing".into())), Ok(Value::Unassigned));
    assert_eq!(object.count(), 0);
}

#[test]
fn test_key_coercion_between_containers() {
    let object = Value::object();
    object.set_key(&Key::Index(3), Value::Int(1)).unwrap();
    assert_eq!(object.get_key(&Key::Name("3".into())), Ok(Value::Int(1)));

    let array = Value::array(Vec::new());
    array.set_key(&Key::Name("1".into()), Value::Int(5)).unwrap();
    assert_eq!(array.get_key(&Key::Index(1)), Ok(Value::Int(5)));
    assert!(array.get_key(&Key::Name("one".into())).is_err());
}

#[test]
fn test_descend_vivifies_by_next_key() {
    let root = Value::object();
    let child = root
        .descend(&Key::Name("list".into()), &Key::Index(0))
        .unwrap();
    assert_eq!(child.type_name(), "array");
    child.set_key(&Key::Index(0), Value::Int(9)).unwrap();
    assert_eq!(root.to_string(), "{list: [9]}");
}

#[test]
fn test_scalar_not_indexable() {
    let err = Value::Int(1).get_key(&Key::Index(0)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::NotIndexable { type_name: "integer" });
}

#[test]
fn test_count_and_contains() {
    let text = Value::from("héllo");
    assert_eq!(text.count(), 5);
    assert!(text.contains(&Value::from("ll")));

    let array = Value::array(vec![Value::Int(2), Value::from("x")]);
    assert!(array.contains(&Value::Float(2.0)));
    assert!(!array.contains(&Value::from("y")));
    assert_eq!(Value::Unassigned.count(), 0);
    assert_eq!(Value::Int(5).count(), 0);
    assert_eq!(Value::Float(1.5).count(), 0);
}

#[test]
fn test_tag_literals() {
    assert_eq!(Value::from_tag(&Scalar::Nil), Value::Unassigned);
    assert_eq!(Value::from_tag(&Scalar::Bool(true)), Value::Int(1));
    assert_eq!(Value::from_tag(&Scalar::from("x")), Value::from("x"));
}
