use pretty_assertions::assert_eq;

use super::{eval, eval_err};
use crate::{Arity, EvalErrorKind, Value};

// === Arithmetic ===

#[test]
fn nested_arithmetic() {
    assert_eq!(eval("+(1, *(2, 2.5))"), Value::Float(6.0));
}

#[test]
fn add_is_float_even_for_integers() {
    assert_eq!(eval("+(2, 3)"), Value::Float(5.0));
}

#[test]
fn add_concatenates_when_first_is_string() {
    assert_eq!(eval(r#"+("n = ", 1, 2.5)"#), Value::from("n = 12.5"));
}

#[test]
fn add_treats_unassigned_as_zero() {
    assert_eq!(eval("+(@(missing), 1)"), Value::Float(1.0));
}

#[test]
fn add_rejects_containers() {
    assert_eq!(
        eval_err("+((1), 2)"),
        EvalErrorKind::InvalidCast {
            from: "array",
            to: "number"
        }
    );
}

#[test]
fn add_needs_two_arguments() {
    assert_eq!(
        eval_err("+(1)"),
        EvalErrorKind::Arity {
            name: "+".to_owned(),
            expected: Arity::AtLeast(2),
            got: 1
        }
    );
}

#[test]
fn subtract_and_negate() {
    assert_eq!(eval("-(10, 2, 3)"), Value::Float(5.0));
    assert_eq!(eval("-(5)"), Value::Float(-5.0));
}

#[test]
fn divide_and_remainder() {
    assert_eq!(eval("/(9, 2)"), Value::Float(4.5));
    assert_eq!(eval("/(1, 0)"), Value::Float(f64::INFINITY));
    assert_eq!(eval("%(7, 3)"), Value::Float(1.0));
}

#[test]
fn numeric_strings_coerce() {
    assert_eq!(eval(r#"*("3", 2)"#), Value::Float(6.0));
}

// === Bitwise ===

#[test]
fn bitwise_folds() {
    assert_eq!(eval("&(12, 10)"), Value::Int(8));
    assert_eq!(eval("|(12, 3)"), Value::Int(15));
    assert_eq!(eval("^(5, 1)"), Value::Int(4));
    assert_eq!(eval("&(7.9, 3)"), Value::Int(3));
}

#[test]
fn not_and_shifts_are_masked_to_53_bits() {
    assert_eq!(eval("~(0)"), Value::Int(9_007_199_254_740_991));
    assert_eq!(eval("<<(1, 4)"), Value::Int(16));
    assert_eq!(eval("<<(1, 53)"), Value::Int(0));
    assert_eq!(eval(">>(-16, 2)"), Value::Int(9_007_199_254_740_988));
}

#[test]
fn shift_takes_exactly_two() {
    assert_eq!(
        eval_err("<<(1, 2, 3)"),
        EvalErrorKind::Arity {
            name: "<<".to_owned(),
            expected: Arity::Exactly(2),
            got: 3
        }
    );
}
