use pretty_assertions::assert_eq;

use super::{eval, eval_err};
use crate::{EvalErrorKind, Value};

#[test]
fn tochar_reads_code_points() {
    assert_eq!(eval(r#"tochar("abc", 1)"#), Value::Int(98));
    assert_eq!(eval(r#"tochar("abc", -1)"#), Value::Int(99));
    assert_eq!(eval(r#"tochar("é", 0)"#), Value::Int(233));
}

#[test]
fn tochar_out_of_range() {
    assert_eq!(
        eval_err(r#"tochar("abc", 5)"#),
        EvalErrorKind::IndexOutOfBounds { index: 5, len: 3 }
    );
}

#[test]
fn tochars_and_back() {
    assert_eq!(eval(r#"tochars("hi")"#).to_string(), "[104, 105]");
    assert_eq!(eval(r#"fromchars(tochars("round trip"))"#), Value::from("round trip"));
}

#[test]
fn fromchar_builds_strings() {
    assert_eq!(eval("fromchar(104, 105)"), Value::from("hi"));
    assert_eq!(eval("fromchars((72, 105))"), Value::from("Hi"));
}

#[test]
fn invalid_char_codes() {
    assert_eq!(eval_err("fromchar(-1)"), EvalErrorKind::InvalidCharCode { code: -1 });
    assert_eq!(
        eval_err("fromchar(55296)"),
        EvalErrorKind::InvalidCharCode { code: 55296 }
    );
}
