use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_arity_display() {
    assert_eq!(Arity::Exactly(1).to_string(), "1 argument");
    assert_eq!(Arity::AtLeast(2).to_string(), "at least 2 arguments");
    assert_eq!(Arity::Between(2, 3).to_string(), "2 to 3 arguments");
    assert_eq!(Arity::Either(1, 3).to_string(), "1 or 3 arguments");
}

#[test]
fn test_arity_accepts() {
    assert!(Arity::Between(2, 3).accepts(3));
    assert!(!Arity::Between(2, 3).accepts(4));
    assert!(Arity::Either(1, 3).accepts(1));
    assert!(!Arity::Either(1, 3).accepts(2));
}

#[test]
fn test_messages() {
    assert_eq!(
        wrong_arity("?", Arity::Between(2, 3), 1).to_string(),
        "`?` expects 2 to 3 arguments, got 1"
    );
    assert_eq!(
        invalid_cast("array", "number").to_string(),
        "invalid cast from array to number"
    );
    assert_eq!(
        not_callable("x", "integer").to_string(),
        "`x` is integer, not a function"
    );
    assert_eq!(
        index_out_of_bounds(-4, 3).to_string(),
        "index -4 out of bounds for length 3"
    );
}

#[test]
fn test_backtrace_and_catchability() {
    let err = not_indexable("float").with_frame("inner").with_frame("outer");
    assert_eq!(err.backtrace, vec!["inner".to_owned(), "outer".to_owned()]);
    assert!(err.is_catchable());
    assert!(!interrupted().is_catchable());
}
