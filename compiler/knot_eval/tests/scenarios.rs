//! End-to-end scenarios through the public embedding API.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use knot_eval::{EvalErrorKind, Runner, Value};
use knot_ir::{Tree, TreeError};
use knot_syntax::{parse, render};
use pretty_assertions::assert_eq;

fn eval(source: &str) -> Value {
    let mut runner = Runner::from_source(source).expect("source parses");
    runner.install_builtins();
    runner.run().unwrap_or_else(|e| panic!("{e}: {source}"))
}

// === Scenarios ===

#[test]
fn arithmetic_accumulates_as_float() {
    assert_eq!(eval("+(1,2,3)"), Value::Float(6.0));
}

#[test]
fn conditional() {
    assert_eq!(eval(r#"?(1,"yes","no")"#), Value::from("yes"));
    assert_eq!(eval(r#"?(0,"yes","no")"#), Value::from("no"));
}

#[test]
fn closure_call() {
    assert_eq!(eval("$( function(f,(x),+(@(x),1)), f(41) )"), Value::Float(42.0));
}

#[test]
fn auto_vivification() {
    let mut runner = Runner::from_source(r#"$( =(obj,"a",1), @(obj,"a") )"#).unwrap();
    runner.install_builtins();
    assert_eq!(runner.run(), Ok(Value::Int(1)));

    let obj = runner.get_global("obj").unwrap();
    assert_eq!(obj.type_name(), "object");
    assert_eq!(obj.count(), 1);
}

#[test]
fn string_escaping_round_trip() {
    let original = "she said \"hi\"\nthen left";
    let mut tree = Tree::new();
    let leaf = tree.new_node(original);
    let text = render(&tree, leaf);
    assert!(text.starts_with('"') && !text.contains('\n'), "{text}");

    let parsed = parse(&text).unwrap().unwrap();
    assert_eq!(eval(&text), Value::from(original));
    assert_eq!(
        Value::from_tag(parsed.tree.tag(parsed.root)),
        Value::from(original)
    );
}

// === Properties ===

#[test]
fn numeric_grammar() {
    assert_eq!(eval("0x1F"), Value::Int(31));
    assert_eq!(eval("017"), Value::Int(15));
    assert_eq!(eval("-3.5e2"), Value::Float(-350.0));
    assert_eq!(eval("infinity"), Value::Float(f64::INFINITY));
    assert_eq!(eval("==(nan, nan)"), Value::Int(0));
}

#[test]
fn cycle_prevention() {
    let mut tree = Tree::new();
    let a = tree.new_node("a");
    let b = tree.new_node("b");
    let leaf = tree.new_node(1_i64);
    tree.add_child(b, leaf).unwrap();
    tree.add_child(a, b).unwrap();

    assert!(matches!(tree.add_child(b, a), Err(TreeError::Cycle { .. })));
    assert_eq!(tree.children(b), &[leaf]);
}

#[test]
fn shared_subtree_is_evaluated_once_per_window() {
    let source = "$( =(n, 0), +(@(n), @(n)) )";
    assert_eq!(eval(source), Value::Float(0.0));

    let mut tree = Tree::new();
    let name = tree.new_node("calls");
    let read = tree.new_call("@", &[name]);
    let one = tree.new_node(1_i64);
    let bump = tree.new_call("+", &[read, one]);
    let step = tree.new_call("=", &[name, bump]);
    let root = tree.new_call("+", &[step, step, step]);

    let mut runner = Runner::new(tree, root);
    runner.install_builtins();
    assert_eq!(runner.run(), Ok(Value::Float(3.0)));
    assert_eq!(runner.get_global("calls"), Some(&Value::Float(1.0)));
}

#[test]
fn errors_surface_to_the_host() {
    let mut runner = Runner::from_source("$( =(x, 1.5), @(x, 0) )").unwrap();
    runner.install_builtins();
    let err = runner.run().unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::NotIndexable { type_name: "float" });
    assert_eq!(err.to_string(), "cannot index into float");
}
