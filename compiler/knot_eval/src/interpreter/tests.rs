use std::cell::Cell;
use std::rc::Rc;

use knot_ir::{NodeId, Scalar, Tree, TreeError};
use pretty_assertions::assert_eq;

use super::*;
use crate::builtins::eval_args;
use crate::errors::{Arity, EvalErrorKind};

fn installed(tree: Tree, root: NodeId) -> Runner {
    let mut runner = Runner::new(tree, root);
    runner.install_builtins();
    runner
}

// === Leaves and roots ===

#[test]
fn leaf_root_is_its_literal() {
    let mut tree = Tree::new();
    let root = tree.new_node(7_i64);
    assert_eq!(installed(tree, root).run(), Ok(Value::Int(7)));
}

#[test]
fn empty_source_runs_to_unassigned() {
    let mut runner = Runner::from_source("  ; only a comment\n").unwrap();
    assert_eq!(runner.root(), None);
    assert_eq!(runner.run(), Ok(Value::Unassigned));
}

#[test]
fn without_builtins_every_call_is_unbound() {
    let mut runner = Runner::from_source("+(1, 2)").unwrap();
    assert_eq!(runner.run(), Ok(Value::Unassigned));
}

// === Evaluation cache ===

/// `=(n, +(@(n), 1))`
fn increment(tree: &mut Tree) -> NodeId {
    let name = tree.new_node("n");
    let read = tree.new_call("@", &[name]);
    let one = tree.new_node(1_i64);
    let sum = tree.new_call("+", &[read, one]);
    tree.new_call("=", &[name, sum])
}

#[test]
fn shared_subtree_runs_once_per_window() {
    let mut tree = Tree::new();
    let shared = increment(&mut tree);
    let root = tree.new_call("+", &[shared, shared]);
    let mut runner = installed(tree, root);

    assert_eq!(runner.run(), Ok(Value::Float(2.0)));
    assert_eq!(runner.get_global("n"), Some(&Value::Float(1.0)));
}

#[test]
fn distinct_subtrees_each_run() {
    let mut tree = Tree::new();
    let first = increment(&mut tree);
    let second = increment(&mut tree);
    let root = tree.new_call("+", &[first, second]);
    let mut runner = installed(tree, root);

    assert_eq!(runner.run(), Ok(Value::Float(3.0)));
    assert_eq!(runner.get_global("n"), Some(&Value::Float(2.0)));
}

#[test]
fn rerunning_the_root_evaluates_again() {
    let mut tree = Tree::new();
    let root = increment(&mut tree);
    let mut runner = installed(tree, root);
    runner.run().unwrap();
    runner.run().unwrap();
    assert_eq!(runner.get_global("n"), Some(&Value::Float(2.0)));
}

#[test]
fn frames_are_restored_after_errors() {
    let mut runner = Runner::from_source("$(function(bad, (x), +((1), @(x))), +(1, bad(2)))").unwrap();
    runner.install_builtins();
    assert!(runner.run().is_err());
    assert_eq!(runner.cache.depth(), 1);
    assert_eq!(runner.env.depth(), 1);
    assert_eq!(runner.call_depth, 0);
}

#[test]
fn errors_record_closure_backtrace() {
    let source = "$(
        function(inner, (), +((1), 1)),
        function(outer, (), inner(nil)),
        outer(nil)
    )";
    let mut runner = Runner::from_source(source).unwrap();
    runner.install_builtins();
    let err = runner.run().unwrap_err();
    assert_eq!(err.backtrace, vec!["inner".to_owned(), "outer".to_owned()]);
}

// === Depth ===

#[test]
fn deep_eager_nesting_uses_the_work_stack() {
    let mut tree = Tree::new();
    let one = tree.new_node(1_i64);
    let mut node = tree.new_node(0_i64);
    for _ in 0..100_000 {
        node = tree.new_call("+", &[node, one]);
    }
    assert_eq!(installed(tree, node).run(), Ok(Value::Float(100_000.0)));
}

#[test]
fn deep_deferred_nesting_grows_the_stack() {
    let mut tree = Tree::new();
    let mut node = tree.new_node("bottom");
    for _ in 0..20_000 {
        node = tree.new_call("$", &[node]);
    }
    assert_eq!(installed(tree, node).run(), Ok(Value::from("bottom")));
}

// === Host API ===

fn double(runner: &mut Runner, node: NodeId) -> EvalResult {
    let args = eval_args(runner, node, "double", Arity::Exactly(1))?;
    Ok(Value::Float(args[0].to_float()? * 2.0))
}

/// Deferred: evaluates only its first child.
fn first(runner: &mut Runner, node: NodeId) -> EvalResult {
    match runner.children(node).first() {
        Some(&child) => runner.eval(child),
        None => Ok(Value::Unassigned),
    }
}

/// Tries to make the call node its own child.
fn self_loop(runner: &mut Runner, node: NodeId) -> EvalResult {
    runner.tree_mut().add_child(node, node)?;
    Ok(Value::Unassigned)
}

#[test]
fn host_builtins() {
    let mut runner = Runner::from_source("+(double(4), first(1, =(hit, 1)))").unwrap();
    runner.install_builtins();
    runner.register_builtin("double", double, false);
    runner.register_builtin("first", first, true);
    assert_eq!(runner.run(), Ok(Value::Float(9.0)));
    assert_eq!(runner.get_global("hit"), None);
    assert!(runner.builtins().get("double").is_some());
}

#[test]
fn tree_errors_surface_from_builtins() {
    let mut runner = Runner::from_source("loop(1)").unwrap();
    runner.register_builtin("loop", self_loop, false);
    let err = runner.run().unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::Tree(TreeError::Cycle { .. })));
}

#[test]
fn eval_source_keeps_environment() {
    let mut runner = Runner::from_source("").unwrap();
    runner.install_builtins();
    assert_eq!(runner.eval_source("=(x, 2)"), Ok(Value::Int(2)));
    assert_eq!(runner.eval_source("*(@(x), 3)"), Ok(Value::Float(6.0)));
    assert!(matches!(runner.eval_source("+(1"), Err(Error::Syntax(_))));
}

#[test]
fn edits_through_tree_mut_are_seen() {
    let mut tree = Tree::new();
    let one = tree.new_node(1_i64);
    let two = tree.new_node(2_i64);
    let root = tree.new_call("+", &[one, two]);
    let mut runner = installed(tree, root);
    assert_eq!(runner.run(), Ok(Value::Float(3.0)));

    runner.tree_mut().set_tag(root, "*");
    assert_eq!(runner.tree().tag(root), &Scalar::from("*"));
    assert_eq!(runner.run(), Ok(Value::Float(2.0)));
}

#[test]
fn interrupt_stops_evaluation() {
    let stop = Rc::new(Cell::new(false));
    let flag = Rc::clone(&stop);
    let mut runner = Runner::from_source("+(1, 2)").unwrap();
    runner.install_builtins();
    runner.set_interrupt(move || flag.get());
    assert_eq!(runner.run(), Ok(Value::Float(3.0)));

    stop.set(true);
    assert_eq!(runner.run().unwrap_err().kind, EvalErrorKind::Interrupted);

    runner.clear_interrupt();
    assert_eq!(runner.run(), Ok(Value::Float(3.0)));
}
