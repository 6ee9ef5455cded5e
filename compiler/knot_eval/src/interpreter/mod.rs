//! The runner: owns a tree, its scopes and builtins, and evaluates nodes.
//!
//! # Evaluation
//!
//! A leaf evaluates to its literal tag. A call node's tag names its callee,
//! looked up like any variable:
//!
//! - eager builtin: every child is evaluated first, then the builtin runs
//!   and reads the children's values from the current cache frame
//! - deferred builtin: runs immediately and evaluates children on demand
//! - closure: arguments are evaluated, then the body runs in a new frame
//! - unbound or `Unassigned` name: `Unassigned`, children untouched
//! - any other value: `NotCallable`
//!
//! Nested eager calls are driven by an explicit work-stack rather than
//! native recursion, each with its own cache frame. Deferred builtins and
//! closures re-enter [`Runner::eval`] and grow the native stack on demand.

mod call;
mod scope_guard;

use std::rc::Rc;

use knot_ir::{NodeId, Tree};
use knot_stack::ensure_sufficient_stack;
use knot_syntax::{parse, parse_into, SyntaxError};
use smallvec::SmallVec;

use crate::builtins::BuiltinRegistry;
use crate::cache::EvalCache;
use crate::config::RunnerConfig;
use crate::environment::Environment;
use crate::errors::{interrupted, not_callable, Error, EvalError, EvalResult};
use crate::value::{Builtin, BuiltinFn, Closure, Value};

pub(crate) use scope_guard::FrameKind;

/// Polled between node visits; returning `true` aborts evaluation.
pub type InterruptHook = Box<dyn FnMut() -> bool>;

pub struct Runner {
    tree: Tree,
    root: Option<NodeId>,
    env: Environment,
    cache: EvalCache,
    builtins: BuiltinRegistry,
    config: RunnerConfig,
    /// Closure invocations currently on the native stack.
    call_depth: usize,
    interrupt: Option<InterruptHook>,
}

/// What a call node's tag resolves to.
enum Callee {
    Eager(Builtin),
    Deferred(Builtin),
    Closure(Rc<Closure>),
    Unbound,
    NotCallable(&'static str),
}

/// An eager call on the work-stack, waiting for child `next`.
#[derive(Copy, Clone)]
struct Visit {
    node: NodeId,
    next: usize,
    builtin: Builtin,
}

impl Runner {
    /// A runner for `tree`, evaluating from `root`. Builtins are not bound
    /// until [`Runner::install_builtins`] is called.
    pub fn new(tree: Tree, root: NodeId) -> Self {
        Self::with_root(tree, Some(root))
    }

    /// Parse `source` into a new runner. Empty source has no root and runs
    /// to `Unassigned`.
    pub fn from_source(source: &str) -> Result<Self, SyntaxError> {
        Ok(match parse(source)? {
            Some(parsed) => Self::with_root(parsed.tree, Some(parsed.root)),
            None => Self::with_root(Tree::new(), None),
        })
    }

    fn with_root(tree: Tree, root: Option<NodeId>) -> Self {
        Runner {
            tree,
            root,
            env: Environment::new(),
            cache: EvalCache::new(),
            builtins: BuiltinRegistry::standard(),
            config: RunnerConfig::default(),
            call_depth: 0,
            interrupt: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    // Accessors

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn get_global(&self, name: &str) -> Option<&Value> {
        self.env.get_global(name)
    }

    pub fn set_global(&mut self, name: impl Into<String>, value: Value) {
        self.env.set_global(name, value);
    }

    pub fn set_interrupt(&mut self, hook: impl FnMut() -> bool + 'static) {
        self.interrupt = Some(Box::new(hook));
    }

    pub fn clear_interrupt(&mut self) {
        self.interrupt = None;
    }

    // Builtins

    /// Bind every registered builtin in the global frame.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn install_builtins(&mut self) {
        for builtin in self.builtins.iter() {
            self.env.set_global(builtin.name, Value::Builtin(*builtin));
        }
        tracing::debug!(count = self.builtins.len(), "builtins installed");
    }

    /// Register a host builtin and bind it globally, replacing any builtin
    /// of the same name.
    pub fn register_builtin(&mut self, name: &'static str, func: BuiltinFn, defers: bool) {
        let builtin = self.builtins.register(name, func, defers);
        self.env.set_global(name, Value::Builtin(builtin));
    }

    // Evaluation

    /// Evaluate the root node.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self) -> EvalResult {
        match self.root {
            Some(root) => self.eval(root),
            None => Ok(Value::Unassigned),
        }
    }

    /// Parse `source` into this runner's tree and evaluate it in the current
    /// environment. Bindings from earlier runs stay visible.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn eval_source(&mut self, source: &str) -> Result<Value, Error> {
        match parse_into(&mut self.tree, source)? {
            Some(node) => Ok(self.eval(node)?),
            None => Ok(Value::Unassigned),
        }
    }

    /// Evaluate `node`.
    ///
    /// A node already evaluated in the current cache frame yields its
    /// cached value. On error, cache frames pushed by this call are dropped.
    pub fn eval(&mut self, node: NodeId) -> EvalResult {
        if self.tree.is_leaf(node) {
            return Ok(Value::from_tag(self.tree.tag(node)));
        }
        if let Some(value) = self.cache.get(node) {
            return Ok(value.clone());
        }
        let base = self.cache.depth();
        let result = self.check_interrupt().and_then(|()| {
            let callee = self.resolve_callee(node);
            self.invoke(callee, node)
        });
        if result.is_err() {
            self.cache.truncate(base);
        }
        result
    }

    fn invoke(&mut self, callee: Callee, node: NodeId) -> EvalResult {
        match callee {
            Callee::Eager(builtin) => self.walk(node, builtin),
            Callee::Deferred(builtin) => ensure_sufficient_stack(|| (builtin.func)(self, node)),
            Callee::Closure(closure) => self.call_closure(&closure, node),
            Callee::Unbound => Ok(Value::Unassigned),
            Callee::NotCallable(type_name) => {
                Err(not_callable(&self.callee_name(node), type_name))
            }
        }
    }

    /// Evaluate an eager call and every eager call beneath it on one
    /// work-stack. Other children are invoked as they are reached and their
    /// values cached in the frame of the eager call that owns them.
    fn walk(&mut self, root: NodeId, builtin: Builtin) -> EvalResult {
        let mut stack: SmallVec<[Visit; 16]> = SmallVec::new();
        stack.push(Visit {
            node: root,
            next: 0,
            builtin,
        });
        self.cache.push();

        while let Some(visit) = stack.last().copied() {
            if let Some(child) = self.tree.child(visit.node, visit.next) {
                if let Some(top) = stack.last_mut() {
                    top.next += 1;
                }
                if self.tree.is_leaf(child) || self.cache.contains(child) {
                    continue;
                }
                self.check_interrupt()?;
                match self.resolve_callee(child) {
                    Callee::Eager(builtin) => {
                        self.cache.push();
                        stack.push(Visit {
                            node: child,
                            next: 0,
                            builtin,
                        });
                    }
                    other => {
                        let value = self.invoke(other, child)?;
                        self.cache.insert(child, value);
                    }
                }
                continue;
            }

            // Every child is in the top frame: apply, then hand the value
            // to the enclosing frame.
            stack.pop();
            let value = (visit.builtin.func)(self, visit.node)?;
            self.cache.pop();
            if stack.is_empty() {
                return Ok(value);
            }
            self.cache.insert(visit.node, value);
        }
        Ok(Value::Unassigned)
    }

    fn resolve_callee(&self, node: NodeId) -> Callee {
        let name = self.tree.tag(node).callee_name();
        match self.env.lookup(&name) {
            Some(Value::Builtin(builtin)) if builtin.defers => Callee::Deferred(*builtin),
            Some(Value::Builtin(builtin)) => Callee::Eager(*builtin),
            Some(Value::Closure(closure)) => Callee::Closure(Rc::clone(closure)),
            None | Some(Value::Unassigned) => Callee::Unbound,
            Some(other) => Callee::NotCallable(other.type_name()),
        }
    }

    // Helpers for builtins

    /// The children of `node`, copied out of the tree.
    pub fn children(&self, node: NodeId) -> SmallVec<[NodeId; 4]> {
        SmallVec::from_slice(self.tree.children(node))
    }

    /// The name `node` is called by.
    pub fn callee_name(&self, node: NodeId) -> String {
        self.tree.tag(node).callee_name().into_owned()
    }

    /// Whether `node`'s tag currently resolves to the builtin `name`.
    pub fn calls_builtin(&self, node: NodeId, name: &str) -> bool {
        let callee = self.tree.tag(node).callee_name();
        matches!(self.env.lookup(&callee), Some(Value::Builtin(b)) if b.name == name)
    }

    pub(crate) fn check_interrupt(&mut self) -> Result<(), EvalError> {
        if let Some(hook) = self.interrupt.as_mut() {
            if hook() {
                return Err(interrupted());
            }
        }
        Ok(())
    }

    /// Run `f` in a fresh scope frame and cache frame, popped on exit.
    pub(crate) fn with_frame<T>(
        &mut self,
        kind: FrameKind,
        f: impl FnOnce(&mut scope_guard::ScopedRunner<'_>) -> T,
    ) -> T {
        let mut scoped = self.scoped(kind);
        f(&mut scoped)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
