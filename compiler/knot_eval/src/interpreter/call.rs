//! Closure invocation.

use knot_ir::NodeId;
use knot_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use super::{FrameKind, Runner};
use crate::errors::{recursion_limit, EvalResult};
use crate::value::{Closure, Value};

impl Runner {
    /// Call `closure` with the children of `call` as arguments.
    ///
    /// Parameter names and arguments are evaluated in the caller's frame.
    /// Missing arguments bind `Unassigned`; surplus arguments are not
    /// evaluated. Errors leaving the body record the callee's name.
    pub(super) fn call_closure(&mut self, closure: &Closure, call: NodeId) -> EvalResult {
        let name = self.callee_name(call);
        if self.call_depth >= self.config.max_call_depth {
            return Err(recursion_limit(self.config.max_call_depth).with_frame(name));
        }

        let params = self.param_names(closure.params)?;
        let args = self.children(call);
        let mut values: SmallVec<[Value; 4]> = SmallVec::with_capacity(params.len());
        for index in 0..params.len() {
            values.push(match args.get(index) {
                Some(&arg) => self.eval(arg)?,
                None => Value::Unassigned,
            });
        }

        tracing::trace!(closure = %name, args = values.len(), depth = self.call_depth, "call");
        let body = closure.body;
        self.with_frame(FrameKind::Call, |scoped| {
            for (param, value) in params.into_iter().zip(values) {
                scoped.env.define_local(param, value);
            }
            ensure_sufficient_stack(|| scoped.eval(body))
        })
        .map_err(|err| err.with_frame(name))
    }

    /// A parameter list is either a call whose children name the
    /// parameters, or a single leaf naming one. A `nil` leaf is no
    /// parameters.
    fn param_names(&mut self, params: NodeId) -> Result<SmallVec<[String; 4]>, crate::EvalError> {
        if self.tree.is_leaf(params) {
            let tag = self.tree.tag(params);
            return Ok(if tag.is_nil() {
                SmallVec::new()
            } else {
                SmallVec::from_iter([tag.callee_name().into_owned()])
            });
        }
        let mut names = SmallVec::new();
        for child in self.children(params) {
            names.push(self.eval(child)?.to_string());
        }
        Ok(names)
    }
}
