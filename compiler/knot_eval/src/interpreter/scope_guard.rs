//! RAII frame guard for the runner.
//!
//! [`ScopedRunner`] pushes a scope frame and a cache frame when created and
//! pops both when dropped, on every exit path including `?` and unwinding.
//! It derefs to [`Runner`], so code inside the frame uses the runner as
//! usual:
//!
//! ```text
//! runner.with_frame(FrameKind::Call, |scoped| {
//!     scoped.env_mut().define_local("x", value);
//!     scoped.eval(body)
//! })
//! ```

use std::ops::{Deref, DerefMut};

use super::Runner;

/// Why a frame was pushed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FrameKind {
    /// A closure invocation; counts toward the call depth.
    Call,
    /// A `try` handler.
    Handler,
}

pub(crate) struct ScopedRunner<'guard> {
    runner: &'guard mut Runner,
    kind: FrameKind,
}

impl Drop for ScopedRunner<'_> {
    fn drop(&mut self) {
        self.runner.env.pop_frame();
        self.runner.cache.pop();
        if self.kind == FrameKind::Call {
            self.runner.call_depth -= 1;
        }
    }
}

impl Deref for ScopedRunner<'_> {
    type Target = Runner;

    fn deref(&self) -> &Self::Target {
        self.runner
    }
}

impl DerefMut for ScopedRunner<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.runner
    }
}

impl Runner {
    pub(crate) fn scoped(&mut self, kind: FrameKind) -> ScopedRunner<'_> {
        self.env.push_frame();
        self.cache.push();
        if kind == FrameKind::Call {
            self.call_depth += 1;
        }
        ScopedRunner { runner: self, kind }
    }
}
