//! Variable scopes.
//!
//! A stack of frames over a permanent global frame. Lookup checks the
//! innermost frame, then the global one; frames in between are not
//! visible, so a closure sees its own locals and the globals but never
//! its caller's locals. Popped frames are cleared and pooled for reuse.

use rustc_hash::FxHashMap;

use crate::value::Value;

type Frame = FxHashMap<String, Value>;

pub struct Environment {
    /// `frames[0]` is the global frame and is never popped.
    frames: Vec<Frame>,
    pool: Vec<Frame>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            frames: vec![Frame::default()],
            pool: Vec::new(),
        }
    }

    /// Number of frames, global included.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push_frame(&mut self) {
        let frame = self.pool.pop().unwrap_or_default();
        self.frames.push(frame);
    }

    /// Pop the innermost frame. The global frame stays.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            if let Some(mut frame) = self.frames.pop() {
                frame.clear();
                self.pool.push(frame);
            }
        }
    }

    fn innermost(&self) -> &Frame {
        &self.frames[self.frames.len() - 1]
    }

    /// Innermost binding of `name`, falling back to the global frame.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.innermost()
            .get(name)
            .or_else(|| self.frames[0].get(name))
    }

    /// Binding of `name` in the innermost frame only.
    pub fn lookup_local(&self, name: &str) -> Option<&Value> {
        self.innermost().get(name)
    }

    /// Bind `name` in the innermost frame, shadowing any global.
    pub fn define_local(&mut self, name: impl Into<String>, value: Value) {
        let last = self.frames.len() - 1;
        self.frames[last].insert(name.into(), value);
    }

    /// Storage for `name`: the innermost binding if there is one, else the
    /// global binding, else a new `Unassigned` binding in the innermost frame.
    pub fn slot(&mut self, name: &str) -> &mut Value {
        let last = self.frames.len() - 1;
        let index = if self.frames[last].contains_key(name) || !self.frames[0].contains_key(name) {
            last
        } else {
            0
        };
        self.frames[index].entry(name.to_owned()).or_default()
    }

    pub fn get_global(&self, name: &str) -> Option<&Value> {
        self.frames[0].get(name)
    }

    pub fn set_global(&mut self, name: impl Into<String>, value: Value) {
        self.frames[0].insert(name.into(), value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
