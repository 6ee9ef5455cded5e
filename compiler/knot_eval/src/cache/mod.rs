//! Per-window evaluation results.
//!
//! Each eager call and each closure invocation gets its own frame mapping
//! nodes to the values they produced. A node already present in the top
//! frame is not evaluated again, so a subtree shared between two children
//! of one eager call runs once. Frames are pooled.

use knot_ir::NodeId;
use rustc_hash::FxHashMap;

use crate::value::Value;

type Frame = FxHashMap<NodeId, Value>;

pub struct EvalCache {
    /// Never empty; `frames[0]` is the base frame.
    frames: Vec<Frame>,
    pool: Vec<Frame>,
}

impl EvalCache {
    pub fn new() -> Self {
        EvalCache {
            frames: vec![Frame::default()],
            pool: Vec::new(),
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self) {
        let frame = self.pool.pop().unwrap_or_default();
        self.frames.push(frame);
    }

    /// Discard the top frame. The base frame stays.
    pub fn pop(&mut self) {
        self.truncate(self.frames.len() - 1);
    }

    /// Pop frames until at most `depth` remain (never below one).
    pub fn truncate(&mut self, depth: usize) {
        while self.frames.len() > depth.max(1) {
            if let Some(mut frame) = self.frames.pop() {
                frame.clear();
                self.pool.push(frame);
            }
        }
    }

    fn top(&self) -> &Frame {
        &self.frames[self.frames.len() - 1]
    }

    pub fn get(&self, node: NodeId) -> Option<&Value> {
        self.top().get(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.top().contains_key(&node)
    }

    pub fn insert(&mut self, node: NodeId, value: Value) {
        let last = self.frames.len() - 1;
        self.frames[last].insert(node, value);
    }
}

impl Default for EvalCache {
    fn default() -> Self {
        Self::new()
    }
}
