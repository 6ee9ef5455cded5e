//! Tree serializer.
//!
//! Pre-order, iterative over an explicit stack of `(node, next_child)`
//! frames. The indented form puts one node per line with two spaces per
//! depth; the compact form writes everything on one line.

use knot_ir::{NodeId, Scalar, Tree};

use crate::escape::{needs_quotes, write_quoted};

/// Render `root` with one node per line.
pub fn render(tree: &Tree, root: NodeId) -> String {
    Renderer::new(tree, true).run(root)
}

/// Render `root` on a single line, e.g. `+(1,2)`.
pub fn render_compact(tree: &Tree, root: NodeId) -> String {
    Renderer::new(tree, false).run(root)
}

struct Renderer<'t> {
    tree: &'t Tree,
    out: String,
    pretty: bool,
}

impl<'t> Renderer<'t> {
    fn new(tree: &'t Tree, pretty: bool) -> Self {
        Renderer {
            tree,
            out: String::new(),
            pretty,
        }
    }

    fn run(mut self, root: NodeId) -> String {
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        self.open(root, &mut stack);

        while let Some(&(node, next)) = stack.last() {
            let depth = stack.len();
            if let Some(child) = self.tree.child(node, next) {
                if next > 0 {
                    self.out.push(',');
                }
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                self.line_break(depth);
                self.open(child, &mut stack);
            } else {
                stack.pop();
                self.line_break(depth - 1);
                self.out.push(')');
            }
        }
        self.out
    }

    /// Write the node's tag, and `(` if it has children.
    fn open(&mut self, node: NodeId, stack: &mut Vec<(NodeId, usize)>) {
        let tree = self.tree;
        let leaf = tree.is_leaf(node);
        self.write_tag(tree.tag(node), leaf);
        if !leaf {
            self.out.push('(');
            stack.push((node, 0));
        }
    }

    fn line_break(&mut self, depth: usize) {
        if self.pretty {
            self.out.push('\n');
            for _ in 0..depth {
                self.out.push_str("  ");
            }
        }
    }

    fn write_tag(&mut self, tag: &Scalar, leaf: bool) {
        match tag {
            // A nameless call renders as a bare `(...)`.
            Scalar::Nil if leaf => self.out.push_str("nil"),
            Scalar::Nil => {}
            Scalar::Bool(true) => self.out.push_str("true"),
            Scalar::Bool(false) => self.out.push_str("false"),
            Scalar::Int(n) => self.out.push_str(&n.to_string()),
            Scalar::Float(x) => self.out.push_str(&format_float(*x)),
            Scalar::Str(s) if needs_quotes(s) => write_quoted(&mut self.out, s),
            Scalar::Str(s) => self.out.push_str(s),
        }
    }
}

/// Float text that re-parses as a float: always a fraction or exponent.
fn format_float(x: f64) -> String {
    if x.is_nan() {
        "nan".to_owned()
    } else if x.is_infinite() {
        if x > 0.0 { "infinity" } else { "-infinity" }.to_owned()
    } else {
        format!("{x:?}")
    }
}
