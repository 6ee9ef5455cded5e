//! Knot IR - the node tree shared by the codec and the evaluator.
//!
//! Every program and every data literal is a tree of tagged nodes:
//! - [`Scalar`] is the tag attached to a node
//! - [`NodeId`] addresses a node inside a [`Tree`] arena
//! - [`Tree`] owns the nodes and enforces that no node contains itself
//!
//! # Design Philosophy
//!
//! - **Flat storage**: nodes live in one `Vec`, children are `NodeId` lists
//! - **Identity by slot**: two `NodeId`s are the same node iff they are equal
//! - **Sharing allowed, cycles rejected**: a node may have many parents,
//!   but may never be reachable from itself

mod node_id;
mod scalar;
mod tree;

pub use node_id::NodeId;
pub use scalar::Scalar;
pub use tree::{Tree, TreeError};
