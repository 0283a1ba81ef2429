//! hone DOM - arena-based document tree
//!
//! The document model the selector engine runs against: nodes, elements,
//! attributes, shadow roots, and scoped selector matching. Selector
//! synthesis only ever reads the tree; mutation happens while a document
//! is being built.

mod document;
mod node;
mod query;
mod tree;

pub use document::Document;
pub use node::{Attribute, ElementData, Node, NodeData, ShadowMode};
pub use query::{
    AttributeMatcher, AttributeSelector, Combinator, Component, Compound, NthExpr, Selector,
    SelectorError,
};
pub use tree::{Children, DomTree};

/// Node identifier (index into the arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Document node of a tree built through [`Document`]
    pub const ROOT: NodeId = NodeId(0);

    /// Check that this id refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }
}
