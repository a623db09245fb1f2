//! Tree node representation.

use crate::store::StrRef;

/// Index-based handle to a node within one tree.
///
/// A `NodeId` is only meaningful for the tree that produced it, and only
/// until that tree is recycled or reused for another parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The root slot. Every closed tree has its root at this id.
    pub const ROOT: NodeId = NodeId(0);
}

/// A node's member name.
///
/// Children of arrays carry the `Blank` marker, which is distinct from
/// having no name at all: only the root has no name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Name {
    Blank,
    Str(StrRef),
}

/// Internal tagged payload. `Empty` marks a placeholder that is still being
/// filled by the parser and never survives into a closed tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum NodeKind {
    Empty,
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(StrRef),
    Array { first: Option<NodeId> },
    Object { first: Option<NodeId> },
}

impl NodeKind {
    pub(crate) fn first_child(&self) -> Option<NodeId> {
        match self {
            NodeKind::Array { first } | NodeKind::Object { first } => *first,
            _ => None,
        }
    }

    pub(crate) fn is_container(&self) -> bool {
        matches!(self, NodeKind::Array { .. } | NodeKind::Object { .. })
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Node {
    pub(crate) name: Option<Name>,
    pub(crate) kind: NodeKind,
    pub(crate) next: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    /// A fresh placeholder, the state every node starts in.
    pub(crate) fn empty(parent: Option<NodeId>) -> Self {
        Self {
            name: None,
            kind: NodeKind::Empty,
            next: None,
            parent,
        }
    }

    pub(crate) fn set_first_child(&mut self, child: Option<NodeId>) {
        match &mut self.kind {
            NodeKind::Array { first } | NodeKind::Object { first } => *first = child,
            _ => {}
        }
    }
}

/// A resolved view of one node's value.
///
/// Returned by [`JsonTree::value`]; string payloads borrow from the tree's
/// string store.
///
/// [`JsonTree::value`]: crate::JsonTree::value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeValue<'a> {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(&'a str),
    /// An array; its elements are reached through [`JsonTree::children`].
    ///
    /// [`JsonTree::children`]: crate::JsonTree::children
    Array,
    /// An object; its members are reached through [`JsonTree::children`].
    ///
    /// [`JsonTree::children`]: crate::JsonTree::children
    Object,
}
