//! The tree handle: lifecycle, navigation and name search.

use crate::arena::NodeArena;
use crate::error::{Error, SequenceError};
use crate::names::NameTable;
use crate::node::{Name, NodeId, NodeKind, NodeValue};
use crate::options::TreeOptions;
use crate::parser::OpenState;
use crate::store::{StrRef, StringStore};

/// Lifecycle of a tree between recycles.
#[derive(Debug)]
pub(crate) enum TreeState {
    /// Fresh or recycled; no parse begun.
    Idle,
    /// Mid-parse; more input expected.
    Open(OpenState),
    /// A complete document is in the tree and can be queried.
    Closed,
    /// A parse failed; the error is latched until recycle.
    Errored,
    /// Storage was torn down after an out-of-memory failure. Terminal.
    Dead,
}

/// A parsed JSON document, with storage that survives recycling.
///
/// A `JsonTree` owns three growable pools: a node arena, a string store and
/// (optionally) a name-interning table. [`recycle`](Self::recycle) empties
/// all three without returning a byte to the allocator, so a tree that has
/// seen its largest document never allocates again.
///
/// Feed input with [`parse`](Self::parse), in as many chunks as the source
/// dictates. Once parsing reports [`ParseStatus::Done`], navigate from
/// [`root`](Self::root) or resolve paths with [`path_refer`](Self::path_refer).
///
/// [`ParseStatus::Done`]: crate::ParseStatus::Done
#[derive(Debug)]
pub struct JsonTree {
    pub(crate) arena: NodeArena,
    pub(crate) store: StringStore,
    pub(crate) names: Option<NameTable>,
    pub(crate) state: TreeState,
    pub(crate) last_error: Option<SequenceError>,
    pub(crate) options: TreeOptions,
}

impl JsonTree {
    #[must_use]
    pub fn new(options: TreeOptions) -> Self {
        Self {
            arena: NodeArena::new(options.node_block_nodes, options.max_nodes),
            store: StringStore::new(options.store_block_bytes, options.max_store_bytes),
            names: options.intern_names.then(NameTable::new),
            state: TreeState::Idle,
            last_error: None,
            options,
        }
    }

    /// Empties the tree for the next parse, keeping every allocation.
    ///
    /// Any [`NodeId`] or string borrowed from this tree before the recycle
    /// refers to recycled storage afterwards and must not be reused.
    pub fn recycle(&mut self) -> Result<(), Error> {
        if matches!(self.state, TreeState::Dead) {
            return Err(Error::InvalidTree);
        }
        self.arena.reset();
        self.store.clear();
        if let Some(names) = &mut self.names {
            names.reset();
        }
        self.state = TreeState::Idle;
        self.last_error = None;
        Ok(())
    }

    /// `true` once a complete document has been parsed and not yet recycled.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.state, TreeState::Closed)
    }

    /// The grammar error latched by a failed parse, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<SequenceError> {
        self.last_error
    }

    /// The root node of a closed tree.
    pub fn root(&self) -> Result<NodeId, Error> {
        self.check_closed()?;
        Ok(NodeId::ROOT)
    }

    pub(crate) fn check_closed(&self) -> Result<(), Error> {
        match self.state {
            TreeState::Closed => Ok(()),
            TreeState::Dead => Err(Error::InvalidTree),
            _ => Err(Error::TreeOpen),
        }
    }

    pub(crate) fn str_of(&self, r: StrRef) -> &str {
        self.store.get(r)
    }

    /// The value held at `id`.
    ///
    /// The id must come from this tree's current document; ids kept across a
    /// recycle index into reused storage and return garbage or panic.
    #[must_use]
    pub fn value(&self, id: NodeId) -> NodeValue<'_> {
        match self.arena.get(id).kind {
            // Placeholders never survive into a closed tree.
            NodeKind::Empty | NodeKind::Null => NodeValue::Null,
            NodeKind::Bool(b) => NodeValue::Bool(b),
            NodeKind::Integer(n) => NodeValue::Integer(n),
            NodeKind::Float(x) => NodeValue::Float(x),
            NodeKind::String(r) => NodeValue::String(self.store.get(r)),
            NodeKind::Array { .. } => NodeValue::Array,
            NodeKind::Object { .. } => NodeValue::Object,
        }
    }

    /// The member name of `id`, if it has one.
    ///
    /// Array elements report `Some("")`; only the root reports `None`.
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match self.arena.get(id).name {
            None => None,
            Some(Name::Blank) => Some(""),
            Some(Name::Str(r)) => Some(self.store.get(r)),
        }
    }

    /// The canonical handle of `id`'s name.
    ///
    /// With interning enabled, two members have equal names exactly when
    /// their handles are equal. Array elements report [`StrRef::EMPTY`].
    #[must_use]
    pub fn name_handle(&self, id: NodeId) -> Option<StrRef> {
        match self.arena.get(id).name {
            None => None,
            Some(Name::Blank) => Some(StrRef::EMPTY),
            Some(Name::Str(r)) => Some(r),
        }
    }

    #[must_use]
    pub fn as_str(&self, id: NodeId) -> Option<&str> {
        match self.arena.get(id).kind {
            NodeKind::String(r) => Some(self.store.get(r)),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self, id: NodeId) -> Option<i64> {
        match self.arena.get(id).kind {
            NodeKind::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// Numeric value as a double, promoting integers.
    #[must_use]
    pub fn as_f64(&self, id: NodeId) -> Option<f64> {
        match self.arena.get(id).kind {
            NodeKind::Float(x) => Some(x),
            #[allow(clippy::cast_precision_loss)]
            NodeKind::Integer(n) => Some(n as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self, id: NodeId) -> Option<bool> {
        match self.arena.get(id).kind {
            NodeKind::Bool(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_container(&self, id: NodeId) -> bool {
        self.arena.get(id).kind.is_container()
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).parent
    }

    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).next
    }

    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).kind.first_child()
    }

    /// Iterates the direct children of `id`, in document order.
    ///
    /// Empty for scalars and for empty containers.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Iterates every node of a closed tree in document order, root first.
    pub fn nodes(&self) -> Result<Nodes<'_>, Error> {
        self.check_closed()?;
        Ok(Nodes {
            tree: self,
            next: Some(NodeId::ROOT),
        })
    }

    /// One step of document-order traversal, never escaping `bound`.
    ///
    /// Descends into a first child, then moves to a next sibling, then climbs
    /// until a sibling is found or `bound` is reached. Returns `None` once
    /// the subtree under `bound` is exhausted.
    #[must_use]
    pub fn step_within(&self, id: NodeId, bound: NodeId) -> Option<NodeId> {
        if let Some(child) = self.first_child(id) {
            return Some(child);
        }
        let mut at = id;
        loop {
            if at == bound {
                return None;
            }
            if let Some(sib) = self.next_sibling(at) {
                return Some(sib);
            }
            at = self.parent(at)?;
        }
    }

    /// Finds the next object member named `name` in the subtree under
    /// `within`, walking document order.
    ///
    /// Pass `after` to continue a previous search past its last hit, which
    /// is how duplicate member names are enumerated. Array elements never
    /// match; only members of objects carry real names. With interning
    /// enabled the walk compares handles, and a name the document never
    /// used is rejected without touching a single node.
    #[must_use]
    pub fn search(&self, within: NodeId, name: &str, after: Option<NodeId>) -> Option<NodeId> {
        let canonical = match &self.names {
            Some(table) => match table.lookup(&self.store, name) {
                Some(r) => Some(r),
                None => return None,
            },
            None => None,
        };

        let mut at = self.step_within(after.unwrap_or(within), within);
        while let Some(node) = at {
            let matched = match (self.arena.get(node).name, canonical) {
                (Some(Name::Str(r)), Some(c)) => r == c,
                (Some(Name::Str(r)), None) => self.store.get(r) == name,
                (Some(Name::Blank) | None, _) => false,
            };
            if matched {
                return Some(node);
            }
            at = self.step_within(node, within);
        }
        None
    }
}

/// Iterator over the direct children of one node.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    tree: &'a JsonTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.next_sibling(id);
        Some(id)
    }
}

/// Document-order iterator over every node of a closed tree.
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    tree: &'a JsonTree,
    next: Option<NodeId>,
}

impl Iterator for Nodes<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.step_within(id, NodeId::ROOT);
        Some(id)
    }
}
