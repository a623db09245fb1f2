//! Block arena for tree nodes.
//!
//! Nodes are carved from fixed-capacity blocks by bumping a flat cursor.
//! Recycling rewinds the cursor to zero without releasing any block, so a
//! warmed-up tree allocates nothing on subsequent parses. Block metadata is
//! kept out of band; every slot holds a real node.

use alloc::vec::Vec;

use crate::node::{Node, NodeId};

/// Marker for an allocation that would exceed the configured node ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArenaFull;

#[derive(Debug)]
pub(crate) struct NodeArena {
    blocks: Vec<Vec<Node>>,
    block_nodes: usize,
    len: usize,
    max_nodes: Option<usize>,
}

impl NodeArena {
    pub(crate) fn new(block_nodes: usize, max_nodes: Option<usize>) -> Self {
        Self {
            blocks: Vec::new(),
            block_nodes: block_nodes.max(1),
            len: 0,
            max_nodes,
        }
    }

    /// Places `node` in the next free slot and returns its id.
    ///
    /// Reuses a recycled slot when one exists, otherwise grows the current
    /// block or opens a new one. Slot contents from a previous cycle are
    /// overwritten, never trusted.
    pub(crate) fn alloc(&mut self, node: Node) -> Result<NodeId, ArenaFull> {
        if self.max_nodes.is_some_and(|max| self.len >= max) {
            return Err(ArenaFull);
        }

        let id = u32::try_from(self.len).map_err(|_| ArenaFull)?;
        let block = self.len / self.block_nodes;
        let slot = self.len % self.block_nodes;

        if block == self.blocks.len() {
            self.blocks.push(Vec::with_capacity(self.block_nodes));
        }

        let blk = &mut self.blocks[block];
        if slot < blk.len() {
            blk[slot] = node;
        } else {
            blk.push(node);
        }

        self.len += 1;
        Ok(NodeId(id))
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node {
        &self.blocks[id.0 as usize / self.block_nodes][id.0 as usize % self.block_nodes]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.blocks[id.0 as usize / self.block_nodes][id.0 as usize % self.block_nodes]
    }

    /// Rewinds the cursor, keeping every block for the next parse.
    pub(crate) fn reset(&mut self) {
        self.len = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub(crate) fn allocated(&self) -> usize {
        self.blocks.len() * self.block_nodes
    }
}
