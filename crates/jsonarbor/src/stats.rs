//! Storage accounting.

use core::mem::size_of;

use crate::names::NameTable;
use crate::node::Node;
use crate::tree::JsonTree;

/// Snapshot of a tree's storage pools, taken by [`JsonTree::stats`].
///
/// "Used" figures describe the current document; "allocated" figures
/// describe what the tree is holding on to across recycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes_used: usize,
    pub nodes_allocated: usize,
    pub node_blocks: usize,
    pub store_bytes_used: usize,
    pub store_bytes_allocated: usize,
    pub store_blocks: usize,
    /// Distinct interned names. Zero when interning is off.
    pub name_cells_used: usize,
    pub name_cells_allocated: usize,
    pub name_buckets_filled: usize,
    /// Names that were already in the table when interned again.
    pub name_hits: u64,
    /// Bucket collisions between distinct names.
    pub name_misses: u64,
    /// Approximate heap footprint of all pools, in bytes.
    pub total_bytes: usize,
}

impl JsonTree {
    /// Takes a storage snapshot. Usable in any state; a torn-down tree
    /// reports empty pools.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let names = self.names.as_ref();
        let nodes_allocated = self.arena.allocated();
        let store_bytes_allocated = self.store.allocated();
        let name_bytes = names.map_or(0, NameTable::approx_bytes);

        TreeStats {
            nodes_used: self.arena.len(),
            nodes_allocated,
            node_blocks: self.arena.block_count(),
            store_bytes_used: self.store.used(),
            store_bytes_allocated,
            store_blocks: self.store.block_count(),
            name_cells_used: names.map_or(0, NameTable::cells_used),
            name_cells_allocated: names.map_or(0, NameTable::cells_allocated),
            name_buckets_filled: names.map_or(0, NameTable::buckets_filled),
            name_hits: names.map_or(0, NameTable::hits),
            name_misses: names.map_or(0, NameTable::misses),
            total_bytes: nodes_allocated * size_of::<Node>()
                + store_bytes_allocated
                + name_bytes,
        }
    }
}
