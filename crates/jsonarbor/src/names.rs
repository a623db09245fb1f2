//! Optional interning of object member names.
//!
//! A classic bucket hash table over cells kept in a growable vector, so one
//! distinct name costs one cell rather than one allocation. Interning makes
//! equal names share a single [`StrRef`], which in turn lets search and path
//! code compare names by handle instead of by bytes.

use alloc::{vec, vec::Vec};

use crate::store::{StoreFull, StrRef, StringStore};

pub(crate) const NBUCKETS: usize = 512;

/// Dan Bernstein's public-domain times-33-plus-c string hash.
fn hash33(s: &[u8]) -> u32 {
    let mut hash: u32 = 5381;
    for &b in s {
        hash = hash.wrapping_mul(33).wrapping_add(u32::from(b));
    }
    hash
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    s: StrRef,
    next: Option<u32>,
}

#[derive(Debug)]
pub(crate) struct NameTable {
    buckets: Vec<Option<u32>>,
    cells: Vec<Cell>,
    hits: u64,
    misses: u64,
}

impl NameTable {
    pub(crate) fn new() -> Self {
        Self {
            buckets: vec![None; NBUCKETS],
            cells: Vec::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Wipes the buckets, cells and counters, keeping capacity for reuse.
    pub(crate) fn reset(&mut self) {
        self.buckets.fill(None);
        self.cells.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Returns the canonical handle for `name`, storing it on first sight.
    ///
    /// The empty string short-circuits to [`StrRef::EMPTY`] and is never
    /// entered in the table.
    pub(crate) fn intern(
        &mut self,
        store: &mut StringStore,
        name: &str,
    ) -> Result<StrRef, StoreFull> {
        if name.is_empty() {
            return Ok(StrRef::EMPTY);
        }

        let bucket = hash33(name.as_bytes()) as usize % NBUCKETS;

        let mut walk = self.buckets[bucket];
        while let Some(i) = walk {
            let cell = self.cells[i as usize];
            if store.get(cell.s) == name {
                self.hits += 1;
                return Ok(cell.s);
            }
            walk = cell.next;
        }

        // A miss is only counted against an occupied bucket, matching the
        // statistic's meaning of "hash matched but string did not".
        if self.buckets[bucket].is_some() {
            self.misses += 1;
        }

        let s = store.append(name)?;
        let cell = u32::try_from(self.cells.len()).map_err(|_| StoreFull)?;
        self.cells.push(Cell {
            s,
            next: self.buckets[bucket],
        });
        self.buckets[bucket] = Some(cell);
        Ok(s)
    }

    /// Same hash-and-compare as [`intern`](Self::intern), without inserting.
    pub(crate) fn lookup(&self, store: &StringStore, name: &str) -> Option<StrRef> {
        if name.is_empty() {
            return Some(StrRef::EMPTY);
        }

        let bucket = hash33(name.as_bytes()) as usize % NBUCKETS;
        let mut walk = self.buckets[bucket];
        while let Some(i) = walk {
            let cell = self.cells[i as usize];
            if store.get(cell.s) == name {
                return Some(cell.s);
            }
            walk = cell.next;
        }
        None
    }

    pub(crate) fn buckets_filled(&self) -> usize {
        self.buckets.iter().filter(|b| b.is_some()).count()
    }

    pub(crate) fn cells_used(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn cells_allocated(&self) -> usize {
        self.cells.capacity()
    }

    pub(crate) fn hits(&self) -> u64 {
        self.hits
    }

    pub(crate) fn misses(&self) -> u64 {
        self.misses
    }

    /// Approximate heap footprint of the table, in bytes.
    pub(crate) fn approx_bytes(&self) -> usize {
        self.buckets.len() * core::mem::size_of::<Option<u32>>()
            + self.cells.capacity() * core::mem::size_of::<Cell>()
    }
}
