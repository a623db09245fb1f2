//! Append-only string storage.
//!
//! Strings live in a chain of fixed-capacity blocks. A block never
//! reallocates once created, so a [`StrRef`] stays valid for the lifetime of
//! the tree (until the store is cleared for the next parse). The store is
//! write-once: escape decoding happens in a scratch buffer before the result
//! is appended, never in place.

use alloc::{string::String, vec::Vec};

/// Smallest block the store will allocate, regardless of configuration.
pub(crate) const MIN_BLOCK_BYTES: usize = 64;

/// Marker for an append that would exceed the configured byte ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StoreFull;

/// Handle to a string owned by a tree's string store.
///
/// `StrRef` is an explicit interned-string handle: when name interning is
/// enabled, equal object member names anywhere in a tree resolve to the same
/// `StrRef`, so equality of handles proves equality of names without a byte
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrRef {
    pub(crate) block: u32,
    pub(crate) start: u32,
    pub(crate) len: u32,
}

impl StrRef {
    /// Canonical handle for the empty string, never backed by storage.
    pub const EMPTY: StrRef = StrRef {
        block: u32::MAX,
        start: 0,
        len: 0,
    };

    /// Returns `true` if this handle refers to the empty string.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

#[derive(Debug)]
pub(crate) struct StringStore {
    blocks: Vec<String>,
    /// Index of the block currently being filled. Rewound by [`clear`].
    ///
    /// [`clear`]: Self::clear
    cursor: usize,
    block_bytes: usize,
    max_bytes: Option<usize>,
}

impl StringStore {
    pub(crate) fn new(block_bytes: usize, max_bytes: Option<usize>) -> Self {
        Self {
            blocks: Vec::new(),
            cursor: 0,
            block_bytes: block_bytes.max(MIN_BLOCK_BYTES),
            max_bytes,
        }
    }

    /// Copies `s` into the store and returns its handle.
    ///
    /// Fills the cursor block while it has room, then advances through
    /// blocks kept from earlier cycles before opening a new one sized to
    /// fit. Failure leaves previously stored strings intact.
    pub(crate) fn append(&mut self, s: &str) -> Result<StrRef, StoreFull> {
        if s.is_empty() {
            return Ok(StrRef::EMPTY);
        }

        let mut cursor = self.cursor;
        while cursor < self.blocks.len() {
            let blk = &self.blocks[cursor];
            if blk.capacity() - blk.len() >= s.len() {
                break;
            }
            cursor += 1;
        }
        if cursor == self.blocks.len() {
            let cap = self.block_bytes.max(s.len());
            if let Some(max) = self.max_bytes {
                if self.allocated() + cap > max {
                    return Err(StoreFull);
                }
            }
            self.blocks.push(String::with_capacity(cap));
        }
        self.cursor = cursor;

        let block = cursor;
        let tail = &mut self.blocks[block];
        let start = tail.len();
        tail.push_str(s);

        Ok(StrRef {
            block: u32::try_from(block).map_err(|_| StoreFull)?,
            start: u32::try_from(start).map_err(|_| StoreFull)?,
            len: u32::try_from(s.len()).map_err(|_| StoreFull)?,
        })
    }

    pub(crate) fn get(&self, r: StrRef) -> &str {
        if r == StrRef::EMPTY {
            return "";
        }
        let start = r.start as usize;
        &self.blocks[r.block as usize][start..start + r.len as usize]
    }

    /// Resets every block's fill level and rewinds the cursor, keeping the
    /// allocations for reuse.
    pub(crate) fn clear(&mut self) {
        for block in &mut self.blocks {
            block.clear();
        }
        self.cursor = 0;
    }

    pub(crate) fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub(crate) fn allocated(&self) -> usize {
        self.blocks.iter().map(String::capacity).sum()
    }

    pub(crate) fn used(&self) -> usize {
        self.blocks.iter().map(String::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{MIN_BLOCK_BYTES, StoreFull, StrRef, StringStore};

    #[test]
    fn append_and_get() {
        let mut store = StringStore::new(0, None);
        let a = store.append("alpha").unwrap();
        let b = store.append("beta").unwrap();
        assert_eq!(store.get(a), "alpha");
        assert_eq!(store.get(b), "beta");
        assert_ne!(a, b);
    }

    #[test]
    fn empty_string_is_canonical() {
        let mut store = StringStore::new(0, None);
        assert_eq!(store.append("").unwrap(), StrRef::EMPTY);
        assert_eq!(store.get(StrRef::EMPTY), "");
        assert_eq!(store.used(), 0);
    }

    #[test]
    fn oversized_string_gets_own_block() {
        let mut store = StringStore::new(0, None);
        let big = "x".repeat(MIN_BLOCK_BYTES * 3);
        let r = store.append(&big).unwrap();
        assert_eq!(store.get(r), big);
        assert_eq!(store.block_count(), 1);
        store.append("small").unwrap();
        assert_eq!(store.block_count(), 2);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut store = StringStore::new(0, None);
        store.append("hello").unwrap();
        let allocated = store.allocated();
        store.clear();
        assert_eq!(store.used(), 0);
        assert_eq!(store.allocated(), allocated);
        let r = store.append("world").unwrap();
        assert_eq!(store.get(r), "world");
    }

    #[test]
    fn clear_refills_the_whole_chain() {
        let mut store = StringStore::new(0, None);
        let s = "z".repeat(MIN_BLOCK_BYTES - 4);
        for _ in 0..4 {
            store.append(&s).unwrap();
        }
        assert_eq!(store.block_count(), 4);
        let allocated = store.allocated();

        for _ in 0..5 {
            store.clear();
            for _ in 0..4 {
                let r = store.append(&s).unwrap();
                assert_eq!(store.get(r), s);
            }
        }
        assert_eq!(store.block_count(), 4);
        assert_eq!(store.allocated(), allocated);
    }

    #[test]
    fn ceiling_preserves_existing_content() {
        let mut store = StringStore::new(0, Some(MIN_BLOCK_BYTES));
        let r = store.append("kept").unwrap();
        let big = "y".repeat(MIN_BLOCK_BYTES * 2);
        assert_eq!(store.append(&big), Err(StoreFull));
        assert_eq!(store.get(r), "kept");
    }
}
