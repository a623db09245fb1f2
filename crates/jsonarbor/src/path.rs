//! Slash-delimited path expressions over a closed tree.
//!
//! A path names members from the root down, one segment per `/`:
//!
//! ```text
//! /store/book[2]/title      third book's title
//! /store/book[]             the book array itself
//! /store/book[*]/title      title of every book
//! /                         the root container
//! ```
//!
//! A segment is a member name, an optional `[n]`, `[]` or `[*]` index, or
//! both. Indices are zero-based. A bare `[n]` segment indexes the node the
//! previous segment matched. A name segment applied to an array without an
//! index searches every element, so `/book/title` and `/book[*]/title` are
//! equivalent; with no further segments it names the array itself. The byte
//! `0xFF` stands for the empty member name, which is otherwise unspellable;
//! it also matches array elements. Because of that sentinel, paths are byte
//! strings, not `str`.

use alloc::vec::Vec;

use bstr::ByteSlice;

use crate::error::Error;
use crate::node::{Name, NodeId, NodeKind};
use crate::store::StrRef;
use crate::tree::JsonTree;

/// Most segments one path may carry.
pub(crate) const MAX_SEGMENTS: usize = 8;

/// Stand-in byte for the empty member name.
pub(crate) const EMPTY_NAME: u8 = 0xff;

#[derive(Debug, Clone, Copy)]
struct Segment<'a> {
    /// `None` for a bare `[n]` segment.
    name: Option<&'a [u8]>,
    index: SegIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegIndex {
    /// No brackets.
    Plain,
    /// `[]` or `[*]`.
    All,
    /// `[n]`, zero-based.
    At(usize),
}

fn tokenize(path: &[u8]) -> Result<Vec<Segment<'_>>, Error> {
    let (first, rest) = path.split_first().ok_or(Error::BadPath)?;
    if *first != b'/' {
        return Err(Error::BadPath);
    }

    let mut segs = Vec::new();
    if rest.is_empty() {
        return Ok(segs);
    }
    for raw in rest.split(|&b| b == b'/') {
        if segs.len() == MAX_SEGMENTS {
            return Err(Error::PathTooLong);
        }
        segs.push(parse_segment(raw)?);
    }
    Ok(segs)
}

fn parse_segment(raw: &[u8]) -> Result<Segment<'_>, Error> {
    if raw.is_empty() {
        return Err(Error::BadPath);
    }

    let (name_part, index) = match raw.find_byte(b'[') {
        Some(pos) => {
            if raw.last() != Some(&b']') {
                return Err(Error::BadPath);
            }
            let inner = &raw[pos + 1..raw.len() - 1];
            let index = if inner.is_empty() || matches!(inner, [b'*']) {
                SegIndex::All
            } else {
                SegIndex::At(parse_index(inner)?)
            };
            (&raw[..pos], index)
        }
        None => (raw, SegIndex::Plain),
    };

    let name = if matches!(name_part, [EMPTY_NAME]) {
        Some(&b""[..])
    } else if name_part.is_empty() {
        None
    } else {
        Some(name_part)
    };
    Ok(Segment { name, index })
}

fn parse_index(digits: &[u8]) -> Result<usize, Error> {
    let mut n: usize = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return Err(Error::BadPath);
        }
        n = n
            .checked_mul(10)
            .and_then(|n| n.checked_add(usize::from(b - b'0')))
            .ok_or(Error::BadPath)?;
    }
    Ok(n)
}

impl JsonTree {
    /// Resolves a path expression, writing matched nodes into `out`.
    ///
    /// Returns the total number of matches, which may exceed the capacity
    /// of `out`: the slice holds the first `out.len()` matches and the scan
    /// keeps counting, so a return larger than `out.len()` tells the caller
    /// the result was truncated. The path `/` matches the root.
    ///
    /// Fails with [`Error::BadPath`] on a malformed expression and
    /// [`Error::PathTooLong`] past [`MAX_SEGMENTS`](Self::MAX_PATH_SEGMENTS)
    /// segments. A well-formed path that matches nothing is not an error;
    /// it returns zero.
    pub fn path_refer<P: AsRef<[u8]>>(&self, path: P, out: &mut [NodeId]) -> Result<usize, Error> {
        self.check_closed()?;
        let segs = tokenize(path.as_ref())?;

        let mut found = 0;
        if segs.is_empty() {
            push(NodeId::ROOT, out, &mut found);
            return Ok(found);
        }
        self.match_segment(NodeId::ROOT, &segs, out, &mut found);
        Ok(found)
    }

    /// Most segments [`path_refer`](Self::path_refer) accepts in one path.
    pub const MAX_PATH_SEGMENTS: usize = MAX_SEGMENTS;

    fn match_segment(&self, node: NodeId, segs: &[Segment], out: &mut [NodeId], found: &mut usize) {
        let seg = segs[0];
        let rest = &segs[1..];

        let Some(name) = seg.name else {
            self.apply_index(node, seg.index, rest, out, found);
            return;
        };

        // With interning on, an unknown name rules out the whole scan.
        let canonical: Option<StrRef> = match (&self.names, core::str::from_utf8(name)) {
            (Some(table), Ok(s)) => match table.lookup(&self.store, s) {
                Some(r) => Some(r),
                None => return,
            },
            // Stored names are UTF-8, so these bytes cannot match anything.
            (Some(_), Err(_)) => return,
            (None, _) => None,
        };

        for child in self.children(node) {
            let matched = match canonical {
                Some(r) => self.name_handle(child) == Some(r),
                None => self.name_matches(child, name),
            };
            if matched {
                self.apply_index(child, seg.index, rest, out, found);
            }
        }
    }

    fn apply_index(
        &self,
        base: NodeId,
        index: SegIndex,
        rest: &[Segment],
        out: &mut [NodeId],
        found: &mut usize,
    ) {
        match index {
            SegIndex::Plain => self.emit(base, rest, out, found),
            SegIndex::At(n) => {
                if !self.is_array(base) {
                    return;
                }
                if let Some(element) = self.children(base).nth(n) {
                    self.emit(element, rest, out, found);
                }
            }
            SegIndex::All => {
                if !self.is_array(base) {
                    return;
                }
                if rest.is_empty() {
                    // a trailing [] or [*] names the array itself
                    push(base, out, found);
                } else {
                    for element in self.children(base) {
                        self.emit(element, rest, out, found);
                    }
                }
            }
        }
    }

    fn emit(&self, node: NodeId, rest: &[Segment], out: &mut [NodeId], found: &mut usize) {
        if rest.is_empty() {
            push(node, out, found);
        } else if self.is_array(node) && rest[0].name.is_some() {
            // a name segment under an unindexed array searches every element
            for element in self.children(node) {
                if self.is_container(element) {
                    self.match_segment(element, rest, out, found);
                }
            }
        } else if self.is_container(node) {
            self.match_segment(node, rest, out, found);
        }
    }

    fn is_array(&self, id: NodeId) -> bool {
        matches!(self.arena.get(id).kind, NodeKind::Array { .. })
    }

    fn name_matches(&self, id: NodeId, name: &[u8]) -> bool {
        match self.arena.get(id).name {
            None => false,
            Some(Name::Blank) => name.is_empty(),
            Some(Name::Str(r)) => self.store.get(r).as_bytes() == name,
        }
    }
}

/// Records a match: stores it while `out` has room, counts it regardless.
fn push(node: NodeId, out: &mut [NodeId], found: &mut usize) {
    if *found < out.len() {
        out[*found] = node;
    }
    *found += 1;
}
