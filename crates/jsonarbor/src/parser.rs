//! The chunked parse engine.
//!
//! Input arrives in arbitrary slices; the engine keeps its registers (the
//! cursor node, the colon flag, any token cut by the chunk edge) inside the
//! tree state, so a parse split at any byte boundary builds the same tree as
//! a single-chunk parse.

use alloc::vec::Vec;
use core::mem;

use crate::arena::ArenaFull;
use crate::error::{Error, SequenceError};
use crate::escape;
use crate::node::{Name, Node, NodeId, NodeKind};
use crate::store::{StoreFull, StrRef, StringStore};
use crate::tree::{JsonTree, TreeState};

/// Outcome of feeding one chunk to [`JsonTree::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// The root container closed; the tree can now be queried. `leftover`
    /// counts the unconsumed bytes at the end of the chunk, not counting
    /// whitespace directly after the closing bracket.
    Done { leftover: usize },
    /// The chunk was consumed and the document is still open.
    More,
}

/// Parser registers carried across chunk boundaries.
#[derive(Debug)]
pub(crate) struct OpenState {
    /// The node being filled. Always a child slot, never the root.
    cur: NodeId,
    /// A member name has been read and its `:` has not.
    expect_colon: bool,
    partial: Option<PartialToken>,
}

/// A token cut by the end of a chunk, held raw until it completes.
#[derive(Debug)]
enum PartialToken {
    Str {
        raw: Vec<u8>,
        in_escape: bool,
        had_escape: bool,
    },
    Num {
        raw: Vec<u8>,
    },
    Logic {
        raw: Vec<u8>,
    },
}

impl JsonTree {
    /// Feeds the next chunk of JSON text.
    ///
    /// Returns [`ParseStatus::More`] while the document is still open and
    /// [`ParseStatus::Done`] once the root container closes. Calling `parse`
    /// on a closed or errored tree recycles it first, so a loop that feeds
    /// documents back to back needs no explicit recycling.
    ///
    /// Grammar violations latch a [`SequenceError`] on the tree (see
    /// [`last_error`](Self::last_error)) and leave the tree built as far as
    /// the offending byte. Exceeding a configured storage ceiling tears the
    /// tree down; every later call answers [`Error::InvalidTree`].
    pub fn parse(&mut self, chunk: &[u8]) -> Result<ParseStatus, Error> {
        match self.state {
            TreeState::Dead => return Err(Error::InvalidTree),
            TreeState::Closed | TreeState::Errored => self.recycle()?,
            TreeState::Idle | TreeState::Open(_) => {}
        }

        let mut i = 0;
        let mut open = match mem::replace(&mut self.state, TreeState::Idle) {
            TreeState::Open(open) => open,
            _ => {
                while i < chunk.len() && chunk[i].is_ascii_whitespace() {
                    i += 1;
                }
                if i == chunk.len() {
                    return Ok(ParseStatus::More);
                }
                let kind = match chunk[i] {
                    b'{' => NodeKind::Object { first: None },
                    b'[' => NodeKind::Array { first: None },
                    _ => return self.fatal(SequenceError::BeginTree),
                };
                i += 1;
                let root = self.alloc_node(Node {
                    name: None,
                    kind,
                    next: None,
                    parent: None,
                })?;
                let first = self.alloc_node(Node::empty(Some(root)))?;
                self.arena.get_mut(root).set_first_child(Some(first));
                OpenState {
                    cur: first,
                    expect_colon: false,
                    partial: None,
                }
            }
        };

        while i < chunk.len() {
            if let Some(partial) = open.partial.take() {
                match partial {
                    PartialToken::Str {
                        mut raw,
                        mut in_escape,
                        mut had_escape,
                    } => {
                        if scan_str(&mut raw, &mut in_escape, &mut had_escape, chunk, &mut i) {
                            self.commit_string(&mut open, &raw, had_escape)?;
                        } else {
                            open.partial = Some(PartialToken::Str {
                                raw,
                                in_escape,
                                had_escape,
                            });
                        }
                    }
                    PartialToken::Num { mut raw } => {
                        if scan_while(&mut raw, is_number_byte, chunk, &mut i) {
                            self.commit_number(&open, &raw)?;
                        } else {
                            open.partial = Some(PartialToken::Num { raw });
                        }
                    }
                    PartialToken::Logic { mut raw } => {
                        if scan_while(&mut raw, |b| b.is_ascii_alphabetic(), chunk, &mut i) {
                            self.commit_logic(&open, &raw)?;
                        } else {
                            open.partial = Some(PartialToken::Logic { raw });
                        }
                    }
                }
                continue;
            }

            let c = chunk[i];
            if c.is_ascii_whitespace() {
                i += 1;
                continue;
            }

            if open.expect_colon {
                if c == b':' {
                    open.expect_colon = false;
                    i += 1;
                    continue;
                }
                return self.fatal(SequenceError::NoColon);
            }

            match c {
                b'"' => {
                    if !self.cur_is_empty(open.cur) {
                        return self.fatal(SequenceError::UnexpectedString);
                    }
                    i += 1;
                    open.partial = Some(PartialToken::Str {
                        raw: Vec::new(),
                        in_escape: false,
                        had_escape: false,
                    });
                }
                b'-' | b'0'..=b'9' => {
                    self.check_value_start(&open, SequenceError::UnexpectedNumber)?;
                    open.partial = Some(PartialToken::Num { raw: Vec::new() });
                }
                b'{' | b'[' => {
                    self.check_value_start(&open, SequenceError::UnexpectedContainer)?;
                    i += 1;
                    let cur = open.cur;
                    let name = if self.in_object(cur) {
                        self.arena.get(cur).name
                    } else {
                        Some(Name::Blank)
                    };
                    let child = self.alloc_node(Node::empty(Some(cur)))?;
                    let node = self.arena.get_mut(cur);
                    node.name = name;
                    node.kind = if c == b'{' {
                        NodeKind::Object { first: Some(child) }
                    } else {
                        NodeKind::Array { first: Some(child) }
                    };
                    open.cur = child;
                }
                b',' => {
                    if self.cur_is_empty(open.cur) {
                        return self.fatal(SequenceError::LeadingComma);
                    }
                    i += 1;
                    let parent = self.parent_of(open.cur);
                    let sib = self.alloc_node(Node::empty(Some(parent)))?;
                    self.arena.get_mut(open.cur).next = Some(sib);
                    open.cur = sib;
                }
                b'}' | b']' => {
                    i += 1;
                    match self.close_container(open.cur, c)? {
                        Some(container) => open.cur = container,
                        None => {
                            self.state = TreeState::Closed;
                            while i < chunk.len() && chunk[i].is_ascii_whitespace() {
                                i += 1;
                            }
                            return Ok(ParseStatus::Done {
                                leftover: chunk.len() - i,
                            });
                        }
                    }
                }
                b':' => return self.fatal(SequenceError::UnexpectedColon),
                c if c.is_ascii_alphabetic() => {
                    self.check_value_start(&open, SequenceError::UnexpectedText)?;
                    open.partial = Some(PartialToken::Logic { raw: Vec::new() });
                }
                _ => return self.fatal(SequenceError::BadText),
            }
        }

        self.state = TreeState::Open(open);
        Ok(ParseStatus::More)
    }

    /// Abandons an open parse, latching [`SequenceError::Discontinued`].
    ///
    /// A no-op on a tree that is not mid-parse.
    pub fn cancel(&mut self) -> Result<(), Error> {
        match self.state {
            TreeState::Dead => Err(Error::InvalidTree),
            TreeState::Open(_) => {
                self.last_error = Some(SequenceError::Discontinued);
                self.state = TreeState::Errored;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn fatal<T>(&mut self, e: SequenceError) -> Result<T, Error> {
        self.last_error = Some(e);
        self.state = TreeState::Errored;
        Err(Error::Sequence(e))
    }

    /// Destroys all storage after a ceiling was hit. The handle stays dead.
    fn oom<T>(&mut self) -> Result<T, Error> {
        self.arena = crate::arena::NodeArena::new(
            self.options.node_block_nodes,
            self.options.max_nodes,
        );
        self.store = StringStore::new(self.options.store_block_bytes, self.options.max_store_bytes);
        self.names = None;
        self.last_error = None;
        self.state = TreeState::Dead;
        Err(Error::OutOfMemory)
    }

    fn alloc_node(&mut self, node: Node) -> Result<NodeId, Error> {
        match self.arena.alloc(node) {
            Ok(id) => Ok(id),
            Err(ArenaFull) => self.oom(),
        }
    }

    fn cur_is_empty(&self, id: NodeId) -> bool {
        matches!(self.arena.get(id).kind, NodeKind::Empty)
    }

    fn parent_of(&self, id: NodeId) -> NodeId {
        // the cursor always has a parent while a parse is open
        self.arena.get(id).parent.unwrap_or(NodeId::ROOT)
    }

    fn in_object(&self, id: NodeId) -> bool {
        matches!(
            self.arena.get(self.parent_of(id)).kind,
            NodeKind::Object { .. }
        )
    }

    /// A value token may only start on a fresh slot, and inside an object
    /// only after a member name.
    fn check_value_start(&mut self, open: &OpenState, err: SequenceError) -> Result<(), Error> {
        if !self.cur_is_empty(open.cur) {
            return self.fatal(err);
        }
        if self.in_object(open.cur) && self.arena.get(open.cur).name.is_none() {
            return self.fatal(err);
        }
        Ok(())
    }

    /// Closes the container holding `cur`. Returns the container id, or
    /// `None` when the root itself closed.
    fn close_container(&mut self, cur: NodeId, bracket: u8) -> Result<Option<NodeId>, Error> {
        let parent = self.parent_of(cur);
        if self.cur_is_empty(cur) {
            if self.arena.get(cur).name.is_some() {
                // a member name with no value, as in {"a":}
                return self.fatal(SequenceError::BadClosure);
            }
            if self.arena.get(parent).kind.first_child() == Some(cur) {
                // an empty container: drop the unused slot
                self.arena.get_mut(parent).set_first_child(None);
            } else {
                // trailing comma, as in [1,]
                return self.fatal(SequenceError::BadClosure);
            }
        }

        let matched = matches!(
            (bracket, &self.arena.get(parent).kind),
            (b'}', NodeKind::Object { .. }) | (b']', NodeKind::Array { .. })
        );
        if !matched {
            return self.fatal(if bracket == b'}' {
                SequenceError::MismatchedObjectClose
            } else {
                SequenceError::MismatchedArrayClose
            });
        }

        Ok(self.arena.get(parent).parent.map(|_| parent))
    }

    fn commit_string(
        &mut self,
        open: &mut OpenState,
        raw: &[u8],
        had_escape: bool,
    ) -> Result<(), Error> {
        let decoded;
        let s: &str = if had_escape {
            match escape::unescape(raw) {
                Ok(owned) => {
                    decoded = owned;
                    &decoded
                }
                Err(e) => return self.fatal(e),
            }
        } else {
            match core::str::from_utf8(raw) {
                Ok(s) => s,
                Err(_) => return self.fatal(SequenceError::BadUtf8),
            }
        };

        let cur = open.cur;
        if self.in_object(cur) && self.arena.get(cur).name.is_none() {
            let r = self.intern_name(s)?;
            self.arena.get_mut(cur).name = Some(Name::Str(r));
            open.expect_colon = true;
        } else {
            let r = match self.store.append(s) {
                Ok(r) => r,
                Err(StoreFull) => return self.oom(),
            };
            self.commit_value(cur, NodeKind::String(r));
        }
        Ok(())
    }

    fn commit_number(&mut self, open: &OpenState, raw: &[u8]) -> Result<(), Error> {
        match number_kind(raw) {
            Ok(kind) => {
                self.commit_value(open.cur, kind);
                Ok(())
            }
            Err(e) => self.fatal(e),
        }
    }

    fn commit_logic(&mut self, open: &OpenState, raw: &[u8]) -> Result<(), Error> {
        let kind = if raw.eq_ignore_ascii_case(b"true") {
            NodeKind::Bool(true)
        } else if raw.eq_ignore_ascii_case(b"false") {
            NodeKind::Bool(false)
        } else if raw.eq_ignore_ascii_case(b"null") {
            NodeKind::Null
        } else {
            return self.fatal(SequenceError::BadLogic);
        };
        self.commit_value(open.cur, kind);
        Ok(())
    }

    /// Fills the cursor slot, tagging array elements with the blank name.
    fn commit_value(&mut self, cur: NodeId, kind: NodeKind) {
        let in_array = !self.in_object(cur);
        let node = self.arena.get_mut(cur);
        node.kind = kind;
        if in_array {
            node.name = Some(Name::Blank);
        }
    }

    /// Member names go through the intern table when one is configured.
    fn intern_name(&mut self, s: &str) -> Result<StrRef, Error> {
        let appended = match &mut self.names {
            Some(table) => table.intern(&mut self.store, s),
            None => self.store.append(s),
        };
        match appended {
            Ok(r) => Ok(r),
            Err(StoreFull) => self.oom(),
        }
    }
}

/// Consumes string bytes up to the closing quote. Returns `true` when the
/// quote was seen; escape bytes are kept raw for later decoding.
fn scan_str(
    raw: &mut Vec<u8>,
    in_escape: &mut bool,
    had_escape: &mut bool,
    chunk: &[u8],
    i: &mut usize,
) -> bool {
    while *i < chunk.len() {
        let b = chunk[*i];
        *i += 1;
        if *in_escape {
            *in_escape = false;
            raw.push(b);
        } else if b == b'\\' {
            *in_escape = true;
            *had_escape = true;
            raw.push(b);
        } else if b == b'"' {
            return true;
        } else {
            raw.push(b);
        }
    }
    false
}

/// Consumes bytes matching `pred`. Returns `true` when a terminator was
/// reached (left unconsumed), `false` when the chunk ran out first.
fn scan_while(raw: &mut Vec<u8>, pred: impl Fn(u8) -> bool, chunk: &[u8], i: &mut usize) -> bool {
    while *i < chunk.len() {
        let b = chunk[*i];
        if !pred(b) {
            return true;
        }
        raw.push(b);
        *i += 1;
    }
    false
}

fn is_number_byte(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E')
}

/// Converts a complete number token. Tokens with a fraction or exponent
/// become floats, everything else must fit an `i64`.
fn number_kind(raw: &[u8]) -> Result<NodeKind, SequenceError> {
    let s = core::str::from_utf8(raw).map_err(|_| SequenceError::BadNumber)?;

    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut bytes = digits.bytes();
    if bytes.next() == Some(b'0') && matches!(bytes.next(), Some(b'0'..=b'9')) {
        return Err(SequenceError::BadNumber);
    }

    if s.bytes().any(|b| matches!(b, b'.' | b'e' | b'E')) {
        let x: f64 = s.parse().map_err(|_| SequenceError::BadNumber)?;
        if !x.is_finite() {
            return Err(SequenceError::BadNumber);
        }
        Ok(NodeKind::Float(x))
    } else {
        Ok(NodeKind::Integer(
            s.parse().map_err(|_| SequenceError::BadNumber)?,
        ))
    }
}
