//! Reordering the children of one container in place.
//!
//! The child chain is collected, reordered as a slice and relinked, so the
//! nodes themselves never move and outstanding [`NodeId`]s stay valid.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::error::Error;
use crate::node::{NodeId, NodeKind};
use crate::tree::JsonTree;

impl JsonTree {
    /// Stable-sorts the direct children of `id` by `cmp`.
    ///
    /// The comparator sees the tree read-only and the two candidate child
    /// ids. A scalar or empty container is left untouched.
    pub fn sort_children<F>(&mut self, id: NodeId, mut cmp: F) -> Result<(), Error>
    where
        F: FnMut(&JsonTree, NodeId, NodeId) -> Ordering,
    {
        self.check_closed()?;
        let mut order: Vec<NodeId> = self.children(id).collect();
        if order.len() > 1 {
            order.sort_by(|&a, &b| cmp(self, a, b));
            self.relink(id, &order);
        }
        Ok(())
    }

    /// Sorts an object's members by name, bytewise ascending.
    pub fn sort_members(&mut self, id: NodeId) -> Result<(), Error> {
        self.sort_children(id, |tree, a, b| {
            tree.name(a).unwrap_or("").cmp(tree.name(b).unwrap_or(""))
        })
    }

    /// In every object of the subtree under `id`, moves the first member
    /// named `name` to the front of that object's member list. Returns the
    /// number of objects that had such a member.
    pub fn promote(&mut self, id: NodeId, name: &str) -> Result<usize, Error> {
        self.check_closed()?;
        // a name the document never interned cannot match anywhere
        if let Some(table) = &self.names {
            if table.lookup(&self.store, name).is_none() {
                return Ok(0);
            }
        }

        let mut count = 0;
        let mut at = Some(id);
        while let Some(node) = at {
            if matches!(self.arena.get(node).kind, NodeKind::Object { .. })
                && self.promote_member(node, name)
            {
                count += 1;
            }
            at = self.step_within(node, id);
        }
        Ok(count)
    }

    fn promote_member(&mut self, object: NodeId, name: &str) -> bool {
        let mut prev: Option<NodeId> = None;
        let mut walk = self.first_child(object);
        while let Some(child) = walk {
            if self.name(child) == Some(name) {
                if let Some(p) = prev {
                    self.arena.get_mut(p).next = self.arena.get(child).next;
                    let old_first = self.first_child(object);
                    self.arena.get_mut(child).next = old_first;
                    self.arena.get_mut(object).set_first_child(Some(child));
                }
                return true;
            }
            prev = Some(child);
            walk = self.arena.get(child).next;
        }
        false
    }

    fn relink(&mut self, parent: NodeId, order: &[NodeId]) {
        let mut first = None;
        let mut prev: Option<NodeId> = None;
        for &child in order {
            match prev {
                None => first = Some(child),
                Some(p) => self.arena.get_mut(p).next = Some(child),
            }
            prev = Some(child);
        }
        if let Some(last) = prev {
            self.arena.get_mut(last).next = None;
        }
        self.arena.get_mut(parent).set_first_child(first);
    }
}
