//! Indented text rendering of a closed tree.

use core::fmt::{self, Write as _};

use crate::error::Error;
use crate::node::{NodeId, NodeKind};
use crate::tree::JsonTree;

impl JsonTree {
    /// Renders the document as indented JSON text.
    ///
    /// The output parses back to an identical tree. Strings are re-escaped,
    /// with control characters the escape table cannot spell written as
    /// `\u` sequences.
    pub fn display(&self) -> Result<TreeDisplay<'_>, Error> {
        self.check_closed()?;
        Ok(TreeDisplay { tree: self })
    }
}

/// [`Display`](fmt::Display) adapter returned by [`JsonTree::display`].
#[derive(Debug)]
pub struct TreeDisplay<'a> {
    tree: &'a JsonTree,
}

impl fmt::Display for TreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(self.tree, f, NodeId::ROOT, 0)?;
        f.write_char('\n')
    }
}

fn write_node(tree: &JsonTree, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
    match tree.arena.get(id).kind {
        NodeKind::Empty | NodeKind::Null => f.write_str("null"),
        NodeKind::Bool(true) => f.write_str("true"),
        NodeKind::Bool(false) => f.write_str("false"),
        NodeKind::Integer(n) => write!(f, "{n}"),
        NodeKind::Float(x) => write!(f, "{x}"),
        NodeKind::String(r) => write_escaped(f, tree.str_of(r)),
        NodeKind::Object { .. } => write_container(tree, f, id, depth, (b'{', b'}'), true),
        NodeKind::Array { .. } => write_container(tree, f, id, depth, (b'[', b']'), false),
    }
}

fn write_container(
    tree: &JsonTree,
    f: &mut fmt::Formatter<'_>,
    id: NodeId,
    depth: usize,
    brackets: (u8, u8),
    with_names: bool,
) -> fmt::Result {
    if tree.first_child(id).is_none() {
        f.write_char(char::from(brackets.0))?;
        return f.write_char(char::from(brackets.1));
    }

    f.write_char(char::from(brackets.0))?;
    let mut children = tree.children(id).peekable();
    while let Some(child) = children.next() {
        f.write_char('\n')?;
        indent(f, depth + 1)?;
        if with_names {
            write_escaped(f, tree.name(child).unwrap_or(""))?;
            f.write_str(": ")?;
        }
        write_node(tree, f, child, depth + 1)?;
        if children.peek().is_some() {
            f.write_char(',')?;
        }
    }
    f.write_char('\n')?;
    indent(f, depth)?;
    f.write_char(char::from(brackets.1))
}

fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str("  ")?;
    }
    Ok(())
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\u{c}' => f.write_str("\\f")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
