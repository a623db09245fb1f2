//! A streaming JSON parser that builds a recyclable in-memory tree.
//!
//! `jsonarbor` parses JSON text supplied in arbitrary-sized chunks into a
//! node tree backed by a block arena and an append-only string store. Once a
//! tree has been read and queried, its storage can be recycled for the next
//! parse without returning memory to the allocator, so long-running processes
//! can parse millions of documents with a bounded, stable footprint.
//!
//! # Examples
//!
//! ```rust
//! use jsonarbor::{JsonTree, NodeValue, ParseStatus, TreeOptions};
//!
//! let mut tree = JsonTree::new(TreeOptions::default());
//! assert_eq!(
//!     tree.parse(br#"{"a":[{"x":1},{"x":2}]}"#).unwrap(),
//!     ParseStatus::Done { leftover: 0 }
//! );
//!
//! let mut matches = [jsonarbor::NodeId::ROOT; 4];
//! let found = tree.path_refer(b"/a[1]/x", &mut matches).unwrap();
//! assert_eq!(found, 1);
//! assert_eq!(tree.value(matches[0]), NodeValue::Integer(2));
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod arena;
mod display;
mod error;
mod escape;
mod names;
mod node;
mod options;
mod parser;
mod path;
mod sort;
mod stats;
mod store;
mod tree;

#[cfg(test)]
mod tests;

pub use display::TreeDisplay;
pub use error::{Error, SequenceError};
pub use node::{NodeId, NodeValue};
pub use options::TreeOptions;
pub use parser::ParseStatus;
pub use stats::TreeStats;
pub use store::StrRef;
pub use tree::{Children, JsonTree, Nodes};
