use crate::{Error, JsonTree, ParseStatus, SequenceError, TreeOptions};

/// Parses a whole document in one chunk, expecting it to succeed cleanly.
pub(crate) fn parsed(src: &[u8]) -> JsonTree {
    let mut tree = JsonTree::new(TreeOptions::default());
    assert_eq!(tree.parse(src).unwrap(), ParseStatus::Done { leftover: 0 });
    tree
}

/// Parses a malformed document and returns the latched grammar error.
pub(crate) fn parse_err(src: &[u8]) -> SequenceError {
    let mut tree = JsonTree::new(TreeOptions::default());
    match tree.parse(src) {
        Err(Error::Sequence(e)) => {
            assert_eq!(tree.last_error(), Some(e));
            e
        }
        other => panic!("expected a sequence error for {src:?}, got {other:?}"),
    }
}
