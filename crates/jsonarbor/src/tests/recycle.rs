use alloc::string::ToString;

use crate::{Error, JsonTree, ParseStatus, SequenceError, TreeOptions};

const DOC: &[u8] = br#"{"a":[1,2,3],"b":{"c":"text","d":false}}"#;

#[test]
fn recycle_reuses_every_block() {
    let mut tree = JsonTree::new(TreeOptions::default());
    tree.parse(DOC).unwrap();
    let warm = tree.stats();
    let rendered = tree.display().unwrap().to_string();

    for _ in 0..10 {
        tree.recycle().unwrap();
        assert_eq!(tree.parse(DOC).unwrap(), ParseStatus::Done { leftover: 0 });
    }

    let after = tree.stats();
    assert_eq!(after.nodes_allocated, warm.nodes_allocated);
    assert_eq!(after.node_blocks, warm.node_blocks);
    assert_eq!(after.store_bytes_allocated, warm.store_bytes_allocated);
    assert_eq!(after.store_blocks, warm.store_blocks);
    assert_eq!(after.nodes_used, warm.nodes_used);
    assert_eq!(tree.display().unwrap().to_string(), rendered);
}

#[test]
fn recycle_refills_small_store_blocks() {
    let mut tree = JsonTree::new(TreeOptions {
        store_block_bytes: 64,
        ..TreeOptions::default()
    });
    let long = "v".repeat(60);
    let doc = alloc::format!(r#"["{long}","{long}","{long}","{long}"]"#);

    tree.parse(doc.as_bytes()).unwrap();
    let warm = tree.stats();
    assert!(warm.store_blocks > 1);

    for _ in 0..5 {
        tree.recycle().unwrap();
        assert_eq!(
            tree.parse(doc.as_bytes()).unwrap(),
            ParseStatus::Done { leftover: 0 }
        );
    }

    let after = tree.stats();
    assert_eq!(after.store_blocks, warm.store_blocks);
    assert_eq!(after.store_bytes_allocated, warm.store_bytes_allocated);
}

#[test]
fn parse_on_closed_tree_recycles_first() {
    let mut tree = JsonTree::new(TreeOptions::default());
    tree.parse(br#"{"first":1}"#).unwrap();
    tree.parse(br#"{"second":2}"#).unwrap();

    let root = tree.root().unwrap();
    assert!(tree.search(root, "first", None).is_none());
    let second = tree.search(root, "second", None).unwrap();
    assert_eq!(tree.as_i64(second), Some(2));
}

#[test]
fn recycle_clears_a_latched_error() {
    let mut tree = JsonTree::new(TreeOptions::default());
    assert!(tree.parse(b"[,]").is_err());
    tree.recycle().unwrap();
    assert_eq!(tree.last_error(), None);
    tree.parse(b"[]").unwrap();
    assert!(tree.is_closed());
}

#[test]
fn recycle_mid_parse_abandons_the_document() {
    let mut tree = JsonTree::new(TreeOptions::default());
    assert_eq!(tree.parse(b"[1,2,").unwrap(), ParseStatus::More);
    tree.recycle().unwrap();
    assert_eq!(tree.parse(b"[9]").unwrap(), ParseStatus::Done { leftover: 0 });
    let el = tree.children(tree.root().unwrap()).next().unwrap();
    assert_eq!(tree.as_i64(el), Some(9));
}

#[test]
fn cancel_discontinues_an_open_parse() {
    let mut tree = JsonTree::new(TreeOptions::default());
    assert_eq!(tree.parse(b"[1,").unwrap(), ParseStatus::More);
    tree.cancel().unwrap();
    assert_eq!(tree.last_error(), Some(SequenceError::Discontinued));
    assert_eq!(tree.root().unwrap_err(), Error::TreeOpen);

    // a canceled tree accepts the next document like an errored one
    assert_eq!(tree.parse(b"[true]").unwrap(), ParseStatus::Done { leftover: 0 });
    assert_eq!(tree.last_error(), None);
}

#[test]
fn cancel_outside_a_parse_is_a_no_op() {
    let mut tree = JsonTree::new(TreeOptions::default());
    tree.cancel().unwrap();
    tree.parse(b"[]").unwrap();
    tree.cancel().unwrap();
    assert!(tree.is_closed());
    assert_eq!(tree.last_error(), None);
}

#[test]
fn interning_statistics() {
    let mut tree = JsonTree::new(TreeOptions::default());
    tree.parse(br#"[{"id":1,"v":2},{"id":3,"v":4},{"id":5}]"#)
        .unwrap();
    let stats = tree.stats();
    assert_eq!(stats.name_cells_used, 2);
    assert_eq!(stats.name_hits, 3);
    assert!(stats.nodes_used > 0);
    assert!(stats.total_bytes > 0);

    tree.recycle().unwrap();
    assert_eq!(tree.stats().name_cells_used, 0);
    assert_eq!(tree.stats().name_hits, 0);
}

#[test]
fn interning_can_be_disabled() {
    let mut tree = JsonTree::new(TreeOptions {
        intern_names: false,
        ..TreeOptions::default()
    });
    tree.parse(br#"{"a":1,"a":2}"#).unwrap();
    assert_eq!(tree.stats().name_cells_used, 0);

    let root = tree.root().unwrap();
    let first = tree.search(root, "a", None).unwrap();
    let second = tree.search(root, "a", Some(first)).unwrap();
    assert_eq!(tree.as_i64(second), Some(2));
    // without interning, equal names get distinct handles
    assert_ne!(tree.name_handle(first), tree.name_handle(second));
}
