use alloc::vec::Vec;

use super::common::parsed;
use crate::{Error, JsonTree, NodeId, NodeValue, TreeOptions};

const DOC: &[u8] = br#"{
  "store": {
    "book": [
      {"title":"A","price":1},
      {"title":"B","price":2},
      {"title":"C","price":3}
    ],
    "": "anon"
  },
  "extra": [10, 20]
}"#;

fn refer(tree: &JsonTree, path: &[u8], cap: usize) -> Vec<NodeId> {
    let mut out = alloc::vec![NodeId::ROOT; cap];
    let n = tree.path_refer(path, &mut out).unwrap();
    out.truncate(n.min(cap));
    out
}

#[test]
fn single_element_paths() {
    let tree = parsed(DOC);

    let hits = refer(&tree, b"/store/book[1]/title", 4);
    assert_eq!(hits.len(), 1);
    assert_eq!(tree.value(hits[0]), NodeValue::String("B"));

    let hits = refer(&tree, b"/extra[0]", 4);
    assert_eq!(tree.as_i64(hits[0]), Some(10));

    // a bare index segment applies to the previous match
    let hits = refer(&tree, b"/extra/[1]", 4);
    assert_eq!(tree.as_i64(hits[0]), Some(20));
}

#[test]
fn root_path() {
    let tree = parsed(DOC);
    assert_eq!(refer(&tree, b"/", 4), [tree.root().unwrap()]);
}

#[test]
fn trailing_wildcard_names_the_array() {
    let tree = parsed(DOC);
    let hits = refer(&tree, b"/store/book[]", 4);
    assert_eq!(hits.len(), 1);
    assert_eq!(tree.value(hits[0]), NodeValue::Array);
    assert_eq!(refer(&tree, b"/store/book[*]", 4), hits);
}

#[test]
fn interior_wildcard_fans_out() {
    let tree = parsed(DOC);

    let hits = refer(&tree, b"/store/book[*]/title", 8);
    let titles: Vec<_> = hits.iter().map(|&id| tree.as_str(id).unwrap()).collect();
    assert_eq!(titles, ["A", "B", "C"]);

    // a full output slice keeps only the first matches, but counts them all
    let mut out = [NodeId::ROOT; 2];
    let n = tree.path_refer(b"/store/book[]/price", &mut out).unwrap();
    assert_eq!(n, 3);
    assert_eq!(tree.as_i64(out[0]), Some(1));
    assert_eq!(tree.as_i64(out[1]), Some(2));
}

#[test]
fn match_count_exceeds_a_full_output_slice() {
    let tree = parsed(br#"{"a":[{"x":1},{"x":2},{"x":3}]}"#);
    let mut out = [NodeId::ROOT; 1];
    let n = tree.path_refer(b"/a/x", &mut out).unwrap();
    assert_eq!(n, 3);
    assert_eq!(tree.as_i64(out[0]), Some(1));

    // the root matches even with nowhere to store it
    assert_eq!(tree.path_refer("/", &mut []).unwrap(), 1);
}

#[test]
fn unindexed_array_fans_out_like_a_wildcard() {
    let tree = parsed(DOC);
    let hits = refer(&tree, b"/store/book/price", 8);
    let prices: Vec<_> = hits.iter().map(|&id| tree.as_i64(id).unwrap()).collect();
    assert_eq!(prices, [1, 2, 3]);
}

#[test]
fn empty_name_sentinel() {
    let tree = parsed(DOC);
    let hits = refer(&tree, b"/store/\xff", 4);
    assert_eq!(hits.len(), 1);
    assert_eq!(tree.as_str(hits[0]), Some("anon"));
}

#[test]
fn misses_are_not_errors() {
    let tree = parsed(DOC);
    assert!(refer(&tree, b"/store/missing", 4).is_empty());
    assert!(refer(&tree, b"/store/book[9]", 4).is_empty());
    assert!(refer(&tree, b"/store/book[0]/title/deeper", 4).is_empty());
    assert!(refer(&tree, b"/extra/title", 4).is_empty());
    // an index into something that is not an array
    assert!(refer(&tree, b"/store[0]", 4).is_empty());
}

#[test]
fn malformed_paths_error() {
    let tree = parsed(DOC);
    let mut out = [NodeId::ROOT; 2];
    assert_eq!(tree.path_refer("no-slash", &mut out).unwrap_err(), Error::BadPath);
    assert_eq!(tree.path_refer("", &mut out).unwrap_err(), Error::BadPath);
    assert_eq!(tree.path_refer("/a//b", &mut out).unwrap_err(), Error::BadPath);
    assert_eq!(tree.path_refer("/a/", &mut out).unwrap_err(), Error::BadPath);
    assert_eq!(tree.path_refer("/a[x]", &mut out).unwrap_err(), Error::BadPath);
    assert_eq!(
        tree.path_refer("/a/b/c/d/e/f/g/h/i", &mut out).unwrap_err(),
        Error::PathTooLong
    );
}

#[test]
fn duplicate_names_all_match() {
    let tree = parsed(br#"{"a":1,"a":2,"a":3}"#);
    let hits = refer(&tree, b"/a", 8);
    let vals: Vec<_> = hits.iter().map(|&id| tree.as_i64(id).unwrap()).collect();
    assert_eq!(vals, [1, 2, 3]);
}

#[test]
fn paths_work_without_interning() {
    let mut tree = JsonTree::new(TreeOptions {
        intern_names: false,
        ..TreeOptions::default()
    });
    tree.parse(DOC).unwrap();
    let hits = refer(&tree, b"/store/book[2]/price", 4);
    assert_eq!(tree.as_i64(hits[0]), Some(3));
    assert!(refer(&tree, b"/store/missing", 4).is_empty());
}
