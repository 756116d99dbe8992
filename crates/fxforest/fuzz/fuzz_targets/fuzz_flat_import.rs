//! Fuzz target for flat-array tree import.
//!
//! Arbitrary bytes are decoded into the parallel arrays an exporter would
//! produce. Import must either return an error or a tree on which both
//! traversal strategies agree; it must never panic.
//!
//! Run with:
//! ```sh
//! cargo +nightly fuzz run fuzz_flat_import
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

use fxforest::inference::{features, StandardTraversal, TreeTraversal, UnrolledTraversal};
use fxforest::repr::{FlatTreeArrays, Q16, Tree};

/// Bytes per encoded node: left, right, feature, threshold (2), vote.
const NODE_BYTES: usize = 6;

fuzz_target!(|data: &[u8]| {
    let Some((&header, rest)) = data.split_first() else {
        return;
    };

    // Low bits of the header perturb one array's length to reach the
    // length checks; the row of features comes from the tail.
    let n_nodes = rest.len() / NODE_BYTES;
    let (nodes, tail) = rest.split_at(n_nodes * NODE_BYTES);

    let mut left = Vec::with_capacity(n_nodes);
    let mut right = Vec::with_capacity(n_nodes);
    let mut feature = Vec::with_capacity(n_nodes);
    let mut threshold = Vec::with_capacity(n_nodes);
    let mut vote = Vec::with_capacity(n_nodes);
    for chunk in nodes.chunks_exact(NODE_BYTES) {
        left.push(i32::from(chunk[0] as i8));
        right.push(i32::from(chunk[1] as i8));
        feature.push(i32::from(chunk[2] as i8));
        threshold.push(Q16::from_raw(i16::from_le_bytes([chunk[3], chunk[4]])));
        vote.push(chunk[5] % 3);
    }
    match header & 0b11 {
        1 => {
            vote.pop();
        }
        2 => feature.push(0),
        _ => {}
    }

    let Ok(tree) = Tree::from_flat_arrays(FlatTreeArrays {
        children_left: &left,
        children_right: &right,
        feature: &feature,
        threshold: &threshold,
        leaf_vote: &vote,
    }) else {
        return;
    };

    let mut raw = [0i16; 6];
    for (slot, pair) in raw.iter_mut().zip(tail.chunks_exact(2).chain(nodes.chunks_exact(2))) {
        *slot = i16::from_le_bytes([pair[0], pair[1]]);
    }
    let fv = features::from_raw(raw);

    let layout = UnrolledTraversal::build_tree_state(&tree);
    assert_eq!(
        StandardTraversal::traverse_tree(&tree, &(), &fv),
        UnrolledTraversal::traverse_tree(&tree, &layout, &fv)
    );
    assert!(fxforest::inference::evaluate_counted(&tree, &fv).1 <= tree.depth());
});
