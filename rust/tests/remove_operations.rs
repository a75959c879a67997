//! Best-effort removal: entries leave, structure stays.

use bptree::{Arena, BPlusTree};

type Tree<'a> = BPlusTree<'a, i32, i32, 4>;

fn populated(arena: &Arena, count: i32) -> Tree<'_> {
    let mut tree = Tree::new(arena).unwrap();
    for k in 0..count {
        tree.insert(k, k * 10).unwrap();
    }
    tree
}

#[test]
fn test_remove_existing_key() {
    let arena = Arena::new(Tree::arena_capacity_for(64)).unwrap();
    let mut tree = populated(&arena, 20);
    assert_eq!(tree.remove(&7), Some(70));
    assert_eq!(tree.get(&7), None);
    assert_eq!(tree.len(), 19);
    assert!(tree.check_invariants());
}

#[test]
fn test_remove_missing_key_is_silent() {
    let arena = Arena::new(Tree::arena_capacity_for(64)).unwrap();
    let mut tree = populated(&arena, 20);
    assert_eq!(tree.remove(&100), None);
    assert_eq!(tree.remove(&-1), None);
    assert_eq!(tree.len(), 20);
}

#[test]
fn test_remove_from_empty_tree() {
    let arena = Arena::new(Tree::arena_capacity_for(4)).unwrap();
    let mut tree = Tree::new(&arena).unwrap();
    assert_eq!(tree.remove(&0), None);
    assert!(tree.is_empty());
}

#[test]
fn test_remove_does_not_rebalance() {
    let arena = Arena::new(Tree::arena_capacity_for(128)).unwrap();
    let mut tree = populated(&arena, 60);
    let shape_before = tree.count_nodes_in_tree();
    let depth_before = tree.depth();
    let allocations_before = arena.allocations();

    for k in (0..60).step_by(2) {
        assert_eq!(tree.remove(&k), Some(k * 10));
    }

    // Underfilled (even empty) leaves stay where they are: no merging, no
    // redistribution, no shrinking, no allocation.
    assert_eq!(tree.count_nodes_in_tree(), shape_before);
    assert_eq!(tree.depth(), depth_before);
    assert_eq!(arena.allocations(), allocations_before);
    assert_eq!(tree.len(), 30);
    for k in 0..60 {
        let expected = if k % 2 == 1 { Some(k * 10) } else { None };
        assert_eq!(tree.get(&k), expected);
        assert_eq!(tree.find_linear(&k), expected);
        assert_eq!(tree.find_simd(&k), expected);
    }
    assert!(tree.check_invariants());
}

#[test]
fn test_remove_all_then_reinsert() {
    let arena = Arena::new(Tree::arena_capacity_for(128)).unwrap();
    let mut tree = populated(&arena, 40);
    for k in 0..40 {
        assert_eq!(tree.remove(&k), Some(k * 10));
    }
    assert_eq!(tree.len(), 0);
    assert!(tree.is_empty());
    assert!(tree.check_invariants());

    // Emptied leaves are still wired into the tree and accept new entries.
    for k in 0..40 {
        assert_eq!(tree.insert(k, k).unwrap(), None);
    }
    assert_eq!(tree.len(), 40);
    for k in 0..40 {
        assert_eq!(tree.get(&k), Some(k));
    }
    assert!(tree.check_invariants());
}

#[test]
fn test_remove_then_upsert_same_key() {
    let arena = Arena::new(Tree::arena_capacity_for(64)).unwrap();
    let mut tree = populated(&arena, 10);
    assert_eq!(tree.remove(&5), Some(50));
    assert_eq!(tree.insert(5, 555).unwrap(), None);
    assert_eq!(tree.get(&5), Some(555));
    assert_eq!(tree.len(), 10);
}

#[test]
fn test_remove_separator_key_keeps_descent_working() {
    let arena = Arena::new(Tree::arena_capacity_for(64)).unwrap();
    let mut tree = populated(&arena, 20);
    assert!(!tree.is_leaf_root());

    // Removing a key that also serves as a separator leaves the stale
    // separator in the branch; lookups must still route correctly.
    for k in 0..20 {
        assert_eq!(tree.remove(&k), Some(k * 10), "remove {}", k);
        for probe in 0..20 {
            let expected = if probe > k { Some(probe * 10) } else { None };
            assert_eq!(tree.find_binary(&probe), expected);
            assert_eq!(tree.find_simd(&probe), expected);
        }
        assert!(tree.check_invariants());
    }
}
