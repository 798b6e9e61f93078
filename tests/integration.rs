//! # Integration Tests for the Ordered Containers
//!
//! This module contains end-to-end integration tests that exercise the set and
//! map adapters through their public API with realistic workloads.

use rand::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use yewtree::{
	AvlMap, AvlSet, Descending, Error, OrderedMap, OrderedMultiMap, OrderedMultiSet, OrderedSet, Position,
	RbMap, RbSet,
};

// ===========================================================================
// Large Scale Operation Tests
// ===========================================================================

#[test]
fn large_scale_insert_and_lookup() {
	let mut map: AvlMap<i32, i32> = AvlMap::new();

	for i in 0..10_000 {
		assert!(map.insert(i, i * 10).1);
	}

	map.assert_invariants();
	assert_eq!(map.len(), 10_000);

	for i in 0..10_000 {
		assert_eq!(map.get(&i), Some(&(i * 10)), "Failed to find key {}", i);
	}
	assert_eq!(map.get(&10_000), None);
}

#[test]
fn large_scale_insert_and_remove() {
	let mut map: RbMap<i32, i32> = RbMap::new();

	for i in 0..10_000 {
		map.insert(i, i);
	}

	map.assert_invariants();

	for i in 0..10_000 {
		assert_eq!(map.remove(&i), Some(i), "Failed to remove key {}", i);
	}

	map.assert_invariants();
	assert!(map.is_empty());
}

#[test]
fn large_scale_random_operations() {
	let mut map: OrderedMap<i32, i32> = OrderedMap::new();
	let mut rng = StdRng::seed_from_u64(0x5eed);
	let mut expected: BTreeMap<i32, i32> = BTreeMap::new();

	for _ in 0..10_000 {
		let key: i32 = rng.random_range(0..1000);
		match rng.random_range(0..3u8) {
			0 => {
				let value = key * 10;
				map.insert_or_assign(key, value);
				expected.insert(key, value);
			}
			1 => {
				assert_eq!(map.remove(&key), expected.remove(&key));
			}
			_ => {
				assert_eq!(map.get(&key), expected.get(&key));
			}
		}
	}

	map.assert_invariants();
	assert_eq!(map.len(), expected.len());
	assert!(map.iter().eq(expected.iter()));
}

// ===========================================================================
// Full Deletion Tests
// ===========================================================================

#[test]
fn delete_all_random() {
	let mut rng = StdRng::seed_from_u64(17);
	let mut keys: Vec<i32> = (0..5000).collect();
	keys.shuffle(&mut rng);

	let mut set: AvlSet<i32> = keys.iter().copied().collect();
	keys.shuffle(&mut rng);
	for k in &keys {
		assert!(set.remove(k));
	}
	set.assert_invariants();
	assert!(set.is_empty());
	assert_eq!(set.begin(), set.end());
	assert_eq!(set.height(), 0);
}

#[test]
fn delete_every_other() {
	let mut set: RbSet<i32> = (0..1000).collect();
	set.retain(|v| v % 2 == 1);
	set.assert_invariants();
	assert_eq!(set.len(), 500);
	assert!(set.iter().copied().eq((0..1000).filter(|v| v % 2 == 1)));
}

// ===========================================================================
// Iteration Tests
// ===========================================================================

#[test]
fn forward_then_reverse_scan() {
	let set: AvlSet<i32> = (0..100).rev().collect();

	let forward: Vec<i32> = set.iter().copied().collect();
	let mut reverse: Vec<i32> = set.iter().rev().copied().collect();
	reverse.reverse();
	assert_eq!(forward, reverse);
	assert_eq!(forward, (0..100).collect::<Vec<_>>());
}

#[test]
fn position_walk_both_directions() {
	let set: RbSet<i32> = (1..=5).collect();

	let mut pos = set.rbegin();
	let mut seen = Vec::new();
	while pos != set.rend() {
		seen.push(*set.value_at(pos).unwrap());
		pos = set.prev_pos(pos);
	}
	assert_eq!(seen, vec![5, 4, 3, 2, 1]);

	// Stepping around the end position wraps.
	assert_eq!(set.prev_pos(set.end()), set.rbegin());
	assert_eq!(set.next_pos(set.end()), set.begin());
	assert_eq!(set.prev_pos(set.begin()), set.end());
}

#[test]
fn owned_iteration_in_both_directions() {
	let map: OrderedMap<String, usize> = ["pear", "apple", "fig"].iter().map(|s| (s.to_string(), s.len())).collect();
	let mut iter = map.into_iter();
	assert_eq!(iter.len(), 3);
	assert_eq!(iter.next(), Some(("apple".to_string(), 5)));
	assert_eq!(iter.next_back(), Some(("pear".to_string(), 4)));
	assert_eq!(iter.next(), Some(("fig".to_string(), 3)));
	assert_eq!(iter.next(), None);
}

// ===========================================================================
// Range Query Tests
// ===========================================================================

#[test]
fn range_query_forward_and_reverse() {
	let map: AvlMap<i32, i32> = (0..100).map(|k| (k * 2, k)).collect();

	let keys: Vec<i32> = map.range(10..20).map(|(k, _)| *k).collect();
	assert_eq!(keys, vec![10, 12, 14, 16, 18]);

	let keys: Vec<i32> = map.range(11..=19).rev().map(|(k, _)| *k).collect();
	assert_eq!(keys, vec![18, 16, 14, 12]);

	assert_eq!(map.range(..4).count(), 2);
	assert_eq!(map.range(196..).count(), 2);
	assert_eq!(map.range(..).count(), 100);
}

#[test]
fn range_query_nonexistent_bounds() {
	let set: RbSet<i32> = (0..10).map(|v| v * 10).collect();

	assert_eq!(set.range(1000..2000).count(), 0);
	assert_eq!(set.range(-50..-10).count(), 0);
	assert_eq!(set.range(41..49).count(), 0);
	assert_eq!(set.range(15..=15).count(), 0);
	// Inverted ranges are empty rather than a panic.
	assert_eq!(set.range(80..20).count(), 0);
}

#[test]
fn bounds_on_sparse_keys() {
	let set: AvlSet<i32> = [10, 20, 30].into();

	assert_eq!(set.value_at(set.lower_bound(&20)), Some(&20));
	assert_eq!(set.value_at(set.upper_bound(&20)), Some(&30));
	assert_eq!(set.value_at(set.lower_bound(&25)), Some(&30));
	assert!(set.lower_bound(&31).is_end());
	assert!(set.upper_bound(&30).is_end());
	assert_eq!(set.value_at(set.lower_bound(&i32::MIN)), Some(&10));

	let (first, last) = set.equal_range(&15);
	assert_eq!(first, last);
	assert_eq!(set.value_at(first), Some(&20));
}

// ===========================================================================
// Cursor Tests
// ===========================================================================

#[test]
fn cursor_seek_and_step() {
	let map: OrderedMap<u32, &str> = OrderedMap::from([(1, "one"), (3, "three"), (5, "five")]);
	let mut cursor = map.cursor();

	cursor.seek(&2);
	assert_eq!(cursor.peek_prev(), Some(&(1, "one")));
	assert_eq!(cursor.next(), Some(&(3, "three")));
	assert_eq!(cursor.next(), Some(&(5, "five")));
	assert_eq!(cursor.next(), None);
	assert!(cursor.position().is_end());
	assert_eq!(cursor.prev(), Some(&(5, "five")));

	assert!(cursor.seek_exact(&1));
	assert!(!cursor.seek_exact(&4));
	cursor.seek_for_prev(&4);
	assert_eq!(cursor.prev(), Some(&(3, "three")));
}

#[test]
fn remove_via_cursor() {
	let mut set: OrderedSet<u32> = (0..100).collect();
	let mut cursor = set.cursor_mut();
	cursor.seek(&20);

	// Drop everything in [20, 60).
	while cursor.peek_next().is_some_and(|v| *v < 60) {
		cursor.remove_next();
	}
	assert_eq!(cursor.peek_next(), Some(&60));
	assert_eq!(cursor.remove_prev(), Some(19));
	drop(cursor);

	set.assert_invariants();
	assert_eq!(set.len(), 59);
	assert!(set.iter().copied().eq((0..19).chain(60..100)));
}

#[test]
fn insert_via_cursor() {
	let mut set: OrderedSet<u32> = [10, 30].into();
	let mut cursor = set.cursor_mut();
	assert!(cursor.insert(20));
	assert_eq!(cursor.next(), Some(&20));
	assert_eq!(cursor.next(), Some(&30));
	assert!(!cursor.insert(10));
	assert_eq!(cursor.peek_next(), Some(&10));
	drop(cursor);
	assert!(set.iter().copied().eq([10, 20, 30]));
}

// ===========================================================================
// Position Handling
// ===========================================================================

#[test]
fn erase_returns_the_following_position() {
	let mut set: AvlSet<i32> = (0..10).collect();
	let pos = set.find(&4);
	let next = set.erase(pos).unwrap();
	assert_eq!(set.value_at(next), Some(&5));
	let last = set.rbegin();
	assert!(set.erase(last).unwrap().is_end());
	set.assert_invariants();
}

#[test]
fn stale_and_end_positions_are_rejected() {
	let mut set: RbSet<i32> = (0..10).collect();
	let pos = set.find(&3);
	set.erase(pos).unwrap();

	assert!(!set.is_valid(pos));
	assert_eq!(set.value_at(pos), None);
	assert!(matches!(set.erase(pos), Err(Error::StaleHandle(_))));
	assert_eq!(set.erase(Position::End), Err(Error::EndPosition));

	// The freed slot is reused, but the old handle still does not alias it.
	set.insert(3);
	assert!(!set.is_valid(pos));
	assert_eq!(set.len(), 10);
}

#[test]
fn positions_survive_unrelated_inserts_and_erases() {
	let mut map: AvlMap<i32, char> = AvlMap::new();
	let (held, _) = map.insert(500, 'x');
	for k in 0..1000 {
		map.insert(k, 'y');
	}
	for k in (0..1000).filter(|k| k % 3 == 0) {
		map.remove(&k);
	}
	assert_eq!(map.entry_at(held), Some((&500, &'x')));
	*map.value_at_mut(held).unwrap() = 'z';
	assert_eq!(map[&500], 'z');
}

#[test]
fn erase_range_removes_half_open_run() {
	let mut set: AvlSet<i32> = (0..20).collect();
	let first = set.find(&5);
	let last = set.find(&15);
	let returned = set.erase_range(first, last).unwrap();
	assert_eq!(returned, last);
	set.assert_invariants();
	assert!(set.iter().copied().eq((0..5).chain(15..20)));

	// Erasing an empty range is a no-op.
	let here = set.find(&16);
	assert_eq!(set.erase_range(here, here), Ok(here));
	assert_eq!(set.len(), 10);

	// Erasing to the end.
	let tail = set.find(&17);
	let end = set.end();
	assert!(set.erase_range(tail, end).unwrap().is_end());
	assert_eq!(set.last(), Some(&16));
}

#[test]
fn erase_range_with_unreachable_end_changes_nothing() {
	let mut set: RbSet<i32> = (0..10).collect();
	let first = set.find(&7);
	let last = set.find(&2);
	assert_eq!(set.erase_range(first, last), Err(Error::EndPosition));
	assert_eq!(set.len(), 10);
	set.assert_invariants();
}

// ===========================================================================
// Duplicate Key Tests
// ===========================================================================

#[test]
fn multimap_equal_range_keeps_insertion_order() {
	let mut map: OrderedMultiMap<&str, u32> = OrderedMultiMap::new();
	for (i, key) in ["b", "a", "b", "c", "b", "a"].into_iter().enumerate() {
		assert!(map.insert(key, i as u32).1);
	}
	map.assert_invariants();

	assert_eq!(map.count(&"b"), 3);
	let (mut pos, last) = map.equal_range(&"b");
	let mut values = Vec::new();
	while pos != last {
		values.push(*map.entry_at(pos).unwrap().1);
		pos = map.next_pos(pos);
	}
	assert_eq!(values, vec![0, 2, 4]);

	// `get` finds the earliest of the equal keys.
	assert_eq!(map.get(&"a"), Some(&1));
	assert_eq!(map.erase_key(&"b"), 3);
	assert_eq!(map.len(), 3);
}

#[test]
fn multiset_remove_takes_one_copy() {
	let mut bag: OrderedMultiSet<char> = "mississippi".chars().collect();
	assert_eq!(bag.count(&'s'), 4);
	assert!(bag.remove(&'s'));
	assert_eq!(bag.count(&'s'), 3);
	assert_eq!(bag.len(), 10);
	assert!(!bag.remove(&'z'));
	bag.assert_invariants();
}

// ===========================================================================
// Whole-Container Tests
// ===========================================================================

#[test]
fn clone_is_deep_and_independent() {
	let original: AvlMap<i32, String> = (0..50).map(|k| (k, k.to_string())).collect();
	let mut copy = original.clone();
	copy.assert_invariants();
	assert_eq!(copy, original);
	assert_eq!(copy.draw(), original.draw());

	copy.insert_or_assign(7, "seven".to_string());
	copy.remove(&8);
	assert_eq!(original.get(&7).map(String::as_str), Some("7"));
	assert!(original.contains_key(&8));
	assert_ne!(copy, original);
}

#[test]
fn move_and_take_leave_valid_trees() {
	let mut set: RbSet<i32> = (0..10).collect();
	let moved = std::mem::take(&mut set);
	assert!(set.is_empty());
	set.assert_invariants();
	assert_eq!(moved.len(), 10);

	set.insert(42);
	assert_eq!(set.first(), Some(&42));
}

#[test]
fn append_moves_non_colliding_elements() {
	let mut left: OrderedSet<i32> = [1, 3, 5].into();
	let mut right: OrderedSet<i32> = [2, 3, 4].into();
	left.append(&mut right);
	left.assert_invariants();
	right.assert_invariants();
	assert!(left.iter().copied().eq([1, 2, 3, 4, 5]));
	assert!(right.iter().copied().eq([3]));

	let mut bag: OrderedMultiSet<i32> = [1, 3].into();
	let mut other: OrderedMultiSet<i32> = [3, 4].into();
	bag.append(&mut other);
	assert!(other.is_empty());
	assert_eq!(bag.count(&3), 2);
}

#[test]
fn append_keeps_positions_of_elements_left_behind() {
	let mut left: RbSet<i32> = [3].into();
	let mut right: RbSet<i32> = RbSet::new();
	let (five, _) = right.insert(5);
	let (three, _) = right.insert(3);
	let (seven, _) = right.insert(7);

	left.append(&mut right);
	left.assert_invariants();
	right.assert_invariants();

	// Moved elements no longer resolve in the source tree.
	assert_eq!(right.value_at(five), None);
	assert_eq!(right.value_at(seven), None);
	assert!(!right.is_valid(five));
	assert!(matches!(right.erase(seven), Err(Error::StaleHandle(_))));

	// The colliding element is still reachable through its old position.
	assert_eq!(right.value_at(three), Some(&3));
	assert_eq!(right.begin(), three);
	assert!(left.iter().copied().eq([3, 5, 7]));

	// A later insert into the source must not revive the moved handles.
	right.insert(9);
	assert_eq!(right.value_at(five), None);
	assert_eq!(right.value_at(seven), None);
}

#[test]
fn set_relations() {
	let small: AvlSet<u8> = [2, 4].into();
	let big: AvlSet<u8> = (0..10).collect();
	let odd: AvlSet<u8> = [1, 3, 5].into();
	assert!(small.is_subset(&big));
	assert!(big.is_superset(&small));
	assert!(small.is_disjoint(&odd));
	assert!(!big.is_disjoint(&odd));
}

// ===========================================================================
// Comparator Tests
// ===========================================================================

#[test]
fn descending_comparator() {
	let mut set: OrderedSet<i32, Descending> = OrderedSet::new();
	set.extend([3, 1, 4, 1, 5, 9, 2, 6]);
	set.assert_invariants();
	assert!(set.iter().copied().eq([9, 6, 5, 4, 3, 2, 1]));
	assert_eq!(set.value_at(set.lower_bound(&7)), Some(&6));
	assert_eq!(set.range(6..=2).copied().collect::<Vec<_>>(), vec![6, 5, 4, 3, 2]);
}

#[test]
fn closure_comparator_orders_by_length() {
	let by_len = |a: &String, b: &String| a.len().cmp(&b.len()).then_with(|| a.cmp(b));
	let mut set: OrderedSet<String, _> = OrderedSet::with_comparator(by_len);
	for word in ["ccc", "a", "bb", "aa", "b"] {
		set.insert(word.to_string());
	}
	set.assert_invariants();
	let words: Vec<&str> = set.iter().map(String::as_str).collect();
	assert_eq!(words, vec!["a", "b", "aa", "bb", "ccc"]);
	assert!(set.contains(&"bb".to_string()));
}

#[test]
fn case_insensitive_map() {
	let fold = |a: &String, b: &String| -> Ordering { a.to_lowercase().cmp(&b.to_lowercase()) };
	let mut map: OrderedMap<String, u32, _> = OrderedMap::with_comparator(fold);
	assert!(map.insert("Hello".to_string(), 1).1);
	assert!(!map.insert("HELLO".to_string(), 2).1);
	assert_eq!(map.get(&"hello".to_string()), Some(&1));
	assert_eq!(map.first_key_value().map(|(k, _)| k.as_str()), Some("Hello"));
}

// ===========================================================================
// Edge Case Tests
// ===========================================================================

#[test]
fn single_element_operations() {
	let mut set: AvlSet<i32> = AvlSet::new();
	assert_eq!(set.first(), None);
	assert!(set.begin().is_end());

	set.insert(7);
	assert_eq!(set.begin(), set.rbegin());
	assert_eq!(set.first(), set.last());
	assert_eq!(set.height(), 1);
	assert_eq!(set.pop_last(), Some(7));
	assert_eq!(set.pop_last(), None);
}

#[test]
fn boundary_keys_i32() {
	let set: RbSet<i32> = [i32::MIN, -1, 0, 1, i32::MAX].into();
	assert_eq!(set.first(), Some(&i32::MIN));
	assert_eq!(set.last(), Some(&i32::MAX));
	assert_eq!(set.range(i32::MIN..0).count(), 2);
	assert_eq!(set.range(0..=i32::MAX).count(), 3);
}

#[test]
fn string_keys_borrowed_lookup() {
	let mut map: RbMap<String, usize> = RbMap::new();
	let long = "z".repeat(1000);
	for (i, word) in ["", "a", "abc", "abcdefghij", long.as_str()].iter().enumerate() {
		map.insert(word.to_string(), i);
	}
	map.assert_invariants();
	assert_eq!(map.get(""), Some(&0));
	assert_eq!(map.get("abc"), Some(&2));
	assert!(map.contains_key("abcdefghij"));
	assert_eq!(map.remove("a"), Some(1));
	assert_eq!(map.range::<str, _>((std::ops::Bound::Included("ab"), std::ops::Bound::Excluded("b"))).count(), 2);
}

#[test]
fn zero_sized_values() {
	let mut set: AvlSet<()> = AvlSet::new();
	assert!(set.insert(()).1);
	assert!(!set.insert(()).1);
	assert_eq!(set.len(), 1);

	let mut bag: OrderedMultiSet<()> = OrderedMultiSet::new();
	for _ in 0..100 {
		bag.insert(());
	}
	bag.assert_invariants();
	assert_eq!(bag.count(&()), 100);
}

#[test]
fn reserve_and_try_insert() {
	let mut set: AvlSet<u64> = AvlSet::new();
	set.reserve(64);
	assert!(set.capacity() >= 64);
	for k in 0..64 {
		assert!(set.try_insert(k).unwrap().1);
	}
	assert!(!set.try_insert(3).unwrap().1);
	set.try_reserve(10).unwrap();
	assert_eq!(set.len(), 64);
}

// ===========================================================================
// Height Tests
// ===========================================================================

#[test]
fn height_grows_logarithmically() {
	let mut avl: AvlSet<u32> = AvlSet::new();
	let mut rb: RbSet<u32> = RbSet::new();
	let mut last = 0;
	for k in 0..(1 << 12) {
		avl.insert(k);
		rb.insert(k);
		assert!(avl.height() >= last);
		last = avl.height();
	}
	// Sequential inserts make AVL perfectly balanced at 2^n - 1 elements.
	assert!(avl.height() <= 13);
	assert!(rb.height() <= 24);
}
