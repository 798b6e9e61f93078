// Explicit drops are used for clarity in these tests, marking the point at
// which the stored values must have been released.
#![allow(clippy::drop_non_drop)]

//! Value ownership tests for the ordered containers.
//!
//! These tests verify that every stored value is dropped exactly once, no
//! matter which operation removes it, and that a panic in user code (a
//! `Clone` impl or a comparator) leaves the container valid and leak-free.
//!
//! # Running Memory Tests
//!
//! These tests can be run normally:
//!
//! ```bash
//! cargo test --test memory_tests
//! ```
//!
//! For more thorough leak detection, run under LeakSanitizer:
//!
//! ```bash
//! RUSTFLAGS="-Zsanitizer=leak" cargo +nightly test --test memory_tests --target x86_64-unknown-linux-gnu
//! ```
//!
//! # Test Design
//!
//! Values are [`Tracked`] handles sharing one [`Counter`]. Each test performs
//! container operations, then checks the counter's drop total against the
//! number of values that must have been released at that point.

use std::cell::Cell;
use std::cmp::Ordering;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use yewtree::{AvlSet, OrderedMap, OrderedMultiSet, OrderedSet, RbSet};

// ===========================================================================
// Helper Types
// ===========================================================================

/// Shared drop and clone accounting.
struct Counter {
	drops: Cell<usize>,
	/// Clones left before `Tracked::clone` panics.
	clone_budget: Cell<usize>,
}

impl Counter {
	fn new() -> Rc<Self> {
		Rc::new(Counter { drops: Cell::new(0), clone_budget: Cell::new(usize::MAX) })
	}

	fn drops(&self) -> usize {
		self.drops.get()
	}

	fn make(self: &Rc<Self>, key: i32) -> Tracked {
		Tracked { key, counter: Rc::clone(self) }
	}
}

/// A value that reports its drop to a [`Counter`]. Ordered by `key` only.
struct Tracked {
	key: i32,
	counter: Rc<Counter>,
}

impl Drop for Tracked {
	fn drop(&mut self) {
		self.counter.drops.set(self.counter.drops.get() + 1);
	}
}

impl Clone for Tracked {
	fn clone(&self) -> Self {
		let budget = self.counter.clone_budget.get();
		if budget == 0 {
			panic!("clone budget exhausted at key {}", self.key);
		}
		self.counter.clone_budget.set(budget - 1);
		Tracked { key: self.key, counter: Rc::clone(&self.counter) }
	}
}

impl PartialEq for Tracked {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl Eq for Tracked {}

impl PartialOrd for Tracked {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Tracked {
	fn cmp(&self, other: &Self) -> Ordering {
		self.key.cmp(&other.key)
	}
}

fn filled_set(counter: &Rc<Counter>, n: i32) -> RbSet<Tracked> {
	(0..n).map(|k| counter.make(k)).collect()
}

// ===========================================================================
// Basic Memory Tests
// ===========================================================================

/// Dropping the container drops every value.
#[test]
fn drop_releases_every_value() {
	let counter = Counter::new();
	let set = filled_set(&counter, 1000);
	assert_eq!(counter.drops(), 0);

	drop(set);
	assert_eq!(counter.drops(), 1000);
	assert_eq!(Rc::strong_count(&counter), 1);
}

/// Erasing drops exactly the erased value.
#[test]
fn erase_drops_one_value() {
	let counter = Counter::new();
	let mut set = filled_set(&counter, 100);

	let pos = set.find(&counter.make(40));
	// The probe itself was dropped.
	assert_eq!(counter.drops(), 1);

	set.erase(pos).unwrap();
	assert_eq!(counter.drops(), 2);

	assert!(set.remove(&counter.make(41)));
	assert_eq!(counter.drops(), 4);

	// A value handed back to the caller is dropped by the caller.
	let popped = set.pop_first();
	assert_eq!(counter.drops(), 4);
	drop(popped);
	assert_eq!(counter.drops(), 5);

	set.assert_invariants();
	drop(set);
	assert_eq!(counter.drops(), 5 + 97);
}

/// `clear` drops everything and leaves a reusable container.
#[test]
fn clear_releases_every_value() {
	let counter = Counter::new();
	let mut set: AvlSet<Tracked> = (0..500).map(|k| counter.make(k)).collect();
	assert!(set.height() > 1);

	set.clear();
	assert_eq!(counter.drops(), 500);
	assert!(set.is_empty());
	assert_eq!(set.height(), 0);

	set.insert(counter.make(1));
	set.assert_invariants();
	drop(set);
	assert_eq!(counter.drops(), 501);
}

/// A rejected duplicate is dropped immediately, the stored value is kept.
#[test]
fn rejected_insert_drops_the_new_value() {
	let counter = Counter::new();
	let mut set: OrderedSet<Tracked> = OrderedSet::new();
	let (pos, inserted) = set.insert(counter.make(7));
	assert!(inserted);

	assert_eq!(set.insert(counter.make(7)), (pos, false));
	assert_eq!(counter.drops(), 1);
	assert_eq!(set.len(), 1);

	drop(set);
	assert_eq!(counter.drops(), 2);
}

/// Assigning over a mapped value drops the old one.
#[test]
fn assignment_drops_the_old_mapped_value() {
	let counter = Counter::new();
	let mut map: OrderedMap<i32, Tracked> = OrderedMap::new();
	map.insert(1, counter.make(100));

	map.insert_or_assign(1, counter.make(200));
	assert_eq!(counter.drops(), 1);
	assert_eq!(map.get(&1).map(|t| t.key), Some(200));

	// `insert` leaves the existing value and drops the offered one.
	map.insert(1, counter.make(300));
	assert_eq!(counter.drops(), 2);
	assert_eq!(map.get(&1).map(|t| t.key), Some(200));

	drop(map);
	assert_eq!(counter.drops(), 3);
}

/// Values stored under the non-unique policy are all released.
#[test]
fn duplicates_are_all_released() {
	let counter = Counter::new();
	let mut bag: OrderedMultiSet<Tracked> = OrderedMultiSet::new();
	for k in 0..300 {
		bag.insert(counter.make(k % 3));
	}
	assert_eq!(bag.erase_key(&counter.make(0)), 100);
	assert_eq!(counter.drops(), 101);

	drop(bag);
	assert_eq!(counter.drops(), 301);
}

// ===========================================================================
// Iterator Memory Tests
// ===========================================================================

/// Dropping a partially consumed owning iterator drops the rest.
#[test]
fn into_iter_early_drop() {
	let counter = Counter::new();
	let set = filled_set(&counter, 100);

	let mut iter = set.into_iter();
	let taken: Vec<Tracked> = iter.by_ref().take(10).collect();
	assert_eq!(taken.iter().map(|t| t.key).collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
	assert_eq!(counter.drops(), 0);

	drop(iter);
	assert_eq!(counter.drops(), 90);
	drop(taken);
	assert_eq!(counter.drops(), 100);
}

/// Borrowing iterators never drop values.
#[test]
fn borrowing_iterators_do_not_drop() {
	let counter = Counter::new();
	let set = filled_set(&counter, 100);

	let forward = set.iter().count();
	let backward = set.iter().rev().count();
	let ranged = set.range(counter.make(10)..counter.make(20)).count();
	assert_eq!((forward, backward, ranged), (100, 100, 10));
	// Only the two range bounds were dropped.
	assert_eq!(counter.drops(), 2);

	drop(set);
	assert_eq!(counter.drops(), 102);
}

/// Removing through a cursor drops the removed values once.
#[test]
fn cursor_removal() {
	let counter = Counter::new();
	let mut set = filled_set(&counter, 50);

	let mut cursor = set.cursor_mut();
	while let Some(value) = cursor.remove_next() {
		drop(value);
	}
	drop(cursor);

	assert!(set.is_empty());
	assert_eq!(counter.drops(), 50);
}

/// `retain` drops exactly the rejected values.
#[test]
fn retain_drops_rejected() {
	let counter = Counter::new();
	let mut set = filled_set(&counter, 100);

	set.retain(|t| t.key % 4 == 0);
	assert_eq!(counter.drops(), 75);
	assert_eq!(set.len(), 25);
	set.assert_invariants();
}

// ===========================================================================
// Transfer Tests
// ===========================================================================

/// `append` moves values without dropping or cloning any.
#[test]
fn append_moves_without_dropping() {
	let counter = Counter::new();
	counter.clone_budget.set(0);
	let mut left: RbSet<Tracked> = (0..10).map(|k| counter.make(k)).collect();
	let mut right: RbSet<Tracked> = (5..15).map(|k| counter.make(k)).collect();

	left.append(&mut right);
	assert_eq!(counter.drops(), 0);
	assert_eq!(left.len(), 15);
	// Colliding keys stay behind.
	assert_eq!(right.len(), 5);

	drop(left);
	drop(right);
	assert_eq!(counter.drops(), 20);
}

/// Moving a container out leaves an empty one and drops nothing.
#[test]
fn take_moves_without_dropping() {
	let counter = Counter::new();
	let mut set = filled_set(&counter, 10);

	let moved = std::mem::take(&mut set);
	assert_eq!(counter.drops(), 0);
	assert!(set.is_empty());

	drop(set);
	assert_eq!(counter.drops(), 0);
	drop(moved);
	assert_eq!(counter.drops(), 10);
}

/// Cloning produces independently owned values.
#[test]
fn clone_owns_its_values() {
	let counter = Counter::new();
	let set = filled_set(&counter, 100);
	let copy = set.clone();

	drop(set);
	assert_eq!(counter.drops(), 100);
	assert_eq!(copy.len(), 100);
	copy.assert_invariants();

	drop(copy);
	assert_eq!(counter.drops(), 200);
}

// ===========================================================================
// Panic Safety Tests
// ===========================================================================

/// A clone that panics part way releases the partial copy and leaves the
/// source untouched.
#[test]
fn panicking_clone_does_not_leak() {
	let counter = Counter::new();
	let set = filled_set(&counter, 100);
	counter.clone_budget.set(50);

	let result = panic::catch_unwind(AssertUnwindSafe(|| set.clone()));
	assert!(result.is_err());
	// The 50 successful clones were dropped with the partial copy.
	assert_eq!(counter.drops(), 50);

	assert_eq!(set.len(), 100);
	set.assert_invariants();
	drop(set);
	assert_eq!(counter.drops(), 150);
}

/// `clone_from` that panics leaves the target empty and usable.
#[test]
fn panicking_clone_from_leaves_target_empty() {
	let counter = Counter::new();
	let source = filled_set(&counter, 100);
	let mut target: RbSet<Tracked> = (1000..1010).map(|k| counter.make(k)).collect();
	counter.clone_budget.set(30);

	let result = panic::catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));
	assert!(result.is_err());
	// The target's 10 old values and the 30 partial clones.
	assert_eq!(counter.drops(), 40);

	assert!(target.is_empty());
	target.assert_invariants();
	target.insert(counter.make(1));
	assert_eq!(target.len(), 1);

	counter.clone_budget.set(usize::MAX);
	target.clone_from(&source);
	assert_eq!(target.len(), 100);
	assert_eq!(counter.drops(), 41);
}

/// A comparator that panics during insert leaves the tree unchanged and
/// drops the offered value.
#[test]
fn panicking_comparator_does_not_leak() {
	let counter = Counter::new();
	let poisoned = |a: &Tracked, b: &Tracked| {
		if a.key < 0 || b.key < 0 {
			panic!("poisoned key");
		}
		a.key.cmp(&b.key)
	};
	let mut set: OrderedSet<Tracked, _> = OrderedSet::with_comparator(poisoned);
	for k in 0..20 {
		set.insert(counter.make(k));
	}

	let result = panic::catch_unwind(AssertUnwindSafe(|| set.insert(counter.make(-1))));
	assert!(result.is_err());
	assert_eq!(counter.drops(), 1);
	assert_eq!(set.len(), 20);
	set.assert_invariants();

	drop(set);
	assert_eq!(counter.drops(), 21);
}

// ===========================================================================
// Stress Tests
// ===========================================================================

/// Many small operations balance out to zero live values.
#[test]
fn stress_small_ops() {
	let counter = Counter::new();
	let mut set: AvlSet<Tracked> = AvlSet::new();
	let mut created = 0;

	for round in 0..20 {
		for k in 0..100 {
			set.insert(counter.make((k * 7 + round) % 150));
			created += 1;
		}
		for k in (0..150).step_by(3) {
			set.remove(&counter.make(k));
			created += 1;
		}
	}
	set.assert_invariants();
	let live = set.len();
	drop(set);
	assert_eq!(counter.drops(), created);
	assert!(live > 0);
	assert_eq!(Rc::strong_count(&counter), 1);
}
