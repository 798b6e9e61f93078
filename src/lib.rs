//! # Yewtree: Self-Balancing Ordered Containers
//!
//! This crate provides one generic binary-search-tree engine, parameterized
//! over a **balancing policy**, a **comparator**, a **key projection** and a
//! **uniqueness flag**. Ordered sets, multisets, maps and multimaps are all
//! thin adapters over that single engine.
//!
//! ## Design Overview
//!
//! ```text
//!   OrderedSet / OrderedMap / ...        (set.rs, map.rs: key projection + UNIQUE)
//!                 │
//!                 ▼
//!   GenericTree<V, X, C, P, UNIQUE>      (lib.rs: locate, link/unlink, lookups)
//!        │                  │
//!        ▼                  ▼
//!   P: Balance           RawTree<V, P::Meta>   (node.rs: arena, rotations,
//!   Avl | RedBlack   ──► rotate_left/right      successor/predecessor)
//!   | Treap
//! ```
//!
//! **Arena-owned nodes**: every node lives in a slot arena owned by its tree.
//! Parent and child links are [`NodeId`] handles, so the cyclic link graph is
//! plain data and destruction never recurses.
//!
//! **Stable positions**: a [`Position`] names one element. Insertions never
//! invalidate positions, and an erase invalidates only the erased element's
//! position. Erasing a node with two children relinks its in-order successor
//! *node* into its place instead of moving values between nodes.
//!
//! **Policies**: [`Avl`] keeps sibling heights within one of each other;
//! [`RedBlack`] keeps equal black-height on every path; [`Treap`] keeps a heap
//! order on random per-node priorities. All of them are built from the same
//! two rotations.
//!
//! ## Basic Usage
//!
//! ```
//! use yewtree::{AvlSet, OrderedMap};
//!
//! let mut set: AvlSet<i32> = [30, 10, 20].into_iter().collect();
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![10, 20, 30]);
//!
//! let (pos, inserted) = set.insert(20);
//! assert!(!inserted);
//! assert_eq!(set.value_at(pos), Some(&20));
//!
//! let mut map: OrderedMap<&str, u32> = OrderedMap::new();
//! map.insert("b", 2);
//! map.insert("a", 1);
//! assert_eq!(map.first_key_value(), Some((&"a", &1)));
//! ```
//!
//! ## Thread Safety
//!
//! Trees are ordinary owned values: `Send`/`Sync` when their contents are,
//! with no interior mutability. Share read-only across threads freely;
//! mutation needs `&mut` and therefore external synchronization.

// Generic parameter lists are long by nature in this crate
#![allow(clippy::type_complexity)]

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Bound, RangeBounds};

pub mod balance;
pub mod compare;
mod draw;
pub mod error;
pub mod iter;
pub mod map;
pub mod node;
pub mod set;

pub use balance::{Avl, Balance, Color, RedBlack, Treap};
pub use compare::{Compare, Descending, First, Identity, KeyOf, Natural};
pub use error::{Error, Result};
pub use iter::{Cursor, CursorMut, IntoIter, Iter, Position, Range};
pub use map::{AvlMap, MapAdapter, OrderedMap, OrderedMultiMap, RbMap, TreapMap};
pub use node::{Detached, NodeId, RawTree};
pub use set::{AvlSet, OrderedMultiSet, OrderedSet, RbSet, SetAdapter, TreapSet};

use node::Node;

// ---------------------------------------------------------------------------
// Core Tree Structure
// ---------------------------------------------------------------------------

/// A self-balancing binary search tree.
///
/// # Type Parameters
///
/// - `V`: The stored value type.
/// - `X`: Key projection ([`KeyOf<V>`]): [`Identity`] for sets, [`First`] for
///   `(key, mapped)` pairs.
/// - `C`: Comparator over the projected key ([`Compare`]).
/// - `P`: Balancing policy ([`Avl`] or [`RedBlack`]).
/// - `UNIQUE`: When `true`, inserting a value whose key is already present is
///   refused. When `false`, equal keys are kept in insertion order.
///
/// Most code uses one of the adapter aliases ([`OrderedSet`], [`OrderedMap`],
/// ...) rather than naming this type directly.
pub struct GenericTree<V, X, C, P: Balance, const UNIQUE: bool> {
	/// Links, metadata and the root/min/max cache.
	raw: RawTree<V, P::Meta>,

	/// The strict weak order over projected keys.
	cmp: C,

	marker: PhantomData<fn() -> (X, P)>,
}

impl<V, X, C: Default, P: Balance, const UNIQUE: bool> Default for GenericTree<V, X, C, P, UNIQUE> {
	fn default() -> Self {
		Self::with_comparator(C::default())
	}
}

// ---------------------------------------------------------------------------
// Construction, capacity and positions (no ordering required)
// ---------------------------------------------------------------------------

impl<V, X, C, P: Balance, const UNIQUE: bool> GenericTree<V, X, C, P, UNIQUE> {
	/// Creates an empty tree ordered by `C::default()`.
	pub fn new() -> Self
	where
		C: Default,
	{
		Self::with_comparator(C::default())
	}

	/// Creates an empty tree with room for `capacity` elements.
	pub fn with_capacity(capacity: usize) -> Self
	where
		C: Default,
	{
		Self::with_capacity_and_comparator(capacity, C::default())
	}

	/// Creates an empty tree ordered by `cmp`.
	///
	/// ```
	/// use yewtree::{GenericTree, Identity, RedBlack};
	///
	/// let mut tree: GenericTree<i32, Identity, _, RedBlack, true> =
	/// 	GenericTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
	/// tree.extend([1, 3, 2]);
	/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
	/// ```
	pub fn with_comparator(cmp: C) -> Self {
		GenericTree { raw: RawTree::new(), cmp, marker: PhantomData }
	}

	pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
		GenericTree { raw: RawTree::with_capacity(capacity), cmp, marker: PhantomData }
	}

	/// Returns the number of elements in the tree.
	#[inline]
	pub fn len(&self) -> usize {
		self.raw.len()
	}

	/// Returns `true` if the tree contains no elements.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.raw.is_empty()
	}

	/// Number of levels on the longest root-to-leaf path (`0` when empty).
	///
	/// Walks the whole tree, so this is O(n).
	pub fn height(&self) -> usize {
		self.raw.height()
	}

	/// Number of elements the tree can hold without reallocating.
	pub fn capacity(&self) -> usize {
		self.raw.arena.capacity()
	}

	/// Reserves room for at least `additional` more elements.
	///
	/// # Panics
	///
	/// Panics if the node arena would exceed `u32::MAX` slots.
	pub fn reserve(&mut self, additional: usize) {
		self.raw.arena.reserve(additional);
	}

	/// Reserves room for at least `additional` more elements, reporting
	/// failure instead of aborting.
	pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
		self.raw.arena.try_reserve(additional)
	}

	/// The comparator this tree orders by.
	pub fn comparator(&self) -> &C {
		&self.cmp
	}

	/// Read-only access to the link structure, for diagnostics and tests.
	pub fn raw(&self) -> &RawTree<V, P::Meta> {
		&self.raw
	}

	/// Position of the minimum element, or `End` when empty.
	#[inline]
	pub fn begin(&self) -> Position {
		self.raw.leftmost.into()
	}

	/// The past-the-end position.
	#[inline]
	pub fn end(&self) -> Position {
		Position::End
	}

	/// Position of the maximum element, or `End` when empty. Start of reverse
	/// traversal.
	#[inline]
	pub fn rbegin(&self) -> Position {
		self.raw.rightmost.into()
	}

	/// End of reverse traversal. Same as [`end`](Self::end).
	#[inline]
	pub fn rend(&self) -> Position {
		Position::End
	}

	/// The position after `pos` in sorted order.
	///
	/// The positions form a ring: the maximum is followed by `End`, and `End`
	/// by the minimum.
	///
	/// # Panics
	///
	/// Panics if `pos` is stale.
	pub fn next_pos(&self, pos: Position) -> Position {
		match pos {
			Position::At(id) => self.raw.successor(id).into(),
			Position::End => self.begin(),
		}
	}

	/// The position before `pos` in sorted order. `prev_pos(end())` is the
	/// maximum and `prev_pos(begin())` is `End`.
	///
	/// # Panics
	///
	/// Panics if `pos` is stale.
	pub fn prev_pos(&self, pos: Position) -> Position {
		match pos {
			Position::At(id) => self.raw.predecessor(id).into(),
			Position::End => self.rbegin(),
		}
	}

	/// The value at `pos`, or `None` for `End` or a stale position.
	#[inline]
	pub fn value_at(&self, pos: Position) -> Option<&V> {
		let id = pos.node()?;
		self.raw.arena.get(id).map(|node| &node.value)
	}

	pub(crate) fn value_at_mut(&mut self, pos: Position) -> Option<&mut V> {
		let id = pos.node()?;
		self.raw.arena.get_mut(id).map(|node| &mut node.value)
	}

	/// # Panics
	///
	/// Panics if `id` is stale.
	pub(crate) fn value_mut(&mut self, id: NodeId) -> &mut V {
		&mut self.raw.arena[id].value
	}

	/// Returns `true` if `pos` is `End` or names a live element.
	pub fn is_valid(&self, pos: Position) -> bool {
		match pos {
			Position::At(id) => self.raw.contains(id),
			Position::End => true,
		}
	}

	/// The minimum element.
	pub fn first(&self) -> Option<&V> {
		self.raw.leftmost.map(|id| self.raw.value(id))
	}

	/// The maximum element.
	pub fn last(&self) -> Option<&V> {
		self.raw.rightmost.map(|id| self.raw.value(id))
	}

	/// The element right before the gap in front of `pos`, if any.
	pub(crate) fn before(&self, pos: Position) -> Option<NodeId> {
		match pos {
			Position::At(id) if self.raw.contains(id) => self.raw.predecessor(id),
			Position::At(_) => None,
			Position::End => self.raw.rightmost,
		}
	}

	/// Returns an iterator over the elements in sorted order.
	pub fn iter(&self) -> Iter<'_, V, P::Meta> {
		Iter::new(&self.raw)
	}

	fn check(&self, pos: Position) -> Result<NodeId> {
		match pos {
			Position::End => Err(Error::EndPosition),
			Position::At(id) if self.raw.contains(id) => Ok(id),
			Position::At(id) => Err(Error::StaleHandle(id)),
		}
	}

	/// Unlinks the live node `id`, repairs balance and frees it.
	fn unlink(&mut self, id: NodeId) -> (V, Position) {
		let next = self.raw.successor(id);
		let detached = self.raw.detach(id);
		P::rebalance_after_erase(&mut self.raw, detached);
		let node = self.raw.arena.free(id);
		(node.value, next.into())
	}

	/// Removes the element at `pos` and returns the position that followed it.
	///
	/// Only `pos` itself is invalidated; every other position stays valid.
	///
	/// # Errors
	///
	/// [`Error::EndPosition`] for `End`, [`Error::StaleHandle`] if the element
	/// was already erased. The tree is unchanged in both cases.
	pub fn erase(&mut self, pos: Position) -> Result<Position> {
		self.remove_at(pos).map(|(_, next)| next)
	}

	/// Like [`erase`](Self::erase), but also hands back the removed value.
	pub fn remove_at(&mut self, pos: Position) -> Result<(V, Position)> {
		let id = self.check(pos)?;
		Ok(self.unlink(id))
	}

	/// Removes every element in `[first, last)` and returns `last`.
	///
	/// # Errors
	///
	/// [`Error::StaleHandle`] if either end is stale, [`Error::EndPosition`]
	/// if `last` does not follow `first`. Nothing is removed on error.
	pub fn erase_range(&mut self, first: Position, last: Position) -> Result<Position> {
		if let Position::At(id) = last {
			self.check(Position::At(id))?;
		}
		let mut doomed = Vec::new();
		let mut pos = first;
		while pos != last {
			let id = self.check(pos)?;
			doomed.push(id);
			pos = self.raw.successor(id).into();
		}
		for id in doomed {
			self.unlink(id);
		}
		Ok(last)
	}

	/// Removes and returns the minimum element.
	pub fn pop_first(&mut self) -> Option<V> {
		let id = self.raw.leftmost?;
		Some(self.unlink(id).0)
	}

	/// Removes and returns the maximum element.
	pub fn pop_last(&mut self) -> Option<V> {
		let id = self.raw.rightmost?;
		Some(self.unlink(id).0)
	}

	/// Keeps only the elements for which `f` returns `true`, visiting them in
	/// sorted order.
	pub fn retain<F>(&mut self, mut f: F)
	where
		F: FnMut(&V) -> bool,
	{
		self.retain_mut(|v| f(v));
	}

	pub(crate) fn retain_mut<F>(&mut self, mut f: F)
	where
		F: FnMut(&mut V) -> bool,
	{
		let mut cursor = self.raw.leftmost;
		while let Some(id) = cursor {
			cursor = if f(&mut self.raw.arena[id].value) {
				self.raw.successor(id)
			} else {
				self.unlink(id).1.node()
			};
		}
	}

	/// Removes every element. Nodes are freed by a stackless post-order walk.
	pub fn clear(&mut self) {
		log::trace!("clearing tree of {} elements", self.len());
		self.raw.clear();
	}
}

// ---------------------------------------------------------------------------
// Ordered operations
// ---------------------------------------------------------------------------

impl<V, X, C, P, const UNIQUE: bool> GenericTree<V, X, C, P, UNIQUE>
where
	X: KeyOf<V>,
	C: Compare<X::Key>,
	P: Balance,
{
	#[inline]
	fn cmp_values(&self, a: &V, b: &V) -> Ordering {
		<C as Compare<X::Key>>::compare(&self.cmp, X::key_of(a), X::key_of(b))
	}

	#[inline]
	fn cmp_key<Q>(&self, value: &V, key: &Q) -> Ordering
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		<C as Compare<Q>>::compare(&self.cmp, <X::Key as Borrow<Q>>::borrow(X::key_of(value)), key)
	}

	/// Returns `true` if `pos` names an element whose key equals `key`.
	pub(crate) fn matches<Q>(&self, pos: Position, key: &Q) -> bool
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.value_at(pos).is_some_and(|v| self.cmp_key(v, key) == Ordering::Equal)
	}

	/// Finds where `value` would be linked: `Ok((parent, as_left))`, or
	/// `Err(existing)` when the key is taken under the unique policy.
	///
	/// Only reads the tree, so a panicking comparator leaves it intact.
	fn locate(&self, value: &V) -> std::result::Result<(Option<NodeId>, bool), NodeId> {
		let mut parent = None;
		let mut as_left = false;
		let mut cursor = self.raw.root;
		while let Some(id) = cursor {
			parent = Some(id);
			match self.cmp_values(value, self.raw.value(id)) {
				Ordering::Less => {
					as_left = true;
					cursor = self.raw.left(id);
				}
				Ordering::Equal if UNIQUE => return Err(id),
				// Equal keys go right, after every existing equal key.
				_ => {
					as_left = false;
					cursor = self.raw.right(id);
				}
			}
		}
		Ok((parent, as_left))
	}

	fn link_new(&mut self, value: V, parent: Option<NodeId>, as_left: bool) -> NodeId {
		let id = self.raw.arena.alloc(Node::new(value, P::leaf()));
		self.raw.link(id, parent, as_left);
		P::rebalance_after_insert(&mut self.raw, id);
		id
	}

	/// Inserts `value`.
	///
	/// Returns the position of the new element and `true`. Under the unique
	/// policy, if an element with an equal key exists, `value` is dropped and
	/// the existing element's position is returned with `false`.
	///
	/// No existing position is invalidated.
	///
	/// # Panics
	///
	/// Aborts on allocation failure, like `Vec::push`. Use
	/// [`try_insert`](Self::try_insert) to handle it.
	///
	/// ```
	/// use yewtree::RbSet;
	///
	/// let mut set: RbSet<i32> = RbSet::new();
	/// let (pos, inserted) = set.insert(7);
	/// assert!(inserted);
	/// assert_eq!(set.insert(7), (pos, false));
	/// ```
	pub fn insert(&mut self, value: V) -> (Position, bool) {
		let (id, inserted) = self.insert_node(value);
		(Position::At(id), inserted)
	}

	pub(crate) fn insert_node(&mut self, value: V) -> (NodeId, bool) {
		match self.locate(&value) {
			Err(existing) => (existing, false),
			Ok((parent, as_left)) => (self.link_new(value, parent, as_left), true),
		}
	}

	/// Like [`insert`](Self::insert), but reports allocation failure.
	///
	/// On error the tree is unchanged and `value` has been dropped.
	pub fn try_insert(&mut self, value: V) -> Result<(Position, bool)> {
		match self.locate(&value) {
			Err(existing) => Ok((Position::At(existing), false)),
			Ok((parent, as_left)) => {
				self.raw.arena.try_reserve(1)?;
				Ok((Position::At(self.link_new(value, parent, as_left)), true))
			}
		}
	}

	/// Position of the first element not less than `key`, or `End`.
	pub fn lower_bound<Q>(&self, key: &Q) -> Position
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		let mut best = None;
		let mut cursor = self.raw.root;
		while let Some(id) = cursor {
			if self.cmp_key(self.raw.value(id), key) == Ordering::Less {
				cursor = self.raw.right(id);
			} else {
				best = Some(id);
				cursor = self.raw.left(id);
			}
		}
		best.into()
	}

	/// Position of the first element greater than `key`, or `End`.
	pub fn upper_bound<Q>(&self, key: &Q) -> Position
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		let mut best = None;
		let mut cursor = self.raw.root;
		while let Some(id) = cursor {
			if self.cmp_key(self.raw.value(id), key) == Ordering::Greater {
				best = Some(id);
				cursor = self.raw.left(id);
			} else {
				cursor = self.raw.right(id);
			}
		}
		best.into()
	}

	/// `(lower_bound(key), upper_bound(key))`: the run of elements equal to `key`.
	pub fn equal_range<Q>(&self, key: &Q) -> (Position, Position)
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		(self.lower_bound(key), self.upper_bound(key))
	}

	/// Position of the first element equal to `key`, or `End` on a miss.
	pub fn find<Q>(&self, key: &Q) -> Position
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		let pos = self.lower_bound(key);
		if self.matches(pos, key) {
			pos
		} else {
			Position::End
		}
	}

	/// The first element equal to `key`.
	pub fn get<Q>(&self, key: &Q) -> Option<&V>
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.value_at(self.find(key))
	}

	/// Returns `true` if an element equal to `key` is present.
	pub fn contains<Q>(&self, key: &Q) -> bool
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		!self.find(key).is_end()
	}

	/// Number of elements equal to `key`.
	pub fn count<Q>(&self, key: &Q) -> usize
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		let mut count = 0;
		let mut cursor = self.lower_bound(key).node();
		while let Some(id) = cursor {
			if self.cmp_key(self.raw.value(id), key) != Ordering::Equal {
				break;
			}
			count += 1;
			if UNIQUE {
				break;
			}
			cursor = self.raw.successor(id);
		}
		count
	}

	/// Removes every element equal to `key` and returns how many there were.
	/// A miss returns `0` and leaves the tree untouched.
	pub fn erase_key<Q>(&mut self, key: &Q) -> usize
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		let mut removed = 0;
		let mut cursor = self.lower_bound(key).node();
		while let Some(id) = cursor {
			if self.cmp_key(self.raw.value(id), key) != Ordering::Equal {
				break;
			}
			cursor = self.unlink(id).1.node();
			removed += 1;
		}
		removed
	}

	/// Removes the first element equal to `key` and returns it.
	pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		let id = self.find(key).node()?;
		Some(self.unlink(id).0)
	}

	/// Returns an iterator over the elements whose keys fall in `range`.
	///
	/// A range whose start lies after its end is empty.
	///
	/// ```
	/// use yewtree::AvlSet;
	///
	/// let set: AvlSet<i32> = (0..10).collect();
	/// assert_eq!(set.range(3..6).copied().collect::<Vec<_>>(), vec![3, 4, 5]);
	/// assert_eq!(set.range(7..=2).count(), 0);
	/// ```
	pub fn range<Q, R>(&self, range: R) -> Range<'_, V, P::Meta>
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
		R: RangeBounds<Q>,
	{
		let front = match range.start_bound() {
			Bound::Included(key) => self.lower_bound(key).node(),
			Bound::Excluded(key) => self.upper_bound(key).node(),
			Bound::Unbounded => self.raw.leftmost,
		};
		let back = match range.end_bound() {
			Bound::Included(key) => self.before(self.upper_bound(key)),
			Bound::Excluded(key) => self.before(self.lower_bound(key)),
			Bound::Unbounded => self.raw.rightmost,
		};
		match (front, back) {
			(Some(f), Some(b))
				if self.cmp_values(self.raw.value(f), self.raw.value(b)) == Ordering::Greater =>
			{
				Range::new(&self.raw, None, None)
			}
			_ => Range::new(&self.raw, front, back),
		}
	}

	/// Moves the elements of `other` into `self`.
	///
	/// Under the unique policy, elements whose keys are already present in
	/// `self` stay behind in `other`; otherwise `other` ends up empty.
	///
	/// Elements left in `other` keep their positions. Positions of moved
	/// elements become stale in `other`, like those of erased ones.
	pub fn append(&mut self, other: &mut Self) {
		log::trace!("appending {} elements into tree of {}", other.len(), self.len());
		let mut cursor = other.raw.leftmost;
		while let Some(id) = cursor {
			match self.locate(other.raw.value(id)) {
				Ok((parent, as_left)) => {
					let (value, next) = other.unlink(id);
					self.link_new(value, parent, as_left);
					cursor = next.node();
				}
				Err(_) => cursor = other.raw.successor(id),
			}
		}
	}

	/// A read-only cursor positioned before the first element.
	pub fn cursor(&self) -> Cursor<'_, V, X, C, P, UNIQUE> {
		Cursor::new(self)
	}

	/// A cursor that can remove and insert, positioned before the first element.
	pub fn cursor_mut(&mut self) -> CursorMut<'_, V, X, C, P, UNIQUE> {
		CursorMut::new(self)
	}
}

// ---------------------------------------------------------------------------
// Whole-tree trait implementations
// ---------------------------------------------------------------------------

impl<V: Clone, X, C: Clone, P: Balance, const UNIQUE: bool> Clone for GenericTree<V, X, C, P, UNIQUE> {
	fn clone(&self) -> Self {
		log::trace!("cloning tree of {} elements", self.len());
		let mut raw = RawTree::with_capacity(self.len());
		raw.copy_from(&self.raw);
		GenericTree { raw, cmp: self.cmp.clone(), marker: PhantomData }
	}

	fn clone_from(&mut self, source: &Self) {
		log::trace!("cloning tree of {} elements into existing tree", source.len());
		// Detached while copying: a panicking `V::clone` leaves `self` empty.
		let mut raw = std::mem::replace(&mut self.raw, RawTree::new());
		raw.clear();
		raw.copy_from(&source.raw);
		self.raw = raw;
		self.cmp = source.cmp.clone();
	}
}

impl<V, X, C, P, const UNIQUE: bool> FromIterator<V> for GenericTree<V, X, C, P, UNIQUE>
where
	X: KeyOf<V>,
	C: Compare<X::Key> + Default,
	P: Balance,
{
	fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
		let mut tree = Self::new();
		tree.extend(iter);
		tree
	}
}

impl<V, X, C, P, const UNIQUE: bool> Extend<V> for GenericTree<V, X, C, P, UNIQUE>
where
	X: KeyOf<V>,
	C: Compare<X::Key>,
	P: Balance,
{
	fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
		for value in iter {
			self.insert(value);
		}
	}
}

impl<V, X, C, P: Balance, const UNIQUE: bool> IntoIterator for GenericTree<V, X, C, P, UNIQUE> {
	type Item = V;
	type IntoIter = IntoIter<V>;

	fn into_iter(self) -> IntoIter<V> {
		IntoIter::new(self.raw)
	}
}

impl<'a, V, X, C, P: Balance, const UNIQUE: bool> IntoIterator for &'a GenericTree<V, X, C, P, UNIQUE> {
	type Item = &'a V;
	type IntoIter = Iter<'a, V, P::Meta>;

	fn into_iter(self) -> Iter<'a, V, P::Meta> {
		self.iter()
	}
}

impl<V: PartialEq, X, C, P: Balance, const UNIQUE: bool> PartialEq for GenericTree<V, X, C, P, UNIQUE> {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().eq(other.iter())
	}
}

impl<V: Eq, X, C, P: Balance, const UNIQUE: bool> Eq for GenericTree<V, X, C, P, UNIQUE> {}

impl<V: PartialOrd, X, C, P: Balance, const UNIQUE: bool> PartialOrd for GenericTree<V, X, C, P, UNIQUE> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		self.iter().partial_cmp(other.iter())
	}
}

impl<V: Ord, X, C, P: Balance, const UNIQUE: bool> Ord for GenericTree<V, X, C, P, UNIQUE> {
	fn cmp(&self, other: &Self) -> Ordering {
		self.iter().cmp(other.iter())
	}
}

impl<V: Hash, X, C, P: Balance, const UNIQUE: bool> Hash for GenericTree<V, X, C, P, UNIQUE> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		state.write_usize(self.len());
		for value in self.iter() {
			value.hash(state);
		}
	}
}

impl<V: fmt::Debug, X, C, P: Balance, const UNIQUE: bool> fmt::Debug for GenericTree<V, X, C, P, UNIQUE> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}

// ===========================================================================
// Test-Only Validation Module
// ===========================================================================

/// Invariant validation for testing.
#[cfg(any(test, feature = "test-utils"))]
impl<V, X, C, P, const UNIQUE: bool> GenericTree<V, X, C, P, UNIQUE>
where
	X: KeyOf<V>,
	C: Compare<X::Key>,
	P: Balance,
{
	/// Validates all tree invariants. Panics with diagnostic info if any invariant is violated.
	///
	/// # Invariants Checked
	///
	/// 1. Link consistency: every child's parent link points back at it; the root has none
	/// 2. Length consistency: `len()` equals the number of reachable nodes
	/// 3. Cache consistency: cached leftmost/rightmost are the subtree extremes
	/// 4. Order: in-order traversal is strictly increasing (unique) or non-decreasing
	/// 5. Balance: whatever the policy's [`Balance::assert_balanced`] checks
	pub fn assert_invariants(&self) {
		let raw = &self.raw;
		let Some(root) = raw.root else {
			assert_eq!(raw.len(), 0, "empty tree reports len {}", raw.len());
			assert_eq!(raw.leftmost, None, "empty tree caches a leftmost node");
			assert_eq!(raw.rightmost, None, "empty tree caches a rightmost node");
			return;
		};
		assert_eq!(raw.parent(root), None, "root {:?} has a parent", root);

		// Invariant 1 + 2
		let mut reachable = 0;
		let mut stack = vec![root];
		while let Some(id) = stack.pop() {
			reachable += 1;
			for child in [raw.left(id), raw.right(id)].into_iter().flatten() {
				assert_eq!(raw.parent(child), Some(id), "broken parent link at {:?}", child);
				stack.push(child);
			}
		}
		assert_eq!(reachable, raw.len(), "len disagrees with reachable node count");

		// Invariant 3
		assert_eq!(raw.leftmost, Some(raw.minimum(root)), "stale leftmost cache");
		assert_eq!(raw.rightmost, Some(raw.maximum(root)), "stale rightmost cache");

		// Invariant 4
		let mut prev: Option<NodeId> = None;
		let mut cursor = raw.leftmost;
		while let Some(id) = cursor {
			if let Some(p) = prev {
				let ord = self.cmp_values(raw.value(p), raw.value(id));
				if UNIQUE {
					assert_eq!(ord, Ordering::Less, "order violated between {:?} and {:?}", p, id);
				} else {
					assert_ne!(ord, Ordering::Greater, "order violated between {:?} and {:?}", p, id);
				}
			}
			prev = Some(id);
			cursor = raw.successor(id);
		}

		// Invariant 5
		P::assert_balanced(raw);
	}
}
