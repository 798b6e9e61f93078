//! Positions, iterators and cursors for the `GenericTree` data structure
use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;

use crate::balance::Balance;
use crate::compare::{Compare, KeyOf};
use crate::node::{NodeId, RawTree};
use crate::GenericTree;

/// A position in a tree: an element, or the past-the-end slot.
///
/// Positions are plain handles. They do not borrow the tree, survive any
/// insertion and any erase of a different element, and compare equal exactly
/// when they name the same element (or are both `End`).
///
/// Stepping through positions with
/// [`next_pos`](GenericTree::next_pos)/[`prev_pos`](GenericTree::prev_pos)
/// walks a ring: `End` follows the maximum and precedes the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
	/// The element held by this node.
	At(NodeId),
	/// Past the end. Also the result of every lookup that misses.
	End,
}

impl Position {
	/// The element handle, or `None` for [`Position::End`].
	#[inline]
	pub fn node(self) -> Option<NodeId> {
		match self {
			Position::At(id) => Some(id),
			Position::End => None,
		}
	}

	#[inline]
	pub fn is_end(self) -> bool {
		self == Position::End
	}
}

impl From<Option<NodeId>> for Position {
	#[inline]
	fn from(id: Option<NodeId>) -> Self {
		id.map_or(Position::End, Position::At)
	}
}

// ===========================================================================
// Iter
// ===========================================================================

/// In-order iterator over the values of a tree.
pub struct Iter<'a, V, M> {
	raw: &'a RawTree<V, M>,
	front: Option<NodeId>,
	back: Option<NodeId>,
	len: usize,
}

impl<'a, V, M> Iter<'a, V, M> {
	pub(crate) fn new(raw: &'a RawTree<V, M>) -> Self {
		Iter { raw, front: raw.leftmost(), back: raw.rightmost(), len: raw.len() }
	}
}

impl<V, M> Clone for Iter<'_, V, M> {
	fn clone(&self) -> Self {
		Iter { raw: self.raw, front: self.front, back: self.back, len: self.len }
	}
}

impl<'a, V, M> Iterator for Iter<'a, V, M> {
	type Item = &'a V;

	fn next(&mut self) -> Option<&'a V> {
		if self.len == 0 {
			return None;
		}
		let id = self.front?;
		self.len -= 1;
		self.front = self.raw.successor(id);
		Some(self.raw.value(id))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.len, Some(self.len))
	}
}

impl<'a, V, M> DoubleEndedIterator for Iter<'a, V, M> {
	fn next_back(&mut self) -> Option<&'a V> {
		if self.len == 0 {
			return None;
		}
		let id = self.back?;
		self.len -= 1;
		self.back = self.raw.predecessor(id);
		Some(self.raw.value(id))
	}
}

impl<V, M> ExactSizeIterator for Iter<'_, V, M> {}

impl<V, M> FusedIterator for Iter<'_, V, M> {}

impl<V: fmt::Debug, M> fmt::Debug for Iter<'_, V, M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.clone()).finish()
	}
}

// ===========================================================================
// Range
// ===========================================================================

/// In-order iterator over a contiguous run of values, both ends inclusive.
pub struct Range<'a, V, M> {
	raw: &'a RawTree<V, M>,
	front: Option<NodeId>,
	back: Option<NodeId>,
}

impl<'a, V, M> Range<'a, V, M> {
	/// A run from `front` to `back`. Either end being `None` means empty.
	pub(crate) fn new(raw: &'a RawTree<V, M>, front: Option<NodeId>, back: Option<NodeId>) -> Self {
		match (front, back) {
			(Some(_), Some(_)) => Range { raw, front, back },
			_ => Range { raw, front: None, back: None },
		}
	}

	fn finish(&mut self) {
		self.front = None;
		self.back = None;
	}
}

impl<V, M> Clone for Range<'_, V, M> {
	fn clone(&self) -> Self {
		Range { raw: self.raw, front: self.front, back: self.back }
	}
}

impl<'a, V, M> Iterator for Range<'a, V, M> {
	type Item = &'a V;

	fn next(&mut self) -> Option<&'a V> {
		let id = self.front?;
		if self.back == Some(id) {
			self.finish();
		} else {
			self.front = self.raw.successor(id);
		}
		Some(self.raw.value(id))
	}
}

impl<'a, V, M> DoubleEndedIterator for Range<'a, V, M> {
	fn next_back(&mut self) -> Option<&'a V> {
		let id = self.back?;
		if self.front == Some(id) {
			self.finish();
		} else {
			self.back = self.raw.predecessor(id);
		}
		Some(self.raw.value(id))
	}
}

impl<V, M> FusedIterator for Range<'_, V, M> {}

impl<V: fmt::Debug, M> fmt::Debug for Range<'_, V, M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.clone()).finish()
	}
}

// ===========================================================================
// IntoIter
// ===========================================================================

/// Owning in-order iterator, created by `into_iter` on a tree.
pub struct IntoIter<V> {
	inner: std::vec::IntoIter<V>,
}

impl<V> IntoIter<V> {
	/// Moves every value out of `raw` in order, leaving it empty.
	pub(crate) fn new<M>(mut raw: RawTree<V, M>) -> Self {
		let mut order = Vec::with_capacity(raw.len());
		let mut cursor = raw.leftmost();
		while let Some(id) = cursor {
			order.push(id);
			cursor = raw.successor(id);
		}
		raw.root = None;
		raw.leftmost = None;
		raw.rightmost = None;
		let values: Vec<V> = order.into_iter().map(|id| raw.arena.free(id).value).collect();
		IntoIter { inner: values.into_iter() }
	}
}

impl<V> Iterator for IntoIter<V> {
	type Item = V;

	#[inline]
	fn next(&mut self) -> Option<V> {
		self.inner.next()
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<V> DoubleEndedIterator for IntoIter<V> {
	#[inline]
	fn next_back(&mut self) -> Option<V> {
		self.inner.next_back()
	}
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}

// ===========================================================================
// Cursors
// ===========================================================================

/// Read-only cursor over the values of the tree.
///
/// The cursor rests in a gap between two adjacent values (or before the
/// first, or after the last). [`next`](Cursor::next) yields the value after
/// the gap and moves past it; [`prev`](Cursor::prev) yields the value before
/// the gap and moves before it.
pub struct Cursor<'t, V, X, C, P: Balance, const UNIQUE: bool> {
	tree: &'t GenericTree<V, X, C, P, UNIQUE>,
	/// The value right after the gap.
	after: Position,
}

impl<'t, V, X, C, P, const UNIQUE: bool> Cursor<'t, V, X, C, P, UNIQUE>
where
	X: KeyOf<V>,
	C: Compare<X::Key>,
	P: Balance,
{
	pub(crate) fn new(tree: &'t GenericTree<V, X, C, P, UNIQUE>) -> Self {
		Cursor { tree, after: tree.begin() }
	}

	/// Position of the value right after the cursor.
	pub fn position(&self) -> Position {
		self.after
	}

	/// Sets the cursor immediately before the first value not less than `key`.
	pub fn seek<Q>(&mut self, key: &Q)
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.after = self.tree.lower_bound(key);
	}

	/// Sets the cursor immediately after the last value not greater than `key`.
	pub fn seek_for_prev<Q>(&mut self, key: &Q)
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.after = self.tree.upper_bound(key);
	}

	/// Sets the cursor immediately before the position for this key, returning `true` if
	/// the next value matches the provided key.
	pub fn seek_exact<Q>(&mut self, key: &Q) -> bool
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.seek(key);
		self.tree.matches(self.after, key)
	}

	/// Sets the cursor immediately before the first value in the tree.
	pub fn seek_to_first(&mut self) {
		self.after = self.tree.begin();
	}

	/// Sets the cursor immediately after the last value in the tree.
	pub fn seek_to_last(&mut self) {
		self.after = Position::End;
	}

	/// The value after the cursor, without moving.
	pub fn peek_next(&self) -> Option<&'t V> {
		self.tree.value_at(self.after)
	}

	/// The value before the cursor, without moving.
	pub fn peek_prev(&self) -> Option<&'t V> {
		let before = self.tree.before(self.after)?;
		Some(self.tree.raw().value(before))
	}

	/// Returns the next value from the current cursor position.
	#[allow(clippy::should_implement_trait)]
	pub fn next(&mut self) -> Option<&'t V> {
		let id = self.after.node()?;
		self.after = self.tree.raw().successor(id).into();
		Some(self.tree.raw().value(id))
	}

	/// Returns the previous value from the current cursor position.
	pub fn prev(&mut self) -> Option<&'t V> {
		let id = self.tree.before(self.after)?;
		self.after = Position::At(id);
		Some(self.tree.raw().value(id))
	}
}

/// Cursor that can also insert and remove values.
///
/// Removing through the cursor keeps it in a valid gap, and because removal
/// relinks nodes instead of moving values, every other [`Position`] the
/// caller holds stays valid too.
pub struct CursorMut<'t, V, X, C, P: Balance, const UNIQUE: bool> {
	tree: &'t mut GenericTree<V, X, C, P, UNIQUE>,
	after: Position,
}

impl<'t, V, X, C, P, const UNIQUE: bool> CursorMut<'t, V, X, C, P, UNIQUE>
where
	X: KeyOf<V>,
	C: Compare<X::Key>,
	P: Balance,
{
	pub(crate) fn new(tree: &'t mut GenericTree<V, X, C, P, UNIQUE>) -> Self {
		let after = tree.begin();
		CursorMut { tree, after }
	}

	/// Position of the value right after the cursor.
	pub fn position(&self) -> Position {
		self.after
	}

	/// Sets the cursor immediately before the first value not less than `key`.
	pub fn seek<Q>(&mut self, key: &Q)
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.after = self.tree.lower_bound(key);
	}

	/// Sets the cursor immediately after the last value not greater than `key`.
	pub fn seek_for_prev<Q>(&mut self, key: &Q)
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.after = self.tree.upper_bound(key);
	}

	/// Sets the cursor immediately before the position for this key, returning `true` if
	/// the next value matches the provided key.
	pub fn seek_exact<Q>(&mut self, key: &Q) -> bool
	where
		X::Key: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.seek(key);
		self.tree.matches(self.after, key)
	}

	pub fn seek_to_first(&mut self) {
		self.after = self.tree.begin();
	}

	pub fn seek_to_last(&mut self) {
		self.after = Position::End;
	}

	pub fn peek_next(&self) -> Option<&V> {
		self.tree.value_at(self.after)
	}

	pub fn peek_prev(&self) -> Option<&V> {
		let before = self.tree.before(self.after)?;
		Some(self.tree.raw().value(before))
	}

	/// Returns the next value from the current cursor position.
	#[allow(clippy::should_implement_trait)]
	pub fn next(&mut self) -> Option<&V> {
		let id = self.after.node()?;
		self.after = self.tree.raw().successor(id).into();
		Some(self.tree.raw().value(id))
	}

	/// Returns the previous value from the current cursor position.
	pub fn prev(&mut self) -> Option<&V> {
		let id = self.tree.before(self.after)?;
		self.after = Position::At(id);
		Some(self.tree.raw().value(id))
	}

	/// Removes and returns the value after the cursor.
	pub fn remove_next(&mut self) -> Option<V> {
		let (value, next) = self.tree.remove_at(self.after).ok()?;
		self.after = next;
		Some(value)
	}

	/// Removes and returns the value before the cursor.
	pub fn remove_prev(&mut self) -> Option<V> {
		let id = self.tree.before(self.after)?;
		let (value, _) = self.tree.remove_at(Position::At(id)).ok()?;
		Some(value)
	}

	/// Inserts `value` and leaves the cursor just before it (or before the
	/// equal value that blocked it under the unique policy).
	///
	/// Returns `true` if the value was inserted.
	pub fn insert(&mut self, value: V) -> bool {
		let (pos, inserted) = self.tree.insert(value);
		self.after = pos;
		inserted
	}
}
