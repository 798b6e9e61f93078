//! Ordered maps and multimaps.
//!
//! A map stores `(key, mapped)` pairs ordered by the key alone ([`First`]
//! projection). Keys are never handed out mutably, so the order cannot be
//! broken through the map; mapped values can be changed freely.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::ops::{Deref, DerefMut, Index, RangeBounds};

use crate::balance::{Avl, Balance, RedBlack, Treap};
use crate::compare::{Compare, First, Natural};
use crate::iter::{IntoIter, Iter, Position, Range};
use crate::GenericTree;

/// An ordered map (`UNIQUE = true`) or multimap (`UNIQUE = false`).
pub struct MapAdapter<K, V, C, P: Balance, const UNIQUE: bool> {
	tree: GenericTree<(K, V), First, C, P, UNIQUE>,
}

/// Ordered map with unique keys; red-black balanced unless `P` says otherwise.
pub type OrderedMap<K, V, C = Natural, P = RedBlack> = MapAdapter<K, V, C, P, true>;

/// Ordered map that keeps every entry, in insertion order among equal keys.
pub type OrderedMultiMap<K, V, C = Natural, P = RedBlack> = MapAdapter<K, V, C, P, false>;

/// AVL-balanced ordered map.
pub type AvlMap<K, V, C = Natural> = MapAdapter<K, V, C, Avl, true>;

/// Red-black balanced ordered map.
pub type RbMap<K, V, C = Natural> = MapAdapter<K, V, C, RedBlack, true>;

/// Treap-balanced ordered map.
pub type TreapMap<K, V, C = Natural> = MapAdapter<K, V, C, Treap, true>;

impl<K, V, C, P: Balance, const UNIQUE: bool> MapAdapter<K, V, C, P, UNIQUE> {
	/// Makes a new, empty map.
	pub fn new() -> Self
	where
		C: Default,
	{
		MapAdapter { tree: GenericTree::new() }
	}

	/// Makes a new, empty map ordered by `cmp`.
	pub fn with_comparator(cmp: C) -> Self {
		MapAdapter { tree: GenericTree::with_comparator(cmp) }
	}

	/// Unwraps the underlying tree.
	pub fn into_tree(self) -> GenericTree<(K, V), First, C, P, UNIQUE> {
		self.tree
	}

	/// The entry at `pos`, or `None` for `End` or a stale position.
	pub fn entry_at(&self, pos: Position) -> Option<(&K, &V)> {
		self.tree.value_at(pos).map(|(k, v)| (k, v))
	}

	/// The mapped value at `pos`, mutably.
	pub fn value_at_mut(&mut self, pos: Position) -> Option<&mut V> {
		self.tree.value_at_mut(pos).map(|(_, v)| v)
	}

	/// An iterator over the entries, in key order.
	pub fn iter(&self) -> MapIter<'_, K, V, P::Meta> {
		MapIter { inner: self.tree.iter() }
	}

	/// An iterator over the keys, in order.
	pub fn keys(&self) -> Keys<'_, K, V, P::Meta> {
		Keys { inner: self.tree.iter() }
	}

	/// An iterator over the mapped values, in key order.
	pub fn values(&self) -> Values<'_, K, V, P::Meta> {
		Values { inner: self.tree.iter() }
	}

	/// The entry with the minimum key.
	pub fn first_key_value(&self) -> Option<(&K, &V)> {
		self.tree.first().map(|(k, v)| (k, v))
	}

	/// The entry with the maximum key.
	pub fn last_key_value(&self) -> Option<(&K, &V)> {
		self.tree.last().map(|(k, v)| (k, v))
	}

	/// Keeps only the entries for which `f` returns `true`. `f` may update the
	/// mapped value of the entries it keeps.
	pub fn retain<F>(&mut self, mut f: F)
	where
		F: FnMut(&K, &mut V) -> bool,
	{
		self.tree.retain_mut(|(k, v)| f(k, v));
	}
}

impl<K, V, C, P, const UNIQUE: bool> MapAdapter<K, V, C, P, UNIQUE>
where
	C: Compare<K>,
	P: Balance,
{
	/// Inserts `key` with `value`.
	///
	/// Under the unique policy an existing entry for `key` is left as it was:
	/// the call returns that entry's position and `false`, and drops `value`.
	/// See [`insert_or_assign`](Self::insert_or_assign) to overwrite.
	pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
		self.tree.insert((key, value))
	}

	/// Inserts `key` with `value`, overwriting the mapped value of an existing
	/// entry under the unique policy. Returns the entry's position and whether
	/// a new entry was created.
	///
	/// ```
	/// use yewtree::OrderedMap;
	///
	/// let mut map: OrderedMap<&str, i32> = OrderedMap::new();
	/// map.insert("a", 1);
	/// let (_, created) = map.insert_or_assign("a", 2);
	/// assert!(!created);
	/// assert_eq!(map.get("a"), Some(&2));
	/// ```
	pub fn insert_or_assign(&mut self, key: K, value: V) -> (Position, bool) {
		if UNIQUE {
			if let Some(id) = self.tree.find(&key).node() {
				self.tree.value_mut(id).1 = value;
				return (Position::At(id), false);
			}
		}
		self.tree.insert((key, value))
	}

	/// The mapped value for `key`, inserting `f()` first if `key` is absent.
	pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &mut V
	where
		F: FnOnce() -> V,
	{
		let id = match self.tree.find(&key).node() {
			Some(id) => id,
			None => self.tree.insert_node((key, f())).0,
		};
		&mut self.tree.value_mut(id).1
	}

	/// The mapped value for the first entry with key `key`.
	pub fn get<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.tree.get(key).map(|(_, v)| v)
	}

	/// The mapped value for the first entry with key `key`, mutably.
	pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
	where
		K: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		let pos = self.tree.find(key);
		self.value_at_mut(pos)
	}

	/// The stored key and mapped value for `key`.
	pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
	where
		K: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.tree.get(key).map(|(k, v)| (k, v))
	}

	/// Returns `true` if an entry with key `key` exists.
	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.tree.contains(key)
	}

	/// Removes the first entry with key `key` and returns its mapped value.
	pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.tree.remove(key).map(|(_, v)| v)
	}

	/// Removes the first entry with key `key` and returns it.
	pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
	where
		K: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.tree.remove(key)
	}

	/// An iterator over the entries whose keys fall in `range`.
	pub fn range<Q, R>(&self, range: R) -> MapRange<'_, K, V, P::Meta>
	where
		K: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
		R: RangeBounds<Q>,
	{
		MapRange { inner: self.tree.range(range) }
	}
}

impl<K, V, C, P: Balance, const UNIQUE: bool> Deref for MapAdapter<K, V, C, P, UNIQUE> {
	type Target = GenericTree<(K, V), First, C, P, UNIQUE>;

	fn deref(&self) -> &Self::Target {
		&self.tree
	}
}

impl<K, V, C, P: Balance, const UNIQUE: bool> DerefMut for MapAdapter<K, V, C, P, UNIQUE> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.tree
	}
}

impl<K, V, C, P: Balance, const UNIQUE: bool> From<GenericTree<(K, V), First, C, P, UNIQUE>>
	for MapAdapter<K, V, C, P, UNIQUE>
{
	fn from(tree: GenericTree<(K, V), First, C, P, UNIQUE>) -> Self {
		MapAdapter { tree }
	}
}

impl<K, V, C, P, Q, const UNIQUE: bool> Index<&Q> for MapAdapter<K, V, C, P, UNIQUE>
where
	K: Borrow<Q>,
	C: Compare<K> + Compare<Q>,
	P: Balance,
	Q: ?Sized,
{
	type Output = V;

	/// # Panics
	///
	/// Panics if the key is not present.
	fn index(&self, key: &Q) -> &V {
		match self.get(key) {
			Some(value) => value,
			None => panic!("key not found in map"),
		}
	}
}

impl<K, V, C: Default, P: Balance, const UNIQUE: bool> Default for MapAdapter<K, V, C, P, UNIQUE> {
	fn default() -> Self {
		MapAdapter { tree: GenericTree::default() }
	}
}

impl<K: Clone, V: Clone, C: Clone, P: Balance, const UNIQUE: bool> Clone for MapAdapter<K, V, C, P, UNIQUE> {
	fn clone(&self) -> Self {
		MapAdapter { tree: self.tree.clone() }
	}

	fn clone_from(&mut self, source: &Self) {
		self.tree.clone_from(&source.tree);
	}
}

impl<K, V, C, P, const UNIQUE: bool> FromIterator<(K, V)> for MapAdapter<K, V, C, P, UNIQUE>
where
	C: Compare<K> + Default,
	P: Balance,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		MapAdapter { tree: GenericTree::from_iter(iter) }
	}
}

impl<K, V, C, P, const UNIQUE: bool, const N: usize> From<[(K, V); N]> for MapAdapter<K, V, C, P, UNIQUE>
where
	C: Compare<K> + Default,
	P: Balance,
{
	fn from(entries: [(K, V); N]) -> Self {
		entries.into_iter().collect()
	}
}

impl<K, V, C, P, const UNIQUE: bool> Extend<(K, V)> for MapAdapter<K, V, C, P, UNIQUE>
where
	C: Compare<K>,
	P: Balance,
{
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		self.tree.extend(iter);
	}
}

impl<K, V, C, P: Balance, const UNIQUE: bool> IntoIterator for MapAdapter<K, V, C, P, UNIQUE> {
	type Item = (K, V);
	type IntoIter = IntoIter<(K, V)>;

	fn into_iter(self) -> IntoIter<(K, V)> {
		self.tree.into_iter()
	}
}

impl<'a, K, V, C, P: Balance, const UNIQUE: bool> IntoIterator for &'a MapAdapter<K, V, C, P, UNIQUE> {
	type Item = (&'a K, &'a V);
	type IntoIter = MapIter<'a, K, V, P::Meta>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<K: PartialEq, V: PartialEq, C, P: Balance, const UNIQUE: bool> PartialEq
	for MapAdapter<K, V, C, P, UNIQUE>
{
	fn eq(&self, other: &Self) -> bool {
		self.tree == other.tree
	}
}

impl<K: Eq, V: Eq, C, P: Balance, const UNIQUE: bool> Eq for MapAdapter<K, V, C, P, UNIQUE> {}

impl<K: PartialOrd, V: PartialOrd, C, P: Balance, const UNIQUE: bool> PartialOrd
	for MapAdapter<K, V, C, P, UNIQUE>
{
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		self.tree.partial_cmp(&other.tree)
	}
}

impl<K: Ord, V: Ord, C, P: Balance, const UNIQUE: bool> Ord for MapAdapter<K, V, C, P, UNIQUE> {
	fn cmp(&self, other: &Self) -> Ordering {
		self.tree.cmp(&other.tree)
	}
}

impl<K: Hash, V: Hash, C, P: Balance, const UNIQUE: bool> Hash for MapAdapter<K, V, C, P, UNIQUE> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.tree.hash(state);
	}
}

impl<K: fmt::Debug, V: fmt::Debug, C, P: Balance, const UNIQUE: bool> fmt::Debug
	for MapAdapter<K, V, C, P, UNIQUE>
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

// ===========================================================================
// Iterators
// ===========================================================================

/// Iterator over `(&key, &mapped)` in key order.
pub struct MapIter<'a, K, V, M> {
	inner: Iter<'a, (K, V), M>,
}

/// Iterator over a key range of a map.
pub struct MapRange<'a, K, V, M> {
	inner: Range<'a, (K, V), M>,
}

/// Iterator over the keys of a map.
pub struct Keys<'a, K, V, M> {
	inner: Iter<'a, (K, V), M>,
}

/// Iterator over the mapped values of a map.
pub struct Values<'a, K, V, M> {
	inner: Iter<'a, (K, V), M>,
}

impl<'a, K, V, M> Iterator for MapIter<'a, K, V, M> {
	type Item = (&'a K, &'a V);

	#[inline]
	fn next(&mut self) -> Option<(&'a K, &'a V)> {
		self.inner.next().map(|entry| (&entry.0, &entry.1))
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<'a, K, V, M> DoubleEndedIterator for MapIter<'a, K, V, M> {
	#[inline]
	fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
		self.inner.next_back().map(|entry| (&entry.0, &entry.1))
	}
}

impl<K, V, M> ExactSizeIterator for MapIter<'_, K, V, M> {}

impl<K, V, M> FusedIterator for MapIter<'_, K, V, M> {}

impl<'a, K, V, M> Iterator for MapRange<'a, K, V, M> {
	type Item = (&'a K, &'a V);

	#[inline]
	fn next(&mut self) -> Option<(&'a K, &'a V)> {
		self.inner.next().map(|entry| (&entry.0, &entry.1))
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<'a, K, V, M> DoubleEndedIterator for MapRange<'a, K, V, M> {
	#[inline]
	fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
		self.inner.next_back().map(|entry| (&entry.0, &entry.1))
	}
}

impl<K, V, M> FusedIterator for MapRange<'_, K, V, M> {}

impl<'a, K, V, M> Iterator for Keys<'a, K, V, M> {
	type Item = &'a K;

	#[inline]
	fn next(&mut self) -> Option<&'a K> {
		self.inner.next().map(|entry| &entry.0)
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<'a, K, V, M> DoubleEndedIterator for Keys<'a, K, V, M> {
	#[inline]
	fn next_back(&mut self) -> Option<&'a K> {
		self.inner.next_back().map(|entry| &entry.0)
	}
}

impl<K, V, M> ExactSizeIterator for Keys<'_, K, V, M> {}

impl<K, V, M> FusedIterator for Keys<'_, K, V, M> {}

impl<'a, K, V, M> Iterator for Values<'a, K, V, M> {
	type Item = &'a V;

	#[inline]
	fn next(&mut self) -> Option<&'a V> {
		self.inner.next().map(|entry| &entry.1)
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<'a, K, V, M> DoubleEndedIterator for Values<'a, K, V, M> {
	#[inline]
	fn next_back(&mut self) -> Option<&'a V> {
		self.inner.next_back().map(|entry| &entry.1)
	}
}

impl<K, V, M> ExactSizeIterator for Values<'_, K, V, M> {}

impl<K, V, M> FusedIterator for Values<'_, K, V, M> {}
