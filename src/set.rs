//! Ordered sets and multisets.
//!
//! A set stores bare values and orders them by the values themselves
//! ([`Identity`] projection). Everything the Tree Core offers is reachable
//! through `Deref`, so `find`, `lower_bound`, `erase`, `cursor` and the rest
//! work unchanged on a set.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

use crate::balance::{Avl, Balance, RedBlack, Treap};
use crate::compare::{Compare, Identity, Natural};
use crate::iter::{IntoIter, Iter};
use crate::GenericTree;

/// An ordered set (`UNIQUE = true`) or multiset (`UNIQUE = false`).
pub struct SetAdapter<T, C, P: Balance, const UNIQUE: bool> {
	tree: GenericTree<T, Identity, C, P, UNIQUE>,
}

/// Ordered set of unique values; red-black balanced unless `P` says otherwise.
pub type OrderedSet<T, C = Natural, P = RedBlack> = SetAdapter<T, C, P, true>;

/// Ordered set that keeps duplicates, in insertion order among equals.
pub type OrderedMultiSet<T, C = Natural, P = RedBlack> = SetAdapter<T, C, P, false>;

/// AVL-balanced ordered set.
pub type AvlSet<T, C = Natural> = SetAdapter<T, C, Avl, true>;

/// Red-black balanced ordered set.
pub type RbSet<T, C = Natural> = SetAdapter<T, C, RedBlack, true>;

/// Treap-balanced ordered set.
pub type TreapSet<T, C = Natural> = SetAdapter<T, C, Treap, true>;

impl<T, C, P: Balance, const UNIQUE: bool> SetAdapter<T, C, P, UNIQUE> {
	/// Makes a new, empty set.
	pub fn new() -> Self
	where
		C: Default,
	{
		SetAdapter { tree: GenericTree::new() }
	}

	/// Makes a new, empty set ordered by `cmp`.
	pub fn with_comparator(cmp: C) -> Self {
		SetAdapter { tree: GenericTree::with_comparator(cmp) }
	}

	/// Unwraps the underlying tree.
	pub fn into_tree(self) -> GenericTree<T, Identity, C, P, UNIQUE> {
		self.tree
	}
}

impl<T, C, P, const UNIQUE: bool> SetAdapter<T, C, P, UNIQUE>
where
	C: Compare<T>,
	P: Balance,
{
	/// Removes the first value equal to `value` and returns it.
	pub fn take<Q>(&mut self, value: &Q) -> Option<T>
	where
		T: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.tree.remove(value)
	}

	/// Removes the first value equal to `value`. Returns whether one was present.
	pub fn remove<Q>(&mut self, value: &Q) -> bool
	where
		T: Borrow<Q>,
		C: Compare<Q>,
		Q: ?Sized,
	{
		self.tree.remove(value).is_some()
	}

	/// Returns `true` if every value of `self` is also in `other`.
	///
	/// For multisets each occurrence counts: `{1, 1}` is not a subset of `{1}`.
	pub fn is_subset(&self, other: &Self) -> bool {
		if self.len() > other.len() {
			return false;
		}
		let cmp = self.tree.comparator();
		let mut theirs = other.iter();
		'ours: for ours in self.iter() {
			for candidate in theirs.by_ref() {
				match cmp.compare(candidate, ours) {
					Ordering::Less => continue,
					Ordering::Equal => continue 'ours,
					Ordering::Greater => return false,
				}
			}
			return false;
		}
		true
	}

	/// Returns `true` if every value of `other` is also in `self`.
	pub fn is_superset(&self, other: &Self) -> bool {
		other.is_subset(self)
	}

	/// Returns `true` if `self` and `other` share no value.
	pub fn is_disjoint(&self, other: &Self) -> bool {
		let cmp = self.tree.comparator();
		let mut ours = self.iter().peekable();
		let mut theirs = other.iter().peekable();
		while let (Some(a), Some(b)) = (ours.peek(), theirs.peek()) {
			match cmp.compare(a, b) {
				Ordering::Less => {
					ours.next();
				}
				Ordering::Greater => {
					theirs.next();
				}
				Ordering::Equal => return false,
			}
		}
		true
	}
}

impl<T, C, P: Balance, const UNIQUE: bool> Deref for SetAdapter<T, C, P, UNIQUE> {
	type Target = GenericTree<T, Identity, C, P, UNIQUE>;

	fn deref(&self) -> &Self::Target {
		&self.tree
	}
}

impl<T, C, P: Balance, const UNIQUE: bool> DerefMut for SetAdapter<T, C, P, UNIQUE> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.tree
	}
}

impl<T, C, P: Balance, const UNIQUE: bool> From<GenericTree<T, Identity, C, P, UNIQUE>>
	for SetAdapter<T, C, P, UNIQUE>
{
	fn from(tree: GenericTree<T, Identity, C, P, UNIQUE>) -> Self {
		SetAdapter { tree }
	}
}

impl<T, C: Default, P: Balance, const UNIQUE: bool> Default for SetAdapter<T, C, P, UNIQUE> {
	fn default() -> Self {
		SetAdapter { tree: GenericTree::default() }
	}
}

impl<T: Clone, C: Clone, P: Balance, const UNIQUE: bool> Clone for SetAdapter<T, C, P, UNIQUE> {
	fn clone(&self) -> Self {
		SetAdapter { tree: self.tree.clone() }
	}

	fn clone_from(&mut self, source: &Self) {
		self.tree.clone_from(&source.tree);
	}
}

impl<T, C, P, const UNIQUE: bool> FromIterator<T> for SetAdapter<T, C, P, UNIQUE>
where
	C: Compare<T> + Default,
	P: Balance,
{
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		SetAdapter { tree: GenericTree::from_iter(iter) }
	}
}

impl<T, C, P, const UNIQUE: bool, const N: usize> From<[T; N]> for SetAdapter<T, C, P, UNIQUE>
where
	C: Compare<T> + Default,
	P: Balance,
{
	fn from(values: [T; N]) -> Self {
		values.into_iter().collect()
	}
}

impl<T, C, P, const UNIQUE: bool> Extend<T> for SetAdapter<T, C, P, UNIQUE>
where
	C: Compare<T>,
	P: Balance,
{
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		self.tree.extend(iter);
	}
}

impl<'a, T: Copy + 'a, C, P, const UNIQUE: bool> Extend<&'a T> for SetAdapter<T, C, P, UNIQUE>
where
	C: Compare<T>,
	P: Balance,
{
	fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
		self.tree.extend(iter.into_iter().copied());
	}
}

impl<T, C, P: Balance, const UNIQUE: bool> IntoIterator for SetAdapter<T, C, P, UNIQUE> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	fn into_iter(self) -> IntoIter<T> {
		self.tree.into_iter()
	}
}

impl<'a, T, C, P: Balance, const UNIQUE: bool> IntoIterator for &'a SetAdapter<T, C, P, UNIQUE> {
	type Item = &'a T;
	type IntoIter = Iter<'a, T, P::Meta>;

	fn into_iter(self) -> Self::IntoIter {
		self.tree.iter()
	}
}

impl<T: PartialEq, C, P: Balance, const UNIQUE: bool> PartialEq for SetAdapter<T, C, P, UNIQUE> {
	fn eq(&self, other: &Self) -> bool {
		self.tree == other.tree
	}
}

impl<T: Eq, C, P: Balance, const UNIQUE: bool> Eq for SetAdapter<T, C, P, UNIQUE> {}

impl<T: PartialOrd, C, P: Balance, const UNIQUE: bool> PartialOrd for SetAdapter<T, C, P, UNIQUE> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		self.tree.partial_cmp(&other.tree)
	}
}

impl<T: Ord, C, P: Balance, const UNIQUE: bool> Ord for SetAdapter<T, C, P, UNIQUE> {
	fn cmp(&self, other: &Self) -> Ordering {
		self.tree.cmp(&other.tree)
	}
}

impl<T: Hash, C, P: Balance, const UNIQUE: bool> Hash for SetAdapter<T, C, P, UNIQUE> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.tree.hash(state);
	}
}

impl<T: fmt::Debug, C, P: Balance, const UNIQUE: bool> fmt::Debug for SetAdapter<T, C, P, UNIQUE> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.tree.iter()).finish()
	}
}
