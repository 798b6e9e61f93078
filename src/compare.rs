//! Ordering and key projection.
//!
//! The Tree Core orders stored values by `compare(key_of(a), key_of(b))`,
//! where [`KeyOf`] projects the ordering key out of a stored value and
//! [`Compare`] is a total order over keys. Sets project with [`Identity`],
//! maps with [`First`].

use std::cmp::Ordering;

/// A total order over `T`.
///
/// Implementations must be consistent (a strict weak ordering) and must not
/// change their answers while a tree holds values ordered by them. A
/// comparator that violates this leaves the tree's order unspecified, though
/// never memory-unsafe.
///
/// Any `Fn(&T, &T) -> Ordering` closure is a comparator.
pub trait Compare<T: ?Sized> {
	fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Ascending order via [`Ord`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		a.cmp(b)
	}
}

/// Descending order via [`Ord`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Descending;

impl<T: Ord + ?Sized> Compare<T> for Descending {
	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		b.cmp(a)
	}
}

impl<T: ?Sized, F> Compare<T> for F
where
	F: Fn(&T, &T) -> Ordering,
{
	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		self(a, b)
	}
}

/// Extracts the ordering key from a stored value.
pub trait KeyOf<V> {
	type Key: ?Sized;

	fn key_of(value: &V) -> &Self::Key;
}

/// The value is its own key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Identity;

impl<T> KeyOf<T> for Identity {
	type Key = T;

	#[inline]
	fn key_of(value: &T) -> &T {
		value
	}
}

/// The key is the first component of a `(key, mapped)` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct First;

impl<K, V> KeyOf<(K, V)> for First {
	type Key = K;

	#[inline]
	fn key_of(value: &(K, V)) -> &K {
		&value.0
	}
}
