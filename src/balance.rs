//! Balancing policies.
//!
//! A policy is chosen by type when a tree is declared and decides what
//! metadata each node carries and how the shape is repaired after the Tree
//! Core has linked or detached a node. All built-in policies are built from
//! the same two primitives, [`RawTree::rotate_left`] and
//! [`RawTree::rotate_right`].
//!
//! | Policy       | Metadata          | Insert repair            | Erase repair                   |
//! |--------------|-------------------|--------------------------|--------------------------------|
//! | [`Avl`]      | height (`i8`)     | at most one (double) rotation | may rotate at every level |
//! | [`RedBlack`] | [`Color`]         | recolor upward, ≤ 2 rotations | ≤ 3 rotations             |
//! | [`Treap`]    | priority (`u32`)  | rotate up past lower priorities | none                    |

use std::cmp::max;
use std::fmt;

use crate::node::{Detached, NodeId, RawTree};

/// A strategy for keeping a binary search tree balanced.
///
/// The Tree Core calls [`rebalance_after_insert`](Balance::rebalance_after_insert)
/// right after linking a fresh leaf and
/// [`rebalance_after_erase`](Balance::rebalance_after_erase) right after
/// detaching a node, before that node is freed. In both cases the BST order
/// already holds; the policy may only rotate and update metadata.
pub trait Balance {
	/// Per-node balancing metadata.
	type Meta: Copy + fmt::Debug + fmt::Display;

	/// Metadata of a freshly allocated leaf.
	fn leaf() -> Self::Meta;

	/// Restores the policy's invariant after `node` was linked as a leaf.
	fn rebalance_after_insert<V>(tree: &mut RawTree<V, Self::Meta>, node: NodeId);

	/// Restores the policy's invariant after a node was detached.
	fn rebalance_after_erase<V>(tree: &mut RawTree<V, Self::Meta>, detached: Detached<Self::Meta>);

	/// Panics with a diagnostic if the policy's invariant does not hold.
	#[cfg(any(test, feature = "test-utils"))]
	fn assert_balanced<V>(_tree: &RawTree<V, Self::Meta>) {}
}

// ===========================================================================
// AVL
// ===========================================================================

/// Height-balanced policy: sibling subtree heights differ by at most one.
///
/// Each node stores the height of its subtree, with a leaf at `1` and an
/// absent child counting as `0`. An `i8` is ample: an AVL tree of height 127
/// would need more nodes than fit in memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Avl;

impl Avl {
	#[inline]
	fn height<V>(tree: &RawTree<V, i8>, id: Option<NodeId>) -> i8 {
		id.map_or(0, |id| *tree.meta(id))
	}

	#[inline]
	fn child_heights<V>(tree: &RawTree<V, i8>, id: NodeId) -> (i8, i8) {
		(Self::height(tree, tree.left(id)), Self::height(tree, tree.right(id)))
	}

	#[inline]
	fn update_height<V>(tree: &mut RawTree<V, i8>, id: NodeId) {
		let (lh, rh) = Self::child_heights(tree, id);
		*tree.meta_mut(id) = 1 + max(lh, rh);
	}

	/// Repairs a right-heavy `x`; returns the new root of the subtree.
	fn fix_right_heavy<V>(tree: &mut RawTree<V, i8>, x: NodeId) -> NodeId {
		let r = tree.right(x).expect("right-heavy node has a right child");
		let (rl, rr) = Self::child_heights(tree, r);
		if rl > rr {
			tree.rotate_right(r);
			Self::update_height(tree, r);
		}
		tree.rotate_left(x);
		Self::update_height(tree, x);
		let top = tree.parent(x).expect("rotation leaves x with a parent");
		Self::update_height(tree, top);
		top
	}

	/// Repairs a left-heavy `x`; returns the new root of the subtree.
	fn fix_left_heavy<V>(tree: &mut RawTree<V, i8>, x: NodeId) -> NodeId {
		let l = tree.left(x).expect("left-heavy node has a left child");
		let (ll, lr) = Self::child_heights(tree, l);
		if lr > ll {
			tree.rotate_left(l);
			Self::update_height(tree, l);
		}
		tree.rotate_right(x);
		Self::update_height(tree, x);
		let top = tree.parent(x).expect("rotation leaves x with a parent");
		Self::update_height(tree, top);
		top
	}

	#[cfg(any(test, feature = "test-utils"))]
	fn check_subtree<V>(tree: &RawTree<V, i8>, id: Option<NodeId>) -> i8 {
		let Some(id) = id else {
			return 0;
		};
		let lh = Self::check_subtree(tree, tree.left(id));
		let rh = Self::check_subtree(tree, tree.right(id));
		assert!((lh - rh).abs() <= 1, "AVL balance violated at {:?}: left {} right {}", id, lh, rh);
		let expected = 1 + max(lh, rh);
		assert_eq!(*tree.meta(id), expected, "stale AVL height at {:?}", id);
		expected
	}
}

impl Balance for Avl {
	type Meta = i8;

	fn leaf() -> i8 {
		1
	}

	fn rebalance_after_insert<V>(tree: &mut RawTree<V, i8>, node: NodeId) {
		let mut cursor = tree.parent(node);
		while let Some(x) = cursor {
			let (lh, rh) = Self::child_heights(tree, x);
			let h = 1 + max(lh, rh);
			// A balance factor of ±2 always comes with a height change, so an
			// unchanged height means nothing above moved either.
			if *tree.meta(x) == h {
				break;
			}
			*tree.meta_mut(x) = h;

			let top = match lh - rh {
				diff if diff <= -2 => Self::fix_right_heavy(tree, x),
				diff if diff >= 2 => Self::fix_left_heavy(tree, x),
				_ => x,
			};
			cursor = tree.parent(top);
		}
	}

	fn rebalance_after_erase<V>(tree: &mut RawTree<V, i8>, detached: Detached<i8>) {
		let mut cursor = detached.parent;
		while let Some(x) = cursor {
			let (lh, rh) = Self::child_heights(tree, x);
			let top = match lh - rh {
				diff if diff <= -2 => Self::fix_right_heavy(tree, x),
				diff if diff >= 2 => Self::fix_left_heavy(tree, x),
				_ => {
					let h = 1 + max(lh, rh);
					if *tree.meta(x) == h {
						break;
					}
					*tree.meta_mut(x) = h;
					x
				}
			};
			cursor = tree.parent(top);
		}
	}

	#[cfg(any(test, feature = "test-utils"))]
	fn assert_balanced<V>(tree: &RawTree<V, i8>) {
		Self::check_subtree(tree, tree.root());
	}
}

// ===========================================================================
// Red-Black
// ===========================================================================

/// Node color for the [`RedBlack`] policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
	Red,
	Black,
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Color::Red => "R",
			Color::Black => "B",
		})
	}
}

/// Color-balanced policy.
///
/// The root is black, a red node never has a red child, and every path from
/// a node down to an absent child crosses the same number of black nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RedBlack;

impl RedBlack {
	/// Absent children count as black.
	#[inline]
	fn is_red<V>(tree: &RawTree<V, Color>, id: Option<NodeId>) -> bool {
		id.is_some_and(|id| *tree.meta(id) == Color::Red)
	}

	#[inline]
	fn paint<V>(tree: &mut RawTree<V, Color>, id: NodeId, color: Color) {
		*tree.meta_mut(id) = color;
	}

	#[cfg(any(test, feature = "test-utils"))]
	fn black_height<V>(tree: &RawTree<V, Color>, id: Option<NodeId>) -> usize {
		let Some(id) = id else {
			return 1;
		};
		let color = *tree.meta(id);
		if color == Color::Red {
			assert!(
				!Self::is_red(tree, tree.left(id)) && !Self::is_red(tree, tree.right(id)),
				"red node {:?} has a red child",
				id
			);
		}
		let lbh = Self::black_height(tree, tree.left(id));
		let rbh = Self::black_height(tree, tree.right(id));
		assert_eq!(lbh, rbh, "black-height differs below {:?}", id);
		lbh + usize::from(color == Color::Black)
	}
}

impl Balance for RedBlack {
	type Meta = Color;

	fn leaf() -> Color {
		Color::Red
	}

	fn rebalance_after_insert<V>(tree: &mut RawTree<V, Color>, node: NodeId) {
		let mut x = node;
		while let Some(p) = tree.parent(x) {
			if *tree.meta(p) == Color::Black {
				break;
			}
			let g = tree.parent(p).expect("a red parent is never the root");

			if tree.left(g) == Some(p) {
				let uncle = tree.right(g);
				if let Some(u) = uncle.filter(|&u| *tree.meta(u) == Color::Red) {
					Self::paint(tree, p, Color::Black);
					Self::paint(tree, u, Color::Black);
					Self::paint(tree, g, Color::Red);
					x = g;
				} else {
					// Inner grandchild: turn it into an outer one first.
					let p = if tree.right(p) == Some(x) {
						tree.rotate_left(p);
						x
					} else {
						p
					};
					Self::paint(tree, p, Color::Black);
					Self::paint(tree, g, Color::Red);
					tree.rotate_right(g);
					break;
				}
			} else {
				let uncle = tree.left(g);
				if let Some(u) = uncle.filter(|&u| *tree.meta(u) == Color::Red) {
					Self::paint(tree, p, Color::Black);
					Self::paint(tree, u, Color::Black);
					Self::paint(tree, g, Color::Red);
					x = g;
				} else {
					let p = if tree.left(p) == Some(x) {
						tree.rotate_right(p);
						x
					} else {
						p
					};
					Self::paint(tree, p, Color::Black);
					Self::paint(tree, g, Color::Red);
					tree.rotate_left(g);
					break;
				}
			}
		}

		if let Some(root) = tree.root() {
			Self::paint(tree, root, Color::Black);
		}
	}

	fn rebalance_after_erase<V>(tree: &mut RawTree<V, Color>, detached: Detached<Color>) {
		if detached.removed == Color::Red {
			return;
		}

		// `x` carries an extra black; `None` stands for an absent child.
		let mut x = detached.child;
		let mut parent = detached.parent;

		while x != tree.root() && !Self::is_red(tree, x) {
			let Some(p) = parent else {
				break;
			};

			if tree.left(p) == x {
				let mut w = tree.right(p).expect("double-black node has a sibling");
				if *tree.meta(w) == Color::Red {
					Self::paint(tree, w, Color::Black);
					Self::paint(tree, p, Color::Red);
					tree.rotate_left(p);
					w = tree.right(p).expect("double-black node has a sibling");
				}
				if !Self::is_red(tree, tree.left(w)) && !Self::is_red(tree, tree.right(w)) {
					Self::paint(tree, w, Color::Red);
					x = Some(p);
					parent = tree.parent(p);
				} else {
					if !Self::is_red(tree, tree.right(w)) {
						let near = tree.left(w).expect("red near nephew exists");
						Self::paint(tree, near, Color::Black);
						Self::paint(tree, w, Color::Red);
						tree.rotate_right(w);
						w = tree.right(p).expect("double-black node has a sibling");
					}
					let color = *tree.meta(p);
					Self::paint(tree, w, color);
					Self::paint(tree, p, Color::Black);
					if let Some(far) = tree.right(w) {
						Self::paint(tree, far, Color::Black);
					}
					tree.rotate_left(p);
					x = tree.root();
					break;
				}
			} else {
				let mut w = tree.left(p).expect("double-black node has a sibling");
				if *tree.meta(w) == Color::Red {
					Self::paint(tree, w, Color::Black);
					Self::paint(tree, p, Color::Red);
					tree.rotate_right(p);
					w = tree.left(p).expect("double-black node has a sibling");
				}
				if !Self::is_red(tree, tree.left(w)) && !Self::is_red(tree, tree.right(w)) {
					Self::paint(tree, w, Color::Red);
					x = Some(p);
					parent = tree.parent(p);
				} else {
					if !Self::is_red(tree, tree.left(w)) {
						let near = tree.right(w).expect("red near nephew exists");
						Self::paint(tree, near, Color::Black);
						Self::paint(tree, w, Color::Red);
						tree.rotate_left(w);
						w = tree.left(p).expect("double-black node has a sibling");
					}
					let color = *tree.meta(p);
					Self::paint(tree, w, color);
					Self::paint(tree, p, Color::Black);
					if let Some(far) = tree.left(w) {
						Self::paint(tree, far, Color::Black);
					}
					tree.rotate_right(p);
					x = tree.root();
					break;
				}
			}
		}

		if let Some(x) = x {
			Self::paint(tree, x, Color::Black);
		}
	}

	#[cfg(any(test, feature = "test-utils"))]
	fn assert_balanced<V>(tree: &RawTree<V, Color>) {
		if let Some(root) = tree.root() {
			assert_eq!(*tree.meta(root), Color::Black, "root is not black");
		}
		Self::black_height(tree, tree.root());
	}
}

// ===========================================================================
// Treap
// ===========================================================================

/// Randomized policy: a binary search tree by value and a max-heap by a
/// random priority drawn when the node is allocated.
///
/// The expected depth is logarithmic whatever the insertion order. Erase
/// needs no repair: when a two-child node is detached its successor takes
/// over its priority, and a spliced child never outranks its new parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Treap;

impl Balance for Treap {
	type Meta = u32;

	fn leaf() -> u32 {
		rand::random()
	}

	fn rebalance_after_insert<V>(tree: &mut RawTree<V, u32>, node: NodeId) {
		let priority = *tree.meta(node);
		while let Some(p) = tree.parent(node) {
			if *tree.meta(p) >= priority {
				break;
			}
			if tree.left(p) == Some(node) {
				tree.rotate_right(p);
			} else {
				tree.rotate_left(p);
			}
		}
	}

	fn rebalance_after_erase<V>(_tree: &mut RawTree<V, u32>, _detached: Detached<u32>) {}

	#[cfg(any(test, feature = "test-utils"))]
	fn assert_balanced<V>(tree: &RawTree<V, u32>) {
		let mut stack: Vec<NodeId> = tree.root().into_iter().collect();
		while let Some(id) = stack.pop() {
			let priority = *tree.meta(id);
			for child in [tree.left(id), tree.right(id)].into_iter().flatten() {
				assert!(
					*tree.meta(child) <= priority,
					"heap order violated below {:?}: {} under {}",
					id,
					tree.meta(child),
					priority
				);
				stack.push(child);
			}
		}
	}
}
