//! Node storage and the link-level binary search tree primitives.
//!
//! Every node lives in a slot [`Arena`] owned by one [`RawTree`]. Links between
//! nodes (`parent`, `left`, `right`) are [`NodeId`] handles into that arena,
//! never owning pointers, so the cyclic parent/child graph needs no `unsafe`
//! and no reference counting.
//!
//! ```text
//!   RawTree                                 Arena slots
//!  ┌───────────────┐        ┌────────┬────────┬────────┬────────┐
//!  │ root      ────┼──────► │ 0: 20  │ 1: 10  │ 2: --  │ 3: 30  │
//!  │ leftmost  ────┼──┐     │ p: -   │ p: 0   │ vacant │ p: 0   │
//!  │ rightmost ────┼┐ │     │ l: 1   │ l: -   │ next:- │ l: -   │
//!  └───────────────┘│ │     │ r: 3   │ r: -   │        │ r: -   │
//!                   │ └───► └────────┴────────┴────────┴────────┘
//!                   └──────────────────────────────────► slot 3
//! ```
//!
//! `RawTree` knows nothing about ordering or balancing. It offers the
//! structural vocabulary shared by every policy: rotations, in-order
//! successor/predecessor, linking a new leaf and detaching a node.

use std::fmt;
use std::ops::{Index, IndexMut};

use smallvec::SmallVec;

use crate::error::{self, Error};

/// A stable handle to one element of a tree.
///
/// A `NodeId` stays valid, and keeps referring to the same element, across
/// any number of insertions and across erasure of *other* elements. Once its
/// own element is erased the handle becomes stale; the slot may be reused,
/// but with a new generation, so the stale handle is never mistaken for the
/// new occupant. A slot that has used up all `u32` generations is retired
/// rather than reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
	index: u32,
	generation: u32,
}

impl NodeId {
	/// Slot index of this handle inside its arena.
	#[inline]
	pub fn index(self) -> u32 {
		self.index
	}

	/// Generation of the slot at the time this handle was issued.
	#[inline]
	pub fn generation(self) -> u32 {
		self.generation
	}
}

impl fmt::Debug for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "NodeId({}v{})", self.index, self.generation)
	}
}

/// A value-bearing tree node.
pub(crate) struct Node<V, M> {
	pub(crate) value: V,
	pub(crate) parent: Option<NodeId>,
	pub(crate) left: Option<NodeId>,
	pub(crate) right: Option<NodeId>,
	pub(crate) meta: M,
}

impl<V, M> Node<V, M> {
	/// Creates an unlinked node.
	pub(crate) fn new(value: V, meta: M) -> Self {
		Node { value, parent: None, left: None, right: None, meta }
	}
}

// ===========================================================================
// Arena
// ===========================================================================

enum Slot<V, M> {
	Occupied { generation: u32, node: Node<V, M> },
	Vacant { generation: u32, next_free: Option<u32> },
}

/// Slot storage for nodes with an intrusive free list.
///
/// Allocation pops the free list before growing the backing vector, so the
/// arena never holds more slots than the peak number of live nodes.
///
/// A slot whose generation is exhausted is retired on free: it never rejoins
/// the free list, so no generation is ever issued twice for the same index.
pub(crate) struct Arena<V, M> {
	slots: Vec<Slot<V, M>>,
	free_head: Option<u32>,
	len: usize,
	retired: usize,
}

impl<V, M> Arena<V, M> {
	pub(crate) fn new() -> Self {
		Arena { slots: Vec::new(), free_head: None, len: 0, retired: 0 }
	}

	pub(crate) fn with_capacity(capacity: usize) -> Self {
		Arena { slots: Vec::with_capacity(capacity), free_head: None, len: 0, retired: 0 }
	}

	/// Number of live nodes.
	#[inline]
	pub(crate) fn len(&self) -> usize {
		self.len
	}

	/// Number of nodes the arena can hold without reallocating.
	pub(crate) fn capacity(&self) -> usize {
		self.slots.capacity()
	}

	/// Slots on the free list.
	fn vacant(&self) -> usize {
		self.slots.len() - self.len - self.retired
	}

	pub(crate) fn reserve(&mut self, additional: usize) {
		let needed = additional.saturating_sub(self.vacant());
		self.slots.reserve(needed);
	}

	pub(crate) fn try_reserve(&mut self, additional: usize) -> error::Result<()> {
		let needed = additional.saturating_sub(self.vacant());
		if needed == 0 {
			return Ok(());
		}
		if self.slots.len().saturating_add(needed) > u32::MAX as usize {
			return Err(Error::CapacityOverflow);
		}
		self.slots.try_reserve(needed).map_err(|e| {
			log::debug!("node arena failed to grow by {} slots: {}", needed, e);
			Error::from(e)
		})
	}

	/// Stores `node` and returns its handle.
	///
	/// # Panics
	///
	/// Panics if the arena would exceed `u32::MAX` slots.
	pub(crate) fn alloc(&mut self, node: Node<V, M>) -> NodeId {
		let id = match self.free_head {
			Some(index) => {
				let slot = &mut self.slots[index as usize];
				let (generation, next_free) = match *slot {
					Slot::Vacant { generation, next_free } => (generation, next_free),
					Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
				};
				*slot = Slot::Occupied { generation, node };
				self.free_head = next_free;
				NodeId { index, generation }
			}
			None => {
				let index =
					u32::try_from(self.slots.len()).expect("node arena exceeds u32::MAX slots");
				if self.slots.len() == self.slots.capacity() {
					log::trace!("node arena growing past {} slots", self.slots.capacity());
				}
				self.slots.push(Slot::Occupied { generation: 0, node });
				NodeId { index, generation: 0 }
			}
		};
		self.len += 1;
		id
	}

	/// Releases the slot behind `id` and returns its node.
	///
	/// # Panics
	///
	/// Panics if `id` is stale.
	pub(crate) fn free(&mut self, id: NodeId) -> Node<V, M> {
		assert!(self.contains(id), "freeing stale node handle {:?}", id);
		let next_generation = id.generation.checked_add(1);
		let vacant = match next_generation {
			Some(generation) => Slot::Vacant { generation, next_free: self.free_head },
			None => Slot::Vacant { generation: id.generation, next_free: None },
		};
		match std::mem::replace(&mut self.slots[id.index as usize], vacant) {
			Slot::Occupied { node, .. } => {
				if next_generation.is_some() {
					self.free_head = Some(id.index);
				} else {
					log::debug!("retiring node slot {} with exhausted generation", id.index);
					self.retired += 1;
				}
				self.len -= 1;
				node
			}
			Slot::Vacant { .. } => unreachable!("slot checked occupied above"),
		}
	}

	#[inline]
	pub(crate) fn contains(&self, id: NodeId) -> bool {
		matches!(
			self.slots.get(id.index as usize),
			Some(Slot::Occupied { generation, .. }) if *generation == id.generation
		)
	}

	#[inline]
	pub(crate) fn get(&self, id: NodeId) -> Option<&Node<V, M>> {
		match self.slots.get(id.index as usize) {
			Some(Slot::Occupied { generation, node }) if *generation == id.generation => Some(node),
			_ => None,
		}
	}

	#[inline]
	pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<V, M>> {
		match self.slots.get_mut(id.index as usize) {
			Some(Slot::Occupied { generation, node }) if *generation == id.generation => Some(node),
			_ => None,
		}
	}
}

impl<V, M> Index<NodeId> for Arena<V, M> {
	type Output = Node<V, M>;

	#[inline]
	fn index(&self, id: NodeId) -> &Node<V, M> {
		match self.get(id) {
			Some(node) => node,
			None => panic!("stale node handle {:?}", id),
		}
	}
}

impl<V, M> IndexMut<NodeId> for Arena<V, M> {
	#[inline]
	fn index_mut(&mut self, id: NodeId) -> &mut Node<V, M> {
		match self.get_mut(id) {
			Some(node) => node,
			None => panic!("stale node handle {:?}", id),
		}
	}
}

// ===========================================================================
// RawTree
// ===========================================================================

/// What [`RawTree::detach`] left behind for the balancing policy.
///
/// When the detached node had two children, its in-order successor was
/// relinked into its place and took over its metadata; `removed` then holds
/// the successor's *original* metadata, because the successor's old slot is
/// the position that physically disappeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detached<M> {
	/// The node that moved into the vacated position, if any.
	pub child: Option<NodeId>,
	/// Parent of the vacated position. `None` when the vacated position is the root.
	pub parent: Option<NodeId>,
	/// Metadata of the position that physically disappeared.
	pub removed: M,
}

/// The link structure of a tree: node arena plus the cached root, minimum and
/// maximum.
///
/// `RawTree` is what a [`Balance`](crate::Balance) policy operates on. Read
/// access is available to anyone through
/// [`GenericTree::raw`](crate::GenericTree::raw); structural edits other than
/// rotations and metadata updates stay inside the crate.
///
/// Methods taking a [`NodeId`] panic if the handle is stale.
pub struct RawTree<V, M> {
	pub(crate) arena: Arena<V, M>,
	pub(crate) root: Option<NodeId>,
	pub(crate) leftmost: Option<NodeId>,
	pub(crate) rightmost: Option<NodeId>,
}

impl<V, M> RawTree<V, M> {
	pub(crate) fn new() -> Self {
		RawTree { arena: Arena::new(), root: None, leftmost: None, rightmost: None }
	}

	pub(crate) fn with_capacity(capacity: usize) -> Self {
		RawTree {
			arena: Arena::with_capacity(capacity),
			root: None,
			leftmost: None,
			rightmost: None,
		}
	}

	/// Root node, or `None` for an empty tree.
	#[inline]
	pub fn root(&self) -> Option<NodeId> {
		self.root
	}

	/// Node holding the minimum element.
	#[inline]
	pub fn leftmost(&self) -> Option<NodeId> {
		self.leftmost
	}

	/// Node holding the maximum element.
	#[inline]
	pub fn rightmost(&self) -> Option<NodeId> {
		self.rightmost
	}

	/// Number of value-bearing nodes.
	#[inline]
	pub fn len(&self) -> usize {
		self.arena.len()
	}

	/// Returns `true` if the tree has no nodes.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.arena.len() == 0
	}

	/// Returns `true` if `id` refers to a live node of this tree.
	#[inline]
	pub fn contains(&self, id: NodeId) -> bool {
		self.arena.contains(id)
	}

	#[inline]
	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.arena[id].parent
	}

	#[inline]
	pub fn left(&self, id: NodeId) -> Option<NodeId> {
		self.arena[id].left
	}

	#[inline]
	pub fn right(&self, id: NodeId) -> Option<NodeId> {
		self.arena[id].right
	}

	#[inline]
	pub fn value(&self, id: NodeId) -> &V {
		&self.arena[id].value
	}

	/// Balancing metadata of a node.
	#[inline]
	pub fn meta(&self, id: NodeId) -> &M {
		&self.arena[id].meta
	}

	/// Mutable balancing metadata of a node.
	#[inline]
	pub fn meta_mut(&mut self, id: NodeId) -> &mut M {
		&mut self.arena[id].meta
	}

	/// Leftmost node of the subtree rooted at `id`.
	pub fn minimum(&self, mut id: NodeId) -> NodeId {
		while let Some(left) = self.arena[id].left {
			id = left;
		}
		id
	}

	/// Rightmost node of the subtree rooted at `id`.
	pub fn maximum(&self, mut id: NodeId) -> NodeId {
		while let Some(right) = self.arena[id].right {
			id = right;
		}
		id
	}

	/// In-order successor of `id`, or `None` if `id` holds the maximum.
	pub fn successor(&self, id: NodeId) -> Option<NodeId> {
		if let Some(right) = self.arena[id].right {
			return Some(self.minimum(right));
		}
		let mut child = id;
		let mut parent = self.arena[id].parent;
		while let Some(p) = parent {
			if self.arena[p].right != Some(child) {
				break;
			}
			child = p;
			parent = self.arena[p].parent;
		}
		parent
	}

	/// In-order predecessor of `id`, or `None` if `id` holds the minimum.
	pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
		if let Some(left) = self.arena[id].left {
			return Some(self.maximum(left));
		}
		let mut child = id;
		let mut parent = self.arena[id].parent;
		while let Some(p) = parent {
			if self.arena[p].left != Some(child) {
				break;
			}
			child = p;
			parent = self.arena[p].parent;
		}
		parent
	}

	/// Number of levels on the longest root-to-leaf path. O(n).
	pub fn height(&self) -> usize {
		let mut stack: SmallVec<[(NodeId, usize); 64]> = SmallVec::new();
		stack.extend(self.root.map(|root| (root, 1)));
		let mut height = 0;
		while let Some((id, depth)) = stack.pop() {
			height = height.max(depth);
			let node = &self.arena[id];
			stack.extend(node.left.map(|left| (left, depth + 1)));
			stack.extend(node.right.map(|right| (right, depth + 1)));
		}
		height
	}

	/// Points `parent`'s link that currently holds `old` at `new` instead, or
	/// replaces the root when `parent` is `None`.
	fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
		match parent {
			None => self.root = new,
			Some(p) => {
				let node = &mut self.arena[p];
				if node.left == Some(old) {
					node.left = new;
				} else {
					node.right = new;
				}
			}
		}
	}

	/// Rotates the subtree rooted at `x` to the left.
	///
	/// ```text
	///     x                y
	///    / \              / \
	///   a   y     =>     x   c
	///      / \          / \
	///     b   c        a   b
	/// ```
	///
	/// Only `x`, `y` and `b` change links; the subtree is reattached to `x`'s
	/// former parent, or becomes the root.
	///
	/// # Panics
	///
	/// Panics if `x` has no right child.
	pub fn rotate_left(&mut self, x: NodeId) {
		let y = self.arena[x].right.expect("rotate_left requires a right child");
		let b = self.arena[y].left;

		self.arena[x].right = b;
		if let Some(b) = b {
			self.arena[b].parent = Some(x);
		}

		let parent = self.arena[x].parent;
		self.arena[y].parent = parent;
		self.replace_child(parent, x, Some(y));

		self.arena[y].left = Some(x);
		self.arena[x].parent = Some(y);
	}

	/// Rotates the subtree rooted at `x` to the right.
	///
	/// ```text
	///       x            y
	///      / \          / \
	///     y   c   =>   a   x
	///    / \              / \
	///   a   b            b   c
	/// ```
	///
	/// # Panics
	///
	/// Panics if `x` has no left child.
	pub fn rotate_right(&mut self, x: NodeId) {
		let y = self.arena[x].left.expect("rotate_right requires a left child");
		let b = self.arena[y].right;

		self.arena[x].left = b;
		if let Some(b) = b {
			self.arena[b].parent = Some(x);
		}

		let parent = self.arena[x].parent;
		self.arena[y].parent = parent;
		self.replace_child(parent, x, Some(y));

		self.arena[y].right = Some(x);
		self.arena[x].parent = Some(y);
	}

	/// Links the unlinked node `id` as a leaf under `parent` and refreshes the
	/// cached minimum/maximum.
	///
	/// `parent == None` makes `id` the root of an empty tree.
	pub(crate) fn link(&mut self, id: NodeId, parent: Option<NodeId>, as_left: bool) {
		self.arena[id].parent = parent;
		match parent {
			None => {
				debug_assert!(self.root.is_none(), "linking a second root");
				self.root = Some(id);
				self.leftmost = Some(id);
				self.rightmost = Some(id);
			}
			Some(p) if as_left => {
				debug_assert!(self.arena[p].left.is_none());
				self.arena[p].left = Some(id);
				if self.leftmost == Some(p) {
					self.leftmost = Some(id);
				}
			}
			Some(p) => {
				debug_assert!(self.arena[p].right.is_none());
				self.arena[p].right = Some(id);
				if self.rightmost == Some(p) {
					self.rightmost = Some(id);
				}
			}
		}
	}

	/// Unlinks `x` from the tree without freeing it.
	///
	/// A node with at most one child is spliced out directly. A node with two
	/// children is replaced by its in-order successor *node*: the successor is
	/// relinked into `x`'s position and takes over `x`'s metadata, and its own
	/// former position is the one that physically disappears. No value moves,
	/// so handles to every other element stay valid.
	pub(crate) fn detach(&mut self, x: NodeId) -> Detached<M>
	where
		M: Copy,
	{
		let Node { parent, left, right, .. } = self.arena[x];

		let detached = match (left, right) {
			(Some(l), Some(r)) => {
				let s = self.minimum(r);
				let child = self.arena[s].right;

				self.arena[l].parent = Some(s);
				self.arena[s].left = Some(l);

				let child_parent = if s == r {
					s
				} else {
					let sp = self.arena[s].parent.expect("successor below x has a parent");
					if let Some(c) = child {
						self.arena[c].parent = Some(sp);
					}
					self.arena[sp].left = child;
					self.arena[s].right = Some(r);
					self.arena[r].parent = Some(s);
					sp
				};

				self.replace_child(parent, x, Some(s));
				self.arena[s].parent = parent;

				let meta = self.arena[x].meta;
				let removed = std::mem::replace(&mut self.arena[s].meta, meta);
				Detached { child, parent: Some(child_parent), removed }
			}
			_ => {
				let child = left.or(right);
				if let Some(c) = child {
					self.arena[c].parent = parent;
				}
				self.replace_child(parent, x, child);

				if self.leftmost == Some(x) {
					self.leftmost = match child {
						Some(c) => Some(self.minimum(c)),
						None => parent,
					};
				}
				if self.rightmost == Some(x) {
					self.rightmost = match child {
						Some(c) => Some(self.maximum(c)),
						None => parent,
					};
				}
				Detached { child, parent, removed: self.arena[x].meta }
			}
		};

		let node = &mut self.arena[x];
		node.parent = None;
		node.left = None;
		node.right = None;
		detached
	}

	/// Frees every node with an iterative post-order walk over the parent
	/// links. Uses no auxiliary storage, so arbitrarily deep chains are fine.
	pub(crate) fn clear(&mut self) {
		let mut cursor = self.root.take();
		self.leftmost = None;
		self.rightmost = None;

		while let Some(id) = cursor {
			let node = &self.arena[id];
			if let Some(left) = node.left {
				cursor = Some(left);
			} else if let Some(right) = node.right {
				cursor = Some(right);
			} else {
				let parent = node.parent;
				if let Some(p) = parent {
					let p = &mut self.arena[p];
					if p.left == Some(id) {
						p.left = None;
					} else {
						p.right = None;
					}
				}
				drop(self.arena.free(id));
				cursor = parent;
			}
		}
	}
}

impl<V: Clone, M: Copy> RawTree<V, M> {
	/// Appends a copy of `src`'s nodes to this empty tree, preserving shape
	/// and metadata. Iterative pre-order walk.
	pub(crate) fn copy_from(&mut self, src: &RawTree<V, M>) {
		debug_assert!(self.root.is_none(), "copy_from requires an empty destination");
		self.arena.reserve(src.len());

		// (source node, destination parent, attach as left child)
		let mut stack: SmallVec<[(NodeId, Option<NodeId>, bool); 64]> = SmallVec::new();
		stack.extend(src.root.map(|root| (root, None, false)));

		while let Some((id, parent, as_left)) = stack.pop() {
			let node = &src.arena[id];
			let copy = self.arena.alloc(Node::new(node.value.clone(), node.meta));
			self.arena[copy].parent = parent;
			match parent {
				None => self.root = Some(copy),
				Some(p) if as_left => self.arena[p].left = Some(copy),
				Some(p) => self.arena[p].right = Some(copy),
			}
			stack.extend(node.right.map(|right| (right, Some(copy), false)));
			stack.extend(node.left.map(|left| (left, Some(copy), true)));
		}

		self.leftmost = self.root.map(|root| self.minimum(root));
		self.rightmost = self.root.map(|root| self.maximum(root));
	}
}
