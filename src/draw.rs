//! Textual rendering of tree shape, for tests and debugging.

use std::fmt::{self, Write};

use crate::balance::Balance;
use crate::node::{NodeId, RawTree};
use crate::GenericTree;

const BRANCH: &str = "|-- ";
const LAST: &str = "L-- ";

impl<V: fmt::Debug, X, C, P: Balance, const UNIQUE: bool> GenericTree<V, X, C, P, UNIQUE> {
	/// Renders the tree shape, one node per line as `value(meta)`.
	///
	/// The left child is listed before the right child. A node with only one
	/// child shows the missing one as `-` so the sides stay distinguishable.
	/// An empty tree renders as an empty string.
	///
	/// ```
	/// use yewtree::AvlSet;
	///
	/// let set: AvlSet<i32> = [1, 2, 3, 4].into_iter().collect();
	/// assert_eq!(set.draw(), "2(3)\n|-- 1(1)\nL-- 3(2)\n    |-- -\n    L-- 4(1)\n");
	/// ```
	pub fn draw(&self) -> String {
		let mut out = String::new();
		// Formatting into a String cannot fail.
		let _ = render(&self.raw, &mut out);
		out
	}
}

/// One line still to be written: the node (or a missing child), the prefix
/// for its own line and the prefix its children inherit.
struct Pending {
	node: Option<NodeId>,
	lead: String,
	indent: String,
}

fn render<V: fmt::Debug, M: fmt::Display>(raw: &RawTree<V, M>, out: &mut String) -> fmt::Result {
	let Some(root) = raw.root() else {
		return Ok(());
	};
	let mut stack = vec![Pending { node: Some(root), lead: String::new(), indent: String::new() }];

	while let Some(Pending { node, lead, indent }) = stack.pop() {
		let Some(id) = node else {
			writeln!(out, "{}-", lead)?;
			continue;
		};
		writeln!(out, "{}{:?}({})", lead, raw.value(id), raw.meta(id))?;

		let (left, right) = (raw.left(id), raw.right(id));
		if left.is_none() && right.is_none() {
			continue;
		}
		// Right is pushed first so the left child is written first.
		stack.push(Pending { node: right, lead: format!("{}{}", indent, LAST), indent: format!("{}    ", indent) });
		stack.push(Pending { node: left, lead: format!("{}{}", indent, BRANCH), indent: format!("{}|   ", indent) });
	}
	Ok(())
}
