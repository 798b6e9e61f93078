//! # Error Types for the Balanced Tree Engine
//!
//! Most conditions a caller can run into while using the tree are not errors:
//! a lookup miss is [`Position::End`](crate::Position::End) or `None`, and a
//! duplicate key under the unique policy is the `(position, false)` result of
//! `insert`. The variants here cover the remaining cases, where an operation
//! could not do what was asked and the tree was left untouched.
//!
//! ## Error Flow
//!
//! ```text
//! try_insert(value)
//!      │
//!      ▼
//! Locate slot (comparator only, no mutation)
//!      │
//!      ▼
//! Reserve arena slot ─────────► Err(AllocFailed | CapacityOverflow)
//!      │                              (tree unchanged)
//!      ▼ (Ok)
//! Link + rebalance
//!      │
//!      ▼
//! Ok((position, true))
//! ```
//!
//! Element operations on a [`Position`](crate::Position) validate the handle
//! first:
//!
//! ```text
//! erase(pos) ──► End?   ──► Err(EndPosition)
//!            ──► stale? ──► Err(StaleHandle(id))
//!            ──► unlink, rebalance, free ──► Ok(next)
//! ```

use std::collections::TryReserveError;

use thiserror::Error;

use crate::NodeId;

/// Errors returned by fallible tree operations.
///
/// Every operation that returns one of these leaves the tree exactly as it
/// was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// The node arena could not grow.
	///
	/// Returned by [`try_insert`](crate::GenericTree::try_insert) and
	/// [`try_reserve`](crate::GenericTree::try_reserve). The infallible
	/// counterparts abort through the global allocation error handler instead.
	#[error("node allocation failed: {0}")]
	AllocFailed(#[from] TryReserveError),

	/// The arena would need more slots than a [`NodeId`] can address.
	#[error("node arena exceeds {} addressable slots", u32::MAX)]
	CapacityOverflow,

	/// An element operation was applied to the past-the-end position.
	///
	/// The end position has no value behind it: it is the position returned
	/// by lookups that miss and by stepping past the maximum element.
	#[error("operation requires an element but the position is past the end")]
	EndPosition,

	/// The handle refers to an element that has since been erased.
	///
	/// Slots are reused after an erase, but every reuse bumps the slot's
	/// generation, so an outdated handle is detected instead of silently
	/// aliasing a newer element. A slot whose generation would wrap is
	/// retired instead of reused.
	#[error("position {0:?} no longer refers to a live element")]
	StaleHandle(NodeId),
}

/// A Result type alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
