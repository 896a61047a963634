//! Red-black tree collections for Rust.
//!
//! This crate provides [`RBTreeMap`], an ordered map backed by a red-black
//! binary search tree, and [`IndexedPriorityQueue`], a binary heap with an
//! auxiliary position index. Both guarantee O(log n) mutating operations:
//!
//! - [`insert`](RBTreeMap::insert) / [`get`](RBTreeMap::get) /
//!   [`remove`](RBTreeMap::remove) - the usual map operations
//! - [`first_key_value`](RBTreeMap::first_key_value) /
//!   [`last_key_value`](RBTreeMap::last_key_value) - min and max
//! - [`successor`](RBTreeMap::successor) /
//!   [`predecessor`](RBTreeMap::predecessor) - single-step neighbor queries
//! - [`validate`](RBTreeMap::validate) - diagnostic check of the red-black
//!   invariants
//!
//! # Example
//!
//! ```
//! use rubi_tree::RBTreeMap;
//!
//! let mut deadlines = RBTreeMap::new();
//! deadlines.insert(20260301, "taxes");
//! deadlines.insert(20250115, "renewal");
//! deadlines.insert(20251224, "presents");
//!
//! // Standard map operations work as expected
//! assert_eq!(deadlines.get(&20260301), Some(&"taxes"));
//! assert_eq!(deadlines.len(), 3);
//!
//! // Order-statistic queries (O(log n))
//! assert_eq!(deadlines.first_key_value(), Some((&20250115, &"renewal")));
//! let (&next, _) = deadlines.successor(&20250115).unwrap();
//! assert_eq!(next, 20251224);
//!
//! // Iteration is always in ascending key order
//! let keys: Vec<_> = deadlines.keys().copied().collect();
//! assert_eq!(keys, [20250115, 20251224, 20260301]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Familiar API** - The map mirrors `std::collections::BTreeMap` where the
//!   operations overlap
//! - **Checkable invariants** - [`RBTreeMap::validate`] verifies coloring,
//!   black-height, and ordering on demand
//!
//! # Implementation
//!
//! The map is a classic red-black tree (every node RED or BLACK, root BLACK,
//! no RED node with a RED child, equal black-height on every root-to-leaf
//! path), which bounds the height at 2·log2(n+1). Nodes live in a slot arena
//! addressed by stable handles rather than individually boxed, so parent
//! links are plain indices and no ownership cycles exist.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod priority_queue;
pub mod rbtree_map;

pub use error::{Error, Result};
pub use priority_queue::IndexedPriorityQueue;
pub use rbtree_map::RBTreeMap;
