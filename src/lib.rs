//! # persistent-vector
//!
//! A persistent (immutable) vector based on a 32-way branching trie with a
//! tail buffer, in the tradition of Clojure's `PersistentVector`.
//!
//! ## Overview
//!
//! [`PersistentVector`] is an array-like container addressed by a contiguous,
//! zero-based integer index. Every mutating operation returns a new logical
//! vector; the prior version remains valid and observable. Sharing between
//! versions is structural, so the cost of an update is bounded by the depth
//! of the trie, not by the vector's size:
//!
//! - O(log32 N) random access (effectively O(1) for practical sizes)
//! - O(log32 N) `push_back`, amortized O(1) thanks to the tail buffer
//! - O(log32 N) `set` and `pop_back`
//! - O(1) `len`, `is_empty`, and `last`
//!
//! ## Internal Structure
//!
//! The vector consists of:
//! - A root trie whose interior nodes hold up to 32 children and whose
//!   leaves hold exactly 32 values
//! - A tail buffer (up to 32 elements) absorbing appends and last-element
//!   reads without a tree walk
//!
//! ## Feature Flags
//!
//! - `arc`: share nodes with `Arc` instead of `Rc`, making vectors
//!   `Send` + `Sync`
//! - `serde`: serialize vectors as sequences of their elements
//! - `narrow-branch`: test-tuned build with branching factor 4, so small
//!   inputs exercise deep tries
//!
//! ## Example
//!
//! ```rust
//! use persistent_vector::PersistentVector;
//!
//! let vector = PersistentVector::new()
//!     .push_back(1)
//!     .push_back(2)
//!     .push_back(3);
//!
//! assert_eq!(vector.get(1), Some(&2));
//!
//! // Structural sharing: the original vector is preserved
//! let extended = vector.push_back(4);
//! assert_eq!(vector.len(), 3);     // Original unchanged
//! assert_eq!(extended.len(), 4);   // New vector
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

// =============================================================================
// Reference Counter
// =============================================================================

// Reference-counted smart pointer shared by every trie node. Nodes are
// immutable after construction and the trie is acyclic, so reference
// counting is the entire lifetime story: a node is freed exactly when the
// last vector version referencing it is dropped.
#[cfg(feature = "arc")]
pub(crate) use std::sync::Arc as Shared;

#[cfg(not(feature = "arc"))]
pub(crate) use std::rc::Rc as Shared;

mod access;
mod error;
mod iter;
mod node;
mod reduce;
mod vector;

pub use access::VectorKey;
pub use error::Error;
pub use iter::{PersistentVectorIntoIterator, PersistentVectorIterator};
pub use reduce::{Reduction, Resume, Step};
pub use vector::PersistentVector;
