//! Error kinds for the fallible vector operations.

use thiserror::Error;

/// Failures raised by the fallible operations on
/// [`PersistentVector`](crate::PersistentVector).
///
/// The out-of-bounds variants render the offending key in its `Debug` form,
/// so integers appear decimal, strings quoted, and composites as literals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A read was attempted past the end of the vector, or with a key that
    /// does not name an index.
    #[error("Attempt to get index {key} for vector of size {size}")]
    GetOutOfBounds {
        /// `Debug` rendering of the offending key.
        key: String,
        /// Vector size at the time of the call.
        size: usize,
    },

    /// A write was attempted past the one-past-the-end position.
    #[error("Attempt to set index {index} for vector of size {size}")]
    SetOutOfBounds {
        /// The offending index.
        index: usize,
        /// Vector size at the time of the call.
        size: usize,
    },

    /// [`remove_last`](crate::PersistentVector::remove_last) was called on
    /// the empty vector.
    #[error("Cannot remove_last from empty vector")]
    RemoveLastFromEmpty,

    /// [`try_last`](crate::PersistentVector::try_last) was called on the
    /// empty vector.
    #[error("last called for empty vector")]
    LastFromEmpty,

    /// The named keyed-mutation hook exists for interface completeness but
    /// is intentionally unsupported.
    #[error("no such operation: {0}")]
    NoSuchOperation(&'static str),
}
