//! Trie node model shared by the vector core and its traversal machinery.

use crate::Shared;

// =============================================================================
// Constants
// =============================================================================

/// Bits of the element index consumed per trie level.
#[cfg(not(feature = "narrow-branch"))]
pub(crate) const BITS_PER_LEVEL: usize = 5;

/// Narrow test-tuned build: 2 bits per level stresses deep tries with
/// small inputs.
#[cfg(feature = "narrow-branch")]
pub(crate) const BITS_PER_LEVEL: usize = 2;

/// Maximum children per interior node and values per leaf block.
pub(crate) const BRANCHING_FACTOR: usize = 1 << BITS_PER_LEVEL;

/// Bit mask extracting the child index at a given level.
pub(crate) const MASK: usize = BRANCHING_FACTOR - 1;

// =============================================================================
// Node Definition
// =============================================================================

/// Interior or leaf node of the trie.
///
/// Interior nodes are occupancy-sized: only nodes on the rightmost spine may
/// hold fewer than `BRANCHING_FACTOR` children, and only the root may be
/// empty. Leaf blocks inside the root are always exactly full; partial
/// blocks exist only as the vector's tail.
pub(crate) enum Node<T> {
    /// Branch node containing child nodes.
    Branch(Vec<Shared<Node<T>>>),
    /// Leaf node containing a full block of elements.
    Leaf(Shared<[T]>),
}

impl<T> Node<T> {
    /// Creates an empty branch node, the root of the empty vector.
    pub(crate) const fn empty_branch() -> Self {
        Node::Branch(Vec::new())
    }
}

/// Builds the right spine to hang at `level`: nested single-child branches
/// terminating in `leaf`. At `level == 0` the leaf itself is the spine.
pub(crate) fn right_spine<T>(level: usize, leaf: Shared<Node<T>>) -> Shared<Node<T>> {
    if level == 0 {
        leaf
    } else {
        Shared::new(Node::Branch(vec![right_spine(level - BITS_PER_LEVEL, leaf)]))
    }
}
