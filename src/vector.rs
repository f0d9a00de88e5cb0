//! Persistent (immutable) vector core: the trie, its five fundamental
//! operations, and the append/shrink protocol around the tail buffer.

use std::fmt;

use crate::Shared;
use crate::error::Error;
use crate::iter::PersistentVectorIterator;
use crate::node::{BITS_PER_LEVEL, BRANCHING_FACTOR, MASK, Node, right_spine};

// =============================================================================
// PersistentVector Definition
// =============================================================================

/// A persistent (immutable) vector based on a 32-way branching trie with a
/// tail buffer.
///
/// Every mutating operation returns a new vector and leaves the receiver
/// untouched; unchanged subtrees are shared between versions.
///
/// # Time Complexity
///
/// | Operation     | Complexity                    |
/// |---------------|-------------------------------|
/// | `new`         | O(1)                          |
/// | `get`         | O(log32 N)                    |
/// | `push_back`   | O(log32 N), amortized O(1)    |
/// | `pop_back`    | O(log32 N)                    |
/// | `set`         | O(log32 N)                    |
/// | `last`        | O(1)                          |
/// | `len`         | O(1)                          |
/// | `to_list`     | O(N)                          |
///
/// # Examples
///
/// ```rust
/// use persistent_vector::PersistentVector;
///
/// let vector: PersistentVector<i32> = (0..100).collect();
/// assert_eq!(vector.len(), 100);
/// assert_eq!(vector.get(50), Some(&50));
/// ```
pub struct PersistentVector<T> {
    /// Total number of elements across root and tail.
    pub(crate) length: usize,
    /// Bit shift of the root level: `BITS_PER_LEVEL * depth`.
    pub(crate) shift: usize,
    /// Root of the trie; holds only complete leaf blocks.
    pub(crate) root: Shared<Node<T>>,
    /// Tail buffer absorbing appends; `1..=BRANCHING_FACTOR` elements,
    /// empty only in the empty vector.
    pub(crate) tail: Shared<[T]>,
}

impl<T> Clone for PersistentVector<T> {
    fn clone(&self) -> Self {
        PersistentVector {
            length: self.length,
            shift: self.shift,
            root: Shared::clone(&self.root),
            tail: Shared::clone(&self.tail),
        }
    }
}

impl<T> PersistentVector<T> {
    /// Creates a new empty vector.
    ///
    /// The empty vector is the canonical representation of emptiness: zero
    /// length, a childless root, an empty tail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_vector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = PersistentVector::new();
    /// assert!(vector.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        PersistentVector {
            length: 0,
            shift: BITS_PER_LEVEL,
            root: Shared::new(Node::empty_branch()),
            tail: Shared::from(Vec::new()),
        }
    }

    /// Creates a vector containing a single element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_vector::PersistentVector;
    ///
    /// let vector = PersistentVector::singleton(42);
    /// assert_eq!(vector.len(), 1);
    /// assert_eq!(vector.get(0), Some(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        PersistentVector {
            length: 1,
            shift: BITS_PER_LEVEL,
            root: Shared::new(Node::empty_branch()),
            tail: Shared::from(vec![element]),
        }
    }

    /// Returns the number of elements in the vector in O(1).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Smallest index that resides in the tail; every index below it lives
    /// in the root.
    #[inline]
    pub(crate) fn tail_offset(&self) -> usize {
        self.length - self.tail.len()
    }

    /// Returns a reference to the element at `index`, or `None` when the
    /// index is out of bounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_vector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.get(0), Some(&1));
    /// assert_eq!(vector.get(4), Some(&5));
    /// assert_eq!(vector.get(10), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.length {
            return None;
        }

        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            self.tail.get(index - tail_offset)
        } else {
            self.get_in_root(index)
        }
    }

    /// Digit-extraction walk: one child hop per level, then the leaf load.
    fn get_in_root(&self, index: usize) -> Option<&T> {
        let mut node = self.root.as_ref();
        let mut level = self.shift;

        loop {
            match node {
                Node::Branch(children) => {
                    node = children.get((index >> level) & MASK)?.as_ref();
                    level = level.saturating_sub(BITS_PER_LEVEL);
                }
                Node::Leaf(elements) => return elements.get(index & MASK),
            }
        }
    }

    /// Returns a reference to the first element, or `None` when empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a reference to the last element in O(1), or `None` when
    /// empty.
    ///
    /// The last element is always in the tail.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tail.last()
    }

    /// Returns a reference to the last element, failing on the empty
    /// vector.
    ///
    /// # Errors
    ///
    /// [`Error::LastFromEmpty`] when the vector is empty.
    pub fn try_last(&self) -> Result<&T, Error> {
        self.last().ok_or(Error::LastFromEmpty)
    }

    /// Returns an iterator over references to the elements in ascending
    /// index order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_vector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let collected: Vec<&i32> = vector.iter().collect();
    /// assert_eq!(collected, vec![&1, &2, &3, &4, &5]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentVectorIterator<'_, T> {
        PersistentVectorIterator::new(self)
    }
}

// =============================================================================
// Mutating Operations (functional: each returns a new vector)
// =============================================================================

impl<T: Clone> PersistentVector<T> {
    /// Appends an element to the back of the vector.
    ///
    /// Three cases, in order: the tail has room (copy the tail plus one);
    /// the tail is full and the root has capacity (promote the tail into
    /// the root as a complete leaf block); the root itself is at capacity
    /// (grow the trie one level). The new tail after a promotion is the
    /// singleton `[element]`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_vector::PersistentVector;
    ///
    /// let vector = PersistentVector::new().push_back(1).push_back(2);
    /// assert_eq!(vector.len(), 2);
    /// assert_eq!(vector.get(1), Some(&2));
    /// ```
    #[must_use]
    pub fn push_back(&self, element: T) -> Self {
        if self.tail.len() < BRANCHING_FACTOR {
            let mut new_tail = Vec::with_capacity(self.tail.len() + 1);
            new_tail.extend_from_slice(&self.tail);
            new_tail.push(element);

            PersistentVector {
                length: self.length + 1,
                shift: self.shift,
                root: Shared::clone(&self.root),
                tail: Shared::from(new_tail),
            }
        } else {
            self.push_tail_into_root(element)
        }
    }

    /// Promotes the full tail into the root as a leaf block and starts a
    /// fresh tail with `element`.
    fn push_tail_into_root(&self, element: T) -> Self {
        let leaf = Shared::new(Node::Leaf(Shared::clone(&self.tail)));

        let (root, shift) = match push_leaf(self.root.as_ref(), self.shift, leaf) {
            Promotion::Fit(updated) => (Shared::new(updated), self.shift),
            Promotion::Overflow(leaf) => {
                // The root is at capacity: grow one level, with the old
                // root on the left and a right spine of nested singletons
                // carrying the promoted leaf on the right.
                let spine = right_spine(self.shift, leaf);
                let grown = Node::Branch(vec![Shared::clone(&self.root), spine]);
                (Shared::new(grown), self.shift + BITS_PER_LEVEL)
            }
        };

        PersistentVector {
            length: self.length + 1,
            shift,
            root,
            tail: Shared::from(vec![element]),
        }
    }

    /// Replaces the element at `index`, returning the updated vector.
    ///
    /// `index == len()` is equivalent to [`push_back`](Self::push_back).
    /// Only the nodes on the affected root-to-leaf path are copied; every
    /// other subtree is shared with the receiver.
    ///
    /// # Errors
    ///
    /// [`Error::SetOutOfBounds`] when `index > len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_vector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..10).collect();
    /// let updated = vector.set(5, 100)?;
    /// assert_eq!(updated.get(5), Some(&100));
    /// assert_eq!(vector.get(5), Some(&5)); // Original unchanged
    /// # Ok::<(), persistent_vector::Error>(())
    /// ```
    pub fn set(&self, index: usize, element: T) -> Result<Self, Error> {
        if index == self.length {
            return Ok(self.push_back(element));
        }
        if index > self.length {
            return Err(Error::SetOutOfBounds {
                index,
                size: self.length,
            });
        }

        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            let mut new_tail = self.tail.to_vec();
            new_tail[index - tail_offset] = element;

            Ok(PersistentVector {
                length: self.length,
                shift: self.shift,
                root: Shared::clone(&self.root),
                tail: Shared::from(new_tail),
            })
        } else {
            let new_root = set_in_node(self.root.as_ref(), self.shift, index, element);

            Ok(PersistentVector {
                length: self.length,
                shift: self.shift,
                root: Shared::new(new_root),
                tail: Shared::clone(&self.tail),
            })
        }
    }

    /// Removes the last element, returning the shrunk vector and the
    /// element, or `None` when the vector is empty.
    ///
    /// When the removal drains the tail, the rightmost leaf block of the
    /// root is promoted to be the new tail; a root left with a single
    /// child collapses one level.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_vector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let (remaining, element) = vector.pop_back().unwrap();
    /// assert_eq!(element, 5);
    /// assert_eq!(remaining.len(), 4);
    /// ```
    #[must_use]
    pub fn pop_back(&self) -> Option<(Self, T)> {
        let element = self.tail.last()?.clone();

        if self.length == 1 {
            return Some((PersistentVector::new(), element));
        }

        if self.tail.len() > 1 {
            let new_tail = self.tail[..self.tail.len() - 1].to_vec();
            let shrunk = PersistentVector {
                length: self.length - 1,
                shift: self.shift,
                root: Shared::clone(&self.root),
                tail: Shared::from(new_tail),
            };
            return Some((shrunk, element));
        }

        // The tail drains: recover the rightmost leaf of the root as the
        // new tail, deleting emptied nodes up the right spine.
        let (remaining, new_tail) = pop_leaf(self.root.as_ref())?;
        let (root, shift) = match remaining {
            None => (Shared::new(Node::empty_branch()), BITS_PER_LEVEL),
            Some(Node::Branch(children))
                if self.shift > BITS_PER_LEVEL && children.len() == 1 =>
            {
                // Single-child root above the leaf level: collapse.
                (Shared::clone(&children[0]), self.shift - BITS_PER_LEVEL)
            }
            Some(node) => (Shared::new(node), self.shift),
        };

        let shrunk = PersistentVector {
            length: self.length - 1,
            shift,
            root,
            tail: new_tail,
        };
        Some((shrunk, element))
    }

    /// Removes the last element, failing on the empty vector.
    ///
    /// # Errors
    ///
    /// [`Error::RemoveLastFromEmpty`] when the vector is empty.
    pub fn remove_last(&self) -> Result<Self, Error> {
        match self.pop_back() {
            Some((shrunk, _)) => Ok(shrunk),
            None => Err(Error::RemoveLastFromEmpty),
        }
    }

    /// Linearizes the whole vector into a `Vec` in ascending index order.
    ///
    /// This is the fast path: a depth-first walk appending whole leaf
    /// blocks into a preallocated buffer, with none of the per-element
    /// command dispatch of [`reduce`](Self::reduce).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_vector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..100).collect();
    /// assert_eq!(vector.to_list(), (0..100).collect::<Vec<i32>>());
    /// ```
    #[must_use]
    pub fn to_list(&self) -> Vec<T> {
        let mut elements = Vec::with_capacity(self.length);
        extend_from_node(self.root.as_ref(), &mut elements);
        elements.extend_from_slice(&self.tail);
        elements
    }
}

// =============================================================================
// Trie Helpers
// =============================================================================

/// Outcome of hanging a promoted leaf below a node: either the leaf fit and
/// the rebuilt node comes back, or the subtree was full and the leaf bubbles
/// up for the caller to place.
enum Promotion<T> {
    Fit(Node<T>),
    Overflow(Shared<Node<T>>),
}

/// Hangs `leaf` at the end of the right spine below `node` (an interior
/// node at `level`).
fn push_leaf<T>(node: &Node<T>, level: usize, leaf: Shared<Node<T>>) -> Promotion<T> {
    let Node::Branch(children) = node else {
        // A leaf on the descent path means the trie is malformed; hand the
        // block back so the caller regrows.
        return Promotion::Overflow(leaf);
    };

    if level == BITS_PER_LEVEL {
        // Bottom interior level: children are leaf blocks.
        if children.len() < BRANCHING_FACTOR {
            let mut new_children = children.clone();
            new_children.push(leaf);
            Promotion::Fit(Node::Branch(new_children))
        } else {
            Promotion::Overflow(leaf)
        }
    } else {
        match children.last() {
            None => Promotion::Fit(Node::Branch(vec![right_spine(
                level - BITS_PER_LEVEL,
                leaf,
            )])),
            Some(last) => match push_leaf(last.as_ref(), level - BITS_PER_LEVEL, leaf) {
                Promotion::Fit(updated) => {
                    let mut new_children = children.clone();
                    let last_index = new_children.len() - 1;
                    new_children[last_index] = Shared::new(updated);
                    Promotion::Fit(Node::Branch(new_children))
                }
                Promotion::Overflow(leaf) => {
                    if children.len() < BRANCHING_FACTOR {
                        let mut new_children = children.clone();
                        new_children.push(right_spine(level - BITS_PER_LEVEL, leaf));
                        Promotion::Fit(Node::Branch(new_children))
                    } else {
                        Promotion::Overflow(leaf)
                    }
                }
            },
        }
    }
}

/// Removes the rightmost leaf block under `node`, returning the remaining
/// node (`None` when the subtree empties) together with the leaf's
/// elements. Returns `None` overall only for a childless subtree.
fn pop_leaf<T>(node: &Node<T>) -> Option<(Option<Node<T>>, Shared<[T]>)> {
    match node {
        Node::Leaf(elements) => Some((None, Shared::clone(elements))),
        Node::Branch(children) => {
            let (last, rest) = children.split_last()?;
            let (replacement, leaf) = pop_leaf(last.as_ref())?;

            let mut new_children = rest.to_vec();
            if let Some(updated) = replacement {
                new_children.push(Shared::new(updated));
            }

            if new_children.is_empty() {
                Some((None, leaf))
            } else {
                Some((Some(Node::Branch(new_children)), leaf))
            }
        }
    }
}

/// Path copy for a point update: rebuilds the single root-to-leaf path
/// through `index`, sharing every untouched child.
fn set_in_node<T: Clone>(node: &Node<T>, level: usize, index: usize, element: T) -> Node<T> {
    match node {
        Node::Branch(children) => {
            let child_index = (index >> level) & MASK;
            let mut new_children = children.clone();
            new_children[child_index] = Shared::new(set_in_node(
                children[child_index].as_ref(),
                level - BITS_PER_LEVEL,
                index,
                element,
            ));
            Node::Branch(new_children)
        }
        Node::Leaf(elements) => {
            let mut new_elements = elements.to_vec();
            new_elements[index & MASK] = element;
            Node::Leaf(Shared::from(new_elements))
        }
    }
}

/// Depth-first append of every leaf block under `node`.
fn extend_from_node<T: Clone>(node: &Node<T>, elements: &mut Vec<T>) {
    match node {
        Node::Branch(children) => {
            for child in children {
                extend_from_node(child.as_ref(), elements);
            }
        }
        Node::Leaf(block) => elements.extend_from_slice(block),
    }
}

// =============================================================================
// Bulk Construction
// =============================================================================

/// Builds a vector from an already-collected `Vec`, packing complete leaf
/// blocks bottom-up instead of paying a path copy per element.
pub(crate) fn from_vec<T>(mut elements: Vec<T>) -> PersistentVector<T> {
    let length = elements.len();

    if length <= BRANCHING_FACTOR {
        return PersistentVector {
            length,
            shift: BITS_PER_LEVEL,
            root: Shared::new(Node::empty_branch()),
            tail: Shared::from(elements),
        };
    }

    // The tail takes the trailing partial block, or a full one when the
    // length divides evenly: the root holds only complete blocks.
    let tail_length = match length % BRANCHING_FACTOR {
        0 => BRANCHING_FACTOR,
        partial => partial,
    };
    let tail_elements = elements.split_off(length - tail_length);

    let mut nodes: Vec<Shared<Node<T>>> = Vec::with_capacity(elements.len() / BRANCHING_FACTOR);
    let mut remaining = elements.into_iter();
    loop {
        let block: Vec<T> = remaining.by_ref().take(BRANCHING_FACTOR).collect();
        if block.is_empty() {
            break;
        }
        nodes.push(Shared::new(Node::Leaf(Shared::from(block))));
    }

    let mut shift = BITS_PER_LEVEL;
    while nodes.len() > BRANCHING_FACTOR {
        let mut next_level = Vec::with_capacity(nodes.len().div_ceil(BRANCHING_FACTOR));
        for chunk in nodes.chunks(BRANCHING_FACTOR) {
            next_level.push(Shared::new(Node::Branch(chunk.to_vec())));
        }
        nodes = next_level;
        shift += BITS_PER_LEVEL;
    }

    PersistentVector {
        length,
        shift,
        root: Shared::new(Node::Branch(nodes)),
        tail: Shared::from(tail_elements),
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentVector<T> {
    #[inline]
    fn default() -> Self {
        PersistentVector::new()
    }
}

impl<T: PartialEq> PartialEq for PersistentVector<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.length != other.length {
            return false;
        }
        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for PersistentVector<T> {}

impl<T: fmt::Debug> fmt::Debug for PersistentVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Debug> fmt::Display for PersistentVector<T> {
    /// Renders `#PersistentVector<count: N, [e0, e1, ...]>` with every
    /// element shown. Use [`inspect`](PersistentVector::inspect) to cap the
    /// element count.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#PersistentVector<count: {}, [", self.length)?;
        for (position, element) in self.iter().enumerate() {
            if position > 0 {
                formatter.write_str(", ")?;
            }
            write!(formatter, "{element:?}")?;
        }
        formatter.write_str("]>")
    }
}

impl<T: fmt::Debug> PersistentVector<T> {
    /// Renders the vector like [`Display`](fmt::Display), truncating after
    /// `limit` elements with a trailing `...`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_vector::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// assert_eq!(
    ///     vector.inspect(2),
    ///     "#PersistentVector<count: 3, [1, 2, ...]>"
    /// );
    /// ```
    #[must_use]
    pub fn inspect(&self, limit: usize) -> String {
        let mut rendered = format!("#PersistentVector<count: {}, [", self.length);
        for (position, element) in self.iter().take(limit).enumerate() {
            if position > 0 {
                rendered.push_str(", ");
            }
            rendered.push_str(&format!("{element:?}"));
        }
        if limit < self.length {
            if limit > 0 {
                rendered.push_str(", ");
            }
            rendered.push_str("...");
        }
        rendered.push_str("]>");
        rendered
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentVector<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.length))?;
        for element in self {
            sequence.serialize_element(element)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentVectorVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for PersistentVectorVisitor<T>
where
    T: serde::Deserialize<'de>,
{
    type Value = PersistentVector<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut elements = Vec::with_capacity(access.size_hint().unwrap_or(0).min(4096));
        while let Some(element) = access.next_element()? {
            elements.push(element);
        }
        Ok(from_vec(elements))
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PersistentVector<T>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentVectorVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
