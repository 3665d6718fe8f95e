#![warn(missing_docs)]
#![warn(clippy::pedantic)]
/*! Strings as binary trees of fragments.
 *
 * A [`Rope`] represents a long sequence of elements as a binary tree whose
 * leaves hold contiguous fragments, so insertion, deletion, and
 * concatenation rearrange subtrees instead of copying a flat buffer.
 * Mutations work by splitting the tree at an index and joining the pieces
 * back together around the change; an explicit [`balance`](Rope::balance)
 * pass repacks the leaves along Fibonacci intervals to keep the depth
 * logarithmic in the length.
 *
 * Ropes are generic over the element type and own their trees outright:
 * cloning a rope duplicates every node, and two ropes never share
 * structure. For text, `Rope<char>` converts to and from the standard
 * string types:
 *
 * ```
 * use tree_rope::Rope;
 *
 * let mut rope = Rope::from("some");
 * rope.append("text");
 * rope.insert(4, "!!");
 * assert_eq!(rope, "some!!text");
 *
 * rope.erase(4, 2);
 * assert_eq!(String::from(&rope), "sometext");
 * ```
 */

mod balance;
mod node;

#[cfg(test)]
mod tests;

#[cfg(any(test, feature = "proptest"))]
pub mod proptest;

use balance::{fib, rebuild};
use node::Node;

/** A sequence of elements stored as a binary tree of fragments.

See the top-level crate documentation for an introduction.

Bounds-checked operations come in pairs: a `try_` method returning
[`OutOfRangeError`] and a panicking convenience wrapper. All checks happen
before the tree is touched, so a rejected operation leaves the rope exactly
as it was.
*/
#[derive(Clone)]
pub struct Rope<T> {
    root: Option<Box<Node<T>>>,
}

impl<T> Rope<T> {
    /// Constructs an empty rope.
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Rope { root: None }
    }

    /// Gets the length of a rope, in elements.
    ///
    /// # Complexity
    /// O(log N) time, O(1) space.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.root {
            None => 0,
            Some(root) => root.length(),
        }
    }

    /// Tests whether a rope is empty.
    ///
    /// # Complexity
    /// O(log N) time, O(1) space.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the depth of the underlying tree.
    ///
    /// An empty rope and a rope stored as a single leaf both have depth
    /// zero. Useful for observing the effect of [`balance`](Rope::balance);
    /// no operation's result depends on it.
    ///
    /// # Complexity
    /// O(N) time, O(depth) space.
    #[must_use]
    pub fn depth(&self) -> usize {
        match &self.root {
            None => 0,
            Some(root) => root.depth(),
        }
    }

    /// Removes all elements from the rope.
    #[inline]
    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Tries getting a reference to the element at `index`.
    ///
    /// # Complexity
    /// O(depth) time, O(1) space.
    ///
    /// # Errors
    /// Errors if `index` is not less than the rope's length.
    ///
    /// # Examples
    /// ```
    /// # use tree_rope::Rope;
    /// let rope = Rope::from("sometext");
    /// assert_eq!(rope.try_at(3), Ok(&'e'));
    /// assert!(rope.try_at(8).is_err());
    /// ```
    pub fn try_at(&self, index: usize) -> Result<&T, OutOfRangeError> {
        self.root
            .as_deref()
            .and_then(|root| root.get(index))
            .ok_or(OutOfRangeError {
                index,
                len: self.len(),
            })
    }

    /// Gets a reference to the element at `index`.
    ///
    /// # Complexity
    /// O(depth) time, O(1) space.
    ///
    /// # Panics
    /// Panics if `index` is not less than the rope's length.
    #[must_use]
    #[inline]
    pub fn at(&self, index: usize) -> &T {
        self.try_at(index)
            .expect("`index` must be less than the rope's length")
    }

    /// Gets an iterator over the elements of the rope, in order.
    ///
    /// # Complexity
    /// O(depth) time and space to construct. Each call to `next()` is
    /// amortized O(1) time, with a worst case of O(depth).
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Tests whether the tree is balanced for its length.
    ///
    /// A rope of depth `d` counts as balanced when its length is at least
    /// the `(d + 2)`-th Fibonacci number. An empty rope is balanced.
    ///
    /// # Complexity
    /// O(N) time, O(depth) space.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        match &self.root {
            None => true,
            Some(root) => root.length() >= fib(root.depth() + 2),
        }
    }
}

impl<T: Clone> Rope<T> {
    /// Tries copying out `len` elements starting at `start`.
    ///
    /// # Complexity
    /// O(len + depth) time and space.
    ///
    /// # Errors
    /// Errors if `start + len` is greater than the rope's length.
    ///
    /// # Examples
    /// ```
    /// # use tree_rope::Rope;
    /// let rope = Rope::from("some") + Rope::from("text");
    /// assert_eq!(rope.try_substring(2, 4), Ok(vec!['m', 'e', 't', 'e']));
    /// assert!(rope.try_substring(2, 7).is_err());
    /// ```
    pub fn try_substring(&self, start: usize, len: usize) -> Result<Vec<T>, OutOfRangeError> {
        let total = self.len();
        let end = start.checked_add(len).unwrap_or(usize::MAX);
        if start > total || end > total {
            return Err(OutOfRangeError {
                index: if start > total { start } else { end },
                len: total,
            });
        }
        let mut out = Vec::with_capacity(len);
        if let Some(root) = &self.root {
            root.extract(start, len, &mut out);
        }
        Ok(out)
    }

    /// Copies out `len` elements starting at `start`.
    ///
    /// # Complexity
    /// O(len + depth) time and space.
    ///
    /// # Panics
    /// Panics if `start + len` is greater than the rope's length.
    #[must_use]
    #[inline]
    pub fn substring(&self, start: usize, len: usize) -> Vec<T> {
        self.try_substring(start, len)
            .expect("`start + len` must be at most the rope's length")
    }

    /// Copies the whole rope out into a `Vec`, in order.
    ///
    /// # Complexity
    /// O(N) time and space.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let len = self.len();
        let mut out = Vec::with_capacity(len);
        if let Some(root) = &self.root {
            root.extract(0, len, &mut out);
        }
        out
    }

    /// Appends `other` to the end of the rope.
    ///
    /// Accepts anything [`IntoRope`]: another rope (moved or deep-copied),
    /// a `Vec`, a slice, or for `Rope<char>` the standard string types.
    ///
    /// # Complexity
    /// O(1) time and space beyond converting `other`, which for an owned
    /// `Rope` is free and for borrowed input is a copy.
    ///
    /// # Examples
    /// ```
    /// # use tree_rope::Rope;
    /// let mut rope = Rope::from("some");
    /// rope.append("text");
    /// assert_eq!(rope.len(), 8);
    /// assert_eq!(rope, "sometext");
    /// ```
    pub fn append<A: IntoRope<T>>(&mut self, other: A) {
        let tail = other.into_rope();
        self.root = Self::join(self.root.take(), tail.root);
    }

    /// Tries inserting `other` so that it starts at `index`.
    ///
    /// The tree is split at `index` and the pieces are joined back around
    /// the inserted tree. Inserting at `len()` is an append.
    ///
    /// # Complexity
    /// O(depth) time and space beyond converting `other`.
    ///
    /// # Errors
    /// Errors if `index` is greater than the rope's length; the rope is
    /// left unchanged.
    ///
    /// # Examples
    /// ```
    /// # use tree_rope::Rope;
    /// let mut rope = Rope::from("sometext");
    /// rope.try_insert(4, "!!").unwrap();
    /// assert_eq!(rope, "some!!text");
    /// assert!(rope.try_insert(11, "?").is_err());
    /// ```
    pub fn try_insert<A: IntoRope<T>>(
        &mut self,
        index: usize,
        other: A,
    ) -> Result<(), OutOfRangeError> {
        let total = self.len();
        if index > total {
            return Err(OutOfRangeError { index, len: total });
        }
        let mid = other.into_rope();
        let (front, back) = Self::split_root(self.root.take(), index);
        self.root = Self::join(Self::join(front, mid.root), back);
        Ok(())
    }

    /// Inserts `other` so that it starts at `index`.
    ///
    /// # Complexity
    /// O(depth) time and space beyond converting `other`.
    ///
    /// # Panics
    /// Panics if `index` is greater than the rope's length.
    #[inline]
    pub fn insert<A: IntoRope<T>>(&mut self, index: usize, other: A) {
        self.try_insert(index, other)
            .expect("`index` must be at most the rope's length");
    }

    /// Tries removing `len` elements starting at `start`.
    ///
    /// The tree is split before and after the doomed range; the middle
    /// piece is dropped and the outer pieces are joined.
    ///
    /// # Complexity
    /// O(depth) time and space.
    ///
    /// # Errors
    /// Errors if `start + len` is greater than the rope's length; the rope
    /// is left unchanged.
    ///
    /// # Examples
    /// ```
    /// # use tree_rope::Rope;
    /// let mut rope = Rope::from("some!!text");
    /// rope.try_erase(4, 2).unwrap();
    /// assert_eq!(rope, "sometext");
    /// ```
    pub fn try_erase(&mut self, start: usize, len: usize) -> Result<(), OutOfRangeError> {
        let total = self.len();
        let end = start.checked_add(len).unwrap_or(usize::MAX);
        if start > total || end > total {
            return Err(OutOfRangeError {
                index: if start > total { start } else { end },
                len: total,
            });
        }
        let (front, rest) = Self::split_root(self.root.take(), start);
        let (_, back) = Self::split_root(rest, len);
        self.root = Self::join(front, back);
        Ok(())
    }

    /// Removes `len` elements starting at `start`.
    ///
    /// # Complexity
    /// O(depth) time and space.
    ///
    /// # Panics
    /// Panics if `start + len` is greater than the rope's length.
    #[inline]
    pub fn erase(&mut self, start: usize, len: usize) {
        self.try_erase(start, len)
            .expect("`start + len` must be at most the rope's length");
    }

    /// Tries splitting the rope in two at `at`, returning the tail.
    ///
    /// After a successful call, `self` holds the first `at` elements and
    /// the returned rope holds the rest.
    ///
    /// # Complexity
    /// O(depth) time and space.
    ///
    /// # Errors
    /// Errors if `at` is greater than the rope's length; the rope is left
    /// unchanged.
    ///
    /// # Examples
    /// ```
    /// # use tree_rope::Rope;
    /// let mut rope = Rope::from("sometext");
    /// let tail = rope.try_split_off(4).unwrap();
    /// assert_eq!(rope, "some");
    /// assert_eq!(tail, "text");
    /// ```
    pub fn try_split_off(&mut self, at: usize) -> Result<Rope<T>, OutOfRangeError> {
        let total = self.len();
        if at > total {
            return Err(OutOfRangeError {
                index: at,
                len: total,
            });
        }
        let (front, back) = Self::split_root(self.root.take(), at);
        self.root = front;
        Ok(Rope { root: back })
    }

    /// Splits the rope in two at `at`, returning the tail.
    ///
    /// # Complexity
    /// O(depth) time and space.
    ///
    /// # Panics
    /// Panics if `at` is greater than the rope's length.
    #[inline]
    pub fn split_off(&mut self, at: usize) -> Rope<T> {
        self.try_split_off(at)
            .expect("`at` must be at most the rope's length")
    }

    /// Rebalances the tree if it fails the Fibonacci criterion.
    ///
    /// Collects the leaves in order and repacks them through an array of
    /// Fibonacci-interval slots, producing a tree whose depth is
    /// logarithmic in its length. The represented sequence is unchanged.
    /// Does nothing when [`is_balanced`](Rope::is_balanced) already holds.
    ///
    /// # Complexity
    /// O(N log N) time, O(N) space.
    ///
    /// # Examples
    /// ```
    /// # use tree_rope::Rope;
    /// let mut rope = Rope::new();
    /// for word in ["lots", " of", " tiny", " appends"] {
    ///     rope.append(word);
    /// }
    /// let flat = rope.to_vec();
    /// rope.balance();
    /// assert!(rope.is_balanced());
    /// assert_eq!(rope.to_vec(), flat);
    /// ```
    pub fn balance(&mut self) {
        if !self.is_balanced() {
            if let Some(root) = &self.root {
                self.root = rebuild(root);
            }
        }
    }

    fn join(front: Option<Box<Node<T>>>, back: Option<Box<Node<T>>>) -> Option<Box<Node<T>>> {
        match (front, back) {
            (None, back) => back,
            (front, None) => front,
            (Some(front), Some(back)) => Some(Node::concat(front, back)),
        }
    }
}

impl<T> Rope<T> {
    fn split_root(
        root: Option<Box<Node<T>>>,
        index: usize,
    ) -> (Option<Box<Node<T>>>, Option<Box<Node<T>>>) {
        match root {
            None => (None, None),
            Some(node) => {
                let (front, back) = node.split(index);
                (Some(front), Some(back))
            }
        }
    }
}

impl<T> Default for Rope<T> {
    fn default() -> Self {
        Rope::new()
    }
}

/// A trait for values a rope can absorb: other ropes, flat sequences, and
/// for `Rope<char>` the standard string types.
///
/// [`append`](Rope::append) and [`insert`](Rope::insert) are generic over
/// this trait. Converting an owned `Rope` is free; every borrowed form
/// copies, since ropes never share structure.
pub trait IntoRope<T> {
    /// Converts `self` into a `Rope<T>`.
    fn into_rope(self) -> Rope<T>;
}

impl<T> IntoRope<T> for Rope<T> {
    fn into_rope(self) -> Rope<T> {
        self
    }
}

impl<T: Clone> IntoRope<T> for &Rope<T> {
    fn into_rope(self) -> Rope<T> {
        self.clone()
    }
}

impl<T> IntoRope<T> for Vec<T> {
    fn into_rope(self) -> Rope<T> {
        Rope::from(self)
    }
}

impl<T: Clone> IntoRope<T> for &Vec<T> {
    fn into_rope(self) -> Rope<T> {
        Rope::from(self.as_slice())
    }
}

impl<T: Clone> IntoRope<T> for &[T] {
    fn into_rope(self) -> Rope<T> {
        Rope::from(self)
    }
}

impl IntoRope<char> for &str {
    fn into_rope(self) -> Rope<char> {
        Rope::from(self)
    }
}

impl IntoRope<char> for String {
    fn into_rope(self) -> Rope<char> {
        Rope::from(self.as_str())
    }
}

impl IntoRope<char> for &String {
    fn into_rope(self) -> Rope<char> {
        Rope::from(self.as_str())
    }
}

impl IntoRope<char> for char {
    fn into_rope(self) -> Rope<char> {
        Rope::from(self)
    }
}

impl IntoRope<char> for &char {
    fn into_rope(self) -> Rope<char> {
        Rope::from(*self)
    }
}

impl<T> From<Vec<T>> for Rope<T> {
    /// Builds a rope whose root is a single leaf holding `v`.
    ///
    /// An empty `Vec` still produces a leaf root; it represents the same
    /// (empty) sequence as [`Rope::new`] and compares equal to it.
    fn from(v: Vec<T>) -> Self {
        Rope {
            root: Some(Node::leaf(v)),
        }
    }
}

impl<T: Clone> From<&[T]> for Rope<T> {
    fn from(v: &[T]) -> Self {
        Rope::from(v.to_vec())
    }
}

impl From<&str> for Rope<char> {
    fn from(s: &str) -> Self {
        Rope::from(s.chars().collect::<Vec<char>>())
    }
}

impl From<String> for Rope<char> {
    fn from(s: String) -> Self {
        Rope::from(s.as_str())
    }
}

impl From<&String> for Rope<char> {
    fn from(s: &String) -> Self {
        Rope::from(s.as_str())
    }
}

impl From<char> for Rope<char> {
    fn from(ch: char) -> Self {
        Rope::from(vec![ch])
    }
}

impl<T: Clone> From<&Rope<T>> for Vec<T> {
    fn from(rope: &Rope<T>) -> Self {
        rope.to_vec()
    }
}

impl<T: Clone> From<Rope<T>> for Vec<T> {
    fn from(rope: Rope<T>) -> Self {
        rope.to_vec()
    }
}

impl From<&Rope<char>> for String {
    fn from(rope: &Rope<char>) -> Self {
        rope.iter().collect()
    }
}

impl From<Rope<char>> for String {
    fn from(rope: Rope<char>) -> Self {
        String::from(&rope)
    }
}

impl<T> FromIterator<T> for Rope<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Rope::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<T: Clone> Extend<T> for Rope<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append(iter.into_iter().collect::<Vec<T>>());
    }
}

impl<'a, T> IntoIterator for &'a Rope<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for Rope<T> {
    /// Ropes are equal when their flattened contents are equal; the shapes
    /// of their trees are irrelevant.
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Rope<T> {}

impl<T: PartialEq> PartialEq<[T]> for Rope<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: PartialEq> PartialEq<&[T]> for Rope<T> {
    fn eq(&self, other: &&[T]) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for Rope<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.iter().eq(other.iter())
    }
}

impl PartialEq<str> for Rope<char> {
    fn eq(&self, other: &str) -> bool {
        self.iter().copied().eq(other.chars())
    }
}

impl PartialEq<&str> for Rope<char> {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for Rope<char> {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<Rope<char>> for str {
    fn eq(&self, other: &Rope<char>) -> bool {
        other == self
    }
}

impl PartialEq<Rope<char>> for &str {
    fn eq(&self, other: &Rope<char>) -> bool {
        other == self
    }
}

impl PartialEq<Rope<char>> for String {
    fn eq(&self, other: &Rope<char>) -> bool {
        other == self
    }
}

impl<T: PartialOrd> PartialOrd for Rope<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for Rope<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: std::hash::Hash> std::hash::Hash for Rope<T> {
    /// Hashes the flattened contents, so content-equal ropes with
    /// different tree shapes hash alike.
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl<T: Clone> std::ops::Add for Rope<T> {
    type Output = Rope<T>;

    fn add(mut self, rhs: Rope<T>) -> Rope<T> {
        self.append(rhs);
        self
    }
}

impl<T, A> std::ops::AddAssign<A> for Rope<T>
where
    T: Clone,
    A: IntoRope<T>,
{
    fn add_assign(&mut self, rhs: A) {
        self.append(rhs);
    }
}

impl<T> std::ops::Index<usize> for Rope<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.at(index)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Rope<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl std::fmt::Display for Rope<char> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;
        for ch in self.iter() {
            f.write_char(*ch)?;
        }
        Ok(())
    }
}

impl std::fmt::Write for Rope<char> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.append(s);
        Ok(())
    }
}

#[cfg(any(test, feature = "serde"))]
impl<T: serde::Serialize> serde::Serialize for Rope<T> {
    /// Serializes the flattened sequence; tree shape is not persisted.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(any(test, feature = "serde"))]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Rope<T> {
    /// Deserializes a sequence into a single-leaf rope.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<T>::deserialize(deserializer).map(Rope::from)
    }
}

#[cfg(any(test, feature = "proptest"))]
impl ::proptest::arbitrary::Arbitrary for Rope<char> {
    type Parameters = self::proptest::RopeParam;
    type Strategy = self::proptest::RopeStrategy;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        self::proptest::RopeStrategy(args)
    }
}

/// An error returned when an index or range falls outside a rope.
///
/// Carries the offending index and the rope's length at the time of the
/// call. Every `try_` method on [`Rope`] checks bounds before touching the
/// tree, so an operation that returns this error has changed nothing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OutOfRangeError {
    index: usize,
    len: usize,
}

impl OutOfRangeError {
    /// Returns the index that fell out of range.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the length the rope had at the time of the call.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }
}

impl std::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "index {} is out of range for a rope of length {}",
            self.index, self.len
        )
    }
}

impl std::error::Error for OutOfRangeError {}

/// An iterator over the elements of a rope, in order.
///
/// Call [`iter`](Rope::iter) to construct one.
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
    fragment: std::slice::Iter<'a, T>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(rope: &'a Rope<T>) -> Iter<'a, T> {
        let mut iter = Iter {
            stack: Vec::new(),
            fragment: [].iter(),
            remaining: rope.len(),
        };
        if let Some(root) = rope.root.as_deref() {
            iter.descend(root);
        }
        iter
    }

    // Walks to the leftmost leaf under `node`, parking right siblings on
    // the stack for later.
    fn descend(&mut self, mut node: &'a Node<T>) {
        loop {
            match node {
                Node::Leaf { fragment } => {
                    self.fragment = fragment.iter();
                    return;
                }
                Node::Internal { left, right, .. } => {
                    self.stack.push(right);
                    node = left;
                }
            }
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            if let Some(item) = self.fragment.next() {
                self.remaining -= 1;
                return Some(item);
            }
            let node = self.stack.pop()?;
            self.descend(node);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> std::iter::FusedIterator for Iter<'a, T> {}
