//! The internal tree representation.
//!
//! A rope's string is a binary tree of fragments. Leaves hold contiguous
//! runs of elements; internal nodes hold no elements of their own, only two
//! children and the cached length of their left subtree (the "weight").
//! The invariants, which every public `Rope` operation preserves:
//!
//! * a leaf's implicit weight is the length of its fragment;
//! * an internal node's weight equals the total length of its left subtree;
//! * the represented string is the in-order concatenation of leaf fragments.
//!
//! The leaf/internal distinction is a tagged enum, so a node with exactly
//! one child is unrepresentable.

use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub(crate) enum Node<T> {
    Leaf {
        fragment: Vec<T>,
    },
    Internal {
        weight: usize,
        left: Box<Node<T>>,
        right: Box<Node<T>>,
    },
}

impl<T> Node<T> {
    pub(crate) fn leaf(fragment: Vec<T>) -> Box<Node<T>> {
        Box::new(Node::Leaf { fragment })
    }

    /// Joins two subtrees under a fresh internal node.
    ///
    /// The new node's weight is the full length of `left`, so lookups know
    /// how many elements the left subtree accounts for.
    pub(crate) fn concat(left: Box<Node<T>>, right: Box<Node<T>>) -> Box<Node<T>> {
        Box::new(Node::Internal {
            weight: left.length(),
            left,
            right,
        })
    }

    /// Total number of elements in this subtree.
    pub(crate) fn length(&self) -> usize {
        match self {
            Node::Leaf { fragment } => fragment.len(),
            Node::Internal { weight, right, .. } => weight + right.length(),
        }
    }

    /// Number of edges on the longest path from this node to a leaf.
    pub(crate) fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + std::cmp::max(left.depth(), right.depth()),
        }
    }

    /// Weight-directed descent to the element at `index`.
    ///
    /// Returns `None` if `index` is past the end of the subtree. The `Rope`
    /// layer bounds-checks before calling, so `None` never reaches a caller
    /// through a validated operation.
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        match self {
            Node::Leaf { fragment } => fragment.get(index),
            Node::Internal {
                weight,
                left,
                right,
            } => {
                if index < *weight {
                    left.get(index)
                } else {
                    right.get(index - weight)
                }
            }
        }
    }

    /// Appends into `out` up to `len` elements of this subtree starting at
    /// `index`, clamped to the subtree's end.
    pub(crate) fn extract(&self, index: usize, len: usize, out: &mut Vec<T>)
    where
        T: Clone,
    {
        match self {
            Node::Leaf { fragment } => {
                let end = fragment.len().min(index.saturating_add(len));
                if index < end {
                    out.extend_from_slice(&fragment[index..end]);
                }
            }
            Node::Internal {
                weight,
                left,
                right,
            } => {
                if index < *weight {
                    left.extract(index, len.min(weight - index), out);
                    if index + len > *weight {
                        // The range straddles the boundary; the rest is a
                        // prefix of the right subtree.
                        right.extract(0, index + len - weight, out);
                    }
                } else {
                    right.extract(index - weight, len, out);
                }
            }
        }
    }

    /// Collects in-order references to every leaf in the subtree.
    pub(crate) fn leaves<'a>(&'a self, out: &mut Vec<&'a Node<T>>) {
        match self {
            Node::Leaf { .. } => out.push(self),
            Node::Internal { left, right, .. } => {
                left.leaves(out);
                right.leaves(out);
            }
        }
    }

    /// Splits the subtree at `index`, consuming it.
    ///
    /// Returns `(front, back)` where `front` represents the first `index`
    /// elements and `back` the rest; their lengths always sum to the input's
    /// length. `index` must be at most the subtree's length.
    pub(crate) fn split(self: Box<Node<T>>, index: usize) -> (Box<Node<T>>, Box<Node<T>>) {
        match *self {
            Node::Leaf { mut fragment } => {
                let back = fragment.split_off(index);
                (Node::leaf(fragment), Node::leaf(back))
            }
            Node::Internal {
                weight,
                left,
                right,
            } => match index.cmp(&weight) {
                // Split point inside the left subtree: everything at or past
                // it, including the whole right child, goes to the back.
                Ordering::Less => {
                    let (front, mid) = left.split(index);
                    (front, Node::concat(mid, right))
                }
                // Split point inside the right subtree: the left child stays
                // intact on the front together with the right child's front.
                Ordering::Greater => {
                    let (mid, back) = right.split(index - weight);
                    (Node::concat(left, mid), back)
                }
                // Exactly on the seam: the children are the two halves.
                Ordering::Equal => (left, right),
            },
        }
    }
}
