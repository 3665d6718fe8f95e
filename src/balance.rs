//! Fibonacci-interval rebalancing.
//!
//! A rope of depth `d` counts as balanced when its length is at least
//! `fib(d + 2)`, the classical criterion from the rope literature. The
//! rebuild pass packs the leaves, left to right, into an array of slots
//! where slot `i` accepts subtrees whose length lies in
//! `[fib(i + 2), fib(i + 3))`; because slot capacities grow at the
//! Fibonacci rate, each filled slot is itself balanced for its length, and
//! folding the occupied slots together yields a tree of logarithmic depth.

use crate::node::Node;

/// The `n`-th Fibonacci number, zero-based: 0, 1, 1, 2, 3, 5, ...
///
/// Saturates instead of overflowing; beyond `fib(93)` every result is
/// `usize::MAX` on 64-bit targets, which only makes the balance criterion
/// stricter for absurdly deep trees.
pub(crate) fn fib(n: usize) -> usize {
    let (mut a, mut b) = (0usize, 1usize);
    for _ in 0..n {
        (a, b) = (b, a.saturating_add(b));
    }
    a
}

/// Upper bounds of the Fibonacci intervals covering lengths up to `len`.
///
/// Entry `i` is `fib(i + 3)`, the exclusive upper bound of slot `i`'s
/// interval `[fib(i + 2), fib(i + 3))`. Bounds are generated until the
/// interval containing `len` is covered, so the last bound strictly exceeds
/// `len`. Empty when `len` is zero.
pub(crate) fn fib_intervals(len: usize) -> Vec<usize> {
    let (mut a, mut b) = (0usize, 1usize);
    let mut bounds = Vec::new();
    while a <= len {
        if a > 0 {
            bounds.push(b);
        }
        (a, b) = (b, a.saturating_add(b));
    }
    bounds
}

/// Rebuilds a tree from its leaves into balanced form.
///
/// Non-empty leaves are packed through the slot array in order. Each leaf
/// starts a fresh accumulator, which first absorbs every occupied slot
/// whose interval its length has outgrown, then either settles into the
/// first empty slot at its scan position or absorbs the occupant and
/// re-scans. Slots at higher indices therefore always hold earlier content,
/// so the final fold walks the array top-down with the accumulated tree on
/// the left.
///
/// Returns `None` when every leaf is empty; the caller represents that as
/// the empty rope.
pub(crate) fn rebuild<T: Clone>(root: &Node<T>) -> Option<Box<Node<T>>> {
    let bounds = fib_intervals(root.length());
    let mut slots: Vec<Option<Box<Node<T>>>> = Vec::new();
    slots.resize_with(bounds.len(), || None);

    let mut leaves = Vec::new();
    root.leaves(&mut leaves);

    for leaf in leaves {
        if leaf.length() == 0 {
            continue;
        }
        let mut acc = Box::new((*leaf).clone());
        let mut i = 0;
        loop {
            // Absorb any occupied slot whose interval the accumulator has
            // already outgrown, advancing toward its home interval.
            while i + 1 < bounds.len() && acc.length() >= bounds[i + 1] {
                if let Some(parked) = slots[i].take() {
                    acc = Node::concat(parked, acc);
                }
                i += 1;
            }
            match slots[i].take() {
                None => {
                    slots[i] = Some(acc);
                    break;
                }
                // Occupied: merge and re-scan, since the combined length may
                // now belong to a higher interval.
                Some(parked) => acc = Node::concat(parked, acc),
            }
        }
    }

    let mut acc: Option<Box<Node<T>>> = None;
    for slot in slots.into_iter().rev() {
        if let Some(parked) = slot {
            acc = Some(match acc {
                None => parked,
                Some(tree) => Node::concat(tree, parked),
            });
        }
    }
    acc
}
