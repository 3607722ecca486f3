//! Persistent mergeable priority queue
//!
//! A leftist-style heap with full structural sharing: every operation
//! returns a new [`Heap`] and leaves the receiver untouched, so two owners
//! of the same heap value may use it concurrently without coordination.
//! `merge` is the single primitive; `insert` and `pop` reduce to it.
//!
//! The rank stored in each node tracks which subtree the last merge was
//! attached to. `merge` always descends into that subtree and reattaches
//! the shorter-rank side there, which keeps the merge path O(log n).

use std::sync::Arc;

/// Immutable comparator-ordered heap. Ordering comes from `E: Ord`
/// (smallest element first).
pub struct Heap<E> {
    root: Node<E>,
}

enum Node<E> {
    Empty,
    Tree(Arc<Tree<E>>),
}

struct Tree<E> {
    rank: u32,
    len: usize,
    elem: E,
    left: Node<E>,
    right: Node<E>,
}

impl<E> Clone for Node<E> {
    fn clone(&self) -> Self {
        match self {
            Node::Empty => Node::Empty,
            Node::Tree(t) => Node::Tree(Arc::clone(t)),
        }
    }
}

impl<E> Clone for Heap<E> {
    fn clone(&self) -> Self {
        Heap {
            root: self.root.clone(),
        }
    }
}

impl<E> Default for Heap<E> {
    fn default() -> Self {
        Heap::new()
    }
}

impl<E> Node<E> {
    fn rank(&self) -> u32 {
        match self {
            Node::Empty => 0,
            Node::Tree(t) => t.rank,
        }
    }

    fn len(&self) -> usize {
        match self {
            Node::Empty => 0,
            Node::Tree(t) => t.len,
        }
    }
}

/// Rebuild a node around `elem`, hanging the shorter-rank subtree on the
/// side the next merge descends into.
fn make<E>(elem: E, first: &Node<E>, second: &Node<E>) -> Node<E> {
    let len = 1 + first.len() + second.len();
    let (rank, left, right) = if first.rank() >= second.rank() {
        (second.rank() + 1, first.clone(), second.clone())
    } else {
        (first.rank() + 1, second.clone(), first.clone())
    };
    Node::Tree(Arc::new(Tree {
        rank,
        len,
        elem,
        left,
        right,
    }))
}

fn merge<E: Ord + Clone>(a: &Node<E>, b: &Node<E>) -> Node<E> {
    match (a, b) {
        (Node::Empty, _) => b.clone(),
        (_, Node::Empty) => a.clone(),
        (Node::Tree(x), Node::Tree(y)) => {
            if x.elem <= y.elem {
                make(x.elem.clone(), &x.left, &merge(&x.right, b))
            } else {
                make(y.elem.clone(), &y.left, &merge(&y.right, a))
            }
        }
    }
}

impl<E> Heap<E> {
    /// The empty heap.
    pub fn new() -> Self {
        Heap { root: Node::Empty }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.root, Node::Empty)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Smallest element, if any.
    pub fn peek(&self) -> Option<&E> {
        match &self.root {
            Node::Empty => None,
            Node::Tree(t) => Some(&t.elem),
        }
    }
}

impl<E: Ord + Clone> Heap<E> {
    /// One-element heap.
    pub fn singleton(elem: E) -> Self {
        Heap {
            root: make(elem, &Node::Empty, &Node::Empty),
        }
    }

    /// Union of `self` and `other`. Neither input is modified; merging
    /// with an empty heap returns the other heap unchanged.
    pub fn merge(&self, other: &Heap<E>) -> Heap<E> {
        Heap {
            root: merge(&self.root, &other.root),
        }
    }

    /// Heap with `elem` added.
    pub fn insert(&self, elem: E) -> Heap<E> {
        Heap::singleton(elem).merge(self)
    }

    /// Smallest element together with the heap that remains after
    /// removing it, or `None` on the empty heap.
    pub fn pop(&self) -> Option<(E, Heap<E>)> {
        match &self.root {
            Node::Empty => None,
            Node::Tree(t) => Some((
                t.elem.clone(),
                Heap {
                    root: merge(&t.left, &t.right),
                },
            )),
        }
    }

    /// Element at sorted position `index`, by repeated `pop`. Linear in
    /// `index`; intended for small diagnostic lookups only.
    pub fn get(&self, index: usize) -> Option<E> {
        let mut heap = self.clone();
        for _ in 0..index {
            let (_, rest) = heap.pop()?;
            heap = rest;
        }
        heap.pop().map(|(e, _)| e)
    }

    /// Ascending-order traversal. The iterator drains a copy; `self`
    /// remains valid and unchanged.
    pub fn iter(&self) -> Drain<E> {
        Drain {
            heap: self.clone(),
        }
    }

    /// Drains into a vector sorted in ascending order.
    pub fn into_sorted_vec(self) -> Vec<E> {
        self.iter().collect()
    }
}

impl<E: Ord + Clone> FromIterator<E> for Heap<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Heap::new(), |heap, elem| heap.insert(elem))
    }
}

/// Single-pass ordered traversal over a private copy of a heap.
pub struct Drain<E> {
    heap: Heap<E>,
}

impl<E: Ord + Clone> Iterator for Drain<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        let (elem, rest) = self.heap.pop()?;
        self.heap = rest;
        Some(elem)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.heap.len();
        (len, Some(len))
    }
}

impl<E: Ord + Clone> IntoIterator for &Heap<E> {
    type Item = E;
    type IntoIter = Drain<E>;

    fn into_iter(self) -> Drain<E> {
        self.iter()
    }
}
