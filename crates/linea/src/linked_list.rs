//! Circular doubly linked list over an index arena.
//!
//! Purpose
//! - Ordered ring of records with O(1) insert/remove given a handle. Polygons
//!   keep their vertices here, plus the convex/reflex partitions as rings of
//!   vertex handles.
//!
//! Storage
//! - Nodes live in `Vec<Option<Node<T>>>`; removed slots go on a free list and
//!   are reused. `NodeId`s are only meaningful for the list that issued them.
//! - `first` is the ring entry point; `last` is always `prev(first)`.

use rand::Rng;

/// Handle to a node of one particular [`CircularList`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
struct Node<T> {
    prev: NodeId,
    next: NodeId,
    data: T,
}

#[derive(Clone, Debug)]
pub struct CircularList<T> {
    nodes: Vec<Option<Node<T>>>,
    free_list: Vec<NodeId>,
    first: Option<NodeId>,
    len: usize,
}

impl<T> Default for CircularList<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
            first: None,
            len: 0,
        }
    }
}

impl<T> CircularList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn first(&self) -> Option<NodeId> {
        self.first
    }

    pub fn last(&self) -> Option<NodeId> {
        self.first.and_then(|f| self.prev(f))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|n| &n.data)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).map(|n| &mut n.data)
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).map(|n| n.next)
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).map(|n| n.prev)
    }

    /// Insert at the end of the ring (just before `first`).
    pub fn append(&mut self, data: T) -> NodeId {
        match self.last() {
            Some(last) => self.link_after(last, data),
            None => {
                let id = self.alloc(Node {
                    prev: NodeId(0),
                    next: NodeId(0),
                    data,
                });
                if let Some(n) = self.node_mut(id) {
                    n.prev = id;
                    n.next = id;
                }
                self.first = Some(id);
                self.len = 1;
                id
            }
        }
    }

    /// Insert at the front; the new node becomes `first`.
    pub fn prepend(&mut self, data: T) -> NodeId {
        let id = self.append(data);
        self.first = Some(id);
        id
    }

    /// `None` if `id` is not in the list.
    pub fn insert_after(&mut self, id: NodeId, data: T) -> Option<NodeId> {
        self.contains(id).then(|| self.link_after(id, data))
    }

    /// `None` if `id` is not in the list. Inserting before `first` makes the new
    /// node `first`.
    pub fn insert_before(&mut self, id: NodeId, data: T) -> Option<NodeId> {
        let prev = self.prev(id)?;
        let new = self.link_after(prev, data);
        if self.first == Some(id) {
            self.first = Some(new);
        }
        Some(new)
    }

    /// Unlink `id` and hand back its data.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        let node = self.nodes.get_mut(id.0)?.take()?;
        if self.len == 1 {
            self.first = None;
        } else {
            if let Some(p) = self.node_mut(node.prev) {
                p.next = node.next;
            }
            if let Some(n) = self.node_mut(node.next) {
                n.prev = node.prev;
            }
            if self.first == Some(id) {
                self.first = Some(node.next);
            }
        }
        self.len -= 1;
        self.free_list.push(id);
        Some(node.data)
    }

    /// `i`-th node walking forward from `first` (0-based).
    pub fn at(&self, i: usize) -> Option<NodeId> {
        if i >= self.len {
            return None;
        }
        let mut id = self.first?;
        for _ in 0..i {
            id = self.next(id)?;
        }
        Some(id)
    }

    /// First node whose data satisfies `pred`, scanning inward from both ends
    /// at once; at most `ceil(len / 2)` steps.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<NodeId> {
        let mut from_start = self.first?;
        let mut from_end = self.last()?;
        for _ in 0..self.len.div_ceil(2) {
            if pred(self.get(from_start)?) {
                return Some(from_start);
            }
            if pred(self.get(from_end)?) {
                return Some(from_end);
            }
            from_start = self.next(from_start)?;
            from_end = self.prev(from_end)?;
        }
        None
    }

    /// Uniformly random node; walks from `first`, so O(len).
    pub fn random_node<R: Rng>(&self, rng: &mut R) -> Option<NodeId> {
        if self.is_empty() {
            return None;
        }
        self.at(rng.gen_range(0..self.len))
    }

    /// Handles in ring order, once around from `first`.
    pub fn ids(&self) -> Ids<'_, T> {
        Ids {
            list: self,
            cursor: self.first,
            remaining: self.len,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.ids().filter_map(move |id| self.get(id))
    }

    /// All live values, in slot order rather than ring order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.nodes.iter_mut().flatten().map(|n| &mut n.data)
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Allocate a slot, reusing holes if available.
    fn alloc(&mut self, node: Node<T>) -> NodeId {
        if let Some(id) = self.free_list.pop() {
            self.nodes[id.0] = Some(node);
            id
        } else {
            let id = NodeId(self.nodes.len());
            self.nodes.push(Some(node));
            id
        }
    }

    /// Caller guarantees `id` is live.
    fn link_after(&mut self, id: NodeId, data: T) -> NodeId {
        let next = self.next(id).unwrap_or(id);
        let new = self.alloc(Node {
            prev: id,
            next,
            data,
        });
        if let Some(n) = self.node_mut(id) {
            n.next = new;
        }
        if let Some(n) = self.node_mut(next) {
            n.prev = new;
        }
        self.len += 1;
        new
    }
}

impl<T: PartialEq> CircularList<T> {
    /// Node holding `data` (see [`CircularList::find`]).
    pub fn with_data(&self, data: &T) -> Option<NodeId> {
        self.find(|d| d == data)
    }
}

impl<T> FromIterator<T> for CircularList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for x in iter {
            list.append(x);
        }
        list
    }
}

/// Iterator over node handles, once around the ring.
pub struct Ids<'a, T> {
    list: &'a CircularList<T>,
    cursor: Option<NodeId>,
    remaining: usize,
}

impl<T> Iterator for Ids<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.cursor?;
        self.cursor = self.list.next(id);
        self.remaining -= 1;
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
