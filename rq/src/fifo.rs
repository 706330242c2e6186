//! Arena-backed singly linked FIFO queue
//!
//! Nodes live in a `Vec` and link to each other by index, so there are no
//! owning pointers between nodes. Slots released by `dequeue` go onto a free
//! list and are reused by later inserts. Every operation is O(1) except
//! `clear`.

/// Handle to a live node, valid until that node is dequeued
///
/// Carries the slot generation, so a handle to a released slot stays dead
/// after the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Node<T> {
    /// `None` only while the slot sits on the free list
    value: Option<T>,
    next: Option<usize>,
    /// Bumped every time the slot is released
    generation: u64,
}

/// Unbounded FIFO queue
#[derive(Debug, Clone)]
pub struct FifoQueue<T> {
    nodes: Vec<Node<T>>,
    head: Option<usize>,
    tail: Option<usize>,
    /// Reusable slots from dequeued nodes
    free_list: Vec<usize>,
    len: usize,
}

impl<T> Default for FifoQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FifoQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Append at the tail
    pub fn enqueue(&mut self, value: T) -> NodeId {
        let idx = self.alloc(value);
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
        self.node_id(idx)
    }

    /// Remove and return the head value, or `None` when empty
    pub fn dequeue(&mut self) -> Option<T> {
        let idx = self.head?;
        let node = &mut self.nodes[idx];
        let value = node.value.take();
        node.generation = node.generation.wrapping_add(1);
        self.head = node.next.take();
        self.free_list.push(idx);
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        value
    }

    /// Borrow the head value without removing it
    pub fn peek(&self) -> Option<&T> {
        self.head.and_then(|idx| self.nodes[idx].value.as_ref())
    }

    /// Insert ahead of every queued value
    pub fn push_front(&mut self, value: T) -> NodeId {
        let idx = self.alloc(value);
        self.nodes[idx].next = self.head;
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
        self.len += 1;
        self.node_id(idx)
    }

    /// Insert directly behind `node`
    ///
    /// Hands `value` back if `node` is no longer in the queue, including
    /// when its slot has since been reused.
    pub fn insert_after(&mut self, node: NodeId, value: T) -> Result<NodeId, T> {
        if !self.is_live(node) {
            return Err(value);
        }
        let at = node.index;
        let idx = self.alloc(value);
        self.nodes[idx].next = self.nodes[at].next;
        self.nodes[at].next = Some(idx);
        if self.tail == Some(at) {
            self.tail = Some(idx);
        }
        self.len += 1;
        Ok(self.node_id(idx))
    }

    /// Iterate from head to tail
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            queue: self,
            cursor: self.head,
        }
    }

    /// Drop every value; all slots go back on the free list
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (idx, node) in self.nodes.iter_mut().enumerate() {
            node.value = None;
            node.next = None;
            node.generation = node.generation.wrapping_add(1);
            self.free_list.push(idx);
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn is_live(&self, node: NodeId) -> bool {
        self.nodes
            .get(node.index)
            .is_some_and(|n| n.value.is_some() && n.generation == node.generation)
    }

    fn node_id(&self, index: usize) -> NodeId {
        NodeId {
            index,
            generation: self.nodes[index].generation,
        }
    }

    fn alloc(&mut self, value: T) -> usize {
        match self.free_list.pop() {
            Some(idx) => {
                let node = &mut self.nodes[idx];
                node.value = Some(value);
                node.next = None;
                idx
            }
            None => {
                self.nodes.push(Node {
                    value: Some(value),
                    next: None,
                    generation: 0,
                });
                self.nodes.len() - 1
            }
        }
    }
}

/// Head-to-tail iterator over a [`FifoQueue`]
pub struct Iter<'a, T> {
    queue: &'a FifoQueue<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = &self.queue.nodes[idx];
        self.cursor = node.next;
        node.value.as_ref()
    }
}

impl<'a, T> IntoIterator for &'a FifoQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
