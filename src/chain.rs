//! Arena-backed singly linked list used for the buckets of
//! [`ChainedHashMap`](crate::ChainedHashMap).
//!
//! Nodes live in a `Vec` and link to each other through [`NodeId`] handles, so
//! unlinking a successor or inserting after a known node is O(1) without raw
//! pointers. Slots freed by removal are recycled by later insertions.

/// Stable handle to a node of a [`Chain`].
///
/// A handle stays valid until its node is removed or the chain is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

/// A node of the chain
#[derive(Debug, Clone)]
struct Node<T> {
    /// The payload stored in the node
    data: T,
    /// The successor of this node, if any
    next: Option<NodeId>,
}

/// A singly linked list whose nodes are stored in an arena
#[derive(Debug, Clone)]
pub(crate) struct Chain<T> {
    /// Node storage; `None` marks a freed slot
    nodes: Vec<Option<Node<T>>>,
    /// Indices of freed slots available for reuse
    free: Vec<usize>,
    /// First node of the list
    head: Option<NodeId>,
}

impl<T> Chain<T> {
    /// Creates an empty chain
    pub(crate) const fn new() -> Self {
        Self { nodes: Vec::new(), free: Vec::new(), head: None }
    }

    /// Returns the first node of the chain
    pub(crate) const fn head(&self) -> Option<NodeId> {
        self.head
    }

    /// Returns true if the chain holds no nodes
    pub(crate) const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the successor of `id`
    pub(crate) fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.next)
    }

    /// Returns the payload of `id`
    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|node| &node.data)
    }

    /// Returns the payload of `id` mutably
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut).map(|node| &mut node.data)
    }

    /// Looks up a live node
    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Walks the chain while `before` holds.
    ///
    /// Returns the last node for which `before` held (the predecessor) and the
    /// first node for which it did not, if any.
    pub(crate) fn seek<F>(&self, mut before: F) -> (Option<NodeId>, Option<NodeId>)
    where
        F: FnMut(&T) -> bool,
    {
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            match self.node(id) {
                Some(node) if before(&node.data) => {
                    prev = Some(id);
                    current = node.next;
                }
                _ => break,
            }
        }
        (prev, current)
    }

    /// Pushes `data` at the front of the chain
    pub(crate) fn push_front(&mut self, data: T) -> NodeId {
        self.insert_after(None, data)
    }

    /// Links `data` right after `prev`, or at the front when `prev` is `None`.
    ///
    /// A stale `prev` handle also inserts at the front.
    pub(crate) fn insert_after(&mut self, prev: Option<NodeId>, data: T) -> NodeId {
        let prev = prev.filter(|&id| self.node(id).is_some());
        let next = match prev {
            Some(id) => self.next(id),
            None => self.head,
        };

        let id = self.store(Node { data, next });
        match self.link_of(prev) {
            Some(prev_node) => prev_node.next = Some(id),
            None => self.head = Some(id),
        }
        id
    }

    /// Unlinks the successor of `prev`, or the head when `prev` is `None`,
    /// and returns its payload
    pub(crate) fn remove_after(&mut self, prev: Option<NodeId>) -> Option<T> {
        let target = match prev {
            Some(id) => self.next(id)?,
            None => self.head?,
        };
        let node = self.nodes.get_mut(target.0)?.take()?;

        match self.link_of(prev) {
            Some(prev_node) => prev_node.next = node.next,
            None => self.head = node.next,
        }
        self.free.push(target.0);
        Some(node.data)
    }

    /// Removes every node
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
    }

    /// Returns an iterator over the payloads from head to tail
    pub(crate) const fn iter(&self) -> ChainIter<'_, T> {
        ChainIter { chain: self, current: self.head }
    }

    /// Returns the node owning the link that points at the successor of `prev`;
    /// `None` stands for the head link
    fn link_of(&mut self, prev: Option<NodeId>) -> Option<&mut Node<T>> {
        match prev {
            Some(id) => self.nodes.get_mut(id.0).and_then(Option::as_mut),
            None => None,
        }
    }

    /// Places a node in a free slot, or at the end of the arena
    fn store(&mut self, node: Node<T>) -> NodeId {
        let recycled = self.free.pop().and_then(|index| Some((index, self.nodes.get_mut(index)?)));
        if let Some((index, slot)) = recycled {
            *slot = Some(node);
            return NodeId(index);
        }
        self.nodes.push(Some(node));
        NodeId(self.nodes.len().saturating_sub(1))
    }
}

/// Iterator over the payloads of a [`Chain`]
#[derive(Debug, Clone)]
pub(crate) struct ChainIter<'a, T> {
    /// The chain being walked
    chain: &'a Chain<T>,
    /// The next node to yield
    current: Option<NodeId>,
}

impl<'a, T> Iterator for ChainIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.chain.node(self.current?)?;
        self.current = node.next;
        Some(&node.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(chain: &Chain<i32>) -> Vec<i32> {
        chain.iter().copied().collect()
    }

    #[test]
    fn test_push_front() {
        let mut chain = Chain::new();
        assert!(chain.is_empty());
        chain.push_front(3);
        chain.push_front(2);
        chain.push_front(1);
        assert!(!chain.is_empty());
        assert_eq!(collect(&chain), vec![1, 2, 3]);
    }

    #[test]
    fn test_insert_after() {
        let mut chain = Chain::new();
        let first = chain.push_front(1);
        let third = chain.insert_after(Some(first), 3);
        chain.insert_after(Some(first), 2);
        chain.insert_after(Some(third), 4);
        assert_eq!(collect(&chain), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_after() {
        let mut chain = Chain::new();
        let first = chain.push_front(1);
        let second = chain.insert_after(Some(first), 2);
        chain.insert_after(Some(second), 3);

        assert_eq!(chain.remove_after(Some(first)), Some(2));
        assert_eq!(collect(&chain), vec![1, 3]);
        assert_eq!(chain.remove_after(None), Some(1));
        assert_eq!(collect(&chain), vec![3]);
        assert_eq!(chain.remove_after(None), Some(3));
        assert!(chain.is_empty());
        assert_eq!(chain.remove_after(None), None);
    }

    #[test]
    fn test_removed_slots_are_recycled() {
        let mut chain = Chain::new();
        let first = chain.push_front(1);
        chain.insert_after(Some(first), 2);
        chain.remove_after(Some(first));

        let reused = chain.insert_after(Some(first), 5);
        assert_eq!(chain.nodes.len(), 2);
        assert_eq!(chain.get(reused), Some(&5));
        assert_eq!(collect(&chain), vec![1, 5]);
    }

    #[test]
    fn test_seek() {
        let mut chain = Chain::new();
        let first = chain.push_front(10);
        let second = chain.insert_after(Some(first), 20);
        let third = chain.insert_after(Some(second), 30);

        assert_eq!(chain.seek(|&x| x < 5), (None, Some(first)));
        assert_eq!(chain.seek(|&x| x < 25), (Some(second), Some(third)));
        assert_eq!(chain.seek(|&x| x < 99), (Some(third), None));
        assert_eq!(Chain::<i32>::new().seek(|_| true), (None, None));
    }

    #[test]
    fn test_get_mut_and_traversal() {
        let mut chain = Chain::new();
        let first = chain.push_front(1);
        let second = chain.insert_after(Some(first), 2);

        if let Some(value) = chain.get_mut(second) {
            *value = 20;
        }
        assert_eq!(chain.head(), Some(first));
        assert_eq!(chain.next(first), Some(second));
        assert_eq!(chain.next(second), None);
        assert_eq!(chain.get(second), Some(&20));
    }

    #[test]
    fn test_clear() {
        let mut chain = Chain::new();
        let first = chain.push_front(1);
        chain.insert_after(Some(first), 2);
        chain.clear();
        assert!(chain.is_empty());
        assert_eq!(chain.get(first), None);
        assert_eq!(collect(&chain), Vec::<i32>::new());
    }
}
