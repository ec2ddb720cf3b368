use crate::node::{Direction, Node, NodeId};
use log::trace;
#[cfg(feature="serde")]
use serde::{Serialize, Deserialize};

/// Largest tolerated difference between the sizes of a node's two subtrees
/// before the heavier child gets rotated above it.
pub(crate) const REBALANCE_THRESHOLD: usize = 2;

/// Index-addressed storage for the nodes of one tree.
///
/// Children are only reachable from the single slot of their parent, and the
/// `parent` handle of a node is a plain lookup. Released slots are recycled.
#[cfg_attr(feature="serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub(crate) struct Arena<K> {
    slots: Vec<Option<Node<K>>>,
    vacant: Vec<NodeId>,
}

impl<K> Arena<K> {
    pub fn new() -> Arena<K> {
        Arena {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
    }

    pub fn alloc(&mut self, node: Node<K>) -> NodeId {
        match self.vacant.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Frees the slot of `id`, handing back the node it held. Links from and
    /// to the node are left untouched.
    pub fn release(&mut self, id: NodeId) -> Node<K> {
        let node = self.slots[id.0]
            .take()
            .expect("released node handle should point at a live node");
        self.vacant.push(id);
        node
    }

    /// Frees `root` and all of its descendants, returning how many nodes went.
    pub fn release_subtree(&mut self, root: Option<NodeId>) -> usize {
        let mut pending: Vec<NodeId> = root.into_iter().collect();
        let mut released = 0;
        while let Some(id) = pending.pop() {
            let node = self.release(id);
            pending.extend(node.left);
            pending.extend(node.right);
            released += 1;
        }
        released
    }

    pub fn node(&self, id: NodeId) -> &Node<K> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .expect("node handle should point at a live node")
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .expect("node handle should point at a live node")
    }

    /// Size of the subtree rooted at `id`, self included.
    pub fn count(&self, id: Option<NodeId>) -> usize {
        id.map_or(0, |id| self.node(id).child_count + 1)
    }

    pub fn child(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        self.node(id).child(direction)
    }

    /// Which side of `parent` holds `child`.
    ///
    /// # Panics
    ///
    /// If `child` is neither child of `parent`.
    pub fn deduce_direction(&self, parent: NodeId, child: NodeId) -> Direction {
        let node = self.node(parent);
        if node.left == Some(child) {
            Direction::Left
        } else if node.right == Some(child) {
            Direction::Right
        } else {
            panic!("{:?} is not a child of {:?}", child, parent)
        }
    }

    /// Installs `other` as the child of `id` on `direction` and points its
    /// parent handle back at `id`. Counts are not touched.
    pub fn set_child_two_way(
        &mut self,
        id: NodeId,
        direction: Direction,
        other: Option<NodeId>,
    ) -> NodeId {
        *self.node_mut(id).child_mut(direction) = other;
        if let Some(other) = other {
            self.node_mut(other).parent = Some(id);
        }
        id
    }

    pub fn update_counts(&mut self, id: NodeId) {
        let (left, right) = {
            let node = self.node(id);
            (node.left, node.right)
        };
        let child_count = self.count(left) + self.count(right);
        self.node_mut(id).child_count = child_count;
    }

    /// Recomputes counts from `id` up to the root without rebalancing.
    /// Returns the root.
    pub fn propagate_counts(&mut self, id: NodeId) -> NodeId {
        let mut current = id;
        loop {
            self.update_counts(current);
            match self.node(current).parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// Recomputes counts from `id` up to the root. At every level, when the
    /// sizes of the two subtrees differ by more than [`REBALANCE_THRESHOLD`],
    /// the heavier child is rotated above the node. Returns the node that
    /// ends up at the top, which callers must treat as the new root.
    pub fn update_counts_autobalanced(&mut self, id: NodeId) -> NodeId {
        let mut current = id;
        loop {
            self.update_counts(current);
            let (left, right) = {
                let node = self.node(current);
                (node.left, node.right)
            };
            let (left_count, right_count) = (self.count(left), self.count(right));
            if left_count.abs_diff(right_count) > REBALANCE_THRESHOLD {
                let promoted = if left_count > right_count { left } else { right };
                let promoted = promoted.expect("the heavier side of a node always has a child");
                self.rotate(promoted);
                // One rotation per level; the promoted node is not checked again.
                self.update_counts(current);
                current = promoted;
                self.update_counts(current);
            }
            match self.node(current).parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// [`Arena::set_child_two_way`] followed by
    /// [`Arena::update_counts_autobalanced`]. Returns the new root.
    pub fn set_child_two_way_autobalanced(
        &mut self,
        id: NodeId,
        direction: Direction,
        other: NodeId,
    ) -> NodeId {
        self.set_child_two_way(id, direction, Some(other));
        self.update_counts_autobalanced(id)
    }

    /// Single rotation promoting `id` above its parent.
    ///
    /// The parent's count is adjusted for the subtree it hands over; the
    /// count of `id` itself is left for the caller to recompute.
    ///
    /// # Panics
    ///
    /// If `id` has no parent.
    pub fn rotate(&mut self, id: NodeId) {
        let parent = self.node(id).parent.expect("cannot rotate the root");
        let grandparent = self.node(parent).parent;
        let direction = self.deduce_direction(parent, id);
        let inner = self.child(id, direction.opposite());
        trace!("rotating {:?} above {:?} from the {}", id, parent, direction);

        self.set_child_two_way(id, direction.opposite(), Some(parent));
        let promoted_size = self.count(Some(id));
        self.node_mut(parent).child_count -= promoted_size;

        self.set_child_two_way(parent, direction, inner);
        let inner_size = self.count(inner);
        self.node_mut(parent).child_count += inner_size;

        match grandparent {
            None => self.node_mut(id).parent = None,
            Some(grandparent) => {
                let slot = self.deduce_direction(grandparent, parent);
                self.set_child_two_way(grandparent, slot, Some(id));
            }
        }
    }

    /// Unlinks and frees `id`, putting the join of its two subtrees in its
    /// place. The rightmost node of the left subtree is lifted when both
    /// subtrees exist. Returns the root afterwards, `None` if the tree is empty.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeId> {
        let removed = self.release(id);
        trace!("removing {:?}", id);
        let (joined, repair_from) = match (removed.left, removed.right) {
            (None, other) | (other, None) => (other, removed.parent),
            (Some(left), Some(right)) => {
                let mut lifted = left;
                while let Some(next) = self.node(lifted).right {
                    lifted = next;
                }
                let repair_from = if lifted == left {
                    lifted
                } else {
                    let lifted_parent = self
                        .node(lifted)
                        .parent
                        .expect("a node below the subtree root has a parent");
                    let lifted_left = self.node(lifted).left;
                    self.set_child_two_way(lifted_parent, Direction::Right, lifted_left);
                    self.set_child_two_way(lifted, Direction::Left, Some(left));
                    lifted_parent
                };
                self.set_child_two_way(lifted, Direction::Right, Some(right));
                (Some(lifted), Some(repair_from))
            }
        };

        match removed.parent {
            Some(parent) => {
                let direction = self.deduce_direction(parent, id);
                self.set_child_two_way(parent, direction, joined);
            }
            None => {
                if let Some(joined) = joined {
                    self.node_mut(joined).parent = None;
                }
            }
        }

        match repair_from {
            Some(repair_from) => Some(self.propagate_counts(repair_from)),
            None => joined,
        }
    }
}

impl<K> Arena<K>
where
    K: PartialOrd + Copy,
{
    /// Absorbs every node towards `direction` that overlaps the (already
    /// widened) interval of `id`, extending the bound of `id` on that side.
    ///
    /// An absorbed node takes its inner subtree with it, since that subtree
    /// lies between the node and `id`. Its outer subtree moves up into the
    /// vacated slot and is checked next. When a child does not overlap, its
    /// inner subtree still might, so the walk continues there.
    pub fn merge_children(&mut self, id: NodeId, direction: Direction) {
        let inward = direction.opposite();
        let mut holder = id;
        let mut slot = direction;
        while let Some(child) = self.child(holder, slot) {
            if self.node(id).overlaps(self.node(child)) {
                let reach = *self.node(child).bound(direction);
                if direction.is_beyond(&reach, self.node(id).bound(direction)) {
                    *self.node_mut(id).bound_mut(direction) = reach;
                }
                let absorbed = self.release(child);
                let covered = self.release_subtree(absorbed.child(inward));
                trace!("{:?} absorbed {:?} and {} covered nodes", id, child, covered);
                self.set_child_two_way(holder, slot, absorbed.child(direction));
            } else {
                holder = child;
                slot = inward;
            }
        }
        self.propagate_counts(holder);
    }

    /// Deletes everything from `limit` towards `keep.opposite()` out of the
    /// subtree hanging from `holder` on `slot`.
    ///
    /// The subtree must lie entirely on the `keep` side of the end of the
    /// deleted range, so only a single path needs visiting: nodes short of
    /// `limit` are passed, covered nodes are freed along with their outer
    /// subtree, and the first straddling node is truncated to `limit`.
    pub fn trim(&mut self, holder: NodeId, slot: Direction, keep: Direction, limit: K) {
        let cut = keep.opposite();
        let mut holder = holder;
        let mut slot = slot;
        while let Some(child) = self.child(holder, slot) {
            let node = self.node(child);
            if keep.is_beyond(node.bound(cut), &limit) {
                holder = child;
                slot = cut;
            } else if !keep.is_beyond(node.bound(keep), &limit) {
                let removed = self.release(child);
                let covered = self.release_subtree(removed.child(cut));
                trace!("trimmed away {:?} and {} covered nodes", child, covered);
                self.set_child_two_way(holder, slot, removed.child(keep));
            } else {
                let node = self.node_mut(child);
                *node.bound_mut(cut) = limit;
                let outer = node.child_mut(cut).take();
                self.release_subtree(outer);
                holder = child;
                break;
            }
        }
        self.propagate_counts(holder);
    }
}

#[cfg(test)]
impl<K> Arena<K>
where
    K: PartialOrd + Copy + std::fmt::Debug,
{
    /// Panics unless the tree under `root` has consistent parent handles and
    /// counts, is ordered, and owns every live node of the arena.
    pub(crate) fn validate(&self, root: Option<NodeId>) {
        if let Some(root) = root {
            assert_eq!(self.node(root).parent, None, "root has a parent");
        }
        let mut seen = 0;
        let mut previous: Option<K> = None;
        let mut stack = Vec::new();
        let mut current = root;
        while current.is_some() || !stack.is_empty() {
            while let Some(id) = current {
                stack.push(id);
                current = self.node(id).left;
            }
            let id = stack.pop().unwrap();
            let node = self.node(id);
            seen += 1;

            for child in [node.left, node.right].into_iter().flatten() {
                assert_eq!(self.node(child).parent, Some(id), "parent of {:?} out of sync", child);
            }
            assert_eq!(
                node.child_count,
                self.count(node.left) + self.count(node.right),
                "count of {:?} out of sync",
                id
            );
            if let Some(previous) = previous {
                assert!(previous <= node.left_point, "{:?} is out of order", id);
            }
            previous = Some(node.right_point);
            current = node.right;
        }
        assert_eq!(seen, self.len(), "arena holds unreachable nodes");
    }
}
