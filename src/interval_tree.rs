use crate::arena::Arena;
use crate::interval::Interval;
use crate::node::{Direction, Node, NodeId};
use log::debug;
use std::error::Error;
use std::fmt;
#[cfg(feature="serde")]
use serde::{Serialize, Deserialize};

/// Returned when building an [`IntervalTree`] from no intervals at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyIntervalsError;

impl fmt::Display for EmptyIntervalsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an interval tree needs at least one interval to start from")
    }
}

impl Error for EmptyIntervalsError {}

/// A binary tree of disjoint closed intervals.
///
/// Overlapping (or touching) intervals are merged as they are added, and
/// deleting a range out of the middle of a stored interval splits it in two.
/// After every insertion the tree rebalances itself by subtree *size*: any
/// node whose two subtrees differ by more than two nodes has its heavier
/// child rotated above it. This keeps common insertion orders shallow, but
/// no logarithmic height is guaranteed.
///
/// ```
/// use merging_interval_tree::IntervalTree;
///
/// let mut tree = IntervalTree::new([(1.0, 2.0), (2.1, 3.0), (5.0, 8.0), (0.0, 3.0)]);
/// assert!(tree.is_covered(2.5));
/// assert!(!tree.is_covered(4.0));
///
/// tree.delete((2.7, 6.3));
/// assert!(!tree.is_covered(2.8));
/// assert!(tree.is_covered(7.0));
/// ```
#[cfg_attr(feature="serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct IntervalTree<K> {
    pub(crate) arena: Arena<K>,
    pub(crate) root: Option<NodeId>,
}

impl<K> IntervalTree<K>
where
    K: PartialOrd + Copy + fmt::Debug,
{
    /// Builds a tree by adding `intervals` in order.
    ///
    /// # Panics
    ///
    /// If `intervals` is empty. See [`IntervalTree::from_intervals`] for a
    /// non-panicking alternative.
    pub fn new<I, T>(intervals: I) -> IntervalTree<K>
    where
        I: IntoIterator<Item = T>,
        T: Into<Interval<K>>,
    {
        match IntervalTree::from_intervals(intervals) {
            Ok(tree) => tree,
            Err(err) => panic!("{}", err),
        }
    }

    /// Builds a tree by adding `intervals` in order: the first one becomes the
    /// root, the rest go through [`IntervalTree::add`].
    pub fn from_intervals<I, T>(intervals: I) -> Result<IntervalTree<K>, EmptyIntervalsError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Interval<K>>,
    {
        let mut intervals = intervals.into_iter().map(Into::into);
        let first = intervals.next().ok_or(EmptyIntervalsError)?;

        let mut arena = Arena::new();
        let root = arena.alloc(Node::lone(first.lower, first.upper));
        let mut tree = IntervalTree {
            arena,
            root: Some(root),
        };
        for interval in intervals {
            tree.add(interval);
        }
        Ok(tree)
    }

    /// Adds `interval`, merging it with every stored interval it overlaps or
    /// touches.
    ///
    /// ```
    /// use merging_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new([(0, 2)]);
    /// tree.add((1, 3));
    /// assert_eq!(tree.iter().collect::<Vec<_>>(), vec![Interval::new(0, 3)]);
    /// ```
    pub fn add<I>(&mut self, interval: I)
    where
        I: Into<Interval<K>>,
    {
        let interval = interval.into();
        debug!("adding [{:?}, {:?}]", interval.lower, interval.upper);

        let mut current = match self.root {
            Some(root) => root,
            None => {
                self.root = Some(self.arena.alloc(Node::lone(interval.lower, interval.upper)));
                return;
            }
        };

        loop {
            let node = self.arena.node(current);
            let side = if interval.upper < node.left_point {
                Some(Direction::Left)
            } else if interval.lower > node.right_point {
                Some(Direction::Right)
            } else {
                None
            };

            match side {
                Some(direction) => match node.child(direction) {
                    Some(child) => current = child,
                    None => {
                        let lone = self.arena.alloc(Node::lone(interval.lower, interval.upper));
                        self.root = Some(
                            self.arena
                                .set_child_two_way_autobalanced(current, direction, lone),
                        );
                        return;
                    }
                },
                None => {
                    if interval.lower < node.left_point {
                        self.arena.node_mut(current).left_point = interval.lower;
                        self.arena.merge_children(current, Direction::Left);
                    }
                    if interval.upper > self.arena.node(current).right_point {
                        self.arena.node_mut(current).right_point = interval.upper;
                        self.arena.merge_children(current, Direction::Right);
                    }
                    return;
                }
            }
        }
    }

    /// Removes `interval` from the covered set.
    ///
    /// Stored intervals are truncated at the ends of `interval` (which stay
    /// covered, since bounds are closed), split in two when `interval` lies
    /// strictly inside one, and dropped when `interval` covers them entirely.
    ///
    /// Since truncated bounds land on the ends of `interval`, deleting a
    /// single point out of a stored interval leaves two nodes touching at
    /// that point. Later adds do not merge them back together.
    pub fn delete<I>(&mut self, interval: I)
    where
        I: Into<Interval<K>>,
    {
        let interval = interval.into();
        debug!("deleting [{:?}, {:?}]", interval.lower, interval.upper);

        let mut current = self.root;
        while let Some(id) = current {
            let node = self.arena.node(id);
            let (left_point, right_point) = (node.left_point, node.right_point);

            if interval.upper < left_point {
                current = node.left;
            } else if interval.lower > right_point {
                current = node.right;
            } else if interval.lower > left_point && interval.upper < right_point {
                self.split(id, interval);
                return;
            } else if interval.lower <= left_point && interval.upper >= right_point {
                self.arena.trim(id, Direction::Left, Direction::Left, interval.lower);
                self.arena.trim(id, Direction::Right, Direction::Right, interval.upper);
                self.root = self.arena.remove(id);
                return;
            } else if interval.upper < right_point {
                self.arena.node_mut(id).left_point = interval.upper;
                self.arena.trim(id, Direction::Left, Direction::Left, interval.lower);
                return;
            } else {
                self.arena.node_mut(id).right_point = interval.lower;
                self.arena.trim(id, Direction::Right, Direction::Right, interval.upper);
                return;
            }
        }
    }

    /// Cuts `interval` out of the middle of `id`. The node keeps the right
    /// remainder and a new left child takes the left remainder, along with
    /// the node's previous left subtree.
    fn split(&mut self, id: NodeId, interval: Interval<K>) {
        let (original_left, prior_left) = {
            let node = self.arena.node(id);
            (node.left_point, node.left)
        };
        debug!(
            "splitting {:?} into [{:?}, {:?}] and [{:?}, ...]",
            id, original_left, interval.lower, interval.upper
        );
        self.arena.node_mut(id).left_point = interval.upper;

        let split_off = self.arena.alloc(Node::lone(original_left, interval.lower));
        self.arena.set_child_two_way(split_off, Direction::Left, prior_left);
        self.arena.update_counts(split_off);
        self.root = Some(
            self.arena
                .set_child_two_way_autobalanced(id, Direction::Left, split_off),
        );
    }

    /// Returns true if `point` lies within any stored interval.
    pub fn is_covered(&self, point: K) -> bool {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.arena.node(id);
            if point < node.left_point {
                current = node.left;
            } else if point > node.right_point {
                current = node.right;
            } else {
                return true;
            }
        }
        false
    }
}

impl<K> IntervalTree<K> {
    /// Number of disjoint intervals stored.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every interval. The next [`IntervalTree::add`] starts a new root.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// The interval held by the current root node.
    ///
    /// Rotations change which node sits at the root, so this is mostly
    /// useful for observing the rebalancing.
    pub fn root_interval(&self) -> Option<Interval<K>>
    where
        K: Copy,
    {
        self.root.map(|root| {
            let node = self.arena.node(root);
            Interval::new(node.left_point, node.right_point)
        })
    }

    /// Number of levels in the tree, 0 when empty.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<NodeId> = self.root.into_iter().collect();
        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|id| {
                    let node = self.arena.node(*id);
                    node.left.into_iter().chain(node.right)
                })
                .collect();
        }
        height
    }

    /// Iterates over the stored intervals in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            arena: &self.arena,
            stack: Vec::new(),
            current: self.root,
        }
    }

    fn fmt_subtree(&self, id: NodeId, f: &mut fmt::Formatter) -> fmt::Result
    where
        K: fmt::Display,
    {
        let node = self.arena.node(id);
        write!(f, " {{ {} ", node)?;
        if let Some(left) = node.left {
            write!(f, "left:")?;
            self.fmt_subtree(left, f)?;
        }
        if let Some(right) = node.right {
            write!(f, "right:")?;
            self.fmt_subtree(right, f)?;
        }
        write!(f, "}} ")
    }
}

impl<K> TryFrom<Vec<Interval<K>>> for IntervalTree<K>
where
    K: PartialOrd + Copy + fmt::Debug,
{
    type Error = EmptyIntervalsError;

    fn try_from(intervals: Vec<Interval<K>>) -> Result<Self, Self::Error> {
        IntervalTree::from_intervals(intervals)
    }
}

impl<K> fmt::Display for IntervalTree<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.root {
            Some(root) => self.fmt_subtree(root, f),
            None => write!(f, " {{ }} "),
        }
    }
}

/// In-order iterator over the intervals of an [`IntervalTree`].
pub struct Iter<'a, K> {
    arena: &'a Arena<K>,
    stack: Vec<NodeId>,
    current: Option<NodeId>,
}

impl<'a, K> Iterator for Iter<'a, K>
where
    K: Copy,
{
    type Item = Interval<K>;

    fn next(&mut self) -> Option<Interval<K>> {
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = self.arena.node(id).left;
        }
        let id = self.stack.pop()?;
        let node = self.arena.node(id);
        self.current = node.right;
        Some(Interval::new(node.left_point, node.right_point))
    }
}

impl<'a, K> IntoIterator for &'a IntervalTree<K>
where
    K: Copy,
{
    type Item = Interval<K>;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}
