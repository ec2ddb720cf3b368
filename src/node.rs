use std::fmt;
#[cfg(feature="serde")]
use serde::{Serialize, Deserialize};

/// Which side of a node a child hangs from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns true if `a` lies strictly further towards this side than `b`.
    pub fn is_beyond<K: PartialOrd>(self, a: &K, b: &K) -> bool {
        match self {
            Direction::Left => a < b,
            Direction::Right => a > b,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Handle of a node inside an [`crate::arena::Arena`].
#[cfg_attr(feature="serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub usize);

#[cfg_attr(feature="serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Node<K> {
    pub left_point: K,
    pub right_point: K,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
    pub child_count: usize, // Descendants, excluding self.
}

impl<K> fmt::Display for Node<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "({}, {})[ch={}]",
            self.left_point, self.right_point, self.child_count
        )
    }
}

impl<K> Node<K> {
    /// A childless, parentless node covering `[left_point, right_point]`.
    pub fn lone(left_point: K, right_point: K) -> Node<K> {
        Node {
            left_point,
            right_point,
            left: None,
            right: None,
            parent: None,
            child_count: 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn child(&self, direction: Direction) -> Option<NodeId> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn child_mut(&mut self, direction: Direction) -> &mut Option<NodeId> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// The bound facing `direction`: `left_point` for `Left`, `right_point` for `Right`.
    pub fn bound(&self, direction: Direction) -> &K {
        match direction {
            Direction::Left => &self.left_point,
            Direction::Right => &self.right_point,
        }
    }

    pub fn bound_mut(&mut self, direction: Direction) -> &mut K {
        match direction {
            Direction::Left => &mut self.left_point,
            Direction::Right => &mut self.right_point,
        }
    }

    /// Closed-interval intersection test; touching endpoints overlap.
    pub fn overlaps(&self, other: &Node<K>) -> bool
    where
        K: PartialOrd,
    {
        self.left_point <= other.right_point && other.left_point <= self.right_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overlaps_is_symmetric() {
        let a = Node::lone(5.0, 6.0);
        let b = Node::lone(1.0, 2.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = Node::lone(1.0, 5.5);
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn touching_endpoints_overlap() {
        let a = Node::lone(0.0, 1.0);
        let b = Node::lone(1.0, 2.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn containment_overlaps() {
        let outer = Node::lone(0, 10);
        let inner = Node::lone(3, 4);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn bounds_by_direction() {
        let mut node = Node::lone(2, 9);
        assert_eq!(*node.bound(Direction::Left), 2);
        assert_eq!(*node.bound(Direction::Right), 9);
        *node.bound_mut(Direction::Right) = 11;
        assert_eq!(node.right_point, 11);
        assert!(Direction::Left.is_beyond(&1, &2));
        assert!(Direction::Right.is_beyond(&3, &2));
        assert!(!Direction::Right.is_beyond(&2, &2));
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn lone_node_display() {
        let node = Node::lone(1.5, 2.5);
        assert!(node.is_leaf());
        assert_eq!(node.to_string(), "(1.5, 2.5)[ch=0]");
    }
}
