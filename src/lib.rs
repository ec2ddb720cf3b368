//! Implementation of a self-balancing interval tree ([`IntervalTree`]) that
//! keeps a set of disjoint closed intervals. Intervals that overlap or touch
//! are merged on insertion, deleting a range truncates the stored intervals
//! it crosses (splitting one in two when the range falls strictly inside
//! it), and point queries answer whether a value is covered.
//!
//! Nodes live in an index-addressed arena, with parent handles used to walk
//! back up during rebalancing. Rebalancing is driven by subtree *sizes*
//! rather than heights: whenever the two subtrees of a node differ by more
//! than two nodes, the heavier child is rotated above it.
//!
//! Any type satisfying [`PartialOrd`] and [`Copy`] can serve as a bound;
//! floating point bounds are the common case.
//!
//! ```
//! use merging_interval_tree::{Interval, IntervalTree};
//!
//! let mut tree = IntervalTree::new([(0.0, 2.0), (1.0, 3.0), (5.0, 8.0)]);
//! assert_eq!(
//!     tree.iter().collect::<Vec<_>>(),
//!     vec![Interval::new(0.0, 3.0), Interval::new(5.0, 8.0)]
//! );
//!
//! tree.delete((6.0, 7.0));
//! assert!(tree.is_covered(5.5));
//! assert!(!tree.is_covered(6.5));
//! assert_eq!(tree.len(), 3);
//! ```

mod arena;
mod dot;
mod interval;
/// The interval tree and its iterator.
pub mod interval_tree;
mod node;

pub use interval::Interval;
pub use interval_tree::{EmptyIntervalsError, IntervalTree, Iter};
