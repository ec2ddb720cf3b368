use std::fmt;
#[cfg(feature="serde")]
use serde::{Serialize, Deserialize};

/// A closed interval `[lower, upper]`.
///
/// The tree does not check that `lower <= upper`; passing a reversed
/// interval to any operation gives unspecified (but memory-safe) results.
#[cfg_attr(feature="serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval<K> {
    pub lower: K,
    pub upper: K,
}

impl<K> Interval<K> {
    pub fn new(lower: K, upper: K) -> Interval<K> {
        Interval { lower, upper }
    }

    /// Returns true if `point` lies within the closed interval.
    pub fn contains(&self, point: &K) -> bool
    where
        K: PartialOrd,
    {
        self.lower <= *point && *point <= self.upper
    }
}

impl<K> From<(K, K)> for Interval<K> {
    fn from((lower, upper): (K, K)) -> Interval<K> {
        Interval { lower, upper }
    }
}

impl<K> fmt::Display for Interval<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn contains_is_closed_on_both_ends() {
        let interval = Interval::new(1.0, 2.0);
        assert!(interval.contains(&1.0));
        assert!(interval.contains(&1.5));
        assert!(interval.contains(&2.0));
        assert!(!interval.contains(&0.99));
        assert!(!interval.contains(&2.01));
    }

    #[test]
    fn from_tuple_and_display() {
        let interval: Interval<i32> = (3, 7).into();
        assert_eq!(interval, Interval::new(3, 7));
        assert_eq!(interval.to_string(), "[3, 7]");
    }
}
