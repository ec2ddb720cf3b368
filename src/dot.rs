//! Graphviz rendering of the tree structure, for debugging.

use crate::interval_tree::IntervalTree;
use crate::node::NodeId;
use std::fmt;
use std::io::{self, Write};

/// Graphviz view of a tree, rendered through [`fmt::Display`].
struct Dot<'a, K>(&'a IntervalTree<K>);

impl<'a, K> fmt::Display for Dot<'a, K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tree = self.0;
        writeln!(f, "digraph {{")?;
        let mut pending: Vec<NodeId> = tree.root.into_iter().collect();
        while let Some(id) = pending.pop() {
            let node = tree.arena.node(id);
            writeln!(f, "    n{} [label=\"{}\"];", id.0, node)?;
            if node.is_leaf() {
                continue;
            }
            for (side, child) in [("left", node.left), ("right", node.right)] {
                match child {
                    Some(child) => {
                        writeln!(f, "    n{} -> n{} [label=\"{}\"];", id.0, child.0, side)?;
                        pending.push(child);
                    }
                    None => {
                        writeln!(f, "    n{}_{} [shape=point];", id.0, side)?;
                        writeln!(f, "    n{} -> n{}_{};", id.0, id.0, side)?;
                    }
                }
            }
        }
        writeln!(f, "}}")
    }
}

impl<K> IntervalTree<K>
where
    K: fmt::Display,
{
    /// Renders the current structure as a Graphviz `digraph`.
    ///
    /// Every node is labelled with its bounds and child count. A missing
    /// child next to a present one is drawn as a point so that left and
    /// right stay distinguishable.
    pub fn to_dot(&self) -> String {
        Dot(self).to_string()
    }

    /// Writes [`IntervalTree::to_dot`] to `writer`.
    pub fn write_dot<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{}", Dot(self))
    }
}

#[cfg(test)]
mod tests {
    use crate::IntervalTree;
    use pretty_assertions::assert_eq;

    #[test]
    fn lists_nodes_and_edges() {
        let tree = IntervalTree::new([(0, 1), (3, 4)]);
        let dot = tree.to_dot();
        assert_eq!(
            dot,
            "digraph {\n\
             \x20   n0 [label=\"(0, 1)[ch=1]\"];\n\
             \x20   n0_left [shape=point];\n\
             \x20   n0 -> n0_left;\n\
             \x20   n0 -> n1 [label=\"right\"];\n\
             \x20   n1 [label=\"(3, 4)[ch=0]\"];\n\
             }\n"
        );
    }

    #[test]
    fn rendering_leaves_the_tree_alone() {
        let mut tree = IntervalTree::new([(0.0, 1.0), (2.0, 3.0), (4.0, 5.0), (6.0, 7.0)]);
        let before = tree.to_string();
        let mut buffer = Vec::new();
        tree.write_dot(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), tree.to_dot());
        assert_eq!(tree.to_string(), before);
        tree.add((8.0, 9.0));
        assert_eq!(tree.to_dot().matches("[label=\"(").count(), 5);
    }

    #[test]
    fn empty_tree_renders_empty_graph() {
        let mut tree = IntervalTree::new([(0, 1)]);
        tree.delete((0, 1));
        assert_eq!(tree.to_dot(), "digraph {\n}\n");
    }
}
