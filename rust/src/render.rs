//! Text rendering of the tree shape.
//!
//! Each level is printed on its own line, breadth-first. A node shows as
//! `(k1,k2,...)` centered in a column as wide as all of its leaves; a leaf's
//! column is its label plus four spaces. Built on `NodeView` only.

use std::fmt;

use crate::types::BPlusTree;
use crate::view::NodeView;

/// Laid-out node: its label, column width and children.
struct Block {
    label: String,
    width: usize,
    children: Vec<Block>,
}

impl Block {
    fn layout<V>(node: NodeView<'_, V>) -> Self {
        let keys: Vec<String> = node.keys().iter().map(ToString::to_string).collect();
        let label = format!("({})", keys.join(","));

        let children: Vec<Block> = node.children().into_iter().map(Block::layout).collect();
        let width = if children.is_empty() {
            label.len() + 4
        } else {
            children.iter().map(|child| child.width).sum()
        };

        Self {
            label,
            width,
            children,
        }
    }
}

impl<V> fmt::Display for BPlusTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = Block::layout(self.root());
        let mut level = vec![&root];

        while !level.is_empty() {
            let mut next_level = Vec::new();
            for block in level {
                let padding = block.width.saturating_sub(block.label.len()) / 2;
                write!(f, "{:pad$}{}{:pad$}", "", block.label, "", pad = padding)?;
                next_level.extend(&block.children);
            }
            writeln!(f)?;
            level = next_level;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::types::BPlusTree;

    #[test]
    fn test_render_empty_tree() {
        let tree = BPlusTree::<()>::new(4).unwrap();
        assert_eq!(tree.to_string(), "  ()  \n");
    }

    #[test]
    fn test_render_root_leaf() {
        let mut tree = BPlusTree::new(4).unwrap();
        for key in [3, 1, 2] {
            tree.insert(key, ()).unwrap();
        }
        assert_eq!(tree.to_string(), "  (1,2,3)  \n");
    }

    #[test]
    fn test_render_two_levels() {
        let mut tree = BPlusTree::new(4).unwrap();
        for key in 1..=4 {
            tree.insert(key, ()).unwrap();
        }
        // leaves "(1,2)" and "(3,4)" are 9 wide each; root "(3)" is centered in 18
        let expected = format!(
            "{}(3){}\n  (1,2)    (3,4)  \n",
            " ".repeat(7),
            " ".repeat(7)
        );
        assert_eq!(tree.to_string(), expected);
    }

    #[test]
    fn test_render_line_per_level() {
        let mut tree = BPlusTree::new(3).unwrap();
        for key in 0..30 {
            tree.insert(key, ()).unwrap();
        }
        assert_eq!(tree.to_string().lines().count(), tree.height());
    }
}
